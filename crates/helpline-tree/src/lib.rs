// SPDX-FileCopyrightText: 2026 Helpline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Decision-tree navigator for guided support conversations.
//!
//! The tree is a closed, hand-authored state machine: states are step ids,
//! transitions are option selections, the initial state is `start`, and
//! terminal states are nodes with an empty option set. The mapping is
//! immutable shared configuration, built once at process start. Looking up
//! an unknown step is a defined branch (the fallback node), never an error.

use std::collections::HashMap;
use std::sync::LazyLock;

use serde::Serialize;

/// One selectable transition out of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DecisionOption {
    /// Step id of the node this option leads to.
    pub id: &'static str,
    /// Text shown to the end user.
    pub label: &'static str,
}

/// A single prompt plus its outgoing transitions.
///
/// An empty option set marks an absorbing state: the guided conversation
/// ends there (or hands over to a manual submission).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DecisionNode {
    /// Question or statement presented at this step.
    pub prompt: &'static str,
    /// Ordered transitions out of this step.
    pub options: &'static [DecisionOption],
}

/// Node returned for any step id absent from the mapping.
pub const FALLBACK: DecisionNode = DecisionNode {
    prompt: "Sorry, I didn't understand that. Could you rephrase?",
    options: &[],
};

const fn opt(id: &'static str, label: &'static str) -> DecisionOption {
    DecisionOption { id, label }
}

static NODE_TABLE: &[(&str, DecisionNode)] = &[
    (
        "start",
        DecisionNode {
            prompt: "Hello! How can I assist you today?",
            options: &[
                opt("billing", "Billing Issues"),
                opt("tech_support", "Technical Support"),
                opt("product", "Product Inquiry"),
                opt("other", "Other"),
            ],
        },
    ),
    (
        "other",
        DecisionNode {
            prompt: "Please describe your issue in more detail. Our team will get back to you shortly.",
            options: &[],
        },
    ),
    // --- Billing subtree ---
    (
        "billing",
        DecisionNode {
            prompt: "What kind of billing issue are you experiencing?",
            options: &[
                opt("missing_bill", "I didn't receive my bill."),
                opt("wrong_amount", "The bill amount is incorrect."),
                opt("payment_help", "I need help with payment options."),
                opt("manual_response", "Other"),
            ],
        },
    ),
    (
        "missing_bill",
        DecisionNode {
            prompt: "Did you check your email's spam folder?",
            options: &[
                opt("yes_checked", "Yes, I checked."),
                opt("no_checked", "No, I haven't checked yet."),
                opt("manual_response", "Other"),
            ],
        },
    ),
    (
        "yes_checked",
        DecisionNode {
            prompt: "If you've checked your spam folder and still can't find the bill, please contact our billing team. Would you like more assistance?",
            options: &[
                opt("manual_response", "Yes, please."),
                opt("no_help", "No, thanks."),
            ],
        },
    ),
    (
        "no_checked",
        DecisionNode {
            prompt: "Please check your spam folder and let us know if the issue persists. Need more help?",
            options: &[
                opt("manual_response", "Yes, I need more help."),
                opt("no_help", "No, I'll try it myself."),
            ],
        },
    ),
    (
        "wrong_amount",
        DecisionNode {
            prompt: "Can you confirm the incorrect amount?",
            options: &[
                opt("undercharged", "I was undercharged."),
                opt("overcharged", "I was overcharged."),
                opt("manual_response", "Other"),
            ],
        },
    ),
    (
        "undercharged",
        DecisionNode {
            prompt: "Thanks for reporting. We'll review the issue and adjust your bill. Need further assistance?",
            options: &[
                opt("manual_response", "Yes, please."),
                opt("no_help", "No, that's all."),
            ],
        },
    ),
    (
        "overcharged",
        DecisionNode {
            prompt: "We're sorry for the inconvenience. We'll investigate the overcharge and adjust it. Need more help?",
            options: &[
                opt("manual_response", "Yes, I have more questions."),
                opt("no_help", "No, that's all."),
            ],
        },
    ),
    (
        "payment_help",
        DecisionNode {
            prompt: "What do you need help with regarding payment?",
            options: &[
                opt("payment_methods", "Available payment methods"),
                opt("payment_failed", "Payment failed"),
                opt("manual_response", "Other"),
            ],
        },
    ),
    (
        "payment_methods",
        DecisionNode {
            prompt: "Our payment methods include Credit Card, Debit Card, and PayPal. Do you need more assistance?",
            options: &[
                opt("manual_response", "Yes, please."),
                opt("no_help", "No, thanks."),
            ],
        },
    ),
    (
        "payment_failed",
        DecisionNode {
            prompt: "What error did you encounter while making the payment?",
            options: &[
                opt("card_declined", "Card declined"),
                opt("transaction_failed", "Transaction failed"),
                opt("manual_response", "Other"),
            ],
        },
    ),
    (
        "card_declined",
        DecisionNode {
            prompt: "Your card issuer declined the charge. Please verify the card details or try a different card. Need more help?",
            options: &[
                opt("manual_response", "Yes, please."),
                opt("no_help", "No, thanks."),
            ],
        },
    ),
    (
        "transaction_failed",
        DecisionNode {
            prompt: "The transaction did not complete and no charge was made. Please try again in a few minutes. Need more help?",
            options: &[
                opt("manual_response", "Yes, please."),
                opt("no_help", "No, thanks."),
            ],
        },
    ),
    // --- Technical support subtree ---
    (
        "tech_support",
        DecisionNode {
            prompt: "What technical issue are you facing?",
            options: &[
                opt("login_issues", "Unable to log in"),
                opt("error_messages", "Error messages"),
                opt("performance", "Slow performance"),
                opt("manual_response", "Other"),
            ],
        },
    ),
    (
        "login_issues",
        DecisionNode {
            prompt: "Are you unable to reset your password?",
            options: &[
                opt("yes_reset", "Yes"),
                opt("no_reset", "No"),
                opt("manual_response", "Other"),
            ],
        },
    ),
    (
        "yes_reset",
        DecisionNode {
            prompt: "Please use the 'Forgot password' link on the sign-in page. If the reset email never arrives, check your spam folder. Need more help?",
            options: &[
                opt("manual_response", "Yes, please."),
                opt("no_help", "No, thanks."),
            ],
        },
    ),
    (
        "no_reset",
        DecisionNode {
            prompt: "Please double-check your username and try signing in again. Need more help?",
            options: &[
                opt("manual_response", "Yes, please."),
                opt("no_help", "No, thanks."),
            ],
        },
    ),
    (
        "error_messages",
        DecisionNode {
            prompt: "What type of error message are you seeing?",
            options: &[
                opt("network_error", "Network error"),
                opt("server_error", "Server error"),
                opt("manual_response", "Other"),
            ],
        },
    ),
    (
        "network_error",
        DecisionNode {
            prompt: "Please check your internet connection and try again. Need further assistance?",
            options: &[
                opt("manual_response", "Yes, please."),
                opt("no_help", "No, thanks."),
            ],
        },
    ),
    (
        "server_error",
        DecisionNode {
            prompt: "It seems there's an issue on our end. Would you like to report this problem?",
            options: &[
                opt("manual_response", "Yes, report it."),
                opt("no_help", "No, thanks."),
            ],
        },
    ),
    (
        "performance",
        DecisionNode {
            prompt: "Is the app slow or unresponsive?",
            options: &[
                opt("slow", "Slow"),
                opt("unresponsive", "Unresponsive"),
                opt("manual_response", "Other"),
            ],
        },
    ),
    (
        "slow",
        DecisionNode {
            prompt: "Please try clearing your cache and restarting the app. Need more assistance?",
            options: &[
                opt("manual_response", "Yes, I need more help."),
                opt("no_help", "No, thanks."),
            ],
        },
    ),
    (
        "unresponsive",
        DecisionNode {
            prompt: "Are you using the latest version of the app?",
            options: &[
                opt("yes_latest", "Yes, I am."),
                opt("no_latest", "No, I'm not."),
                opt("manual_response", "Other"),
            ],
        },
    ),
    (
        "yes_latest",
        DecisionNode {
            prompt: "Thanks for confirming. Please restart the app once more and let us know if it stays unresponsive. Need more help?",
            options: &[
                opt("manual_response", "Yes, please."),
                opt("no_help", "No, thanks."),
            ],
        },
    ),
    (
        "no_latest",
        DecisionNode {
            prompt: "Please update to the latest version and try again. Need more help?",
            options: &[
                opt("manual_response", "Yes, please."),
                opt("no_help", "No, thanks."),
            ],
        },
    ),
    // --- Product inquiry subtree ---
    (
        "product",
        DecisionNode {
            prompt: "What kind of product inquiry do you have?",
            options: &[
                opt("availability", "Product availability"),
                opt("features", "Product features"),
                opt("pricing", "Pricing"),
                opt("manual_response", "Other"),
            ],
        },
    ),
    (
        "availability",
        DecisionNode {
            prompt: "Is there a specific product you're looking for?",
            options: &[
                opt("specific_product", "Yes, a specific product."),
                opt("general_availability", "No, just general availability."),
                opt("manual_response", "Other"),
            ],
        },
    ),
    (
        "specific_product",
        DecisionNode {
            prompt: "Please tell us which product you're looking for and we'll check its availability.",
            options: &[
                opt("manual_response", "Describe the product"),
                opt("no_help", "Never mind"),
            ],
        },
    ),
    (
        "general_availability",
        DecisionNode {
            prompt: "Most products are in stock and ship within 2-3 business days. Need more help?",
            options: &[
                opt("manual_response", "Yes, please."),
                opt("no_help", "No, thanks."),
            ],
        },
    ),
    (
        "features",
        DecisionNode {
            prompt: "What features are you interested in?",
            options: &[
                opt("specific_features", "Specific features."),
                opt("all_features", "All features."),
                opt("manual_response", "Other"),
            ],
        },
    ),
    (
        "specific_features",
        DecisionNode {
            prompt: "Which features would you like to know more about?",
            options: &[
                opt("manual_response", "Describe the features"),
                opt("no_help", "Never mind"),
            ],
        },
    ),
    (
        "all_features",
        DecisionNode {
            prompt: "You can find the full feature list on each product page. Need more help?",
            options: &[
                opt("manual_response", "Yes, please."),
                opt("no_help", "No, thanks."),
            ],
        },
    ),
    (
        "pricing",
        DecisionNode {
            prompt: "Do you need pricing for a specific product or all products?",
            options: &[
                opt("specific_pricing", "Specific product pricing."),
                opt("general_pricing", "General pricing."),
                opt("manual_response", "Other"),
            ],
        },
    ),
    (
        "specific_pricing",
        DecisionNode {
            prompt: "Which product would you like pricing for?",
            options: &[
                opt("manual_response", "Describe the product"),
                opt("no_help", "Never mind"),
            ],
        },
    ),
    (
        "general_pricing",
        DecisionNode {
            prompt: "Full pricing details for every plan are listed on our pricing page. Need more help?",
            options: &[
                opt("manual_response", "Yes, please."),
                opt("no_help", "No, thanks."),
            ],
        },
    ),
    // --- Absorbing states ---
    (
        "manual_response",
        DecisionNode {
            prompt: "Please describe your issue in more detail. Our team will get back to you shortly.",
            options: &[],
        },
    ),
    (
        "no_help",
        DecisionNode {
            prompt: "Glad we could help. Have a great day!",
            options: &[],
        },
    ),
];

static NODES: LazyLock<HashMap<&'static str, DecisionNode>> =
    LazyLock::new(|| NODE_TABLE.iter().copied().collect());

/// Look up the node registered under `step_id`.
///
/// Absence is a defined branch, not a failure: unknown ids return
/// [`FALLBACK`] with an empty option set.
pub fn lookup(step_id: &str) -> DecisionNode {
    NODES.get(step_id).copied().unwrap_or(FALLBACK)
}

/// All registered step ids, for diagnostics and tests.
pub fn step_ids() -> impl Iterator<Item = &'static str> {
    NODES.keys().copied()
}
