// SPDX-FileCopyrightText: 2026 Helpline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Declared-agent-string classification.

use helpline_core::UNKNOWN;

/// Browser and device metadata derived from an agent string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentInfo {
    pub browser_name: String,
    pub browser_version: String,
    pub device_type: String,
    pub operating_system: String,
}

/// Classify a declared agent string.
///
/// Returns `None` when the string is unrecognizable; the caller treats that
/// as a sub-lookup failure. Fields woothee cannot determine individually are
/// mapped to the "Unknown" marker.
pub fn parse_agent(agent: &str) -> Option<AgentInfo> {
    let parsed = woothee::parser::Parser::new().parse(agent)?;

    Some(AgentInfo {
        browser_name: known_or_unknown(parsed.name),
        browser_version: known_or_unknown(&parsed.version),
        device_type: device_type_for(parsed.category),
        operating_system: known_or_unknown(parsed.os),
    })
}

/// Map woothee's device category onto the visitor-facing device type.
fn device_type_for(category: &str) -> String {
    match category {
        "pc" => "Desktop".to_string(),
        "smartphone" => "Smartphone".to_string(),
        "mobilephone" => "Mobile".to_string(),
        "appliance" => "Appliance".to_string(),
        "crawler" => "Crawler".to_string(),
        _ => UNKNOWN.to_string(),
    }
}

/// Marker woothee uses for fields it could not determine.
const WOOTHEE_UNKNOWN: &str = "UNKNOWN";

fn known_or_unknown(value: &str) -> String {
    if value.is_empty() || value == WOOTHEE_UNKNOWN {
        UNKNOWN.to_string()
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHROME_DESKTOP: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
         AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
    const SAFARI_IPHONE: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) \
         AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.0 Mobile/15E148 Safari/604.1";

    #[test]
    fn desktop_chrome_is_classified() {
        let info = parse_agent(CHROME_DESKTOP).unwrap();
        assert_eq!(info.browser_name, "Chrome");
        assert_eq!(info.device_type, "Desktop");
        assert!(info.operating_system.contains("Windows"));
        assert_ne!(info.browser_version, UNKNOWN);
    }

    #[test]
    fn iphone_safari_is_a_smartphone() {
        let info = parse_agent(SAFARI_IPHONE).unwrap();
        assert_eq!(info.browser_name, "Safari");
        assert_eq!(info.device_type, "Smartphone");
    }

    #[test]
    fn gibberish_agent_fails_classification() {
        assert!(parse_agent("definitely-not-a-browser").is_none());
    }

    #[test]
    fn unknown_category_maps_to_unknown_device() {
        assert_eq!(device_type_for("something-new"), UNKNOWN);
    }
}
