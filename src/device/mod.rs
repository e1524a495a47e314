//! User-agent classification for session device labels.
//!
//! Markers are checked most-specific first: every Edge user agent also
//! carries `chrome/` and `safari`, and every Chrome one carries `safari`, so
//! the order of the tables below is load-bearing.

use serde::{Deserialize, Serialize};
use strum::Display;

pub const UNKNOWN_DEVICE: &str = "Unknown device";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum OperatingSystem {
    Windows,
    #[strum(serialize = "iOS")]
    Ios,
    Android,
    #[strum(serialize = "macOS")]
    MacOs,
    Linux,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum Browser {
    Edge,
    Chrome,
    Safari,
    Firefox,
}

/// Result of classifying a raw user-agent string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInfo {
    pub os: Option<OperatingSystem>,
    pub browser: Option<Browser>,
    pub label: String,
}

const OS_MARKERS: &[(&[&str], OperatingSystem)] = &[
    (&["windows"], OperatingSystem::Windows),
    // Checked ahead of macOS, unlike the usual windows/macos/linux/android/ios
    // listing: iPhone and iPad agents also say "like Mac OS X".
    (&["iphone", "ipad", "ios"], OperatingSystem::Ios),
    (&["android"], OperatingSystem::Android),
    (&["mac os x", "macintosh"], OperatingSystem::MacOs),
    (&["linux"], OperatingSystem::Linux),
];

/// Classify a user-agent string. Pure and deterministic.
pub fn classify(user_agent: &str) -> DeviceInfo {
    let ua = user_agent.to_lowercase();
    let os = detect_os(&ua);
    let browser = detect_browser(&ua);
    let label = match (browser, os) {
        (None, None) => UNKNOWN_DEVICE.to_string(),
        (Some(b), Some(o)) => format!("{b} on {o}"),
        (Some(b), None) => format!("{b} on Unknown OS"),
        (None, Some(o)) => format!("Browser on {o}"),
    };
    DeviceInfo { os, browser, label }
}

fn detect_os(ua: &str) -> Option<OperatingSystem> {
    OS_MARKERS
        .iter()
        .find(|(markers, _)| markers.iter().any(|m| ua.contains(m)))
        .map(|(_, os)| *os)
}

fn detect_browser(ua: &str) -> Option<Browser> {
    if ua.contains("edg/") {
        Some(Browser::Edge)
    } else if ua.contains("chrome/") {
        Some(Browser::Chrome)
    } else if ua.contains("safari") {
        Some(Browser::Safari)
    } else if ua.contains("firefox") {
        Some(Browser::Firefox)
    } else {
        None
    }
}
