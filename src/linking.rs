//! Deep links for contact methods
//!
//! Building a link is pure and total. Opening one is best effort: failures
//! are logged, never returned.

use tracing::{debug, warn};

use crate::models::Platform;

/// Build the URI that opens `value` in the app for `platform`.
pub fn build_deep_link(platform: Platform, value: &str) -> String {
    match platform {
        Platform::Phone => format!("tel:{}", value),
        Platform::Sms => format!("sms:{}", value),
        Platform::Email => format!("mailto:{}", value),
        Platform::Instagram => format!("instagram://user?username={}", value),
        Platform::Whatsapp => {
            // wa.me only accepts the bare international number
            let digits: String = value.chars().filter(|c| c.is_ascii_digit()).collect();
            format!("https://wa.me/{}", digits)
        }
        Platform::Telegram => format!("https://t.me/{}", value),
        Platform::Linkedin => format!("https://www.linkedin.com/in/{}", value),
        Platform::Tiktok => format!("https://www.tiktok.com/@{}", value),
    }
}

/// Build a link from a raw platform tag. Unknown tags yield `value` unchanged.
pub fn build_deep_link_for_tag(tag: &str, value: &str) -> String {
    match Platform::parse(tag) {
        Some(platform) => build_deep_link(platform, value),
        None => value.to_string(),
    }
}

/// Hand `url` to the OS handler. Returns whether the launch was accepted.
pub fn open_deep_link(url: &str) -> bool {
    if url.trim().is_empty() {
        warn!("Refusing to open an empty link");
        return false;
    }

    match webbrowser::open(url) {
        Ok(()) => {
            debug!(url, "Opened link");
            true
        }
        Err(e) => {
            warn!(url, error = %e, "Failed to open link");
            false
        }
    }
}
