use derivative::Derivative;
use log::*;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Lower bound of the service window, as a percentile of the active services
pub const DEFAULT_SERVICES_FROM: i32 = 0;
/// Upper bound (exclusive) of the service window
pub const DEFAULT_SERVICES_TO: i32 = 100;

/// How the scoreboard is presented. Read once when the display starts.
#[derive(Derivative, Serialize, Deserialize)]
#[derivative(Debug, Clone, PartialEq, Eq, Default)]
#[serde(default)]
pub struct ViewConfig {
    /// Width of the compact side panel, 0 hides it
    pub compact_scoreboard_width: u32,
    /// Seconds between automatic row openings, 0 disables them
    pub auto_open: u32,
    /// Keep every row expanded so the page can be captured
    pub for_save: bool,
    pub style: String,
    #[derivative(Default(value = "DEFAULT_SERVICES_FROM"))]
    pub services_from: i32,
    #[derivative(Default(value = "DEFAULT_SERVICES_TO"))]
    pub services_to: i32,
}

impl ViewConfig {
    /// Builds a config from a URL query string such as
    /// `compactScoreboardWidth=300&servicesFrom=0&servicesTo=50`.
    ///
    /// Numbers are read the way a browser's `parseInt` reads them, so `50px` is `50`. Values
    /// that don't start with a number fall back to the default. `forSave` is switched on by
    /// its mere presence.
    pub fn from_query(query: &str) -> Self {
        let mut config = Self::default();
        let query = query.trim_start_matches('?');

        for pair in query.split('&').filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            let value = decode_component(value);
            match key {
                "compactScoreboardWidth" => {
                    config.compact_scoreboard_width = parse_int_prefix(&value)
                        .and_then(|v| u32::try_from(v).ok())
                        .unwrap_or(0)
                }
                "autoOpen" => {
                    config.auto_open = parse_int_prefix(&value)
                        .and_then(|v| u32::try_from(v).ok())
                        .unwrap_or(0)
                }
                "forSave" => config.for_save = true,
                "style" => config.style = value,
                "servicesFrom" => {
                    config.services_from = parse_int_prefix(&value)
                        .and_then(|v| i32::try_from(v).ok())
                        .unwrap_or(DEFAULT_SERVICES_FROM)
                }
                "servicesTo" => {
                    config.services_to = parse_int_prefix(&value)
                        .and_then(|v| i32::try_from(v).ok())
                        .unwrap_or(DEFAULT_SERVICES_TO)
                }
                _ => debug!("Ignoring unknown view parameter {key:?}"),
            }
        }

        config
    }

    /// `None` when rows shouldn't be opened automatically
    pub fn auto_open_period(&self) -> Option<Duration> {
        if self.auto_open == 0 {
            None
        } else {
            Some(Duration::from_secs(self.auto_open.into()))
        }
    }

    pub fn has_compact_scoreboard(&self) -> bool {
        self.compact_scoreboard_width != 0
    }
}

/// Reads the leading decimal integer of `s`, skipping leading whitespace
fn parse_int_prefix(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    let value: i64 = digits[..end].parse().ok()?;
    Some(if negative { -value } else { value })
}

/// Undoes form encoding: `+` is a space and `%XX` is a byte
fn decode_component(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'+' => out.push(b' '),
            b'%' if i + 2 < bytes.len()
                && bytes[i + 1].is_ascii_hexdigit()
                && bytes[i + 2].is_ascii_hexdigit() =>
            {
                let hex = [bytes[i + 1], bytes[i + 2]];
                // Both bytes are ASCII hex digits, so this can't fail
                let byte = std::str::from_utf8(&hex)
                    .ok()
                    .and_then(|h| u8::from_str_radix(h, 16).ok())
                    .unwrap_or(b'?');
                out.push(byte);
                i += 2;
            }
            b => out.push(b),
        }
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}
