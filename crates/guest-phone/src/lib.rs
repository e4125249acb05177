//! Phone number extraction for guest searches.
//!
//! Guests are searched by phone with whatever the caller typed: spaces,
//! dashes, parentheses, extensions. The guests service indexes a single
//! canonical shape, chosen by configuration through [`ExtractMode`].
//!
//! ```
//! use guest_phone::{extract_phone_number, ExtractMode};
//!
//! assert_eq!(
//!     extract_phone_number("+1 (415) 555-1212", ExtractMode::E164),
//!     "+14155551212"
//! );
//! assert_eq!(
//!     extract_phone_number("415-555-1212 x89", ExtractMode::Digits),
//!     "4155551212"
//! );
//! ```

#![deny(
    clippy::expect_used,
    clippy::panic,
    clippy::print_stdout,
    clippy::todo,
    clippy::unimplemented,
    clippy::unwrap_used
)]

use std::fmt;
use std::str::FromStr;

use phonenumber::Mode;
use serde::{Deserialize, Serialize};

/// How a raw phone string is reduced before it is sent as a search filter.
///
/// Configured by name; parsing ignores case and surrounding whitespace.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum ExtractMode {
    /// Keep the digits (and a leading `+`), drop formatting and extensions.
    Digits,
    /// Parse the number and render it as E.164, e.g. `+14155551212`.
    #[default]
    E164,
    /// Parse the number and keep the national significant number only.
    National,
}

impl ExtractMode {
    pub const ALL: [Self; 3] = [Self::Digits, Self::E164, Self::National];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Digits => "digits",
            Self::E164 => "e164",
            Self::National => "national",
        }
    }
}

impl fmt::Display for ExtractMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a configured extraction mode name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown phone extraction mode '{0}', expected one of: digits, e164, national")]
pub struct UnknownModeError(pub String);

impl FromStr for ExtractMode {
    type Err = UnknownModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownModeError(s.to_string()))
    }
}

impl TryFrom<String> for ExtractMode {
    type Error = UnknownModeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Reduce `raw` to the canonical shape selected by `mode`.
///
/// Never fails: when `e164` or `national` cannot parse the input, the
/// digits-only rendering is returned instead so the search still runs.
#[must_use]
pub fn extract_phone_number(raw: &str, mode: ExtractMode) -> String {
    match mode {
        ExtractMode::Digits => digits_only(raw),
        ExtractMode::E164 => phonenumber::parse(None, raw.trim()).map_or_else(
            |_| digits_only(raw),
            |number| number.format().mode(Mode::E164).to_string(),
        ),
        ExtractMode::National => phonenumber::parse(None, raw.trim()).map_or_else(
            |_| digits_only(raw).trim_start_matches('+').to_string(),
            // Display keeps leading zeros (Italian numbers), unlike `value()`.
            |number| number.national().to_string(),
        ),
    }
}

fn digits_only(raw: &str) -> String {
    let trimmed = raw.trim();
    let mut out = String::with_capacity(trimmed.len());
    let mut saw_digit = false;

    if trimmed.starts_with('+') {
        out.push('+');
    }

    for ch in trimmed.chars() {
        if ch.is_ascii_digit() {
            out.push(ch);
            saw_digit = true;
        } else if saw_digit && matches!(ch, 'x' | 'X' | '#' | ';' | ',') {
            break;
        }
    }

    if saw_digit {
        out
    } else {
        String::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn digits_strip_formatting() {
        assert_eq!(
            extract_phone_number("  (415) 555-1212  ", ExtractMode::Digits),
            "4155551212"
        );
    }

    #[test]
    fn digits_keep_leading_plus() {
        assert_eq!(
            extract_phone_number("+1 (415) 555-1212", ExtractMode::Digits),
            "+14155551212"
        );
    }

    #[test]
    fn digits_drop_extension() {
        assert_eq!(
            extract_phone_number("415-555-1212 x89", ExtractMode::Digits),
            "4155551212"
        );
        assert_eq!(
            extract_phone_number("415-555-1212;ext=7", ExtractMode::Digits),
            "4155551212"
        );
    }

    #[test]
    fn digits_without_any_digit_is_empty() {
        assert_eq!(extract_phone_number("ext", ExtractMode::Digits), "");
        assert_eq!(extract_phone_number("   ", ExtractMode::Digits), "");
        assert_eq!(extract_phone_number("+", ExtractMode::Digits), "");
    }

    #[test]
    fn e164_formats_international_number() {
        assert_eq!(
            extract_phone_number("+44 20 7946 0958", ExtractMode::E164),
            "+442079460958"
        );
    }

    #[test]
    fn e164_falls_back_to_digits_without_country() {
        assert_eq!(
            extract_phone_number("(415) 555-1212", ExtractMode::E164),
            "4155551212"
        );
    }

    #[test]
    fn national_drops_country_code() {
        assert_eq!(
            extract_phone_number("+1 415 555 1212", ExtractMode::National),
            "4155551212"
        );
    }

    #[test]
    fn national_keeps_leading_zero() {
        assert_eq!(
            extract_phone_number("+39 06 1234 5678", ExtractMode::National),
            "0612345678"
        );
        assert_eq!(
            extract_phone_number("+39 06 1234 5678", ExtractMode::E164),
            "+390612345678"
        );
    }

    #[test]
    fn national_fallback_never_keeps_plus() {
        assert_eq!(
            extract_phone_number("+999 1", ExtractMode::National),
            "9991"
        );
    }

    #[test]
    fn mode_parses_case_insensitively() {
        assert_eq!("E164".parse::<ExtractMode>(), Ok(ExtractMode::E164));
        assert_eq!(" digits ".parse::<ExtractMode>(), Ok(ExtractMode::Digits));
        assert_eq!("National".parse::<ExtractMode>(), Ok(ExtractMode::National));
    }

    #[test]
    fn unknown_mode_is_rejected() {
        let err = "last4".parse::<ExtractMode>().unwrap_err();
        assert_eq!(err, UnknownModeError("last4".into()));
        assert!(err.to_string().contains("digits, e164, national"));
    }

    #[test]
    fn mode_deserializes_from_snake_case() {
        let mode: ExtractMode = serde_json::from_str(r#""national""#).expect("should parse");
        assert_eq!(mode, ExtractMode::National);
        assert_eq!(ExtractMode::default(), ExtractMode::E164);
    }

    #[test]
    fn mode_deserializes_like_from_str() {
        let mode: ExtractMode = serde_json::from_str(r#"" E164 ""#).expect("should parse");
        assert_eq!(mode, ExtractMode::E164);

        let err = serde_json::from_str::<ExtractMode>(r#""last4""#).unwrap_err();
        assert!(err.to_string().contains("unknown phone extraction mode 'last4'"));
    }

    #[test]
    fn mode_serializes_as_snake_case() {
        let json = serde_json::to_string(&ExtractMode::National).expect("should serialize");
        assert_eq!(json, r#""national""#);
    }

    #[test]
    fn display_round_trips_through_from_str() {
        for mode in ExtractMode::ALL {
            assert_eq!(mode.to_string().parse::<ExtractMode>(), Ok(mode));
        }
    }

    proptest! {
        #[test]
        fn digits_output_is_plus_and_ascii_digits(raw in "\\PC{0,40}") {
            let out = extract_phone_number(&raw, ExtractMode::Digits);
            let body = out.strip_prefix('+').unwrap_or(&out);
            prop_assert!(body.chars().all(|c| c.is_ascii_digit()));
        }

        #[test]
        fn extraction_never_contains_whitespace(raw in "[0-9 +()xX#.-]{0,30}") {
            for mode in ExtractMode::ALL {
                let out = extract_phone_number(&raw, mode);
                prop_assert!(!out.chars().any(char::is_whitespace));
            }
        }
    }
}
