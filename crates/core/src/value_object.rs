//! Value objects: equality by value, not identity.
//!
//! Each type here validates on construction, so a value that exists is a value
//! that is well-formed.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Marker trait for value objects.
///
/// Value objects are immutable and compared by their attribute values.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}

// ─────────────────────────────────────────────────────────────────────────────
// Amount
// ─────────────────────────────────────────────────────────────────────────────

/// Maximum number of integer digits an amount may carry.
pub const AMOUNT_MAX_INTEGER_DIGITS: usize = 13;
/// Maximum number of fractional digits an amount may carry.
pub const AMOUNT_MAX_FRACTION_DIGITS: usize = 2;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AmountError {
    #[error("amount is not a number")]
    Malformed,
    #[error("Amount must be greater than 0")]
    NotPositive,
    #[error("Amount must have at most 13 integer digits and 2 decimal places")]
    TooPrecise,
}

/// Positive fixed-point money amount.
///
/// Stored in the smallest currency unit (hundredths) to avoid float drift.
/// Renders as a decimal string with exactly two fractional digits.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Amount(i64);

impl ValueObject for Amount {}

impl Amount {
    const SCALE: i64 = 100;
    const MAX_MINOR: i64 = 10i64.pow(AMOUNT_MAX_INTEGER_DIGITS as u32) * Self::SCALE - 1;

    /// Build from hundredths (e.g. `1250` is `12.50`).
    pub fn from_minor_units(minor: i64) -> Result<Self, AmountError> {
        if minor <= 0 {
            return Err(AmountError::NotPositive);
        }
        if minor > Self::MAX_MINOR {
            return Err(AmountError::TooPrecise);
        }
        Ok(Self(minor))
    }

    pub fn minor_units(&self) -> i64 {
        self.0
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (negative, digits) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s.strip_prefix('+').unwrap_or(s)),
        };

        let (int_part, frac_part) = match digits.split_once('.') {
            Some((i, f)) => (i, f),
            None => (digits, ""),
        };

        if int_part.is_empty() && frac_part.is_empty() {
            return Err(AmountError::Malformed);
        }
        if !int_part.chars().all(|c| c.is_ascii_digit())
            || !frac_part.chars().all(|c| c.is_ascii_digit())
        {
            return Err(AmountError::Malformed);
        }

        let int_trimmed = int_part.trim_start_matches('0');
        if int_trimmed.len() > AMOUNT_MAX_INTEGER_DIGITS
            || frac_part.len() > AMOUNT_MAX_FRACTION_DIGITS
        {
            return Err(AmountError::TooPrecise);
        }

        let whole: i64 = if int_trimmed.is_empty() {
            0
        } else {
            int_trimmed.parse().map_err(|_| AmountError::Malformed)?
        };
        let mut cents: i64 = 0;
        for (i, c) in frac_part.chars().enumerate() {
            let d = i64::from(c as u8 - b'0');
            cents += if i == 0 { d * 10 } else { d };
        }

        let minor = whole * Self::SCALE + cents;
        if negative || minor == 0 {
            return Err(AmountError::NotPositive);
        }
        Self::from_minor_units(minor)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / Self::SCALE, self.0 % Self::SCALE)
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Int(i64),
            Float(f64),
        }

        let text = match Raw::deserialize(deserializer)? {
            Raw::Text(s) => s,
            Raw::Int(i) => i.to_string(),
            Raw::Float(x) => x.to_string(),
        };
        text.parse().map_err(serde::de::Error::custom)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// EmailAddress
// ─────────────────────────────────────────────────────────────────────────────

/// Normalized (trimmed, lowercased) e-mail address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct EmailAddress(String);

impl ValueObject for EmailAddress {}

impl EmailAddress {
    pub const MAX_LEN: usize = 255;

    /// Parse and normalize. Returns `None` when the input is not a plausible
    /// address.
    pub fn parse(raw: &str) -> Option<Self> {
        let normalized = raw.trim().to_lowercase();
        if normalized.is_empty() || normalized.len() > Self::MAX_LEN {
            return None;
        }
        if normalized.chars().any(char::is_whitespace) {
            return None;
        }

        let (local, domain) = normalized.split_once('@')?;
        if local.is_empty() || domain.contains('@') {
            return None;
        }
        let labels_ok = domain.split('.').all(|label| !label.is_empty());
        if !domain.contains('.') || !labels_ok {
            return None;
        }

        Some(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// HexColor
// ─────────────────────────────────────────────────────────────────────────────

/// `#RRGGBB` color.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct HexColor(String);

impl ValueObject for HexColor {}

impl HexColor {
    pub fn parse(raw: &str) -> Option<Self> {
        let hex = raw.strip_prefix('#')?;
        if hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()) {
            Some(Self(raw.to_string()))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for HexColor {
    /// Neutral grey used when a category is created without a color.
    fn default() -> Self {
        Self("#808080".to_string())
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
