//! Free-text address parsing.
//!
//! Grammar: `street, city, ST [ZIP]`, where the street may itself contain
//! commas (e.g. a unit designator), `ST` is a two-letter state code and `ZIP`
//! is a five digit code with an optional `-NNNN` extension.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use thiserror::Error;

static STATE_ZIP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<state>\S+)(?:\s+(?P<zip>\S+))?$").expect("valid state/zip regex")
});
static STATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z]{2}$").expect("valid state regex"));
static ZIP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{5}(?:-\d{4})?$").expect("valid zip regex"));
static LEADING_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<number>\d+[A-Za-z]?)\s+(?P<street>.+)$").expect("valid house number regex")
});

/// Ways an address can deviate from `street, city, ST ZIP`
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AddressError {
    #[error("address is empty")]
    Empty,

    #[error("expected 'Street, City, ST ZIP' but found {found} comma-separated part(s)")]
    MissingComponents { found: usize },

    #[error("street is empty")]
    EmptyStreet,

    #[error("city is empty")]
    EmptyCity,

    #[error("'{value}' is not a two-letter state code")]
    InvalidState { value: String },

    #[error("'{value}' is not a valid ZIP code")]
    InvalidZip { value: String },
}

/// A parsed address
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedAddress {
    pub street: String,
    pub city: String,
    /// Upper-cased two-letter code
    pub state: String,
    pub zip: Option<String>,
}

impl ParsedAddress {
    /// Split a leading house number off the street ("325 E Winslow Rd")
    pub fn house_number_and_street(&self) -> Option<(&str, &str)> {
        let caps = LEADING_NUMBER.captures(&self.street)?;
        let number = caps.name("number")?.as_str();
        let street = caps.name("street")?.as_str();
        Some((number, street))
    }

}

impl fmt::Display for ParsedAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}, {}", self.street, self.city, self.state)?;
        if let Some(zip) = &self.zip {
            write!(f, " {}", zip)?;
        }
        Ok(())
    }
}

/// Parse a free-text address.
pub fn parse_address(input: &str) -> Result<ParsedAddress, AddressError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(AddressError::Empty);
    }

    let parts: Vec<&str> = input.split(',').map(str::trim).collect();
    if parts.len() < 3 {
        return Err(AddressError::MissingComponents { found: parts.len() });
    }

    let (street_parts, rest) = parts.split_at(parts.len() - 2);
    let street = street_parts
        .iter()
        .filter(|p| !p.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(", ");
    let city = rest[0];
    let state_zip = rest[1];

    if street.is_empty() {
        return Err(AddressError::EmptyStreet);
    }
    if city.is_empty() {
        return Err(AddressError::EmptyCity);
    }

    let caps = STATE_ZIP
        .captures(state_zip)
        .ok_or_else(|| AddressError::InvalidState {
            value: state_zip.to_string(),
        })?;

    let state = caps.name("state").map(|m| m.as_str()).unwrap_or_default();
    if !STATE.is_match(state) {
        return Err(AddressError::InvalidState {
            value: state.to_string(),
        });
    }

    let zip = match caps.name("zip").map(|m| m.as_str()) {
        Some(zip) if ZIP.is_match(zip) => Some(zip.to_string()),
        Some(zip) => {
            return Err(AddressError::InvalidZip {
                value: zip.to_string(),
            })
        }
        None => None,
    };

    Ok(ParsedAddress {
        street,
        city: city.to_string(),
        state: state.to_uppercase(),
        zip,
    })
}

/// Validate a standalone postal code hint
pub fn is_valid_zip(zip: &str) -> bool {
    ZIP.is_match(zip.trim())
}
