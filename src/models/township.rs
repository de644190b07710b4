//! Administrative unit identity.

use serde::{Deserialize, Serialize};

const TOWNSHIP_SUFFIX: &str = " Township";

/// Civil township identified by its county and full unit name
/// (e.g. county "Monroe", name "Bloomington Township").
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Township {
    pub county: String,
    pub name: String,
}

impl Township {
    pub fn new(county: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            county: county.into(),
            name: name.into(),
        }
    }

    /// Unit name with the " Township" suffix removed
    pub fn bare_name(&self) -> &str {
        bare_unit_name(&self.name)
    }

}

impl std::fmt::Display for Township {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}, {} County", self.name, self.county)
    }
}

/// Strip the literal " Township" suffix used in the boundary data.
pub fn bare_unit_name(name: &str) -> &str {
    let name = name.trim();
    name.strip_suffix(TOWNSHIP_SUFFIX).unwrap_or(name).trim_end()
}
