use serde::Serialize;
use std::fmt;

/// Prefix shared by every unlinkable (NIL) identifier.
pub const NIL_PREFIX: &str = "NIL";

/// Number of digits expected after [`NIL_PREFIX`] in a well-formed NIL identifier.
pub const NIL_DIGITS: usize = 3;

// ---------------------------------------------------------------------------
// Mention
// ---------------------------------------------------------------------------

/// A linkable item (query id, document id, span id...). Always uppercase.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Mention(String);

impl Mention {
    pub fn new(raw: &str) -> Self {
        Self(raw.to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Mention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Mention {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

// ---------------------------------------------------------------------------
// KbId
// ---------------------------------------------------------------------------

/// A cluster identifier: either a knowledge-base entry or a NIL placeholder.
/// Always uppercase.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct KbId(String);

impl KbId {
    pub fn new(raw: &str) -> Self {
        Self(raw.to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Prefix-only check; the suffix is never inspected.
    pub fn is_nil(&self) -> bool {
        self.0.starts_with(NIL_PREFIX)
    }

    /// `NIL` followed by exactly three ASCII digits.
    pub fn is_well_formed_nil(&self) -> bool {
        self.0
            .strip_prefix(NIL_PREFIX)
            .is_some_and(|tag| tag.len() == NIL_DIGITS && tag.bytes().all(|b| b.is_ascii_digit()))
    }

    /// Collapse every NIL placeholder onto the bare [`NIL_PREFIX`] sentinel.
    pub fn normalized(&self) -> &str {
        if self.is_nil() {
            NIL_PREFIX
        } else {
            &self.0
        }
    }
}

impl fmt::Display for KbId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for KbId {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}
