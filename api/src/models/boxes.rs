use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use thiserror::Error;

/// Grid size a fresh account (or a reset) starts with.
pub const DEFAULT_TOTAL_SQUARES: i64 = 100;

/// The set of boxes a user has selected, kept sorted and free of duplicates.
///
/// Stored as a plain JSON array. Older store files hold the comma-joined form
/// (`"1,4,9"`), which still deserializes through [`decode`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "StoredSelection", into = "Vec<i64>")]
pub struct BoxSelection(BTreeSet<i64>);

impl BoxSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = i64> + '_ {
        self.0.iter().copied()
    }

    pub fn to_vec(&self) -> Vec<i64> {
        self.iter().collect()
    }
}

impl FromIterator<i64> for BoxSelection {
    fn from_iter<I: IntoIterator<Item = i64>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl From<BoxSelection> for Vec<i64> {
    fn from(selection: BoxSelection) -> Self {
        selection.0.into_iter().collect()
    }
}

impl fmt::Display for BoxSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&encode(self))
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid box index '{0}'")]
pub struct CodecError(String);

/// Joins the selection into `"1,4,9"`. An empty selection is the empty string.
pub fn encode(selection: &BoxSelection) -> String {
    selection
        .iter()
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

/// Parses the comma-joined form back into a selection.
///
/// Whitespace and empty segments (`"1,,2"`, trailing commas) are ignored.
/// Anything that isn't an integer is an error. Negative indices are kept as-is.
pub fn decode(raw: &str) -> Result<BoxSelection, CodecError> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| part.parse::<i64>().map_err(|_| CodecError(part.to_string())))
        .collect()
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StoredSelection {
    Native(Vec<i64>),
    Legacy(String),
}

impl TryFrom<StoredSelection> for BoxSelection {
    type Error = CodecError;

    fn try_from(stored: StoredSelection) -> Result<Self, Self::Error> {
        match stored {
            StoredSelection::Native(indices) => Ok(indices.into_iter().collect()),
            StoredSelection::Legacy(raw) => decode(&raw),
        }
    }
}
