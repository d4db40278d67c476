//! Highlight Colorizer
//!
//! Every position gets the base colour unless its identity matches one of the
//! distinguished entities. Matching covers all positions, so a country that
//! occupies several rows after a melt is coloured at every one of them.

use serde::{Deserialize, Serialize};

/// A distinguished identity bound to its fixed colour
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Highlight {
    pub code: String,
    pub color: String,
}

impl Highlight {
    pub fn new(code: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            color: color.into(),
        }
    }
}

/// One colour per identity, in the same order
pub fn colorize<'a, I>(identities: I, highlights: &[Highlight], base_color: &str) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    identities
        .into_iter()
        .map(|identity| {
            highlights
                .iter()
                .find(|h| h.code == identity)
                .map_or(base_color, |h| h.color.as_str())
                .to_string()
        })
        .collect()
}
