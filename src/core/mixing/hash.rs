//! Content address of a composition.
//!
//! The canonical form sorts `(liquid_id, percentage)` pairs by id, rounds each
//! percentage to the nearest whole number and renders them as `id:pct` joined
//! by `;`. The SHA-256 digest of that string, lowercase hex, is the key shared
//! by suggestions, user-built mixes and the reputation ledger.

use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

use super::types::Composition;

const HASH_HEX_LEN: usize = 64;
const SHORT_LEN: usize = 12;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CompositionHash(String);

impl CompositionHash {
    pub fn of(composition: &Composition) -> Self {
        let digest = Sha256::digest(canonical_form(composition).as_bytes());
        Self(hex::encode(digest))
    }

    /// Accepts a client-supplied hash; case is normalized to lowercase.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let trimmed = raw.trim();
        if trimmed.len() != HASH_HEX_LEN || !trimmed.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ValidationError::InvalidHash(raw.to_string()));
        }
        Ok(Self(trimmed.to_ascii_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Display-only prefix; never use it as a lookup key.
    pub fn short(&self) -> &str {
        &self.0[..SHORT_LEN]
    }
}

impl fmt::Display for CompositionHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for CompositionHash {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<CompositionHash> for String {
    fn from(value: CompositionHash) -> Self {
        value.0
    }
}

impl std::str::FromStr for CompositionHash {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Canonical text hashed by [`CompositionHash::of`].
pub fn canonical_form(composition: &Composition) -> String {
    let mut pairs: Vec<(String, i64)> = composition
        .iter()
        .map(|c| (escape_id(&c.liquid_id), rounded_percentage(c.percentage)))
        .collect();
    pairs.sort();
    pairs
        .iter()
        .map(|(id, pct)| format!("{id}:{pct}"))
        .collect::<Vec<_>>()
        .join(";")
}

#[allow(clippy::cast_possible_truncation)]
fn rounded_percentage(value: f64) -> i64 {
    if value.is_finite() {
        value.round().clamp(-1_000.0, 1_000.0) as i64
    } else {
        0
    }
}

// Separators inside ids must not alias a different composition.
fn escape_id(id: &str) -> String {
    let mut out = String::with_capacity(id.len());
    for ch in id.chars() {
        if matches!(ch, '\\' | ':' | ';') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}
