use crate::model::validate::{FieldKind, Parsed, parse};
use core::fmt;
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};

/// A numeric field as the host supplied it: raw text still to be validated,
/// or a number the host already parsed.
///
/// Deserialising never fails on a scalar: numbers outside `u32` and any
/// other scalar are kept as text so validation reports them as malformed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum Entry {
    Value(u32),
    Text(String),
}

impl Entry {
    pub const fn blank() -> Self {
        Entry::Text(String::new())
    }

    pub fn parsed(&self, kind: FieldKind) -> Parsed {
        match self {
            Entry::Value(value) => Parsed::Valid(*value),
            Entry::Text(text) => parse(text, kind),
        }
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, Entry::Text(text) if text.trim().is_empty())
    }

    /// Replaces valid text with its number; anything else is left untouched.
    pub fn promote(&mut self, kind: FieldKind) {
        if let Parsed::Valid(value) = self.parsed(kind) {
            *self = Entry::Value(value);
        }
    }
}

impl Default for Entry {
    fn default() -> Self {
        Self::blank()
    }
}

impl From<u32> for Entry {
    fn from(value: u32) -> Self {
        Entry::Value(value)
    }
}

impl From<&str> for Entry {
    fn from(value: &str) -> Self {
        Entry::Text(value.to_string())
    }
}

impl From<String> for Entry {
    fn from(value: String) -> Self {
        Entry::Text(value)
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entry::Value(value) => write!(f, "{value}"),
            Entry::Text(text) => f.write_str(text),
        }
    }
}

impl<'de> Deserialize<'de> for Entry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(EntryVisitor)
    }
}

struct EntryVisitor;

impl<'de> Visitor<'de> for EntryVisitor {
    type Value = Entry;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a whole number or text")
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Entry, E> {
        Ok(u32::try_from(value).map_or_else(|_| Entry::Text(value.to_string()), Entry::Value))
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Entry, E> {
        Ok(u32::try_from(value).map_or_else(|_| Entry::Text(value.to_string()), Entry::Value))
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<Entry, E> {
        // Debug keeps the fraction, so `1.0` stays malformed instead of becoming 1.
        Ok(Entry::Text(format!("{value:?}")))
    }

    fn visit_bool<E: de::Error>(self, value: bool) -> Result<Entry, E> {
        Ok(Entry::Text(value.to_string()))
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Entry, E> {
        Ok(Entry::Text(value.to_string()))
    }

    fn visit_string<E: de::Error>(self, value: String) -> Result<Entry, E> {
        Ok(Entry::Text(value))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Entry, E> {
        Ok(Entry::blank())
    }
}
