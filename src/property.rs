//! Google Analytics property references and their canonical resource names.

use std::fmt;
use std::str::FromStr;

use rmcp::schemars::{self, JsonSchema};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Number;

use crate::error::InvalidReference;

const PROPERTIES_COLLECTION: &str = "properties";

/// A property reference as supplied by a tool caller: a bare number,
/// a numeric string, or a `properties/<id>` resource name.
///
/// Any JSON number is accepted here; negatives and fractions are
/// rejected by the normalizer, not by the decoder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum PropertyRef {
    Number(Number),
    Text(String),
}

impl PropertyRef {
    /// Resolve this reference to its canonical resource name.
    pub fn normalize(&self) -> Result<PropertyName, InvalidReference> {
        match self {
            PropertyRef::Number(n) => normalize_text(&n.to_string()),
            PropertyRef::Text(s) => normalize_text(s),
        }
    }
}

impl From<i64> for PropertyRef {
    fn from(value: i64) -> Self {
        PropertyRef::Number(value.into())
    }
}

impl From<u64> for PropertyRef {
    fn from(value: u64) -> Self {
        PropertyRef::Number(value.into())
    }
}

impl From<&str> for PropertyRef {
    fn from(value: &str) -> Self {
        PropertyRef::Text(value.to_string())
    }
}

/// Canonical `properties/<digits>` resource name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PropertyName(String);

impl PropertyName {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The numeric id after the `properties/` prefix.
    pub fn id(&self) -> &str {
        &self.0[PROPERTIES_COLLECTION.len() + 1..]
    }

    /// Resource name of the property's metadata singleton.
    pub fn metadata_name(&self) -> String {
        format!("{}/metadata", self.0)
    }
}

impl fmt::Display for PropertyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for PropertyName {
    type Err = InvalidReference;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        normalize_text(s)
    }
}

impl Serialize for PropertyName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for PropertyName {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        PropertyRef::deserialize(deserializer)?
            .normalize()
            .map_err(de::Error::custom)
    }
}

/// Normalize an optional property reference. `None` is rejected.
pub fn normalize(input: Option<&PropertyRef>) -> Result<PropertyName, InvalidReference> {
    input.ok_or(InvalidReference::Missing)?.normalize()
}

fn normalize_text(raw: &str) -> Result<PropertyName, InvalidReference> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(InvalidReference::Missing);
    }

    if !trimmed.contains('/') {
        if !is_digits(trimmed) {
            return Err(InvalidReference::NonNumericId(trimmed.to_string()));
        }
        return Ok(PropertyName(format!("{}/{}", PROPERTIES_COLLECTION, trimmed)));
    }

    let components: Vec<&str> = trimmed.split('/').collect();
    if components.len() != 2 {
        return Err(InvalidReference::ComponentCount(trimmed.to_string()));
    }
    if components[0] != PROPERTIES_COLLECTION {
        return Err(InvalidReference::WrongPrefix(trimmed.to_string()));
    }
    if !is_digits(components[1]) {
        return Err(InvalidReference::NonNumericQualifiedId(trimmed.to_string()));
    }

    Ok(PropertyName(trimmed.to_string()))
}

/// Non-empty and ASCII decimal digits only.
fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}
