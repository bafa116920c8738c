//! Record types flowing through the import pipeline

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Output column order of the seed CSV
pub const HEADERS: [&str; 12] = [
    "code",
    "system",
    "manufacturer",
    "title_en",
    "description_en",
    "causes_en",
    "fixes_en",
    "title_tr",
    "description_tr",
    "causes_tr",
    "fixes_tr",
    "license",
];

/// A single loosely-typed record as read from a vendor file
///
/// Lookups never fail: a field that is absent reads as an empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VendorRecord {
    /// Field values keyed by the vendor's column/key names
    pub fields: BTreeMap<String, String>,
    /// CSV cells beyond the header width, in column order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra: Vec<String>,
}

impl VendorRecord {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field value, replacing any previous value
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(name.into(), value.into());
    }

    /// Get a field value if the vendor supplied it
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Get a field value, or an empty string when the field is absent
    pub fn get_or_empty(&self, name: &str) -> &str {
        self.get(name).unwrap_or("")
    }

    /// Number of named fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if the record carries no named fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Build a record from a CSV header row and one data row.
    ///
    /// Short rows leave the trailing columns absent; long rows push the
    /// surplus cells into `extra`.
    pub fn from_csv(headers: &csv::StringRecord, row: &csv::StringRecord) -> Self {
        let mut record = Self::new();
        for (i, value) in row.iter().enumerate() {
            match headers.get(i) {
                Some(name) => record.insert(name, value),
                None => record.extra.push(value.to_string()),
            }
        }
        record
    }

    /// Build a record from a JSON object. `null` values are treated as absent.
    pub fn from_json_object(object: &serde_json::Map<String, serde_json::Value>) -> Self {
        let mut record = Self::new();
        for (name, value) in object {
            if let Some(text) = json_value_text(value) {
                record.insert(name.as_str(), text);
            }
        }
        record
    }
}

fn json_value_text(value: &serde_json::Value) -> Option<String> {
    use serde_json::Value;

    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Array(_) | Value::Object(_) => Some(value.to_string()),
    }
}

/// Language of the vendor-provided descriptions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// English
    #[default]
    En,
    /// Turkish
    Tr,
}

impl Language {
    /// Short tag used on the command line and in plan files
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Tr => "tr",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Language::En),
            "tr" => Ok(Language::Tr),
            other => Err(format!("unknown language '{}', expected 'en' or 'tr'", other)),
        }
    }
}

/// Vehicle system a DTC belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SystemCategory {
    Powertrain,
    Body,
    Chassis,
    Network,
}

impl SystemCategory {
    /// Map the leading letter of a code; unknown letters fall back to Powertrain
    pub fn from_prefix(prefix: char) -> Self {
        match prefix.to_ascii_uppercase() {
            'B' => SystemCategory::Body,
            'C' => SystemCategory::Chassis,
            'U' => SystemCategory::Network,
            _ => SystemCategory::Powertrain,
        }
    }

    /// Name written to the `system` column
    pub fn as_str(&self) -> &'static str {
        match self {
            SystemCategory::Powertrain => "Powertrain",
            SystemCategory::Body => "Body",
            SystemCategory::Chassis => "Chassis",
            SystemCategory::Network => "Network",
        }
    }
}

impl fmt::Display for SystemCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A normalized row of the seed CSV
///
/// Field order matches [`HEADERS`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalRow {
    pub code: String,
    pub system: String,
    pub manufacturer: String,
    pub title_en: String,
    pub description_en: String,
    pub causes_en: String,
    pub fixes_en: String,
    pub title_tr: String,
    pub description_tr: String,
    pub causes_tr: String,
    pub fixes_tr: String,
    pub license: String,
}

impl CanonicalRow {
    /// Column values in header order
    pub fn values(&self) -> [&str; 12] {
        [
            self.code.as_str(),
            self.system.as_str(),
            self.manufacturer.as_str(),
            self.title_en.as_str(),
            self.description_en.as_str(),
            self.causes_en.as_str(),
            self.fixes_en.as_str(),
            self.title_tr.as_str(),
            self.description_tr.as_str(),
            self.causes_tr.as_str(),
            self.fixes_tr.as_str(),
            self.license.as_str(),
        ]
    }

    /// Description in whichever language the row was populated with
    pub fn description(&self) -> &str {
        if self.description_en.is_empty() {
            &self.description_tr
        } else {
            &self.description_en
        }
    }
}
