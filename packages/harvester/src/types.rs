//! Core data types for the harvester.
//!
//! These types represent one RERA project as it moves from the list page
//! through extraction into the output file.

use std::fmt;

use serde::{Serialize, Serializer};

/// Rendered text for a missing field.
pub const NOT_FOUND_TEXT: &str = "Not Found";

/// Rendered text for a field whose value is the `--` placeholder.
pub const PLACEHOLDER_TEXT: &str = "Not Found (Placeholder '--' present)";

/// Outcome of one label lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldResult {
    /// Non-empty, trimmed value.
    Value(String),

    /// Label absent, or no strategy produced an acceptable value.
    NotFound,

    /// Label present, value rendered as the `--` placeholder.
    Placeholder,
}

impl FieldResult {
    /// Get the extracted value, if any.
    #[must_use]
    pub fn as_value(&self) -> Option<&str> {
        match self {
            Self::Value(v) => Some(v),
            Self::NotFound | Self::Placeholder => None,
        }
    }

    /// Whether a value was extracted.
    #[must_use]
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Value(_))
    }
}

impl fmt::Display for FieldResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(v) => f.write_str(v),
            Self::NotFound => f.write_str(NOT_FOUND_TEXT),
            Self::Placeholder => f.write_str(PLACEHOLDER_TEXT),
        }
    }
}

impl Serialize for FieldResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// The five fields extracted from a project's detail page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldName {
    RegistrationNumber,
    ProjectName,
    PromoterName,
    PromoterAddress,
    GstNumber,
}

impl FieldName {
    /// All fields in output order.
    pub const ALL: [FieldName; 5] = [
        Self::RegistrationNumber,
        Self::ProjectName,
        Self::PromoterName,
        Self::PromoterAddress,
        Self::GstNumber,
    ];

    /// Key used in record output.
    #[must_use]
    pub fn key(&self) -> &'static str {
        match self {
            Self::RegistrationNumber => "Rera Regd. No",
            Self::ProjectName => "Project Name",
            Self::PromoterName => "Promoter Name (Company Name)",
            Self::PromoterAddress => "Address of the Promoter (Registered Office Address)",
            Self::GstNumber => "GST No.",
        }
    }

    /// Label text as rendered on the portal.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::RegistrationNumber => "RERA Regd. No.",
            Self::ProjectName => "Project Name",
            Self::PromoterName => "Company Name",
            Self::PromoterAddress => "Registered Office Address",
            Self::GstNumber => "GST No.",
        }
    }

    /// Whether the field lives on the promoter tab.
    #[must_use]
    pub fn is_promoter_field(&self) -> bool {
        matches!(
            self,
            Self::PromoterName | Self::PromoterAddress | Self::GstNumber
        )
    }
}

/// One row of the project list, captured before the detail page is opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectListing {
    /// Zero-based row position in the list table.
    pub index: usize,

    /// Project name as shown in the list.
    pub name: String,

    /// Registration number as shown in the list.
    pub registration_number: String,
}

impl ProjectListing {
    #[must_use]
    pub fn new(index: usize, name: impl Into<String>, registration_number: impl Into<String>) -> Self {
        Self {
            index,
            name: name.into(),
            registration_number: registration_number.into(),
        }
    }
}

/// Extracted fields of one project plus the list passthrough values.
///
/// Every key is always present when serialized; missing values render as
/// sentinels (fields) or `null` (passthrough).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectRecord {
    #[serde(rename = "Rera Regd. No")]
    pub registration_number: FieldResult,

    #[serde(rename = "Project Name")]
    pub project_name: FieldResult,

    #[serde(rename = "Promoter Name (Company Name)")]
    pub promoter_name: FieldResult,

    #[serde(rename = "Address of the Promoter (Registered Office Address)")]
    pub promoter_address: FieldResult,

    #[serde(rename = "GST No.")]
    pub gst_number: FieldResult,

    #[serde(rename = "Original List Name")]
    pub list_name: Option<String>,

    #[serde(rename = "Original List RERA")]
    pub list_registration_number: Option<String>,
}

impl ProjectRecord {
    /// Create a record with every field set to `NotFound`.
    #[must_use]
    pub fn not_found() -> Self {
        Self {
            registration_number: FieldResult::NotFound,
            project_name: FieldResult::NotFound,
            promoter_name: FieldResult::NotFound,
            promoter_address: FieldResult::NotFound,
            gst_number: FieldResult::NotFound,
            list_name: None,
            list_registration_number: None,
        }
    }

    /// Get a field by name.
    #[must_use]
    pub fn get(&self, field: FieldName) -> &FieldResult {
        match field {
            FieldName::RegistrationNumber => &self.registration_number,
            FieldName::ProjectName => &self.project_name,
            FieldName::PromoterName => &self.promoter_name,
            FieldName::PromoterAddress => &self.promoter_address,
            FieldName::GstNumber => &self.gst_number,
        }
    }

    pub(crate) fn set(&mut self, field: FieldName, value: FieldResult) {
        match field {
            FieldName::RegistrationNumber => self.registration_number = value,
            FieldName::ProjectName => self.project_name = value,
            FieldName::PromoterName => self.promoter_name = value,
            FieldName::PromoterAddress => self.promoter_address = value,
            FieldName::GstNumber => self.gst_number = value,
        }
    }

    /// Attach the passthrough values from the list row.
    #[must_use]
    pub fn with_listing(mut self, listing: &ProjectListing) -> Self {
        self.list_name = Some(listing.name.clone());
        self.list_registration_number = Some(listing.registration_number.clone());
        self
    }

    /// Compare list passthrough values with the extracted ones.
    ///
    /// Only fields where both sides carry a value are compared.
    #[must_use]
    pub fn cross_check(&self) -> Vec<Mismatch> {
        let pairs = [
            (FieldName::ProjectName, self.list_name.as_deref()),
            (
                FieldName::RegistrationNumber,
                self.list_registration_number.as_deref(),
            ),
        ];

        pairs
            .into_iter()
            .filter_map(|(field, listed)| {
                let listed = listed?;
                let extracted = self.get(field).as_value()?;
                if comparable(listed) == comparable(extracted) {
                    None
                } else {
                    Some(Mismatch {
                        field,
                        listed: listed.to_string(),
                        extracted: extracted.to_string(),
                    })
                }
            })
            .collect()
    }
}

/// Disagreement between a list value and the extracted detail value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mismatch {
    pub field: FieldName,
    pub listed: String,
    pub extracted: String,
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: list shows '{}' but detail page shows '{}'",
            self.field.key(),
            self.listed,
            self.extracted
        )
    }
}

fn comparable(value: &str) -> String {
    value
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
