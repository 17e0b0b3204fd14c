//! Wire types exchanged with the template backend

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::normalize::normalize_variables;

/// A prompt template as held by the UI
///
/// `variables` is always a materialized sequence. Deserialization goes
/// through [`RawTemplate`] so legacy string-encoded payloads are coerced
/// before anything else sees them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawTemplate")]
pub struct Template {
    /// Backend identifier
    pub id: String,
    /// Owner reference
    pub user_id: String,
    /// Human readable name
    pub name: String,
    /// Free text description
    pub description: String,
    /// Template body containing `{{placeholder}}` markers
    pub content: String,
    /// Ordered variable schema
    pub variables: Vec<TemplateVariable>,
    /// Category label
    pub category: String,
    /// Visibility flag
    pub is_public: bool,
    /// Number of generations run against this template
    pub usage_count: u64,
    /// Creation timestamp
    pub created_at: Option<DateTime<Utc>>,
    /// Last update timestamp
    pub updated_at: Option<DateTime<Utc>>,
}

/// Template exactly as it arrives on the wire
///
/// `variables` may be an array, a JSON-encoded string, `null`, or missing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawTemplate {
    /// Backend identifier
    pub id: String,
    /// Owner reference
    pub user_id: String,
    /// Human readable name
    pub name: String,
    /// Free text description
    pub description: String,
    /// Template body
    pub content: String,
    /// Variables in whatever shape the backend sent
    pub variables: Option<serde_json::Value>,
    /// Category label
    pub category: String,
    /// Visibility flag
    pub is_public: bool,
    /// Usage counter
    pub usage_count: u64,
    /// Creation timestamp
    pub created_at: Option<DateTime<Utc>>,
    /// Last update timestamp
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<RawTemplate> for Template {
    fn from(raw: RawTemplate) -> Self {
        Self {
            id: raw.id,
            user_id: raw.user_id,
            name: raw.name,
            description: raw.description,
            content: raw.content,
            variables: normalize_variables(raw.variables),
            category: raw.category,
            is_public: raw.is_public,
            usage_count: raw.usage_count,
            created_at: raw.created_at,
            updated_at: raw.updated_at,
        }
    }
}

/// One variable of a template's schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateVariable {
    /// Backend identifier, absent for variables that were never persisted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Placeholder name, unique within a template
    #[serde(default)]
    pub name: String,
    /// Label shown next to the input
    #[serde(default)]
    pub display_name: String,
    /// Optional help text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Optional value used to seed the form
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    /// Whether the variable must be filled in
    #[serde(default = "required_by_default")]
    pub required: bool,
    /// Display position
    #[serde(default)]
    pub sort_order: i32,
}

const fn required_by_default() -> bool {
    true
}

impl TemplateVariable {
    /// Placeholder descriptor for a name discovered by extraction
    #[must_use]
    pub fn placeholder(name: impl Into<String>, sort_order: i32) -> Self {
        let name = name.into();
        Self {
            id: None,
            display_name: name.clone(),
            name,
            description: None,
            default_value: None,
            required: true,
            sort_order,
        }
    }

    /// Label to show, falling back to the name
    #[must_use]
    pub fn label(&self) -> &str {
        if self.display_name.is_empty() {
            &self.name
        } else {
            &self.display_name
        }
    }
}

/// One page of a paginated listing
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Paginated<T> {
    /// Items on this page, `null` is read as empty
    #[serde(default, deserialize_with = "null_as_empty")]
    pub data: Vec<T>,
    /// 1-based page number
    #[serde(default)]
    pub page: u32,
    /// Requested page size
    #[serde(default)]
    pub page_size: u32,
    /// Total number of items reported by the backend
    #[serde(default)]
    pub total: u64,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Listing parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateQuery {
    /// Restrict to one category
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// 1-based page number
    pub page: u32,
    /// Items per page
    pub page_size: u32,
}

impl Default for TemplateQuery {
    fn default() -> Self {
        Self {
            category: None,
            page: 1,
            page_size: 20,
        }
    }
}

impl TemplateQuery {
    /// First page of `page_size` items, optionally scoped to a category
    #[must_use]
    pub const fn first_page(category: Option<String>, page_size: u32) -> Self {
        Self {
            category,
            page: 1,
            page_size,
        }
    }
}

/// Body of create and update calls
///
/// Absent optional fields are not serialized, which makes the same type
/// usable as a partial update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TemplatePayload {
    /// Template name
    pub name: String,
    /// Description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Template body
    pub content: String,
    /// Variable schema
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variables: Option<Vec<TemplateVariable>>,
    /// Category label
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Visibility flag
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_public: Option<bool>,
}

/// Prompt generation request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerateRequest {
    /// Template to render
    pub template_id: String,
    /// Variable name to value
    pub variables: BTreeMap<String, String>,
}

/// Prompt generation response
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GenerateResponse {
    /// Final prompt text
    pub result: String,
    /// Template content the result was rendered from
    pub prompt: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct ExtractRequest<'a> {
    pub content: &'a str,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct ExtractResponse {
    pub variables: Option<Vec<String>>,
}

/// Backend health probe answer
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BackendHealth {
    /// Reported status, `ok` when healthy
    pub status: String,
    /// Reported service name
    pub service: String,
}
