//! Template editor draft
//!
//! The editor owns an independent copy of a template's fields until it is
//! saved. Saving runs three checks in order, each of which aborts before any
//! network call:
//!
//! 1. name and content must be non-blank
//! 2. variable drafts are sanitized (blank names dropped, names and labels
//!    trimmed, empty labels defaulted to the name, positions renumbered)
//! 3. every remaining name must be an identifier
//!
//! Only then is the backend asked to create or update the template.

use std::collections::{BTreeMap, HashMap};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::api::{Template, TemplateApi, TemplatePayload, TemplateVariable};
use crate::error::EditorError;

/// Message shown when extraction fails
pub const EXTRACT_FAILED_MESSAGE: &str = "Variable extraction failed, please check the template content";

/// Message shown when the backend rejects a save
pub const SAVE_FAILED_MESSAGE: &str = "Save failed, please retry";

/// Message shown when the backend rejects a delete
pub const DELETE_FAILED_MESSAGE: &str = "Delete failed, please retry";

static VARIABLE_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z_][a-zA-Z0-9_]*$").expect("Invalid regex"));

/// Whether `name` can be used as a template variable name
#[must_use]
pub fn is_valid_variable_name(name: &str) -> bool {
    VARIABLE_NAME.is_match(name)
}

/// One editable row of the variable schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableDraft {
    /// Backend id of a persisted variable
    pub id: Option<String>,
    /// Placeholder name as typed
    pub name: String,
    /// Label as typed
    pub display_name: String,
    /// Help text
    pub description: String,
    /// Default value
    pub default_value: String,
    /// Required flag
    pub required: bool,
    /// Position
    pub sort_order: i32,
}

impl Default for VariableDraft {
    fn default() -> Self {
        Self {
            id: None,
            name: String::new(),
            display_name: String::new(),
            description: String::new(),
            default_value: String::new(),
            required: true,
            sort_order: 0,
        }
    }
}

impl From<&TemplateVariable> for VariableDraft {
    fn from(variable: &TemplateVariable) -> Self {
        Self {
            id: variable.id.clone(),
            name: variable.name.clone(),
            display_name: variable.display_name.clone(),
            description: variable.description.clone().unwrap_or_default(),
            default_value: variable.default_value.clone().unwrap_or_default(),
            required: variable.required,
            sort_order: variable.sort_order,
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

/// Partial update of one variable row
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariablePatch {
    /// New name
    pub name: Option<String>,
    /// New label
    pub display_name: Option<String>,
    /// New help text
    pub description: Option<String>,
    /// New default value
    pub default_value: Option<String>,
    /// New required flag
    pub required: Option<bool>,
}

impl VariablePatch {
    fn apply_to(self, draft: &mut VariableDraft) {
        if let Some(name) = self.name {
            draft.name = name;
        }
        if let Some(display_name) = self.display_name {
            draft.display_name = display_name;
        }
        if let Some(description) = self.description {
            draft.description = description;
        }
        if let Some(default_value) = self.default_value {
            draft.default_value = default_value;
        }
        if let Some(required) = self.required {
            draft.required = required;
        }
    }
}

/// Editor form as submitted by the browser
///
/// Scalar fields use their own names. Variable rows use
/// `variables.{index}.{field}`. Checkboxes are preceded by a hidden
/// `false` input with the same name, so the last value for a key wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditorFields {
    /// Template name
    pub name: Option<String>,
    /// Description
    pub description: Option<String>,
    /// Category
    pub category: Option<String>,
    /// Content
    pub content: Option<String>,
    /// Visibility
    pub is_public: Option<bool>,
    /// Variable rows by position
    pub rows: BTreeMap<usize, VariablePatch>,
}

impl EditorFields {
    /// Parse urlencoded pairs, ignoring unknown keys
    #[must_use]
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut fields = Self::default();
        for (key, value) in pairs {
            match key.as_str() {
                "name" => fields.name = Some(value),
                "description" => fields.description = Some(value),
                "category" => fields.category = Some(value),
                "content" => fields.content = Some(value),
                "is_public" => fields.is_public = Some(value == "true"),
                other => {
                    let Some((index, field)) = other
                        .strip_prefix("variables.")
                        .and_then(|rest| rest.split_once('.'))
                    else {
                        continue;
                    };
                    let Ok(index) = index.parse::<usize>() else {
                        continue;
                    };
                    let row = fields.rows.entry(index).or_default();
                    match field {
                        "name" => row.name = Some(value),
                        "display_name" => row.display_name = Some(value),
                        "description" => row.description = Some(value),
                        "default_value" => row.default_value = Some(value),
                        "required" => row.required = Some(value == "true"),
                        _ => {}
                    }
                }
            }
        }
        fields
    }
}

/// Draft of a template being created or edited
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateEditor {
    existing: Option<Template>,
    /// Name as typed
    pub name: String,
    /// Description as typed
    pub description: String,
    /// Category as typed
    pub category: String,
    /// Content as typed
    pub content: String,
    /// Visibility
    pub is_public: bool,
    variables: Vec<VariableDraft>,
}

impl TemplateEditor {
    /// Empty draft for creating a template
    #[must_use]
    pub fn create() -> Self {
        Self::default()
    }

    /// Draft initialized from an existing template
    #[must_use]
    pub fn edit(template: Template) -> Self {
        Self {
            name: template.name.clone(),
            description: template.description.clone(),
            category: template.category.clone(),
            content: template.content.clone(),
            is_public: template.is_public,
            variables: template.variables.iter().map(VariableDraft::from).collect(),
            existing: Some(template),
        }
    }

    /// Template being edited, `None` when creating
    #[must_use]
    pub const fn existing(&self) -> Option<&Template> {
        self.existing.as_ref()
    }

    /// Backend id of the template being edited
    #[must_use]
    pub fn template_id(&self) -> Option<&str> {
        self.existing.as_ref().map(|template| template.id.as_str())
    }

    /// Variable rows in display order
    #[must_use]
    pub fn variables(&self) -> &[VariableDraft] {
        &self.variables
    }

    /// Append a blank row
    pub fn add_variable(&mut self) {
        self.variables.push(VariableDraft::default());
    }

    /// Remove the row at `index`, returning whether one was removed
    pub fn remove_variable(&mut self, index: usize) -> bool {
        if index < self.variables.len() {
            self.variables.remove(index);
            true
        } else {
            false
        }
    }

    /// Patch the row at `index`, returning whether it exists
    pub fn patch_variable(&mut self, index: usize, patch: VariablePatch) -> bool {
        self.variables.get_mut(index).is_some_and(|draft| {
            patch.apply_to(draft);
            true
        })
    }

    /// Copy submitted form values into the draft
    pub fn apply_fields(&mut self, fields: EditorFields) {
        if let Some(name) = fields.name {
            self.name = name;
        }
        if let Some(description) = fields.description {
            self.description = description;
        }
        if let Some(category) = fields.category {
            self.category = category;
        }
        if let Some(content) = fields.content {
            self.content = content;
        }
        if let Some(is_public) = fields.is_public {
            self.is_public = is_public;
        }
        for (index, patch) in fields.rows {
            self.patch_variable(index, patch);
        }
    }

    /// Content to send for extraction
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::EmptyContent`] when the content is blank.
    pub fn extraction_content(&self) -> Result<&str, EditorError> {
        if self.content.trim().is_empty() {
            Err(EditorError::EmptyContent)
        } else {
            Ok(&self.content)
        }
    }

    /// Replace the rows with extracted names
    ///
    /// A name that already has a row keeps its label, description, default
    /// and required flag. Positions follow extraction order.
    pub fn apply_extracted(&mut self, names: Vec<String>) {
        let mut current: HashMap<String, VariableDraft> = self
            .variables
            .drain(..)
            .map(|draft| (draft.name.clone(), draft))
            .collect();

        self.variables = names
            .into_iter()
            .zip(0..)
            .map(|(name, sort_order)| match current.remove(&name) {
                Some(existing) => VariableDraft {
                    id: None,
                    display_name: if existing.display_name.is_empty() {
                        name.clone()
                    } else {
                        existing.display_name
                    },
                    name,
                    description: existing.description,
                    default_value: existing.default_value,
                    required: existing.required,
                    sort_order,
                },
                None => VariableDraft {
                    display_name: name.clone(),
                    name,
                    sort_order,
                    ..VariableDraft::default()
                },
            })
            .collect();
    }

    /// Rows cleaned up for saving
    #[must_use]
    pub fn sanitized_variables(&self) -> Vec<TemplateVariable> {
        self.variables
            .iter()
            .filter(|draft| !draft.name.trim().is_empty())
            .zip(0..)
            .map(|(draft, sort_order)| {
                let name = draft.name.trim().to_string();
                let display_name = match draft.display_name.trim() {
                    "" => name.clone(),
                    label => label.to_string(),
                };
                TemplateVariable {
                    id: draft.id.clone(),
                    name,
                    display_name,
                    description: non_empty(&draft.description),
                    default_value: non_empty(&draft.default_value),
                    required: draft.required,
                    sort_order,
                }
            })
            .collect()
    }

    /// Validate the draft and build the request body
    ///
    /// # Errors
    ///
    /// - [`EditorError::MissingRequiredFields`] when name or content is blank
    /// - [`EditorError::InvalidVariableNames`] listing every non-identifier name
    pub fn prepare_save(&self) -> Result<TemplatePayload, EditorError> {
        let name = self.name.trim();
        if name.is_empty() || self.content.trim().is_empty() {
            return Err(EditorError::MissingRequiredFields);
        }

        let variables = self.sanitized_variables();
        let invalid: Vec<String> = variables
            .iter()
            .filter(|variable| !is_valid_variable_name(&variable.name))
            .map(|variable| variable.name.clone())
            .collect();
        if !invalid.is_empty() {
            return Err(EditorError::InvalidVariableNames(invalid));
        }

        Ok(TemplatePayload {
            name: name.to_string(),
            description: Some(self.description.trim().to_string()),
            content: self.content.clone(),
            variables: Some(variables),
            category: Some(self.category.trim().to_string()),
            is_public: Some(self.is_public),
        })
    }

    /// Validate, then create or update the template
    ///
    /// # Errors
    ///
    /// Validation errors from [`Self::prepare_save`], or
    /// [`EditorError::Api`] when the backend call fails.
    pub async fn save(&self, api: &dyn TemplateApi) -> Result<Template, EditorError> {
        let payload = self.prepare_save()?;
        let saved = match self.template_id() {
            Some(id) => api.update_template(id, &payload).await?,
            None => api.create_template(&payload).await?,
        };
        tracing::info!(
            template_id = %saved.id,
            created = self.existing.is_none(),
            variables = saved.variables.len(),
            "template saved"
        );
        Ok(saved)
    }
}
