//! Variable form state
//!
//! Values keyed by variable name, seeded from each variable's default and
//! changed one field at a time.

use std::collections::BTreeMap;

use crate::api::{Template, TemplateApi, TemplateVariable};

/// Current input for every variable of the selected template
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariableForm {
    values: BTreeMap<String, String>,
}

impl VariableForm {
    /// Form seeded with each variable's default value, or `""`
    #[must_use]
    pub fn seeded(variables: &[TemplateVariable]) -> Self {
        let values = variables
            .iter()
            .map(|variable| {
                (
                    variable.name.clone(),
                    variable.default_value.clone().unwrap_or_default(),
                )
            })
            .collect();
        Self { values }
    }

    /// Single change handler: set one key, keep every other key
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    /// Current value of `name`
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// All values
    #[must_use]
    pub const fn values(&self) -> &BTreeMap<String, String> {
        &self.values
    }

    /// Drop every value
    pub fn clear(&mut self) {
        self.values.clear();
    }
}

/// Fill in the variable list of a template selected without one
///
/// When `variables` is empty the backend extracts placeholder names from
/// the content. At least one name must come back for the list to be
/// replaced; otherwise the template is returned as it was. An extraction
/// failure is logged and treated like an empty answer.
pub async fn with_extracted_variables(api: &dyn TemplateApi, mut template: Template) -> Template {
    if !template.variables.is_empty() {
        return template;
    }

    match api.extract_variables(&template.content).await {
        Ok(names) if !names.is_empty() => {
            tracing::debug!(template_id = %template.id, count = names.len(), "variables extracted on selection");
            template.variables = placeholder_variables(names);
        }
        Ok(_) => {
            tracing::debug!(template_id = %template.id, "extraction found no variables");
        }
        Err(error) => {
            tracing::warn!(template_id = %template.id, %error, "variable extraction failed");
        }
    }
    template
}

/// Placeholder descriptors in extraction order
#[must_use]
pub fn placeholder_variables(names: Vec<String>) -> Vec<TemplateVariable> {
    names
        .into_iter()
        .zip(0..)
        .map(|(name, position)| TemplateVariable::placeholder(name, position))
        .collect()
}

/// How a variable is entered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Single line input
    Text,
    /// Multi-line text area
    TextArea,
    /// Fixed choice list
    Select(&'static [&'static str]),
}

const TONE_CHOICES: &[&str] = &["Formal", "Casual", "Friendly", "Professional", "Humorous"];
const TYPE_CHOICES: &[&str] = &["Article", "Blog post", "Report", "Email", "Social media"];
const LENGTH_CHOICES: &[&str] = &["Short", "Medium", "Long"];

impl FieldKind {
    /// Input kind for a variable name
    #[must_use]
    pub fn for_variable(name: &str) -> Self {
        match name {
            "tone" => Self::Select(TONE_CHOICES),
            "type" => Self::Select(TYPE_CHOICES),
            "length" => Self::Select(LENGTH_CHOICES),
            "content" | "code" => Self::TextArea,
            _ => Self::Text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockTemplateApi;
    use crate::error::ApiError;
    use axum::http::StatusCode;

    fn template(content: &str, variables: Vec<TemplateVariable>) -> Template {
        Template {
            id: "t1".into(),
            user_id: "u1".into(),
            name: "Summary".into(),
            description: String::new(),
            content: content.into(),
            variables,
            category: String::new(),
            is_public: true,
            usage_count: 0,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_seeded_uses_defaults() {
        let mut tone = TemplateVariable::placeholder("tone", 0);
        tone.default_value = Some("Formal".into());
        let topic = TemplateVariable::placeholder("topic", 1);

        let form = VariableForm::seeded(&[tone, topic]);
        assert_eq!(form.get("tone"), Some("Formal"));
        assert_eq!(form.get("topic"), Some(""));
    }

    #[test]
    fn test_set_is_non_destructive() {
        let mut form = VariableForm::default();
        form.set("a", "1");
        form.set("b", "2");
        form.set("a", "9");

        let expected = BTreeMap::from([
            ("a".to_string(), "9".to_string()),
            ("b".to_string(), "2".to_string()),
        ]);
        assert_eq!(form.values(), &expected);
    }

    #[tokio::test]
    async fn test_selection_extracts_missing_variables() {
        let mut api = MockTemplateApi::new();
        api.expect_extract_variables()
            .withf(|content| content.contains("{{topic}}"))
            .times(1)
            .returning(|_| Ok(vec!["topic".to_string()]));

        let selected = with_extracted_variables(&api, template("Summarize {{topic}}", vec![])).await;
        let form = VariableForm::seeded(&selected.variables);

        assert_eq!(selected.variables.len(), 1);
        assert_eq!(selected.variables[0].display_name, "topic");
        assert!(selected.variables[0].required);
        assert_eq!(
            form.values(),
            &BTreeMap::from([("topic".to_string(), String::new())])
        );
    }

    #[tokio::test]
    async fn test_selection_keeps_existing_variables() {
        let mut api = MockTemplateApi::new();
        api.expect_extract_variables().never();

        let existing = vec![TemplateVariable::placeholder("a", 0)];
        let selected = with_extracted_variables(&api, template("{{a}}", existing.clone())).await;
        assert_eq!(selected.variables, existing);
    }

    #[tokio::test]
    async fn test_selection_with_no_names_leaves_list_empty() {
        let mut api = MockTemplateApi::new();
        api.expect_extract_variables().returning(|_| Ok(vec![]));

        let selected = with_extracted_variables(&api, template("plain", vec![])).await;
        assert!(selected.variables.is_empty());
    }

    #[tokio::test]
    async fn test_selection_survives_extraction_failure() {
        let mut api = MockTemplateApi::new();
        api.expect_extract_variables().returning(|_| {
            Err(ApiError::Status {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: None,
            })
        });

        let selected = with_extracted_variables(&api, template("{{x}}", vec![])).await;
        assert!(selected.variables.is_empty());
        assert_eq!(selected.content, "{{x}}");
    }

    #[test]
    fn test_field_kinds() {
        assert!(matches!(FieldKind::for_variable("tone"), FieldKind::Select(c) if c.len() == 5));
        assert!(matches!(FieldKind::for_variable("length"), FieldKind::Select(_)));
        assert_eq!(FieldKind::for_variable("code"), FieldKind::TextArea);
        assert_eq!(FieldKind::for_variable("topic"), FieldKind::Text);
    }
}
