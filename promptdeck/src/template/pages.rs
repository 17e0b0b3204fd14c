//! Page and fragment templates
//!
//! Every template gets plain precomputed fields; the conversion from view
//! state happens here rather than in template expressions.

use std::time::Instant;

use askama::Template;
use uuid::Uuid;

use crate::api::{Template as PromptTemplate, TemplateVariable};
use crate::views::{
    FieldKind, GenerateView, Screen, SelectorView, Selection, TemplateEditor, TemplateSelector,
};

/// Full page shell around the current main panel
#[derive(Debug, Template)]
#[template(path = "index.html")]
pub struct IndexPage {
    /// Page id
    pub view_id: Uuid,
    /// Rendered main panel
    pub main: String,
}

impl IndexPage {
    /// Page for `view`
    ///
    /// # Errors
    ///
    /// Returns an error if the main panel fails to render.
    pub fn new(view_id: Uuid, view: &GenerateView, now: Instant) -> askama::Result<Self> {
        Ok(Self {
            view_id,
            main: render_main(view_id, view, now)?,
        })
    }
}

/// Whichever panel the view's mode calls for, swapped into `#main`
#[derive(Debug, Template)]
#[template(source = "{{ html|safe }}", ext = "html")]
pub struct MainPanel {
    html: String,
}

impl MainPanel {
    /// Panel for `view`
    ///
    /// # Errors
    ///
    /// Returns an error if the panel fails to render.
    pub fn new(view_id: Uuid, view: &GenerateView, now: Instant) -> askama::Result<Self> {
        Ok(Self {
            html: render_main(view_id, view, now)?,
        })
    }
}

/// Render whichever panel the view's mode calls for
///
/// # Errors
///
/// Returns an error if a template fails to render.
pub fn render_main(view_id: Uuid, view: &GenerateView, now: Instant) -> askama::Result<String> {
    match view.screen() {
        Screen::Browsing(selector) => BrowsingPanel::new(view_id, selector)?.render(),
        Screen::Configuring(selection) => ConfiguringPanel::new(view_id, selection, now)?.render(),
        Screen::Editing(editor) => EditorPanel::new(view_id, editor).render(),
    }
}

/// Catalog screen: header, filters and the list area
#[derive(Debug, Template)]
#[template(path = "browsing.html")]
pub struct BrowsingPanel {
    view_id: Uuid,
    query: String,
    category: String,
    list: String,
}

impl BrowsingPanel {
    fn new(view_id: Uuid, selector: &TemplateSelector) -> askama::Result<Self> {
        Ok(Self {
            view_id,
            query: selector.query().to_string(),
            category: selector.category().unwrap_or_default().to_string(),
            list: TemplateList::new(view_id, selector).render()?,
        })
    }
}

/// One catalog card
#[derive(Debug, Clone)]
pub struct CardView {
    id: String,
    name: String,
    category: String,
    description: String,
    usage_count: u64,
    is_public: bool,
}

impl From<&PromptTemplate> for CardView {
    fn from(template: &PromptTemplate) -> Self {
        Self {
            id: template.id.clone(),
            name: template.name.clone(),
            category: if template.category.is_empty() {
                "Uncategorized".to_string()
            } else {
                template.category.clone()
            },
            description: template.description.clone(),
            usage_count: template.usage_count,
            is_public: template.is_public,
        }
    }
}

/// Catalog list area in exactly one of its states
#[derive(Debug, Template)]
#[template(path = "template_list.html")]
pub struct TemplateList {
    view_id: Uuid,
    loading: bool,
    has_error: bool,
    error: String,
    has_empty_message: bool,
    empty_message: String,
    cards: Vec<CardView>,
}

impl TemplateList {
    /// List fragment for `selector`
    #[must_use]
    pub fn new(view_id: Uuid, selector: &TemplateSelector) -> Self {
        let mut list = Self {
            view_id,
            loading: false,
            has_error: false,
            error: String::new(),
            has_empty_message: false,
            empty_message: String::new(),
            cards: Vec::new(),
        };
        match selector.view() {
            SelectorView::Loading => list.loading = true,
            SelectorView::Error(message) => {
                list.has_error = true;
                list.error = message.to_string();
            }
            SelectorView::Empty { filtered } => {
                list.has_empty_message = true;
                list.empty_message = if filtered {
                    "No matching templates".to_string()
                } else {
                    "No templates yet".to_string()
                };
            }
            SelectorView::Cards(templates) => {
                list.cards = templates.into_iter().map(CardView::from).collect();
            }
        }
        list
    }
}

/// One choice of a select input
#[derive(Debug, Clone)]
pub struct OptionView {
    value: String,
    selected: bool,
}

/// One variable input
#[derive(Debug, Clone)]
pub struct FieldView {
    name: String,
    label: String,
    description: String,
    required: bool,
    value: String,
    placeholder: String,
    is_select: bool,
    is_textarea: bool,
    options: Vec<OptionView>,
}

impl FieldView {
    fn new(variable: &TemplateVariable, value: &str) -> Self {
        let label = variable.label().to_string();
        let default_value = variable.default_value.clone().unwrap_or_default();
        let placeholder = if default_value.is_empty() {
            format!("Enter {label}...")
        } else {
            default_value
        };
        let kind = FieldKind::for_variable(&variable.name);

        let options = match kind {
            FieldKind::Select(choices) => {
                let mut options: Vec<OptionView> = Vec::with_capacity(choices.len() + 1);
                if !value.is_empty() && !choices.contains(&value) {
                    options.push(OptionView {
                        value: value.to_string(),
                        selected: true,
                    });
                }
                options.extend(choices.iter().map(|choice| OptionView {
                    value: (*choice).to_string(),
                    selected: *choice == value,
                }));
                options
            }
            FieldKind::Text | FieldKind::TextArea => Vec::new(),
        };

        Self {
            name: variable.name.clone(),
            description: variable.description.clone().unwrap_or_default(),
            required: variable.required,
            value: value.to_string(),
            placeholder,
            is_select: matches!(kind, FieldKind::Select(_)),
            is_textarea: kind == FieldKind::TextArea,
            options,
            label,
        }
    }
}

/// Variable form and result area of the selected template
#[derive(Debug, Template)]
#[template(path = "configuring.html")]
pub struct ConfiguringPanel {
    view_id: Uuid,
    name: String,
    description: String,
    fields: Vec<FieldView>,
    result: String,
}

impl ConfiguringPanel {
    fn new(view_id: Uuid, selection: &Selection, now: Instant) -> askama::Result<Self> {
        let template = selection.template();
        let form = selection.form();
        let fields = selection
            .variables()
            .into_iter()
            .map(|variable| {
                let value = form
                    .get(&variable.name)
                    .or(variable.default_value.as_deref())
                    .unwrap_or_default();
                FieldView::new(variable, value)
            })
            .collect();

        Ok(Self {
            view_id,
            name: template.name.clone(),
            description: template.description.clone(),
            fields,
            result: ResultPanel::new(view_id, selection, now)?.render()?,
        })
    }
}

/// Generated text with its copy control
#[derive(Debug, Template)]
#[template(path = "result_panel.html")]
pub struct ResultPanel {
    has_result: bool,
    text: String,
    copy_button: String,
}

impl ResultPanel {
    /// Result fragment for `selection`
    ///
    /// # Errors
    ///
    /// Returns an error if the copy control fails to render.
    pub fn new(view_id: Uuid, selection: &Selection, now: Instant) -> askama::Result<Self> {
        Ok(Self {
            has_result: selection.result().is_some(),
            text: selection.result().unwrap_or_default().to_string(),
            copy_button: CopyButton::new(view_id, selection, now).render()?,
        })
    }
}

/// Copy control, showing the transient indicator while it is active
#[derive(Debug, Template)]
#[template(path = "copy_button.html")]
pub struct CopyButton {
    view_id: Uuid,
    copied: bool,
    revert_ms: u128,
}

impl CopyButton {
    /// Copy control for `selection` at `now`
    #[must_use]
    pub fn new(view_id: Uuid, selection: &Selection, now: Instant) -> Self {
        let copy = selection.copy();
        Self {
            view_id,
            copied: copy.is_shown(now),
            revert_ms: copy.window().as_millis(),
        }
    }
}

/// One editable variable row
#[derive(Debug, Clone)]
pub struct RowView {
    index: usize,
    name: String,
    display_name: String,
    description: String,
    default_value: String,
    required: bool,
}

/// Template editor form
#[derive(Debug, Template)]
#[template(path = "editor.html")]
pub struct EditorPanel {
    view_id: Uuid,
    title: String,
    name: String,
    description: String,
    category: String,
    content: String,
    is_public: bool,
    can_delete: bool,
    rows: Vec<RowView>,
}

impl EditorPanel {
    fn new(view_id: Uuid, editor: &TemplateEditor) -> Self {
        let rows = editor
            .variables()
            .iter()
            .enumerate()
            .map(|(index, draft)| RowView {
                index,
                name: draft.name.clone(),
                display_name: draft.display_name.clone(),
                description: draft.description.clone(),
                default_value: draft.default_value.clone(),
                required: draft.required,
            })
            .collect();

        Self {
            view_id,
            title: if editor.existing().is_some() {
                "Edit template".to_string()
            } else {
                "New template".to_string()
            },
            name: editor.name.clone(),
            description: editor.description.clone(),
            category: editor.category.clone(),
            content: editor.content.clone(),
            is_public: editor.is_public,
            can_delete: editor.template_id().is_some(),
            rows,
        }
    }
}
