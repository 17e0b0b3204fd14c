//! Generate view state machine
//!
//! One page moves between three modes:
//!
//! ```text
//!              select                    open create/edit
//!  Browsing ─────────────▶ Configuring ──────────────────▶ Editing
//!     ▲  ◀──────────────────────┘  ▲                          │
//!     │          back              └──────── save ────────────┤
//!     └──────────────── cancel restores the prior mode ───────┘
//! ```
//!
//! Generation and copy feedback live inside `Configuring`.

use std::time::{Duration, Instant};

use crate::api::{GenerateRequest, GenerateResponse, Template, TemplateVariable};
use crate::error::{ApiError, ViewError};

use super::clipboard::{CopyIndicator, CopyOutcome};
use super::editor::TemplateEditor;
use super::form::VariableForm;
use super::selector::TemplateSelector;

/// Message shown when generation fails
pub const GENERATE_FAILED_MESSAGE: &str = "Generation failed, please retry";

/// Selected template with its values and last result
#[derive(Debug, Clone)]
pub struct Selection {
    template: Template,
    form: VariableForm,
    result: Option<String>,
    copy: CopyIndicator,
}

impl Selection {
    fn new(template: Template, copy_window: Duration) -> Self {
        Self {
            form: VariableForm::seeded(&template.variables),
            template,
            result: None,
            copy: CopyIndicator::new(copy_window),
        }
    }

    /// The selected template
    #[must_use]
    pub const fn template(&self) -> &Template {
        &self.template
    }

    /// Current values
    #[must_use]
    pub const fn form(&self) -> &VariableForm {
        &self.form
    }

    /// Last generated text
    #[must_use]
    pub fn result(&self) -> Option<&str> {
        self.result.as_deref()
    }

    /// Copy feedback for the result
    #[must_use]
    pub const fn copy(&self) -> &CopyIndicator {
        &self.copy
    }

    /// Variables in display order
    #[must_use]
    pub fn variables(&self) -> Vec<&TemplateVariable> {
        let mut variables: Vec<&TemplateVariable> = self.template.variables.iter().collect();
        variables.sort_by_key(|variable| variable.sort_order);
        variables
    }
}

#[derive(Debug, Clone)]
enum Mode {
    Browsing,
    Configuring(Selection),
    Editing {
        editor: TemplateEditor,
        resume: Box<Mode>,
    },
}

/// Borrowed view of the current mode, for rendering
#[derive(Debug)]
pub enum Screen<'a> {
    /// Catalog list
    Browsing(&'a TemplateSelector),
    /// Variable form and result
    Configuring(&'a Selection),
    /// Template editor
    Editing(&'a TemplateEditor),
}

/// Top-level state of one opened page
#[derive(Debug, Clone)]
pub struct GenerateView {
    mode: Mode,
    selector: TemplateSelector,
    copy_window: Duration,
}

impl GenerateView {
    /// Fresh page in `Browsing` mode
    #[must_use]
    pub const fn new(selector: TemplateSelector, copy_window: Duration) -> Self {
        Self {
            mode: Mode::Browsing,
            selector,
            copy_window,
        }
    }

    /// What to render
    #[must_use]
    pub fn screen(&self) -> Screen<'_> {
        match &self.mode {
            Mode::Browsing => Screen::Browsing(&self.selector),
            Mode::Configuring(selection) => Screen::Configuring(selection),
            Mode::Editing { editor, .. } => Screen::Editing(editor),
        }
    }

    /// Catalog state
    #[must_use]
    pub const fn selector(&self) -> &TemplateSelector {
        &self.selector
    }

    /// Mutable catalog state
    pub fn selector_mut(&mut self) -> &mut TemplateSelector {
        &mut self.selector
    }

    /// Current selection, when configuring
    #[must_use]
    pub const fn selection(&self) -> Option<&Selection> {
        match &self.mode {
            Mode::Configuring(selection) => Some(selection),
            _ => None,
        }
    }

    /// Open editor, when editing
    #[must_use]
    pub const fn editor(&self) -> Option<&TemplateEditor> {
        match &self.mode {
            Mode::Editing { editor, .. } => Some(editor),
            _ => None,
        }
    }

    /// Mutable open editor
    ///
    /// # Errors
    ///
    /// [`ViewError::NotEditing`] outside `Editing`.
    pub fn editor_mut(&mut self) -> Result<&mut TemplateEditor, ViewError> {
        match &mut self.mode {
            Mode::Editing { editor, .. } => Ok(editor),
            _ => Err(ViewError::NotEditing),
        }
    }

    fn selection_mut(&mut self) -> Result<&mut Selection, ViewError> {
        match &mut self.mode {
            Mode::Configuring(selection) => Ok(selection),
            _ => Err(ViewError::NoSelection),
        }
    }

    /// Selection a finished generation belongs to, including one the open
    /// editor will return to
    fn pending_selection_mut(&mut self) -> Option<&mut Selection> {
        match &mut self.mode {
            Mode::Configuring(selection) => Some(selection),
            Mode::Editing { resume, .. } => match resume.as_mut() {
                Mode::Configuring(selection) => Some(selection),
                _ => None,
            },
            Mode::Browsing => None,
        }
    }

    /// Select a template, starting from fresh values and no result
    ///
    /// # Errors
    ///
    /// [`ViewError::AlreadyEditing`] while the editor is open.
    pub fn select(&mut self, template: Template) -> Result<(), ViewError> {
        if matches!(self.mode, Mode::Editing { .. }) {
            return Err(ViewError::AlreadyEditing);
        }
        tracing::debug!(template_id = %template.id, "template selected");
        self.mode = Mode::Configuring(Selection::new(template, self.copy_window));
        Ok(())
    }

    /// Drop the selection and show the catalog again
    ///
    /// # Errors
    ///
    /// [`ViewError::AlreadyEditing`] while the editor is open.
    pub fn back_to_list(&mut self) -> Result<(), ViewError> {
        match self.mode {
            Mode::Editing { .. } => Err(ViewError::AlreadyEditing),
            Mode::Browsing => Ok(()),
            Mode::Configuring(_) => {
                self.mode = Mode::Browsing;
                self.selector.invalidate();
                Ok(())
            }
        }
    }

    fn open_editor(&mut self, editor: TemplateEditor) -> Result<(), ViewError> {
        if matches!(self.mode, Mode::Editing { .. }) {
            return Err(ViewError::AlreadyEditing);
        }
        let resume = std::mem::replace(&mut self.mode, Mode::Browsing);
        self.mode = Mode::Editing {
            editor,
            resume: Box::new(resume),
        };
        Ok(())
    }

    /// Open an empty editor
    ///
    /// # Errors
    ///
    /// [`ViewError::AlreadyEditing`] while the editor is open.
    pub fn open_create(&mut self) -> Result<(), ViewError> {
        self.open_editor(TemplateEditor::create())
    }

    /// Open the editor on `template`
    ///
    /// # Errors
    ///
    /// [`ViewError::AlreadyEditing`] while the editor is open.
    pub fn open_edit(&mut self, template: Template) -> Result<(), ViewError> {
        self.open_editor(TemplateEditor::edit(template))
    }

    /// Open the editor on the selected template
    ///
    /// # Errors
    ///
    /// [`ViewError::NoSelection`] unless configuring.
    pub fn open_edit_selected(&mut self) -> Result<(), ViewError> {
        let template = self.selection_mut()?.template.clone();
        self.open_edit(template)
    }

    /// Close the editor, restoring the mode it was opened from
    ///
    /// # Errors
    ///
    /// [`ViewError::NotEditing`] outside `Editing`.
    pub fn cancel_editing(&mut self) -> Result<(), ViewError> {
        match std::mem::replace(&mut self.mode, Mode::Browsing) {
            Mode::Editing { resume, .. } => {
                self.mode = *resume;
                Ok(())
            }
            other => {
                self.mode = other;
                Err(ViewError::NotEditing)
            }
        }
    }

    /// Close the editor after a save, selecting the stored template
    ///
    /// # Errors
    ///
    /// [`ViewError::NotEditing`] outside `Editing`.
    pub fn finish_save(&mut self, saved: Template) -> Result<(), ViewError> {
        if !matches!(self.mode, Mode::Editing { .. }) {
            return Err(ViewError::NotEditing);
        }
        self.mode = Mode::Configuring(Selection::new(saved, self.copy_window));
        self.selector.invalidate();
        Ok(())
    }

    /// Close the editor after its template was deleted
    ///
    /// # Errors
    ///
    /// [`ViewError::NotEditing`] outside `Editing`.
    pub fn finish_delete(&mut self) -> Result<(), ViewError> {
        if !matches!(self.mode, Mode::Editing { .. }) {
            return Err(ViewError::NotEditing);
        }
        self.mode = Mode::Browsing;
        self.selector.invalidate();
        Ok(())
    }

    /// Single change handler for variable values
    ///
    /// # Errors
    ///
    /// [`ViewError::NoSelection`] unless configuring.
    pub fn set_value(&mut self, name: &str, value: &str) -> Result<(), ViewError> {
        self.selection_mut()?.form.set(name, value);
        Ok(())
    }

    /// Request for generating the selected template with current values
    ///
    /// # Errors
    ///
    /// [`ViewError::NoSelection`] unless configuring.
    pub fn begin_generation(&mut self) -> Result<GenerateRequest, ViewError> {
        let selection = self.selection_mut()?;
        Ok(GenerateRequest {
            template_id: selection.template.id.clone(),
            variables: selection.form.values().clone(),
        })
    }

    /// Apply a generation outcome
    ///
    /// A success replaces the result, also when the editor was opened in the
    /// meantime, so cancelling it shows the new result. A failure keeps the
    /// prior result and returns the alert to show. An outcome arriving after
    /// the selection was dropped is discarded.
    pub fn finish_generation(
        &mut self,
        outcome: Result<GenerateResponse, ApiError>,
    ) -> Option<&'static str> {
        match outcome {
            Ok(response) => {
                match self.pending_selection_mut() {
                    Some(selection) => {
                        selection.result = Some(response.result);
                        selection.copy.reset();
                    }
                    None => tracing::debug!("generation finished after leaving the template"),
                }
                None
            }
            Err(error) => {
                tracing::error!(%error, "generation failed");
                Some(GENERATE_FAILED_MESSAGE)
            }
        }
    }

    /// Record a clipboard outcome reported by the browser
    ///
    /// # Errors
    ///
    /// [`ViewError::NoSelection`] unless configuring.
    pub fn record_copy(
        &mut self,
        outcome: CopyOutcome,
        now: Instant,
    ) -> Result<Option<&'static str>, ViewError> {
        Ok(self.selection_mut()?.copy.record(outcome, now))
    }
}
