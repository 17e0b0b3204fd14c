//! Per-page UI state
//!
//! Every opened page owns one [`GenerateView`], kept in the
//! [`ViewRegistry`] under a random id that the page embeds in its request
//! URLs. Handlers lock a view only between backend calls, never across an
//! `.await`; when two requests race, the last one to apply its outcome wins.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::{Mutex, RwLock};
use uuid::Uuid;

pub mod clipboard;
pub mod editor;
pub mod form;
pub mod generate;
pub mod selector;

pub use clipboard::{CopyIndicator, CopyOutcome};
pub use editor::{EditorFields, TemplateEditor, VariableDraft, VariablePatch};
pub use form::{FieldKind, VariableForm};
pub use generate::{GenerateView, Screen, Selection};
pub use selector::{LoadState, SelectorView, TemplateSelector};

/// Shared handle to one page's state
pub type SharedView = Arc<Mutex<GenerateView>>;

#[derive(Debug)]
struct Entry {
    view: SharedView,
    last_seen: Instant,
}

/// Registry of open pages with idle expiry
#[derive(Debug, Clone)]
pub struct ViewRegistry {
    entries: Arc<RwLock<HashMap<Uuid, Entry>>>,
    idle_timeout: Duration,
}

impl ViewRegistry {
    /// Registry dropping views idle for longer than `idle_timeout`
    #[must_use]
    pub fn new(idle_timeout: Duration) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            idle_timeout,
        }
    }

    /// Register a view and return its id
    ///
    /// Expired views are pruned on the way.
    pub fn open(&self, view: GenerateView) -> Uuid {
        let id = Uuid::new_v4();
        let now = Instant::now();
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|_, entry| now.duration_since(entry.last_seen) < self.idle_timeout);
        let pruned = before - entries.len();
        entries.insert(
            id,
            Entry {
                view: Arc::new(Mutex::new(view)),
                last_seen: now,
            },
        );
        tracing::debug!(view_id = %id, open = entries.len(), pruned, "view opened");
        id
    }

    /// Look up a live view, refreshing its idle timer
    #[must_use]
    pub fn get(&self, id: Uuid) -> Option<SharedView> {
        let now = Instant::now();
        let mut entries = self.entries.write();
        let expired = entries
            .get(&id)
            .map(|entry| now.duration_since(entry.last_seen) >= self.idle_timeout)?;
        if expired {
            entries.remove(&id);
            tracing::debug!(view_id = %id, "view expired");
            return None;
        }
        let entry = entries.get_mut(&id)?;
        entry.last_seen = now;
        Some(Arc::clone(&entry.view))
    }

    /// Number of registered views
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether no view is registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}
