//! promptdeck: server-rendered UI for managing prompt templates
//!
//! Browse a template catalog, fill in a template's variables, generate the
//! final prompt text and copy it, or create and edit templates. All data
//! lives behind an external REST backend; this crate is the UI layer only.
//!
//! The page is rendered with askama and driven by htmx: every interaction
//! posts to a per-page view held in memory and swaps the returned fragment.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use promptdeck::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = PromptDeckConfig::load()?;
//!     let state = PromptDeckState::from_config(config)?;
//!     let addr = state.config().server.socket_addr()?;
//!
//!     let listener = tokio::net::TcpListener::bind(addr).await?;
//!     axum::serve(listener, router(state)).await?;
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! - [`api`]: backend client and its data types
//! - [`views`]: per-page UI state (selector, form, editor, generate view)
//! - [`template`]: askama pages and fragments
//! - [`handlers`]: axum routes
//! - [`config`], [`observability`], [`error`]: ambient plumbing

// Lint configuration is handled at the workspace level in Cargo.toml
#![allow(clippy::missing_errors_doc)]

pub mod api;
pub mod config;
pub mod error;
pub mod handlers;
pub mod htmx;
pub mod observability;
pub mod state;
pub mod template;
pub mod views;

#[cfg(test)]
pub mod testing;

pub mod prelude {
    //! Convenience re-exports for common types and traits
    //!
    //! # Examples
    //!
    //! ```rust
    //! use promptdeck::prelude::*;
    //! ```

    pub use crate::api::{HttpTemplateApi, Template, TemplateApi, TemplateVariable};
    pub use crate::config::PromptDeckConfig;
    pub use crate::error::{ApiError, EditorError, PromptDeckError, ViewError};
    pub use crate::handlers::router;
    pub use crate::htmx::{AlertTrigger, HxRefresh, HxRequest};
    pub use crate::observability::ObservabilityConfig;
    pub use crate::state::PromptDeckState;
    pub use crate::template::HxTemplate;
    pub use crate::views::{GenerateView, TemplateEditor, TemplateSelector};
}
