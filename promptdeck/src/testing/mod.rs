//! Test helpers shared by the unit tests
//!
//! - [`template`] builds a minimal catalog entry
//! - [`TestApp`] serves the real router over a mocked backend
//! - HTMX assertion helpers for alert and refresh headers

pub mod assertions;
pub mod server;

pub use assertions::*;
pub use server::TestApp;

use crate::api::Template;

/// Public template with no content or variables
pub fn template(id: &str, name: &str) -> Template {
    Template {
        id: id.to_string(),
        user_id: "u1".to_string(),
        name: name.to_string(),
        description: String::new(),
        content: String::new(),
        variables: Vec::new(),
        category: String::new(),
        is_public: true,
        usage_count: 0,
        created_at: None,
        updated_at: None,
    }
}
