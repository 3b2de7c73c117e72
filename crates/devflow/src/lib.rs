//! The consultant's hosting page: the floating toggle button, the hero
//! call-to-action, and the widget they open.
//!
//! The crate includes a CLI that renders the page in the terminal. It can
//! also be used as a library to host the widget elsewhere.

#![deny(missing_docs)]

#[macro_use]
extern crate tracing;

mod page;

use devflow_core::{Consultant, ConsultantBuilder};
use devflow_gemini_model::{GeminiConfigBuilder, GeminiProvider};

pub use page::{Page, PageBuilder, TOGGLE_LABEL};

/// Creates a consultant backed by the Gemini API.
///
/// Without an API key, every consultation answers with the "unavailable"
/// fallback instead of failing.
pub fn gemini_consultant(api_key: Option<&str>) -> Consultant {
    let builder = ConsultantBuilder::with_connector(|api_key| {
        GeminiProvider::new(GeminiConfigBuilder::with_api_key(api_key).build())
    });
    let builder = match api_key {
        Some(api_key) => builder.with_api_key(api_key),
        None => builder,
    };
    builder.build()
}

/// Re-exports of [`devflow_core`] crate.
pub mod core {
    pub use devflow_core::*;
}
