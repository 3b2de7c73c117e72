//! Core logic of the consultation widget: the consultant that talks to the
//! hosted model, and the widget that keeps the transcript.

#![deny(missing_docs)]

#[macro_use]
extern crate tracing;

pub mod consultant;
pub mod conversation;
pub mod diagnostics;
mod widget;

pub use consultant::{Consult, Consultant, ConsultantBuilder};
pub use conversation::{ChatMessage, Role};
pub use devflow_model::ErrorKind;
pub use diagnostics::{DiagnosticEvent, DiagnosticSink, TracingSink};
pub use widget::{
    UnmountedError, Widget, WidgetBuilder, WidgetSnapshot, WidgetStage,
    WidgetView,
};
