//! An abstraction layer for hosted language models.
//!
//! This crate establishes a small protocol for the consultant to talk to
//! a hosted model: a request made of messages plus sampling settings, and
//! a single complete reply. Streaming is deliberately not modelled, every
//! request resolves to exactly one reply or one error.
//!
//! Types in this crate don't define any behavior, instead they are the
//! constraints that the implementors should adhere to.

#![deny(missing_docs)]

mod error;
mod provider;
mod request;
mod response;

pub use error::*;
pub use provider::*;
pub use request::*;
pub use response::*;
