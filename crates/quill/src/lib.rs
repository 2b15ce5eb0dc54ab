//! An out-of-the-box content-generation assistant that assembles the Groq
//! model provider, the Tavily research backend, and the core turn
//! pipeline.
//!
//! The crate includes a CLI tool for using in the terminal. And you can
//! also use it as a library to bring the assistant into your own host
//! apps.

#![deny(missing_docs)]

#[allow(unused_imports)]
#[macro_use]
extern crate tracing;

mod session;

pub use session::{Session, SessionBuilder};

/// Re-exports of [`quill_core`] crate.
pub mod core {
    pub use quill_core::*;
}
