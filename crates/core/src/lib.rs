//! Core logic including the turn pipeline, conversation record, intent
//! classification, and prompt templates.

#![deny(missing_docs)]
#![deny(clippy::missing_safety_doc)]

#[macro_use]
extern crate tracing;

mod assistant;
pub mod conversation;
pub mod intent;
mod model_client;
mod prompt;
mod research_client;

pub use assistant::{Assistant, AssistantBuilder, TurnError};
