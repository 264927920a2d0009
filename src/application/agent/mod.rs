//! # Agent Module
//!
//! A tool-calling loop over a [`ChatModel`](crate::infrastructure::model::ChatModel),
//! exposed through the [`AgentInvoker`] seam so callers never depend on the
//! loop itself.
//!
//! ## Key Types
//!
//! - [`AgentInvoker`] - Runs an agent for one prompt
//! - [`ToolAgent`] - Production invoker: chat model + tool runtime
//! - [`AgentResponse`] - Raw payload handed back to the caller
//! - [`AgentStep`] - One tool call, successful or not
//! - [`AgentError`] - Errors that end a run
//!
//! ## Agent Loop
//!
//! 1. Send the conversation to the model
//! 2. Read the reply as a JSON action (plain text counts as the answer)
//! 3. On `call_tool`, run the tool and append its result, success or not
//! 4. On `final`, return the response

mod errors;
mod invoker;
mod runner;
mod runtime;


pub use errors::AgentError;
pub use invoker::{AgentInvocation, AgentInvoker, AgentResponse};
pub use runner::{AgentOutcome, ToolAgent};
pub use runtime::{AgentStep, ToolRuntime};
