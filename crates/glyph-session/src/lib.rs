//! Session state and the asynchronous command protocol for Glyph.
//!
//! A [`Session`] owns the editor pane, the log pane, and a [`Dispatcher`]
//! that ships `{actionName, payload}` requests to an evaluation engine and
//! routes every reply into the log, in the order the engine emitted them.

pub mod config;
pub mod dispatcher;
pub mod engine;
pub mod message;
pub mod process;
pub mod registry;
pub mod session;

pub use config::{ConfigError, EditorConfig, EngineConfig, PlaygroundConfig};
pub use dispatcher::Dispatcher;
pub use engine::{EchoEngine, Engine, EngineError, EngineHandle, Replies, spawn_engine};
pub use message::{Reply, Request};
pub use process::ProcessEngine;
pub use registry::{Continuation, ContinuationRegistry};
pub use session::{EDITOR_ACTION, Session};
