//! Dialogue runtime for the bakery assistant.
//!
//! Each user message goes through the same steps:
//! 1. **Intent matching** (`conversation`): the first intent that shares a normalized
//!    token with the message and passes the context gate wins.
//! 2. **Reply rendering** (`templates`, `selector`): one of the intent's responses is
//!    chosen and rendered against shared data such as the menu.
//! 3. **Order taking** (`runtime`): when the session is in the buying state, quantity
//!    and flavor are extracted and read back to the user.
//!
//! # Key Types
//!
//! - `AgentRuntime`: startup wiring of catalog, extractor and engine
//! - `DialogueEngine`: immutable intent table shared by every session
//! - `Session`: per-conversation context and response selector

pub mod conversation;
pub mod runtime;
pub mod selector;
pub mod templates;

pub use conversation::{ConversationContext, DialogueEngine, DialogueError, Session, Turn};
pub use runtime::{AgentRuntime, ApplicationError};
pub use selector::{RandomSelector, ResponseSelector};
