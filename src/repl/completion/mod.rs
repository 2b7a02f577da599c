//! Completion pipeline for the console
//!
//! The pipeline runs once per completion request:
//!
//! - **split**: the buffer up to the cursor is split into words and a fragment
//!   (see [`crate::parser::split`])
//! - **Engine**: a [`CompletionEngine`] produces raw, decoded candidates from
//!   the command tree; [`TreeEngine`] is the built-in one
//! - **Adapter**: reshapes the raw output into a [`CompletionResult`] with
//!   re-escaped values, unified tags and justified command groups
//!
//! # Examples
//!
//! ```no_run
//! use shellline::parser::{Command, SplitScope, split};
//! use shellline::repl::completion::{TreeEngine, complete};
//!
//! let tree = Command::demo_tree();
//! let mut engine = TreeEngine::new();
//!
//! let line = "run --ver";
//! let result = complete(&mut engine, &tree, &split(line, line.len(), SplitScope::UpToCursor));
//! // One candidate: "--verbose " tagged "flags"
//! ```

pub mod adapter;
pub mod engine;
pub mod provider;
pub mod result;

pub use adapter::complete;
pub use engine::{
    CompletionEngine, EngineReply, EngineScope, NoSpace, RawCompletions, RawValue,
};
pub use provider::TreeEngine;
pub use result::{Candidate, CompletionResult, FLAGS_TAG, TagGroup};
