//! Line parsing for the console
//!
//! - `split`: shell-word splitting of the edit buffer with quote/escape state
//! - `codec`: re-escaping of completion values for the open quote context
//! - `command`: the command tree the console completes and highlights against

pub mod codec;
pub mod command;
pub mod split;

pub use codec::{PrefixContext, decode, reencode};
pub use command::{Command, Flag};
pub use split::{Fragment, Quote, QuoteState, SplitAnomaly, SplitResult, SplitScope, Word, split};
