//! Trailing-word matching of typed text against saved prompts and variable presets.
//!
//! All offsets are character offsets (Unicode scalar values) into the typed text.

pub mod highlight;
pub mod preset;
pub mod record;
pub mod strategy;
pub mod window;

pub use record::{MatchRecord, MatchType};
pub use strategy::{compare_priority, MatchStrategy};
pub use window::{word_window, WordWindow};
