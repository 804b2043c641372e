//! Prompt domain
//!
//! Templates for the proposal, cross-critique, judging, and ranking prompts.

mod template;

pub use template::DebatePromptTemplate;
