//! Retrieval context for general questions.
//!
//! Embeds the question, pulls matching records from the vector store and
//! renders them for the prompt and for the response payload.

pub mod context;

pub use context::{format_context_for_prompt, source_list, ContextBuilder};
