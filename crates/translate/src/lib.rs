//! Text translation collaborator.
//!
//! Wraps an LLM chat-completion endpoint behind the tagging core's
//! [`inktag_core::Translate`] seam. Every successful translation is stored
//! in an explicit file-backed cache ([`TranslationCache`]) keyed by a hash
//! of the text, the language pair, and the model, so repeated tagging runs
//! never pay for the same request twice.
//!
//! The cache has an injected lifecycle: it is loaded when the translator is
//! constructed and flushed after each insert. There is no process-global
//! state.

mod cache;
mod error;
mod translator;

pub use cache::TranslationCache;
pub use error::{Result, TranslateError};
pub use translator::{Translator, TranslatorConfig};
