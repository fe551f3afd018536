//! Token counting

use std::sync::Arc;
use tiktoken_rs::CoreBPE;

use crate::error::{CountError, Result};

/// Model identifiers offered by `tokencount models`.
///
/// Entries the linked tokenizer cannot resolve are filtered out by
/// [`known_models`], so this list may safely run ahead of the tokenizer.
const MODEL_CANDIDATES: &[&str] = &[
    "o1",
    "o1-mini",
    "o1-preview",
    "chatgpt-4o-latest",
    "gpt-4o",
    "gpt-4o-mini",
    "gpt-4",
    "gpt-4-32k",
    "gpt-4-turbo",
    "gpt-3.5-turbo",
    "gpt-3.5",
    "gpt-35-turbo",
    "davinci-002",
    "babbage-002",
    "text-embedding-ada-002",
    "text-embedding-3-small",
    "text-embedding-3-large",
    "text-davinci-003",
    "text-davinci-002",
    "text-davinci-001",
    "text-curie-001",
    "text-babbage-001",
    "text-ada-001",
    "davinci",
    "curie",
    "babbage",
    "ada",
    "code-davinci-002",
    "code-davinci-001",
    "code-cushman-002",
    "code-cushman-001",
    "davinci-codex",
    "cushman-codex",
    "text-davinci-edit-001",
    "code-davinci-edit-001",
    "text-similarity-davinci-001",
    "text-similarity-curie-001",
    "text-similarity-babbage-001",
    "text-similarity-ada-001",
    "text-search-davinci-doc-001",
    "text-search-curie-doc-001",
    "text-search-babbage-doc-001",
    "text-search-ada-doc-001",
    "code-search-babbage-code-001",
    "code-search-ada-code-001",
    "gpt2",
];

/// Counts the token units of a piece of text.
pub trait TokenCounter: Send + Sync {
    fn count(&self, text: &str) -> usize;
}

/// tiktoken BPE encoder resolved from a model identifier.
#[derive(Clone)]
pub struct BpeTokenizer {
    model: String,
    bpe: Arc<CoreBPE>,
}

impl BpeTokenizer {
    /// Resolve the encoding for `model`.
    ///
    /// Fails with [`CountError::UnknownModel`] when the tokenizer has no
    /// encoding for the identifier (exact name or known prefix).
    pub fn for_model(model: &str) -> Result<Self> {
        let bpe = tiktoken_rs::get_bpe_from_model(model)
            .map_err(|_| CountError::UnknownModel { model: model.to_string() })?;
        Ok(Self { model: model.to_string(), bpe: Arc::new(bpe) })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

impl TokenCounter for BpeTokenizer {
    /// Special-token text such as `<|endoftext|>` is counted as ordinary text.
    fn count(&self, text: &str) -> usize {
        self.bpe.encode_ordinary(text).len()
    }
}

impl std::fmt::Debug for BpeTokenizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BpeTokenizer").field("model", &self.model).finish_non_exhaustive()
    }
}

/// Model identifiers the tokenizer can resolve.
pub fn known_models() -> Vec<&'static str> {
    MODEL_CANDIDATES
        .iter()
        .copied()
        .filter(|model| is_known_model(model))
        .collect()
}

/// Check a model identifier without loading its encoding.
pub fn is_known_model(model: &str) -> bool {
    tiktoken_rs::tokenizer::get_tokenizer(model).is_some()
}
