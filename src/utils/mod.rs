//! Content classification, charset handling, token counting and path helpers

pub mod classify;
pub mod encoding;
pub mod paths;
pub mod tokens;

pub use classify::{Classification, ContentClassifier, MimeSniffer};
pub use encoding::decode_text;
pub use paths::{normalize_path, relative_display};
pub use tokens::{known_models, BpeTokenizer, TokenCounter};
