//! Unicode-aware text normalization for matching.

mod normalize;
mod word;

pub use normalize::{normalize, normalize_query, NormalizePolicy, NormalizedText};
pub use word::{is_entire_word, is_grapheme_boundary, is_word_char};
