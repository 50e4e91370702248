//! Portuguese text pipeline shared by the flavor index, the entity extractors and the
//! dialogue engine: normalization, word tokenization and stopword filtering.

pub mod normalize;
pub mod stopwords;
pub mod tokenize;

pub use normalize::normalize;
pub use stopwords::{is_stopword, stopwords};
pub use tokenize::{preprocess, word_tokens};
