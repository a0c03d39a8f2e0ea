//! Morphological tokenization.
//!
//! [`Tokenizer`] is the capability the lexical analyzer consumes.
//! [`MecabTokenizer`] implements it by driving an external `mecab` process.

mod mecab;

pub use mecab::MecabTokenizer;

use serde::Serialize;

use crate::errors::Result;

/// One token: its literal text and the analyzer's feature string
/// (e.g. `名詞,普通名詞,一般,*,...`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub surface_form: String,
    pub tag: String,
}

impl Token {
    pub fn new(surface_form: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            surface_form: surface_form.into(),
            tag: tag.into(),
        }
    }
}

/// Splits text into tagged tokens, in input order.
///
/// Implementations return [`RaterError::TokenizerUnavailable`](crate::errors::RaterError::TokenizerUnavailable)
/// when the underlying analyzer cannot be reached or initialized.
pub trait Tokenizer {
    fn tokenize(&self, text: &str) -> Result<Vec<Token>>;
}

impl<T: Tokenizer + ?Sized> Tokenizer for &T {
    fn tokenize(&self, text: &str) -> Result<Vec<Token>> {
        (**self).tokenize(text)
    }
}
