use std::collections::{BTreeSet, HashMap};

use lazy_static::lazy_static;
use ndarray::Array1;
use regex::Regex;

use super::error::ClassifierError;

lazy_static! {
    /// Runs of two or more word characters. Single letters never become tokens.
    static ref TOKEN_PATTERN: Regex = Regex::new(r"\b\w\w+\b").expect("token pattern must compile");
}

/// Lowercases `text` and splits it into word tokens.
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    TOKEN_PATTERN
        .find_iter(&lowered)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Mapping from token to column index, fixed once fitted.
///
/// Terms are indexed in sorted order so the same training texts always
/// produce the same columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vocabulary {
    terms: Vec<String>,
    index: HashMap<String, usize>,
}

impl Vocabulary {
    /// Collects every token that appears in `texts`.
    ///
    /// # Errors
    /// - `VocabularyError` if no text yields a single token
    pub fn fit<I, S>(texts: I) -> Result<Self, ClassifierError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let terms: BTreeSet<String> = texts
            .into_iter()
            .flat_map(|text| tokenize(text.as_ref()))
            .collect();

        if terms.is_empty() {
            return Err(ClassifierError::VocabularyError(
                "Training texts contain no usable tokens (need words of two or more characters)".into(),
            ));
        }

        let terms: Vec<String> = terms.into_iter().collect();
        let index = terms
            .iter()
            .enumerate()
            .map(|(i, term)| (term.clone(), i))
            .collect();

        Ok(Self { terms, index })
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn index_of(&self, term: &str) -> Option<usize> {
        self.index.get(term).copied()
    }

    /// Terms in column order.
    pub fn terms(&self) -> &[String] {
        &self.terms
    }
}

/// Bag-of-words conversion of text into count vectors.
///
/// Tokens outside the vocabulary are dropped rather than rejected, so any
/// text produces a vector of the vocabulary's dimension. A text made only of
/// unknown words produces the zero vector.
pub trait TextVectorizer {
    /// Returns the fitted vocabulary if available
    fn vocabulary(&self) -> Option<&Vocabulary>;

    /// Tokens of `text` that exist in the vocabulary, in order of appearance.
    ///
    /// # Errors
    /// - `VocabularyError` if the vocabulary has not been fitted
    fn known_tokens(&self, text: &str) -> Result<Vec<String>, ClassifierError> {
        let vocabulary = self.vocabulary()
            .ok_or_else(|| ClassifierError::VocabularyError("Vocabulary not fitted".into()))?;

        Ok(tokenize(text)
            .into_iter()
            .filter(|token| vocabulary.index_of(token).is_some())
            .collect())
    }

    /// Counts the known tokens in `text` without building the full vector.
    fn count_tokens(&self, text: &str) -> Result<usize, ClassifierError> {
        self.known_tokens(text).map(|tokens| tokens.len())
    }

    /// Converts text into a word-count vector over the vocabulary.
    ///
    /// # Errors
    /// - `VocabularyError` if the vocabulary has not been fitted
    fn vectorize(&self, text: &str) -> Result<Array1<f64>, ClassifierError> {
        let vocabulary = self.vocabulary()
            .ok_or_else(|| ClassifierError::VocabularyError("Vocabulary not fitted".into()))?;

        let mut counts = Array1::zeros(vocabulary.len());
        for token in tokenize(text) {
            if let Some(i) = vocabulary.index_of(&token) {
                counts[i] += 1.0;
            }
        }
        Ok(counts)
    }
}

impl TextVectorizer for Vocabulary {
    fn vocabulary(&self) -> Option<&Vocabulary> {
        Some(self)
    }
}
