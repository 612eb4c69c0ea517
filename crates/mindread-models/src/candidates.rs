//! Candidate word pools.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// Reasons a word list cannot become a `CandidateSet`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CandidateError {
    #[error("Candidate set is empty")]
    Empty,

    #[error("Duplicate candidate word: {0}")]
    Duplicate(String),

    #[error("Candidate word at position {0} is blank")]
    BlankWord(usize),
}

/// Ordered pool of unique, non-blank words still in play.
///
/// Never mutated in place: each elimination round builds a new set from the
/// survivors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(transparent)]
pub struct CandidateSet {
    words: Vec<String>,
}

impl CandidateSet {
    /// Validate and wrap a word list.
    pub fn new<I, S>(words: I) -> Result<Self, CandidateError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let words: Vec<String> = words.into_iter().map(Into::into).collect();
        if words.is_empty() {
            return Err(CandidateError::Empty);
        }

        let mut seen = HashSet::with_capacity(words.len());
        for (i, word) in words.iter().enumerate() {
            if word.trim().is_empty() {
                return Err(CandidateError::BlankWord(i));
            }
            if !seen.insert(word.as_str()) {
                return Err(CandidateError::Duplicate(word.clone()));
            }
        }

        Ok(Self { words })
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Always false for a constructed set; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.iter().any(|w| w == word)
    }

    /// The only remaining word, once the pool has been narrowed to one.
    pub fn single(&self) -> Option<&str> {
        match self.words.as_slice() {
            [only] => Some(only.as_str()),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(String::as_str)
    }

    pub fn into_words(self) -> Vec<String> {
        self.words
    }
}

impl<'de> Deserialize<'de> for CandidateSet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let words = Vec::<String>::deserialize(deserializer)?;
        CandidateSet::new(words).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_empty() {
        let words: Vec<String> = Vec::new();
        assert_eq!(CandidateSet::new(words), Err(CandidateError::Empty));
    }

    #[test]
    fn test_rejects_duplicates_and_blanks() {
        assert_eq!(
            CandidateSet::new(["cat", "dog", "cat"]),
            Err(CandidateError::Duplicate("cat".to_string()))
        );
        assert_eq!(
            CandidateSet::new(["cat", "  "]),
            Err(CandidateError::BlankWord(1))
        );
    }

    #[test]
    fn test_single() {
        let set = CandidateSet::new(["owl"]).unwrap();
        assert_eq!(set.single(), Some("owl"));

        let set = CandidateSet::new(["owl", "cat"]).unwrap();
        assert_eq!(set.single(), None);
        assert!(set.contains("cat"));
    }

    #[test]
    fn test_deserialize_validates() {
        let set: CandidateSet = serde_json::from_str(r#"["a","b"]"#).unwrap();
        assert_eq!(set.len(), 2);
        assert!(serde_json::from_str::<CandidateSet>("[]").is_err());
        assert_eq!(serde_json::to_string(&set).unwrap(), r#"["a","b"]"#);
    }
}
