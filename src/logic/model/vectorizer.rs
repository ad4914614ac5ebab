//! TF-IDF Vectorizer
//!
//! Rebuilds a fitted TF-IDF transform from its JSON export. Tokenization
//! follows the usual conventions of char, char_wb and word analyzers so
//! that a vectorizer fitted elsewhere produces the same features here.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use super::ArtifactError;

/// Sparse feature vector, feature index -> weight
pub type SparseVector = BTreeMap<usize, f64>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Analyzer {
    Char,
    CharWb,
    Word,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Norm {
    L2,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TfidfVectorizer {
    pub analyzer: Analyzer,
    pub ngram_range: (usize, usize),
    #[serde(default = "default_lowercase")]
    pub lowercase: bool,
    pub vocabulary: HashMap<String, usize>,
    pub idf: Vec<f64>,
    #[serde(default)]
    pub norm: Option<Norm>,
    #[serde(default)]
    pub sublinear_tf: bool,
}

fn default_lowercase() -> bool {
    true
}

impl TfidfVectorizer {
    /// Number of output features
    pub fn dimension(&self) -> usize {
        self.idf.len()
    }

    /// Reject exports that would index out of bounds or never match
    pub fn validate(&self) -> Result<(), ArtifactError> {
        let (min_n, max_n) = self.ngram_range;
        if min_n == 0 || min_n > max_n {
            return Err(ArtifactError::Invalid(format!(
                "bad ngram_range ({}, {})", min_n, max_n
            )));
        }
        if self.idf.len() != self.vocabulary.len() {
            return Err(ArtifactError::Invalid(format!(
                "idf has {} entries for {} vocabulary terms",
                self.idf.len(),
                self.vocabulary.len()
            )));
        }
        if let Some((term, index)) = self.vocabulary.iter().find(|(_, &i)| i >= self.idf.len()) {
            return Err(ArtifactError::Invalid(format!(
                "term '{}' maps to index {} outside {} features",
                term,
                index,
                self.idf.len()
            )));
        }
        Ok(())
    }

    /// TF-IDF weights of the known terms in `text`
    pub fn transform(&self, text: &str) -> SparseVector {
        let text = if self.lowercase { text.to_lowercase() } else { text.to_string() };

        let mut counts: HashMap<usize, f64> = HashMap::new();
        for term in self.terms(&text) {
            if let Some(&index) = self.vocabulary.get(&term) {
                *counts.entry(index).or_insert(0.0) += 1.0;
            }
        }

        let mut features: SparseVector = counts
            .into_iter()
            .map(|(index, tf)| {
                let tf = if self.sublinear_tf { 1.0 + tf.ln() } else { tf };
                (index, tf * self.idf[index])
            })
            .collect();

        if self.norm == Some(Norm::L2) {
            let length = features.values().map(|w| w * w).sum::<f64>().sqrt();
            if length > 0.0 {
                features.values_mut().for_each(|w| *w /= length);
            }
        }

        features
    }

    fn terms(&self, text: &str) -> Vec<String> {
        let (min_n, max_n) = self.ngram_range;
        match self.analyzer {
            Analyzer::Char => char_ngrams(&collapse_whitespace(text), min_n, max_n),
            Analyzer::CharWb => char_wb_ngrams(text, min_n, max_n),
            Analyzer::Word => word_ngrams(&word_tokens(text), min_n, max_n),
        }
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn char_ngrams(text: &str, min_n: usize, max_n: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    let mut grams = Vec::new();
    for n in min_n..=max_n.min(chars.len()) {
        grams.extend(chars.windows(n).map(|w| w.iter().collect::<String>()));
    }
    grams
}

/// Character n-grams inside word boundaries, each word padded with spaces
fn char_wb_ngrams(text: &str, min_n: usize, max_n: usize) -> Vec<String> {
    let mut grams = Vec::new();
    for word in text.split_whitespace() {
        let padded: Vec<char> = std::iter::once(' ')
            .chain(word.chars())
            .chain(std::iter::once(' '))
            .collect();
        for n in min_n..=max_n {
            if padded.len() <= n {
                // Short words count once, as a whole
                grams.push(padded.iter().collect());
                break;
            }
            grams.extend(padded.windows(n).map(|w| w.iter().collect::<String>()));
        }
    }
    grams
}

/// Runs of two or more word characters
fn word_tokens(text: &str) -> Vec<String> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|t| t.chars().count() >= 2)
        .map(str::to_string)
        .collect()
}

fn word_ngrams(tokens: &[String], min_n: usize, max_n: usize) -> Vec<String> {
    let mut grams = Vec::new();
    for n in min_n..=max_n.min(tokens.len()) {
        grams.extend(tokens.windows(n).map(|w| w.join(" ")));
    }
    grams
}
