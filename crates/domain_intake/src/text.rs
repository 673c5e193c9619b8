//! Bag-of-words text features
//!
//! Claim descriptions are turned into term-count vectors over a vocabulary
//! learned at training time. The vocabulary is kept in sorted order so the
//! same corpus always yields the same feature layout.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};

static STOP_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "a", "about", "above", "after", "again", "against", "all", "almost", "alone", "along",
        "already", "also", "although", "always", "am", "among", "an", "and", "another", "any",
        "anyhow", "anyone", "anything", "anyway", "anywhere", "are", "around", "as", "at", "be",
        "became", "because", "become", "becomes", "been", "before", "beforehand", "behind",
        "being", "below", "beside", "besides", "between", "beyond", "both", "but", "by", "can",
        "cannot", "could", "did", "do", "does", "doing", "done", "down", "due", "during", "each",
        "eg", "either", "else", "elsewhere", "enough", "etc", "even", "ever", "every", "everyone",
        "everything", "everywhere", "except", "few", "for", "former", "formerly", "from",
        "further", "had", "has", "have", "having", "he", "hence", "her", "here", "hereafter",
        "hereby", "herein", "hers", "herself", "him", "himself", "his", "how", "however", "ie",
        "if", "in", "indeed", "into", "is", "it", "its", "itself", "just", "last", "latter",
        "least", "less", "ltd", "many", "may", "me", "meanwhile", "might", "mine", "more",
        "moreover", "most", "mostly", "much", "must", "my", "myself", "namely", "neither",
        "never", "nevertheless", "next", "no", "nobody", "none", "noone", "nor", "not", "nothing",
        "now", "nowhere", "of", "off", "often", "on", "once", "one", "only", "onto", "or",
        "other", "others", "otherwise", "our", "ours", "ourselves", "out", "over", "own", "per",
        "perhaps", "please", "rather", "re", "same", "seem", "seemed", "seeming", "seems",
        "several", "she", "should", "since", "so", "some", "somehow", "someone", "something",
        "sometime", "sometimes", "somewhere", "still", "such", "than", "that", "the", "their",
        "theirs", "them", "themselves", "then", "thence", "there", "thereafter", "thereby",
        "therefore", "therein", "thereupon", "these", "they", "this", "those", "though",
        "through", "throughout", "thru", "thus", "to", "together", "too", "toward", "towards",
        "under", "until", "up", "upon", "us", "very", "via", "was", "we", "well", "were", "what",
        "whatever", "when", "whence", "whenever", "where", "whereafter", "whereas", "whereby",
        "wherein", "whereupon", "wherever", "whether", "which", "while", "whither", "who",
        "whoever", "whole", "whom", "whose", "why", "will", "with", "within", "without", "would",
        "yet", "you", "your", "yours", "yourself", "yourselves",
    ]
    .into_iter()
    .collect()
});

/// Returns true for English function words excluded from the vocabulary
pub fn is_stop_word(token: &str) -> bool {
    STOP_WORDS.contains(token)
}

/// Splits text into lower-cased word tokens of at least two characters,
/// dropping stop words
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|token| token.chars().count() >= 2)
        .filter(|token| !is_stop_word(token))
        .map(str::to_string)
        .collect()
}

/// Term-count vectorizer with a fixed, sorted vocabulary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountVectorizer {
    vocabulary: BTreeMap<String, usize>,
}

impl CountVectorizer {
    /// Learns the vocabulary of a corpus
    pub fn fit<S: AsRef<str>>(documents: &[S]) -> Self {
        let terms: BTreeSet<String> = documents
            .iter()
            .flat_map(|doc| tokenize(doc.as_ref()))
            .collect();

        let vocabulary = terms
            .into_iter()
            .enumerate()
            .map(|(index, term)| (term, index))
            .collect();

        Self { vocabulary }
    }

    /// Number of features produced per document
    pub fn len(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vocabulary.is_empty()
    }

    pub fn contains(&self, term: &str) -> bool {
        self.vocabulary.contains_key(term)
    }

    /// Counts vocabulary terms in one document; unseen terms are ignored
    pub fn transform(&self, document: &str) -> Vec<f64> {
        let mut counts = vec![0.0; self.vocabulary.len()];
        for token in tokenize(document) {
            if let Some(&index) = self.vocabulary.get(&token) {
                counts[index] += 1.0;
            }
        }
        counts
    }

    /// Row-major count matrix for a batch of documents
    pub fn transform_batch<S: AsRef<str>>(&self, documents: &[S]) -> Vec<f64> {
        let mut data = Vec::with_capacity(documents.len() * self.vocabulary.len());
        for doc in documents {
            data.extend(self.transform(doc.as_ref()));
        }
        data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_drops_stop_words_and_short_tokens() {
        let tokens = tokenize("The car was hit by a truck on I-95");
        assert_eq!(tokens, vec!["car", "hit", "truck", "95"]);
    }

    #[test]
    fn test_tokenize_lowercases() {
        assert_eq!(tokenize("Water DAMAGE"), vec!["water", "damage"]);
    }

    #[test]
    fn test_vocabulary_is_sorted() {
        let vectorizer = CountVectorizer::fit(&["zebra apple", "mango"]);
        assert_eq!(vectorizer.transform("apple"), vec![1.0, 0.0, 0.0]);
        assert_eq!(vectorizer.transform("zebra zebra"), vec![0.0, 0.0, 2.0]);
    }

    #[test]
    fn test_unseen_terms_ignored() {
        let vectorizer = CountVectorizer::fit(&["broken window"]);
        assert_eq!(vectorizer.transform("stolen bicycle"), vec![0.0, 0.0]);
    }

    #[test]
    fn test_stop_word_only_corpus_is_empty() {
        let vectorizer = CountVectorizer::fit(&["the and of", "it was"]);
        assert!(vectorizer.is_empty());
    }

    #[test]
    fn test_transform_batch_is_row_major() {
        let vectorizer = CountVectorizer::fit(&["flood", "theft"]);
        let data = vectorizer.transform_batch(&["theft", "flood flood"]);
        assert_eq!(data, vec![0.0, 1.0, 2.0, 0.0]);
    }
}
