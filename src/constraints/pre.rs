//! Copyright © 2025-2026 Wenze Wei. All Rights Reserved.
//!
//! This file is part of Zi.
//! The Zi project belongs to the Dunimd Team.
//!
//! Licensed under the Apache License, Version 2.0 (the "License");
//! You may not use this file except in compliance with the License.
//! You may obtain a copy of the License at
//!
//!     http://www.apache.org/licenses/LICENSE-2.0
//!
//! Unless required by applicable law or agreed to in writing, software
//! distributed under the License is distributed on an "AS IS" BASIS,
//! WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//! See the License for the specific language governing permissions and
//! limitations under the License.

//! # Pre-transformation Constraints
//!
//! Index filters applied before a transformation runs: no second edit of a
//! position, no edits of stopwords or short words, and no edits inside
//! protected input columns.

use std::collections::{BTreeSet, HashSet};

use crate::constraints::ZiPreTransformationConstraint;
use crate::errors::Result;
use crate::text::ZiAttackedText;

/// General English stopwords.
pub const ZI_DEFAULT_STOPWORDS: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "you're", "you've",
    "you'll", "you'd", "your", "yours", "yourself", "yourselves", "he", "him", "his", "himself",
    "she", "she's", "her", "hers", "herself", "it", "it's", "its", "itself", "they", "them",
    "their", "theirs", "themselves", "what", "which", "who", "whom", "this", "that", "that'll",
    "these", "those", "am", "is", "are", "was", "were", "be", "been", "being", "have", "has",
    "had", "having", "do", "does", "did", "doing", "a", "an", "the", "and", "but", "if", "or",
    "because", "as", "until", "while", "of", "at", "by", "for", "with", "about", "against",
    "between", "into", "through", "during", "before", "after", "above", "below", "to", "from",
    "up", "down", "in", "out", "on", "off", "over", "under", "again", "further", "then", "once",
    "here", "there", "when", "where", "why", "how", "all", "any", "both", "each", "few", "more",
    "most", "other", "some", "such", "no", "nor", "not", "only", "own", "same", "so", "than",
    "too", "very", "s", "t", "can", "will", "just", "don", "don't", "should", "should've",
    "now", "d", "ll", "m", "o", "re", "ve", "y", "ain", "aren", "aren't", "couldn", "couldn't",
    "didn", "didn't", "doesn", "doesn't", "hadn", "hadn't", "hasn", "hasn't", "haven",
    "haven't", "isn", "isn't", "ma", "mightn", "mightn't", "mustn", "mustn't", "needn",
    "needn't", "shan", "shan't", "shouldn", "shouldn't", "wasn", "wasn't", "weren", "weren't",
    "won", "won't", "wouldn", "wouldn't",
];

/// Stopwords used by TextFooler-style word swaps.
pub const ZI_TEXTFOOLER_STOPWORDS: &[&str] = &[
    "a", "about", "above", "across", "after", "afterwards", "again", "against", "ain", "all",
    "almost", "alone", "along", "already", "also", "although", "am", "among", "amongst", "an",
    "and", "another", "any", "anyhow", "anyone", "anything", "anyway", "anywhere", "are",
    "aren", "aren't", "around", "as", "at", "back", "been", "before", "beforehand", "behind",
    "being", "below", "beside", "besides", "between", "beyond", "both", "but", "by", "can",
    "cannot", "could", "couldn", "couldn't", "d", "didn", "didn't", "doesn", "doesn't", "don",
    "don't", "down", "due", "during", "either", "else", "elsewhere", "empty", "enough", "even",
    "ever", "everyone", "everything", "everywhere", "except", "first", "for", "former",
    "formerly", "from", "hadn", "hadn't", "hasn", "hasn't", "haven", "haven't", "he", "hence",
    "her", "here", "hereafter", "hereby", "herein", "hereupon", "hers", "herself", "him",
    "himself", "his", "how", "however", "hundred", "i", "if", "in", "indeed", "into", "is",
    "isn", "isn't", "it", "it's", "its", "itself", "just", "latter", "latterly", "least", "ll",
    "may", "me", "meanwhile", "mightn", "mightn't", "mine", "more", "moreover", "most",
    "mostly", "must", "mustn", "mustn't", "my", "myself", "namely", "needn", "needn't",
    "neither", "never", "nevertheless", "next", "no", "nobody", "none", "noone", "nor", "not",
    "nothing", "now", "nowhere", "o", "of", "off", "on", "once", "one", "only", "onto", "or",
    "other", "others", "otherwise", "our", "ours", "ourselves", "out", "over", "per", "please",
    "s", "same", "shan", "shan't", "she", "she's", "should've", "shouldn", "shouldn't",
    "somehow", "something", "sometime", "somewhere", "such", "t", "than", "that", "that'll",
    "the", "their", "theirs", "them", "themselves", "then", "thence", "there", "thereafter",
    "thereby", "therefore", "therein", "thereupon", "these", "they", "this", "those", "through",
    "throughout", "thru", "thus", "to", "too", "toward", "towards", "under", "unless", "until",
    "up", "upon", "used", "ve", "was", "wasn", "wasn't", "we", "were", "weren", "weren't",
    "what", "whatever", "when", "whence", "whenever", "where", "whereafter", "whereas",
    "whereby", "wherein", "whereupon", "wherever", "whether", "which", "while", "whither",
    "who", "whoever", "whole", "whom", "whose", "why", "with", "within", "without", "won",
    "won't", "would", "wouldn", "wouldn't", "y", "yet", "you", "you'd", "you'll", "you're",
    "you've", "your", "yours", "yourself", "yourselves",
];

/// Forbids modifying a word position twice.
#[derive(Debug, Default, Clone, Copy)]
pub struct ZiRepeatModification;

impl ZiPreTransformationConstraint for ZiRepeatModification {
    fn name(&self) -> &'static str {
        "repeat_modification"
    }

    fn filter_indices(&self, text: &ZiAttackedText) -> Result<BTreeSet<usize>> {
        let modified = text.modified_indices();
        Ok((0..text.num_words())
            .filter(|index| !modified.contains(index))
            .collect())
    }
}

/// Forbids modifying stopwords. Matching is case-insensitive.
#[derive(Debug, Clone)]
pub struct ZiStopwordModification {
    stopwords: HashSet<String>,
}

impl Default for ZiStopwordModification {
    fn default() -> Self {
        Self::from_words(ZI_DEFAULT_STOPWORDS.iter().copied())
    }
}

impl ZiStopwordModification {
    #[allow(non_snake_case)]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            stopwords: words
                .into_iter()
                .map(|word| word.as_ref().to_lowercase())
                .collect(),
        }
    }

    pub fn textfooler() -> Self {
        Self::from_words(ZI_TEXTFOOLER_STOPWORDS.iter().copied())
    }

    pub fn is_stopword(&self, word: &str) -> bool {
        self.stopwords.contains(&word.to_lowercase())
    }
}

impl ZiPreTransformationConstraint for ZiStopwordModification {
    fn name(&self) -> &'static str {
        "stopword_modification"
    }

    fn filter_indices(&self, text: &ZiAttackedText) -> Result<BTreeSet<usize>> {
        Ok(text
            .words()
            .iter()
            .enumerate()
            .filter(|(_, word)| !self.is_stopword(word))
            .map(|(index, _)| index)
            .collect())
    }
}

/// Forbids modifying words shorter than `min_length` characters.
#[derive(Debug, Clone, Copy)]
pub struct ZiMinWordLength {
    min_length: usize,
}

impl ZiMinWordLength {
    #[allow(non_snake_case)]
    pub fn new(min_length: usize) -> Self {
        Self { min_length }
    }
}

impl ZiPreTransformationConstraint for ZiMinWordLength {
    fn name(&self) -> &'static str {
        "min_word_length"
    }

    fn filter_indices(&self, text: &ZiAttackedText) -> Result<BTreeSet<usize>> {
        Ok(text
            .words()
            .iter()
            .enumerate()
            .filter(|(_, word)| word.chars().count() >= self.min_length)
            .map(|(index, _)| index)
            .collect())
    }
}

/// Protects whole columns of structured input. Applies only when the text's
/// column labels are exactly `matching_column_labels`.
#[derive(Debug, Clone)]
pub struct ZiInputColumnModification {
    matching_column_labels: Vec<String>,
    columns_to_ignore: BTreeSet<String>,
}

impl ZiInputColumnModification {
    #[allow(non_snake_case)]
    pub fn new<L, I>(matching_column_labels: L, columns_to_ignore: I) -> Self
    where
        L: IntoIterator,
        L::Item: Into<String>,
        I: IntoIterator,
        I::Item: Into<String>,
    {
        Self {
            matching_column_labels: matching_column_labels.into_iter().map(Into::into).collect(),
            columns_to_ignore: columns_to_ignore.into_iter().map(Into::into).collect(),
        }
    }
}

impl ZiPreTransformationConstraint for ZiInputColumnModification {
    fn name(&self) -> &'static str {
        "input_column_modification"
    }

    fn filter_indices(&self, text: &ZiAttackedText) -> Result<BTreeSet<usize>> {
        let labels = text.column_labels();
        let all = 0..text.num_words();
        if labels != self.matching_column_labels {
            return Ok(all.collect());
        }
        Ok(all
            .filter(|&index| {
                text.column_of_word(index)
                    .map(|label| !self.columns_to_ignore.contains(label))
                    .unwrap_or(false)
            })
            .collect())
    }
}
