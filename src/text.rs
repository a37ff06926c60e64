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

//! # Attacked Text Module
//!
//! [`ZiAttackedText`] is the unit every transformation and constraint works
//! on: a text split into words and the separators between them, together
//! with the history of which word positions have been changed since the
//! original input.
//!
//! ## Design Principles
//!
//! - **Lossless**: Separators (spaces, punctuation) are kept verbatim, so an
//!   unchanged text renders back to exactly its input
//! - **Persistent**: Every edit returns a new text; the parent is untouched
//! - **Index Bookkeeping**: Inserting or deleting words shifts the recorded
//!   modified positions so they keep pointing at the same words
//! - **Structured Inputs**: A text may have several labelled columns (for
//!   example `premise` and `hypothesis`); word indices run across all columns
//!
//! ## Usage Example
//!
//! ```rust
//! use ziaug::text::ZiAttackedText;
//!
//! let text = ZiAttackedText::new("The quick brown fox.");
//! let swapped = text.replace_word_at_index(1, "slow").unwrap();
//! assert_eq!(swapped.text(), "The slow brown fox.");
//! assert!(swapped.modified_indices().contains(&1));
//! ```

use std::collections::BTreeSet;
use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

use crate::errors::{Result, ZiError};

/// Label used for single-column inputs.
pub const ZI_DEFAULT_COLUMN: &str = "text";

static WORD_PATTERN: OnceLock<Regex> = OnceLock::new();

fn word_pattern() -> &'static Regex {
    WORD_PATTERN.get_or_init(|| Regex::new(r"[\w@*]+(?:['\-][\w@*]+)*").unwrap())
}

/// One labelled column: `gaps.len() == words.len() + 1` always holds.
#[derive(Clone, Debug, PartialEq, Eq)]
struct ZiTextColumn {
    label: String,
    words: Vec<String>,
    gaps: Vec<String>,
}

impl ZiTextColumn {
    fn parse(label: &str, text: &str) -> Self {
        let mut words = Vec::new();
        let mut gaps = Vec::new();
        let mut last = 0;
        for found in word_pattern().find_iter(text) {
            gaps.push(text[last..found.start()].to_string());
            words.push(found.as_str().to_string());
            last = found.end();
        }
        gaps.push(text[last..].to_string());

        ZiTextColumn {
            label: label.to_string(),
            words,
            gaps,
        }
    }

    fn render(&self) -> String {
        let mut out = String::with_capacity(
            self.words.iter().map(String::len).sum::<usize>()
                + self.gaps.iter().map(String::len).sum::<usize>(),
        );
        out.push_str(&self.gaps[0]);
        for (word, gap) in self.words.iter().zip(self.gaps.iter().skip(1)) {
            out.push_str(word);
            out.push_str(gap);
        }
        out
    }
}

/// Joins the separators around a deleted word.
fn merge_gaps(left: &str, right: &str, first: bool, last: bool) -> String {
    if first && last {
        format!("{}{}", left.trim_end(), right.trim_start())
    } else if first {
        format!("{}{}", left, right.trim_start())
    } else if last {
        format!("{}{}", left.trim_end(), right)
    } else if left.trim().is_empty() {
        right.to_string()
    } else if right.trim().is_empty() {
        left.to_string()
    } else {
        format!("{}{}", left.trim_end(), right.trim_start())
    }
}

/// Tokenized text with modification history.
#[derive(Clone, Debug)]
pub struct ZiAttackedText {
    columns: Vec<ZiTextColumn>,
    modified_indices: BTreeSet<usize>,
    newly_modified_indices: BTreeSet<usize>,
    deleted_words: usize,
}

impl PartialEq for ZiAttackedText {
    fn eq(&self, other: &Self) -> bool {
        self.columns == other.columns
    }
}

impl Eq for ZiAttackedText {}

impl fmt::Display for ZiAttackedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.printable_text())
    }
}

impl ZiAttackedText {
    /// Single-column text labelled [`ZI_DEFAULT_COLUMN`].
    pub fn new(text: &str) -> Self {
        Self::from_columns([(ZI_DEFAULT_COLUMN, text)])
    }

    /// Structured text with one entry per labelled column, in order.
    pub fn from_columns<I, L, T>(columns: I) -> Self
    where
        I: IntoIterator<Item = (L, T)>,
        L: AsRef<str>,
        T: AsRef<str>,
    {
        let mut parsed: Vec<ZiTextColumn> = columns
            .into_iter()
            .map(|(label, text)| ZiTextColumn::parse(label.as_ref(), text.as_ref()))
            .collect();
        if parsed.is_empty() {
            parsed.push(ZiTextColumn::parse(ZI_DEFAULT_COLUMN, ""));
        }

        ZiAttackedText {
            columns: parsed,
            modified_indices: BTreeSet::new(),
            newly_modified_indices: BTreeSet::new(),
            deleted_words: 0,
        }
    }

    pub fn words(&self) -> Vec<&str> {
        self.columns
            .iter()
            .flat_map(|column| column.words.iter().map(String::as_str))
            .collect()
    }

    pub fn num_words(&self) -> usize {
        self.columns.iter().map(|column| column.words.len()).sum()
    }

    pub fn word(&self, index: usize) -> Option<&str> {
        self.locate(index)
            .map(|(c, j)| self.columns[c].words[j].as_str())
    }

    pub fn column_labels(&self) -> Vec<&str> {
        self.columns.iter().map(|column| column.label.as_str()).collect()
    }

    /// Label of the column holding the word at `index`.
    pub fn column_of_word(&self, index: usize) -> Option<&str> {
        self.locate(index).map(|(c, _)| self.columns[c].label.as_str())
    }

    /// Rendered text of the named column.
    pub fn column_text(&self, label: &str) -> Option<String> {
        self.columns
            .iter()
            .find(|column| column.label == label)
            .map(ZiTextColumn::render)
    }

    /// All columns rendered and joined with a single space.
    pub fn text(&self) -> String {
        self.columns
            .iter()
            .map(ZiTextColumn::render)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// The bare text for single-column input, otherwise one
    /// `Label: value` line per column.
    pub fn printable_text(&self) -> String {
        if self.columns.len() == 1 && self.columns[0].label == ZI_DEFAULT_COLUMN {
            return self.columns[0].render();
        }

        self.columns
            .iter()
            .map(|column| {
                let mut chars = column.label.chars();
                let label = match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                };
                format!("{}: {}", label, column.render())
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Positions changed since the original text.
    pub fn modified_indices(&self) -> &BTreeSet<usize> {
        &self.modified_indices
    }

    /// Positions changed by the edit that produced this text.
    pub fn newly_modified_indices(&self) -> &BTreeSet<usize> {
        &self.newly_modified_indices
    }

    /// Number of word positions touched since the original, deletions included.
    pub fn words_perturbed(&self) -> usize {
        self.modified_indices.len() + self.deleted_words
    }

    pub fn replace_word_at_index(&self, index: usize, new_word: &str) -> Result<Self> {
        let mut next = self.child();
        next.replace_in_place(index, new_word)?;
        Ok(next)
    }

    /// Replaces several words at once; `indices` and `new_words` pair up.
    pub fn replace_words_at_indices(&self, indices: &[usize], new_words: &[String]) -> Result<Self> {
        if indices.len() != new_words.len() {
            return Err(ZiError::validation(format!(
                "cannot replace {} indices with {} words",
                indices.len(),
                new_words.len()
            )));
        }

        let mut pairs: Vec<(usize, &str)> = indices
            .iter()
            .copied()
            .zip(new_words.iter().map(String::as_str))
            .collect();
        // Highest index first so splits and deletions never move pending targets.
        pairs.sort_by(|a, b| b.0.cmp(&a.0));

        let mut next = self.child();
        for (index, word) in pairs {
            next.replace_in_place(index, word)?;
        }
        Ok(next)
    }

    pub fn delete_word_at_index(&self, index: usize) -> Result<Self> {
        let mut next = self.child();
        next.delete_in_place(index)?;
        Ok(next)
    }

    /// Replaces the words at `index` and `index + 1` with `merged`. Both words
    /// must belong to the same column.
    pub fn merge_words_at_index(&self, index: usize, merged: &str) -> Result<Self> {
        let (first, second) = match (self.locate(index), self.locate(index + 1)) {
            (Some(a), Some(b)) => (a, b),
            _ => {
                return Err(ZiError::validation(format!(
                    "cannot merge words {index} and {} of {} words",
                    index + 1,
                    self.num_words()
                )))
            }
        };
        if first.0 != second.0 {
            return Err(ZiError::validation("cannot merge words across columns"));
        }

        let mut next = self.child();
        next.delete_in_place(index + 1)?;
        next.replace_in_place(index, merged)?;
        Ok(next)
    }

    /// Inserts `text` (one or more words) before the word at `index`.
    /// `index == num_words()` appends after the last word.
    pub fn insert_text_before_word_index(&self, index: usize, text: &str) -> Result<Self> {
        let total = self.num_words();
        if index > total {
            return Err(ZiError::validation(format!(
                "insert position {index} out of range for {total} words"
            )));
        }

        let (column, local) = if index == total {
            let last = self.columns.len() - 1;
            (last, self.columns[last].words.len())
        } else {
            self.locate(index)
                .ok_or_else(|| ZiError::internal("word index lookup failed"))?
        };

        let mut next = self.child();
        next.insert_in_place(column, local, index, text)?;
        Ok(next)
    }

    /// Inserts `text` right after the word at `index`, in the same column.
    pub fn insert_text_after_word_index(&self, index: usize, text: &str) -> Result<Self> {
        let (column, local) = self.locate(index).ok_or_else(|| {
            ZiError::validation(format!(
                "word index {index} out of range for {} words",
                self.num_words()
            ))
        })?;

        let mut next = self.child();
        next.insert_in_place(column, local + 1, index + 1, text)?;
        Ok(next)
    }

    /// Up to `window_size` words centred on `index`, joined by spaces.
    pub fn text_window_around_index(&self, index: usize, window_size: usize) -> String {
        let words = self.words();
        let length = words.len();
        if length == 0 || window_size == 0 {
            return String::new();
        }
        if window_size >= length {
            return words.join(" ");
        }

        let index = index.min(length - 1);
        let before = (window_size - 1) / 2 + (window_size - 1) % 2;
        let after = (window_size - 1) / 2;

        let (start, end) = if index < before {
            (0, window_size - 1)
        } else if index + after >= length {
            (length - window_size, length - 1)
        } else {
            (index - before, index + after)
        };

        words[start..=end].join(" ")
    }

    fn child(&self) -> Self {
        let mut next = self.clone();
        next.newly_modified_indices.clear();
        next
    }

    fn locate(&self, index: usize) -> Option<(usize, usize)> {
        let mut offset = 0;
        for (c, column) in self.columns.iter().enumerate() {
            if index < offset + column.words.len() {
                return Some((c, index - offset));
            }
            offset += column.words.len();
        }
        None
    }

    fn out_of_range(&self, index: usize) -> ZiError {
        ZiError::validation(format!(
            "word index {index} out of range for {} words",
            self.num_words()
        ))
    }

    /// Moves every recorded index `>= from` by `delta`.
    fn shift_indices(&mut self, from: usize, delta: isize) {
        let shift = |set: &BTreeSet<usize>| -> BTreeSet<usize> {
            set.iter()
                .map(|&i| {
                    if i >= from {
                        (i as isize + delta) as usize
                    } else {
                        i
                    }
                })
                .collect()
        };
        self.modified_indices = shift(&self.modified_indices);
        self.newly_modified_indices = shift(&self.newly_modified_indices);
    }

    fn mark(&mut self, index: usize) {
        self.modified_indices.insert(index);
        self.newly_modified_indices.insert(index);
    }

    fn replace_in_place(&mut self, index: usize, new_word: &str) -> Result<()> {
        let pieces: Vec<&str> = new_word.split_whitespace().collect();
        if pieces.is_empty() {
            return self.delete_in_place(index);
        }

        let (c, j) = self.locate(index).ok_or_else(|| self.out_of_range(index))?;
        let extra = pieces.len() - 1;

        let column = &mut self.columns[c];
        column.words[j] = pieces[0].to_string();
        for (k, piece) in pieces.iter().skip(1).enumerate() {
            column.words.insert(j + 1 + k, piece.to_string());
            column.gaps.insert(j + 1 + k, " ".to_string());
        }

        if extra > 0 {
            self.shift_indices(index + 1, extra as isize);
        }
        for i in index..=index + extra {
            self.mark(i);
        }
        Ok(())
    }

    fn delete_in_place(&mut self, index: usize) -> Result<()> {
        let (c, j) = self.locate(index).ok_or_else(|| self.out_of_range(index))?;

        let column = &mut self.columns[c];
        let n = column.words.len();
        let merged = merge_gaps(&column.gaps[j], &column.gaps[j + 1], j == 0, j + 1 == n);
        column.words.remove(j);
        column.gaps[j] = merged;
        column.gaps.remove(j + 1);

        self.modified_indices.remove(&index);
        self.newly_modified_indices.remove(&index);
        self.shift_indices(index + 1, -1);
        self.deleted_words += 1;
        Ok(())
    }

    fn insert_in_place(&mut self, c: usize, local: usize, index: usize, text: &str) -> Result<()> {
        let pieces: Vec<&str> = text.split_whitespace().collect();
        if pieces.is_empty() {
            return Err(ZiError::validation("cannot insert empty text"));
        }

        let column = &mut self.columns[c];
        for (k, piece) in pieces.iter().enumerate() {
            let position = local + k;
            if position < column.words.len() {
                column.words.insert(position, piece.to_string());
                column.gaps.insert(position + 1, " ".to_string());
            } else if column.words.is_empty() {
                column.words.push(piece.to_string());
                column.gaps.push(String::new());
            } else {
                let suffix_at = column.words.len();
                column.words.push(piece.to_string());
                column.gaps.insert(suffix_at, " ".to_string());
            }
        }

        self.shift_indices(index, pieces.len() as isize);
        for i in index..index + pieces.len() {
            self.mark(i);
        }
        Ok(())
    }
}
