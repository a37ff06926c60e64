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

//! # CheckList Transformations
//!
//! Invariance-style perturbations after Ribeiro et al. (2020): change a
//! number, a person's name or a location, and expand or contract English
//! contractions. Names and locations are recognised with small built-in
//! lexicons of capitalised single words.

use std::collections::{BTreeSet, HashMap};
use std::sync::OnceLock;

use crate::errors::{Result, ZiError};
use crate::rng::ZiRng;
use crate::text::ZiAttackedText;
use crate::transformation::word::recover_word_case;
use crate::transformation::ZiTransform;

const ZI_CONTRACTIONS: &[(&str, &str)] = &[
    ("aren't", "are not"),
    ("can't", "cannot"),
    ("couldn't", "could not"),
    ("didn't", "did not"),
    ("doesn't", "does not"),
    ("don't", "do not"),
    ("hadn't", "had not"),
    ("hasn't", "has not"),
    ("haven't", "have not"),
    ("he'd", "he would"),
    ("he'll", "he will"),
    ("he's", "he is"),
    ("how'd", "how did"),
    ("how'll", "how will"),
    ("how's", "how is"),
    ("i'd", "i would"),
    ("i'll", "i will"),
    ("i'm", "i am"),
    ("i've", "i have"),
    ("isn't", "is not"),
    ("it'd", "it would"),
    ("it'll", "it will"),
    ("it's", "it is"),
    ("let's", "let us"),
    ("mightn't", "might not"),
    ("mustn't", "must not"),
    ("shan't", "shall not"),
    ("she'd", "she would"),
    ("she'll", "she will"),
    ("she's", "she is"),
    ("shouldn't", "should not"),
    ("that'd", "that would"),
    ("that's", "that is"),
    ("there's", "there is"),
    ("they'd", "they would"),
    ("they'll", "they will"),
    ("they're", "they are"),
    ("they've", "they have"),
    ("wasn't", "was not"),
    ("we'd", "we would"),
    ("we'll", "we will"),
    ("we're", "we are"),
    ("we've", "we have"),
    ("weren't", "were not"),
    ("what're", "what are"),
    ("what's", "what is"),
    ("where'd", "where did"),
    ("where's", "where is"),
    ("who'll", "who will"),
    ("who's", "who is"),
    ("who've", "who have"),
    ("won't", "will not"),
    ("wouldn't", "would not"),
    ("you'd", "you would"),
    ("you'll", "you will"),
    ("you're", "you are"),
    ("you've", "you have"),
];

const ZI_FIRST_NAMES: &[&str] = &[
    "Alice", "Amelia", "Andrew", "Anna", "Benjamin", "Charlotte", "Daniel", "David", "Emily",
    "Emma", "Ethan", "Grace", "Hannah", "Henry", "Isabella", "Jack", "James", "John", "Laura",
    "Liam", "Lucas", "Maria", "Mary", "Michael", "Noah", "Olivia", "Robert", "Sarah", "Sophia",
    "Thomas", "William",
];

const ZI_LAST_NAMES: &[&str] = &[
    "Anderson", "Brown", "Clark", "Davis", "Garcia", "Harris", "Jackson", "Johnson", "Jones",
    "Lewis", "Martin", "Martinez", "Miller", "Moore", "Robinson", "Smith", "Taylor", "Thomas",
    "Thompson", "Walker", "White", "Williams", "Wilson",
];

const ZI_LOCATIONS: &[&str] = &[
    "Amsterdam", "Athens", "Bangkok", "Barcelona", "Beijing", "Berlin", "Boston", "Brazil",
    "Cairo", "Canada", "Chicago", "China", "Dublin", "Egypt", "France", "Germany", "India",
    "Italy", "Japan", "Kenya", "Lisbon", "London", "Madrid", "Mexico", "Moscow", "Nairobi",
    "Paris", "Peru", "Rome", "Seattle", "Spain", "Sydney", "Tokyo", "Toronto", "Vienna",
];

fn extension_map() -> &'static HashMap<&'static str, &'static str> {
    static MAP: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
    MAP.get_or_init(|| ZI_CONTRACTIONS.iter().copied().collect())
}

fn contraction_map() -> &'static HashMap<&'static str, &'static str> {
    static MAP: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
    MAP.get_or_init(|| {
        let mut map = HashMap::new();
        for (short, long) in ZI_CONTRACTIONS {
            if long.contains(' ') {
                map.entry(*long).or_insert(*short);
            }
        }
        map
    })
}

/// Capitalises the first letter of `word` when `reference` starts upper-case.
fn match_leading_case(word: &str, reference: &str) -> String {
    let upper = reference.chars().next().map(char::is_uppercase).unwrap_or(false);
    if !upper {
        return word.to_string();
    }
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Replaces numbers with nearby random numbers.
#[derive(Debug)]
pub struct ZiWordSwapChangeNumber {
    max_change: f64,
    n: usize,
}

impl Default for ZiWordSwapChangeNumber {
    fn default() -> Self {
        Self {
            max_change: 1.0,
            n: 3,
        }
    }
}

impl ZiWordSwapChangeNumber {
    #[allow(non_snake_case)]
    pub fn new(max_change: f64, n: usize) -> Result<Self> {
        if !max_change.is_finite() || max_change < 0.0 {
            return Err(ZiError::validation(
                "checklist.change_number 'max_change' must be non-negative",
            ));
        }
        if n == 0 {
            return Err(ZiError::validation("checklist.change_number 'n' must be positive"));
        }
        Ok(Self { max_change, n })
    }

    fn alter_integer(&self, num: i64, rng: &ZiRng) -> Vec<String> {
        // Bounds are computed in i128 and clamped back to the i64 range.
        let wide = i128::from(num);
        let change = ((wide.abs() as f64 * self.max_change) as i128).saturating_add(1);
        let (low, high) = if wide >= 0 {
            ((wide - change).max(1), wide.saturating_add(change) - 1)
        } else {
            (wide.saturating_sub(change), (wide + change).min(0) - 1)
        };
        let low = low.clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64;
        let high = high.clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64;

        let mut out = Vec::new();
        for _ in 0..self.n {
            let value = rng.range_inclusive(low, high);
            let formatted = value.to_string();
            if value != num && !out.contains(&formatted) {
                out.push(formatted);
            }
        }
        out
    }

    fn alter_float(&self, word: &str, num: f64, rng: &ZiRng) -> Vec<String> {
        let decimals = word.split('.').nth(1).map(str::len).unwrap_or(0);
        let change = num.abs() * self.max_change + 1.0;
        let low = if num >= 0.0 { (num - change).max(0.0) } else { num - change };
        let high = if num >= 0.0 { num + change } else { (num + change).min(0.0) };

        let mut out = Vec::new();
        for _ in 0..self.n {
            let formatted = format!("{:.*}", decimals, rng.range_f64(low, high));
            if formatted != word && !out.contains(&formatted) {
                out.push(formatted);
            }
        }
        out
    }
}

impl ZiTransform for ZiWordSwapChangeNumber {
    fn name(&self) -> &'static str {
        "checklist.change_number"
    }

    fn apply(
        &self,
        text: &ZiAttackedText,
        indices: &BTreeSet<usize>,
        rng: &ZiRng,
    ) -> Result<Vec<ZiAttackedText>> {
        let mut candidates = Vec::new();
        for &index in indices {
            let Some(word) = text.word(index) else {
                continue;
            };
            let replacements = if let Ok(num) = word.parse::<i64>() {
                self.alter_integer(num, rng)
            } else if word.contains('.') {
                match word.parse::<f64>() {
                    Ok(num) if num.is_finite() => self.alter_float(word, num, rng),
                    _ => Vec::new(),
                }
            } else {
                Vec::new()
            };
            for replacement in replacements {
                candidates.push(text.replace_word_at_index(index, &replacement)?);
            }
        }
        Ok(candidates)
    }
}

/// Draws up to `n` replacements for `word` from `pool`, skipping the word.
fn swap_from_lexicon(
    text: &ZiAttackedText,
    indices: &BTreeSet<usize>,
    n: usize,
    rng: &ZiRng,
    pool_for: impl Fn(&str) -> Option<&'static [&'static str]>,
) -> Result<Vec<ZiAttackedText>> {
    let mut candidates = Vec::new();
    for &index in indices {
        let Some(word) = text.word(index) else {
            continue;
        };
        let Some(pool) = pool_for(word) else {
            continue;
        };
        let others: Vec<&str> = pool.iter().copied().filter(|name| *name != word).collect();
        for replacement in rng.sample(&others, n) {
            candidates.push(text.replace_word_at_index(index, replacement)?);
        }
    }
    Ok(candidates)
}

/// Replaces recognised first or last names with other names.
#[derive(Debug)]
pub struct ZiWordSwapChangeName {
    n: usize,
    first_only: bool,
    last_only: bool,
}

impl Default for ZiWordSwapChangeName {
    fn default() -> Self {
        Self {
            n: 3,
            first_only: false,
            last_only: false,
        }
    }
}

impl ZiWordSwapChangeName {
    #[allow(non_snake_case)]
    pub fn new(n: usize, first_only: bool, last_only: bool) -> Result<Self> {
        if n == 0 {
            return Err(ZiError::validation("checklist.change_name 'n' must be positive"));
        }
        if first_only && last_only {
            return Err(ZiError::validation(
                "checklist.change_name cannot be both first_only and last_only",
            ));
        }
        Ok(Self {
            n,
            first_only,
            last_only,
        })
    }
}

impl ZiTransform for ZiWordSwapChangeName {
    fn name(&self) -> &'static str {
        "checklist.change_name"
    }

    fn apply(
        &self,
        text: &ZiAttackedText,
        indices: &BTreeSet<usize>,
        rng: &ZiRng,
    ) -> Result<Vec<ZiAttackedText>> {
        swap_from_lexicon(text, indices, self.n, rng, |word| {
            if !self.last_only && ZI_FIRST_NAMES.contains(&word) {
                Some(ZI_FIRST_NAMES)
            } else if !self.first_only && ZI_LAST_NAMES.contains(&word) {
                Some(ZI_LAST_NAMES)
            } else {
                None
            }
        })
    }
}

/// Replaces recognised cities and countries with other locations.
#[derive(Debug)]
pub struct ZiWordSwapChangeLocation {
    n: usize,
}

impl Default for ZiWordSwapChangeLocation {
    fn default() -> Self {
        Self { n: 3 }
    }
}

impl ZiWordSwapChangeLocation {
    #[allow(non_snake_case)]
    pub fn new(n: usize) -> Result<Self> {
        if n == 0 {
            return Err(ZiError::validation("checklist.change_location 'n' must be positive"));
        }
        Ok(Self { n })
    }
}

impl ZiTransform for ZiWordSwapChangeLocation {
    fn name(&self) -> &'static str {
        "checklist.change_location"
    }

    fn apply(
        &self,
        text: &ZiAttackedText,
        indices: &BTreeSet<usize>,
        rng: &ZiRng,
    ) -> Result<Vec<ZiAttackedText>> {
        swap_from_lexicon(text, indices, self.n, rng, |word| {
            ZI_LOCATIONS.contains(&word).then_some(ZI_LOCATIONS)
        })
    }
}

/// Expands contractions (`don't` to `do not`).
#[derive(Debug, Default)]
pub struct ZiWordSwapExtend;

impl ZiTransform for ZiWordSwapExtend {
    fn name(&self) -> &'static str {
        "checklist.extend"
    }

    fn apply(
        &self,
        text: &ZiAttackedText,
        indices: &BTreeSet<usize>,
        _rng: &ZiRng,
    ) -> Result<Vec<ZiAttackedText>> {
        let mut candidates = Vec::new();
        for &index in indices {
            let Some(word) = text.word(index) else {
                continue;
            };
            let Some(expanded) = extension_map().get(word.to_lowercase().as_str()) else {
                continue;
            };
            let expanded = if word.to_lowercase().starts_with("i'") {
                match_leading_case(expanded, "I")
            } else {
                match_leading_case(expanded, word)
            };
            candidates.push(text.replace_word_at_index(index, &expanded)?);
        }
        Ok(candidates)
    }
}

/// Contracts two-word phrases (`do not` to `don't`).
#[derive(Debug, Default)]
pub struct ZiWordSwapContract;

impl ZiTransform for ZiWordSwapContract {
    fn name(&self) -> &'static str {
        "checklist.contract"
    }

    fn apply(
        &self,
        text: &ZiAttackedText,
        indices: &BTreeSet<usize>,
        _rng: &ZiRng,
    ) -> Result<Vec<ZiAttackedText>> {
        let words = text.words();
        let mut candidates = Vec::new();

        for &index in indices {
            if !indices.contains(&(index + 1)) || index + 1 >= words.len() {
                continue;
            }
            if text.column_of_word(index) != text.column_of_word(index + 1) {
                continue;
            }
            let phrase = format!("{} {}", words[index], words[index + 1]).to_lowercase();
            let Some(short) = contraction_map().get(phrase.as_str()) else {
                continue;
            };
            let contracted = if short.starts_with("i'") {
                match_leading_case(short, "I")
            } else {
                recover_word_case(short, words[index])
            };
            candidates.push(text.merge_words_at_index(index, &contracted)?);
        }
        Ok(candidates)
    }
}
