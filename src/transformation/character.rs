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

//! # Character Transformations
//!
//! Typo-style perturbations inside a single word. Every transformation
//! honours [`ZiCharacterEditOptions`]:
//!
//! - `random_one`: emit one candidate per word at a random position instead
//!   of one per position
//! - `skip_first_char` / `skip_last_char`: never edit the word boundaries

use std::collections::{BTreeSet, HashMap};
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::errors::{Result, ZiError};
use crate::rng::ZiRng;
use crate::text::ZiAttackedText;
use crate::transformation::ZiTransform;

const ZI_ASCII_LETTERS: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

const ZI_KEYBOARD_ROWS: [&str; 3] = ["qwertyuiop", "asdfghjkl", "zxcvbnm"];

const ZI_HOMOGLYPHS: &[(char, char)] = &[
    ('-', '˗'),
    ('9', '৭'),
    ('8', 'Ȣ'),
    ('7', '𝟕'),
    ('6', 'б'),
    ('5', 'Ƽ'),
    ('4', 'Ꮞ'),
    ('3', 'Ʒ'),
    ('2', 'ᒿ'),
    ('1', 'l'),
    ('0', 'O'),
    ('\'', '`'),
    ('a', 'ɑ'),
    ('b', 'Ь'),
    ('c', 'ϲ'),
    ('d', 'ԁ'),
    ('e', 'е'),
    ('f', '𝚏'),
    ('g', 'ɡ'),
    ('h', 'հ'),
    ('i', 'і'),
    ('j', 'ϳ'),
    ('k', '𝒌'),
    ('l', 'ⅼ'),
    ('m', 'ｍ'),
    ('n', 'ո'),
    ('o', 'о'),
    ('p', 'р'),
    ('q', 'ԛ'),
    ('r', 'ⲅ'),
    ('s', 'ѕ'),
    ('t', '𝚝'),
    ('u', 'ս'),
    ('v', 'ѵ'),
    ('w', 'ԝ'),
    ('x', '×'),
    ('y', 'у'),
    ('z', 'ᴢ'),
];

/// Position options shared by the character transformations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZiCharacterEditOptions {
    pub random_one: bool,
    pub skip_first_char: bool,
    pub skip_last_char: bool,
}

impl Default for ZiCharacterEditOptions {
    fn default() -> Self {
        Self {
            random_one: true,
            skip_first_char: false,
            skip_last_char: false,
        }
    }
}

impl ZiCharacterEditOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn random_one(mut self, enabled: bool) -> Self {
        self.random_one = enabled;
        self
    }

    pub fn skip_first_char(mut self, enabled: bool) -> Self {
        self.skip_first_char = enabled;
        self
    }

    pub fn skip_last_char(mut self, enabled: bool) -> Self {
        self.skip_last_char = enabled;
        self
    }

    /// Editable positions `start..end` given the exclusive upper bound used
    /// when the last character is not skipped.
    fn span(&self, len: usize, end_if_kept: usize) -> Option<(usize, usize)> {
        let start = usize::from(self.skip_first_char);
        let end = if self.skip_last_char {
            end_if_kept.saturating_sub(1)
        } else {
            end_if_kept
        };
        if len == 0 || start >= end {
            None
        } else {
            Some((start, end))
        }
    }

    /// Positions to edit: one random position or all of them.
    fn positions(&self, start: usize, end: usize, rng: &ZiRng) -> Vec<usize> {
        if self.random_one {
            vec![start + rng.index(end - start)]
        } else {
            (start..end).collect()
        }
    }
}

fn random_letter(letters: &[char], rng: &ZiRng) -> char {
    rng.choose(letters).copied().unwrap_or('a')
}

/// Applies a per-word edit function at every eligible index.
fn character_candidates<F>(
    text: &ZiAttackedText,
    indices: &BTreeSet<usize>,
    mut edit: F,
) -> Result<Vec<ZiAttackedText>>
where
    F: FnMut(&[char]) -> Vec<String>,
{
    let mut candidates = Vec::new();
    for &index in indices {
        let Some(word) = text.word(index) else {
            continue;
        };
        let chars: Vec<char> = word.chars().collect();
        let mut seen = BTreeSet::new();
        for new_word in edit(&chars) {
            if new_word == word || !seen.insert(new_word.clone()) {
                continue;
            }
            candidates.push(text.replace_word_at_index(index, &new_word)?);
        }
    }
    Ok(candidates)
}

/// Swaps two adjacent characters.
#[derive(Debug, Default)]
pub struct ZiWordSwapNeighboringCharacterSwap {
    options: ZiCharacterEditOptions,
}

impl ZiWordSwapNeighboringCharacterSwap {
    pub fn new(options: ZiCharacterEditOptions) -> Self {
        Self { options }
    }
}

impl ZiTransform for ZiWordSwapNeighboringCharacterSwap {
    fn name(&self) -> &'static str {
        "char.swap_neighboring"
    }

    fn apply(
        &self,
        text: &ZiAttackedText,
        indices: &BTreeSet<usize>,
        rng: &ZiRng,
    ) -> Result<Vec<ZiAttackedText>> {
        character_candidates(text, indices, |chars| {
            // Position i swaps characters i and i + 1.
            let Some((start, end)) = self.options.span(chars.len(), chars.len().saturating_sub(1))
            else {
                return Vec::new();
            };
            self.options
                .positions(start, end, rng)
                .into_iter()
                .map(|i| {
                    let mut edited = chars.to_vec();
                    edited.swap(i, i + 1);
                    edited.into_iter().collect()
                })
                .collect()
        })
    }
}

/// Replaces one character with a random letter.
#[derive(Debug, Default)]
pub struct ZiWordSwapRandomCharacterSubstitution {
    options: ZiCharacterEditOptions,
}

impl ZiWordSwapRandomCharacterSubstitution {
    pub fn new(options: ZiCharacterEditOptions) -> Self {
        Self { options }
    }
}

impl ZiTransform for ZiWordSwapRandomCharacterSubstitution {
    fn name(&self) -> &'static str {
        "char.random_substitution"
    }

    fn apply(
        &self,
        text: &ZiAttackedText,
        indices: &BTreeSet<usize>,
        rng: &ZiRng,
    ) -> Result<Vec<ZiAttackedText>> {
        let letters: Vec<char> = ZI_ASCII_LETTERS.chars().collect();
        character_candidates(text, indices, |chars| {
            let Some((start, end)) = self.options.span(chars.len(), chars.len()) else {
                return Vec::new();
            };
            self.options
                .positions(start, end, rng)
                .into_iter()
                .map(|i| {
                    let mut edited = chars.to_vec();
                    edited[i] = random_letter(&letters, rng);
                    edited.into_iter().collect()
                })
                .collect()
        })
    }
}

/// Deletes one character.
#[derive(Debug, Default)]
pub struct ZiWordSwapRandomCharacterDeletion {
    options: ZiCharacterEditOptions,
}

impl ZiWordSwapRandomCharacterDeletion {
    pub fn new(options: ZiCharacterEditOptions) -> Self {
        Self { options }
    }
}

impl ZiTransform for ZiWordSwapRandomCharacterDeletion {
    fn name(&self) -> &'static str {
        "char.random_deletion"
    }

    fn apply(
        &self,
        text: &ZiAttackedText,
        indices: &BTreeSet<usize>,
        rng: &ZiRng,
    ) -> Result<Vec<ZiAttackedText>> {
        character_candidates(text, indices, |chars| {
            if chars.len() <= 1 {
                return Vec::new();
            }
            let Some((start, end)) = self.options.span(chars.len(), chars.len()) else {
                return Vec::new();
            };
            self.options
                .positions(start, end, rng)
                .into_iter()
                .map(|i| {
                    chars
                        .iter()
                        .enumerate()
                        .filter(|(j, _)| *j != i)
                        .map(|(_, c)| *c)
                        .collect()
                })
                .collect()
        })
    }
}

/// Inserts a random character from `letters_to_insert`.
#[derive(Debug)]
pub struct ZiWordSwapRandomCharacterInsertion {
    options: ZiCharacterEditOptions,
    letters: Vec<char>,
}

impl Default for ZiWordSwapRandomCharacterInsertion {
    fn default() -> Self {
        Self {
            options: ZiCharacterEditOptions::default(),
            letters: ZI_ASCII_LETTERS.chars().collect(),
        }
    }
}

impl ZiWordSwapRandomCharacterInsertion {
    pub fn new(options: ZiCharacterEditOptions) -> Self {
        Self {
            options,
            ..Default::default()
        }
    }

    /// Restricts insertions to the given characters (for example `" "`).
    #[allow(non_snake_case)]
    pub fn with_letters(options: ZiCharacterEditOptions, letters_to_insert: &str) -> Result<Self> {
        let letters: Vec<char> = letters_to_insert.chars().collect();
        if letters.is_empty() {
            return Err(ZiError::validation(
                "char.random_insertion 'letters_to_insert' may not be empty",
            ));
        }
        Ok(Self { options, letters })
    }
}

impl ZiTransform for ZiWordSwapRandomCharacterInsertion {
    fn name(&self) -> &'static str {
        "char.random_insertion"
    }

    fn apply(
        &self,
        text: &ZiAttackedText,
        indices: &BTreeSet<usize>,
        rng: &ZiRng,
    ) -> Result<Vec<ZiAttackedText>> {
        character_candidates(text, indices, |chars| {
            let Some((start, end)) = self.options.span(chars.len(), chars.len()) else {
                return Vec::new();
            };
            self.options
                .positions(start, end, rng)
                .into_iter()
                .map(|i| {
                    let mut edited = chars.to_vec();
                    edited.insert(i, random_letter(&self.letters, rng));
                    edited.into_iter().collect()
                })
                .collect()
        })
    }
}

fn keyboard_neighbours() -> &'static HashMap<char, Vec<char>> {
    static NEIGHBOURS: OnceLock<HashMap<char, Vec<char>>> = OnceLock::new();
    NEIGHBOURS.get_or_init(|| {
        let grid: Vec<Vec<char>> = ZI_KEYBOARD_ROWS.iter().map(|row| row.chars().collect()).collect();
        let mut map = HashMap::new();
        for (r, row) in grid.iter().enumerate() {
            for (c, key) in row.iter().enumerate() {
                let mut adjacent = Vec::new();
                for dr in -1i32..=1 {
                    for dc in -1i32..=1 {
                        if dr == 0 && dc == 0 {
                            continue;
                        }
                        let (nr, nc) = (r as i32 + dr, c as i32 + dc);
                        if nr < 0 || nc < 0 {
                            continue;
                        }
                        if let Some(neighbour) = grid
                            .get(nr as usize)
                            .and_then(|other| other.get(nc as usize))
                        {
                            adjacent.push(*neighbour);
                        }
                    }
                }
                map.insert(*key, adjacent);
            }
        }
        map
    })
}

/// Replaces a character with a neighbouring key on a QWERTY keyboard.
#[derive(Debug, Default)]
pub struct ZiWordSwapQwerty {
    options: ZiCharacterEditOptions,
}

impl ZiWordSwapQwerty {
    pub fn new(options: ZiCharacterEditOptions) -> Self {
        Self { options }
    }

    fn adjacent(ch: char) -> Vec<char> {
        let lower = ch.to_ascii_lowercase();
        let keys = keyboard_neighbours().get(&lower).cloned().unwrap_or_default();
        if ch.is_ascii_uppercase() {
            keys.into_iter().map(|k| k.to_ascii_uppercase()).collect()
        } else {
            keys
        }
    }
}

impl ZiTransform for ZiWordSwapQwerty {
    fn name(&self) -> &'static str {
        "char.qwerty"
    }

    fn apply(
        &self,
        text: &ZiAttackedText,
        indices: &BTreeSet<usize>,
        rng: &ZiRng,
    ) -> Result<Vec<ZiAttackedText>> {
        character_candidates(text, indices, |chars| {
            let Some((start, end)) = self.options.span(chars.len(), chars.len()) else {
                return Vec::new();
            };

            let replace = |i: usize, key: char| -> String {
                let mut edited = chars.to_vec();
                edited[i] = key;
                edited.into_iter().collect()
            };

            if self.options.random_one {
                let i = start + rng.index(end - start);
                return rng
                    .choose(&Self::adjacent(chars[i]))
                    .map(|&key| vec![replace(i, key)])
                    .unwrap_or_default();
            }

            (start..end)
                .flat_map(|i| {
                    Self::adjacent(chars[i])
                        .into_iter()
                        .map(move |key| (i, key))
                })
                .map(|(i, key)| replace(i, key))
                .collect()
        })
    }
}

/// Replaces characters with visually similar Unicode characters.
#[derive(Debug, Default)]
pub struct ZiWordSwapHomoglyphSwap {
    random_one: bool,
}

impl ZiWordSwapHomoglyphSwap {
    pub fn new(random_one: bool) -> Self {
        Self { random_one }
    }

    fn homoglyph(ch: char) -> Option<char> {
        ZI_HOMOGLYPHS
            .iter()
            .find(|(plain, _)| *plain == ch)
            .map(|(_, glyph)| *glyph)
    }
}

impl ZiTransform for ZiWordSwapHomoglyphSwap {
    fn name(&self) -> &'static str {
        "char.homoglyph"
    }

    fn apply(
        &self,
        text: &ZiAttackedText,
        indices: &BTreeSet<usize>,
        rng: &ZiRng,
    ) -> Result<Vec<ZiAttackedText>> {
        character_candidates(text, indices, |chars| {
            let positions: Vec<(usize, char)> = chars
                .iter()
                .enumerate()
                .filter_map(|(i, ch)| Self::homoglyph(*ch).map(|glyph| (i, glyph)))
                .collect();

            let chosen: Vec<(usize, char)> = if self.random_one {
                rng.choose(&positions).copied().into_iter().collect()
            } else {
                positions
            };

            chosen
                .into_iter()
                .map(|(i, glyph)| {
                    let mut edited = chars.to_vec();
                    edited[i] = glyph;
                    edited.into_iter().collect()
                })
                .collect()
        })
    }
}
