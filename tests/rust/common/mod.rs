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

//! Small deterministic stand-ins for the model-backed capabilities.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use ziaug::errors::Result;
use ziaug::resources::{
    ZiEmbeddingTable, ZiLexiconTagger, ZiMaskedLanguageModel, ZiSentenceEncoder,
    ZiSynonymTable, ZiTokenScore, ZiTranslator,
};

/// Always proposes the same ranked fillers.
#[derive(Debug)]
pub struct FakeMaskedLm {
    pub fillers: Vec<(&'static str, f64)>,
}

impl ZiMaskedLanguageModel for FakeMaskedLm {
    fn name(&self) -> &str {
        "fake-mlm"
    }

    fn fill_mask(&self, masked_text: &str, max_candidates: usize) -> Result<Vec<ZiTokenScore>> {
        assert!(masked_text.contains(self.mask_token()));
        Ok(self
            .fillers
            .iter()
            .take(max_candidates)
            .map(|(token, probability)| ZiTokenScore {
                token: token.to_string(),
                probability: *probability,
            })
            .collect())
    }
}

/// Letter-frequency vectors: texts sharing most letters look similar.
#[derive(Debug, Default)]
pub struct LetterEncoder;

impl ZiSentenceEncoder for LetterEncoder {
    fn encode(&self, sentences: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(sentences
            .iter()
            .map(|sentence| {
                let mut vector = vec![0.0_f32; 26];
                for c in sentence.to_lowercase().chars() {
                    if c.is_ascii_lowercase() {
                        vector[(c as u8 - b'a') as usize] += 1.0;
                    }
                }
                vector
            })
            .collect())
    }
}

/// "Translates" by tagging the text with the language code; translating back
/// to English strips the tags and rewrites `movie` as `film`.
#[derive(Debug, Default)]
pub struct TagTranslator;

impl ZiTranslator for TagTranslator {
    fn supported_languages(&self) -> Vec<String> {
        ["en", "de", "fr", "es", "it", "ja", "ru"]
            .iter()
            .map(|lang| lang.to_string())
            .collect()
    }

    fn translate(&self, text: &str, _source_lang: &str, target_lang: &str) -> Result<String> {
        if target_lang != "en" {
            return Ok(format!("{target_lang}| {text}"));
        }
        let mut current = text;
        while let Some((prefix, rest)) = current.split_once("| ") {
            if prefix.len() != 2 {
                break;
            }
            current = rest;
        }
        Ok(current.replace("movie", "film"))
    }
}

pub fn synonyms() -> Arc<ZiSynonymTable> {
    let mut map = HashMap::new();
    map.insert("quick".to_string(), vec!["fast".to_string(), "speedy".to_string()]);
    map.insert("brown".to_string(), vec!["tan".to_string()]);
    map.insert("fox".to_string(), vec!["vixen".to_string()]);
    map.insert("jumps".to_string(), vec!["leaps".to_string(), "bounds".to_string()]);
    map.insert("lazy".to_string(), vec!["idle".to_string()]);
    map.insert("dog".to_string(), vec!["hound".to_string(), "canine".to_string()]);
    Arc::new(ZiSynonymTable::from_map(map))
}

pub fn embedding() -> Arc<ZiEmbeddingTable> {
    Arc::new(
        ZiEmbeddingTable::from_vectors(vec![
            ("good", vec![1.0, 0.0, 0.0]),
            ("great", vec![0.95, 0.1, 0.0]),
            ("fine", vec![0.9, 0.2, 0.1]),
            ("bad", vec![-1.0, 0.0, 0.0]),
            ("movie", vec![0.0, 1.0, 0.0]),
            ("film", vec![0.0, 0.97, 0.1]),
            ("actor", vec![0.0, 0.0, 1.0]),
        ])
        .unwrap(),
    )
}

pub fn tagger() -> Arc<ZiLexiconTagger> {
    let mut tagger = ZiLexiconTagger::new();
    for (word, tag) in [
        ("good", "ADJ"),
        ("great", "ADJ"),
        ("fine", "ADJ"),
        ("bad", "ADJ"),
        ("movie", "NOUN"),
        ("film", "NOUN"),
        ("actor", "NOUN"),
    ] {
        tagger.add(word, tag);
    }
    Arc::new(tagger)
}
