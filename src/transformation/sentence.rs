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

//! # Sentence Transformations
//!
//! Back-translation: the text is translated out of its source language and
//! back again through an injected [`ZiTranslator`]. In chained mode the text
//! travels through several randomly chosen languages before returning.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::errors::{Result, ZiError};
use crate::resources::ZiTranslator;
use crate::rng::ZiRng;
use crate::text::ZiAttackedText;
use crate::transformation::ZiTransform;

/// Paraphrases whole texts by round-trip translation.
#[derive(Debug)]
pub struct ZiBackTranslation {
    translator: Arc<dyn ZiTranslator>,
    src_lang: String,
    target_lang: String,
    chained_back_translation: usize,
}

impl ZiBackTranslation {
    /// `chained_back_translation == 0` performs a single round trip through
    /// `target_lang`; otherwise that many distinct languages are sampled from
    /// the translator and visited in turn.
    #[allow(non_snake_case)]
    pub fn new(
        translator: Arc<dyn ZiTranslator>,
        src_lang: &str,
        target_lang: &str,
        chained_back_translation: usize,
    ) -> Result<Self> {
        if src_lang.trim().is_empty() || target_lang.trim().is_empty() {
            return Err(ZiError::validation(
                "sentence.back_translation languages must not be empty",
            ));
        }
        if chained_back_translation == 0 && src_lang == target_lang {
            return Err(ZiError::validation(
                "sentence.back_translation target language must differ from the source",
            ));
        }
        Ok(Self {
            translator,
            src_lang: src_lang.to_string(),
            target_lang: target_lang.to_string(),
            chained_back_translation,
        })
    }

    fn route(&self, rng: &ZiRng) -> Result<Vec<String>> {
        if self.chained_back_translation == 0 {
            return Ok(vec![self.target_lang.clone()]);
        }
        let mut languages: Vec<String> = self
            .translator
            .supported_languages()
            .into_iter()
            .filter(|lang| *lang != self.src_lang)
            .collect();
        languages.sort();
        languages.dedup();
        if languages.is_empty() {
            return Err(ZiError::transformation(
                self.name(),
                format!("translator offers no language other than '{}'", self.src_lang),
            ));
        }
        Ok(rng.sample(&languages, self.chained_back_translation))
    }

    fn round_trip(&self, text: &str, route: &[String]) -> Result<String> {
        let mut current = text.to_string();
        let mut lang = self.src_lang.as_str();
        for next in route {
            current = self.translator.translate(&current, lang, next)?;
            lang = next;
        }
        self.translator.translate(&current, lang, &self.src_lang)
    }
}

impl ZiTransform for ZiBackTranslation {
    fn name(&self) -> &'static str {
        "sentence.back_translation"
    }

    fn apply(
        &self,
        text: &ZiAttackedText,
        _indices: &BTreeSet<usize>,
        rng: &ZiRng,
    ) -> Result<Vec<ZiAttackedText>> {
        if text.num_words() == 0 {
            return Ok(Vec::new());
        }

        let route = self.route(rng)?;
        let mut columns = Vec::new();
        for label in text.column_labels() {
            let original = text.column_text(label).unwrap_or_default();
            columns.push((label.to_string(), self.round_trip(&original, &route)?));
        }

        let translated = ZiAttackedText::from_columns(columns);
        if translated == *text || translated.num_words() == 0 {
            return Ok(Vec::new());
        }
        log::trace!(
            "augment.transformation.back_translation: round trip - route={}",
            route.join(">")
        );
        Ok(vec![translated])
    }
}
