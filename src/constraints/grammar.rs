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

//! # Grammar Constraints

use std::sync::Arc;

use crate::constraints::ZiPostTransformationConstraint;
use crate::errors::{Result, ZiError};
use crate::resources::ZiPartOfSpeechTagger;
use crate::text::ZiAttackedText;

/// Requires replaced words to keep their part of speech. With
/// `allow_verb_noun_swap`, a noun may become a verb and vice versa.
#[derive(Debug)]
pub struct ZiPartOfSpeech {
    tagger: Arc<dyn ZiPartOfSpeechTagger>,
    allow_verb_noun_swap: bool,
}

impl ZiPartOfSpeech {
    #[allow(non_snake_case)]
    pub fn new(tagger: Arc<dyn ZiPartOfSpeechTagger>, allow_verb_noun_swap: bool) -> Self {
        Self {
            tagger,
            allow_verb_noun_swap,
        }
    }

    fn tags(&self, text: &ZiAttackedText) -> Result<Vec<String>> {
        let words = text.words();
        let tags = self.tagger.tag(&words)?;
        if tags.len() != words.len() {
            return Err(ZiError::constraint(
                "part_of_speech",
                format!("tagger returned {} tags for {} words", tags.len(), words.len()),
            ));
        }
        Ok(tags)
    }

    fn compatible(&self, before: &str, after: &str) -> bool {
        if before == after {
            return true;
        }
        self.allow_verb_noun_swap
            && matches!((before, after), ("NOUN", "VERB") | ("VERB", "NOUN"))
    }
}

impl ZiPostTransformationConstraint for ZiPartOfSpeech {
    fn name(&self) -> &'static str {
        "part_of_speech"
    }

    fn check(&self, candidate: &ZiAttackedText, reference: &ZiAttackedText) -> Result<bool> {
        let indices = candidate.newly_modified_indices();
        if indices.is_empty() {
            return Ok(true);
        }

        let before = self.tags(reference)?;
        let after = self.tags(candidate)?;
        for &index in indices {
            let (Some(old), Some(new)) = (before.get(index), after.get(index)) else {
                continue;
            };
            if !self.compatible(old, new) {
                return Ok(false);
            }
        }
        Ok(true)
    }
}
