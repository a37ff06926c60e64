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

//! # Sentence Recipes

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::augmenter::{ZiAugmenter, ZiAugmenterConfig};
use crate::errors::Result;
use crate::recipes::{
    augmenter_config_from_value, augmenter_recipe, bind_augmenter, recipe_options_from_value,
    rng_from_value, ZiRecipe,
};
use crate::resources::{ZiRecipeResources, ZiTranslator};
use crate::rng::ZiRng;
use crate::transformation::{ZiBackTranslation, ZiTransformation};

/// Options of [`ZiBackTranslationRecipe`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZiBackTranslationRecipeConfig {
    pub src_lang: String,
    pub target_lang: String,
    /// Languages visited per round trip; 0 goes through `target_lang` only.
    pub chained_back_translation: usize,
}

impl Default for ZiBackTranslationRecipeConfig {
    fn default() -> Self {
        Self {
            src_lang: "en".to_string(),
            target_lang: "es".to_string(),
            chained_back_translation: 5,
        }
    }
}

/// Paraphrases whole texts by round-trip translation.
#[derive(Debug)]
pub struct ZiBackTranslationRecipe {
    augmenter: ZiAugmenter,
}

impl ZiBackTranslationRecipe {
    #[allow(non_snake_case)]
    pub fn new(
        translator: Arc<dyn ZiTranslator>,
        config: ZiAugmenterConfig,
        options: ZiBackTranslationRecipeConfig,
        rng: ZiRng,
    ) -> Result<Self> {
        let transformation = ZiTransformation::atomic(ZiBackTranslation::new(
            translator,
            &options.src_lang,
            &options.target_lang,
            options.chained_back_translation,
        )?);
        let augmenter =
            bind_augmenter("back_translation", transformation, Vec::new(), config, rng)?;
        Ok(Self { augmenter })
    }
}

augmenter_recipe!(ZiBackTranslationRecipe, "back_translation");

pub(crate) fn back_translation_factory(
    config: &Value,
    resources: &ZiRecipeResources,
) -> Result<Box<dyn ZiRecipe + Send + Sync>> {
    Ok(Box::new(ZiBackTranslationRecipe::new(
        resources.require_translator()?,
        augmenter_config_from_value(config, "back_translation")?,
        recipe_options_from_value(config, "back_translation")?,
        rng_from_value(config, resources, "back_translation")?,
    )?))
}
