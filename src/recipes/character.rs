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

//! # Character Recipes
//!
//! Typo-style noise: neighbouring swaps, substitutions, deletions,
//! insertions and keyboard slips.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::augmenter::{ZiAugmenter, ZiAugmenterConfig};
use crate::constraints::{
    ZiConstraint, ZiLevenshteinEditDistance, ZiMaxWordsPerturbed, ZiMinWordLength,
    ZiRepeatModification, ZiStopwordModification,
};
use crate::errors::Result;
use crate::recipes::{
    augmenter_config_from_value, augmenter_recipe, bind_augmenter, default_constraints,
    recipe_options_from_value, rng_from_value, ZiRecipe,
};
use crate::resources::ZiRecipeResources;
use crate::rng::ZiRng;
use crate::transformation::{
    ZiCharacterEditOptions, ZiCompositeStrategy, ZiTransform, ZiTransformation,
    ZiWordSwapNeighboringCharacterSwap, ZiWordSwapQwerty, ZiWordSwapRandomCharacterDeletion,
    ZiWordSwapRandomCharacterInsertion, ZiWordSwapRandomCharacterSubstitution,
};

/// The four basic character edits with the given options.
fn basic_character_edits(options: &ZiCharacterEditOptions) -> Vec<Box<dyn ZiTransform>> {
    vec![
        Box::new(ZiWordSwapNeighboringCharacterSwap::new(*options)),
        Box::new(ZiWordSwapRandomCharacterSubstitution::new(*options)),
        Box::new(ZiWordSwapRandomCharacterDeletion::new(*options)),
        Box::new(ZiWordSwapRandomCharacterInsertion::new(*options)),
    ]
}

/// One random character edit per perturbed word.
#[derive(Debug)]
pub struct ZiCharSwapRecipe {
    augmenter: ZiAugmenter,
}

impl ZiCharSwapRecipe {
    #[allow(non_snake_case)]
    pub fn new(config: ZiAugmenterConfig, rng: ZiRng) -> Result<Self> {
        let transformation = ZiTransformation::composite(
            basic_character_edits(&ZiCharacterEditOptions::default()),
            ZiCompositeStrategy::RandomOne,
        )?;
        let augmenter =
            bind_augmenter("charswap", transformation, default_constraints(), config, rng)?;
        Ok(Self { augmenter })
    }
}

augmenter_recipe!(ZiCharSwapRecipe, "charswap");

/// Options of [`ZiPruthiRecipe`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZiPruthiRecipeConfig {
    pub max_num_word_swaps: usize,
}

impl Default for ZiPruthiRecipeConfig {
    fn default() -> Self {
        Self {
            max_num_word_swaps: 1,
        }
    }
}

/// Typos inside words of four or more characters, first and last letters
/// kept (Pruthi et al., 2019).
#[derive(Debug)]
pub struct ZiPruthiRecipe {
    augmenter: ZiAugmenter,
}

impl ZiPruthiRecipe {
    #[allow(non_snake_case)]
    pub fn new(
        config: ZiAugmenterConfig,
        options: ZiPruthiRecipeConfig,
        rng: ZiRng,
    ) -> Result<Self> {
        let edit = ZiCharacterEditOptions::default()
            .random_one(false)
            .skip_first_char(true)
            .skip_last_char(true);
        let children: Vec<Box<dyn ZiTransform>> = vec![
            Box::new(ZiWordSwapNeighboringCharacterSwap::new(edit)),
            Box::new(ZiWordSwapRandomCharacterDeletion::new(edit)),
            Box::new(ZiWordSwapRandomCharacterInsertion::new(edit)),
            Box::new(ZiWordSwapQwerty::new(edit)),
        ];
        let transformation =
            ZiTransformation::composite(children, ZiCompositeStrategy::RandomOne)?;
        let constraints = vec![
            ZiConstraint::pre(ZiMinWordLength::new(4)),
            ZiConstraint::pre(ZiStopwordModification::default()),
            ZiConstraint::post(ZiMaxWordsPerturbed::new(
                Some(options.max_num_word_swaps),
                None,
            )?),
            ZiConstraint::pre(ZiRepeatModification),
        ];
        let augmenter = bind_augmenter("pruthi", transformation, constraints, config, rng)?;
        Ok(Self { augmenter })
    }
}

augmenter_recipe!(ZiPruthiRecipe, "pruthi");

/// Options of [`ZiDeepWordBugRecipe`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZiDeepWordBugRecipeConfig {
    /// All four character edits, or substitution alone.
    pub use_all_transformations: bool,
    pub max_edit_distance: usize,
}

impl Default for ZiDeepWordBugRecipeConfig {
    fn default() -> Self {
        Self {
            use_all_transformations: true,
            max_edit_distance: 30,
        }
    }
}

/// Character edits bounded by a total Levenshtein distance (Gao et al., 2018).
#[derive(Debug)]
pub struct ZiDeepWordBugRecipe {
    augmenter: ZiAugmenter,
}

impl ZiDeepWordBugRecipe {
    #[allow(non_snake_case)]
    pub fn new(
        config: ZiAugmenterConfig,
        options: ZiDeepWordBugRecipeConfig,
        rng: ZiRng,
    ) -> Result<Self> {
        let edit = ZiCharacterEditOptions::default();
        let transformation = if options.use_all_transformations {
            ZiTransformation::composite(
                basic_character_edits(&edit),
                ZiCompositeStrategy::RandomOne,
            )?
        } else {
            ZiTransformation::atomic(ZiWordSwapRandomCharacterSubstitution::new(edit))
        };
        let mut constraints = default_constraints();
        constraints.push(ZiConstraint::post(ZiLevenshteinEditDistance::new(
            options.max_edit_distance,
        )));
        let augmenter = bind_augmenter("deepwordbug", transformation, constraints, config, rng)?;
        Ok(Self { augmenter })
    }
}

augmenter_recipe!(ZiDeepWordBugRecipe, "deepwordbug");

pub(crate) fn charswap_factory(
    config: &Value,
    resources: &ZiRecipeResources,
) -> Result<Box<dyn ZiRecipe + Send + Sync>> {
    Ok(Box::new(ZiCharSwapRecipe::new(
        augmenter_config_from_value(config, "charswap")?,
        rng_from_value(config, resources, "charswap")?,
    )?))
}

pub(crate) fn pruthi_factory(
    config: &Value,
    resources: &ZiRecipeResources,
) -> Result<Box<dyn ZiRecipe + Send + Sync>> {
    Ok(Box::new(ZiPruthiRecipe::new(
        augmenter_config_from_value(config, "pruthi")?,
        recipe_options_from_value(config, "pruthi")?,
        rng_from_value(config, resources, "pruthi")?,
    )?))
}

pub(crate) fn deepwordbug_factory(
    config: &Value,
    resources: &ZiRecipeResources,
) -> Result<Box<dyn ZiRecipe + Send + Sync>> {
    Ok(Box::new(ZiDeepWordBugRecipe::new(
        augmenter_config_from_value(config, "deepwordbug")?,
        recipe_options_from_value(config, "deepwordbug")?,
        rng_from_value(config, resources, "deepwordbug")?,
    )?))
}
