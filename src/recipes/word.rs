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

//! # Word Recipes
//!
//! Easy-data-augmentation building blocks (synonym swap, deletion, random
//! swap, synonym insertion), embedding neighbour swaps and the CheckList
//! invariance perturbations.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::augmenter::{ZiAugmenter, ZiAugmenterConfig};
use crate::constraints::{ZiConstraint, ZiRepeatModification, ZiWordEmbeddingDistance};
use crate::errors::Result;
use crate::recipes::{
    augmenter_config_from_value, augmenter_recipe, bind_augmenter, default_constraints,
    recipe_options_from_value, rng_from_value, ZiRecipe,
};
use crate::resources::{ZiRecipeResources, ZiSynonymSource, ZiWordEmbedding};
use crate::rng::ZiRng;
use crate::transformation::{
    ZiCompositeStrategy, ZiTransform, ZiTransformation, ZiWordDeletion, ZiWordInnerSwapRandom,
    ZiWordInsertionRandomSynonym, ZiWordSwapChangeLocation, ZiWordSwapChangeName,
    ZiWordSwapChangeNumber, ZiWordSwapContract, ZiWordSwapEmbedding, ZiWordSwapExtend,
    ZiWordSwapSynonym,
};

/// Replaces words with synonyms.
#[derive(Debug)]
pub struct ZiWordNetRecipe {
    augmenter: ZiAugmenter,
}

impl ZiWordNetRecipe {
    #[allow(non_snake_case)]
    pub fn new(
        synonyms: Arc<dyn ZiSynonymSource>,
        config: ZiAugmenterConfig,
        rng: ZiRng,
    ) -> Result<Self> {
        let transformation = ZiTransformation::atomic(ZiWordSwapSynonym::new(synonyms));
        let augmenter =
            bind_augmenter("wordnet", transformation, default_constraints(), config, rng)?;
        Ok(Self { augmenter })
    }
}

augmenter_recipe!(ZiWordNetRecipe, "wordnet");

/// Deletes words.
#[derive(Debug)]
pub struct ZiDeletionRecipe {
    augmenter: ZiAugmenter,
}

impl ZiDeletionRecipe {
    #[allow(non_snake_case)]
    pub fn new(config: ZiAugmenterConfig, rng: ZiRng) -> Result<Self> {
        let transformation = ZiTransformation::atomic(ZiWordDeletion);
        let augmenter =
            bind_augmenter("deletion", transformation, default_constraints(), config, rng)?;
        Ok(Self { augmenter })
    }
}

augmenter_recipe!(ZiDeletionRecipe, "deletion");

/// Swaps pairs of words.
#[derive(Debug)]
pub struct ZiSwapRecipe {
    augmenter: ZiAugmenter,
}

impl ZiSwapRecipe {
    #[allow(non_snake_case)]
    pub fn new(config: ZiAugmenterConfig, rng: ZiRng) -> Result<Self> {
        let transformation = ZiTransformation::atomic(ZiWordInnerSwapRandom);
        let augmenter = bind_augmenter("swap", transformation, default_constraints(), config, rng)?;
        Ok(Self { augmenter })
    }
}

augmenter_recipe!(ZiSwapRecipe, "swap");

/// Inserts synonyms of random words at random positions.
#[derive(Debug)]
pub struct ZiSynonymInsertionRecipe {
    augmenter: ZiAugmenter,
}

impl ZiSynonymInsertionRecipe {
    #[allow(non_snake_case)]
    pub fn new(
        synonyms: Arc<dyn ZiSynonymSource>,
        config: ZiAugmenterConfig,
        rng: ZiRng,
    ) -> Result<Self> {
        let transformation =
            ZiTransformation::atomic(ZiWordInsertionRandomSynonym::new(synonyms));
        let augmenter = bind_augmenter(
            "synonym_insertion",
            transformation,
            default_constraints(),
            config,
            rng,
        )?;
        Ok(Self { augmenter })
    }
}

augmenter_recipe!(ZiSynonymInsertionRecipe, "synonym_insertion");

/// Options of [`ZiEmbeddingRecipe`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZiEmbeddingRecipeConfig {
    pub max_candidates: usize,
    pub min_cos_sim: f64,
}

impl Default for ZiEmbeddingRecipeConfig {
    fn default() -> Self {
        Self {
            max_candidates: 50,
            min_cos_sim: 0.8,
        }
    }
}

/// Replaces words with close embedding neighbours.
#[derive(Debug)]
pub struct ZiEmbeddingRecipe {
    augmenter: ZiAugmenter,
}

impl ZiEmbeddingRecipe {
    #[allow(non_snake_case)]
    pub fn new(
        embedding: Arc<dyn ZiWordEmbedding>,
        config: ZiAugmenterConfig,
        options: ZiEmbeddingRecipeConfig,
        rng: ZiRng,
    ) -> Result<Self> {
        let transformation = ZiTransformation::atomic(ZiWordSwapEmbedding::new(
            embedding.clone(),
            options.max_candidates,
        )?);
        let mut constraints = default_constraints();
        constraints.push(ZiConstraint::post(ZiWordEmbeddingDistance::new(
            embedding,
            options.min_cos_sim,
        )?));
        let augmenter = bind_augmenter("embedding", transformation, constraints, config, rng)?;
        Ok(Self { augmenter })
    }
}

augmenter_recipe!(ZiEmbeddingRecipe, "embedding");

/// Options of [`ZiCheckListRecipe`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZiCheckListRecipeConfig {
    /// Replacements drawn per number, name or location.
    pub n: usize,
    pub max_change: f64,
}

impl Default for ZiCheckListRecipeConfig {
    fn default() -> Self {
        Self {
            n: 3,
            max_change: 1.0,
        }
    }
}

/// Numbers, names, locations and contractions, one family per step.
#[derive(Debug)]
pub struct ZiCheckListRecipe {
    augmenter: ZiAugmenter,
}

impl ZiCheckListRecipe {
    #[allow(non_snake_case)]
    pub fn new(
        config: ZiAugmenterConfig,
        options: ZiCheckListRecipeConfig,
        rng: ZiRng,
    ) -> Result<Self> {
        let children: Vec<Box<dyn ZiTransform>> = vec![
            Box::new(ZiWordSwapChangeNumber::new(options.max_change, options.n)?),
            Box::new(ZiWordSwapChangeLocation::new(options.n)?),
            Box::new(ZiWordSwapChangeName::new(options.n, false, false)?),
            Box::new(ZiWordSwapExtend),
            Box::new(ZiWordSwapContract),
        ];
        let transformation =
            ZiTransformation::composite(children, ZiCompositeStrategy::RandomOne)?;
        let constraints = vec![ZiConstraint::pre(ZiRepeatModification)];
        let augmenter = bind_augmenter("checklist", transformation, constraints, config, rng)?;
        Ok(Self { augmenter })
    }
}

augmenter_recipe!(ZiCheckListRecipe, "checklist");

pub(crate) fn wordnet_factory(
    config: &Value,
    resources: &ZiRecipeResources,
) -> Result<Box<dyn ZiRecipe + Send + Sync>> {
    Ok(Box::new(ZiWordNetRecipe::new(
        resources.require_synonyms()?,
        augmenter_config_from_value(config, "wordnet")?,
        rng_from_value(config, resources, "wordnet")?,
    )?))
}

pub(crate) fn deletion_factory(
    config: &Value,
    resources: &ZiRecipeResources,
) -> Result<Box<dyn ZiRecipe + Send + Sync>> {
    Ok(Box::new(ZiDeletionRecipe::new(
        augmenter_config_from_value(config, "deletion")?,
        rng_from_value(config, resources, "deletion")?,
    )?))
}

pub(crate) fn swap_factory(
    config: &Value,
    resources: &ZiRecipeResources,
) -> Result<Box<dyn ZiRecipe + Send + Sync>> {
    Ok(Box::new(ZiSwapRecipe::new(
        augmenter_config_from_value(config, "swap")?,
        rng_from_value(config, resources, "swap")?,
    )?))
}

pub(crate) fn synonym_insertion_factory(
    config: &Value,
    resources: &ZiRecipeResources,
) -> Result<Box<dyn ZiRecipe + Send + Sync>> {
    Ok(Box::new(ZiSynonymInsertionRecipe::new(
        resources.require_synonyms()?,
        augmenter_config_from_value(config, "synonym_insertion")?,
        rng_from_value(config, resources, "synonym_insertion")?,
    )?))
}

pub(crate) fn embedding_factory(
    config: &Value,
    resources: &ZiRecipeResources,
) -> Result<Box<dyn ZiRecipe + Send + Sync>> {
    Ok(Box::new(ZiEmbeddingRecipe::new(
        resources.require_embedding()?,
        augmenter_config_from_value(config, "embedding")?,
        recipe_options_from_value(config, "embedding")?,
        rng_from_value(config, resources, "embedding")?,
    )?))
}

pub(crate) fn checklist_factory(
    config: &Value,
    resources: &ZiRecipeResources,
) -> Result<Box<dyn ZiRecipe + Send + Sync>> {
    Ok(Box::new(ZiCheckListRecipe::new(
        augmenter_config_from_value(config, "checklist")?,
        recipe_options_from_value(config, "checklist")?,
        rng_from_value(config, resources, "checklist")?,
    )?))
}
