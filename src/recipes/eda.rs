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

//! # Easy Data Augmentation
//!
//! The aggregate recipe of Wei and Zou (2019): synonym replacement, random
//! deletion, random swap and random synonym insertion, each asked for a
//! quarter of the requested variants. The pooled results are deduplicated,
//! shuffled and truncated, so the recipe caps the output count but may return
//! fewer variants when the four parts produce too few distinct texts.

use std::collections::HashSet;
use std::sync::Arc;

use serde_json::Value;

use crate::augmenter::ZiAugmenterConfig;
use crate::errors::Result;
use crate::recipes::word::{
    ZiDeletionRecipe, ZiSwapRecipe, ZiSynonymInsertionRecipe, ZiWordNetRecipe,
};
use crate::recipes::{augmenter_config_from_value, rng_from_value, ZiRecipe};
use crate::resources::{ZiRecipeResources, ZiSynonymSource};
use crate::rng::ZiRng;

/// Variants requested when a recipe document leaves the count unset.
pub const ZI_EDA_DEFAULT_TRANSFORMATIONS_PER_EXAMPLE: usize = 4;

#[derive(Debug)]
pub struct ZiEasyDataRecipe {
    parts: Vec<Box<dyn ZiRecipe>>,
    transformations_per_example: usize,
    rng: ZiRng,
}

impl ZiEasyDataRecipe {
    #[allow(non_snake_case)]
    pub fn new(
        synonyms: Arc<dyn ZiSynonymSource>,
        config: ZiAugmenterConfig,
        rng: ZiRng,
    ) -> Result<Self> {
        config.validate()?;
        let per_part = (config.transformations_per_example / 4).max(1);
        let part_config = config.clone().transformations_per_example(per_part);

        let parts: Vec<Box<dyn ZiRecipe>> = vec![
            Box::new(ZiWordNetRecipe::new(
                synonyms.clone(),
                part_config.clone(),
                rng.clone(),
            )?),
            Box::new(ZiDeletionRecipe::new(part_config.clone(), rng.clone())?),
            Box::new(ZiSwapRecipe::new(part_config.clone(), rng.clone())?),
            Box::new(ZiSynonymInsertionRecipe::new(synonyms, part_config, rng.clone())?),
        ];

        log::debug!(
            "augment.recipe.build: eda parts bound - per_part={}, count={}",
            per_part,
            config.transformations_per_example
        );
        Ok(Self {
            parts,
            transformations_per_example: config.transformations_per_example,
            rng,
        })
    }

    /// Variants each part is asked for.
    pub fn per_part(&self) -> usize {
        (self.transformations_per_example / 4).max(1)
    }
}

impl ZiRecipe for ZiEasyDataRecipe {
    fn name(&self) -> &'static str {
        "eda"
    }

    fn augment(&self, text: &str) -> Result<Vec<String>> {
        let mut seen = HashSet::new();
        let mut pooled = Vec::new();
        for part in &self.parts {
            for variant in part.augment(text)? {
                if seen.insert(variant.clone()) {
                    pooled.push(variant);
                }
            }
        }

        self.rng.shuffle(&mut pooled);
        pooled.truncate(self.transformations_per_example);
        Ok(pooled)
    }
}

pub(crate) fn eda_factory(
    config: &Value,
    resources: &ZiRecipeResources,
) -> Result<Box<dyn ZiRecipe + Send + Sync>> {
    let synonyms = resources.require_synonyms()?;
    let mut augmenter_config = augmenter_config_from_value(config, "eda")?;
    if config.get("transformations_per_example").is_none() {
        augmenter_config.transformations_per_example = ZI_EDA_DEFAULT_TRANSFORMATIONS_PER_EXAMPLE;
    }
    Ok(Box::new(ZiEasyDataRecipe::new(
        synonyms,
        augmenter_config,
        rng_from_value(config, resources, "eda")?,
    )?))
}
