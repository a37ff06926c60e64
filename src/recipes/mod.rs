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

//! # Recipes Module
//!
//! A recipe is a named, ready-to-use augmenter: one transformation, its
//! constraints and the shared selection policy. Recipes take every model or
//! lexicon they need as an explicit handle, validate eagerly and never
//! augment during construction.
//!
//! ## Catalog
//!
//! | name | family |
//! |---|---|
//! | `wordnet`, `deletion`, `swap`, `synonym_insertion`, `eda` | easy data augmentation |
//! | `embedding`, `checklist` | word swaps |
//! | `charswap`, `pruthi`, `deepwordbug` | character noise |
//! | `clare`, `textbugger`, `textfooler` | adversarial attack recipes |
//! | `back_translation` | sentence paraphrase |
//!
//! ## Registry
//!
//! [`ZiRecipeRegistry`] maps names to factories that build a recipe from a
//! JSON config and a [`ZiRecipeResources`] bundle:
//!
//! ```rust
//! use serde_json::json;
//! use ziaug::recipes::ZiRecipeRegistry;
//! use ziaug::resources::ZiRecipeResources;
//!
//! let registry = ZiRecipeRegistry::with_defaults();
//! let recipe = registry
//!     .build("deletion", &json!({"seed": 7}), &ZiRecipeResources::default())
//!     .unwrap();
//! let variants = recipe.augment("The quick brown fox jumps").unwrap();
//! assert!(variants.len() <= 1);
//! ```

pub mod attack;
pub mod character;
pub mod eda;
pub mod sentence;
pub mod word;

use std::collections::BTreeMap;
use std::fmt::Debug;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::augmenter::{ZiAugmenter, ZiAugmenterConfig};
use crate::constraints::{ZiConstraint, ZiRepeatModification, ZiStopwordModification};
use crate::errors::{Result, ZiError};
use crate::resources::ZiRecipeResources;
use crate::rng::ZiRng;

pub use attack::{
    ZiClareRecipe, ZiClareRecipeConfig, ZiTextBuggerRecipe, ZiTextFoolerRecipe,
};
pub use character::{
    ZiCharSwapRecipe, ZiDeepWordBugRecipe, ZiDeepWordBugRecipeConfig, ZiPruthiRecipe,
    ZiPruthiRecipeConfig,
};
pub use eda::{ZiEasyDataRecipe, ZI_EDA_DEFAULT_TRANSFORMATIONS_PER_EXAMPLE};
pub use sentence::{ZiBackTranslationRecipe, ZiBackTranslationRecipeConfig};
pub use word::{
    ZiCheckListRecipe, ZiCheckListRecipeConfig, ZiDeletionRecipe, ZiEmbeddingRecipe,
    ZiEmbeddingRecipeConfig, ZiSwapRecipe, ZiSynonymInsertionRecipe, ZiWordNetRecipe,
};

/// Contract every recipe fulfills.
pub trait ZiRecipe: Debug + Send + Sync {
    /// Registry name of the recipe.
    fn name(&self) -> &'static str;

    /// Up to `transformations_per_example` distinct variants of `text`.
    fn augment(&self, text: &str) -> Result<Vec<String>>;

    fn augment_many(&self, texts: &[&str]) -> Result<Vec<Vec<String>>> {
        texts.iter().map(|text| self.augment(text)).collect()
    }
}

/// Runs `recipe` on `text`, tagging any failure with the recipe name.
#[allow(non_snake_case)]
pub fn execute_recipe(recipe: &dyn ZiRecipe, text: &str) -> Result<Vec<String>> {
    recipe
        .augment(text)
        .map_err(|err| ZiError::recipe(recipe.name(), err.to_string()))
}

/// Repeat and stopword constraints shared by most recipes.
pub fn default_constraints() -> Vec<ZiConstraint> {
    vec![
        ZiConstraint::pre(ZiRepeatModification),
        ZiConstraint::pre(ZiStopwordModification::default()),
    ]
}

/// Implements [`ZiRecipe`] for a newtype around [`ZiAugmenter`].
macro_rules! augmenter_recipe {
    ($recipe:ty, $name:literal) => {
        impl $recipe {
            pub fn augmenter(&self) -> &$crate::augmenter::ZiAugmenter {
                &self.augmenter
            }
        }

        impl $crate::recipes::ZiRecipe for $recipe {
            fn name(&self) -> &'static str {
                $name
            }

            fn augment(&self, text: &str) -> $crate::errors::Result<Vec<String>> {
                self.augmenter.augment(text)
            }
        }
    };
}

pub(crate) use augmenter_recipe;

/// Builds the augmenter behind a recipe, logging the binding.
pub(crate) fn bind_augmenter(
    recipe: &str,
    transformation: crate::transformation::ZiTransformation,
    constraints: Vec<ZiConstraint>,
    config: ZiAugmenterConfig,
    rng: ZiRng,
) -> Result<ZiAugmenter> {
    let names: Vec<&str> = constraints.iter().map(ZiConstraint::name).collect();
    log::debug!(
        "augment.recipe.build: recipe bound - recipe={}, transformation={}, constraints=[{}], pct={}, count={}",
        recipe,
        transformation.name(),
        names.join(", "),
        config.pct_words_to_swap,
        config.transformations_per_example
    );
    ZiAugmenter::new(transformation, constraints, config, rng)
}

/// Factory building a recipe from its JSON config and the shared resources.
pub type ZiRecipeFactory =
    fn(&Value, &ZiRecipeResources) -> Result<Box<dyn ZiRecipe + Send + Sync>>;

/// Registry mapping recipe names to factories.
#[derive(Debug, Default)]
pub struct ZiRecipeRegistry {
    inner: BTreeMap<String, ZiRecipeFactory>,
}

/// A recipe document: `{"recipe": "<name>", "config": {...}}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ZiRecipeDocument {
    pub recipe: String,
    #[serde(default = "empty_config")]
    pub config: Value,
}

fn empty_config() -> Value {
    Value::Object(Default::default())
}

impl ZiRecipeRegistry {
    #[allow(non_snake_case)]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every bundled recipe.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register("wordnet", word::wordnet_factory);
        registry.register("deletion", word::deletion_factory);
        registry.register("swap", word::swap_factory);
        registry.register("synonym_insertion", word::synonym_insertion_factory);
        registry.register("eda", eda::eda_factory);
        registry.register("embedding", word::embedding_factory);
        registry.register("checklist", word::checklist_factory);
        registry.register("charswap", character::charswap_factory);
        registry.register("pruthi", character::pruthi_factory);
        registry.register("deepwordbug", character::deepwordbug_factory);
        registry.register("clare", attack::clare_factory);
        registry.register("textbugger", attack::textbugger_factory);
        registry.register("textfooler", attack::textfooler_factory);
        registry.register("back_translation", sentence::back_translation_factory);
        registry
    }

    pub fn register(&mut self, name: &str, factory: ZiRecipeFactory) {
        if self.inner.insert(name.to_string(), factory).is_some() {
            log::warn!("augment.recipe.register: factory replaced - name={}", name);
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.inner.contains_key(name)
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        self.inner.keys().map(String::as_str).collect()
    }

    pub fn get(&self, name: &str) -> Result<ZiRecipeFactory> {
        self.inner
            .get(name)
            .copied()
            .ok_or_else(|| ZiError::validation(format!("unknown recipe: {}", name)))
    }

    pub fn build(
        &self,
        name: &str,
        config: &Value,
        resources: &ZiRecipeResources,
    ) -> Result<Box<dyn ZiRecipe + Send + Sync>> {
        let factory = self.get(name)?;
        let recipe = factory(config, resources)?;
        log::info!("augment.recipe.build: recipe ready - name={}", name);
        Ok(recipe)
    }

    pub fn build_from_document(
        &self,
        document: &ZiRecipeDocument,
        resources: &ZiRecipeResources,
    ) -> Result<Box<dyn ZiRecipe + Send + Sync>> {
        self.build(&document.recipe, &document.config, resources)
    }

    /// Parses a JSON or YAML recipe document. JSON is tried first.
    pub fn build_from_str(
        &self,
        source: &str,
        resources: &ZiRecipeResources,
    ) -> Result<Box<dyn ZiRecipe + Send + Sync>> {
        let document: ZiRecipeDocument = match serde_json::from_str(source) {
            Ok(document) => document,
            Err(_) => serde_yaml::from_str(source)?,
        };
        self.build_from_document(&document, resources)
    }

    /// Reads a recipe document; `.json` files are parsed as JSON, anything
    /// else as YAML.
    pub fn build_from_path(
        &self,
        path: impl AsRef<Path>,
        resources: &ZiRecipeResources,
    ) -> Result<Box<dyn ZiRecipe + Send + Sync>> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false);
        let document: ZiRecipeDocument = if is_json {
            serde_json::from_str(&source)?
        } else {
            serde_yaml::from_str(&source)?
        };
        self.build_from_document(&document, resources)
    }
}

fn config_object<'a>(
    config: &'a Value,
    recipe: &str,
) -> Result<Option<&'a serde_json::Map<String, Value>>> {
    match config {
        Value::Null => Ok(None),
        Value::Object(obj) => Ok(Some(obj)),
        _ => Err(ZiError::validation(format!("{recipe} config must be object"))),
    }
}

/// Shared augmenter knobs from a recipe config. Missing keys keep defaults.
pub fn augmenter_config_from_value(config: &Value, recipe: &str) -> Result<ZiAugmenterConfig> {
    let mut out = ZiAugmenterConfig::default();
    let Some(obj) = config_object(config, recipe)? else {
        return Ok(out);
    };

    if let Some(value) = obj.get("pct_words_to_swap") {
        out.pct_words_to_swap = value.as_f64().ok_or_else(|| {
            ZiError::validation(format!("{recipe} 'pct_words_to_swap' must be a number"))
        })?;
    }
    if let Some(value) = obj.get("transformations_per_example") {
        let count = value.as_i64().ok_or_else(|| {
            ZiError::validation(format!(
                "{recipe} 'transformations_per_example' must be an integer"
            ))
        })?;
        if count <= 0 {
            return Err(ZiError::validation(format!(
                "{recipe} 'transformations_per_example' must be at least 1, got {count}"
            )));
        }
        out.transformations_per_example = count as usize;
    }
    for (key, slot) in [
        ("high_yield", &mut out.high_yield),
        ("fast_augment", &mut out.fast_augment),
    ] {
        if let Some(value) = obj.get(key) {
            *slot = value.as_bool().ok_or_else(|| {
                ZiError::validation(format!("{recipe} '{key}' must be a boolean"))
            })?;
        }
    }

    out.validate()?;
    Ok(out)
}

/// The rng for a recipe: seeded from `seed` in the config when present,
/// otherwise the shared rng of `resources`.
pub fn rng_from_value(config: &Value, resources: &ZiRecipeResources, recipe: &str) -> Result<ZiRng> {
    let seed = config_object(config, recipe)?.and_then(|obj| obj.get("seed"));
    match seed {
        None | Some(Value::Null) => Ok(resources.rng.clone()),
        Some(value) => value.as_u64().map(ZiRng::seeded).ok_or_else(|| {
            ZiError::validation(format!("{recipe} 'seed' must be a non-negative integer"))
        }),
    }
}

/// Recipe-specific options from the same config object. Unrelated keys are
/// ignored and missing keys keep their defaults.
pub fn recipe_options_from_value<T>(config: &Value, recipe: &str) -> Result<T>
where
    T: DeserializeOwned + Default,
{
    match config_object(config, recipe)? {
        None => Ok(T::default()),
        Some(obj) => serde_json::from_value(Value::Object(obj.clone())).map_err(|err| {
            ZiError::validation(format!("{recipe} has invalid options: {err}"))
        }),
    }
}
