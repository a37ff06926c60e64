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

#[path = "../common/mod.rs"]
mod common;

use std::io::Write;
use std::sync::Arc;

use serde_json::{json, Value};
use tempfile::NamedTempFile;
use ziaug::constraints::overlap::levenshtein_distance;
use ziaug::errors::{Result, ZiError};
use ziaug::recipes::{
    ZiDeletionRecipe, ZiRecipe, ZiRecipeDocument, ZiRecipeRegistry,
    ZI_EDA_DEFAULT_TRANSFORMATIONS_PER_EXAMPLE,
};
use ziaug::resources::{ZiRecipeResources, ZiSynonymTable};
use ziaug::{execute_recipe, ZiAugmenterConfig, ZiRng};

use common::{FakeMaskedLm, LetterEncoder, TagTranslator};

const FOX: &str = "The quick brown fox jumps over the lazy dog";

fn full_resources() -> ZiRecipeResources {
    ZiRecipeResources::new(ZiRng::seeded(99))
        .with_synonyms(common::synonyms())
        .with_embedding(common::embedding())
        .with_masked_lm(Arc::new(FakeMaskedLm {
            fillers: vec![("good", 0.6), ("great", 0.5)],
        }))
        .with_sentence_encoder(Arc::new(LetterEncoder))
        .with_pos_tagger(common::tagger())
        .with_translator(Arc::new(TagTranslator))
}

#[test]
fn registry_lists_bundled_recipes() {
    let registry = ZiRecipeRegistry::with_defaults();
    assert_eq!(
        registry.names(),
        vec![
            "back_translation",
            "charswap",
            "checklist",
            "clare",
            "deepwordbug",
            "deletion",
            "eda",
            "embedding",
            "pruthi",
            "swap",
            "synonym_insertion",
            "textbugger",
            "textfooler",
            "wordnet",
        ]
    );
    assert!(registry.contains("eda"));
    assert!(!registry.contains("unknown"));
}

#[test]
fn registry_builds_every_recipe_with_full_resources() {
    let registry = ZiRecipeRegistry::with_defaults();
    let resources = full_resources();
    for name in registry.names() {
        let recipe = registry.build(name, &json!({"seed": 1}), &resources).unwrap();
        assert_eq!(recipe.name(), name);
    }
}

#[test]
fn registry_rejects_unknown_recipes() {
    let registry = ZiRecipeRegistry::with_defaults();
    let err = registry
        .build("word_salad", &json!({}), &full_resources())
        .unwrap_err();
    assert!(matches!(err, ZiError::Validation { .. }));
}

#[test]
fn registry_reports_missing_handles() {
    let registry = ZiRecipeRegistry::with_defaults();
    let bare = ZiRecipeResources::new(ZiRng::seeded(1));

    for (name, handle) in [
        ("wordnet", "synonyms"),
        ("synonym_insertion", "synonyms"),
        ("eda", "synonyms"),
        ("embedding", "embedding"),
        ("clare", "masked_lm"),
        ("textbugger", "embedding"),
        ("back_translation", "translator"),
    ] {
        match registry.build(name, &json!({}), &bare) {
            Err(ZiError::ResourceUnavailable { resource, .. }) => assert_eq!(resource, handle),
            other => panic!("{name}: unexpected result {other:?}"),
        }
    }

    let partial = ZiRecipeResources::new(ZiRng::seeded(1))
        .with_embedding(common::embedding())
        .with_sentence_encoder(Arc::new(LetterEncoder));
    match registry.build("textfooler", &json!({}), &partial) {
        Err(ZiError::ResourceUnavailable { resource, .. }) => assert_eq!(resource, "pos_tagger"),
        other => panic!("unexpected result {other:?}"),
    }

    for name in ["deletion", "swap", "charswap", "pruthi", "deepwordbug", "checklist"] {
        assert!(registry.build(name, &json!({}), &bare).is_ok(), "{name}");
    }
}

#[test]
fn registry_validates_shared_options() {
    let registry = ZiRecipeRegistry::with_defaults();
    let resources = full_resources();

    for config in [
        json!({"transformations_per_example": 0}),
        json!({"transformations_per_example": -3}),
        json!({"pct_words_to_swap": 1.5}),
        json!({"pct_words_to_swap": "lots"}),
        json!({"high_yield": "yes"}),
        json!({"seed": -1}),
        json!([1, 2, 3]),
    ] {
        for name in registry.names() {
            let result = registry.build(name, &config, &resources);
            assert!(
                matches!(result, Err(ZiError::Validation { .. })),
                "{name} accepted {config}"
            );
        }
    }
}

#[test]
fn registry_validates_recipe_options() {
    let registry = ZiRecipeRegistry::with_defaults();
    let err = registry
        .build("embedding", &json!({"max_candidates": "many"}), &full_resources())
        .unwrap_err();
    assert!(matches!(err, ZiError::Validation { .. }));

    let err = registry
        .build("embedding", &json!({"max_candidates": 0}), &full_resources())
        .unwrap_err();
    assert!(matches!(err, ZiError::Validation { .. }));
}

#[test]
fn registry_null_config_uses_defaults() {
    let registry = ZiRecipeRegistry::with_defaults();
    let recipe = registry
        .build("deletion", &Value::Null, &full_resources())
        .unwrap();
    assert_eq!(recipe.augment(FOX).unwrap().len(), 1);
}

#[test]
fn registry_eda_defaults_to_one_variant_per_part() {
    let registry = ZiRecipeRegistry::with_defaults();
    assert_eq!(ZI_EDA_DEFAULT_TRANSFORMATIONS_PER_EXAMPLE, 4);

    for config in [Value::Null, json!({}), json!({"seed": 7})] {
        let eda = registry.build("eda", &config, &full_resources()).unwrap();
        let variants = eda.augment(FOX).unwrap();
        assert_eq!(variants.len(), 4, "{config}: {variants:?}");
    }

    let single = registry
        .build("eda", &json!({"transformations_per_example": 1}), &full_resources())
        .unwrap();
    assert_eq!(single.augment(FOX).unwrap().len(), 1);
}

#[test]
fn registry_seed_makes_builds_reproducible() {
    let registry = ZiRecipeRegistry::with_defaults();
    let config = json!({"seed": 9, "transformations_per_example": 3, "pct_words_to_swap": 0.3});

    let first = registry
        .build("swap", &config, &full_resources())
        .unwrap()
        .augment(FOX)
        .unwrap();
    let second = registry
        .build("swap", &config, &full_resources())
        .unwrap()
        .augment(FOX)
        .unwrap();
    assert_eq!(first, second);
    assert_eq!(first.len(), 3);
}

#[test]
fn registry_passes_recipe_options_through() {
    let registry = ZiRecipeRegistry::with_defaults();
    let recipe = registry
        .build(
            "deepwordbug",
            &json!({"seed": 3, "pct_words_to_swap": 1.0, "max_edit_distance": 2}),
            &full_resources(),
        )
        .unwrap();
    for variant in recipe.augment(FOX).unwrap() {
        assert!(levenshtein_distance(FOX, &variant) <= 2);
    }
}

#[test]
fn registry_builds_from_json_and_yaml_documents() {
    let registry = ZiRecipeRegistry::with_defaults();
    let resources = full_resources();

    let from_json = registry
        .build_from_str(
            r#"{"recipe": "back_translation", "config": {"seed": 4, "chained_back_translation": 0, "target_lang": "de"}}"#,
            &resources,
        )
        .unwrap();
    assert_eq!(from_json.augment("I liked the movie").unwrap(), vec!["I liked the film"]);

    let yaml = "recipe: back_translation\nconfig:\n  seed: 4\n  chained_back_translation: 2\n";
    let from_yaml = registry.build_from_str(yaml, &resources).unwrap();
    assert_eq!(from_yaml.name(), "back_translation");
    assert_eq!(from_yaml.augment("I liked the movie").unwrap(), vec!["I liked the film"]);

    let bare = registry
        .build_from_str(r#"{"recipe": "deletion"}"#, &resources)
        .unwrap();
    assert_eq!(bare.name(), "deletion");

    assert!(registry.build_from_str("recipe: [unterminated", &resources).is_err());
}

#[test]
fn registry_builds_from_files() {
    let registry = ZiRecipeRegistry::with_defaults();
    let resources = full_resources();

    let mut json_file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    write!(
        json_file,
        r#"{{"recipe": "wordnet", "config": {{"seed": 2, "transformations_per_example": 2}}}}"#
    )
    .unwrap();
    let wordnet = registry.build_from_path(json_file.path(), &resources).unwrap();
    assert_eq!(wordnet.name(), "wordnet");
    assert_eq!(wordnet.augment(FOX).unwrap().len(), 2);

    let mut yaml_file = NamedTempFile::new().unwrap();
    writeln!(yaml_file, "recipe: eda").unwrap();
    writeln!(yaml_file, "config:").unwrap();
    writeln!(yaml_file, "  seed: 5").unwrap();
    writeln!(yaml_file, "  transformations_per_example: 4").unwrap();
    let eda = registry.build_from_path(yaml_file.path(), &resources).unwrap();
    assert_eq!(eda.name(), "eda");
    assert!(eda.augment(FOX).unwrap().len() <= 4);

    let err = registry
        .build_from_path("/definitely/not/here.yaml", &resources)
        .unwrap_err();
    assert!(matches!(err, ZiError::Io(_)));
}

#[test]
fn registry_document_round_trips_through_serde() {
    let document: ZiRecipeDocument =
        serde_json::from_value(json!({"recipe": "swap", "config": {"seed": 1}})).unwrap();
    assert_eq!(document.recipe, "swap");
    let recipe = ZiRecipeRegistry::with_defaults()
        .build_from_document(&document, &full_resources())
        .unwrap();
    assert_eq!(recipe.name(), "swap");
}

fn short_deletion(
    _config: &Value,
    resources: &ZiRecipeResources,
) -> Result<Box<dyn ZiRecipe + Send + Sync>> {
    Ok(Box::new(ZiDeletionRecipe::new(
        ZiAugmenterConfig::default().transformations_per_example(2),
        resources.rng.clone(),
    )?))
}

#[test]
fn registry_accepts_custom_factories() {
    let mut registry = ZiRecipeRegistry::new();
    assert!(registry.names().is_empty());

    registry.register("short_deletion", short_deletion);
    assert!(registry.contains("short_deletion"));

    let recipe = registry
        .build("short_deletion", &json!({}), &full_resources())
        .unwrap();
    assert_eq!(recipe.name(), "deletion");
    assert_eq!(recipe.augment(FOX).unwrap().len(), 2);
}

#[test]
fn registry_lazy_resources_fail_on_first_use() {
    let registry = ZiRecipeRegistry::with_defaults();
    let resources = ZiRecipeResources::new(ZiRng::seeded(1))
        .with_synonyms(Arc::new(ZiSynonymTable::from_path("/missing/synonyms.json")));

    let recipe = registry.build("wordnet", &json!({}), &resources).unwrap();
    match recipe.augment(FOX) {
        Err(ZiError::ResourceUnavailable { resource, .. }) => assert_eq!(resource, "synonyms"),
        other => panic!("unexpected result {other:?}"),
    }
    match execute_recipe(recipe.as_ref(), FOX) {
        Err(ZiError::Recipe { recipe, .. }) => assert_eq!(recipe, "wordnet"),
        other => panic!("unexpected result {other:?}"),
    }
}
