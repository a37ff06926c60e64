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

use std::collections::{BTreeSet, HashSet};
use std::sync::{Arc, Mutex};

use proptest::prelude::*;
use ziaug::constraints::{ZiRepeatModification, ZiStopwordModification};
use ziaug::errors::Result;
use ziaug::transformation::{
    ZiTransform, ZiWordDeletion, ZiWordInnerSwapRandom, ZiWordSwapSynonym,
};
use ziaug::{
    ZiAttackedText, ZiAugmenter, ZiAugmenterConfig, ZiConstraint, ZiError, ZiRng,
    ZiTransformation,
};

fn deletion_augmenter(config: ZiAugmenterConfig, seed: u64) -> ZiAugmenter {
    ZiAugmenter::new(
        ZiTransformation::atomic(ZiWordDeletion),
        vec![ZiConstraint::pre(ZiRepeatModification)],
        config,
        ZiRng::seeded(seed),
    )
    .unwrap()
}

fn synonym_augmenter(config: ZiAugmenterConfig, seed: u64) -> ZiAugmenter {
    ZiAugmenter::new(
        ZiTransformation::atomic(ZiWordSwapSynonym::new(common::synonyms())),
        vec![
            ZiConstraint::pre(ZiRepeatModification),
            ZiConstraint::pre(ZiStopwordModification::default()),
        ],
        config,
        ZiRng::seeded(seed),
    )
    .unwrap()
}

type Steps = Arc<Mutex<Vec<(ZiAttackedText, ZiAttackedText)>>>;

/// Records every candidate next to the text it was derived from.
#[derive(Debug)]
struct Recorded<T> {
    inner: T,
    steps: Steps,
}

impl<T: ZiTransform> ZiTransform for Recorded<T> {
    fn name(&self) -> &'static str {
        self.inner.name()
    }

    fn apply(
        &self,
        text: &ZiAttackedText,
        indices: &BTreeSet<usize>,
        rng: &ZiRng,
    ) -> Result<Vec<ZiAttackedText>> {
        let candidates = self.inner.apply(text, indices, rng)?;
        let mut steps = self.steps.lock().unwrap();
        for candidate in &candidates {
            steps.push((text.clone(), candidate.clone()));
        }
        Ok(candidates)
    }
}

fn recorded_augmenter(swap: bool, count: usize, seed: u64) -> (ZiAugmenter, Steps) {
    let steps = Steps::default();
    let transformation = if swap {
        ZiTransformation::atomic(Recorded {
            inner: ZiWordInnerSwapRandom,
            steps: steps.clone(),
        })
    } else {
        ZiTransformation::atomic(Recorded {
            inner: ZiWordSwapSynonym::new(common::synonyms()),
            steps: steps.clone(),
        })
    };
    let augmenter = ZiAugmenter::new(
        transformation,
        vec![
            ZiConstraint::pre(ZiRepeatModification),
            ZiConstraint::pre(ZiStopwordModification::default()),
        ],
        ZiAugmenterConfig::default()
            .pct_words_to_swap(1.0)
            .transformations_per_example(count),
        ZiRng::seeded(seed),
    )
    .unwrap();
    (augmenter, steps)
}

fn assert_distinct_variants(input: &str, variants: &[String]) {
    let unique: HashSet<&String> = variants.iter().collect();
    assert_eq!(unique.len(), variants.len(), "duplicates in {variants:?}");
    assert!(variants.iter().all(|variant| variant != input));
}

#[test]
fn augmenter_deletes_one_word_per_variant() {
    let augmenter = deletion_augmenter(
        ZiAugmenterConfig::default()
            .pct_words_to_swap(0.2)
            .transformations_per_example(3),
        11,
    );
    let input = "The quick brown fox jumps";
    let variants = augmenter.augment(input).unwrap();

    assert_eq!(variants.len(), 3);
    assert_distinct_variants(input, &variants);
    for variant in &variants {
        assert_eq!(variant.split_whitespace().count(), 4);
    }
}

#[test]
fn augmenter_empty_text_yields_nothing() {
    let augmenter = deletion_augmenter(ZiAugmenterConfig::default(), 1);
    assert!(augmenter.augment("").unwrap().is_empty());
    assert!(augmenter.augment("   ").unwrap().is_empty());
}

#[test]
fn augmenter_returns_fewer_variants_when_candidates_run_out() {
    let augmenter = synonym_augmenter(
        ZiAugmenterConfig::default().transformations_per_example(10),
        3,
    );
    let mut variants = augmenter.augment("quick brown fox").unwrap();
    variants.sort();
    assert_eq!(
        variants,
        vec![
            "fast brown fox",
            "quick brown vixen",
            "quick tan fox",
            "speedy brown fox"
        ]
    );
}

#[test]
fn augmenter_high_yield_collects_every_finished_candidate() {
    let augmenter = synonym_augmenter(
        ZiAugmenterConfig::default()
            .transformations_per_example(10)
            .high_yield(true),
        5,
    );
    let variants = augmenter.augment("quick brown fox").unwrap();
    assert_eq!(variants.len(), 4);
    assert_distinct_variants("quick brown fox", &variants);
}

#[test]
fn augmenter_fast_augment_stops_at_the_requested_count() {
    let augmenter = synonym_augmenter(
        ZiAugmenterConfig::default()
            .transformations_per_example(2)
            .fast_augment(true),
        5,
    );
    let variants = augmenter.augment("quick brown fox").unwrap();
    assert_eq!(variants.len(), 2);
    assert_distinct_variants("quick brown fox", &variants);
}

#[test]
fn augmenter_without_eligible_words_returns_nothing() {
    let augmenter = synonym_augmenter(
        ZiAugmenterConfig::default().transformations_per_example(4),
        2,
    );
    assert!(augmenter.augment("the and of it").unwrap().is_empty());
}

#[test]
fn augmenter_is_deterministic_under_a_seed() {
    let config = ZiAugmenterConfig::default()
        .pct_words_to_swap(0.5)
        .transformations_per_example(4);
    let input = "The quick brown fox jumps over the lazy dog";

    let first = deletion_augmenter(config.clone(), 42).augment(input).unwrap();
    let second = deletion_augmenter(config, 42).augment(input).unwrap();
    assert_eq!(first, second);
}

#[test]
fn augmenter_rejects_invalid_configuration() {
    let result = ZiAugmenter::new(
        ZiTransformation::atomic(ZiWordDeletion),
        Vec::new(),
        ZiAugmenterConfig::default().transformations_per_example(0),
        ZiRng::seeded(1),
    );
    assert!(matches!(result, Err(ZiError::Validation { .. })));

    let result = ZiAugmenter::new(
        ZiTransformation::atomic(ZiWordDeletion),
        Vec::new(),
        ZiAugmenterConfig::default().pct_words_to_swap(-0.1),
        ZiRng::seeded(1),
    );
    assert!(matches!(result, Err(ZiError::Validation { .. })));
}

#[test]
fn augmenter_with_ids_keeps_inputs_first() {
    let augmenter = synonym_augmenter(
        ZiAugmenterConfig::default().transformations_per_example(2),
        9,
    );
    let ids = vec!["a".to_string(), "b".to_string()];
    let (texts, out_ids) = augmenter
        .augment_text_with_ids(&["quick brown fox", "lazy dog"], &ids)
        .unwrap();

    assert_eq!(texts.len(), 6);
    assert_eq!(out_ids, vec!["a", "a", "a", "b", "b", "b"]);
    assert_eq!(texts[0], "quick brown fox");
    assert_eq!(texts[3], "lazy dog");
    assert_distinct_variants("quick brown fox", &texts[1..3]);
    assert_distinct_variants("lazy dog", &texts[4..6]);
}

#[test]
fn augmenter_with_ids_requires_matching_lengths() {
    let augmenter = deletion_augmenter(ZiAugmenterConfig::default(), 1);
    let result = augmenter.augment_text_with_ids(&["one two", "three four"], &["x".to_string()]);
    assert!(matches!(result, Err(ZiError::Validation { .. })));
}

#[test]
fn augmenter_keeps_structured_columns() {
    let augmenter = deletion_augmenter(
        ZiAugmenterConfig::default().transformations_per_example(2),
        4,
    );
    let input = ZiAttackedText::from_columns([
        ("premise", "A man sleeps soundly"),
        ("hypothesis", "Someone rests"),
    ]);
    let variants = augmenter.augment_text(&input).unwrap();

    assert_eq!(variants.len(), 2);
    for variant in &variants {
        assert_eq!(variant.column_labels(), vec!["premise", "hypothesis"]);
        assert_eq!(variant.num_words(), input.num_words() - 1);
    }
}

#[test]
fn augmenter_many_processes_each_input() {
    let augmenter = deletion_augmenter(ZiAugmenterConfig::default(), 8);
    let outputs = augmenter.augment_many(&["alpha beta gamma", "", "one two"]).unwrap();
    assert_eq!(outputs.len(), 3);
    assert_eq!(outputs[0].len(), 1);
    assert!(outputs[1].is_empty());
    assert_eq!(outputs[2].len(), 1);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn augmenter_output_is_bounded_and_distinct(
        pct in 0.0f64..=1.0,
        count in 1usize..6,
        seed in any::<u64>(),
    ) {
        let augmenter = deletion_augmenter(
            ZiAugmenterConfig::default()
                .pct_words_to_swap(pct)
                .transformations_per_example(count),
            seed,
        );
        let input = "the river runs past the old stone mill";
        let variants = augmenter.augment(input).unwrap();

        prop_assert!(variants.len() <= count);
        prop_assert!(!variants.is_empty());
        let unique: HashSet<&String> = variants.iter().collect();
        prop_assert_eq!(unique.len(), variants.len());
        for variant in &variants {
            prop_assert!(variant.split_whitespace().count() < 8);
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn augmenter_never_modifies_a_position_twice(
        words in prop::collection::vec(
            prop::sample::select(vec!["quick", "brown", "fox", "jumps", "lazy", "dog", "river"]),
            2..9,
        ),
        swap in any::<bool>(),
        count in 1usize..4,
        seed in any::<u64>(),
    ) {
        let (augmenter, steps) = recorded_augmenter(swap, count, seed);
        let input = words.join(" ");
        augmenter.augment(&input).unwrap();

        for (parent, candidate) in steps.lock().unwrap().iter() {
            let before = parent.words();
            let after = candidate.words();
            prop_assert_eq!(before.len(), after.len());
            for (index, (old, new)) in before.iter().zip(after.iter()).enumerate() {
                if old != new {
                    prop_assert!(
                        !parent.modified_indices().contains(&index),
                        "{} -> {} touched position {} again",
                        parent.text(),
                        candidate.text(),
                        index
                    );
                }
            }
        }
    }
}
