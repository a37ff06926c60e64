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

use std::collections::BTreeSet;
use std::sync::Arc;

use ziaug::rng::ZiRng;
use ziaug::text::ZiAttackedText;
use ziaug::transformation::{
    ZiBackTranslation, ZiCharacterEditOptions, ZiCompositeStrategy, ZiTransform,
    ZiTransformation, ZiWordDeletion, ZiWordInnerSwapRandom, ZiWordInsertionMaskedLm,
    ZiWordInsertionRandomSynonym, ZiWordMergeMaskedLm, ZiWordSwapChangeLocation,
    ZiWordSwapChangeName, ZiWordSwapChangeNumber, ZiWordSwapContract, ZiWordSwapEmbedding,
    ZiWordSwapExtend, ZiWordSwapHomoglyphSwap, ZiWordSwapMaskedLm,
    ZiWordSwapNeighboringCharacterSwap, ZiWordSwapQwerty, ZiWordSwapRandomCharacterDeletion,
    ZiWordSwapRandomCharacterInsertion, ZiWordSwapSynonym,
};

use common::{FakeMaskedLm, TagTranslator};

fn all(text: &ZiAttackedText) -> BTreeSet<usize> {
    (0..text.num_words()).collect()
}

fn only(indices: &[usize]) -> BTreeSet<usize> {
    indices.iter().copied().collect()
}

fn texts(candidates: &[ZiAttackedText]) -> Vec<String> {
    candidates.iter().map(ZiAttackedText::text).collect()
}

#[test]
fn transformation_deletion_one_candidate_per_index() {
    let text = ZiAttackedText::new("The quick brown fox");
    let out = ZiWordDeletion
        .apply(&text, &only(&[1, 2]), &ZiRng::seeded(1))
        .unwrap();
    assert_eq!(texts(&out), vec!["The brown fox", "The quick fox"]);
}

#[test]
fn transformation_deletion_keeps_last_word() {
    let text = ZiAttackedText::new("Alone");
    let out = ZiWordDeletion.apply(&text, &all(&text), &ZiRng::seeded(1)).unwrap();
    assert!(out.is_empty());
}

#[test]
fn transformation_inner_swap_exchanges_words() {
    let text = ZiAttackedText::new("alpha beta");
    let out = ZiWordInnerSwapRandom
        .apply(&text, &all(&text), &ZiRng::seeded(3))
        .unwrap();
    assert_eq!(texts(&out), vec!["beta alpha", "beta alpha"]);
    assert_eq!(
        out[0].modified_indices().iter().copied().collect::<Vec<_>>(),
        vec![0, 1]
    );
}

#[test]
fn transformation_inner_swap_partner_is_eligible_too() {
    let text = ZiAttackedText::new("alpha beta gamma delta");
    for seed in 0..20 {
        let out = ZiWordInnerSwapRandom
            .apply(&text, &only(&[2, 3]), &ZiRng::seeded(seed))
            .unwrap();
        assert_eq!(texts(&out), vec!["alpha beta delta gamma"; 2]);
        for candidate in &out {
            assert_eq!(
                candidate.modified_indices().iter().copied().collect::<Vec<_>>(),
                vec![2, 3]
            );
        }
    }

    let lone = ZiWordInnerSwapRandom
        .apply(&text, &only(&[0]), &ZiRng::seeded(3))
        .unwrap();
    assert!(lone.is_empty());
}

#[test]
fn transformation_synonym_swap_recovers_case() {
    let text = ZiAttackedText::new("Quick fox");
    let transform = ZiWordSwapSynonym::new(common::synonyms());
    let out = transform.apply(&text, &all(&text), &ZiRng::seeded(1)).unwrap();
    assert_eq!(texts(&out), vec!["Fast fox", "Speedy fox", "Quick vixen"]);
}

#[test]
fn transformation_synonym_insertion_adds_a_word() {
    let text = ZiAttackedText::new("quick");
    let transform = ZiWordInsertionRandomSynonym::new(common::synonyms());
    let out = transform.apply(&text, &only(&[0]), &ZiRng::seeded(9)).unwrap();
    assert_eq!(out.len(), 1);
    let rendered = out[0].text();
    assert!(rendered == "fast quick" || rendered == "speedy quick", "{rendered}");
}

#[test]
fn transformation_embedding_swap_uses_neighbours() {
    let text = ZiAttackedText::new("A Good movie");
    let transform = ZiWordSwapEmbedding::new(common::embedding(), 2).unwrap();
    let out = transform.apply(&text, &only(&[1]), &ZiRng::seeded(1)).unwrap();
    assert_eq!(texts(&out), vec!["A Great movie", "A Fine movie"]);
    assert!(ZiWordSwapEmbedding::new(common::embedding(), 0).is_err());
}

#[test]
fn transformation_neighbour_swap_respects_skips() {
    let text = ZiAttackedText::new("abcd");
    let options = ZiCharacterEditOptions::default()
        .random_one(false)
        .skip_first_char(true)
        .skip_last_char(true);
    let out = ZiWordSwapNeighboringCharacterSwap::new(options)
        .apply(&text, &all(&text), &ZiRng::seeded(1))
        .unwrap();
    assert_eq!(texts(&out), vec!["acbd"]);
}

#[test]
fn transformation_character_deletion_enumerates_positions() {
    let text = ZiAttackedText::new("abc");
    let options = ZiCharacterEditOptions::default().random_one(false);
    let out = ZiWordSwapRandomCharacterDeletion::new(options)
        .apply(&text, &all(&text), &ZiRng::seeded(1))
        .unwrap();
    assert_eq!(texts(&out), vec!["bc", "ac", "ab"]);
}

#[test]
fn transformation_qwerty_uses_adjacent_keys() {
    let text = ZiAttackedText::new("ask");
    let options = ZiCharacterEditOptions::default()
        .random_one(false)
        .skip_first_char(true)
        .skip_last_char(true);
    let out = ZiWordSwapQwerty::new(options)
        .apply(&text, &all(&text), &ZiRng::seeded(1))
        .unwrap();
    assert_eq!(out.len(), 8);
    assert!(texts(&out).contains(&"adk".to_string()));
}

#[test]
fn transformation_space_insertion_splits_word() {
    let text = ZiAttackedText::new("hello world");
    let options = ZiCharacterEditOptions::default()
        .skip_first_char(true)
        .skip_last_char(true);
    let transform = ZiWordSwapRandomCharacterInsertion::with_letters(options, " ").unwrap();
    let out = transform.apply(&text, &only(&[0]), &ZiRng::seeded(4)).unwrap();
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].num_words(), 3);
    assert!(ZiWordSwapRandomCharacterInsertion::with_letters(options, "").is_err());
}

#[test]
fn transformation_homoglyph_changes_one_character() {
    let text = ZiAttackedText::new("cat");
    let out = ZiWordSwapHomoglyphSwap::new(false)
        .apply(&text, &all(&text), &ZiRng::seeded(1))
        .unwrap();
    assert!(!out.is_empty());
    for candidate in &out {
        let word: Vec<char> = candidate.word(0).unwrap().chars().collect();
        let differing = word.iter().zip("cat".chars()).filter(|(a, b)| **a != *b).count();
        assert_eq!(differing, 1);
    }
}

#[test]
fn transformation_change_number_stays_in_range() {
    let text = ZiAttackedText::new("I have 10 apples");
    let transform = ZiWordSwapChangeNumber::new(1.0, 3).unwrap();
    let out = transform.apply(&text, &all(&text), &ZiRng::seeded(11)).unwrap();
    assert!(!out.is_empty());
    for candidate in &out {
        let value: i64 = candidate.word(2).unwrap().parse().unwrap();
        assert!((1..=20).contains(&value));
        assert_ne!(value, 10);
    }
    assert!(ZiWordSwapChangeNumber::new(-1.0, 3).is_err());
}

#[test]
fn transformation_change_number_handles_extreme_integers() {
    let transform = ZiWordSwapChangeNumber::new(1.0, 3).unwrap();
    for (input, number) in [
        ("paid 9000000000000000000 dollars", 9_000_000_000_000_000_000),
        ("has 9223372036854775807 coins", i64::MAX),
    ] {
        let text = ZiAttackedText::new(input);
        let out = transform.apply(&text, &all(&text), &ZiRng::seeded(4)).unwrap();
        assert!(!out.is_empty(), "no variants for {input}");
        for candidate in &out {
            let value: i64 = candidate.word(1).unwrap().parse().unwrap();
            assert_ne!(value, number);
            assert!(value >= 1);
        }
    }
}

#[test]
fn transformation_change_name_draws_other_names() {
    let text = ZiAttackedText::new("John went home");
    let transform = ZiWordSwapChangeName::new(3, false, false).unwrap();
    let out = transform.apply(&text, &all(&text), &ZiRng::seeded(2)).unwrap();
    assert_eq!(out.len(), 3);
    for candidate in &out {
        assert_ne!(candidate.word(0), Some("John"));
        assert_eq!(candidate.word(1), Some("went"));
    }
}

#[test]
fn transformation_change_location_ignores_unknown_words() {
    let text = ZiAttackedText::new("I live in Paris");
    let transform = ZiWordSwapChangeLocation::new(2).unwrap();
    let out = transform.apply(&text, &all(&text), &ZiRng::seeded(2)).unwrap();
    assert_eq!(out.len(), 2);
    assert!(out.iter().all(|c| c.word(3) != Some("Paris")));
    assert!(out.iter().all(|c| c.word(0) == Some("I")));
}

#[test]
fn transformation_extend_and_contract() {
    let rng = ZiRng::seeded(1);

    let text = ZiAttackedText::new("I don't know");
    let out = ZiWordSwapExtend.apply(&text, &all(&text), &rng).unwrap();
    assert_eq!(texts(&out), vec!["I do not know"]);

    let text = ZiAttackedText::new("I'm here");
    let out = ZiWordSwapExtend.apply(&text, &all(&text), &rng).unwrap();
    assert_eq!(texts(&out), vec!["I am here"]);

    let text = ZiAttackedText::new("They are here");
    let out = ZiWordSwapContract.apply(&text, &all(&text), &rng).unwrap();
    assert_eq!(texts(&out), vec!["They're here"]);

    let text = ZiAttackedText::new("I do not know");
    let out = ZiWordSwapContract.apply(&text, &only(&[1]), &rng).unwrap();
    assert!(out.is_empty());
    let out = ZiWordSwapContract.apply(&text, &only(&[1, 2]), &rng).unwrap();
    assert_eq!(texts(&out), vec!["I don't know"]);
}

fn fake_model() -> Arc<FakeMaskedLm> {
    Arc::new(FakeMaskedLm {
        fillers: vec![
            ("good", 0.6),
            ("great", 0.5),
            ("the", 0.3),
            ("##ly", 0.2),
            ("New York", 0.1),
            (".", 0.05),
        ],
    })
}

#[test]
fn transformation_masked_lm_swap_filters_fillers() {
    let text = ZiAttackedText::new("a good movie");
    let transform = ZiWordSwapMaskedLm::new(fake_model(), 6, 0.0).unwrap();
    let out = transform.apply(&text, &only(&[1]), &ZiRng::seeded(1)).unwrap();
    assert_eq!(texts(&out), vec!["a great movie", "a the movie", "a ly movie"]);

    let confident = ZiWordSwapMaskedLm::new(fake_model(), 6, 0.25).unwrap();
    let out = confident.apply(&text, &only(&[1]), &ZiRng::seeded(1)).unwrap();
    assert_eq!(texts(&out), vec!["a great movie", "a the movie"]);

    assert!(ZiWordSwapMaskedLm::new(fake_model(), 6, 2.0).is_err());
}

#[test]
fn transformation_masked_lm_insert_and_merge() {
    let text = ZiAttackedText::new("a movie");
    let insert = ZiWordInsertionMaskedLm::new(fake_model(), 2, 0.0).unwrap();
    let out = insert.apply(&text, &only(&[1]), &ZiRng::seeded(1)).unwrap();
    assert_eq!(texts(&out), vec!["a good movie", "a great movie"]);

    let text = ZiAttackedText::new("a very good movie");
    let merge = ZiWordMergeMaskedLm::new(fake_model(), 3, 0.0).unwrap();
    let out = merge.apply(&text, &only(&[1, 2]), &ZiRng::seeded(1)).unwrap();
    assert_eq!(texts(&out), vec!["a great movie", "a the movie"]);
    assert_eq!(out[0].words_perturbed(), 2);
}

#[test]
fn transformation_back_translation_round_trips() {
    let translator = Arc::new(TagTranslator);
    let text = ZiAttackedText::new("I liked the movie");

    let single = ZiBackTranslation::new(translator.clone(), "en", "de", 0).unwrap();
    let out = single.apply(&text, &BTreeSet::new(), &ZiRng::seeded(1)).unwrap();
    assert_eq!(texts(&out), vec!["I liked the film"]);

    let chained = ZiBackTranslation::new(translator.clone(), "en", "es", 3).unwrap();
    let out = chained.apply(&text, &all(&text), &ZiRng::seeded(5)).unwrap();
    assert_eq!(texts(&out), vec!["I liked the film"]);

    let unchanged = ZiAttackedText::new("Hello there");
    assert!(chained
        .apply(&unchanged, &all(&unchanged), &ZiRng::seeded(5))
        .unwrap()
        .is_empty());

    assert!(ZiBackTranslation::new(translator, "en", "en", 0).is_err());
}

#[test]
fn transformation_composite_all_unions_children() {
    let children: Vec<Box<dyn ZiTransform>> = vec![
        Box::new(ZiWordDeletion),
        Box::new(ZiWordSwapSynonym::new(common::synonyms())),
    ];
    let composite = ZiTransformation::composite(children, ZiCompositeStrategy::All).unwrap();
    let text = ZiAttackedText::new("quick fox");
    let out = composite.apply(&text, &only(&[1]), &ZiRng::seeded(1)).unwrap();
    assert_eq!(texts(&out), vec!["quick", "quick vixen"]);
    assert_eq!(composite.name(), "composite(word.deletion, word.swap_synonym)");
}

#[test]
fn transformation_composite_weighted_draws_one_child() {
    let children: Vec<Box<dyn ZiTransform>> = vec![
        Box::new(ZiWordDeletion),
        Box::new(ZiWordSwapSynonym::new(common::synonyms())),
    ];
    let composite =
        ZiTransformation::composite(children, ZiCompositeStrategy::Weighted(vec![1.0, 3.0]))
            .unwrap();
    let text = ZiAttackedText::new("quick fox");
    for seed in 0..10 {
        let out = composite.apply(&text, &only(&[1]), &ZiRng::seeded(seed)).unwrap();
        let rendered = texts(&out);
        assert!(rendered == vec!["quick"] || rendered == vec!["quick vixen"]);
    }
}
