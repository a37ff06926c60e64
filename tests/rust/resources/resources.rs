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

use std::io::Write;
use std::sync::Arc;

use tempfile::NamedTempFile;
use ziaug::errors::ZiError;
use ziaug::resources::{
    ZiEmbeddingTable, ZiLexiconTagger, ZiMeanEmbeddingEncoder, ZiPartOfSpeechTagger,
    ZiRecipeResources, ZiSentenceEncoder, ZiSynonymSource, ZiSynonymTable, ZiWordEmbedding,
};
use ziaug::ZiRng;

fn file_with(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn resources_synonym_table_reads_json_lazily() {
    let file = file_with(r#"{"Quick": ["fast", "quick", "very_fast", "fast", "speedy"]}"#);
    let table = ZiSynonymTable::from_path(file.path());

    assert_eq!(table.synonyms("quick").unwrap(), vec!["fast", "speedy"]);
    assert_eq!(table.synonyms("QUICK").unwrap(), vec!["fast", "speedy"]);
    assert!(table.synonyms("slow").unwrap().is_empty());
    assert_eq!(table.len().unwrap(), 1);
}

#[test]
fn resources_missing_synonym_file_fails_on_first_lookup() {
    let table = ZiSynonymTable::from_path("/no/such/dir/synonyms.json");
    for _ in 0..2 {
        match table.synonyms("quick") {
            Err(ZiError::ResourceUnavailable { resource, .. }) => assert_eq!(resource, "synonyms"),
            other => panic!("unexpected result {other:?}"),
        }
    }
}

#[test]
fn resources_malformed_synonym_file_is_unavailable() {
    let file = file_with("not json at all");
    let table = ZiSynonymTable::from_path(file.path());
    assert!(matches!(
        table.is_empty(),
        Err(ZiError::ResourceUnavailable { .. })
    ));
}

#[test]
fn resources_synonym_table_accepts_additions() {
    let mut table = ZiSynonymTable::new();
    assert!(table.is_empty().unwrap());
    table.add("Happy", &["glad", "cheerful"]);
    assert_eq!(table.synonyms("happy").unwrap(), vec!["glad", "cheerful"]);
}

#[test]
fn resources_embedding_table_reads_glove_text() {
    let file = file_with("king 1.0 0.0\nqueen 0.9 0.1\napple 0.0 1.0\n\npear 0.1 0.95\n");
    let table = ZiEmbeddingTable::from_path(file.path());

    assert_eq!(table.len().unwrap(), 4);
    assert_eq!(table.dimension().unwrap(), 2);
    assert_eq!(table.nearest_neighbours("King", 2).unwrap(), vec!["queen", "pear"]);
    assert!(table.nearest_neighbours("banana", 3).unwrap().is_empty());
    assert_eq!(table.vector("apple").unwrap(), Some(vec![0.0, 1.0]));
    assert_eq!(table.cosine_similarity("king", "banana").unwrap(), None);

    let similarity = table.cosine_similarity("king", "apple").unwrap().unwrap();
    assert!(similarity.abs() < 1e-9);
}

#[test]
fn resources_embedding_table_rejects_ragged_vectors() {
    let file = file_with("king 1.0 0.0\nqueen 0.9\n");
    let table = ZiEmbeddingTable::from_path(file.path());
    assert!(matches!(
        table.dimension(),
        Err(ZiError::ResourceUnavailable { .. })
    ));

    let in_memory = ZiEmbeddingTable::from_vectors(vec![
        ("king", vec![1.0_f32, 0.0]),
        ("queen", vec![0.9_f32]),
    ]);
    assert!(matches!(in_memory, Err(ZiError::Validation { .. })));
}

#[test]
fn resources_missing_embedding_file_fails_on_first_use() {
    let table = ZiEmbeddingTable::from_path("/no/such/dir/vectors.txt");
    match table.nearest_neighbours("king", 3) {
        Err(ZiError::ResourceUnavailable { resource, .. }) => assert_eq!(resource, "embedding"),
        other => panic!("unexpected result {other:?}"),
    }
}

#[test]
fn resources_mean_encoder_averages_known_words() {
    let table = Arc::new(
        ZiEmbeddingTable::from_vectors(vec![
            ("good", vec![1.0_f32, 0.0]),
            ("movie", vec![0.0_f32, 1.0]),
        ])
        .unwrap(),
    );
    let encoder = ZiMeanEmbeddingEncoder::new(table);
    let vectors = encoder
        .encode(&["Good movie!".to_string(), "unknown words".to_string()])
        .unwrap();

    assert_eq!(vectors, vec![vec![0.5, 0.5], vec![0.0, 0.0]]);
}

#[test]
fn resources_lexicon_tagger_falls_back_to_default_tag() {
    let mut tagger = ZiLexiconTagger::new();
    tagger.add("Run", "VERB");
    assert_eq!(tagger.tag(&["run", "fast"]).unwrap(), vec!["VERB", "X"]);

    let noun_default = tagger.with_default_tag("NOUN");
    assert_eq!(noun_default.tag(&["RUN", "table"]).unwrap(), vec!["VERB", "NOUN"]);
}

#[test]
fn resources_bundle_reports_missing_handles() {
    let bare = ZiRecipeResources::new(ZiRng::seeded(1));
    assert!(matches!(
        bare.require_embedding(),
        Err(ZiError::ResourceUnavailable { .. })
    ));
    assert!(matches!(
        bare.require_translator(),
        Err(ZiError::ResourceUnavailable { .. })
    ));

    let with_synonyms = bare.with_synonyms(Arc::new(ZiSynonymTable::new()));
    assert!(with_synonyms.require_synonyms().is_ok());
    assert!(with_synonyms.require_masked_lm().is_err());
}
