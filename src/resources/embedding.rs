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

//! # Embedding Resources
//!
//! [`ZiEmbeddingTable`] implements [`ZiWordEmbedding`] over a word to vector
//! map, either built in memory or read lazily from a GloVe-style text file
//! (`word v1 v2 ... vn`, one word per line). Nearest neighbours are found by
//! exhaustive cosine search, which is adequate for the vocabulary sizes used
//! in tests and small deployments.
//!
//! [`ZiMeanEmbeddingEncoder`] turns any word embedding into a sentence encoder
//! by averaging the vectors of the known words of a sentence.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use crate::errors::{Result, ZiError};
use crate::resources::{cosine_similarity, ZiSentenceEncoder, ZiWordEmbedding};
use crate::text::ZiAttackedText;

#[derive(Debug, Default)]
struct ZiEmbeddingData {
    words: Vec<String>,
    vectors: Vec<Vec<f32>>,
    index: HashMap<String, usize>,
    dimension: usize,
}

impl ZiEmbeddingData {
    fn insert(&mut self, word: &str, vector: Vec<f32>) -> std::result::Result<(), String> {
        if self.dimension == 0 {
            self.dimension = vector.len();
        } else if vector.len() != self.dimension {
            return Err(format!(
                "vector for '{word}' has dimension {}, expected {}",
                vector.len(),
                self.dimension
            ));
        }

        let key = word.to_lowercase();
        match self.index.get(&key) {
            Some(&slot) => self.vectors[slot] = vector,
            None => {
                self.index.insert(key.clone(), self.words.len());
                self.words.push(key);
                self.vectors.push(vector);
            }
        }
        Ok(())
    }
}

/// Word embedding table keyed by lowercased word.
#[derive(Debug)]
pub struct ZiEmbeddingTable {
    path: Option<PathBuf>,
    data: OnceLock<std::result::Result<ZiEmbeddingData, String>>,
}

impl ZiEmbeddingTable {
    /// In-memory table. Fails when the vectors disagree on dimension.
    pub fn from_vectors<I, W>(vectors: I) -> Result<Self>
    where
        I: IntoIterator<Item = (W, Vec<f32>)>,
        W: AsRef<str>,
    {
        let mut data = ZiEmbeddingData::default();
        for (word, vector) in vectors {
            data.insert(word.as_ref(), vector).map_err(ZiError::validation)?;
        }

        let cell = OnceLock::new();
        let _ = cell.set(Ok(data));
        Ok(Self {
            path: None,
            data: cell,
        })
    }

    /// Table backed by a GloVe-style text file, read on first use.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        Self {
            path: Some(path.as_ref().to_path_buf()),
            data: OnceLock::new(),
        }
    }

    fn load(&self) -> std::result::Result<ZiEmbeddingData, String> {
        let Some(path) = &self.path else {
            return Ok(ZiEmbeddingData::default());
        };
        let raw = fs::read_to_string(path)
            .map_err(|err| format!("failed to read {}: {err}", path.display()))?;

        let mut data = ZiEmbeddingData::default();
        for (line_no, line) in raw.lines().enumerate() {
            let mut parts = line.split_whitespace();
            let Some(word) = parts.next() else {
                continue;
            };
            let vector = parts
                .map(|value| value.parse::<f32>())
                .collect::<std::result::Result<Vec<f32>, _>>()
                .map_err(|err| format!("{}:{}: {err}", path.display(), line_no + 1))?;
            if vector.is_empty() {
                return Err(format!("{}:{}: missing vector", path.display(), line_no + 1));
            }
            data.insert(word, vector)
                .map_err(|err| format!("{}:{}: {err}", path.display(), line_no + 1))?;
        }

        log::debug!(
            "augment.resource.embedding.loaded: embedding table loaded - path={}, words={}, dimension={}",
            path.display(),
            data.words.len(),
            data.dimension
        );
        Ok(data)
    }

    fn data(&self) -> Result<&ZiEmbeddingData> {
        self.data
            .get_or_init(|| self.load())
            .as_ref()
            .map_err(|message| ZiError::resource_unavailable("embedding", message.clone()))
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.data()?.words.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.data()?.words.is_empty())
    }
}

impl ZiWordEmbedding for ZiEmbeddingTable {
    fn nearest_neighbours(&self, word: &str, k: usize) -> Result<Vec<String>> {
        let data = self.data()?;
        let Some(&target) = data.index.get(&word.to_lowercase()) else {
            return Ok(Vec::new());
        };

        let query = &data.vectors[target];
        let mut scored: Vec<(f64, &str)> = data
            .words
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != target)
            .map(|(i, w)| (cosine_similarity(query, &data.vectors[i]), w.as_str()))
            .collect();
        scored.sort_by(|a, b| {
            b.0.partial_cmp(&a.0)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.1.cmp(b.1))
        });

        Ok(scored
            .into_iter()
            .take(k)
            .map(|(_, w)| w.to_string())
            .collect())
    }

    fn cosine_similarity(&self, a: &str, b: &str) -> Result<Option<f64>> {
        let data = self.data()?;
        let lookup = |w: &str| data.index.get(&w.to_lowercase()).copied();
        Ok(match (lookup(a), lookup(b)) {
            (Some(i), Some(j)) => Some(cosine_similarity(&data.vectors[i], &data.vectors[j])),
            _ => None,
        })
    }

    fn vector(&self, word: &str) -> Result<Option<Vec<f32>>> {
        let data = self.data()?;
        Ok(data
            .index
            .get(&word.to_lowercase())
            .map(|&i| data.vectors[i].clone()))
    }

    fn dimension(&self) -> Result<usize> {
        Ok(self.data()?.dimension)
    }
}

/// Sentence encoder averaging the word vectors of known words.
#[derive(Clone, Debug)]
pub struct ZiMeanEmbeddingEncoder {
    embedding: Arc<dyn ZiWordEmbedding>,
}

impl ZiMeanEmbeddingEncoder {
    pub fn new(embedding: Arc<dyn ZiWordEmbedding>) -> Self {
        Self { embedding }
    }
}

impl ZiSentenceEncoder for ZiMeanEmbeddingEncoder {
    fn encode(&self, sentences: &[String]) -> Result<Vec<Vec<f32>>> {
        let dimension = self.embedding.dimension()?;
        sentences
            .iter()
            .map(|sentence| {
                let mut sum = vec![0.0f32; dimension];
                let mut known = 0usize;
                for word in ZiAttackedText::new(sentence).words() {
                    if let Some(vector) = self.embedding.vector(word)? {
                        for (acc, value) in sum.iter_mut().zip(vector.iter()) {
                            *acc += value;
                        }
                        known += 1;
                    }
                }
                if known > 0 {
                    for acc in sum.iter_mut() {
                        *acc /= known as f32;
                    }
                }
                Ok(sum)
            })
            .collect()
    }
}
