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

//! # ZiAug Library
//!
//! Text augmentation recipes for the Zi data quality framework. A recipe
//! binds a transformation, a list of constraints and a selection policy into
//! an augmenter that turns one input text into several perturbed variants.
//!
//! ## Module Overview
//!
//! - **text**: [`ZiAttackedText`], the word-indexed text every component works on
//! - **transformation**: word, character, CheckList, masked-LM and sentence
//!   transformations plus the composite transformation
//! - **constraints**: pre- and post-transformation constraints and the
//!   constraint chain
//! - **augmenter**: the generate, filter, select driver
//! - **recipes**: the recipe catalog, the aggregate EDA recipe and the registry
//! - **resources**: capability traits for lexicons and models, with file-backed
//!   tables
//! - **rng**: the seedable random source shared by a recipe
//!
//! ## Quick Start
//!
//! ```rust
//! use ziaug::augmenter::ZiAugmenterConfig;
//! use ziaug::recipes::{ZiDeletionRecipe, ZiRecipe};
//! use ziaug::rng::ZiRng;
//!
//! let recipe = ZiDeletionRecipe::new(
//!     ZiAugmenterConfig::default().transformations_per_example(2),
//!     ZiRng::seeded(42),
//! )
//! .unwrap();
//! for variant in recipe.augment("The quick brown fox jumps").unwrap() {
//!     println!("{variant}");
//! }
//! ```
//!
//! ## Models
//!
//! Lexicons, embeddings, language models, taggers and translators are not
//! bundled. Recipes that need them take trait objects from [`resources`];
//! tests and small deployments can use the in-memory or file-backed tables
//! provided there.
//!
//! ## Error Handling
//!
//! All operations return `Result<T, ZiError>`. Recipe construction validates
//! its parameters eagerly and never augments.

#![allow(non_snake_case)]

pub mod augmenter;
pub mod constraints;
pub mod errors;
pub mod recipes;
pub mod resources;
pub mod rng;
pub mod text;
pub mod transformation;

pub use augmenter::{ZiAugmenter, ZiAugmenterConfig};
pub use constraints::{ZiConstraint, ZiConstraintChain};
pub use errors::{Result, ZiError};
pub use recipes::{execute_recipe, ZiRecipe, ZiRecipeDocument, ZiRecipeRegistry};
pub use resources::ZiRecipeResources;
pub use rng::ZiRng;
pub use text::ZiAttackedText;
pub use transformation::{
    ZiCompositeStrategy, ZiCompositeTransformation, ZiTransform, ZiTransformation,
};
