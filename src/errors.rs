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

//! # ZiAug Error Module
//!
//! This module defines the error types used throughout the augmentation
//! recipes for consistent error handling and reporting.
//!
//! ## Error Handling Philosophy
//!
//! - **Fail Fast**: Recipe and augmenter parameters are validated when the
//!   recipe is constructed, never deferred to the first `augment` call
//! - **Propagate**: Failures of external capabilities (embeddings, masked
//!   language models, translators) are surfaced to the caller unchanged;
//!   nothing is retried or degraded
//! - **Context-Rich**: Errors carry the name of the transformation, constraint
//!   or recipe that failed
//!
//! ## Error Categories
//!
//! - **Io**: Filesystem errors while loading tables
//! - **Validation**: Invalid parameters or inputs
//! - **ResourceUnavailable**: Missing or unloadable external resources
//! - **Transformation**: Failures raised while generating candidates
//! - **Constraint**: Failures raised while checking candidates
//! - **Recipe**: Failures wrapped with the recipe name
//! - **Serde**: Serialization/deserialization errors
//! - **Internal**: Unexpected internal failures
//!
//! ## Usage
//!
//! ```rust
//! use ziaug::errors::{Result, ZiError};
//!
//! fn check_fraction(pct: f64) -> Result<f64> {
//!     if !(0.0..=1.0).contains(&pct) {
//!         return Err(ZiError::validation("pct_words_to_swap must be in [0, 1]"));
//!     }
//!     Ok(pct)
//! }
//! ```

use std::io;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Convenience result type used throughout ZiAug.
pub type Result<T> = std::result::Result<T, ZiError>;

/// Canonical error enumeration for ZiAug.
#[derive(Debug, Error, Serialize, Deserialize)]
pub enum ZiError {
    /// Errors originating from filesystem IO.
    #[error("io error: {0}")]
    Io(String),

    /// Validation errors triggered by invalid parameters or inputs.
    #[error("validation error: {message}")]
    Validation { message: String },

    /// An external resource (embedding table, model weights, lexicon) could
    /// not be found or loaded.
    #[error("resource '{resource}' unavailable: {message}")]
    ResourceUnavailable { resource: String, message: String },

    /// Any failure raised while a transformation generates candidates.
    #[error("transformation '{transformation}' failed: {message}")]
    Transformation {
        transformation: String,
        message: String,
    },

    /// Any failure raised while a constraint checks a candidate.
    #[error("constraint '{constraint}' failed: {message}")]
    Constraint { constraint: String, message: String },

    /// Failures surfaced by a recipe.
    #[error("recipe '{recipe}' failed: {message}")]
    Recipe { recipe: String, message: String },

    /// Wrapper for serde-style serialization issues.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Catch-all variant for unexpected situations.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<io::Error> for ZiError {
    fn from(err: io::Error) -> Self {
        ZiError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for ZiError {
    fn from(err: serde_json::Error) -> Self {
        ZiError::Serde(err.to_string())
    }
}

impl From<serde_yaml::Error> for ZiError {
    fn from(err: serde_yaml::Error) -> Self {
        ZiError::Serde(err.to_string())
    }
}

impl ZiError {
    /// Helper to construct simple validation errors.
    pub fn validation<T: Into<String>>(message: T) -> Self {
        ZiError::Validation {
            message: message.into(),
        }
    }

    /// Helper to construct resource-unavailable errors.
    pub fn resource_unavailable(resource: impl Into<String>, message: impl Into<String>) -> Self {
        ZiError::ResourceUnavailable {
            resource: resource.into(),
            message: message.into(),
        }
    }

    /// Helper to construct transformation errors.
    pub fn transformation(name: impl Into<String>, message: impl Into<String>) -> Self {
        ZiError::Transformation {
            transformation: name.into(),
            message: message.into(),
        }
    }

    /// Helper to construct constraint errors.
    pub fn constraint(name: impl Into<String>, message: impl Into<String>) -> Self {
        ZiError::Constraint {
            constraint: name.into(),
            message: message.into(),
        }
    }

    /// Helper to construct recipe errors.
    pub fn recipe(name: impl Into<String>, message: impl Into<String>) -> Self {
        ZiError::Recipe {
            recipe: name.into(),
            message: message.into(),
        }
    }

    /// Helper to construct internal errors.
    pub fn internal<T: Into<String>>(message: T) -> Self {
        ZiError::Internal(message.into())
    }
}
