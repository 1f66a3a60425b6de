//! Runtime settings.
//!
//! Settings come from the environment (a `.env` file is honoured) or from
//! any key lookup, which is how the CLI layers its flags on top.

use crate::error::{Error, Result};
use std::fmt;

/// Environment variable holding the API base URL.
pub const API_BASE_URL_VAR: &str = "OPENAI_API_BASE_URL";
/// Environment variable holding the API key.
pub const API_KEY_VAR: &str = "OPENAI_API_KEY";
/// Environment variable holding the simple-mode image model.
pub const SIMPLE_IMAGE_MODEL_VAR: &str = "SIMPLE_IMAGE_MODEL";
/// Environment variable holding the simple-mode solver model.
pub const SIMPLE_SOLVER_MODEL_VAR: &str = "SIMPLE_SOLVER_MODEL";
/// Environment variable holding the complex-mode image model.
pub const COMPLEX_IMAGE_MODEL_VAR: &str = "COMPLEX_IMAGE_MODEL";
/// Environment variable holding the complex-mode solver model.
pub const COMPLEX_SOLVER_MODEL_VAR: &str = "COMPLEX_SOLVER_MODEL";

/// Models used for one solving mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelPair {
    /// Model that describes the problem image.
    pub image: String,
    /// Model that writes the solution.
    pub solver: String,
}

impl ModelPair {
    /// Creates a model pair.
    pub fn new(image: impl Into<String>, solver: impl Into<String>) -> Self {
        Self {
            image: image.into(),
            solver: solver.into(),
        }
    }
}

/// Model selection for both solving modes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelCatalog {
    /// Models for simple problems.
    pub simple: ModelPair,
    /// Models for complex problems.
    pub complex: ModelPair,
}

impl ModelCatalog {
    /// Returns the models for the requested mode.
    #[must_use]
    pub const fn select(&self, complex: bool) -> &ModelPair {
        if complex { &self.complex } else { &self.simple }
    }
}

/// Validated application settings.
#[derive(Clone, PartialEq, Eq)]
pub struct Settings {
    /// Base URL of the OpenAI-compatible API.
    pub api_base_url: String,
    /// API key.
    pub api_key: String,
    /// Model selection.
    pub models: ModelCatalog,
}

impl Settings {
    /// Loads settings from the process environment, reading `.env` first.
    ///
    /// Values in `.env` replace variables already set in the environment.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] naming every missing variable.
    pub fn from_env() -> Result<Self> {
        if let Ok(path) = dotenvy::dotenv_override() {
            tracing::debug!(path = %path.display(), "loaded .env file");
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds settings from an arbitrary key lookup.
    ///
    /// Empty values count as missing.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] naming every missing key, in declaration
    /// order.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut missing = Vec::new();
        let mut get = |key: &'static str| {
            let value = lookup(key).filter(|v| !v.trim().is_empty());
            if value.is_none() {
                missing.push(key);
            }
            value.unwrap_or_default()
        };

        let api_base_url = get(API_BASE_URL_VAR);
        let api_key = get(API_KEY_VAR);
        let simple_image = get(SIMPLE_IMAGE_MODEL_VAR);
        let simple_solver = get(SIMPLE_SOLVER_MODEL_VAR);
        let complex_image = get(COMPLEX_IMAGE_MODEL_VAR);
        let complex_solver = get(COMPLEX_SOLVER_MODEL_VAR);

        if !missing.is_empty() {
            return Err(Error::Config {
                message: format!(
                    "missing required settings: {}. Check your .env file",
                    missing.join(", ")
                ),
            });
        }

        Ok(Self {
            api_base_url,
            api_key,
            models: ModelCatalog {
                simple: ModelPair::new(simple_image, simple_solver),
                complex: ModelPair::new(complex_image, complex_solver),
            },
        })
    }

    /// Returns the models for the requested mode.
    #[must_use]
    pub const fn models(&self, complex: bool) -> &ModelPair {
        self.models.select(complex)
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("api_base_url", &self.api_base_url)
            .field("api_key", &"<redacted>")
            .field("models", &self.models)
            .finish()
    }
}
