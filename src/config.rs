//! Harness configuration.
//!
//! The configuration is the provider half of the test matrix. Every
//! [`ProviderConfig`] fans out into one test group per feature of the
//! [`SharedLibrary`](crate::library::SharedLibrary).
//!
//! Loading the configuration from files or the command line is up to the
//! caller. The types implement [`serde::Deserialize`] so any serde format
//! works, [`HarnessConfig::from_json_str`] is provided for the common case.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The provider matrix handed to the [`Runner`](crate::runner::Runner).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HarnessConfig {
    /// Providers in the order their groups should be generated.
    #[serde(default)]
    pub providers: Vec<ProviderConfig>,
}

impl HarnessConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn with_provider(mut self, provider: impl Into<ProviderConfig>) -> Self {
        self.providers.push(provider.into());
        self
    }
}

/// One row of the provider matrix.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub name: String,
    #[serde(default)]
    pub options: ProviderOptions,
}

impl ProviderConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            options: ProviderOptions::default(),
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.options.contexts.push(context.into());
        self
    }

    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options.extra.insert(key.into(), value.into());
        self
    }
}

impl From<&str> for ProviderConfig {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for ProviderConfig {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

/// Options of a single provider.
///
/// Only `contexts` is interpreted by the harness. Every other key is kept as is
/// and passed through to the behavior templates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProviderOptions {
    /// Shared contexts mixed into every group of this provider, in order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub contexts: Vec<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ProviderOptions {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }
}
