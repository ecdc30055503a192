//! Shared contexts and behavior templates.
//!
//! The [`SharedLibrary`] is where everything the group factory resolves by name
//! lives: shared contexts (setup and teardown bundles mixed into groups),
//! behavior templates (parameterized case definitions) and the ordered feature
//! set.
//!
//! Resolution happens while groups are built, so a misspelled name fails the
//! harness construction instead of surfacing halfway through a run.

use std::{
    collections::HashMap,
    fmt::{self, Debug},
    sync::Arc,
};

use crate::{
    config::ProviderOptions,
    group::{TestGroup, behavior_name},
    outcome::TestStatus,
    test::{TestCase, TestMeta},
};

/// Setup and teardown hooks mixed into a group.
///
/// Every case of a group runs between [`before_case`](Self::before_case) and
/// [`after_case`](Self::after_case) of all contexts included into that group.
/// Contexts are shared between groups and runs, keep per case state in the
/// context itself behind interior mutability if needed.
pub trait ContextProvider: Send + Sync {
    /// Called right before a case of `group` is executed.
    fn before_case(&self, group: &TestGroup, case: &TestMeta) {
        let _ = (group, case);
    }

    /// Called right after a case of `group` finished executing.
    fn after_case(&self, group: &TestGroup, case: &TestMeta, status: &TestStatus) {
        let _ = (group, case, status);
    }
}

/// A named, registered [`ContextProvider`].
#[derive(Clone)]
pub struct ContextHandle {
    name: Arc<str>,
    provider: Arc<dyn ContextProvider>,
}

impl ContextHandle {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn provider(&self) -> &dyn ContextProvider {
        self.provider.as_ref()
    }
}

impl Debug for ContextHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ContextHandle").field(&self.name).finish()
    }
}

/// A parameterized definition of test cases attached to many groups.
pub trait BehaviorTemplate: Send + Sync {
    fn examples(&self, provider: &str, options: &ProviderOptions) -> Vec<TestCase>;
}

impl<F> BehaviorTemplate for F
where
    F: Fn(&str, &ProviderOptions) -> Vec<TestCase> + Send + Sync,
{
    fn examples(&self, provider: &str, options: &ProviderOptions) -> Vec<TestCase> {
        self(provider, options)
    }
}

#[derive(Default)]
pub struct SharedLibrary {
    contexts: HashMap<String, ContextHandle>,
    behaviors: HashMap<String, Arc<dyn BehaviorTemplate>>,
    features: Vec<String>,
}

impl SharedLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a shared context under `name`, replacing any previous one.
    pub fn register_context(
        &mut self,
        name: impl Into<String>,
        provider: impl ContextProvider + 'static,
    ) -> ContextHandle {
        let name = name.into();
        let handle = ContextHandle {
            name: Arc::from(name.as_str()),
            provider: Arc::new(provider),
        };
        self.contexts.insert(name, handle.clone());
        handle
    }

    /// Register a behavior template under `name`, replacing any previous one.
    pub fn register_behavior(
        &mut self,
        name: impl Into<String>,
        template: impl BehaviorTemplate + 'static,
    ) {
        self.behaviors.insert(name.into(), Arc::new(template));
    }

    /// Append a feature to the feature set.
    ///
    /// Adding a feature twice keeps its first position.
    pub fn add_feature(&mut self, feature: impl Into<String>) {
        let feature = feature.into();
        if !self.features.contains(&feature) {
            self.features.push(feature);
        }
    }

    /// Add a feature and register its `provider/<feature>` template in one go.
    pub fn provider_feature(
        &mut self,
        feature: impl Into<String>,
        template: impl BehaviorTemplate + 'static,
    ) -> &mut Self {
        let feature = feature.into();
        self.register_behavior(behavior_name(&feature), template);
        self.add_feature(feature);
        self
    }

    pub fn context(&self, name: &str) -> Option<&ContextHandle> {
        self.contexts.get(name)
    }

    pub fn behavior(&self, name: &str) -> Option<&dyn BehaviorTemplate> {
        self.behaviors.get(name).map(|template| template.as_ref())
    }

    pub fn features(&self) -> &[String] {
        &self.features
    }
}

impl Debug for SharedLibrary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedLibrary")
            .field("contexts", &self.contexts.keys().collect::<Vec<_>>())
            .field("behaviors", &self.behaviors.keys().collect::<Vec<_>>())
            .field("features", &self.features)
            .finish()
    }
}
