//! Group generation from the provider matrix.
//!
//! For every provider of the [`HarnessConfig`] and every feature of the
//! [`SharedLibrary`] the [`GroupFactory`] builds one [`TestGroup`]:
//!
//! - named and tagged `provider/<provider>/<feature>`,
//! - with the provider's shared contexts mixed in, in configuration order,
//! - behaving like the `provider/<feature>` template, parameterized with the
//!   provider name and options.
//!
//! Groups are generated provider by provider, features in library order, which
//! fixes the listing order of a run.

use crate::{
    config::{HarnessConfig, ProviderConfig},
    error::HarnessError,
    group::{SharedExamples, TestGroup, behavior_name, component_id},
    library::SharedLibrary,
    registry::Registry,
};

#[derive(Debug, Clone, Copy)]
pub struct GroupFactory<'l> {
    library: &'l SharedLibrary,
}

impl<'l> GroupFactory<'l> {
    pub fn new(library: &'l SharedLibrary) -> Self {
        Self { library }
    }

    /// Build all groups of `config` into `registry`.
    ///
    /// Returns the number of groups added. Stops at the first group that cannot
    /// be built or registered.
    pub fn build(
        &self,
        registry: &mut Registry,
        config: &HarnessConfig,
    ) -> Result<usize, HarnessError> {
        let mut added = 0;
        for provider in &config.providers {
            for feature in self.library.features() {
                let group = self.build_group(provider, feature)?;
                registry.add(group)?;
                added += 1;
            }
        }
        Ok(added)
    }

    /// Build the group of a single provider and feature.
    pub fn build_group(
        &self,
        provider: &ProviderConfig,
        feature: &str,
    ) -> Result<TestGroup, HarnessError> {
        let component = component_id(&provider.name, feature);
        let mut group = TestGroup::for_component(component.clone());

        for context in &provider.options.contexts {
            let handle = self
                .library
                .context(context)
                .ok_or_else(|| HarnessError::UnknownContext {
                    component: component.clone(),
                    context: context.clone(),
                })?;
            group.include_context(handle.clone());
        }

        let behavior = behavior_name(feature);
        let template = self
            .library
            .behavior(&behavior)
            .ok_or_else(|| HarnessError::UnknownBehavior {
                component: component.clone(),
                behavior: behavior.clone(),
            })?;
        group.behave_like(SharedExamples {
            cases: template.examples(&provider.name, &provider.options),
            name: behavior,
            provider: provider.name.clone(),
        });

        log::debug!(
            "built group {component} with {} cases and {} shared contexts",
            group.case_count(),
            group.contexts.len()
        );
        Ok(group)
    }
}
