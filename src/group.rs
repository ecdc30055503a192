//! Test groups.
//!
//! A [`TestGroup`] is a named bundle of test cases sharing metadata and shared
//! contexts. Groups generated from the provider matrix are tagged with a
//! [`COMPONENT_KEY`] metadata entry, which is what selection works on.

use std::{borrow::Cow, collections::HashMap};

use serde_json::Value;

use crate::{library::ContextHandle, test::TestCase};

/// Metadata key holding the component identifier of a group.
pub const COMPONENT_KEY: &str = "component";

pub type GroupMetadata = HashMap<Cow<'static, str>, Value>;

/// Build the component identifier for a provider and feature.
pub fn component_id(provider: &str, feature: &str) -> String {
    format!("provider/{provider}/{feature}")
}

/// Build the shared behavior name for a feature.
pub fn behavior_name(feature: &str) -> String {
    format!("provider/{feature}")
}

#[derive(Debug, Default)]
#[non_exhaustive]
pub struct TestGroup {
    pub name: Cow<'static, str>,
    pub metadata: GroupMetadata,
    pub contexts: Vec<ContextHandle>,
    pub items: Vec<GroupItem>,
}

/// An entry of a [`TestGroup`].
#[derive(Debug)]
pub enum GroupItem {
    Case(TestCase),
    Behavior(SharedExamples),
}

/// The cases a shared behavior template produced for one group.
#[derive(Debug)]
pub struct SharedExamples {
    /// Name of the template, e.g. `provider/up`.
    pub name: String,
    /// Provider the template was parameterized with.
    pub provider: String,
    pub cases: Vec<TestCase>,
}

impl TestGroup {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Create a group tagged with the given component.
    ///
    /// The component doubles as the group name.
    pub fn for_component(component: impl Into<String>) -> Self {
        let component = component.into();
        let mut group = Self::new(component.clone());
        group
            .metadata
            .insert(COMPONENT_KEY.into(), Value::String(component));
        group
    }

    pub fn with_metadata(
        mut self,
        key: impl Into<Cow<'static, str>>,
        value: impl Into<Value>,
    ) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn with_case(mut self, case: TestCase) -> Self {
        self.items.push(GroupItem::Case(case));
        self
    }

    pub fn include_context(&mut self, context: ContextHandle) {
        self.contexts.push(context);
    }

    pub fn behave_like(&mut self, examples: SharedExamples) {
        self.items.push(GroupItem::Behavior(examples));
    }

    /// Whether this group carries a component tag, whatever its value.
    ///
    /// Only untagged groups are exempt from selection.
    pub fn is_tagged(&self) -> bool {
        self.metadata.contains_key(COMPONENT_KEY)
    }

    pub fn component_value(&self) -> Option<&Value> {
        self.metadata.get(COMPONENT_KEY)
    }

    /// The component this group was generated for.
    ///
    /// `None` for untagged groups and for tags that are not a string. The
    /// latter can never be requested.
    pub fn component(&self) -> Option<&str> {
        self.component_value().and_then(Value::as_str)
    }

    /// The component tag as printed in notices, non string values as JSON.
    pub fn component_label(&self) -> Option<Cow<'_, str>> {
        self.component_value().map(|value| match value {
            Value::String(component) => Cow::Borrowed(component.as_str()),
            other => Cow::Owned(other.to_string()),
        })
    }

    /// All cases of this group in definition order, shared behaviors expanded.
    pub fn cases(&self) -> impl Iterator<Item = &TestCase> {
        self.items.iter().flat_map(|item| match item {
            GroupItem::Case(case) => std::slice::from_ref(case).iter(),
            GroupItem::Behavior(examples) => examples.cases.iter(),
        })
    }

    pub fn case_count(&self) -> usize {
        self.cases().count()
    }
}
