//! Component selection.
//!
//! A [`Selector`] decides which groups take part in a run, based on the set of
//! requested component identifiers:
//!
//! - an empty request keeps everything,
//! - groups without a component tag are always kept,
//! - tagged groups are kept only if their component was requested.
//!
//! Every skipped group produces one `Skipping: <component>` notice line on the
//! selector's target, in the order the groups were found. Requested components
//! that match no group are not an error, they simply select nothing.

use std::{borrow::Cow, collections::HashSet, io, sync::Arc};

use crate::{group::TestGroup, registry::Registry};

/// The result of applying a [`Selector`].
///
/// Both lists hold references to the original groups, in their original order.
#[derive(Debug, Default, Clone)]
pub struct Selection {
    /// Groups taking part in the run.
    pub groups: Vec<Arc<TestGroup>>,

    /// Tagged groups that were not requested.
    pub skipped: Vec<Arc<TestGroup>>,
}

impl Selection {
    /// Select everything.
    pub fn all(groups: &[Arc<TestGroup>]) -> Self {
        Self {
            groups: groups.to_vec(),
            skipped: Vec::new(),
        }
    }

    pub fn components(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().filter_map(|group| group.component())
    }

    pub fn skipped_components(&self) -> impl Iterator<Item = Cow<'_, str>> {
        self.skipped.iter().filter_map(|group| group.component_label())
    }

    /// Number of selected groups carrying a component tag.
    pub fn tagged_len(&self) -> usize {
        self.components().count()
    }
}

#[derive(Debug)]
pub struct Selector<W = io::Stdout> {
    requested: HashSet<String>,
    target: W,
}

impl Selector<io::Stdout> {
    pub fn new<I>(requested: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        Self {
            requested: requested.into_iter().map(Into::into).collect(),
            target: io::stdout(),
        }
    }
}

impl<W: io::Write> Selector<W> {
    /// Write skip notices to `target` instead of stdout.
    pub fn with_target<WithTarget: io::Write>(
        self,
        target: WithTarget,
    ) -> Selector<WithTarget> {
        Selector {
            requested: self.requested,
            target,
        }
    }

    pub fn requested(&self) -> &HashSet<String> {
        &self.requested
    }

    /// Whether this selector keeps every group.
    pub fn is_unrestricted(&self) -> bool {
        self.requested.is_empty()
    }

    /// Untagged groups are always kept. A tag that is not a string never
    /// matches a request.
    pub fn keeps(&self, group: &TestGroup) -> bool {
        if !group.is_tagged() || self.is_unrestricted() {
            return true;
        }
        group
            .component()
            .is_some_and(|component| self.requested.contains(component))
    }

    /// Select from `groups` without touching them.
    pub fn select(&mut self, groups: &[Arc<TestGroup>]) -> Selection {
        if self.is_unrestricted() {
            return Selection::all(groups);
        }

        let (kept, skipped): (Vec<_>, Vec<_>) = groups
            .iter()
            .map(Arc::clone)
            .partition(|group| self.keeps(group));

        for group in &skipped {
            self.notify_skipped(group);
        }

        Selection {
            groups: kept,
            skipped,
        }
    }

    /// Remove every group not selected from `registry`.
    ///
    /// Returns the removed groups in registry order.
    pub fn filter(&mut self, registry: &mut Registry) -> Vec<Arc<TestGroup>> {
        let Selection { skipped, .. } = self.select(registry.groups());
        for group in &skipped {
            registry.remove(group);
        }
        skipped
    }

    fn notify_skipped(&mut self, group: &TestGroup) {
        let component = group
            .component_label()
            .unwrap_or(Cow::Borrowed(group.name.as_ref()));
        log::info!("skipping component {component}");
        if let Err(err) = writeln!(self.target, "Skipping: {component}") {
            log::warn!("could not write skip notice for {component}: {err}");
        }
    }
}
