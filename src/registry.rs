//! The test registry and the process wide active registry slot.
//!
//! A [`Registry`] holds the groups one harness works on. Exactly one registry
//! can be *active* per process at a time, the active one is what
//! [`active`] reports as the current test universe.
//!
//! Activation is scoped: [`Registry::activate`] returns an [`ActivationGuard`]
//! and the previously active registry is put back when that guard goes away,
//! whether by [`ActivationGuard::deactivate`], by an early return or by
//! unwinding. The slot is process wide, so two registries activated from
//! different threads at the same time will step on each other; callers have to
//! serialize runs.

use std::{
    fmt::{self, Display},
    sync::{
        Arc, Mutex, MutexGuard, PoisonError,
        atomic::{AtomicBool, AtomicU64, Ordering},
    },
};

use crate::{error::HarnessError, group::TestGroup};

static ACTIVE_REGISTRY: Mutex<Option<ActiveRegistry>> = Mutex::new(None);
static NEXT_REGISTRY_ID: AtomicU64 = AtomicU64::new(1);

// A panic while the slot is locked must not keep the previous registry from
// being restored, so poisoning is ignored.
fn lock_active() -> MutexGuard<'static, Option<ActiveRegistry>> {
    ACTIVE_REGISTRY
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
}

/// Snapshot of the currently active registry, if any.
pub fn active() -> Option<ActiveRegistry> {
    lock_active().clone()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegistryId(u64);

impl Display for RegistryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What the active registry slot exposes.
///
/// The groups are the ones visible for the current run, which may be fewer
/// than the registry holds once a selection was
/// [published](ActivationGuard::publish).
#[derive(Debug, Clone)]
pub struct ActiveRegistry {
    id: RegistryId,
    groups: Vec<Arc<TestGroup>>,
}

impl ActiveRegistry {
    pub fn id(&self) -> RegistryId {
        self.id
    }

    pub fn groups(&self) -> &[Arc<TestGroup>] {
        &self.groups
    }

    pub fn components(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().filter_map(|group| group.component())
    }
}

/// An ordered collection of test groups.
#[derive(Debug)]
pub struct Registry {
    id: RegistryId,
    groups: Vec<Arc<TestGroup>>,
    active: AtomicBool,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    pub fn new() -> Self {
        Self {
            id: RegistryId(NEXT_REGISTRY_ID.fetch_add(1, Ordering::Relaxed)),
            groups: Vec::new(),
            active: AtomicBool::new(false),
        }
    }

    pub fn id(&self) -> RegistryId {
        self.id
    }

    pub fn groups(&self) -> &[Arc<TestGroup>] {
        &self.groups
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Component identifiers of all tagged groups, in registry order.
    pub fn components(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().filter_map(|group| group.component())
    }

    /// Append a group.
    ///
    /// Fails if a group with the same component is already registered.
    /// Untagged groups are never considered duplicates.
    pub fn add(
        &mut self,
        group: impl Into<Arc<TestGroup>>,
    ) -> Result<Arc<TestGroup>, HarnessError> {
        let group = group.into();
        if let Some(component) = group.component_value() {
            let taken = self
                .groups
                .iter()
                .any(|existing| existing.component_value() == Some(component));
            if taken {
                let label = group.component_label().unwrap_or_default();
                return Err(HarnessError::DuplicateComponent(label.into_owned()));
            }
        }

        self.groups.push(Arc::clone(&group));
        Ok(group)
    }

    /// Remove `group` by identity.
    ///
    /// Returns whether the group was present.
    pub fn remove(&mut self, group: &Arc<TestGroup>) -> bool {
        match self.groups.iter().position(|g| Arc::ptr_eq(g, group)) {
            Some(index) => {
                self.groups.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Install this registry as the active one.
    ///
    /// The previously active registry is restored when the returned guard is
    /// dropped. Activating a registry that is already active fails with
    /// [`HarnessError::ReentrantActivation`].
    pub fn activate(&self) -> Result<ActivationGuard<'_>, HarnessError> {
        if self.active.swap(true, Ordering::AcqRel) {
            return Err(HarnessError::ReentrantActivation);
        }

        let previous = lock_active().replace(ActiveRegistry {
            id: self.id,
            groups: self.groups.clone(),
        });
        log::debug!(
            "activated registry {} (previous: {})",
            self.id,
            previous
                .as_ref()
                .map(|p| p.id.to_string())
                .unwrap_or_else(|| String::from("none"))
        );

        Ok(ActivationGuard {
            registry: self,
            previous,
        })
    }
}

/// Keeps a [`Registry`] active while alive.
#[must_use = "the registry is deactivated as soon as the guard is dropped"]
#[derive(Debug)]
pub struct ActivationGuard<'r> {
    registry: &'r Registry,
    previous: Option<ActiveRegistry>,
}

impl ActivationGuard<'_> {
    /// Narrow the groups the active slot exposes to `groups`.
    ///
    /// The registry itself is left untouched.
    pub fn publish(&self, groups: &[Arc<TestGroup>]) {
        let mut slot = lock_active();
        if let Some(active) = slot.as_mut().filter(|active| active.id == self.registry.id) {
            active.groups = groups.to_vec();
        }
    }

    /// Restore the previously active registry.
    pub fn deactivate(self) {}
}

impl Drop for ActivationGuard<'_> {
    fn drop(&mut self) {
        *lock_active() = self.previous.take();
        self.registry.active.store(false, Ordering::Release);
        log::debug!("deactivated registry {}", self.registry.id);
    }
}
