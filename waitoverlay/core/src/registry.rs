//! Container Registry - Per-Container Overlay State
//!
//! Associates each container with at most one [`OverlayState`].
//!
//! # Lifetime
//!
//! The registry never owns containers; it is keyed by the stable
//! [`ContainerId`] handle the surface assigned. Entries are removed
//! explicitly: on full hide (after fade), on `destroy`, or when the surface
//! reports `OverlayEvent::ContainerRemoved`. A container the host drops
//! without reporting it keeps its entry until one of those happens.
//!
//! ```text
//!                  ContainerRegistry
//!        ┌─────────────────────────────────────┐
//!        │ HashMap<ContainerId, OverlayState>  │
//!        └─────────────────┬───────────────────┘
//!             ┌────────────┼─────────────┐
//!      ┌──────▼─────┐ ┌────▼───────┐ ┌───▼────────┐
//!      │ page root  │ │ container-4│ │ container-9│
//!      └────────────┘ └────────────┘ └────────────┘
//! ```

use std::collections::HashMap;
use std::fmt;

use crate::state::OverlayState;
use crate::surface::ContainerId;

/// Registry of overlay state keyed by container identity
#[derive(Default)]
pub struct ContainerRegistry {
    states: HashMap<ContainerId, OverlayState>,
}

impl ContainerRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// State for a container, if any
    #[must_use]
    pub fn get(&self, container: ContainerId) -> Option<&OverlayState> {
        self.states.get(&container)
    }

    /// Mutable state for a container, if any
    pub fn get_mut(&mut self, container: ContainerId) -> Option<&mut OverlayState> {
        self.states.get_mut(&container)
    }

    /// State for a container, created with `factory` if missing
    pub fn get_or_create<F>(&mut self, container: ContainerId, factory: F) -> &mut OverlayState
    where
        F: FnOnce() -> OverlayState,
    {
        self.states.entry(container).or_insert_with(|| {
            tracing::debug!(container = %container, "Overlay state created");
            factory()
        })
    }

    /// Remove and return a container's state
    pub fn remove(&mut self, container: ContainerId) -> Option<OverlayState> {
        let state = self.states.remove(&container);
        if state.is_some() {
            tracing::debug!(container = %container, "Overlay state removed");
        }
        state
    }

    /// Check if a container has state
    #[must_use]
    pub fn contains(&self, container: ContainerId) -> bool {
        self.states.contains_key(&container)
    }

    /// Number of containers with state
    #[must_use]
    pub fn count(&self) -> usize {
        self.states.len()
    }

    /// Identities of all containers with state
    #[must_use]
    pub fn containers(&self) -> Vec<ContainerId> {
        self.states.keys().copied().collect()
    }

    /// First container whose state matches `predicate`
    pub fn find<P>(&self, predicate: P) -> Option<ContainerId>
    where
        P: Fn(&OverlayState) -> bool,
    {
        self.states
            .iter()
            .find(|(_, state)| predicate(state))
            .map(|(id, _)| *id)
    }
}

impl fmt::Debug for ContainerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContainerRegistry")
            .field("container_count", &self.states.len())
            .field("containers", &self.states.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_or_create_is_idempotent() {
        let mut registry = ContainerRegistry::new();
        let id = ContainerId::from_raw(1);

        registry.get_or_create(id, || OverlayState::new(false)).show_count = 2;
        let state = registry.get_or_create(id, || OverlayState::new(true));

        // The second factory never ran
        assert!(!state.whole_page());
        assert_eq!(state.show_count(), 2);
        assert_eq!(registry.count(), 1);
    }

    #[test]
    fn test_remove() {
        let mut registry = ContainerRegistry::new();
        let id = ContainerId::from_raw(3);
        registry.get_or_create(id, || OverlayState::new(false));

        assert!(registry.contains(id));
        assert!(registry.remove(id).is_some());
        assert!(!registry.contains(id));
        assert!(registry.remove(id).is_none());
        assert!(registry.get(id).is_none());
    }

    #[test]
    fn test_entries_are_keyed_by_identity() {
        let mut registry = ContainerRegistry::new();
        let a = ContainerId::from_raw(10);
        let b = ContainerId::from_raw(11);
        registry.get_or_create(a, || OverlayState::new(false)).show_count = 1;
        registry.get_or_create(b, || OverlayState::new(false)).show_count = 5;

        assert_eq!(registry.get(a).map(OverlayState::show_count), Some(1));
        assert_eq!(registry.get(b).map(OverlayState::show_count), Some(5));
        assert_eq!(registry.find(|s| s.show_count() == 5), Some(b));

        let mut ids = registry.containers();
        ids.sort();
        assert_eq!(ids, vec![a, b]);
    }
}
