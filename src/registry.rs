//! Bounded device registry.
//!
//! Replaces a fixed global array of chip structs with an owned mapping
//! from small integer ids to shared device handles. Built once at startup
//! by whoever binds the buses; lookups hand out clones of the `Arc`.

use std::sync::Arc;

use thiserror::Error;

use crate::constants::MAX_DEVICES;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("device id {0} out of range")]
    InvalidId(u8),

    #[error("device id {0} already registered")]
    AlreadyRegistered(u8),
}

/// Id-indexed slots for up to [`MAX_DEVICES`] device instances.
pub struct Registry<T> {
    slots: Vec<Option<Arc<T>>>,
}

impl<T> Registry<T> {
    pub fn new() -> Self {
        Registry {
            slots: (0..MAX_DEVICES).map(|_| None).collect(),
        }
    }

    /// Register a device under `id`, returning a shared handle to it.
    pub fn insert(&mut self, id: u8, device: T) -> Result<Arc<T>, RegistryError> {
        let slot = self
            .slots
            .get_mut(id as usize)
            .ok_or(RegistryError::InvalidId(id))?;
        if slot.is_some() {
            return Err(RegistryError::AlreadyRegistered(id));
        }
        let handle = Arc::new(device);
        *slot = Some(Arc::clone(&handle));
        log::debug!("registry: device {id} registered");
        Ok(handle)
    }

    /// Look up the device registered under `id`.
    pub fn get(&self, id: u8) -> Option<Arc<T>> {
        self.slots.get(id as usize)?.clone()
    }

    /// Unregister and return the device handle, if any.
    pub fn remove(&mut self, id: u8) -> Option<Arc<T>> {
        let handle = self.slots.get_mut(id as usize)?.take();
        if handle.is_some() {
            log::debug!("registry: device {id} removed");
        }
        handle
    }

    /// Number of registered devices.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T> Default for Registry<T> {
    fn default() -> Self {
        Registry::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_get() {
        let mut registry: Registry<&str> = Registry::new();
        registry.insert(0, "first").unwrap();
        registry.insert(1, "second").unwrap();

        assert_eq!(*registry.get(0).unwrap(), "first");
        assert_eq!(*registry.get(1).unwrap(), "second");
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn out_of_range_id_is_rejected() {
        let mut registry: Registry<&str> = Registry::new();
        assert_eq!(
            registry.insert(MAX_DEVICES as u8, "nope"),
            Err(RegistryError::InvalidId(MAX_DEVICES as u8))
        );
        assert!(registry.get(MAX_DEVICES as u8).is_none());
    }

    #[test]
    fn duplicate_id_is_rejected() {
        let mut registry: Registry<&str> = Registry::new();
        registry.insert(0, "first").unwrap();
        assert_eq!(
            registry.insert(0, "again"),
            Err(RegistryError::AlreadyRegistered(0))
        );
    }

    #[test]
    fn remove_frees_the_slot() {
        let mut registry: Registry<&str> = Registry::new();
        registry.insert(0, "first").unwrap();

        assert!(registry.remove(0).is_some());
        assert!(registry.get(0).is_none());
        assert!(registry.remove(0).is_none());

        // Slot is reusable after removal.
        registry.insert(0, "second").unwrap();
        assert_eq!(*registry.get(0).unwrap(), "second");
    }

    #[test]
    fn insert_error_is_comparable() {
        let mut registry: Registry<u32> = Registry::new();
        registry.insert(1, 42).unwrap();
        let err = registry.insert(1, 43).unwrap_err();
        assert_eq!(err.to_string(), "device id 1 already registered");
    }
}
