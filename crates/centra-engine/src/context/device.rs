//! Device providers.
//!
//! A [`DeviceProvider`] hands out exclusive groups of device slots. The only
//! in-tree provider, [`LocalDevices`], models each device as a worker thread
//! slot on the host.

use parking_lot::Mutex;

use centra_common::utils::error::{Error, Result};

/// Source of device groups for an execution context.
pub trait DeviceProvider: Send + Sync {
    /// Returns the number of devices currently free.
    fn available(&self) -> usize;

    /// Acquires `count` free devices.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InsufficientDevices`] when fewer than `count` devices
    /// are free, or [`Error::PeerAccessUnavailable`] when `peer_to_peer` is
    /// requested and the devices cannot be linked.
    fn acquire(&self, count: usize, peer_to_peer: bool) -> Result<DeviceGroup>;

    /// Returns the devices of `group` to the pool.
    fn release(&self, group: &DeviceGroup);
}

/// Devices exclusively owned by one execution context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceGroup {
    devices: Vec<usize>,
    peer_to_peer: bool,
}

impl DeviceGroup {
    /// Creates a group from provider-specific device ordinals.
    #[must_use]
    pub fn new(devices: Vec<usize>, peer_to_peer: bool) -> Self {
        Self {
            devices,
            peer_to_peer,
        }
    }

    /// Returns the number of devices; device ranks are `0..len()`.
    #[must_use]
    pub fn len(&self) -> usize {
        self.devices.len()
    }

    /// Returns true for a group with no devices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    /// Returns the provider ordinal of each rank.
    #[must_use]
    pub fn devices(&self) -> &[usize] {
        &self.devices
    }

    /// Returns true if peer links between the devices are enabled.
    #[must_use]
    pub fn peer_to_peer(&self) -> bool {
        self.peer_to_peer
    }
}

#[derive(Debug)]
struct Slots {
    in_use: Vec<bool>,
    groups: usize,
}

/// In-process devices backed by host threads.
#[derive(Debug)]
pub struct LocalDevices {
    slots: Mutex<Slots>,
    peer_access: bool,
}

impl LocalDevices {
    /// Creates a provider with `count` devices and peer access.
    #[must_use]
    pub fn new(count: usize) -> Self {
        Self {
            slots: Mutex::new(Slots {
                in_use: vec![false; count],
                groups: 0,
            }),
            peer_access: true,
        }
    }

    /// Creates a provider with one device per available hardware thread.
    #[must_use]
    pub fn detect() -> Self {
        let count = std::thread::available_parallelism().map_or(1, |n| n.get());
        tracing::debug!(count, "detected local devices");
        Self::new(count)
    }

    /// Disables peer links; multi-device groups requesting them will fail.
    #[must_use]
    pub fn without_peer_access(mut self) -> Self {
        self.peer_access = false;
        self
    }

    /// Returns true if multi-device groups may request peer links.
    #[must_use]
    pub fn peer_access(&self) -> bool {
        self.peer_access
    }

    /// Returns the total number of devices.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.lock().in_use.len()
    }

    /// Returns the number of free devices.
    #[must_use]
    pub fn free_count(&self) -> usize {
        self.slots.lock().in_use.iter().filter(|used| !**used).count()
    }

    /// Returns the number of groups currently held.
    #[must_use]
    pub fn active_groups(&self) -> usize {
        self.slots.lock().groups
    }
}

impl DeviceProvider for LocalDevices {
    fn available(&self) -> usize {
        self.free_count()
    }

    fn acquire(&self, count: usize, peer_to_peer: bool) -> Result<DeviceGroup> {
        if count == 0 {
            return Err(Error::InvalidParameter(
                "device count must be at least 1".to_string(),
            ));
        }
        // A single device has no peers to link.
        let peer_to_peer = peer_to_peer && count > 1;
        if peer_to_peer && !self.peer_access {
            return Err(Error::PeerAccessUnavailable(count));
        }

        let mut slots = self.slots.lock();
        let free: Vec<usize> = slots
            .in_use
            .iter()
            .enumerate()
            .filter(|(_, used)| !**used)
            .map(|(i, _)| i)
            .take(count)
            .collect();
        if free.len() < count {
            let available = slots.in_use.iter().filter(|used| !**used).count();
            return Err(Error::InsufficientDevices {
                requested: count,
                available,
            });
        }

        for &device in &free {
            slots.in_use[device] = true;
        }
        slots.groups += 1;
        Ok(DeviceGroup::new(free, peer_to_peer))
    }

    fn release(&self, group: &DeviceGroup) {
        let mut slots = self.slots.lock();
        for &device in group.devices() {
            if let Some(used) = slots.in_use.get_mut(device) {
                *used = false;
            }
        }
        slots.groups = slots.groups.saturating_sub(1);
    }
}
