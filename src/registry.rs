//! Registry of live pointer devices.
//!
//! Maps a [`DeviceHandle`] to its per-device cursor state. The registry has
//! no interior lock: it is only ever touched from the notification context,
//! which the OS serializes (at most one notification is processed at a time).
//! Cross-thread visibility of the resulting events is the
//! [`EventQueue`](crate::queue::EventQueue)'s job.

use crate::device::{DeviceHandle, Point, PointerDevice, ScreenBounds};
use std::collections::HashMap;

/// Owned collection of currently-connected pointer devices.
#[derive(Debug, Default)]
pub struct DeviceRegistry {
    devices: HashMap<DeviceHandle, PointerDevice>,
}

impl DeviceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a device on its first-seen notification.
    ///
    /// New devices spawn at the screen center. Idempotent: a repeated handle
    /// keeps its existing state and reports `false`.
    pub fn upsert_on_first_seen(
        &mut self,
        handle: DeviceHandle,
        name: String,
        bounds: ScreenBounds,
    ) -> (&PointerDevice, bool) {
        let mut created = false;
        let device = self.devices.entry(handle).or_insert_with(|| {
            created = true;
            let center = bounds.center();
            PointerDevice {
                handle,
                name,
                x: center.x,
                y: center.y,
            }
        });
        (device, created)
    }

    /// Move a device to `(x, y)`, clamped into the primary display bounds.
    ///
    /// Unknown handles are a silent no-op; calling discipline in the capture
    /// adapter registers the device before any position update.
    pub fn update_position(&mut self, handle: DeviceHandle, x: i32, y: i32, bounds: ScreenBounds) {
        if let Some(device) = self.devices.get_mut(&handle) {
            let p = bounds.clamp(Point { x, y });
            device.x = p.x;
            device.y = p.y;
        }
    }

    /// Remove a device, returning its last known state.
    pub fn remove(&mut self, handle: DeviceHandle) -> Option<PointerDevice> {
        self.devices.remove(&handle)
    }

    pub fn get(&self, handle: DeviceHandle) -> Option<&PointerDevice> {
        self.devices.get(&handle)
    }

    pub fn contains(&self, handle: DeviceHandle) -> bool {
        self.devices.contains_key(&handle)
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    /// Iterate tracked devices in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &PointerDevice> {
        self.devices.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOUNDS: ScreenBounds = ScreenBounds {
        width: 1920,
        height: 1080,
    };

    #[test]
    fn first_seen_spawns_at_center_and_is_idempotent() {
        let mut reg = DeviceRegistry::new();
        let h = DeviceHandle(7);
        let (dev, created) = reg.upsert_on_first_seen(h, "USB Mouse".into(), BOUNDS);
        assert!(created);
        assert_eq!((dev.x, dev.y), (960, 540));

        reg.update_position(h, 10, 10, BOUNDS);
        let (dev, created) = reg.upsert_on_first_seen(h, "Other".into(), BOUNDS);
        assert!(!created);
        assert_eq!(dev.name, "USB Mouse");
        assert_eq!((dev.x, dev.y), (10, 10));
    }

    #[test]
    fn positions_always_stay_in_bounds() {
        let mut reg = DeviceRegistry::new();
        let h = DeviceHandle(1);
        reg.upsert_on_first_seen(h, "USB Mouse".into(), BOUNDS);
        for (x, y) in [(-100, -100), (5000, 5000), (1919, 1079), (0, 0)] {
            reg.update_position(h, x, y, BOUNDS);
            let d = reg.get(h).unwrap();
            assert!((0..BOUNDS.width).contains(&d.x));
            assert!((0..BOUNDS.height).contains(&d.y));
        }
    }

    #[test]
    fn update_of_unknown_handle_is_a_noop() {
        let mut reg = DeviceRegistry::new();
        reg.update_position(DeviceHandle(99), 5, 5, BOUNDS);
        assert!(reg.is_empty());
    }

    #[test]
    fn remove_returns_prior_state() {
        let mut reg = DeviceRegistry::new();
        let h = DeviceHandle(3);
        reg.upsert_on_first_seen(h, "Trackpad".into(), BOUNDS);
        let gone = reg.remove(h).unwrap();
        assert_eq!(gone.name, "Trackpad");
        assert!(reg.remove(h).is_none());
    }
}
