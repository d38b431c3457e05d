//! Capture adapter: raw notifications in, registry updates + events out.
//!
//! Runs in the notification context, which the OS serializes, so the adapter
//! owns the [`DeviceRegistry`] outright and only the shared
//! [`EventQueue`] is locked. Nothing here returns an error or panics: this
//! path sits inside a window procedure where failure cannot be reported, so
//! every degraded condition has a documented fallback instead.

use crate::classify::classify;
use crate::device::{DeviceHandle, Point};
use crate::event::{DeviceChange, MotionNotice, PointerEvent, RawNotice};
use crate::host::PlatformHost;
use crate::queue::EventQueue;
use crate::registry::DeviceRegistry;
use log::debug;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Name used when a device disconnects without ever having been registered.
const PLACEHOLDER_NAME: &str = "Unknown";

/// Translates raw hardware notifications into registry state and queued
/// events.
pub struct CaptureAdapter {
    registry: DeviceRegistry,
    queue: Arc<EventQueue>,
    /// Process-lifetime count of motion notifications, diagnostics only.
    notices_seen: Arc<AtomicU64>,
}

impl CaptureAdapter {
    pub fn new(queue: Arc<EventQueue>, notices_seen: Arc<AtomicU64>) -> Self {
        Self {
            registry: DeviceRegistry::new(),
            queue,
            notices_seen,
        }
    }

    /// Route one parsed notification.
    pub fn handle_notice(&mut self, notice: RawNotice, host: &dyn PlatformHost) {
        match notice {
            RawNotice::Motion(m) => self.handle_motion(m, host),
            RawNotice::DeviceChange { handle, change } => {
                self.handle_device_change(handle, change)
            }
        }
    }

    fn handle_motion(&mut self, m: MotionNotice, host: &dyn PlatformHost) {
        self.notices_seen.fetch_add(1, Ordering::Relaxed);
        let bounds = host.primary_screen();

        if !self.registry.contains(m.handle) {
            let name = classify(host.raw_device_identifier(m.handle).as_deref());
            let (device, created) =
                self.registry
                    .upsert_on_first_seen(m.handle, name.to_string(), bounds);
            if created {
                debug!("pointer device attached: {} ({})", device.name, m.handle);
                self.queue.push(PointerEvent::DeviceAttached {
                    handle: device.handle,
                    name: device.name.clone(),
                    x: device.x,
                    y: device.y,
                });
            }
        }

        // Idle notifications (button-only or keepalive packets) produce no
        // move event.
        if m.dx == 0 && m.dy == 0 {
            return;
        }

        // The OS cursor position is ground truth when available; otherwise
        // integrate the delta onto the last known position.
        let target = match host.cursor_pos() {
            Some(p) => p,
            None => {
                // The handle was registered above, but stay total anyway.
                let (lx, ly) = self
                    .registry
                    .get(m.handle)
                    .map(|d| (d.x, d.y))
                    .unwrap_or_default();
                Point {
                    x: lx + m.dx,
                    y: ly + m.dy,
                }
            }
        };
        self.registry
            .update_position(m.handle, target.x, target.y, bounds);

        if let Some(device) = self.registry.get(m.handle) {
            self.queue.push(PointerEvent::PointerMoved {
                handle: device.handle,
                name: device.name.clone(),
                x: device.x,
                y: device.y,
                dx: m.dx,
                dy: m.dy,
                flags: m.flags,
            });
        }
    }

    fn handle_device_change(&mut self, handle: DeviceHandle, change: DeviceChange) {
        match change {
            // Registration is lazy: the entry is created on first motion so
            // the classified name and spawn position come from one place.
            DeviceChange::Added => {
                debug!("device arrival notification for {handle}, deferring registration");
            }
            DeviceChange::Removed => {
                let name = self
                    .registry
                    .remove(handle)
                    .map(|d| d.name)
                    .unwrap_or_else(|| PLACEHOLDER_NAME.to_string());
                debug!("pointer device removed: {name} ({handle})");
                self.queue
                    .push(PointerEvent::DeviceRemoved { handle, name });
            }
        }
    }

    /// Enqueue a synthetic move for delivery smoke-testing without hardware.
    pub fn inject_motion(&self, dx: i32, dy: i32, handle: DeviceHandle) {
        self.queue.push(PointerEvent::PointerMoved {
            handle,
            name: "Simulated Mouse".to_string(),
            x: 500 + dx,
            y: 500 + dy,
            dx,
            dy,
            flags: 0,
        });
    }

    /// Devices this adapter has seen motion from.
    pub fn registry(&self) -> &DeviceRegistry {
        &self.registry
    }
}
