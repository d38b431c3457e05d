//! Normalized pointer events and raw notification records.
//!
//! Two layers of types live here:
//!
//! - [`RawNotice`] is what the platform backend parses out of the OS
//!   notification stream (`WM_INPUT` payloads and device-change messages).
//!   The backend is intentionally "dumb": it only parses, all routing
//!   decisions live in the capture adapter.
//! - [`PointerEvent`] is the normalized, consumer-facing event. Events are
//!   immutable once constructed and move producer → queue → consumer exactly
//!   once.
//!
//! ## Value conventions
//! - `dx`/`dy` are **raw OS counts** as reported by Raw Input, before any
//!   OS-level acceleration. `x`/`y` are absolute pixels on the primary
//!   display.
//! - `flags` is the vendor status bitfield (`RAWMOUSE.usFlags`) passed
//!   through uninterpreted for the consumer's use.

use crate::device::DeviceHandle;

/// Parsed per-device motion notification.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MotionNotice {
    /// Device that produced the motion.
    pub handle: DeviceHandle,
    /// Relative delta X (raw counts).
    pub dx: i32,
    /// Relative delta Y (raw counts).
    pub dy: i32,
    /// Vendor status flags, passed through uninterpreted.
    pub flags: u16,
}

/// Connect/disconnect discriminator for device-change notifications.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeviceChange {
    Added,
    Removed,
}

/// One raw notification as delivered by the platform backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RawNotice {
    Motion(MotionNotice),
    DeviceChange {
        handle: DeviceHandle,
        change: DeviceChange,
    },
}

/// Normalized event delivered to the consumer, in queue order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PointerEvent {
    /// A previously-unseen device produced its first notification.
    ///
    /// `x`/`y` is the initial position (screen center).
    DeviceAttached {
        handle: DeviceHandle,
        name: String,
        x: i32,
        y: i32,
    },
    /// A device was disconnected. `name` falls back to `"Unknown"` when the
    /// device was never registered.
    DeviceRemoved { handle: DeviceHandle, name: String },
    /// A device moved. Carries both the resulting absolute position and the
    /// original raw delta and flag bits.
    PointerMoved {
        handle: DeviceHandle,
        name: String,
        x: i32,
        y: i32,
        dx: i32,
        dy: i32,
        flags: u16,
    },
}

impl PointerEvent {
    /// The handle of the device this event concerns.
    pub fn handle(&self) -> DeviceHandle {
        match self {
            PointerEvent::DeviceAttached { handle, .. }
            | PointerEvent::DeviceRemoved { handle, .. }
            | PointerEvent::PointerMoved { handle, .. } => *handle,
        }
    }
}
