//! Platform collaborator interface.
//!
//! Everything the engine needs from the OS is reached through
//! [`PlatformHost`]: identifier resolution, screen geometry, the
//! authoritative cursor position, cursor injection, the message pump, and
//! device enumeration. The Windows implementation lives in
//! [`backends::windows`](crate::backends); tests drive the engine with an
//! in-memory mock.

use crate::device::{DeviceHandle, DeviceInfo, Point, ScreenBounds};
use crate::event::RawNotice;

/// Which bounding rectangle cursor injection clamps against.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClampTo {
    /// The primary display, `[0, w-1] x [0, h-1]`.
    Primary,
    /// The virtual desktop spanning all monitors (may have negative origin).
    Virtual,
}

/// Result of one message-pump pass.
#[derive(Debug, Default)]
pub struct Pumped {
    /// External messages serviced (bounded by the caller).
    pub messages: usize,
    /// Pointer notifications parsed out of the serviced messages, in
    /// delivery order.
    pub notices: Vec<RawNotice>,
}

/// External collaborators of the aggregation core, per platform.
pub trait PlatformHost {
    /// Raw platform identifier string for a device handle, if resolvable.
    fn raw_device_identifier(&self, handle: DeviceHandle) -> Option<String>;

    /// Pixel bounds of the primary display.
    fn primary_screen(&self) -> ScreenBounds;

    /// The OS's authoritative cursor position, when queryable.
    ///
    /// Preferred over delta integration because it already reflects OS-level
    /// acceleration and clamping.
    fn cursor_pos(&self) -> Option<Point>;

    /// Move the system cursor, clamping into the selected rectangle first.
    /// Returns whether the OS accepted the move.
    fn set_cursor_pos(&self, p: Point, clamp: ClampTo) -> bool;

    /// Service up to `max` pending messages on the dedicated message target
    /// and return the pointer notifications they carried.
    fn pump_messages(&mut self, max: usize) -> Pumped;

    /// Snapshot of pointer-class devices currently known to the OS (not
    /// limited to devices this engine has seen motion from).
    fn enumerate_pointer_devices(&self) -> Vec<DeviceInfo>;
}
