//! Pointer device identity and geometry primitives.
//!
//! A [`DeviceHandle`] wraps the opaque OS handle value for a connected input
//! device. It is stable for the device's connected lifetime and unique at any
//! instant, but the OS may reuse the value after a physical disconnect — do
//! not persist handles across sessions.

use serde::Serialize;

/// Opaque OS handle for a pointing device.
///
/// On Windows this is the Raw Input `hDevice` value. Treated as a plain
/// integer so it stays `Send` and hashable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct DeviceHandle(pub isize);

impl std::fmt::Display for DeviceHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// An absolute screen position in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

/// Pixel dimensions of a display.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScreenBounds {
    pub width: i32,
    pub height: i32,
}

impl ScreenBounds {
    /// Geometric center, used as the spawn position for new devices.
    #[inline]
    pub fn center(&self) -> Point {
        Point {
            x: self.width / 2,
            y: self.height / 2,
        }
    }

    /// Clamp a point into `[0, width-1] x [0, height-1]`.
    #[inline]
    pub fn clamp(&self, p: Point) -> Point {
        Point {
            x: p.x.clamp(0, self.width - 1),
            y: p.y.clamp(0, self.height - 1),
        }
    }
}

/// Per-device cursor state tracked by the registry.
#[derive(Clone, Debug)]
pub struct PointerDevice {
    pub handle: DeviceHandle,
    /// Classified display name, resolved once when the device is first seen.
    pub name: String,
    /// Current position, always inside the primary display bounds.
    pub x: i32,
    pub y: i32,
}

/// One row of the device enumeration snapshot.
///
/// `index` is a synthetic, enumeration-order id for UI display; `handle` is
/// the OS identity. Serializable so hosts can forward the list verbatim.
#[derive(Clone, Debug, Serialize)]
pub struct DeviceInfo {
    pub index: usize,
    pub handle: DeviceHandle,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_stays_inside_bounds() {
        let b = ScreenBounds {
            width: 1920,
            height: 1080,
        };
        assert_eq!(b.clamp(Point { x: -5, y: 2000 }), Point { x: 0, y: 1079 });
        assert_eq!(b.clamp(Point { x: 10, y: 10 }), Point { x: 10, y: 10 });
        assert_eq!(b.center(), Point { x: 960, y: 540 });
    }

    #[test]
    fn device_info_serializes_for_hosts() {
        let info = DeviceInfo {
            index: 0,
            handle: DeviceHandle(0x1234),
            name: "USB Mouse".into(),
        };
        let json = serde_json::to_string(&info).unwrap();
        assert_eq!(json, r#"{"index":0,"handle":4660,"name":"USB Mouse"}"#);
    }
}
