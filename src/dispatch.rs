//! Consumer callback dispatch.
//!
//! Holds the two registered callables and fans a drained event batch out to
//! them, in queue order, never concurrently. An unset callback is not an
//! error: matching events are silently dropped and the rest of the batch is
//! preserved.

use crate::device::DeviceHandle;
use crate::event::PointerEvent;

/// Attach/detach discriminator passed to the device callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeviceAction {
    Added,
    Removed,
}

/// Arguments for the move callback.
#[derive(Clone, Copy, Debug)]
pub struct MoveRecord<'a> {
    pub handle: DeviceHandle,
    pub name: &'a str,
    pub x: i32,
    pub y: i32,
    pub dx: i32,
    pub dy: i32,
    pub flags: u16,
}

/// Arguments for the device-change callback.
///
/// `x`/`y` is the initial position for `Added` and `(0, 0)` for `Removed`.
#[derive(Clone, Copy, Debug)]
pub struct DeviceRecord<'a> {
    pub action: DeviceAction,
    pub handle: DeviceHandle,
    pub name: &'a str,
    pub x: i32,
    pub y: i32,
}

pub type MoveCallback = Box<dyn FnMut(&MoveRecord<'_>) + Send>;
pub type DeviceCallback = Box<dyn FnMut(&DeviceRecord<'_>) + Send>;

/// Routes drained events to the registered consumer callbacks.
#[derive(Default)]
pub struct Dispatcher {
    on_move: Option<MoveCallback>,
    on_device: Option<DeviceCallback>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_move_callback(&mut self, cb: impl FnMut(&MoveRecord<'_>) + Send + 'static) {
        self.on_move = Some(Box::new(cb));
    }

    pub fn set_device_callback(&mut self, cb: impl FnMut(&DeviceRecord<'_>) + Send + 'static) {
        self.on_device = Some(Box::new(cb));
    }

    /// Deliver a batch in order. Returns the number of events consumed from
    /// the batch (all of them, whether or not a callback was registered).
    pub fn dispatch(&mut self, events: &[PointerEvent]) -> usize {
        for event in events {
            match event {
                PointerEvent::PointerMoved {
                    handle,
                    name,
                    x,
                    y,
                    dx,
                    dy,
                    flags,
                } => {
                    if let Some(cb) = self.on_move.as_mut() {
                        cb(&MoveRecord {
                            handle: *handle,
                            name,
                            x: *x,
                            y: *y,
                            dx: *dx,
                            dy: *dy,
                            flags: *flags,
                        });
                    }
                }
                PointerEvent::DeviceAttached { handle, name, x, y } => {
                    if let Some(cb) = self.on_device.as_mut() {
                        cb(&DeviceRecord {
                            action: DeviceAction::Added,
                            handle: *handle,
                            name,
                            x: *x,
                            y: *y,
                        });
                    }
                }
                PointerEvent::DeviceRemoved { handle, name } => {
                    if let Some(cb) = self.on_device.as_mut() {
                        cb(&DeviceRecord {
                            action: DeviceAction::Removed,
                            handle: *handle,
                            name,
                            x: 0,
                            y: 0,
                        });
                    }
                }
            }
        }
        events.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn moved(h: isize, dx: i32) -> PointerEvent {
        PointerEvent::PointerMoved {
            handle: DeviceHandle(h),
            name: "USB Mouse".into(),
            x: 100,
            y: 100,
            dx,
            dy: 0,
            flags: 0,
        }
    }

    #[test]
    fn batch_is_delivered_in_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let mut d = Dispatcher::new();
        d.set_move_callback(move |rec| sink.lock().unwrap().push(rec.dx));

        let n = d.dispatch(&[moved(1, 1), moved(1, 2), moved(1, 3)]);
        assert_eq!(n, 3);
        assert_eq!(*seen.lock().unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn unset_callback_drops_matching_events_only() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let mut d = Dispatcher::new();
        // Only the device callback is registered.
        d.set_device_callback(move |rec| {
            sink.lock().unwrap().push((rec.action, rec.x, rec.y));
        });

        let events = [
            PointerEvent::DeviceAttached {
                handle: DeviceHandle(1),
                name: "USB Mouse".into(),
                x: 960,
                y: 540,
            },
            moved(1, 5),
            PointerEvent::DeviceRemoved {
                handle: DeviceHandle(1),
                name: "USB Mouse".into(),
            },
        ];
        let n = d.dispatch(&events);
        assert_eq!(n, 3);
        let seen = seen.lock().unwrap();
        assert_eq!(seen[0], (DeviceAction::Added, 960, 540));
        assert_eq!(seen[1], (DeviceAction::Removed, 0, 0));
    }
}
