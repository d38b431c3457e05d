//! Aggregation engine session object.
//!
//! [`Engine`] owns the capture adapter, the event queue, and the dispatcher,
//! and reaches the OS through a boxed [`PlatformHost`]. The host application
//! drives it cooperatively: call [`process`](Engine::process) at whatever
//! cadence events should reach the consumer — there is no internal timer.
//!
//! ```no_run
//! use multimouse::{Engine, backends};
//!
//! let host = backends::platform_host().expect("raw input startup");
//! let mut engine = Engine::new(host);
//! engine.set_move_callback(|m| println!("{} moved to {},{}", m.name, m.x, m.y));
//! engine.set_device_callback(|d| println!("{:?}: {}", d.action, d.name));
//! loop {
//!     engine.process(10);
//!     std::thread::sleep(std::time::Duration::from_millis(5));
//! }
//! ```

use crate::capture::CaptureAdapter;
use crate::config::EngineConfig;
use crate::device::{DeviceHandle, DeviceInfo, Point, PointerDevice};
use crate::dispatch::{DeviceRecord, Dispatcher, MoveRecord};
use crate::host::{ClampTo, PlatformHost};
use crate::queue::EventQueue;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// One multi-device input aggregation session.
pub struct Engine {
    host: Box<dyn PlatformHost>,
    capture: CaptureAdapter,
    dispatcher: Dispatcher,
    queue: Arc<EventQueue>,
    notices_seen: Arc<AtomicU64>,
    config: EngineConfig,
}

impl Engine {
    pub fn new(host: Box<dyn PlatformHost>) -> Self {
        Self::with_config(host, EngineConfig::default())
    }

    pub fn with_config(host: Box<dyn PlatformHost>, config: EngineConfig) -> Self {
        let queue = Arc::new(EventQueue::new());
        let notices_seen = Arc::new(AtomicU64::new(0));
        Self {
            capture: CaptureAdapter::new(Arc::clone(&queue), Arc::clone(&notices_seen)),
            dispatcher: Dispatcher::new(),
            host,
            queue,
            notices_seen,
            config,
        }
    }

    /// Register the consumer callback for `PointerMoved` events.
    pub fn set_move_callback(&mut self, cb: impl FnMut(&MoveRecord<'_>) + Send + 'static) {
        self.dispatcher.set_move_callback(cb);
    }

    /// Register the consumer callback for attach/detach events.
    pub fn set_device_callback(&mut self, cb: impl FnMut(&DeviceRecord<'_>) + Send + 'static) {
        self.dispatcher.set_device_callback(cb);
    }

    /// Service pending OS messages (bounded) and deliver queued events.
    ///
    /// At most `min(max_external_messages, config.max_pump_messages)` host
    /// messages are serviced, so one invocation can never loop indefinitely.
    /// The queue is then drained once and the batch dispatched in order.
    /// Returns messages-plus-events handled, for the host's cadence tuning.
    pub fn process(&mut self, max_external_messages: usize) -> usize {
        let cap = max_external_messages.min(self.config.max_pump_messages);
        let pumped = self.host.pump_messages(cap);
        for notice in pumped.notices {
            self.capture.handle_notice(notice, self.host.as_ref());
        }
        let batch = self.queue.drain_all();
        pumped.messages + self.dispatcher.dispatch(&batch)
    }

    /// Pointer devices currently known to the OS, with synthetic indices.
    pub fn devices(&self) -> Vec<DeviceInfo> {
        self.host.enumerate_pointer_devices()
    }

    /// Devices this session has seen motion from.
    pub fn tracked_devices(&self) -> impl Iterator<Item = &PointerDevice> {
        self.capture.registry().iter()
    }

    /// Monotonic count of motion notifications over the session lifetime.
    pub fn notification_count(&self) -> u64 {
        self.notices_seen.load(Ordering::Relaxed)
    }

    /// The OS's authoritative cursor position, if queryable.
    pub fn cursor_pos(&self) -> Option<Point> {
        self.host.cursor_pos()
    }

    /// Move the system cursor, clamped to the requested rectangle.
    pub fn set_cursor_pos(&self, p: Point, clamp: ClampTo) -> bool {
        self.host.set_cursor_pos(p, clamp)
    }

    /// Queue a synthetic move event (no hardware involved); it is delivered
    /// by the next `process` call like any real event.
    pub fn inject_motion(&self, dx: i32, dy: i32, handle: DeviceHandle) {
        self.capture.inject_motion(dx, dy, handle);
    }
}
