//! multimouse — multi-device pointer input aggregation for Windows.
//!
//! The OS merges every attached mouse and trackpad into a single cursor;
//! Raw Input still reports motion per device before that merge happens.
//! This crate subscribes to those per-device notifications, tracks an
//! independent on-screen position for each device, and delivers normalized
//! move/attach/detach events to consumer callbacks at a caller-driven
//! polling cadence. A companion state machine globally hides or restores the
//! system cursor glyphs, with crash-safe restoration via a termination hook.
//!
//! Platform plumbing is reached through the [`PlatformHost`] and
//! [`GlyphTable`] traits, so everything above the `backends` module is
//! OS-independent and testable in-memory.

pub mod backends;
pub mod capture;
pub mod classify;
pub mod config;
pub mod cursor;
pub mod device;
pub mod dispatch;
pub mod engine;
pub mod error;
pub mod event;
pub mod host;
pub mod queue;
pub mod registry;

pub use config::EngineConfig;
pub use cursor::{CursorKind, CursorState, CursorVisibility, GlyphSlot, GlyphTable};
pub use device::{DeviceHandle, DeviceInfo, Point, PointerDevice, ScreenBounds};
pub use dispatch::{DeviceAction, DeviceRecord, Dispatcher, MoveRecord};
pub use engine::Engine;
pub use error::Error;
pub use event::{DeviceChange, MotionNotice, PointerEvent, RawNotice};
pub use host::{ClampTo, PlatformHost, Pumped};
pub use queue::EventQueue;
pub use registry::DeviceRegistry;
