//! Cursor visibility state machine.
//!
//! Hiding the cursor here is a **system-wide** mutation: every one of the ten
//! standard glyph slots (arrow, text beam, wait, …) is replaced with an
//! invisible 1x1 placeholder, and the OS display counter is driven negative.
//! That state outlives the process if nothing restores it, corrupting the
//! desktop for every other application — so the glyph table is treated as a
//! guarded resource. [`CursorVisibility::emergency_restore`] is the
//! unconditional backstop and must be reachable from the host's
//! abnormal-termination hook (the Windows backend wires it to the console
//! control handler).
//!
//! Restore deliberately re-resolves the OS *default* glyphs rather than
//! replaying the pre-hide snapshot: a third party that swapped glyphs while
//! we were hidden is overridden to defaults. The snapshot still exists (taken
//! once, on the first hide ever) and anchors glyph classification in
//! [`query_state`](CursorVisibility::query_state).

use crate::config::EngineConfig;
use crate::device::Point;
use crate::error::Error;
use log::{debug, warn};
use serde::Serialize;
use std::time::Duration;

/// The ten standard system glyph slots, with their OCR resource ids.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GlyphSlot {
    Arrow,
    IBeam,
    Wait,
    Cross,
    SizeNwse,
    SizeNesw,
    SizeWe,
    SizeNs,
    No,
    Hand,
}

impl GlyphSlot {
    /// Every slot, in the order hide/show iterates them.
    pub const ALL: [GlyphSlot; 10] = [
        GlyphSlot::Arrow,
        GlyphSlot::IBeam,
        GlyphSlot::Hand,
        GlyphSlot::Wait,
        GlyphSlot::Cross,
        GlyphSlot::SizeWe,
        GlyphSlot::SizeNs,
        GlyphSlot::SizeNesw,
        GlyphSlot::SizeNwse,
        GlyphSlot::No,
    ];

    /// The OCR_* system cursor id for this slot. The IDC_* resource id used
    /// to load the default glyph has the same numeric value.
    pub fn ocr_id(self) -> u32 {
        match self {
            GlyphSlot::Arrow => 32512,
            GlyphSlot::IBeam => 32513,
            GlyphSlot::Wait => 32514,
            GlyphSlot::Cross => 32515,
            GlyphSlot::SizeNwse => 32642,
            GlyphSlot::SizeNesw => 32643,
            GlyphSlot::SizeWe => 32644,
            GlyphSlot::SizeNs => 32645,
            GlyphSlot::No => 32648,
            GlyphSlot::Hand => 32649,
        }
    }

    fn kind(self) -> CursorKind {
        match self {
            GlyphSlot::Arrow => CursorKind::Arrow,
            GlyphSlot::IBeam => CursorKind::Ibeam,
            GlyphSlot::Wait => CursorKind::Wait,
            GlyphSlot::Cross => CursorKind::Cross,
            GlyphSlot::SizeNwse => CursorKind::ResizeNwse,
            GlyphSlot::SizeNesw => CursorKind::ResizeNesw,
            GlyphSlot::SizeWe => CursorKind::ResizeEw,
            GlyphSlot::SizeNs => CursorKind::ResizeNs,
            GlyphSlot::No => CursorKind::NotAllowed,
            GlyphSlot::Hand => CursorKind::Hand,
        }
    }
}

/// Classified cursor appearance reported by [`CursorVisibility::query_state`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CursorKind {
    Arrow,
    Ibeam,
    Hand,
    Wait,
    Cross,
    ResizeEw,
    ResizeNs,
    ResizeNesw,
    ResizeNwse,
    NotAllowed,
    /// A glyph none of the ten defaults match, while visible.
    System,
    /// A glyph none of the ten defaults match, while this engine hid the
    /// cursor.
    Hidden,
}

impl CursorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            CursorKind::Arrow => "arrow",
            CursorKind::Ibeam => "ibeam",
            CursorKind::Hand => "hand",
            CursorKind::Wait => "wait",
            CursorKind::Cross => "cross",
            CursorKind::ResizeEw => "resize-ew",
            CursorKind::ResizeNs => "resize-ns",
            CursorKind::ResizeNesw => "resize-nesw",
            CursorKind::ResizeNwse => "resize-nwse",
            CursorKind::NotAllowed => "not-allowed",
            CursorKind::System => "system",
            CursorKind::Hidden => "hidden",
        }
    }
}

/// Read-only snapshot of the live cursor, for diagnostics and hosts.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct CursorState {
    #[serde(rename = "type")]
    pub kind: CursorKind,
    pub visible: bool,
    pub x: i32,
    pub y: i32,
}

/// Platform operations on the system glyph table.
///
/// Each glyph mutation is attempted per-slot and independently: one failing
/// slot must not abort the rest (there is no transactional guarantee for the
/// swap itself, the backstop is [`CursorVisibility::emergency_restore`]).
pub trait GlyphTable {
    /// Capture the ten default glyph handles. Called once ever, before the
    /// first blanking; later calls may be no-ops.
    fn save_defaults(&mut self) -> Result<(), Error>;

    /// Replace all ten slots with the invisible placeholder. Returns the
    /// number of slots that succeeded; `Err` only when the placeholder
    /// itself cannot be created.
    fn blank_all(&mut self) -> Result<usize, Error>;

    /// Restore all ten slots to freshly-resolved OS defaults. Returns the
    /// number of slots restored.
    fn restore_defaults(&mut self) -> usize;

    /// Tell the rest of the system the glyph table changed (settings
    /// broadcast plus desktop redraw).
    fn broadcast_change(&mut self);

    /// One step of the OS cursor display counter; returns the new counter.
    fn show_cursor(&mut self, visible: bool) -> i32;

    /// Current glyph identity (matched against the ten defaults) and screen
    /// position, if the OS will say.
    fn cursor_info(&self) -> Option<(Option<GlyphSlot>, Point)>;
}

/// Process-wide hide/show of the system pointer glyphs.
///
/// States: `Visible` (initial) and `Hidden`. The default-glyph snapshot flag
/// is independent of visibility: captured on the first hide ever, reused by
/// every later cycle.
pub struct CursorVisibility<T: GlyphTable> {
    table: T,
    hidden: bool,
    snapshot_saved: bool,
    settle: Duration,
    ceiling: u32,
}

impl<T: GlyphTable> CursorVisibility<T> {
    pub fn new(table: T, config: &EngineConfig) -> Self {
        Self {
            table,
            hidden: false,
            snapshot_saved: false,
            settle: config.hide_settle(),
            ceiling: config.counter_ceiling,
        }
    }

    /// Whether this engine currently believes it hid the cursor.
    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// Hide all system pointer glyphs. No-op returning `Ok(true)` when
    /// already hidden.
    pub fn hide(&mut self) -> Result<bool, Error> {
        if self.hidden {
            return Ok(true);
        }
        if !self.snapshot_saved {
            self.table.save_defaults()?;
            self.snapshot_saved = true;
        }
        // Let any in-flight click settle before the glyphs vanish, so the
        // swap does not race an active button-down.
        if !self.settle.is_zero() {
            std::thread::sleep(self.settle);
        }
        let blanked = self.table.blank_all()?;
        if blanked < GlyphSlot::ALL.len() {
            warn!("only {blanked}/10 glyph slots blanked");
        }
        self.drive_counter(false)?;
        self.hidden = true;
        debug!("system cursor hidden");
        Ok(true)
    }

    /// Restore default glyphs and visibility. Returns `Ok(false)` as the
    /// no-op sentinel when already visible.
    pub fn show(&mut self) -> Result<bool, Error> {
        if !self.hidden {
            return Ok(false);
        }
        let restored = self.table.restore_defaults();
        if restored < GlyphSlot::ALL.len() {
            warn!("only {restored}/10 glyph slots restored");
        }
        self.table.broadcast_change();
        self.drive_counter(true)?;
        self.hidden = false;
        debug!("system cursor restored");
        Ok(true)
    }

    /// Unconditional restore for crash/termination paths.
    ///
    /// Ignores all bookkeeping (which may be stale if the handler runs
    /// concurrently with normal operation), restores defaults, raises the
    /// counter, and forces the `Visible` state. Idempotent.
    pub fn emergency_restore(&mut self) -> Result<(), Error> {
        let _ = self.table.restore_defaults();
        self.table.broadcast_change();
        self.drive_counter(true)?;
        self.hidden = false;
        Ok(())
    }

    /// Classify the live cursor glyph and report its position. Never mutates
    /// state. `None` when the OS refuses the query.
    pub fn query_state(&self) -> Option<CursorState> {
        let (slot, pos) = self.table.cursor_info()?;
        let kind = match slot {
            Some(s) => s.kind(),
            None if self.hidden => CursorKind::Hidden,
            None => CursorKind::System,
        };
        Some(CursorState {
            kind,
            visible: !self.hidden,
            x: pos.x,
            y: pos.y,
        })
    }

    /// Drive the OS display counter until it settles on the requested side
    /// of zero. Bounded: a counter another process keeps pushing back is
    /// reported instead of spun on forever.
    fn drive_counter(&mut self, visible: bool) -> Result<(), Error> {
        for _ in 0..self.ceiling {
            let count = self.table.show_cursor(visible);
            let settled = if visible { count >= 0 } else { count < 0 };
            if settled {
                return Ok(());
            }
        }
        Err(Error::CounterStuck(self.ceiling))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// In-memory glyph table simulating the OS counter and slot behavior.
    #[derive(Default)]
    struct FakeTable {
        saved: bool,
        save_calls: u32,
        counter: i32,
        /// True while the placeholder occupies the slots.
        blanked: bool,
        restore_calls: u32,
        broadcasts: u32,
    }

    impl GlyphTable for FakeTable {
        fn save_defaults(&mut self) -> Result<(), Error> {
            self.saved = true;
            self.save_calls += 1;
            Ok(())
        }
        fn blank_all(&mut self) -> Result<usize, Error> {
            self.blanked = true;
            Ok(10)
        }
        fn restore_defaults(&mut self) -> usize {
            self.blanked = false;
            self.restore_calls += 1;
            10
        }
        fn broadcast_change(&mut self) {
            self.broadcasts += 1;
        }
        fn show_cursor(&mut self, visible: bool) -> i32 {
            self.counter += if visible { 1 } else { -1 };
            self.counter
        }
        fn cursor_info(&self) -> Option<(Option<GlyphSlot>, Point)> {
            let slot = if self.blanked {
                None
            } else {
                Some(GlyphSlot::Arrow)
            };
            Some((slot, Point { x: 40, y: 50 }))
        }
    }

    fn controller() -> CursorVisibility<FakeTable> {
        let config = EngineConfig {
            hide_settle_ms: 0,
            ..EngineConfig::default()
        };
        CursorVisibility::new(FakeTable::default(), &config)
    }

    #[test]
    fn hide_is_idempotent_without_counter_drift() {
        let mut c = controller();
        assert!(c.hide().unwrap());
        let counter_after_first = c.table.counter;
        assert!(c.hide().unwrap());
        assert_eq!(c.table.counter, counter_after_first);
        assert!(c.is_hidden());
    }

    #[test]
    fn snapshot_is_captured_once_across_cycles() {
        let mut c = controller();
        c.hide().unwrap();
        c.show().unwrap();
        c.hide().unwrap();
        assert!(c.table.saved);
        assert_eq!(c.table.save_calls, 1);
    }

    #[test]
    fn show_when_visible_is_a_failure_sentinel() {
        let mut c = controller();
        assert!(!c.show().unwrap());
        assert_eq!(c.table.restore_calls, 0);
    }

    #[test]
    fn hide_then_show_returns_counter_to_non_negative() {
        let mut c = controller();
        c.hide().unwrap();
        assert!(c.table.counter < 0);
        assert!(c.show().unwrap());
        assert!(c.table.counter >= 0);
        assert_eq!(c.table.restore_calls, 1);
        assert_eq!(c.table.broadcasts, 1);
        assert!(!c.is_hidden());
    }

    #[test]
    fn emergency_restore_from_visible_is_a_noop_state_wise() {
        let mut c = controller();
        c.emergency_restore().unwrap();
        assert!(!c.is_hidden());
        // Restoration is still attempted unconditionally.
        assert_eq!(c.table.restore_calls, 1);
    }

    #[test]
    fn emergency_restore_recovers_from_hidden() {
        let mut c = controller();
        c.hide().unwrap();
        c.emergency_restore().unwrap();
        assert!(!c.is_hidden());
        assert!(c.table.counter >= 0);
    }

    #[test]
    fn stuck_counter_is_reported_not_spun_on() {
        struct StuckTable(FakeTable);
        impl GlyphTable for StuckTable {
            fn save_defaults(&mut self) -> Result<(), Error> {
                self.0.save_defaults()
            }
            fn blank_all(&mut self) -> Result<usize, Error> {
                self.0.blank_all()
            }
            fn restore_defaults(&mut self) -> usize {
                self.0.restore_defaults()
            }
            fn broadcast_change(&mut self) {
                self.0.broadcast_change()
            }
            fn show_cursor(&mut self, _visible: bool) -> i32 {
                // Another process keeps forcing the counter back up.
                1
            }
            fn cursor_info(&self) -> Option<(Option<GlyphSlot>, Point)> {
                self.0.cursor_info()
            }
        }

        let config = EngineConfig {
            hide_settle_ms: 0,
            counter_ceiling: 4,
            ..EngineConfig::default()
        };
        let mut c = CursorVisibility::new(StuckTable(FakeTable::default()), &config);
        match c.hide() {
            Err(Error::CounterStuck(4)) => {}
            other => panic!("expected CounterStuck, got {other:?}"),
        }
        assert!(!c.is_hidden());
    }

    #[test]
    fn query_state_classifies_against_defaults() {
        let mut c = controller();
        let state = c.query_state().unwrap();
        assert_eq!(state.kind, CursorKind::Arrow);
        assert!(state.visible);
        assert_eq!((state.x, state.y), (40, 50));

        c.hide().unwrap();
        let state = c.query_state().unwrap();
        assert_eq!(state.kind, CursorKind::Hidden);
        assert!(!state.visible);
    }

    #[test]
    fn cursor_state_serializes_with_type_tag() {
        let state = CursorState {
            kind: CursorKind::ResizeEw,
            visible: true,
            x: 1,
            y: 2,
        };
        let json = serde_json::to_string(&state).unwrap();
        assert_eq!(json, r#"{"type":"resize-ew","visible":true,"x":1,"y":2}"#);
    }
}
