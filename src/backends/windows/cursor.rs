#![cfg(target_os = "windows")]

//! Win32 glyph table operations.
//!
//! [`WinGlyphTable`] mutates the system-wide cursor glyph slots via
//! `SetSystemCursor`. The replacement placeholder is a 1x1 fully transparent
//! cursor (AND mask all ones, XOR mask all zeros). Every slot operation is
//! attempted independently; a failing slot never aborts the rest.
//!
//! A process-wide hidden flag mirrors the state machine's view so the
//! console-control handler — which runs on an OS thread with no access to
//! the controller — can decide whether a forced exit needs glyph
//! restoration. Hosts must call [`install_termination_hook`] once after
//! startup; leaving blanked glyphs behind after process exit corrupts the
//! desktop for every other application.

use crate::cursor::{GlyphSlot, GlyphTable};
use crate::device::Point;
use crate::error::Error;
use core::ffi::c_void;
use log::warn;
use std::sync::atomic::{AtomicBool, Ordering};
use windows_sys::Win32::Foundation::POINT;
use windows_sys::Win32::Graphics::Gdi::InvalidateRect;
use windows_sys::Win32::Graphics::Gdi::UpdateWindow;
use windows_sys::Win32::System::Console::SetConsoleCtrlHandler;
use windows_sys::Win32::System::LibraryLoader::GetModuleHandleW;
use windows_sys::Win32::UI::WindowsAndMessaging::{
    CopyIcon, CreateCursor, DestroyCursor, GetCursorInfo, GetDesktopWindow, LoadCursorW,
    SendMessageW, SetSystemCursor, ShowCursor, SystemParametersInfoW, CURSORINFO, HWND_BROADCAST,
    SPIF_SENDCHANGE, SPIF_UPDATEINIFILE, SPI_SETCURSORS, WM_SETTINGCHANGE,
};

type HCURSOR = *mut c_void;

// Console control event codes (CTRL_C through CTRL_SHUTDOWN).
const CTRL_EVENTS: [u32; 5] = [0, 1, 2, 5, 6];

/// Bounded iteration ceiling for the handler's own counter loop; the state
/// machine's configured ceiling is not reachable from a console callback.
const EMERGENCY_COUNTER_CEILING: u32 = 64;

/// Process-wide mirror of "this engine blanked the glyph table".
static CURSOR_HIDDEN: AtomicBool = AtomicBool::new(false);

/// Construct the Win32-backed glyph table.
pub fn glyph_table() -> WinGlyphTable {
    WinGlyphTable {
        placeholder: std::ptr::null_mut(),
        saved: None,
    }
}

/// [`GlyphTable`] over the live system cursor slots.
pub struct WinGlyphTable {
    /// Lazily-created 1x1 transparent cursor.
    placeholder: HCURSOR,
    /// Default glyph handles captured on the first hide ever. Restoration
    /// re-resolves defaults instead of replaying these; they anchor glyph
    /// classification in `cursor_info`.
    saved: Option<[HCURSOR; 10]>,
}

impl WinGlyphTable {
    fn ensure_placeholder(&mut self) -> Result<HCURSOR, Error> {
        if self.placeholder.is_null() {
            unsafe {
                let and_mask: [u8; 1] = [0xFF];
                let xor_mask: [u8; 1] = [0x00];
                self.placeholder = CreateCursor(
                    GetModuleHandleW(std::ptr::null()),
                    0,
                    0,
                    1,
                    1,
                    and_mask.as_ptr() as *const c_void,
                    xor_mask.as_ptr() as *const c_void,
                );
            }
        }
        if self.placeholder.is_null() {
            Err(Error::CursorResource)
        } else {
            Ok(self.placeholder)
        }
    }
}

impl GlyphTable for WinGlyphTable {
    fn save_defaults(&mut self) -> Result<(), Error> {
        if self.saved.is_none() {
            let mut handles: [HCURSOR; 10] = [std::ptr::null_mut(); 10];
            for (i, slot) in GlyphSlot::ALL.iter().enumerate() {
                handles[i] = load_default(*slot);
            }
            self.saved = Some(handles);
        }
        Ok(())
    }

    fn blank_all(&mut self) -> Result<usize, Error> {
        let placeholder = self.ensure_placeholder()?;
        let mut ok = 0;
        for slot in GlyphSlot::ALL {
            // SetSystemCursor takes ownership of the handle, so each slot
            // gets its own copy of the placeholder.
            unsafe {
                if SetSystemCursor(CopyIcon(placeholder), slot.ocr_id()) != 0 {
                    ok += 1;
                } else {
                    warn!("failed to blank glyph slot {slot:?}");
                }
            }
        }
        CURSOR_HIDDEN.store(true, Ordering::SeqCst);
        Ok(ok)
    }

    fn restore_defaults(&mut self) -> usize {
        let ok = restore_default_glyphs();
        CURSOR_HIDDEN.store(false, Ordering::SeqCst);
        ok
    }

    fn broadcast_change(&mut self) {
        broadcast_glyph_change();
    }

    fn show_cursor(&mut self, visible: bool) -> i32 {
        unsafe { ShowCursor(visible as i32) }
    }

    fn cursor_info(&self) -> Option<(Option<GlyphSlot>, Point)> {
        unsafe {
            let mut info: CURSORINFO = std::mem::zeroed();
            info.cbSize = std::mem::size_of::<CURSORINFO>() as u32;
            if GetCursorInfo(&mut info) == 0 {
                return None;
            }

            let slot = GlyphSlot::ALL.into_iter().find(|slot| {
                let default = match &self.saved {
                    // System cursor handles are shared, so the snapshot
                    // taken at save time still identifies the defaults.
                    Some(handles) => handles[slot_index(*slot)],
                    None => load_default(*slot),
                };
                !default.is_null() && info.hCursor == default
            });

            let pos: POINT = info.ptScreenPos;
            Some((slot, Point { x: pos.x, y: pos.y }))
        }
    }
}

impl Drop for WinGlyphTable {
    fn drop(&mut self) {
        if !self.placeholder.is_null() {
            unsafe { DestroyCursor(self.placeholder) };
        }
    }
}

fn slot_index(slot: GlyphSlot) -> usize {
    GlyphSlot::ALL
        .iter()
        .position(|s| *s == slot)
        .unwrap_or(0)
}

fn load_default(slot: GlyphSlot) -> HCURSOR {
    // IDC resource ids are numerically identical to the OCR slot ids.
    unsafe { LoadCursorW(std::ptr::null_mut(), slot.ocr_id() as usize as *const u16) }
}

/// Reload the user's cursor scheme, then stamp the stock defaults into every
/// slot. Each slot is attempted independently.
fn restore_default_glyphs() -> usize {
    unsafe {
        SystemParametersInfoW(
            SPI_SETCURSORS,
            0,
            std::ptr::null_mut(),
            SPIF_UPDATEINIFILE | SPIF_SENDCHANGE,
        );

        let mut ok = 0;
        for slot in GlyphSlot::ALL {
            let default = load_default(slot);
            if !default.is_null() && SetSystemCursor(CopyIcon(default), slot.ocr_id()) != 0 {
                ok += 1;
            }
        }

        SystemParametersInfoW(
            SPI_SETCURSORS,
            0,
            std::ptr::null_mut(),
            SPIF_UPDATEINIFILE | SPIF_SENDCHANGE,
        );
        ok
    }
}

/// Settings broadcast plus desktop redraw so other applications drop their
/// cached glyph handles.
fn broadcast_glyph_change() {
    unsafe {
        SendMessageW(
            HWND_BROADCAST,
            WM_SETTINGCHANGE,
            SPI_SETCURSORS as usize,
            0,
        );
        InvalidateRect(std::ptr::null_mut(), std::ptr::null(), 1);
        UpdateWindow(GetDesktopWindow());
    }
}

/// Unconditional default-glyph restoration, callable from any context.
///
/// This is the backstop for crash paths: it ignores the state machine
/// entirely, restores defaults, broadcasts, and raises the display counter
/// (bounded).
pub fn emergency_restore_glyphs() {
    restore_default_glyphs();
    broadcast_glyph_change();
    unsafe {
        for _ in 0..EMERGENCY_COUNTER_CEILING {
            if ShowCursor(1) >= 0 {
                break;
            }
        }
    }
    CURSOR_HIDDEN.store(false, Ordering::SeqCst);
}

unsafe extern "system" fn console_ctrl_handler(ctrl_type: u32) -> i32 {
    if CTRL_EVENTS.contains(&ctrl_type) && CURSOR_HIDDEN.load(Ordering::SeqCst) {
        emergency_restore_glyphs();
    }
    // Never claim the event; the default handler still terminates us.
    0
}

/// Register the console-control hook that restores glyphs if the process is
/// killed while hidden. Returns whether the OS accepted the handler.
pub fn install_termination_hook() -> bool {
    unsafe { SetConsoleCtrlHandler(Some(console_ctrl_handler), 1) != 0 }
}
