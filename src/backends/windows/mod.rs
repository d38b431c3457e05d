#![cfg(target_os = "windows")]

//! Windows backend.
//!
//! Two pieces live here:
//! - [`WinHost`] implements [`PlatformHost`](crate::host::PlatformHost):
//!   the hidden Raw Input window, `WM_INPUT` parsing, screen metrics, and
//!   cursor position plumbing.
//! - [`WinGlyphTable`](cursor::WinGlyphTable) implements
//!   [`GlyphTable`](crate::cursor::GlyphTable): system cursor glyph
//!   replacement and restoration, plus the console-control termination hook
//!   that restores glyphs on abnormal exit.
//!
//! Most users should construct these through
//! [`backends::platform_host`](crate::backends::platform_host) and
//! [`cursor::glyph_table`] rather than directly.

pub mod cursor;
pub mod raw_input;

use crate::device::{DeviceHandle, DeviceInfo, Point, ScreenBounds};
use crate::error::Error;
use crate::host::{ClampTo, PlatformHost, Pumped};
use raw_input::RawInputChannel;
use windows_sys::Win32::UI::WindowsAndMessaging::{
    GetCursorPos, GetSystemMetrics, SetCursorPos, SM_CXSCREEN, SM_CXVIRTUALSCREEN, SM_CYSCREEN,
    SM_CYVIRTUALSCREEN, SM_XVIRTUALSCREEN, SM_YVIRTUALSCREEN,
};

/// NUL-terminated UTF-16 for Win32 string parameters.
pub(crate) fn wide(s: &str) -> Vec<u16> {
    s.encode_utf16().chain(std::iter::once(0)).collect()
}

/// [`PlatformHost`] backed by the Win32 Raw Input and cursor APIs.
pub struct WinHost {
    channel: RawInputChannel,
}

impl WinHost {
    /// Bring up the hidden message window and the Raw Input subscription.
    pub fn new() -> Result<Self, Error> {
        Ok(Self {
            channel: RawInputChannel::new()?,
        })
    }
}

impl PlatformHost for WinHost {
    fn raw_device_identifier(&self, handle: DeviceHandle) -> Option<String> {
        raw_input::device_identifier(handle)
    }

    fn primary_screen(&self) -> ScreenBounds {
        unsafe {
            ScreenBounds {
                width: GetSystemMetrics(SM_CXSCREEN),
                height: GetSystemMetrics(SM_CYSCREEN),
            }
        }
    }

    fn cursor_pos(&self) -> Option<Point> {
        unsafe {
            let mut p = std::mem::zeroed();
            if GetCursorPos(&mut p) != 0 {
                Some(Point { x: p.x, y: p.y })
            } else {
                None
            }
        }
    }

    fn set_cursor_pos(&self, p: Point, clamp: ClampTo) -> bool {
        unsafe {
            let (left, top, width, height) = match clamp {
                ClampTo::Primary => (
                    0,
                    0,
                    GetSystemMetrics(SM_CXSCREEN),
                    GetSystemMetrics(SM_CYSCREEN),
                ),
                ClampTo::Virtual => (
                    GetSystemMetrics(SM_XVIRTUALSCREEN),
                    GetSystemMetrics(SM_YVIRTUALSCREEN),
                    GetSystemMetrics(SM_CXVIRTUALSCREEN),
                    GetSystemMetrics(SM_CYVIRTUALSCREEN),
                ),
            };
            let x = p.x.clamp(left, left + width - 1);
            let y = p.y.clamp(top, top + height - 1);
            SetCursorPos(x, y) != 0
        }
    }

    fn pump_messages(&mut self, max: usize) -> Pumped {
        self.channel.pump(max)
    }

    fn enumerate_pointer_devices(&self) -> Vec<DeviceInfo> {
        raw_input::enumerate_pointer_devices()
    }
}
