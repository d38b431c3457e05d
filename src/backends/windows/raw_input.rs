//! Windows Raw Input channel.
//!
//! Owns the hidden message-only window that the Raw Input subscription
//! targets, parses `WM_INPUT` / `WM_INPUT_DEVICE_CHANGE` into
//! [`RawNotice`] records, and services the message pump in bounded passes.
//!
//! The window procedure is intentionally "dumb": it only parses OS payloads
//! into small structs and hands them to the sink installed for the duration
//! of a pump pass. Device registration, clamping, and event construction all
//! live in the capture adapter.
//!
//! ## Conventions
//! - Mouse deltas are reported in **raw OS counts** as provided by Raw Input.
//! - `flags` is `RAWMOUSE.usFlags`, passed through uninterpreted.

#![cfg(target_os = "windows")]

use crate::classify::classify;
use crate::device::{DeviceHandle, DeviceInfo};
use crate::error::Error;
use crate::event::{DeviceChange, MotionNotice, RawNotice};
use core::ffi::c_void;
use std::cell::Cell;
use windows_sys::Win32::Foundation::{GetLastError, HWND, LPARAM, LRESULT, WPARAM};
use windows_sys::Win32::System::LibraryLoader::GetModuleHandleW;
use windows_sys::Win32::UI::Input::{
    GetRawInputData, GetRawInputDeviceInfoW, GetRawInputDeviceList, RegisterRawInputDevices,
    RAWINPUTDEVICE, RAWINPUTDEVICELIST, RAWINPUTHEADER, RAWMOUSE, RIDI_DEVICENAME, RID_INPUT,
};
use windows_sys::Win32::UI::WindowsAndMessaging::{
    CreateWindowExW, DefWindowProcW, DestroyWindow, DispatchMessageW, PeekMessageW, RegisterClassW,
    TranslateMessage, MSG, PM_REMOVE, WNDCLASSW, WS_POPUP,
};

use super::wide;
use crate::host::Pumped;

// Local constants; the module exports for these vary across windows-sys
// versions.
const WM_INPUT: u32 = 0x00FF;
const WM_INPUT_DEVICE_CHANGE: u32 = 0x00FE;
const GIDC_ARRIVAL: usize = 1;
const GIDC_REMOVAL: usize = 2;
const RIM_TYPEMOUSE: u32 = 0;
const RIDEV_INPUTSINK: u32 = 0x0000_0100;
const RIDEV_DEVNOTIFY: u32 = 0x0000_2000;
const RIDEV_REMOVE: u32 = 0x0000_0001;
const ERROR_CLASS_ALREADY_EXISTS: u32 = 1410;

/// HID usage page / usage for pointer-class devices.
const HID_USAGE_PAGE_GENERIC: u16 = 0x01;
const HID_USAGE_GENERIC_MOUSE: u16 = 0x02;

const WINDOW_CLASS: &str = "MultimouseRawInput";

thread_local! {
    // Sink for notices parsed by the window procedure, installed only for
    // the duration of a pump pass. WM_INPUT for an INPUTSINK window is only
    // ever delivered while this thread pumps, so nothing is lost in between.
    static NOTICE_SINK: Cell<*mut Vec<RawNotice>> = const { Cell::new(std::ptr::null_mut()) };
}

unsafe extern "system" fn raw_input_wndproc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    match msg {
        WM_INPUT => {
            if let Some(notice) = read_wm_input(lparam) {
                push_notice(notice);
            }
        }
        WM_INPUT_DEVICE_CHANGE => {
            let handle = DeviceHandle(lparam);
            let change = match wparam {
                GIDC_ARRIVAL => Some(DeviceChange::Added),
                GIDC_REMOVAL => Some(DeviceChange::Removed),
                _ => None,
            };
            if let Some(change) = change {
                push_notice(RawNotice::DeviceChange { handle, change });
            }
        }
        _ => {}
    }
    DefWindowProcW(hwnd, msg, wparam, lparam)
}

fn push_notice(notice: RawNotice) {
    NOTICE_SINK.with(|sink| {
        let ptr = sink.get();
        if !ptr.is_null() {
            // Valid for the duration of the pump pass that installed it.
            unsafe { (*ptr).push(notice) };
        }
    });
}

/// Parse a `WM_INPUT` lparam into a motion notice, if it is a mouse packet.
fn read_wm_input(lparam: LPARAM) -> Option<RawNotice> {
    unsafe {
        let mut size: u32 = 0;
        let header_size = std::mem::size_of::<RAWINPUTHEADER>() as u32;
        let r0 = GetRawInputData(
            lparam as _,
            RID_INPUT,
            std::ptr::null_mut(),
            &mut size,
            header_size,
        );
        if r0 == u32::MAX || size == 0 {
            return None;
        }

        let mut buf = vec![0u8; size as usize];
        let r1 = GetRawInputData(
            lparam as _,
            RID_INPUT,
            buf.as_mut_ptr() as *mut c_void,
            &mut size,
            header_size,
        );
        if r1 == u32::MAX {
            return None;
        }

        read_raw_input_bytes(&buf)
    }
}

/// Parse a copied `RID_INPUT` payload into a motion notice.
fn read_raw_input_bytes(buf: &[u8]) -> Option<RawNotice> {
    let header_size = std::mem::size_of::<RAWINPUTHEADER>();
    if buf.len() < header_size {
        return None;
    }

    unsafe {
        // Header first; the RAWINPUT payload after it is variable-sized.
        let header: RAWINPUTHEADER =
            std::ptr::read_unaligned(buf.as_ptr() as *const RAWINPUTHEADER);
        if header.dwType != RIM_TYPEMOUSE {
            return None;
        }
        if buf.len() < header_size + std::mem::size_of::<RAWMOUSE>() {
            return None;
        }

        let mouse: RAWMOUSE =
            std::ptr::read_unaligned(buf.as_ptr().add(header_size) as *const RAWMOUSE);
        Some(RawNotice::Motion(MotionNotice {
            handle: DeviceHandle(header.hDevice as isize),
            dx: mouse.lLastX,
            dy: mouse.lLastY,
            flags: mouse.usFlags,
        }))
    }
}

/// Interface path for a device handle (`RIDI_DEVICENAME`).
pub(crate) fn device_identifier(handle: DeviceHandle) -> Option<String> {
    unsafe {
        // Size is in WCHARs, including the NUL.
        let mut size: u32 = 0;
        let r0 = GetRawInputDeviceInfoW(
            handle.0 as _,
            RIDI_DEVICENAME,
            std::ptr::null_mut(),
            &mut size,
        );
        if r0 == u32::MAX || size == 0 {
            return None;
        }

        let mut wide_buf: Vec<u16> = vec![0u16; size as usize];
        let r1 = GetRawInputDeviceInfoW(
            handle.0 as _,
            RIDI_DEVICENAME,
            wide_buf.as_mut_ptr() as *mut c_void,
            &mut size,
        );
        if r1 == u32::MAX {
            return None;
        }

        while wide_buf.last() == Some(&0) {
            wide_buf.pop();
        }
        Some(String::from_utf16_lossy(&wide_buf))
    }
}

/// Enumerate pointer-class devices currently known to the OS.
pub(crate) fn enumerate_pointer_devices() -> Vec<DeviceInfo> {
    unsafe {
        let entry_size = std::mem::size_of::<RAWINPUTDEVICELIST>() as u32;
        let mut count: u32 = 0;
        if GetRawInputDeviceList(std::ptr::null_mut(), &mut count, entry_size) != 0 || count == 0 {
            return Vec::new();
        }

        let mut list: Vec<RAWINPUTDEVICELIST> = vec![std::mem::zeroed(); count as usize];
        let got = GetRawInputDeviceList(list.as_mut_ptr(), &mut count, entry_size);
        if got == u32::MAX {
            return Vec::new();
        }
        list.truncate(got as usize);

        list.iter()
            .filter(|entry| entry.dwType == RIM_TYPEMOUSE)
            .enumerate()
            .map(|(index, entry)| {
                let handle = DeviceHandle(entry.hDevice as isize);
                DeviceInfo {
                    index,
                    handle,
                    name: classify(device_identifier(handle).as_deref()).to_string(),
                }
            })
            .collect()
    }
}

/// The hidden window plus its Raw Input subscription.
pub(crate) struct RawInputChannel {
    hwnd: HWND,
}

impl RawInputChannel {
    /// Register the window class, create the off-screen target window, and
    /// subscribe to pointer-class Raw Input with background delivery and
    /// device-change notifications.
    pub(crate) fn new() -> Result<Self, Error> {
        unsafe {
            let class_name = wide(WINDOW_CLASS);
            let hinstance = GetModuleHandleW(std::ptr::null());

            let mut wc: WNDCLASSW = std::mem::zeroed();
            wc.lpfnWndProc = Some(raw_input_wndproc);
            wc.hInstance = hinstance;
            wc.lpszClassName = class_name.as_ptr();

            if RegisterClassW(&wc) == 0 {
                let code = GetLastError();
                if code != ERROR_CLASS_ALREADY_EXISTS {
                    return Err(Error::Startup {
                        stage: "register_class",
                        code,
                    });
                }
            }

            let hwnd = CreateWindowExW(
                0,
                class_name.as_ptr(),
                wide("Hidden").as_ptr(),
                WS_POPUP,
                -32000,
                -32000,
                1,
                1,
                std::ptr::null_mut(),
                std::ptr::null_mut(),
                hinstance,
                std::ptr::null(),
            );
            if hwnd.is_null() {
                return Err(Error::Startup {
                    stage: "create_window",
                    code: GetLastError(),
                });
            }

            let rid = RAWINPUTDEVICE {
                usUsagePage: HID_USAGE_PAGE_GENERIC,
                usUsage: HID_USAGE_GENERIC_MOUSE,
                dwFlags: RIDEV_INPUTSINK | RIDEV_DEVNOTIFY,
                hwndTarget: hwnd,
            };
            if RegisterRawInputDevices(&rid, 1, std::mem::size_of::<RAWINPUTDEVICE>() as u32) == 0
            {
                let code = GetLastError();
                DestroyWindow(hwnd);
                return Err(Error::Startup {
                    stage: "register_devices",
                    code,
                });
            }

            Ok(Self { hwnd })
        }
    }

    /// Service up to `max` pending thread messages and collect the pointer
    /// notices they carried.
    pub(crate) fn pump(&mut self, max: usize) -> Pumped {
        let mut notices: Vec<RawNotice> = Vec::new();
        let mut messages = 0;

        NOTICE_SINK.with(|sink| sink.set(&mut notices));
        unsafe {
            let mut msg: MSG = std::mem::zeroed();
            while messages < max && PeekMessageW(&mut msg, std::ptr::null_mut(), 0, 0, PM_REMOVE) != 0
            {
                TranslateMessage(&msg);
                DispatchMessageW(&msg);
                messages += 1;
            }
        }
        NOTICE_SINK.with(|sink| sink.set(std::ptr::null_mut()));

        Pumped { messages, notices }
    }
}

impl Drop for RawInputChannel {
    fn drop(&mut self) {
        unsafe {
            // Withdraw the subscription before the target window goes away.
            let rid = RAWINPUTDEVICE {
                usUsagePage: HID_USAGE_PAGE_GENERIC,
                usUsage: HID_USAGE_GENERIC_MOUSE,
                dwFlags: RIDEV_REMOVE,
                hwndTarget: std::ptr::null_mut(),
            };
            RegisterRawInputDevices(&rid, 1, std::mem::size_of::<RAWINPUTDEVICE>() as u32);
            DestroyWindow(self.hwnd);
        }
    }
}
