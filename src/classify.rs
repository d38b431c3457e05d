//! Device name classification.
//!
//! Raw Input identifies devices by an interface path like
//! `\\?\HID#VID_046D&PID_C52B&MI_00#...`. The path is opaque, but a handful of
//! substring heuristics recover a human-readable class good enough for UI
//! labels. Matching is first-match-wins and the branch order is contractual:
//! vendor ids are checked inside the `HID` branch before the generic buckets,
//! so a HID touchpad classifies as `Trackpad` rather than falling through to
//! `USB Mouse`, and a PS/2 path never reaches the Synaptics fallback.

/// Classify a raw device identifier into a display name.
///
/// Total: always returns a label. `None` or an empty identifier yields
/// `"Unknown Device"`, an unrecognized non-empty one `"Generic Mouse"`.
pub fn classify(raw: Option<&str>) -> &'static str {
    let clean = match raw {
        Some(s) if !s.is_empty() => printable(s),
        _ => return "Unknown Device",
    };
    if clean.is_empty() {
        return "Unknown Device";
    }

    if clean.contains("HID") {
        if clean.contains("VID_046D") {
            "Logitech Mouse"
        } else if clean.contains("VID_1532") {
            "Razer Mouse"
        } else if clean.contains("VID_045E") {
            "Microsoft Mouse"
        } else if clean.contains("TouchPad") || clean.contains("trackpad") {
            "Trackpad"
        } else {
            "USB Mouse"
        }
    } else if clean.contains("PS2") {
        "PS/2 Mouse"
    } else if clean.contains("Synaptics") || clean.contains("TouchPad") {
        "Trackpad"
    } else {
        "Generic Mouse"
    }
}

/// Strip a wide-string path down to printable ASCII.
///
/// Device paths come back from the OS as UTF-16 and can carry embedded NULs
/// and control bytes; the heuristics above only look at the printable part.
fn printable(raw: &str) -> String {
    raw.chars().filter(|c| (' '..='~').contains(c)).collect()
}
