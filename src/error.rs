//! Error types for the aggregation engine.
//!
//! Only cold paths return errors: startup of the Raw Input subscription,
//! cursor glyph resource creation, and a visibility counter that refuses to
//! settle. Hot-path degradations (unknown handle on disconnect, unset
//! consumer callback, unavailable absolute cursor position) are documented
//! fallbacks, never `Err` — they occur inside the notification path where a
//! failure cannot be reported meaningfully.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// A Win32 call failed while bringing up the Raw Input channel.
    ///
    /// `stage` names the failed step (`"register_class"`, `"create_window"`,
    /// `"register_devices"`), `code` is the `GetLastError` value.
    #[error("raw input startup failed at {stage} (os error {code})")]
    Startup { stage: &'static str, code: u32 },

    /// The 1x1 transparent placeholder cursor could not be created, so the
    /// glyph table cannot be blanked.
    #[error("could not create transparent placeholder cursor")]
    CursorResource,

    /// The OS cursor display counter did not settle within the configured
    /// iteration ceiling. Another process may be fighting over visibility.
    #[error("cursor visibility counter did not settle within {0} iterations")]
    CounterStuck(u32),

    /// Configuration could not be parsed.
    #[error("invalid engine configuration: {0}")]
    Config(#[from] toml::de::Error),

    /// Raw Input capture was requested on a platform without a backend.
    #[error("raw input capture is only supported on Windows")]
    NotSupported,
}
