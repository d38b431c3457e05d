//! Platform backends.
//!
//! Implementations of [`PlatformHost`](crate::host::PlatformHost) and
//! [`GlyphTable`](crate::cursor::GlyphTable) for platform-specific input and
//! cursor plumbing. Only Windows is implemented: the engine is built around
//! Raw Input, which is the only mainstream API that reports pointer motion
//! per device before the OS merges everything into one cursor.

use crate::error::Error;
use crate::host::PlatformHost;

#[cfg(target_os = "windows")]
#[cfg_attr(docsrs, doc(cfg(target_os = "windows")))]
pub mod windows;

/// Construct the platform host for the current OS.
///
/// On Windows this registers the hidden message window and the Raw Input
/// subscription; failures there surface as [`Error::Startup`].
pub fn platform_host() -> Result<Box<dyn PlatformHost>, Error> {
    #[cfg(target_os = "windows")]
    {
        Ok(Box::new(windows::WinHost::new()?))
    }
    #[cfg(not(target_os = "windows"))]
    {
        Err(Error::NotSupported)
    }
}
