//! Engine configuration.
//!
//! All knobs have conservative defaults matching the observed behavior of the
//! reference deployment; hosts can override them from a TOML fragment:
//!
//! ```
//! use multimouse::EngineConfig;
//!
//! let cfg = EngineConfig::from_toml("hide_settle_ms = 250").unwrap();
//! assert_eq!(cfg.hide_settle_ms, 250);
//! assert_eq!(cfg.max_pump_messages, 10);
//! ```

use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Tunables for the engine and the cursor visibility state machine.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Delay before `hide()` swaps the glyph table, in milliseconds.
    ///
    /// Lets in-flight clicks settle so the swap does not race a button-down.
    /// The default matches the original UI tuning.
    pub hide_settle_ms: u64,

    /// Upper bound on external messages serviced per `process()` call.
    pub max_pump_messages: usize,

    /// Iteration ceiling for the visibility counter loops in hide/show.
    ///
    /// The OS counter is driven by repeated `ShowCursor` calls; the ceiling
    /// turns a misbehaving counter into a reported error instead of a hang.
    pub counter_ceiling: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            hide_settle_ms: 5000,
            max_pump_messages: 10,
            counter_ceiling: 64,
        }
    }
}

impl EngineConfig {
    /// Parse a configuration from a TOML string. Missing keys keep defaults.
    pub fn from_toml(s: &str) -> Result<Self, Error> {
        Ok(toml::from_str(s)?)
    }

    /// The hide settling delay as a [`Duration`].
    #[inline]
    pub fn hide_settle(&self) -> Duration {
        Duration::from_millis(self.hide_settle_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_stable() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.hide_settle_ms, 5000);
        assert_eq!(cfg.max_pump_messages, 10);
        assert_eq!(cfg.counter_ceiling, 64);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let cfg = EngineConfig::from_toml("counter_ceiling = 8").unwrap();
        assert_eq!(cfg.counter_ceiling, 8);
        assert_eq!(cfg.max_pump_messages, 10);
    }

    #[test]
    fn bad_toml_is_rejected() {
        assert!(EngineConfig::from_toml("hide_settle_ms = \"soon\"").is_err());
    }
}
