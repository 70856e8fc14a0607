//! Configuration management for the annotation layer

use serde::Deserialize;
use std::env;
use std::time::Duration;

/// Default wait before the legacy hint pass probes the text layer
const DEFAULT_HINT_DELAY_MS: u64 = 5000;

#[derive(Debug, Clone, Deserialize)]
pub struct RenderConfig {
    pub hints: HintConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HintConfig {
    /// Whether the hint pass is scheduled at all
    pub enabled: bool,
    /// Fixed delay used when the text layer offers no readiness signal
    pub delay_ms: u64,
    /// Upper bound on waiting for a readiness signal
    pub ready_timeout_ms: u64,
    /// Inward nudge applied to a rectangle corner before probing
    pub probe_offset: f64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        RenderConfig {
            hints: HintConfig {
                enabled: true,
                delay_ms: DEFAULT_HINT_DELAY_MS,
                ready_timeout_ms: DEFAULT_HINT_DELAY_MS,
                probe_offset: 2.0,
            },
        }
    }
}

impl RenderConfig {
    /// Build configuration from `ANNOTATE_*` variables, falling back to defaults
    pub fn from_env() -> Self {
        let defaults = RenderConfig::default().hints;
        RenderConfig {
            hints: HintConfig {
                enabled: env::var("ANNOTATE_HINTS_ENABLED")
                    .map(|v| !matches!(v.to_lowercase().as_str(), "0" | "false" | "no" | "off"))
                    .unwrap_or(defaults.enabled),
                delay_ms: env::var("ANNOTATE_HINT_DELAY_MS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.delay_ms),
                ready_timeout_ms: env::var("ANNOTATE_HINT_READY_TIMEOUT_MS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.ready_timeout_ms),
                probe_offset: env::var("ANNOTATE_PROBE_OFFSET")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.probe_offset),
            },
        }
    }
}

impl HintConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    pub fn ready_timeout(&self) -> Duration {
        Duration::from_millis(self.ready_timeout_ms)
    }
}
