// Runtime configuration
//
// AppSettings is the shared runtime config every client used to read from
// the global settings document. It is loaded once at startup and passed
// explicitly through router state, never read as ambient global state.
// ScanLoopConfig tunes the scan-session state machine.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

/// Shared runtime settings (the `app_settings` global row)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    /// The active event scans default to when a request does not name one
    pub event_id: Option<Uuid>,
    pub app_name: String,
    pub logo_url: Option<String>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            event_id: None,
            app_name: "ExpoPass".to_string(),
            logo_url: None,
        }
    }
}

/// Tuning for the scan-session loop
#[derive(Debug, Clone)]
pub struct ScanLoopConfig {
    /// Delay between detection attempts
    pub retry_delay: Duration,
    /// Consecutive detection misses before giving up
    pub max_failures: u32,
    /// Budget for the resolver to process a decoded payload
    pub processing_timeout: Duration,
    /// How long a successful result stays on screen before the session closes
    pub close_delay: Duration,
    /// Fraction of the frame covered by the center-crop detection region
    pub center_crop: f32,
}

impl Default for ScanLoopConfig {
    fn default() -> Self {
        Self {
            retry_delay: Duration::from_millis(275),
            max_failures: 100,
            processing_timeout: Duration::from_secs(10),
            close_delay: Duration::from_secs(2),
            center_crop: 0.8,
        }
    }
}

impl ScanLoopConfig {
    /// Set the delay between detection attempts
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// Set the consecutive-miss budget
    pub fn with_max_failures(mut self, max: u32) -> Self {
        self.max_failures = max;
        self
    }

    /// Set the resolver processing timeout
    pub fn with_processing_timeout(mut self, timeout: Duration) -> Self {
        self.processing_timeout = timeout;
        self
    }

    /// Set the post-success display delay
    pub fn with_close_delay(mut self, delay: Duration) -> Self {
        self.close_delay = delay;
        self
    }
}
