// App settings DTOs (the shared runtime config document)

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Shared runtime settings read at startup by every client
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AppSettings {
    /// The active event scans default to
    pub event_id: Option<Uuid>,
    #[schema(example = "ExpoPass")]
    pub app_name: String,
    pub logo_url: Option<String>,
}

impl From<expopass_core::AppSettings> for AppSettings {
    fn from(s: expopass_core::AppSettings) -> Self {
        Self {
            event_id: s.event_id,
            app_name: s.app_name,
            logo_url: s.logo_url,
        }
    }
}

/// Organizer update of the global settings. Only provided fields change.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateSettingsRequest {
    #[serde(default)]
    pub event_id: Option<Uuid>,
    #[serde(default)]
    pub app_name: Option<String>,
    #[serde(default)]
    pub logo_url: Option<String>,
}
