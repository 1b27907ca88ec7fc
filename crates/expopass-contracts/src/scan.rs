// Scan endpoint DTOs
//
// The response body is expopass_core::ScanOutcome: the uniform
// {success, action, message, data?, error?} shape. It is always served
// with HTTP 200 - scan failures are data, not transport errors.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use expopass_core::ScanAction;

/// A decoded badge payload submitted for resolution
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ScanRequest {
    /// Raw decoded QR text (compact pipe format, legacy JSON, or bare id)
    #[schema(example = "usr_8f3k2|visitor|evt_1|1735689600000")]
    pub payload: String,
    /// The attendee operating the scanner
    pub scanner_id: Uuid,
    /// Event scope; defaults to the active event from settings
    #[serde(default)]
    pub event_id: Option<Uuid>,
    /// Explicit action override (e.g. force checkout)
    #[serde(default)]
    pub action: Option<ScanAction>,
}
