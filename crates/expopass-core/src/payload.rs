// QR badge payload codec
//
// Two wire formats coexist and must both decode through the single
// `decode` entry point:
// - compact (current): `userId|category|eventId|epoch_ms`
// - legacy JSON: an object with top-level `uid` plus optional
//   `category, type, eventId, timestamp, version, checkIn, lead,
//   profile, contact, sessions, analytics`
//
// The delimiter is not escaped; identifiers containing `|` are an
// accepted constraint of the badge id format, not validated here.

use chrono::Utc;
use serde::Deserialize;

use crate::error::ScanError;

/// Delimiter for the compact payload format
pub const DELIMITER: char = '|';

/// Category reported when a payload carries none
pub const UNKNOWN_CATEGORY: &str = "Unknown";

/// Minimum length of a target user id after sanitization
pub const MIN_USER_ID_LEN: usize = 3;

/// Which wire format a payload decoded from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadFormat {
    /// Pipe-delimited `userId|category|eventId|epoch_ms`
    Compact,
    /// A bare identifier with no delimiter (oldest badges)
    Bare,
    /// The legacy JSON object
    LegacyJson,
}

/// A badge payload about to be encoded onto a badge
#[derive(Debug, Clone)]
pub struct BadgePayload {
    pub user_id: String,
    pub category: String,
    pub event_id: String,
}

impl BadgePayload {
    pub fn new(
        user_id: impl Into<String>,
        category: impl Into<String>,
        event_id: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            category: category.into(),
            event_id: event_id.into(),
        }
    }

    /// Encode into the compact wire format, stamping the current time
    pub fn encode(&self) -> String {
        format!(
            "{}{DELIMITER}{}{DELIMITER}{}{DELIMITER}{}",
            self.user_id,
            self.category,
            self.event_id,
            Utc::now().timestamp_millis()
        )
    }
}

/// Legacy JSON payload shape. Only `uid` is required; the nested
/// sub-objects are carried opaquely and ignored by the resolver.
#[derive(Debug, Clone, Deserialize)]
pub struct LegacyPayload {
    pub uid: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default, rename = "eventId")]
    pub event_id: Option<String>,
    #[serde(default)]
    pub timestamp: Option<i64>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default, rename = "checkIn")]
    pub check_in: Option<serde_json::Value>,
    #[serde(default)]
    pub lead: Option<serde_json::Value>,
    #[serde(default)]
    pub profile: Option<serde_json::Value>,
    #[serde(default)]
    pub contact: Option<serde_json::Value>,
    #[serde(default)]
    pub sessions: Option<serde_json::Value>,
    #[serde(default)]
    pub analytics: Option<serde_json::Value>,
}

/// A decoded, sanitized scan payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedScan {
    /// Sanitized target user id, guaranteed non-empty and >= 3 chars
    pub target_user_id: String,
    /// Category as printed on the badge ("Unknown" when absent)
    pub target_category: String,
    pub event_id: Option<String>,
    pub timestamp: Option<i64>,
    pub format: PayloadFormat,
}

/// Strip characters outside `[a-zA-Z0-9_@.$-]` from a badge user id
pub fn sanitize_user_id(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '@' | '.' | '$' | '-'))
        .collect()
}

/// Decode a raw scan into a `DecodedScan`, dispatching on structure:
/// JSON object, pipe-delimited compact string, or bare identifier.
pub fn decode(raw: &str) -> Result<DecodedScan, ScanError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ScanError::format("empty scan payload"));
    }

    let decoded = if trimmed.starts_with('{') {
        decode_legacy_json(trimmed)?
    } else if trimmed.contains(DELIMITER) {
        decode_compact(trimmed)
    } else {
        DecodedScan {
            target_user_id: trimmed.to_string(),
            target_category: UNKNOWN_CATEGORY.to_string(),
            event_id: None,
            timestamp: None,
            format: PayloadFormat::Bare,
        }
    };

    finish(decoded)
}

fn decode_compact(trimmed: &str) -> DecodedScan {
    let parts: Vec<&str> = trimmed.split(DELIMITER).collect();
    let category = parts
        .get(1)
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .unwrap_or(UNKNOWN_CATEGORY);

    DecodedScan {
        target_user_id: parts[0].trim().to_string(),
        target_category: category.to_string(),
        event_id: parts
            .get(2)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty()),
        timestamp: parts.get(3).and_then(|s| s.trim().parse().ok()),
        format: PayloadFormat::Compact,
    }
}

fn decode_legacy_json(trimmed: &str) -> Result<DecodedScan, ScanError> {
    let legacy: LegacyPayload = serde_json::from_str(trimmed)
        .map_err(|e| ScanError::format(format!("malformed legacy payload: {e}")))?;

    Ok(DecodedScan {
        target_user_id: legacy.uid,
        target_category: legacy
            .category
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| UNKNOWN_CATEGORY.to_string()),
        event_id: legacy.event_id,
        timestamp: legacy.timestamp,
        format: PayloadFormat::LegacyJson,
    })
}

/// Sanitize the target id and enforce the minimum length
fn finish(mut decoded: DecodedScan) -> Result<DecodedScan, ScanError> {
    let cleaned = sanitize_user_id(&decoded.target_user_id);
    if cleaned.is_empty() {
        return Err(ScanError::format("badge user id is empty"));
    }
    if cleaned.len() < MIN_USER_ID_LEN {
        return Err(ScanError::format(format!(
            "badge user id '{cleaned}' is too short"
        )));
    }
    decoded.target_user_id = cleaned;
    Ok(decoded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_compact_payload() {
        let scan = decode("usr_123|Visitor|evt_9|1735689600000").unwrap();
        assert_eq!(scan.target_user_id, "usr_123");
        assert_eq!(scan.target_category, "Visitor");
        assert_eq!(scan.event_id.as_deref(), Some("evt_9"));
        assert_eq!(scan.timestamp, Some(1735689600000));
        assert_eq!(scan.format, PayloadFormat::Compact);
    }

    #[test]
    fn bare_payload_is_unknown_category() {
        let scan = decode("  usr_123  ").unwrap();
        assert_eq!(scan.target_user_id, "usr_123");
        assert_eq!(scan.target_category, "Unknown");
        assert_eq!(scan.format, PayloadFormat::Bare);
    }

    #[test]
    fn two_part_payload_decodes() {
        let scan = decode("usr_123|Exhibitor").unwrap();
        assert_eq!(scan.target_user_id, "usr_123");
        assert_eq!(scan.target_category, "Exhibitor");
        assert_eq!(scan.event_id, None);
    }

    #[test]
    fn decode_recovers_encoded_fields() {
        let encoded = BadgePayload::new("alice@example.com", "Visitor", "evt_1").encode();
        let scan = decode(&encoded).unwrap();
        assert_eq!(scan.target_user_id, "alice@example.com");
        assert_eq!(scan.target_category, "Visitor");
        assert_eq!(scan.event_id.as_deref(), Some("evt_1"));
        assert!(scan.timestamp.is_some());
    }

    #[test]
    fn legacy_json_payload_decodes() {
        let raw = r#"{"uid":"usr_55","category":"Exhibitor","eventId":"evt_2","timestamp":1700000000000,"version":"1","checkIn":{"count":2},"profile":{"industry":"tech"}}"#;
        let scan = decode(raw).unwrap();
        assert_eq!(scan.target_user_id, "usr_55");
        assert_eq!(scan.target_category, "Exhibitor");
        assert_eq!(scan.event_id.as_deref(), Some("evt_2"));
        assert_eq!(scan.format, PayloadFormat::LegacyJson);
    }

    #[test]
    fn legacy_json_without_category_is_unknown() {
        let scan = decode(r#"{"uid":"usr_55"}"#).unwrap();
        assert_eq!(scan.target_category, "Unknown");
    }

    #[test]
    fn malformed_json_is_format_error() {
        let err = decode("{not json").unwrap_err();
        assert!(matches!(err, ScanError::PayloadFormat(_)));
    }

    #[test]
    fn empty_payload_is_format_error() {
        assert!(matches!(decode(""), Err(ScanError::PayloadFormat(_))));
        assert!(matches!(decode("   "), Err(ScanError::PayloadFormat(_))));
    }

    #[test]
    fn sanitization_strips_invalid_characters() {
        assert_eq!(sanitize_user_id("usr<script>_1!"), "usrscript_1");
        assert_eq!(sanitize_user_id("a.b@c$d-e_f"), "a.b@c$d-e_f");
    }

    #[test]
    fn short_id_after_sanitization_is_format_error() {
        // two valid characters survive, which is below the minimum
        let err = decode("a!!b").unwrap_err();
        match err {
            ScanError::PayloadFormat(msg) => assert!(msg.contains("too short")),
            other => panic!("expected format error, got {other:?}"),
        }
    }

    #[test]
    fn fully_invalid_id_is_empty_error() {
        let err = decode("!!##").unwrap_err();
        match err {
            ScanError::PayloadFormat(msg) => assert!(msg.contains("empty")),
            other => panic!("expected format error, got {other:?}"),
        }
    }
}
