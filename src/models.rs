use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;

/// An environment is an opaque JSON object owned by the parent screen. It is
/// serialized to text for editing and re-parsed to validate.
pub type Environment = serde_json::Map<String, serde_json::Value>;

/// A single response header. Headers are kept as an ordered sequence rather
/// than a map because duplicates (notably `Set-Cookie`) are significant.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    pub name: String,
    pub value: String,
}

impl Header {
    pub fn new(name: &str, value: &str) -> Header {
        Header {
            name: name.to_string(),
            value: value.to_string(),
        }
    }
}

/// Encoding tag for the stored response body.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyEncoding {
    Base64,
    #[default]
    Utf8,
}

/// One low-level transport trace entry for a request/response pair.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEvent {
    pub name: String,
    pub value: String,
}

/// A persisted result of one executed HTTP request. Created elsewhere when a
/// request runs; this crate only ever reads these.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseRecord {
    pub id: String,
    pub parent_id: String,
    pub created_at: i64,
    pub url: String,
    pub status_code: u16,
    pub status_message: String,
    pub elapsed_time_ms: u64,
    pub bytes_read: u64,
    #[serde(default)]
    pub headers: Vec<Header>,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub encoding: BodyEncoding,
    #[serde(default)]
    pub content_type: String,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub timeline: Vec<TimelineEvent>,
    #[serde(default = "default_true")]
    pub setting_send_cookies: bool,
    #[serde(default = "default_true")]
    pub setting_store_cookies: bool,
}

fn default_true() -> bool {
    true
}

impl ResponseRecord {
    pub fn status(&self) -> Option<http::StatusCode> {
        http::StatusCode::from_u16(self.status_code).ok()
    }

    /// Decodes the stored body according to its encoding tag.
    pub fn decoded_body(&self) -> Result<Vec<u8>, base64::DecodeError> {
        match self.encoding {
            BodyEncoding::Base64 => BASE64.decode(self.body.as_bytes()),
            BodyEncoding::Utf8 => Ok(self.body.clone().into_bytes()),
        }
    }

    /// Lossy text rendition of the body, for display.
    pub fn body_text(&self) -> String {
        match self.decoded_body() {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(_) => self.body.clone(),
        }
    }
}

/// The sliver of a request the response pane needs: identity plus a label.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestSummary {
    pub id: String,
    pub name: String,
    pub method: String,
    pub url: String,
}

/// Display strategy for a response body.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumIter,
)]
pub enum PreviewMode {
    #[default]
    #[strum(serialize = "Preview")]
    Friendly,
    Source,
    Raw,
}

impl PreviewMode {
    pub fn next(self) -> PreviewMode {
        match self {
            PreviewMode::Friendly => PreviewMode::Source,
            PreviewMode::Source => PreviewMode::Raw,
            PreviewMode::Raw => PreviewMode::Friendly,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn decodes_base64_bodies() {
        let record = ResponseRecord {
            body: "eyJvayI6dHJ1ZX0=".to_string(),
            encoding: BodyEncoding::Base64,
            ..ResponseRecord::default()
        };

        assert_eq!(record.body_text(), r#"{"ok":true}"#);
    }

    #[test]
    fn utf8_bodies_pass_through() {
        let record = ResponseRecord {
            body: "plain text".to_string(),
            encoding: BodyEncoding::Utf8,
            ..ResponseRecord::default()
        };

        assert_eq!(record.decoded_body().unwrap(), b"plain text".to_vec());
    }

    #[test]
    fn preview_mode_cycles_through_all_modes() {
        let mode = PreviewMode::Friendly;

        assert_eq!(mode.next(), PreviewMode::Source);
        assert_eq!(mode.next().next(), PreviewMode::Raw);
        assert_eq!(mode.next().next().next(), PreviewMode::Friendly);
    }

    #[test]
    fn record_round_trips_through_json() {
        let record = ResponseRecord {
            id: "res_1".into(),
            parent_id: "req_1".into(),
            created_at: 1700000000,
            status_code: 200,
            status_message: "OK".into(),
            headers: vec![Header::new("Content-Type", "application/json")],
            timeline: vec![TimelineEvent {
                name: "TEXT".into(),
                value: "Preparing request".into(),
            }],
            ..ResponseRecord::default()
        };

        let raw = serde_json::to_string(&record).unwrap();
        let parsed: ResponseRecord = serde_json::from_str(&raw).unwrap();

        assert_eq!(parsed, record);
    }
}
