use std::error::Error;
use std::sync::Arc;

use crate::models::{RequestSummary, ResponseRecord};
use crate::services::store::InMemoryResponseStore;

// Canned records standing in for an external network engine. Two responses
// share `req_widgets` so the newest one wins by default.

const WIDGETS_FIRST: &str = r#"{
    "id": "res_widgets_1",
    "parent_id": "req_widgets",
    "created_at": 1756100000,
    "url": "https://api.example.com/widgets",
    "status_code": 200,
    "status_message": "OK",
    "elapsed_time_ms": 184,
    "bytes_read": 52,
    "headers": [
        { "name": "Content-Type", "value": "application/json; charset=utf-8" },
        { "name": "Cache-Control", "value": "no-store" }
    ],
    "body": "{\"widgets\":[{\"id\":1,\"name\":\"anvil\"}]}",
    "content_type": "application/json"
}"#;

const WIDGETS_SECOND: &str = r#"{
    "id": "res_widgets_2",
    "parent_id": "req_widgets",
    "created_at": 1756100060,
    "url": "https://api.example.com/widgets",
    "status_code": 200,
    "status_message": "OK",
    "elapsed_time_ms": 96,
    "bytes_read": 89,
    "headers": [
        { "name": "Content-Type", "value": "application/json; charset=utf-8" },
        { "name": "Set-Cookie", "value": "session=abc123; Path=/; HttpOnly" },
        { "name": "Set-Cookie", "value": "theme=dark; Path=/" }
    ],
    "body": "{\"widgets\":[{\"id\":1,\"name\":\"anvil\"},{\"id\":2,\"name\":\"sprocket\"}]}",
    "content_type": "application/json",
    "timeline": [
        { "name": "TEXT", "value": "Trying 93.184.216.34..." },
        { "name": "HEADER_OUT", "value": "GET /widgets HTTP/1.1" },
        { "name": "HEADER_IN", "value": "HTTP/1.1 200 OK" },
        { "name": "DATA_IN", "value": "[89 bytes data]" }
    ]
}"#;

const CREATE_WIDGET: &str = r#"{
    "id": "res_create_1",
    "parent_id": "req_create",
    "created_at": 1756100120,
    "url": "https://api.example.com/widgets",
    "status_code": 201,
    "status_message": "Created",
    "elapsed_time_ms": 233,
    "bytes_read": 31,
    "headers": [
        { "name": "Content-Type", "value": "application/json" },
        { "name": "Location", "value": "/widgets/3" }
    ],
    "body": "{\"id\":3,\"name\":\"flywheel\"}",
    "content_type": "application/json",
    "setting_send_cookies": false,
    "setting_store_cookies": false
}"#;

const REPORT_DOWNLOAD: &str = r#"{
    "id": "res_report_1",
    "parent_id": "req_report",
    "created_at": 1756100180,
    "url": "https://api.example.com/report.png",
    "status_code": 200,
    "status_message": "OK",
    "elapsed_time_ms": 1820,
    "bytes_read": 68,
    "headers": [
        { "name": "Content-Type", "value": "image/png" },
        { "name": "Content-Disposition", "value": "attachment" }
    ],
    "body": "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==",
    "encoding": "base64",
    "content_type": "image/png"
}"#;

const BROKEN_REQUEST: &str = r#"{
    "id": "res_broken_1",
    "parent_id": "req_broken",
    "created_at": 1756100240,
    "url": "https://no-such-host.example.invalid/",
    "status_code": 0,
    "status_message": "",
    "elapsed_time_ms": 30012,
    "bytes_read": 0,
    "error": "Couldn't resolve host name: no-such-host.example.invalid",
    "timeline": [
        { "name": "TEXT", "value": "Resolving no-such-host.example.invalid..." },
        { "name": "TEXT", "value": "Could not resolve host" }
    ]
}"#;

const RECORDS: &[&str] = &[
    WIDGETS_FIRST,
    WIDGETS_SECOND,
    CREATE_WIDGET,
    REPORT_DOWNLOAD,
    BROKEN_REQUEST,
];

/// Loads the canned responses into the store and returns the matching
/// request list for the sidebar.
pub async fn seed(store: &Arc<InMemoryResponseStore>) -> Result<Vec<RequestSummary>, Box<dyn Error>> {
    for raw in RECORDS {
        let record: ResponseRecord = serde_json::from_str(raw)?;
        store.insert(record).await;
    }

    Ok(vec![
        RequestSummary {
            id: "req_widgets".to_string(),
            name: "List widgets".to_string(),
            method: "GET".to_string(),
            url: "https://api.example.com/widgets".to_string(),
        },
        RequestSummary {
            id: "req_create".to_string(),
            name: "Create widget".to_string(),
            method: "POST".to_string(),
            url: "https://api.example.com/widgets".to_string(),
        },
        RequestSummary {
            id: "req_report".to_string(),
            name: "Download report".to_string(),
            method: "GET".to_string(),
            url: "https://api.example.com/report.png".to_string(),
        },
        RequestSummary {
            id: "req_broken".to_string(),
            name: "Broken request".to_string(),
            method: "GET".to_string(),
            url: "https://no-such-host.example.invalid/".to_string(),
        },
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::store::ResponseStore;

    #[tokio::test]
    async fn seed_data_parses_and_resolves() {
        let store = InMemoryResponseStore::new();

        let requests = seed(&store).await.unwrap();

        assert_eq!(requests.len(), 4);

        let latest = store.get_latest_by_parent_id("req_widgets").await.unwrap();
        assert_eq!(latest.id, "res_widgets_2");

        let broken = store.get_latest_by_parent_id("req_broken").await.unwrap();
        assert!(broken.error.is_some());
    }
}
