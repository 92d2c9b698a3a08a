use std::path::PathBuf;

use async_trait::async_trait;

use crate::models::ResponseRecord;
use crate::services::analytics::Analytics;
use crate::utils::extension_for_content_type;

/// Path selection for the download action. A GUI shell would show a native
/// save dialog; the default here derives a file name without prompting.
#[async_trait]
pub trait SaveDialog: Send + Sync {
    /// Returns the chosen path, or None when the user cancelled.
    async fn pick_save_path(&self, title: &str, extension: Option<&str>) -> Option<PathBuf>;
}

/// Writes downloads into a fixed directory with a derived file name.
pub struct DirectorySaveDialog {
    directory: PathBuf,
}

impl DirectorySaveDialog {
    pub fn new(directory: impl Into<PathBuf>) -> DirectorySaveDialog {
        DirectorySaveDialog {
            directory: directory.into(),
        }
    }
}

#[async_trait]
impl SaveDialog for DirectorySaveDialog {
    async fn pick_save_path(&self, _title: &str, extension: Option<&str>) -> Option<PathBuf> {
        let file_name = match extension {
            Some(extension) => format!("response.{}", extension),
            None => "response".to_string(),
        };

        Some(self.directory.join(file_name))
    }
}

/// Saves a response body to disk as a fire-and-forget outcome: the user is
/// never shown an inline error, but every outcome lands in analytics and
/// failures go to the log.
pub async fn save_response_body(
    response: &ResponseRecord,
    dialog: &dyn SaveDialog,
    analytics: &dyn Analytics,
) {
    let extension = extension_for_content_type(&response.content_type);

    let Some(path) = dialog
        .pick_save_path("Save Response", extension.as_deref())
        .await
    else {
        analytics.track("Response", "Save Cancel", None);
        return;
    };

    let bytes = match response.decoded_body() {
        Ok(bytes) => bytes,
        Err(err) => {
            log::warn!("failed to decode response body: {}", err);
            analytics.track("Response", "Save Failure", None);
            return;
        }
    };

    match tokio::fs::write(&path, bytes).await {
        Ok(()) => analytics.track("Response", "Save Success", None),
        Err(err) => {
            log::warn!("failed to save response body to {:?}: {}", path, err);
            analytics.track("Response", "Save Failure", None);
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::models::BodyEncoding;
    use crate::services::analytics::RecordingAnalytics;

    struct CancelDialog;

    #[async_trait]
    impl SaveDialog for CancelDialog {
        async fn pick_save_path(&self, _title: &str, _extension: Option<&str>) -> Option<PathBuf> {
            None
        }
    }

    fn response_with_body(body: &str) -> ResponseRecord {
        ResponseRecord {
            body: body.to_string(),
            encoding: BodyEncoding::Utf8,
            content_type: "application/json".to_string(),
            ..ResponseRecord::default()
        }
    }

    #[tokio::test]
    async fn cancelling_the_dialog_is_tracked() {
        let analytics = RecordingAnalytics::default();

        save_response_body(&response_with_body("{}"), &CancelDialog, &analytics).await;

        assert_eq!(
            analytics.events(),
            vec![("Response".to_string(), "Save Cancel".to_string(), None)]
        );
    }

    #[tokio::test]
    async fn successful_writes_are_tracked_and_land_on_disk() {
        let analytics = RecordingAnalytics::default();
        let directory = std::env::temp_dir().join("tui-api-client-export-test");
        tokio::fs::create_dir_all(&directory).await.unwrap();
        let dialog = DirectorySaveDialog::new(&directory);

        save_response_body(&response_with_body(r#"{"ok":true}"#), &dialog, &analytics).await;

        let written = tokio::fs::read_to_string(directory.join("response.json"))
            .await
            .unwrap();
        assert_eq!(written, r#"{"ok":true}"#);
        assert_eq!(analytics.events()[0].1, "Save Success");
    }

    #[tokio::test]
    async fn undecodable_bodies_are_tracked_as_failures() {
        let analytics = RecordingAnalytics::default();
        let dialog = DirectorySaveDialog::new(std::env::temp_dir());
        let response = ResponseRecord {
            body: "not base64 at all!!!".to_string(),
            encoding: BodyEncoding::Base64,
            ..ResponseRecord::default()
        };

        save_response_body(&response, &dialog, &analytics).await;

        assert_eq!(analytics.events()[0].1, "Save Failure");
    }
}
