//! Bulk token and alias upload.

use umeng_core::{PushSettings, UploadError};
use umeng_crypto::SignedRequest;

use crate::Transport;

/// Join entries with single newlines, keeping order and duplicates.
pub fn join_entries<I, S>(entries: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut joined = String::new();
    for (i, entry) in entries.into_iter().enumerate() {
        if i > 0 {
            joined.push('\n');
        }
        joined.push_str(entry.as_ref());
    }
    joined
}

/// Uploads newline-separated contents and returns the file id.
///
/// File ids are not cached; every send uploads again.
pub struct Uploader<'a, T> {
    transport: &'a T,
    url: &'a str,
    settings: &'a PushSettings,
    secret: &'a str,
}

impl<'a, T: Transport> Uploader<'a, T> {
    pub fn new(transport: &'a T, url: &'a str, settings: &'a PushSettings, secret: &'a str) -> Self {
        Self {
            transport,
            url,
            settings,
            secret,
        }
    }

    /// Upload raw contents.
    pub async fn upload(&self, contents: &str) -> Result<String, UploadError> {
        if contents.is_empty() {
            return Err(UploadError::EmptyContent);
        }

        let body = serde_json::json!({
            "appkey": self.settings.app_key,
            "timestamp": self.settings.timestamp,
            "content": contents,
        })
        .to_string();
        let request = SignedRequest::post(self.url, body, self.secret)?;

        tracing::info!(url = %self.url, bytes = contents.len(), "uploading file contents");

        let response = self
            .transport
            .execute(&request)
            .await
            .map_err(UploadError::Transport)?;

        if !response.is_success() {
            return Err(UploadError::Rejected {
                code: response.error_code().unwrap_or_default(),
                message: response.error_msg().unwrap_or_default().to_string(),
            });
        }

        let file_id = response.file_id().ok_or(UploadError::MissingFileId)?;
        tracing::debug!(file_id, "upload accepted");
        Ok(file_id.to_string())
    }

    /// Upload a list of tokens or aliases.
    pub async fn upload_entries<S: AsRef<str>>(&self, entries: &[S]) -> Result<String, UploadError> {
        self.upload(&join_entries(entries)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingTransport;

    fn settings() -> PushSettings {
        PushSettings::new("app-key").with_timestamp("1700000000")
    }

    #[test]
    fn test_join_without_trailing_newline() {
        assert_eq!(join_entries(["t1", "t2", "t3"]), "t1\nt2\nt3");
        assert_eq!(join_entries(["a", "a"]), "a\na");
        assert_eq!(join_entries(Vec::<String>::new()), "");
    }

    #[tokio::test]
    async fn test_upload_posts_signed_contents() {
        let transport = RecordingTransport::new();
        let settings = settings();
        let uploader = Uploader::new(&transport, "https://h/upload", &settings, "secret");

        let file_id = uploader.upload_entries(&["t1", "t2", "t3"]).await.unwrap();

        assert_eq!(file_id, RecordingTransport::FILE_ID);
        let uploads = transport.upload_bodies();
        assert_eq!(uploads.len(), 1);
        assert_eq!(uploads[0]["content"], "t1\nt2\nt3");
        assert_eq!(uploads[0]["appkey"], "app-key");
        assert_eq!(uploads[0]["timestamp"], "1700000000");
        assert!(transport.requests()[0].verify("secret"));
    }

    #[tokio::test]
    async fn test_upload_rejection() {
        let transport = RecordingTransport::new().reject_uploads("2004", "file too large");
        let settings = settings();
        let uploader = Uploader::new(&transport, "https://h/upload", &settings, "secret");

        let err = uploader.upload("t1").await.unwrap_err();

        assert!(
            matches!(err, UploadError::Rejected { ref code, .. } if code == "2004"),
            "{err}"
        );
    }

    #[tokio::test]
    async fn test_upload_transport_failure() {
        let transport = RecordingTransport::unreachable();
        let settings = settings();
        let uploader = Uploader::new(&transport, "https://h/upload", &settings, "secret");

        let err = uploader.upload("t1").await.unwrap_err();
        assert!(matches!(err, UploadError::Transport(_)));
    }

    #[tokio::test]
    async fn test_empty_upload_never_sent() {
        let transport = RecordingTransport::new();
        let settings = settings();
        let uploader = Uploader::new(&transport, "https://h/upload", &settings, "secret");

        let err = uploader.upload("").await.unwrap_err();
        assert!(matches!(err, UploadError::EmptyContent));
        assert!(transport.requests().is_empty());
    }
}
