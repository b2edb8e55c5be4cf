use std::sync::Arc;

use reqwest::multipart::{Form, Part};
use uuid::Uuid;

use banter_types::api::UploadResponse;

use crate::error::{ApiError, ErrorCode};
use crate::http::ApiClient;

/// Document uploads get a more specific timeout message: large files are
/// the usual culprit.
const UPLOAD_TIMEOUT_MESSAGE: &str =
    "Upload timed out. The file might be too large or the server is busy.";

#[derive(Clone)]
pub struct UploadService {
    api: Arc<ApiClient>,
}

impl UploadService {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    /// Upload a document into a conversation. The target conversation id is
    /// attached to the multipart payload before submission; the form is
    /// rebuilt from the owned bytes if the request is retried.
    pub async fn upload_document(
        &self,
        conversation_id: Uuid,
        filename: &str,
        bytes: Vec<u8>,
    ) -> Result<UploadResponse, ApiError> {
        let result = self
            .api
            .post_multipart("/documents/upload", || {
                let part = Part::bytes(bytes.clone()).file_name(filename.to_string());
                Form::new()
                    .text("conversation_id", conversation_id.to_string())
                    .part("file", part)
            })
            .await;

        result.map_err(|e| match e.code {
            ErrorCode::Timeout => ApiError {
                message: UPLOAD_TIMEOUT_MESSAGE.into(),
                code: ErrorCode::Timeout,
            },
            _ => e,
        })
    }
}
