use agentpay_client::Document;
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::{HeaderMap, HeaderValue};
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// Standard `{ "data": ... }` envelope for successful responses.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// Stream a backend document back to the browser as a download.
///
/// The backend's file name wins; `fallback_filename` is used when it sent none.
pub fn document_response(doc: Document, fallback_filename: &str) -> Response {
    let filename = doc
        .filename
        .unwrap_or_else(|| fallback_filename.to_string())
        .replace('"', "");

    let mut headers = HeaderMap::new();
    headers.insert(
        CONTENT_TYPE,
        HeaderValue::from_str(&doc.content_type)
            .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream")),
    );
    let disposition = format!("attachment; filename=\"{filename}\"");
    if let Ok(disposition) = HeaderValue::from_str(&disposition) {
        headers.insert(CONTENT_DISPOSITION, disposition);
    }

    (headers, doc.bytes).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_name_is_used_when_backend_sends_none() {
        let doc = Document {
            content_type: "application/pdf".into(),
            filename: None,
            bytes: b"%PDF".to_vec(),
        };
        let response = document_response(doc, "agents.pdf");
        assert_eq!(response.headers()[CONTENT_TYPE], "application/pdf");
        assert_eq!(
            response.headers()[CONTENT_DISPOSITION],
            "attachment; filename=\"agents.pdf\""
        );
    }
}
