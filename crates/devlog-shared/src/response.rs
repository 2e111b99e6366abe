//! Response envelopes (RFC 7807 compliant for errors).

use devlog_core::query::Page;
use serde::{Deserialize, Serialize};

/// One page of a post listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse<T> {
    pub posts: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub total_pages: u64,
}

impl<T> From<Page<T>> for PageResponse<T> {
    fn from(page: Page<T>) -> Self {
        Self {
            total_pages: page.total_pages(),
            page: page.request.page(),
            total: page.total,
            posts: page.items,
        }
    }
}

/// Plain acknowledgement, e.g. after a delete.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiMessage {
    pub message: String,
}

impl ApiMessage {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// RFC 7807 Problem Details for HTTP APIs.
///
/// See: https://datatracker.ietf.org/doc/html/rfc7807
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// A URI reference that identifies the problem type.
    #[serde(rename = "type")]
    pub error_type: String,

    /// A short, human-readable summary of the problem type.
    pub title: String,

    /// The HTTP status code.
    pub status: u16,

    /// A human-readable explanation specific to this occurrence.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,

    /// Request ID for debugging purposes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

impl ErrorResponse {
    pub fn new(status: u16, title: impl Into<String>) -> Self {
        Self {
            error_type: "about:blank".to_string(),
            title: title.into(),
            status,
            detail: None,
            request_id: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    // Common error constructors
    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::new(400, "Bad Request").with_detail(detail)
    }

    pub fn not_found(detail: impl Into<String>) -> Self {
        Self::new(404, "Not Found").with_detail(detail)
    }

    pub fn conflict(detail: impl Into<String>) -> Self {
        Self::new(409, "Conflict").with_detail(detail)
    }

    pub fn too_many_requests(detail: impl Into<String>) -> Self {
        Self::new(429, "Too Many Requests").with_detail(detail)
    }

    pub fn service_unavailable(detail: impl Into<String>) -> Self {
        Self::new(503, "Service Unavailable").with_detail(detail)
    }

    pub fn internal_error(detail: impl Into<String>) -> Self {
        Self::new(500, "Internal Server Error").with_detail(detail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use devlog_core::query::PageRequest;

    #[test]
    fn page_response_uses_camel_case() {
        let page = PageResponse::<u8> {
            posts: vec![1, 2],
            total: 12,
            page: 2,
            total_pages: 2,
        };
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["totalPages"], 2);
        assert_eq!(json["posts"].as_array().map(Vec::len), Some(2));
    }

    #[test]
    fn page_converts_with_rounded_up_page_count() {
        let page = Page::new(vec!['a'; 5], 15, PageRequest::new(Some(2), Some(10)));
        let response = PageResponse::from(page);
        assert_eq!(response.page, 2);
        assert_eq!(response.total, 15);
        assert_eq!(response.total_pages, 2);
        assert_eq!(response.posts.len(), 5);
    }

    #[test]
    fn problem_document_omits_empty_fields() {
        let json = serde_json::to_value(ErrorResponse::new(404, "Not Found")).unwrap();
        assert_eq!(json["type"], "about:blank");
        assert!(json.get("detail").is_none());
        assert!(json.get("request_id").is_none());
    }
}
