//! Turns transport failures into user-facing `DownloadError`s.
//!
//! Nothing here is retried; the message only has to tell the user whether
//! re-running later makes sense.

use reqwest::StatusCode;

use crate::error::InstallError;

/// Describes why a request failed, by status class when there is one.
pub fn describe_failure(error: &reqwest::Error) -> String {
    if let Some(status) = error.status() {
        return describe_status(status);
    }

    if error.is_timeout() {
        return "request timed out".to_string();
    }
    if error.is_connect() {
        return format!("connection failed ({})", error);
    }

    error.to_string()
}

pub fn describe_status(status: StatusCode) -> String {
    match status {
        StatusCode::UNAUTHORIZED => "HTTP 401: authentication required".to_string(),
        StatusCode::FORBIDDEN => "HTTP 403: access to this artifact is forbidden".to_string(),
        StatusCode::NOT_FOUND => {
            "HTTP 404: artifact not found, check the formula url".to_string()
        }
        StatusCode::TOO_MANY_REQUESTS => "HTTP 429: too many requests, try again later".to_string(),
        s if s.is_client_error() => format!("HTTP {} client error", s.as_u16()),
        s if s.is_server_error() => {
            format!("HTTP {} server error, try again later", s.as_u16())
        }
        s => format!("unexpected HTTP status {}", s.as_u16()),
    }
}

/// Wraps a transport failure for `url` into a `DownloadError`.
pub fn download_error(url: &str, error: &reqwest::Error) -> InstallError {
    InstallError::Download {
        url: url.to_string(),
        reason: describe_failure(error),
    }
}
