//! Static files server sub-service.

use hyper::{
    header::{self, HeaderValue},
    StatusCode,
};

use super::{
    body,
    resolve::OpenFile,
    response::{BoxBodyResponse, LocalResponse},
};

/// Returns an HTTP response whose body streams the content of an open file.
pub fn transfer(open: OpenFile) -> BoxBodyResponse {
    let OpenFile {
        path,
        file,
        metadata,
    } = open;

    let mime = mime_guess::from_path(&path).first_or_octet_stream();
    let content_type = HeaderValue::from_str(mime.as_ref())
        .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream"));

    let mut response = LocalResponse::new(StatusCode::OK, content_type, body::stream(file));
    let headers = response.headers_mut();

    // Pipes and devices have no meaningful length, let the body decide.
    if metadata.is_file() {
        headers.insert(header::CONTENT_LENGTH, HeaderValue::from(metadata.len()));
    }

    if let Ok(modified) = metadata.modified() {
        if let Ok(value) = HeaderValue::from_str(&httpdate::fmt_http_date(modified)) {
            headers.insert(header::LAST_MODIFIED, value);
        }
    }

    response
}
