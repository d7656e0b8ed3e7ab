//! Types and abstractions for HTTP responses.

use bytes::Bytes;
use hyper::{
    header::{self, HeaderValue},
    Response, StatusCode,
};

use super::body::{self, Body};

pub type BoxBodyResponse = Response<Body>;

/// HTTP response originated on this server.
pub struct LocalResponse;

impl LocalResponse {
    /// Response with the headers every reply carries.
    pub fn new(status: StatusCode, content_type: HeaderValue, body: Body) -> BoxBodyResponse {
        let mut response = Response::new(body);
        *response.status_mut() = status;

        let headers = response.headers_mut();
        headers.insert(header::SERVER, HeaderValue::from_static(crate::SERVER_HEADER));
        headers.insert(header::CONTENT_TYPE, content_type);

        response
    }

    /// Rendered HTML page, used for listings and error pages.
    pub fn html(status: StatusCode, page: Bytes) -> BoxBodyResponse {
        let length = page.len();
        let mut response = Self::new(
            status,
            HeaderValue::from_static("text/html; charset=utf-8"),
            body::full(page),
        );

        response
            .headers_mut()
            .insert(header::CONTENT_LENGTH, HeaderValue::from(length));

        response
    }
}
