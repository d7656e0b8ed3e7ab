//! Request handling: resolving paths, building responses and rendering pages.

mod body;
mod error;
mod files;
mod listing;
mod render;
mod resolve;
mod response;

use std::{convert::Infallible, future::Future, pin::Pin, sync::Arc};

use hyper::{service::Service, Request};
use tracing::{debug, error, warn};

use crate::config::ServerConfig;

pub use body::{full, stream, Body};
pub use error::{ErrorResponse, ResolveError};
pub use files::transfer;
pub use listing::{breadcrumbs, encode_path, join_location, Breadcrumb, DirectoryListing, Entry};
pub use render::{HtmlRenderer, Render};
pub use resolve::{normalize, resolve, OpenFile, Resolution};
pub use response::{BoxBodyResponse, LocalResponse};

/// Service given to hyper for every connection. Every method on every path
/// goes through [`Spserve::respond`].
#[derive(Clone)]
pub struct Spserve {
    config: Arc<ServerConfig>,
    renderer: Arc<dyn Render>,
}

impl Spserve {
    pub fn new(config: Arc<ServerConfig>, renderer: Arc<dyn Render>) -> Self {
        Self { config, renderer }
    }

    /// Resolves `path` and builds the complete response. Failures never
    /// escape this function, they become rendered error pages.
    pub async fn respond(&self, path: &str) -> BoxBodyResponse {
        match resolve(path, &self.config.root).await {
            Ok(Resolution::File(file)) => transfer(file),

            Ok(Resolution::Directory(listing)) => {
                LocalResponse::html(hyper::StatusCode::OK, self.renderer.listing(&listing))
            }

            Err(err) => {
                match &err {
                    ResolveError::NotFound(_) => debug!("{err}"),
                    ResolveError::PathTraversal(_) | ResolveError::InvalidPath(_) => {
                        warn!("Rejected request for {path}: {err}")
                    }
                    ResolveError::Io(_) => error!("Couldn't serve {path}: {err}"),
                }

                let page = ErrorResponse::from(&err);
                LocalResponse::html(page.status, self.renderer.error(&page))
            }
        }
    }
}

impl<B> Service<Request<B>> for Spserve {
    type Response = BoxBodyResponse;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn call(&self, request: Request<B>) -> Self::Future {
        debug!("{} {}", request.method(), request.uri());

        let service = self.clone();
        let path = request.uri().path().to_owned();

        Box::pin(async move { Ok(service.respond(&path).await) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use http_body_util::BodyExt;
    use hyper::{header, StatusCode};
    use std::net::Ipv4Addr;
    use tempfile::TempDir;

    fn service(root: &std::path::Path) -> Spserve {
        let config = ServerConfig::new(Config::default(), root.to_path_buf(), Ipv4Addr::LOCALHOST);
        Spserve::new(Arc::new(config), Arc::new(HtmlRenderer))
    }

    async fn text(response: BoxBodyResponse) -> String {
        let body = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(body.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn any_method_is_served() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("a.txt"), "abc").unwrap();
        let service = service(temp.path());

        for method in ["GET", "POST", "DELETE"] {
            let request = Request::builder()
                .method(method)
                .uri("/a.txt")
                .body(())
                .unwrap();

            let response = service.call(request).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);
            assert_eq!(text(response).await, "abc");
        }
    }

    #[tokio::test]
    async fn directory_page() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir(temp.path().join("sub")).unwrap();
        std::fs::write(temp.path().join("sub/readme.md"), "hi").unwrap();

        let response = service(temp.path()).respond("/sub").await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/html; charset=utf-8");

        let html = text(response).await;
        assert!(html.contains(r#"href="/sub/readme.md""#));
        assert!(html.contains(r#"<a href="/">home</a>"#));
    }

    #[tokio::test]
    async fn error_pages_carry_status() {
        let temp = TempDir::new().unwrap();
        let service = service(temp.path());

        let missing = service.respond("/missing.txt").await;
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
        assert!(text(missing).await.contains("/missing.txt"));

        let escape = service.respond("/../../etc/passwd").await;
        assert_eq!(escape.status(), StatusCode::FORBIDDEN);
    }
}
