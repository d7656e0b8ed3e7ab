//! HTML pages for directory listings and errors.
//!
//! The request handling code only talks to the [`Render`] trait, the markup
//! itself lives in [`HtmlRenderer`].

use bytes::Bytes;
use maud::{html, Markup, PreEscaped, DOCTYPE};

use super::{error::ErrorResponse, listing::DirectoryListing};

/// Turns resolution results into response bodies.
pub trait Render: Send + Sync {
    fn listing(&self, listing: &DirectoryListing) -> Bytes;

    fn error(&self, error: &ErrorResponse) -> Bytes;
}

/// Default renderer, plain HTML with an inline stylesheet.
#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlRenderer;

const STYLE: &str = "
body { font-family: sans-serif; margin: 2rem auto; max-width: 60rem; padding: 0 1rem; }
nav { margin-bottom: 1rem; }
ul { list-style: none; padding: 0; }
li { display: flex; justify-content: space-between; padding: .3rem 0; border-bottom: 1px solid #eee; }
li.directory a { font-weight: bold; }
.size, footer { color: #777; }
";

impl Render for HtmlRenderer {
    fn listing(&self, listing: &DirectoryListing) -> Bytes {
        let parent = listing.breadcrumbs.last().map(|crumb| crumb.location());

        let body = html! {
            nav {
                @for crumb in &listing.breadcrumbs {
                    a href=(crumb.location()) { (crumb.name()) }
                    " / "
                }
                strong { (listing.name) }
            }
            ul {
                @if let Some(parent) = parent {
                    li.directory { a href=(parent) { ".." } }
                }
                @for entry in &listing.directories {
                    li.directory {
                        a href=(format!("{}/", entry.location())) { (entry.name()) "/" }
                    }
                }
                @for entry in &listing.files {
                    li.file {
                        a href=(entry.location()) { (entry.name()) }
                        @if let Some(size) = entry.size() {
                            span.size { (human_size(size)) }
                        }
                    }
                }
            }
        };

        page(&listing.name, body)
    }

    fn error(&self, error: &ErrorResponse) -> Bytes {
        let title = format!("{} {}", error.status.as_u16(), error.status_text);

        let body = html! {
            h1 { (title) }
            p { (error.message) }
            p { a href="/" { "Back to home" } }
        };

        page(&title, body)
    }
}

fn page(title: &str, body: Markup) -> Bytes {
    let markup = html! {
        (DOCTYPE)
        html {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) }
                style { (PreEscaped(STYLE)) }
            }
            body {
                (body)
                footer { "spserve " (crate::VERSION) }
            }
        }
    };

    Bytes::from(markup.into_string())
}

fn human_size(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KiB", "MiB", "GiB", "TiB"];

    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }

    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{size:.1} {}", UNITS[unit])
    }
}
