//! Import of posts from a WordPress site.
//!
//! Posts come from the WordPress REST API and are written as Markdown files
//! with a YAML header, next to an `images/` directory for featured media.

mod api;
mod error;
mod html;
mod wordpress;

pub use api::{PostsPage, Rendered, RestClient, WordPressApi, WpMedia, WpPost, WpTerm};
pub use error::MigrationError;
pub use html::html_to_markdown;
pub use wordpress::{MEDIA_DIR, MigrationReport, WordPressMigrator, migrate};
