//! URL and output path conversion.
//!
//! Every generated page is served from a directory URL and written as
//! `index.html` inside the matching output directory.

use std::path::{Path, PathBuf};

use crate::render::slug::url_slug;

/// The URL of a post page.
///
/// ```ignore
/// post_url("whale-song") => "/whale-song/"
/// ```
pub fn post_url(slug: &str) -> String {
    format!("/{}/", slug)
}

/// The URL of a tag page.
///
/// ```ignore
/// tag_url("Deep Sea") => "/tags/deep-sea/"
/// ```
pub fn tag_url(name: &str) -> String {
    format!("/tags/{}/", url_slug(name))
}

/// Convert a page URL to an output file path.
///
/// ```ignore
/// page_output_path("/whale-song/", output_dir) => output_dir/whale-song/index.html
/// page_output_path("/", output_dir) => output_dir/index.html
/// ```
pub fn page_output_path(url_path: &str, output_dir: &Path) -> PathBuf {
    let url_path = url_path.trim_matches('/');

    if url_path.is_empty() {
        output_dir.join("index.html")
    } else {
        output_dir.join(url_path).join("index.html")
    }
}
