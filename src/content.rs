//! Posts, tags, and the providers they are loaded from.

mod document;
mod index;
mod library;
mod post;
mod provider;

pub use document::{
    ParsedContent, PostHeader, RawDocument, parse_front_matter, render_front_matter,
};
pub use index::{IndexError, Tag, TagIndex, normalize};
pub use library::Library;
pub use post::{MORE_MARKER, Post, PostMetadata, ValidationError, parse_post};
pub use provider::{ContentError, ContentProvider, FileProvider};
