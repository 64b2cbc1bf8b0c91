mod builder;
mod paths;
mod templates;

pub use builder::{BuildError, BuildResult, Builder, HIGHLIGHT_CSS};
pub use paths::{page_output_path, post_url, tag_url};
pub use templates::{
    HOME_TEMPLATE, POST_TEMPLATE, PostView, TAG_TEMPLATE, TagLink, TagView, TemplateError,
    Templates,
};
