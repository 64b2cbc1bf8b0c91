use serde::Serialize;
use tera::{Context, Tera};

use crate::config::SiteConfig;
use crate::content::{ContentError, ContentProvider};

pub const POST_TEMPLATE: &str = "post";
pub const TAG_TEMPLATE: &str = "tag";
pub const HOME_TEMPLATE: &str = "home";

/// Loaded when present so the page templates can `{% extends "base.html" %}`.
const BASE_TEMPLATE: &str = "base";

#[derive(thiserror::Error, Debug)]
pub enum TemplateError {
    #[error("template error: {0}")]
    Tera(#[from] tera::Error),

    #[error("failed to load template: {0}")]
    Load(#[from] ContentError),
}

/// The page templates of a site, wrapping Tera.
pub struct Templates {
    tera: Tera,
}

impl Templates {
    /// Load `post`, `tag` and `home` (plus `base`, if any) from a provider.
    pub async fn load<P: ContentProvider>(provider: &P) -> Result<Self, TemplateError> {
        let mut sources = Vec::new();

        match provider.get_template(BASE_TEMPLATE).await {
            Ok(source) => sources.push((file_name(BASE_TEMPLATE), source)),
            Err(ContentError::TemplateNotFound { .. }) => {}
            Err(e) => return Err(e.into()),
        }

        for name in [POST_TEMPLATE, TAG_TEMPLATE, HOME_TEMPLATE] {
            let source = provider.get_template(name).await?;
            sources.push((file_name(name), source));
        }

        Self::from_sources(sources)
    }

    /// Build from `(file name, source)` pairs, e.g. `("post.html", "...")`.
    pub fn from_sources(sources: Vec<(String, String)>) -> Result<Self, TemplateError> {
        let mut tera = Tera::default();
        // All at once, so inheritance resolves regardless of order
        tera.add_raw_templates(sources)?;
        Ok(Self { tera })
    }

    pub fn render_post(&self, site: &SiteConfig, post: &PostView) -> Result<String, TemplateError> {
        let mut context = Context::new();
        context.insert("site", site);
        context.insert("post", post);
        Ok(self.tera.render(&file_name(POST_TEMPLATE), &context)?)
    }

    pub fn render_tag(&self, site: &SiteConfig, tag: &TagView) -> Result<String, TemplateError> {
        let mut context = Context::new();
        context.insert("site", site);
        context.insert("tag", tag);
        Ok(self.tera.render(&file_name(TAG_TEMPLATE), &context)?)
    }

    pub fn render_home(
        &self,
        site: &SiteConfig,
        posts: &[PostView],
        tags: &[TagLink],
    ) -> Result<String, TemplateError> {
        let mut context = Context::new();
        context.insert("site", site);
        context.insert("posts", posts);
        context.insert("tags", tags);
        Ok(self.tera.render(&file_name(HOME_TEMPLATE), &context)?)
    }
}

fn file_name(name: &str) -> String {
    format!("{}.html", name)
}

/// A post as seen by templates (`post.*`, or each of `posts`).
#[derive(Debug, Clone, Serialize)]
pub struct PostView {
    pub title: String,
    pub slug: String,
    pub url: String,
    /// `YYYY-MM-DD`
    pub date: Option<String>,
    pub tags: Vec<TagLink>,
    pub categories: Vec<String>,
    /// Rendered HTML of the whole body
    pub content: String,
    /// Rendered HTML up to `<!-- more -->`
    pub summary: String,
}

/// A link to a tag page.
#[derive(Debug, Clone, Serialize)]
pub struct TagLink {
    pub name: String,
    pub url: String,
    /// Number of posts carrying the tag
    pub count: usize,
}

/// A tag page (`tag.*`).
#[derive(Debug, Clone, Serialize)]
pub struct TagView {
    pub name: String,
    pub url: String,
    pub posts: Vec<PostView>,
}
