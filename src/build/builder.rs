use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::content::{ContentError, ContentProvider, FileProvider, Library, Post, TagIndex};
use crate::migrate::MEDIA_DIR;
use crate::render::{RenderEngine, RenderError, SyntaxHighlighter};

use super::paths::{page_output_path, post_url, tag_url};
use super::templates::{PostView, TagLink, TagView, TemplateError, Templates};

/// Stylesheet for highlighted code, written at the output root.
pub const HIGHLIGHT_CSS: &str = "highlight.css";

#[derive(thiserror::Error, Debug)]
pub enum BuildError {
    #[error("content error: {0}")]
    Content(#[from] ContentError),

    #[error("{0}")]
    Template(#[from] TemplateError),

    #[error("failed to render post '{slug}': {source}")]
    Render { slug: String, source: RenderError },

    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

#[derive(Debug)]
pub struct BuildResult {
    pub output_dir: PathBuf,
    pub posts: usize,
    pub tags: usize,
    pub media_files: usize,
}

/// A page rendered in memory, waiting to be written.
struct Page {
    url: String,
    html: String,
}

pub struct Builder {
    config: Config,
    engine: RenderEngine,
}

impl Builder {
    pub fn new(config: Config) -> Self {
        let highlighter = SyntaxHighlighter::new(&config.highlight.theme);
        let engine = RenderEngine::with_highlighter(&config.render, highlighter);
        Self { config, engine }
    }

    pub fn engine(&self) -> &RenderEngine {
        &self.engine
    }

    /// Build from the configured content and template directories.
    pub async fn build(&self) -> Result<BuildResult, BuildError> {
        let provider = FileProvider::new(self.config.content_dir(), self.config.templates_dir());
        self.build_from(&provider).await
    }

    /// Build from any provider.
    ///
    /// Every page is rendered before the first one is written, so a post
    /// that fails to render leaves the output directory untouched.
    pub async fn build_from<P: ContentProvider>(
        &self,
        provider: &P,
    ) -> Result<BuildResult, BuildError> {
        // 1. Load and index posts
        let library = Library::load(provider).await?;
        println!(
            "Loaded {} post(s) with {} tag(s)",
            library.len(),
            library.index().len()
        );

        // 2. Load templates
        let templates = Templates::load(provider).await?;

        // 3. Render every page
        let pages = self.render_pages(&library, &templates)?;

        // 4. Write pages
        let output_dir = self.config.output_dir();
        create_dir(&output_dir)?;
        for page in &pages {
            let path = page_output_path(&page.url, &output_dir);
            if let Some(parent) = path.parent() {
                create_dir(parent)?;
            }
            write_file(&path, page.html.as_bytes())?;
            debug!(url = %page.url, "wrote page");
        }

        // 5. Copy media
        let media_dir = self.config.media_dir();
        let media_files = if media_dir.is_dir() {
            copy_dir(&media_dir, &output_dir.join(MEDIA_DIR))?
        } else {
            0
        };

        // 6. Stylesheet for highlighted code
        if self.engine.options().highlight
            && let Some(css) = self.engine.highlighter().generate_css()
        {
            write_file(&output_dir.join(HIGHLIGHT_CSS), css.as_bytes())?;
        }

        let display_output = output_dir.canonicalize().unwrap_or(output_dir.clone());
        println!(
            "Wrote {} page(s) and {} media file(s) to {}",
            pages.len(),
            media_files,
            display_output.display()
        );

        Ok(BuildResult {
            output_dir,
            posts: library.len(),
            tags: library.index().len(),
            media_files,
        })
    }

    fn render_pages(
        &self,
        library: &Library,
        templates: &Templates,
    ) -> Result<Vec<Page>, BuildError> {
        let site = &self.config.site;
        let index = library.index();

        // Each post is rendered once and shared by its own page, tag pages and home
        let mut views: HashMap<String, PostView> = HashMap::new();
        for post in library.posts() {
            let view = self.post_view(post, index)?;
            views.insert(post.slug().to_string(), view);
        }

        let mut pages = Vec::new();

        for post in library.posts() {
            let view = &views[post.slug()];
            pages.push(Page {
                url: view.url.clone(),
                html: templates.render_post(site, view)?,
            });
        }

        let mut tag_urls: HashMap<String, &str> = HashMap::new();
        for tag in index.tags() {
            let url = tag_url(tag.name());
            if url == tag_url("") {
                warn!(tag = %tag.name(), "tag has no url-safe characters; skipping its page");
                continue;
            }
            if let Some(first) = tag_urls.insert(url.clone(), tag.name()) {
                warn!(first, second = %tag.name(), %url, "tags share a page; the last one wins");
            }

            let mut posts: Vec<&Arc<Post>> = tag.posts().iter().collect();
            sort_newest_first(&mut posts);
            let view = TagView {
                name: tag.name().to_string(),
                url: url.clone(),
                posts: posts.iter().map(|p| views[p.slug()].clone()).collect(),
            };
            pages.push(Page {
                html: templates.render_tag(site, &view)?,
                url,
            });
        }

        let home_posts: Vec<PostView> = library
            .posts_by_date()
            .iter()
            .map(|p| views[p.slug()].clone())
            .collect();
        let tag_links: Vec<TagLink> = index
            .tags()
            .iter()
            .map(|tag| tag_link(tag.name(), index))
            .collect();
        pages.push(Page {
            url: "/".to_string(),
            html: templates.render_home(site, &home_posts, &tag_links)?,
        });

        info!(pages = pages.len(), "rendered site");
        Ok(pages)
    }

    fn post_view(&self, post: &Post, index: &TagIndex) -> Result<PostView, BuildError> {
        let render = |text: &str| {
            self.engine
                .render(text, None)
                .map_err(|source| BuildError::Render {
                    slug: post.slug().to_string(),
                    source,
                })
        };

        let content = render(post.content())?;
        let summary = if post.summary().len() == post.content().len() {
            content.clone()
        } else {
            render(post.summary())?
        };

        Ok(PostView {
            title: post.title().to_string(),
            slug: post.slug().to_string(),
            url: post_url(post.slug()),
            date: post.date().map(format_date),
            tags: post
                .tags()
                .iter()
                .filter(|name| !name.trim().is_empty())
                .map(|name| tag_link(name, index))
                .collect(),
            categories: post.categories().to_vec(),
            content,
            summary,
        })
    }
}

fn tag_link(name: &str, index: &TagIndex) -> TagLink {
    // Link to the indexed spelling so every post points at the same page
    let tag = index.get_tag(name);
    TagLink {
        name: tag.map_or(name, |t| t.name()).to_string(),
        url: tag_url(name),
        count: tag.map_or(0, |t| t.len()),
    }
}

fn sort_newest_first(posts: &mut [&Arc<Post>]) {
    posts.sort_by(|a, b| b.date().cmp(&a.date()));
}

fn format_date(date: DateTime<Utc>) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn create_dir(path: &Path) -> Result<(), BuildError> {
    std::fs::create_dir_all(path).map_err(|source| BuildError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<(), BuildError> {
    std::fs::write(path, bytes).map_err(|source| BuildError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Copy a directory tree, returning the number of files copied.
fn copy_dir(from: &Path, to: &Path) -> Result<usize, BuildError> {
    create_dir(to)?;

    let entries = std::fs::read_dir(from).map_err(|source| BuildError::Io {
        path: from.to_path_buf(),
        source,
    })?;

    let mut count = 0;
    for entry in entries {
        let entry = entry.map_err(|source| BuildError::Io {
            path: from.to_path_buf(),
            source,
        })?;
        let source_path = entry.path();
        let target_path = to.join(entry.file_name());

        if source_path.is_dir() {
            count += copy_dir(&source_path, &target_path)?;
        } else {
            std::fs::copy(&source_path, &target_path).map_err(|source| BuildError::Io {
                path: target_path.clone(),
                source,
            })?;
            count += 1;
        }
    }

    Ok(count)
}
