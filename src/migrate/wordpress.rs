use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::api::{RestClient, WordPressApi, WpPost};
use super::error::MigrationError;
use super::html::html_to_markdown;
use crate::content::{PostHeader, render_front_matter};

/// Directory, relative to the destination, that media files are saved to.
pub const MEDIA_DIR: &str = "images";

/// What a finished migration wrote.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationReport {
    pub posts: usize,
    pub media: usize,
    /// Every file written, relative to the destination
    pub files: Vec<PathBuf>,
}

/// A file produced by the migration, held in memory until everything converted.
#[derive(Debug)]
struct PendingFile {
    path: PathBuf,
    bytes: Vec<u8>,
}

/// Copies the posts of a WordPress site into Markdown files.
///
/// Every post, its terms and its featured image are fetched and converted
/// before anything touches the disk; the first failure aborts the run.
pub struct WordPressMigrator<A> {
    api: A,
}

/// Migrate `source_url` into `dest` over the WordPress REST API.
pub async fn migrate(source_url: &str, dest: &Path) -> Result<MigrationReport, MigrationError> {
    info!(source = source_url, dest = %dest.display(), "migrating WordPress site");
    let client = RestClient::new(source_url)?;
    WordPressMigrator::new(client).migrate(dest).await
}

impl<A: WordPressApi> WordPressMigrator<A> {
    pub fn new(api: A) -> Self {
        Self { api }
    }

    pub async fn migrate(&self, dest: &Path) -> Result<MigrationReport, MigrationError> {
        let posts = self.fetch_posts().await?;
        info!(count = posts.len(), "fetched posts");

        let mut report = MigrationReport::default();
        let mut files = Vec::new();
        for post in &posts {
            let before = files.len();
            self.convert_post(post, &mut files).await?;
            report.posts += 1;
            // Everything after the first file of a post is media
            report.media += files.len() - before - 1;
        }

        write_files(dest, &files).await?;
        report.files = files.into_iter().map(|f| f.path).collect();

        info!(
            posts = report.posts,
            media = report.media,
            "migration completed"
        );
        Ok(report)
    }

    /// Fetch every page of the posts collection.
    async fn fetch_posts(&self) -> Result<Vec<WpPost>, MigrationError> {
        let first = self.api.posts_page(1).await?;
        let mut posts = first.posts;

        for page in 2..=first.total_pages {
            debug!(page, total = first.total_pages, "fetching posts page");
            posts.extend(self.api.posts_page(page).await?.posts);
        }

        Ok(posts)
    }

    /// Convert one post, pushing its Markdown file and then its media.
    async fn convert_post(
        &self,
        post: &WpPost,
        files: &mut Vec<PendingFile>,
    ) -> Result<(), MigrationError> {
        if !is_file_name(&post.slug) {
            return Err(MigrationError::InvalidSlug {
                id: post.id,
                slug: post.slug.clone(),
            });
        }

        let categories = self.api.post_categories(post.id).await?;
        let tags = self.api.post_tags(post.id).await?;
        let title = html_escape::decode_html_entities(&post.title.rendered).into_owned();

        let header = PostHeader {
            title: Some(title.clone()),
            slug: Some(post.slug.clone()),
            categories: categories.into_iter().map(|t| t.name).collect(),
            tags: tags.into_iter().map(|t| t.name).collect(),
            date: Some(post.date.clone()),
        };
        let mut markdown =
            render_front_matter(&header).map_err(|source| MigrationError::Header {
                slug: post.slug.clone(),
                source,
            })?;
        markdown.push('\n');

        let mut media_files = Vec::new();
        if post.featured_media != 0 {
            let media = self.api.media(post.featured_media).await?;
            let file_name = match extension_for(&media.mime_type) {
                Some(ext) if is_file_name(&media.slug) => format!("{}.{}", media.slug, ext),
                _ => {
                    return Err(MigrationError::InvalidMedia {
                        id: post.featured_media,
                        mime_type: media.mime_type.clone(),
                    });
                }
            };

            let bytes = self.api.download(&media.guid.rendered).await?;
            markdown.push_str(&format!("![{}](/{}/{})\n\n", title, MEDIA_DIR, file_name));
            media_files.push(PendingFile {
                path: Path::new(MEDIA_DIR).join(file_name),
                bytes,
            });
        }

        let body =
            html_to_markdown(&post.content.rendered).map_err(|e| MigrationError::Convert {
                slug: post.slug.clone(),
                message: e.to_string(),
            })?;
        markdown.push_str(&body);

        debug!(slug = %post.slug, "converted post");
        files.push(PendingFile {
            path: PathBuf::from(format!("{}.md", post.slug)),
            bytes: markdown.into_bytes(),
        });
        files.extend(media_files);
        Ok(())
    }
}

/// File extension for a media MIME type: the subtype, minus any suffix.
/// "image/jpeg" -> "jpeg", "image/svg+xml" -> "svg"
fn extension_for(mime_type: &str) -> Option<&str> {
    let (_, subtype) = mime_type.split_once('/')?;
    let subtype = subtype.split([';', '+']).next()?.trim();
    if subtype.is_empty() || !subtype.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return None;
    }
    Some(subtype)
}

/// Whether `name` can be used as a single file name.
fn is_file_name(name: &str) -> bool {
    !name.is_empty() && !name.starts_with('.') && !name.contains(['/', '\\', '\0'])
}

async fn write_files(dest: &Path, files: &[PendingFile]) -> Result<(), MigrationError> {
    for file in files {
        let path = dest.join(&file.path);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| MigrationError::Write {
                    path: parent.to_path_buf(),
                    source,
                })?;
        }
        tokio::fs::write(&path, &file.bytes)
            .await
            .map_err(|source| MigrationError::Write { path, source })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::content::{Post, RawDocument};
    use crate::migrate::api::{PostsPage, Rendered, WpMedia, WpTerm};

    #[derive(Default)]
    struct FakeApi {
        pages: Vec<Vec<WpPost>>,
        categories: HashMap<u64, Vec<&'static str>>,
        tags: HashMap<u64, Vec<&'static str>>,
        media: HashMap<u64, WpMedia>,
        downloads: HashMap<String, Vec<u8>>,
    }

    fn terms(map: &HashMap<u64, Vec<&'static str>>, id: u64) -> Vec<WpTerm> {
        map.get(&id)
            .into_iter()
            .flatten()
            .map(|name| WpTerm {
                name: name.to_string(),
            })
            .collect()
    }

    impl WordPressApi for FakeApi {
        async fn posts_page(&self, page: u32) -> Result<PostsPage, MigrationError> {
            let posts = self
                .pages
                .get(page as usize - 1)
                .cloned()
                .ok_or_else(|| MigrationError::Api(format!("no page {}", page)))?;
            Ok(PostsPage {
                posts,
                total_pages: self.pages.len() as u32,
            })
        }

        async fn post_categories(&self, post_id: u64) -> Result<Vec<WpTerm>, MigrationError> {
            Ok(terms(&self.categories, post_id))
        }

        async fn post_tags(&self, post_id: u64) -> Result<Vec<WpTerm>, MigrationError> {
            Ok(terms(&self.tags, post_id))
        }

        async fn media(&self, media_id: u64) -> Result<WpMedia, MigrationError> {
            self.media
                .get(&media_id)
                .cloned()
                .ok_or_else(|| MigrationError::Api(format!("no media {}", media_id)))
        }

        async fn download(&self, url: &str) -> Result<Vec<u8>, MigrationError> {
            self.downloads
                .get(url)
                .cloned()
                .ok_or_else(|| MigrationError::Api(format!("no file at {}", url)))
        }
    }

    fn wp_post(id: u64, slug: &str, title: &str, featured_media: u64) -> WpPost {
        WpPost {
            id,
            slug: slug.to_string(),
            date: "2020-05-01T09:30:00".to_string(),
            title: Rendered {
                rendered: title.to_string(),
            },
            content: Rendered {
                rendered: "<p>Hello <strong>there</strong></p>".to_string(),
            },
            featured_media,
        }
    }

    fn site() -> FakeApi {
        let mut api = FakeApi {
            pages: vec![
                vec![wp_post(1, "whales", "Whales &amp; Dolphins", 10)],
                vec![wp_post(2, "cars", "Cars", 0)],
            ],
            ..FakeApi::default()
        };
        api.categories.insert(1, vec!["Nature"]);
        api.tags.insert(1, vec!["whale", "ocean"]);
        api.tags.insert(2, vec!["tesla"]);
        api.media.insert(
            10,
            WpMedia {
                slug: "whale-photo".to_string(),
                mime_type: "image/jpeg".to_string(),
                guid: Rendered {
                    rendered: "https://blog.example.com/whale.jpg".to_string(),
                },
            },
        );
        api.downloads
            .insert("https://blog.example.com/whale.jpg".to_string(), vec![1, 2, 3]);
        api
    }

    #[tokio::test]
    async fn test_migrate_writes_posts_and_media() {
        let dest = tempfile::tempdir().unwrap();
        let report = WordPressMigrator::new(site())
            .migrate(dest.path())
            .await
            .unwrap();

        assert_eq!(report.posts, 2);
        assert_eq!(report.media, 1);
        assert_eq!(
            report.files,
            vec![
                PathBuf::from("whales.md"),
                PathBuf::from("images/whale-photo.jpeg"),
                PathBuf::from("cars.md"),
            ]
        );

        let image = std::fs::read(dest.path().join("images/whale-photo.jpeg")).unwrap();
        assert_eq!(image, vec![1, 2, 3]);

        let text = std::fs::read_to_string(dest.path().join("whales.md")).unwrap();
        assert!(text.contains("![Whales & Dolphins](/images/whale-photo.jpeg)"));
        assert!(text.ends_with("Hello **there**\n"));

        // The written file reads back as a post
        let post = Post::from_document(&RawDocument::new("whales", text)).unwrap();
        assert_eq!(post.title(), "Whales & Dolphins");
        assert_eq!(post.slug(), "whales");
        assert_eq!(post.tags(), ["whale", "ocean"]);
        assert_eq!(post.categories(), ["Nature"]);
        assert!(post.date().is_some());
    }

    #[tokio::test]
    async fn test_failure_writes_nothing() {
        let mut api = site();
        api.downloads.clear();

        let dest = tempfile::tempdir().unwrap();
        let err = WordPressMigrator::new(api)
            .migrate(dest.path())
            .await
            .unwrap_err();

        assert!(matches!(err, MigrationError::Api(_)));
        assert_eq!(std::fs::read_dir(dest.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_unusable_slug_aborts() {
        let api = FakeApi {
            pages: vec![vec![wp_post(3, "../escape", "Bad", 0)]],
            ..FakeApi::default()
        };

        let dest = tempfile::tempdir().unwrap();
        let err = WordPressMigrator::new(api)
            .migrate(dest.path())
            .await
            .unwrap_err();
        assert!(matches!(err, MigrationError::InvalidSlug { id: 3, .. }));
    }

    #[test]
    fn test_extension_for() {
        assert_eq!(extension_for("image/jpeg"), Some("jpeg"));
        assert_eq!(extension_for("image/png"), Some("png"));
        assert_eq!(extension_for("image/svg+xml"), Some("svg"));
        assert_eq!(extension_for("image/webp; charset=binary"), Some("webp"));
        assert_eq!(extension_for("jpeg"), None);
        assert_eq!(extension_for("image/"), None);
        assert_eq!(extension_for("image/../x"), None);
    }
}
