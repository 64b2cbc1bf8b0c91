use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info};

use super::index::{Tag, TagIndex, normalize};
use super::post::Post;
use super::provider::{ContentError, ContentProvider};

/// The loaded posts of a blog plus their tag index.
///
/// Posts are parsed once and shared as `Arc<Post>` between the post list and
/// the tags that reference them.
#[derive(Debug, Clone, Default)]
pub struct Library {
    posts: Vec<Arc<Post>>,
    slugs: HashMap<String, usize>,
    index: TagIndex,
}

impl Library {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load and index every post the provider lists.
    ///
    /// The first post that fails validation aborts the load.
    pub async fn load<P: ContentProvider>(provider: &P) -> Result<Self, ContentError> {
        let documents = provider.list_posts().await?;

        let mut library = Self::new();
        for document in &documents {
            let post = Post::from_document(document).map_err(|source| {
                ContentError::InvalidPost {
                    id: document.id.clone(),
                    source,
                }
            })?;
            library.add_post(post)?;
        }

        info!(
            posts = library.posts.len(),
            tags = library.index.len(),
            "loaded library"
        );
        Ok(library)
    }

    /// Add a post and index its tags.
    pub fn add_post(&mut self, post: Post) -> Result<Arc<Post>, ContentError> {
        let key = normalize(post.slug());
        if let Some(&existing) = self.slugs.get(&key) {
            return Err(ContentError::DuplicateSlug {
                slug: post.slug().to_string(),
                first: self.posts[existing].title().to_string(),
                second: post.title().to_string(),
            });
        }

        let post = Arc::new(post);
        self.index.save_tags(&post)?;
        self.slugs.insert(key, self.posts.len());
        self.posts.push(Arc::clone(&post));

        debug!(slug = %post.slug(), title = %post.title(), "added post");
        Ok(post)
    }

    /// Posts in load order.
    pub fn posts(&self) -> &[Arc<Post>] {
        &self.posts
    }

    /// Posts newest first; undated posts go last, in load order.
    pub fn posts_by_date(&self) -> Vec<Arc<Post>> {
        let mut posts = self.posts.clone();
        // sort_by is stable, so equal dates keep load order
        posts.sort_by(|a, b| b.date().cmp(&a.date()));
        posts
    }

    /// Look up a post by slug, ignoring case.
    pub fn get_post(&self, slug: &str) -> Option<&Arc<Post>> {
        self.slugs
            .get(&normalize(slug))
            .map(|&position| &self.posts[position])
    }

    pub fn get_tag(&self, name: &str) -> Option<&Tag> {
        self.index.get_tag(name)
    }

    pub fn index(&self) -> &TagIndex {
        &self.index
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }
}
