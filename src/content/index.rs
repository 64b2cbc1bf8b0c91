//! The tag index: which posts carry which tags.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use super::post::Post;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum IndexError {
    #[error("cannot index a post without a title (slug: {slug})")]
    UntitledPost { slug: String },
}

/// Normalize a tag name or post title for comparison.
pub fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}

/// A tag and the posts that carry it, in the order they were saved.
#[derive(Debug, Clone, Serialize)]
pub struct Tag {
    name: String,
    posts: Vec<Arc<Post>>,
}

impl Tag {
    fn new(name: &str) -> Self {
        Self {
            name: name.trim().to_string(),
            posts: Vec::new(),
        }
    }

    /// The name as first seen, trimmed.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn posts(&self) -> &[Arc<Post>] {
        &self.posts
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    pub fn contains(&self, post: &Post) -> bool {
        self.posts.iter().any(|p| p.is_same_post(post))
    }

    /// Append a post unless one with the same normalized title is present.
    fn add(&mut self, post: &Arc<Post>) -> bool {
        if self.contains(post) {
            return false;
        }
        self.posts.push(Arc::clone(post));
        true
    }
}

/// Tags in first-seen order with case-insensitive lookup.
///
/// The index only grows. To drop posts, build a new index with
/// [`TagIndex::from_posts`].
#[derive(Debug, Clone, Default)]
pub struct TagIndex {
    tags: Vec<Tag>,
    positions: HashMap<String, usize>,
}

impl TagIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index every post in order.
    pub fn from_posts<'a, I>(posts: I) -> Result<Self, IndexError>
    where
        I: IntoIterator<Item = &'a Arc<Post>>,
    {
        let mut index = Self::new();
        for post in posts {
            index.save_tags(post)?;
        }
        Ok(index)
    }

    /// Record `post` under each of its tags.
    ///
    /// Unknown tags are created. Saving the same post again, or another post
    /// with the same normalized title, changes nothing. Blank tag names are
    /// skipped.
    pub fn save_tags(&mut self, post: &Arc<Post>) -> Result<(), IndexError> {
        if post.title().trim().is_empty() {
            return Err(IndexError::UntitledPost {
                slug: post.slug().to_string(),
            });
        }

        for name in post.tags() {
            let key = normalize(name);
            if key.is_empty() {
                continue;
            }

            let position = match self.positions.get(&key) {
                Some(&position) => position,
                None => {
                    debug!(tag = %name.trim(), "new tag");
                    self.tags.push(Tag::new(name));
                    self.positions.insert(key, self.tags.len() - 1);
                    self.tags.len() - 1
                }
            };

            self.tags[position].add(post);
        }

        Ok(())
    }

    /// Look up a tag, ignoring case and surrounding whitespace.
    pub fn get_tag(&self, name: &str) -> Option<&Tag> {
        self.positions
            .get(&normalize(name))
            .map(|&position| &self.tags[position])
    }

    pub fn tag_exists(&self, name: &str) -> bool {
        self.get_tag(name).is_some()
    }

    /// Tag names in first-seen order.
    pub fn tag_names(&self) -> Vec<&str> {
        self.tags.iter().map(Tag::name).collect()
    }

    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}
