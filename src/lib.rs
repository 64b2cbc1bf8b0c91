//! A Markdown blog generator.
//!
//! Posts are read through a [`content::ContentProvider`], indexed by tag in a
//! [`content::TagIndex`] and rendered to HTML by a [`render::RenderEngine`]
//! whose pipeline stages can be switched on and off. [`build::Builder`] turns
//! a whole blog into a static site, and [`migrate`] imports posts from a
//! WordPress site.

pub mod build;
pub mod config;
pub mod content;
pub mod migrate;
pub mod render;
