use std::path::PathBuf;

use scribe::content::{ContentProvider, FileProvider, Library, TagIndex};

fn fixture_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/blog")
}

fn provider() -> FileProvider {
    let root = fixture_dir();
    FileProvider::new(root.join("content"), root.join("templates"))
}

#[tokio::test]
async fn test_lists_every_post() {
    let documents = provider().list_posts().await.unwrap();
    let ids: Vec<&str> = documents.iter().map(|d| d.id.as_str()).collect();
    assert_eq!(
        ids,
        vec!["article-simple", "mars", "rust", "tesla", "whale-song"]
    );
}

#[tokio::test]
async fn test_get_post_by_file_name() {
    let provider = provider();

    let document = provider.get_post("article-simple").await.unwrap().unwrap();
    assert!(document.text.contains("title: Article Simple"));

    assert!(provider.get_post("article").await.unwrap().is_none());
    assert!(provider.get_post("../foo").await.unwrap().is_none());
    assert!(provider.get_post("images").await.unwrap().is_none());
}

#[tokio::test]
async fn test_templates() {
    let provider = provider();
    assert!(provider.get_template("post").await.unwrap().contains("post.content"));
    assert!(provider.get_template("missing").await.is_err());
}

#[tokio::test]
async fn test_library_posts_and_tags() {
    let library = Library::load(&provider()).await.unwrap();
    assert_eq!(library.len(), 5);

    assert_eq!(
        library.get_post("article-simple").unwrap().title(),
        "Article Simple"
    );
    assert_eq!(
        library.get_post("all-about-the-tesla-model-3").unwrap().title(),
        "Tesla Model 3"
    );
    assert!(library.get_post("article").is_none());
    assert!(library.get_post("tesla").is_none());

    let index = library.index();
    assert_eq!(index.len(), 12);
    assert_eq!(
        index.tag_names(),
        vec![
            "whale",
            "ocean",
            "simple",
            "space",
            "mars",
            "programming",
            "rust",
            "systems",
            "tesla",
            "cars",
            "electric",
            "music",
        ]
    );

    let whale = library.get_tag("Whale").unwrap();
    let titles: Vec<&str> = whale.posts().iter().map(|p| p.title()).collect();
    assert_eq!(titles, vec!["Article Simple", "Whale Song"]);

    assert!(library.get_tag("snoopy").is_none());
}

#[tokio::test]
async fn test_rebuilt_index_matches() {
    let library = Library::load(&provider()).await.unwrap();

    let rebuilt = TagIndex::from_posts(library.posts()).unwrap();
    assert_eq!(rebuilt.tag_names(), library.index().tag_names());
    assert_eq!(rebuilt.get_tag("whale").unwrap().len(), 2);
}

#[tokio::test]
async fn test_posts_by_date() {
    let library = Library::load(&provider()).await.unwrap();
    let slugs: Vec<String> = library
        .posts_by_date()
        .iter()
        .map(|p| p.slug().to_string())
        .collect();
    assert_eq!(
        slugs,
        vec![
            "whale-song",
            "article-simple",
            "all-about-the-tesla-model-3",
            "rust",
            "mars",
        ]
    );
}

#[tokio::test]
async fn test_categories_and_dates() {
    let library = Library::load(&provider()).await.unwrap();

    let tesla = library.get_post("all-about-the-tesla-model-3").unwrap();
    assert_eq!(tesla.categories(), ["Reviews"]);
    assert!(tesla.date().is_some());

    assert!(library.get_post("mars").unwrap().date().is_none());
}
