use scribe::content::parse_front_matter;
use scribe::render::{RenderEngine, RenderOptions, SyntaxHighlighter};

use crate::RenderArgs;

pub async fn run(args: &RenderArgs) -> Result<(), anyhow::Error> {
    let text = tokio::fs::read_to_string(&args.file).await?;
    let markdown = if args.front_matter {
        parse_front_matter(&text).body
    } else {
        text
    };

    let options = RenderOptions::new()
        .gfm(!args.no_gfm)
        .toc(!args.no_toc)
        .emoji(!args.no_emoji)
        .slug(!args.no_slug)
        .highlight(!args.no_highlight);
    let engine = RenderEngine::with_highlighter(&options, SyntaxHighlighter::new(&args.theme));

    let html = engine.render(&markdown, None)?;
    print!("{}", html);

    Ok(())
}
