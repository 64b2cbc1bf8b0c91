use scribe::build::Builder;
use scribe::config::Config;

use crate::BuildArgs;

pub async fn run(args: &BuildArgs) -> Result<(), anyhow::Error> {
    let config = Config::load_from_arg(args.config_file.as_deref()).await?;

    let builder = Builder::new(config);
    let result = builder.build().await?;

    println!(
        "Built site to {} ({} posts, {} tags, {} media files)",
        result.output_dir.display(),
        result.posts,
        result.tags,
        result.media_files
    );

    Ok(())
}
