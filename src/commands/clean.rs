use std::path::{Path, PathBuf};

use scribe::config::Config;

use crate::CleanArgs;

pub async fn run(args: &CleanArgs) -> Result<(), anyhow::Error> {
    let config = Config::load_from_arg(args.config_file.as_deref()).await?;

    // Delete the generated site folder
    let site_path = canonical(config.output_dir());
    if !site_path.exists() {
        println!("Nothing to clean at {}", site_path.display());
        return Ok(());
    }

    if let Some(source) = source_inside(&config, &site_path) {
        return Err(anyhow::anyhow!(
            "Refusing to delete {}: it contains {}",
            site_path.display(),
            source.display()
        ));
    }

    if args.dry_run {
        println!("Would delete {}", site_path.display());
    } else {
        tokio::fs::remove_dir_all(&site_path).await?;
        println!("Deleted {}", site_path.display());
    }

    Ok(())
}

fn canonical(path: PathBuf) -> PathBuf {
    path.canonicalize().unwrap_or(path)
}

/// A source directory that deleting `site_path` would take with it.
fn source_inside(config: &Config, site_path: &Path) -> Option<PathBuf> {
    [config.content_dir(), config.templates_dir()]
        .into_iter()
        .map(canonical)
        .find(|dir| dir.starts_with(site_path))
}
