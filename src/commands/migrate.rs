use scribe::migrate;

use crate::MigrateArgs;

pub async fn run(args: &MigrateArgs) -> Result<(), anyhow::Error> {
    println!("Migrating {} into {}", args.url, args.dest.display());

    let report = migrate::migrate(&args.url, &args.dest).await?;

    println!(
        "Migrated {} post(s) and {} media file(s) ({} files written)",
        report.posts,
        report.media,
        report.files.len()
    );

    Ok(())
}
