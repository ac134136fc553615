mod config;
mod date;
mod error;
#[cfg(test)]
mod fixtures;
mod media;
mod rename;
mod scan;

use std::path::PathBuf;

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "media-rename",
    version,
    about = "Rename photos and videos to their capture timestamp"
)]
struct Cli {
    /// Directory holding the media files
    #[arg(default_value = ".")]
    directory: PathBuf,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let t_total = std::time::Instant::now();

    let config = config::Config::new(&cli.directory)?;
    let summaries = scan::run(&config)?;

    for summary in &summaries {
        log::debug!("{}: {} renamed", summary.kind.label(), summary.renamed);
    }
    let renamed: usize = summaries.iter().map(|s| s.renamed).sum();
    log::info!("Renamed {} files in {:.2}s", renamed, t_total.elapsed().as_secs_f64());
    Ok(())
}
