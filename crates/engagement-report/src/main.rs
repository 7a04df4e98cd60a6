mod bootstrap;

use anyhow::{Context, Result};
use engagement_core::settings::Settings;
use engagement_data::analysis::analyze_sources;
use engagement_render::render_report;

fn main() -> Result<()> {
    let settings = Settings::load();

    bootstrap::setup_logging(&settings.log_level)?;
    bootstrap::ensure_output_dir(&settings.output_dir)
        .with_context(|| format!("creating {}", settings.output_dir.display()))?;

    tracing::info!("Engagement report v{} starting", env!("CARGO_PKG_VERSION"));

    let sources = settings.source_paths();
    let outputs = settings.output_paths();
    tracing::debug!("Sources: {:?}", sources);
    tracing::debug!("Outputs: {:?}", outputs);

    let analysis = analyze_sources(&sources)?;
    let meta = &analysis.metadata;
    if let (Some(mean), Some(std_dev)) = (meta.comment_stats.mean, meta.comment_stats.std_dev) {
        tracing::info!("Comments per post: mean {:.4}, std {:.4}", mean, std_dev);
    }

    render_report(&analysis, &outputs)?;

    tracing::info!(
        "Done in {:.3}s of analysis: {} overperforming posts",
        meta.transform_time_seconds,
        meta.overperforming_posts
    );
    Ok(())
}
