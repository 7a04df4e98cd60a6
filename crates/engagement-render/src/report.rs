//! Assembles the charts, narrative and results table into the final report.

use engagement_core::settings::OutputPaths;
use engagement_core::Result;
use engagement_data::analysis::AnalysisResult;
use tracing::info;

use crate::charts::{render_hourly_engagement, render_top_commenters};
use crate::document::{Block, RenderSummary, ReportDocument};
use crate::narrative::*;
use crate::results_table::ResultsTable;

const SECTION_GAP: f32 = 12.0;

/// Draw both charts and write the PDF report to the paths in `outputs`.
pub fn render_report(analysis: &AnalysisResult, outputs: &OutputPaths) -> Result<RenderSummary> {
    render_top_commenters(&outputs.top_chart, &analysis.top_commenters)?;
    info!("Top commenters chart saved to {}", outputs.top_chart.display());

    render_hourly_engagement(&outputs.hourly_chart, &analysis.hourly)?;
    info!("Hourly chart saved to {}", outputs.hourly_chart.display());

    let table = ResultsTable::from_posts(&analysis.posts);
    let summary = build_document(outputs, table).save(&outputs.report)?;
    info!(
        "Report saved to {} ({} pages, {} rows)",
        outputs.report.display(),
        summary.pages,
        summary.table_rows
    );
    Ok(summary)
}

/// The report layout: title, the two chart sections, then the results table.
pub fn build_document(outputs: &OutputPaths, table: ResultsTable) -> ReportDocument {
    let mut doc = ReportDocument::new(REPORT_TITLE);
    doc.push(Block::Title(REPORT_TITLE.to_string()))
        .push(Block::Spacer(SECTION_GAP))
        .push(Block::Heading(TOP_COMMENTERS_HEADING.to_string()))
        .push(Block::Paragraph(TOP_COMMENTERS_TEXT.to_string()))
        .push(Block::Spacer(SECTION_GAP))
        .push(Block::Image(outputs.top_chart.clone()))
        .push(Block::Heading(HOURLY_HEADING.to_string()))
        .push(Block::Paragraph(HOURLY_TEXT.to_string()))
        .push(Block::Spacer(SECTION_GAP))
        .push(Block::Image(outputs.hourly_chart.clone()))
        .push(Block::Heading(RESULTS_HEADING.to_string()))
        .push(Block::Paragraph(Z_SCORE_TEXT.to_string()))
        .push(Block::Paragraph(INTERACTION_TEXT.to_string()))
        .push(Block::Spacer(SECTION_GAP))
        .push(Block::Table(table))
        .push(Block::PageBreak);
    doc
}

// ── Tests ──────────────────────────────────────────────────────────────────────
