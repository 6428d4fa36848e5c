//! Batch run with progress tracking, summary table and optional report.

use std::fs::File;
use std::io::{self, BufWriter};
use std::path::Path;

use anyhow::Context;
use vignette_core::{
    BuildSummary, DiscoveredFile, FailedFile, FileDiscovery, ProcessOptions, ReportFormat,
    ReportWriter, Vignette,
};

use super::BuildArgs;

/// Build the gallery for `files`, reporting progress on stderr.
pub fn run_batch(
    vignette: &Vignette,
    files: &[DiscoveredFile],
    options: &ProcessOptions,
    args: &BuildArgs,
) -> anyhow::Result<BuildSummary> {
    let mut report = match &args.report {
        Some(path) => Some(open_report(path, args.report_format.into())?),
        None => None,
    };
    let mut report_error: Option<io::Error> = None;

    let progress = create_progress_bar(files.len() as u64);
    let total_bytes = FileDiscovery::total_size(files);

    let summary = vignette.build_files(files, options, |file, result| {
        progress.set_message(display_name(&file.path));
        progress.inc(1);

        if let Some(writer) = report.as_mut() {
            let written = match result {
                Ok(thumbnail) => writer.processed(thumbnail),
                Err(e) => writer.failed(&FailedFile::new(&file.path, e)),
            };
            if let Err(e) = written {
                report_error.get_or_insert(e);
            }
        }
    })?;

    progress.finish_with_message("done");

    if let Some(e) = report_error {
        return Err(e).context("Failed to write report");
    }
    if let (Some(writer), Some(path)) = (report, &args.report) {
        let records = writer.records_written();
        writer.finish().context("Failed to write report")?;
        tracing::info!("Report with {} record(s) written to {:?}", records, path);
    }

    print_summary(&summary, total_bytes);
    for failure in &summary.failures {
        eprintln!("    [{}] {}", failure.stage, failure.message);
    }

    Ok(summary)
}

fn open_report(path: &Path, format: ReportFormat) -> anyhow::Result<ReportWriter<BufWriter<File>>> {
    let file = File::create(path).with_context(|| format!("Cannot create report {path:?}"))?;
    Ok(ReportWriter::new(BufWriter::new(file), format))
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Create a styled progress bar for batch processing.
fn create_progress_bar(total: u64) -> indicatif::ProgressBar {
    use indicatif::{ProgressBar, ProgressStyle};

    let pb = ProgressBar::new(total);
    let style = ProgressStyle::default_bar()
        .template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("##-");
    pb.set_style(style);
    pb.set_message("starting...");
    pb
}

/// Print a formatted summary table after the build.
fn print_summary(summary: &BuildSummary, total_bytes: u64) {
    let elapsed = summary.elapsed.as_secs_f64();
    let mb_read = total_bytes as f64 / 1_000_000.0;
    let throughput = if elapsed > 0.0 { mb_read / elapsed } else { 0.0 };
    let written = summary.succeeded() - summary.skipped();

    eprintln!();
    eprintln!("  ====================================");
    eprintln!("               Summary");
    eprintln!("  ====================================");
    eprintln!("    Thumbnails:   {:>8}", written);
    if summary.skipped() > 0 {
        eprintln!("    Reused:       {:>8}", summary.skipped());
    }
    if summary.failed() > 0 {
        eprintln!("    Failed:       {:>8}", summary.failed());
    }
    eprintln!("  ------------------------------------");
    eprintln!("    Total:        {:>8}", summary.succeeded() + summary.failed());
    eprintln!("    Duration:     {:>7.1}s", elapsed);
    eprintln!("    Rate:         {:>7.1} img/sec", summary.rate());
    eprintln!("    Throughput:   {:>7.1} MB/sec", throughput);
    eprintln!("  ====================================");
}
