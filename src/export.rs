//! Artifact writers and the `aggregate` command.

use crate::checkin;
use crate::cli::CommonArgs;
use crate::error::{AttendError, Result};
use crate::heat::{heatmap_for, render_svg, HeatmapOptions};
use crate::model::{AttendanceRecord, AttendanceReport, DailyCounts, DuplicateRecord, UserStats};
use crate::util::{csv_row, short_hash};
use anyhow::Context;
use console::style;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{error, info};

pub const ATTENDANCE_CSV: &str = "attendance.csv";
pub const DAILY_COUNTS_JSON: &str = "daily_counts.json";
pub const PER_USER_JSON: &str = "per_user.json";
pub const DUPLICATES_CSV: &str = "duplicates.csv";
pub const HEATMAP_SVG: &str = "heatmap.svg";

pub fn attendance_csv(records: &[AttendanceRecord]) -> String {
    let mut rows: Vec<&AttendanceRecord> = records.iter().collect();
    rows.sort_by(|a, b| {
        (a.event.date, &a.event.user, &a.event.commit_hash).cmp(&(
            b.event.date,
            &b.event.user,
            &b.event.commit_hash,
        ))
    });

    let mut out = csv_row(&["date", "user", "commitHash"]);
    for r in rows {
        let date = r.event.date.to_string();
        out.push_str(&csv_row(&[
            date.as_str(),
            r.event.user.as_str(),
            r.event.commit_hash.as_str(),
        ]));
    }
    out
}

/// Rows keep the order produced by deduplication.
pub fn duplicates_csv(duplicates: &[DuplicateRecord]) -> String {
    let mut out = csv_row(&["date", "user", "rejectedCommitHash", "canonicalCommitHash"]);
    for d in duplicates {
        let date = d.date.to_string();
        out.push_str(&csv_row(&[
            date.as_str(),
            d.user.as_str(),
            d.rejected_commit_hash.as_str(),
            d.canonical_commit_hash.as_str(),
        ]));
    }
    out
}

pub fn daily_counts_json(counts: &DailyCounts) -> Result<String> {
    let mut json = serde_json::to_string_pretty(counts)?;
    json.push('\n');
    Ok(json)
}

pub fn per_user_json(stats: &UserStats) -> Result<String> {
    let mut json = serde_json::to_string_pretty(stats)?;
    json.push('\n');
    Ok(json)
}

/// Write to a temp file next to `path`, then rename over it, so a reader
/// never sees a half-written artifact.
pub fn write_atomic(path: &Path, contents: &str) -> std::io::Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(contents.as_bytes())?;
    tmp.as_file().sync_all()?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        tmp.as_file()
            .set_permissions(std::fs::Permissions::from_mode(0o644))?;
    }

    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[derive(Debug, Clone)]
pub struct ArtifactDirs {
    pub data: PathBuf,
    pub assets: PathBuf,
}

impl ArtifactDirs {
    pub fn under(root: &Path) -> Self {
        Self {
            data: root.join("data"),
            assets: root.join("assets"),
        }
    }
}

/// Render and write every artifact. Each one is attempted regardless of
/// earlier failures; failures are reported together at the end.
pub fn write_artifacts(
    report: &AttendanceReport,
    svg: &str,
    dirs: &ArtifactDirs,
) -> Result<Vec<PathBuf>> {
    let rendered: Vec<(PathBuf, Result<String>)> = vec![
        (dirs.data.join(ATTENDANCE_CSV), Ok(attendance_csv(&report.records))),
        (dirs.data.join(DAILY_COUNTS_JSON), daily_counts_json(&report.daily_counts)),
        (dirs.data.join(PER_USER_JSON), per_user_json(&report.user_stats)),
        (dirs.data.join(DUPLICATES_CSV), Ok(duplicates_csv(&report.duplicates))),
        (dirs.assets.join(HEATMAP_SVG), Ok(svg.to_string())),
    ];

    let mut written = Vec::new();
    let mut failed = Vec::new();
    for (path, contents) in rendered {
        let outcome = contents.and_then(|c| {
            write_atomic(&path, &c).map_err(|source| AttendError::Artifact {
                name: path.display().to_string(),
                source,
            })
        });
        match outcome {
            Ok(()) => {
                info!(path = %path.display(), "artifact written");
                written.push(path);
            }
            Err(e) => {
                error!(path = %path.display(), error = %e, "artifact not written");
                failed.push(path.display().to_string());
            }
        }
    }

    if failed.is_empty() {
        Ok(written)
    } else {
        Err(AttendError::Artifacts(failed))
    }
}

/// `::warning::` lines understood by GitHub Actions.
pub fn github_annotations(duplicates: &[DuplicateRecord]) -> Vec<String> {
    duplicates
        .iter()
        .map(|d| {
            format!(
                "::warning::Duplicate check-in {} {} ({})",
                d.date,
                d.user,
                short_hash(&d.rejected_commit_hash)
            )
        })
        .collect()
}

pub fn exec(
    common: &CommonArgs,
    data_dir: Option<PathBuf>,
    assets_dir: Option<PathBuf>,
    annotations: bool,
    heat: HeatmapOptions,
) -> anyhow::Result<()> {
    let source = common.open_source()?;
    let report = checkin::run(source.as_ref(), &common.engine_config())
        .context("Failed to read commit history")?;

    if annotations {
        for line in github_annotations(&report.duplicates) {
            println!("{line}");
        }
    }

    let grid = heatmap_for(&report, &heat, common.today());
    let svg = render_svg(&grid).context("Failed to render heatmap")?;

    let defaults = ArtifactDirs::under(source.path());
    let dirs = ArtifactDirs {
        data: data_dir.unwrap_or(defaults.data),
        assets: assets_dir.unwrap_or(defaults.assets),
    };

    let written = write_artifacts(&report, &svg, &dirs).context("Failed to write artifacts")?;
    output_summary(&report, &written);
    Ok(())
}

fn output_summary(report: &AttendanceReport, written: &[PathBuf]) {
    println!("{}", style("Attendance Summary").bold());
    println!("{}", "─".repeat(50));
    println!("Commits scanned: {}", style(report.commits_scanned).cyan());
    println!("Check-ins: {}", style(report.check_ins).cyan());
    println!("Attendance records: {}", style(report.records.len()).green());
    println!("Duplicates: {}", style(report.duplicates.len()).yellow());
    println!("Participants: {}", style(report.user_stats.len()).cyan());
    for path in written {
        println!("  wrote {}", style(path.display()).dim());
    }
}
