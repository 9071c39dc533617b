use crate::checkin;
use crate::cli::CommonArgs;
use crate::model::{AttendanceReport, StatsOutput, UserLine, SCHEMA_VERSION};
use anyhow::{Context, Result};
use console::style;
use std::path::Path;

pub fn exec(common: &CommonArgs, json: bool, ndjson: bool) -> Result<()> {
    let source = common.open_source()?;
    let report = checkin::run(source.as_ref(), &common.engine_config())
        .context("Failed to read commit history")?;

    if json {
        output_json(&report, source.path())?;
    } else if ndjson {
        output_ndjson(&report)?;
    } else {
        output_table(&report)?;
    }

    Ok(())
}

pub fn stats_output(report: &AttendanceReport, repo_path: &Path) -> StatsOutput {
    StatsOutput {
        version: SCHEMA_VERSION,
        repository_path: repo_path.to_string_lossy().to_string(),
        commits_scanned: report.commits_scanned,
        users: report.user_stats.clone(),
        daily_counts: report.daily_counts.clone(),
        duplicates: report.duplicates.clone(),
    }
}

fn output_json(report: &AttendanceReport, repo_path: &Path) -> Result<()> {
    let output = stats_output(report, repo_path);
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn output_ndjson(report: &AttendanceReport) -> Result<()> {
    for (user, stat) in &report.user_stats {
        let line = UserLine {
            user: user.clone(),
            stat: stat.clone(),
        };
        println!("{}", serde_json::to_string(&line)?);
    }
    Ok(())
}

fn output_table(report: &AttendanceReport) -> Result<()> {
    if report.user_stats.is_empty() {
        println!("No check-ins found");
        return Ok(());
    }

    let width = report
        .user_stats
        .keys()
        .map(|u| u.chars().count())
        .max()
        .unwrap_or(4)
        .max(4);

    println!("{}", style("Attendance Statistics").bold());
    println!("{}", "─".repeat(width + 52));
    println!(
        "{:<width$}  {:>6}  {:<10}  {:<10}  {:>7}  {:>7}",
        "User", "Total", "First", "Last", "Current", "Longest"
    );

    for (user, stat) in &report.user_stats {
        println!(
            "{:<width$}  {:>6}  {:<10}  {:<10}  {:>7}  {:>7}",
            user,
            style(stat.total_check_ins).cyan(),
            stat.first_date,
            stat.last_date,
            style(stat.current_streak_length).green(),
            style(stat.longest_streak_length).yellow(),
        );
    }

    if !report.duplicates.is_empty() {
        println!(
            "\n{} duplicate check-in(s) ignored",
            style(report.duplicates.len()).yellow()
        );
    }

    Ok(())
}
