//! CLI command implementations.

use std::path::Path;

use crate::format::{LineLayout, RecordReader};
use crate::handle::{fs, LogHandle};
use crate::types::{LogOptions, LogResult, MessageLevel};

/// Append one message to a log file.
pub fn cmd_append(
    path: &Path,
    level: MessageLevel,
    text: &str,
    options: LogOptions,
    json: bool,
) -> LogResult<()> {
    let mut handle = LogHandle::open_with(path, options)?;
    let written = handle.add_message(level, text)?;
    handle.close()?;

    if json {
        println!(
            "{}",
            serde_json::json!({
                "file": path.display().to_string(),
                "level": level.value(),
                "written": written,
            })
        );
    } else if written {
        println!("Appended level {} message to {}", level, path.display());
    } else {
        println!("Level {} is above the threshold; nothing written", level);
    }
    Ok(())
}

/// Count the records in a log file.
pub fn cmd_count(path: &Path, json: bool) -> LogResult<()> {
    let count = RecordReader::count(path)?;
    let file_size = std::fs::metadata(path)?.len();

    if json {
        let info = serde_json::json!({
            "file": path.display().to_string(),
            "records": count,
            "file_size": file_size,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&info).unwrap_or_default()
        );
    } else {
        println!("File: {}", path.display());
        println!("Records: {}", count);
        println!("File size: {}", format_size(file_size));
    }
    Ok(())
}

/// Print the records of a log file, optionally filtered by level.
pub fn cmd_show(
    path: &Path,
    max_level: Option<MessageLevel>,
    limit: Option<usize>,
    layout: LineLayout,
    json: bool,
) -> LogResult<()> {
    let records: Vec<_> = RecordReader::read_from_file_as(path, layout)?
        .into_iter()
        .filter(|r| r.level.passes(max_level))
        .collect();
    let skip = limit.map_or(0, |n| records.len().saturating_sub(n));
    let shown = &records[skip..];

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(shown).unwrap_or_default()
        );
    } else {
        for record in shown {
            let label = record.level.name().unwrap_or("-");
            println!("[{:>8}] {}", label, record);
        }
    }
    Ok(())
}

/// Delete a log file if it is empty.
pub fn cmd_tidy(path: &Path, json: bool) -> LogResult<()> {
    let removed = fs::remove_if_empty(path)?;

    if json {
        println!(
            "{}",
            serde_json::json!({"file": path.display().to_string(), "removed": removed})
        );
    } else if removed {
        println!("Removed empty log {}", path.display());
    } else {
        println!("Kept {}", path.display());
    }
    Ok(())
}

/// Write the default configuration to a TOML file.
pub fn cmd_init_config(path: &Path) -> LogResult<()> {
    LogOptions::default().save(path)?;
    println!("Wrote default configuration to {}", path.display());
    Ok(())
}

fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}
