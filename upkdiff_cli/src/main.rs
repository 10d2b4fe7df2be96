use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use upkdiff_common::{load_config, Asset, DiffRecord, DiffStatus, Package};
use upkdiff_core::{parse_package, preview, DiffEngine, Preview};

#[derive(Parser)]
#[command(name = "upkdiff")]
#[command(author = "UpkDiff Contributors")]
#[command(version = "0.1.0")]
#[command(about = "Inspect and compare Unity .unitypackage archives", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the assets contained in a package
    List {
        /// Path to the .unitypackage file
        package: PathBuf,

        /// Only show assets in this category (images, scripts, ...)
        #[arg(short, long)]
        category: Option<String>,

        /// Output results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Compare two packages and report per-path differences
    Diff {
        /// Left (old) package path
        left: PathBuf,

        /// Right (new) package path
        right: PathBuf,

        /// Report added paths (default: all statuses)
        #[arg(long)]
        added: bool,

        /// Report removed paths (default: all statuses)
        #[arg(long)]
        removed: bool,

        /// Report modified paths (default: all statuses)
        #[arg(long)]
        modified: bool,

        /// Output results as JSON
        #[arg(long)]
        json: bool,

        /// Disable ANSI colors in output
        #[arg(long)]
        no_color: bool,
    },

    /// Print a preview of one asset inside a package
    Show {
        /// Path to the .unitypackage file
        package: PathBuf,

        /// Logical asset path inside the package
        path: String,

        /// Character budget for text previews
        #[arg(long)]
        max_chars: Option<usize>,
    },
}

fn main() {
    // Log to stderr so JSON output can go cleanly to stdout
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::List {
            package,
            category,
            json,
        } => run_list(package, category, json),
        Commands::Diff {
            left,
            right,
            added,
            removed,
            modified,
            json,
            no_color,
        } => run_diff(left, right, added, removed, modified, json, no_color),
        Commands::Show {
            package,
            path,
            max_chars,
        } => run_show(package, path, max_chars),
    };

    if let Err(e) = result {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

fn load_package(path: &Path) -> anyhow::Result<Package> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("failed to read package file: {}", path.display()))?;
    info!("Read {} bytes from {}", bytes.len(), path.display());

    let package = parse_package(&bytes)
        .with_context(|| format!("failed to parse package: {}", path.display()))?;
    info!("Parsed {} assets", package.len());
    Ok(package)
}

fn run_list(path: PathBuf, category: Option<String>, json: bool) -> anyhow::Result<()> {
    let package = load_package(&path)?;

    let mut paths = package.sorted_paths();
    if let Some(filter) = &category {
        paths.retain(|p| {
            package
                .get(p)
                .map(|asset| asset.kind.category.as_str() == filter)
                .unwrap_or(false)
        });
    }

    if json {
        let report = build_list_report(&path, &package, &paths);
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("\n{}", "=".repeat(80));
    println!("Package: {}", path.display());
    println!("{}", "=".repeat(80));
    println!("{:<48} {:>10} {:<12}", "Path", "Size", "Category");
    println!("{}", "-".repeat(80));

    for asset_path in &paths {
        if let Some(asset) = package.get(asset_path) {
            println!(
                "{:<48} {:>10} {:<12}",
                asset_path,
                format_bytes(asset.size),
                asset.kind.category
            );
        }
    }

    println!("{}", "-".repeat(80));
    println!("Total: {} assets", paths.len());
    Ok(())
}

fn run_diff(
    left: PathBuf,
    right: PathBuf,
    added: bool,
    removed: bool,
    modified: bool,
    json: bool,
    no_color: bool,
) -> anyhow::Result<()> {
    let left_package = load_package(&left)?;
    let right_package = load_package(&right)?;

    let loaded = load_config(false)?;
    let mut statuses = status_filter(added, removed, modified);
    if statuses.is_empty() {
        statuses = loaded.config.diff_statuses.clone();
    }

    let engine = DiffEngine::new().with_status_filter(statuses);
    let records = engine.compare(&left_package, &right_package);

    if json {
        let report = build_diff_report(&left, &right, &records);
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let use_color = !no_color && std::io::stdout().is_terminal();

    println!("\n{}", "=".repeat(80));
    println!("Package Differences");
    println!("{}", "=".repeat(80));

    let mut added_count = 0;
    let mut removed_count = 0;
    let mut modified_count = 0;

    for record in &records {
        match record.status {
            DiffStatus::Added => added_count += 1,
            DiffStatus::Removed => removed_count += 1,
            DiffStatus::Modified => modified_count += 1,
        }

        let (color, reset) = status_color(record.status, use_color);
        println!(
            "{}{}{} {} {}",
            color,
            status_symbol(record.status),
            reset,
            record.path,
            size_change(record)
        );
    }

    println!("\n{}", "=".repeat(80));
    println!("Summary:");
    println!("  Total entries:   {}", records.len());
    println!("  Added:           {}", added_count);
    println!("  Removed:         {}", removed_count);
    println!("  Modified:        {}", modified_count);
    println!("{}", "=".repeat(80));
    Ok(())
}

fn run_show(path: PathBuf, asset_path: String, max_chars: Option<usize>) -> anyhow::Result<()> {
    let package = load_package(&path)?;

    let asset = package
        .get(&asset_path)
        .with_context(|| format!("no asset at path '{}' in {}", asset_path, path.display()))?;

    let loaded = load_config(false)?;
    let budget = max_chars.unwrap_or(loaded.config.preview_max_chars);

    let result = preview(
        &asset.data,
        &asset.kind.mime_type,
        &asset.kind.extension,
        budget,
    );

    match result {
        Preview::Text { content } => println!("{content}"),
        Preview::Image { data_url } => println!("{data_url}"),
        Preview::Model { data, extension } => {
            println!("3D model ({}, {})", extension, format_bytes(data.len() as u64));
        }
        Preview::Binary { summary } => println!("{summary}"),
        Preview::Error { message } => anyhow::bail!("preview failed: {message}"),
    }
    Ok(())
}

fn status_filter(added: bool, removed: bool, modified: bool) -> Vec<DiffStatus> {
    let mut statuses = Vec::new();
    if added {
        statuses.push(DiffStatus::Added);
    }
    if removed {
        statuses.push(DiffStatus::Removed);
    }
    if modified {
        statuses.push(DiffStatus::Modified);
    }
    statuses
}

fn status_symbol(status: DiffStatus) -> &'static str {
    match status {
        DiffStatus::Added => "  ++  ",
        DiffStatus::Removed => "  --  ",
        DiffStatus::Modified => "  !=  ",
    }
}

fn status_color(status: DiffStatus, use_color: bool) -> (&'static str, &'static str) {
    if !use_color {
        return ("", "");
    }
    let color = match status {
        DiffStatus::Added => "\x1b[32m",    // Green
        DiffStatus::Removed => "\x1b[31m",  // Red
        DiffStatus::Modified => "\x1b[33m", // Yellow
    };
    (color, "\x1b[0m")
}

fn size_change(record: &DiffRecord<'_>) -> String {
    match record.status {
        DiffStatus::Added => format!("({})", format_bytes(record.size_right)),
        DiffStatus::Removed => format!("({})", format_bytes(record.size_left)),
        DiffStatus::Modified => format!(
            "({} -> {})",
            format_bytes(record.size_left),
            format_bytes(record.size_right)
        ),
    }
}

fn format_bytes(size: u64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;
    let size = size as f64;

    if size >= MB {
        format!("{:.2} MB", size / MB)
    } else if size >= KB {
        format!("{:.2} KB", size / KB)
    } else {
        format!("{} B", size as u64)
    }
}

#[derive(Serialize)]
struct ListReport {
    package: String,
    total: usize,
    assets: Vec<JsonAsset>,
}

#[derive(Serialize)]
struct JsonAsset {
    path: String,
    guid: String,
    size: u64,
    extension: String,
    mime_type: String,
    category: String,
}

#[derive(Serialize)]
struct DiffReport {
    left: String,
    right: String,
    summary: JsonSummary,
    entries: Vec<JsonEntry>,
}

#[derive(Serialize)]
struct JsonSummary {
    total: usize,
    added: usize,
    removed: usize,
    modified: usize,
}

#[derive(Serialize)]
struct JsonEntry {
    path: String,
    status: DiffStatus,
    size_left: u64,
    size_right: u64,
    guid_left: Option<String>,
    guid_right: Option<String>,
}

fn build_list_report(path: &Path, package: &Package, paths: &[&str]) -> ListReport {
    let assets = paths
        .iter()
        .filter_map(|p| package.get(p).map(|asset| json_asset(p, asset)))
        .collect::<Vec<_>>();

    ListReport {
        package: path.to_string_lossy().to_string(),
        total: assets.len(),
        assets,
    }
}

fn json_asset(path: &str, asset: &Asset) -> JsonAsset {
    JsonAsset {
        path: path.to_string(),
        guid: asset.guid.clone(),
        size: asset.size,
        extension: asset.kind.extension.clone(),
        mime_type: asset.kind.mime_type.clone(),
        category: asset.kind.category.to_string(),
    }
}

fn build_diff_report(left: &Path, right: &Path, records: &[DiffRecord<'_>]) -> DiffReport {
    let mut summary = JsonSummary {
        total: records.len(),
        added: 0,
        removed: 0,
        modified: 0,
    };

    let mut entries = Vec::new();
    for record in records {
        match record.status {
            DiffStatus::Added => summary.added += 1,
            DiffStatus::Removed => summary.removed += 1,
            DiffStatus::Modified => summary.modified += 1,
        }

        entries.push(JsonEntry {
            path: record.path.clone(),
            status: record.status,
            size_left: record.size_left,
            size_right: record.size_right,
            guid_left: record.left.map(|asset| asset.guid.clone()),
            guid_right: record.right.map(|asset| asset.guid.clone()),
        });
    }

    DiffReport {
        left: left.to_string_lossy().to_string(),
        right: right.to_string_lossy().to_string(),
        summary,
        entries,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use upkdiff_core::classify;

    fn asset(guid: &str, data: &[u8], path: &str) -> Asset {
        Asset {
            guid: guid.to_string(),
            size: data.len() as u64,
            data: data.to_vec(),
            kind: classify(path),
        }
    }

    fn package(entries: &[(&str, &str, &[u8])]) -> Package {
        let mut assets = HashMap::new();
        for (path, guid, data) in entries {
            assets.insert(path.to_string(), asset(guid, data, path));
        }
        Package::new(assets)
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(0), "0 B");
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(2048), "2.00 KB");
        assert_eq!(format_bytes(3 * 1024 * 1024), "3.00 MB");
    }

    #[test]
    fn test_status_filter_empty_means_all() {
        assert!(status_filter(false, false, false).is_empty());
        assert_eq!(
            status_filter(true, false, true),
            vec![DiffStatus::Added, DiffStatus::Modified]
        );
    }

    #[test]
    fn test_build_diff_report_counts() {
        let left = package(&[
            ("Assets/Gone.txt", "g1", b"abc"),
            ("Assets/Grown.bin", "g2", b"1234"),
        ]);
        let right = package(&[
            ("Assets/Grown.bin", "g2", b"12345678"),
            ("Assets/New.txt", "g3", b"xy"),
        ]);

        let records = DiffEngine::new().compare(&left, &right);
        let report = build_diff_report(Path::new("a.unitypackage"), Path::new("b.unitypackage"), &records);

        assert_eq!(report.summary.total, 3);
        assert_eq!(report.summary.added, 1);
        assert_eq!(report.summary.removed, 1);
        assert_eq!(report.summary.modified, 1);

        let added = report
            .entries
            .iter()
            .find(|e| matches!(e.status, DiffStatus::Added))
            .unwrap();
        assert_eq!(added.path, "Assets/New.txt");
        assert_eq!(added.size_left, 0);
        assert!(added.guid_left.is_none());
        assert_eq!(added.guid_right.as_deref(), Some("g3"));
    }

    #[test]
    fn test_build_list_report_sorted() {
        let pkg = package(&[
            ("Assets/B.txt", "g2", b"bb"),
            ("Assets/A.cs", "g1", b"a"),
        ]);
        let paths = pkg.sorted_paths();
        let report = build_list_report(Path::new("pkg.unitypackage"), &pkg, &paths);

        assert_eq!(report.total, 2);
        assert_eq!(report.assets[0].path, "Assets/A.cs");
        assert_eq!(report.assets[0].category, "scripts");
        assert_eq!(report.assets[1].path, "Assets/B.txt");
    }
}
