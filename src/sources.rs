//! Source management command runners.
//!
//! `sentinel sources list|add|rm` — the CLI surface over
//! [`SourceRegistry`]. Uploads are strictly sequential: each file is
//! awaited before the next one starts, and a per-file failure is reported
//! and skipped rather than aborting the batch.

use anyhow::{bail, Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::api::HttpBackend;
use crate::config::Config;
use crate::registry::SourceRegistry;

pub async fn run_sources_list(config: &Config) -> Result<()> {
    let api = HttpBackend::new(config)?;
    let mut registry = SourceRegistry::new();

    registry.refresh(&api).await;
    if let Some(error) = registry.error() {
        eprintln!("Error: {}", error);
        std::process::exit(1);
    }

    if registry.sources().is_empty() {
        println!("No sources uploaded yet.");
        return Ok(());
    }

    println!("{:<28} {:>10}  PATH", "NAME", "SIZE");
    for source in registry.sources() {
        println!(
            "{:<28} {:>10}  {}",
            source.name,
            human_size(source.size),
            source.path
        );
    }

    Ok(())
}

pub async fn run_sources_add(
    config: &Config,
    paths: &[PathBuf],
    include: Option<&str>,
) -> Result<()> {
    let api = HttpBackend::new(config)?;
    let mut registry = SourceRegistry::new();

    let files = collect_files(config, paths, include)?;
    if files.is_empty() {
        bail!("No files matched");
    }

    let max_bytes = config.upload.max_file_size_mb * 1024 * 1024;
    let mut uploaded = 0usize;
    let mut failed = 0usize;

    // One at a time, each awaited before the next.
    for file in &files {
        let size = std::fs::metadata(file)
            .with_context(|| format!("Failed to stat: {}", file.display()))?
            .len();
        if size > max_bytes {
            eprintln!(
                "  skip {} ({} exceeds {} MB limit)",
                file.display(),
                human_size(size),
                config.upload.max_file_size_mb
            );
            failed += 1;
            continue;
        }

        match registry.upload(&api, file).await {
            Ok(()) => {
                println!("  ok   {}", file.display());
                uploaded += 1;
            }
            Err(e) => {
                eprintln!("  fail {}: {}", file.display(), e);
                failed += 1;
            }
        }
    }

    println!("{} uploaded, {} failed", uploaded, failed);
    if failed > 0 {
        std::process::exit(1);
    }
    Ok(())
}

pub async fn run_sources_rm(config: &Config, path: &str) -> Result<()> {
    let api = HttpBackend::new(config)?;
    let mut registry = SourceRegistry::new();

    match registry.remove(&api, path).await {
        Ok(()) => {
            println!("Removed {}", path);
            Ok(())
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Expand the argument list into concrete files.
///
/// Plain files are taken as-is. Directories are walked and filtered through
/// the include globs (`--include` overrides the configured set). The result
/// is sorted so batches run in a stable order.
fn collect_files(config: &Config, paths: &[PathBuf], include: Option<&str>) -> Result<Vec<PathBuf>> {
    let globs = build_globset(config, include)?;
    let mut files = Vec::new();

    for path in paths {
        if path.is_file() {
            files.push(path.clone());
        } else if path.is_dir() {
            for entry in WalkDir::new(path).follow_links(false) {
                let entry = entry?;
                if !entry.file_type().is_file() {
                    continue;
                }
                let rel = entry.path().strip_prefix(path).unwrap_or(entry.path());
                if globs.is_match(rel) {
                    files.push(entry.path().to_path_buf());
                }
            }
        } else {
            bail!("No such file or directory: {}", path.display());
        }
    }

    files.sort();
    files.dedup();
    Ok(files)
}

fn build_globset(config: &Config, include: Option<&str>) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    match include {
        Some(pattern) => {
            builder.add(Glob::new(pattern).with_context(|| format!("Invalid glob: {}", pattern))?);
        }
        None => {
            for pattern in &config.upload.include_globs {
                builder.add(
                    Glob::new(pattern).with_context(|| format!("Invalid glob: {}", pattern))?,
                );
            }
        }
    }
    Ok(builder.build()?)
}

fn human_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.1} {}", size, UNITS[unit])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use std::fs;

    #[test]
    fn test_human_size() {
        assert_eq!(human_size(0), "0 B");
        assert_eq!(human_size(512), "512 B");
        assert_eq!(human_size(2048), "2.0 KB");
        assert_eq!(human_size(5 * 1024 * 1024), "5.0 MB");
    }

    #[test]
    fn test_collect_files_plain_file_ignores_globs() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("notes.rst");
        fs::write(&file, "x").unwrap();

        let cfg = Config::minimal();
        let files = collect_files(&cfg, &[file.clone()], None).unwrap();
        assert_eq!(files, vec![file]);
    }

    #[test]
    fn test_collect_files_directory_filtered_and_sorted() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.md"), "x").unwrap();
        fs::write(dir.path().join("a.md"), "x").unwrap();
        fs::write(dir.path().join("skip.rs"), "x").unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub/c.txt"), "x").unwrap();

        let cfg = Config::minimal();
        let files = collect_files(&cfg, &[dir.path().to_path_buf()], None).unwrap();
        let names: Vec<String> = files
            .iter()
            .map(|f| {
                f.strip_prefix(dir.path())
                    .unwrap()
                    .to_string_lossy()
                    .to_string()
            })
            .collect();
        assert_eq!(names, vec!["a.md", "b.md", "sub/c.txt"]);
    }

    #[test]
    fn test_collect_files_include_override() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.md"), "x").unwrap();
        fs::write(dir.path().join("b.rs"), "x").unwrap();

        let cfg = Config::minimal();
        let files = collect_files(&cfg, &[dir.path().to_path_buf()], Some("*.rs")).unwrap();
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("b.rs"));
    }

    #[test]
    fn test_collect_files_missing_path_errors() {
        let cfg = Config::minimal();
        let err = collect_files(&cfg, &[PathBuf::from("/no/such/thing")], None).unwrap_err();
        assert!(err.to_string().contains("No such file"));
    }

    #[test]
    fn test_build_globset_rejects_bad_pattern() {
        let cfg = Config::minimal();
        assert!(build_globset(&cfg, Some("a{")).is_err());
    }
}
