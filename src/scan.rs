use std::fs;
use std::io;
use std::path::Path;

use anyhow::Context;
use log::{debug, warn};

use crate::config::Config;
use crate::media::{MediaFile, MediaKind};
use crate::rename;

/// Outcome of one format pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PassSummary {
    pub kind: MediaKind,
    pub renamed: usize,
}

impl PassSummary {
    pub fn line(&self) -> String {
        summary_line(self.kind, self.renamed)
    }
}

/// `N <label> files are renamed.`
pub fn summary_line(kind: MediaKind, renamed: usize) -> String {
    format!("{} {} files are renamed.", renamed, kind.label())
}

/// Entry names of `dir`, sorted. Names that are not valid UTF-8 are skipped.
pub fn list_entries(dir: &Path) -> io::Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        match entry.file_name().into_string() {
            Ok(name) => names.push(name),
            Err(raw) => warn!("Skipping non UTF-8 name {:?}", raw),
        }
    }
    names.sort();
    Ok(names)
}

/// Lowercase every entry name. Must run before the format passes.
pub fn normalize_case(dir: &Path) -> io::Result<usize> {
    let plan = rename::plan_lowercase(&list_entries(dir)?);
    rename::apply_case_plan(dir, &plan)?;
    Ok(plan.len())
}

/// Rename every file of one kind, returning how many were renamed.
pub fn process_pass(config: &Config, kind: MediaKind) -> anyhow::Result<usize> {
    let dir = config.directory.as_path();
    let mut renamed = 0;

    for name in list_entries(dir)? {
        let Some(file) = MediaFile::from_entry(dir, &name) else {
            continue;
        };
        if file.kind != kind || !file.path.is_file() {
            continue;
        }

        let timestamp = kind
            .extract(&file.path, config)
            .with_context(|| format!("Failed to read {}", file.path.display()))?;
        let Some(timestamp) = timestamp else {
            debug!("No timestamp in {}, skipping", name);
            continue;
        };

        let new_name = rename::rename_media(dir, &file, &timestamp)
            .with_context(|| format!("Failed to rename {}", file.path.display()))?;
        if new_name.is_some() {
            renamed += 1;
        }
    }

    Ok(renamed)
}

/// Lowercase pass, then one pass per media kind.
pub fn run(config: &Config) -> anyhow::Result<Vec<PassSummary>> {
    let dir = &config.directory;
    let lowered = normalize_case(dir)
        .with_context(|| format!("Failed to lowercase names in {}", dir.display()))?;
    debug!("Lowercased {} names", lowered);

    let mut summaries = Vec::with_capacity(MediaKind::PASSES.len());
    for kind in MediaKind::PASSES {
        let summary = PassSummary {
            kind,
            renamed: process_pass(config, kind)?,
        };
        println!("{}\n", summary.line());
        summaries.push(summary);
    }
    Ok(summaries)
}
