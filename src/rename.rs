use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::Path;

use log::warn;

use crate::date::Timestamp;
use crate::media::MediaFile;

/// One entry of the lowercase pre-pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseRename {
    pub from: String,
    pub to: String,
}

/// Plan renaming every entry to its lowercase form.
///
/// Names whose lowercase form is already taken by another entry, or by an
/// earlier planned rename, are left alone.
pub fn plan_lowercase(names: &[String]) -> Vec<CaseRename> {
    let existing: HashSet<&str> = names.iter().map(String::as_str).collect();
    let mut claimed: HashSet<String> = HashSet::new();
    let mut plan = Vec::new();

    for name in names {
        let lower = name.to_lowercase();
        if lower == *name {
            continue;
        }
        if existing.contains(lower.as_str()) || claimed.contains(&lower) {
            warn!("Not lowercasing {:?}: {:?} already exists", name, lower);
            continue;
        }
        claimed.insert(lower.clone());
        plan.push(CaseRename {
            from: name.clone(),
            to: lower,
        });
    }
    plan
}

pub fn apply_case_plan(dir: &Path, plan: &[CaseRename]) -> io::Result<()> {
    for step in plan {
        fs::rename(dir.join(&step.from), dir.join(&step.to))?;
    }
    Ok(())
}

/// Rename `file` after its capture time.
///
/// Returns the new name, or `None` when the name already starts with the
/// timestamp. Taken names get a `-1`, `-2`, ... suffix.
pub fn rename_media(
    dir: &Path,
    file: &MediaFile,
    timestamp: &Timestamp,
) -> io::Result<Option<String>> {
    let stem = timestamp.format();
    if file.stem.starts_with(&stem) {
        return Ok(None);
    }

    let ext = file.ext.to_lowercase();
    let new_name = free_name(dir, &stem, &ext)?;
    fs::rename(&file.path, dir.join(&new_name))?;
    println!("{}", progress_line(&file.name(), &new_name));
    Ok(Some(new_name))
}

/// `old    =>    new`, both names padded to 35 columns.
pub fn progress_line(old: &str, new: &str) -> String {
    format!("{:>35}    =>    {:<35}", old, new)
}

/// First of `<stem><ext>`, `<stem>-1<ext>`, `<stem>-2<ext>`, ... not present in `dir`.
pub fn free_name(dir: &Path, stem: &str, ext: &str) -> io::Result<String> {
    let mut candidate = format!("{}{}", stem, ext);
    let mut counter = 1u32;
    while entry_exists(&dir.join(&candidate))? {
        candidate = format!("{}-{}{}", stem, counter, ext);
        counter += 1;
    }
    Ok(candidate)
}

/// Like `Path::try_exists`, but a dangling symlink counts as taken.
fn entry_exists(path: &Path) -> io::Result<bool> {
    match fs::symlink_metadata(path) {
        Ok(_) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}
