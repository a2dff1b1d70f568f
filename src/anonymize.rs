use std::fs;
use std::path::Path;

use crate::config::date_stamp;
use crate::groups::{extract_groups, GroupPattern};
use crate::mapping::{MappingRecord, MappingStore};
use crate::token::TokenSource;
use crate::types::{Error, Result};

/// What one pipeline run did, for reporting and tests.
#[derive(Debug, PartialEq, Eq)]
pub struct RunSummary {
    pub groups: usize,
    pub files_copied: usize,
}

/// Copy every sample group found in `input_dir` into `output_dir` under a
/// freshly generated prefix, recording each original/new prefix pair in
/// `store`.
///
/// Source files are never modified or deleted. The first failing copy
/// aborts the run; copies and mapping records made before the failure
/// stand, and each group's record is independent of the others.
pub fn anonymize(
    input_dir: &Path,
    output_dir: &Path,
    store: &MappingStore,
    pattern: &GroupPattern,
    tokens: &mut dyn TokenSource,
) -> Result<RunSummary> {
    if !input_dir.is_dir() {
        return Err(Error::DirectoryAccess {
            path: input_dir.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not a directory"),
        });
    }
    fs::create_dir_all(output_dir).map_err(|e| Error::DirectoryAccess {
        path: output_dir.to_path_buf(),
        source: e,
    })?;

    let prefixes = extract_groups(input_dir, pattern)?;

    let mut summary = RunSummary {
        groups: 0,
        files_copied: 0,
    };
    for prefix in &prefixes {
        summary.files_copied += anonymize_group(input_dir, output_dir, prefix, store, tokens)?;
        summary.groups += 1;
    }
    Ok(summary)
}

fn anonymize_group(
    input_dir: &Path,
    output_dir: &Path,
    prefix: &str,
    store: &MappingStore,
    tokens: &mut dyn TokenSource,
) -> Result<usize> {
    let new_prefix = fresh_prefix(store, tokens)?;
    store.append(&MappingRecord {
        original_prefix: prefix.to_string(),
        new_prefix: new_prefix.clone(),
    })?;

    let mut copied = 0;
    for name in sibling_files(input_dir, prefix)? {
        let remainder = &name[prefix.len()..];
        let source = input_dir.join(&name);
        let dest = output_dir.join(format!("{}_{}", new_prefix, remainder));
        fs::copy(&source, &dest).map_err(|e| Error::CopyFailure {
            group: prefix.to_string(),
            path: source.clone(),
            source: e,
        })?;
        copied += 1;
    }
    Ok(copied)
}

/// Generate `<token>_<date>`, retrying while the store already holds the
/// candidate. Two samples sharing a prefix would silently merge in the
/// output directory, so collisions are checked rather than assumed away.
fn fresh_prefix(store: &MappingStore, tokens: &mut dyn TokenSource) -> Result<String> {
    loop {
        let candidate = format!("{}_{}", tokens.token(), date_stamp());
        if !store.contains_new_prefix(&candidate)? {
            return Ok(candidate);
        }
    }
}

/// All files in `input_dir` whose name starts with `prefix`, sorted. This
/// is the full sibling set for a sample, not just its marker file.
fn sibling_files(input_dir: &Path, prefix: &str) -> Result<Vec<String>> {
    let entries = fs::read_dir(input_dir).map_err(|e| Error::DirectoryAccess {
        path: input_dir.to_path_buf(),
        source: e,
    })?;
    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| Error::DirectoryAccess {
            path: input_dir.to_path_buf(),
            source: e,
        })?;
        if !entry.path().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with(prefix) {
            names.push(name);
        }
    }
    names.sort();
    Ok(names)
}
