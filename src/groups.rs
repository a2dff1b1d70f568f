use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::types::{Error, Result};

/// Recognized naming convention for marker files: a fixed discriminating
/// suffix plus a delimited prefix of a fixed number of leading fields.
#[derive(Debug, Clone)]
pub struct GroupPattern {
    pub suffix: String,
    pub delimiter: char,
    pub prefix_fields: usize,
}

impl GroupPattern {
    pub fn new(suffix: &str) -> Option<Self> {
        if suffix.is_empty() {
            return None;
        }
        Some(GroupPattern {
            suffix: suffix.to_string(),
            delimiter: '_',
            prefix_fields: 3,
        })
    }

    /// Derive the shared group prefix from a marker filename, trailing
    /// delimiter included. The name must split into strictly more fields
    /// than the prefix consumes; a name of exactly `prefix_fields` fields
    /// would turn the whole name, suffix included, into a "prefix".
    pub fn prefix_of(&self, filename: &str) -> Result<String> {
        let fields: Vec<&str> = filename.split(self.delimiter).collect();
        if fields.len() <= self.prefix_fields {
            return Err(Error::MalformedFilename {
                filename: filename.to_string(),
                delimiter: self.delimiter,
                expected_fields: self.prefix_fields,
            });
        }
        let mut prefix = String::new();
        for field in &fields[..self.prefix_fields] {
            prefix.push_str(field);
            prefix.push(self.delimiter);
        }
        Ok(prefix)
    }
}

/// List the distinct group prefixes found in `input_dir`.
///
/// Every plain file whose name ends in the pattern's suffix is a marker
/// file. Marker names are visited in sorted order and duplicate prefixes
/// are collapsed, so the returned order is deterministic. No matching
/// files is not an error; the caller decides how loudly to report it.
pub fn extract_groups(input_dir: &Path, pattern: &GroupPattern) -> Result<Vec<String>> {
    let mut markers = Vec::new();
    let entries = fs::read_dir(input_dir).map_err(|e| Error::DirectoryAccess {
        path: input_dir.to_path_buf(),
        source: e,
    })?;
    for entry in entries {
        let entry = entry.map_err(|e| Error::DirectoryAccess {
            path: input_dir.to_path_buf(),
            source: e,
        })?;
        if !entry.path().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.ends_with(&pattern.suffix) {
            markers.push(name);
        }
    }
    markers.sort();

    let mut seen = HashSet::new();
    let mut prefixes = Vec::new();
    for marker in &markers {
        let prefix = pattern.prefix_of(marker)?;
        if seen.insert(prefix.clone()) {
            prefixes.push(prefix);
        }
    }
    Ok(prefixes)
}

#[cfg(test)]
mod tests {
    use assert_fs::prelude::*;
    use assert_fs::TempDir;

    use super::{extract_groups, GroupPattern};
    use crate::types::Error;

    fn pattern() -> GroupPattern {
        GroupPattern::new("_red.tif").unwrap()
    }

    #[test]
    fn rejects_empty_suffix() {
        assert!(GroupPattern::new("").is_none());
    }

    #[test]
    fn derives_prefix_from_marker_name() {
        let prefix = pattern().prefix_of("1234_A5_s2_red.tif").unwrap();
        assert_eq!(prefix, "1234_A5_s2_");
    }

    #[test]
    fn too_few_fields_is_malformed() {
        let err = pattern().prefix_of("AB_red.tif").unwrap_err();
        assert!(matches!(err, Error::MalformedFilename { .. }));
        // Exactly three fields is malformed too: the prefix would swallow
        // the suffix.
        let err = pattern().prefix_of("A_B_red.tif").unwrap_err();
        assert!(matches!(err, Error::MalformedFilename { .. }));
    }

    #[test]
    fn finds_distinct_groups_in_sorted_order() {
        let dir = TempDir::new().unwrap();
        dir.child("S2_X_Y_red.tif").touch().unwrap();
        dir.child("S1_A_B_red.tif").touch().unwrap();
        dir.child("S1_A_B_green.tif").touch().unwrap();
        dir.child("S1_A_B_blue.tif").touch().unwrap();

        let groups = extract_groups(dir.path(), &pattern()).unwrap();
        assert_eq!(groups, vec!["S1_A_B_".to_string(), "S2_X_Y_".to_string()]);
    }

    #[test]
    fn duplicate_markers_collapse_to_one_group() {
        let dir = TempDir::new().unwrap();
        dir.child("S1_A_B_1_red.tif").touch().unwrap();
        dir.child("S1_A_B_2_red.tif").touch().unwrap();

        let groups = extract_groups(dir.path(), &pattern()).unwrap();
        assert_eq!(groups, vec!["S1_A_B_".to_string()]);
    }

    #[test]
    fn no_matches_yields_empty_list() {
        let dir = TempDir::new().unwrap();
        dir.child("notes.txt").touch().unwrap();

        let groups = extract_groups(dir.path(), &pattern()).unwrap();
        assert!(groups.is_empty());
    }

    #[test]
    fn missing_directory_is_an_access_error() {
        let err = extract_groups(std::path::Path::new("no/such/dir"), &pattern()).unwrap_err();
        assert!(matches!(err, Error::DirectoryAccess { .. }));
    }
}
