use std::path::{Path, PathBuf};

use chrono::Local;

pub const DEFAULT_SUFFIX: &str = "_red.tif";
pub const DEFAULT_TOKEN_LENGTH: usize = 10;

/// Mapping file for an output directory, relative to the working directory.
pub fn mapping_file(output_dir: &Path) -> PathBuf {
    let base = output_dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    PathBuf::from(format!("mastertranslate_{}", base))
}

/// Date stamp appended to every generated prefix.
pub fn date_stamp() -> String {
    Local::now().format("%Y%m%d").to_string()
}
