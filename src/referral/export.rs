use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use super::ReferralError;

static WHITESPACE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Derive the artifact filename from the patient name.
///
/// Whitespace runs collapse to single hyphens and the result is lowercased;
/// every other character passes through untouched.
pub fn referral_filename(patient_name: &str) -> String {
    let slug = WHITESPACE_RUN
        .replace_all(patient_name, "-")
        .to_lowercase();
    format!("{slug}-dermatology-referral.pdf")
}

/// Write a rendered artifact into `dir`, creating the directory if needed.
pub fn write_artifact(bytes: &[u8], filename: &str, dir: &Path) -> Result<PathBuf, ReferralError> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(filename);
    std::fs::write(&path, bytes)?;
    Ok(path)
}
