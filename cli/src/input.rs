//! Input file loading and identifier validation.

use std::path::Path;

use anyhow::{bail, Context};
use certscan_core::CertId;

/// Load certificate IDs from a text file, one per line.
///
/// Blank lines are skipped. A malformed identifier anywhere in the file is
/// an error; nothing is silently dropped.
pub fn load_cert_ids(path: &Path) -> anyhow::Result<Vec<CertId>> {
    if !path.exists() {
        bail!("Input file not found: {}", path.display());
    }

    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read input file: {}", path.display()))?;

    let mut cert_ids = Vec::new();
    for (line_number, line) in raw.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let cert_id = CertId::new(trimmed).with_context(|| {
            format!(
                "Invalid certificate ID on line {} of {}",
                line_number + 1,
                path.display()
            )
        })?;
        cert_ids.push(cert_id);
    }

    if cert_ids.is_empty() {
        bail!("No certificate IDs found in {}", path.display());
    }

    Ok(cert_ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_input(content: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("certs.txt");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        (dir, path)
    }

    #[test]
    fn test_loads_ids_and_skips_blank_lines() {
        let (_dir, path) = write_input("27002504\n\n  \n27002505\n");
        let ids = load_cert_ids(&path).unwrap();
        assert_eq!(ids.len(), 2);
        assert_eq!(ids[0].as_str(), "27002504");
        assert_eq!(ids[1].as_str(), "27002505");
    }

    #[test]
    fn test_trims_surrounding_whitespace() {
        let (_dir, path) = write_input("  27002504  \n");
        let ids = load_cert_ids(&path).unwrap();
        assert_eq!(ids[0].as_str(), "27002504");
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_cert_ids(&dir.path().join("absent.txt")).unwrap_err();
        assert!(err.to_string().contains("Input file not found"));
    }

    #[test]
    fn test_empty_file() {
        let (_dir, path) = write_input("\n\n");
        let err = load_cert_ids(&path).unwrap_err();
        assert!(err.to_string().contains("No certificate IDs found"));
    }

    #[test]
    fn test_malformed_id_reports_line_number() {
        let (_dir, path) = write_input("27002504\nnot a cert id\n");
        let err = load_cert_ids(&path).unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }
}
