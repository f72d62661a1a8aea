//! Input handling for file reading and stdin support.

use anyhow::{Context, Result};
use std::io::{self, Read};
use std::path::PathBuf;

/// Read the SQL statement from files or stdin.
///
/// If no files are provided, reads from stdin. Multiple files are
/// concatenated; the extractor treats the result as one statement.
pub fn read_input(files: &[PathBuf]) -> Result<String> {
    if files.is_empty() {
        read_from_stdin()
    } else {
        read_from_files(files)
    }
}

fn read_from_stdin() -> Result<String> {
    let mut content = String::new();
    io::stdin()
        .read_to_string(&mut content)
        .context("Failed to read from stdin")?;
    Ok(content)
}

fn read_from_files(files: &[PathBuf]) -> Result<String> {
    let contents = files
        .iter()
        .map(|path| {
            std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read file: {}", path.display()))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(contents.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_read_single_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "SELECT * FROM users").unwrap();

        let sql = read_from_files(&[file.path().to_path_buf()]).unwrap();
        assert!(sql.contains("SELECT * FROM users"));
    }

    #[test]
    fn test_multiple_files_concatenate() {
        let mut file1 = NamedTempFile::new().unwrap();
        let mut file2 = NamedTempFile::new().unwrap();
        write!(file1, "SELECT id").unwrap();
        write!(file2, "FROM users").unwrap();

        let sql =
            read_from_files(&[file1.path().to_path_buf(), file2.path().to_path_buf()]).unwrap();
        assert_eq!(sql, "SELECT id\nFROM users");
    }

    #[test]
    fn test_read_missing_file() {
        let result = read_from_files(&[PathBuf::from("/nonexistent/file.sql")]);
        assert!(result.is_err());
    }
}
