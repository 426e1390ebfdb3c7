use crate::tools::file_size::bytes_to_mb;
use log::{debug, warn};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// 掃描當下的檔案快照
#[derive(Debug, Clone, PartialEq)]
pub struct FileInfo {
    pub path: PathBuf,
    pub name: String,
    pub size_mb: f64,
}

/// 判斷檔案副檔名是否在清單中（不分大小寫，清單不含前導點）
#[must_use]
pub fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            extensions
                .iter()
                .any(|wanted| wanted.eq_ignore_ascii_case(ext))
        })
}

/// 遞迴掃描目錄下符合副檔名的檔案，依路徑排序
///
/// 目錄不存在時只記錄警告並回傳空清單
pub fn scan_files(directory: &Path, extensions: &[&str]) -> Vec<FileInfo> {
    if !directory.exists() {
        warn!("目錄不存在: {}", directory.display());
        return Vec::new();
    }

    let mut files: Vec<FileInfo> = WalkDir::new(directory)
        .follow_links(false)
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| has_extension(entry.path(), extensions))
        .filter_map(|entry| {
            let metadata = entry.metadata().ok()?;
            let name = entry.file_name().to_string_lossy().to_string();
            Some(FileInfo {
                path: entry.into_path(),
                name,
                size_mb: bytes_to_mb(metadata.len()),
            })
        })
        .collect();

    files.sort_by(|a, b| a.path.cmp(&b.path));
    debug!("{} 掃描到 {} 個檔案", directory.display(), files.len());
    files
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_scan_matching_files_sorted() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("b.pdf"), b"bbbb").unwrap();
        fs::write(temp_dir.path().join("a.PDF"), b"aa").unwrap();
        fs::write(temp_dir.path().join("notes.txt"), b"skip").unwrap();

        let files = scan_files(temp_dir.path(), &["pdf"]);

        assert_eq!(files.len(), 2);
        assert_eq!(files[0].name, "a.PDF");
        assert_eq!(files[1].name, "b.pdf");
    }

    #[test]
    fn test_scan_is_recursive() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("nested").join("deeper");
        fs::create_dir_all(&nested).unwrap();
        fs::write(nested.join("deep.pdf"), b"x").unwrap();

        let files = scan_files(temp_dir.path(), &["pdf"]);

        assert_eq!(files.len(), 1);
        assert_eq!(files[0].path, nested.join("deep.pdf"));
    }

    #[test]
    fn test_scan_only_non_matching_files() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("a.txt"), b"a").unwrap();
        fs::write(temp_dir.path().join("b.jpg"), b"b").unwrap();
        fs::write(temp_dir.path().join("pdf"), b"no extension").unwrap();

        assert!(scan_files(temp_dir.path(), &["pdf"]).is_empty());
    }

    #[test]
    fn test_scan_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let files = scan_files(&temp_dir.path().join("missing"), &["pdf"]);
        assert!(files.is_empty());
    }

    #[test]
    fn test_size_in_mb() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("one.pdf"), vec![0u8; 1024 * 1024]).unwrap();

        let files = scan_files(temp_dir.path(), &["pdf"]);
        assert!((files[0].size_mb - 1.0).abs() < f64::EPSILON);
    }
}
