//! 壓縮包建立工具
//!
//! 將整個資料夾打包為單一 ZIP，每次都完整重建

use crate::tools::file_scanner::has_extension;
use crate::tools::file_size::file_size_mb;
use anyhow::{Context, Result, bail};
use log::{error, info, warn};
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// 將 `source_dir` 打包到 `output_path`，成功回傳 `true`
///
/// 資料夾不存在或沒有符合副檔名的檔案時不建立壓縮包；
/// 任何 I/O 或壓縮錯誤都只記錄並回傳 `false`
pub fn create_archive(source_dir: &Path, output_path: &Path, extensions: &[&str]) -> bool {
    info!("開始打包: {}", source_dir.display());

    if !contains_matching_file(source_dir, extensions) {
        warn!("資料夾為空，跳過打包: {}", source_dir.display());
        return false;
    }

    match write_archive(source_dir, output_path) {
        Ok(entries) => {
            let size = file_size_mb(output_path).unwrap_or_default();
            info!(
                "打包完成: {} ({} 個檔案, {size:.1} MB)",
                output_path.display(),
                entries
            );
            true
        }
        Err(e) => {
            error!("打包失敗: {e:#}");
            false
        }
    }
}

fn contains_matching_file(source_dir: &Path, extensions: &[&str]) -> bool {
    source_dir.is_dir()
        && WalkDir::new(source_dir)
            .follow_links(false)
            .into_iter()
            .filter_map(std::result::Result::ok)
            .any(|entry| entry.file_type().is_file() && has_extension(entry.path(), extensions))
}

fn write_archive(source_dir: &Path, output_path: &Path) -> Result<usize> {
    if output_path.exists() {
        fs::remove_file(output_path)
            .with_context(|| format!("無法刪除舊壓縮包: {}", output_path.display()))?;
    }

    let file = File::create(output_path)
        .with_context(|| format!("無法建立壓縮包: {}", output_path.display()))?;
    let own_path = fs::canonicalize(output_path).ok();

    let mut writer = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut entries = 0;

    for entry in WalkDir::new(source_dir)
        .follow_links(false)
        .sort_by_file_name()
        .min_depth(1)
    {
        let entry = entry.context("讀取目錄項目失敗")?;
        let path = entry.path();

        // 壓縮包本身位於來源資料夾內時不能把自己打包進去
        if own_path.is_some() && fs::canonicalize(path).ok() == own_path {
            continue;
        }

        let name = archive_entry_name(source_dir, path)?;

        if entry.file_type().is_dir() {
            writer
                .add_directory(name, options)
                .with_context(|| format!("無法加入資料夾: {}", path.display()))?;
        } else if entry.file_type().is_file() {
            writer
                .start_file(name, options)
                .with_context(|| format!("無法加入檔案: {}", path.display()))?;
            let mut source = File::open(path)
                .with_context(|| format!("無法讀取檔案: {}", path.display()))?;
            io::copy(&mut source, &mut writer)
                .with_context(|| format!("寫入壓縮資料失敗: {}", path.display()))?;
            entries += 1;
        }
    }

    writer.finish().context("無法完成壓縮包")?;
    Ok(entries)
}

/// ZIP 內的相對路徑，一律使用 `/` 分隔
fn archive_entry_name(source_dir: &Path, path: &Path) -> Result<String> {
    let relative: PathBuf = path
        .strip_prefix(source_dir)
        .with_context(|| format!("路徑不在來源資料夾內: {}", path.display()))?
        .to_path_buf();

    let parts: Vec<String> = relative
        .components()
        .map(|component| component.as_os_str().to_string_lossy().to_string())
        .collect();

    if parts.is_empty() {
        bail!("空的壓縮項目名稱: {}", path.display());
    }

    Ok(parts.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use zip::ZipArchive;

    fn entry_names(archive_path: &Path) -> Vec<String> {
        let file = File::open(archive_path).unwrap();
        let mut archive = ZipArchive::new(file).unwrap();
        (0..archive.len())
            .map(|i| archive.by_index(i).unwrap().name().to_string())
            .collect()
    }

    #[test]
    fn test_create_archive_includes_relative_paths() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("pdf");
        fs::create_dir_all(source.join("sub")).unwrap();
        fs::write(source.join("a.pdf"), b"aaa").unwrap();
        fs::write(source.join("sub").join("b.pdf"), b"bbb").unwrap();
        let output = temp_dir.path().join("all_pdf.zip");

        assert!(create_archive(&source, &output, &["pdf"]));

        let names = entry_names(&output);
        assert!(names.contains(&"a.pdf".to_string()));
        assert!(names.contains(&"sub/b.pdf".to_string()));
    }

    #[test]
    fn test_missing_source_creates_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let output = temp_dir.path().join("all_pdf.zip");

        assert!(!create_archive(&temp_dir.path().join("missing"), &output, &["pdf"]));
        assert!(!output.exists());
    }

    #[test]
    fn test_no_matching_file_creates_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("pdf");
        fs::create_dir_all(&source).unwrap();
        fs::write(source.join("readme.txt"), b"x").unwrap();
        let output = temp_dir.path().join("all_pdf.zip");

        assert!(!create_archive(&source, &output, &["pdf"]));
        assert!(!output.exists());
    }

    #[test]
    fn test_rebuild_reflects_latest_contents() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("pdf");
        fs::create_dir_all(&source).unwrap();
        fs::write(source.join("old.pdf"), b"old").unwrap();
        let output = temp_dir.path().join("all_pdf.zip");

        assert!(create_archive(&source, &output, &["pdf"]));

        fs::remove_file(source.join("old.pdf")).unwrap();
        fs::write(source.join("new.pdf"), b"new").unwrap();
        assert!(create_archive(&source, &output, &["pdf"]));

        assert_eq!(entry_names(&output), vec!["new.pdf".to_string()]);
    }

    #[test]
    fn test_archive_inside_source_is_not_self_included() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("a.pdf"), b"a").unwrap();
        let output = temp_dir.path().join("bundle.zip");

        assert!(create_archive(temp_dir.path(), &output, &["pdf"]));
        assert!(create_archive(temp_dir.path(), &output, &["pdf"]));

        assert_eq!(entry_names(&output), vec!["a.pdf".to_string()]);
    }
}
