//! 本子彙整主模組
//!
//! 將下載目錄中的圖片依資料夾分組為本子，計算每本的張數與大小

use super::album_name_parser::AlbumNameParser;
use crate::tools::{
    IMAGE_EXTENSIONS, bytes_to_mb, has_extension, is_hidden, validate_directory_exists,
};
use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// 單一本子的彙整資訊
#[derive(Debug, Clone, PartialEq)]
pub struct AlbumInfo {
    pub name: String,
    pub image_count: usize,
    pub total_size_mb: f64,
    pub dir_path: PathBuf,
}

/// 本子彙整器
pub struct AlbumAggregator {
    name_parser: AlbumNameParser,
}

impl AlbumAggregator {
    #[must_use]
    pub const fn new(name_parser: AlbumNameParser) -> Self {
        Self { name_parser }
    }

    /// 彙整 `root` 底下的所有本子
    ///
    /// 每個第一層子資料夾視為一本，圖片遞迴計入（章節子資料夾併入所屬本子）；
    /// 沒有任何子資料夾含有圖片但根目錄直接有圖片時，整個根目錄視為一本
    pub fn aggregate(&self, root: &Path) -> Vec<AlbumInfo> {
        if let Err(e) = validate_directory_exists(root) {
            warn!("圖片目錄無法使用: {e}");
            return Vec::new();
        }

        info!("開始彙整本子: {}", root.display());

        let subdirectories = match list_subdirectories(root) {
            Ok(dirs) => dirs,
            Err(e) => {
                warn!("{e:#}");
                return Vec::new();
            }
        };

        let mut albums: Vec<AlbumInfo> = subdirectories
            .iter()
            .filter_map(|dir| self.build_album(dir))
            .collect();

        // 子資料夾都沒有圖片時，根目錄本身的圖片視為一本
        if albums.is_empty() {
            albums.extend(self.build_album(root));
        }

        info!("共彙整出 {} 本", albums.len());
        albums
    }

    fn build_album(&self, dir: &Path) -> Option<AlbumInfo> {
        let (image_count, total_bytes) = count_images(dir);
        if image_count == 0 {
            debug!("略過沒有圖片的資料夾: {}", dir.display());
            return None;
        }

        let dir_name = dir
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_default();
        let parsed = self.name_parser.parse(&dir_name);
        debug!(
            "資料夾 {dir_name} 解析為 {} ({:?})",
            parsed.display_name, parsed.source
        );

        Some(AlbumInfo {
            name: parsed.display_name,
            image_count,
            total_size_mb: bytes_to_mb(total_bytes),
            dir_path: dir.to_path_buf(),
        })
    }
}

fn list_subdirectories(root: &Path) -> Result<Vec<PathBuf>> {
    let entries =
        fs::read_dir(root).with_context(|| format!("無法讀取目錄: {}", root.display()))?;

    let mut dirs: Vec<PathBuf> = entries
        .filter_map(|entry| match entry {
            Ok(e) => Some(e.path()),
            Err(e) => {
                warn!("讀取目錄項目失敗: {e}");
                None
            }
        })
        .filter(|path| path.is_dir() && !is_hidden(path))
        .collect();

    dirs.sort();
    Ok(dirs)
}

fn count_images(dir: &Path) -> (usize, u64) {
    WalkDir::new(dir)
        .follow_links(false)
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry.path()))
        .filter_map(std::result::Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| has_extension(entry.path(), IMAGE_EXTENSIONS))
        .filter_map(|entry| entry.metadata().ok())
        .fold((0, 0), |(count, bytes), metadata| {
            (count + 1, bytes + metadata.len())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::album_aggregator::NameSource;
    use crate::config::AlbumNameStrategy;
    use tempfile::TempDir;

    fn aggregator() -> AlbumAggregator {
        AlbumAggregator::new(AlbumNameParser::new(AlbumNameStrategy::Structured))
    }

    #[test]
    fn test_albums_from_subdirectories() {
        let temp_dir = TempDir::new().unwrap();
        let album_a = temp_dir.path().join("【作者】_甲本_第1话");
        let album_b = temp_dir.path().join("乙本");
        fs::create_dir_all(&album_a).unwrap();
        fs::create_dir_all(&album_b).unwrap();
        fs::write(album_a.join("001.jpg"), vec![0u8; 1024 * 1024]).unwrap();
        fs::write(album_a.join("002.PNG"), vec![0u8; 1024 * 1024]).unwrap();
        fs::write(album_b.join("001.webp"), b"x").unwrap();

        let albums = aggregator().aggregate(temp_dir.path());

        assert_eq!(albums.len(), 2);
        assert_eq!(albums[0].name, "甲本");
        assert_eq!(albums[0].image_count, 2);
        assert!((albums[0].total_size_mb - 2.0).abs() < f64::EPSILON);
        assert_eq!(albums[1].name, "乙本");
        assert_eq!(albums[1].image_count, 1);
    }

    #[test]
    fn test_chapter_subfolders_roll_up() {
        let temp_dir = TempDir::new().unwrap();
        let album = temp_dir.path().join("長篇");
        fs::create_dir_all(album.join("ch1")).unwrap();
        fs::create_dir_all(album.join("ch2")).unwrap();
        fs::write(album.join("ch1").join("1.jpeg"), b"a").unwrap();
        fs::write(album.join("ch2").join("1.jpg"), b"b").unwrap();
        fs::write(album.join("ch2").join("info.txt"), b"c").unwrap();

        let albums = aggregator().aggregate(temp_dir.path());

        assert_eq!(albums.len(), 1);
        assert_eq!(albums[0].image_count, 2);
        assert_eq!(albums[0].dir_path, album);
    }

    #[test]
    fn test_directory_without_images_is_skipped() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir_all(temp_dir.path().join("pdf")).unwrap();
        fs::write(temp_dir.path().join("pdf").join("a.pdf"), b"a").unwrap();
        fs::create_dir_all(temp_dir.path().join(".cache")).unwrap();
        fs::write(temp_dir.path().join(".cache").join("a.jpg"), b"a").unwrap();

        assert!(aggregator().aggregate(temp_dir.path()).is_empty());
    }

    #[test]
    fn test_images_at_root_become_synthetic_album() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("download");
        fs::create_dir_all(&root).unwrap();
        fs::write(root.join("1.jpg"), b"a").unwrap();
        fs::write(root.join("2.jpg"), b"b").unwrap();

        let albums = aggregator().aggregate(&root);

        assert_eq!(albums.len(), 1);
        assert_eq!(albums[0].name, "download");
        assert_eq!(albums[0].image_count, 2);
        assert_eq!(albums[0].dir_path, root);
    }

    #[test]
    fn test_root_images_next_to_empty_subdirectory() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("download");
        fs::create_dir_all(root.join("pdf")).unwrap();
        fs::write(root.join("1.jpg"), b"a").unwrap();
        fs::write(root.join("2.jpg"), b"b").unwrap();

        let albums = aggregator().aggregate(&root);

        assert_eq!(albums.len(), 1);
        assert_eq!(albums[0].name, "download");
        assert_eq!(albums[0].image_count, 2);
        assert_eq!(albums[0].dir_path, root);
    }

    #[test]
    fn test_missing_root_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        assert!(aggregator().aggregate(&temp_dir.path().join("missing")).is_empty());
    }

    #[test]
    fn test_parser_source_is_reported() {
        let parsed = AlbumNameParser::default().parse("JM1_標題");
        assert_eq!(parsed.source, NameSource::Structured);
    }
}
