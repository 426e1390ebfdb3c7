mod archive_builder;
mod file_scanner;
mod file_size;
mod path_validator;

pub use archive_builder::create_archive;
pub use file_scanner::{FileInfo, has_extension, scan_files};
pub use file_size::{bytes_to_mb, exceeds_limit, file_size_mb};
pub use path_validator::{is_hidden, validate_directory_exists};

/// PDF 模式掃描的副檔名
pub const PDF_EXTENSIONS: &[&str] = &["pdf"];
/// 圖片模式掃描的副檔名
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp"];
