//! 本子彙整元件
//!
//! 圖片模式下把下載的圖片依資料夾彙整成本子清單

mod album_name_parser;
mod main;

pub use album_name_parser::{AlbumNameParser, NameSource, PLACEHOLDER_ALBUM_NAME, ParsedAlbumName};
pub use main::{AlbumAggregator, AlbumInfo};
