//! 本子名稱解析模組
//!
//! 由資料夾名稱推出顯示用的本子名稱，只用於郵件展示，不作為識別依據

use crate::config::AlbumNameStrategy;
use regex::Regex;
use std::sync::LazyLock;

/// 名稱無法辨識時使用的佔位名稱
pub const PLACEHOLDER_ALBUM_NAME: &str = "未知本子";

/// 名稱的來源，也代表解析結果的可信度
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameSource {
    /// 由結構化的資料夾名稱解析而來
    Structured,
    /// 直接使用原始資料夾名稱
    RawDirectory,
    /// 無可用名稱，使用佔位名稱
    Placeholder,
}

/// 解析後的本子名稱
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedAlbumName {
    pub display_name: String,
    pub source: NameSource,
}

impl ParsedAlbumName {
    fn new(display_name: impl Into<String>, source: NameSource) -> Self {
        Self {
            display_name: display_name.into(),
            source,
        }
    }
}

/// 本子 ID 或作者標記：`123456`、`JM123456`、`[作者]`、`【作者】`、`(作者)`
static REGEX_PREFIX_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?i:jm)?\d+$|^\[[^\]]+\]$|^【[^】]+】$|^\([^)]+\)$|^（[^）]+）$")
        .expect("Invalid regex")
});

/// 章節或頁碼標記：`p3`、`ch12`、`vol2`、`ep.5`、`第3话`、`第十二章`
static REGEX_INDEX_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?i:p|pg|page|ch|chap|chapter|ep|vol)\.?\s*\d+$|^第\s*[0-9一二三四五六七八九十百千]+\s*[话話章卷回集页頁]$",
    )
    .expect("Invalid regex")
});

static REGEX_MULTIPLE_SPACES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("Invalid regex"));

/// 本子名稱解析器
pub struct AlbumNameParser {
    strategy: AlbumNameStrategy,
    regex_prefix_marker: &'static Regex,
    regex_index_marker: &'static Regex,
    regex_multiple_spaces: &'static Regex,
}

impl Default for AlbumNameParser {
    fn default() -> Self {
        Self::new(AlbumNameStrategy::default())
    }
}

impl AlbumNameParser {
    #[must_use]
    pub fn new(strategy: AlbumNameStrategy) -> Self {
        Self {
            strategy,
            regex_prefix_marker: &REGEX_PREFIX_MARKER,
            regex_index_marker: &REGEX_INDEX_MARKER,
            regex_multiple_spaces: &REGEX_MULTIPLE_SPACES,
        }
    }

    /// 解析資料夾名稱
    ///
    /// # Arguments
    /// * `dir_name` - 資料夾名稱（不含上層路徑）
    ///
    /// # Returns
    /// 顯示名稱與其來源
    #[must_use]
    pub fn parse(&self, dir_name: &str) -> ParsedAlbumName {
        let raw = self.normalize(dir_name);
        if raw.is_empty() || raw.chars().all(|c| c == '_') {
            return ParsedAlbumName::new(PLACEHOLDER_ALBUM_NAME, NameSource::Placeholder);
        }

        if self.strategy == AlbumNameStrategy::Structured {
            if let Some(name) = self.parse_structured(&raw) {
                return ParsedAlbumName::new(name, NameSource::Structured);
            }
        }

        ParsedAlbumName::new(raw, NameSource::RawDirectory)
    }

    /// 以 `_` 切分，跳過開頭的 ID／作者標記，從第一個標題片段開始組合並去除章節標記
    ///
    /// 沒有辨識出任何標記時視為非結構化名稱，回傳 `None`
    fn parse_structured(&self, raw: &str) -> Option<String> {
        let segments: Vec<&str> = raw
            .split('_')
            .map(str::trim)
            .filter(|segment| !segment.is_empty())
            .collect();

        if segments.len() < 2 {
            return None;
        }

        let title_start = segments
            .iter()
            .position(|segment| !self.is_prefix_marker(segment) && !self.is_index_marker(segment))?;

        let has_marker = segments
            .iter()
            .any(|segment| self.is_prefix_marker(segment) || self.is_index_marker(segment));
        if !has_marker {
            return None;
        }

        let title: Vec<&str> = segments[title_start..]
            .iter()
            .copied()
            .filter(|segment| !self.is_index_marker(segment))
            .collect();

        let name = self.normalize(&title.join(" "));
        if name.is_empty() { None } else { Some(name) }
    }

    fn is_prefix_marker(&self, segment: &str) -> bool {
        self.regex_prefix_marker.is_match(segment)
    }

    fn is_index_marker(&self, segment: &str) -> bool {
        self.regex_index_marker.is_match(segment)
    }

    fn normalize(&self, value: &str) -> String {
        self.regex_multiple_spaces
            .replace_all(value.trim(), " ")
            .to_string()
    }
}
