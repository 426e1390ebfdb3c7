//! 郵件內容組合
//!
//! 依掃描或彙整結果產生郵件標題與正文，全部為純函式

use crate::component::album_aggregator::AlbumInfo;
use crate::config::{ContentOverrides, OutputMode};
use crate::tools::{FileInfo, exceeds_limit};
use chrono::NaiveDate;
use std::fmt::Write;

/// 郵件結尾固定的簽名
pub const SIGNATURE: &str = "—— GitHub Actions 自动服务";

const SEPARATOR_WIDTH: usize = 50;

/// 郵件標題與正文
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailContent {
    pub title: String,
    pub body: String,
}

/// 壓縮包的大小與是否超過附件上限
#[derive(Debug, Clone, PartialEq)]
pub struct ArchiveSummary {
    pub display_name: String,
    pub size_mb: f64,
    pub limit_mb: f64,
    pub over_limit: bool,
}

impl ArchiveSummary {
    #[must_use]
    pub fn new(display_name: impl Into<String>, size_mb: f64, limit_mb: f64) -> Self {
        Self {
            display_name: display_name.into(),
            size_mb,
            limit_mb,
            over_limit: exceeds_limit(size_mb, limit_mb),
        }
    }
}

/// PDF 模式的郵件內容
#[must_use]
pub fn compose_pdf_content(
    files: &[FileInfo],
    archive: &ArchiveSummary,
    overrides: &ContentOverrides,
    today: NaiveDate,
) -> EmailContent {
    let total_size: f64 = files.iter().map(|file| file.size_mb).sum();

    let items: Vec<String> = files
        .iter()
        .map(|file| format!("{} ({:.1} MB)", file.name, file.size_mb))
        .collect();

    let stats = vec![
        format!("文件数量: {}", files.len()),
        format!("总大小: {total_size:.1} MB"),
        format!("压缩包大小: {:.1} MB", archive.size_mb),
    ];

    let title = overrides.title.clone().unwrap_or_else(|| {
        format!(
            "禁漫PDF已生成（共 {} 本 · {}）",
            files.len(),
            format_date(today)
        )
    });

    let body = render_body(
        overrides,
        "✅ 你的禁漫 PDF 文件已准备就绪！",
        &format!("📚 共 {} 本 PDF：", files.len()),
        &items,
        &stats,
        archive,
    );

    EmailContent { title, body }
}

/// 圖片模式的郵件內容
#[must_use]
pub fn compose_album_content(
    albums: &[AlbumInfo],
    archive: &ArchiveSummary,
    overrides: &ContentOverrides,
    today: NaiveDate,
) -> EmailContent {
    let total_images: usize = albums.iter().map(|album| album.image_count).sum();
    let total_size: f64 = albums.iter().map(|album| album.total_size_mb).sum();

    let items: Vec<String> = albums
        .iter()
        .map(|album| {
            format!(
                "{}（{} 张，{:.1} MB）",
                album.name, album.image_count, album.total_size_mb
            )
        })
        .collect();

    let stats = vec![
        format!("本子数量: {}", albums.len()),
        format!("图片总数: {total_images}"),
        format!("总大小: {total_size:.1} MB"),
        format!("压缩包大小: {:.1} MB", archive.size_mb),
    ];

    let title = overrides.title.clone().unwrap_or_else(|| {
        format!(
            "禁漫图片已下载（共 {} 本 · {}）",
            albums.len(),
            format_date(today)
        )
    });

    let body = render_body(
        overrides,
        "✅ 你的禁漫图片已下载完成！",
        &format!("🖼️ 共 {} 本：", albums.len()),
        &items,
        &stats,
        archive,
    );

    EmailContent { title, body }
}

/// 沒有產出任何檔案時的簡短通知
#[must_use]
pub fn compose_empty_notice(mode: OutputMode, today: NaiveDate) -> EmailContent {
    let produced = match mode {
        OutputMode::PdfOnly => "PDF 文件",
        OutputMode::ImagesOnly => "图片压缩包",
    };

    EmailContent {
        title: format!("禁漫下载任务完成 · {}", format_date(today)),
        body: format!("下载任务已完成，但未生成 {produced}。\n\n{SIGNATURE}"),
    }
}

/// 已產生 PDF 但打包失敗時的通知
#[must_use]
pub fn compose_archive_failure_notice(file_count: usize, today: NaiveDate) -> EmailContent {
    EmailContent {
        title: format!("禁漫下载任务完成 · {}", format_date(today)),
        body: format!(
            "下载任务已完成，共生成 {file_count} 本 PDF，但打包失败，无法附加。\n\
             请前往当前任务界面的 \"Artifacts\" 查看。\n\n{SIGNATURE}"
        ),
    }
}

fn render_body(
    overrides: &ContentOverrides,
    default_intro: &str,
    list_header: &str,
    items: &[String],
    stats: &[String],
    archive: &ArchiveSummary,
) -> String {
    let separator = "=".repeat(SEPARATOR_WIDTH);
    let mut body = String::new();

    match &overrides.body_prefix {
        Some(prefix) => {
            let _ = write!(body, "{prefix}\n\n");
        }
        None => {
            let _ = write!(body, "{default_intro}\n\n");
        }
    }

    if !items.is_empty() {
        let _ = writeln!(body, "{separator}");
        let _ = writeln!(body, "{list_header}");
        let _ = writeln!(body, "{separator}");
        for item in items {
            let _ = writeln!(body, "  • {item}");
        }
        let _ = write!(body, "{separator}\n\n");
    }

    let _ = writeln!(body, "📊 统计信息：");
    for line in stats {
        let _ = writeln!(body, "  • {line}");
    }
    body.push('\n');

    if archive.over_limit {
        let _ = writeln!(
            body,
            "⚠️ 附件超过 {} MB，已自动存为 Artifact",
            format_limit(archive.limit_mb)
        );
        let _ = write!(
            body,
            "请前往当前任务界面的 \"Artifacts\" 下载 {}\n\n",
            archive.display_name
        );
        let _ = writeln!(body, "📦 ZIP 大小: {:.1} MB", archive.size_mb);
    } else {
        let _ = writeln!(
            body,
            "📦 附件已打包为 {} ({:.1} MB)",
            archive.display_name, archive.size_mb
        );
    }

    let _ = write!(body, "\n{SIGNATURE}");
    body
}

fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// 整數上限不顯示小數
fn format_limit(limit_mb: f64) -> String {
    if limit_mb.fract() == 0.0 {
        format!("{limit_mb:.0}")
    } else {
        format!("{limit_mb:.1}")
    }
}
