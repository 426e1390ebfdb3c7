//! 通知流程主模組
//!
//! 設定檢查 → 掃描或彙整 → 打包 → 組合內容 → 寄送

use crate::component::album_aggregator::{AlbumAggregator, AlbumNameParser};
use crate::component::content_composer::{
    ArchiveSummary, EmailContent, compose_album_content, compose_archive_failure_notice,
    compose_empty_notice, compose_pdf_content,
};
use crate::component::mail_dispatcher::{EmailMessage, MailDispatcher, MailTransport, Sleeper};
use crate::config::{Config, MailCredentials, OutputMode};
use crate::tools::{PDF_EXTENSIONS, create_archive, file_size_mb, scan_files};
use anyhow::Result;
use chrono::{Local, NaiveDate};
use log::{error, info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

const BANNER_WIDTH: usize = 60;

/// 一次執行的結果
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    /// 郵件設定不完整，未寄送
    Disabled,
    /// 使用者中斷
    Interrupted,
    Completed(RunReport),
}

impl RunOutcome {
    #[must_use]
    pub const fn is_interrupted(&self) -> bool {
        matches!(self, Self::Interrupted)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub mode: OutputMode,
    pub email: EmailMessage,
    /// 郵件是否帶附件
    pub attached: bool,
    pub delivered: bool,
}

/// 下載完成通知器
pub struct Notifier {
    config: Config,
    shutdown_signal: Arc<AtomicBool>,
    today: NaiveDate,
}

impl Notifier {
    #[must_use]
    pub fn new(config: Config, shutdown_signal: Arc<AtomicBool>) -> Self {
        Self {
            config,
            shutdown_signal,
            today: Local::now().date_naive(),
        }
    }

    /// 指定郵件中顯示的日期
    #[must_use]
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    /// 執行整個通知流程
    ///
    /// 只有建立傳送層失敗時回傳錯誤；其餘失敗皆記錄後以安全的預設值繼續
    pub fn run<T, S, F>(&self, make_transport: F, sleeper: S) -> Result<RunOutcome>
    where
        T: MailTransport,
        S: Sleeper,
        F: FnOnce(&MailCredentials) -> Result<T>,
    {
        let banner = "=".repeat(BANNER_WIDTH);
        info!("{banner}");
        info!("📧 開始郵件寄送任務");
        info!("{banner}");

        let Some(credentials) = &self.config.credentials else {
            warn!("⚠️ 郵件設定不完整，跳過寄送");
            info!("需要設定: EMAIL_FROM, EMAIL_TO, EMAIL_PASS");
            return Ok(RunOutcome::Disabled);
        };

        info!("📤 寄件人: {}", credentials.sender);
        info!("📥 收件人: {}", credentials.recipient);
        info!("📦 輸出模式: {}", self.config.output_mode.as_str());

        let prepared = match self.config.output_mode {
            OutputMode::PdfOnly => self.prepare_pdf_email(),
            OutputMode::ImagesOnly => self.prepare_album_email(),
        };
        let Some(email) = prepared else {
            return Ok(RunOutcome::Interrupted);
        };

        let transport = make_transport(credentials)?;
        let dispatcher = MailDispatcher::new(transport, sleeper, credentials, &self.config.delivery)
            .with_shutdown_signal(Arc::clone(&self.shutdown_signal));

        info!("{banner}");
        let delivered = dispatcher.send(&email);
        info!("{banner}");

        if self.is_interrupted() {
            return Ok(RunOutcome::Interrupted);
        }

        if delivered {
            info!("✅ 郵件任務完成");
        } else {
            warn!("⚠️ 郵件寄送失敗，但不影響主流程");
        }

        Ok(RunOutcome::Completed(RunReport {
            mode: self.config.output_mode,
            attached: email.attachment_path.is_some(),
            email,
            delivered,
        }))
    }

    /// PDF 模式：掃描 PDF 並打包，收到中斷訊號時回傳 `None`
    fn prepare_pdf_email(&self) -> Option<EmailMessage> {
        let pdf_dir = self.config.pdf_dir();
        info!("📁 掃描目錄: {}", pdf_dir.display());

        let files = scan_files(&pdf_dir, PDF_EXTENSIONS);
        if files.is_empty() {
            warn!("⚠️ 未找到 PDF 檔案");
            return Some(notice(compose_empty_notice(OutputMode::PdfOnly, self.today)));
        }

        info!("✅ 找到 {} 個 PDF 檔案:", files.len());
        for file in &files {
            info!("  • {} ({:.1} MB)", file.name, file.size_mb);
        }
        let total_size: f64 = files.iter().map(|file| file.size_mb).sum();
        info!("📊 總大小: {total_size:.1} MB");

        if self.is_interrupted() {
            return None;
        }

        let archive_path = self.config.archive_path();
        if !create_archive(&pdf_dir, &archive_path, PDF_EXTENSIONS) {
            error!("❌ 打包失敗，改寄不含附件的通知");
            return Some(notice(compose_archive_failure_notice(files.len(), self.today)));
        }

        if self.is_interrupted() {
            return None;
        }

        let archive = self.summarize_archive(&archive_path);
        let content = compose_pdf_content(&files, &archive, &self.config.overrides, self.today);
        Some(with_payload(content, &archive, archive_path))
    }

    /// 圖片模式：彙整本子並使用外部已建立的壓縮包
    fn prepare_album_email(&self) -> Option<EmailMessage> {
        let root = &self.config.download_dir;
        info!("📁 掃描目錄: {}", root.display());

        let aggregator =
            AlbumAggregator::new(AlbumNameParser::new(self.config.delivery.album_name_strategy));
        let albums = aggregator.aggregate(root);
        if albums.is_empty() {
            warn!("⚠️ 未找到任何圖片");
            return Some(notice(compose_empty_notice(OutputMode::ImagesOnly, self.today)));
        }

        info!("✅ 找到 {} 本:", albums.len());
        for album in &albums {
            info!(
                "  • {} ({} 張, {:.1} MB)",
                album.name, album.image_count, album.total_size_mb
            );
        }

        if self.is_interrupted() {
            return None;
        }

        let archive_path = self.config.archive_path();
        if !archive_path.is_file() {
            warn!("⚠️ 找不到壓縮包: {}", archive_path.display());
            return Some(notice(compose_empty_notice(OutputMode::ImagesOnly, self.today)));
        }

        let archive = self.summarize_archive(&archive_path);
        let content =
            compose_album_content(&albums, &archive, &self.config.overrides, self.today);
        Some(with_payload(content, &archive, archive_path))
    }

    /// 無法取得大小時視為超過上限，改寄不含附件的通知
    fn summarize_archive(&self, archive_path: &Path) -> ArchiveSummary {
        let limit_mb = self.config.delivery.attach_limit_mb;
        match file_size_mb(archive_path) {
            Ok(size_mb) => ArchiveSummary::new(self.config.archive_name.clone(), size_mb, limit_mb),
            Err(e) => {
                warn!("{e:#}");
                ArchiveSummary {
                    over_limit: true,
                    ..ArchiveSummary::new(self.config.archive_name.clone(), 0.0, limit_mb)
                }
            }
        }
    }

    fn is_interrupted(&self) -> bool {
        self.shutdown_signal.load(Ordering::SeqCst)
    }
}

/// 超過附件上限時只寄通知，不帶附件
fn with_payload(
    content: EmailContent,
    archive: &ArchiveSummary,
    archive_path: PathBuf,
) -> EmailMessage {
    if archive.over_limit {
        warn!(
            "⚠️ ZIP 檔案過大 ({:.1} MB > {} MB)",
            archive.size_mb, archive.limit_mb
        );
        info!("將寄送通知郵件（不帶附件）");
        EmailMessage::new(content, None)
    } else {
        EmailMessage::new(content, Some(archive_path))
    }
}

fn notice(content: EmailContent) -> EmailMessage {
    EmailMessage::new(content, None)
}
