use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// 固定的 SMTP 中繼主機（SSL 直連）
pub const SMTP_HOST: &str = "smtp.qq.com";
/// 固定的 SMTP 連接埠
pub const SMTP_PORT: u16 = 465;

pub const DEFAULT_DOWNLOAD_DIR: &str = "/home/runner/work/jmcomic/download/";
pub const DEFAULT_PDF_ARCHIVE_NAME: &str = "all_pdf.zip";
pub const DEFAULT_IMAGE_ARCHIVE_NAME: &str = "all_images.zip";
pub const DEFAULT_SETTINGS_FILE: &str = "mail_settings.json";

/// PDF 模式下存放 PDF 的子資料夾
pub const PDF_SUBDIR: &str = "pdf";

/// 輸出模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputMode {
    #[default]
    PdfOnly,
    ImagesOnly,
}

impl OutputMode {
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "pdf_only" => Some(Self::PdfOnly),
            "images_only" => Some(Self::ImagesOnly),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PdfOnly => "pdf_only",
            Self::ImagesOnly => "images_only",
        }
    }

    #[must_use]
    pub const fn default_archive_name(self) -> &'static str {
        match self {
            Self::PdfOnly => DEFAULT_PDF_ARCHIVE_NAME,
            Self::ImagesOnly => DEFAULT_IMAGE_ARCHIVE_NAME,
        }
    }
}

/// 本子名稱的解析策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlbumNameStrategy {
    /// 依 `作者_標題_章節` 之類的結構化資料夾名稱解析
    #[default]
    Structured,
    /// 直接使用資料夾名稱
    RawDirectory,
}

/// 寄送相關的可調參數，可由設定檔覆寫
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeliverySettings {
    /// 附件大小上限（MB）
    pub attach_limit_mb: f64,
    /// 寄送失敗的重試次數
    pub max_retries: u32,
    /// 重試間隔（秒）
    pub retry_delay_secs: u64,
    /// SMTP 連線與操作逾時（秒）
    pub smtp_timeout_secs: u64,
    pub album_name_strategy: AlbumNameStrategy,
}

impl Default for DeliverySettings {
    fn default() -> Self {
        Self {
            attach_limit_mb: 45.0,
            max_retries: 1,
            retry_delay_secs: 3,
            smtp_timeout_secs: 60,
            album_name_strategy: AlbumNameStrategy::default(),
        }
    }
}

impl DeliverySettings {
    #[must_use]
    pub const fn retry_delay(&self) -> Duration {
        Duration::from_secs(self.retry_delay_secs)
    }

    #[must_use]
    pub const fn smtp_timeout(&self) -> Duration {
        Duration::from_secs(self.smtp_timeout_secs)
    }
}

/// 寄件人、收件人與授權碼，三者缺一即停用寄送
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailCredentials {
    pub sender: String,
    pub recipient: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpEndpoint {
    pub host: String,
    pub port: u16,
}

impl Default for SmtpEndpoint {
    fn default() -> Self {
        Self {
            host: SMTP_HOST.to_string(),
            port: SMTP_PORT,
        }
    }
}

/// 郵件標題與正文的覆寫內容
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentOverrides {
    pub title: Option<String>,
    pub body_prefix: Option<String>,
}

/// 程式啟動時建立一次的設定，之後不再變動
#[derive(Debug, Clone)]
pub struct Config {
    pub download_dir: PathBuf,
    pub credentials: Option<MailCredentials>,
    pub overrides: ContentOverrides,
    pub output_mode: OutputMode,
    pub archive_name: String,
    pub smtp: SmtpEndpoint,
    pub delivery: DeliverySettings,
}

impl Config {
    #[must_use]
    pub fn pdf_dir(&self) -> PathBuf {
        self.download_dir.join(PDF_SUBDIR)
    }

    #[must_use]
    pub fn archive_path(&self) -> PathBuf {
        self.download_dir.join(&self.archive_name)
    }
}
