use crate::config::types::{
    Config, ContentOverrides, DEFAULT_DOWNLOAD_DIR, DEFAULT_SETTINGS_FILE, DeliverySettings,
    MailCredentials, OutputMode, SmtpEndpoint,
};
use anyhow::{Context, Result};
use log::warn;
use std::fs;
use std::path::{Path, PathBuf};

const ENV_DOWNLOAD_DIR: &str = "JM_DOWNLOAD_DIR";
const ENV_EMAIL_FROM: &str = "EMAIL_FROM";
const ENV_EMAIL_TO: &str = "EMAIL_TO";
const ENV_EMAIL_PASS: &str = "EMAIL_PASS";
const ENV_EMAIL_TITLE: &str = "EMAIL_TITLE";
const ENV_EMAIL_CONTENT: &str = "EMAIL_CONTENT";
const ENV_OUTPUT_MODE: &str = "OUTPUT_MODE";
const ENV_ZIP_NAME: &str = "ZIP_NAME";
const ENV_SETTINGS_FILE: &str = "NOTIFY_SETTINGS";

impl Config {
    /// 從行程環境變數建立設定
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 以任意查詢函式建立設定，空字串視為未設定
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let download_dir = get(ENV_DOWNLOAD_DIR)
            .map_or_else(|| PathBuf::from(DEFAULT_DOWNLOAD_DIR), PathBuf::from);

        let credentials = match (get(ENV_EMAIL_FROM), get(ENV_EMAIL_TO), get(ENV_EMAIL_PASS)) {
            (Some(sender), Some(recipient), Some(password)) => Some(MailCredentials {
                sender: sender.trim().to_string(),
                recipient: recipient.trim().to_string(),
                password,
            }),
            _ => None,
        };

        let output_mode = match get(ENV_OUTPUT_MODE) {
            Some(value) => OutputMode::parse(&value).unwrap_or_else(|| {
                warn!("未知的輸出模式 {value}，改用 pdf_only");
                OutputMode::PdfOnly
            }),
            None => OutputMode::default(),
        };

        let archive_name = get(ENV_ZIP_NAME)
            .unwrap_or_else(|| output_mode.default_archive_name().to_string());

        let settings_path = get(ENV_SETTINGS_FILE)
            .map_or_else(|| PathBuf::from(DEFAULT_SETTINGS_FILE), PathBuf::from);
        let delivery = load_delivery_settings(&settings_path).unwrap_or_else(|e| {
            warn!("讀取設定檔失敗，使用預設值: {e:#}");
            DeliverySettings::default()
        });

        Self {
            download_dir,
            credentials,
            overrides: ContentOverrides {
                title: get(ENV_EMAIL_TITLE),
                body_prefix: get(ENV_EMAIL_CONTENT),
            },
            output_mode,
            archive_name,
            smtp: SmtpEndpoint::default(),
            delivery,
        }
    }
}

/// 載入寄送參數設定檔，不存在時回傳預設值
pub fn load_delivery_settings(path: &Path) -> Result<DeliverySettings> {
    if !path.exists() {
        return Ok(DeliverySettings::default());
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read settings from {}", path.display()))?;

    if content.trim().is_empty() {
        return Ok(DeliverySettings::default());
    }

    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse settings from {}", path.display()))
}
