//! 郵件組裝
//!
//! 將標題、正文與附件組成 `multipart/mixed` 郵件

use crate::component::content_composer::EmailContent;
use crate::tools::{exceeds_limit, file_size_mb};
use anyhow::{Context, Result, anyhow};
use lettre::Message;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use log::{info, warn};
use std::fs;
use std::path::{Path, PathBuf};

/// 每次執行只建立一次的郵件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub title: String,
    pub body: String,
    pub attachment_path: Option<PathBuf>,
}

impl EmailMessage {
    #[must_use]
    pub fn new(content: EmailContent, attachment_path: Option<PathBuf>) -> Self {
        Self {
            title: content.title,
            body: content.body,
            attachment_path,
        }
    }
}

/// 組裝可寄送的郵件
///
/// 附件不存在或超過 `attach_limit_mb` 時直接省略，不視為錯誤
pub fn build_message(
    email: &EmailMessage,
    sender: &str,
    recipient: &str,
    attach_limit_mb: f64,
) -> Result<Message> {
    let from: Mailbox = sender
        .parse()
        .map_err(|e| anyhow!("寄件人地址無效 {sender}: {e}"))?;
    let to: Mailbox = recipient
        .parse()
        .map_err(|e| anyhow!("收件人地址無效 {recipient}: {e}"))?;

    let mut multipart = MultiPart::mixed().singlepart(SinglePart::plain(email.body.clone()));

    if let Some(path) = email.attachment_path.as_deref() {
        if let Some(attachment) = attachment_part(path, attach_limit_mb) {
            multipart = multipart.singlepart(attachment);
        }
    }

    Message::builder()
        .from(from)
        .to(to)
        .subject(email.title.clone())
        .multipart(multipart)
        .map_err(|e| anyhow!("無法建立郵件: {e}"))
}

/// 附件無法使用時只略過附件，正文照常寄出
fn attachment_part(path: &Path, attach_limit_mb: f64) -> Option<SinglePart> {
    load_attachment(path, attach_limit_mb).unwrap_or_else(|e| {
        warn!("附件無法讀取，略過: {e:#}");
        None
    })
}

fn load_attachment(path: &Path, attach_limit_mb: f64) -> Result<Option<SinglePart>> {
    if !path.exists() {
        warn!("附件不存在，略過: {}", path.display());
        return Ok(None);
    }
    if !path.is_file() {
        warn!("附件不是檔案，略過: {}", path.display());
        return Ok(None);
    }

    let size_mb = file_size_mb(path)?;
    if exceeds_limit(size_mb, attach_limit_mb) {
        warn!("附件過大 ({size_mb:.1} MB > {attach_limit_mb} MB)，略過");
        return Ok(None);
    }

    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .with_context(|| format!("無法取得附件檔名: {}", path.display()))?;
    let content =
        fs::read(path).with_context(|| format!("無法讀取附件: {}", path.display()))?;
    let content_type = ContentType::parse("application/octet-stream")
        .map_err(|e| anyhow!("無效的附件類型: {e}"))?;

    info!("添加附件: {filename} ({size_mb:.1} MB)");
    Ok(Some(Attachment::new(filename).body(content, content_type)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn email(attachment_path: Option<PathBuf>) -> EmailMessage {
        EmailMessage {
            title: "測試標題".to_string(),
            body: "正文".to_string(),
            attachment_path,
        }
    }

    fn formatted(message: &Message) -> String {
        String::from_utf8_lossy(&message.formatted()).to_string()
    }

    #[test]
    fn test_message_with_attachment() {
        let temp_dir = TempDir::new().unwrap();
        let zip_path = temp_dir.path().join("all_pdf.zip");
        fs::write(&zip_path, b"PK fake archive").unwrap();

        let message =
            build_message(&email(Some(zip_path)), "a@qq.com", "b@qq.com", 45.0).unwrap();
        let raw = formatted(&message);

        assert!(raw.contains("multipart/mixed"));
        assert!(raw.contains("Content-Disposition: attachment"));
        assert!(raw.contains("all_pdf.zip"));
    }

    #[test]
    fn test_oversized_attachment_is_omitted() {
        let temp_dir = TempDir::new().unwrap();
        let zip_path = temp_dir.path().join("all_pdf.zip");
        fs::write(&zip_path, vec![0u8; 2 * 1024 * 1024]).unwrap();

        let message =
            build_message(&email(Some(zip_path)), "a@qq.com", "b@qq.com", 1.0).unwrap();

        assert!(!formatted(&message).contains("Content-Disposition: attachment"));
    }

    #[test]
    fn test_missing_attachment_is_omitted() {
        let temp_dir = TempDir::new().unwrap();
        let message = build_message(
            &email(Some(temp_dir.path().join("missing.zip"))),
            "a@qq.com",
            "b@qq.com",
            45.0,
        )
        .unwrap();

        assert!(!formatted(&message).contains("Content-Disposition: attachment"));
    }

    #[test]
    fn test_unreadable_attachment_still_builds_body() {
        let temp_dir = TempDir::new().unwrap();
        let not_a_file = temp_dir.path().join("all_pdf.zip");
        fs::create_dir_all(&not_a_file).unwrap();

        let message =
            build_message(&email(Some(not_a_file)), "a@qq.com", "b@qq.com", 45.0).unwrap();
        let raw = formatted(&message);

        assert!(!raw.contains("Content-Disposition: attachment"));
        assert!(raw.contains("text/plain"));
    }

    #[test]
    fn test_invalid_address_is_error() {
        assert!(build_message(&email(None), "not an address", "b@qq.com", 45.0).is_err());
    }
}
