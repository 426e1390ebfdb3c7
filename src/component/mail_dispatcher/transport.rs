//! SMTP 傳送層
//!
//! `MailTransport` 是寄送的接縫，正式環境使用 `SmtpRelay`

use crate::config::{MailCredentials, SmtpEndpoint};
use anyhow::{Context, Result};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use std::time::Duration;
use thiserror::Error;

/// 代表認證失敗的 SMTP 回應碼
const AUTH_FAILURE_CODES: &[&str] = &["530", "534", "535"];

#[derive(Debug, Error)]
pub enum DeliveryError {
    /// 認證失敗，重試也不會成功
    #[error("SMTP 認證失敗: {0}")]
    Authentication(String),

    #[error("SMTP 傳送失敗: {0}")]
    Transport(String),
}

impl DeliveryError {
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

pub trait MailTransport {
    fn deliver(&self, message: &Message) -> Result<(), DeliveryError>;
}

impl<T: MailTransport + ?Sized> MailTransport for &T {
    fn deliver(&self, message: &Message) -> Result<(), DeliveryError> {
        (**self).deliver(message)
    }
}

/// 以 SSL 直連固定中繼主機的 SMTP 傳送
///
/// 不使用連線池，每次寄送各自建立連線並在結束時關閉
pub struct SmtpRelay {
    transport: SmtpTransport,
}

impl SmtpRelay {
    pub fn new(
        endpoint: &SmtpEndpoint,
        credentials: &MailCredentials,
        timeout: Duration,
    ) -> Result<Self> {
        let transport = SmtpTransport::relay(&endpoint.host)
            .with_context(|| format!("無法設定 SMTP 主機: {}", endpoint.host))?
            .port(endpoint.port)
            .credentials(Credentials::new(
                credentials.sender.clone(),
                credentials.password.clone(),
            ))
            .timeout(Some(timeout))
            .build();

        Ok(Self { transport })
    }
}

impl MailTransport for SmtpRelay {
    fn deliver(&self, message: &Message) -> Result<(), DeliveryError> {
        self.transport
            .send(message)
            .map(|_| ())
            .map_err(classify_smtp_error)
    }
}

fn classify_smtp_error(error: lettre::transport::smtp::Error) -> DeliveryError {
    let is_auth_failure = error
        .status()
        .is_some_and(|code| AUTH_FAILURE_CODES.contains(&code.to_string().as_str()));

    if is_auth_failure {
        DeliveryError::Authentication(error.to_string())
    } else {
        DeliveryError::Transport(error.to_string())
    }
}
