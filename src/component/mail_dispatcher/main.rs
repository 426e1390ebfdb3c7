//! 郵件寄送主模組
//!
//! 組裝郵件後交給傳送層，暫時性失敗依固定間隔重試

use super::message::{EmailMessage, build_message};
use super::transport::MailTransport;
use crate::config::{DeliverySettings, MailCredentials};
use log::{error, info, warn};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// 重試前等待的接縫，測試時可替換
pub trait Sleeper {
    fn sleep(&self, duration: Duration);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

impl<S: Sleeper + ?Sized> Sleeper for &S {
    fn sleep(&self, duration: Duration) {
        (**self).sleep(duration);
    }
}

/// 一次寄送的結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchReport {
    /// 實際嘗試寄送的次數
    pub attempts: u32,
    pub delivered: bool,
}

/// 郵件寄送器
pub struct MailDispatcher<T: MailTransport, S: Sleeper = ThreadSleeper> {
    transport: T,
    sleeper: S,
    sender: String,
    recipient: String,
    attach_limit_mb: f64,
    max_retries: u32,
    retry_delay: Duration,
    shutdown_signal: Option<Arc<AtomicBool>>,
}

impl<T: MailTransport, S: Sleeper> MailDispatcher<T, S> {
    #[must_use]
    pub fn new(
        transport: T,
        sleeper: S,
        credentials: &MailCredentials,
        settings: &DeliverySettings,
    ) -> Self {
        Self {
            transport,
            sleeper,
            sender: credentials.sender.clone(),
            recipient: credentials.recipient.clone(),
            attach_limit_mb: settings.attach_limit_mb,
            max_retries: settings.max_retries,
            retry_delay: settings.retry_delay(),
            shutdown_signal: None,
        }
    }

    /// 收到中斷訊號時不再重試
    #[must_use]
    pub fn with_shutdown_signal(mut self, shutdown_signal: Arc<AtomicBool>) -> Self {
        self.shutdown_signal = Some(shutdown_signal);
        self
    }

    /// 寄送郵件，成功回傳 `true`
    pub fn send(&self, email: &EmailMessage) -> bool {
        self.send_with_report(email).delivered
    }

    /// 寄送郵件並回傳嘗試次數
    ///
    /// 認證失敗立即放棄；其他失敗最多重試 `max_retries` 次，每次都重用同一封郵件
    pub fn send_with_report(&self, email: &EmailMessage) -> DispatchReport {
        let message =
            match build_message(email, &self.sender, &self.recipient, self.attach_limit_mb) {
                Ok(message) => message,
                Err(e) => {
                    error!("❌ 郵件組裝失敗: {e:#}");
                    return DispatchReport {
                        attempts: 0,
                        delivered: false,
                    };
                }
            };

        let total_attempts = self.max_retries + 1;
        let mut attempts = 0;

        while attempts < total_attempts {
            attempts += 1;
            info!("正在連接 SMTP 伺服器...（第 {attempts} 次）");

            match self.transport.deliver(&message) {
                Ok(()) => {
                    info!("✅ 郵件寄送成功");
                    return DispatchReport {
                        attempts,
                        delivered: true,
                    };
                }
                Err(e) if !e.is_retryable() => {
                    error!("❌ {e}，請檢查郵箱授權碼");
                    break;
                }
                Err(e) => {
                    error!("❌ 郵件寄送失敗: {e}");

                    if attempts >= total_attempts {
                        error!("❌ 已達最大重試次數 ({})，寄送失敗", self.max_retries);
                        break;
                    }
                    if self.is_shutdown() {
                        warn!("收到中斷訊號，停止重試");
                        break;
                    }

                    warn!(
                        "🔄 {} 秒後進行第 {attempts} 次重試...",
                        self.retry_delay.as_secs()
                    );
                    self.sleeper.sleep(self.retry_delay);
                }
            }
        }

        DispatchReport {
            attempts,
            delivered: false,
        }
    }

    fn is_shutdown(&self) -> bool {
        self.shutdown_signal
            .as_ref()
            .is_some_and(|signal| signal.load(Ordering::SeqCst))
    }
}
