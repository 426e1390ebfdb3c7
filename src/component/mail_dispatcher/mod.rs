//! 郵件寄送元件
//!
//! 組裝 MIME 郵件、以 SSL 連線寄出，暫時性失敗時依固定間隔重試

mod main;
mod message;
mod transport;

pub use main::{DispatchReport, MailDispatcher, Sleeper, ThreadSleeper};
pub use message::{EmailMessage, build_message};
pub use transport::{DeliveryError, MailTransport, SmtpRelay};
