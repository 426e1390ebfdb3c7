//! 功能元件模組
//!
//! 每個子模組實現通知流程中的一個步驟，包含主要邏輯和專用工具

pub mod album_aggregator;
pub mod content_composer;
pub mod mail_dispatcher;
pub mod notifier;

pub use album_aggregator::AlbumAggregator;
pub use mail_dispatcher::MailDispatcher;
pub use notifier::Notifier;
