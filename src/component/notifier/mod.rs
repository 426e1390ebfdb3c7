//! 下載完成通知元件
//!
//! 依輸出模式串接掃描、打包、內容組合與寄送

mod main;

pub use main::{Notifier, RunOutcome, RunReport};
