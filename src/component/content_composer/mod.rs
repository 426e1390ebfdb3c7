//! 郵件內容組合元件

mod main;

pub use main::{
    ArchiveSummary, EmailContent, SIGNATURE, compose_album_content, compose_archive_failure_notice,
    compose_empty_notice, compose_pdf_content,
};
