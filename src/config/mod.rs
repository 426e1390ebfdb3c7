pub mod load;
pub mod types;

pub use load::load_delivery_settings;
pub use types::{
    AlbumNameStrategy, Config, ContentOverrides, DeliverySettings, MailCredentials, OutputMode,
    PDF_SUBDIR, SmtpEndpoint,
};
