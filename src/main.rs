use anyhow::Result;
use comic_mail_notifier::component::Notifier;
use comic_mail_notifier::component::mail_dispatcher::{SmtpRelay, ThreadSleeper};
use comic_mail_notifier::component::notifier::RunOutcome;
use comic_mail_notifier::config::Config;
use comic_mail_notifier::init;
use comic_mail_notifier::signal::setup_shutdown_signal;
use log::{error, warn};
use std::panic;
use std::process::ExitCode;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

/// 除了使用者中斷外一律以 0 結束，避免中斷上游 workflow
fn main() -> ExitCode {
    init::init();

    match panic::catch_unwind(run) {
        Ok(Ok(outcome)) if outcome.is_interrupted() => ExitCode::from(1),
        Ok(Ok(_)) => ExitCode::SUCCESS,
        Ok(Err(e)) => {
            error!("❌ 發生未預期的錯誤: {e:?}");
            ExitCode::SUCCESS
        }
        Err(payload) => {
            let message = payload
                .downcast_ref::<&str>()
                .map(ToString::to_string)
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_default();
            error!("❌ 發生未預期的錯誤: {message}");
            ExitCode::SUCCESS
        }
    }
}

fn run() -> Result<RunOutcome> {
    let shutdown_signal = setup_shutdown_signal().unwrap_or_else(|e| {
        warn!("{e:#}");
        Arc::new(AtomicBool::new(false))
    });

    let config = Config::from_env();
    let endpoint = config.smtp.clone();
    let timeout = config.delivery.smtp_timeout();

    Notifier::new(config, shutdown_signal).run(
        |credentials| SmtpRelay::new(&endpoint, credentials, timeout),
        ThreadSleeper,
    )
}
