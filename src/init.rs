use chrono::Local;
use env_logger::Env;
use std::io::Write;

/// 初始化日誌，輸出格式為 `[HH:MM:SS] [LEVEL] message`
///
/// 預設等級為 info，可用 `RUST_LOG` 覆寫；重複呼叫不會失敗
pub fn init() {
    let _ = env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}] [{}] {}",
                Local::now().format("%H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .try_init();
}
