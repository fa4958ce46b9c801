use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn default_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("crpt_api={},warn", level)))
}

pub fn init_cli_logger(verbose: bool) {
    init_compact_logger(if verbose { "debug" } else { "info" });
}

pub fn init_compact_logger(level: &str) {
    tracing_subscriber::registry()
        .with(default_filter(level))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();
}

/// JSON 格式日誌，給日誌收集系統使用
pub fn init_json_logger(level: &str) {
    tracing_subscriber::registry()
        .with(default_filter(level))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .json(),
        )
        .init();
}

/// 依照設定檔的 logging 區段初始化，`verbose` 會把等級拉到 debug
pub fn init_from_settings(level: &str, json: bool, verbose: bool) {
    let level = if verbose { "debug" } else { level };
    if json {
        init_json_logger(level);
    } else {
        init_compact_logger(level);
    }
}
