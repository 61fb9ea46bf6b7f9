use once_cell::sync::{Lazy, OnceCell};
pub use slog::*;

/// ログの出力形式（`RUST_LOG_FORMAT` で切り替える）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Term,
    Json,
}

impl LogFormat {
    /// 未知の値は Term として扱う
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" => LogFormat::Json,
            _ => LogFormat::Term,
        }
    }

    pub fn from_env() -> Self {
        Self::parse(&std::env::var("RUST_LOG_FORMAT").unwrap_or_default())
    }
}

fn wrap<D: Drain<Err = Never, Ok = ()> + Send + 'static>(drain: D) -> Fuse<slog_async::Async> {
    slog_async::Async::default(slog_envlogger::new(drain)).fuse()
}

/// 指定の形式でルートロガーを組み立てる
///
/// レベルは `RUST_LOG` で絞り込む。
pub fn build(format: LogFormat) -> Logger {
    let drain = match format {
        LogFormat::Json => wrap(slog_json::Json::default(std::io::stdout()).fuse()),
        LogFormat::Term => wrap(
            slog_term::FullFormat::new(slog_term::TermDecorator::new().build())
                .build()
                .fuse(),
        ),
    };

    Logger::root(drain, o!("version" => env!("CARGO_PKG_VERSION")))
}

static FORMAT: OnceCell<LogFormat> = OnceCell::new();

/// `DEFAULT` の出力形式を指定する
///
/// `DEFAULT` を初めて使う前に一度だけ有効。既に初期化済み、または指定済みなら false。
/// 指定がなければ `RUST_LOG_FORMAT` を読む。
pub fn set_format(format: LogFormat) -> bool {
    if Lazy::get(&DEFAULT).is_some() {
        return false;
    }
    FORMAT.set(format).is_ok()
}

pub static DEFAULT: Lazy<Logger> = Lazy::new(|| {
    let format = FORMAT.get().copied().unwrap_or_else(LogFormat::from_env);
    build(format)
});
