#![deny(warnings)]

//! 売上などの時系列レコードに対する統計分析エンジン
//!
//! すべての関数は状態を持たない純粋な計算で、同じ入力には同じ結果を返す。
//! データ不足の場合は例外ではなく 0 / 空 / false を返す。
//! 不正な入力（非有限値、長さの不一致）は境界の関数でのみ `AnalysisError` として拒否する。

pub mod anomaly;
pub mod comparative;
pub mod error;
pub mod performance;
pub mod report;
pub mod seasonality;
pub mod stats;
pub mod trend;
pub mod validate;

pub use common::config::AnalysisParams;
pub use common::types::{Record, Series};
pub use error::AnalysisError;

pub type Result<T> = std::result::Result<T, AnalysisError>;

/// 設定ファイルのログ形式をロガーに反映する
///
/// 分析関数を呼ぶ前に使うこと。ロガーが既に初期化済みなら false。
pub fn init_logging(config: &common::config::LoggingConfig) -> bool {
    logging::set_format(logging::LogFormat::parse(&config.rust_log_format))
}
