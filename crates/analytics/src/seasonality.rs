use crate::stats::{mean, variance};
use serde::{Deserialize, Serialize};

/// 季節性検出の結果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonalityResult {
    pub has_seasonality: bool,
    /// 周期内の位置で説明できる分散の割合（上限 1、下限なし）
    pub strength: f64,
    pub season_length: usize,
    /// 周期内の位置ごとの値（バケット i = i, i+L, i+2L, ... 番目の値）
    pub buckets: Vec<Vec<f64>>,
}

/// 季節性ありと判定する強度の閾値
pub const SEASONALITY_STRENGTH_THRESHOLD: f64 = 0.3;

/// 位置を `season_length` で割った余りごとに値を振り分ける
fn buckets(values: &[f64], season_length: usize) -> Vec<Vec<f64>> {
    let mut buckets = vec![Vec::new(); season_length];
    for (i, &value) in values.iter().enumerate() {
        buckets[i % season_length].push(value);
    }
    buckets
}

/// 固定周期による季節性の検出
///
/// バケット内の分散の平均が系列全体の分散に比べて小さければ、
/// 系列は周期内の位置でほぼ説明できる（＝季節性がある）とみなす。
///
/// `strength = 1 - 平均バケット内分散 / 全体分散`（全体分散が 0 なら 0）。
/// 要素数が `2 * season_length` 未満、または `season_length` が 0 の場合は季節性なし。
pub fn detect_seasonality(values: &[f64], season_length: usize) -> SeasonalityResult {
    if season_length == 0 || values.len() < season_length.saturating_mul(2) {
        return SeasonalityResult {
            has_seasonality: false,
            strength: 0.0,
            season_length,
            buckets: vec![],
        };
    }

    let buckets = buckets(values, season_length);
    let bucket_variances: Vec<f64> = buckets.iter().map(|b| variance(b)).collect();
    let avg_variance = mean(&bucket_variances);
    let total_variance = variance(values);

    let strength = if total_variance == 0.0 {
        0.0
    } else {
        1.0 - avg_variance / total_variance
    };

    SeasonalityResult {
        has_seasonality: strength > SEASONALITY_STRENGTH_THRESHOLD,
        strength,
        season_length,
        buckets,
    }
}

/// 周期内の位置ごとの乗法的季節指数（バケット平均 / 全体平均）
///
/// 全体平均が 0 の場合、または空のバケットは 0 とする。
/// 1 周期分に満たない系列（`season_length` が 0 の場合を含む）は空。
pub fn seasonal_indices(values: &[f64], season_length: usize) -> Vec<f64> {
    if season_length == 0 || values.len() < season_length {
        return vec![];
    }

    let overall_mean = mean(values);
    buckets(values, season_length)
        .iter()
        .map(|bucket| {
            if overall_mean == 0.0 {
                0.0
            } else {
                mean(bucket) / overall_mean
            }
        })
        .collect()
}
