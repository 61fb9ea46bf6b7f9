use serde::{Deserialize, Serialize};

// ==================== 型定義 ====================

/// トレンドの方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrendDirection {
    Rising,
    Falling,
    Flat,
}

impl TrendDirection {
    /// 傾きの符号だけで決める。許容幅は設けず、Flat は slope == 0 のときのみ
    pub fn from_slope(slope: f64) -> Self {
        if slope > 0.0 {
            TrendDirection::Rising
        } else if slope < 0.0 {
            TrendDirection::Falling
        } else {
            TrendDirection::Flat
        }
    }
}

/// 線形回帰の結果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendResult {
    pub slope: f64,
    pub intercept: f64,
    pub r2: f64,
    pub direction: TrendDirection,
}

impl TrendResult {
    fn none() -> Self {
        TrendResult {
            slope: 0.0,
            intercept: 0.0,
            r2: 0.0,
            direction: TrendDirection::Flat,
        }
    }
}

/// 隣接ウィンドウ間で傾きが大きく変わった位置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendChange {
    /// 新しいウィンドウの終端（排他的）のインデックス
    pub position: usize,
    pub previous_slope: f64,
    pub new_slope: f64,
    pub magnitude: f64,
}

// ==================== 定数 ====================

/// 傾き変化の絶対閾値（値のスケールでは正規化しない）
const SLOPE_CHANGE_THRESHOLD: f64 = 0.5;

// ==================== コアアルゴリズム ====================

/// インデックスを x とした最小二乗法による線形回帰
///
/// 日付の間隔は考慮しない（不等間隔でも位置で回帰する）。
/// 要素数が 2 未満なら傾き・切片・R² はすべて 0。
/// 定数系列（SStot = 0）の R² は 1 ではなく 0 とする。
pub fn linear_trend(values: &[f64]) -> TrendResult {
    if values.len() < 2 {
        return TrendResult::none();
    }

    let n = values.len() as f64;
    let x_mean = (0..values.len()).map(|i| i as f64).sum::<f64>() / n;
    let y_mean = values.iter().sum::<f64>() / n;

    let mut numerator = 0.0;
    let mut denominator = 0.0;
    for (i, y) in values.iter().enumerate() {
        let dx = i as f64 - x_mean;
        numerator += dx * (y - y_mean);
        denominator += dx.powi(2);
    }

    let slope = if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    };
    let intercept = y_mean - slope * x_mean;

    // 決定係数（R²）
    let ss_res: f64 = values
        .iter()
        .enumerate()
        .map(|(i, y)| (y - (slope * i as f64 + intercept)).powi(2))
        .sum();
    let ss_tot: f64 = values.iter().map(|y| (y - y_mean).powi(2)).sum();
    let r2 = if ss_tot == 0.0 {
        0.0
    } else {
        1.0 - ss_res / ss_tot
    };

    TrendResult {
        slope,
        intercept,
        r2,
        direction: TrendDirection::from_slope(slope),
    }
}

/// スライディングウィンドウの傾き比較によるトレンド変化検出
///
/// 長さ `window_size` の連続ウィンドウそれぞれの傾きを求め、
/// 隣接するウィンドウ間で傾きの差の絶対値が 0.5 を超えた位置を返す。
/// 要素数が `2 * window_size` 未満、または `window_size` が 0 の場合は空。
pub fn detect_trend_change(values: &[f64], window_size: usize) -> Vec<TrendChange> {
    if window_size == 0 || values.len() < window_size.saturating_mul(2) {
        return vec![];
    }

    let slopes: Vec<f64> = values
        .windows(window_size)
        .map(|window| linear_trend(window).slope)
        .collect();

    slopes
        .windows(2)
        .enumerate()
        .filter_map(|(i, pair)| {
            let magnitude = (pair[1] - pair[0]).abs();
            if magnitude > SLOPE_CHANGE_THRESHOLD {
                Some(TrendChange {
                    position: i + 1 + window_size,
                    previous_slope: pair[0],
                    new_slope: pair[1],
                    magnitude,
                })
            } else {
                None
            }
        })
        .collect()
}

/// 加速度（二階差分の平均）
///
/// 要素数が 3 未満なら 0。
pub fn acceleration(values: &[f64]) -> f64 {
    if values.len() < 3 {
        return 0.0;
    }

    let first_diff: Vec<f64> = values.windows(2).map(|w| w[1] - w[0]).collect();
    let second_diff: Vec<f64> = first_diff.windows(2).map(|w| w[1] - w[0]).collect();

    second_diff.iter().sum::<f64>() / second_diff.len() as f64
}
