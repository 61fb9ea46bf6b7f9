use crate::stats::{mean, sorted, std_dev};
use serde::{Deserialize, Serialize};

// ==================== 型定義 ====================

/// IQR 外れ値の向き
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutlierKind {
    Low,
    High,
}

/// IQR 法で検出した外れ値
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IqrOutlier {
    /// 元の（ソート前の）系列でのインデックス
    pub index: usize,
    pub value: f64,
    pub kind: OutlierKind,
    /// 近い方の境界からの距離
    pub severity: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub lower: f64,
    pub upper: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IqrOutliers {
    pub outliers: Vec<IqrOutlier>,
    pub bounds: Bounds,
}

/// Z スコア法で検出した外れ値
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZScoreOutlier {
    pub index: usize,
    pub value: f64,
    pub z_score: f64,
    /// |z|
    pub severity: f64,
}

/// 平均値のシフトを検出した位置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Changepoint {
    pub index: usize,
    pub magnitude: f64,
    pub percent_change: f64,
}

// ==================== 定数 ====================

const IQR_MULTIPLIER: f64 = 1.5;

/// 変化点とみなす相対変化（前後平均の大きい方の 20%）
const CHANGEPOINT_RELATIVE_THRESHOLD: f64 = 0.2;

/// 変化点検出ウィンドウの最小幅
const MIN_CHANGEPOINT_WINDOW: usize = 3;

// ==================== 検出器 ====================

/// 四分位範囲（IQR）による外れ値検出
///
/// 四分位点はソート済みコピーの `floor(0.25 n)`, `floor(0.75 n)` 番目をそのまま使う。
/// 補間はしない。境界は `[q1 - 1.5 IQR, q3 + 1.5 IQR]`。
pub fn detect_outliers_iqr(values: &[f64]) -> IqrOutliers {
    if values.is_empty() {
        return IqrOutliers {
            outliers: vec![],
            bounds: Bounds {
                lower: 0.0,
                upper: 0.0,
            },
        };
    }

    let sorted = sorted(values);
    let n = sorted.len() as f64;
    let q1 = sorted[(n * 0.25).floor() as usize];
    let q3 = sorted[(n * 0.75).floor() as usize];
    let iqr = q3 - q1;

    let bounds = Bounds {
        lower: q1 - IQR_MULTIPLIER * iqr,
        upper: q3 + IQR_MULTIPLIER * iqr,
    };

    let outliers = values
        .iter()
        .enumerate()
        .filter_map(|(index, &value)| {
            if value < bounds.lower {
                Some(IqrOutlier {
                    index,
                    value,
                    kind: OutlierKind::Low,
                    severity: (value - bounds.lower).abs(),
                })
            } else if value > bounds.upper {
                Some(IqrOutlier {
                    index,
                    value,
                    kind: OutlierKind::High,
                    severity: (value - bounds.upper).abs(),
                })
            } else {
                None
            }
        })
        .collect();

    IqrOutliers { outliers, bounds }
}

/// Z スコアによる外れ値検出（母平均・母標準偏差）
///
/// 標準偏差が 0 の場合 z は常に 0 なので、定数系列は閾値に関係なく検出されない。
pub fn detect_outliers_zscore(values: &[f64], threshold: f64) -> Vec<ZScoreOutlier> {
    let m = mean(values);
    let sd = std_dev(values);

    values
        .iter()
        .enumerate()
        .filter_map(|(index, &value)| {
            let z_score = if sd == 0.0 { 0.0 } else { (value - m) / sd };
            if z_score.abs() > threshold {
                Some(ZScoreOutlier {
                    index,
                    value,
                    z_score,
                    severity: z_score.abs(),
                })
            } else {
                None
            }
        })
        .collect()
}

/// 前後 2 ウィンドウの平均差による変化点検出
///
/// 統計的な変化点検定ではなくヒューリスティック。
/// ウィンドウ幅は `max(3, n / 10)`。各インデックス i について直前 w 個と
/// 直後 w 個（i を含む）の平均を比べ、差が大きい方の平均の 20% を超えたら記録する。
/// 一つのシフトの周辺では隣接するインデックスがそれぞれ検出されるため、
/// 結果は連続したクラスタになる（統合はしない）。
///
/// 要素数が `2 * min_segment_length` 未満の場合は空。
pub fn detect_changepoints(values: &[f64], min_segment_length: usize) -> Vec<Changepoint> {
    if values.len() < min_segment_length.saturating_mul(2) {
        return vec![];
    }

    let window_size = MIN_CHANGEPOINT_WINDOW.max(values.len() / 10);
    if values.len() < window_size * 2 {
        return vec![];
    }

    (window_size..values.len() - window_size)
        .filter_map(|i| {
            let mean_before = mean(&values[i - window_size..i]);
            let mean_after = mean(&values[i..i + window_size]);

            let magnitude = (mean_after - mean_before).abs();
            let threshold = mean_before.max(mean_after) * CHANGEPOINT_RELATIVE_THRESHOLD;

            if magnitude > threshold {
                let percent_change = if mean_before == 0.0 {
                    0.0
                } else {
                    magnitude / mean_before * 100.0
                };
                Some(Changepoint {
                    index: i,
                    magnitude,
                    percent_change,
                })
            } else {
                None
            }
        })
        .collect()
}
