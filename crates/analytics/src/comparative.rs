use crate::stats::{mean, variance};
use serde::{Deserialize, Serialize};
use std::fmt;

// ==================== 型定義 ====================

/// 期間ごとの集計
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodSummary {
    pub sum: f64,
    pub mean: f64,
    pub count: usize,
}

impl PeriodSummary {
    fn of(values: &[f64]) -> Self {
        PeriodSummary {
            sum: values.iter().sum(),
            mean: mean(values),
            count: values.len(),
        }
    }
}

/// 変化の方向（合計の変化率の符号で決める）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeTrend {
    Growth,
    Decline,
    Flat,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodChange {
    pub absolute: f64,
    /// 合計の変化率（%）
    pub percentage: f64,
    /// 平均の変化率（%）
    pub mean_change_percentage: f64,
    pub trend: ChangeTrend,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub period1: PeriodSummary,
    pub period2: PeriodSummary,
    pub change: PeriodChange,
}

/// 有意水準のラベル
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Confidence {
    NinetyFivePercent,
    BelowNinetyFive,
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Confidence::NinetyFivePercent => write!(f, "95%"),
            Confidence::BelowNinetyFive => write!(f, "<95%"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignificanceResult {
    pub mean1: f64,
    pub mean2: f64,
    pub statistic: f64,
    pub is_significant: bool,
    pub confidence: Confidence,
}

// ==================== 定数 ====================

/// 両側 95% の臨界値（標本サイズによる補正はしない）
const CRITICAL_VALUE_95: f64 = 1.96;

// ==================== 比較 ====================

fn percent_change(before: f64, after: f64) -> f64 {
    if before == 0.0 {
        0.0
    } else {
        (after - before) / before * 100.0
    }
}

/// 2 期間の合計・平均の比較（period_a が基準、period_b が比較対象）
pub fn compare_periods(period_a: &[f64], period_b: &[f64]) -> ComparisonResult {
    let period1 = PeriodSummary::of(period_a);
    let period2 = PeriodSummary::of(period_b);

    let percentage = percent_change(period1.sum, period2.sum);
    let trend = if percentage > 0.0 {
        ChangeTrend::Growth
    } else if percentage < 0.0 {
        ChangeTrend::Decline
    } else {
        ChangeTrend::Flat
    };

    let change = PeriodChange {
        absolute: period2.sum - period1.sum,
        percentage,
        mean_change_percentage: percent_change(period1.mean, period2.mean),
        trend,
    };

    ComparisonResult {
        period1,
        period2,
        change,
    }
}

/// 前年比（Year-over-Year）
pub fn yoy_analysis(current_year: &[f64], previous_year: &[f64]) -> ComparisonResult {
    compare_periods(previous_year, current_year)
}

/// 前月比（Month-over-Month）
pub fn mom_analysis(current_month: &[f64], previous_month: &[f64]) -> ComparisonResult {
    compare_periods(previous_month, current_month)
}

/// 近似的な 2 標本の差の検定
///
/// プール分散は 2 つの母分散の単純平均（標本サイズで重み付けしない）で、
/// 厳密な Student / Welch の t 検定ではない。
/// `se = sqrt(pooled * (1/n_a + 1/n_b))`、`t = (mean_b - mean_a) / se`（se = 0 なら 0）。
/// どちらかの期間が空の場合は t = 0（有意差なし）。
pub fn compare_significance(period_a: &[f64], period_b: &[f64]) -> SignificanceResult {
    let mean1 = mean(period_a);
    let mean2 = mean(period_b);

    let statistic = if period_a.is_empty() || period_b.is_empty() {
        0.0
    } else {
        let pooled_variance = (variance(period_a) + variance(period_b)) / 2.0;
        let se = (pooled_variance
            * (1.0 / period_a.len() as f64 + 1.0 / period_b.len() as f64))
            .sqrt();
        if se == 0.0 { 0.0 } else { (mean2 - mean1) / se }
    };

    let is_significant = statistic.abs() > CRITICAL_VALUE_95;

    SignificanceResult {
        mean1,
        mean2,
        statistic,
        is_significant,
        confidence: if is_significant {
            Confidence::NinetyFivePercent
        } else {
            Confidence::BelowNinetyFive
        },
    }
}
