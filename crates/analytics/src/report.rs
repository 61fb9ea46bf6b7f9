use crate::anomaly::{
    Changepoint, IqrOutliers, ZScoreOutlier, detect_changepoints, detect_outliers_iqr,
    detect_outliers_zscore,
};
use crate::performance::{KpiSet, calculate_kpis};
use crate::seasonality::{SeasonalityResult, detect_seasonality};
use crate::trend::{TrendChange, TrendResult, acceleration, detect_trend_change, linear_trend};
use crate::{AnalysisParams, Record, Result, validate};
use chrono::{DateTime, Utc};
use common::types::values_of;
use logging::*;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// 分析結果から導かれる推奨事項
///
/// 発火条件のみがエンジンの責務で、文言は `Display` で既定のものを提供する。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Recommendation {
    /// 傾きが正
    PositiveTrend,
    /// 傾きが負
    NegativeTrend,
    /// 季節性あり
    Seasonal { strength: f64 },
    /// IQR 外れ値あり
    Outliers { count: usize },
    /// 変化点あり
    Changepoints { count: usize },
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Recommendation::PositiveTrend => {
                write!(f, "上昇トレンドを検出しました。現在の戦略を維持してください")
            }
            Recommendation::NegativeTrend => {
                write!(f, "下降トレンドです。販売戦略を見直してください")
            }
            Recommendation::Seasonal { strength } => {
                write!(f, "季節パターンを検出しました（強度: {:.1}%）", strength * 100.0)
            }
            Recommendation::Outliers { count } => {
                write!(f, "{} 件の異常値を検出しました。原因を調査してください", count)
            }
            Recommendation::Changepoints { count } => {
                write!(f, "{} 件の急激な変化を検出しました", count)
            }
        }
    }
}

/// 総合分析レポート
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub timestamp: DateTime<Utc>,
    pub kpis: KpiSet,
    pub trend: TrendResult,
    pub trend_changes: Vec<TrendChange>,
    pub seasonality: SeasonalityResult,
    pub acceleration: f64,
    pub outliers: IqrOutliers,
    pub zscore_outliers: Vec<ZScoreOutlier>,
    pub changepoints: Vec<Changepoint>,
    pub recommendations: Vec<Recommendation>,
}

/// 固定ルールによる推奨事項の導出
pub fn recommendations(
    trend: &TrendResult,
    seasonality: &SeasonalityResult,
    outliers: &IqrOutliers,
    changepoints: &[Changepoint],
) -> Vec<Recommendation> {
    let mut recommendations = Vec::new();

    if trend.slope > 0.0 {
        recommendations.push(Recommendation::PositiveTrend);
    } else if trend.slope < 0.0 {
        recommendations.push(Recommendation::NegativeTrend);
    }

    if seasonality.has_seasonality {
        recommendations.push(Recommendation::Seasonal {
            strength: seasonality.strength,
        });
    }

    if !outliers.outliers.is_empty() {
        recommendations.push(Recommendation::Outliers {
            count: outliers.outliers.len(),
        });
    }

    if !changepoints.is_empty() {
        recommendations.push(Recommendation::Changepoints {
            count: changepoints.len(),
        });
    }

    recommendations
}

/// 現在時刻でレポートを生成する
pub fn generate_report(
    records: &[Record],
    values: &[f64],
    params: &AnalysisParams,
) -> Result<Report> {
    generate_report_at(Utc::now(), records, values, params)
}

/// 指定時刻でレポートを生成する
///
/// `records` は KPI に、`values` は時系列の分析に使う。両者は同じ長さであること。
/// 同じ入力と時刻に対しては常に同じレポートを返す。
pub fn generate_report_at(
    timestamp: DateTime<Utc>,
    records: &[Record],
    values: &[f64],
    params: &AnalysisParams,
) -> Result<Report> {
    let log = DEFAULT.new(o!(
        "function" => "report::generate_report_at",
        "records" => records.len(),
        "values" => values.len(),
    ));

    validate::params(params)?;
    validate::finite_records(records)?;
    validate::finite_series(values)?;
    validate::same_length(records.len(), values.len())?;

    debug!(log, "start");

    let kpis = calculate_kpis(records);
    let trend = linear_trend(values);
    let trend_changes = detect_trend_change(values, params.trend_window_size);
    let seasonality = detect_seasonality(values, params.season_length);
    let acceleration = acceleration(values);
    let outliers = detect_outliers_iqr(values);
    let zscore_outliers = detect_outliers_zscore(values, params.zscore_threshold);
    let changepoints = detect_changepoints(values, params.min_segment_length);

    let recommendations = recommendations(&trend, &seasonality, &outliers, &changepoints);

    debug!(log, "success";
        "slope" => trend.slope,
        "r2" => trend.r2,
        "seasonality_strength" => seasonality.strength,
        "outliers" => outliers.outliers.len(),
        "changepoints" => changepoints.len(),
        "recommendations" => recommendations.len()
    );

    Ok(Report {
        timestamp,
        kpis,
        trend,
        trend_changes,
        seasonality,
        acceleration,
        outliers,
        zscore_outliers,
        changepoints,
        recommendations,
    })
}

/// レコードの値を時系列としてレポートを生成する
pub fn generate_report_from_records(
    timestamp: DateTime<Utc>,
    records: &[Record],
    params: &AnalysisParams,
) -> Result<Report> {
    let values = values_of(records);
    generate_report_at(timestamp, records, &values, params)
}

/// カテゴリごとにレポートを生成する（並列）
///
/// カテゴリ未設定のレコードは `None` のグループにまとめる。
/// グループ内の順序は入力の順序を保つ。
pub fn generate_reports_by_category(
    timestamp: DateTime<Utc>,
    records: &[Record],
    params: &AnalysisParams,
) -> Result<BTreeMap<Option<String>, Report>> {
    let log = DEFAULT.new(o!(
        "function" => "report::generate_reports_by_category",
        "records" => records.len(),
    ));

    let mut groups: BTreeMap<Option<String>, Vec<Record>> = BTreeMap::new();
    for record in records {
        groups
            .entry(record.category.clone())
            .or_default()
            .push(record.clone());
    }
    info!(log, "grouped records"; "categories" => groups.len());

    groups
        .into_par_iter()
        .map(|(category, group)| {
            let report = generate_report_from_records(timestamp, &group, params)?;
            Ok((category, report))
        })
        .collect()
}
