use crate::Record;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;

// ==================== 型定義 ====================

/// 主要 KPI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiSet {
    pub total_revenue: f64,
    pub total_quantity: f64,
    pub average_value: f64,
    pub average_quantity: f64,
    /// 数量あたりの売上
    pub efficiency: f64,
}

/// パレート分析の対象キー
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParetoKey {
    Value,
    Quantity,
}

impl ParetoKey {
    pub fn of(&self, record: &Record) -> f64 {
        match self {
            ParetoKey::Value => record.value,
            ParetoKey::Quantity => record.quantity_or_default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParetoItem<T> {
    pub item: T,
    pub cumulative_percentage: f64,
    pub is_in_top80: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParetoResult<T> {
    pub selected_count: usize,
    /// 全件数に対する選択件数の割合（%）
    pub selected_percentage_of_items: f64,
    pub items: Vec<ParetoItem<T>>,
}

/// ROI などの収益性指標
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EfficiencyMetrics {
    pub revenue: f64,
    pub costs: f64,
    pub profit: f64,
    pub roi: f64,
    pub profit_margin: f64,
    pub breakeven: f64,
    /// ROI が正かどうか（表示文言は表示側の責務）
    pub is_profitable: bool,
}

/// カテゴリごとの売上構成
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryShare {
    pub category: Option<String>,
    pub total: f64,
    pub count: usize,
    pub share_percentage: f64,
}

// ==================== 定数 ====================

/// パレートの累積シェア境界（%）
const PARETO_BOUNDARY: f64 = 80.0;

// ==================== 指標計算 ====================

/// KPI の集計
///
/// 数量が未指定のレコードは 1 として数える。空の入力ではすべて 0。
pub fn calculate_kpis(records: &[Record]) -> KpiSet {
    if records.is_empty() {
        return KpiSet {
            total_revenue: 0.0,
            total_quantity: 0.0,
            average_value: 0.0,
            average_quantity: 0.0,
            efficiency: 0.0,
        };
    }

    let count = records.len() as f64;
    let total_revenue: f64 = records.iter().map(|r| r.value).sum();
    let total_quantity: f64 = records.iter().map(|r| r.quantity_or_default()).sum();

    KpiSet {
        total_revenue,
        total_quantity,
        average_value: total_revenue / count,
        average_quantity: total_quantity / count,
        efficiency: if total_quantity == 0.0 {
            0.0
        } else {
            total_revenue / total_quantity
        },
    }
}

/// パレート（80/20）分析
///
/// キーの降順に並べ、累積シェアが初めて 80% 以上になった項目までを選ぶ
/// （境界の項目も含む最小の先頭部分）。合計が 0 の場合の累積シェアは 0。
pub fn pareto_analysis<T, F>(items: &[T], key: F) -> ParetoResult<T>
where
    T: Clone,
    F: Fn(&T) -> f64,
{
    let mut sorted: Vec<&T> = items.iter().collect();
    sorted.sort_by(|a, b| key(b).partial_cmp(&key(a)).unwrap_or(Ordering::Equal));

    let total: f64 = sorted.iter().map(|item| key(item)).sum();

    let mut running = 0.0;
    let mut selected = Vec::new();
    for item in sorted {
        running += key(item);
        let cumulative_percentage = if total == 0.0 {
            0.0
        } else {
            running / total * 100.0
        };

        selected.push(ParetoItem {
            item: item.clone(),
            cumulative_percentage,
            is_in_top80: cumulative_percentage <= PARETO_BOUNDARY,
        });

        if cumulative_percentage >= PARETO_BOUNDARY {
            break;
        }
    }

    let selected_percentage_of_items = if items.is_empty() {
        0.0
    } else {
        selected.len() as f64 / items.len() as f64 * 100.0
    };

    ParetoResult {
        selected_count: selected.len(),
        selected_percentage_of_items,
        items: selected,
    }
}

/// レコードに対するパレート分析
pub fn pareto_records(records: &[Record], key: ParetoKey) -> ParetoResult<Record> {
    pareto_analysis(records, |r| key.of(r))
}

/// ROI・利益率の計算
pub fn efficiency_metrics(revenue: f64, costs: f64) -> EfficiencyMetrics {
    let profit = revenue - costs;
    let roi = if costs == 0.0 {
        0.0
    } else {
        profit / costs * 100.0
    };
    let profit_margin = if revenue == 0.0 {
        0.0
    } else {
        profit / revenue * 100.0
    };

    EfficiencyMetrics {
        revenue,
        costs,
        profit,
        roi,
        profit_margin,
        breakeven: costs,
        is_profitable: roi > 0.0,
    }
}

/// カテゴリ別の売上合計と構成比（合計の降順）
pub fn category_breakdown(records: &[Record]) -> Vec<CategoryShare> {
    let mut groups: BTreeMap<Option<&str>, (f64, usize)> = BTreeMap::new();
    for record in records {
        let entry = groups.entry(record.category.as_deref()).or_insert((0.0, 0));
        entry.0 += record.value;
        entry.1 += 1;
    }

    let grand_total: f64 = groups.values().map(|(total, _)| total).sum();

    let mut shares: Vec<CategoryShare> = groups
        .into_iter()
        .map(|(category, (total, count))| CategoryShare {
            category: category.map(str::to_string),
            total,
            count,
            share_percentage: if grand_total == 0.0 {
                0.0
            } else {
                total / grand_total * 100.0
            },
        })
        .collect();

    shares.sort_by(|a, b| b.total.partial_cmp(&a.total).unwrap_or(Ordering::Equal));
    shares
}

#[cfg(test)]
mod tests;
