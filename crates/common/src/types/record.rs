use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 時系列の値（挿入順がそのまま時間順を表す）
pub type Series = Vec<f64>;

/// 取引レコード
///
/// 取り込み側でパース済みの値を受け取る。数値は有限であること、
/// 欠損値は 0 に正規化済みであることを前提とする。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub timestamp: NaiveDate,
    pub category: Option<String>,
    pub value: f64,
    /// 数量（未指定の場合は 1 として扱う）
    pub quantity: Option<f64>,
}

impl Record {
    pub fn new(timestamp: NaiveDate, value: f64) -> Self {
        Record {
            timestamp,
            category: None,
            value,
            quantity: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_quantity(mut self, quantity: f64) -> Self {
        self.quantity = Some(quantity);
        self
    }

    /// 数量（未指定なら 1）
    pub fn quantity_or_default(&self) -> f64 {
        self.quantity.unwrap_or(1.0)
    }
}

/// レコード列から値の系列を取り出す
pub fn values_of(records: &[Record]) -> Series {
    records.iter().map(|r| r.value).collect()
}
