use crate::error::AnalysisError;
use crate::{AnalysisParams, Record, Result};
use logging::*;

// 入力境界での検証。数値計算の内部では検証しない。

/// すべての値が有限であることを確認する
pub fn finite_series(values: &[f64]) -> Result<()> {
    match values.iter().position(|v| !v.is_finite()) {
        Some(index) => {
            let log = DEFAULT.new(o!("function" => "validate::finite_series"));
            warn!(log, "rejecting non-finite value"; "index" => index, "len" => values.len());
            Err(AnalysisError::NonFiniteValue {
                index,
                value: values[index],
            })
        }
        None => Ok(()),
    }
}

/// レコードの値と数量が有限であることを確認する
pub fn finite_records(records: &[Record]) -> Result<()> {
    for (index, record) in records.iter().enumerate() {
        let bad = if !record.value.is_finite() {
            Some(record.value)
        } else {
            record.quantity.filter(|q| !q.is_finite())
        };
        if let Some(value) = bad {
            let log = DEFAULT.new(o!("function" => "validate::finite_records"));
            warn!(log, "rejecting record with non-finite number";
                "index" => index, "timestamp" => %record.timestamp);
            return Err(AnalysisError::NonFiniteValue { index, value });
        }
    }
    Ok(())
}

/// 並行する 2 つの系列の長さが一致することを確認する
pub fn same_length(left: usize, right: usize) -> Result<()> {
    if left != right {
        let log = DEFAULT.new(o!("function" => "validate::same_length"));
        warn!(log, "rejecting parallel sequences"; "left" => left, "right" => right);
        return Err(AnalysisError::LengthMismatch { left, right });
    }
    Ok(())
}

/// 分析パラメータの妥当性を確認する
pub fn params(params: &AnalysisParams) -> Result<()> {
    match params.find_invalid() {
        Some((name, reason)) => Err(AnalysisError::InvalidParameter { name, reason }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_finite_series() {
        assert!(finite_series(&[]).is_ok());
        assert!(finite_series(&[1.0, -2.0, 0.0]).is_ok());

        let err = finite_series(&[1.0, f64::NAN, f64::INFINITY]).unwrap_err();
        match err {
            AnalysisError::NonFiniteValue { index, value } => {
                assert_eq!(index, 1);
                assert!(value.is_nan());
            }
            _ => panic!("Expected NonFiniteValue"),
        }
    }

    #[test]
    fn test_finite_records() {
        let day = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let ok = vec![Record::new(day, 1.0), Record::new(day, 2.0).with_quantity(3.0)];
        assert!(finite_records(&ok).is_ok());

        let bad_quantity = vec![
            Record::new(day, 1.0),
            Record::new(day, 2.0).with_quantity(f64::NEG_INFINITY),
        ];
        assert_eq!(
            finite_records(&bad_quantity).unwrap_err(),
            AnalysisError::NonFiniteValue {
                index: 1,
                value: f64::NEG_INFINITY
            }
        );
    }

    #[test]
    fn test_same_length() {
        assert!(same_length(3, 3).is_ok());
        assert_eq!(
            same_length(3, 4).unwrap_err(),
            AnalysisError::LengthMismatch { left: 3, right: 4 }
        );
    }

    #[test]
    fn test_params() {
        assert!(params(&AnalysisParams::default()).is_ok());

        let bad = AnalysisParams {
            season_length: 0,
            ..AnalysisParams::default()
        };
        let err = params(&bad).unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::InvalidParameter {
                name: "season_length",
                ..
            }
        ));
        assert!(err.to_string().contains("season_length"));
    }
}
