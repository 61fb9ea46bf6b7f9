use crate::Result;
use crate::error::AnalysisError;
use std::cmp::Ordering;

// ==================== 記述統計 ====================
//
// 空の入力に対してはすべて 0 を返す。呼び出し側は空系列からの 0 を
// 「データなし」として扱うこと（有効な統計値ではない）。

/// 算術平均
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// 母分散（除数 n）
pub fn variance(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64
}

/// 母標準偏差
pub fn std_dev(values: &[f64]) -> f64 {
    variance(values).sqrt()
}

/// 昇順にソートしたコピーを返す
pub(crate) fn sorted(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    sorted
}

/// パーセンタイル（最近順位法）
///
/// 順位は `ceil(p/100 * n) - 1` を 0..n-1 にクランプしたもの。補間はしない。
pub fn percentile(values: &[f64], p: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let sorted = sorted(values);
    let rank = ((p / 100.0) * sorted.len() as f64).ceil() as i64 - 1;
    let index = rank.clamp(0, sorted.len() as i64 - 1) as usize;
    sorted[index]
}

/// 中央値（偶数個の場合は中央 2 値の平均）
pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let sorted = sorted(values);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        sorted[mid]
    } else {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    }
}

/// ピアソンの相関係数
///
/// どちらかのばらつきが 0 の場合や空の場合は 0。
pub fn correlation(xs: &[f64], ys: &[f64]) -> Result<f64> {
    if xs.len() != ys.len() {
        return Err(AnalysisError::LengthMismatch {
            left: xs.len(),
            right: ys.len(),
        });
    }
    if xs.is_empty() {
        return Ok(0.0);
    }

    let mean_x = mean(xs);
    let mean_y = mean(ys);

    let mut numerator = 0.0;
    let mut sum_sq_x = 0.0;
    let mut sum_sq_y = 0.0;
    for (x, y) in xs.iter().zip(ys.iter()) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        numerator += dx * dy;
        sum_sq_x += dx * dx;
        sum_sq_y += dy * dy;
    }

    let denominator = (sum_sq_x * sum_sq_y).sqrt();
    if denominator == 0.0 {
        Ok(0.0)
    } else {
        Ok(numerator / denominator)
    }
}

/// 相関行列（対角成分は 1）
pub fn correlation_matrix(columns: &[&[f64]]) -> Result<Vec<Vec<f64>>> {
    let mut matrix = vec![vec![0.0; columns.len()]; columns.len()];
    for i in 0..columns.len() {
        matrix[i][i] = 1.0;
        for j in (i + 1)..columns.len() {
            let r = correlation(columns[i], columns[j])?;
            matrix[i][j] = r;
            matrix[j][i] = r;
        }
    }
    Ok(matrix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assertables::*;
    use proptest::prelude::*;

    #[test]
    fn test_empty_inputs_are_zero() {
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(variance(&[]), 0.0);
        assert_eq!(std_dev(&[]), 0.0);
        assert_eq!(percentile(&[], 50.0), 0.0);
        assert_eq!(median(&[]), 0.0);
    }

    #[test]
    fn test_population_variance() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_eq!(mean(&values), 5.0);
        assert_eq!(variance(&values), 4.0);
        assert_eq!(std_dev(&values), 2.0);
    }

    #[test]
    fn test_percentile_nearest_rank() {
        let values = [15.0, 20.0, 35.0, 40.0, 50.0];
        assert_eq!(percentile(&values, 5.0), 15.0);
        assert_eq!(percentile(&values, 30.0), 20.0);
        assert_eq!(percentile(&values, 40.0), 20.0);
        assert_eq!(percentile(&values, 50.0), 35.0);
        assert_eq!(percentile(&values, 100.0), 50.0);
        // 範囲外の p はクランプされる
        assert_eq!(percentile(&values, 0.0), 15.0);
        assert_eq!(percentile(&values, 150.0), 50.0);
    }

    #[test]
    fn test_median() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), 2.0);
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), 2.5);
    }

    #[test]
    fn test_correlation() {
        let xs = [1.0, 2.0, 3.0, 4.0];
        let ys = [2.0, 4.0, 6.0, 8.0];
        let zs = [8.0, 6.0, 4.0, 2.0];
        assert!((correlation(&xs, &ys).unwrap() - 1.0).abs() < 1e-12);
        assert!((correlation(&xs, &zs).unwrap() + 1.0).abs() < 1e-12);
        assert_eq!(correlation(&xs, &[5.0; 4]).unwrap(), 0.0);
        assert_eq!(correlation(&[], &[]).unwrap(), 0.0);
    }

    #[test]
    fn test_correlation_length_mismatch() {
        let err = correlation(&[1.0, 2.0], &[1.0]).unwrap_err();
        assert_eq!(err, AnalysisError::LengthMismatch { left: 2, right: 1 });
    }

    #[test]
    fn test_correlation_matrix() {
        let a = [1.0, 2.0, 3.0];
        let b = [3.0, 2.0, 1.0];
        let c = [1.0, 5.0, 2.0];
        let matrix = correlation_matrix(&[&a[..], &b[..], &c[..]]).unwrap();

        assert_eq!(matrix.len(), 3);
        for (i, row) in matrix.iter().enumerate() {
            assert_eq!(row[i], 1.0);
            for (j, value) in row.iter().enumerate() {
                assert_eq!(*value, matrix[j][i]);
            }
        }
        assert!((matrix[0][1] + 1.0).abs() < 1e-12);

        assert!(correlation_matrix(&[&a[..], &[1.0][..]]).is_err());
    }

    proptest! {
        #[test]
        fn test_std_dev_non_negative(values in prop::collection::vec(-1e6..1e6_f64, 0..64)) {
            assert_ge!(std_dev(&values), 0.0);
        }

        #[test]
        fn test_percentile_within_range(
            values in prop::collection::vec(-1e6..1e6_f64, 1..64),
            p in 0.0..=100.0_f64,
        ) {
            let v = percentile(&values, p);
            let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
            let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
            assert_ge!(v, min);
            assert_le!(v, max);
        }
    }
}
