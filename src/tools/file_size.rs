use anyhow::{Context, Result};
use std::path::Path;

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// 位元組換算成 MB，保留一位小數
#[must_use]
pub fn bytes_to_mb(bytes: u64) -> f64 {
    (bytes as f64 / BYTES_PER_MB * 10.0).round() / 10.0
}

/// 取得檔案大小（MB，保留一位小數）
pub fn file_size_mb(path: &Path) -> Result<f64> {
    let metadata = std::fs::metadata(path)
        .with_context(|| format!("無法讀取檔案資訊: {}", path.display()))?;
    Ok(bytes_to_mb(metadata.len()))
}

/// 以一位小數精度比較，嚴格大於上限才算超過
#[must_use]
pub fn exceeds_limit(size_mb: f64, limit_mb: f64) -> bool {
    to_tenths(size_mb) > to_tenths(limit_mb)
}

fn to_tenths(value: f64) -> i64 {
    (value * 10.0).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bytes_to_mb_rounds_to_one_decimal() {
        assert!((bytes_to_mb(10 * 1024 * 1024) - 10.0).abs() < f64::EPSILON);
        assert!((bytes_to_mb(1024 * 1024 + 100 * 1024) - 1.1).abs() < f64::EPSILON);
        assert!(bytes_to_mb(0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_exactly_at_limit_is_not_over() {
        assert!(!exceeds_limit(45.0, 45.0));
        assert!(exceeds_limit(45.1, 45.0));
        assert!(!exceeds_limit(44.9, 45.0));
    }

    #[test]
    fn test_float_noise_does_not_cross_limit() {
        let accumulated = 0.1 + 0.2 + 44.7;
        assert!(!exceeds_limit(accumulated, 45.0));
    }
}
