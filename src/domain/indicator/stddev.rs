//! Rolling population standard deviation, used by the Bollinger bands.
//!
//! STDDEV(n)[i] = sqrt(sum((C[i-j] - SMA(n)[i])^2 for j in 0..n-1) / n)
//! Warmup: first (n-1) values are undefined.

use crate::domain::indicator::rolling_mean;

pub(crate) fn stddev_values(data: &[f64], period: usize) -> Vec<Option<f64>> {
    rolling_mean(data, period)
        .iter()
        .enumerate()
        .map(|(i, mean)| -> Option<f64> {
            let mean = (*mean)?;
            let window = &data[i + 1 - period..=i];
            let variance = window
                .iter()
                .map(|c| {
                    let diff = c - mean;
                    diff * diff
                })
                .sum::<f64>()
                / period as f64;
            Some(variance.sqrt())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stddev_warmup() {
        let stddev = stddev_values(&[10.0, 20.0, 30.0, 40.0, 50.0], 3);

        assert!(stddev[0].is_none());
        assert!(stddev[1].is_none());
        assert!(stddev[2].is_some());
        assert!(stddev[4].is_some());
    }

    #[test]
    fn stddev_constant_values() {
        let stddev = stddev_values(&[100.0; 5], 3);
        assert!(stddev[2].unwrap().abs() < f64::EPSILON);
    }

    #[test]
    fn stddev_known_values() {
        let stddev = stddev_values(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0], 8);
        assert!((stddev[7].unwrap() - 2.0).abs() < 1e-10);
    }
}
