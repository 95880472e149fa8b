//! Exponential Moving Average, the building block of MACD.
//!
//! k = 2/(n+1), seed with first SMA, then EMA[i] = C[i]*k + EMA[i-1]*(1-k).
//! Warmup: first (n-1) values are undefined.

/// EMA over an arbitrary sequence, seeded with the SMA of the first `period`
/// values.
pub(crate) fn ema_values(data: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut values = vec![None; data.len()];
    if period == 0 || data.len() < period {
        return values;
    }

    let k = 2.0 / (period as f64 + 1.0);
    let mut ema = data[..period].iter().sum::<f64>() / period as f64;
    values[period - 1] = Some(ema);

    for i in period..data.len() {
        ema = data[i] * k + ema * (1.0 - k);
        values[i] = Some(ema);
    }

    values
}
