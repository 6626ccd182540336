//! Mean, differencing and the KPSS level-stationarity test

/// KPSS critical value for level stationarity at the 5% significance level
pub const KPSS_CRITICAL_5PCT: f64 = 0.463;

/// Arithmetic mean, `0.0` for an empty slice
pub fn mean(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    data.iter().sum::<f64>() / data.len() as f64
}

/// Apply `order` rounds of first differencing
pub fn difference(data: &[f64], order: usize) -> Vec<f64> {
    let mut result = data.to_vec();
    for _ in 0..order {
        result = result.windows(2).map(|w| w[1] - w[0]).collect();
    }
    result
}

fn is_constant(data: &[f64]) -> bool {
    match data.first() {
        Some(first) => data.iter().all(|x| (x - first).abs() <= f64::EPSILON * first.abs().max(1.0)),
        None => true,
    }
}

/// KPSS statistic for the null hypothesis of level stationarity
///
/// Uses a Bartlett-weighted long-run variance with `trunc(3 * sqrt(n) / 13)`
/// lags. Returns `0.0` for series with no variation.
pub fn kpss_statistic(data: &[f64]) -> f64 {
    let n = data.len();
    if n < 2 {
        return 0.0;
    }

    let m = mean(data);
    let residuals: Vec<f64> = data.iter().map(|x| x - m).collect();

    let mut partial = 0.0;
    let mut eta = 0.0;
    for e in &residuals {
        partial += e;
        eta += partial * partial;
    }
    let nf = n as f64;
    eta /= nf * nf;

    let lags = ((3.0 * nf.sqrt()) / 13.0).trunc() as usize;
    let mut long_run = residuals.iter().map(|e| e * e).sum::<f64>() / nf;
    for lag in 1..=lags.min(n - 1) {
        let weight = 1.0 - lag as f64 / (lags as f64 + 1.0);
        let autocov: f64 = (lag..n)
            .map(|t| residuals[t] * residuals[t - lag])
            .sum::<f64>()
            / nf;
        long_run += 2.0 * weight * autocov;
    }

    if long_run <= 0.0 || !long_run.is_finite() {
        return 0.0;
    }
    eta / long_run
}

/// Number of differences needed before the KPSS test no longer rejects
/// level stationarity at 5%, capped at `max_d`
pub fn ndiffs(data: &[f64], max_d: usize) -> usize {
    let mut d = 0;
    let mut series = data.to_vec();

    while d < max_d
        && series.len() >= 3
        && !is_constant(&series)
        && kpss_statistic(&series) > KPSS_CRITICAL_5PCT
    {
        series = difference(&series, 1);
        d += 1;
    }

    d
}
