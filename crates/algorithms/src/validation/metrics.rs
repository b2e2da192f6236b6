//! Summary accuracy statistics over held-out predictions

use fieldsurf_core::Metrics;

use super::CrossValidation;

/// Metrics over `(observed, predicted)` pairs.
///
/// - RMSE = sqrt(mean((p - o)^2))
/// - MAE = mean(|p - o|)
/// - R² = 1 - SSres / SStot, with SStot about the observed mean
/// - bias = mean(p - o), the negated mean of the residual-mode errors
///
/// When every observation is identical SStot is zero and R² is 1 for a
/// perfect fit, 0 otherwise. An empty input yields all zeros.
pub fn summarize(pairs: &[(f64, f64)]) -> Metrics {
    let n = pairs.len();
    if n == 0 {
        return Metrics { rmse: 0.0, mae: 0.0, r2: 0.0, bias: 0.0, n: 0 };
    }
    let nf = n as f64;

    let mean_obs = pairs.iter().map(|(o, _)| o).sum::<f64>() / nf;
    let mut ss_res = 0.0;
    let mut ss_tot = 0.0;
    let mut abs_sum = 0.0;
    let mut err_sum = 0.0;
    for &(o, p) in pairs {
        let e = p - o;
        ss_res += e * e;
        ss_tot += (o - mean_obs) * (o - mean_obs);
        abs_sum += e.abs();
        err_sum += e;
    }

    let r2 = if ss_tot > 0.0 {
        1.0 - ss_res / ss_tot
    } else if ss_res == 0.0 {
        1.0
    } else {
        0.0
    };

    Metrics {
        rmse: (ss_res / nf).sqrt(),
        mae: abs_sum / nf,
        r2,
        bias: err_sum / nf,
        n,
    }
}

/// [`summarize`] over a cross-validation run
pub fn cv_metrics(cv: &CrossValidation) -> Metrics {
    let pairs: Vec<(f64, f64)> = cv.records.iter().map(|r| (r.observed, r.predicted)).collect();
    summarize(&pairs)
}
