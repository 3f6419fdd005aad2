//! Beta distribution CDF and quantile.
//!
//! The CDF is the regularized incomplete beta function I_x(a, b), evaluated
//! with the Numerical Recipes continued fraction. The quantile inverts it by
//! bisection, which is slow but monotone and never leaves [0, 1].

use super::stable::log_beta;

const BETACF_MAX_ITERS: usize = 1000;
const BETACF_EPS: f64 = 1.0e-15;
const BETACF_FPMIN: f64 = 1.0e-300;

const INV_CDF_MAX_ITERS: usize = 200;
const INV_CDF_X_TOL: f64 = 1.0e-15;

/// Regularized incomplete beta function I_x(alpha, beta).
pub fn beta_cdf(x: f64, alpha: f64, beta: f64) -> f64 {
    if x.is_nan() || alpha.is_nan() || beta.is_nan() {
        return f64::NAN;
    }
    if alpha <= 0.0 || beta <= 0.0 {
        return f64::NAN;
    }
    if x <= 0.0 {
        return 0.0;
    }
    if x >= 1.0 {
        return 1.0;
    }
    let ln_bt = alpha * x.ln() + beta * (-x).ln_1p() - log_beta(alpha, beta);
    let bt = ln_bt.exp();
    let threshold = (alpha + 1.0) / (alpha + beta + 2.0);
    let cdf = if x < threshold {
        bt * betacf(alpha, beta, x) / alpha
    } else {
        1.0 - bt * betacf(beta, alpha, 1.0 - x) / beta
    };
    cdf.clamp(0.0, 1.0)
}

/// Inverse CDF (quantile) for Beta(alpha, beta).
///
/// Returns NaN for non-positive shape parameters or a NaN probability.
pub fn beta_inv_cdf(p: f64, alpha: f64, beta: f64) -> f64 {
    if p.is_nan() || alpha.is_nan() || beta.is_nan() {
        return f64::NAN;
    }
    if alpha <= 0.0 || beta <= 0.0 {
        return f64::NAN;
    }
    if p <= 0.0 {
        return 0.0;
    }
    if p >= 1.0 {
        return 1.0;
    }

    let mut low = 0.0;
    let mut high = 1.0;
    for _ in 0..INV_CDF_MAX_ITERS {
        let mid = 0.5 * (low + high);
        let cdf = beta_cdf(mid, alpha, beta);
        if cdf.is_nan() {
            return f64::NAN;
        }
        if cdf == p {
            return mid;
        }
        if cdf < p {
            low = mid;
        } else {
            high = mid;
        }
        if high - low <= INV_CDF_X_TOL {
            break;
        }
    }
    0.5 * (low + high)
}

fn betacf(alpha: f64, beta: f64, x: f64) -> f64 {
    let qab = alpha + beta;
    let qap = alpha + 1.0;
    let qam = alpha - 1.0;
    let mut c = 1.0;
    let mut d = 1.0 - qab * x / qap;
    if d.abs() < BETACF_FPMIN {
        d = BETACF_FPMIN;
    }
    d = 1.0 / d;
    let mut h = d;

    for m in 1..=BETACF_MAX_ITERS {
        let m_f = m as f64;
        let m2 = 2.0 * m_f;
        let aa = m_f * (beta - m_f) * x / ((qam + m2) * (alpha + m2));
        d = 1.0 + aa * d;
        if d.abs() < BETACF_FPMIN {
            d = BETACF_FPMIN;
        }
        c = 1.0 + aa / c;
        if c.abs() < BETACF_FPMIN {
            c = BETACF_FPMIN;
        }
        d = 1.0 / d;
        h *= d * c;

        let aa = -(alpha + m_f) * (qab + m_f) * x / ((alpha + m2) * (qap + m2));
        d = 1.0 + aa * d;
        if d.abs() < BETACF_FPMIN {
            d = BETACF_FPMIN;
        }
        c = 1.0 + aa / c;
        if c.abs() < BETACF_FPMIN {
            c = BETACF_FPMIN;
        }
        d = 1.0 / d;
        let del = d * c;
        h *= del;
        if (del - 1.0).abs() < BETACF_EPS {
            break;
        }
    }

    h
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
        if a.is_nan() || b.is_nan() {
            return false;
        }
        (a - b).abs() <= tol
    }

    #[test]
    fn cdf_uniform_matches_identity() {
        assert!(approx_eq(beta_cdf(0.42, 1.0, 1.0), 0.42, 1e-12));
    }

    #[test]
    fn cdf_closed_form_beta_2_1() {
        // Beta(2, 1) has CDF x^2.
        assert!(approx_eq(beta_cdf(0.3, 2.0, 1.0), 0.09, 1e-12));
        // Beta(1, 3) has CDF 1 - (1-x)^3.
        assert!(approx_eq(beta_cdf(0.2, 1.0, 3.0), 1.0 - 0.8f64.powi(3), 1e-12));
    }

    #[test]
    fn cdf_monotone() {
        assert!(beta_cdf(0.2, 2.0, 5.0) < beta_cdf(0.7, 2.0, 5.0));
    }

    #[test]
    fn cdf_large_shapes_is_centered() {
        // Beta(800, 200) has mean 0.8; the mean sits near the median.
        let cdf = beta_cdf(0.8, 800.0, 200.0);
        assert!(cdf > 0.45 && cdf < 0.55, "cdf={}", cdf);
    }

    #[test]
    fn cdf_rejects_invalid_shapes() {
        assert!(beta_cdf(0.5, 0.0, 1.0).is_nan());
        assert!(beta_cdf(f64::NAN, 1.0, 1.0).is_nan());
    }

    #[test]
    fn inv_cdf_uniform() {
        assert!(approx_eq(beta_inv_cdf(0.73, 1.0, 1.0), 0.73, 1e-12));
    }

    #[test]
    fn inv_cdf_inverts_cdf() {
        for &(p, a, b) in &[(0.25, 2.0, 5.0), (0.025, 80.0, 21.0), (0.975, 81.0, 20.0)] {
            let x = beta_inv_cdf(p, a, b);
            assert!(approx_eq(beta_cdf(x, a, b), p, 1e-9), "p={} a={} b={}", p, a, b);
        }
    }

    #[test]
    fn inv_cdf_closed_form() {
        // Beta(1, n) quantile: 1 - (1-p)^(1/n).
        let expected = 1.0 - (1.0f64 - 0.975).powf(1.0 / 10.0);
        assert!(approx_eq(beta_inv_cdf(0.975, 1.0, 10.0), expected, 1e-12));
    }

    #[test]
    fn inv_cdf_edges() {
        assert_eq!(beta_inv_cdf(0.0, 2.0, 3.0), 0.0);
        assert_eq!(beta_inv_cdf(1.0, 2.0, 3.0), 1.0);
        assert!(beta_inv_cdf(0.5, -1.0, 3.0).is_nan());
    }
}
