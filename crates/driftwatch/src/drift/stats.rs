//! Statistical test routines for drift detection.
//!
//! Implemented in-crate so every drift decision is reproducible from this
//! source alone: two-sample Kolmogorov–Smirnov for numeric columns,
//! chi-squared homogeneity and population stability index for categorical
//! columns, plus the incomplete-gamma machinery the chi-squared p-value
//! needs. The numerical recipes follow the classic formulations (Lanczos
//! log-gamma, series/continued-fraction incomplete gamma, asymptotic
//! Kolmogorov distribution with the small-sample correction).

/// Maximum iterations for the incomplete gamma series and continued fraction.
const GAMMA_MAX_ITER: usize = 200;
/// Convergence tolerance for the incomplete gamma routines.
const GAMMA_EPS: f64 = 1e-12;
/// Floor applied to proportions before the PSI log-ratio.
const PSI_MIN_PROPORTION: f64 = 1e-4;

/// Two-sample Kolmogorov–Smirnov test.
///
/// Returns `(statistic, p_value)` where the statistic is the supremum
/// distance between the two empirical CDFs. Both slices must be non-empty.
pub fn ks_two_sample(reference: &[f64], current: &[f64]) -> (f64, f64) {
    debug_assert!(!reference.is_empty() && !current.is_empty());

    let mut a = reference.to_vec();
    let mut b = current.to_vec();
    a.sort_by(|x, y| x.partial_cmp(y).unwrap_or(std::cmp::Ordering::Equal));
    b.sort_by(|x, y| x.partial_cmp(y).unwrap_or(std::cmp::Ordering::Equal));

    let n1 = a.len();
    let n2 = b.len();
    let (mut i, mut j) = (0usize, 0usize);
    let mut d: f64 = 0.0;

    while i < n1 && j < n2 {
        let x1 = a[i];
        let x2 = b[j];
        if x1 <= x2 {
            i += 1;
        }
        if x2 <= x1 {
            j += 1;
        }
        let f1 = i as f64 / n1 as f64;
        let f2 = j as f64 / n2 as f64;
        let diff = (f1 - f2).abs();
        if diff > d {
            d = diff;
        }
    }

    (d, ks_p_value(d, n1, n2))
}

/// Asymptotic p-value for the two-sample KS statistic.
fn ks_p_value(d: f64, n1: usize, n2: usize) -> f64 {
    if d <= 0.0 {
        return 1.0;
    }

    let en = ((n1 * n2) as f64 / (n1 + n2) as f64).sqrt();
    let lambda = (en + 0.12 + 0.11 / en) * d;

    kolmogorov_survival(lambda)
}

/// Survival function of the Kolmogorov distribution,
/// `Q(lambda) = 2 * sum_{j>=1} (-1)^{j-1} exp(-2 j^2 lambda^2)`.
fn kolmogorov_survival(lambda: f64) -> f64 {
    let two_lambda_sq = -2.0 * lambda * lambda;
    let mut sum = 0.0;
    let mut sign = 1.0;
    let mut previous_term = 0.0f64;

    for j in 1..=100 {
        let term = sign * 2.0 * (two_lambda_sq * (j * j) as f64).exp();
        sum += term;
        if term.abs() <= 1e-8 * previous_term.abs() || term.abs() <= 1e-12 * sum.abs() {
            return sum.clamp(0.0, 1.0);
        }
        previous_term = term;
        sign = -sign;
    }

    // Series failed to converge: effectively no distance between the samples.
    1.0
}

/// Chi-squared test of homogeneity over two aligned frequency tables.
///
/// Returns `(statistic, p_value, min_expected)` where `min_expected` is the
/// smallest expected cell count, which the caller uses to decide whether the
/// chi-squared approximation is trustworthy. Categories with zero total
/// count contribute nothing. Fewer than two populated categories yields a
/// degenerate `(0, 1)` result.
pub fn chi_squared_homogeneity(reference: &[u64], current: &[u64]) -> (f64, f64, f64) {
    debug_assert_eq!(reference.len(), current.len());

    let ref_total: u64 = reference.iter().sum();
    let cur_total: u64 = current.iter().sum();
    let grand_total = (ref_total + cur_total) as f64;

    if ref_total == 0 || cur_total == 0 {
        return (0.0, 1.0, 0.0);
    }

    let mut statistic = 0.0;
    let mut min_expected = f64::INFINITY;
    let mut populated = 0usize;

    for (&r, &c) in reference.iter().zip(current) {
        let category_total = (r + c) as f64;
        if category_total == 0.0 {
            continue;
        }
        populated += 1;

        let expected_ref = ref_total as f64 * category_total / grand_total;
        let expected_cur = cur_total as f64 * category_total / grand_total;
        min_expected = min_expected.min(expected_ref).min(expected_cur);

        statistic += (r as f64 - expected_ref).powi(2) / expected_ref;
        statistic += (c as f64 - expected_cur).powi(2) / expected_cur;
    }

    if populated < 2 {
        return (0.0, 1.0, if populated == 0 { 0.0 } else { min_expected });
    }

    let dof = (populated - 1) as f64;
    let p_value = regularized_gamma_upper(dof / 2.0, statistic / 2.0);

    (statistic, p_value, min_expected)
}

/// Population stability index over two aligned frequency tables.
///
/// `PSI = sum_i (p_i - q_i) * ln(p_i / q_i)` with proportions floored at
/// [`PSI_MIN_PROPORTION`] so empty cells do not blow up the log-ratio.
pub fn population_stability_index(reference: &[u64], current: &[u64]) -> f64 {
    debug_assert_eq!(reference.len(), current.len());

    let ref_total: u64 = reference.iter().sum();
    let cur_total: u64 = current.iter().sum();
    if ref_total == 0 || cur_total == 0 {
        return 0.0;
    }

    let mut psi = 0.0;
    for (&r, &c) in reference.iter().zip(current) {
        let p = (r as f64 / ref_total as f64).max(PSI_MIN_PROPORTION);
        let q = (c as f64 / cur_total as f64).max(PSI_MIN_PROPORTION);
        psi += (p - q) * (p / q).ln();
    }

    psi
}

/// Natural log of the gamma function (Lanczos approximation).
pub fn ln_gamma(x: f64) -> f64 {
    const COEFFICIENTS: [f64; 6] = [
        76.18009172947146,
        -86.50532032941677,
        24.01409824083091,
        -1.231739572450155,
        0.1208650973866179e-2,
        -0.5395239384953e-5,
    ];

    let mut y = x;
    let tmp = x + 5.5;
    let tmp = tmp - (x + 0.5) * tmp.ln();
    let mut series = 1.000000000190015;
    for coefficient in COEFFICIENTS {
        y += 1.0;
        series += coefficient / y;
    }

    -tmp + (2.5066282746310005 * series / x).ln()
}

/// Regularized upper incomplete gamma function `Q(a, x)`.
///
/// For a chi-squared statistic `x2` with `dof` degrees of freedom, the
/// p-value is `Q(dof / 2, x2 / 2)`.
pub fn regularized_gamma_upper(a: f64, x: f64) -> f64 {
    if x <= 0.0 || a <= 0.0 {
        return 1.0;
    }

    if x < a + 1.0 {
        1.0 - gamma_series(a, x)
    } else {
        gamma_continued_fraction(a, x)
    }
}

/// Series representation of the regularized lower incomplete gamma `P(a, x)`.
fn gamma_series(a: f64, x: f64) -> f64 {
    let ln_g = ln_gamma(a);
    let mut ap = a;
    let mut sum = 1.0 / a;
    let mut delta = sum;

    for _ in 0..GAMMA_MAX_ITER {
        ap += 1.0;
        delta *= x / ap;
        sum += delta;
        if delta.abs() < sum.abs() * GAMMA_EPS {
            break;
        }
    }

    sum * (-x + a * x.ln() - ln_g).exp()
}

/// Continued-fraction representation of the regularized upper incomplete
/// gamma `Q(a, x)` (modified Lentz's method).
fn gamma_continued_fraction(a: f64, x: f64) -> f64 {
    const FPMIN: f64 = 1e-300;

    let ln_g = ln_gamma(a);
    let mut b = x + 1.0 - a;
    let mut c = 1.0 / FPMIN;
    let mut d = 1.0 / b;
    let mut h = d;

    for i in 1..=GAMMA_MAX_ITER {
        let an = -(i as f64) * (i as f64 - a);
        b += 2.0;
        d = an * d + b;
        if d.abs() < FPMIN {
            d = FPMIN;
        }
        c = b + an / c;
        if c.abs() < FPMIN {
            c = FPMIN;
        }
        d = 1.0 / d;
        let delta = d * c;
        h *= delta;
        if (delta - 1.0).abs() < GAMMA_EPS {
            break;
        }
    }

    ((-x + a * x.ln() - ln_g).exp() * h).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ks_identical_samples() {
        let values: Vec<f64> = (0..100).map(|i| i as f64).collect();
        let (d, p) = ks_two_sample(&values, &values);
        assert_eq!(d, 0.0);
        assert_eq!(p, 1.0);
    }

    #[test]
    fn test_ks_shifted_samples() {
        let reference: Vec<f64> = (0..100).map(|i| (i % 10) as f64).collect();
        let current: Vec<f64> = reference.iter().map(|v| v + 100.0).collect();
        let (d, p) = ks_two_sample(&reference, &current);
        assert!((d - 1.0).abs() < 1e-12);
        assert!(p < 1e-6);
    }

    #[test]
    fn test_ks_similar_samples_not_significant() {
        let reference: Vec<f64> = (0..200).map(|i| (i % 20) as f64).collect();
        // Same uniform spread with a handful of values nudged half a step
        let current: Vec<f64> = (0..200)
            .map(|i| (i % 20) as f64 + if i % 50 == 0 { 0.5 } else { 0.0 })
            .collect();
        let (_, p) = ks_two_sample(&reference, &current);
        assert!(p > 0.05);
    }

    #[test]
    fn test_chi_squared_identical_counts() {
        let counts = [50u64, 30, 20];
        let (stat, p, min_expected) = chi_squared_homogeneity(&counts, &counts);
        assert!(stat.abs() < 1e-12);
        assert!((p - 1.0).abs() < 1e-9);
        assert!(min_expected >= 5.0);
    }

    #[test]
    fn test_chi_squared_disjoint_counts() {
        let reference = [100u64, 0];
        let current = [0u64, 100];
        let (stat, p, _) = chi_squared_homogeneity(&reference, &current);
        assert!(stat > 100.0);
        assert!(p < 1e-6);
    }

    #[test]
    fn test_chi_squared_single_category_degenerate() {
        let (stat, p, _) = chi_squared_homogeneity(&[40], &[60]);
        assert_eq!(stat, 0.0);
        assert_eq!(p, 1.0);
    }

    #[test]
    fn test_chi_squared_p_value_reference_point() {
        // chi2 = 3.841 with 1 dof sits at p ~ 0.05
        let p = regularized_gamma_upper(0.5, 3.841 / 2.0);
        assert!((p - 0.05).abs() < 1e-3);
    }

    #[test]
    fn test_psi_identical_distributions() {
        let counts = [40u64, 35, 25];
        let psi = population_stability_index(&counts, &counts);
        assert!(psi.abs() < 1e-12);
    }

    #[test]
    fn test_psi_shifted_distributions() {
        let reference = [90u64, 10];
        let current = [10u64, 90];
        let psi = population_stability_index(&reference, &current);
        assert!(psi > 0.1);
    }

    #[test]
    fn test_ln_gamma_known_values() {
        // Gamma(5) = 24, Gamma(0.5) = sqrt(pi)
        assert!((ln_gamma(5.0) - 24.0f64.ln()).abs() < 1e-9);
        assert!((ln_gamma(0.5) - std::f64::consts::PI.sqrt().ln()).abs() < 1e-9);
    }

    #[test]
    fn test_regularized_gamma_bounds() {
        assert_eq!(regularized_gamma_upper(1.0, 0.0), 1.0);
        assert!(regularized_gamma_upper(1.0, 50.0) < 1e-12);
    }
}
