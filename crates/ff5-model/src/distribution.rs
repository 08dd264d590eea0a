//! Student-t and F distribution functions for regression inference.
//!
//! Both distributions reduce to the regularised incomplete beta function,
//! evaluated with the continued-fraction expansion (modified Lentz).

use std::f64::consts::PI;

const LANCZOS_G: f64 = 7.0;
const LANCZOS: [f64; 9] = [
    0.999_999_999_999_809_9,
    676.520_368_121_885_1,
    -1_259.139_216_722_402_8,
    771.323_428_777_653_1,
    -176.615_029_162_140_6,
    12.507_343_278_686_905,
    -0.138_571_095_265_720_12,
    9.984_369_578_019_572e-6,
    1.505_632_735_149_311_6e-7,
];

const CF_MAX_ITERATIONS: usize = 300;
const CF_EPSILON: f64 = 1e-15;
const CF_TINY: f64 = 1e-300;

/// Natural log of the gamma function (Lanczos approximation).
pub fn ln_gamma(x: f64) -> f64 {
    if x < 0.5 {
        // Reflection: Γ(x)Γ(1-x) = π / sin(πx)
        return PI.ln() - (PI * x).sin().abs().ln() - ln_gamma(1.0 - x);
    }

    let x = x - 1.0;
    let t = x + LANCZOS_G + 0.5;
    let series = LANCZOS
        .iter()
        .enumerate()
        .skip(1)
        .fold(LANCZOS[0], |acc, (i, c)| acc + c / (x + i as f64));

    0.5 * (2.0 * PI).ln() + (x + 0.5) * t.ln() - t + series.ln()
}

fn beta_continued_fraction(a: f64, b: f64, x: f64) -> f64 {
    let qab = a + b;
    let qap = a + 1.0;
    let qam = a - 1.0;

    let mut c = 1.0;
    let mut d = 1.0 - qab * x / qap;
    if d.abs() < CF_TINY {
        d = CF_TINY;
    }
    d = 1.0 / d;
    let mut h = d;

    for m in 1..=CF_MAX_ITERATIONS {
        let m = m as f64;
        let m2 = 2.0 * m;

        // Even step
        let aa = m * (b - m) * x / ((qam + m2) * (a + m2));
        d = 1.0 + aa * d;
        if d.abs() < CF_TINY {
            d = CF_TINY;
        }
        c = 1.0 + aa / c;
        if c.abs() < CF_TINY {
            c = CF_TINY;
        }
        d = 1.0 / d;
        h *= d * c;

        // Odd step
        let aa = -(a + m) * (qab + m) * x / ((a + m2) * (qap + m2));
        d = 1.0 + aa * d;
        if d.abs() < CF_TINY {
            d = CF_TINY;
        }
        c = 1.0 + aa / c;
        if c.abs() < CF_TINY {
            c = CF_TINY;
        }
        d = 1.0 / d;
        let delta = d * c;
        h *= delta;

        if (delta - 1.0).abs() < CF_EPSILON {
            break;
        }
    }

    h
}

/// Regularised incomplete beta function `I_x(a, b)`.
pub fn regularized_incomplete_beta(a: f64, b: f64, x: f64) -> f64 {
    if x.is_nan() || a <= 0.0 || b <= 0.0 {
        return f64::NAN;
    }
    if x <= 0.0 {
        return 0.0;
    }
    if x >= 1.0 {
        return 1.0;
    }

    let ln_front =
        ln_gamma(a + b) - ln_gamma(a) - ln_gamma(b) + a * x.ln() + b * (1.0 - x).ln();
    let front = ln_front.exp();

    if x < (a + 1.0) / (a + b + 2.0) {
        front * beta_continued_fraction(a, b, x) / a
    } else {
        1.0 - front * beta_continued_fraction(b, a, 1.0 - x) / b
    }
}

/// Cumulative distribution function of Student's t with `df` degrees of freedom.
pub fn student_t_cdf(t: f64, df: f64) -> f64 {
    if t.is_nan() || df <= 0.0 {
        return f64::NAN;
    }
    if t.is_infinite() {
        return if t > 0.0 { 1.0 } else { 0.0 };
    }

    let tail = 0.5 * regularized_incomplete_beta(df / 2.0, 0.5, df / (df + t * t));
    if t > 0.0 { 1.0 - tail } else { tail }
}

/// Two-sided p-value `P(|T| > |t|)` for Student's t.
pub fn student_t_two_sided_p(t: f64, df: f64) -> f64 {
    if t.is_nan() || df <= 0.0 {
        return f64::NAN;
    }
    if t.is_infinite() {
        return 0.0;
    }
    regularized_incomplete_beta(df / 2.0, 0.5, df / (df + t * t)).clamp(0.0, 1.0)
}

/// Quantile (inverse CDF) of Student's t, found by bisection.
pub fn student_t_quantile(p: f64, df: f64) -> f64 {
    if !(p > 0.0 && p < 1.0) || df <= 0.0 {
        return f64::NAN;
    }

    let mut lo = -1.0;
    let mut hi = 1.0;
    while student_t_cdf(lo, df) > p && lo > -1e12 {
        lo *= 2.0;
    }
    while student_t_cdf(hi, df) < p && hi < 1e12 {
        hi *= 2.0;
    }

    for _ in 0..200 {
        let mid = 0.5 * (lo + hi);
        if student_t_cdf(mid, df) < p {
            lo = mid;
        } else {
            hi = mid;
        }
        if (hi - lo).abs() < 1e-13 * mid.abs().max(1.0) {
            break;
        }
    }

    0.5 * (lo + hi)
}

/// Survival function `P(F > f)` of the F distribution.
pub fn f_survival(f: f64, df_num: f64, df_den: f64) -> f64 {
    if f.is_nan() || df_num <= 0.0 || df_den <= 0.0 {
        return f64::NAN;
    }
    if f <= 0.0 {
        return 1.0;
    }
    if f.is_infinite() {
        return 0.0;
    }
    regularized_incomplete_beta(df_den / 2.0, df_num / 2.0, df_den / (df_den + df_num * f))
        .clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rstest::rstest;

    #[rstest]
    #[case(1.0, 0.0)]
    #[case(2.0, 0.0)]
    #[case(5.0, 24.0_f64.ln())]
    #[case(0.5, PI.sqrt().ln())]
    #[case(10.0, 362_880.0_f64.ln())]
    fn test_ln_gamma(#[case] x: f64, #[case] expected: f64) {
        assert_abs_diff_eq!(ln_gamma(x), expected, epsilon = 1e-10);
    }

    #[test]
    fn test_incomplete_beta_uniform() {
        // I_x(1, 1) = x
        for x in [0.1, 0.25, 0.5, 0.9] {
            assert_abs_diff_eq!(regularized_incomplete_beta(1.0, 1.0, x), x, epsilon = 1e-12);
        }
        assert_eq!(regularized_incomplete_beta(2.0, 3.0, 0.0), 0.0);
        assert_eq!(regularized_incomplete_beta(2.0, 3.0, 1.0), 1.0);
    }

    #[test]
    fn test_incomplete_beta_symmetry() {
        // I_x(a, b) = 1 - I_{1-x}(b, a)
        let lhs = regularized_incomplete_beta(2.5, 4.0, 0.3);
        let rhs = 1.0 - regularized_incomplete_beta(4.0, 2.5, 0.7);
        assert_abs_diff_eq!(lhs, rhs, epsilon = 1e-12);
    }

    #[test]
    fn test_t_cdf_symmetric() {
        assert_abs_diff_eq!(student_t_cdf(0.0, 7.0), 0.5, epsilon = 1e-12);
        let upper = student_t_cdf(1.3, 7.0);
        let lower = student_t_cdf(-1.3, 7.0);
        assert_abs_diff_eq!(upper + lower, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_t_cauchy() {
        // df = 1 is the Cauchy distribution: F(1) = 0.75
        assert_abs_diff_eq!(student_t_cdf(1.0, 1.0), 0.75, epsilon = 1e-10);
    }

    #[rstest]
    #[case(2.0, 10.0, 0.073_388_034)]
    #[case(2.228_138_85, 10.0, 0.05)]
    #[case(1.962_339_4, 1000.0, 0.05)]
    fn test_two_sided_p(#[case] t: f64, #[case] df: f64, #[case] expected: f64) {
        assert_abs_diff_eq!(student_t_two_sided_p(t, df), expected, epsilon = 1e-6);
        assert_abs_diff_eq!(student_t_two_sided_p(-t, df), expected, epsilon = 1e-6);
    }

    #[test]
    fn test_two_sided_p_edges() {
        assert_abs_diff_eq!(student_t_two_sided_p(0.0, 5.0), 1.0, epsilon = 1e-12);
        assert_eq!(student_t_two_sided_p(f64::INFINITY, 5.0), 0.0);
        assert!(student_t_two_sided_p(f64::NAN, 5.0).is_nan());
    }

    #[rstest]
    #[case(0.975, 10.0, 2.228_138_85)]
    #[case(0.975, 30.0, 2.042_272_46)]
    #[case(0.95, 5.0, 2.015_048_37)]
    #[case(0.5, 3.0, 0.0)]
    fn test_t_quantile(#[case] p: f64, #[case] df: f64, #[case] expected: f64) {
        assert_abs_diff_eq!(student_t_quantile(p, df), expected, epsilon = 1e-6);
    }

    #[test]
    fn test_t_quantile_inverts_cdf() {
        let q = student_t_quantile(0.1, 12.0);
        assert_abs_diff_eq!(student_t_cdf(q, 12.0), 0.1, epsilon = 1e-10);
        assert!(student_t_quantile(1.0, 12.0).is_nan());
    }

    #[test]
    fn test_f_matches_squared_t() {
        // F(1, d) is the square of t(d)
        let t: f64 = 1.7;
        let df = 23.0;
        assert_abs_diff_eq!(
            f_survival(t * t, 1.0, df),
            student_t_two_sided_p(t, df),
            epsilon = 1e-10
        );
    }

    #[test]
    fn test_f_survival_edges() {
        assert_eq!(f_survival(0.0, 5.0, 20.0), 1.0);
        assert_eq!(f_survival(f64::INFINITY, 5.0, 20.0), 0.0);
        let p = f_survival(2.71, 5.0, 20.0);
        assert!(p > 0.0 && p < 0.1);
    }
}
