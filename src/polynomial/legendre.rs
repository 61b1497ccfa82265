//! Legendre polynomials on [-1, 1].
//!
//! Only what the quadrature rules need: values and first derivatives from the
//! three-term recurrence
//! (n+1) P_{n+1}(x) = (2n+1) x P_n(x) - n P_{n-1}(x).

/// Evaluate P_n(x) and P_{n-1}(x) together.
///
/// For n = 0 the second value is returned as 0.
fn legendre_pair(n: usize, x: f64) -> (f64, f64) {
    if n == 0 {
        return (1.0, 0.0);
    }

    let mut p_prev = 1.0;
    let mut p_curr = x;
    for k in 1..n {
        let p_next = ((2 * k + 1) as f64 * x * p_curr - k as f64 * p_prev) / (k + 1) as f64;
        p_prev = p_curr;
        p_curr = p_next;
    }
    (p_curr, p_prev)
}

/// Evaluate the Legendre polynomial P_n(x).
pub fn legendre(n: usize, x: f64) -> f64 {
    legendre_pair(n, x).0
}

/// Evaluate P_n(x) and P'_n(x).
///
/// At the endpoints the closed forms P'_n(±1) = (±1)^{n+1} n(n+1)/2 are used,
/// since the derivative identity divides by x² - 1.
pub fn legendre_and_derivative(n: usize, x: f64) -> (f64, f64) {
    if n == 0 {
        return (1.0, 0.0);
    }

    let (p_n, p_nm1) = legendre_pair(n, x);
    let end_slope = (n * (n + 1)) as f64 / 2.0;

    let dp_n = if (x - 1.0).abs() < 1e-14 {
        end_slope
    } else if (x + 1.0).abs() < 1e-14 {
        if n % 2 == 0 { -end_slope } else { end_slope }
    } else {
        n as f64 * (x * p_n - p_nm1) / (x * x - 1.0)
    };

    (p_n, dp_n)
}
