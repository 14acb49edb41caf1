//! Interpolation primitives: cubic spline and quadratic Bezier sampling.

use crate::error::ChartError;

/// `n` evenly spaced samples across `[a, b]`, endpoints included.
pub fn linspace(a: f64, b: f64, n: usize) -> Vec<f64> {
    if n == 0 {
        return Vec::new();
    }
    if n == 1 {
        return vec![a];
    }
    let step = (b - a) / (n - 1) as f64;
    (0..n).map(|i| a + step * i as f64).collect()
}

/// Interpolating cubic spline through `(xs, ys)`, evaluated at `samples`
/// evenly spaced points across `[xs[0], xs[n-1]]`.
///
/// Natural boundary conditions; the curve passes through every knot
/// exactly. Requires at least 4 strictly increasing x values (degree-3
/// interpolation).
pub fn cubic_spline_sample(
    xs: &[f64],
    ys: &[f64],
    samples: usize,
) -> Result<Vec<(f64, f64)>, ChartError> {
    let n = xs.len();
    if n < 4 {
        return Err(ChartError::dataset(format!(
            "spline interpolation requires at least 4 points, got {n}"
        )));
    }
    if xs.windows(2).any(|w| w[1] <= w[0]) {
        return Err(ChartError::dataset(
            "spline interpolation requires strictly increasing x values",
        ));
    }

    // Second derivatives via the standard tridiagonal (Thomas) solve.
    let mut m = vec![0.0f64; n];
    let mut diag = vec![0.0f64; n];
    let mut rhs = vec![0.0f64; n];
    let h: Vec<f64> = xs.windows(2).map(|w| w[1] - w[0]).collect();

    diag[0] = 1.0;
    for i in 1..n - 1 {
        diag[i] = 2.0 * (h[i - 1] + h[i]);
        rhs[i] = 6.0 * ((ys[i + 1] - ys[i]) / h[i] - (ys[i] - ys[i - 1]) / h[i - 1]);
    }
    diag[n - 1] = 1.0;

    // Forward elimination (natural ends contribute nothing off-diagonal).
    let mut upper = vec![0.0f64; n];
    for i in 1..n - 1 {
        let w = h[i - 1] / diag[i - 1];
        diag[i] -= w * upper[i - 1];
        rhs[i] -= w * rhs[i - 1];
        upper[i] = h[i];
    }
    for i in (1..n - 1).rev() {
        m[i] = (rhs[i] - upper[i] * m[i + 1]) / diag[i];
    }

    let eval = |x: f64| -> f64 {
        // Locate the knot interval (clamped to the domain).
        let mut k = match xs.partition_point(|&v| v <= x) {
            0 => 0,
            p => p - 1,
        };
        if k >= n - 1 {
            k = n - 2;
        }
        let dx = xs[k + 1] - xs[k];
        let t = x - xs[k];
        let a = (xs[k + 1] - x) / dx;
        let b = t / dx;
        a * ys[k]
            + b * ys[k + 1]
            + ((a.powi(3) - a) * m[k] + (b.powi(3) - b) * m[k + 1]) * dx * dx / 6.0
    };

    Ok(linspace(xs[0], xs[n - 1], samples)
        .into_iter()
        .map(|x| (x, eval(x)))
        .collect())
}

/// Synthetic quadratic Bezier path: one segment per adjacent point pair,
/// anchored at the pair's endpoints with their midpoint as control point,
/// `steps` parameter samples per segment, concatenated in domain order.
pub fn quadratic_bezier_path(points: &[(f64, f64)], steps: usize) -> Vec<(f64, f64)> {
    let mut out = Vec::with_capacity(points.len().saturating_sub(1) * steps);
    for pair in points.windows(2) {
        let (x0, y0) = pair[0];
        let (x2, y2) = pair[1];
        let (cx, cy) = ((x0 + x2) / 2.0, (y0 + y2) / 2.0);
        for t in linspace(0.0, 1.0, steps) {
            let u = 1.0 - t;
            out.push((
                u * u * x0 + 2.0 * u * t * cx + t * t * x2,
                u * u * y0 + 2.0 * u * t * cy + t * t * y2,
            ));
        }
    }
    out
}
