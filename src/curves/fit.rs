//! Least-squares curve fitting: quadratic polynomial and exponential.

use nalgebra::{DMatrix, DVector, Matrix3, Vector3};

use crate::error::ChartError;

/// Degree-2 polynomial least squares. Returns coefficients `[c2, c1, c0]`
/// (descending powers). Requires at least 3 points.
pub fn polyfit_quadratic(xs: &[f64], ys: &[f64]) -> Result<[f64; 3], ChartError> {
    let n = xs.len();
    if n < 3 {
        return Err(ChartError::dataset(format!(
            "polynomial fit requires at least 3 points, got {n}"
        )));
    }
    let a = DMatrix::from_fn(n, 3, |r, c| xs[r].powi(2 - c as i32));
    let b = DVector::from_column_slice(ys);
    let svd = a.svd(true, true);
    let sol = svd
        .solve(&b, 1.0e-12)
        .map_err(|e| ChartError::dataset(format!("polynomial fit failed: {e}")))?;
    Ok([sol[0], sol[1], sol[2]])
}

/// Evaluate `[c2, c1, c0]` at `x`.
pub fn poly_eval(coeffs: &[f64; 3], x: f64) -> f64 {
    (coeffs[0] * x + coeffs[1]) * x + coeffs[2]
}

/// Parameters of `y = a * e^(b * x) + c`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExpFit {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl ExpFit {
    pub fn eval(&self, x: f64) -> f64 {
        self.a * (self.b * x).exp() + self.c
    }
}

/// Iteration budget for the exponential solver.
const EXP_MAX_ITERS: usize = 500;

/// Fit `y = a·e^(b·x) + c` by Levenberg–Marquardt from the fixed initial
/// guess `(1, 1, 1)`.
///
/// Returns `None` on non-convergence or any non-finite intermediate value;
/// the caller degrades to plotting the raw series. This is deliberately a
/// recoverable failure, not an error.
pub fn fit_exponential(xs: &[f64], ys: &[f64]) -> Option<ExpFit> {
    if xs.len() < 3 {
        return None;
    }

    let sse = |p: &Vector3<f64>| -> f64 {
        xs.iter()
            .zip(ys)
            .map(|(&x, &y)| {
                let r = p[0] * (p[1] * x).exp() + p[2] - y;
                r * r
            })
            .sum()
    };

    let mut p = Vector3::new(1.0f64, 1.0, 1.0);
    let mut lambda = 1.0e-3;
    let mut err = sse(&p);
    if !err.is_finite() {
        return None;
    }
    let mut improved = false;

    for _ in 0..EXP_MAX_ITERS {
        // Accumulate JᵀJ and Jᵀr for the current parameters.
        let mut jtj = Matrix3::<f64>::zeros();
        let mut jtr = Vector3::<f64>::zeros();
        for (&x, &y) in xs.iter().zip(ys) {
            let e = (p[1] * x).exp();
            let r = p[0] * e + p[2] - y;
            let j = Vector3::new(e, p[0] * x * e, 1.0);
            jtj += j * j.transpose();
            jtr += j * r;
        }
        if !(jtj.iter().all(|v| v.is_finite()) && jtr.iter().all(|v| v.is_finite())) {
            return None;
        }

        // Damped normal equations; raise the damping until a step helps.
        let mut stepped = false;
        for _ in 0..16 {
            let mut damped = jtj;
            for i in 0..3 {
                damped[(i, i)] += lambda * (1.0 + jtj[(i, i)]);
            }
            let delta = match damped.try_inverse() {
                Some(inv) => inv * -jtr,
                None => break,
            };
            let candidate = p + delta;
            let cand_err = sse(&candidate);
            if cand_err.is_finite() && cand_err < err {
                let rel_improvement = (err - cand_err) / err.max(f64::MIN_POSITIVE);
                p = candidate;
                err = cand_err;
                lambda = (lambda * 0.5).max(1.0e-12);
                stepped = true;
                improved = true;
                if delta.norm() < 1.0e-12 || rel_improvement < 1.0e-14 {
                    return finish(p);
                }
                break;
            }
            lambda *= 10.0;
            if lambda > 1.0e12 {
                break;
            }
        }
        if !stepped {
            // No descent direction left. A solution that never moved off
            // the initial guess is a failed fit, not a converged one.
            return if improved { finish(p) } else { None };
        }
    }
    finish(p)
}

fn finish(p: Vector3<f64>) -> Option<ExpFit> {
    if p.iter().all(|v| v.is_finite()) {
        Some(ExpFit {
            a: p[0],
            b: p[1],
            c: p[2],
        })
    } else {
        None
    }
}
