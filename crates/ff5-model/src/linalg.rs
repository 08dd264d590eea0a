//! Dense linear algebra for the normal equations.
//!
//! The regression only ever factorises a small symmetric positive-definite
//! matrix (`X'X`, one row per parameter), so a plain Cholesky decomposition
//! is enough and keeps the crate free of a LAPACK dependency.

use ndarray::{Array1, Array2};

use crate::{ModelError, Result};

/// Relative pivot size below which a matrix is treated as singular.
const SINGULAR_TOLERANCE: f64 = 1e-12;

fn ensure_square(matrix: &Array2<f64>) -> Result<usize> {
    let n = matrix.nrows();
    if n != matrix.ncols() {
        return Err(ModelError::DimensionMismatch {
            expected: n,
            actual: matrix.ncols(),
        });
    }
    Ok(n)
}

/// Cholesky decomposition `A = L L'` of a symmetric positive-definite matrix.
///
/// Only the lower triangle of `matrix` is read.
///
/// # Errors
/// * [`ModelError::Singular`] when a pivot is not meaningfully positive, which
///   for `X'X` means the regressors are collinear.
pub fn cholesky(matrix: &Array2<f64>) -> Result<Array2<f64>> {
    let n = ensure_square(matrix)?;
    let mut lower = Array2::<f64>::zeros((n, n));

    for j in 0..n {
        let mut diag = matrix[[j, j]];
        for k in 0..j {
            diag -= lower[[j, k]] * lower[[j, k]];
        }

        let scale = matrix[[j, j]].abs().max(f64::MIN_POSITIVE);
        if !diag.is_finite() || diag <= SINGULAR_TOLERANCE * scale {
            return Err(ModelError::Singular { pivot: j });
        }

        let pivot = diag.sqrt();
        lower[[j, j]] = pivot;

        for i in (j + 1)..n {
            let mut sum = matrix[[i, j]];
            for k in 0..j {
                sum -= lower[[i, k]] * lower[[j, k]];
            }
            lower[[i, j]] = sum / pivot;
        }
    }

    Ok(lower)
}

/// Solve `L L' x = b` given the Cholesky factor `L`.
pub fn cholesky_solve(lower: &Array2<f64>, rhs: &Array1<f64>) -> Result<Array1<f64>> {
    let n = ensure_square(lower)?;
    if rhs.len() != n {
        return Err(ModelError::DimensionMismatch {
            expected: n,
            actual: rhs.len(),
        });
    }

    // Forward substitution: L z = b
    let mut z = Array1::<f64>::zeros(n);
    for i in 0..n {
        let mut sum = rhs[i];
        for k in 0..i {
            sum -= lower[[i, k]] * z[k];
        }
        z[i] = sum / lower[[i, i]];
    }

    // Back substitution: L' x = z
    let mut x = Array1::<f64>::zeros(n);
    for i in (0..n).rev() {
        let mut sum = z[i];
        for k in (i + 1)..n {
            sum -= lower[[k, i]] * x[k];
        }
        x[i] = sum / lower[[i, i]];
    }

    Ok(x)
}

/// Inverse of `L L'` given the Cholesky factor `L`.
pub fn cholesky_inverse(lower: &Array2<f64>) -> Result<Array2<f64>> {
    let n = ensure_square(lower)?;
    let mut inverse = Array2::<f64>::zeros((n, n));

    for j in 0..n {
        let mut unit = Array1::<f64>::zeros(n);
        unit[j] = 1.0;
        let column = cholesky_solve(lower, &unit)?;
        inverse.column_mut(j).assign(&column);
    }

    // Symmetrise away rounding noise
    let symmetric = (&inverse + &inverse.t()) / 2.0;
    Ok(symmetric)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn test_cholesky_known_factor() {
        let a = array![[4.0, 12.0, -16.0], [12.0, 37.0, -43.0], [-16.0, -43.0, 98.0]];
        let l = cholesky(&a).unwrap();

        let expected = array![[2.0, 0.0, 0.0], [6.0, 1.0, 0.0], [-8.0, 5.0, 3.0]];
        for i in 0..3 {
            for j in 0..3 {
                assert_abs_diff_eq!(l[[i, j]], expected[[i, j]], epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_cholesky_reconstructs() {
        let a = array![[2.0, 1.0, 1.0], [1.0, 2.0, 1.0], [1.0, 1.0, 2.0]];
        let l = cholesky(&a).unwrap();
        let rebuilt = l.dot(&l.t());

        for i in 0..3 {
            for j in 0..3 {
                assert_abs_diff_eq!(rebuilt[[i, j]], a[[i, j]], epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_cholesky_singular() {
        // Second row is twice the first
        let a = array![[1.0, 2.0], [2.0, 4.0]];
        let err = cholesky(&a).unwrap_err();
        assert!(matches!(err, ModelError::Singular { pivot: 1 }));
    }

    #[test]
    fn test_cholesky_not_square() {
        let a = Array2::<f64>::zeros((2, 3));
        assert!(matches!(
            cholesky(&a),
            Err(ModelError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_solve() {
        let a = array![[4.0, 1.0], [1.0, 3.0]];
        let b = array![1.0, 2.0];
        let l = cholesky(&a).unwrap();
        let x = cholesky_solve(&l, &b).unwrap();

        // 4x + y = 1, x + 3y = 2 => x = 1/11, y = 7/11
        assert_abs_diff_eq!(x[0], 1.0 / 11.0, epsilon = 1e-12);
        assert_abs_diff_eq!(x[1], 7.0 / 11.0, epsilon = 1e-12);
    }

    #[test]
    fn test_solve_dimension_mismatch() {
        let l = cholesky(&Array2::<f64>::eye(2)).unwrap();
        let b = array![1.0, 2.0, 3.0];
        assert!(cholesky_solve(&l, &b).is_err());
    }

    #[test]
    fn test_inverse() {
        let a = array![[4.0, 1.0], [1.0, 3.0]];
        let l = cholesky(&a).unwrap();
        let inv = cholesky_inverse(&l).unwrap();
        let identity = a.dot(&inv);

        for i in 0..2 {
            for j in 0..2 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert_abs_diff_eq!(identity[[i, j]], expected, epsilon = 1e-12);
            }
        }
    }
}
