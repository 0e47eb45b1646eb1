//! Tolerance-aware Gauss–Jordan reduction over dense runtime-sized matrices.

use nalgebra::DMatrix;

/// Row-echelon form of `matrix`, reduced (Gauss–Jordan) when `reduced` is
/// true, standard echelon form otherwise.
///
/// Pivots are searched down the current column; entries below `tolerance` in
/// magnitude are treated as zero, and a column with no usable pivot is skipped
/// without elimination. Division by the pivot only happens when its magnitude
/// is at least `tolerance`. The result always has the input's dimensions, even
/// for singular input.
pub fn row_echelon_form(matrix: &DMatrix<f64>, reduced: bool, tolerance: f64) -> DMatrix<f64> {
    let mut matrix = matrix.clone_owned();
    let (row_count, column_count) = matrix.shape();
    let mut lead = 0;

    for r in 0..row_count {
        if lead == column_count {
            break;
        }

        let mut i = r;
        while matrix[(i, lead)].abs() < tolerance {
            i += 1;
            if i == row_count {
                i = r;
                lead += 1;
                if lead == column_count {
                    lead -= 1;
                    break;
                }
            }
        }

        matrix.swap_rows(r, i);

        let div = matrix[(r, lead)];
        if div.abs() >= tolerance {
            for j in 0..column_count {
                matrix[(r, j)] /= div;
            }
        }

        let first = if reduced { 0 } else { r + 1 };
        for w in first..row_count {
            if w != r {
                let sub = matrix[(w, lead)];
                for k in 0..column_count {
                    matrix[(w, k)] -= sub * matrix[(r, k)];
                }
            }
        }

        lead += 1;
    }

    matrix
}

/// Number of rows with at least one entry of magnitude `tolerance` or more.
/// On an echelon form this bounds the numerical rank from above.
pub fn count_nonzero_rows(matrix: &DMatrix<f64>, tolerance: f64) -> usize {
    let (rows, columns) = matrix.shape();
    let mut count = 0;
    for i in 0..rows {
        for j in 0..columns {
            if matrix[(i, j)].abs() >= tolerance {
                count += 1;
                break;
            }
        }
    }
    count
}

/// Advisory reduction tolerance scaled to the matrix: `tolerance` grown by the
/// larger dimension and the largest absolute row sum, capped below one.
/// Guards against treating genuinely non-zero pivots of an ill-scaled matrix
/// as zero; the caller decides whether to use it.
pub fn echelon_tolerance(matrix: &DMatrix<f64>, tolerance: f64) -> f64 {
    let (rows, columns) = matrix.shape();
    let mut max_row_sum: f64 = 0.0;
    for i in 0..rows {
        let mut row_sum = 0.0;
        for j in 0..columns {
            row_sum += matrix[(i, j)].abs();
        }
        max_row_sum = max_row_sum.max(row_sum);
    }

    let result = tolerance * rows.max(columns) as f64 * max_row_sum;
    if result >= 1.0 {
        1.0 - tolerance
    } else {
        result
    }
}
