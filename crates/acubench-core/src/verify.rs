//! Triangle of Truth verification helpers.
//!
//! A textbook matrix product over the *untransposed* right operand, used as
//! ground truth for every kernel path. It shares no code or layout with the
//! kernels, so agreement means something.

/// Row-major transpose of an n×n matrix.
///
/// Kernels take the right operand as Bᵗ; callers holding B use this to
/// produce it.
pub fn transpose(matrix: &[i8], n: usize) -> Vec<i8> {
    assert_eq!(matrix.len(), n * n, "matrix dimensions mismatch");

    let mut transposed = vec![0i8; n * n];
    for i in 0..n {
        for j in 0..n {
            transposed[j * n + i] = matrix[i * n + j];
        }
    }
    transposed
}

/// Reference product A·B with B in its natural row-major layout.
///
/// Accumulates with two's-complement wrap-around, matching the kernels.
pub fn reference_product(a: &[i8], b: &[i8], n: usize) -> Vec<i32> {
    assert_eq!(a.len(), n * n, "A dimensions mismatch");
    assert_eq!(b.len(), n * n, "B dimensions mismatch");

    let mut r = vec![0i32; n * n];
    for i in 0..n {
        for j in 0..n {
            let mut acc = 0i32;
            for k in 0..n {
                acc = acc.wrapping_add(a[i * n + k] as i32 * b[k * n + j] as i32);
            }
            r[i * n + j] = acc;
        }
    }
    r
}

/// Result of comparing the leading rows of two result matrices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowCheck {
    pub checked: usize,
    pub mismatched: usize,
    pub first_mismatch: Option<usize>,
}

impl RowCheck {
    pub fn is_match(&self) -> bool {
        self.mismatched == 0
    }
}

/// Compare the first `rows` rows of two n×n result matrices.
pub fn compare_rows(expected: &[i32], actual: &[i32], n: usize, rows: usize) -> RowCheck {
    assert_eq!(expected.len(), n * n, "expected dimensions mismatch");
    assert_eq!(actual.len(), n * n, "actual dimensions mismatch");
    assert!(rows <= n, "rows ({}) > n ({})", rows, n);

    let mut mismatched = 0;
    let mut first_mismatch = None;

    for row in 0..rows {
        let range = row * n..(row + 1) * n;
        if expected[range.clone()] != actual[range] {
            mismatched += 1;
            first_mismatch.get_or_insert(row);
        }
    }

    RowCheck {
        checked: rows,
        mismatched,
        first_mismatch,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transpose() {
        let m = [1, 2, 3, 4, 5, 6, 7, 8, 9];
        assert_eq!(vec![1, 4, 7, 2, 5, 8, 3, 6, 9], transpose(&m, 3));
        assert_eq!(m.to_vec(), transpose(&transpose(&m, 3), 3));
    }

    #[test]
    fn test_reference_product_4x4() {
        let a = [80, 43, 16, 5, 70, 41, 38, 62, 31, 19, 97, 39, 66, 6, 40, 28];
        let b = [24, 12, 24, 29, 83, 59, 32, 44, 97, 38, 67, 13, 98, 64, 68, 29];

        let expected = vec![
            7531, 4425, 4708, 4565, 14845, 8671, 9754, 6126, 15552, 7675, 10503, 4127, 8706, 4458,
            6360, 3510,
        ];

        assert_eq!(expected, reference_product(&a, &b, 4));
    }

    #[test]
    fn test_reference_product_extremes() {
        // -128 * -128 summed n times stays exact in i32 for small n.
        let a = vec![i8::MIN; 9];
        let b = vec![i8::MIN; 9];
        assert!(reference_product(&a, &b, 3).iter().all(|&v| v == 3 * 16384));
    }

    #[test]
    fn test_compare_rows() {
        let expected = vec![1, 2, 3, 4, 5, 6, 7, 8, 9];
        let mut actual = expected.clone();
        assert!(compare_rows(&expected, &actual, 3, 3).is_match());

        actual[7] = 0;
        let check = compare_rows(&expected, &actual, 3, 3);
        assert_eq!(1, check.mismatched);
        assert_eq!(Some(2), check.first_mismatch);

        // Row 2 is outside the compared prefix.
        assert!(compare_rows(&expected, &actual, 3, 2).is_match());
    }
}
