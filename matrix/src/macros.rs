/// Builds a [`Matrix`](crate::matrix::Matrix) row by row, rows separated by `;`.
///
/// ```
/// use matrix::matrix;
///
/// // 2 inputs plus the bias row, feeding 2 hidden units
/// let weights = matrix![
///     0.1, -0.2;
///     0.3, -0.4;
///     0.5, -0.6
/// ];
/// assert_eq!(weights.shape(), (3, 2));
/// ```
#[macro_export]
macro_rules! matrix {
    ( $( $($val:expr),+ );+ $(;)? ) => {{
        let rows: &[&[f64]] = &[ $( &[$($val),+] ),+ ];
        let cols = rows.first().map_or(0, |row| row.len());
        assert!(
            rows.iter().all(|row| row.len() == cols),
            "Inconsistent number of elements in the matrix rows"
        );
        $crate::matrix::Matrix::new(rows.len(), cols, rows.concat())
    }};
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_hidden_output_column() {
        // 4 hidden units plus bias feeding one output
        let weights = matrix![
            0.25;
            -0.5;
            0.125;
            1.0;
            -1.0
        ];
        assert_eq!(weights.shape(), (5, 1));
        assert_eq!(weights.data(), &[0.25, -0.5, 0.125, 1.0, -1.0]);
    }

    #[test]
    fn test_rows_are_stored_in_order() {
        let weights = matrix![
            0.1, -0.2, 0.05, 0.4;
            0.3, -0.4, 0.15, 0.2;
            0.5, -0.6, 0.25, 0.0;
        ];
        assert_eq!(weights.shape(), (3, 4));
        assert_eq!(weights.row(0), &[0.1, -0.2, 0.05, 0.4]);
        assert_eq!(weights.row(2), &[0.5, -0.6, 0.25, 0.0]);
        assert_eq!(weights[(1, 2)], 0.15);
    }

    #[test]
    fn test_values_may_be_expressions() {
        let low = -0.5;
        let high = 0.5;
        let weights = matrix![
            low, high;
            (low + high) / 2.0, high - low
        ];
        assert_eq!(weights.data(), &[-0.5, 0.5, 0.0, 1.0]);
    }

    #[test]
    #[should_panic(expected = "Inconsistent number of elements")]
    fn test_ragged_rows_panic() {
        let _ = matrix![
            0.1, 0.2;
            0.3
        ];
    }
}
