/// Trapezoidal area under the curve traced by `(x[i], y[i])`.
///
/// Points where either coordinate is NaN are skipped, so a sweep that starts
/// on an undefined precision still integrates over the defined part.
pub fn trapezoidal_auc(x: &[f64], y: &[f64]) -> f64 {
    let mut auc = 0.0;
    let mut prev: Option<(f64, f64)> = None;
    for (&xi, &yi) in x.iter().zip(y.iter()) {
        if xi.is_nan() || yi.is_nan() {
            continue;
        }
        if let Some((px, py)) = prev {
            auc += (xi - px).abs() * (yi + py) / 2.0;
        }
        prev = Some((xi, yi));
    }
    auc
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn unit_square() {
        assert_abs_diff_eq!(trapezoidal_auc(&[0.0, 0.0, 1.0], &[0.0, 1.0, 1.0]), 1.0);
    }

    #[test]
    fn diagonal_is_half() {
        assert_abs_diff_eq!(trapezoidal_auc(&[0.0, 0.5, 1.0], &[0.0, 0.5, 1.0]), 0.5);
    }

    #[test]
    fn nan_points_skipped() {
        let x = [0.0, 0.5, 1.0];
        let y = [f64::NAN, 1.0, 0.5];
        assert_abs_diff_eq!(trapezoidal_auc(&x, &y), 0.375);
    }

    #[test]
    fn fewer_than_two_points() {
        assert_eq!(trapezoidal_auc(&[], &[]), 0.0);
        assert_eq!(trapezoidal_auc(&[0.3], &[0.7]), 0.0);
    }
}
