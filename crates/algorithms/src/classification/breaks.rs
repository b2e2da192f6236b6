//! Value classification into ordered classes
//!
//! Break strategies:
//! - **equal**: `n + 1` evenly spaced breaks between min and max
//! - **quantile**: breaks at sorted ranks `floor(len * i / n)`
//! - **jenks**: breaks at sorted ranks `i * floor(len / n)`. This is a
//!   fixed-step approximation; it does not optimize within-class variance
//!   the way Fisher-Jenks natural breaks do.

use fieldsurf_core::{ClassMethod, Error, GridCell, Result};

/// Compute `num_classes + 1` non-decreasing class breaks.
///
/// # Errors
/// - `InvalidParameter` when `num_classes < 2` or a value is not finite
/// - `EmptyResult` when `values` is empty
pub fn class_breaks(values: &[f64], num_classes: usize, method: ClassMethod) -> Result<Vec<f64>> {
    if num_classes < 2 {
        return Err(Error::invalid("num_classes", num_classes, "must be at least 2"));
    }
    if values.is_empty() {
        return Err(Error::EmptyResult("no values to classify".to_string()));
    }
    if let Some(v) = values.iter().find(|v| !v.is_finite()) {
        return Err(Error::invalid("value", v, "must be finite"));
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let len = sorted.len();
    let at = |idx: usize| sorted[idx.min(len - 1)];

    let breaks = match method {
        ClassMethod::Equal => {
            let min = sorted[0];
            let range = sorted[len - 1] - min;
            (0..=num_classes)
                .map(|i| min + range * i as f64 / num_classes as f64)
                .collect()
        }
        ClassMethod::Quantile => (0..=num_classes).map(|i| at(len * i / num_classes)).collect(),
        ClassMethod::Jenks => {
            let step = len / num_classes;
            (0..=num_classes).map(|i| at(i * step)).collect()
        }
    };
    Ok(breaks)
}

/// Class index of `value` under `breaks`.
///
/// Class `i` covers `breaks[i] <= value < breaks[i + 1]`. Values at or above
/// the last break go to the final class; anything matching no interval
/// (below the first break) falls back to class 0.
pub fn class_of(value: f64, breaks: &[f64]) -> usize {
    let num_classes = breaks.len().saturating_sub(1);
    if num_classes == 0 {
        return 0;
    }
    if value >= breaks[num_classes] {
        return num_classes - 1;
    }
    breaks
        .windows(2)
        .position(|w| value >= w[0] && value < w[1])
        .unwrap_or(0)
}

/// Copy `cells`, setting `class` from `breaks`.
///
/// # Errors
/// `InvalidParameter` when fewer than 3 breaks (2 classes) are supplied.
pub fn assign_classes(cells: &[GridCell], breaks: &[f64]) -> Result<Vec<GridCell>> {
    if breaks.len() < 3 {
        return Err(Error::invalid("breaks", breaks.len(), "need at least 3 breaks"));
    }
    Ok(cells
        .iter()
        .map(|cell| {
            let mut out = cell.clone();
            out.class = Some(class_of(cell.value, breaks));
            out
        })
        .collect())
}

/// Break the cell values into classes and assign them in one go.
pub fn classify(cells: &[GridCell], num_classes: usize, method: ClassMethod) -> Result<Vec<GridCell>> {
    let values: Vec<f64> = cells.iter().map(|c| c.value).collect();
    let breaks = class_breaks(&values, num_classes, method)?;
    assign_classes(cells, &breaks)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn one_to_hundred() -> Vec<f64> {
        (1..=100).map(|v| v as f64).collect()
    }

    #[test]
    fn test_quantile_ranks() {
        let b = class_breaks(&one_to_hundred(), 4, ClassMethod::Quantile).unwrap();
        // ranks 0, 25, 50, 75, 100 (clamped to 99)
        assert_eq!(b, vec![1.0, 26.0, 51.0, 76.0, 100.0]);
    }

    #[test]
    fn test_equal_interval() {
        let b = class_breaks(&[0.0, 3.0, 10.0], 5, ClassMethod::Equal).unwrap();
        assert_eq!(b, vec![0.0, 2.0, 4.0, 6.0, 8.0, 10.0]);
    }

    #[test]
    fn test_jenks_fixed_step() {
        let values: Vec<f64> = (0..10).map(|v| v as f64).collect();
        // step = floor(10 / 3) = 3 -> ranks 0, 3, 6, 9
        let b = class_breaks(&values, 3, ClassMethod::Jenks).unwrap();
        assert_eq!(b, vec![0.0, 3.0, 6.0, 9.0]);
    }

    #[test]
    fn test_breaks_non_decreasing() {
        let values = vec![5.0, -2.0, 5.0, 7.5, 0.0, 0.0, 13.0];
        for method in [ClassMethod::Equal, ClassMethod::Quantile, ClassMethod::Jenks] {
            for n in 2..=9 {
                let b = class_breaks(&values, n, method).unwrap();
                assert_eq!(b.len(), n + 1);
                assert!(b.windows(2).all(|w| w[0] <= w[1]), "{method:?} n={n}: {b:?}");
            }
        }
    }

    #[test]
    fn test_class_of_edges() {
        let b = [0.0, 10.0, 20.0, 30.0];
        assert_eq!(class_of(0.0, &b), 0);
        assert_eq!(class_of(9.99, &b), 0);
        assert_eq!(class_of(10.0, &b), 1);
        assert_eq!(class_of(30.0, &b), 2);
        assert_eq!(class_of(99.0, &b), 2);
        assert_eq!(class_of(-5.0, &b), 0);
    }

    #[test]
    fn test_every_cell_in_range() {
        let cells: Vec<GridCell> = (0..37)
            .map(|i| GridCell::new(0.0, i as f64, ((i * 7) % 11) as f64))
            .collect();
        for method in [ClassMethod::Equal, ClassMethod::Quantile, ClassMethod::Jenks] {
            let out = classify(&cells, 4, method).unwrap();
            assert!(out.iter().all(|c| c.class.is_some_and(|k| k < 4)));
        }
    }

    #[test]
    fn test_fewer_values_than_classes() {
        let cells = vec![GridCell::new(0.0, 0.0, 1.0), GridCell::new(0.0, 1.0, 2.0)];
        let out = classify(&cells, 5, ClassMethod::Jenks).unwrap();
        assert!(out.iter().all(|c| c.class == Some(4)));
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(class_breaks(&[1.0, 2.0], 1, ClassMethod::Equal).is_err());
        assert!(matches!(
            class_breaks(&[], 3, ClassMethod::Quantile),
            Err(Error::EmptyResult(_))
        ));
        assert!(class_breaks(&[1.0, f64::NAN], 2, ClassMethod::Equal).is_err());
    }
}
