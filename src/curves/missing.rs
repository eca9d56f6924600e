// reservoir-core/src/curves/missing.rs

/// Sentinel for a sample without data.
pub const MISSING_VALUE: f64 = f64::INFINITY;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MissingValueStrategy {
    DefaultValue,
    LinearInterpolation,
    OtherCurveProperty,
}

pub fn is_missing(value: f64) -> bool {
    value == MISSING_VALUE
}

pub fn has_missing_values(values: &[f64]) -> bool {
    values.iter().any(|&value| is_missing(value))
}

pub fn replace_missing_values(values: &mut [f64], default_value: f64) {
    for value in values.iter_mut().filter(|value| is_missing(**value)) {
        *value = default_value;
    }
}

pub fn replace_missing_values_with(values: &mut [f64], replacement: &[f64]) {
    for (value, &other) in values.iter_mut().zip(replacement) {
        if is_missing(*value) {
            *value = other;
        }
    }
}

/// Fills missing samples linearly in depth between the nearest present
/// neighbours. Ends are extended with the nearest present value.
pub fn interpolate_missing_values(depths: &[f64], values: &mut [f64]) {
    let present: Vec<usize> = (0..values.len())
        .filter(|&index| !is_missing(values[index]))
        .collect();
    if present.is_empty() || present.len() == values.len() {
        return;
    }
    for index in 0..values.len() {
        if !is_missing(values[index]) {
            continue;
        }
        let after = present.partition_point(|&p| p < index);
        let previous = after.checked_sub(1).map(|position| present[position]);
        let next = present.get(after).copied();
        values[index] = match (previous, next) {
            (Some(p), Some(n)) => {
                let span = depths[n] - depths[p];
                if span.abs() < f64::EPSILON {
                    values[p]
                } else {
                    values[p] + (values[n] - values[p]) * (depths[index] - depths[p]) / span
                }
            }
            (Some(p), None) => values[p],
            (None, Some(n)) => values[n],
            (None, None) => MISSING_VALUE,
        };
    }
}

/// Samples `source_values` at `target_depths`. Depths outside the source
/// range take the nearest end value; a missing neighbour gives a missing sample.
pub fn resample(target_depths: &[f64], source_depths: &[f64], source_values: &[f64]) -> Vec<f64> {
    let count = source_depths.len().min(source_values.len());
    target_depths
        .iter()
        .map(|&depth| {
            if count == 0 {
                return MISSING_VALUE;
            }
            let next = source_depths[..count].partition_point(|&d| d < depth);
            if next == 0 {
                return source_values[0];
            }
            if next == count {
                return source_values[count - 1];
            }
            if source_depths[next] == depth {
                return source_values[next];
            }
            let previous = next - 1;
            let (v0, v1) = (source_values[previous], source_values[next]);
            if is_missing(v0) || is_missing(v1) {
                return MISSING_VALUE;
            }
            let (d0, d1) = (source_depths[previous], source_depths[next]);
            v0 + (v1 - v0) * (depth - d0) / (d1 - d0)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replace_missing() {
        let mut values = vec![1.0, MISSING_VALUE, 3.0, f64::NEG_INFINITY];
        assert!(has_missing_values(&values));
        replace_missing_values(&mut values, 0.5);
        assert_eq!(values[..3], [1.0, 0.5, 3.0]);
        assert_eq!(values[3], f64::NEG_INFINITY);
        assert!(!has_missing_values(&values));

        let mut values = vec![MISSING_VALUE, 2.0];
        replace_missing_values_with(&mut values, &[7.0, 8.0]);
        assert_eq!(values, vec![7.0, 2.0]);
    }

    #[test]
    fn test_interpolate_by_depth() {
        let depths = [0.0, 1.0, 3.0, 4.0, 5.0];
        let mut values = vec![MISSING_VALUE, 10.0, MISSING_VALUE, 40.0, MISSING_VALUE];
        interpolate_missing_values(&depths, &mut values);
        assert!((values[0] - 10.0).abs() < 1e-12);
        assert!((values[2] - 30.0).abs() < 1e-12);
        assert!((values[4] - 40.0).abs() < 1e-12);

        let mut all_missing = vec![MISSING_VALUE; 3];
        interpolate_missing_values(&depths[..3], &mut all_missing);
        assert!(all_missing.iter().all(|&value| is_missing(value)));
    }

    #[test]
    fn test_resample() {
        let source_depths = [0.0, 1.0, 2.0, 3.0];
        let source_values = [0.0, 10.0, MISSING_VALUE, 30.0];
        let resampled = resample(&[-1.0, 0.5, 1.0, 1.5, 5.0], &source_depths, &source_values);
        assert_eq!(resampled[0], 0.0);
        assert!((resampled[1] - 5.0).abs() < 1e-12);
        assert_eq!(resampled[2], 10.0);
        assert!(is_missing(resampled[3]));
        assert_eq!(resampled[4], 30.0);
        assert!(is_missing(resample(&[1.0], &[], &[])[0]));
    }
}
