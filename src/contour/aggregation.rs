// reservoir-core/src/contour/aggregation.rs

use clap::ValueEnum;

/// How the 3-D cell values under one map cell become one map value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, ValueEnum)]
pub enum ResultAggregation {
    OilColumn,
    GasColumn,
    HydrocarbonColumn,
    #[default]
    Mean,
    HarmonicMean,
    GeometricMean,
    VolumeWeightedSum,
    Sum,
    TopValue,
    MinValue,
    MaxValue,
}

impl ResultAggregation {
    pub fn is_column_result(&self) -> bool {
        matches!(
            self,
            ResultAggregation::OilColumn
                | ResultAggregation::GasColumn
                | ResultAggregation::HydrocarbonColumn
        )
    }

    pub fn is_mean_result(&self) -> bool {
        matches!(
            self,
            ResultAggregation::Mean
                | ResultAggregation::HarmonicMean
                | ResultAggregation::GeometricMean
        )
    }

    /// Summations weighted by ray length through the cell instead of volume.
    pub fn is_straight_summation_result(&self) -> bool {
        self.is_column_result() || *self == ResultAggregation::Sum
    }

    pub fn is_summation_result(&self) -> bool {
        self.is_straight_summation_result() || *self == ResultAggregation::VolumeWeightedSum
    }
}

pub const MIN_MEAN_VALUE: f64 = 1e-8;

#[derive(Clone, Copy, Debug, Default)]
pub struct WeightedMeanCalculator {
    weighted_sum: f64,
    weight_sum: f64,
}

impl WeightedMeanCalculator {
    pub fn add(&mut self, value: f64, weight: f64) {
        self.weighted_sum += value * weight;
        self.weight_sum += weight;
    }

    pub fn valid_aggregated_weight(&self) -> bool {
        self.weight_sum > 1e-12
    }

    pub fn weighted_mean(&self) -> f64 {
        if self.valid_aggregated_weight() {
            self.weighted_sum / self.weight_sum
        } else {
            0.0
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct WeightedGeometricMeanCalculator {
    weighted_log_sum: f64,
    weight_sum: f64,
}

impl WeightedGeometricMeanCalculator {
    pub fn add(&mut self, value: f64, weight: f64) {
        self.weighted_log_sum += weight * libm::log(value);
        self.weight_sum += weight;
    }

    pub fn valid_aggregated_weight(&self) -> bool {
        self.weight_sum > 1e-12
    }

    pub fn weighted_mean(&self) -> f64 {
        if self.valid_aggregated_weight() {
            libm::exp(self.weighted_log_sum / self.weight_sum)
        } else {
            0.0
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct WeightedHarmonicMeanCalculator {
    weighted_inverse_sum: f64,
    weight_sum: f64,
}

impl WeightedHarmonicMeanCalculator {
    pub fn add(&mut self, value: f64, weight: f64) {
        self.weighted_inverse_sum += weight / value;
        self.weight_sum += weight;
    }

    pub fn valid_aggregated_weight(&self) -> bool {
        self.weight_sum > 1e-12 && self.weighted_inverse_sum != 0.0
    }

    pub fn weighted_mean(&self) -> f64 {
        if self.valid_aggregated_weight() {
            self.weight_sum / self.weighted_inverse_sum
        } else {
            0.0
        }
    }
}

/// Combines `(value, weight)` pairs ordered shallow to deep. Non-finite
/// values are skipped; no remaining value gives `f64::INFINITY`.
pub fn aggregate(aggregation: ResultAggregation, contributions: &[(f64, f64)]) -> f64 {
    let mut finite = contributions
        .iter()
        .copied()
        .filter(|(value, _)| value.is_finite())
        .peekable();
    if finite.peek().is_none() {
        return f64::INFINITY;
    }

    match aggregation {
        ResultAggregation::TopValue => finite.next().map_or(f64::INFINITY, |(value, _)| value),
        ResultAggregation::Mean => {
            let mut calculator = WeightedMeanCalculator::default();
            finite.for_each(|(value, weight)| calculator.add(value, weight));
            if calculator.valid_aggregated_weight() {
                calculator.weighted_mean()
            } else {
                f64::INFINITY
            }
        }
        ResultAggregation::GeometricMean => {
            let mut calculator = WeightedGeometricMeanCalculator::default();
            for (value, weight) in finite {
                if value < MIN_MEAN_VALUE {
                    return 0.0;
                }
                calculator.add(value, weight);
            }
            if calculator.valid_aggregated_weight() {
                calculator.weighted_mean()
            } else {
                f64::INFINITY
            }
        }
        ResultAggregation::HarmonicMean => {
            let mut calculator = WeightedHarmonicMeanCalculator::default();
            for (value, weight) in finite {
                if value.abs() < MIN_MEAN_VALUE {
                    return 0.0;
                }
                calculator.add(value, weight);
            }
            if calculator.valid_aggregated_weight() {
                calculator.weighted_mean()
            } else {
                f64::INFINITY
            }
        }
        ResultAggregation::MinValue => finite.map(|(value, _)| value).fold(f64::INFINITY, f64::min),
        ResultAggregation::MaxValue => finite
            .map(|(value, _)| value)
            .fold(f64::NEG_INFINITY, f64::max),
        ResultAggregation::VolumeWeightedSum
        | ResultAggregation::Sum
        | ResultAggregation::OilColumn
        | ResultAggregation::GasColumn
        | ResultAggregation::HydrocarbonColumn => {
            finite.map(|(value, weight)| value * weight).sum()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_finite_contribution_is_no_data() {
        assert_eq!(aggregate(ResultAggregation::Mean, &[]), f64::INFINITY);
        assert_eq!(
            aggregate(ResultAggregation::Sum, &[(f64::INFINITY, 1.0), (f64::NAN, 2.0)]),
            f64::INFINITY
        );
    }

    #[test]
    fn test_weighted_means() {
        let contributions = [(2.0, 1.0), (8.0, 1.0)];
        assert!((aggregate(ResultAggregation::Mean, &contributions) - 5.0).abs() < 1e-12);
        assert!((aggregate(ResultAggregation::GeometricMean, &contributions) - 4.0).abs() < 1e-12);
        assert!((aggregate(ResultAggregation::HarmonicMean, &contributions) - 3.2).abs() < 1e-12);
        assert!((aggregate(ResultAggregation::Mean, &[(2.0, 3.0), (6.0, 1.0)]) - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_means_collapse_on_tiny_values() {
        let contributions = [(1e-9, 1.0), (8.0, 1.0)];
        assert_eq!(aggregate(ResultAggregation::GeometricMean, &contributions), 0.0);
        assert_eq!(aggregate(ResultAggregation::HarmonicMean, &contributions), 0.0);
    }

    #[test]
    fn test_top_min_max_sum() {
        let contributions = [(f64::INFINITY, 1.0), (3.0, 0.5), (-1.0, 0.5), (7.0, 2.0)];
        assert_eq!(aggregate(ResultAggregation::TopValue, &contributions), 3.0);
        assert_eq!(aggregate(ResultAggregation::MinValue, &contributions), -1.0);
        assert_eq!(aggregate(ResultAggregation::MaxValue, &contributions), 7.0);
        assert!((aggregate(ResultAggregation::Sum, &contributions) - 15.0).abs() < 1e-12);
    }

    #[test]
    fn test_summation_families() {
        assert!(ResultAggregation::OilColumn.is_straight_summation_result());
        assert!(ResultAggregation::Sum.is_straight_summation_result());
        assert!(!ResultAggregation::VolumeWeightedSum.is_straight_summation_result());
        assert!(ResultAggregation::VolumeWeightedSum.is_summation_result());
        assert!(ResultAggregation::HarmonicMean.is_mean_result());
    }
}
