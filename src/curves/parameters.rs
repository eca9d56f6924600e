// reservoir-core/src/curves/parameters.rs

use super::errors::CurveError;
use super::missing::MissingValueStrategy;
use super::property::CurveProperty;
use derive_builder::Builder;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Elastic properties of one facies tabulated against porosity.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FaciesElasticProperties {
    porosity: Vec<f64>,
    properties: BTreeMap<CurveProperty, Vec<f64>>,
}

impl FaciesElasticProperties {
    /// `porosity` must be strictly increasing.
    pub fn new(porosity: Vec<f64>) -> Result<Self, CurveError> {
        if porosity.is_empty() || porosity.windows(2).any(|pair| pair[0] >= pair[1]) {
            return Err(CurveError::InvalidInputData(
                CurveProperty::Porosity,
                "elastic property porosities must be non-empty and strictly increasing".to_string(),
            ));
        }
        Ok(Self {
            porosity,
            properties: BTreeMap::new(),
        })
    }

    pub fn with_property(mut self, property: CurveProperty, values: Vec<f64>) -> Result<Self, CurveError> {
        if values.len() != self.porosity.len() {
            return Err(CurveError::LengthMismatch(
                property,
                values.len(),
                self.porosity.len(),
            ));
        }
        self.properties.insert(property, values);
        Ok(self)
    }

    /// Linear in porosity, clamped to the first and last rows.
    pub fn value_at(&self, property: CurveProperty, porosity: f64) -> Option<f64> {
        let values = self.properties.get(&property)?;
        if !porosity.is_finite() {
            return None;
        }
        let last = self.porosity.len() - 1;
        let next = self.porosity.partition_point(|&p| p < porosity);
        Some(if next == 0 {
            values[0]
        } else if next > last {
            values[last]
        } else {
            let previous = next - 1;
            let (p0, p1) = (self.porosity[previous], self.porosity[next]);
            values[previous] + (values[next] - values[previous]) * (porosity - p0) / (p1 - p0)
        })
    }
}

/// Elastic property tables keyed by facies code.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ElasticPropertyTable {
    facies: BTreeMap<i32, FaciesElasticProperties>,
}

impl ElasticPropertyTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, facies: i32, properties: FaciesElasticProperties) -> &mut Self {
        self.facies.insert(facies, properties);
        self
    }

    pub fn value(&self, facies: i32, property: CurveProperty, porosity: f64) -> Option<f64> {
        self.facies.get(&facies)?.value_at(property, porosity)
    }

    pub fn is_empty(&self) -> bool {
        self.facies.is_empty()
    }
}

/// Properties scaled by net-to-gross when non-net layers are enabled.
pub fn default_net_to_gross_scaled() -> BTreeSet<CurveProperty> {
    use CurveProperty::*;
    [
        Porosity,
        PermeabilityX,
        PermeabilityZ,
        YoungsModulus,
        PoissonsRatio,
        BiotCoefficient,
        K0,
        KIc,
        ProppantEmbedment,
        FluidLossCoefficient,
        SpurtLoss,
        RelativePermeabilityFactor,
        PoroElasticConstant,
        ThermalExpansionCoefficient,
        ImmobileFluidSaturation,
    ]
    .into_iter()
    .collect()
}

/// Reference values and per-property rules for the layered curve model.
///
/// Depths in meters, pressures and stresses in bar, temperatures in Celsius.
#[derive(Builder, Clone, Debug, PartialEq)]
#[builder(default)]
pub struct LayeredModelParameters {
    pub time_step: usize,
    pub vertical_stress: f64,
    pub vertical_stress_gradient: f64,
    pub stress_depth: f64,
    pub reference_temperature: f64,
    pub reference_temperature_gradient: f64,
    pub reference_temperature_depth: f64,
    pub default_porosity: f64,
    pub default_permeability: f64,
    pub strategy_overrides: HashMap<CurveProperty, Vec<MissingValueStrategy>>,
    pub default_value_overrides: HashMap<CurveProperty, f64>,
    pub fallback_overrides: HashMap<CurveProperty, CurveProperty>,
    pub use_net_to_gross: bool,
    pub net_to_gross_cutoff: f64,
    pub net_to_gross_scaled: BTreeSet<CurveProperty>,
    /// Fraction of the pressure depletion kept per facies code.
    pub facies_initial_pressure: BTreeMap<i32, f64>,
    pub elastic_properties: ElasticPropertyTable,
}

impl Default for LayeredModelParameters {
    fn default() -> Self {
        Self {
            time_step: 0,
            vertical_stress: 879.0,
            vertical_stress_gradient: 0.238,
            stress_depth: 1000.0,
            reference_temperature: 70.0,
            reference_temperature_gradient: 0.025,
            reference_temperature_depth: 2500.0,
            default_porosity: 0.0,
            default_permeability: 10.0e-6,
            strategy_overrides: HashMap::new(),
            default_value_overrides: HashMap::new(),
            fallback_overrides: HashMap::new(),
            use_net_to_gross: false,
            net_to_gross_cutoff: 1.0,
            net_to_gross_scaled: default_net_to_gross_scaled(),
            facies_initial_pressure: BTreeMap::new(),
            elastic_properties: ElasticPropertyTable::default(),
        }
    }
}

impl LayeredModelParameters {
    /// Strategies tried in order while a curve still has missing samples.
    pub fn missing_value_strategies(&self, property: CurveProperty) -> Vec<MissingValueStrategy> {
        if let Some(strategies) = self.strategy_overrides.get(&property) {
            return strategies.clone();
        }
        match property {
            CurveProperty::Pressure => vec![MissingValueStrategy::OtherCurveProperty],
            CurveProperty::Eqlnum => vec![
                MissingValueStrategy::DefaultValue,
                MissingValueStrategy::LinearInterpolation,
            ],
            _ => vec![MissingValueStrategy::DefaultValue],
        }
    }

    pub fn default_value(&self, property: CurveProperty) -> Option<f64> {
        if let Some(value) = self.default_value_overrides.get(&property) {
            return Some(*value);
        }
        match property {
            CurveProperty::Porosity | CurveProperty::PorosityUnscaled => Some(self.default_porosity),
            CurveProperty::PermeabilityX | CurveProperty::PermeabilityZ => {
                Some(self.default_permeability)
            }
            CurveProperty::NetToGross => Some(1.0),
            _ => None,
        }
    }

    pub fn fallback_property(&self, property: CurveProperty) -> Option<CurveProperty> {
        if let Some(fallback) = self.fallback_overrides.get(&property) {
            return Some(*fallback);
        }
        match property {
            CurveProperty::Pressure => Some(CurveProperty::InitialPressure),
            _ => None,
        }
    }

    pub fn is_scaled_by_net_to_gross(&self, property: CurveProperty) -> bool {
        self.use_net_to_gross && self.net_to_gross_scaled.contains(&property)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parameter_defaults() {
        let parameters = LayeredModelParametersBuilder::default()
            .time_step(2)
            .build()
            .unwrap();
        assert_eq!(parameters.time_step, 2);
        assert!((parameters.vertical_stress - 879.0).abs() < 1e-12);
        assert!((parameters.reference_temperature_depth - 2500.0).abs() < 1e-12);
        assert_eq!(
            parameters.missing_value_strategies(CurveProperty::Pressure),
            vec![MissingValueStrategy::OtherCurveProperty]
        );
        assert_eq!(parameters.default_value(CurveProperty::NetToGross), Some(1.0));
        assert_eq!(parameters.default_value(CurveProperty::Facies), None);
        assert_eq!(
            parameters.fallback_property(CurveProperty::Pressure),
            Some(CurveProperty::InitialPressure)
        );
        assert!(!parameters.is_scaled_by_net_to_gross(CurveProperty::Porosity));
    }

    #[test]
    fn test_elastic_table_interpolation() {
        let sandstone = FaciesElasticProperties::new(vec![0.1, 0.3])
            .unwrap()
            .with_property(CurveProperty::YoungsModulus, vec![20.0, 10.0])
            .unwrap();
        let mut table = ElasticPropertyTable::new();
        table.insert(1, sandstone);
        assert_eq!(table.value(1, CurveProperty::YoungsModulus, 0.0), Some(20.0));
        assert!((table.value(1, CurveProperty::YoungsModulus, 0.2).unwrap() - 15.0).abs() < 1e-12);
        assert_eq!(table.value(1, CurveProperty::YoungsModulus, 0.5), Some(10.0));
        assert_eq!(table.value(1, CurveProperty::PoissonsRatio, 0.2), None);
        assert_eq!(table.value(2, CurveProperty::YoungsModulus, 0.2), None);
        assert_eq!(table.value(1, CurveProperty::YoungsModulus, f64::INFINITY), None);

        assert!(FaciesElasticProperties::new(vec![0.3, 0.1]).is_err());
        assert!(FaciesElasticProperties::new(vec![0.1])
            .unwrap()
            .with_property(CurveProperty::K0, vec![1.0, 2.0])
            .is_err());
    }
}
