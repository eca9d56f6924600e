// reservoir-core/src/curves/calculator.rs

use super::calculators::{
    ElasticPropertyCalculator, LayerCalculator, PressureCalculator, StressCalculator,
    WellLogCalculator,
};
use super::errors::CurveError;
use super::layers::{
    average_by_layer, calculate_layers, stress_with_gradients, temperatures, top_of_layer_values,
    LayerBoundary, StressInputs, StressProfile,
};
use super::parameters::LayeredModelParameters;
use super::property::{CurveData, CurveProperty};
use super::well_log::WellLogSource;
use crate::units::{bar_to_psi, celsius_to_fahrenheit, gigapascal_to_mega_psi, meter_to_feet};
use humantime::format_duration;
use log::{debug, trace, warn};
use std::collections::HashMap;
use std::time::Instant;

pub type CurveKey = (CurveProperty, usize);

/// Produces one family of curve properties. Dependencies on other curves
/// must be fetched through the resolver so they are computed once.
pub trait CurvePropertyCalculator: Send + Sync {
    fn name(&self) -> &'static str;

    fn is_matching(&self, property: CurveProperty) -> bool;

    fn calculate(
        &self,
        property: CurveProperty,
        time_step: usize,
        resolver: &mut CurveResolver<'_>,
    ) -> Result<CurveData, CurveError>;
}

/// Memoizing dispatch for one top-level curve request.
pub struct CurveResolver<'a> {
    cache: &'a mut HashMap<CurveKey, CurveData>,
    calculators: &'a [Box<dyn CurvePropertyCalculator>],
    parameters: &'a LayeredModelParameters,
    source: &'a dyn WellLogSource,
    stack: Vec<CurveKey>,
}

impl<'a> CurveResolver<'a> {
    pub fn parameters(&self) -> &'a LayeredModelParameters {
        self.parameters
    }

    pub fn source(&self) -> &'a dyn WellLogSource {
        self.source
    }

    /// Cached curve, or the first matching calculator's result. Failed
    /// calculations are not cached.
    pub fn curve_data(&mut self, property: CurveProperty, time_step: usize) -> Result<CurveData, CurveError> {
        let key = (property, time_step);
        if let Some(data) = self.cache.get(&key) {
            trace!("Cache hit for {} at time step {}", property, time_step);
            return Ok(data.clone());
        }
        if self.stack.contains(&key) {
            return Err(CurveError::CyclicDependency(property, time_step));
        }
        let calculators = self.calculators;
        let calculator = calculators
            .iter()
            .find(|calculator| calculator.is_matching(property))
            .ok_or(CurveError::NoCalculator(property))?;

        trace!(
            "Calculating {} at time step {} with the {} calculator",
            property,
            time_step,
            calculator.name()
        );
        self.stack.push(key);
        let result = calculator.calculate(property, time_step, self);
        self.stack.pop();

        let data = result?;
        self.cache.insert(key, data.clone());
        Ok(data)
    }

    pub fn values(&mut self, property: CurveProperty, time_step: usize) -> Result<Vec<f64>, CurveError> {
        Ok(self.curve_data(property, time_step)?.values)
    }

    /// The layer curve with its layer boundaries.
    pub fn layers(&mut self, time_step: usize) -> Result<(CurveData, Vec<LayerBoundary>), CurveError> {
        let layers = self.curve_data(CurveProperty::Layers, time_step)?;
        let boundaries = calculate_layers(&layers.values, &layers.tv_depths)?;
        Ok((layers, boundaries))
    }

    pub fn stress_profile(&mut self, time_step: usize) -> Result<StressProfile, CurveError> {
        let (_, boundaries) = self.layers(time_step)?;
        let biot_coefficient = self.values(CurveProperty::BiotCoefficient, time_step)?;
        let k0 = self.values(CurveProperty::K0, time_step)?;
        let pressure = self.values(CurveProperty::Pressure, time_step)?;
        let initial_pressure = self.values(CurveProperty::InitialPressure, time_step)?;
        let poissons_ratio = self.values(CurveProperty::PoissonsRatio, time_step)?;
        let pressure_gradient = self.values(CurveProperty::PressureGradient, time_step)?;
        let inputs = StressInputs {
            biot_coefficient: &biot_coefficient,
            k0: &k0,
            pressure: &pressure,
            initial_pressure: &initial_pressure,
            poissons_ratio: &poissons_ratio,
            pressure_gradient: &pressure_gradient,
        };
        stress_with_gradients(&boundaries, &inputs, self.parameters)
    }
}

/// Per-layer curves for a layered fracture model, computed from well logs
/// and memoized by curve property and time step.
pub struct LayeredCurveCalculator {
    parameters: LayeredModelParameters,
    source: Box<dyn WellLogSource>,
    calculators: Vec<Box<dyn CurvePropertyCalculator>>,
    cache: HashMap<CurveKey, CurveData>,
}

impl LayeredCurveCalculator {
    pub fn new(parameters: LayeredModelParameters, source: Box<dyn WellLogSource>) -> Self {
        let calculators: Vec<Box<dyn CurvePropertyCalculator>> = vec![
            Box::new(WellLogCalculator),
            Box::new(PressureCalculator),
            Box::new(ElasticPropertyCalculator),
            Box::new(LayerCalculator),
            Box::new(StressCalculator),
        ];
        Self::with_calculators(parameters, source, calculators)
    }

    /// Calculators are tried in order; the first matching one is used.
    pub fn with_calculators(
        parameters: LayeredModelParameters,
        source: Box<dyn WellLogSource>,
        calculators: Vec<Box<dyn CurvePropertyCalculator>>,
    ) -> Self {
        Self {
            parameters,
            source,
            calculators,
            cache: HashMap::new(),
        }
    }

    pub fn parameters(&self) -> &LayeredModelParameters {
        &self.parameters
    }

    /// Replaces the parameters and drops every cached curve.
    pub fn set_parameters(&mut self, parameters: LayeredModelParameters) {
        self.parameters = parameters;
        self.clear_cache();
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    pub fn is_cached(&self, property: CurveProperty, time_step: usize) -> bool {
        self.cache.contains_key(&(property, time_step))
    }

    fn resolver(&mut self) -> CurveResolver<'_> {
        CurveResolver {
            cache: &mut self.cache,
            calculators: &self.calculators,
            parameters: &self.parameters,
            source: self.source.as_ref(),
            stack: Vec::new(),
        }
    }

    fn resolve<T>(
        &mut self,
        f: impl FnOnce(&mut CurveResolver<'_>, usize) -> Result<T, CurveError>,
    ) -> Result<T, CurveError> {
        let time_step = self.parameters.time_step;
        let mut resolver = self.resolver();
        f(&mut resolver, time_step)
    }

    pub fn extract_curve_data(&mut self, property: CurveProperty, time_step: usize) -> Result<CurveData, CurveError> {
        self.resolver().curve_data(property, time_step)
    }

    /// Values of a curve, or an empty vector when it cannot be calculated.
    pub fn extract_values(&mut self, property: CurveProperty, time_step: usize) -> Vec<f64> {
        match self.extract_curve_data(property, time_step) {
            Ok(data) => data.values,
            Err(e) => {
                warn!("Unable to extract {} at time step {}: {}", property, time_step, e);
                Vec::new()
            }
        }
    }

    pub fn calculate_layers(&mut self) -> Result<Vec<LayerBoundary>, CurveError> {
        let now = Instant::now();
        let (_, boundaries) = self.resolve(|resolver, time_step| resolver.layers(time_step))?;
        debug!(
            "Found {} layers in {}",
            boundaries.len(),
            format_duration(now.elapsed())
        );
        Ok(boundaries)
    }

    fn layered_average(&mut self, property: CurveProperty) -> Result<Vec<f64>, CurveError> {
        self.resolve(|resolver, time_step| {
            let (_, boundaries) = resolver.layers(time_step)?;
            let values = resolver.values(property, time_step)?;
            average_by_layer(property, &boundaries, &values)
        })
    }

    fn top_of_layer(&mut self, property: CurveProperty) -> Result<Vec<f64>, CurveError> {
        self.resolve(|resolver, time_step| {
            let (_, boundaries) = resolver.layers(time_step)?;
            let values = resolver.values(property, time_step)?;
            top_of_layer_values(property, &boundaries, &values)
        })
    }

    fn stress_profile(&mut self) -> Result<StressProfile, CurveError> {
        let now = Instant::now();
        let profile = self.resolve(|resolver, time_step| resolver.stress_profile(time_step))?;
        debug!("Calculated stress profile in {}", format_duration(now.elapsed()));
        Ok(profile)
    }

    /// Depth of the top of each layer in feet.
    pub fn true_vertical_depths(&mut self) -> Result<Vec<f64>, CurveError> {
        Ok(self
            .calculate_layers()?
            .iter()
            .map(|boundary| meter_to_feet(boundary.top_depth))
            .collect())
    }

    pub fn porosity(&mut self) -> Result<Vec<f64>, CurveError> {
        self.layered_average(CurveProperty::Porosity)
    }

    pub fn horizontal_permeability(&mut self) -> Result<Vec<f64>, CurveError> {
        self.layered_average(CurveProperty::PermeabilityX)
    }

    pub fn vertical_permeability(&mut self) -> Result<Vec<f64>, CurveError> {
        self.layered_average(CurveProperty::PermeabilityZ)
    }

    /// Million psi.
    pub fn youngs_modulus(&mut self) -> Result<Vec<f64>, CurveError> {
        Ok(self
            .layered_average(CurveProperty::YoungsModulus)?
            .into_iter()
            .map(gigapascal_to_mega_psi)
            .collect())
    }

    pub fn poissons_ratio(&mut self) -> Result<Vec<f64>, CurveError> {
        self.layered_average(CurveProperty::PoissonsRatio)
    }

    pub fn k_ic(&mut self) -> Result<Vec<f64>, CurveError> {
        self.layered_average(CurveProperty::KIc)
    }

    pub fn fluid_loss_coefficient(&mut self) -> Result<Vec<f64>, CurveError> {
        self.layered_average(CurveProperty::FluidLossCoefficient)
    }

    pub fn spurt_loss(&mut self) -> Result<Vec<f64>, CurveError> {
        self.layered_average(CurveProperty::SpurtLoss)
    }

    pub fn proppant_embedment(&mut self) -> Result<Vec<f64>, CurveError> {
        self.layered_average(CurveProperty::ProppantEmbedment)
    }

    pub fn immobile_fluid_saturation(&mut self) -> Result<Vec<f64>, CurveError> {
        self.layered_average(CurveProperty::ImmobileFluidSaturation)
    }

    pub fn relative_permeability_factor(&mut self) -> Result<Vec<f64>, CurveError> {
        self.layered_average(CurveProperty::RelativePermeabilityFactor)
    }

    pub fn poro_elastic_constant(&mut self) -> Result<Vec<f64>, CurveError> {
        self.layered_average(CurveProperty::PoroElasticConstant)
    }

    /// Per degree Fahrenheit.
    pub fn thermal_expansion_coefficient(&mut self) -> Result<Vec<f64>, CurveError> {
        Ok(self
            .layered_average(CurveProperty::ThermalExpansionCoefficient)?
            .into_iter()
            .map(|value| value / 1.8)
            .collect())
    }

    /// Pressure at the top of each layer in psi.
    pub fn reservoir_pressure(&mut self) -> Result<Vec<f64>, CurveError> {
        Ok(self
            .top_of_layer(CurveProperty::Pressure)?
            .into_iter()
            .map(bar_to_psi)
            .collect())
    }

    /// Temperature at the top of each layer in Fahrenheit.
    pub fn temperature(&mut self) -> Result<Vec<f64>, CurveError> {
        let boundaries = self.calculate_layers()?;
        Ok(temperatures(&boundaries, &self.parameters)
            .into_iter()
            .map(celsius_to_fahrenheit)
            .collect())
    }

    pub fn stress(&mut self) -> Result<Vec<f64>, CurveError> {
        Ok(self.stress_profile()?.stress)
    }

    pub fn initial_stress(&mut self) -> Result<Vec<f64>, CurveError> {
        Ok(self.stress_profile()?.initial_stress)
    }

    pub fn stress_gradient(&mut self) -> Result<Vec<f64>, CurveError> {
        Ok(self.stress_profile()?.stress_gradient)
    }

    pub fn facies(&mut self) -> Result<Vec<f64>, CurveError> {
        self.top_of_layer(CurveProperty::Facies)
    }

    pub fn formations(&mut self) -> Result<Vec<f64>, CurveError> {
        self.top_of_layer(CurveProperty::Formations)
    }
}

#[cfg(test)]
mod tests {
    use super::super::missing::{MissingValueStrategy, MISSING_VALUE};
    use super::super::parameters::{
        ElasticPropertyTable, FaciesElasticProperties, LayeredModelParametersBuilder,
    };
    use super::super::well_log::MemoryWellLogSource;
    use super::*;
    use crate::summary::UnitSystem;
    use crate::units::psi_to_bar;
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn depths() -> Vec<f64> {
        (0..6).map(|i| 1000.0 + 10.0 * i as f64).collect()
    }

    fn curve(values: Vec<f64>) -> CurveData {
        CurveData::new(values, depths(), depths(), 25.0)
    }

    fn elastic_properties() -> ElasticPropertyTable {
        let facies = FaciesElasticProperties::new(vec![0.0, 0.4])
            .unwrap()
            .with_property(CurveProperty::YoungsModulus, vec![10.0, 30.0])
            .unwrap()
            .with_property(CurveProperty::PoissonsRatio, vec![0.2, 0.3])
            .unwrap()
            .with_property(CurveProperty::K0, vec![0.8, 0.8])
            .unwrap()
            .with_property(CurveProperty::BiotCoefficient, vec![1.0, 1.0])
            .unwrap();
        let mut table = ElasticPropertyTable::new();
        table.insert(1, facies.clone()).insert(2, facies);
        table
    }

    fn source() -> MemoryWellLogSource {
        let mut source = MemoryWellLogSource::new();
        source
            .insert_static(CurveProperty::Facies, curve(vec![1.0, 1.0, 1.0, 2.0, 2.0, 2.0]))
            .insert_static(
                CurveProperty::Porosity,
                curve(vec![0.1, 0.2, 0.3, 0.4, 0.2, MISSING_VALUE]),
            )
            .insert_static(
                CurveProperty::InitialPressure,
                curve(vec![250.0, 251.0, 252.0, 253.0, 254.0, 255.0]),
            )
            .insert(
                CurveProperty::Pressure,
                1,
                curve(vec![200.0, 201.0, 202.0, 203.0, 204.0, 205.0]),
            );
        source
    }

    fn calculator(source: MemoryWellLogSource) -> LayeredCurveCalculator {
        let parameters = LayeredModelParametersBuilder::default()
            .time_step(1)
            .elastic_properties(elastic_properties())
            .build()
            .unwrap();
        LayeredCurveCalculator::new(parameters, Box::new(source))
    }

    #[test]
    fn test_layers_follow_facies() {
        let mut calculator = calculator(source());
        let layers = calculator.calculate_layers().unwrap();
        assert_eq!(layers.len(), 2);
        assert_eq!((layers[0].top_index, layers[0].bottom_index), (0, 3));
        assert_eq!((layers[1].top_index, layers[1].bottom_index), (3, 5));
        assert!(calculator.is_cached(CurveProperty::Layers, 1));
        assert!(calculator.is_cached(CurveProperty::Facies, 1));

        let tvds = calculator.true_vertical_depths().unwrap();
        assert!((tvds[0] - meter_to_feet(1000.0)).abs() < 1e-9);
        assert_eq!(calculator.facies().unwrap(), vec![1.0, 2.0]);
    }

    #[test]
    fn test_formations_split_layers() {
        let mut source = source();
        source.insert_static(
            CurveProperty::Formations,
            curve(vec![1.0, 2.0, 2.0, 2.0, 2.0, 2.0]),
        );
        let mut calculator = calculator(source);
        assert_eq!(
            calculator.extract_values(CurveProperty::Layers, 1),
            vec![0.0, 1.0, 1.0, 2.0, 2.0, 2.0]
        );
        assert_eq!(calculator.calculate_layers().unwrap().len(), 3);
    }

    #[test]
    fn test_missing_porosity_uses_default() {
        let mut calculator = calculator(source());
        let porosity = calculator.extract_values(CurveProperty::Porosity, 1);
        assert_eq!(porosity[5], 0.0);

        let layered = calculator.porosity().unwrap();
        assert!((layered[0] - 0.2).abs() < 1e-12);
        assert!((layered[1] - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_missing_permeability_curve_uses_default_on_facies_depths() {
        let mut calculator = calculator(source());
        let permeability = calculator
            .extract_curve_data(CurveProperty::PermeabilityX, 1)
            .unwrap();
        assert_eq!(permeability.measured_depths, depths());
        assert!(permeability.values.iter().all(|&value| value == 10.0e-6));
    }

    #[test]
    fn test_missing_facies_is_an_error() {
        let mut calculator = calculator(MemoryWellLogSource::new());
        assert!(matches!(
            calculator.extract_curve_data(CurveProperty::Facies, 1),
            Err(CurveError::MissingInput(CurveProperty::Facies, 1))
        ));
        assert!(calculator.extract_values(CurveProperty::Stress, 1).is_empty());
        assert!(!calculator.is_cached(CurveProperty::Facies, 1));
    }

    #[test]
    fn test_elastic_properties_and_youngs_modulus() {
        let mut calculator = calculator(source());
        let youngs_modulus = calculator.extract_values(CurveProperty::YoungsModulus, 1);
        assert!((youngs_modulus[0] - 15.0).abs() < 1e-9);
        // Missing porosity was defaulted to zero.
        assert!((youngs_modulus[5] - 10.0).abs() < 1e-9);

        let layered = calculator.youngs_modulus().unwrap();
        assert!((layered[0] - 2.9007547546).abs() < 1e-9);
        assert!(calculator.k_ic().is_ok());
        // No K-Ic table and no default value: stays missing.
        assert!(calculator.k_ic().unwrap()[0].is_infinite());
    }

    #[test]
    fn test_pressure_falls_back_to_initial_pressure() {
        let mut source = source();
        source.insert(
            CurveProperty::Pressure,
            1,
            curve(vec![200.0, MISSING_VALUE, 202.0, 203.0, 204.0, 205.0]),
        );
        let mut calculator = calculator(source);
        let pressure = calculator.extract_values(CurveProperty::Pressure, 1);
        assert_eq!(pressure[1], 251.0);
        assert!(calculator.is_cached(CurveProperty::InitialPressure, 1));

        let mut without_pressure = source_without_pressure();
        without_pressure.insert_static(CurveProperty::Facies, curve(vec![1.0; 6]));
        let mut calculator = self::calculator(without_pressure);
        assert_eq!(
            calculator.extract_values(CurveProperty::Pressure, 1),
            vec![250.0, 251.0, 252.0, 253.0, 254.0, 255.0]
        );
    }

    fn source_without_pressure() -> MemoryWellLogSource {
        let mut source = MemoryWellLogSource::new();
        source.insert_static(
            CurveProperty::InitialPressure,
            curve(vec![250.0, 251.0, 252.0, 253.0, 254.0, 255.0]),
        );
        source
    }

    #[test]
    fn test_field_pressure_is_converted_to_bar() {
        let mut source = source().with_unit_system(UnitSystem::Field);
        source.insert_static(CurveProperty::InitialPressure, curve(vec![bar_to_psi(250.0); 6]));
        let mut calculator = calculator(source);
        let initial = calculator.extract_values(CurveProperty::InitialPressure, 1);
        assert!((initial[0] - 250.0).abs() < 1e-9);
        let pressure = calculator.extract_values(CurveProperty::Pressure, 1);
        assert!((pressure[0] - psi_to_bar(200.0)).abs() < 1e-9);
    }

    #[test]
    fn test_facies_initial_pressure_fraction() {
        let mut calculator = calculator(source());
        let mut parameters = calculator.parameters().clone();
        parameters.facies_initial_pressure = BTreeMap::from([(2, 0.5)]);
        calculator.set_parameters(parameters);

        let pressure = calculator.extract_values(CurveProperty::Pressure, 1);
        assert_eq!(pressure[0], 200.0);
        // 253 - (253 - 203) * 0.5
        assert!((pressure[3] - 228.0).abs() < 1e-12);
    }

    #[test]
    fn test_reservoir_pressure_temperature_and_stress() {
        let mut calculator = calculator(source());
        let pressure = calculator.reservoir_pressure().unwrap();
        assert!((pressure[0] - bar_to_psi(200.0)).abs() < 1e-9);
        assert!((pressure[1] - bar_to_psi(203.0)).abs() < 1e-9);

        let temperature = calculator.temperature().unwrap();
        assert!((temperature[0] - 90.5).abs() < 1e-9);
        assert!((temperature[1] - 91.85).abs() < 1e-9);

        // Porosity 0.1 at the top of layer one gives a Poisson's ratio of 0.225.
        let poissons_ratio = 0.225;
        let initial_stress = 0.8 * 879.0 + 250.0 * 0.2;
        let change = poissons_ratio / (1.0 - poissons_ratio) * 50.0 - 50.0;
        let stress = calculator.stress().unwrap();
        assert_eq!(stress.len(), 2);
        assert!((stress[0] - bar_to_psi(initial_stress + change)).abs() < 1e-6);
        let initial = calculator.initial_stress().unwrap();
        assert!((initial[0] - bar_to_psi(initial_stress)).abs() < 1e-6);

        let gradient = calculator.stress_gradient().unwrap();
        let expected = (0.238 * 30.0 * 0.8 + 3.0 * 0.2) / 30.0;
        assert!((gradient[0] - crate::units::bar_per_meter_to_psi_per_feet(expected)).abs() < 1e-9);
    }

    #[test]
    fn test_stress_curve_has_two_samples_per_layer() {
        let mut calculator = calculator(source());
        let stress = calculator.extract_curve_data(CurveProperty::Stress, 1).unwrap();
        assert_eq!(stress.len(), 4);
        assert_eq!(stress.tv_depths, vec![1000.0, 1030.0, 1030.0, 1050.0]);
        assert_eq!(stress.values[0], stress.values[1]);
        assert_eq!(stress.rkb_diff, 25.0);

        let temperature = calculator
            .extract_curve_data(CurveProperty::Temperature, 1)
            .unwrap();
        assert!((temperature.values[0] - 32.5).abs() < 1e-9);
    }

    #[test]
    fn test_net_to_gross_is_resampled_and_scales_porosity() {
        let mut source = source();
        source.insert_static(
            CurveProperty::NetToGross,
            CurveData::new(vec![0.5, 0.5], vec![1000.0, 1050.0], vec![1000.0, 1050.0], 25.0),
        );
        let parameters = LayeredModelParametersBuilder::default()
            .time_step(1)
            .use_net_to_gross(true)
            .net_to_gross_cutoff(0.6)
            .build()
            .unwrap();
        let mut calculator = LayeredCurveCalculator::new(parameters, Box::new(source));

        let net_to_gross = calculator.extract_curve_data(CurveProperty::NetToGross, 1).unwrap();
        assert_eq!(net_to_gross.len(), 6);
        assert_eq!(net_to_gross.measured_depths, depths());

        let porosity = calculator.extract_values(CurveProperty::Porosity, 1);
        assert!((porosity[0] - 0.05).abs() < 1e-12);
        assert!((porosity[3] - 0.2).abs() < 1e-12);
    }

    struct DependsOn {
        property: CurveProperty,
        depends_on: Option<CurveProperty>,
        calls: Arc<AtomicUsize>,
    }

    impl CurvePropertyCalculator for DependsOn {
        fn name(&self) -> &'static str {
            "depends on"
        }

        fn is_matching(&self, property: CurveProperty) -> bool {
            property == self.property
        }

        fn calculate(
            &self,
            _property: CurveProperty,
            time_step: usize,
            resolver: &mut CurveResolver<'_>,
        ) -> Result<CurveData, CurveError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.depends_on {
                Some(other) => resolver.curve_data(other, time_step),
                None => Ok(CurveData::new(vec![1.0], vec![0.0], vec![0.0], 0.0)),
            }
        }
    }

    fn depends_on(
        property: CurveProperty,
        depends_on: Option<CurveProperty>,
        calls: &Arc<AtomicUsize>,
    ) -> Box<dyn CurvePropertyCalculator> {
        Box::new(DependsOn {
            property,
            depends_on,
            calls: Arc::clone(calls),
        })
    }

    #[test]
    fn test_dependencies_are_computed_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut calculator = LayeredCurveCalculator::with_calculators(
            LayeredModelParameters::default(),
            Box::new(MemoryWellLogSource::new()),
            vec![
                depends_on(CurveProperty::Stress, Some(CurveProperty::Pressure), &calls),
                depends_on(CurveProperty::Pressure, None, &calls),
            ],
        );
        calculator.extract_curve_data(CurveProperty::Stress, 0).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        calculator.extract_curve_data(CurveProperty::Pressure, 0).unwrap();
        calculator.extract_curve_data(CurveProperty::Stress, 0).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        calculator.extract_curve_data(CurveProperty::Pressure, 1).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 3);

        calculator.clear_cache();
        assert!(!calculator.is_cached(CurveProperty::Stress, 0));
        assert!(matches!(
            calculator.extract_curve_data(CurveProperty::Facies, 0),
            Err(CurveError::NoCalculator(CurveProperty::Facies))
        ));
    }

    #[test]
    fn test_cyclic_dependency_is_reported() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut calculator = LayeredCurveCalculator::with_calculators(
            LayeredModelParameters::default(),
            Box::new(MemoryWellLogSource::new()),
            vec![
                depends_on(CurveProperty::Porosity, Some(CurveProperty::Pressure), &calls),
                depends_on(CurveProperty::Pressure, Some(CurveProperty::Porosity), &calls),
            ],
        );
        assert!(matches!(
            calculator.extract_curve_data(CurveProperty::Porosity, 0),
            Err(CurveError::CyclicDependency(CurveProperty::Porosity, 0))
        ));
        assert!(!calculator.is_cached(CurveProperty::Porosity, 0));
        assert!(!calculator.is_cached(CurveProperty::Pressure, 0));
    }

    #[test]
    fn test_strategy_override_interpolates() {
        let mut source = source();
        source.insert_static(
            CurveProperty::PermeabilityX,
            curve(vec![1.0, MISSING_VALUE, 3.0, 4.0, 5.0, 6.0]),
        );
        let parameters = LayeredModelParametersBuilder::default()
            .time_step(1)
            .strategy_overrides(
                [(
                    CurveProperty::PermeabilityX,
                    vec![MissingValueStrategy::LinearInterpolation],
                )]
                .into_iter()
                .collect(),
            )
            .build()
            .unwrap();
        let mut calculator = LayeredCurveCalculator::new(parameters, Box::new(source));
        let permeability = calculator.extract_values(CurveProperty::PermeabilityX, 1);
        assert!((permeability[1] - 2.0).abs() < 1e-12);
    }
}
