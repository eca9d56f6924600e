// reservoir-core/src/curves/calculators.rs

use super::calculator::{CurvePropertyCalculator, CurveResolver};
use super::errors::CurveError;
use super::layers::temperatures;
use super::missing::{
    has_missing_values, interpolate_missing_values, is_missing, replace_missing_values,
    replace_missing_values_with, resample, MissingValueStrategy, MISSING_VALUE,
};
use super::property::{CurveData, CurveProperty};
use crate::summary::UnitSystem;
use crate::units::psi_to_bar;
use log::{debug, info, warn};

fn validated(property: CurveProperty, data: CurveData) -> Result<CurveData, CurveError> {
    if data.values.len() != data.measured_depths.len() {
        return Err(CurveError::LengthMismatch(
            property,
            data.values.len(),
            data.measured_depths.len(),
        ));
    }
    if data.tv_depths.len() != data.measured_depths.len() {
        return Err(CurveError::InvalidInputData(
            property,
            format!(
                "{} true vertical depths for {} measured depths",
                data.tv_depths.len(),
                data.measured_depths.len()
            ),
        ));
    }
    Ok(data)
}

/// Runs the configured strategies until no samples are missing. Samples no
/// strategy could fill stay missing.
pub fn apply_missing_value_strategies(
    property: CurveProperty,
    time_step: usize,
    data: &mut CurveData,
    resolver: &mut CurveResolver<'_>,
) {
    let parameters = resolver.parameters();
    for strategy in parameters.missing_value_strategies(property) {
        if !has_missing_values(&data.values) {
            break;
        }
        match strategy {
            MissingValueStrategy::DefaultValue => match parameters.default_value(property) {
                Some(value) => replace_missing_values(&mut data.values, value),
                None => warn!("{}", CurveError::MissingDefaultValue(property)),
            },
            MissingValueStrategy::LinearInterpolation => {
                interpolate_missing_values(&data.measured_depths, &mut data.values)
            }
            MissingValueStrategy::OtherCurveProperty => {
                let Some(other) = parameters.fallback_property(property) else {
                    warn!("No replacement curve configured for missing {} values", property);
                    continue;
                };
                match resolver.curve_data(other, time_step) {
                    Ok(replacement) if replacement.len() == data.len() => {
                        replace_missing_values_with(&mut data.values, &replacement.values)
                    }
                    Ok(replacement) => warn!(
                        "{}",
                        CurveError::LengthMismatch(other, replacement.len(), data.len())
                    ),
                    Err(e) => warn!("Unable to replace missing {} values: {}", property, e),
                }
            }
        }
    }
}

fn scale_by_net_to_gross(
    property: CurveProperty,
    time_step: usize,
    values: &mut [f64],
    resolver: &mut CurveResolver<'_>,
) -> Result<(), CurveError> {
    let parameters = resolver.parameters();
    if !parameters.is_scaled_by_net_to_gross(property) {
        return Ok(());
    }
    let net_to_gross = resolver.values(CurveProperty::NetToGross, time_step)?;
    if net_to_gross.len() != values.len() {
        warn!(
            "{}",
            CurveError::LengthMismatch(CurveProperty::NetToGross, net_to_gross.len(), values.len())
        );
        return Ok(());
    }
    for (value, &ntg) in values.iter_mut().zip(&net_to_gross) {
        if ntg <= parameters.net_to_gross_cutoff {
            *value *= ntg;
        }
    }
    Ok(())
}

/// Resamples `data` onto the facies sampling when the sample counts differ.
fn resample_to_facies(
    property: CurveProperty,
    time_step: usize,
    data: CurveData,
    resolver: &mut CurveResolver<'_>,
) -> Result<CurveData, CurveError> {
    let facies = resolver.curve_data(CurveProperty::Facies, time_step)?;
    if facies.measured_depths.len() == data.measured_depths.len() {
        return Ok(data);
    }
    info!("Resampling {} to the facies sampling", property);
    let values = resample(&facies.measured_depths, &data.measured_depths, &data.values);
    Ok(CurveData::new(
        values,
        facies.measured_depths,
        facies.tv_depths,
        facies.rkb_diff,
    ))
}

/// Curves read directly from the well log source.
#[derive(Clone, Copy, Debug, Default)]
pub struct WellLogCalculator;

impl CurvePropertyCalculator for WellLogCalculator {
    fn name(&self) -> &'static str {
        "well log"
    }

    fn is_matching(&self, property: CurveProperty) -> bool {
        matches!(
            property,
            CurveProperty::Facies
                | CurveProperty::Formations
                | CurveProperty::Porosity
                | CurveProperty::PorosityUnscaled
                | CurveProperty::PermeabilityX
                | CurveProperty::PermeabilityZ
                | CurveProperty::NetToGross
                | CurveProperty::Eqlnum
        )
    }

    fn calculate(
        &self,
        property: CurveProperty,
        time_step: usize,
        resolver: &mut CurveResolver<'_>,
    ) -> Result<CurveData, CurveError> {
        debug!("Calculating well log for {}", property);
        let source = resolver.source();
        let extracted = source.extract(property, time_step).or_else(|| {
            if property == CurveProperty::PorosityUnscaled {
                source.extract(CurveProperty::Porosity, time_step)
            } else {
                None
            }
        });
        let mut data = match extracted {
            Some(data) => validated(property, data)?,
            None => {
                let strategies = resolver.parameters().missing_value_strategies(property);
                if property == CurveProperty::Facies
                    || !strategies.contains(&MissingValueStrategy::DefaultValue)
                {
                    return Err(CurveError::MissingInput(property, time_step));
                }
                warn!("Extraction of {} failed, using default values", property);
                let facies = resolver.curve_data(CurveProperty::Facies, time_step)?;
                CurveData::filled_like(&facies, MISSING_VALUE)
            }
        };

        apply_missing_value_strategies(property, time_step, &mut data, resolver);
        scale_by_net_to_gross(property, time_step, &mut data.values, resolver)?;

        if property == CurveProperty::Facies {
            return Ok(data);
        }
        resample_to_facies(property, time_step, data, resolver)
    }
}

/// Current and initial pressure, and the pressure difference used for
/// stress gradients.
#[derive(Clone, Copy, Debug, Default)]
pub struct PressureCalculator;

impl PressureCalculator {
    fn apply_facies_initial_pressure(
        time_step: usize,
        data: &mut CurveData,
        resolver: &mut CurveResolver<'_>,
    ) -> Result<(), CurveError> {
        let fractions = &resolver.parameters().facies_initial_pressure;
        if fractions.is_empty() {
            return Ok(());
        }
        let facies = resolver.curve_data(CurveProperty::Facies, time_step)?;
        let initial = resolver.curve_data(CurveProperty::InitialPressure, time_step)?;
        if facies.len() != data.len() || initial.len() != data.len() {
            warn!(
                "Unable to apply facies initial pressure: {} facies, {} initial and {} current samples",
                facies.len(),
                initial.len(),
                data.len()
            );
            return Ok(());
        }
        for ((value, &code), &initial_pressure) in
            data.values.iter_mut().zip(&facies.values).zip(&initial.values)
        {
            if is_missing(code) || is_missing(*value) || is_missing(initial_pressure) {
                continue;
            }
            if let Some(fraction) = fractions.get(&(code.round() as i32)) {
                *value = initial_pressure - (initial_pressure - *value) * fraction;
            }
        }
        Ok(())
    }
}

impl CurvePropertyCalculator for PressureCalculator {
    fn name(&self) -> &'static str {
        "pressure"
    }

    fn is_matching(&self, property: CurveProperty) -> bool {
        matches!(
            property,
            CurveProperty::Pressure | CurveProperty::InitialPressure | CurveProperty::PressureGradient
        )
    }

    fn calculate(
        &self,
        property: CurveProperty,
        time_step: usize,
        resolver: &mut CurveResolver<'_>,
    ) -> Result<CurveData, CurveError> {
        // Initial pressure always comes from the first time step.
        let source_time_step = if property == CurveProperty::InitialPressure {
            0
        } else {
            time_step
        };
        let source = resolver.source();
        let mut data = match source.extract(property, source_time_step) {
            Some(data) => {
                let mut data = validated(property, data)?;
                if source.unit_system() == UnitSystem::Field {
                    for value in data.values.iter_mut().filter(|value| value.is_finite()) {
                        *value = psi_to_bar(*value);
                    }
                }
                resample_to_facies(property, time_step, data, resolver)?
            }
            None => {
                let strategies = resolver.parameters().missing_value_strategies(property);
                if property != CurveProperty::PressureGradient
                    && !strategies.contains(&MissingValueStrategy::OtherCurveProperty)
                {
                    return Err(CurveError::MissingInput(property, time_step));
                }
                let facies = resolver.curve_data(CurveProperty::Facies, time_step)?;
                CurveData::filled_like(&facies, MISSING_VALUE)
            }
        };
        if property == CurveProperty::PressureGradient {
            return Ok(data);
        }

        apply_missing_value_strategies(property, time_step, &mut data, resolver);
        if property == CurveProperty::Pressure {
            Self::apply_facies_initial_pressure(time_step, &mut data, resolver)?;
        }
        Ok(data)
    }
}

/// Elastic properties looked up per facies and porosity.
#[derive(Clone, Copy, Debug, Default)]
pub struct ElasticPropertyCalculator;

impl CurvePropertyCalculator for ElasticPropertyCalculator {
    fn name(&self) -> &'static str {
        "elastic properties"
    }

    fn is_matching(&self, property: CurveProperty) -> bool {
        matches!(
            property,
            CurveProperty::YoungsModulus
                | CurveProperty::PoissonsRatio
                | CurveProperty::KIc
                | CurveProperty::ProppantEmbedment
                | CurveProperty::BiotCoefficient
                | CurveProperty::K0
                | CurveProperty::FluidLossCoefficient
                | CurveProperty::SpurtLoss
                | CurveProperty::RelativePermeabilityFactor
                | CurveProperty::PoroElasticConstant
                | CurveProperty::ThermalExpansionCoefficient
                | CurveProperty::ImmobileFluidSaturation
        )
    }

    fn calculate(
        &self,
        property: CurveProperty,
        time_step: usize,
        resolver: &mut CurveResolver<'_>,
    ) -> Result<CurveData, CurveError> {
        let facies = resolver.curve_data(CurveProperty::Facies, time_step)?;
        let porosity = resolver.curve_data(CurveProperty::PorosityUnscaled, time_step)?;
        if porosity.len() != facies.len() {
            return Err(CurveError::LengthMismatch(
                CurveProperty::PorosityUnscaled,
                porosity.len(),
                facies.len(),
            ));
        }

        let table = &resolver.parameters().elastic_properties;
        let values = facies
            .values
            .iter()
            .zip(&porosity.values)
            .map(|(&code, &porosity)| {
                if is_missing(code) {
                    return MISSING_VALUE;
                }
                table
                    .value(code.round() as i32, property, porosity)
                    .unwrap_or(MISSING_VALUE)
            })
            .collect();
        let mut data = CurveData::new(
            values,
            facies.measured_depths,
            facies.tv_depths,
            facies.rkb_diff,
        );

        apply_missing_value_strategies(property, time_step, &mut data, resolver);
        scale_by_net_to_gross(property, time_step, &mut data.values, resolver)?;
        Ok(data)
    }
}

/// Layer numbers, increasing where facies or formation changes.
#[derive(Clone, Copy, Debug, Default)]
pub struct LayerCalculator;

impl CurvePropertyCalculator for LayerCalculator {
    fn name(&self) -> &'static str {
        "layers"
    }

    fn is_matching(&self, property: CurveProperty) -> bool {
        property == CurveProperty::Layers
    }

    fn calculate(
        &self,
        _property: CurveProperty,
        time_step: usize,
        resolver: &mut CurveResolver<'_>,
    ) -> Result<CurveData, CurveError> {
        let facies = resolver.curve_data(CurveProperty::Facies, time_step)?;
        let formations = match resolver.curve_data(CurveProperty::Formations, time_step) {
            Ok(formations) if formations.len() == facies.len() => Some(formations.values),
            Ok(formations) => {
                warn!(
                    "{}, using facies only for layers",
                    CurveError::LengthMismatch(CurveProperty::Formations, formations.len(), facies.len())
                );
                None
            }
            Err(e) => {
                warn!("No formations for layers, using facies only: {}", e);
                None
            }
        };

        let mut layer = 0.0;
        let values = (0..facies.len())
            .map(|index| {
                if index > 0 {
                    let facies_changed = facies.values[index] != facies.values[index - 1];
                    let formation_changed = formations
                        .as_ref()
                        .map_or(false, |formations| formations[index] != formations[index - 1]);
                    if facies_changed || formation_changed {
                        layer += 1.0;
                    }
                }
                layer
            })
            .collect();
        Ok(CurveData::new(
            values,
            facies.measured_depths,
            facies.tv_depths,
            facies.rkb_diff,
        ))
    }
}

/// Stress, initial stress, stress gradient and temperature as curves with two
/// samples per layer, at its top and bottom depth.
#[derive(Clone, Copy, Debug, Default)]
pub struct StressCalculator;

impl CurvePropertyCalculator for StressCalculator {
    fn name(&self) -> &'static str {
        "stress"
    }

    fn is_matching(&self, property: CurveProperty) -> bool {
        matches!(
            property,
            CurveProperty::Stress
                | CurveProperty::InitialStress
                | CurveProperty::StressGradient
                | CurveProperty::Temperature
        )
    }

    fn calculate(
        &self,
        property: CurveProperty,
        time_step: usize,
        resolver: &mut CurveResolver<'_>,
    ) -> Result<CurveData, CurveError> {
        let (layers, boundaries) = resolver.layers(time_step)?;
        let per_layer = match property {
            CurveProperty::Temperature => temperatures(&boundaries, resolver.parameters()),
            _ => {
                let profile = resolver.stress_profile(time_step)?;
                match property {
                    CurveProperty::Stress => profile.stress,
                    CurveProperty::InitialStress => profile.initial_stress,
                    _ => profile.stress_gradient,
                }
            }
        };

        let mut data = CurveData {
            rkb_diff: layers.rkb_diff,
            ..CurveData::default()
        };
        for (boundary, value) in boundaries.iter().zip(per_layer) {
            for (index, depth) in [
                (boundary.top_index, boundary.top_depth),
                (boundary.bottom_index, boundary.bottom_depth),
            ] {
                data.values.push(value);
                data.measured_depths.push(
                    layers
                        .measured_depths
                        .get(index)
                        .copied()
                        .unwrap_or(MISSING_VALUE),
                );
                data.tv_depths.push(depth);
            }
        }
        Ok(data)
    }
}
