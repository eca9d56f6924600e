// reservoir-core/src/curves/layers.rs

use super::errors::CurveError;
use super::parameters::LayeredModelParameters;
use super::property::CurveProperty;
use crate::units::{bar_per_meter_to_psi_per_feet, bar_to_psi};
use log::warn;

/// Depth offset in meters used when a layer has a pressure difference
/// from an equilibration region.
pub const PRESSURE_DIFFERENCE_OFFSET: f64 = 1.0;

/// One layer of the model as true vertical depths and sample indices.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayerBoundary {
    pub top_depth: f64,
    pub bottom_depth: f64,
    pub top_index: usize,
    pub bottom_index: usize,
}

/// Splits a layer curve into layers. A layer ends where the layer value
/// changes or at the last sample; the bottom sample of one layer is the top
/// sample of the next.
pub fn calculate_layers(layer_values: &[f64], depths: &[f64]) -> Result<Vec<LayerBoundary>, CurveError> {
    if layer_values.len() != depths.len() {
        return Err(CurveError::LengthMismatch(
            CurveProperty::Layers,
            layer_values.len(),
            depths.len(),
        ));
    }
    let mut boundaries = Vec::new();
    let mut start = 0;
    for index in 0..depths.len() {
        if start != index && (layer_values[start] != layer_values[index] || index == depths.len() - 1) {
            boundaries.push(LayerBoundary {
                top_depth: depths[start],
                bottom_depth: depths[index],
                top_index: start,
                bottom_index: index,
            });
            start = index;
        }
    }
    Ok(boundaries)
}

fn required_length(boundaries: &[LayerBoundary]) -> usize {
    boundaries
        .iter()
        .map(|boundary| boundary.bottom_index + 1)
        .max()
        .unwrap_or(0)
}

fn check_length(property: CurveProperty, values: &[f64], boundaries: &[LayerBoundary]) -> Result<(), CurveError> {
    let required = required_length(boundaries);
    if values.len() < required {
        return Err(CurveError::LengthMismatch(property, values.len(), required));
    }
    Ok(())
}

/// Mean of the samples from the top index up to, not including, the bottom index.
pub fn average_by_layer(
    property: CurveProperty,
    boundaries: &[LayerBoundary],
    values: &[f64],
) -> Result<Vec<f64>, CurveError> {
    check_length(property, values, boundaries)?;
    Ok(boundaries
        .iter()
        .map(|boundary| {
            let samples = &values[boundary.top_index..boundary.bottom_index];
            samples.iter().sum::<f64>() / samples.len() as f64
        })
        .collect())
}

pub fn top_of_layer_values(
    property: CurveProperty,
    boundaries: &[LayerBoundary],
    values: &[f64],
) -> Result<Vec<f64>, CurveError> {
    check_length(property, values, boundaries)?;
    Ok(boundaries
        .iter()
        .map(|boundary| values[boundary.top_index])
        .collect())
}

/// Per-layer stress inputs, sampled on the layer curve depths. Pressures in bar.
#[derive(Clone, Copy, Debug)]
pub struct StressInputs<'a> {
    pub biot_coefficient: &'a [f64],
    pub k0: &'a [f64],
    pub pressure: &'a [f64],
    pub initial_pressure: &'a [f64],
    pub poissons_ratio: &'a [f64],
    pub pressure_gradient: &'a [f64],
}

impl<'a> StressInputs<'a> {
    fn curves(&self) -> [(CurveProperty, &'a [f64]); 6] {
        [
            (CurveProperty::BiotCoefficient, self.biot_coefficient),
            (CurveProperty::K0, self.k0),
            (CurveProperty::Pressure, self.pressure),
            (CurveProperty::InitialPressure, self.initial_pressure),
            (CurveProperty::PoissonsRatio, self.poissons_ratio),
            (CurveProperty::PressureGradient, self.pressure_gradient),
        ]
    }

    fn validate(&self, boundaries: &[LayerBoundary]) -> Result<(), CurveError> {
        for (property, values) in self.curves() {
            if values.is_empty() {
                return Err(CurveError::InvalidInputData(
                    property,
                    "empty input data in stress calculation".to_string(),
                ));
            }
            check_length(property, values, boundaries)?;
            // Pressure gradient is allowed to have missing values.
            if property == CurveProperty::PressureGradient {
                continue;
            }
            for (layer, boundary) in boundaries.iter().enumerate() {
                let value = values[boundary.top_index];
                if !value.is_finite() {
                    return Err(CurveError::InvalidInputData(
                        property,
                        format!(
                            "invalid value {} at top of layer {}, depth {}",
                            value, layer, boundary.top_depth
                        ),
                    ));
                }
            }
        }
        Ok(())
    }
}

/// Horizontal stresses in psi and stress gradients in psi/ft, one per layer.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StressProfile {
    pub stress: Vec<f64>,
    pub initial_stress: Vec<f64>,
    pub stress_gradient: Vec<f64>,
}

fn vertical_stress_at(depth: f64, parameters: &LayeredModelParameters) -> f64 {
    parameters.vertical_stress + parameters.vertical_stress_gradient * (depth - parameters.stress_depth)
}

fn vertical_stress_difference_at(depth: f64, parameters: &LayeredModelParameters) -> f64 {
    vertical_stress_at(depth + PRESSURE_DIFFERENCE_OFFSET, parameters)
        - vertical_stress_at(depth - PRESSURE_DIFFERENCE_OFFSET, parameters)
}

fn stress_gradient_for_layer(
    boundary: &LayerBoundary,
    top_vertical_stress: f64,
    inputs: &StressInputs<'_>,
    k0: f64,
    parameters: &LayeredModelParameters,
) -> f64 {
    let top_initial_pressure = inputs.initial_pressure[boundary.top_index];
    let bottom_initial_pressure = inputs.initial_pressure[boundary.bottom_index];
    let bottom_vertical_stress = vertical_stress_at(boundary.bottom_depth, parameters);

    let mut layer_length = boundary.bottom_depth - boundary.top_depth;
    let mut stress_difference = bottom_vertical_stress - top_vertical_stress;
    let mut pressure_difference = bottom_initial_pressure - top_initial_pressure;

    // Pressure differences exist only where pressure was interpolated from
    // an equilibration region.
    let top_difference = inputs.pressure_gradient[boundary.top_index];
    let bottom_difference = inputs.pressure_gradient[boundary.bottom_index];
    if top_difference.is_finite() {
        layer_length = PRESSURE_DIFFERENCE_OFFSET * 2.0;
        pressure_difference = top_difference;
        stress_difference = vertical_stress_difference_at(boundary.top_depth, parameters);
    } else if bottom_difference.is_finite() {
        layer_length = PRESSURE_DIFFERENCE_OFFSET * 2.0;
        pressure_difference = bottom_difference;
        stress_difference = vertical_stress_difference_at(boundary.bottom_depth, parameters);
    }

    (stress_difference * k0 + pressure_difference * (1.0 - k0)) / layer_length
}

/// Depleted and initial horizontal stress at the top of every layer, with the
/// stress gradient inside the layer.
pub fn stress_with_gradients(
    boundaries: &[LayerBoundary],
    inputs: &StressInputs<'_>,
    parameters: &LayeredModelParameters,
) -> Result<StressProfile, CurveError> {
    inputs.validate(boundaries)?;

    let mut profile = StressProfile::default();
    for boundary in boundaries {
        let top = boundary.top_index;
        let k0 = inputs.k0[top];
        let biot = inputs.biot_coefficient[top];
        let poissons_ratio = inputs.poissons_ratio[top];
        let initial_pressure = inputs.initial_pressure[top];
        let pressure_difference = inputs.pressure[top] - initial_pressure;

        let vertical_stress = vertical_stress_at(boundary.top_depth, parameters);
        let initial_horizontal_stress = k0 * vertical_stress + initial_pressure * (1.0 - k0);

        // Vertical stress change is taken as zero.
        let mut horizontal_stress_change = poissons_ratio / (1.0 - poissons_ratio)
            * (0.0 - biot * pressure_difference)
            + biot * pressure_difference;
        if !horizontal_stress_change.is_finite() {
            warn!(
                "Invalid horizontal stress change at depth {}, using zero",
                boundary.top_depth
            );
            horizontal_stress_change = 0.0;
        }

        profile
            .stress
            .push(bar_to_psi(initial_horizontal_stress + horizontal_stress_change));
        profile.initial_stress.push(bar_to_psi(initial_horizontal_stress));

        let gradient = stress_gradient_for_layer(boundary, vertical_stress, inputs, k0, parameters);
        profile
            .stress_gradient
            .push(bar_per_meter_to_psi_per_feet(gradient));
    }
    Ok(profile)
}

/// Temperature at the top of every layer, in Celsius.
pub fn temperatures(boundaries: &[LayerBoundary], parameters: &LayeredModelParameters) -> Vec<f64> {
    boundaries
        .iter()
        .map(|boundary| {
            parameters.reference_temperature
                + parameters.reference_temperature_gradient
                    * (boundary.top_depth - parameters.reference_temperature_depth)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const INF: f64 = f64::INFINITY;

    fn depths() -> Vec<f64> {
        (0..6).map(|i| 1000.0 + 10.0 * i as f64).collect()
    }

    fn boundaries() -> Vec<LayerBoundary> {
        calculate_layers(&[0.0, 0.0, 0.0, 1.0, 1.0, 1.0], &depths()).unwrap()
    }

    #[test]
    fn test_calculate_layers() {
        let layers = boundaries();
        assert_eq!(
            layers,
            vec![
                LayerBoundary {
                    top_depth: 1000.0,
                    bottom_depth: 1030.0,
                    top_index: 0,
                    bottom_index: 3
                },
                LayerBoundary {
                    top_depth: 1030.0,
                    bottom_depth: 1050.0,
                    top_index: 3,
                    bottom_index: 5
                },
            ]
        );
        assert!(calculate_layers(&[], &[]).unwrap().is_empty());
        assert!(calculate_layers(&[1.0], &[1000.0]).unwrap().is_empty());
        assert!(matches!(
            calculate_layers(&[1.0, 2.0], &[1000.0]),
            Err(CurveError::LengthMismatch(CurveProperty::Layers, 2, 1))
        ));
    }

    #[test]
    fn test_layer_average_and_top() {
        let layers = boundaries();
        let values = [0.1, 0.2, 0.3, 0.4, 0.2, 9.0];
        let averages = average_by_layer(CurveProperty::Porosity, &layers, &values).unwrap();
        assert!((averages[0] - 0.2).abs() < 1e-12);
        assert!((averages[1] - 0.3).abs() < 1e-12);
        assert_eq!(
            top_of_layer_values(CurveProperty::Porosity, &layers, &values).unwrap(),
            vec![0.1, 0.4]
        );
        assert!(average_by_layer(CurveProperty::Porosity, &layers, &values[..4]).is_err());
    }

    #[test]
    fn test_stress_with_gradients() {
        let layers = boundaries();
        let parameters = LayeredModelParameters::default();
        let pressure = [200.0, 201.0, 202.0, 203.0, 204.0, 205.0];
        let initial_pressure = [250.0, 251.0, 252.0, 253.0, 254.0, 255.0];
        let mut pressure_gradient = [INF; 6];
        pressure_gradient[5] = 0.5;
        let inputs = StressInputs {
            biot_coefficient: &[1.0; 6],
            k0: &[0.8; 6],
            pressure: &pressure,
            initial_pressure: &initial_pressure,
            poissons_ratio: &[0.25; 6],
            pressure_gradient: &pressure_gradient,
        };
        let profile = stress_with_gradients(&layers, &inputs, &parameters).unwrap();

        // Sv = 879 bar at the reference depth.
        let initial_stress = 0.8 * 879.0 + 250.0 * 0.2;
        let stress = initial_stress + 0.25 / 0.75 * 50.0 - 50.0;
        assert!((profile.initial_stress[0] - bar_to_psi(initial_stress)).abs() < 1e-9);
        assert!((profile.stress[0] - bar_to_psi(stress)).abs() < 1e-9);

        let gradient = (0.238 * 30.0 * 0.8 + 3.0 * 0.2) / 30.0;
        assert!((profile.stress_gradient[0] - bar_per_meter_to_psi_per_feet(gradient)).abs() < 1e-9);
        let gradient = (0.238 * 2.0 * 0.8 + 0.5 * 0.2) / 2.0;
        assert!((profile.stress_gradient[1] - bar_per_meter_to_psi_per_feet(gradient)).abs() < 1e-9);
    }

    #[test]
    fn test_stress_rejects_missing_top_values() {
        let layers = boundaries();
        let mut pressure = [200.0; 6];
        pressure[3] = INF;
        let inputs = StressInputs {
            biot_coefficient: &[1.0; 6],
            k0: &[0.8; 6],
            pressure: &pressure,
            initial_pressure: &[250.0; 6],
            poissons_ratio: &[0.25; 6],
            pressure_gradient: &[INF; 6],
        };
        assert!(matches!(
            stress_with_gradients(&layers, &inputs, &LayeredModelParameters::default()),
            Err(CurveError::InvalidInputData(CurveProperty::Pressure, _))
        ));
    }

    #[test]
    fn test_degenerate_poissons_ratio_gives_zero_change() {
        let layers = boundaries();
        let inputs = StressInputs {
            biot_coefficient: &[1.0; 6],
            k0: &[0.5; 6],
            pressure: &[200.0; 6],
            initial_pressure: &[250.0; 6],
            poissons_ratio: &[1.0; 6],
            pressure_gradient: &[INF; 6],
        };
        let profile = stress_with_gradients(&layers, &inputs, &LayeredModelParameters::default()).unwrap();
        assert_eq!(profile.stress, profile.initial_stress);
    }

    #[test]
    fn test_temperatures() {
        let parameters = LayeredModelParameters::default();
        let temperatures = temperatures(&boundaries(), &parameters);
        assert!((temperatures[0] - 32.5).abs() < 1e-9);
        assert!((temperatures[1] - 33.25).abs() < 1e-9);
    }
}
