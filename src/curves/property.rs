// reservoir-core/src/curves/property.rs

use std::fmt;

/// Curves sampled along a well path through the layered model.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CurveProperty {
    Facies,
    Layers,
    Formations,
    Porosity,
    PorosityUnscaled,
    PermeabilityX,
    PermeabilityZ,
    NetToGross,
    Eqlnum,
    Pressure,
    InitialPressure,
    PressureGradient,
    YoungsModulus,
    PoissonsRatio,
    KIc,
    ProppantEmbedment,
    BiotCoefficient,
    K0,
    FluidLossCoefficient,
    SpurtLoss,
    RelativePermeabilityFactor,
    PoroElasticConstant,
    ThermalExpansionCoefficient,
    ImmobileFluidSaturation,
    Stress,
    InitialStress,
    StressGradient,
    Temperature,
}

impl CurveProperty {
    pub fn name(&self) -> &'static str {
        match self {
            CurveProperty::Facies => "FACIES",
            CurveProperty::Layers => "LAYERS",
            CurveProperty::Formations => "FORMATIONS",
            CurveProperty::Porosity => "POROSITY",
            CurveProperty::PorosityUnscaled => "POROSITY_UNSCALED",
            CurveProperty::PermeabilityX => "PERMEABILITY_X",
            CurveProperty::PermeabilityZ => "PERMEABILITY_Z",
            CurveProperty::NetToGross => "NET_TO_GROSS",
            CurveProperty::Eqlnum => "EQLNUM",
            CurveProperty::Pressure => "PRESSURE",
            CurveProperty::InitialPressure => "INITIAL_PRESSURE",
            CurveProperty::PressureGradient => "PRESSURE_GRADIENT",
            CurveProperty::YoungsModulus => "YOUNGS_MODULUS",
            CurveProperty::PoissonsRatio => "POISSONS_RATIO",
            CurveProperty::KIc => "K_IC",
            CurveProperty::ProppantEmbedment => "PROPPANT_EMBEDMENT",
            CurveProperty::BiotCoefficient => "BIOT_COEFFICIENT",
            CurveProperty::K0 => "K0",
            CurveProperty::FluidLossCoefficient => "FLUID_LOSS_COEFFICIENT",
            CurveProperty::SpurtLoss => "SPURT_LOSS",
            CurveProperty::RelativePermeabilityFactor => "RELATIVE_PERMEABILITY_FACTOR",
            CurveProperty::PoroElasticConstant => "PORO_ELASTIC_CONSTANT",
            CurveProperty::ThermalExpansionCoefficient => "THERMAL_EXPANSION_COEFFICIENT",
            CurveProperty::ImmobileFluidSaturation => "IMMOBILE_FLUID_SATURATION",
            CurveProperty::Stress => "STRESS",
            CurveProperty::InitialStress => "INITIAL_STRESS",
            CurveProperty::StressGradient => "STRESS_GRADIENT",
            CurveProperty::Temperature => "TEMPERATURE",
        }
    }
}

impl fmt::Display for CurveProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One extracted or calculated curve. Missing samples are `f64::INFINITY`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CurveData {
    pub values: Vec<f64>,
    pub measured_depths: Vec<f64>,
    pub tv_depths: Vec<f64>,
    pub rkb_diff: f64,
}

impl CurveData {
    pub fn new(values: Vec<f64>, measured_depths: Vec<f64>, tv_depths: Vec<f64>, rkb_diff: f64) -> Self {
        Self {
            values,
            measured_depths,
            tv_depths,
            rkb_diff,
        }
    }

    /// Curve on the same depths as `template` with every sample set to `value`.
    pub fn filled_like(template: &CurveData, value: f64) -> Self {
        Self {
            values: vec![value; template.measured_depths.len()],
            measured_depths: template.measured_depths.clone(),
            tv_depths: template.tv_depths.clone(),
            rkb_diff: template.rkb_diff,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
