// reservoir-core/src/curves/well_log.rs

use super::property::{CurveData, CurveProperty};
use crate::summary::UnitSystem;
use std::collections::HashMap;

/// Raw curves extracted from the grid along the well path.
pub trait WellLogSource: Send + Sync {
    fn extract(&self, property: CurveProperty, time_step: usize) -> Option<CurveData>;

    /// Pressures from a field unit source are in psi.
    fn unit_system(&self) -> UnitSystem {
        UnitSystem::Metric
    }
}

/// Well logs held in memory. Static curves answer every time step.
#[derive(Clone, Debug)]
pub struct MemoryWellLogSource {
    static_curves: HashMap<CurveProperty, CurveData>,
    dynamic_curves: HashMap<(CurveProperty, usize), CurveData>,
    unit_system: UnitSystem,
}

impl Default for MemoryWellLogSource {
    fn default() -> Self {
        Self {
            static_curves: HashMap::new(),
            dynamic_curves: HashMap::new(),
            unit_system: UnitSystem::Metric,
        }
    }
}

impl MemoryWellLogSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_unit_system(mut self, unit_system: UnitSystem) -> Self {
        self.unit_system = unit_system;
        self
    }

    pub fn insert_static(&mut self, property: CurveProperty, data: CurveData) -> &mut Self {
        self.static_curves.insert(property, data);
        self
    }

    pub fn insert(&mut self, property: CurveProperty, time_step: usize, data: CurveData) -> &mut Self {
        self.dynamic_curves.insert((property, time_step), data);
        self
    }
}

impl WellLogSource for MemoryWellLogSource {
    fn extract(&self, property: CurveProperty, time_step: usize) -> Option<CurveData> {
        self.dynamic_curves
            .get(&(property, time_step))
            .or_else(|| self.static_curves.get(&property))
            .cloned()
    }

    fn unit_system(&self) -> UnitSystem {
        self.unit_system
    }
}
