// reservoir-core/src/units.rs

pub const PSI_PER_BAR: f64 = 14.503773773;
pub const FEET_PER_METER: f64 = 3.28083989501;

pub fn bar_to_psi(bar: f64) -> f64 {
    bar * PSI_PER_BAR
}

pub fn psi_to_bar(psi: f64) -> f64 {
    psi / PSI_PER_BAR
}

pub fn meter_to_feet(meter: f64) -> f64 {
    meter * FEET_PER_METER
}

pub fn feet_to_meter(feet: f64) -> f64 {
    feet / FEET_PER_METER
}

pub fn bar_per_meter_to_psi_per_feet(bar_per_meter: f64) -> f64 {
    bar_to_psi(bar_per_meter) / FEET_PER_METER
}

pub fn celsius_to_fahrenheit(celsius: f64) -> f64 {
    celsius * 1.8 + 32.0
}

/// GPa to million psi.
pub fn gigapascal_to_mega_psi(gigapascal: f64) -> f64 {
    gigapascal * 0.14503773773
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversions() {
        assert!((bar_to_psi(1.0) - 14.5038).abs() < 0.001);
        assert!((psi_to_bar(bar_to_psi(250.0)) - 250.0).abs() < 1e-9);
        assert!((meter_to_feet(1000.0) - 3280.84).abs() < 0.01);
        assert!((feet_to_meter(3.28083989501) - 1.0).abs() < 1e-9);
        assert!((celsius_to_fahrenheit(100.0) - 212.0).abs() < 1e-9);
        assert!((bar_per_meter_to_psi_per_feet(0.1) - 0.4421).abs() < 0.001);
        assert!((gigapascal_to_mega_psi(10.0) - 1.4504).abs() < 0.001);
    }
}
