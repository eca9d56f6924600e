// reservoir-core/src/summary/reader.rs

use super::address::SummaryAddress;
use std::collections::BTreeSet;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};

/// Seconds since the Unix epoch.
pub type Timestamp = i64;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum UnitSystem {
    Metric,
    Field,
    Lab,
    #[default]
    Unknown,
}

impl FromStr for UnitSystem {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "METRIC" => Ok(UnitSystem::Metric),
            "FIELD" => Ok(UnitSystem::Field),
            "LAB" => Ok(UnitSystem::Lab),
            "UNKNOWN" | "UNITS" => Ok(UnitSystem::Unknown),
            _ => Err(()),
        }
    }
}

/// Hands out reader serial numbers. One registry is shared by every reader
/// of a session; tests create their own.
#[derive(Debug, Default)]
pub struct ReaderRegistry {
    next_serial: AtomicU64,
}

impl ReaderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_serial_number(&self) -> u64 {
        self.next_serial.fetch_add(1, Ordering::Relaxed)
    }
}

/// One opened summary data source.
///
/// `values` returns `None` when the address is unknown to this source or
/// the source holds no data for it. Implementations are read-only after
/// construction.
pub trait SourceReader: Send + Sync {
    fn serial_number(&self) -> u64;

    fn all_addresses(&self) -> &BTreeSet<SummaryAddress>;

    fn all_error_addresses(&self) -> &BTreeSet<SummaryAddress>;

    /// Time steps for `address`. Sources with a single global time axis
    /// ignore the address; [`SummaryAddress::time`] always asks for the
    /// global axis.
    fn time_steps(&self, address: &SummaryAddress) -> &[Timestamp];

    fn values(&self, address: &SummaryAddress) -> Option<Vec<f64>>;

    fn unit_name(&self, address: &SummaryAddress) -> String;

    fn unit_system(&self) -> UnitSystem;

    fn has_address(&self, address: &SummaryAddress) -> bool {
        self.all_addresses().contains(address) || self.all_error_addresses().contains(address)
    }
}

impl<R: SourceReader + ?Sized> SourceReader for Box<R> {
    fn serial_number(&self) -> u64 {
        (**self).serial_number()
    }

    fn all_addresses(&self) -> &BTreeSet<SummaryAddress> {
        (**self).all_addresses()
    }

    fn all_error_addresses(&self) -> &BTreeSet<SummaryAddress> {
        (**self).all_error_addresses()
    }

    fn time_steps(&self, address: &SummaryAddress) -> &[Timestamp] {
        (**self).time_steps(address)
    }

    fn values(&self, address: &SummaryAddress) -> Option<Vec<f64>> {
        (**self).values(address)
    }

    fn unit_name(&self, address: &SummaryAddress) -> String {
        (**self).unit_name(address)
    }

    fn unit_system(&self) -> UnitSystem {
        (**self).unit_system()
    }

    fn has_address(&self, address: &SummaryAddress) -> bool {
        (**self).has_address(address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_serial_numbers_are_unique_across_threads() {
        let registry = Arc::new(ReaderRegistry::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let registry = Arc::clone(&registry);
                thread::spawn(move || {
                    (0..100)
                        .map(|_| registry.next_serial_number())
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        let mut serials: Vec<u64> = handles
            .into_iter()
            .flat_map(|handle| handle.join().unwrap())
            .collect();
        serials.sort_unstable();
        serials.dedup();
        assert_eq!(serials.len(), 400);
    }

    #[test]
    fn test_unit_system_parsing() {
        assert_eq!("metric".parse::<UnitSystem>(), Ok(UnitSystem::Metric));
        assert_eq!(" FIELD ".parse::<UnitSystem>(), Ok(UnitSystem::Field));
        assert!("bogus".parse::<UnitSystem>().is_err());
    }
}
