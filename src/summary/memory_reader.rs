// reservoir-core/src/summary/memory_reader.rs

use super::address::SummaryAddress;
use super::errors::ReaderError;
use super::reader::{ReaderRegistry, SourceReader, Timestamp, UnitSystem};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Columnar source held entirely in memory, with one time axis shared by
/// every vector.
#[derive(Debug)]
pub struct MemoryReader {
    serial_number: u64,
    time_steps: Vec<Timestamp>,
    columns: BTreeMap<SummaryAddress, Vec<f64>>,
    units: HashMap<SummaryAddress, String>,
    unit_system: UnitSystem,
    addresses: BTreeSet<SummaryAddress>,
    error_addresses: BTreeSet<SummaryAddress>,
}

impl MemoryReader {
    pub fn new(registry: &ReaderRegistry, time_steps: Vec<Timestamp>) -> Self {
        Self {
            serial_number: registry.next_serial_number(),
            time_steps,
            columns: BTreeMap::new(),
            units: HashMap::new(),
            unit_system: UnitSystem::Unknown,
            addresses: BTreeSet::new(),
            error_addresses: BTreeSet::new(),
        }
    }

    /// Registers a vector. An empty `values` declares the address with no
    /// data; any other length must match the time axis.
    pub fn with_vector(
        mut self,
        address: SummaryAddress,
        values: Vec<f64>,
    ) -> Result<Self, ReaderError> {
        self.insert_vector(address, values)?;
        Ok(self)
    }

    pub fn insert_vector(
        &mut self,
        address: SummaryAddress,
        values: Vec<f64>,
    ) -> Result<(), ReaderError> {
        if !values.is_empty() && values.len() != self.time_steps.len() {
            return Err(ReaderError::LengthMismatch(
                address.to_string(),
                values.len(),
                self.time_steps.len(),
            ));
        }
        if address.is_error_result() {
            self.error_addresses.insert(address.clone());
        } else {
            self.addresses.insert(address.clone());
        }
        self.columns.insert(address, values);
        Ok(())
    }

    pub fn with_unit(mut self, address: &SummaryAddress, unit: &str) -> Self {
        self.units.insert(address.clone(), unit.to_string());
        self
    }

    pub fn with_unit_system(mut self, unit_system: UnitSystem) -> Self {
        self.unit_system = unit_system;
        self
    }
}

impl SourceReader for MemoryReader {
    fn serial_number(&self) -> u64 {
        self.serial_number
    }

    fn all_addresses(&self) -> &BTreeSet<SummaryAddress> {
        &self.addresses
    }

    fn all_error_addresses(&self) -> &BTreeSet<SummaryAddress> {
        &self.error_addresses
    }

    fn time_steps(&self, _address: &SummaryAddress) -> &[Timestamp] {
        &self.time_steps
    }

    fn values(&self, address: &SummaryAddress) -> Option<Vec<f64>> {
        self.columns
            .get(address)
            .filter(|values| !values.is_empty())
            .cloned()
    }

    fn unit_name(&self, address: &SummaryAddress) -> String {
        self.units.get(address).cloned().unwrap_or_default()
    }

    fn unit_system(&self) -> UnitSystem {
        self.unit_system
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declared_vector_without_data() {
        let registry = ReaderRegistry::new();
        let address = SummaryAddress::well("WOPR", "P1", None);
        let reader = MemoryReader::new(&registry, vec![0, 1, 2])
            .with_vector(address.clone(), vec![])
            .unwrap();
        assert!(reader.has_address(&address));
        assert_eq!(reader.values(&address), None);
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let registry = ReaderRegistry::new();
        let result = MemoryReader::new(&registry, vec![0, 1, 2])
            .with_vector(SummaryAddress::field("FOPT", None), vec![1.0]);
        assert!(matches!(result, Err(ReaderError::LengthMismatch(_, 1, 3))));
    }

    #[test]
    fn test_error_addresses_kept_apart() {
        let registry = ReaderRegistry::new();
        let mut error_address = SummaryAddress::field("FOPT", None);
        error_address.set_error_result(true);
        let reader = MemoryReader::new(&registry, vec![0])
            .with_vector(SummaryAddress::field("FOPT", None), vec![1.0])
            .unwrap()
            .with_vector(error_address.clone(), vec![0.1])
            .unwrap()
            .with_unit(&error_address, "SM3")
            .with_unit_system(UnitSystem::Metric);
        assert_eq!(reader.all_addresses().len(), 1);
        assert!(reader.all_error_addresses().contains(&error_address));
        assert!(reader.has_address(&error_address));
        assert_eq!(reader.unit_name(&error_address), "SM3");
        assert_eq!(reader.unit_system(), UnitSystem::Metric);
    }
}
