// reservoir-core/src/summary/difference.rs

use super::address::SummaryAddress;
use super::reader::{SourceReader, Timestamp, UnitSystem};
use log::{debug, trace};
use parking_lot::RwLock;
use std::collections::{BTreeMap, BTreeSet, HashMap};

pub const HISTORY_SUFFIX: &str = "H";
pub const DIFFERENCE_SUFFIX: &str = "_DIFF";

/// Wraps a reader and adds `<VECTOR>_DIFF` addresses for every vector that
/// has a `<VECTOR>H` history sibling. Difference values are computed on
/// first request and kept.
pub struct DifferenceVectorSynthesizer<R> {
    inner: R,
    addresses: BTreeSet<SummaryAddress>,
    /// difference address -> (native, history)
    derived: BTreeMap<SummaryAddress, (SummaryAddress, SummaryAddress)>,
    cache: RwLock<HashMap<SummaryAddress, Vec<f64>>>,
}

impl<R: SourceReader> DifferenceVectorSynthesizer<R> {
    pub fn new(inner: R) -> Self {
        let native_addresses = inner.all_addresses();
        let mut derived = BTreeMap::new();
        for address in native_addresses {
            if address.is_error_result() || address.vector_name().ends_with(HISTORY_SUFFIX) {
                continue;
            }
            let history = address
                .with_vector_name(&format!("{}{}", address.vector_name(), HISTORY_SUFFIX));
            if !native_addresses.contains(&history) {
                continue;
            }
            let difference = address
                .with_vector_name(&format!("{}{}", address.vector_name(), DIFFERENCE_SUFFIX));
            trace!("Derivable difference vector {}", difference);
            derived.insert(difference, (address.clone(), history));
        }
        debug!("Registered {} difference vectors", derived.len());

        let mut addresses = native_addresses.clone();
        addresses.extend(derived.keys().cloned());
        Self {
            inner,
            addresses,
            derived,
            cache: RwLock::new(HashMap::new()),
        }
    }

    pub fn difference_addresses(&self) -> impl Iterator<Item = &SummaryAddress> {
        self.derived.keys()
    }

    pub fn is_difference_address(&self, address: &SummaryAddress) -> bool {
        self.derived.contains_key(address)
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    fn difference_values(
        &self,
        native: &SummaryAddress,
        history: &SummaryAddress,
    ) -> Option<Vec<f64>> {
        let native_values = self.values(native)?;
        let history_values = self.values(history)?;
        if native_values.len() != history_values.len() {
            debug!(
                "Cannot subtract {} ({} values) and {} ({} values)",
                history,
                history_values.len(),
                native,
                native_values.len()
            );
            return None;
        }
        Some(
            native_values
                .iter()
                .zip(history_values.iter())
                .map(|(native, history)| native - history)
                .collect(),
        )
    }
}

impl<R: SourceReader> SourceReader for DifferenceVectorSynthesizer<R> {
    fn serial_number(&self) -> u64 {
        self.inner.serial_number()
    }

    fn all_addresses(&self) -> &BTreeSet<SummaryAddress> {
        &self.addresses
    }

    fn all_error_addresses(&self) -> &BTreeSet<SummaryAddress> {
        self.inner.all_error_addresses()
    }

    fn time_steps(&self, address: &SummaryAddress) -> &[Timestamp] {
        match self.derived.get(address) {
            Some((native, _)) => self.inner.time_steps(native),
            None => self.inner.time_steps(address),
        }
    }

    fn values(&self, address: &SummaryAddress) -> Option<Vec<f64>> {
        let Some((native, history)) = self.derived.get(address) else {
            return self.inner.values(address);
        };
        if let Some(values) = self.cache.read().get(address) {
            return Some(values.clone());
        }
        let values = self.difference_values(native, history)?;
        self.cache.write().insert(address.clone(), values.clone());
        Some(values)
    }

    fn unit_name(&self, address: &SummaryAddress) -> String {
        match self.derived.get(address) {
            Some((native, _)) => self.inner.unit_name(native),
            None => self.inner.unit_name(address),
        }
    }

    fn unit_system(&self) -> UnitSystem {
        self.inner.unit_system()
    }
}
