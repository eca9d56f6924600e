// reservoir-core/src/summary/aggregator.rs

use super::address::SummaryAddress;
use super::cache::ValueCache;
use super::errors::AggregatorBuilderError;
use super::reader::{ReaderRegistry, SourceReader, Timestamp, UnitSystem};
use log::{debug, info, trace};
use std::collections::BTreeSet;
use std::time::Instant;

/// Number of leading rows kept from each reader so that every timestamp is
/// owned by the newest segment covering it. `time_steps` must be ordered
/// oldest to newest segment.
pub fn kept_row_counts(time_steps: &[&[Timestamp]]) -> Vec<usize> {
    let mut kept = vec![0; time_steps.len()];
    let mut cut_off_time: Option<Timestamp> = None;
    for (reader_index, steps) in time_steps.iter().enumerate().rev() {
        match cut_off_time {
            None => {
                if let Some(&first) = steps.first() {
                    kept[reader_index] = steps.len();
                    cut_off_time = Some(first);
                }
            }
            Some(cut_off) => {
                kept[reader_index] = steps.iter().filter(|&&time| time < cut_off).count();
                if let Some(&first) = steps.first() {
                    if first < cut_off {
                        cut_off_time = Some(first);
                    }
                }
            }
        }
    }
    kept
}

/// Restart chain of summary sources seen as one source.
///
/// Overlapping time ranges are resolved in favour of the newer segment.
/// Values are assembled per address on request and kept in a [`ValueCache`].
pub struct TimeSeriesAggregator {
    serial_number: u64,
    readers: Vec<Box<dyn SourceReader>>,
    kept_row_counts: Vec<usize>,
    time_steps: Vec<Timestamp>,
    addresses: BTreeSet<SummaryAddress>,
    error_addresses: BTreeSet<SummaryAddress>,
    cache: ValueCache,
}

impl TimeSeriesAggregator {
    fn new(registry: &ReaderRegistry, readers: Vec<Box<dyn SourceReader>>) -> Self {
        let mut aggregator = Self {
            serial_number: registry.next_serial_number(),
            readers: Vec::new(),
            kept_row_counts: Vec::new(),
            time_steps: Vec::new(),
            addresses: BTreeSet::new(),
            error_addresses: BTreeSet::new(),
            cache: ValueCache::new(),
        };
        aggregator.set_readers(readers);
        aggregator
    }

    /// Replaces the restart chain and drops every cached vector.
    pub fn set_readers(&mut self, readers: Vec<Box<dyn SourceReader>>) {
        let now = Instant::now();
        info!("Aggregating {} summary segments", readers.len());
        self.readers = readers;

        let time_axis = SummaryAddress::time();
        let per_reader: Vec<&[Timestamp]> = self
            .readers
            .iter()
            .map(|reader| reader.time_steps(&time_axis))
            .collect();
        self.kept_row_counts = kept_row_counts(&per_reader);
        debug!("Kept rows per segment: {:?}", self.kept_row_counts);

        self.time_steps = per_reader
            .iter()
            .zip(&self.kept_row_counts)
            .flat_map(|(steps, &kept)| steps.iter().take(kept).copied())
            .collect();

        self.addresses = self
            .readers
            .iter()
            .flat_map(|reader| reader.all_addresses().iter().cloned())
            .collect();
        self.error_addresses = self
            .readers
            .iter()
            .flat_map(|reader| reader.all_error_addresses().iter().cloned())
            .collect();
        self.cache.clear();
        info!(
            "Aggregated {} time steps and {} addresses in {}",
            self.time_steps.len(),
            self.addresses.len(),
            humantime::format_duration(now.elapsed())
        );
    }

    pub fn readers(&self) -> &[Box<dyn SourceReader>] {
        &self.readers
    }

    pub fn kept_row_counts(&self) -> &[usize] {
        &self.kept_row_counts
    }

    pub fn cache(&self) -> &ValueCache {
        &self.cache
    }

    fn assemble_values(&self, address: &SummaryAddress) -> Vec<f64> {
        let time_axis = SummaryAddress::time();
        let mut values = Vec::with_capacity(self.time_steps.len());
        for (reader, &kept) in self.readers.iter().zip(&self.kept_row_counts) {
            let step_count = reader.time_steps(&time_axis).len();
            let segment = match reader.values(address).filter(|values| !values.is_empty()) {
                Some(segment) => segment,
                None if step_count > 0 => {
                    // Vector not present yet in this segment
                    trace!(
                        "Zero filling {} rows of {} from reader {}",
                        step_count,
                        address,
                        reader.serial_number()
                    );
                    vec![0.0; step_count]
                }
                None => Vec::new(),
            };
            values.extend(segment.into_iter().take(kept));
        }
        values
    }
}

impl SourceReader for TimeSeriesAggregator {
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
        if let Some(values) = self.cache.get(address) {
            return Some(values);
        }
        if !self.has_address(address) {
            return None;
        }
        let values = self.assemble_values(address);
        assert_eq!(
            values.len(),
            self.time_steps.len(),
            "aggregated values of {} do not line up with the aggregated time steps",
            address
        );
        self.cache.put(address.clone(), values.clone());
        Some(values)
    }

    fn unit_name(&self, address: &SummaryAddress) -> String {
        self.readers
            .first()
            .map(|reader| reader.unit_name(address))
            .unwrap_or_default()
    }

    fn unit_system(&self) -> UnitSystem {
        self.readers
            .first()
            .map(|reader| reader.unit_system())
            .unwrap_or_default()
    }
}

#[derive(Default)]
pub struct TimeSeriesAggregatorBuilder<'a> {
    registry: Option<&'a ReaderRegistry>,
    readers: Option<Vec<Box<dyn SourceReader>>>,
}

impl<'a> TimeSeriesAggregatorBuilder<'a> {
    pub fn build(&mut self) -> Result<TimeSeriesAggregator, AggregatorBuilderError> {
        let registry = self.registry.ok_or_else(|| {
            AggregatorBuilderError::UninitializedFieldError("registry".to_string())
        })?;
        let readers = self.readers.take().ok_or_else(|| {
            AggregatorBuilderError::UninitializedFieldError("readers".to_string())
        })?;
        Ok(TimeSeriesAggregator::new(registry, readers))
    }

    pub fn registry(&mut self, registry: &'a ReaderRegistry) -> &mut Self {
        self.registry = Some(registry);
        self
    }

    /// Appends a segment. Segments are expected oldest first.
    pub fn reader(&mut self, reader: Box<dyn SourceReader>) -> &mut Self {
        self.readers.get_or_insert_with(Vec::new).push(reader);
        self
    }

    pub fn readers(&mut self, readers: Vec<Box<dyn SourceReader>>) -> &mut Self {
        self.readers = Some(readers);
        self
    }
}
