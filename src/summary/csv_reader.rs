// reservoir-core/src/summary/csv_reader.rs

use super::address::SummaryAddress;
use super::codec::decode;
use super::errors::ReaderError;
use super::reader::{ReaderRegistry, SourceReader, Timestamp, UnitSystem};
use log::{debug, info, warn};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fs::File;
use std::io;
use std::path::Path;
use std::time::Instant;

/// Delimited text summary source.
///
/// The header row holds `TIME` followed by one encoded address per column.
/// An optional second row starting with `UNITS`, `METRIC`, `FIELD` or `LAB`
/// carries unit names and sets the unit system. A column with no cells
/// filled reports no values; single empty cells read as NaN.
#[derive(Debug)]
pub struct CsvSummaryReader {
    serial_number: u64,
    time_steps: Vec<Timestamp>,
    columns: BTreeMap<SummaryAddress, Vec<f64>>,
    units: HashMap<SummaryAddress, String>,
    unit_system: UnitSystem,
    addresses: BTreeSet<SummaryAddress>,
    error_addresses: BTreeSet<SummaryAddress>,
}

fn parse_time(text: &str) -> Option<Timestamp> {
    if let Ok(seconds) = text.parse::<Timestamp>() {
        return Some(seconds);
    }
    text.parse::<f64>()
        .ok()
        .filter(|seconds| seconds.is_finite())
        .map(|seconds| seconds.round() as Timestamp)
}

impl CsvSummaryReader {
    pub fn open(path: &Path, registry: &ReaderRegistry) -> Result<Self, ReaderError> {
        Self::open_with_delimiter(path, b',', registry)
    }

    pub fn open_with_delimiter(
        path: &Path,
        delimiter: u8,
        registry: &ReaderRegistry,
    ) -> Result<Self, ReaderError> {
        let now = Instant::now();
        let file = File::open(path)?;
        let reader = Self::from_reader(file, delimiter, registry)?;
        info!(
            "Opened {} with {} vectors and {} time steps in {}",
            path.display(),
            reader.columns.len(),
            reader.time_steps.len(),
            humantime::format_duration(now.elapsed())
        );
        Ok(reader)
    }

    pub fn from_reader<R: io::Read>(
        rdr: R,
        delimiter: u8,
        registry: &ReaderRegistry,
    ) -> Result<Self, ReaderError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(false)
            .trim(csv::Trim::All)
            .from_reader(rdr);
        let mut records = csv_reader.records();

        let header = match records.next() {
            Some(record) => record?,
            None => return Err(ReaderError::MissingTimeColumn(String::new())),
        };
        let first = header.get(0).unwrap_or_default();
        if !first.eq_ignore_ascii_case("TIME") {
            return Err(ReaderError::MissingTimeColumn(first.to_string()));
        }
        if header.len() < 2 {
            return Err(ReaderError::NoVectorColumns);
        }
        let header_addresses: Vec<SummaryAddress> = header.iter().skip(1).map(decode).collect();
        debug!("Header declares {} vectors", header_addresses.len());

        let mut time_steps: Vec<Timestamp> = Vec::new();
        let mut raw_columns: Vec<Vec<Option<f64>>> = vec![Vec::new(); header_addresses.len()];
        let mut unit_names: Vec<String> = Vec::new();
        let mut unit_system = UnitSystem::Unknown;

        for (record_index, record) in records.enumerate() {
            let record = record?;
            let row = record_index + 2;
            let first = record.get(0).unwrap_or_default();
            if record_index == 0 {
                if let Ok(system) = first.parse::<UnitSystem>() {
                    unit_system = system;
                    unit_names = record.iter().skip(1).map(str::to_string).collect();
                    continue;
                }
            }

            let time = parse_time(first)
                .ok_or_else(|| ReaderError::InvalidTime(row, first.to_string()))?;
            if let Some(&last) = time_steps.last() {
                if time <= last {
                    return Err(ReaderError::NonMonotonicTime(row));
                }
            }
            time_steps.push(time);

            for (column, cell) in record.iter().skip(1).enumerate() {
                let value = if cell.is_empty() {
                    None
                } else {
                    Some(cell.parse::<f64>().map_err(|_| {
                        ReaderError::InvalidValue(row, column + 1, cell.to_string())
                    })?)
                };
                raw_columns[column].push(value);
            }
        }

        let mut columns = BTreeMap::new();
        let mut units = HashMap::new();
        let mut addresses = BTreeSet::new();
        let mut error_addresses = BTreeSet::new();
        for (column, (address, raw)) in header_addresses.into_iter().zip(raw_columns).enumerate() {
            let values: Vec<f64> = if raw.iter().all(Option::is_none) {
                Vec::new()
            } else {
                raw.into_iter().map(|value| value.unwrap_or(f64::NAN)).collect()
            };
            if let Some(unit) = unit_names.get(column).filter(|unit| !unit.is_empty()) {
                units.insert(address.clone(), unit.clone());
            }
            if address.is_error_result() {
                error_addresses.insert(address.clone());
            } else {
                addresses.insert(address.clone());
            }
            if columns.insert(address.clone(), values).is_some() {
                warn!("Column {} repeats address {}, keeping the last", column + 1, address);
            }
        }

        Ok(Self {
            serial_number: registry.next_serial_number(),
            time_steps,
            columns,
            units,
            unit_system,
            addresses,
            error_addresses,
        })
    }
}

impl SourceReader for CsvSummaryReader {
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

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SourceFormat {
    CommaSeparated,
    SemicolonSeparated,
    TabSeparated,
}

impl SourceFormat {
    pub fn delimiter(&self) -> u8 {
        match self {
            SourceFormat::CommaSeparated => b',',
            SourceFormat::SemicolonSeparated => b';',
            SourceFormat::TabSeparated => b'\t',
        }
    }
}

pub type OpenFn =
    fn(&Path, SourceFormat, &ReaderRegistry) -> Result<Box<dyn SourceReader>, ReaderError>;

/// One entry of the open chain: the format it claims and how to open it.
#[derive(Clone, Copy)]
pub struct SourceProbe {
    pub format: SourceFormat,
    pub open: OpenFn,
}

pub struct OpenedSource {
    pub format: SourceFormat,
    pub reader: Box<dyn SourceReader>,
}

fn open_delimited(
    path: &Path,
    format: SourceFormat,
    registry: &ReaderRegistry,
) -> Result<Box<dyn SourceReader>, ReaderError> {
    let reader = CsvSummaryReader::open_with_delimiter(path, format.delimiter(), registry)?;
    Ok(Box::new(reader))
}

pub fn default_probes() -> Vec<SourceProbe> {
    [
        SourceFormat::CommaSeparated,
        SourceFormat::SemicolonSeparated,
        SourceFormat::TabSeparated,
    ]
    .into_iter()
    .map(|format| SourceProbe {
        format,
        open: open_delimited,
    })
    .collect()
}

/// Tries each probe in order and keeps the first reader that opens.
pub fn open_summary_file(
    path: &Path,
    registry: &ReaderRegistry,
    probes: &[SourceProbe],
) -> Result<OpenedSource, ReaderError> {
    for probe in probes {
        match (probe.open)(path, probe.format, registry) {
            Ok(reader) => {
                debug!("Opened {} as {:?}", path.display(), probe.format);
                return Ok(OpenedSource {
                    format: probe.format,
                    reader,
                });
            }
            Err(ReaderError::IoError(e)) => return Err(ReaderError::IoError(e)),
            Err(e) => debug!("{:?} probe rejected {}: {}", probe.format, path.display(), e),
        }
    }
    Err(ReaderError::NoMatchingFormat(path.to_path_buf()))
}
