// reservoir-core/src/summary/mod.rs

mod address;
mod aggregator;
mod cache;
mod category;
mod codec;
mod csv_reader;
mod difference;
mod errors;
mod memory_reader;
mod reader;

pub use address::{StatisticsType, SummaryAddress};
pub use aggregator::{kept_row_counts, TimeSeriesAggregator, TimeSeriesAggregatorBuilder};
pub use cache::ValueCache;
pub use category::{identify_category, SummaryCategory};
pub use codec::{decode, encode, join_addresses, ADDRESS_LIST_MAX_LENGTH};
pub use csv_reader::{
    default_probes, open_summary_file, CsvSummaryReader, OpenFn, OpenedSource, SourceFormat,
    SourceProbe,
};
pub use difference::{DifferenceVectorSynthesizer, DIFFERENCE_SUFFIX, HISTORY_SUFFIX};
pub use errors::{AggregatorBuilderError, ReaderError};
pub use memory_reader::MemoryReader;
pub use reader::{ReaderRegistry, SourceReader, Timestamp, UnitSystem};
