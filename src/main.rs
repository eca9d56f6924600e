// reservoir-core/src/main.rs

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use log::info;
use reservoir_core::summary::{
    decode, default_probes, encode, identify_category, open_summary_file,
    DifferenceVectorSynthesizer, ReaderRegistry, SourceReader, SummaryAddress, SummaryCategory,
    TimeSeriesAggregatorBuilder,
};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(author, about, long_about = None)]
#[command(version = reservoir_core::VERSION)]
struct Cli {
    #[clap(subcommand)]
    mode: Modes,
}

#[derive(Subcommand, Debug)]
enum Modes {
    /// Merge a restart chain of summary files, oldest first, into one table.
    Merge(MergeOpts),
    /// Print the fields of text addresses.
    Decode(DecodeOpts),
    /// Build the text form of an address from its qualifiers.
    Encode(EncodeOpts),
    /// List the vectors of a restart chain with their units.
    Vectors(VectorsOpts),
}

#[derive(Args, Debug)]
struct MergeOpts {
    #[clap(required = true)]
    files: Vec<PathBuf>,
    #[clap(short, long)]
    output: Option<PathBuf>,
    #[clap(long, action, help = "Add _DIFF vectors for every vector with a history counterpart")]
    differences: bool,
    #[clap(long, value_delimiter = ',', help = "Only write these addresses")]
    vectors: Option<Vec<String>>,
}

#[derive(Args, Debug)]
struct DecodeOpts {
    #[clap(required = true)]
    addresses: Vec<String>,
}

#[derive(Args, Debug)]
struct EncodeOpts {
    vector: String,
    #[clap(long)]
    well: Option<String>,
    #[clap(long)]
    group: Option<String>,
    #[clap(long)]
    network: Option<String>,
    #[clap(long)]
    lgr: Option<String>,
    #[clap(long)]
    region: Option<i32>,
    #[clap(long)]
    region2: Option<i32>,
    #[clap(long)]
    aquifer: Option<i32>,
    #[clap(long)]
    completion: Option<i32>,
    #[clap(long)]
    segment: Option<i32>,
    #[clap(long, value_delimiter = ',', num_args = 3, help = "Cell as I,J,K")]
    cell: Option<Vec<i32>>,
    #[clap(long, action)]
    error: bool,
}

#[derive(Args, Debug)]
struct VectorsOpts {
    #[clap(required = true)]
    files: Vec<PathBuf>,
}

fn open_chain(files: &[PathBuf], registry: &ReaderRegistry) -> Result<Box<dyn SourceReader>> {
    let probes = default_probes();
    let mut builder = TimeSeriesAggregatorBuilder::default();
    builder.registry(registry);
    for path in files {
        let opened = open_summary_file(path, registry, &probes)
            .with_context(|| format!("unable to open {}", path.display()))?;
        info!("Opened {} as {:?}", path.display(), opened.format);
        builder.reader(opened.reader);
    }
    Ok(Box::new(builder.build()?))
}

fn run_merge(opts: &MergeOpts) -> Result<()> {
    let registry = ReaderRegistry::new();
    let mut reader = open_chain(&opts.files, &registry)?;
    if opts.differences {
        reader = Box::new(DifferenceVectorSynthesizer::new(reader));
    }

    let addresses: Vec<SummaryAddress> = match &opts.vectors {
        Some(texts) => texts.iter().map(|text| decode(text)).collect(),
        None => reader
            .all_addresses()
            .iter()
            .chain(reader.all_error_addresses())
            .cloned()
            .collect(),
    };
    let time_steps = reader.time_steps(&SummaryAddress::time()).to_vec();
    let columns: Vec<Option<Vec<f64>>> = addresses
        .iter()
        .map(|address| {
            reader
                .values(address)
                .filter(|values| values.len() == time_steps.len())
        })
        .collect();

    let sink: Box<dyn io::Write> = match &opts.output {
        Some(path) => Box::new(
            std::fs::File::create(path)
                .with_context(|| format!("unable to create {}", path.display()))?,
        ),
        None => Box::new(io::stdout()),
    };
    let mut writer = csv::Writer::from_writer(sink);
    let mut header = vec!["TIME".to_string()];
    header.extend(addresses.iter().map(encode));
    writer.write_record(&header)?;
    for (row, time_step) in time_steps.iter().enumerate() {
        let mut record = vec![time_step.to_string()];
        record.extend(columns.iter().map(|column| {
            column
                .as_ref()
                .map(|values| values[row].to_string())
                .unwrap_or_default()
        }));
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}

fn run_decode(opts: &DecodeOpts) -> Result<()> {
    for text in &opts.addresses {
        let address = decode(text);
        println!(
            "{}\t{:?}\t{}\t{}\t{}",
            text,
            address.category(),
            address.vector_name(),
            address.item_text(),
            if address.is_valid() { "valid" } else { "invalid" }
        );
    }
    Ok(())
}

fn cell(opts: &EncodeOpts) -> Result<Option<(i32, i32, i32)>> {
    match opts.cell.as_deref() {
        None => Ok(None),
        Some([i, j, k]) => Ok(Some((*i, *j, *k))),
        Some(other) => bail!("--cell takes I,J,K, got {} values", other.len()),
    }
}

fn encode_address(opts: &EncodeOpts) -> Result<SummaryAddress> {
    let vector = opts.vector.as_str();
    let cell = cell(opts)?;
    let mut address = match (&opts.lgr, &opts.well, cell) {
        (Some(lgr), Some(well), Some((i, j, k))) => {
            SummaryAddress::well_connection_lgr(vector, lgr, well, i, j, k, None)
        }
        (Some(lgr), Some(well), None) => SummaryAddress::well_lgr(vector, lgr, well, None),
        (Some(lgr), None, Some((i, j, k))) => SummaryAddress::block_lgr(vector, lgr, i, j, k, None),
        (Some(_), None, None) => bail!("--lgr needs --well or --cell"),
        (None, Some(well), Some((i, j, k))) => {
            SummaryAddress::well_connection(vector, well, i, j, k, None)
        }
        (None, Some(well), None) => match (opts.completion, opts.segment) {
            (Some(completion), _) => SummaryAddress::well_completion(vector, well, completion, None),
            (None, Some(segment)) => SummaryAddress::well_segment(vector, well, segment, None),
            (None, None) => SummaryAddress::well(vector, well, None),
        },
        (None, None, Some((i, j, k))) => SummaryAddress::block(vector, i, j, k, None),
        (None, None, None) => {
            if let Some(group) = &opts.group {
                SummaryAddress::group(vector, group, None)
            } else if let Some(network) = &opts.network {
                SummaryAddress::network(vector, network, None)
            } else if let Some(region) = opts.region {
                match opts.region2 {
                    Some(region2) => SummaryAddress::region_to_region(vector, region, region2, None),
                    None => SummaryAddress::region(vector, region, None),
                }
            } else if let Some(aquifer) = opts.aquifer {
                SummaryAddress::aquifer(vector, aquifer, None)
            } else {
                match identify_category(vector) {
                    Some(SummaryCategory::Misc) => SummaryAddress::misc(vector, None),
                    _ => SummaryAddress::field(vector, None),
                }
            }
        }
    };
    address.set_error_result(opts.error);
    Ok(address)
}

fn run_encode(opts: &EncodeOpts) -> Result<()> {
    let address = encode_address(opts)?;
    if !address.is_valid() {
        bail!("{:?} address for {} is missing qualifiers", address.category(), opts.vector);
    }
    println!("{}", encode(&address));
    Ok(())
}

fn run_vectors(opts: &VectorsOpts) -> Result<()> {
    let registry = ReaderRegistry::new();
    let reader = open_chain(&opts.files, &registry)?;
    for address in reader.all_addresses().iter().chain(reader.all_error_addresses()) {
        println!("{}\t{}", encode(address), reader.unit_name(address));
    }
    Ok(())
}

fn entrypoint() -> Result<()> {
    pretty_env_logger::init();
    let cli = Cli::parse();
    match &cli.mode {
        Modes::Merge(opts) => run_merge(opts),
        Modes::Decode(opts) => run_decode(opts),
        Modes::Encode(opts) => run_encode(opts),
        Modes::Vectors(opts) => run_vectors(opts),
    }
}

fn main() -> ExitCode {
    match entrypoint() {
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
        Ok(_) => ExitCode::SUCCESS,
    }
}
