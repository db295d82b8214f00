//! Computes the distinct intersection points of a set of segments.
//!
//! Reads segments from a `;` separated CSV file with a header row and
//! one `x1;y1;x2;y2` record per segment. Each field is either the 64
//! character binary string of the IEEE-754 bits of the value, or a
//! decimal number. Without an input file a small built-in sample is
//! used.
//!
//! Prints three lines: the number of distinct intersection points,
//! the time spent noding in milliseconds, and the change of the
//! resident set size in bytes across noding. With `--all` every point
//! is printed instead, as a `p_x;p_y` record of binary strings.
use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
    time::Instant,
};

use anyhow::{bail, Context};
use clap::Parser;
use csv::ReaderBuilder;
use geo::{Coordinate, Line};
use log::{debug, info};
use psutil::process::Process;

use geo_noding::{IntersectionCollector, McIndexNoder, Noder, SegmentString, SimpleNoder};

#[derive(Parser, Debug)]
#[command(about = "Compute the distinct intersection points of line segments")]
struct Cli {
    /// CSV file of segments; the built-in sample is used if missing.
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Print every intersection point instead of the count.
    #[arg(short, long)]
    all: bool,

    /// Test all pairs of segments instead of using the index.
    #[arg(long)]
    brute: bool,
}

fn sample() -> Vec<Line<f64>> {
    vec![
        Line::from([(0., 0.), (5., 5.)]),
        Line::from([(0., 5.), (5., 0.)]),
        Line::from([(2., 0.), (2., 5.)]),
        Line::from([(0., 3.), (5., 3.)]),
    ]
}

/// Parse a CSV field: 64 binary digits are the bits of the value,
/// anything else must be a decimal number.
fn parse_field(field: &str) -> anyhow::Result<f64> {
    let field = field.trim();
    if field.len() == 64 && field.bytes().all(|b| b == b'0' || b == b'1') {
        let bits = u64::from_str_radix(field, 2)?;
        return Ok(f64::from_bits(bits));
    }
    field
        .parse()
        .with_context(|| format!("invalid coordinate {field:?}"))
}

fn load_csv(path: &Path) -> anyhow::Result<Vec<Line<f64>>> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .delimiter(b';')
        .from_reader(BufReader::new(file));

    let mut lines = vec![];
    for (idx, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("reading record {idx}"))?;
        if record.len() < 4 {
            bail!("record {idx} has {} fields, expected 4", record.len());
        }
        let mut values = [0.; 4];
        for (value, field) in values.iter_mut().zip(record.iter()) {
            *value = parse_field(field).with_context(|| format!("in record {idx}"))?;
        }
        lines.push(Line::new(
            Coordinate {
                x: values[0],
                y: values[1],
            },
            Coordinate {
                x: values[2],
                y: values[3],
            },
        ));
    }
    Ok(lines)
}

/// Resident set size of this process, in bytes.
fn resident_memory() -> anyhow::Result<u64> {
    let process = Process::new(std::process::id()).context("inspecting own process")?;
    let info = process.memory_info().context("reading memory info")?;
    Ok(info.rss())
}

fn float_to_binary(f: f64) -> String {
    format!("{:064b}", f.to_bits())
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let lines = match &cli.file {
        Some(path) => load_csv(path)?,
        None => sample(),
    };
    info!("loaded {n} segments", n = lines.len());
    let strings: Vec<SegmentString<f64>> = lines.into_iter().map(SegmentString::from).collect();

    let mut collector = IntersectionCollector::new();
    let initial_memory = resident_memory()?;
    let start = Instant::now();
    let result = if cli.brute {
        SimpleNoder.compute_nodes(&strings, &mut collector)
    } else {
        McIndexNoder::new().compute_nodes(&strings, &mut collector)
    };
    let stats = result.context("noding failed")?;
    let elapsed = start.elapsed();
    let final_memory = resident_memory()?;
    debug!("{stats}");

    if cli.all {
        println!("p_x;p_y");
        for pt in collector.iter() {
            println!("{};{}", float_to_binary(pt.x), float_to_binary(pt.y));
        }
    } else {
        println!("{}", collector.len());
        println!("{}", elapsed.as_millis());
        println!("{}", final_memory as i64 - initial_memory as i64);
    }
    Ok(())
}
