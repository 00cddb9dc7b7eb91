//! prioritysort: CLI tool for producing and inspecting binary match records.

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use prioritysort::{BitVectorGenerator, Error, GeneratorConfig, MatchRecord};
use std::fs;
use std::io::Write;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "prioritysort")]
#[command(version)]
#[command(about = "Generate and inspect binary rule match records", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a match record and write its binary form
    Generate {
        /// Comma-separated priority indices to flag
        #[arg(short, long, value_delimiter = ',')]
        priorities: Vec<i32>,

        /// Number of rules in the evaluated rule set
        #[arg(short, long)]
        length: i32,

        /// Record id
        #[arg(long)]
        id: i64,

        /// Unix timestamp in seconds (defaults to now)
        #[arg(long)]
        timestamp: Option<i64>,

        /// Generator configuration file (YAML or JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output file
        #[arg(short, long)]
        output: PathBuf,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Decode a binary match record and print its fields
    Decode {
        /// Input file
        #[arg(short, long)]
        input: PathBuf,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Generate {
            priorities,
            length,
            id,
            timestamp,
            config,
            output,
            verbose,
        } => generate_record(&priorities, length, id, timestamp, config, &output, verbose),
        Commands::Decode { input, json } => decode_record(&input, json),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(exit_code(e.as_ref()));
    }
}

/// Exit with 2 for bad input, 1 for everything else.
fn exit_code(err: &(dyn std::error::Error + 'static)) -> i32 {
    match err.downcast_ref::<Error>() {
        Some(e) if e.is_caller_error() => 2,
        _ => 1,
    }
}

fn generate_record(
    priorities: &[i32],
    length: i32,
    id: i64,
    timestamp: Option<i64>,
    config: Option<PathBuf>,
    output: &PathBuf,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = match config {
        Some(path) => GeneratorConfig::load(path)?,
        None => GeneratorConfig::default(),
    };
    let generator = BitVectorGenerator::with_config(config)?;

    let matched = generator.generate(priorities, length)?;
    let timestamp = match timestamp {
        Some(secs) => DateTime::<Utc>::from_timestamp(secs, 0)
            .ok_or_else(|| format!("timestamp {} is out of range", secs))?,
        None => Utc::now(),
    };

    if verbose {
        println!(
            "Generated {} bit vector with {} bits set",
            matched.capacity(),
            matched.cardinality()
        );
    }

    let record = MatchRecord::new(matched, timestamp, id);
    let bytes = record.to_bytes();

    if verbose {
        println!("Writing output file: {:?} ({} bytes)", output, bytes.len());
    }

    let mut file = fs::File::create(output)?;
    file.write_all(&bytes)?;

    println!("Successfully wrote record {} -> {:?}", id, output);
    Ok(())
}

fn decode_record(input: &PathBuf, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let bytes = fs::read(input)?;
    let record = MatchRecord::from_bytes(&bytes)?;
    let set_bits: Vec<usize> = record.matched().iter_ones().collect();

    if json {
        let value = serde_json::json!({
            "id": record.id(),
            "timestamp": record.timestamp().to_rfc3339(),
            "capacity": record.matched().capacity(),
            "set_bits": set_bits,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        println!("id:        {}", record.id());
        println!("timestamp: {}", record.timestamp().to_rfc3339());
        println!("capacity:  {}", record.matched().capacity());
        println!("set bits:  {:?}", set_bits);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code() {
        let bad_input: Box<dyn std::error::Error> =
            Box::new(Error::InvalidArgument("priority 9 is outside 0..8".into()));
        assert_eq!(exit_code(bad_input.as_ref()), 2);

        let missing: Box<dyn std::error::Error> = Box::new(Error::NullInput("bytes"));
        assert_eq!(exit_code(missing.as_ref()), 2);

        let internal: Box<dyn std::error::Error> =
            Box::new(Error::InternalFailure("allocation failed".into()));
        assert_eq!(exit_code(internal.as_ref()), 1);

        let io: Box<dyn std::error::Error> =
            Box::new(std::io::Error::new(std::io::ErrorKind::NotFound, "missing"));
        assert_eq!(exit_code(io.as_ref()), 1);
    }
}
