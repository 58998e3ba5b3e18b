use std::{
    fs::File,
    io::{self, BufReader, BufWriter, Read, Write},
    path::PathBuf,
};

use clap::Parser;
use tracing::{info, level_filters::LevelFilter};

use transport_catalogue::{logging::init_logger, requests, RequestError};

#[derive(Parser, Debug)]
#[command(
    name = "transport-catalogue",
    version,
    about = "Answer bus, stop and route requests over a JSON-described transit network"
)]
struct Args {
    /// JSON request document, stdin when omitted
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Where to write the JSON responses, stdout when omitted
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Pretty-print the responses
    #[arg(long)]
    pretty: bool,

    /// Show debug messages unless RUST_LOG says otherwise
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<(), RequestError> {
    let args = Args::parse();

    init_logger(if args.verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    });

    let input: Box<dyn Read> = match &args.input {
        Some(path) => {
            info!(path = %path.display(), "Reading requests");
            Box::new(BufReader::new(File::open(path)?))
        }
        None => Box::new(BufReader::new(io::stdin().lock())),
    };

    let output: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    requests::process(input, output, args.pretty)
}
