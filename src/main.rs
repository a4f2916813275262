mod error;
mod parser;
mod serialiser;
mod shift;
mod srt;
mod timestamp;

use crate::parser::Parser;
use crate::shift::Shifter;

use std::io::{self, Read};

use anyhow::{Context, Result};
use clap::Parser as ClapParser;

fn main() {
    match run() {
        Ok(()) => (),
        Err(err) => {
            eprintln!("An error occurred: {}", err);
            for cause in err.chain().skip(1) {
                eprintln!("    {}", cause);
            }
            std::process::exit(1);
        }
    }
}

#[derive(ClapParser)]
#[command(about = "Re-time SRT subtitles along a piecewise-linear shift curve")]
struct Cli {
    #[arg(
        value_name = "SPEC",
        required = true,
        help = "An anchor of the form <position><+|-><seconds>, where <position> is @ \
                (the start of the track) or a timestamp like 1:23:45 or 1:23:45.500. \
                Example: '@+0 1:00:00-4' starts unshifted and eases to -4s at one hour."
    )]
    specs: Vec<String>,
    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "The file to read from. If not supplied, the subtitles will be read from standard input.",
        default_value = "-"
    )]
    input: String,
    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "The file to write to. If not supplied, the subtitles will be written to standard output.",
        default_value = "-"
    )]
    output: String,
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let data = if cli.input == "-" {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read from stdin")?;
        buffer
    } else {
        std::fs::read_to_string(&cli.input)
            .context(format!("Failed to open input file: '{}'", cli.input))?
    };

    let subs = Parser::new().parse(&data);

    let shifter = Shifter::from_specs(&cli.specs, srt::latest_timestamp(&subs))?;
    let subs = subs.into_iter().map(|sub| shifter.apply(sub)).collect();

    if cli.output == "-" {
        serialiser::serialise(subs, io::stdout())?;
    } else {
        let dst = std::fs::File::create(&cli.output)
            .context(format!("Failed to create output file: '{}'", cli.output))?;
        serialiser::serialise(subs, dst)?;
    }

    Ok(())
}
