//! `kickstart`: small programs exercising the UTF-8 console streams

use std::error::Error;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde::Serialize;

use kickstart_io::{
    with_errors_displayed, ConsoleOptions, StandardStream, StreamRoute, SystemConsole, Utf8Streams,
};

type Streams = Utf8Streams<SystemConsole>;
type BoxResult<T> = Result<T, Box<dyn Error>>;

#[derive(Parser)]
#[command(name = "kickstart", version, about = "UTF-8 console stream demos")]
struct Cli {
    /// JSON file with console options
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Leave the console mode untouched
    #[arg(long, global = true)]
    no_escapes: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Ask for two numbers and show their sum
    Sum,
    /// Copy input lines to output
    Echo {
        /// Prefix each line with its number
        #[arg(short, long)]
        number: bool,
    },
    /// Show how each standard stream is classified and routed
    Probe {
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    fn options(&self) -> BoxResult<ConsoleOptions> {
        let mut options = match &self.config {
            Some(path) => ConsoleOptions::load(path)?,
            None => ConsoleOptions::from_env(),
        };
        if self.no_escapes {
            options.enable_escape_sequences = false;
        }
        Ok(options)
    }
}

fn read_number(io: &Streams, prompt: &str) -> BoxResult<f64> {
    let line = io
        .input(prompt)?
        .ok_or_else(|| kickstart_io::Error::clean_exit("No more input; nothing to add."))?;
    let text = line.trim();
    text.parse::<f64>()
        .map_err(|_| format!("\"{text}\" is not a number").into())
}

fn sum(io: &Streams) -> BoxResult<()> {
    io.output(
        io.stdout(),
        "This program computes the sum of two numbers A and B like 2.72 and 3.14.\n",
    )?;
    let a = read_number(io, "Number A, please: ")?;
    let b = read_number(io, "Number B, please: ")?;
    io.output(io.stdout(), &format!("\n{a} + {b} = {}.\n", a + b))?;
    Ok(())
}

fn echo(io: &Streams, number: bool) -> BoxResult<()> {
    let mut out = io.writer(io.stdout());
    for (i, line) in io.lines(io.stdin()).enumerate() {
        let line = line?;
        if number {
            write!(out, "{:>6}  ", i + 1)?;
        }
        writeln!(out, "{line}")?;
        out.flush()?;
    }
    out.finish()?;
    Ok(())
}

#[derive(Serialize)]
struct StreamReport {
    stream: &'static str,
    handle: String,
    console: bool,
    route: &'static str,
}

fn probe(io: &Streams, json: bool) -> BoxResult<()> {
    let reports: Vec<StreamReport> = StandardStream::ALL
        .iter()
        .map(|&stream| {
            let handle = io.handle(stream);
            StreamReport {
                stream: stream.name(),
                handle: handle.to_string(),
                console: io.state().is_console(stream),
                route: match io.route_for(handle) {
                    StreamRoute::Console => "console",
                    StreamRoute::RawPassthrough => "passthrough",
                },
            }
        })
        .collect();

    if json {
        let text = serde_json::to_string_pretty(&reports)?;
        io.output(io.stdout(), &format!("{text}\n"))?;
        return Ok(());
    }
    for r in &reports {
        io.output(
            io.stdout(),
            &format!("{:<7} {:<6} console={:<5} route={}\n", r.stream, r.handle, r.console, r.route),
        )?;
    }
    Ok(())
}

fn main() -> ExitCode {
    #[cfg(feature = "logging")]
    kickstart_io::init_logging();

    let cli = Cli::parse();
    let streams = match cli.options().and_then(|options| Ok(Utf8Streams::system(options)?)) {
        Ok(streams) => streams,
        Err(err) => {
            eprintln!("!{err}");
            return ExitCode::FAILURE;
        }
    };

    with_errors_displayed(&streams, |io| match &cli.command {
        Command::Sum => sum(io),
        Command::Echo { number } => echo(io, *number),
        Command::Probe { json } => probe(io, *json),
    })
}
