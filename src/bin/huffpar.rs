use std::path::PathBuf;
use std::process::ExitCode;

use huffpar::report::{append_csv, print_timings};
use huffpar::{compress_file, Backend, Error, InputMode, PipelineConfig};

const USAGE: &str = "usage: huffpar <input> <output> [workers] \
[--backend seq|threads|pool] [--strip-newlines] [--csv <path>] [-v]";

const DEFAULT_WORKERS: isize = 4;

struct Args {
    input: PathBuf,
    output: PathBuf,
    workers: isize,
    backend: Backend,
    mode: InputMode,
    csv: Option<PathBuf>,
    verbose: bool,
}

fn parse_args() -> Result<Args, String> {
    let mut positional = Vec::new();
    let mut backend = Backend::Threads;
    let mut mode = InputMode::Verbatim;
    let mut csv = None;
    let mut verbose = false;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-v" | "--verbose" => verbose = true,
            "--strip-newlines" => mode = InputMode::StripLineTerminators,
            "--backend" => {
                let name = args.next().ok_or("--backend needs a value")?;
                backend = name.parse()?;
            }
            "--csv" => csv = Some(PathBuf::from(args.next().ok_or("--csv needs a path")?)),
            "-h" | "--help" => return Err(USAGE.to_string()),
            _ => positional.push(arg),
        }
    }

    let mut positional = positional.into_iter();
    let input = positional.next().ok_or(USAGE)?;
    let output = positional.next().ok_or(USAGE)?;
    let workers = match positional.next() {
        Some(n) => n.parse().map_err(|_| format!("invalid worker count: {n}"))?,
        None => DEFAULT_WORKERS,
    };

    Ok(Args {
        input: input.into(),
        output: output.into(),
        workers,
        backend,
        mode,
        csv,
        verbose,
    })
}

fn run(args: &Args) -> Result<(), Error> {
    let config = PipelineConfig::from_signed(args.backend, args.workers)?;

    let report = compress_file(&args.input, &args.output, &config, args.mode)?;

    if args.verbose {
        print_timings(&mut std::io::stdout().lock(), &report)?;
    }
    if let Some(path) = &args.csv {
        append_csv(path, config.workers, &report)?;
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = match parse_args() {
        Ok(args) => args,
        Err(msg) => {
            eprintln!("{msg}");
            return ExitCode::from(2);
        }
    };

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("huffpar: {e}");
            ExitCode::FAILURE
        }
    }
}
