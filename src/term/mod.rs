/*!
## Rust Terminal Module

Command line driver for the virtual machine. Program output goes to
stdout; diagnostics and log records go to stderr.

*/

extern crate ansi_term;
extern crate ctrlc;
use crate::error;
use crate::lang::{Error, Level, Location};
use crate::mach::{Event, Runtime};
use ansi_term::Style;
use clap::Parser;
use log::{LevelFilter, Metadata, Record};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "tac")]
#[command(about = "Runs a typed three-address code program")]
#[command(version)]
pub struct Cli {
    /// Program source
    file: PathBuf,

    /// Report parsing, compiling and running
    #[arg(short, long)]
    verbose: bool,

    /// Cancel --verbose
    #[arg(short, long)]
    brief: bool,

    /// Dump the symbol table and code before running
    #[arg(short, long)]
    debug: bool,

    /// Print each instruction as it executes
    #[arg(short, long)]
    step: bool,

    /// Seed for the rand instruction
    #[arg(long)]
    seed: Option<u64>,
}

impl Cli {
    fn log_level(&self) -> LevelFilter {
        if self.step {
            LevelFilter::Trace
        } else if self.debug {
            LevelFilter::Debug
        } else if self.verbose && !self.brief {
            LevelFilter::Info
        } else {
            LevelFilter::Warn
        }
    }
}

struct Logger;

static LOGGER: Logger = Logger;

impl log::Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        match record.level() {
            log::Level::Info => {
                let info = Error::info(&record.args().to_string());
                eprintln!("{}", Style::new().dimmed().paint(info.to_string()));
            }
            _ => eprintln!("{}", record.args()),
        }
    }

    fn flush(&self) {}
}

pub fn main() {
    let cli = Cli::parse();
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(cli.log_level());
    }
    let interrupted = Arc::new(AtomicBool::new(false));
    let int_moved = interrupted.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        int_moved.store(true, Ordering::SeqCst);
    }) {
        report(&error!(InternalError; &e.to_string()));
    }
    let status = match main_loop(&cli, interrupted) {
        Ok(true) => 0,
        Ok(false) => 1,
        Err(e) => {
            report(&error!(InternalError; &e.to_string()));
            1
        }
    };
    std::process::exit(status);
}

/// Runs the program to completion. False if any error was reported.
fn main_loop(cli: &Cli, interrupted: Arc<AtomicBool>) -> std::io::Result<bool> {
    let file = cli.file.to_string_lossy().to_string();
    let source = match std::fs::read_to_string(&cli.file) {
        Ok(source) => source,
        Err(e) => {
            let location = Location::new(&Rc::from(file.as_str()), 0, 0);
            report(&error!(FileNotFound, Some(&location); &e.to_string()));
            return Ok(false);
        }
    };

    let mut runtime = Runtime::default();
    if let Some(seed) = cli.seed {
        runtime.seed(seed);
    }
    runtime.load(&file, &source);

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let mut success = true;
    loop {
        if interrupted.swap(false, Ordering::SeqCst) {
            runtime.interrupt();
        }
        match runtime.execute(5000) {
            Event::Stopped => break,
            Event::Running => {}
            Event::Print(s) => out.write_all(&s)?,
            Event::Input => {
                out.flush()?;
                let mut line = String::new();
                if stdin.lock().read_line(&mut line)? == 0 {
                    runtime.close_input();
                } else {
                    runtime.enter(line.trim_end_matches(&['\n', '\r'][..]));
                }
            }
            Event::Warning(warning) => {
                out.flush()?;
                report(&warning);
            }
            Event::Errors(errors) => {
                out.flush()?;
                success = false;
                for error in errors.iter() {
                    report(error);
                }
            }
        }
    }
    out.flush()?;
    Ok(success)
}

fn report(error: &Error) {
    match error.level() {
        Level::Error => eprintln!("{}", Style::new().bold().paint(error.to_string())),
        _ => eprintln!("{}", error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_levels() {
        let cli = Cli::parse_from(vec!["tac", "prog.tac"]);
        assert_eq!(cli.log_level(), LevelFilter::Warn);
        let cli = Cli::parse_from(vec!["tac", "-v", "prog.tac"]);
        assert_eq!(cli.log_level(), LevelFilter::Info);
        let cli = Cli::parse_from(vec!["tac", "-v", "-b", "prog.tac"]);
        assert_eq!(cli.log_level(), LevelFilter::Warn);
        let cli = Cli::parse_from(vec!["tac", "-d", "prog.tac"]);
        assert_eq!(cli.log_level(), LevelFilter::Debug);
        let cli = Cli::parse_from(vec!["tac", "-s", "--seed", "3", "prog.tac"]);
        assert_eq!(cli.log_level(), LevelFilter::Trace);
        assert_eq!(cli.seed, Some(3));
    }
}
