// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context};
use capstan_admission::{AdmissionError, AdmissionRegistry, Operation};
use capstan_config_toml::{Config, LogLevel};
use capstan_conversion::ConversionRegistry;
use capstan_types::SchemaVersion;
use clap::{Parser, Subcommand};
use serde_json::Value;
use slog::{o, Drain, Level, Logger};

#[derive(Debug, Parser)]
#[clap(about, version)]
/// A commandline client to convert and admit versioned OpenStack resources
struct Opt {
    /// Engine configuration (TOML)
    #[clap(short, long, action)]
    config: Option<PathBuf>,

    /// Enable debugging
    #[clap(short, long, action)]
    debug: bool,

    #[clap(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Convert an object or list to another schema version
    Convert {
        /// JSON input file, or `-` for stdin
        #[clap(default_value = "-")]
        file: PathBuf,

        /// Target schema version (e.g. v1alpha6)
        #[clap(short, long, action)]
        to: SchemaVersion,
    },

    /// Apply admission defaults to an object
    Default {
        /// JSON input file, or `-` for stdin
        #[clap(default_value = "-")]
        file: PathBuf,
    },

    /// Default (except on delete) and validate an object
    Validate {
        /// JSON input file, or `-` for stdin
        #[clap(default_value = "-")]
        file: PathBuf,

        /// The operation being attempted
        #[clap(short, long, action, default_value = "create")]
        operation: Operation,

        /// The currently stored object, required for updates
        #[clap(long, action)]
        old: Option<PathBuf>,
    },
}

fn log_level(opt: &Opt, config: &Config) -> Level {
    if opt.debug {
        return Level::Debug;
    }
    match config.log.level {
        LogLevel::Critical => Level::Critical,
        LogLevel::Error => Level::Error,
        LogLevel::Warning => Level::Warning,
        LogLevel::Info => Level::Info,
        LogLevel::Debug => Level::Debug,
        LogLevel::Trace => Level::Trace,
    }
}

fn create_logger(level: Level) -> Logger {
    let decorator = slog_term::TermDecorator::new().stderr().build();
    let drain = slog_term::FullFormat::new(decorator).build().fuse();
    let drain = slog::LevelFilter(drain, level).fuse();
    let drain = slog_async::Async::new(drain).build().fuse();
    Logger::root(drain, o!())
}

fn read_object(path: &Path) -> anyhow::Result<Value> {
    let mut contents = String::new();
    if path == Path::new("-") {
        std::io::stdin()
            .read_to_string(&mut contents)
            .context("failed to read stdin")?;
    } else {
        let file = File::open(path).with_context(|| {
            anyhow!("failed to open {}", path.display())
        })?;
        BufReader::new(file).read_to_string(&mut contents).with_context(
            || anyhow!("failed to read {}", path.display()),
        )?;
    }
    serde_json::from_str(&contents)
        .with_context(|| anyhow!("{} is not valid JSON", path.display()))
}

fn print_object(object: &Value) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(object)?;
    println!("{out}");
    Ok(())
}

fn convert(
    log: &Logger,
    config: &Config,
    file: &Path,
    to: SchemaVersion,
) -> anyhow::Result<()> {
    let registry = ConversionRegistry::from_config(&config.conversion);
    let object = read_object(file)?;
    let converted = registry
        .convert(log, object, to)
        .with_context(|| anyhow!("failed to convert to {to}"))?;
    print_object(&converted)
}

fn default(log: &Logger, config: &Config, file: &Path) -> anyhow::Result<()> {
    let registry = AdmissionRegistry::from_config(&config.conversion);
    let mut object = read_object(file)?;
    registry
        .mutate(log, &mut object)
        .context("failed to apply defaults")?;
    print_object(&object)
}

/// Returns `false` if the object was rejected.
fn validate(
    log: &Logger,
    config: &Config,
    file: &Path,
    op: Operation,
    old: Option<&Path>,
) -> anyhow::Result<bool> {
    let registry = AdmissionRegistry::from_config(&config.conversion);
    let object = read_object(file)?;
    let old = old.map(read_object).transpose()?;

    match registry.review(log, op, object, old.as_ref()) {
        Ok(admitted) => {
            print_object(&admitted)?;
            Ok(true)
        }
        Err(AdmissionError::Rejected(errors)) => {
            for e in errors.errors() {
                eprintln!("{e}");
            }
            Ok(false)
        }
        Err(e) => Err(e).context("failed to review object"),
    }
}

fn main() -> anyhow::Result<()> {
    let opt = Opt::parse();

    let config = match &opt.config {
        Some(path) => capstan_config_toml::parse(path).with_context(|| {
            anyhow!("failed to load config {}", path.display())
        })?,
        None => Config::default(),
    };
    let log = create_logger(log_level(&opt, &config));

    match opt.cmd {
        Command::Convert { file, to } => convert(&log, &config, &file, to)?,
        Command::Default { file } => default(&log, &config, &file)?,
        Command::Validate { file, operation, old } => {
            if !validate(&log, &config, &file, operation, old.as_deref())? {
                // Flush the async drain before exiting.
                drop(log);
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
