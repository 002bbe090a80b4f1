//! Advent Callouts CLI
//!
//! Usage:
//!   advent-callouts [OPTIONS] [FILES]...
//!
//! Options:
//!   -c, --config <FILE>            Site configuration (TOML format)
//!   -o, --out-dir <DIR>            Write each rendered document into DIR
//!       --on-unresolved <POLICY>   error, omit or verbatim
//!       --list                     List registered components and exit
//!   -h, --help                     Print help

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::str::FromStr;

use clap::Parser;
use log::info;

use advent_callouts::{render_with_config, RenderConfig, SiteConfig, UnresolvedPolicy};

#[derive(Parser)]
#[command(name = "advent-callouts")]
#[command(about = "Resolve callout components in puzzle writeups")]
struct Cli {
    /// Input documents (reads from stdin if none are given)
    files: Vec<PathBuf>,

    /// Site configuration file (TOML format)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write each rendered document to this directory instead of stdout
    #[arg(short, long)]
    out_dir: Option<PathBuf>,

    /// What to do with unknown component tags: error, omit or verbatim
    #[arg(long, value_parser = UnresolvedPolicy::from_str)]
    on_unresolved: Option<UnresolvedPolicy>,

    /// List registered components and exit
    #[arg(long)]
    list: bool,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    // Load site configuration
    let site = match &cli.config {
        Some(path) => match SiteConfig::from_file(path) {
            Ok(site) => site,
            Err(e) => {
                eprintln!("Error loading config '{}': {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        },
        None => SiteConfig::default(),
    };

    let mut config = RenderConfig::from_site(&site);
    if let Some(policy) = cli.on_unresolved {
        config = config.with_on_unresolved(policy);
    }

    if cli.list {
        print!("{}", config.listing());
        return ExitCode::SUCCESS;
    }

    if cli.files.is_empty() {
        let mut source = String::new();
        if let Err(e) = io::stdin().read_to_string(&mut source) {
            eprintln!("Error reading from stdin: {}", e);
            return ExitCode::FAILURE;
        }
        return match render_with_config(&source, &config) {
            Ok(output) => {
                print!("{}", output);
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprint!("{}", e.format(&source, "<stdin>"));
                ExitCode::FAILURE
            }
        };
    }

    if let Some(dir) = &cli.out_dir {
        if let Err(e) = fs::create_dir_all(dir) {
            eprintln!("Error creating '{}': {}", dir.display(), e);
            return ExitCode::FAILURE;
        }
    }

    // Keep going after a failure so every broken document is reported
    let mut failed = false;
    for path in &cli.files {
        if !render_file(path, cli.out_dir.as_deref(), &config) {
            failed = true;
        }
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

/// Render one file to stdout or into `out_dir`. Returns false on failure.
fn render_file(path: &Path, out_dir: Option<&Path>, config: &RenderConfig) -> bool {
    let source = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            eprintln!("Error reading file '{}': {}", path.display(), e);
            return false;
        }
    };

    let output = match render_with_config(&source, config) {
        Ok(output) => output,
        Err(e) => {
            eprint!("{}", e.format(&source, &path.display().to_string()));
            return false;
        }
    };

    match out_dir {
        Some(dir) => {
            let Some(name) = path.file_name() else {
                eprintln!("Error: '{}' has no file name", path.display());
                return false;
            };
            let target = dir.join(name);
            info!("writing {}", target.display());
            if let Err(e) = fs::write(&target, output) {
                eprintln!("Error writing '{}': {}", target.display(), e);
                return false;
            }
        }
        None => print!("{}", output),
    }
    true
}
