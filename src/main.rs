//! arcpack - compress and extract archives with format auto-detection

use std::process;
use std::time::Duration;

use anyhow::Result;
use clap::error::ErrorKind;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};

mod cli;
use cli::{Cli, Commands};

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let code = match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                _ => 1,
            };
            let _ = err.print();
            process::exit(code);
        }
    };

    if let Err(err) = run(cli) {
        eprintln!("error: {err:#}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Pack { output, source } => {
            let spinner = spinner(format!("packing {}", source.display()));
            let result = arcpack_core::pack(&output, &source);
            spinner.finish_and_clear();
            result?;
            println!("packed into: {}", output.display());
        }

        Commands::Unpack { archive } => {
            let spinner = spinner(format!("unpacking {}", archive.display()));
            let result = arcpack_core::unpack(&archive);
            spinner.finish_and_clear();
            let dest = result?;
            println!("unpacked into: {}", dest.display());
        }
    }

    Ok(())
}

fn spinner(message: String) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}
