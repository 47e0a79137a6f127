use std::io;

use anyhow::Result;
use clap::Parser;

use cut_release::config;
use cut_release::shell::SystemShell;
use cut_release::ui::formatter;
use cut_release::workflow::{Outcome, ReleaseWorkflow};

#[derive(clap::Parser)]
#[command(
    name = "cut-release",
    about = "Interactively cut a release: choose the next version, stage it locally, and generate push/abort scripts"
)]
struct Args {
    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(short, long, help = "Print version information")]
    version: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.version {
        println!("cut-release {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let config = match config::load_config(args.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            std::process::exit(1);
        }
    };

    let shell = SystemShell;
    let dir = std::env::current_dir()?;
    let mut workflow = match ReleaseWorkflow::new(&shell, &config, dir) {
        Ok(workflow) => workflow,
        Err(e) => {
            eprintln!("{}", formatter::error_line(&e.to_string()));
            std::process::exit(1);
        }
    };

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut out = io::stdout();

    match workflow.run(&mut input, &mut out)? {
        Outcome::Success => Ok(()),
        Outcome::PreconditionFailed | Outcome::Cancelled => std::process::exit(1),
    }
}
