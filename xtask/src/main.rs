use std::process::Command;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "xtask", about = "Workspace automation for folio")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// fmt, clippy, tests and docs, stopping at the first failure
    Check,
    /// cargo fmt --check
    Fmt,
    /// clippy with warnings denied
    Clippy,
    /// Tests for every crate
    Test,
    /// rustdoc for the workspace
    Doc,
    /// Build every crate and app
    Build,
    /// Validate the default asset manifest against a local asset directory
    Assets {
        #[arg(long, default_value = "./static")]
        asset_base: String,
    },
}

/// One cargo invocation.
struct Step {
    label: &'static str,
    args: Vec<String>,
}

impl Step {
    fn new(label: &'static str, args: &[&str]) -> Self {
        Self {
            label,
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }

    fn run(&self) -> Result<()> {
        println!("==> {}: cargo {}", self.label, self.args.join(" "));
        let status = Command::new("cargo").args(&self.args).status()?;
        if !status.success() {
            anyhow::bail!("{} failed ({status})", self.label);
        }
        Ok(())
    }
}

fn fmt() -> Step {
    Step::new("fmt", &["fmt", "--all", "--", "--check"])
}

fn clippy() -> Step {
    Step::new(
        "clippy",
        &["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"],
    )
}

fn test() -> Step {
    Step::new("test", &["test", "--workspace"])
}

fn doc() -> Step {
    Step::new("doc", &["doc", "--workspace", "--no-deps"])
}

fn steps(command: Commands) -> Vec<Step> {
    match command {
        Commands::Check => vec![fmt(), clippy(), test(), doc()],
        Commands::Fmt => vec![fmt()],
        Commands::Clippy => vec![clippy()],
        Commands::Test => vec![test()],
        Commands::Doc => vec![doc()],
        Commands::Build => vec![Step::new("build", &["build", "--workspace"])],
        Commands::Assets { asset_base } => vec![Step::new(
            "assets",
            &["run", "-p", "folio-cli", "--", "validate", "--asset-base", asset_base.as_str()],
        )],
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    for step in steps(cli.command) {
        step.run()?;
    }
    Ok(())
}
