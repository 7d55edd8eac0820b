mod cli;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use concept_review::ConceptStore;
use std::process;
use tracing_subscriber::EnvFilter;

fn run(cli: Cli) -> Result<()> {
    let Cli { db, command } = cli;
    let mut store = ConceptStore::open(&db)?;
    cli::execute(command, &mut store, &mut std::io::stdout().lock())
}

fn main() {
    // Logs go to stderr so command output stays clean
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(
                "concept_review=info"
                    .parse()
                    .expect("static log directive is valid"),
            ),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(Cli::parse()) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
