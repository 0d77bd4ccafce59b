use std::io;

use clap::Parser;
use gh_branch_protection::{cli::Cli, run};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Initialize logging; stdout is reserved for command output
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(
            EnvFilter::try_from_env("GH_BRANCH_PROTECTION_LOG")
                .unwrap_or_else(|_| EnvFilter::new("error")),
        )
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            std::process::exit(code);
        }
    };

    let mut stdin = io::stdin().lock();
    let mut stdout = io::stdout().lock();
    if let Err(e) = run(&cli, &mut stdin, &mut stdout).await {
        eprintln!("{e}");
        std::process::exit(1);
    }
}
