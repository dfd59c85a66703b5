//! Operator daemon that converges TodoApp custom resources.
use anyhow::Result;
use clap::Parser;
use tracing::{info, warn};

use todo_operator::{app, telemetry};

/// Run the todo operator daemon.
#[derive(Parser, Debug)]
#[command(name = "todo-operator", author, version, about, long_about = None)]
struct Cli {
    /// Absolute path to a kubeconfig file for running out of cluster.
    ///
    /// Reserved; credentials are currently always discovered from the
    /// ambient execution environment.
    #[arg(long, env = "KUBECONFIG_PATH")]
    kubeconfig: Option<std::path::PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    telemetry::init()?;

    if cli.kubeconfig.is_some() {
        warn!("--kubeconfig is declared but unused, using ambient credential discovery");
    }

    info!("starting todo-operator");
    app::run().await
}
