use crate::cli::Cli;
use crate::poller::Poller;
use anyhow::Context;
use std::sync::Arc;
use tracing::{error, info};
use tron_data_client::NodeClient;
use tron_storage::{DBRef, Database};


pub async fn run(args: Cli) -> anyhow::Result<()> {
    let db = Database::open(&args.database)?;
    db.init_schema().context("failed to initialize database schema")?;
    let db: DBRef = Arc::new(db);

    let counts = db.table_counts()?;
    let last_block = db.get_last_block()?;
    info!(
        database = %args.database.display(),
        blocks = counts.blocks,
        transactions = counts.transactions,
        contracts = counts.contracts,
        last_block = last_block.map(|b| b.block_number),
        "database is ready"
    );

    let client = NodeClient::from_url(&args.node_url)?;

    info!(
        url = %client.url(),
        interval_secs = args.poll_interval_secs,
        "start polling"
    );

    let stats = Poller::new(client, db, args.poll_interval())
        .with_max_ticks(args.ticks)
        .run(shutdown_signal())
        .await;

    info!(
        succeeded = stats.succeeded,
        failed = stats.failed,
        "polling stopped"
    );

    Ok(())
}


async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(error = ?err, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            },
            Err(err) => {
                error!(error = ?err, "failed to install signal handler");
                std::future::pending::<()>().await
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
