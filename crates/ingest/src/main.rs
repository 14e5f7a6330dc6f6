use clap::Parser;
use tron_ingest::cli::Cli;


fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    init_tracing(&args);

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(tron_ingest::run(args))
}


fn init_tracing(args: &Cli) {
    use std::io::IsTerminal;

    let env_filter = tracing_subscriber::EnvFilter::builder().parse_lossy(args.log_filter());

    if std::io::stdout().is_terminal() && !args.json_log {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .compact()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .json()
            .with_current_span(false)
            .init();
    }
}
