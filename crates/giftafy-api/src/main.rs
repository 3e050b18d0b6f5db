//! Giftafy CLI and HTTP server entry point.
//!
//! Binary name: `giftafy`
//!
//! Parses CLI arguments, loads configuration and the catalog, then
//! dispatches to the appropriate command handler or starts the HTTP server.

mod cli;
mod http;
mod state;

use clap::Parser;
use clap_complete::generate;

use cli::{AccountCommand, Cli, Commands};
use giftafy_observe::tracing_setup::{init_tracing, shutdown_tracing};
use state::{AppState, ClientContext};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up tracing based on verbosity
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info,giftafy=debug",
        _ => "trace",
    };
    init_tracing(filter, cli.otel).map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    let result = run(cli).await;
    shutdown_tracing();
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    // Shell completions don't need config or the catalog
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "giftafy", &mut std::io::stdout());
        return Ok(());
    }

    let ctx = ClientContext::load().await?;

    match cli.command {
        Commands::Find(args) => {
            cli::find::run(&ctx, args, cli.json).await?;
        }

        Commands::Catalog => {
            cli::catalog::list_catalog(&ctx, cli.json)?;
        }

        Commands::Account { action } => {
            let state = AppState::open(ctx).await?;
            match action {
                AccountCommand::Create { email, password } => {
                    cli::account::create_account(&state, email, password, cli.json).await?;
                }
                AccountCommand::Tier { email, tier } => {
                    cli::account::set_tier(&state, &email, tier, cli.json).await?;
                }
                AccountCommand::Login { email, password } => {
                    cli::account::login(&state, email, password, cli.json).await?;
                }
            }
        }

        Commands::Serve { port, host } => {
            let host = host.unwrap_or_else(|| ctx.config.server.host.clone());
            let port = port.unwrap_or(ctx.config.server.port);
            let state = AppState::open(ctx).await?;

            let pruned = state.account_service.prune_sessions().await?;
            if pruned > 0 {
                tracing::info!(pruned, "removed expired sessions");
            }

            let addr = format!("{host}:{port}");
            let listener = tokio::net::TcpListener::bind(&addr).await?;

            println!(
                "  {} Giftafy listening on {}",
                console::style("🎁").bold(),
                console::style(format!("http://{addr}")).cyan()
            );
            println!("  {}", console::style("Press Ctrl+C to stop").dim());

            let router = http::router::build_router(state);

            axum::serve(listener, router)
                .with_graceful_shutdown(shutdown_signal())
                .await?;

            println!("\n  Server stopped.");
        }

        Commands::Completions { .. } => unreachable!("handled above"),
    }

    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received");
}
