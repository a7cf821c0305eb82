//! Stomp Arena - headless game client
//!
//! Runs either a local match against the bot, or a host and a joiner in the
//! same process connected through the loopback relay.

use std::sync::Arc;
use std::time::Duration;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use stomp_arena::app::{self, GameController, GameHandle};
use stomp_arena::config::{Config, GameMode};
use stomp_arena::game::physics::{ARENA_HEIGHT, ARENA_WIDTH};
use stomp_arena::game::Team;
use stomp_arena::net::{LoopbackRelay, SessionId};
use stomp_arena::render::HeadlessRenderer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;
    init_tracing(&config.log_level);

    let clock = config.frame_clock();
    info!(mode = ?config.mode, ?clock, "Starting Stomp Arena");

    let relay = Arc::new(LoopbackRelay::new());
    let new_controller = || {
        GameController::new(
            config.game_settings(),
            relay.clone(),
            Box::new(HeadlessRenderer::default()),
        )
    };

    let mut handles: Vec<GameHandle> = Vec::new();
    let mut tasks = Vec::new();

    match config.mode {
        GameMode::Local => {
            let (handle, task) = app::spawn(new_controller(), clock);
            handle.start_local().await?;
            handles.push(handle);
            tasks.push(task);
        }
        GameMode::Duel => {
            let (host, host_task) = app::spawn(new_controller(), clock);
            let (joiner, joiner_task) = app::spawn(new_controller(), clock);

            let id = host.start_as_host().await?;
            // The joiner finds the session the way a shared link would
            let joined = SessionId::from_location_path(&id.location_path())?;
            joiner.start_as_joiner(joined).await?;

            handles.push(host);
            handles.push(joiner);
            tasks.push(host_task);
            tasks.push(joiner_task);
        }
    }

    let run_for = config.run_seconds.map(Duration::from_secs);
    tokio::select! {
        _ = report_loop(&handles, config.rng_seed) => {}
        _ = run_limit(run_for) => {
            info!("Run time elapsed, stopping");
        }
        _ = shutdown_signal() => {}
    }

    for handle in &handles {
        let _ = handle.shutdown().await;
    }
    for task in tasks {
        task.await?;
    }

    info!("Shutdown complete");
    Ok(())
}

/// Initialize tracing/logging
fn init_tracing(log_level: &str) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}

/// Log the score once a second; the last handle also throws debris
async fn report_loop(handles: &[GameHandle], seed: Option<u64>) {
    let mut rng = match seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };
    let mut every_second = tokio::time::interval(Duration::from_secs(1));

    loop {
        every_second.tick().await;

        if let Some(thrower) = handles.last() {
            let x = rng.gen_range(0.0..ARENA_WIDTH);
            let y = rng.gen_range(0.0..ARENA_HEIGHT / 2.0);
            if thrower.click(x, y).await.is_err() {
                return;
            }
        }

        for handle in handles {
            let status = handle.status();
            info!(
                mode = ?status.mode,
                session_id = ?status.session_id,
                tick = status.tick,
                bodies = status.bodies,
                blue = status.score.get(Team::Blue),
                gold = status.score.get(Team::Gold),
                "Status"
            );
        }
    }
}

async fn run_limit(limit: Option<Duration>) {
    match limit {
        Some(limit) => tokio::time::sleep(limit).await,
        None => std::future::pending::<()>().await,
    }
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown");
        }
        _ = terminate => {
            info!("Received terminate signal, starting graceful shutdown");
        }
    }
}
