//! Async driver: frame clock + command channel around the controller

use std::sync::Arc;

use parking_lot::RwLock;
use serde::Serialize;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::game::body::Actions;
use crate::game::context::MatchMode;
use crate::game::scheduler::LoopState;
use crate::game::score::Score;
use crate::net::address::SessionId;
use crate::net::transport::TransportError;
use crate::util::time::FrameClock;

use super::controller::GameController;

/// Requests the driver forwards to the controller between frames
#[derive(Debug)]
pub enum Command {
    StartLocal,
    StartHost {
        reply: oneshot::Sender<Result<SessionId, TransportError>>,
    },
    StartJoin {
        id: SessionId,
        reply: oneshot::Sender<Result<(), TransportError>>,
    },
    Pause,
    Resume,
    TogglePause,
    Terminate,
    Actions(Actions),
    Click { x: f32, y: f32 },
    Shutdown,
}

/// Snapshot of the controller published after every frame or command
#[derive(Debug, Clone, Default, Serialize)]
pub struct GameStatus {
    pub mode: MatchMode,
    pub loop_state: LoopState,
    pub tick: u64,
    pub bodies: usize,
    pub score: Score,
    pub session_id: Option<u16>,
    pub pause_enabled: bool,
}

/// Driver errors
#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    #[error("game driver has stopped")]
    Stopped,

    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Cloneable handle to a running driver
#[derive(Clone)]
pub struct GameHandle {
    tx: mpsc::Sender<Command>,
    status: Arc<RwLock<GameStatus>>,
}

impl GameHandle {
    pub fn status(&self) -> GameStatus {
        self.status.read().clone()
    }

    async fn send(&self, command: Command) -> Result<(), DriverError> {
        self.tx.send(command).await.map_err(|_| DriverError::Stopped)
    }

    pub async fn start_local(&self) -> Result<(), DriverError> {
        self.send(Command::StartLocal).await
    }

    pub async fn start_as_host(&self) -> Result<SessionId, DriverError> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::StartHost { reply }).await?;
        Ok(rx.await.map_err(|_| DriverError::Stopped)??)
    }

    pub async fn start_as_joiner(&self, id: SessionId) -> Result<(), DriverError> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::StartJoin { id, reply }).await?;
        Ok(rx.await.map_err(|_| DriverError::Stopped)??)
    }

    pub async fn pause(&self) -> Result<(), DriverError> {
        self.send(Command::Pause).await
    }

    pub async fn resume(&self) -> Result<(), DriverError> {
        self.send(Command::Resume).await
    }

    pub async fn toggle_pause(&self) -> Result<(), DriverError> {
        self.send(Command::TogglePause).await
    }

    pub async fn terminate(&self) -> Result<(), DriverError> {
        self.send(Command::Terminate).await
    }

    pub async fn set_actions(&self, actions: Actions) -> Result<(), DriverError> {
        self.send(Command::Actions(actions)).await
    }

    pub async fn click(&self, x: f32, y: f32) -> Result<(), DriverError> {
        self.send(Command::Click { x, y }).await
    }

    pub async fn shutdown(&self) -> Result<(), DriverError> {
        self.send(Command::Shutdown).await
    }
}

/// Spawn the driver task for `controller` on the current runtime
pub fn spawn(controller: GameController, clock: FrameClock) -> (GameHandle, JoinHandle<()>) {
    let (tx, rx) = mpsc::channel(64);
    let status = Arc::new(RwLock::new(GameStatus::default()));

    let handle = GameHandle {
        tx,
        status: status.clone(),
    };
    let task = tokio::spawn(run(controller, clock, rx, status));
    (handle, task)
}

/// Drive the controller until shutdown or every handle is dropped.
///
/// The clock is only polled while the loop is scheduled, so a pause
/// cancels the pending tick and nothing else.
pub async fn run(
    mut controller: GameController,
    clock: FrameClock,
    mut rx: mpsc::Receiver<Command>,
    status: Arc<RwLock<GameStatus>>,
) {
    info!(?clock, "Game driver started");
    let mut ticker = clock.ticker();

    loop {
        let scheduled = controller.loop_state() == LoopState::Scheduled;

        tokio::select! {
            command = rx.recv() => {
                let Some(command) = command else { break };
                if matches!(command, Command::Shutdown) {
                    break;
                }
                handle_command(&mut controller, command);
                if !scheduled && controller.loop_state() == LoopState::Scheduled {
                    ticker.reschedule();
                }
            }
            _ = ticker.next_frame(), if scheduled => {
                controller.tick();
            }
        }

        publish(&controller, &status);
    }

    controller.terminate();
    publish(&controller, &status);
    info!("Game driver stopped");
}

fn handle_command(controller: &mut GameController, command: Command) {
    match command {
        Command::StartLocal => controller.start_local_bot_match(),
        Command::StartHost { reply } => {
            let result = controller.start_as_host();
            if let Err(e) = &result {
                warn!(error = %e, "Failed to start host session");
            }
            let _ = reply.send(result);
        }
        Command::StartJoin { id, reply } => {
            let result = controller.start_as_joiner(id);
            if let Err(e) = &result {
                warn!(session_id = %id, error = %e, "Failed to join session");
            }
            let _ = reply.send(result);
        }
        Command::Pause => controller.pause(),
        Command::Resume => {
            controller.resume();
        }
        Command::TogglePause => controller.toggle_pause(),
        Command::Terminate => controller.terminate(),
        Command::Actions(actions) => controller.set_local_actions(actions),
        Command::Click { x, y } => {
            controller.click(x, y);
        }
        Command::Shutdown => {}
    }
}

fn publish(controller: &GameController, status: &RwLock<GameStatus>) {
    let controls = controller.controls();
    *status.write() = GameStatus {
        mode: controller.mode(),
        loop_state: controller.loop_state(),
        tick: controller.tick_count(),
        bodies: controller.world().len(),
        score: controller.score().clone(),
        session_id: controller.session_id().map(SessionId::get),
        pause_enabled: controls.pause_enabled,
    };
}
