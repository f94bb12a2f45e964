//! Tokio task driving a [`ConsoleState`].
//!
//! Events arrive over an `mpsc` channel and every resulting snapshot is
//! published on a `watch` channel. Commands run on their own tasks and report
//! back with [`ConsoleEvent::Settled`], so the actor never blocks on the
//! network. Page invalidations from the cache trigger a `get_users` refresh.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, warn};

use crate::domain::TraceId;
use crate::domain::ports::{ActionOutcome, UserActions, UserRecord};

use super::state::{ConsoleCommand, ConsoleEvent, ConsoleState};

const EVENT_BUFFER: usize = 16;

/// The console task has stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("console task is no longer running")]
pub struct ConsoleClosed;

enum Message {
    Event {
        trace_id: Option<TraceId>,
        event: ConsoleEvent,
    },
    /// Acknowledged once every earlier message is applied.
    Flush(oneshot::Sender<()>),
}

/// Client side of a running console.
#[derive(Clone)]
pub struct ConsoleHandle {
    events: mpsc::Sender<Message>,
    snapshots: watch::Receiver<ConsoleState>,
}

impl ConsoleHandle {
    /// Queue an event. The caller's trace id follows any action it starts.
    ///
    /// # Errors
    ///
    /// Returns [`ConsoleClosed`] when the console task has exited.
    pub async fn send(&self, event: ConsoleEvent) -> Result<(), ConsoleClosed> {
        let message = Message::Event {
            trace_id: TraceId::current(),
            event,
        };
        self.events.send(message).await.map_err(|_| ConsoleClosed)
    }

    /// Latest published snapshot.
    pub fn state(&self) -> ConsoleState {
        self.snapshots.borrow().clone()
    }

    /// Receiver observing every published snapshot.
    pub fn subscribe(&self) -> watch::Receiver<ConsoleState> {
        self.snapshots.clone()
    }

    /// Wait until every queued event is applied and no action is pending.
    ///
    /// # Errors
    ///
    /// Returns [`ConsoleClosed`] when the console task has exited.
    pub async fn settled(&self) -> Result<ConsoleState, ConsoleClosed> {
        let (ack, acked) = oneshot::channel();
        self.events
            .send(Message::Flush(ack))
            .await
            .map_err(|_| ConsoleClosed)?;
        acked.await.map_err(|_| ConsoleClosed)?;
        let mut snapshots = self.snapshots.clone();
        let state = snapshots
            .wait_for(|state| !state.is_pending())
            .await
            .map_err(|_| ConsoleClosed)?;
        Ok(state.clone())
    }
}

/// Start a console over `users` on the current Tokio runtime.
///
/// The task ends once every [`ConsoleHandle`] is dropped.
pub fn spawn_console(
    users: Vec<UserRecord>,
    actions: Arc<dyn UserActions>,
    invalidations: watch::Receiver<u64>,
) -> ConsoleHandle {
    let (events_tx, events) = mpsc::channel(EVENT_BUFFER);
    let (snapshots_tx, snapshots) = watch::channel(ConsoleState::new(users.clone()));
    let actor = ConsoleActor {
        state: ConsoleState::new(users),
        actions,
        events,
        feedback: events_tx.downgrade(),
        snapshots: snapshots_tx,
        invalidations,
    };
    tokio::spawn(actor.run());
    ConsoleHandle {
        events: events_tx,
        snapshots,
    }
}

struct ConsoleActor {
    state: ConsoleState,
    actions: Arc<dyn UserActions>,
    events: mpsc::Receiver<Message>,
    feedback: mpsc::WeakSender<Message>,
    snapshots: watch::Sender<ConsoleState>,
    invalidations: watch::Receiver<u64>,
}

impl ConsoleActor {
    async fn run(mut self) {
        let mut watching = true;
        loop {
            tokio::select! {
                message = self.events.recv() => match message {
                    Some(Message::Event { trace_id, event }) => self.handle(trace_id, event),
                    Some(Message::Flush(ack)) => {
                        let _ = ack.send(());
                    }
                    None => break,
                },
                changed = self.invalidations.changed(), if watching => match changed {
                    Ok(()) => self.refresh(),
                    Err(_) => watching = false,
                },
            }
        }
        debug!("console stopped");
    }

    fn handle(&mut self, trace_id: Option<TraceId>, event: ConsoleEvent) {
        if let Some(command) = self.state.apply(event) {
            self.dispatch(command, trace_id.unwrap_or_else(TraceId::generate));
        }
        self.snapshots.send_replace(self.state.clone());
    }

    fn dispatch(&self, command: ConsoleCommand, trace_id: TraceId) {
        let Some(feedback) = self.feedback.upgrade() else {
            return;
        };
        let actions = Arc::clone(&self.actions);
        let kind = command.kind();
        tokio::spawn(TraceId::scope(trace_id, async move {
            let outcome = run_command(actions.as_ref(), command).await;
            let message = Message::Event {
                trace_id: Some(trace_id),
                event: ConsoleEvent::Settled { kind, outcome },
            };
            if feedback.send(message).await.is_err() {
                debug!("console closed before the action settled");
            }
        }));
    }

    fn refresh(&self) {
        let Some(feedback) = self.feedback.upgrade() else {
            return;
        };
        let actions = Arc::clone(&self.actions);
        tokio::spawn(async move {
            match actions.get_users().await {
                ActionOutcome::Succeeded(users) => {
                    let message = Message::Event {
                        trace_id: None,
                        event: ConsoleEvent::Refreshed(users),
                    };
                    let _ = feedback.send(message).await;
                }
                ActionOutcome::Failed { error } => {
                    warn!(%error, "console refresh failed; keeping the current list");
                }
            }
        });
    }
}

async fn run_command(actions: &dyn UserActions, command: ConsoleCommand) -> ActionOutcome<()> {
    match command {
        ConsoleCommand::Create { name, email } => actions.create_user(name, email).await.discard(),
        ConsoleCommand::Update { id, name, email } => {
            actions.update_user(id, name, email).await.discard()
        }
        ConsoleCommand::Delete { id } => actions.delete_user(id).await,
    }
}
