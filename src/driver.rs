//////////////////////////
// driver.rs
//////////////////////////
//
// Shares a Session with the deferred computer turn. The session itself stays
// a plain value; the driver owns the lock, the scheduler and the event sink.

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tracing::debug;

use crate::config::SessionConfig;
use crate::session::{AiTicket, GameEvent, MoveOutcome, Session};
use crate::types::*;

pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Runs a task once after a delay. There is no cancellation; stale work is
/// recognised by its [`AiTicket`] instead.
pub trait Scheduler: Send + Sync {
    fn schedule_once(&self, delay: Duration, task: Task);
}

/// Schedules onto a tokio runtime with `tokio::time::sleep`.
#[derive(Debug, Clone)]
pub struct TokioScheduler {
    handle: tokio::runtime::Handle,
}

impl TokioScheduler {
    pub fn new(handle: tokio::runtime::Handle) -> Self {
        TokioScheduler { handle }
    }

    /// Panics outside a tokio runtime, like `Handle::current`.
    pub fn current() -> Self {
        Self::new(tokio::runtime::Handle::current())
    }
}

impl Scheduler for TokioScheduler {
    fn schedule_once(&self, delay: Duration, task: Task) {
        self.handle.spawn(async move {
            tokio::time::sleep(delay).await;
            task();
        });
    }
}

/// Receives status changes, captures, check and game over. Sound and redraw
/// live behind this.
pub trait EventSink: Send {
    fn notify(&mut self, event: &GameEvent);
}

impl<F> EventSink for F
where
    F: FnMut(&GameEvent) + Send,
{
    fn notify(&mut self, event: &GameEvent) {
        self(event)
    }
}

/// Drops every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    fn notify(&mut self, _event: &GameEvent) {}
}

struct Shared {
    session: Mutex<Session>,
    sink: Mutex<Box<dyn EventSink>>,
    rng: Mutex<StdRng>,
    scheduler: Box<dyn Scheduler>,
    ai_delay: Duration,
}

fn lock<T: ?Sized>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Shared {
    fn publish(&self, events: Vec<GameEvent>) {
        if events.is_empty() {
            return;
        }
        let mut sink = lock(&self.sink);
        for event in &events {
            sink.notify(event);
        }
    }

    fn schedule_ai(self: &Arc<Self>, ticket: AiTicket) {
        debug!(?ticket, delay_ms = self.ai_delay.as_millis() as u64, "scheduling ai turn");
        let shared = Arc::clone(self);
        self.scheduler
            .schedule_once(self.ai_delay, Box::new(move || shared.run_ai_turn(ticket)));
    }

    fn run_ai_turn(self: &Arc<Self>, ticket: AiTicket) {
        let (outcome, events) = {
            let mut session = lock(&self.session);
            let mut rng = lock(&self.rng);
            let outcome = session.play_ai_turn(ticket, &mut *rng);
            (outcome, session.drain_events())
        };
        self.publish(events);
        if let Some(next) = outcome.and_then(|o| o.ai_turn) {
            self.schedule_ai(next);
        }
    }
}

/// Cloneable handle to a shared session. Human moves go through here so a
/// computer reply is scheduled when one is due.
#[derive(Clone)]
pub struct GameDriver {
    shared: Arc<Shared>,
}

impl GameDriver {
    pub fn new<S, K>(session: Session, scheduler: S, sink: K, ai_delay: Duration) -> Self
    where
        S: Scheduler + 'static,
        K: EventSink + 'static,
    {
        Self::with_rng(session, scheduler, sink, ai_delay, StdRng::from_entropy())
    }

    pub fn with_rng<S, K>(
        session: Session,
        scheduler: S,
        sink: K,
        ai_delay: Duration,
        rng: StdRng,
    ) -> Self
    where
        S: Scheduler + 'static,
        K: EventSink + 'static,
    {
        GameDriver {
            shared: Arc::new(Shared {
                session: Mutex::new(session),
                sink: Mutex::new(Box::new(sink)),
                rng: Mutex::new(rng),
                scheduler: Box::new(scheduler),
                ai_delay,
            }),
        }
    }

    pub fn from_config<S, K>(config: &SessionConfig, scheduler: S, sink: K) -> Self
    where
        S: Scheduler + 'static,
        K: EventSink + 'static,
    {
        Self::new(Session::with_config(config), scheduler, sink, config.ai_delay())
    }

    /// Schedules the computer's opening move when it plays White.
    pub fn start(&self) {
        let due = lock(&self.shared.session).pending_ai_turn();
        if let Some(ticket) = due {
            self.shared.schedule_ai(ticket);
        }
    }

    pub fn apply_move(
        &self,
        from: Position,
        to: Position,
        promotion: Option<PieceKind>,
    ) -> MoveOutcome {
        self.run(|s| s.apply_move(from, to, promotion))
    }

    pub fn request_move(&self, from: Position, to: Position) -> MoveOutcome {
        self.run(|s| s.request_move(from, to))
    }

    pub fn complete_promotion(&self, choice: &str) -> MoveOutcome {
        self.run(|s| s.complete_promotion(choice))
    }

    /// Fresh game. A computer turn scheduled before the restart finds its
    /// ticket stale and does nothing.
    pub fn restart(&self) {
        let (due, events) = {
            let mut session = lock(&self.shared.session);
            session.restart();
            (session.pending_ai_turn(), session.drain_events())
        };
        self.shared.publish(events);
        if let Some(ticket) = due {
            self.shared.schedule_ai(ticket);
        }
    }

    pub fn legal_destinations(&self, from: Position) -> Vec<Position> {
        lock(&self.shared.session).legal_destinations(from)
    }

    pub fn status(&self) -> Status {
        lock(&self.shared.session).status()
    }

    pub fn is_game_over(&self) -> bool {
        lock(&self.shared.session).is_game_over()
    }

    /// Read access to the session under the lock.
    pub fn with_session<R>(&self, f: impl FnOnce(&Session) -> R) -> R {
        f(&*lock(&self.shared.session))
    }

    fn run(&self, f: impl FnOnce(&mut Session) -> MoveOutcome) -> MoveOutcome {
        let (outcome, events) = {
            let mut session = lock(&self.shared.session);
            let outcome = f(&mut *session);
            (outcome, session.drain_events())
        };
        self.shared.publish(events);
        if let Some(ticket) = outcome.ai_turn {
            self.shared.schedule_ai(ticket);
        }
        outcome
    }
}
