use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use assess_core::Clock;
use assess_core::model::{ClockEdge, PermissionState, Question};

use crate::clock_driver::ClockDriver;
use crate::error::SessionError;
use crate::integrity::{DEFAULT_SAMPLE_INTERVAL, IntegrityEvent, IntegrityMonitor, IntegrityTrigger};
use crate::submission::SubmissionSink;

use super::service::AssessmentSession;
use super::view::SessionView;

/// Mutating operations accepted by the session loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    SelectAnswer(String),
    GoNext,
    GoPrevious,
    JumpTo(usize),
    Submit,
    Shutdown,
}

/// Owns one attempt end to end: the state machine, its exam clock ticker,
/// its integrity monitor, and the single sink invocation.
///
/// Every mutation — answer writes, navigation, integrity increments, the
/// submission trigger — is dispatched through one task, so no two mutations
/// interleave. Timers are cancelled before the sink is awaited and on every
/// loop exit; a timer message that was already in flight at teardown is
/// dropped unread.
#[derive(Debug)]
pub struct SessionRuntime {
    commands: mpsc::Sender<SessionCommand>,
    views: watch::Receiver<SessionView>,
    task: JoinHandle<()>,
}

impl SessionRuntime {
    /// Validate the question set, consume the pre-check snapshot, and start
    /// the attempt with the clock's current instant as the start.
    ///
    /// Must be called from within a tokio runtime. Pass `Clock::default()`
    /// in production; a fixed clock pins the attempt's wall-clock origin.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotReady` when the pre-check snapshot is
    /// incomplete, plus the `AssessmentSession::new` validation errors.
    pub fn start(
        questions: Vec<Question>,
        duration_minutes: u32,
        metadata: serde_json::Value,
        permissions: PermissionState,
        clock: Clock,
        trigger: Box<dyn IntegrityTrigger>,
        sink: Arc<dyn SubmissionSink>,
    ) -> Result<Self, SessionError> {
        let mut session = AssessmentSession::new(questions, duration_minutes, metadata)?;
        let started_at = clock.now();
        session.begin(&permissions, started_at)?;

        let (command_tx, command_rx) = mpsc::channel(32);
        let (view_tx, view_rx) = watch::channel(SessionView::project(&session));

        let task = tokio::spawn(run_session(
            session, started_at, trigger, sink, command_rx, view_tx,
        ));

        Ok(Self {
            commands: command_tx,
            views: view_rx,
            task,
        })
    }

    /// Queue one command. Commands sent after termination are dropped.
    pub async fn send(&self, command: SessionCommand) {
        let _ = self.commands.send(command).await;
    }

    /// Subscribe to view snapshots.
    #[must_use]
    pub fn views(&self) -> watch::Receiver<SessionView> {
        self.views.clone()
    }

    /// The latest published snapshot.
    #[must_use]
    pub fn view(&self) -> SessionView {
        self.views.borrow().clone()
    }

    /// Wait for the attempt to end and return the terminal snapshot.
    pub async fn join(mut self) -> SessionView {
        let _ = (&mut self.task).await;
        self.views.borrow().clone()
    }
}

impl Drop for SessionRuntime {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn run_session(
    mut session: AssessmentSession,
    base: DateTime<Utc>,
    trigger: Box<dyn IntegrityTrigger>,
    sink: Arc<dyn SubmissionSink>,
    mut commands: mpsc::Receiver<SessionCommand>,
    views: watch::Sender<SessionView>,
) {
    let origin = tokio::time::Instant::now();
    let now = move || {
        base + chrono::Duration::from_std(origin.elapsed())
            .unwrap_or_else(|_| chrono::Duration::zero())
    };

    let (pulse_tx, mut pulses) = mpsc::channel(8);
    let (flag_tx, mut flags) = mpsc::channel(8);
    let clock_driver = ClockDriver::spawn(base, pulse_tx);
    let monitor = IntegrityMonitor::spawn(trigger, DEFAULT_SAMPLE_INTERVAL, base, flag_tx);

    loop {
        tokio::select! {
            command = commands.recv() => match command {
                Some(SessionCommand::SelectAnswer(value)) => {
                    let _ = session.select_answer(value);
                }
                Some(SessionCommand::GoNext) => {
                    let _ = session.go_next();
                }
                Some(SessionCommand::GoPrevious) => {
                    let _ = session.go_previous();
                }
                Some(SessionCommand::JumpTo(index)) => {
                    let _ = session.jump_to(index);
                }
                Some(SessionCommand::Submit) => {
                    if submit(&mut session, now(), &clock_driver, &monitor, sink.as_ref(), &views)
                        .await
                    {
                        break;
                    }
                }
                Some(SessionCommand::Shutdown) | None => break,
            },
            Some(instant) = pulses.recv() => {
                let Some(tick) = session.observe_clock(instant) else {
                    continue;
                };
                if tick.edge == Some(ClockEdge::Expired)
                    && submit(&mut session, instant, &clock_driver, &monitor, sink.as_ref(), &views)
                        .await
                {
                    break;
                }
            }
            Some(IntegrityEvent) = flags.recv() => {
                let _ = session.record_integrity_event();
            }
        }
        views.send_replace(SessionView::project(&session));
    }

    clock_driver.shutdown();
    monitor.shutdown();
    views.send_replace(SessionView::project(&session));
}

/// Run the idempotent submit routine; returns true once the session is
/// terminal. A trigger that loses the race against an earlier one is a
/// no-op.
async fn submit(
    session: &mut AssessmentSession,
    now: DateTime<Utc>,
    clock_driver: &ClockDriver,
    monitor: &IntegrityMonitor,
    sink: &dyn SubmissionSink,
    views: &watch::Sender<SessionView>,
) -> bool {
    let Ok(payload) = session.begin_submission(now) else {
        return false;
    };

    // Timers stop before the sink call; nothing mutates a submitting session.
    clock_driver.shutdown();
    monitor.shutdown();
    views.send_replace(SessionView::project(session));

    let result = sink.submit(&payload).await;
    let _ = session.complete_submission(result);
    true
}
