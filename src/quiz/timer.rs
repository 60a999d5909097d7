//! Per-question countdown.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use uuid::Uuid;

/// Wall-clock time per tenth of a time unit.
pub const TICK_INTERVAL: Duration = Duration::from_millis(100);

/// Sent by a running countdown to its controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    Tick {
        session: Uuid,
        question: usize,
        remaining_tenths: u32,
    },
    /// Sent once, after the last tick.
    Expired { session: Uuid, question: usize },
}

/// A countdown task for one question. Aborted on cancel or drop.
#[derive(Debug)]
pub struct QuestionTimer {
    handle: JoinHandle<()>,
}

impl QuestionTimer {
    pub fn spawn(
        session: Uuid,
        question: usize,
        limit_tenths: u32,
        events: mpsc::UnboundedSender<TimerEvent>,
    ) -> Self {
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(TICK_INTERVAL);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately.
            interval.tick().await;

            let mut remaining_tenths = limit_tenths;
            while remaining_tenths > 0 {
                interval.tick().await;
                remaining_tenths -= 1;
                let tick = TimerEvent::Tick {
                    session,
                    question,
                    remaining_tenths,
                };
                if events.send(tick).is_err() {
                    return;
                }
            }

            let _ = events.send(TimerEvent::Expired { session, question });
        });

        Self { handle }
    }

    pub fn cancel(&self) {
        self.handle.abort();
    }
}

impl Drop for QuestionTimer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
