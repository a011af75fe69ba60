use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;

use crate::config::SequencePolicy;
use crate::errors::{ClientError, ClientResult};
use crate::notifier::timer::{Timer, TokioTimer};
use crate::notifier::Sequence;

pub struct NotifierHandle<T> {
    sender: mpsc::UnboundedSender<Sequence<T>>,
}

impl<T> Clone for NotifierHandle<T> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<T> NotifierHandle<T> {
    /// Queues a sequence. The first notice runs as soon as the worker gets to
    /// it; an empty sequence is dropped here.
    pub fn enqueue_sequence(&self, entries: Sequence<T>) -> ClientResult<()> {
        if entries.is_empty() {
            return Ok(());
        }
        self.sender
            .send(entries)
            .map_err(|_| ClientError::NotifierClosed)
    }
}

struct Notifier<T, Tm> {
    target: Arc<Mutex<T>>,
    receiver: mpsc::UnboundedReceiver<Sequence<T>>,
    timer: Tm,
    policy: SequencePolicy,
}

impl<T, Tm> Notifier<T, Tm>
where
    T: Send + 'static,
    Tm: Timer + 'static,
{
    async fn run(mut self) {
        log::debug!("🔔 Starting notifier ({:?})", self.policy);

        let mut next = self.receiver.recv().await;
        while let Some(sequence) = next.take() {
            next = match self.play(sequence).await {
                Some(preempting) => Some(preempting),
                None => self.receiver.recv().await,
            };
        }

        log::debug!("🏁 Notifier finished");
    }

    /// Plays one sequence to the end. Under `Preempt`, returns the sequence
    /// that cut it short.
    async fn play(&mut self, sequence: Sequence<T>) -> Option<Sequence<T>> {
        let total = sequence.len();
        for (index, notice) in sequence.into_iter().enumerate() {
            let (action, hold) = notice.into_parts();
            {
                let mut target = self.target.lock().await;
                action(&mut *target);
            }
            log::debug!("🔔 Notice {}/{} shown, holding {:?}", index + 1, total, hold);

            if hold.is_zero() {
                continue;
            }
            if let Some(preempting) = self.hold(hold).await {
                log::info!(
                    "⏭️  Sequence preempted with {} notice(s) left",
                    total - index - 1
                );
                return Some(preempting);
            }
        }
        None
    }

    async fn hold(&mut self, hold: Duration) -> Option<Sequence<T>> {
        match self.policy {
            SequencePolicy::Queue => {
                self.timer.sleep(hold).await;
                None
            }
            SequencePolicy::Preempt => {
                let sleep = self.timer.sleep(hold);
                tokio::pin!(sleep);
                tokio::select! {
                    _ = &mut sleep => None,
                    Some(incoming) = self.receiver.recv() => Some(incoming),
                }
            }
        }
    }
}

/// Spawns the notifier on the tokio runtime with real time.
pub fn spawn_notifier<T>(
    target: Arc<Mutex<T>>,
    policy: SequencePolicy,
) -> (NotifierHandle<T>, JoinHandle<()>)
where
    T: Send + 'static,
{
    spawn_notifier_with_timer(target, policy, TokioTimer)
}

pub fn spawn_notifier_with_timer<T, Tm>(
    target: Arc<Mutex<T>>,
    policy: SequencePolicy,
    timer: Tm,
) -> (NotifierHandle<T>, JoinHandle<()>)
where
    T: Send + 'static,
    Tm: Timer + 'static,
{
    let (sender, receiver) = mpsc::unbounded_channel();
    let notifier = Notifier {
        target,
        receiver,
        timer,
        policy,
    };
    let worker = tokio::spawn(notifier.run());
    (NotifierHandle { sender }, worker)
}
