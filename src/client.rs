use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;

use crate::commands::{send_command, Command};
use crate::config::ClientConfig;
use crate::dispatch::{decode_event, EventHandler, ServerEvent};
use crate::errors::{ClientError, ClientResult};
use crate::notifier::{spawn_notifier_with_timer, NotifierHandle, Timer, TokioTimer};
use crate::state::{Table, TableId};

/// Everything one table session needs, built once and handed around.
pub struct TableClient {
    config: ClientConfig,
    table: Arc<Mutex<Table>>,
    notifier: NotifierHandle<Table>,
    notifier_worker: JoinHandle<()>,
    outbound: mpsc::UnboundedSender<String>,
}

impl TableClient {
    /// Must be called inside a tokio runtime; the notifier is spawned here.
    pub fn new(config: ClientConfig, outbound: mpsc::UnboundedSender<String>) -> Self {
        Self::with_timer(config, outbound, TokioTimer)
    }

    pub fn with_timer<Tm>(
        config: ClientConfig,
        outbound: mpsc::UnboundedSender<String>,
        timer: Tm,
    ) -> Self
    where
        Tm: Timer + 'static,
    {
        let table = Arc::new(Mutex::new(Table::new()));
        let (notifier, notifier_worker) =
            spawn_notifier_with_timer(table.clone(), config.sequence_policy, timer);

        Self {
            config,
            table,
            notifier,
            notifier_worker,
            outbound,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Shared table, for subscribing listeners and reading state.
    pub fn table(&self) -> Arc<Mutex<Table>> {
        self.table.clone()
    }

    pub async fn handle_text(&self, text: &str) -> ClientResult<()> {
        let result = match decode_event(text) {
            Ok(event) => self.apply(event).await,
            Err(err) => Err(err),
        };
        Self::log_rejection(&result);
        result
    }

    pub async fn handle_event(&self, event: ServerEvent) -> ClientResult<()> {
        let result = self.apply(event).await;
        Self::log_rejection(&result);
        result
    }

    async fn apply(&self, event: ServerEvent) -> ClientResult<()> {
        let name = event.name();
        let sequence = {
            let mut table = self.table.lock().await;
            EventHandler::new(&self.config).handle_event(event, &mut table)?
        };
        log::debug!("📨 Applied {}", name);

        if let Some(sequence) = sequence {
            self.notifier.enqueue_sequence(sequence)?;
        }
        Ok(())
    }

    fn log_rejection(result: &ClientResult<()>) {
        if let Err(err) = result {
            if err.should_log() {
                log::warn!("❌ Rejected server push ({}): {}", err.variant_name(), err);
            }
        }
    }

    /// Consumes inbound messages in arrival order until the channel closes.
    /// Rejected messages are logged and skipped.
    pub fn spawn_inbound(
        self: Arc<Self>,
        mut receiver: mpsc::UnboundedReceiver<String>,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            log::info!("🎯 Starting inbound message loop");
            while let Some(text) = receiver.recv().await {
                let _ = self.handle_text(&text).await;
            }
            log::info!("🏁 Inbound message loop finished");
        })
    }

    // Hero actions

    pub fn join(&self, table_id: &TableId) -> ClientResult<()> {
        send_command(&self.outbound, Command::Join, table_id)
    }

    pub async fn fold(&self) -> ClientResult<()> {
        self.send_table_command(Command::Fold).await
    }

    pub async fn call(&self) -> ClientResult<()> {
        self.send_table_command(Command::Call).await
    }

    pub async fn raise(&self) -> ClientResult<()> {
        self.send_table_command(Command::Raise).await
    }

    async fn send_table_command(&self, command: Command) -> ClientResult<()> {
        let table_id = self
            .table
            .lock()
            .await
            .board()
            .table_id
            .clone()
            .ok_or(ClientError::NoActiveTable)?;
        send_command(&self.outbound, command, &table_id)
    }

    /// Stops accepting notices and waits for queued sequences to finish playing.
    pub async fn shutdown(self) -> ClientResult<()> {
        let TableClient {
            notifier,
            notifier_worker,
            ..
        } = self;
        drop(notifier);
        notifier_worker.await.map_err(|err| {
            log::error!("❌ Notifier task failed: {}", err);
            ClientError::NotifierClosed
        })
    }
}
