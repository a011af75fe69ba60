use env_logger::Env;
use merlion_client::{ClientConfig, TableClient};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

/// Replays newline-delimited server events from stdin through a table client.
/// Lines `fold`, `call` and `raise` act as the hero.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = match std::env::args().nth(1) {
        Some(path) => ClientConfig::from_json(&std::fs::read_to_string(path)?)?
            .with_overrides(|key| std::env::var(key).ok()),
        None => ClientConfig::from_env(),
    };
    log::info!("🎮 Starting table replay ({:?})", config);

    let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel::<String>();
    let printer = tokio::spawn(async move {
        while let Some(command) = outbound_rx.recv().await {
            println!(">> {}", command);
        }
    });

    let client = TableClient::new(config, outbound_tx);
    client.table().lock().await.subscribe_board(|board, _| {
        println!("[status] {}", board.status);
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        let action = match line {
            "" => continue,
            "fold" => client.fold().await,
            "call" => client.call().await,
            "raise" => client.raise().await,
            event => {
                // The client logs rejected pushes itself
                let _ = client.handle_text(event).await;
                continue;
            }
        };
        if let Err(err) = action {
            eprintln!("❌ {}", err);
        }
    }

    client.shutdown().await?;
    printer.await?;
    log::info!("🏁 Replay finished");
    Ok(())
}
