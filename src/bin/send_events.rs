//! # Relay Test Event Publisher
//!
//! Sends a batch of synthetic business events onto the configured topic
//! subscription queue, for smoke-testing a deployment end to end.
//!
//! ## Usage
//!
//! ```bash
//! # Send 10 events (the default)
//! cargo run --bin relay-send-events
//!
//! # Send 100 events
//! cargo run --bin relay-send-events -- 100
//! ```

use chrono::Utc;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use relay_core::config::RelayConfig;
use relay_core::logging;
use relay_core::messaging::PgmqSubscriptionSource;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init_tracing();

    let count: usize = match std::env::args().nth(1) {
        Some(arg) => arg
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid event count {arg:?}: {e}"))?,
        None => 10,
    };

    let config = RelayConfig::from_env()?;

    info!(
        topic = %config.topic,
        subscription = %config.subscription,
        count,
        "Sending test events"
    );

    let source =
        PgmqSubscriptionSource::new(&config.database_url, &config.topic, &config.subscription)
            .await?;
    source.ensure_queue().await?;

    for sequence in 0..count {
        let event = json!({
            "id": Uuid::new_v4().to_string(),
            "sequence": sequence,
            "source": "relay-send-events",
            "sentAt": Utc::now(),
        });

        let message_id = source.publish(&event).await?;
        info!(message_id, sequence, "Sent test event");
    }

    info!(count, "✅ All test events sent");
    Ok(())
}
