use futures_util::StreamExt;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info, warn};

use crate::api::BettingTransaction;
use crate::console::Interrupt;
use crate::models::TransactionUpdate;

/// Websocket endpoint for transaction status pushes
pub fn live_url(ws_base: &str, access_token: &str) -> String {
    format!(
        "{}/ws/transactions/?token={}",
        ws_base.trim_end_matches('/'),
        access_token
    )
}

/// Follow pushes until Ctrl-C or the server closes the socket, merging each
/// update into `transactions`; `on_update` also learns whether a listed row matched
pub async fn watch<F>(
    url: &str,
    interrupt: &Interrupt,
    transactions: &mut [BettingTransaction],
    mut on_update: F,
) -> Result<(), String>
where
    F: FnMut(&TransactionUpdate, bool),
{
    let (mut stream, _) = connect_async(url)
        .await
        .map_err(|e| format!("❌ Connexion temps réel impossible: {}", e))?;
    info!("Live updates connected");

    let capture = interrupt.capture();
    loop {
        tokio::select! {
            _ = capture.interrupted() => {
                info!("Live updates stopped by user");
                break;
            }
            frame = stream.next() => {
                match frame {
                    Some(Ok(Message::Text(text))) => {
                        match TransactionUpdate::parse(text.as_str()) {
                            Some(update) => {
                                let known = update.apply(transactions);
                                on_update(&update, known);
                            }
                            None => debug!("Ignoring malformed live frame: {}", text.as_str()),
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        info!("Live updates closed by server");
                        break;
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        warn!("Live updates error: {}", e);
                        return Err(format!("❌ Flux temps réel interrompu: {}", e));
                    }
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_live_url() {
        assert_eq!(
            live_url("wss://api.blaffa.net/", "tok"),
            "wss://api.blaffa.net/ws/transactions/?token=tok"
        );
    }
}
