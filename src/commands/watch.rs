use chrono::Utc;

use crate::commands::loading;
use crate::console::Console;
use crate::services::{betting_service, live_service};
use crate::utils::short_id;

/// Print the betting list, then follow status pushes until Ctrl-C
pub async fn execute(console: &mut Console) -> Result<(), String> {
    let token = console.partner()?.access.clone();

    loading("Chargement des transactions de paris");
    let query = console.betting_query.clone();
    let listing = betting_service::list_transactions(&console.client, &query).await?;
    println!("{}", betting_service::render_transaction_page(&listing, Utc::now()));
    console.betting_transactions = listing.items;
    console.cancelling = None;

    println!("📡 Suivi en temps réel (Ctrl-C pour arrêter)");
    let url = live_service::live_url(&console.settings.ws_url, &token);
    live_service::watch(&url, &console.interrupt, &mut console.betting_transactions, |update, known| {
        let marker = if known { "🔄" } else { "🆕" };
        println!(
            "{} {} → {}",
            marker,
            short_id(&update.uid),
            update.status.label()
        );
    })
    .await?;

    println!("📡 Suivi terminé");
    Ok(())
}
