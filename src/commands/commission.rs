use crate::commands::loading;
use crate::console::Console;
use crate::models::ListQuery;
use crate::services::commission_service;

pub async fn execute(console: &mut Console, args: &[&str]) -> Result<(), String> {
    console.partner()?;

    let sub = args.first().map(|s| s.to_lowercase()).unwrap_or_else(|| "stats".to_string());
    match sub.as_str() {
        "stats" => {
            loading("Chargement des commissions");
            let stats = commission_service::get_stats(&console.client).await?;
            println!("{}", commission_service::render_stats(&stats));
        }
        "unpaid" => {
            loading("Chargement des commissions impayées");
            let unpaid = commission_service::get_unpaid(&console.client).await?;
            println!("{}", commission_service::render_unpaid(&unpaid));
        }
        "rates" => {
            loading("Chargement des taux");
            let rates = commission_service::get_rates(&console.client).await?;
            println!("{}", commission_service::render_rates(&rates));
        }
        "history" => {
            let query = ListQuery::from_args(&args[1..], console.settings.page_size)?;
            loading("Chargement de l'historique des paiements");
            let listing = commission_service::get_payment_history(&console.client, &query).await?;
            println!("{}", commission_service::render_payment_history(&listing));
        }
        other => {
            return Err(format!(
                "❌ Sous-commande inconnue: '{}'. Usage: commissions [stats|unpaid|rates|history [pN]]",
                other
            ))
        }
    }

    Ok(())
}
