use chrono::Utc;
use std::path::PathBuf;

use crate::commands::{invalidate, loading};
use crate::console::Console;
use crate::models::ListQuery;
use crate::services::recharge_service;
use crate::utils::parse_amount;

const USAGE: &str = "🧾 Recharges\n\
    Usage:\n  \
    recharge list [pN] [status=pending|approved|rejected|expired]\n  \
    recharge new <montant> <fichier preuve> <date du paiement AAAA-MM-JJ> [description]\n\
    Exemple:\n  \
    recharge new 50000 ./recu.jpg 2026-10-18 Virement Ecobank";

pub async fn execute(console: &mut Console, args: &[&str]) -> Result<(), String> {
    if args.is_empty() || args[0] == "help" {
        println!("{}", USAGE);
        return Ok(());
    }
    console.partner()?;

    match args[0].to_lowercase().as_str() {
        "list" => {
            let query = ListQuery::from_args(&args[1..], console.settings.page_size)?;
            loading("Chargement des recharges");
            let listing = recharge_service::list_recharges(&console.client, &query).await?;
            println!("{}", recharge_service::render_recharge_page(&listing, Utc::now()));
        }
        "new" | "create" => {
            if args.len() < 4 {
                return Err(format!("❌ Arguments manquants\n{}", USAGE));
            }
            let amount = parse_amount(args[1])?;
            let proof = PathBuf::from(args[2]);
            let description = if args.len() > 4 {
                args[4..].join(" ")
            } else {
                String::new()
            };

            loading("Envoi de la demande de recharge");
            let topup = recharge_service::create_recharge(
                &console.client,
                amount,
                proof,
                args[3],
                description,
            )
            .await?;
            invalidate(&["recharge"]).await;
            println!("{}", recharge_service::render_recharge_receipt(&topup, Utc::now()));
        }
        other => return Err(format!("❌ Sous-commande inconnue: '{}'\n{}", other, USAGE)),
    }

    Ok(())
}
