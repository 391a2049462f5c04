use crate::api::TransactionType;
use crate::commands::{invalidate, loading};
use crate::console::Console;
use crate::models::ListQuery;
use crate::services::transaction_service;
use crate::utils::{format_amount, parse_amount};

const USAGE: &str = "📋 Transactions\n\
    Usage:\n  \
    tx list [pN] [search=..] [type=deposit|withdrawal] [from=AAAA-MM-JJ] [to=AAAA-MM-JJ] [sort=-created_at]\n  \
    tx new <deposit|withdrawal> <montant> <téléphone> <réseau> [objet]\n\
    Exemples:\n  \
    tx list p2 type=withdrawal sort=-amount\n  \
    tx new deposit 5000 +2250700000000 mtn Paiement facture";

pub async fn execute(console: &mut Console, args: &[&str]) -> Result<(), String> {
    if args.is_empty() || args[0] == "help" {
        println!("{}", USAGE);
        return Ok(());
    }
    console.partner()?;

    match args[0].to_lowercase().as_str() {
        "list" => {
            let query = ListQuery::from_args(&args[1..], console.settings.page_size)?;
            loading("Chargement des transactions");
            let listing = transaction_service::list_transactions(&console.client, &query).await?;
            println!("{}", transaction_service::render_transaction_page(&listing));
        }
        "new" | "create" => {
            if args.len() < 5 {
                return Err(format!("❌ Arguments manquants\n{}", USAGE));
            }
            let kind = match args[1].to_lowercase().as_str() {
                "deposit" | "depot" => TransactionType::Deposit,
                "withdrawal" | "retrait" => TransactionType::Withdrawal,
                other => return Err(format!("❌ Type inconnu: '{}' (deposit ou withdrawal)", other)),
            };
            let amount = parse_amount(args[2])?;
            let objet = if args.len() > 5 {
                Some(args[5..].join(" "))
            } else {
                None
            };

            println!(
                "{} de {} vers {} ({})",
                kind.label(),
                format_amount(amount),
                args[3],
                args[4]
            );
            loading("Envoi de la transaction");
            let tx = transaction_service::create_transaction(
                &console.client,
                kind,
                amount,
                args[3],
                args[4],
                objet,
            )
            .await?;

            // Balance and first page changed
            invalidate(&["balance", "tx"]).await;
            println!("{}", transaction_service::render_transaction_receipt(&tx));
        }
        other => return Err(format!("❌ Sous-commande inconnue: '{}'\n{}", other, USAGE)),
    }

    Ok(())
}
