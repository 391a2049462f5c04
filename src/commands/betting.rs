use chrono::Utc;

use crate::commands::{invalidate, loading};
use crate::console::{confirm, read_line, Console};
use crate::models::ListQuery;
use crate::services::betting_service;
use crate::services::cancellation_service::{
    self, ineligibility_reason, settle_reason, DEFAULT_CANCELLATION_REASON,
};
use crate::utils::{format_amount, parse_amount};

const USAGE: &str = "🎲 Paris\n\
    Usage:\n  \
    bet list [pN] [search=..] [type=deposit|withdrawal] [status=..] [from=..] [to=..]\n  \
    bet verify <plateforme> <id joueur>\n  \
    bet deposit <plateforme> <id joueur> <montant>\n  \
    bet withdraw <plateforme> <id joueur> <code de retrait>\n  \
    bet cancel <id|référence> [motif]\n\
    Exemples:\n  \
    bet deposit 1xbet 123456789 5000\n  \
    bet cancel 3f2a9c1e Mauvais identifiant joueur";

pub async fn platforms(console: &mut Console) -> Result<(), String> {
    console.partner()?;
    loading("Chargement des plateformes");
    let platforms = betting_service::list_platforms(&console.client).await?;
    println!("{}", betting_service::render_platforms(&platforms));
    Ok(())
}

pub async fn execute(console: &mut Console, args: &[&str]) -> Result<(), String> {
    if args.is_empty() || args[0] == "help" {
        println!("{}", USAGE);
        return Ok(());
    }
    console.partner()?;

    match args[0].to_lowercase().as_str() {
        "list" => {
            let query = ListQuery::from_args(&args[1..], console.settings.page_size)?;
            refresh_list(console, query).await?;
        }
        "verify" => {
            if args.len() < 3 {
                return Err(format!("❌ Arguments manquants\n{}", USAGE));
            }
            let platforms = betting_service::list_platforms(&console.client).await?;
            let platform = betting_service::resolve_platform(&platforms, args[1])?;

            loading("Vérification du joueur");
            let result = betting_service::verify_user(&console.client, platform, args[2]).await?;
            if result.is_valid {
                println!(
                    "✅ Joueur {} trouvé sur {}{}",
                    args[2],
                    platform.name,
                    result.user_name.map(|n| format!(" ({})", n)).unwrap_or_default()
                );
            } else {
                return Err(result
                    .message
                    .unwrap_or_else(|| format!("❌ Joueur {} introuvable sur {}", args[2], platform.name)));
            }
        }
        "deposit" => {
            if args.len() < 4 {
                return Err(format!("❌ Arguments manquants\n{}", USAGE));
            }
            let amount = parse_amount(args[3])?;
            let platforms = betting_service::list_platforms(&console.client).await?;
            let platform = betting_service::resolve_platform(&platforms, args[1])?;

            println!(
                "Dépôt de {} sur {} pour le joueur {}",
                format_amount(amount),
                platform.name,
                args[2]
            );
            loading("Envoi du dépôt");
            let tx = betting_service::deposit(&console.client, platform, args[2], amount).await?;
            invalidate(&["balance", "bet", "commissions"]).await;
            println!("{}", betting_service::render_transaction_receipt(&tx));
        }
        "withdraw" | "withdrawal" => {
            if args.len() < 4 {
                return Err(format!("❌ Arguments manquants\n{}", USAGE));
            }
            let platforms = betting_service::list_platforms(&console.client).await?;
            let platform = betting_service::resolve_platform(&platforms, args[1])?;

            loading("Envoi du retrait");
            let tx = betting_service::withdraw(&console.client, platform, args[2], args[3]).await?;
            invalidate(&["balance", "bet", "commissions"]).await;
            println!("{}", betting_service::render_transaction_receipt(&tx));
        }
        "cancel" => {
            if args.len() < 2 {
                return Err(format!("❌ Identifiant manquant\n{}", USAGE));
            }
            let prefill = if args.len() > 2 {
                args[2..].join(" ")
            } else {
                DEFAULT_CANCELLATION_REASON.to_string()
            };
            cancel(console, args[1], prefill).await?;
        }
        other => return Err(format!("❌ Sous-commande inconnue: '{}'\n{}", other, USAGE)),
    }

    Ok(())
}

/// Fetch the betting list with `query`, keep it on the console and print it
async fn refresh_list(console: &mut Console, query: ListQuery) -> Result<(), String> {
    loading("Chargement des transactions de paris");
    let listing = betting_service::list_transactions(&console.client, &query).await?;
    println!("{}", betting_service::render_transaction_page(&listing, Utc::now()));
    console.betting_transactions = listing.items;
    console.betting_query = query;
    // The server's rows now carry any cancellation we sent
    console.cancelling = None;
    Ok(())
}

/// Eligibility, reason prompt, confirmation, then [`submit_cancellation`]
async fn cancel(console: &mut Console, needle: &str, prefill: String) -> Result<(), String> {
    if betting_service::find_transaction(&console.betting_transactions, needle).is_none() {
        let query = console.betting_query.clone();
        let listing = betting_service::list_transactions(&console.client, &query).await?;
        console.betting_transactions = listing.items;
        console.cancelling = None;
    }
    let tx = betting_service::find_transaction(&console.betting_transactions, needle)
        .cloned()
        .ok_or_else(|| {
            format!(
                "❌ Transaction '{}' absente de la liste affichée. Utilisez `bet list` pour la retrouver.",
                needle
            )
        })?;

    if console.cancelling.as_deref() == Some(tx.uid.as_str()) {
        return Err(already_sent());
    }
    if let Some(reason) = ineligibility_reason(&tx, Utc::now()) {
        return Err(format!("❌ Annulation impossible: {}", reason));
    }

    println!("{}", betting_service::render_transaction_receipt(&tx));
    let typed = read_line(&format!("Motif [{}]: ", prefill)).await;
    let confirmed = confirm("Confirmer la demande d'annulation ?").await;
    let Some(reason) = settle_reason(typed.as_deref(), &prefill, confirmed) else {
        println!("Demande abandonnée");
        return Ok(());
    };

    submit_cancellation(console, &tx.uid, &reason).await
}

/// Single POST, then a full refetch; the local row is never edited
///
/// `console.cancelling` holds the uid from a successful POST until a refetch
/// succeeds, so a failed refetch cannot lead to a second request.
async fn submit_cancellation(console: &mut Console, uid: &str, reason: &str) -> Result<(), String> {
    if console.cancelling.as_deref() == Some(uid) {
        return Err(already_sent());
    }

    loading("Envoi de la demande d'annulation");
    cancellation_service::request_cancellation(&console.client, uid, reason).await?;
    console.cancelling = Some(uid.to_string());
    println!("✅ Demande d'annulation envoyée");

    let query = console.betting_query.clone();
    refresh_list(console, query).await
}

fn already_sent() -> String {
    "⏳ L'annulation de cette transaction a déjà été envoyée. Utilisez `bet list` pour voir son état."
        .to_string()
}
