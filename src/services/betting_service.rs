use chrono::{DateTime, Utc};
use tracing::info;

use crate::api::models::{
    BettingPlatform, NewBettingDeposit, NewBettingWithdrawal, VerifyBettingUser,
    VerifyBettingUserResponse,
};
use crate::api::{BettingTransaction, PartnerClient, TransactionType};
use crate::models::{ListQuery, Listing};
use crate::services::cancellation_service::can_cancel_transaction;
use crate::utils::{format_amount, format_datetime, short_id, Table};

pub async fn list_platforms(client: &PartnerClient) -> Result<Vec<BettingPlatform>, String> {
    client
        .list_betting_platforms()
        .await
        .map(|r| r.into_items())
        .map_err(|e| format!("Impossible de charger les plateformes: {}", e))
}

/// Find an active platform by uid or name (case-insensitive)
pub fn resolve_platform<'a>(
    platforms: &'a [BettingPlatform],
    needle: &str,
) -> Result<&'a BettingPlatform, String> {
    let needle_lower = needle.to_lowercase();
    let platform = platforms
        .iter()
        .find(|p| p.uid == needle || p.name.to_lowercase() == needle_lower)
        .ok_or_else(|| format!("❌ Plateforme inconnue: '{}'. Voir `platforms`.", needle))?;

    if !platform.is_active {
        return Err(format!("❌ La plateforme {} est désactivée", platform.name));
    }
    Ok(platform)
}

/// Client-side pre-check of the platform permission and limits; the backend
/// checks again
pub fn check_limits(
    platform: &BettingPlatform,
    kind: &TransactionType,
    amount: Option<f64>,
) -> Result<(), String> {
    let (allowed, min, max, label) = match kind {
        TransactionType::Deposit => (
            platform.can_deposit,
            platform.min_deposit_amount,
            platform.max_deposit_amount,
            "dépôts",
        ),
        TransactionType::Withdrawal => (
            platform.can_withdraw,
            platform.min_withdrawal_amount,
            platform.max_withdrawal_amount,
            "retraits",
        ),
        TransactionType::Other(raw) => return Err(format!("❌ Opération inconnue: {}", raw)),
    };

    if !allowed {
        return Err(format!(
            "❌ Vous n'êtes pas autorisé à faire des {} sur {}",
            label, platform.name
        ));
    }

    if let Some(amount) = amount {
        if let Some(min) = min {
            if amount < min {
                return Err(format!("❌ Montant minimum sur {}: {}", platform.name, format_amount(min)));
            }
        }
        if let Some(max) = max {
            if amount > max {
                return Err(format!("❌ Montant maximum sur {}: {}", platform.name, format_amount(max)));
            }
        }
    }
    Ok(())
}

pub async fn verify_user(
    client: &PartnerClient,
    platform: &BettingPlatform,
    betting_user_id: &str,
) -> Result<VerifyBettingUserResponse, String> {
    let body = VerifyBettingUser {
        platform_uid: platform.uid.clone(),
        betting_user_id: betting_user_id.to_string(),
    };
    client
        .verify_betting_user(&body)
        .await
        .map_err(|e| format!("❌ Vérification impossible: {}", e))
}

pub async fn deposit(
    client: &PartnerClient,
    platform: &BettingPlatform,
    betting_user_id: &str,
    amount: f64,
) -> Result<BettingTransaction, String> {
    check_limits(platform, &TransactionType::Deposit, Some(amount))?;

    let body = NewBettingDeposit {
        platform_uid: platform.uid.clone(),
        betting_user_id: betting_user_id.to_string(),
        amount,
    };
    let tx = client
        .create_betting_deposit(&body)
        .await
        .map_err(|e| format!("❌ Dépôt refusé: {}", e))?;
    info!("Betting deposit {} on {} for {}", tx.uid, platform.name, amount);
    Ok(tx)
}

pub async fn withdraw(
    client: &PartnerClient,
    platform: &BettingPlatform,
    betting_user_id: &str,
    withdrawal_code: &str,
) -> Result<BettingTransaction, String> {
    check_limits(platform, &TransactionType::Withdrawal, None)?;

    let body = NewBettingWithdrawal {
        platform_uid: platform.uid.clone(),
        betting_user_id: betting_user_id.to_string(),
        withdrawal_code: withdrawal_code.to_string(),
    };
    let tx = client
        .create_betting_withdrawal(&body)
        .await
        .map_err(|e| format!("❌ Retrait refusé: {}", e))?;
    info!("Betting withdrawal {} on {}", tx.uid, platform.name);
    Ok(tx)
}

pub async fn list_transactions(
    client: &PartnerClient,
    query: &ListQuery,
) -> Result<Listing<BettingTransaction>, String> {
    let response = client
        .list_betting_transactions(&query.to_query_pairs())
        .await
        .map_err(|e| format!("Impossible de charger les transactions de paris: {}", e))?;
    Ok(Listing::from_response(response, query))
}

/// Look a transaction up by full uid, uid prefix (as shown in tables) or
/// reference
pub fn find_transaction<'a>(
    transactions: &'a [BettingTransaction],
    needle: &str,
) -> Option<&'a BettingTransaction> {
    transactions
        .iter()
        .find(|tx| tx.uid == needle || tx.reference.as_deref() == Some(needle))
        .or_else(|| {
            let matches: Vec<&BettingTransaction> =
                transactions.iter().filter(|tx| tx.uid.starts_with(needle)).collect();
            if matches.len() == 1 {
                Some(matches[0])
            } else {
                None
            }
        })
}

pub fn render_platforms(platforms: &[BettingPlatform]) -> String {
    if platforms.is_empty() {
        return "🎲 Aucune plateforme disponible".to_string();
    }

    let range = |min: Option<f64>, max: Option<f64>| match (min, max) {
        (Some(min), Some(max)) => format!("{} - {}", format_amount(min), format_amount(max)),
        (Some(min), None) => format!("≥ {}", format_amount(min)),
        (None, Some(max)) => format!("≤ {}", format_amount(max)),
        (None, None) => "-".to_string(),
    };
    let flag = |allowed: bool| if allowed { "oui" } else { "non" };

    let mut table = Table::new(vec!["Plateforme", "Active", "Dépôt", "Limites dépôt", "Retrait", "Limites retrait"])
        .with_title("🎲 Plateformes de paris");
    for p in platforms {
        table.add_row(vec![
            p.name.clone(),
            flag(p.is_active).to_string(),
            flag(p.can_deposit).to_string(),
            range(p.min_deposit_amount, p.max_deposit_amount),
            flag(p.can_withdraw).to_string(),
            range(p.min_withdrawal_amount, p.max_withdrawal_amount),
        ]);
    }
    table.render()
}

pub fn render_transaction_page(listing: &Listing<BettingTransaction>, now: DateTime<Utc>) -> String {
    if listing.is_empty() {
        return "🎲 Aucune transaction de paris".to_string();
    }

    let mut table = Table::new(vec!["ID", "Plateforme", "Type", "Montant", "Commission", "Statut", "Date", "Annulable"])
        .with_title("🎲 Transactions de paris");
    for tx in &listing.items {
        let status = if tx.cancellation_requested_at.is_some() && tx.cancelled_at.is_none() {
            format!("{} (annulation demandée)", tx.status.label())
        } else {
            tx.status.label().to_string()
        };
        table.add_row(vec![
            short_id(&tx.uid),
            tx.platform_name.clone().unwrap_or_else(|| "-".to_string()),
            tx.transaction_type.label().to_string(),
            format_amount(tx.amount),
            tx.commission_amount.map(format_amount).unwrap_or_else(|| "-".to_string()),
            status,
            format_datetime(tx.created_at.as_deref()),
            if can_cancel_transaction(tx, now) { "oui" } else { "" }.to_string(),
        ]);
    }

    let mut out = table.render();
    if !listing.filters.is_empty() {
        out.push_str(&format!("Filtres: {}\n", listing.filters));
    }
    out.push_str(&listing.page.footer());
    out
}

pub fn render_transaction_receipt(tx: &BettingTransaction) -> String {
    let mut out = format!("🎲 {} enregistré\n", tx.transaction_type.label());
    out.push_str(&format!("  ID        : {}\n", tx.uid));
    if let Some(reference) = &tx.reference {
        out.push_str(&format!("  Référence : {}\n", reference));
    }
    if let Some(platform) = &tx.platform_name {
        out.push_str(&format!("  Plateforme: {}\n", platform));
    }
    if let Some(user) = &tx.betting_user_id {
        out.push_str(&format!("  Joueur    : {}\n", user));
    }
    out.push_str(&format!("  Montant   : {}\n", format_amount(tx.amount)));
    if let Some(commission) = tx.commission_amount {
        let paid = match tx.commission_paid {
            Some(true) => " (payée)",
            Some(false) => " (non payée)",
            None => "",
        };
        out.push_str(&format!("  Commission: {}{}\n", format_amount(commission), paid));
    }
    if let (Some(before), Some(after)) = (tx.partner_balance_before, tx.partner_balance_after) {
        out.push_str(&format!(
            "  Solde     : {} → {}\n",
            format_amount(before),
            format_amount(after)
        ));
    }
    out.push_str(&format!("  Statut    : {}\n", tx.status.label()));
    out
}
