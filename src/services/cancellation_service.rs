use chrono::{DateTime, Duration, Utc};
use tracing::{info, warn};

use crate::api::{BettingTransaction, PartnerClient, TransactionStatus};
use crate::utils::parse_timestamp;

/// Minutes after creation during which a cancellation may be requested
pub const CANCELLATION_WINDOW_MINUTES: i64 = 25;

/// Reason sent when the partner keeps the pre-filled text
pub const DEFAULT_CANCELLATION_REASON: &str = "Annulation demandée par le partenaire";

/// Whether the console should offer "cancel" for this transaction.
///
/// Only decides what to show; the backend enforces the real rule through
/// `is_cancellable` / `can_request_cancellation`.
///
/// A missing `created_at` counts as outside the window. A present but
/// unreadable one does not disqualify the transaction: the age check only
/// rejects a date it can read.
pub fn can_cancel_transaction(tx: &BettingTransaction, now: DateTime<Utc>) -> bool {
    if matches!(tx.status, TransactionStatus::Cancelled | TransactionStatus::Failed) {
        return false;
    }

    if tx.cancellation_requested_at.is_some() {
        return false;
    }

    if tx.is_cancellable == Some(false) || tx.can_request_cancellation == Some(false) {
        return false;
    }

    match tx.created_at.as_deref() {
        None => false,
        Some(raw) => match parse_timestamp(raw) {
            Some(created_at) => now - created_at <= Duration::minutes(CANCELLATION_WINDOW_MINUTES),
            None => true,
        },
    }
}

/// Explain why the cancel action is not offered, for the command output
pub fn ineligibility_reason(tx: &BettingTransaction, now: DateTime<Utc>) -> Option<String> {
    if can_cancel_transaction(tx, now) {
        return None;
    }
    let reason = match tx.status {
        TransactionStatus::Cancelled => "la transaction est déjà annulée".to_string(),
        TransactionStatus::Failed => "la transaction a échoué".to_string(),
        _ if tx.cancellation_requested_at.is_some() => {
            "une annulation a déjà été demandée".to_string()
        }
        _ if tx.is_cancellable == Some(false) || tx.can_request_cancellation == Some(false) => {
            "le serveur refuse l'annulation de cette transaction".to_string()
        }
        _ if tx.created_at.is_none() => "la date de création est inconnue".to_string(),
        _ => format!(
            "le délai de {} minutes après la création est dépassé",
            CANCELLATION_WINDOW_MINUTES
        ),
    };
    Some(reason)
}

/// Reason to send from what the partner typed at the pre-filled prompt, or
/// `None` when the confirmation was declined
pub fn settle_reason(typed: Option<&str>, prefill: &str, confirmed: bool) -> Option<String> {
    if !confirmed {
        return None;
    }
    let reason = match typed.map(str::trim) {
        Some(typed) if !typed.is_empty() => typed,
        _ => prefill.trim(),
    };
    if reason.is_empty() {
        Some(DEFAULT_CANCELLATION_REASON.to_string())
    } else {
        Some(reason.to_string())
    }
}

/// Issue the single cancellation POST; no retry
pub async fn request_cancellation(
    client: &PartnerClient,
    uid: &str,
    reason: &str,
) -> Result<(), String> {
    let reason = if reason.trim().is_empty() {
        DEFAULT_CANCELLATION_REASON
    } else {
        reason.trim()
    };

    match client.request_cancellation(uid, reason).await {
        Ok(()) => {
            info!("Cancellation requested for betting transaction {}", uid);
            Ok(())
        }
        Err(e) => {
            warn!("Cancellation request for {} failed: {}", uid, e);
            Err(format!("❌ Annulation impossible: {}", e))
        }
    }
}
