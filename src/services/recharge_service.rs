use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::api::models::{NewTopup, TopupRequest, TopupStatus};
use crate::api::PartnerClient;
use crate::models::{ListQuery, Listing};
use crate::utils::format::format_time_remaining;
use crate::utils::{format_amount, format_datetime, parse_date, Table};

const MAX_PROOF_BYTES: u64 = 5 * 1024 * 1024;
const PROOF_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "webp", "pdf"];

pub async fn list_recharges(
    client: &PartnerClient,
    query: &ListQuery,
) -> Result<Listing<TopupRequest>, String> {
    let response = client
        .list_recharges(&query.to_query_pairs())
        .await
        .map_err(|e| format!("Impossible de charger les recharges: {}", e))?;
    Ok(Listing::from_response(response, query))
}

/// Check the proof file before uploading it
pub async fn validate_proof(path: &Path) -> Result<(), String> {
    let extension = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    if !PROOF_EXTENSIONS.contains(&extension.as_str()) {
        return Err(format!(
            "❌ Format de preuve non supporté ({}). Formats acceptés: {}",
            path.display(),
            PROOF_EXTENSIONS.join(", ")
        ));
    }

    let metadata = tokio::fs::metadata(path)
        .await
        .map_err(|e| format!("❌ Preuve introuvable {}: {}", path.display(), e))?;
    if !metadata.is_file() {
        return Err(format!("❌ {} n'est pas un fichier", path.display()));
    }
    if metadata.len() > MAX_PROOF_BYTES {
        return Err("❌ La preuve dépasse 5 Mo".to_string());
    }
    Ok(())
}

pub async fn create_recharge(
    client: &PartnerClient,
    amount: f64,
    proof_image: PathBuf,
    transaction_date: &str,
    proof_description: String,
) -> Result<TopupRequest, String> {
    let date = parse_date(transaction_date)?;
    if date > Utc::now().date_naive() {
        return Err("❌ La date du paiement ne peut pas être dans le futur".to_string());
    }
    validate_proof(&proof_image).await?;

    let topup = NewTopup {
        amount,
        proof_image,
        proof_description,
        transaction_date: date.format("%Y-%m-%d").to_string(),
    };

    let created = client
        .create_recharge(&topup)
        .await
        .map_err(|e| format!("❌ Demande de recharge refusée: {}", e))?;
    info!("Top-up request {} submitted for {}", created.uid, created.amount);
    Ok(created)
}

pub fn render_recharge_page(listing: &Listing<TopupRequest>, now: DateTime<Utc>) -> String {
    if listing.is_empty() {
        return "🧾 Aucune demande de recharge".to_string();
    }

    let mut table = Table::new(vec!["Référence", "Montant", "Statut", "Expire dans", "Créée le"])
        .with_title("🧾 Demandes de recharge");
    for topup in &listing.items {
        let expiry = if topup.status == TopupStatus::Pending {
            format_time_remaining(topup.expires_at.as_deref(), now)
        } else {
            "-".to_string()
        };
        table.add_row(vec![
            topup.reference.clone().unwrap_or_else(|| topup.uid.clone()),
            format_amount(topup.amount),
            topup.status.label().to_string(),
            expiry,
            format_datetime(topup.created_at.as_deref()),
        ]);
    }

    let mut out = table.render();
    if !listing.filters.is_empty() {
        out.push_str(&format!("Filtres: {}\n", listing.filters));
    }
    out.push_str(&listing.page.footer());
    out
}

pub fn render_recharge_receipt(topup: &TopupRequest, now: DateTime<Utc>) -> String {
    let mut out = String::from("🧾 Demande de recharge envoyée\n");
    out.push_str(&format!("  Référence : {}\n", topup.reference.as_deref().unwrap_or(&topup.uid)));
    out.push_str(&format!("  Montant   : {}\n", format_amount(topup.amount)));
    out.push_str(&format!("  Statut    : {}\n", topup.status.label()));
    if let Some(date) = &topup.transaction_date {
        out.push_str(&format!("  Payé le   : {}\n", date));
    }
    if let Some(desc) = &topup.proof_description {
        out.push_str(&format!("  Preuve    : {}\n", desc));
    }
    if topup.expires_at.is_some() {
        out.push_str(&format!(
            "  Expire dans: {}\n",
            format_time_remaining(topup.expires_at.as_deref(), now)
        ));
    }
    if let Some(reason) = &topup.rejection_reason {
        out.push_str(&format!("  Motif du rejet: {}\n", reason));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ListResponse;
    use chrono::TimeZone;
    use serde_json::json;

    #[tokio::test]
    async fn test_validate_proof_rejects_bad_files() {
        assert!(validate_proof(&PathBuf::from("recu.txt")).await.is_err());
        assert!(validate_proof(&PathBuf::from("/definitely/missing/recu.png"))
            .await
            .unwrap_err()
            .contains("introuvable"));

        let path = std::env::temp_dir().join(format!("blaffa-proof-{}.png", std::process::id()));
        tokio::fs::write(&path, b"\x89PNG").await.unwrap();
        assert!(validate_proof(&path).await.is_ok());
        let _ = tokio::fs::remove_file(&path).await;
    }

    #[test]
    fn test_render_countdown_only_for_pending() {
        let now = Utc.with_ymd_and_hms(2026, 10, 19, 10, 0, 0).unwrap();
        let items: ListResponse<TopupRequest> = serde_json::from_value(json!([
            {"uid": "r1", "reference": "RCH-1", "amount": "10000", "status": "pending",
             "expires_at": "2026-10-19T10:30:00Z"},
            {"uid": "r2", "reference": "RCH-2", "amount": 500, "status": "approved",
             "expires_at": "2026-10-19T10:30:00Z"}
        ]))
        .unwrap();
        let listing = Listing::from_response(items, &ListQuery::new(10));
        let out = render_recharge_page(&listing, now);
        assert!(out.contains("30 min 00 s"));
        assert_eq!(out.matches("30 min").count(), 1);
        assert!(out.contains("Approuvée"));
    }
}
