use tracing::info;

use crate::api::models::{NewTransfer, Transfer};
use crate::api::PartnerClient;
use crate::models::{ListQuery, Listing};
use crate::session::Session;
use crate::utils::{format_amount, format_datetime, Table};

/// Send funds to another user, identified by email or phone
pub async fn execute_transfer(
    client: &PartnerClient,
    session: &Session,
    recipient: &str,
    amount: f64,
    description: Option<String>,
) -> Result<Transfer, String> {
    let recipient = recipient.trim();
    if recipient.is_empty() {
        return Err("❌ Destinataire manquant".to_string());
    }

    // Prevent self transfer
    let is_self = session.user.email.as_deref().map(|e| e.eq_ignore_ascii_case(recipient)) == Some(true)
        || session.user.phone.as_deref() == Some(recipient);
    if is_self {
        return Err("❌ Impossible de vous transférer des fonds à vous-même".to_string());
    }

    let body = NewTransfer {
        recipient: recipient.to_string(),
        amount,
        description,
    };
    let transfer = client
        .create_transfer(&body)
        .await
        .map_err(|e| format!("❌ Transfert refusé: {}", e))?;

    info!("Transfer {} of {} to {}", transfer.uid, amount, recipient);
    Ok(transfer)
}

pub async fn list_transfers(
    client: &PartnerClient,
    query: &ListQuery,
) -> Result<Listing<Transfer>, String> {
    let response = client
        .list_transfers(&query.to_query_pairs())
        .await
        .map_err(|e| format!("Impossible de charger les transferts: {}", e))?;
    Ok(Listing::from_response(response, query))
}

pub fn render_transfer_receipt(transfer: &Transfer) -> String {
    let mut out = String::from("💸 Transfert effectué\n");
    out.push_str(&format!(
        "  Référence   : {}\n",
        transfer.reference.as_deref().unwrap_or(&transfer.uid)
    ));
    if let Some(receiver) = &transfer.receiver_name {
        out.push_str(&format!("  Destinataire: {}\n", receiver));
    }
    out.push_str(&format!("  Montant     : {}\n", format_amount(transfer.amount)));
    if let Some(fees) = transfer.fees {
        out.push_str(&format!("  Frais       : {}\n", format_amount(fees)));
    }
    if let Some(status) = &transfer.status {
        out.push_str(&format!("  Statut      : {}\n", status.label()));
    }
    if let Some(description) = transfer.description.as_deref().filter(|d| !d.trim().is_empty()) {
        out.push_str(&format!("  Motif       : {}\n", description.trim()));
    }
    out
}

pub fn render_transfer_page(listing: &Listing<Transfer>) -> String {
    if listing.is_empty() {
        return "💸 Aucun transfert".to_string();
    }
    let mut table = Table::new(vec!["Référence", "De", "À", "Montant", "Statut", "Motif", "Date"])
        .with_title("💸 Mes transferts");
    for t in &listing.items {
        table.add_row(vec![
            t.reference.clone().unwrap_or_else(|| t.uid.clone()),
            t.sender_name.clone().unwrap_or_else(|| "-".to_string()),
            t.receiver_name.clone().unwrap_or_else(|| "-".to_string()),
            format_amount(t.amount),
            t.status.as_ref().map(|s| s.label().to_string()).unwrap_or_else(|| "-".to_string()),
            t.description
                .as_deref()
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .unwrap_or("-")
                .to_string(),
            format_datetime(t.created_at.as_deref()),
        ]);
    }
    let mut out = table.render();
    out.push_str(&listing.page.footer());
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::LoginResponse;
    use serde_json::json;
    use std::time::Duration;

    fn session() -> Session {
        let login: LoginResponse = serde_json::from_value(json!({
            "access": "a",
            "user": {"id": 3, "email": "me@blaffa.net", "phone": "+22501010101", "is_partner": true}
        }))
        .unwrap();
        Session::from_login(login)
    }

    #[tokio::test]
    async fn test_self_transfer_is_rejected_before_any_request() {
        // Unroutable base URL: reaching the network would fail differently
        let client = PartnerClient::new("http://127.0.0.1:9", Duration::from_millis(50)).unwrap();
        let err = execute_transfer(&client, &session(), "ME@blaffa.net", 10.0, None)
            .await
            .unwrap_err();
        assert!(err.contains("vous-même"));
        let err = execute_transfer(&client, &session(), "+22501010101", 10.0, None)
            .await
            .unwrap_err();
        assert!(err.contains("vous-même"));
        assert!(execute_transfer(&client, &session(), "  ", 10.0, None)
            .await
            .unwrap_err()
            .contains("manquant"));
    }

    #[test]
    fn test_render_receipt() {
        let transfer: Transfer = serde_json::from_value(json!({
            "uid": "tr1", "amount": "2500", "fees": 25, "receiver_name": "Awa", "status": "completed"
        }))
        .unwrap();
        let out = render_transfer_receipt(&transfer);
        assert!(out.contains("Awa"));
        assert!(out.contains("2 500 FCFA"));
        assert!(out.contains("Réussi"));
        assert!(!out.contains("Motif"));
    }

    #[test]
    fn test_description_shown_on_receipt_and_history() {
        let transfer: Transfer = serde_json::from_value(json!({
            "uid": "tr2", "amount": 1000, "description": " Avance sur salaire ", "status": "completed"
        }))
        .unwrap();
        assert!(render_transfer_receipt(&transfer).contains("Motif       : Avance sur salaire\n"));

        let listing = Listing {
            items: vec![transfer],
            page: crate::utils::Page::new(1, 20, 1),
            filters: String::new(),
        };
        assert!(render_transfer_page(&listing).contains("Avance sur salaire"));
    }
}
