use tracing::info;

use crate::api::models::{NewTransaction, Transaction};
use crate::api::{PartnerClient, TransactionType};
use crate::models::{ListQuery, Listing};
use crate::services::network_service;
use crate::utils::{format_amount, format_datetime, Table};

/// Fetch one page of account transactions; filtering is done server side
pub async fn list_transactions(
    client: &PartnerClient,
    query: &ListQuery,
) -> Result<Listing<Transaction>, String> {
    let response = client
        .list_transactions(&query.to_query_pairs())
        .await
        .map_err(|e| format!("Impossible de charger les transactions: {}", e))?;

    let listing = Listing::from_response(response, query);
    if listing.page.is_out_of_range() {
        return Err(format!(
            "❌ Page invalide. Cette liste compte {} page(s)",
            listing.page.total_pages()
        ));
    }
    Ok(listing)
}

/// Create a deposit or withdrawal towards a mobile-money number
pub async fn create_transaction(
    client: &PartnerClient,
    kind: TransactionType,
    amount: f64,
    recipient_phone: &str,
    network: &str,
    objet: Option<String>,
) -> Result<Transaction, String> {
    let phone = normalize_phone(recipient_phone)?;

    let networks = network_service::list_networks(client).await?;
    let network = network_service::resolve_network(&networks, network)?;

    let body = NewTransaction {
        kind,
        amount,
        recipient_phone: phone,
        network: network.uid.clone(),
        objet,
    };

    let tx = client
        .create_transaction(&body)
        .await
        .map_err(|e| format!("❌ Transaction refusée: {}", e))?;

    info!("Created {} transaction {} for {}", tx.kind.as_str(), tx.uid, tx.amount);
    Ok(tx)
}

/// Keep digits and a leading `+`; at least 8 digits
pub fn normalize_phone(raw: &str) -> Result<String, String> {
    let trimmed = raw.trim();
    let mut phone = String::new();
    for (i, c) in trimmed.chars().enumerate() {
        if c.is_ascii_digit() || (i == 0 && c == '+') {
            phone.push(c);
        } else if c == ' ' || c == '-' || c == '.' {
            continue;
        } else {
            return Err(format!("❌ Numéro invalide: {}", raw));
        }
    }
    if phone.chars().filter(|c| c.is_ascii_digit()).count() < 8 {
        return Err(format!("❌ Numéro trop court: {}", raw));
    }
    Ok(phone)
}

pub fn render_transaction_page(listing: &Listing<Transaction>) -> String {
    if listing.is_empty() {
        return "📋 Aucune transaction trouvée".to_string();
    }

    let mut table = Table::new(vec!["Référence", "Type", "Montant", "Statut", "Destinataire", "Date"])
        .with_title("📋 Transactions");
    for tx in &listing.items {
        let recipient = tx
            .display_recipient_name
            .clone()
            .or_else(|| tx.recipient_phone.clone())
            .unwrap_or_else(|| "-".to_string());
        table.add_row(vec![
            tx.reference.clone().unwrap_or_else(|| tx.uid.clone()),
            tx.kind.label().to_string(),
            format_amount(tx.amount),
            tx.status.label().to_string(),
            recipient,
            format_datetime(tx.created_at.as_deref()),
        ]);
    }

    let mut out = table.render();
    if !listing.filters.is_empty() {
        out.push_str(&format!("Filtres: {}\n", listing.filters));
    }
    out.push_str(&listing.page.footer());
    out
}

pub fn render_transaction_receipt(tx: &Transaction) -> String {
    let mut out = String::from("📜 Transaction\n");
    out.push_str(&format!("  Référence : {}\n", tx.reference.as_deref().unwrap_or(&tx.uid)));
    out.push_str(&format!("  Type      : {}\n", tx.kind.label()));
    out.push_str(&format!("  Montant   : {}\n", format_amount(tx.amount)));
    if let Some(fees) = tx.fees {
        out.push_str(&format!("  Frais     : {}\n", format_amount(fees)));
    }
    out.push_str(&format!("  Statut    : {}\n", tx.status.label()));
    if let Some(phone) = &tx.recipient_phone {
        out.push_str(&format!("  Numéro    : {}\n", phone));
    }
    if let Some(network) = &tx.network_name {
        out.push_str(&format!("  Réseau    : {}\n", network));
    }
    if let (Some(before), Some(after)) = (tx.balance_before, tx.balance_after) {
        out.push_str(&format!(
            "  Solde     : {} → {}\n",
            format_amount(before),
            format_amount(after)
        ));
    }
    out.push_str(&format!("  Date      : {}\n", format_datetime(tx.created_at.as_deref())));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ListResponse;
    use serde_json::json;

    #[test]
    fn test_normalize_phone() {
        assert_eq!(normalize_phone("+225 07 00-00.00 00").unwrap(), "+2250700000000");
        assert!(normalize_phone("07a0000000").is_err());
        assert!(normalize_phone("1234").is_err());
        assert!(normalize_phone("22+50700000000").is_err());
    }

    #[test]
    fn test_render_page() {
        let response: ListResponse<Transaction> = serde_json::from_value(json!({
            "count": 15,
            "next": "x",
            "previous": null,
            "results": [{
                "uid": "t1",
                "reference": "DEP-001",
                "type": "deposit",
                "amount": "1500.00",
                "status": "success",
                "recipient_phone": "+22507000000"
            }]
        }))
        .unwrap();
        let query = ListQuery::from_args(&["type=deposit"], 10).unwrap();
        let listing = Listing::from_response(response, &query);

        let out = render_transaction_page(&listing);
        assert!(out.contains("DEP-001"));
        assert!(out.contains("1 500 FCFA"));
        assert!(out.contains("Réussi"));
        assert!(out.contains("Filtres: type deposit"));
        assert!(out.ends_with("Page 1/2 (15 au total) · suivante: p2"));
    }

    #[test]
    fn test_render_receipt_with_balances() {
        let tx: Transaction = serde_json::from_value(json!({
            "uid": "t9",
            "type": "withdrawal",
            "amount": 700,
            "status": "pending",
            "balance_before": "1000",
            "balance_after": "300"
        }))
        .unwrap();
        let out = render_transaction_receipt(&tx);
        assert!(out.contains("Retrait"));
        assert!(out.contains("1 000 FCFA → 300 FCFA"));
        assert!(out.contains("Référence : t9"));
    }
}
