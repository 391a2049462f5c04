use crate::api::models::Account;
use crate::api::PartnerClient;
use crate::utils::{format_amount, format_datetime};

pub async fn get_account(client: &PartnerClient) -> Result<Account, String> {
    client
        .get_account()
        .await
        .map_err(|e| format!("Impossible de charger le compte: {}", e))
}

pub fn render_account(account: &Account) -> String {
    let balance = account
        .formatted_balance
        .clone()
        .unwrap_or_else(|| format_amount(account.balance));

    let state = match (account.is_active, account.is_frozen) {
        (_, true) => "🧊 Gelé",
        (true, false) => "✅ Actif",
        (false, false) => "⛔ Inactif",
    };

    let mut out = String::from("💰 Compte partenaire\n");
    out.push_str(&format!("  Solde             : {}\n", balance));
    out.push_str(&format!("  État              : {}\n", state));
    out.push_str(&format!("  Total rechargé    : {}\n", format_amount(account.total_recharged)));
    out.push_str(&format!("  Total déposé      : {}\n", format_amount(account.total_deposited)));
    out.push_str(&format!("  Total retiré      : {}\n", format_amount(account.total_withdrawn)));
    if let Some(rate) = account.utilization_rate {
        out.push_str(&format!("  Taux d'utilisation: {:.1}%\n", rate));
    }
    out.push_str(&format!(
        "  Dernière opération: {}\n",
        format_datetime(account.last_transaction_at.as_deref())
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_render_prefers_server_formatting() {
        let account: Account = serde_json::from_value(json!({
            "balance": "2500",
            "formatted_balance": "2 500,00 FCFA",
            "is_frozen": true,
            "utilization_rate": 42.25
        }))
        .unwrap();
        let out = render_account(&account);
        assert!(out.contains("2 500,00 FCFA"));
        assert!(out.contains("Gelé"));
        assert!(out.contains("42.2%") || out.contains("42.3%"));
    }

    #[test]
    fn test_render_formats_numeric_balance() {
        let account: Account = serde_json::from_value(json!({"balance": 12000})).unwrap();
        let out = render_account(&account);
        assert!(out.contains("12 000 FCFA"));
        assert!(out.contains("Actif"));
    }
}
