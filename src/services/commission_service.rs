use crate::api::models::{CommissionPayment, CommissionRates, CommissionStats, UnpaidCommissions};
use crate::api::PartnerClient;
use crate::models::{ListQuery, Listing};
use crate::utils::{format_amount, format_datetime, short_id, Table};

pub async fn get_stats(client: &PartnerClient) -> Result<CommissionStats, String> {
    client
        .commission_stats()
        .await
        .map_err(|e| format!("Impossible de charger les commissions: {}", e))
}

pub async fn get_unpaid(client: &PartnerClient) -> Result<UnpaidCommissions, String> {
    client
        .unpaid_commissions()
        .await
        .map_err(|e| format!("Impossible de charger les commissions impayées: {}", e))
}

pub async fn get_rates(client: &PartnerClient) -> Result<CommissionRates, String> {
    client
        .commission_rates()
        .await
        .map_err(|e| format!("Impossible de charger les taux: {}", e))
}

pub async fn get_payment_history(
    client: &PartnerClient,
    query: &ListQuery,
) -> Result<Listing<CommissionPayment>, String> {
    let response = client
        .commission_payments(&query.to_query_pairs())
        .await
        .map_err(|e| format!("Impossible de charger l'historique: {}", e))?;
    Ok(Listing::from_response(response, query))
}

pub fn render_stats(stats: &CommissionStats) -> String {
    let mut out = String::from("📈 Commissions\n");
    out.push_str(&format!("  Transactions : {}\n", stats.total_transactions));
    out.push_str(&format!("  Total        : {}\n", format_amount(stats.total_commission)));
    out.push_str(&format!("  Payées       : {}\n", format_amount(stats.paid_commission)));
    out.push_str(&format!("  Impayées     : {}\n", format_amount(stats.unpaid_commission)));

    if !stats.by_platform.is_empty() {
        let mut table = Table::new(vec!["Plateforme", "Transactions", "Commission"]);
        for p in &stats.by_platform {
            table.add_row(vec![
                p.platform_name.clone(),
                p.transaction_count.to_string(),
                format_amount(p.total_commission),
            ]);
        }
        out.push('\n');
        out.push_str(&table.render());
    }
    out
}

pub fn render_unpaid(unpaid: &UnpaidCommissions) -> String {
    let mut out = format!(
        "💸 Commissions impayées: {} sur {} transaction(s)\n",
        format_amount(unpaid.total_unpaid_amount),
        unpaid.transaction_count
    );
    if unpaid.transactions.is_empty() {
        return out;
    }

    let mut table = Table::new(vec!["ID", "Plateforme", "Type", "Montant", "Commission", "Date"]);
    for tx in &unpaid.transactions {
        table.add_row(vec![
            short_id(&tx.uid),
            tx.platform_name.clone().unwrap_or_else(|| "-".to_string()),
            tx.transaction_type.label().to_string(),
            format_amount(tx.amount),
            tx.commission_amount.map(format_amount).unwrap_or_else(|| "-".to_string()),
            format_datetime(tx.created_at.as_deref()),
        ]);
    }
    out.push('\n');
    out.push_str(&table.render());
    out
}

pub fn render_rates(rates: &CommissionRates) -> String {
    let mut out = String::from("📊 Taux de commission actuels\n");
    out.push_str(&format!("  Dépôts   : {:.2}%\n", rates.deposit_rate));
    out.push_str(&format!("  Retraits : {:.2}%\n", rates.withdrawal_rate));
    if rates.updated_at.is_some() {
        out.push_str(&format!(
            "  Mis à jour le {}\n",
            format_datetime(rates.updated_at.as_deref())
        ));
    }
    out
}

pub fn render_payment_history(listing: &Listing<CommissionPayment>) -> String {
    if listing.is_empty() {
        return "🧾 Aucun paiement de commission".to_string();
    }

    let mut table = Table::new(vec!["ID", "Montant", "Transactions", "Période", "Payé le"])
        .with_title("🧾 Paiements de commissions");
    for p in &listing.items {
        let period = match (&p.period_start, &p.period_end) {
            (Some(start), Some(end)) => format!(
                "{} → {}",
                format_datetime(Some(start)),
                format_datetime(Some(end))
            ),
            _ => "-".to_string(),
        };
        table.add_row(vec![
            short_id(&p.uid),
            format_amount(p.amount),
            p.transaction_count.map(|c| c.to_string()).unwrap_or_else(|| "-".to_string()),
            period,
            format_datetime(p.paid_at.as_deref()),
        ]);
    }
    let mut out = table.render();
    out.push_str(&listing.page.footer());
    out
}
