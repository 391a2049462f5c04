use crate::commands::{invalidate, loading};
use crate::console::{confirm, Console};
use crate::models::ListQuery;
use crate::services::transfer_service;
use crate::utils::{format_amount, parse_amount};

const USAGE: &str = "💸 Transferts\n\
    Usage:\n  \
    transfer <email|téléphone> <montant> [description]\n  \
    transfer list [pN]\n\
    Exemples:\n  \
    transfer awa@exemple.com 10000 Avance\n  \
    transfer list p2";

pub async fn execute(console: &mut Console, args: &[&str]) -> Result<(), String> {
    if args.is_empty() || args[0] == "help" {
        println!("{}", USAGE);
        return Ok(());
    }
    let session = console.partner()?.clone();

    if args[0].eq_ignore_ascii_case("list") {
        let query = ListQuery::from_args(&args[1..], console.settings.page_size)?;
        loading("Chargement des transferts");
        let listing = transfer_service::list_transfers(&console.client, &query).await?;
        println!("{}", transfer_service::render_transfer_page(&listing));
        return Ok(());
    }

    if args.len() < 2 {
        return Err(format!("❌ Montant manquant\n{}", USAGE));
    }
    let recipient = args[0];
    let amount = parse_amount(args[1])?;
    let description = if args.len() > 2 {
        Some(args[2..].join(" "))
    } else {
        None
    };

    if !confirm(&format!("Transférer {} à {} ?", format_amount(amount), recipient)).await {
        println!("Transfert abandonné");
        return Ok(());
    }

    loading("Transfert en cours");
    let transfer =
        transfer_service::execute_transfer(&console.client, &session, recipient, amount, description)
            .await?;
    invalidate(&["balance", "transfer"]).await;
    println!("{}", transfer_service::render_transfer_receipt(&transfer));
    Ok(())
}
