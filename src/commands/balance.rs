use crate::commands::loading;
use crate::console::Console;
use crate::services::account_service;

pub async fn execute(console: &mut Console, args: &[&str]) -> Result<(), String> {
    if args.first() == Some(&"help") {
        println!("💰 balance : solde, totaux et état du compte partenaire");
        return Ok(());
    }
    console.partner()?;

    loading("Chargement du compte");
    let account = account_service::get_account(&console.client).await?;
    println!("{}", account_service::render_account(&account));
    Ok(())
}
