use crate::commands::loading;
use crate::console::Console;
use crate::services::network_service;

pub async fn execute(console: &mut Console) -> Result<(), String> {
    console.partner()?;
    loading("Chargement des réseaux");
    let networks = network_service::list_networks(&console.client).await?;
    println!("{}", network_service::render_networks(&networks));
    Ok(())
}
