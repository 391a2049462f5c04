use crate::commands::loading;
use crate::console::Console;
use crate::services::auth_service;

pub async fn execute(console: &mut Console, args: &[&str]) -> Result<(), String> {
    console.partner()?;

    let user = if args.is_empty() {
        loading("Chargement du profil");
        auth_service::get_profile(&console.client).await?
    } else {
        let update = auth_service::parse_profile_update(args)?;
        loading("Mise à jour du profil");
        let user = auth_service::update_profile(&console.client, &update).await?;
        println!("✅ Profil mis à jour");
        user
    };

    // Keep the cached user in sync; the partner flag comes from the server
    if let Some(session) = console.session.as_mut() {
        session.user = user.clone();
        if let Err(e) = console.store.save(session).await {
            tracing::warn!("Could not persist refreshed profile: {}", e);
        }
    }

    println!("{}", auth_service::render_profile(&user));
    Ok(())
}
