use crate::commands::loading;
use crate::console::{read_line, Console};
use crate::services::auth_service;

pub async fn execute(console: &mut Console, args: &[&str]) -> Result<(), String> {
    let email = match args.first() {
        Some(email) => email.to_string(),
        None => read_line("Email: ")
            .await
            .ok_or("❌ Email requis".to_string())?,
    };
    let password = match args.get(1) {
        Some(password) => password.to_string(),
        None => read_line("Mot de passe: ")
            .await
            .ok_or("❌ Mot de passe requis".to_string())?,
    };

    loading("Connexion");
    let session = auth_service::login(&console.client, &email, &password).await?;
    let name = session.user.display_name();
    console.sign_in(session).await;

    println!("✅ Connecté en tant que {}", name);
    if !console.store.is_persistent() {
        println!("ℹ️ BLAFFA_SESSION_KEY absent: la session ne sera pas conservée après fermeture.");
    }
    Ok(())
}

pub async fn logout(console: &mut Console) -> Result<(), String> {
    if console.session.is_none() {
        return Err("ℹ️ Aucune session active".to_string());
    }
    console.sign_out().await;
    println!("👋 Déconnecté");
    Ok(())
}
