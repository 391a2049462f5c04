use tracing::{info, warn};

use crate::api::models::{ProfileUpdate, User};
use crate::api::PartnerClient;
use crate::session::Session;

/// Sign in and keep the session only for partner accounts
pub async fn login(client: &PartnerClient, email: &str, password: &str) -> Result<Session, String> {
    if email.trim().is_empty() || password.is_empty() {
        return Err("❌ Email et mot de passe requis".to_string());
    }

    let response = client
        .login(email.trim(), password)
        .await
        .map_err(|e| format!("❌ Connexion échouée: {}", e))?;

    if !response.user.is_partner {
        warn!("Login refused for non-partner account {}", email);
        return Err("🔒 Accès réservé aux comptes partenaires".to_string());
    }

    info!("Partner {} signed in", response.user.display_name());
    Ok(Session::from_login(response))
}

pub async fn get_profile(client: &PartnerClient) -> Result<User, String> {
    client
        .get_profile()
        .await
        .map_err(|e| format!("Impossible de charger le profil: {}", e))
}

/// Parse `field=value` pairs for a profile update
pub fn parse_profile_update(args: &[&str]) -> Result<ProfileUpdate, String> {
    let mut update = ProfileUpdate::default();
    for arg in args {
        let (key, value) = arg
            .split_once('=')
            .ok_or_else(|| format!("❌ Attendu champ=valeur, reçu '{}'", arg))?;
        let value = value.trim().to_string();
        if value.is_empty() {
            return Err(format!("❌ Valeur vide pour '{}'", key));
        }
        match key {
            "first_name" | "prenom" => update.first_name = Some(value),
            "last_name" | "nom" => update.last_name = Some(value),
            "phone" | "telephone" => update.phone = Some(value),
            "email" => {
                if !value.contains('@') {
                    return Err(format!("❌ Email invalide: {}", value));
                }
                update.email = Some(value)
            }
            other => return Err(format!("❌ Champ non modifiable: '{}'", other)),
        }
    }
    if update.is_empty() {
        return Err("❌ Rien à modifier".to_string());
    }
    Ok(update)
}

pub async fn update_profile(client: &PartnerClient, update: &ProfileUpdate) -> Result<User, String> {
    client
        .update_profile(update)
        .await
        .map_err(|e| format!("❌ Mise à jour refusée: {}", e))
}

pub fn render_profile(user: &User) -> String {
    let mut out = String::from("👤 Profil\n");
    out.push_str(&format!("  Nom       : {}\n", user.display_name()));
    out.push_str(&format!("  Email     : {}\n", user.email.as_deref().unwrap_or("-")));
    out.push_str(&format!("  Téléphone : {}\n", user.phone.as_deref().unwrap_or("-")));
    out.push_str(&format!(
        "  Partenaire: {}\n",
        if user.is_partner { "oui" } else { "non" }
    ));
    out
}
