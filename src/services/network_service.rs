use crate::api::models::Network;
use crate::api::PartnerClient;
use crate::utils::Table;

/// Active networks only; inactive ones cannot receive transactions
pub async fn list_networks(client: &PartnerClient) -> Result<Vec<Network>, String> {
    let networks = client
        .list_networks()
        .await
        .map_err(|e| format!("Impossible de charger les réseaux: {}", e))?
        .into_items();
    Ok(networks.into_iter().filter(|n| n.is_active).collect())
}

/// Match a network by uid, code or name (case-insensitive)
pub fn resolve_network<'a>(networks: &'a [Network], needle: &str) -> Result<&'a Network, String> {
    let needle_lower = needle.to_lowercase();
    networks
        .iter()
        .find(|n| n.uid == needle)
        .or_else(|| {
            networks.iter().find(|n| {
                n.code.as_deref().map(str::to_lowercase).as_deref() == Some(needle_lower.as_str())
                    || n.name.to_lowercase() == needle_lower
            })
        })
        .ok_or_else(|| format!("❌ Réseau inconnu: '{}'. Voir `networks`.", needle))
}

pub fn render_networks(networks: &[Network]) -> String {
    if networks.is_empty() {
        return "📡 Aucun réseau disponible".to_string();
    }
    let mut table = Table::new(vec!["Code", "Nom", "Pays", "UID"]).with_title("📡 Réseaux de paiement");
    for n in networks {
        table.add_row(vec![
            n.code.clone().unwrap_or_else(|| "-".to_string()),
            n.name.clone(),
            n.country_name.clone().unwrap_or_else(|| "-".to_string()),
            n.uid.clone(),
        ]);
    }
    table.render()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn networks() -> Vec<Network> {
        serde_json::from_value(json!([
            {"uid": "n-mtn", "name": "MTN Money", "code": "MTN"},
            {"uid": "n-orange", "nom": "Orange Money", "code": "orange"}
        ]))
        .unwrap()
    }

    #[test]
    fn test_resolve_by_uid_code_or_name() {
        let list = networks();
        assert_eq!(resolve_network(&list, "n-orange").unwrap().code.as_deref(), Some("orange"));
        assert_eq!(resolve_network(&list, "mtn").unwrap().uid, "n-mtn");
        assert_eq!(resolve_network(&list, "orange money").unwrap().uid, "n-orange");
        assert!(resolve_network(&list, "wave").is_err());
    }

    #[test]
    fn test_render() {
        let out = render_networks(&networks());
        assert!(out.contains("MTN Money"));
        assert_eq!(render_networks(&[]), "📡 Aucun réseau disponible");
    }
}
