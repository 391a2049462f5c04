use crate::services::cancellation_service::CANCELLATION_WINDOW_MINUTES;
use crate::utils::get_cooldown_seconds;

pub fn execute(_args: &[&str]) -> Result<(), String> {
    let sections: [(&str, &str); 8] = [
        (
            "🔑 Session",
            "login <email> [mot de passe]   Se connecter (comptes partenaires)\n\
             logout                          Se déconnecter\n\
             profile [champ=valeur ...]      Voir / modifier le profil (prenom, nom, phone, email)",
        ),
        (
            "💰 Compte",
            "balance                         Solde et totaux du compte",
        ),
        (
            "📋 Transactions",
            "tx list [pN] [filtres]          Historique des transactions\n\
             tx new <deposit|withdrawal> <montant> <téléphone> <réseau> [objet]\n\
             networks                        Réseaux de paiement",
        ),
        (
            "🧾 Recharges",
            "recharge list [pN] [status=...] Demandes de recharge\n\
             recharge new <montant> <fichier preuve> <AAAA-MM-JJ> [description]",
        ),
        (
            "🎲 Paris",
            "platforms                       Plateformes disponibles\n\
             bet list [pN] [filtres]         Mes transactions de paris\n\
             bet verify <plateforme> <id joueur>\n\
             bet deposit <plateforme> <id joueur> <montant>\n\
             bet withdraw <plateforme> <id joueur> <code de retrait>\n\
             bet cancel <id> [motif]         Demander l'annulation",
        ),
        (
            "📈 Commissions",
            "commissions [stats|unpaid|rates|history [pN]]",
        ),
        (
            "💸 Transferts",
            "transfer <email|téléphone> <montant> [description]\n\
             transfer list [pN]              Mes transferts",
        ),
        (
            "🔄 Divers",
            "refresh                         Relancer la dernière liste\n\
             watch                           Suivre les statuts en temps réel (Ctrl-C pour arrêter)\n\
             quit                            Quitter",
        ),
    ];

    println!("📖 Blaffa Pay Partenaires - commandes\n");
    for (title, body) in sections {
        println!("{}", title);
        for line in body.lines() {
            println!("  {}", line.trim_start());
        }
        println!();
    }
    println!(
        "Filtres: search=<texte> type=deposit|withdrawal status=<statut> from=AAAA-MM-JJ to=AAAA-MM-JJ sort=[-]champ size=N"
    );
    println!(
        "Une annulation n'est proposée que dans les {} minutes suivant la création. \
         Les listes ne peuvent être relancées qu'après {} secondes.",
        CANCELLATION_WINDOW_MINUTES,
        get_cooldown_seconds()
    );
    Ok(())
}
