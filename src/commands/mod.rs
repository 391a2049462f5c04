pub mod help;
pub mod login;
pub mod profile;
pub mod balance;
pub mod transaction;
pub mod recharge;
pub mod networks;
pub mod betting;
pub mod commission;
pub mod transfer;
pub mod watch;

use tracing::debug;

use crate::console::Console;
use crate::utils::{check_cooldown, clear_cooldown};

/// What the console loop should do after a line
#[derive(Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Printed while a request is in flight
pub fn loading(what: &str) {
    println!("⏳ {}...", what);
}

/// Lift the cooldown on lists whose data just changed
pub async fn invalidate(commands: &[&str]) {
    for command in commands {
        clear_cooldown(command).await;
    }
}

/// Command name with aliases folded, so `bal` and `balance` share state
fn canonical(command: &str) -> &str {
    match command {
        "bal" | "account" => "balance",
        "transactions" => "tx",
        "recharges" | "topup" => "recharge",
        "com" => "commissions",
        "transfers" => "transfer",
        "me" => "profile",
        "h" | "?" => "help",
        "exit" | "q" => "quit",
        "r" => "refresh",
        other => other,
    }
}

/// Read-only commands that are remembered for `refresh` and throttled
fn is_listing(command: &str, args: &[&str]) -> bool {
    match canonical(command) {
        "balance" | "networks" | "platforms" | "commissions" => true,
        "tx" | "recharge" | "bet" | "transfer" => {
            args.first().map(|a| a.eq_ignore_ascii_case("list")) == Some(true)
        }
        _ => false,
    }
}

/// Cooldown key: canonical command, then the arguments as typed
///
/// Starting with the command name lets `clear_cooldown("tx")` reach every
/// `tx list ...` variant.
fn cooldown_key(command: &str, args: &[&str]) -> String {
    let mut key = canonical(command).to_string();
    for arg in args {
        key.push(' ');
        key.push_str(&arg.to_lowercase());
    }
    key
}

pub async fn handle_line(console: &mut Console, line: &str) -> Flow {
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.is_empty() {
        return Flow::Continue;
    }

    let command = parts[0].to_lowercase();
    if canonical(command.trim_start_matches('$')) == "refresh" {
        // Re-issue the same fetch; the cooldown only guards typed repeats
        return match console.last_listing.clone() {
            Some(previous) => {
                debug!("Refreshing: {}", previous);
                let previous_parts: Vec<&str> = previous.split_whitespace().collect();
                dispatch(console, &previous_parts, false).await
            }
            None => {
                println!("ℹ️ Rien à rafraîchir pour l'instant");
                Flow::Continue
            }
        };
    }

    dispatch(console, &parts, true).await
}

async fn dispatch(console: &mut Console, parts: &[&str], throttle: bool) -> Flow {
    let Some(first) = parts.first() else {
        return Flow::Continue;
    };
    let command = first.to_lowercase();
    let command = canonical(command.trim_start_matches('$'));
    let args = &parts[1..];

    let listing = is_listing(command, args);
    if listing && throttle {
        if let Err(remaining) = check_cooldown(&cooldown_key(command, args)).await {
            println!(
                "⏳ Patientez {} seconde(s) avant de relancer cette commande.",
                remaining
            );
            return Flow::Continue;
        }
    }

    let result = match command {
        "quit" => return Flow::Quit,
        "help" => help::execute(args),
        "login" => login::execute(console, args).await,
        "logout" => login::logout(console).await,
        "profile" => profile::execute(console, args).await,
        "balance" => balance::execute(console, args).await,
        "tx" => transaction::execute(console, args).await,
        "recharge" => recharge::execute(console, args).await,
        "networks" => networks::execute(console).await,
        "platforms" => betting::platforms(console).await,
        "bet" => betting::execute(console, args).await,
        "commissions" => commission::execute(console, args).await,
        "transfer" => transfer::execute(console, args).await,
        "watch" => watch::execute(console).await,
        other => Err(format!("❓ Commande inconnue: '{}'. Tapez `help`.", other)),
    };

    match result {
        Ok(()) => {
            if listing {
                console.last_listing = Some(parts.join(" "));
            }
        }
        Err(e) => {
            debug!("Error executing command {}: {}", command, e);
            eprintln!("\n⚠️  Erreur\n{}\n", e);
        }
    }

    Flow::Continue
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{partner_console, StubServer};

    #[test]
    fn test_listing_detection() {
        assert!(is_listing("balance", &[]));
        assert!(is_listing("tx", &["list", "p2"]));
        assert!(is_listing("bet", &["LIST"]));
        assert!(!is_listing("tx", &["new", "deposit"]));
        assert!(!is_listing("bet", &["cancel", "abc"]));
        assert!(!is_listing("login", &["a@b.c"]));
        assert!(is_listing("bal", &[]));
        assert!(is_listing("transactions", &["list"]));
    }

    #[test]
    fn test_cooldown_key_folds_aliases() {
        assert_eq!(cooldown_key("bal", &[]), "balance");
        assert_eq!(cooldown_key("account", &[]), "balance");
        assert_eq!(cooldown_key("transactions", &["LIST", "p2"]), "tx list p2");
        assert_eq!(canonical("r"), "refresh");
    }

    #[tokio::test]
    async fn test_invalidate_reaches_filtered_lists() {
        let key = cooldown_key("tx", &["list", "p2", "type=deposit"]);
        assert!(check_cooldown(&key).await.is_ok());
        assert!(check_cooldown(&key).await.is_err());
        invalidate(&["tx"]).await;
        assert!(check_cooldown(&key).await.is_ok());
    }

    #[tokio::test]
    async fn test_refresh_refetches_inside_cooldown() {
        let server = StubServer::start(vec![(
            "GET",
            "/api/payments/networks/",
            200,
            r#"[{"uid": "n1", "name": "MTN Money", "code": "mtn"}]"#.to_string(),
        )])
        .await;
        let mut console = partner_console(&server.url).await;

        assert_eq!(handle_line(&mut console, "networks").await, Flow::Continue);
        assert_eq!(server.count("GET", "/api/payments/networks/"), 1);
        assert_eq!(console.last_listing.as_deref(), Some("networks"));

        // A typed repeat inside the window is throttled
        handle_line(&mut console, "networks").await;
        assert_eq!(server.count("GET", "/api/payments/networks/"), 1);

        // refresh always re-issues the fetch
        handle_line(&mut console, "refresh").await;
        assert_eq!(server.count("GET", "/api/payments/networks/"), 2);
        handle_line(&mut console, "r").await;
        assert_eq!(server.count("GET", "/api/payments/networks/"), 3);
    }

    #[tokio::test]
    async fn test_refresh_without_listing_does_nothing() {
        let server = StubServer::start(Vec::new()).await;
        let mut console = partner_console(&server.url).await;
        assert_eq!(handle_line(&mut console, "refresh").await, Flow::Continue);
        assert!(server.requests().is_empty());
    }
}
