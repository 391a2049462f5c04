use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;
use tracing::{info, warn};

use crate::api::{BettingTransaction, PartnerClient};
use crate::config::Settings;
use crate::models::ListQuery;
use crate::session::{require_partner, Session, SessionStore};

/// State shared by every command for the lifetime of the console
pub struct Console {
    pub settings: Settings,
    pub client: PartnerClient,
    pub store: SessionStore,
    pub session: Option<Session>,
    /// Last list command line, re-issued by `refresh`
    pub last_listing: Option<String>,
    /// Betting transactions from the last `bet list`, used by `bet cancel`
    /// and merged with live updates
    pub betting_transactions: Vec<BettingTransaction>,
    pub betting_query: ListQuery,
    /// Transaction whose cancellation was sent but not yet seen in a
    /// refetched list; a second request for it is refused
    pub cancelling: Option<String>,
    pub interrupt: Arc<Interrupt>,
}

/// Routes Ctrl-C for the whole shell
///
/// A single listener installed by `main` calls [`Interrupt::signal`]. A
/// long-running command (`watch`) captures it for its duration; otherwise
/// the console exits.
#[derive(Debug, Default)]
pub struct Interrupt {
    captured: AtomicBool,
    notify: Notify,
}

impl Interrupt {
    /// Deliver one Ctrl-C; false when no command is capturing it
    pub fn signal(&self) -> bool {
        if self.captured.load(Ordering::SeqCst) {
            self.notify.notify_one();
            true
        } else {
            false
        }
    }

    /// Take Ctrl-C until the returned guard is dropped
    pub fn capture(&self) -> Capture<'_> {
        self.captured.store(true, Ordering::SeqCst);
        Capture { interrupt: self }
    }
}

pub struct Capture<'a> {
    interrupt: &'a Interrupt,
}

impl Capture<'_> {
    /// Resolves on the next Ctrl-C
    pub async fn interrupted(&self) {
        self.interrupt.notify.notified().await
    }
}

impl Drop for Capture<'_> {
    fn drop(&mut self) {
        self.interrupt.captured.store(false, Ordering::SeqCst);
    }
}

impl Console {
    pub async fn new(settings: Settings, interrupt: Arc<Interrupt>) -> Result<Self, String> {
        let client = PartnerClient::new(&settings.api_url, settings.request_timeout)
            .map_err(|e| e.to_string())?;
        let store = SessionStore::new(settings.session_file.clone(), settings.session_key.as_deref())
            .map_err(|e| e.to_string())?;

        let mut console = Console {
            betting_query: ListQuery::new(settings.page_size),
            settings,
            client,
            store,
            session: None,
            last_listing: None,
            betting_transactions: Vec::new(),
            cancelling: None,
            interrupt,
        };

        match console.store.load().await {
            Ok(Some(session)) => {
                info!("Restored session for {}", session.user.display_name());
                console.client.set_access_token(Some(session.access.clone()));
                console.session = Some(session);
            }
            Ok(None) => {}
            Err(e) => warn!("Ignoring stored session: {}", e),
        }

        Ok(console)
    }

    /// The signed-in partner, or the message to show instead
    pub fn partner(&self) -> Result<&Session, String> {
        require_partner(self.session.as_ref())
    }

    pub async fn sign_in(&mut self, session: Session) {
        self.client.set_access_token(Some(session.access.clone()));
        if let Err(e) = self.store.save(&session).await {
            warn!("Could not persist session: {}", e);
        }
        self.session = Some(session);
    }

    pub async fn sign_out(&mut self) {
        self.client.set_access_token(None);
        self.session = None;
        self.last_listing = None;
        self.betting_transactions.clear();
        if let Err(e) = self.store.clear().await {
            warn!("Could not remove session file: {}", e);
        }
    }
}

/// Read one line from stdin without blocking the runtime; `None` on EOF
pub async fn read_line(prompt: &str) -> Option<String> {
    use std::io::Write;

    print!("{}", prompt);
    let _ = std::io::stdout().flush();

    tokio::task::spawn_blocking(|| {
        let mut line = String::new();
        match std::io::stdin().read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
        }
    })
    .await
    .ok()
    .flatten()
}

/// Yes/no question, default no
pub async fn confirm(question: &str) -> bool {
    match read_line(&format!("{} [o/N] ", question)).await {
        Some(answer) => matches!(answer.trim().to_lowercase().as_str(), "o" | "oui" | "y" | "yes"),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_uncaptured_signal_is_declined() {
        let interrupt = Interrupt::default();
        assert!(!interrupt.signal());
    }

    #[tokio::test]
    async fn test_capture_receives_signal_and_releases() {
        let interrupt = Arc::new(Interrupt::default());
        {
            let capture = interrupt.capture();
            let sender = interrupt.clone();
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(20)).await;
                assert!(sender.signal());
            });
            tokio::time::timeout(Duration::from_secs(2), capture.interrupted())
                .await
                .unwrap();
        }
        // Guard dropped: Ctrl-C goes back to ending the console
        assert!(!interrupt.signal());
    }
}
