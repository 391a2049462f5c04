use std::collections::HashMap;
use std::time::{Duration, Instant};
use lazy_static::lazy_static;
use tokio::sync::Mutex;

lazy_static! {
    static ref COMMAND_COOLDOWNS: Mutex<Cooldowns> =
        Mutex::new(Cooldowns::new(Duration::from_secs(COOLDOWN_SECONDS)));
}

const COOLDOWN_SECONDS: u64 = 3;

/// Last accepted run per command key
pub struct Cooldowns {
    last_run: HashMap<String, Instant>,
    window: Duration,
}

impl Cooldowns {
    pub fn new(window: Duration) -> Self {
        Self {
            last_run: HashMap::new(),
            window,
        }
    }

    /// Ok when the key may run now (and records the run), otherwise the
    /// time left before it may run again
    pub fn check(&mut self, key: &str, now: Instant) -> Result<(), Duration> {
        if let Some(&last) = self.last_run.get(key) {
            let elapsed = now.saturating_duration_since(last);
            if elapsed < self.window {
                return Err(self.window - elapsed);
            }
        }
        self.last_run.insert(key.to_string(), now);
        Ok(())
    }

    /// Forget `command` and every key that extends it (`tx` also clears
    /// `tx list p2`)
    pub fn reset(&mut self, command: &str) {
        let prefix = format!("{} ", command);
        self.last_run
            .retain(|key, _| key != command && !key.starts_with(&prefix));
    }
}

/// Check if a fetch command may be re-issued
/// Returns Err(remaining_seconds) while the previous identical fetch is too recent
pub async fn check_cooldown(command: &str) -> Result<(), u64> {
    let mut cooldowns = COMMAND_COOLDOWNS.lock().await;
    cooldowns
        .check(command, Instant::now())
        .map_err(|left| left.as_secs().max(1))
}

/// Forget the cooldowns of a command, e.g. after the data changed on our side
pub async fn clear_cooldown(command: &str) {
    COMMAND_COOLDOWNS.lock().await.reset(command);
}

/// Get the cooldown seconds constant
pub fn get_cooldown_seconds() -> u64 {
    COOLDOWN_SECONDS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cooldown_blocks_repeats_within_window() {
        let mut cooldowns = Cooldowns::new(Duration::from_secs(3));
        let start = Instant::now();

        assert!(cooldowns.check("tx list", start).is_ok());
        let left = cooldowns
            .check("tx list", start + Duration::from_secs(1))
            .unwrap_err();
        assert_eq!(left, Duration::from_secs(2));

        // Other commands are tracked independently
        assert!(cooldowns.check("balance", start + Duration::from_secs(1)).is_ok());
        assert!(cooldowns.check("tx list", start + Duration::from_secs(3)).is_ok());
    }

    #[test]
    fn test_reset_allows_immediate_rerun() {
        let mut cooldowns = Cooldowns::new(Duration::from_secs(3));
        let start = Instant::now();
        assert!(cooldowns.check("bet list", start).is_ok());
        cooldowns.reset("bet list");
        assert!(cooldowns.check("bet list", start).is_ok());
    }

    #[test]
    fn test_reset_clears_every_variant_of_a_command() {
        let mut cooldowns = Cooldowns::new(Duration::from_secs(3));
        let start = Instant::now();
        for key in ["tx list", "tx list p2 type=deposit", "txt", "balance"] {
            assert!(cooldowns.check(key, start).is_ok());
        }

        cooldowns.reset("tx");
        assert!(cooldowns.check("tx list", start).is_ok());
        assert!(cooldowns.check("tx list p2 type=deposit", start).is_ok());
        // Only whole-word prefixes
        assert!(cooldowns.check("txt", start).is_err());
        assert!(cooldowns.check("balance", start).is_err());
    }

    #[tokio::test]
    async fn test_global_cooldown() {
        assert!(check_cooldown("test-global-cooldown").await.is_ok());
        assert!(check_cooldown("test-global-cooldown").await.is_err());
        clear_cooldown("test-global-cooldown").await;
        assert!(check_cooldown("test-global-cooldown").await.is_ok());
        assert_eq!(get_cooldown_seconds(), 3);
    }
}
