//! Push updates received over the transactions websocket

use serde_json::Value;

use crate::api::{BettingTransaction, TransactionStatus};

/// Status change for one transaction
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionUpdate {
    pub uid: String,
    pub status: TransactionStatus,
    pub cancellation_requested_at: Option<String>,
    pub cancelled_at: Option<String>,
    pub is_cancellable: Option<bool>,
    pub can_request_cancellation: Option<bool>,
}

impl TransactionUpdate {
    /// Parse a websocket frame
    ///
    /// Accepts the bare object or one wrapped in `data` / `transaction`.
    /// Anything without an identifier and a status yields `None`.
    pub fn parse(frame: &str) -> Option<Self> {
        let root: Value = serde_json::from_str(frame).ok()?;
        let body = root
            .get("data")
            .filter(|v| v.is_object())
            .or_else(|| root.get("transaction").filter(|v| v.is_object()))
            .unwrap_or(&root);

        let uid = ["uid", "transaction_uid", "id"]
            .iter()
            .find_map(|key| match body.get(*key) {
                Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
                Some(Value::Number(n)) => Some(n.to_string()),
                _ => None,
            })?;
        let status = body.get("status")?.as_str()?.to_string();

        let text = |key: &str| body.get(key).and_then(Value::as_str).map(str::to_string);
        let flag = |key: &str| body.get(key).and_then(Value::as_bool);

        Some(TransactionUpdate {
            uid,
            status: TransactionStatus::from(status),
            cancellation_requested_at: text("cancellation_requested_at"),
            cancelled_at: text("cancelled_at"),
            is_cancellable: flag("is_cancellable"),
            can_request_cancellation: flag("can_request_cancellation"),
        })
    }

    /// Merge into the list held by the console; returns false when no row
    /// carries this identifier
    pub fn apply(&self, transactions: &mut [BettingTransaction]) -> bool {
        let Some(tx) = transactions.iter_mut().find(|tx| tx.uid == self.uid) else {
            return false;
        };

        tx.status = self.status.clone();
        if self.cancellation_requested_at.is_some() {
            tx.cancellation_requested_at = self.cancellation_requested_at.clone();
        }
        if self.cancelled_at.is_some() {
            tx.cancelled_at = self.cancelled_at.clone();
        }
        if self.is_cancellable.is_some() {
            tx.is_cancellable = self.is_cancellable;
        }
        if self.can_request_cancellation.is_some() {
            tx.can_request_cancellation = self.can_request_cancellation;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample(uid: &str) -> BettingTransaction {
        serde_json::from_value(json!({
            "uid": uid,
            "transaction_type": "deposit",
            "amount": "1000",
            "status": "pending",
            "created_at": "2026-10-19T08:00:00Z"
        }))
        .unwrap()
    }

    #[test]
    fn test_parse_wrapped_and_bare() {
        let wrapped = r#"{"type":"transaction_update","data":{"uid":"b1","status":"success"}}"#;
        let update = TransactionUpdate::parse(wrapped).unwrap();
        assert_eq!(update.uid, "b1");
        assert_eq!(update.status, TransactionStatus::Success);

        let bare = r#"{"transaction_uid":"b2","status":"cancelled","cancelled_at":"2026-10-19T09:00:00Z"}"#;
        let update = TransactionUpdate::parse(bare).unwrap();
        assert_eq!(update.uid, "b2");
        assert_eq!(update.cancelled_at.as_deref(), Some("2026-10-19T09:00:00Z"));
    }

    #[test]
    fn test_malformed_frames_are_ignored() {
        assert!(TransactionUpdate::parse("not json").is_none());
        assert!(TransactionUpdate::parse(r#"{"status":"success"}"#).is_none());
        assert!(TransactionUpdate::parse(r#"{"uid":"b1"}"#).is_none());
        assert!(TransactionUpdate::parse(r#"[1,2,3]"#).is_none());
    }

    #[test]
    fn test_apply_merges_by_uid() {
        let mut list = vec![sample("b1"), sample("b2")];
        let update = TransactionUpdate::parse(
            r#"{"uid":"b2","status":"failed","is_cancellable":false}"#,
        )
        .unwrap();

        assert!(update.apply(&mut list));
        assert_eq!(list[0].status, TransactionStatus::Pending);
        assert_eq!(list[1].status, TransactionStatus::Failed);
        assert_eq!(list[1].is_cancellable, Some(false));

        let unknown = TransactionUpdate::parse(r#"{"uid":"zz","status":"failed"}"#).unwrap();
        assert!(!unknown.apply(&mut list));
    }
}
