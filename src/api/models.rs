use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// The backend sends decimals as strings ("1500.00") on some endpoints and as
/// numbers on others.
fn de_amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(de_opt_amount(deserializer)?.unwrap_or(0.0))
}

fn de_opt_amount<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => Ok(n.as_f64()),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("invalid amount '{}'", s))),
        Some(other) => Err(serde::de::Error::custom(format!("invalid amount {}", other))),
    }
}

/// Identifiers are uuids on most resources but plain integers on users
fn de_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Null => Ok(String::new()),
        other => Err(serde::de::Error::custom(format!("invalid id {}", other))),
    }
}

/// Transaction lifecycle as reported by the backend
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum TransactionStatus {
    Pending,
    Processing,
    Success,
    Completed,
    Failed,
    Cancelled,
    Timeout,
    SentToUser,
    Other(String),
}

impl From<String> for TransactionStatus {
    fn from(raw: String) -> Self {
        match raw.to_lowercase().as_str() {
            "pending" => TransactionStatus::Pending,
            "processing" => TransactionStatus::Processing,
            "success" => TransactionStatus::Success,
            "completed" => TransactionStatus::Completed,
            "failed" => TransactionStatus::Failed,
            "cancelled" | "canceled" => TransactionStatus::Cancelled,
            "timeout" => TransactionStatus::Timeout,
            "sent_to_user" => TransactionStatus::SentToUser,
            _ => TransactionStatus::Other(raw),
        }
    }
}

impl TransactionStatus {
    pub fn as_str(&self) -> &str {
        match self {
            TransactionStatus::Pending => "pending",
            TransactionStatus::Processing => "processing",
            TransactionStatus::Success => "success",
            TransactionStatus::Completed => "completed",
            TransactionStatus::Failed => "failed",
            TransactionStatus::Cancelled => "cancelled",
            TransactionStatus::Timeout => "timeout",
            TransactionStatus::SentToUser => "sent_to_user",
            TransactionStatus::Other(raw) => raw.as_str(),
        }
    }

    /// Label shown in tables
    pub fn label(&self) -> &str {
        match self {
            TransactionStatus::Pending => "En attente",
            TransactionStatus::Processing => "En cours",
            TransactionStatus::Success | TransactionStatus::Completed => "Réussi",
            TransactionStatus::Failed => "Échoué",
            TransactionStatus::Cancelled => "Annulé",
            TransactionStatus::Timeout => "Expiré",
            TransactionStatus::SentToUser => "Envoyé",
            TransactionStatus::Other(raw) => raw.as_str(),
        }
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TransactionType {
    Deposit,
    Withdrawal,
    Other(String),
}

impl From<String> for TransactionType {
    fn from(raw: String) -> Self {
        match raw.to_lowercase().as_str() {
            "deposit" => TransactionType::Deposit,
            "withdrawal" => TransactionType::Withdrawal,
            _ => TransactionType::Other(raw),
        }
    }
}

impl From<TransactionType> for String {
    fn from(kind: TransactionType) -> Self {
        kind.as_str().to_string()
    }
}

impl TransactionType {
    pub fn as_str(&self) -> &str {
        match self {
            TransactionType::Deposit => "deposit",
            TransactionType::Withdrawal => "withdrawal",
            TransactionType::Other(raw) => raw.as_str(),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            TransactionType::Deposit => "Dépôt",
            TransactionType::Withdrawal => "Retrait",
            TransactionType::Other(raw) => raw.as_str(),
        }
    }
}

/// Top-up review state
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum TopupStatus {
    Pending,
    Approved,
    Rejected,
    Expired,
    Other(String),
}

impl From<String> for TopupStatus {
    fn from(raw: String) -> Self {
        match raw.to_lowercase().as_str() {
            "pending" => TopupStatus::Pending,
            "approved" => TopupStatus::Approved,
            "rejected" => TopupStatus::Rejected,
            "expired" => TopupStatus::Expired,
            _ => TopupStatus::Other(raw),
        }
    }
}

impl TopupStatus {
    pub fn label(&self) -> &str {
        match self {
            TopupStatus::Pending => "En attente",
            TopupStatus::Approved => "Approuvée",
            TopupStatus::Rejected => "Rejetée",
            TopupStatus::Expired => "Expirée",
            TopupStatus::Other(raw) => raw.as_str(),
        }
    }
}

/// Paginated envelope or a bare array, depending on the endpoint
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ListResponse<T> {
    Paginated { count: u64, results: Vec<T> },
    Plain(Vec<T>),
}

impl<T> ListResponse<T> {
    pub fn total_count(&self) -> u64 {
        match self {
            ListResponse::Paginated { count, .. } => *count,
            ListResponse::Plain(items) => items.len() as u64,
        }
    }

    pub fn into_items(self) -> Vec<T> {
        match self {
            ListResponse::Paginated { results, .. } => results,
            ListResponse::Plain(items) => items,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub is_partner: bool,
}

impl User {
    pub fn display_name(&self) -> String {
        let full = format!(
            "{} {}",
            self.first_name.as_deref().unwrap_or(""),
            self.last_name.as_deref().unwrap_or("")
        );
        let full = full.trim();
        if !full.is_empty() {
            full.to_string()
        } else {
            self.email.clone().unwrap_or_else(|| format!("#{}", self.id))
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub access: String,
    #[serde(default)]
    pub refresh: Option<String>,
    pub user: User,
}

/// Body of PATCH /api/auth/profile/; unset fields are left untouched
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.phone.is_none()
            && self.email.is_none()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Account {
    #[serde(default, deserialize_with = "de_amount")]
    pub balance: f64,
    #[serde(default)]
    pub formatted_balance: Option<String>,
    #[serde(default, deserialize_with = "de_amount")]
    pub total_recharged: f64,
    #[serde(default, deserialize_with = "de_amount")]
    pub total_deposited: f64,
    #[serde(default, deserialize_with = "de_amount")]
    pub total_withdrawn: f64,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub is_frozen: bool,
    #[serde(default, deserialize_with = "de_opt_amount")]
    pub utilization_rate: Option<f64>,
    #[serde(default)]
    pub last_transaction_at: Option<String>,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct Transaction {
    #[serde(default, deserialize_with = "de_id")]
    pub uid: String,
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    #[serde(deserialize_with = "de_amount")]
    pub amount: f64,
    pub status: TransactionStatus,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub recipient_phone: Option<String>,
    #[serde(default)]
    pub network_name: Option<String>,
    #[serde(default)]
    pub display_recipient_name: Option<String>,
    #[serde(default, deserialize_with = "de_opt_amount")]
    pub fees: Option<f64>,
    #[serde(default, deserialize_with = "de_opt_amount")]
    pub balance_before: Option<f64>,
    #[serde(default, deserialize_with = "de_opt_amount")]
    pub balance_after: Option<f64>,
}

/// Body of POST /api/payments/user/account/transactions/
#[derive(Debug, Clone, Serialize)]
pub struct NewTransaction {
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub amount: f64,
    pub recipient_phone: String,
    pub network: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub objet: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Network {
    #[serde(default, deserialize_with = "de_id")]
    pub uid: String,
    #[serde(alias = "nom")]
    pub name: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub country_name: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TopupRequest {
    #[serde(default, deserialize_with = "de_id")]
    pub uid: String,
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(deserialize_with = "de_amount")]
    pub amount: f64,
    pub status: TopupStatus,
    #[serde(default)]
    pub proof_description: Option<String>,
    #[serde(default)]
    pub transaction_date: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub expires_at: Option<String>,
    #[serde(default)]
    pub rejection_reason: Option<String>,
}

/// Multipart form of POST /api/payments/user/recharges/
#[derive(Debug, Clone)]
pub struct NewTopup {
    pub amount: f64,
    pub proof_image: std::path::PathBuf,
    pub proof_description: String,
    pub transaction_date: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BettingPlatform {
    #[serde(default, deserialize_with = "de_id")]
    pub uid: String,
    pub name: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default, deserialize_with = "de_opt_amount")]
    pub min_deposit_amount: Option<f64>,
    #[serde(default, deserialize_with = "de_opt_amount")]
    pub max_deposit_amount: Option<f64>,
    #[serde(default, deserialize_with = "de_opt_amount")]
    pub min_withdrawal_amount: Option<f64>,
    #[serde(default, deserialize_with = "de_opt_amount")]
    pub max_withdrawal_amount: Option<f64>,
    #[serde(default = "default_true")]
    pub can_deposit: bool,
    #[serde(default = "default_true")]
    pub can_withdraw: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BettingTransaction {
    #[serde(default, deserialize_with = "de_id")]
    pub uid: String,
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(alias = "type")]
    pub transaction_type: TransactionType,
    #[serde(deserialize_with = "de_amount")]
    pub amount: f64,
    pub status: TransactionStatus,
    #[serde(default)]
    pub platform_name: Option<String>,
    #[serde(default)]
    pub betting_user_id: Option<String>,
    #[serde(default, deserialize_with = "de_opt_amount")]
    pub commission_amount: Option<f64>,
    #[serde(default)]
    pub commission_paid: Option<bool>,
    #[serde(default, deserialize_with = "de_opt_amount")]
    pub partner_balance_before: Option<f64>,
    #[serde(default, deserialize_with = "de_opt_amount")]
    pub partner_balance_after: Option<f64>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub cancellation_requested_at: Option<String>,
    #[serde(default)]
    pub cancelled_at: Option<String>,
    #[serde(default)]
    pub is_cancellable: Option<bool>,
    #[serde(default)]
    pub can_request_cancellation: Option<bool>,
}

#[derive(Debug, Clone, Serialize)]
pub struct VerifyBettingUser {
    pub platform_uid: String,
    pub betting_user_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VerifyBettingUserResponse {
    #[serde(alias = "valid", default)]
    pub is_valid: bool,
    #[serde(alias = "name", default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewBettingDeposit {
    pub platform_uid: String,
    pub betting_user_id: String,
    pub amount: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewBettingWithdrawal {
    pub platform_uid: String,
    pub betting_user_id: String,
    pub withdrawal_code: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CancellationRequest {
    pub reason: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommissionStats {
    #[serde(default)]
    pub total_transactions: u64,
    #[serde(default, deserialize_with = "de_amount")]
    pub total_commission: f64,
    #[serde(default, deserialize_with = "de_amount")]
    pub paid_commission: f64,
    #[serde(default, deserialize_with = "de_amount")]
    pub unpaid_commission: f64,
    #[serde(default)]
    pub by_platform: Vec<PlatformCommission>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlatformCommission {
    pub platform_name: String,
    #[serde(default)]
    pub transaction_count: u64,
    #[serde(default, deserialize_with = "de_amount")]
    pub total_commission: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UnpaidCommissions {
    #[serde(default, deserialize_with = "de_amount")]
    pub total_unpaid_amount: f64,
    #[serde(default)]
    pub transaction_count: u64,
    #[serde(default)]
    pub transactions: Vec<BettingTransaction>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommissionRates {
    #[serde(default, deserialize_with = "de_amount")]
    pub deposit_rate: f64,
    #[serde(default, deserialize_with = "de_amount")]
    pub withdrawal_rate: f64,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommissionPayment {
    #[serde(default, deserialize_with = "de_id")]
    pub uid: String,
    #[serde(deserialize_with = "de_amount")]
    pub amount: f64,
    #[serde(default)]
    pub transaction_count: Option<u64>,
    #[serde(default)]
    pub period_start: Option<String>,
    #[serde(default)]
    pub period_end: Option<String>,
    #[serde(default)]
    pub paid_at: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewTransfer {
    pub recipient: String,
    pub amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Transfer {
    #[serde(default, deserialize_with = "de_id")]
    pub uid: String,
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(deserialize_with = "de_amount")]
    pub amount: f64,
    #[serde(default, deserialize_with = "de_opt_amount")]
    pub fees: Option<f64>,
    #[serde(default)]
    pub sender_name: Option<String>,
    #[serde(default)]
    pub receiver_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<TransactionStatus>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Errors returned by [`super::PartnerClient`]
///
/// The message carried by HTTP variants is already normalized for display.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// 400 / 422 validation failures
    #[error("{0}")]
    BadRequest(String),
    /// 401, the session is missing or expired
    #[error("Session expirée ou invalide: {0}")]
    Unauthorized(String),
    #[error("Accès refusé: {0}")]
    Forbidden(String),
    #[error("Introuvable: {0}")]
    NotFound(String),
    #[error("Trop de requêtes, réessayez dans un instant")]
    RateLimited,
    #[error("Erreur serveur ({0}): {1}")]
    ServerError(u16, String),
    #[error("Erreur HTTP ({0}): {1}")]
    HttpError(u16, String),
    /// Network failure or a request that could not be built
    #[error("Erreur réseau: {0}")]
    RequestError(String),
    #[error("Réponse illisible: {0}")]
    DeserializationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_amounts_accept_strings_and_numbers() {
        let account: Account = serde_json::from_value(json!({
            "balance": "15000.50",
            "formatted_balance": "15 000,50 FCFA",
            "total_recharged": 20000,
            "is_frozen": false,
            "utilization_rate": null
        }))
        .unwrap();
        assert_eq!(account.balance, 15000.5);
        assert_eq!(account.total_recharged, 20000.0);
        assert_eq!(account.total_withdrawn, 0.0);
        assert!(account.is_active);
        assert!(account.utilization_rate.is_none());
    }

    #[test]
    fn test_paginated_and_plain_lists() {
        let paged: ListResponse<Network> = serde_json::from_value(json!({
            "count": 12,
            "next": "https://api/x?page=2",
            "previous": null,
            "results": [{"uid": "n1", "nom": "MTN", "code": "mtn"}]
        }))
        .unwrap();
        assert_eq!(paged.total_count(), 12);
        assert_eq!(paged.into_items()[0].name, "MTN");

        let plain: ListResponse<Network> =
            serde_json::from_value(json!([{"uid": 3, "name": "Moov"}])).unwrap();
        assert_eq!(plain.total_count(), 1);
        assert_eq!(plain.into_items()[0].uid, "3");
    }

    #[test]
    fn test_unknown_status_is_kept() {
        let tx: Transaction = serde_json::from_value(json!({
            "uid": "t1",
            "type": "deposit",
            "amount": "100",
            "status": "on_hold"
        }))
        .unwrap();
        assert_eq!(tx.status, TransactionStatus::Other("on_hold".to_string()));
        assert_eq!(tx.status.as_str(), "on_hold");
        assert_eq!(tx.kind, TransactionType::Deposit);
    }

    #[test]
    fn test_betting_transaction_flags() {
        let tx: BettingTransaction = serde_json::from_value(json!({
            "uid": "b1",
            "transaction_type": "withdrawal",
            "amount": 2500,
            "status": "sent_to_user",
            "platform_name": "1xBet",
            "is_cancellable": false
        }))
        .unwrap();
        assert_eq!(tx.status, TransactionStatus::SentToUser);
        assert_eq!(tx.is_cancellable, Some(false));
        assert_eq!(tx.can_request_cancellation, None);
    }

    #[test]
    fn test_new_transaction_body() {
        let body = serde_json::to_value(NewTransaction {
            kind: TransactionType::Withdrawal,
            amount: 500.0,
            recipient_phone: "+22507000000".to_string(),
            network: "n1".to_string(),
            objet: None,
        })
        .unwrap();
        assert_eq!(body["type"], "withdrawal");
        assert!(body.get("objet").is_none());
    }

    #[test]
    fn test_user_display_name() {
        let user: User = serde_json::from_value(json!({"id": 7, "email": "a@b.c"})).unwrap();
        assert_eq!(user.display_name(), "a@b.c");
        assert!(!user.is_partner);
    }
}
