use reqwest::Client as HttpClient;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, warn};

use super::models::{
    Account, ApiError, BettingPlatform, BettingTransaction, CancellationRequest, CommissionPayment,
    CommissionRates, CommissionStats, ListResponse, LoginRequest, LoginResponse, Network,
    NewBettingDeposit, NewBettingWithdrawal, NewTopup, NewTransaction, NewTransfer, ProfileUpdate,
    TopupRequest, Transaction, Transfer, UnpaidCommissions, User, VerifyBettingUser,
    VerifyBettingUserResponse,
};
use crate::utils::extract_error_message_from_body;

pub type QueryPairs = Vec<(String, String)>;

/// Blaffa Pay partner REST client
#[derive(Clone)]
pub struct PartnerClient {
    http_client: HttpClient,
    base_url: String,
    access_token: Option<String>,
}

impl PartnerClient {
    /// Create a new client for the given base URL (no trailing slash)
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let http_client = HttpClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::RequestError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            access_token: None,
        })
    }

    pub fn set_access_token(&mut self, token: Option<String>) {
        self.access_token = token;
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Default headers, with the bearer token when signed in
    fn create_headers(&self, json_body: bool) -> Result<HeaderMap, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if json_body {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }

        if let Some(token) = &self.access_token {
            let auth_value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|e| ApiError::RequestError(format!("Failed to create auth header: {}", e)))?;
            headers.insert(AUTHORIZATION, auth_value);
        }

        Ok(headers)
    }

    /// Map a non-success status and its body to an [`ApiError`]
    pub fn error_from_status(status: u16, body: &str) -> ApiError {
        match status {
            400 | 422 => ApiError::BadRequest(extract_error_message_from_body(body)),
            401 => ApiError::Unauthorized(extract_error_message_from_body(body)),
            403 => ApiError::Forbidden(extract_error_message_from_body(body)),
            404 => ApiError::NotFound(extract_error_message_from_body(body)),
            429 => ApiError::RateLimited,
            500..=599 => {
                warn!("Server error {}: {}", status, body);
                ApiError::ServerError(status, extract_error_message_from_body(body))
            }
            _ => ApiError::HttpError(status, extract_error_message_from_body(body)),
        }
    }

    async fn handle_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            return Err(Self::error_from_status(status.as_u16(), &body_text));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::DeserializationError(format!("Failed to parse response: {}", e)))
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, query: &QueryPairs) -> Result<T, ApiError> {
        debug!("GET {} {:?}", path, query);
        let response = self
            .http_client
            .get(self.url(path))
            .headers(self.create_headers(false)?)
            .query(query)
            .send()
            .await
            .map_err(|e| ApiError::RequestError(format!("Request failed: {}", e)))?;

        Self::handle_response(response).await
    }

    async fn post<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T, ApiError> {
        debug!("POST {}", path);
        let response = self
            .http_client
            .post(self.url(path))
            .headers(self.create_headers(true)?)
            .json(body)
            .send()
            .await
            .map_err(|e| ApiError::RequestError(format!("Request failed: {}", e)))?;

        Self::handle_response(response).await
    }

    async fn patch<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T, ApiError> {
        debug!("PATCH {}", path);
        let response = self
            .http_client
            .patch(self.url(path))
            .headers(self.create_headers(true)?)
            .json(body)
            .send()
            .await
            .map_err(|e| ApiError::RequestError(format!("Request failed: {}", e)))?;

        Self::handle_response(response).await
    }

    /// POST /api/auth/login/
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        self.post("/api/auth/login/", &body).await
    }

    /// GET /api/auth/profile/
    pub async fn get_profile(&self) -> Result<User, ApiError> {
        self.get("/api/auth/profile/", &Vec::new()).await
    }

    /// PATCH /api/auth/profile/
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<User, ApiError> {
        self.patch("/api/auth/profile/", update).await
    }

    /// GET /api/payments/user/account/
    pub async fn get_account(&self) -> Result<Account, ApiError> {
        self.get("/api/payments/user/account/", &Vec::new()).await
    }

    /// GET /api/payments/user/account/transactions/
    ///
    /// Filtering, ordering and pagination happen server side; `query` carries
    /// the serialized list state.
    pub async fn list_transactions(
        &self,
        query: &QueryPairs,
    ) -> Result<ListResponse<Transaction>, ApiError> {
        self.get("/api/payments/user/account/transactions/", query).await
    }

    /// POST /api/payments/user/account/transactions/
    pub async fn create_transaction(&self, body: &NewTransaction) -> Result<Transaction, ApiError> {
        self.post("/api/payments/user/account/transactions/", body).await
    }

    /// GET /api/payments/user/recharges/
    pub async fn list_recharges(
        &self,
        query: &QueryPairs,
    ) -> Result<ListResponse<TopupRequest>, ApiError> {
        self.get("/api/payments/user/recharges/", query).await
    }

    /// POST /api/payments/user/recharges/ as multipart, with the proof image
    /// read from disk
    pub async fn create_recharge(&self, topup: &NewTopup) -> Result<TopupRequest, ApiError> {
        let image = tokio::fs::read(&topup.proof_image).await.map_err(|e| {
            ApiError::RequestError(format!(
                "Cannot read proof image {}: {}",
                topup.proof_image.display(),
                e
            ))
        })?;
        let file_name = topup
            .proof_image
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "proof.jpg".to_string());
        let mime = guess_image_mime(&file_name);

        let part = Part::bytes(image)
            .file_name(file_name)
            .mime_str(mime)
            .map_err(|e| ApiError::RequestError(format!("Invalid proof image: {}", e)))?;

        let form = Form::new()
            .text("amount", format!("{:.2}", topup.amount))
            .text("proof_description", topup.proof_description.clone())
            .text("transaction_date", topup.transaction_date.clone())
            .part("proof_image", part);

        debug!("POST /api/payments/user/recharges/ (multipart)");
        let response = self
            .http_client
            .post(self.url("/api/payments/user/recharges/"))
            .headers(self.create_headers(false)?)
            .multipart(form)
            .send()
            .await
            .map_err(|e| ApiError::RequestError(format!("Request failed: {}", e)))?;

        Self::handle_response(response).await
    }

    /// GET /api/payments/networks/
    pub async fn list_networks(&self) -> Result<ListResponse<Network>, ApiError> {
        self.get("/api/payments/networks/", &Vec::new()).await
    }

    /// GET /api/payments/betting/user/platforms/
    pub async fn list_betting_platforms(&self) -> Result<ListResponse<BettingPlatform>, ApiError> {
        self.get("/api/payments/betting/user/platforms/", &Vec::new()).await
    }

    /// GET /api/payments/betting/user/transactions/my_transactions/
    pub async fn list_betting_transactions(
        &self,
        query: &QueryPairs,
    ) -> Result<ListResponse<BettingTransaction>, ApiError> {
        self.get("/api/payments/betting/user/transactions/my_transactions/", query)
            .await
    }

    /// POST /api/payments/betting/user/transactions/verify_user_id/
    pub async fn verify_betting_user(
        &self,
        body: &VerifyBettingUser,
    ) -> Result<VerifyBettingUserResponse, ApiError> {
        self.post("/api/payments/betting/user/transactions/verify_user_id/", body)
            .await
    }

    /// POST /api/payments/betting/user/transactions/create_deposit/
    pub async fn create_betting_deposit(
        &self,
        body: &NewBettingDeposit,
    ) -> Result<BettingTransaction, ApiError> {
        self.post("/api/payments/betting/user/transactions/create_deposit/", body)
            .await
    }

    /// POST /api/payments/betting/user/transactions/create_withdrawal/
    pub async fn create_betting_withdrawal(
        &self,
        body: &NewBettingWithdrawal,
    ) -> Result<BettingTransaction, ApiError> {
        self.post("/api/payments/betting/user/transactions/create_withdrawal/", body)
            .await
    }

    /// POST /api/payments/betting/user/transactions/{uid}/request_cancellation/
    ///
    /// Only the status matters; callers refetch the list afterwards.
    pub async fn request_cancellation(&self, uid: &str, reason: &str) -> Result<(), ApiError> {
        let path = format!(
            "/api/payments/betting/user/transactions/{}/request_cancellation/",
            uid
        );
        let body = CancellationRequest {
            reason: reason.to_string(),
        };
        debug!("POST {}", path);
        let response = self
            .http_client
            .post(self.url(&path))
            .headers(self.create_headers(true)?)
            .json(&body)
            .send()
            .await
            .map_err(|e| ApiError::RequestError(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            return Err(Self::error_from_status(status.as_u16(), &body_text));
        }
        Ok(())
    }

    /// GET /api/payments/betting/user/commissions/my_stats/
    pub async fn commission_stats(&self) -> Result<CommissionStats, ApiError> {
        self.get("/api/payments/betting/user/commissions/my_stats/", &Vec::new())
            .await
    }

    /// GET /api/payments/betting/user/commissions/unpaid_commissions/
    pub async fn unpaid_commissions(&self) -> Result<UnpaidCommissions, ApiError> {
        self.get("/api/payments/betting/user/commissions/unpaid_commissions/", &Vec::new())
            .await
    }

    /// GET /api/payments/betting/user/commissions/current_rates/
    pub async fn commission_rates(&self) -> Result<CommissionRates, ApiError> {
        self.get("/api/payments/betting/user/commissions/current_rates/", &Vec::new())
            .await
    }

    /// GET /api/payments/betting/user/commissions/payment_history/
    pub async fn commission_payments(
        &self,
        query: &QueryPairs,
    ) -> Result<ListResponse<CommissionPayment>, ApiError> {
        self.get("/api/payments/betting/user/commissions/payment_history/", query)
            .await
    }

    /// POST /api/payments/betting/user/transfers/
    pub async fn create_transfer(&self, body: &NewTransfer) -> Result<Transfer, ApiError> {
        self.post("/api/payments/betting/user/transfers/", body).await
    }

    /// GET /api/payments/betting/user/transfers/my_transfers/
    pub async fn list_transfers(&self, query: &QueryPairs) -> Result<ListResponse<Transfer>, ApiError> {
        self.get("/api/payments/betting/user/transfers/my_transfers/", query)
            .await
    }
}

fn guess_image_mime(file_name: &str) -> &'static str {
    let lower = file_name.to_lowercase();
    if lower.ends_with(".png") {
        "image/png"
    } else if lower.ends_with(".webp") {
        "image/webp"
    } else if lower.ends_with(".pdf") {
        "application/pdf"
    } else {
        "image/jpeg"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_errors_are_flattened() {
        let err = PartnerClient::error_from_status(400, r#"{"amount": ["Montant trop faible"]}"#);
        match err {
            ApiError::BadRequest(msg) => assert_eq!(msg, "amount: Montant trop faible"),
            other => panic!("unexpected {:?}", other),
        }

        let err = PartnerClient::error_from_status(422, r#"{"detail": "Solde insuffisant"}"#);
        assert_eq!(err.to_string(), "Solde insuffisant");
    }

    #[test]
    fn test_status_classes() {
        assert!(matches!(
            PartnerClient::error_from_status(401, r#"{"detail":"Token expired"}"#),
            ApiError::Unauthorized(_)
        ));
        assert!(matches!(PartnerClient::error_from_status(429, ""), ApiError::RateLimited));
        assert!(matches!(
            PartnerClient::error_from_status(502, "<html>bad gateway</html>"),
            ApiError::ServerError(502, _)
        ));
        assert!(matches!(
            PartnerClient::error_from_status(409, "{}"),
            ApiError::HttpError(409, _)
        ));
    }

    #[test]
    fn test_auth_header_only_when_signed_in() {
        let mut client = PartnerClient::new("http://localhost:8000/", Duration::from_secs(5)).unwrap();
        assert_eq!(client.url("/api/x/"), "http://localhost:8000/api/x/");

        let headers = client.create_headers(true).unwrap();
        assert!(headers.get(AUTHORIZATION).is_none());

        client.set_access_token(Some("abc".to_string()));
        let headers = client.create_headers(false).unwrap();
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer abc");
        assert!(headers.get(CONTENT_TYPE).is_none());
    }

    #[tokio::test]
    async fn test_cancellation_posts_reason_to_transaction_path() {
        use crate::testing::StubServer;

        const PATH: &str = "/api/payments/betting/user/transactions/b1/request_cancellation/";
        let server = StubServer::start(vec![("POST", PATH, 200, r#"{"ok":true}"#.to_string())]).await;
        let mut client = PartnerClient::new(&server.url, Duration::from_secs(5)).unwrap();
        client.set_access_token(Some("t".to_string()));

        client.request_cancellation("b1", "Motif").await.unwrap();
        let requests = server.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, "POST");
        assert_eq!(requests[0].path, PATH);
        assert_eq!(requests[0].json(), serde_json::json!({"reason": "Motif"}));
    }

    #[tokio::test]
    async fn test_refused_cancellation_maps_detail() {
        use crate::testing::StubServer;

        const PATH: &str = "/api/payments/betting/user/transactions/b2/request_cancellation/";
        let server = StubServer::start(vec![(
            "POST",
            PATH,
            400,
            r#"{"detail":"Délai dépassé"}"#.to_string(),
        )])
        .await;
        let mut client = PartnerClient::new(&server.url, Duration::from_secs(5)).unwrap();
        client.set_access_token(Some("t".to_string()));

        match client.request_cancellation("b2", "Motif").await {
            Err(ApiError::BadRequest(msg)) => assert_eq!(msg, "Délai dépassé"),
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(server.count("POST", PATH), 1);
    }

    #[test]
    fn test_mime_guess() {
        assert_eq!(guess_image_mime("recu.PNG"), "image/png");
        assert_eq!(guess_image_mime("photo"), "image/jpeg");
    }
}
