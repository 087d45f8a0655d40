//! Minimal YNAB API client: budgets, categories and transaction creation.

use api_types::ynab::{
    BudgetSummary, BudgetsData, CategoriesData, CategoryGroupWithCategories, Envelope,
    ErrorResponse, PostTransaction, PostTransactions, SaveTransaction, SaveTransactionsData,
};
use reqwest::{RequestBuilder, Url, header};
use serde::de::DeserializeOwned;
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "https://api.ynab.com/v1";

#[derive(Debug, Error)]
pub enum YnabError {
    #[error("invalid YNAB client configuration: {0}")]
    Config(String),
    #[error("YNAB rejected the access token")]
    Unauthorized,
    #[error("YNAB resource not found: {0}")]
    NotFound(String),
    #[error("YNAB error: {0}")]
    Server(String),
    #[error("YNAB request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

#[derive(Debug, Clone)]
pub struct YnabClient {
    base_url: Url,
    http: reqwest::Client,
}

impl YnabClient {
    pub fn new(base_url: &str, token: &str) -> Result<Self, YnabError> {
        // `Url::join` replaces the last segment unless the base ends with '/'.
        let base_url = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };
        let base_url = Url::parse(&base_url)
            .map_err(|err| YnabError::Config(format!("invalid base_url: {err}")))?;

        let mut auth = header::HeaderValue::try_from(format!("Bearer {token}"))
            .map_err(|err| YnabError::Config(format!("invalid access token: {err}")))?;
        auth.set_sensitive(true);

        let mut headers = header::HeaderMap::new();
        headers.insert(header::AUTHORIZATION, auth);
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|err| YnabError::Config(format!("failed to build http client: {err}")))?;

        Ok(Self { base_url, http })
    }

    fn endpoint(&self, path: &str) -> Result<Url, YnabError> {
        self.base_url
            .join(path)
            .map_err(|err| YnabError::Config(format!("invalid endpoint {path}: {err}")))
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, YnabError> {
        let res = request.send().await?;

        if res.status().is_success() {
            return Ok(res.json::<Envelope<T>>().await?.data);
        }

        let status = res.status();
        let body = res
            .json::<ErrorResponse>()
            .await
            .map(|err| err.error.detail)
            .unwrap_or_else(|_| "unknown error".to_string());

        let err = match status.as_u16() {
            401 => YnabError::Unauthorized,
            404 => YnabError::NotFound(body),
            _ => YnabError::Server(format!("{status}: {body}")),
        };
        Err(err)
    }

    /// GET budgets, with their accounts.
    pub async fn budgets(&self) -> Result<Vec<BudgetSummary>, YnabError> {
        let mut endpoint = self.endpoint("budgets")?;
        endpoint
            .query_pairs_mut()
            .append_pair("include_accounts", "true");

        let data: BudgetsData = self.send(self.http.get(endpoint)).await?;
        Ok(data.budgets)
    }

    /// GET budgets/{budget_id}/categories
    pub async fn categories(
        &self,
        budget_id: &str,
    ) -> Result<Vec<CategoryGroupWithCategories>, YnabError> {
        let endpoint = self.endpoint(&format!("budgets/{budget_id}/categories"))?;
        let data: CategoriesData = self.send(self.http.get(endpoint)).await?;
        Ok(data.category_groups)
    }

    /// POST budgets/{budget_id}/transactions with a single transaction.
    pub async fn create_transaction(
        &self,
        budget_id: &str,
        transaction: SaveTransaction,
    ) -> Result<SaveTransactionsData, YnabError> {
        let endpoint = self.endpoint(&format!("budgets/{budget_id}/transactions"))?;
        let payload = PostTransaction { transaction };
        self.send(self.http.post(endpoint).json(&payload)).await
    }

    /// POST budgets/{budget_id}/transactions in bulk.
    pub async fn create_transactions(
        &self,
        budget_id: &str,
        transactions: Vec<SaveTransaction>,
    ) -> Result<SaveTransactionsData, YnabError> {
        let endpoint = self.endpoint(&format!("budgets/{budget_id}/transactions"))?;
        let payload = PostTransactions { transactions };
        self.send(self.http.post(endpoint).json(&payload)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_keep_the_version_prefix() {
        let client = YnabClient::new(DEFAULT_BASE_URL, "token").unwrap();
        assert_eq!(
            client.endpoint("budgets/abc/categories").unwrap().as_str(),
            "https://api.ynab.com/v1/budgets/abc/categories"
        );
    }

    #[test]
    fn rejects_invalid_configuration() {
        assert!(matches!(
            YnabClient::new("not a url", "token"),
            Err(YnabError::Config(_))
        ));
        assert!(matches!(
            YnabClient::new(DEFAULT_BASE_URL, "line\nbreak"),
            Err(YnabError::Config(_))
        ));
    }
}
