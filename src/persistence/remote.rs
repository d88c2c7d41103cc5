//! Remote backend: the kishop REST API over HTTP.

use reqwest::Response;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::{Backend, Persistence};
use crate::api::{
    BudgetBody, CreatedItem, ErrorBody, ItemBody, ItemsBody, SuccessBody, BUDGET_PATH, ITEMS_PATH,
};
use crate::error::{Error, Result};
use crate::model::{ItemId, LineItem};

/// Default server address.
pub const DEFAULT_API_URL: &str = "http://localhost:3001";

/// [`Persistence`] backed by a kishop server.
#[derive(Debug, Clone)]
pub struct RemotePersistence {
    client: reqwest::Client,
    base_url: String,
}

impl RemotePersistence {
    /// Create a client for the server at `base_url` (e.g. `http://localhost:3001`).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Create a client reusing an existing `reqwest::Client`.
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn item_url(&self, id: ItemId) -> String {
        format!("{}{ITEMS_PATH}/{id}", self.base_url)
    }

    /// Decode a successful response, or turn an error status into [`Error::Remote`].
    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&text)
                .map(|body| body.error)
                .unwrap_or(text);
            return Err(Error::Remote {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response.json().await?)
    }

    async fn expect_success(response: Response) -> Result<()> {
        let body: SuccessBody = Self::decode(response).await?;
        if body.success {
            Ok(())
        } else {
            Err(Error::Other("server reported success: false".into()))
        }
    }
}

impl Persistence for RemotePersistence {
    fn backend(&self) -> Backend {
        Backend::Remote
    }

    async fn load_budget(&self) -> Result<f64> {
        let response = self.client.get(self.url(BUDGET_PATH)).send().await?;
        let body: BudgetBody = Self::decode(response).await?;
        Ok(body.max_budget)
    }

    async fn save_budget(&self, max_budget: f64) -> Result<()> {
        let response = self
            .client
            .put(self.url(BUDGET_PATH))
            .json(&BudgetBody { max_budget })
            .send()
            .await?;
        Self::expect_success(response).await
    }

    async fn load_items(&self) -> Result<Vec<LineItem>> {
        let response = self.client.get(self.url(ITEMS_PATH)).send().await?;
        let body: ItemsBody<LineItem> = Self::decode(response).await?;
        debug!(count = body.items.len(), "items loaded from server");
        Ok(body.items)
    }

    async fn add_item(&self, item: &LineItem) -> Result<ItemId> {
        let response = self
            .client
            .post(self.url(ITEMS_PATH))
            .json(&ItemBody::from(item))
            .send()
            .await?;
        let created: CreatedItem = Self::decode(response).await?;
        debug!(id = created.id, "item created on server");
        Ok(created.id)
    }

    async fn update_item(&self, id: ItemId, item: &LineItem) -> Result<()> {
        let response = self
            .client
            .put(self.item_url(id))
            .json(&ItemBody::from(item))
            .send()
            .await?;
        Self::expect_success(response).await
    }

    async fn delete_item(&self, id: ItemId) -> Result<()> {
        let response = self.client.delete(self.item_url(id)).send().await?;
        Self::expect_success(response).await
    }

    async fn bulk_replace_items(&self, items: &[LineItem]) -> Result<()> {
        let body = ItemsBody {
            items: items.iter().map(ItemBody::from).collect::<Vec<_>>(),
        };
        let response = self
            .client
            .put(self.url(ITEMS_PATH))
            .json(&body)
            .send()
            .await?;
        Self::expect_success(response).await
    }
}
