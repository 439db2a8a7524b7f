//! In-memory view of the fruit catalog.
//!
//! Mutations go to the API and then reload the list, so `fruits` always
//! reflects what the server last returned.

use tracing::{debug, error};

use crate::api::{ApiClient, ApiError};
use crate::models::{Fruit, FruitInput};

pub struct FruitCatalog {
    api: ApiClient,
    pub fruits: Vec<Fruit>,
    pub loading: bool,
    pub error: Option<String>,
}

impl FruitCatalog {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            fruits: Vec::new(),
            loading: false,
            error: None,
        }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub async fn refresh(&mut self) -> Result<(), ApiError> {
        self.loading = true;
        let result = self.api.fetch_fruits().await;
        self.loading = false;

        match result {
            Ok(fruits) => {
                debug!(count = fruits.len(), "Catalog refreshed");
                self.fruits = fruits;
                self.error = None;
                Ok(())
            }
            Err(e) => Err(self.record(e, "Failed to load fruits")),
        }
    }

    pub async fn create(&mut self, fruit: &FruitInput) -> Result<(), ApiError> {
        if let Err(e) = self.api.create_fruit(fruit).await {
            return Err(self.record(e, "Create failed"));
        }
        self.refresh().await
    }

    pub async fn update(&mut self, id: i64, fruit: &FruitInput) -> Result<(), ApiError> {
        if let Err(e) = self.api.update_fruit(id, fruit).await {
            return Err(self.record(e, "Update failed"));
        }
        self.refresh().await
    }

    pub async fn delete(&mut self, id: i64) -> Result<(), ApiError> {
        if let Err(e) = self.api.delete_fruit(id).await {
            return Err(self.record(e, "Delete failed"));
        }
        self.refresh().await
    }

    /// Server-side search. Leaves `fruits` untouched.
    pub async fn search(&mut self, query: &str) -> Result<Vec<Fruit>, ApiError> {
        self.api
            .search_fruits(query)
            .await
            .map_err(|e| self.record(e, "Search failed"))
    }

    pub fn find(&self, id: i64) -> Option<&Fruit> {
        self.fruits.iter().find(|f| f.id == id)
    }

    /// Forget everything, e.g. after the session ends.
    pub fn clear(&mut self) {
        self.fruits.clear();
        self.error = None;
    }

    fn record(&mut self, e: ApiError, what: &str) -> ApiError {
        error!(error = %e, "{}", what);
        self.error = Some(format!("{}: {}", what, e));
        e
    }
}
