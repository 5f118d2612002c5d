use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

use crate::models::{DigestSubscription, UserProfile};

/// Errors that can occur when interacting with the Appwrite record store
#[derive(Debug, Error)]
pub enum AppwriteError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Per-user GitHub token stored by the account-linking flow
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GithubCredential {
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(rename = "accessToken")]
    pub access_token: String,
}

/// Collection IDs in Appwrite
#[derive(Debug, Clone)]
pub struct AppwriteCollections {
    pub user_profiles: String,
    pub github_credentials: String,
    pub digest_subscriptions: String,
}

/// Appwrite record store client
///
/// The preference store adapter: supplies user profiles (languages, topics,
/// followed repos/orgs, filter defaults), linked GitHub credentials and
/// digest subscriptions. The engine only ever reads profiles and
/// credentials; subscriptions and profiles are written by their own CRUD
/// routes.
pub struct AppwriteClient {
    base_url: String,
    api_key: String,
    project_id: String,
    database_id: String,
    client: Client,
    collections: AppwriteCollections,
}

impl AppwriteClient {
    /// Create a new Appwrite client
    pub fn new(
        base_url: String,
        api_key: String,
        project_id: String,
        database_id: String,
        collections: AppwriteCollections,
    ) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url,
            api_key,
            project_id,
            database_id,
            client,
            collections,
        }
    }

    fn documents_url(&self, collection: &str) -> String {
        format!(
            "{}/databases/{}/collections/{}/documents",
            self.base_url.trim_end_matches('/'),
            self.database_id,
            collection
        )
    }

    /// Fetch the first document in a collection matching the given user ID
    async fn find_by_user(&self, collection: &str, user_id: &str) -> Result<Value, AppwriteError> {
        let query_json = format!(r#"["userId={}"]"#, user_id);
        let encoded_query = urlencoding::encode(&query_json);
        let url = format!("{}?query={}", self.documents_url(collection), encoded_query);

        let response = self
            .client
            .get(&url)
            .header("X-Appwrite-Key", &self.api_key)
            .header("X-Appwrite-Project", &self.project_id)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AppwriteError::ApiError(format!(
                "Failed to query {}: {}",
                collection,
                response.status()
            )));
        }

        let json: Value = response.json().await?;

        let documents = json
            .get("documents")
            .and_then(|d| d.as_array())
            .ok_or_else(|| AppwriteError::InvalidResponse("Missing documents array".into()))?;

        documents
            .first()
            .cloned()
            .ok_or_else(|| AppwriteError::NotFound(format!("{} for user {}", collection, user_id)))
    }

    /// Create or update the document for a user in a collection
    ///
    /// Appwrite has no native upsert, so this queries for an existing
    /// document first and either PATCHes it or POSTs a new one.
    async fn upsert_by_user<T: Serialize>(
        &self,
        collection: &str,
        user_id: &str,
        payload: &T,
    ) -> Result<(), AppwriteError> {
        let existing = match self.find_by_user(collection, user_id).await {
            Ok(doc) => doc.get("$id").and_then(|id| id.as_str()).map(str::to_string),
            Err(AppwriteError::NotFound(_)) => None,
            Err(e) => return Err(e),
        };

        let mut body = serde_json::to_value(payload)
            .map_err(|e| AppwriteError::InvalidResponse(format!("Failed to encode payload: {}", e)))?;

        let response = match existing {
            Some(document_id) => {
                let url = format!("{}/{}", self.documents_url(collection), document_id);
                self.client
                    .patch(&url)
                    .header("X-Appwrite-Key", &self.api_key)
                    .header("X-Appwrite-Project", &self.project_id)
                    .json(&body)
                    .send()
                    .await?
            }
            None => {
                if let Some(obj) = body.as_object_mut() {
                    obj.insert(
                        "$id".to_string(),
                        Value::String(uuid::Uuid::new_v4().to_string()),
                    );
                }
                self.client
                    .post(&self.documents_url(collection))
                    .header("X-Appwrite-Key", &self.api_key)
                    .header("X-Appwrite-Project", &self.project_id)
                    .json(&body)
                    .send()
                    .await?
            }
        };

        if !response.status().is_success() {
            return Err(AppwriteError::ApiError(format!(
                "Failed to upsert into {}: {}",
                collection,
                response.status()
            )));
        }

        tracing::debug!("Upserted {} document for user {}", collection, user_id);
        Ok(())
    }

    /// Fetch a user's preference profile
    pub async fn get_profile(&self, user_id: &str) -> Result<UserProfile, AppwriteError> {
        let doc = self
            .find_by_user(&self.collections.user_profiles, user_id)
            .await?;
        let data = doc.get("data").unwrap_or(&doc);

        serde_json::from_value(data.clone())
            .map_err(|e| AppwriteError::InvalidResponse(format!("Failed to parse profile: {}", e)))
    }

    /// Create or replace a user's preference profile
    pub async fn upsert_profile(&self, profile: &UserProfile) -> Result<(), AppwriteError> {
        self.upsert_by_user(&self.collections.user_profiles, &profile.user_id, profile)
            .await
    }

    /// Fetch the GitHub credential linked to a user, if any
    pub async fn get_credential(&self, user_id: &str) -> Result<GithubCredential, AppwriteError> {
        let doc = self
            .find_by_user(&self.collections.github_credentials, user_id)
            .await?;
        let data = doc.get("data").unwrap_or(&doc);

        serde_json::from_value(data.clone()).map_err(|e| {
            AppwriteError::InvalidResponse(format!("Failed to parse credential: {}", e))
        })
    }

    /// Fetch a user's digest subscription
    pub async fn get_digest_subscription(
        &self,
        user_id: &str,
    ) -> Result<DigestSubscription, AppwriteError> {
        let doc = self
            .find_by_user(&self.collections.digest_subscriptions, user_id)
            .await?;
        let data = doc.get("data").unwrap_or(&doc);

        serde_json::from_value(data.clone()).map_err(|e| {
            AppwriteError::InvalidResponse(format!("Failed to parse subscription: {}", e))
        })
    }

    /// Create or update a user's digest subscription
    pub async fn upsert_digest_subscription(
        &self,
        subscription: &DigestSubscription,
    ) -> Result<(), AppwriteError> {
        self.upsert_by_user(
            &self.collections.digest_subscriptions,
            &subscription.user_id,
            subscription,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_appwrite_client_creation() {
        let collections = AppwriteCollections {
            user_profiles: "user_profiles".to_string(),
            github_credentials: "github_credentials".to_string(),
            digest_subscriptions: "digest_subscriptions".to_string(),
        };

        let client = AppwriteClient::new(
            "https://appwrite.test/v1".to_string(),
            "test_key".to_string(),
            "test_project".to_string(),
            "test_db".to_string(),
            collections,
        );

        assert_eq!(client.base_url, "https://appwrite.test/v1");
        assert_eq!(
            client.documents_url("user_profiles"),
            "https://appwrite.test/v1/databases/test_db/collections/user_profiles/documents"
        );
    }
}
