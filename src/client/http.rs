use serde::{Serialize, de::DeserializeOwned};
use uuid::Uuid;

use super::{ClientError, TripApi};
use crate::models::{
    Activity, Comment, CreateCommentRequest, Flight, HeartbeatRequest, Hotel, ItemPatch, ItemType,
    LoginRequest, LoginResponse, NewItem, OnlineUser, Restaurant, TripItem, UpdateActivityRequest,
    UpdateCommentRequest, UpdateFlightRequest, UpdateHotelRequest, UpdateRestaurantRequest,
    UserSummary, VoteOutcome, VoteRequest,
};

/// HTTP client for the trip API. The session cookie set by login is kept
/// in the underlying cookie store, so subsequent calls are authenticated.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder().cookie_store(true).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();

        Ok(ApiClient { http, base_url })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/{}", self.base_url, path)
    }

    /// Maps non-success responses to `ClientError::Api`, pulling the
    /// message out of the server's `{"error": ...}` body when present.
    async fn expect_ok(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response
            .json::<serde_json::Value>()
            .await
            .ok()
            .and_then(|body| {
                body.get("error")
                    .and_then(|e| e.as_str())
                    .map(String::from)
            })
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string()
            });

        Err(ClientError::Api {
            status: status.as_u16(),
            message,
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let response = self.http.get(self.url(path)).send().await?;
        Ok(Self::expect_ok(response).await?.json().await?)
    }

    async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        let response = self.http.post(self.url(path)).json(body).send().await?;
        Ok(Self::expect_ok(response).await?.json().await?)
    }

    async fn put_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        let response = self.http.put(self.url(path)).json(body).send().await?;
        Ok(Self::expect_ok(response).await?.json().await?)
    }

    async fn patch_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        let response = self.http.patch(self.url(path)).json(body).send().await?;
        Ok(Self::expect_ok(response).await?.json().await?)
    }

    // Auth

    pub async fn login(&self, name: &str, pin: &str) -> Result<LoginResponse, ClientError> {
        self.post_json(
            "auth/login",
            &LoginRequest {
                name: name.to_string(),
                pin: pin.to_string(),
            },
        )
        .await
    }

    pub async fn current_user(&self) -> Result<Option<UserSummary>, ClientError> {
        self.get_json("auth/me").await
    }

    // Presence

    pub async fn heartbeat(&self, req: &HeartbeatRequest) -> Result<(), ClientError> {
        let response = self.http.post(self.url("presence")).json(req).send().await?;
        Self::expect_ok(response).await?;
        Ok(())
    }

    pub async fn online_users(&self) -> Result<Vec<OnlineUser>, ClientError> {
        self.get_json("presence").await
    }

    // Version probe

    pub async fn version(&self) -> Result<String, ClientError> {
        let body: serde_json::Value = self.get_json("version").await?;
        Ok(body
            .get("version")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string())
    }
}

impl TripApi for ApiClient {
    async fn fetch_items(&self, kind: ItemType) -> Result<Vec<TripItem>, ClientError> {
        match kind {
            ItemType::Flight => Ok(self
                .get_json::<Vec<Flight>>("flights")
                .await?
                .into_iter()
                .map(TripItem::Flight)
                .collect()),
            ItemType::Hotel => Ok(self
                .get_json::<Vec<Hotel>>("hotels")
                .await?
                .into_iter()
                .map(TripItem::Hotel)
                .collect()),
            ItemType::Activity => Ok(self
                .get_json::<Vec<Activity>>("activities")
                .await?
                .into_iter()
                .map(TripItem::Activity)
                .collect()),
            ItemType::Restaurant => Ok(self
                .get_json::<Vec<Restaurant>>("restaurants")
                .await?
                .into_iter()
                .map(TripItem::Restaurant)
                .collect()),
        }
    }

    async fn create_item(&self, new: &NewItem) -> Result<TripItem, ClientError> {
        match new {
            NewItem::Flight(n) => Ok(TripItem::Flight(self.post_json("flights", n).await?)),
            NewItem::Hotel(n) => Ok(TripItem::Hotel(self.post_json("hotels", n).await?)),
            NewItem::Activity(n) => Ok(TripItem::Activity(self.post_json("activities", n).await?)),
            NewItem::Restaurant(n) => {
                Ok(TripItem::Restaurant(self.post_json("restaurants", n).await?))
            }
        }
    }

    async fn update_item(&self, id: Uuid, patch: &ItemPatch) -> Result<TripItem, ClientError> {
        match patch {
            ItemPatch::Flight(p) => Ok(TripItem::Flight(
                self.put_json(
                    "flights",
                    &UpdateFlightRequest {
                        id,
                        patch: p.clone(),
                    },
                )
                .await?,
            )),
            ItemPatch::Hotel(p) => Ok(TripItem::Hotel(
                self.put_json(
                    "hotels",
                    &UpdateHotelRequest {
                        id,
                        patch: p.clone(),
                    },
                )
                .await?,
            )),
            ItemPatch::Activity(p) => Ok(TripItem::Activity(
                self.put_json(
                    "activities",
                    &UpdateActivityRequest {
                        id,
                        patch: p.clone(),
                    },
                )
                .await?,
            )),
            ItemPatch::Restaurant(p) => Ok(TripItem::Restaurant(
                self.put_json(
                    "restaurants",
                    &UpdateRestaurantRequest {
                        id,
                        patch: p.clone(),
                    },
                )
                .await?,
            )),
        }
    }

    async fn delete_item(&self, kind: ItemType, id: Uuid) -> Result<(), ClientError> {
        let response = self
            .http
            .delete(self.url(kind.table()))
            .query(&[("id", id)])
            .send()
            .await?;
        Self::expect_ok(response).await?;
        Ok(())
    }

    async fn toggle_vote(&self, req: &VoteRequest) -> Result<VoteOutcome, ClientError> {
        self.post_json("votes", req).await
    }

    async fn create_comment(&self, req: &CreateCommentRequest) -> Result<Comment, ClientError> {
        self.post_json("comments", req).await
    }

    async fn update_comment(&self, req: &UpdateCommentRequest) -> Result<Comment, ClientError> {
        self.patch_json("comments", req).await
    }

    async fn delete_comment(&self, id: Uuid, username: &str) -> Result<(), ClientError> {
        let response = self
            .http
            .delete(self.url("comments"))
            .query(&[("id", id.to_string()), ("username", username.to_string())])
            .send()
            .await?;
        Self::expect_ok(response).await?;
        Ok(())
    }
}
