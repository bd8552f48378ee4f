//! Remote gateway: the HTTP boundary between stores and the remote API
//!
//! The [`ResourceGateway`] trait is the seam stores drive their operations
//! through; [`HttpGateway`] is the reqwest-backed implementation that
//! translates one operation into one HTTP call. There are no retries, no
//! backoff and no request timeouts: any failure is surfaced immediately and
//! exactly once.

use crate::core::error::{ApiError, ApiResult};
use crate::core::payload::{FieldValue, FormField, Payload};
use crate::core::resource::{AuthPolicy, Operation, Resource};
use async_trait::async_trait;
use reqwest::{Method, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::marker::PhantomData;
use std::sync::Arc;
use validator::Validate;

/// Source of the current session's bearer token.
///
/// Implemented by [`SessionStore`](crate::session::SessionStore); tests
/// substitute fixed tokens.
pub trait TokenProvider: Send + Sync {
    /// The bearer token of the current session, if one is established
    fn token(&self) -> Option<String>;
}

/// A token provider with a fixed answer, useful for tests and scripts
pub struct StaticTokenProvider(pub Option<String>);

impl TokenProvider for StaticTokenProvider {
    fn token(&self) -> Option<String> {
        self.0.clone()
    }
}

/// Gateway trait for one entity's remote operations.
///
/// `list` takes the route explicitly so entity-specific collection
/// endpoints (recent, search, by-category) reuse the same call path.
#[async_trait]
pub trait ResourceGateway<R: Resource>: Send + Sync {
    /// GET a collection of records at the given route
    async fn list(&self, route: &str) -> ApiResult<Vec<R>>;

    /// GET one record by id
    async fn get(&self, id: i64) -> ApiResult<R>;

    /// POST a new record
    async fn create(&self, draft: &R::Draft) -> ApiResult<R>;

    /// PUT an existing record by id
    async fn update(&self, id: i64, draft: &R::Draft) -> ApiResult<R>;

    /// DELETE a record by id
    async fn delete(&self, id: i64) -> ApiResult<()>;
}

/// Reqwest-backed gateway for one entity type.
///
/// Checks the entity's per-operation access policy before any request
/// leaves the client: a protected operation with no session token fails
/// with [`ApiError::MissingToken`] and issues no network call, and an
/// operation the remote API does not expose for the entity fails with
/// [`ApiError::Unsupported`].
pub struct HttpGateway<R> {
    http: reqwest::Client,
    base_url: String,
    tokens: Arc<dyn TokenProvider>,
    _record: PhantomData<fn() -> R>,
}

impl<R: Resource> HttpGateway<R> {
    pub fn new(
        http: reqwest::Client,
        base_url: impl Into<String>,
        tokens: Arc<dyn TokenProvider>,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            tokens,
            _record: PhantomData,
        }
    }

    fn url(&self, route: &str) -> String {
        join_url(&self.base_url, route)
    }

    /// Resolve the access policy for `op` into an optional bearer token
    fn authorize(&self, op: Operation) -> ApiResult<Option<String>> {
        match R::auth(op) {
            None => Err(ApiError::Unsupported {
                entity: R::resource_name(),
                operation: op,
            }),
            Some(AuthPolicy::Public) => Ok(None),
            Some(AuthPolicy::Bearer) => self.tokens.token().map(Some).ok_or(ApiError::MissingToken),
        }
    }

    async fn send(
        &self,
        method: Method,
        route: &str,
        token: Option<String>,
        payload: Option<Payload>,
    ) -> ApiResult<reqwest::Response> {
        tracing::debug!(
            entity = R::resource_name(),
            %method,
            route,
            "dispatching request"
        );
        let mut request = self.http.request(method, self.url(route));
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        if let Some(payload) = payload {
            request = match payload {
                Payload::Json(value) => request.json(&value),
                Payload::Multipart(fields) => request.multipart(into_form(fields)?),
            };
        }
        Ok(request.send().await?)
    }
}

#[async_trait]
impl<R: Resource> ResourceGateway<R> for HttpGateway<R> {
    async fn list(&self, route: &str) -> ApiResult<Vec<R>> {
        let token = self.authorize(Operation::List)?;
        let response = self.send(Method::GET, route, token, None).await?;
        expect_json(response, R::resource_name(), None).await
    }

    async fn get(&self, id: i64) -> ApiResult<R> {
        let token = self.authorize(Operation::Get)?;
        let response = self
            .send(Method::GET, &R::get_route(id), token, None)
            .await?;
        expect_json(response, R::resource_name(), Some(id)).await
    }

    async fn create(&self, draft: &R::Draft) -> ApiResult<R> {
        let token = self.authorize(Operation::Create)?;
        draft.validate()?;
        let payload = R::encode(draft)?;
        let response = self
            .send(Method::POST, &R::create_route(), token, Some(payload))
            .await?;
        expect_json(response, R::resource_name(), None).await
    }

    async fn update(&self, id: i64, draft: &R::Draft) -> ApiResult<R> {
        let token = self.authorize(Operation::Update)?;
        draft.validate()?;
        let payload = R::encode(draft)?;
        let response = self
            .send(Method::PUT, &R::update_route(id), token, Some(payload))
            .await?;
        expect_json(response, R::resource_name(), Some(id)).await
    }

    async fn delete(&self, id: i64) -> ApiResult<()> {
        let token = self.authorize(Operation::Delete)?;
        let response = self
            .send(Method::DELETE, &R::delete_route(id), token, None)
            .await?;
        expect_success(response, R::resource_name(), Some(id)).await
    }
}

// =============================================================================
// Shared response handling (also used by the session store)
// =============================================================================

pub(crate) fn join_url(base: &str, route: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), route)
}

/// Read a successful JSON body, or map the failure into an [`ApiError`]
pub(crate) async fn expect_json<T: DeserializeOwned>(
    response: reqwest::Response,
    entity: &'static str,
    id: Option<i64>,
) -> ApiResult<T> {
    let status = response.status();
    let body = response.bytes().await.map_err(ApiError::from)?;
    if !status.is_success() {
        return Err(remote_error(status, &body, entity, id));
    }
    serde_json::from_slice(&body).map_err(|err| ApiError::Decode(err.to_string()))
}

/// Check the status of a response whose body carries no record
pub(crate) async fn expect_success(
    response: reqwest::Response,
    entity: &'static str,
    id: Option<i64>,
) -> ApiResult<()> {
    let status = response.status();
    let body = response.bytes().await.map_err(ApiError::from)?;
    if !status.is_success() {
        return Err(remote_error(status, &body, entity, id));
    }
    Ok(())
}

/// Map a non-success response into the error taxonomy: 404 on an
/// id-addressed route becomes `NotFound`, a body with a `message` field is
/// passed through verbatim, anything else is a generic transport failure.
pub(crate) fn remote_error(
    status: StatusCode,
    body: &[u8],
    entity: &'static str,
    id: Option<i64>,
) -> ApiError {
    if status == StatusCode::NOT_FOUND {
        if let Some(id) = id {
            return ApiError::NotFound { entity, id };
        }
    }

    #[derive(Deserialize)]
    struct RemoteMessage {
        message: String,
    }

    if let Ok(remote) = serde_json::from_slice::<RemoteMessage>(body) {
        return ApiError::Remote(remote.message);
    }
    ApiError::Transport(format!(
        "{} request failed with status {}",
        entity,
        status.as_u16()
    ))
}

fn into_form(fields: Vec<FormField>) -> ApiResult<reqwest::multipart::Form> {
    let mut form = reqwest::multipart::Form::new();
    for field in fields {
        form = match field.value {
            FieldValue::Text(value) => form.text(field.name, value),
            FieldValue::File(attachment) => {
                let part = reqwest::multipart::Part::bytes(attachment.bytes)
                    .file_name(attachment.file_name)
                    .mime_str(&attachment.content_type)
                    .map_err(|err| {
                        ApiError::Validation(format!(
                            "invalid content type for upload field '{}': {}",
                            field.name, err
                        ))
                    })?;
                form.part(field.name, part)
            }
        };
    }
    Ok(form)
}
