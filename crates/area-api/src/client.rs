//! HTTP implementation of [`AreaApi`].
//!
//! [`ApiClient`] owns a `reqwest::Client` and a [`Session`]. It never acts on
//! a 401 by itself: the failure comes back as [`ApiFailure::Unauthorized`]
//! and the caller decides what to do with the session.

use std::path::PathBuf;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use url::Url;

use area_core::prelude::*;
use area_core::{
    About, AddAreaRequest, Applet, Area, AuthMode, AuthorizationList, CodeExchange, Draft,
    DraftField, DraftRemoval, SelectOption, ServiceAuthorizations, ServiceOptions,
    SubmitAppletRequest, User,
};

use crate::api::{AreaApi, Credentials};
use crate::request::{classify_response, message_of, Body, Request};
use crate::session::Session;

/// Default API base when nothing else is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:8080/api";

/// Per-request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base: Url,
    session: Session,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base", &self.base.as_str())
            .field("session", &self.session)
            .finish()
    }
}

impl ApiClient {
    /// Build a client for `base_url` (e.g. `http://localhost:8080/api`).
    pub fn new(base_url: &str, session: Session) -> Result<Self> {
        let normalized = base_url.trim_end_matches('/');
        let base = Url::parse(normalized).map_err(|_| Error::invalid_url(base_url))?;
        if base.cannot_be_a_base() {
            return Err(Error::invalid_url(base_url));
        }
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| Error::config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            http,
            base,
            session,
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Absolute URL for a path relative to the API base.
    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base.as_str().trim_end_matches('/'), path)
    }

    /// Perform a request and return the unwrapped payload.
    pub async fn execute(&self, request: Request) -> Result<Option<Value>> {
        let url = self.url_for(&request.path);
        debug!("{} {}", request.method.as_str(), url);

        let mut builder = self.http.request(request.method.into(), &url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        match &request.body {
            Some(Body::Json(body)) => builder = builder.json(body),
            Some(Body::Text(body)) => {
                builder = builder
                    .header(reqwest::header::CONTENT_TYPE, "text/plain")
                    .body(body.clone());
            }
            None => {}
        }
        if request.authenticated {
            if let Some(token) = self.session.token() {
                builder = builder.bearer_auth(token);
            }
        }

        self.send(builder, &request).await
    }

    async fn send(&self, builder: reqwest::RequestBuilder, request: &Request) -> Result<Option<Value>> {
        let response = builder.send().await.map_err(|e| {
            warn!("{} {} failed: {}", request.method.as_str(), request.path, e);
            ApiFailure::Transport(e.to_string())
        })?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| ApiFailure::Transport(e.to_string()))?;

        classify_response(status, &body, request.envelope).map_err(|failure| {
            match &failure {
                ApiFailure::Unauthorized => {
                    info!("{} {} answered 401", request.method.as_str(), request.path)
                }
                other => warn!("{} {}: {}", request.method.as_str(), request.path, other),
            }
            Error::Api(failure)
        })
    }

    /// Perform a request and decode its payload.
    pub async fn fetch<T: DeserializeOwned>(&self, request: Request) -> Result<T> {
        let payload = self.execute(request).await?;
        decode(payload.unwrap_or(Value::Null))
    }

    /// Perform a mutation and return its message.
    pub async fn mutate(&self, request: Request) -> Result<String> {
        Ok(message_of(self.execute(request).await?))
    }
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T> {
    serde_json::from_value(value).map_err(|e| Error::Api(ApiFailure::Decode(e.to_string())))
}

/// Extract a field of an object payload.
fn field<T: DeserializeOwned>(payload: Option<Value>, name: &str) -> Result<T> {
    let value = payload
        .and_then(|mut v| v.get_mut(name).map(Value::take))
        .unwrap_or(Value::Null);
    decode(value)
}

#[derive(Deserialize)]
struct ServicesPayload {
    services: ServiceAuthorizations,
}

impl AreaApi for ApiClient {
    async fn about(&self) -> Result<About> {
        self.fetch(Request::get("/about.json").raw())
            .await
    }

    async fn authenticate(&self, mode: AuthMode, credentials: Credentials) -> Result<String> {
        let request = Request::post(format!("/auth/{}", mode.as_path())).anonymous();
        let request = match &credentials {
            Credentials::Password(password) => request.json(password),
            Credentials::External(exchange) => request.json(exchange),
        };
        let token: String = field(self.execute(request).await?, "token")?;
        info!("Authenticated via {}", mode.as_path());
        Ok(token)
    }

    async fn authorizations(&self) -> Result<AuthorizationList> {
        self.fetch(Request::get("/authorization")).await
    }

    async fn service_authorizations(&self) -> Result<ServiceAuthorizations> {
        let payload: ServicesPayload = self.fetch(Request::get("/authorization/services")).await?;
        Ok(payload.services)
    }

    async fn create_authorization(&self, exchange: CodeExchange) -> Result<String> {
        self.mutate(Request::post("/authorization").json(&exchange))
            .await
    }

    async fn delete_authorization(&self, name: &str) -> Result<String> {
        self.mutate(Request::delete(format!("/authorization/{name}")))
            .await
    }

    async fn profile(&self) -> Result<User> {
        field(self.execute(Request::get("/me")).await?, "account")
    }

    async fn logout(&self) -> Result<String> {
        self.mutate(Request::post("/me/logout")).await
    }

    async fn update_profile(&self, username: &str) -> Result<String> {
        self.mutate(Request::put("/me").json(&json!({ "username": username })))
            .await
    }

    async fn delete_profile(&self) -> Result<String> {
        self.mutate(Request::delete("/me")).await
    }

    async fn avatar(&self) -> Result<String> {
        let origin = self.base.origin().ascii_serialization();
        field(
            self.execute(Request::get("/me/avatar").query("base", origin))
                .await?,
            "uri",
        )
    }

    async fn update_avatar(&self, file: PathBuf) -> Result<String> {
        let bytes = tokio::fs::read(&file).await?;
        let file_name = file
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "avatar".to_string());
        let form = reqwest::multipart::Form::new().part(
            "avatar",
            reqwest::multipart::Part::bytes(bytes).file_name(file_name),
        );

        let request = Request::put("/me/avatar");
        let mut builder = self
            .http
            .put(self.url_for(&request.path))
            .multipart(form);
        if let Some(token) = self.session.token() {
            builder = builder.bearer_auth(token);
        }
        Ok(message_of(self.send(builder, &request).await?))
    }

    async fn applets(&self) -> Result<Vec<Applet>> {
        // 204 means the user has no applets yet
        match self.execute(Request::get("/applet")).await? {
            None => Ok(Vec::new()),
            payload => Ok(field::<Option<Vec<Applet>>>(payload, "applets")?.unwrap_or_default()),
        }
    }

    async fn applet(&self, id: &str) -> Result<Applet> {
        field(self.execute(Request::get(format!("/applet/{id}"))).await?, "applet")
    }

    async fn applet_reactions(&self, id: &str) -> Result<Vec<Area>> {
        let reactions: Option<Vec<Area>> = field(
            self.execute(Request::get(format!("/applet/{id}/reactions")))
                .await?,
            "reactions",
        )?;
        Ok(reactions.unwrap_or_default())
    }

    async fn set_applet_activity(&self, id: &str, active: bool) -> Result<String> {
        self.mutate(Request::patch(format!("/applet/{id}")).query("active", active.to_string()))
            .await
    }

    async fn delete_applet(&self, id: &str) -> Result<String> {
        self.mutate(Request::delete(format!("/applet/{id}"))).await
    }

    async fn start_applet(&self, id: &str) -> Result<String> {
        self.mutate(Request::put(format!("/applet/{id}/start")))
            .await
    }

    async fn stop_applet(&self, id: &str) -> Result<String> {
        self.mutate(Request::put(format!("/applet/{id}/stop"))).await
    }

    async fn store(&self) -> Result<Vec<Applet>> {
        match self.execute(Request::get("/store").anonymous()).await? {
            None => Ok(Vec::new()),
            payload => Ok(field::<Option<Vec<Applet>>>(payload, "applets")?.unwrap_or_default()),
        }
    }

    async fn draft(&self, field_filter: DraftField) -> Result<Draft> {
        let mut request = Request::get("/applet/new");
        if field_filter != DraftField::All {
            request = request.query("field", field_filter.as_query());
        }
        let payload = self.execute(request).await?;
        decode(payload.unwrap_or_else(|| json!({})))
    }

    async fn add_draft_area(&self, request: AddAreaRequest) -> Result<String> {
        self.mutate(Request::put("/applet/new").json(&request)).await
    }

    async fn remove_draft_area(&self, removal: DraftRemoval) -> Result<String> {
        let (area_type, number) = removal.query();
        self.mutate(
            Request::delete("/applet/new")
                .query("type", area_type)
                .query("number", number),
        )
        .await
    }

    async fn submit_draft(&self, request: SubmitAppletRequest) -> Result<String> {
        self.mutate(Request::post("/applet/new").json(&request)).await
    }

    async fn service_options(&self, service: &str, endpoint: &str) -> Result<Vec<SelectOption>> {
        let payload: ServiceOptions = self
            .fetch(Request::get(format!("/services/{service}/api{endpoint}")))
            .await?;
        Ok(payload.options())
    }

    async fn trigger_webhook(&self, applet: &str, message: &str) -> Result<String> {
        let request = Request::post(format!("/services/webhook/api/{applet}")).text(message);
        self.mutate(request).await
    }
}
