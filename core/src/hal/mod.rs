//! HAL navigation engine.
//!
//! # Overview
//! A fetched document owns its [`Links`]. Following a relation resolves the
//! link, expands its template, joins the result against the base URI, and
//! issues one authenticated request through the [`Transport`]. The response
//! is status-checked by the error mapper before it is deserialized.
//!
//! # Design
//! - Resources are plain values. They do not hold a client; navigation
//!   takes the [`HalClient`] explicitly, so each snapshot stays independently
//!   owned and immutable.
//! - Link resolution and template expansion both happen before any I/O. A
//!   missing relation or parameter never reaches the network.

pub mod link;
pub mod page;

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, instrument};
use url::Url;

use crate::error::{check_status, ApiError, ApiResult};
use crate::http::{HttpMethod, HttpRequest, HttpResponse, Transport};
use crate::token::TokenProvider;

pub use link::{Link, Links, TemplateParams};
pub use page::{Embedded, Page};

pub const HAL_JSON: &str = "application/hal+json";

/// Anything that carries a `_links` table.
pub trait HalResource {
    fn links(&self) -> &Links;

    fn link(&self, relation: &str) -> ApiResult<&Link> {
        self.links().resolve(relation)
    }
}

/// Issues authenticated HAL requests relative to a base URI.
#[derive(Clone)]
pub struct HalClient {
    base: Url,
    transport: Arc<dyn Transport>,
    tokens: Arc<dyn TokenProvider>,
}

impl std::fmt::Debug for HalClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HalClient").field("base", &self.base.as_str()).finish()
    }
}

impl HalClient {
    pub fn new(
        base_uri: &str,
        transport: Arc<dyn Transport>,
        tokens: Arc<dyn TokenProvider>,
    ) -> ApiResult<Self> {
        let base = Url::parse(base_uri).map_err(|e| ApiError::InvalidUri(format!("{base_uri}: {e}")))?;
        Ok(Self {
            base,
            transport,
            tokens,
        })
    }

    pub fn base_uri(&self) -> &Url {
        &self.base
    }

    /// Join `href` against the base URI. Absolute hrefs pass through.
    pub fn resolve_uri(&self, href: &str) -> ApiResult<String> {
        self.base
            .join(href)
            .map(String::from)
            .map_err(|e| ApiError::InvalidUri(format!("{href}: {e}")))
    }

    /// Follow `relation` on `resource` and deserialize the target.
    pub async fn fetch_related<T, R>(
        &self,
        resource: &R,
        relation: &str,
        params: &TemplateParams,
    ) -> ApiResult<T>
    where
        T: DeserializeOwned,
        R: HalResource + ?Sized,
    {
        self.follow(resource.links(), relation, params).await
    }

    #[instrument(level = "debug", skip(self, links, params))]
    pub async fn follow<T: DeserializeOwned>(
        &self,
        links: &Links,
        relation: &str,
        params: &TemplateParams,
    ) -> ApiResult<T> {
        let href = links.resolve(relation)?.expand(params)?;
        self.get(&href).await
    }

    /// GET a HAL document by href.
    pub async fn get<T: DeserializeOwned>(&self, href: &str) -> ApiResult<T> {
        let url = self.resolve_uri(href)?;
        let request = build_request(HttpMethod::Get, url, vec![accept(HAL_JSON)], None);
        let response = self.dispatch(request).await?;
        parse_body(&response)
    }

    /// Send `body` as JSON with the given verb and media types.
    pub async fn send_json<B, T>(
        &self,
        method: HttpMethod,
        href: &str,
        body: &B,
        content_type: &str,
        accept_types: &str,
    ) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.resolve_uri(href)?;
        let payload =
            serde_json::to_string(body).map_err(|e| ApiError::Serialization(e.to_string()))?;
        let request = build_request(
            method,
            url,
            vec![
                ("Content-Type".to_string(), content_type.to_string()),
                accept(accept_types),
            ],
            Some(payload),
        );
        let response = self.dispatch(request).await?;
        parse_body(&response)
    }

    /// Attach the bearer token, execute, and map error statuses.
    async fn dispatch(&self, mut request: HttpRequest) -> ApiResult<HttpResponse> {
        let token = self.tokens.get_token().await?;
        request
            .headers
            .push(("Authorization".to_string(), token.authorization_header()));

        debug!(method = %request.method, url = %request.url, "sending request");
        let method = request.method;
        let response = self.transport.execute(request).await?;
        check_status(method, &response)?;
        Ok(response)
    }
}

fn accept(value: &str) -> (String, String) {
    ("Accept".to_string(), value.to_string())
}

fn build_request(
    method: HttpMethod,
    url: String,
    headers: Vec<(String, String)>,
    body: Option<String>,
) -> HttpRequest {
    HttpRequest {
        method,
        url,
        headers,
        body,
    }
}

fn parse_body<T: DeserializeOwned>(response: &HttpResponse) -> ApiResult<T> {
    serde_json::from_str(&response.body).map_err(|e| ApiError::Deserialization(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{hal_client, json_response, RecordingTransport};
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    #[serde(rename_all = "camelCase")]
    struct Thing {
        name: Option<String>,
        size: Option<u32>,
        #[serde(rename = "_links", default)]
        links: Links,
    }

    impl HalResource for Thing {
        fn links(&self) -> &Links {
            &self.links
        }
    }

    fn thing_with_links() -> Thing {
        Thing {
            name: None,
            size: None,
            links: Links::new()
                .with("self", Link::new("/things/1"))
                .with("child", Link::templated("/things/1/children/{childId}")),
        }
    }

    #[tokio::test]
    async fn missing_relation_issues_no_request() {
        let transport = RecordingTransport::new(vec![]);
        let client = hal_client(&transport);

        let err = client
            .fetch_related::<Thing, _>(&thing_with_links(), "next", &TemplateParams::new())
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::RelationNotFound { ref relation } if relation == "next"));
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn missing_template_parameter_issues_no_request() {
        let transport = RecordingTransport::new(vec![]);
        let client = hal_client(&transport);

        let err = client
            .fetch_related::<Thing, _>(&thing_with_links(), "child", &TemplateParams::new())
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::MissingTemplateParameter { ref name } if name == "childId"));
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn follow_sends_hal_accept_and_bearer_token() {
        let transport = RecordingTransport::new(vec![json_response(200, r#"{"name":"child"}"#)]);
        let client = hal_client(&transport);

        let child: Thing = client
            .fetch_related(
                &thing_with_links(),
                "child",
                &TemplateParams::new().with("childId", 7),
            )
            .await
            .unwrap();

        assert_eq!(child.name.as_deref(), Some("child"));
        assert_eq!(child.size, None);
        assert!(child.links.is_empty());

        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, HttpMethod::Get);
        assert_eq!(requests[0].url, "http://localhost:8080/things/1/children/7");
        assert_eq!(requests[0].header("accept"), Some(HAL_JSON));
        assert_eq!(requests[0].header("authorization"), Some("Bearer test-token"));
        assert!(requests[0].body.is_none());
    }

    #[tokio::test]
    async fn mismatched_shape_is_a_deserialization_error() {
        let transport = RecordingTransport::new(vec![json_response(200, r#"{"size":"big"}"#)]);
        let client = hal_client(&transport);

        let err = client.get::<Thing>("/things/1").await.unwrap_err();
        assert!(matches!(err, ApiError::Deserialization(_)));
    }

    #[tokio::test]
    async fn error_status_is_mapped_before_deserializing() {
        let transport = RecordingTransport::new(vec![json_response(404, "")]);
        let client = hal_client(&transport);

        let err = client.get::<Thing>("/things/404").await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound));
    }

    #[tokio::test]
    async fn send_json_carries_body_and_media_types() {
        let transport = RecordingTransport::new(vec![json_response(201, r#"{"name":"made"}"#)]);
        let client = hal_client(&transport);

        let made: Thing = client
            .send_json(
                HttpMethod::Post,
                "/things",
                &serde_json::json!({ "name": "made" }),
                "application/json",
                HAL_JSON,
            )
            .await
            .unwrap();
        assert_eq!(made.name.as_deref(), Some("made"));

        let requests = transport.requests();
        assert_eq!(requests[0].method, HttpMethod::Post);
        assert_eq!(requests[0].header("content-type"), Some("application/json"));
        assert_eq!(requests[0].body.as_deref(), Some(r#"{"name":"made"}"#));
    }

    #[test]
    fn absolute_hrefs_are_not_rebased() {
        let transport = RecordingTransport::new(vec![]);
        let client = hal_client(&transport);
        assert_eq!(
            client.resolve_uri("https://elsewhere.example/x").unwrap(),
            "https://elsewhere.example/x"
        );
        assert_eq!(
            client.resolve_uri("/advertisement").unwrap(),
            "http://localhost:8080/advertisement"
        );
    }

    struct RevokedTokens;

    #[async_trait::async_trait]
    impl TokenProvider for RevokedTokens {
        async fn get_token(&self) -> ApiResult<crate::token::OAuth2Token> {
            Err(ApiError::Token("refresh token revoked".to_string()))
        }
    }

    #[tokio::test]
    async fn token_failure_issues_no_request() {
        let transport = RecordingTransport::new(vec![json_response(200, "{}")]);
        let client = HalClient::new(
            crate::testing::BASE_URL,
            Arc::new(transport.clone()),
            Arc::new(RevokedTokens),
        )
        .unwrap();

        let err = client.get::<Thing>("/things/1").await.unwrap_err();

        assert!(matches!(err, ApiError::Token(ref reason) if reason == "refresh token revoked"));
        assert!(transport.requests().is_empty());
    }

    #[test]
    fn bad_base_uri_is_rejected() {
        let transport = RecordingTransport::new(vec![]);
        let tokens = Arc::new(crate::token::StaticTokenProvider::new(
            crate::token::OAuth2Token::new("t"),
        ));
        let err = HalClient::new("not a uri", Arc::new(transport), tokens).unwrap_err();
        assert!(matches!(err, ApiError::InvalidUri(_)));
    }
}
