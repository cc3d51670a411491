//! Per-test contract fixture and advertisement payloads.
//!
//! Every test builds its own [`Fixture`]: a fresh mock provider plus a client
//! pointed at it. Nothing is shared between tests.
#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use adposting_core::client::{ADVERTISEMENT_ACCEPT, ADVERTISEMENT_CONTENT_TYPE};
use adposting_core::{
    AdPostingApiClient, Advertisement, AdvertisementType, Contact, OAuth2Token, ReqwestTransport,
    Salary, SalaryType, StaticTokenProvider, Standout, Template, TemplateItem, Video,
    VideoPosition, WorkType,
};
use mock_provider::{ExpectedRequest, Interaction, MockProvider, StubResponse};
use serde_json::{json, Value};

pub const ACCESS_TOKEN: &str = "b635a7ea-1361-4cd8-9a07-bc3c12b2cf9e";
pub const HAL_JSON: &str = "application/hal+json";
pub const ADVERTISEMENT_LINK: &str = "/advertisement";
pub const ADVERTISEMENT_ID: &str = "8e2fde50-bc5f-4a12-9cfb-812e50500184";
pub const RESPONSE_CONTENT_TYPE: &str = "application/vnd.seek.advertisement+json; version=1; charset=utf-8";
pub const ERROR_CONTENT_TYPE: &str =
    "application/vnd.seek.advertisement-error+json; version=1; charset=utf-8";

pub struct Fixture {
    pub provider: MockProvider,
    pub client: AdPostingApiClient,
}

impl Fixture {
    pub async fn start() -> Self {
        let provider = MockProvider::start("ad-posting-client", "ad-posting-api")
            .await
            .unwrap();
        let transport = ReqwestTransport::new(Duration::from_secs(10), "contract-tests").unwrap();
        let client = AdPostingApiClient::new(
            &provider.base_uri(),
            Arc::new(transport),
            Arc::new(StaticTokenProvider::new(OAuth2Token::new(ACCESS_TOKEN))),
        )
        .unwrap();
        Self { provider, client }
    }

    pub async fn given(&self, interaction: Interaction) {
        self.provider.register(interaction).await;
    }

    pub async fn verify(&self) {
        self.provider.verify().await.unwrap();
    }
}

pub fn bearer() -> String {
    format!("Bearer {ACCESS_TOKEN}")
}

pub fn hal_get(path: &str) -> ExpectedRequest {
    ExpectedRequest::get(path)
        .header("Accept", HAL_JSON)
        .header("Authorization", bearer())
}

pub fn advertisement_write(method: &str, path: &str, body: Value) -> ExpectedRequest {
    ExpectedRequest::new(method, path)
        .header("Authorization", bearer())
        .header("Content-Type", ADVERTISEMENT_CONTENT_TYPE)
        .header("Accept", ADVERTISEMENT_ACCEPT)
        .json_body(body)
}

pub fn root_interaction() -> Interaction {
    Interaction::new("a request to retrieve API links")
        .upon(hal_get("/"))
        .will_respond_with(
            StubResponse::new(200)
                .header("Content-Type", "application/hal+json; charset=utf-8")
                .json_body(json!({
                    "_links": {
                        "advertisements": { "href": ADVERTISEMENT_LINK },
                        "advertisement": {
                            "href": format!("{ADVERTISEMENT_LINK}/{{advertisementId}}"),
                            "templated": true
                        }
                    }
                })),
        )
}

pub fn advertisement_path(id: &str) -> String {
    format!("{ADVERTISEMENT_LINK}/{id}")
}

/// Body of an advertisement response: the fields plus `self` and `view`.
pub fn with_links(advertisement: &Advertisement, id: &str) -> Value {
    let mut body = serde_json::to_value(advertisement).unwrap();
    body["_links"] = json!({
        "self": { "href": advertisement_path(id) },
        "view": { "href": format!("{}/view", advertisement_path(id)) }
    });
    body
}

pub fn minimum_fields() -> Advertisement {
    Advertisement {
        advertiser_id: Some("9012".to_string()),
        job_title: Some("Exciting Senior Developer role in a great CBD location. Great $$$".to_string()),
        job_summary: Some("Developer job".to_string()),
        advertisement_details: Some("Exciting Senior Developer role in a great CBD location. Great $$$".to_string()),
        advertisement_type: Some(AdvertisementType::Classic),
        work_type: Some(WorkType::FullTime),
        salary: Some(Salary {
            salary_type: Some(SalaryType::AnnualPackage),
            minimum: Some(100000.0),
            maximum: Some(119999.0),
            details: None,
        }),
        location_id: Some("1002".to_string()),
        area_id: Some("1750".to_string()),
        subclassification_id: Some("6227".to_string()),
        ..Advertisement::default()
    }
}

pub fn all_fields() -> Advertisement {
    Advertisement {
        agent_id: Some("3005".to_string()),
        advertisement_type: Some(AdvertisementType::StandOut),
        job_reference: Some("JOB1234".to_string()),
        agent_job_reference: Some("AGENTJOB1234".to_string()),
        contact: Some(Contact {
            name: Some("Contact name".to_string()),
            phone: Some("Contact phone".to_string()),
            email: Some("qwert@asdf.com".to_string()),
        }),
        video: Some(Video {
            url: Some("https://www.youtube.com/embed/j7jm7wb6z8Q".to_string()),
            position: Some(VideoPosition::Above),
        }),
        application_email: Some("asdf@asdf.com".to_string()),
        application_form_url: Some("http://apply.com/".to_string()),
        end_application_url: Some("http://endform.com/".to_string()),
        screen_id: Some(1),
        template: Some(Template {
            id: Some(1),
            items: vec![
                TemplateItem {
                    name: "Template Line 1".to_string(),
                    value: "Template Value 1".to_string(),
                },
                TemplateItem {
                    name: "Template Line 2".to_string(),
                    value: "Template Value 2".to_string(),
                },
            ],
        }),
        standout: Some(Standout {
            logo_id: Some(1),
            bullets: vec![
                "Uzi".to_string(),
                "Remington Model".to_string(),
                "AK-47".to_string(),
            ],
        }),
        seek_codes: vec!["SK010".to_string()],
        ..minimum_fields()
    }
}
