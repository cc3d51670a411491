//! Advertisement payloads.
//!
//! Every field is optional: a field missing from a response deserializes to
//! `None`, and `None` fields are left out of request bodies.

use serde::{Deserialize, Serialize};

use crate::hal::{Embedded, HalResource, Link, Links};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AdvertisementType {
    Classic,
    StandOut,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkType {
    FullTime,
    PartTime,
    ContractTemp,
    Casual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SalaryType {
    AnnualPackage,
    HourlyRate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VideoPosition {
    Above,
    Below,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Salary {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub salary_type: Option<SalaryType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Video {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<VideoPosition>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateItem {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<TemplateItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Standout {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_id: Option<i32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bullets: Vec<String>,
}

/// Writable fields of a job advertisement.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Advertisement {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub advertiser_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub advertisement_details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub advertisement_type: Option<AdvertisementType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub work_type: Option<WorkType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salary: Option<Salary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_job_reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subclassification_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<Contact>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video: Option<Video>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application_form_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_application_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub screen_id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<Template>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub standout: Option<Standout>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub seek_codes: Vec<String>,
}

// Consuming setters for the fields callers most often vary. Each returns a
// new value; there is no separate builder type.
impl Advertisement {
    pub fn with_advertiser_id(mut self, id: impl Into<String>) -> Self {
        self.advertiser_id = Some(id.into());
        self
    }

    pub fn with_agent_id(mut self, id: impl Into<String>) -> Self {
        self.agent_id = Some(id.into());
        self
    }

    /// Drop the agent, turning an agent ad into a direct one.
    pub fn without_agent_id(mut self) -> Self {
        self.agent_id = None;
        self
    }

    pub fn with_job_title(mut self, title: impl Into<String>) -> Self {
        self.job_title = Some(title.into());
        self
    }

    pub fn with_advertisement_details(mut self, details: impl Into<String>) -> Self {
        self.advertisement_details = Some(details.into());
        self
    }

    pub fn with_advertisement_type(mut self, kind: AdvertisementType) -> Self {
        self.advertisement_type = Some(kind);
        self
    }

    pub fn with_salary_minimum(mut self, minimum: f64) -> Self {
        self.salary.get_or_insert_with(Salary::default).minimum = Some(minimum);
        self
    }

    pub fn with_video_url(mut self, url: impl Into<String>) -> Self {
        self.video.get_or_insert_with(Video::default).url = Some(url.into());
        self
    }

    pub fn with_application_email(mut self, email: impl Into<String>) -> Self {
        self.application_email = Some(email.into());
        self
    }

    pub fn with_application_form_url(mut self, url: impl Into<String>) -> Self {
        self.application_form_url = Some(url.into());
        self
    }

    pub fn with_end_application_url(mut self, url: impl Into<String>) -> Self {
        self.end_application_url = Some(url.into());
        self
    }

    pub fn with_standout_bullets<I, S>(mut self, bullets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.standout.get_or_insert_with(Standout::default).bullets =
            bullets.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_template_items(mut self, items: Vec<TemplateItem>) -> Self {
        self.template.get_or_insert_with(Template::default).items = items;
        self
    }
}

/// An advertisement as returned by the provider, with its links.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdvertisementResource {
    #[serde(flatten)]
    pub advertisement: Advertisement,
    #[serde(rename = "_links", default)]
    pub links: Links,
}

impl AdvertisementResource {
    pub fn self_link(&self) -> Option<&Link> {
        self.links.get("self")
    }

    pub fn view_link(&self) -> Option<&Link> {
        self.links.get("view")
    }
}

impl HalResource for AdvertisementResource {
    fn links(&self) -> &Links {
        &self.links
    }
}

/// Collection entry for an advertisement.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvertisementSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub advertiser_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_reference: Option<String>,
    #[serde(rename = "_links", default)]
    pub links: Links,
}

impl Embedded for AdvertisementSummary {
    const RELATION: &'static str = "advertisements";
}

impl HalResource for AdvertisementSummary {
    fn links(&self) -> &Links {
        &self.links
    }
}
