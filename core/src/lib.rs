//! Client core for the Ad Posting API.
//!
//! # Overview
//! The API is navigated through HAL links: the client fetches the root
//! document once, then reaches advertisements by following the relations it
//! advertises. Responses are deserialized into typed resources and error
//! statuses are mapped to [`ApiError`] variants at the call site.
//!
//! # Design
//! - [`hal`] is the generic engine: link tables, template expansion,
//!   following relations, and explicit page-by-page traversal.
//! - Requests and responses are plain data ([`HttpRequest`],
//!   [`HttpResponse`]). A [`Transport`] performs the round-trip, so the
//!   engine can be tested without a network.
//! - Bearer tokens come from an injected [`TokenProvider`]; the core never
//!   refreshes them and never retries.

pub mod client;
pub mod config;
pub mod error;
pub mod hal;
pub mod http;
pub mod model;
pub mod token;

#[cfg(test)]
mod testing;

pub use client::AdPostingApiClient;
pub use config::ClientConfig;
pub use error::{
    ApiError, ApiResult, ForbiddenData, ForbiddenMessage, ValidationData, ValidationMessage,
};
pub use hal::{Embedded, HalClient, HalResource, Link, Links, Page, TemplateParams};
pub use http::{HttpMethod, HttpRequest, HttpResponse, ReqwestTransport, Transport};
pub use model::{
    Advertisement, AdvertisementResource, AdvertisementSummary, AdvertisementType, Contact,
    Salary, SalaryType, Standout, Template, TemplateItem, Video, VideoPosition, WorkType,
};
pub use token::{OAuth2Token, StaticTokenProvider, TokenProvider};
