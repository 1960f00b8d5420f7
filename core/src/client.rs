//! Stateless HTTP request builder and response parser for the `v1/blb` API.
//!
//! # Design
//! `BlbClient` holds only the endpoint, a user agent and a client token
//! generator, and carries no mutable state between calls. Each operation is
//! split into a `build_*` method that produces an `HttpRequest` and a
//! `parse_*` method that consumes an `HttpResponse`. A `Transport` (or the
//! caller) executes the round-trip in between, keeping this module free of
//! I/O.

use std::sync::Arc;

use tracing::{debug, warn};
use url::Url;

use crate::config::{default_user_agent, ClientConfig};
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::json::to_json_with_fields;
use crate::token::{ClientTokenGenerator, UuidTokenGenerator};
use crate::types::{
    CreateLoadBalancerArgs, CreateLoadBalancerResponse, DeleteLoadBalancerArgs,
    DescribeLoadBalancersArgs, DescribeLoadBalancersResponse, LoadBalancer, ServiceErrorBody,
    UpdateLoadBalancerArgs,
};

/// Path segments of the load balancer collection.
const RESOURCE: [&str; 2] = ["v1", "blb"];

const CLIENT_TOKEN: &str = "clientToken";

/// Fields of `UpdateLoadBalancerArgs` the server accepts in an update body.
const UPDATE_FIELDS: [&str; 2] = ["desc", "name"];

/// Synchronous, stateless request builder for the load balancer API.
#[derive(Debug, Clone)]
pub struct BlbClient {
    base_url: String,
    user_agent: String,
    tokens: Arc<dyn ClientTokenGenerator>,
}

impl BlbClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            user_agent: default_user_agent(),
            tokens: Arc::new(UuidTokenGenerator),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(&config.endpoint).with_user_agent(&config.user_agent)
    }

    pub fn with_user_agent(mut self, user_agent: &str) -> Self {
        self.user_agent = user_agent.to_string();
        self
    }

    pub fn with_token_generator(mut self, tokens: impl ClientTokenGenerator + 'static) -> Self {
        self.tokens = Arc::new(tokens);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `POST v1/blb`. A `clientToken` is attached only when `args` is given;
    /// `None` is sent as a JSON `null` body.
    pub fn build_create_load_balancer(
        &self,
        args: Option<&CreateLoadBalancerArgs>,
    ) -> Result<HttpRequest, ApiError> {
        let params = match args {
            Some(_) => vec![(CLIENT_TOKEN, self.tokens.generate())],
            None => Vec::new(),
        };
        let body = serde_json::to_string(&args).map_err(ApiError::Serialization)?;
        let url = self.url(&[], &params)?;
        Ok(self.request(HttpMethod::Post, url, Some(body)))
    }

    /// `GET v1/blb` with the filter query. `None` lists with server defaults.
    pub fn build_describe_load_balancers(
        &self,
        args: Option<&DescribeLoadBalancersArgs>,
    ) -> Result<HttpRequest, ApiError> {
        let url = self.url(&[], &describe_params(args))?;
        Ok(self.request(HttpMethod::Get, url, None))
    }

    /// Like `build_describe_load_balancers`, plus the `marker` and `maxKeys`
    /// cursor parameters when given.
    pub fn build_describe_load_balancers_page(
        &self,
        args: Option<&DescribeLoadBalancersArgs>,
        marker: Option<&str>,
        max_keys: Option<u32>,
    ) -> Result<HttpRequest, ApiError> {
        let mut params = describe_params(args);
        if let Some(marker) = marker {
            params.push(("marker", marker.to_string()));
        }
        if let Some(max_keys) = max_keys {
            params.push(("maxKeys", max_keys.to_string()));
        }
        let url = self.url(&[], &params)?;
        Ok(self.request(HttpMethod::Get, url, None))
    }

    /// `PUT v1/blb/{id}` carrying only `desc` and `name`.
    pub fn build_update_load_balancer(
        &self,
        args: Option<&UpdateLoadBalancerArgs>,
    ) -> Result<HttpRequest, ApiError> {
        let args = args.ok_or(ApiError::MissingArguments("UpdateLoadBalancer"))?;
        let body = to_json_with_fields(args, &UPDATE_FIELDS)?;
        let params = [(CLIENT_TOKEN, self.tokens.generate())];
        let url = self.url(&[args.load_balancer_id.as_str()], &params)?;
        Ok(self.request(HttpMethod::Put, url, Some(body)))
    }

    /// `DELETE v1/blb/{id}`.
    pub fn build_delete_load_balancer(
        &self,
        args: Option<&DeleteLoadBalancerArgs>,
    ) -> Result<HttpRequest, ApiError> {
        let args = args.ok_or(ApiError::MissingArguments("DeleteLoadBalancer"))?;
        let params = [(CLIENT_TOKEN, self.tokens.generate())];
        let url = self.url(&[args.load_balancer_id.as_str()], &params)?;
        Ok(self.request(HttpMethod::Delete, url, None))
    }

    pub fn parse_create_load_balancer(
        &self,
        response: HttpResponse,
    ) -> Result<CreateLoadBalancerResponse, ApiError> {
        check_status(&response)?;
        serde_json::from_str(&response.body).map_err(ApiError::Deserialization)
    }

    /// Returns only the `blbList` of the page; the cursor fields are dropped.
    pub fn parse_describe_load_balancers(
        &self,
        response: HttpResponse,
    ) -> Result<Vec<LoadBalancer>, ApiError> {
        Ok(self.parse_describe_load_balancers_page(response)?.blb_list)
    }

    pub fn parse_describe_load_balancers_page(
        &self,
        response: HttpResponse,
    ) -> Result<DescribeLoadBalancersResponse, ApiError> {
        check_status(&response)?;
        serde_json::from_str(&response.body).map_err(ApiError::Deserialization)
    }

    pub fn parse_update_load_balancer(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response)
    }

    pub fn parse_delete_load_balancer(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response)
    }

    /// Absolute URL of `v1/blb[/segments..]` with `params` as the query.
    fn url(&self, segments: &[&str], params: &[(&str, String)]) -> Result<String, ApiError> {
        let mut url = Url::parse(&self.base_url)?;
        url.path_segments_mut()
            .map_err(|_| ApiError::Config(format!("endpoint {} cannot be a base url", self.base_url)))?
            .pop_if_empty()
            .extend(RESOURCE)
            .extend(segments);
        if !params.is_empty() {
            url.query_pairs_mut().extend_pairs(params);
        }
        Ok(url.into())
    }

    fn request(&self, method: HttpMethod, url: String, body: Option<String>) -> HttpRequest {
        let mut headers = vec![("user-agent".to_string(), self.user_agent.clone())];
        if body.is_some() {
            headers.push(("content-type".to_string(), "application/json".to_string()));
        }
        debug!(%method, %url, "built request");
        HttpRequest {
            method,
            url,
            headers,
            body,
        }
    }
}

/// Filter query for describe calls, in a stable order. Empty filters are sent
/// as empty strings.
fn describe_params(args: Option<&DescribeLoadBalancersArgs>) -> Vec<(&'static str, String)> {
    let Some(args) = args else {
        return Vec::new();
    };
    vec![
        ("blbId", args.load_balancer_id.clone()),
        ("name", args.load_balancer_name.clone()),
        ("bccId", args.bcc_id.clone()),
        ("address", args.address.clone()),
        ("exactlyMatch", args.exactly_match.to_string()),
    ]
}

/// Map non-2xx responses to `Service` when the body is the provider's error
/// envelope and to `Http` otherwise.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    warn!(status = response.status, "request failed");
    match serde_json::from_str::<ServiceErrorBody>(&response.body) {
        Ok(err) => Err(ApiError::Service {
            status: response.status,
            code: err.code,
            message: err.message,
            request_id: err.request_id,
        }),
        Err(_) => Err(ApiError::Http {
            status: response.status,
            body: response.body.clone(),
        }),
    }
}
