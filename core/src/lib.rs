//! Synchronous client for a cloud provider's load balancer (BLB) API.
//!
//! # Overview
//! Four operations against the `v1/blb` resource: create, describe, update
//! and delete. `BlbClient` builds `HttpRequest` values and parses
//! `HttpResponse` values without touching the network (host-does-IO
//! pattern); `LoadBalancerClient` pairs it with a `Transport` for callers that
//! just want one call per operation.
//!
//! # Design
//! - `BlbClient` is stateless apart from its endpoint, user agent and client
//!   token generator.
//! - Mutating calls carry a fresh `clientToken` from a `ClientTokenGenerator`.
//! - Update bodies go through `to_json_with_fields`, so only `desc` and
//!   `name` are ever sent.
//! - Errors are returned unchanged: no retry, no recovery.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod json;
pub mod loadbalancer;
pub mod token;
pub mod types;

pub use client::BlbClient;
pub use config::ClientConfig;
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport, UreqTransport};
pub use json::to_json_with_fields;
pub use loadbalancer::LoadBalancerClient;
pub use token::{ClientTokenGenerator, UuidTokenGenerator};
pub use types::{
    CreateLoadBalancerArgs, CreateLoadBalancerResponse, DeleteLoadBalancerArgs,
    DescribeLoadBalancersArgs, DescribeLoadBalancersResponse, LoadBalancer, ServiceErrorBody,
    UpdateLoadBalancerArgs,
};
