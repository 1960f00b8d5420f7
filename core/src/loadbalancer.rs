//! One-call-per-operation client pairing `BlbClient` with a `Transport`.
//!
//! Each method is build, send, parse. Nothing is retried and every error is
//! returned as produced.

use std::collections::HashSet;

use tracing::{debug, warn};

use crate::client::BlbClient;
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{Transport, UreqTransport};
use crate::types::{
    CreateLoadBalancerArgs, CreateLoadBalancerResponse, DeleteLoadBalancerArgs,
    DescribeLoadBalancersArgs, DescribeLoadBalancersResponse, LoadBalancer,
    UpdateLoadBalancerArgs,
};

#[derive(Debug, Clone)]
pub struct LoadBalancerClient<T> {
    client: BlbClient,
    transport: T,
}

impl LoadBalancerClient<UreqTransport> {
    /// Client for `config.endpoint` over a blocking `ureq` transport.
    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(BlbClient::from_config(config), UreqTransport::new(config.timeout))
    }
}

impl<T: Transport> LoadBalancerClient<T> {
    pub fn new(client: BlbClient, transport: T) -> Self {
        Self { client, transport }
    }

    pub fn requests(&self) -> &BlbClient {
        &self.client
    }

    pub fn create_load_balancer(
        &self,
        args: Option<&CreateLoadBalancerArgs>,
    ) -> Result<CreateLoadBalancerResponse, ApiError> {
        let req = self.client.build_create_load_balancer(args)?;
        let resp = self.transport.send(req)?;
        self.client.parse_create_load_balancer(resp)
    }

    /// First page of the listing, as a bare list.
    pub fn describe_load_balancers(
        &self,
        args: Option<&DescribeLoadBalancersArgs>,
    ) -> Result<Vec<LoadBalancer>, ApiError> {
        let req = self.client.build_describe_load_balancers(args)?;
        let resp = self.transport.send(req)?;
        self.client.parse_describe_load_balancers(resp)
    }

    pub fn describe_load_balancers_page(
        &self,
        args: Option<&DescribeLoadBalancersArgs>,
        marker: Option<&str>,
        max_keys: Option<u32>,
    ) -> Result<DescribeLoadBalancersResponse, ApiError> {
        let req = self
            .client
            .build_describe_load_balancers_page(args, marker, max_keys)?;
        let resp = self.transport.send(req)?;
        self.client.parse_describe_load_balancers_page(resp)
    }

    /// Every page of the listing, following `nextMarker` while the server
    /// reports truncation. Stops early if the server hands back an empty
    /// marker or any marker already requested.
    pub fn describe_all_load_balancers(
        &self,
        args: Option<&DescribeLoadBalancersArgs>,
        max_keys: Option<u32>,
    ) -> Result<Vec<LoadBalancer>, ApiError> {
        let mut all = Vec::new();
        let mut requested = HashSet::new();
        let mut marker: Option<String> = None;
        loop {
            let page = self.describe_load_balancers_page(args, marker.as_deref(), max_keys)?;
            all.extend(page.blb_list);
            if !page.is_truncated || page.next_marker.is_empty() {
                break;
            }
            if !requested.insert(page.next_marker.clone()) {
                warn!(next_marker = %page.next_marker, "server repeated a marker, stopping");
                break;
            }
            debug!(next_marker = %page.next_marker, "fetching next page");
            marker = Some(page.next_marker);
        }
        Ok(all)
    }

    pub fn update_load_balancer(&self, args: Option<&UpdateLoadBalancerArgs>) -> Result<(), ApiError> {
        let req = self.client.build_update_load_balancer(args)?;
        let resp = self.transport.send(req)?;
        self.client.parse_update_load_balancer(resp)
    }

    pub fn delete_load_balancer(&self, args: Option<&DeleteLoadBalancerArgs>) -> Result<(), ApiError> {
        let req = self.client.build_delete_load_balancer(args)?;
        let resp = self.transport.send(req)?;
        self.client.parse_delete_load_balancer(resp)
    }
}
