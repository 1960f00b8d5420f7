//! Wire DTOs for the `v1/blb` API.
//!
//! # Design
//! Field names follow the provider's camelCase JSON. Response types default
//! every missing field so a sparse server reply still decodes, and request
//! types skip empty fields the way the server expects them to be omitted.
//! The mock-server crate defines its own copies; integration tests catch
//! schema drift between the two.

use serde::{Deserialize, Serialize};

fn is_false(value: &bool) -> bool {
    !*value
}

/// A load balancer as reported by the server.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LoadBalancer {
    #[serde(rename = "blbId")]
    pub blb_id: String,
    pub name: String,
    pub desc: String,
    pub address: String,
    pub status: String,
    #[serde(rename = "publicIp")]
    pub public_ip: String,
}

/// Filters for listing load balancers. Sent as query parameters, never as a
/// body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescribeLoadBalancersArgs {
    pub load_balancer_id: String,
    pub load_balancer_name: String,
    pub bcc_id: String,
    pub address: String,
    pub exactly_match: bool,
}

impl Default for DescribeLoadBalancersArgs {
    fn default() -> Self {
        Self {
            load_balancer_id: String::new(),
            load_balancer_name: String::new(),
            bcc_id: String::new(),
            address: String::new(),
            exactly_match: true,
        }
    }
}

/// One page of a load balancer listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct DescribeLoadBalancersResponse {
    pub marker: String,
    pub is_truncated: bool,
    pub next_marker: String,
    pub max_keys: u32,
    #[serde(rename = "blbList")]
    pub blb_list: Vec<LoadBalancer>,
}

/// Request payload for creating a load balancer. Empty fields are omitted.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct CreateLoadBalancerArgs {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub desc: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(rename = "vpcId", skip_serializing_if = "String::is_empty")]
    pub vpc_id: String,
    #[serde(rename = "subnetId", skip_serializing_if = "String::is_empty")]
    pub subnet_id: String,
    #[serde(skip_serializing_if = "is_false")]
    pub allocate_vip: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CreateLoadBalancerResponse {
    #[serde(rename = "blbId")]
    pub load_balancer_id: String,
    pub address: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub desc: String,
    pub name: String,
}

/// Request payload for updating a load balancer. Only `desc` and `name`
/// reach the wire; `blbId` selects the resource through the path.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct UpdateLoadBalancerArgs {
    #[serde(rename = "blbId")]
    pub load_balancer_id: String,
    pub desc: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DeleteLoadBalancerArgs {
    #[serde(rename = "blbId")]
    pub load_balancer_id: String,
}

/// Error envelope the server returns alongside non-2xx statuses.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ServiceErrorBody {
    pub code: String,
    pub message: String,
    #[serde(default)]
    pub request_id: String,
}
