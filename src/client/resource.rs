//! Resource Families
//!
//! Maps endpoints to the resource they mutate and the cached families that
//! depend on it.

use std::fmt;

use crate::cache::strip_api_prefix;

/// A resource family with known cache dependencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Firm,
    Vehicle,
    Pricing,
    Transaction,
}

impl Resource {
    /// Resolves the resource an endpoint belongs to.
    ///
    /// The first path segment after an optional leading `/api` names the
    /// resource: `/api/vehicle/12` and `/vehicle?page=2` are both vehicles.
    /// Returns None for families without a dependency entry.
    pub fn from_endpoint(endpoint: &str) -> Option<Resource> {
        match resource_segment(endpoint)? {
            "firm" => Some(Resource::Firm),
            "vehicle" => Some(Resource::Vehicle),
            "pricing" => Some(Resource::Pricing),
            "transaction" => Some(Resource::Transaction),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Resource::Firm => "firm",
            Resource::Vehicle => "vehicle",
            Resource::Pricing => "pricing",
            Resource::Transaction => "transaction",
        }
    }

    /// Key fragments to invalidate after a successful write to this resource.
    pub fn invalidation_patterns(&self) -> &'static [&'static str] {
        match self {
            // vehicles, pricing and the dashboard all embed firm data
            Resource::Firm => &["/firm", "/vehicle", "/pricing", "/dashboard"],
            Resource::Vehicle => &["/vehicle", "/dashboard"],
            Resource::Pricing => &["/pricing", "/dashboard"],
            Resource::Transaction => &["/transaction", "/dashboard"],
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returns the first path segment after an optional leading `/api`,
/// ignoring any query string.
pub fn resource_segment(endpoint: &str) -> Option<&str> {
    let path = endpoint.split(['?', '#']).next().unwrap_or(endpoint);
    let path = strip_api_prefix(path).unwrap_or(path);
    path.split('/').find(|segment| !segment.is_empty())
}
