//! Event Kinds
//!
//! The fixed set of resource mutation events plus the generic invalidation
//! event.

use std::fmt;
use std::str::FromStr;

use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::client::Resource;

/// Resource mutation event types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    #[serde(rename = "transaction:created")]
    TransactionCreated,
    #[serde(rename = "transaction:updated")]
    TransactionUpdated,
    #[serde(rename = "transaction:deleted")]
    TransactionDeleted,
    #[serde(rename = "firm:created")]
    FirmCreated,
    #[serde(rename = "firm:updated")]
    FirmUpdated,
    #[serde(rename = "firm:deleted")]
    FirmDeleted,
    #[serde(rename = "vehicle:created")]
    VehicleCreated,
    #[serde(rename = "vehicle:updated")]
    VehicleUpdated,
    #[serde(rename = "vehicle:deleted")]
    VehicleDeleted,
    #[serde(rename = "pricing:created")]
    PricingCreated,
    #[serde(rename = "pricing:updated")]
    PricingUpdated,
    #[serde(rename = "pricing:deleted")]
    PricingDeleted,
    /// Fired alongside every other kind; listeners see the originating kind
    #[serde(rename = "cache:invalidated")]
    CacheInvalidated,
}

impl EventKind {
    pub const ALL: [EventKind; 13] = [
        EventKind::TransactionCreated,
        EventKind::TransactionUpdated,
        EventKind::TransactionDeleted,
        EventKind::FirmCreated,
        EventKind::FirmUpdated,
        EventKind::FirmDeleted,
        EventKind::VehicleCreated,
        EventKind::VehicleUpdated,
        EventKind::VehicleDeleted,
        EventKind::PricingCreated,
        EventKind::PricingUpdated,
        EventKind::PricingDeleted,
        EventKind::CacheInvalidated,
    ];

    /// Wire name, e.g. `vehicle:created`.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::TransactionCreated => "transaction:created",
            EventKind::TransactionUpdated => "transaction:updated",
            EventKind::TransactionDeleted => "transaction:deleted",
            EventKind::FirmCreated => "firm:created",
            EventKind::FirmUpdated => "firm:updated",
            EventKind::FirmDeleted => "firm:deleted",
            EventKind::VehicleCreated => "vehicle:created",
            EventKind::VehicleUpdated => "vehicle:updated",
            EventKind::VehicleDeleted => "vehicle:deleted",
            EventKind::PricingCreated => "pricing:created",
            EventKind::PricingUpdated => "pricing:updated",
            EventKind::PricingDeleted => "pricing:deleted",
            EventKind::CacheInvalidated => "cache:invalidated",
        }
    }

    /// Maps a successful write to its mutation event.
    ///
    /// POST creates, PUT and PATCH update, DELETE deletes. Any other method
    /// has no specific event.
    pub fn for_write(resource: Resource, method: &Method) -> Option<EventKind> {
        use EventKind::*;

        let (created, updated, deleted) = match resource {
            Resource::Firm => (FirmCreated, FirmUpdated, FirmDeleted),
            Resource::Vehicle => (VehicleCreated, VehicleUpdated, VehicleDeleted),
            Resource::Pricing => (PricingCreated, PricingUpdated, PricingDeleted),
            Resource::Transaction => (TransactionCreated, TransactionUpdated, TransactionDeleted),
        };

        if method == Method::POST {
            Some(created)
        } else if method == Method::PUT || method == Method::PATCH {
            Some(updated)
        } else if method == Method::DELETE {
            Some(deleted)
        } else {
            None
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EventKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("unknown event type: {}", s))
    }
}
