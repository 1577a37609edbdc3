use std::net::IpAddr;

use uuid::Uuid;

use crate::domain::Role;
use crate::types::internal::Claims;

/// The authenticated user performing an operation.
#[derive(Debug, Clone, PartialEq)]
pub struct Actor {
    pub id: i32,
    pub email: String,
    pub role: Role,
}

/// Request context that flows from the API layer into services and stores.
///
/// Carries the information needed for audit attribution and tracing; it is
/// constructed fresh per request and discarded when the request completes.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestContext {
    /// IP address of the client making the request
    pub ip_address: Option<IpAddr>,

    /// Unique identifier for this request (for tracing across layers)
    pub request_id: Uuid,

    /// Actor who initiated the operation, if authenticated
    pub actor: Option<Actor>,

    /// Claims of the bearer token the actor presented, kept so endpoints
    /// can report token metadata without validating twice
    pub claims: Option<Claims>,
}

impl RequestContext {
    pub fn new() -> Self {
        Self {
            ip_address: None,
            request_id: Uuid::new_v4(),
            actor: None,
            claims: None,
        }
    }

    pub fn with_ip_address(mut self, ip_address: Option<IpAddr>) -> Self {
        self.ip_address = ip_address;
        self
    }

    pub fn with_actor(mut self, actor: Actor) -> Self {
        self.actor = Some(actor);
        self
    }

    pub fn with_claims(mut self, claims: Claims) -> Self {
        self.claims = Some(claims);
        self
    }

    /// IP address formatted for audit storage.
    pub fn ip_string(&self) -> Option<String> {
        self.ip_address.map(|ip| ip.to_string())
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}
