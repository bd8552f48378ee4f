//! The `Resource` trait: the generic seam every entity type plugs into
//!
//! One implementation of this trait is all it takes to give an entity the
//! full gateway + store treatment: endpoint routes, per-operation access
//! policy, payload encoding, and update-merge semantics are parameterized
//! here and the generic [`HttpGateway`](crate::gateway::HttpGateway) and
//! [`ResourceStore`](crate::store::ResourceStore) do the rest.

use crate::core::error::ApiResult;
use crate::core::payload::Payload;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt;
use validator::Validate;

/// One of the five operations a gateway can perform for a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    List,
    Get,
    Create,
    Update,
    Delete,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Operation::List => "list",
            Operation::Get => "get",
            Operation::Create => "create",
            Operation::Update => "update",
            Operation::Delete => "delete",
        };
        write!(f, "{}", label)
    }
}

/// Access requirement for one operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthPolicy {
    /// No credentials required
    Public,

    /// A bearer token from the current session must accompany the request.
    /// Without one the gateway fails the operation before issuing it.
    Bearer,
}

/// A record type managed through the remote API.
///
/// Records are identified by a server-assigned `i64` id, immutable once
/// created and unique within the entity's collection.
pub trait Resource: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Payload type submitted on create and update
    type Draft: Validate + Send + Sync;

    /// URL segment the remote API mounts this entity under (e.g. "Department")
    fn base_path() -> &'static str;

    /// Singular label used in error messages and logs (e.g. "department")
    fn resource_name() -> &'static str;

    /// Server-assigned identifier of this record
    fn id(&self) -> i64;

    /// Route segment of the delete endpoint. Most entities use a
    /// per-entity segment such as "DeleteDepartment"; the rest use "Delete".
    fn delete_segment() -> &'static str {
        "Delete"
    }

    /// Access policy for one operation, or `None` when the remote API has
    /// no such endpoint for this entity
    fn auth(op: Operation) -> Option<AuthPolicy>;

    /// Encode a draft into the wire payload for create/update
    fn encode(draft: &Self::Draft) -> ApiResult<Payload>;

    /// Fold an update response onto the previously known record.
    ///
    /// The response takes precedence field by field; implementations
    /// override this to keep server-resolved fields (resolved image URLs)
    /// that the update response omits. The default takes the response
    /// wholesale.
    fn absorb(&self, incoming: Self) -> Self {
        incoming
    }

    // === Route builders ===

    fn list_route() -> String {
        format!("{}/GetAll", Self::base_path())
    }

    fn get_route(id: i64) -> String {
        format!("{}/Get/{}", Self::base_path(), id)
    }

    fn create_route() -> String {
        format!("{}/Create", Self::base_path())
    }

    fn update_route(id: i64) -> String {
        format!("{}/Update/{}", Self::base_path(), id)
    }

    fn delete_route(id: i64) -> String {
        format!("{}/{}/{}", Self::base_path(), Self::delete_segment(), id)
    }
}
