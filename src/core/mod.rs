//! Core module containing the generic building blocks of the client

pub mod error;
pub mod payload;
pub mod resource;
pub mod status;

pub use error::{ApiError, ApiResult};
pub use payload::{FieldValue, FileAttachment, FormField, Payload};
pub use resource::{AuthPolicy, Operation, Resource};
pub use status::LoadStatus;
