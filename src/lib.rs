//! # mediplus-client
//!
//! Typed async client for the MediPlus hospital platform API: departments,
//! doctors, treatments, categories, projects, sliders, blogs, comments and
//! reservations, each served by a generic gateway + store pair.
//!
//! The building blocks:
//!
//! - [`Resource`](core::Resource) — the trait an entity implements to get
//!   the full treatment: routes, per-operation access policy, payload
//!   encoding and update-merge semantics
//! - [`HttpGateway`](gateway::HttpGateway) — one operation, one HTTP call;
//!   access policy enforced before anything leaves the client
//! - [`ResourceStore`](store::ResourceStore) — the in-memory collection
//!   with lifecycle status, last-error tracking and watchable snapshots
//! - [`SessionStore`](session::SessionStore) — login, persisted session,
//!   and the bearer token every protected gateway draws from
//! - [`MediplusClient`](client::MediplusClient) — the facade owning one
//!   store per entity
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use mediplus::prelude::*;
//!
//! # async fn run() -> ApiResult<()> {
//! let client = MediplusClient::new();
//!
//! // Public reads need no session
//! let departments = client.departments().fetch_all().await?;
//! println!("{} departments", departments.len());
//!
//! // Mutations need a login first
//! let credentials = Credentials {
//!     email: "admin@example.com".to_string(),
//!     password: "secret".to_string(),
//! };
//! client.session().login(&credentials).await?;
//! client
//!     .departments()
//!     .create(&DepartmentDraft {
//!         name: "Cardiology".to_string(),
//!     })
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod core;
pub mod entities;
pub mod gateway;
pub mod session;
pub mod store;

/// Commonly used items, importable in one line
pub mod prelude {
    pub use crate::client::{ClientBuilder, MediplusClient};
    pub use crate::config::ClientConfig;
    pub use crate::core::{
        ApiError, ApiResult, AuthPolicy, FileAttachment, LoadStatus, Operation, Payload, Resource,
    };
    pub use crate::entities::{
        Blog, BlogDraft, Category, CategoryDraft, Comment, CommentDraft, Department,
        DepartmentDraft, Doctor, DoctorDraft, ImageSource, Project, ProjectDraft, Reservation,
        ReservationDraft, Slider, SliderDraft, Treatment, TreatmentDraft,
    };
    pub use crate::gateway::{HttpGateway, ResourceGateway, StaticTokenProvider, TokenProvider};
    pub use crate::session::{Credentials, Session, SessionStore};
    pub use crate::store::{ResourceStore, StoreSnapshot};
}
