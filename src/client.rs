//! The client facade: one handle owning every entity store
//!
//! [`MediplusClient`] wires the whole stack together: a shared reqwest
//! client, the session store (which doubles as the token provider), and one
//! [`ResourceStore`] per entity, each driving its own [`HttpGateway`].
//! Stores are created eagerly and live for the client's lifetime, so every
//! handle returned by an accessor shares the same collection state.

use crate::config::ClientConfig;
use crate::entities::{
    Blog, Category, Comment, Department, Doctor, Project, Reservation, Slider, Treatment,
};
use crate::gateway::{HttpGateway, TokenProvider};
use crate::session::SessionStore;
use crate::store::ResourceStore;
use std::sync::Arc;

/// Builder for [`MediplusClient`]
#[derive(Default)]
pub struct ClientBuilder {
    config: ClientConfig,
    http: Option<reqwest::Client>,
}

impl ClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use the given configuration instead of the defaults
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Point the client at a different base URL
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.base_url = base_url.into();
        self
    }

    /// Persist the session to a different file
    pub fn session_file(mut self, session_file: impl Into<String>) -> Self {
        self.config.session_file = session_file.into();
        self
    }

    /// Supply a preconfigured reqwest client (proxies, timeouts, ...)
    pub fn http(mut self, http: reqwest::Client) -> Self {
        self.http = Some(http);
        self
    }

    pub fn build(self) -> MediplusClient {
        let http = self.http.unwrap_or_default();
        let session = Arc::new(SessionStore::new(
            http.clone(),
            self.config.base_url.clone(),
            self.config.session_file.clone(),
        ));
        let tokens: Arc<dyn TokenProvider> = session.clone();
        tracing::info!(base_url = %self.config.base_url, "client built");

        let parts = MediplusClientParts {
            http,
            base_url: self.config.base_url,
            tokens,
        };
        MediplusClient {
            departments: parts.store(),
            doctors: parts.store(),
            treatments: parts.store(),
            categories: parts.store(),
            projects: parts.store(),
            sliders: parts.store(),
            blogs: parts.store(),
            comments: parts.store(),
            reservations: parts.store(),
            session,
        }
    }
}

/// Shared ingredients each per-entity store is assembled from
struct MediplusClientParts {
    http: reqwest::Client,
    base_url: String,
    tokens: Arc<dyn TokenProvider>,
}

impl MediplusClientParts {
    fn store<R: crate::core::resource::Resource>(&self) -> ResourceStore<R> {
        ResourceStore::new(Arc::new(HttpGateway::<R>::new(
            self.http.clone(),
            self.base_url.clone(),
            Arc::clone(&self.tokens),
        )))
    }
}

/// Handle to the full MediPlus API surface.
///
/// Cheap to clone; clones share every store and the session.
#[derive(Clone)]
pub struct MediplusClient {
    session: Arc<SessionStore>,
    departments: ResourceStore<Department>,
    doctors: ResourceStore<Doctor>,
    treatments: ResourceStore<Treatment>,
    categories: ResourceStore<Category>,
    projects: ResourceStore<Project>,
    sliders: ResourceStore<Slider>,
    blogs: ResourceStore<Blog>,
    comments: ResourceStore<Comment>,
    reservations: ResourceStore<Reservation>,
}

impl MediplusClient {
    /// Build a client with default configuration
    pub fn new() -> Self {
        ClientBuilder::new().build()
    }

    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// The session store; log in here to arm every protected operation
    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn departments(&self) -> &ResourceStore<Department> {
        &self.departments
    }

    pub fn doctors(&self) -> &ResourceStore<Doctor> {
        &self.doctors
    }

    pub fn treatments(&self) -> &ResourceStore<Treatment> {
        &self.treatments
    }

    pub fn categories(&self) -> &ResourceStore<Category> {
        &self.categories
    }

    pub fn projects(&self) -> &ResourceStore<Project> {
        &self.projects
    }

    pub fn sliders(&self) -> &ResourceStore<Slider> {
        &self.sliders
    }

    pub fn blogs(&self) -> &ResourceStore<Blog> {
        &self.blogs
    }

    pub fn comments(&self) -> &ResourceStore<Comment> {
        &self.comments
    }

    pub fn reservations(&self) -> &ResourceStore<Reservation> {
        &self.reservations
    }
}

impl Default for MediplusClient {
    fn default() -> Self {
        Self::new()
    }
}
