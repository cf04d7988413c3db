//! # Profile Viewer
//!
//! Looks up GitHub users and shows one of four presentations while the
//! lookup is idle, in flight, successful, or failed.
//!
//! ## Components
//!
//! - [`client::GithubClient`]: `GET /users/{login}` behind the [`client::ProfileFetcher`] seam
//! - [`view::ProfileView`]: owns liveness and the request for one mounted view
//! - [`presentation::Presentation`]: text and escaped HTML rendering
//! - [`config::ViewerConfig`]: environment-based configuration

/// GitHub users API client
pub mod client;

/// Environment-based configuration
pub mod config;

/// Error types
pub mod error;

/// Presentation selection and rendering
pub mod presentation;

/// User profile model
pub mod profile;

/// The mounted view
pub mod view;

pub use client::{GithubClient, ProfileFetcher};
pub use config::{ConfigError, OutputFormat, ViewerConfig};
pub use error::FetchError;
pub use presentation::Presentation;
pub use profile::UserProfile;
pub use view::ProfileView;
