//! GitHub access for the changelog pipeline.
//!
//! Provides token-based authentication, label/release lookups, merged pull
//! request search and the comment/label mutations behind a common trait.

/// Configuration and defaults for the GitHub connection.
pub mod config;

/// GitHub GraphQL client implementation.
pub mod github;

/// Wrapper adding dry-run handling and logging around a forge.
pub mod manager;

/// Request and response types shared by forge implementations.
pub mod request;

/// Common trait for forge platform abstraction.
pub mod traits;
