//! Stock Clerk - Main Library
//!
//! This crate provides the binaries' shared plumbing for the NVIDIA store
//! clerk, following Clean Architecture principles.
//!
//! ## Architecture
//!
//! - **bin_common**: Common utilities for binary executables (CLI, runners)
//! - **clerk**: Core monitoring, checkout and notification logic (re-exported from workspace)
//!
//! ## Usage in Binaries
//!
//! ```rust,no_run
//! use stock_clerk::bin_common::{load_config_from_env, ConfigType};
//! use stock_clerk::clerk::ClerkSettings;
//! ```

// Re-export workspace libraries for convenience
pub use clerk;

// Binary common utilities
pub mod bin_common {
    //! Common utilities for binary executables
    //!
    //! Provides shared functionality for the presentation layer (binaries)
    //! following Clean Architecture principles.

    pub mod cli;
    pub mod runner;

    pub use cli::{load_config_from_env, ClerkArgs, ConfigType, StatusArgs};
    pub use runner::{outcome_summary, BinaryRunner, RunConfig};
}
