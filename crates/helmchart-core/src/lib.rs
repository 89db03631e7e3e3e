//! Helm chart scaffolding core
//!
//! This library generates a Helm chart tree from a built-in template catalog.
//! It is used by the `helmchart-helper` binary, which only parses flags and
//! reports errors.
//!
//! # Architecture
//!
//! - **Parameters** - [`ParameterSet`]: chart name, versions and enabled [`ResourceKind`]s,
//!   validated once and immutable afterwards
//! - **Capabilities** - [`TemplateSource`] (read/render named templates) and
//!   [`OutputStore`] (directories and files), each with a real and a test implementation
//! - **Engine** - [`generate_chart`]: structure, mandatory files, conditional resources,
//!   notes and the final placeholder rewrite, in that order
//!
//! # Example Usage
//!
//! ```no_run
//! use helmchart_core::{generate_chart, EmbeddedCatalog, FsStore, ParameterSet, ResourceKind};
//! use std::path::Path;
//!
//! let params = ParameterSet::builder("web-app")
//!     .enable(ResourceKind::Deployment)
//!     .enable(ResourceKind::Service)
//!     .build()?;
//! let report = generate_chart(
//!     &EmbeddedCatalog::new(),
//!     &mut FsStore::new(),
//!     &params,
//!     Path::new("charts/web-app"),
//! )?;
//! println!("{} files written", report.files.len());
//! # Ok::<(), helmchart_core::GenerationError>(())
//! ```

pub mod error;
pub mod generator;
pub mod params;
pub mod store;
pub mod templates;
pub mod version;

// Re-export main types for convenience
pub use error::{ErrorKind, GenerationError, TemplateError};
pub use generator::{generate_chart, rewrite_placeholders, GenerationReport, PLACEHOLDER_TOKEN};
pub use params::{ParameterSet, ParameterSetBuilder, ResourceKind};
pub use store::{FsStore, MemoryStore, OutputStore, StoreEntry};
pub use templates::{EmbeddedCatalog, TemplateSource};
