//! Template catalog, descriptors and rendering
//!
//! This module provides:
//! - The [`TemplateSource`] capability the generator reads templates through
//! - The built-in [`EmbeddedCatalog`], compiled into the binary and rendered with minijinja
//! - The static descriptor tables mapping templates to output paths

pub mod catalog;
pub mod descriptor;

use crate::error::TemplateError;
use crate::params::ParameterSet;

pub use catalog::EmbeddedCatalog;
pub use descriptor::{Mode, TemplateDescriptor};

/// Read-only access to named templates
pub trait TemplateSource {
    /// Raw template bytes, without any substitution
    fn fetch_raw(&self, name: &str) -> Result<Vec<u8>, TemplateError>;

    /// Template rendered against the parameter set
    fn render(&self, name: &str, params: &ParameterSet) -> Result<Vec<u8>, TemplateError>;
}

impl<T: TemplateSource + ?Sized> TemplateSource for &T {
    fn fetch_raw(&self, name: &str) -> Result<Vec<u8>, TemplateError> {
        (**self).fetch_raw(name)
    }

    fn render(&self, name: &str, params: &ParameterSet) -> Result<Vec<u8>, TemplateError> {
        (**self).render(name, params)
    }
}
