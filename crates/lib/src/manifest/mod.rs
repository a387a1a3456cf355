//! Buildpack manifest (`buildpack.toml`) types.
//!
//! The manifest identifies the buildpack and carries the catalog of
//! dependencies it knows how to install.

mod types;

pub use types::*;
