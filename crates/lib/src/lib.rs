//! hugopack-lib: a Cloud Native Buildpack for Hugo sites
//!
//! This crate provides the two buildpack phases and their collaborators:
//! - `detect`: decides whether an application is a Hugo site
//! - `build`: installs Hugo into a layer and renders the site
//! - `dependency`: resolves and installs Hugo from the `buildpack.toml` catalog
//! - `layers`: layer directories and their sidecar metadata
//! - `plan`: build plans, buildpack plans, and plan entry selection

pub mod build;
pub mod config;
pub mod consts;
pub mod dependency;
pub mod detect;
pub mod emitter;
pub mod execute;
pub mod layers;
pub mod manifest;
pub mod plan;
pub mod util;
