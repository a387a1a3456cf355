//! Names and file layout shared across the buildpack.

/// Name of the plan entry, the layer, and the dependency id this buildpack manages.
pub const HUGO: &str = "hugo";

/// Buildpack manifest file name inside the buildpack root.
pub const BUILDPACK_TOML: &str = "buildpack.toml";

/// Directory scanned during detection, relative to the application root.
pub const CONTENT_DIR: &str = "content";

/// File extensions that mark an application as a Hugo site.
pub const CONTENT_EXTENSIONS: &[&str] = &["md", "html"];

/// Directory Hugo renders into, relative to the application root.
pub const DESTINATION_DIR: &str = "public";

/// Subdirectory of a layer that holds executables and is prepended to `PATH`.
pub const LAYER_BIN_DIR: &str = "bin";

/// Offline dependency cache inside the buildpack root.
pub const DEPENDENCY_CACHE_DIR: &str = "dependencies";

/// Environment variable naming the requested Hugo version.
pub const HUGO_VERSION_ENV: &str = "BP_HUGO_VERSION";

/// Exit status that tells the lifecycle a buildpack does not apply.
pub const DETECT_FAIL_EXIT_CODE: i32 = 100;
