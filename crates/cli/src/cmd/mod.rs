mod build;
mod detect;

pub use build::cmd_build;
pub use detect::cmd_detect;
