//! Build plans, buildpack plans, and entry selection.

pub mod files;
pub mod planner;
pub mod types;

pub use files::{PlanError, read_buildpack_plan, write_build_plan, write_buildpack_plan};
pub use planner::{EntryResolver, Planner, Priority};
pub use types::{
  BuildPlan, BuildPlanProvision, BuildPlanRequirement, BuildpackPlan, BuildpackPlanEntry, EntryMetadata,
};
