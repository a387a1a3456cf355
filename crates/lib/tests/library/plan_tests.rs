//! Plan files as exchanged with the lifecycle.

use hugopack_lib::detect::detect;
use hugopack_lib::plan::{EntryResolver, Planner, Priority, read_buildpack_plan, write_build_plan};

use super::common::Workspace;

#[test]
fn build_plan_is_written_as_lifecycle_toml() {
  let workspace = Workspace::new();
  workspace.write("app/content/_index.md", "# home");

  let plan = detect(&workspace.path("app"), Some("0.80.*")).unwrap();
  write_build_plan(&workspace.path("plan.toml"), &plan).unwrap();

  let written: toml::Table = toml::from_str(&std::fs::read_to_string(workspace.path("plan.toml")).unwrap()).unwrap();
  let requires = written["requires"].as_array().unwrap();
  assert_eq!(requires[0]["name"].as_str(), Some("hugo"));
  assert_eq!(requires[0]["metadata"]["build"].as_bool(), Some(true));
  assert_eq!(requires[0]["metadata"]["version"].as_str(), Some("0.80.*"));
  assert_eq!(written["provides"].as_array().unwrap()[0]["name"].as_str(), Some("hugo"));
}

#[test]
fn lifecycle_plan_with_foreign_metadata_is_resolved() {
  let workspace = Workspace::new();
  let path = workspace.write(
    "plan.toml",
    r#"
[[entries]]
name = "node"

[[entries]]
name = "hugo"
[entries.metadata]
version = "0.79.*"
build = "yes"
launch = true
extended = true

[[entries]]
name = "hugo"
[entries.metadata]
version = "0.80.0"
version-source = "BP_HUGO_VERSION"
build = true
"#,
  );

  let plan = read_buildpack_plan(&path).unwrap();
  let planner = Planner::new();

  let (entry, rest) = planner.resolve("hugo", &plan.entries, &[Priority::from("BP_HUGO_VERSION")]);
  assert_eq!(entry.unwrap().version(), Some("0.80.0"));
  assert_eq!(rest.len(), 1);
  assert_eq!(rest[0].metadata.build, None);
  assert_eq!(rest[0].metadata.extra["extended"].as_bool(), Some(true));

  assert_eq!(planner.merge_layer_types("hugo", &plan.entries), (true, true));
}
