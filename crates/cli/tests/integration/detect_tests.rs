//! Detect command integration tests.

use super::common::TestEnv;

#[test]
fn detect_html_content() {
  let env = TestEnv::new();
  env.write_file("app/content/about/index.html", "<h1>about</h1>");

  env.detect().assert().success();

  assert!(env.read_file("plan.toml").contains("name = \"hugo\""));
}

#[test]
fn detect_records_requested_version() {
  let env = TestEnv::new();
  env.write_file("app/content/_index.md", "# home");

  env.detect().env("BP_HUGO_VERSION", "0.79.*").assert().success();

  let plan = env.read_file("plan.toml");
  assert!(plan.contains("version = \"0.79.*\""));
  assert!(plan.contains("version-source = \"BP_HUGO_VERSION\""));
}

#[test]
fn detect_reads_version_from_platform_env() {
  let env = TestEnv::new();
  env.write_file("app/content/_index.md", "# home");
  env.write_file("platform/env/BP_HUGO_VERSION", "0.80.0");

  env.detect().assert().success();

  assert!(env.read_file("plan.toml").contains("version = \"0.80.0\""));
}

#[test]
fn detect_empty_content_dir_does_not_apply() {
  let env = TestEnv::new();
  std::fs::create_dir_all(env.path("app/content")).unwrap();

  env.detect().assert().code(100);
}
