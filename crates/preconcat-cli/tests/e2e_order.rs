//! E2E tests for `preconcat order`, `concat`, `cycles`, `graph` and `targets`
//! against real source trees in a temporary directory.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn preconcat_cmd(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("preconcat"));
    cmd.current_dir(dir);
    cmd.env("PRECONCAT_LOG", "error");
    cmd.env("FORMAT", "text");
    cmd
}

fn write_tree(dir: &Path, files: &[(&str, &str)]) {
    for (path, content) in files {
        let full = dir.join(path);
        fs::create_dir_all(full.parent().expect("parent")).expect("mkdir");
        fs::write(full, content).expect("write source");
    }
}

/// A small app under `src/` with a nested module and a spec file to exclude.
fn app_project() -> TempDir {
    let dir = TempDir::new().expect("tempdir");
    write_tree(
        dir.path(),
        &[
            ("src/app.js", "/**\n * @require model.user\n * @require view.user\n */\napp();\n"),
            ("src/model/user.js", "// @require util.base\nuser();\n"),
            ("src/util/base.js", "base();\n"),
            ("src/view/user.js", "// @require model.user\n// @require util.base\nview();\n"),
            ("src/app.spec.js", "// @require missing.thing\n"),
            (
                "preconcat.toml",
                "[options]\nroot_dir = \"src\"\n\n[targets.app]\nsrc = [\"src/**/*.js\", \"!src/**/*.spec.js\"]\ndest = \"dist/app.js\"\n",
            ),
        ],
    );
    dir
}

#[test]
fn order_prints_paths_dependencies_first() {
    let dir = app_project();

    preconcat_cmd(dir.path())
        .args(["order", "app"])
        .assert()
        .success()
        .stdout("src/util/base.js\nsrc/model/user.js\nsrc/view/user.js\nsrc/app.js\n");
}

#[test]
fn order_json_mirrors_concat_config() {
    let dir = app_project();

    let output = preconcat_cmd(dir.path())
        .args(["order", "app", "--format", "json"])
        .output()
        .expect("order should not crash");
    assert!(
        output.status.success(),
        "order failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let json: Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(json["target"], "app");
    assert_eq!(json["dest"], "dist/app.js");
    assert_eq!(json["src"][0], "src/util/base.js");
    assert_eq!(json["nodes"][3]["id"], "app");
    assert!(json["fingerprint"].as_str().expect("fingerprint").starts_with("blake3:"));
}

#[test]
fn repeated_runs_are_identical() {
    let dir = app_project();
    let run = || {
        preconcat_cmd(dir.path())
            .args(["order", "app", "--json"])
            .output()
            .expect("order should not crash")
            .stdout
    };
    assert_eq!(run(), run());
}

#[test]
fn ad_hoc_sources_without_config() {
    let dir = TempDir::new().expect("tempdir");
    write_tree(
        dir.path(),
        &[("lib/a.js", "// @require b\n"), ("lib/b.js", "// @require c\n"), ("lib/c.js", "")],
    );

    preconcat_cmd(dir.path())
        .args(["order", "--src", "lib/*.js", "--root", "lib"])
        .assert()
        .success()
        .stdout("lib/c.js\nlib/b.js\nlib/a.js\n");
}

#[test]
fn concat_writes_artifact_in_order() {
    let dir = app_project();

    preconcat_cmd(dir.path())
        .args(["concat", "app"])
        .assert()
        .success()
        .stdout(predicate::str::contains("wrote dist/app.js (4 files"));

    let artifact = fs::read_to_string(dir.path().join("dist/app.js")).expect("artifact");
    let base = artifact.find("base();").expect("base");
    let user = artifact.find("user();").expect("user");
    let view = artifact.find("view();").expect("view");
    let app = artifact.find("app();").expect("app");
    assert!(base < user && user < view && view < app);
}

#[test]
fn concat_all_builds_every_target() {
    let dir = TempDir::new().expect("tempdir");
    write_tree(
        dir.path(),
        &[
            ("a/x.js", "x();"),
            ("b/y.js", "y();"),
            (
                "preconcat.toml",
                "[targets.one]\nsrc = [\"a/*.js\"]\ndest = \"out/one.js\"\nroot_dir = \"a\"\n\n[targets.two]\nsrc = [\"b/*.js\"]\ndest = \"out/two.js\"\nroot_dir = \"b\"\n",
            ),
        ],
    );

    preconcat_cmd(dir.path())
        .args(["concat", "--all", "-q"])
        .assert()
        .success()
        .stdout("");

    assert_eq!(fs::read_to_string(dir.path().join("out/one.js")).expect("one"), "x();");
    assert_eq!(fs::read_to_string(dir.path().join("out/two.js")).expect("two"), "y();");
}

#[test]
fn concat_all_with_dest_is_refused() {
    let dir = TempDir::new().expect("tempdir");
    write_tree(
        dir.path(),
        &[
            ("a/x.js", "x();"),
            ("b/y.js", "y();"),
            (
                "preconcat.toml",
                "[targets.one]\nsrc = [\"a/*.js\"]\ndest = \"one.js\"\n\n[targets.two]\nsrc = [\"b/*.js\"]\ndest = \"two.js\"\n",
            ),
        ],
    );

    preconcat_cmd(dir.path())
        .args(["concat", "--all", "--dest", "out.js"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--all cannot be combined with --src or --dest"));

    for written in ["out.js", "one.js", "two.js"] {
        assert!(!dir.path().join(written).exists(), "{written} should not exist");
    }
}

#[test]
fn cyclic_sources_fail_with_every_cycle() {
    let dir = TempDir::new().expect("tempdir");
    write_tree(
        dir.path(),
        &[("src/a.js", "// @require b"), ("src/b.js", "// @require a"), ("src/c.js", "")],
    );

    preconcat_cmd(dir.path())
        .args(["order", "--src", "src/*.js", "--dest", "dist/out.js"])
        .assert()
        .failure()
        .stderr(predicate::str::starts_with(
            "error: cyclic dependencies detected:\n\t1) b -> a\n",
        ))
        .stderr(predicate::str::contains("suggestion:"));
}

#[test]
fn cycle_at_default_log_level_logs_no_warning() {
    let dir = TempDir::new().expect("tempdir");
    write_tree(dir.path(), &[("src/a.js", "// @require b"), ("src/b.js", "// @require a")]);

    preconcat_cmd(dir.path())
        .env_remove("PRECONCAT_LOG")
        .env_remove("DEBUG")
        .args(["order", "--src", "src/*.js"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error: cyclic dependencies detected:"))
        .stderr(predicate::str::contains("WARN").not());
}

#[test]
fn concat_on_cycle_writes_nothing() {
    let dir = TempDir::new().expect("tempdir");
    write_tree(dir.path(), &[("src/a.js", "// @require a")]);

    preconcat_cmd(dir.path())
        .args(["concat", "--src", "src/*.js", "--dest", "dist/out.js"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("1) a -> a"));

    assert!(!dir.path().join("dist/out.js").exists());
}

#[test]
fn typo_reports_invalid_dependency_as_json() {
    let dir = TempDir::new().expect("tempdir");
    write_tree(dir.path(), &[("src/a.js", "// @require bb"), ("src/b.js", "")]);

    let output = preconcat_cmd(dir.path())
        .args(["order", "--src", "src/*.js", "--format", "json"])
        .output()
        .expect("order should not crash");
    assert!(!output.status.success());

    let json: Value = serde_json::from_slice(&output.stderr).expect("valid JSON error");
    assert_eq!(json["error"]["error_code"], "E2001");
    assert_eq!(json["error"]["kind"], "invalid-dependency");
    assert_eq!(
        json["error"]["message"],
        "invalid (not existing) dependencies:\n\ta => bb;"
    );
}

#[test]
fn unmatched_pattern_surfaces_as_read_error() {
    let dir = TempDir::new().expect("tempdir");

    preconcat_cmd(dir.path())
        .args(["order", "--src", "src/missing.js"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read src/missing.js"));
}

#[test]
fn reject_duplicate_ids_flag() {
    let dir = TempDir::new().expect("tempdir");
    write_tree(dir.path(), &[("src/a.js", ""), ("src/a.coffee", "")]);

    preconcat_cmd(dir.path())
        .args(["order", "--src", "src/*", "--reject-duplicate-ids"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("duplicate identifiers:"));

    preconcat_cmd(dir.path())
        .args(["order", "--src", "src/*"])
        .assert()
        .success()
        .stdout("src/a.js\n");
}

#[test]
fn cycles_exit_status_reflects_findings() {
    let dir = TempDir::new().expect("tempdir");
    write_tree(dir.path(), &[("src/a.js", "// @require b"), ("src/b.js", "// @require a")]);

    preconcat_cmd(dir.path())
        .args(["cycles", "--src", "src/*.js"])
        .assert()
        .code(1)
        .stdout("b -> a\n");

    preconcat_cmd(app_project().path())
        .args(["cycles", "app"])
        .assert()
        .success()
        .stdout("");
}

#[test]
fn graph_dot_output() {
    let dir = app_project();

    preconcat_cmd(dir.path())
        .args(["graph", "app", "--dot"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("digraph {"))
        .stdout(predicate::str::contains("util.base"));
}

#[test]
fn targets_lists_configured_names() {
    let dir = app_project();

    preconcat_cmd(dir.path())
        .args(["targets"])
        .assert()
        .success()
        .stdout("app\n");
}

#[test]
fn unknown_target_is_reported() {
    let dir = app_project();

    preconcat_cmd(dir.path())
        .args(["order", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown target `nope`"))
        .stderr(predicate::str::contains("preconcat targets"));
}

#[test]
fn invalid_config_reports_parse_error() {
    let dir = TempDir::new().expect("tempdir");
    write_tree(dir.path(), &[("preconcat.toml", "[targets.app\n")]);

    let output = preconcat_cmd(dir.path())
        .args(["targets", "--json"])
        .output()
        .expect("targets should not crash");
    assert!(!output.status.success());

    let json: Value = serde_json::from_slice(&output.stderr).expect("valid JSON error");
    assert_eq!(json["error"]["error_code"], "E1001");
}
