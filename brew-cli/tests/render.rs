use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

#[test]
fn render_with_markdown_renderer_prints_page() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("Dragons.md"),
        "# Dragons\n\nSee [[#Red Dragon]].\n",
    )
    .unwrap();

    let mut cmd = cargo_bin_cmd!("brewview");
    cmd.current_dir(dir.path())
        .arg("render")
        .arg("Dragons.md")
        .arg("--renderer")
        .arg("markdown");

    cmd.assert()
        .success()
        .stdout(predicate::str::starts_with("<!DOCTYPE html>"))
        .stdout(predicate::str::contains("<title>Dragons</title>"))
        .stdout(predicate::str::contains("Dragons</h1>"))
        .stdout(predicate::str::contains("<a href=\"#red-dragon\">Red Dragon</a>"))
        .stdout(predicate::str::contains(
            "http://localhost:8000/api/themes/5ePHB/style.css",
        ));
}

#[test]
fn render_uses_linked_theme_and_writes_output() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("Dragons.md"), "Fire and scales.\n").unwrap();

    let mut add = cargo_bin_cmd!("brewview");
    add.current_dir(dir.path())
        .args(["brews", "add", "Dragons.md", "--theme", "5eDMG"])
        .assert()
        .success();

    let mut render = cargo_bin_cmd!("brewview");
    render
        .current_dir(dir.path())
        .args(["render", "Dragons.md", "--renderer", "markdown", "-o", "out.html"])
        .assert()
        .success();

    let page = fs::read_to_string(dir.path().join("out.html")).unwrap();
    assert!(page.contains("http://localhost:8000/api/themes/5eDMG/style.css"));
    assert!(page.contains("<div class=\"brew\"><p>Fire and scales.</p></div>"));
}

#[test]
fn theme_flag_overrides_linked_theme() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("Dragons.md"), "Scales.\n").unwrap();

    let mut cmd = cargo_bin_cmd!("brewview");
    cmd.current_dir(dir.path())
        .args([
            "render",
            "Dragons.md",
            "--renderer",
            "markdown",
            "--theme",
            "Blank",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("/api/themes/Blank/style.css"));
}

#[test]
fn config_file_sets_server_and_renderer() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("Dragons.md"), "Scales.\n").unwrap();
    let config_path = dir.path().join("custom.toml");
    fs::write(
        &config_path,
        r#"[remote]
base_url = "https://homebrewery.example.com"

[preview]
renderer = "markdown"
"#,
    )
    .unwrap();

    let mut cmd = cargo_bin_cmd!("brewview");
    cmd.current_dir(dir.path())
        .arg("render")
        .arg("Dragons.md")
        .arg("--config")
        .arg(config_path.as_os_str())
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "https://homebrewery.example.com/api/themes/5ePHB/style.css",
        ));
}

#[test]
fn missing_parser_is_reported() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("Dragons.md"), "Scales.\n").unwrap();

    let mut cmd = cargo_bin_cmd!("brewview");
    cmd.current_dir(dir.path())
        .args(["render", "Dragons.md"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("parser script not found"));
}

#[test]
fn unknown_renderer_is_reported() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("Dragons.md"), "Scales.\n").unwrap();

    let mut cmd = cargo_bin_cmd!("brewview");
    cmd.current_dir(dir.path())
        .args(["render", "Dragons.md", "--renderer", "latex"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("renderer 'latex' not found"));
}

#[test]
fn missing_document_is_reported() {
    let dir = tempdir().unwrap();

    let mut cmd = cargo_bin_cmd!("brewview");
    cmd.current_dir(dir.path())
        .args(["render", "Nope.md", "--renderer", "markdown"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read 'Nope.md'"));
}

#[test]
fn dot_slash_path_finds_linked_brew() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("Dragons.md"), "Scales.\n").unwrap();

    let mut add = cargo_bin_cmd!("brewview");
    add.current_dir(dir.path())
        .args(["brews", "add", "Dragons", "--theme", "5eDMG"])
        .assert()
        .success();

    let mut cmd = cargo_bin_cmd!("brewview");
    cmd.current_dir(dir.path())
        .args(["render", "./Dragons.md", "--renderer", "markdown"])
        .assert()
        .success()
        .stdout(predicate::str::contains("/api/themes/5eDMG/style.css"));
}
