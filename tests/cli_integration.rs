//! CLI Integration Tests
//!
//! Tests the command-line interface end-to-end against plugin fixtures.

use assert_cmd::Command;
use assert_fs::prelude::*;
use assert_fs::TempDir;
use predicates::prelude::*;

/// Get the binary to test, isolated from the user's config and data dirs.
fn cmdnest(temp: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("cmdnest").unwrap();
    cmd.current_dir(temp.path())
        .env("XDG_CONFIG_HOME", temp.path().join("xdg-config"))
        .env("XDG_DATA_HOME", temp.path().join("xdg-data"))
        .env("HOME", temp.path())
        .env_remove("CMDNEST_CONFIG")
        .arg("--no-color");
    cmd
}

/// `plugins/demo` with commands, an alias and a help document.
fn demo_fixture() -> TempDir {
    let temp = TempDir::new().unwrap();
    let demo = temp.child("plugins/demo");
    let commands = demo.child("src/cli/commands");

    demo.child("plugin.toml")
        .write_str("[plugin]\nname = \"demo\"\nversion = \"1.2.0\"\n")
        .unwrap();
    demo.child("aliases.json").write_str(r#"{"install": "i"}"#).unwrap();
    commands.child("install.sh").write_str("echo \"installing $1\"\n").unwrap();
    commands.child("install.md").write_str("# Install\n\ndesc here\n").unwrap();
    commands.child("fail.sh").write_str("exit 3\n").unwrap();

    temp
}

// ============================================================================
// Help & Version Tests
// ============================================================================

#[test]
fn test_help_flag() {
    let temp = TempDir::new().unwrap();
    cmdnest(&temp)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Nested command plugins"));
}

#[test]
fn test_version_flag() {
    let temp = TempDir::new().unwrap();
    cmdnest(&temp)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

// ============================================================================
// Listing Tests
// ============================================================================

#[test]
fn test_no_plugin_lists_everything() {
    let temp = demo_fixture();
    cmdnest(&temp)
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("cmdnest {}, OS:", env!("CARGO_PKG_VERSION"))))
        .stdout(predicate::str::contains("cmdnest demo install|i desc here"));
}

#[test]
fn test_plugin_without_command_lists_its_help() {
    let temp = demo_fixture();
    cmdnest(&temp)
        .arg("demo")
        .assert()
        .success()
        .stdout(predicate::str::contains("cmdnest demo install|i desc here"));
}

#[test]
fn test_unknown_plugin() {
    let temp = demo_fixture();
    cmdnest(&temp)
        .arg("ghost")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Plugin 'ghost' has not been found."))
        .stdout(predicate::str::contains("demo install|i"));
}

// ============================================================================
// Dispatch Tests
// ============================================================================

#[cfg(unix)]
#[test]
fn test_runs_command_script() {
    let temp = demo_fixture();
    cmdnest(&temp)
        .args(["demo", "install", "pkg"])
        .assert()
        .success()
        .stdout(predicate::str::contains("installing pkg"));
}

#[cfg(unix)]
#[test]
fn test_alias_runs_same_command() {
    let temp = demo_fixture();
    cmdnest(&temp)
        .args(["demo", "i", "pkg"])
        .assert()
        .success()
        .stdout(predicate::str::contains("installing pkg"));
}

#[cfg(unix)]
#[test]
fn test_exit_code_propagates() {
    let temp = demo_fixture();
    cmdnest(&temp).args(["demo", "fail"]).assert().code(3);
}

#[cfg(unix)]
#[test]
fn test_hyphen_arguments_pass_through() {
    let temp = demo_fixture();
    cmdnest(&temp)
        .args(["demo", "install", "--force"])
        .assert()
        .success()
        .stdout(predicate::str::contains("installing --force"));
}

#[test]
fn test_unknown_command_shows_help() {
    let temp = demo_fixture();
    cmdnest(&temp)
        .args(["demo", "nope"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("cmdnest demo install|i desc here"));
}

#[test]
fn test_command_help_document() {
    let temp = demo_fixture();
    cmdnest(&temp)
        .args(["demo", "install", "help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("INSTALL"))
        .stdout(predicate::str::contains("installing").not());
}

#[cfg(unix)]
#[test]
fn test_default_group_receives_shifted_arguments() {
    let temp = demo_fixture();
    temp.child("plugins/demo/src/cli/commands/default/commands/show.sh")
        .write_str("echo \"show $CMDNEST_PARENT $1\"\n")
        .unwrap();

    cmdnest(&temp)
        .args(["demo", "prod", "show", "x"])
        .assert()
        .success()
        .stdout(predicate::str::contains("show prod x"));
}

#[cfg(unix)]
#[test]
fn test_router_takes_every_command() {
    let temp = TempDir::new().unwrap();
    let routed = temp.child("plugins/routed/src/cli");
    routed.child("_router.sh").write_str("echo \"routed $CMDNEST_COMMAND $1\"\n").unwrap();
    routed.child("commands/install.sh").write_str("echo direct\n").unwrap();

    cmdnest(&temp)
        .args(["routed", "install", "a"])
        .assert()
        .success()
        .stdout(predicate::str::contains("routed install a"))
        .stdout(predicate::str::contains("direct").not());
}

// ============================================================================
// Configuration Tests
// ============================================================================

#[test]
fn test_named_plugin_prints_banner() {
    let temp = demo_fixture();
    temp.child(".cmdnest.toml").write_str("[[plugins]]\nname = \"demo\"\n").unwrap();

    cmdnest(&temp)
        .arg("demo")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("demo@1.2.0"));
}

#[test]
fn test_name_mismatch_fails() {
    let temp = demo_fixture();
    temp.child("plugins/demo/plugin.toml").write_str("[plugin]\nname = \"other\"\n").unwrap();
    temp.child(".cmdnest.toml").write_str("[[plugins]]\nname = \"demo\"\n").unwrap();

    cmdnest(&temp)
        .arg("demo")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("has not been matched with 'other'"));
}

#[test]
fn test_invalid_plugin_entry_fails() {
    let temp = demo_fixture();
    let config = temp.child("custom.toml");
    config.write_str("[[plugins]]\nname = \"demo\"\npath = \"plugins/demo\"\n").unwrap();

    cmdnest(&temp)
        .args(["-c", config.path().to_str().unwrap(), "demo"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("only one of the properties"));
}

#[cfg(unix)]
#[test]
fn test_pass_through_chain() {
    let temp = TempDir::new().unwrap();
    temp.child("a/src/cli/commands/lint.sh").write_str("echo first\n").unwrap();
    temp.child("b/src/cli/commands/run.sh").write_str("echo second\n").unwrap();
    temp.child(".cmdnest.toml")
        .write_str(
            r#"
[[plugins]]
path = "a"
trigger = "tool"
through = true

[[plugins]]
path = "b"
trigger = "tool"
"#,
        )
        .unwrap();

    cmdnest(&temp)
        .args(["tool", "run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("second"))
        .stdout(predicate::str::contains("first").not());
}

#[test]
fn test_plugin_dir_flag() {
    let temp = TempDir::new().unwrap();
    temp.child("elsewhere/extra/src/cli/commands/hello.md").write_str("Say hello\n").unwrap();

    cmdnest(&temp)
        .args(["-p", "elsewhere", "extra"])
        .assert()
        .success()
        .stdout(predicate::str::contains("cmdnest extra hello Say hello"));
}
