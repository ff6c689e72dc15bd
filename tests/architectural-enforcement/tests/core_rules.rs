//! Rules for the overlay core crate

use architectural_enforcement::{find_violations, workspace_root, Violation};

fn core_src() -> std::path::PathBuf {
    workspace_root().join("waitoverlay").join("core").join("src")
}

fn report(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn test_core_sources_exist() {
    assert!(
        core_src().join("lib.rs").exists(),
        "core crate not found at {}",
        core_src().display()
    );
}

#[test]
fn test_no_blocking_sleep_in_core() {
    let violations = find_violations(&core_src(), &["thread::sleep"]);
    assert!(violations.is_empty(), "blocking sleep:\n{}", report(&violations));
}

#[test]
fn test_no_terminal_output_in_core() {
    let violations = find_violations(
        &core_src(),
        &["println!", "eprintln!", "print!(", "eprint!(", "dbg!("],
    );
    assert!(violations.is_empty(), "direct output:\n{}", report(&violations));
}

#[test]
fn test_core_has_no_async_runtime() {
    let violations = find_violations(&core_src(), &["tokio::", "async fn", ".await"]);
    assert!(violations.is_empty(), "async code in core:\n{}", report(&violations));
}

#[test]
fn test_core_does_not_depend_on_demo() {
    let manifest = std::fs::read_to_string(
        workspace_root()
            .join("waitoverlay")
            .join("core")
            .join("Cargo.toml"),
    )
    .unwrap();
    assert!(
        !manifest.contains("waitoverlay-demo"),
        "core crate must not depend on the demo binary"
    );
}
