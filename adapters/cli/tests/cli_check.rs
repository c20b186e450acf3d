use std::{fs, path::PathBuf, process::Command};

fn worldshift() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_worldshift"));
    let _ = command.env_remove("RUST_LOG");
    command
}

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("worldshift-{name}-{}", std::process::id()));
    fs::create_dir_all(&dir).expect("create scratch directory");
    dir
}

#[test]
fn builtin_pack_passes_check() {
    let output = worldshift()
        .arg("--check")
        .output()
        .expect("failed to run worldshift --check");

    assert!(output.status.success(), "{output:?}");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Worldshift: 3 level(s)"), "{stdout}");
    assert!(stdout.contains("crossroads"), "{stdout}");
}

#[test]
fn manifest_levels_resolve_relative_to_manifest() {
    let dir = scratch_dir("manifest");
    fs::write(dir.join("first.txt"), "####\n#P@#\n####\n").expect("write level");
    fs::write(
        dir.join("pack.toml"),
        "title = \"Scratch\"\n\n[[levels]]\nname = \"first\"\npath = \"first.txt\"\n\n[[levels]]\nrows = [\"P$\"]\n",
    )
    .expect("write manifest");

    let output = worldshift()
        .arg("--check")
        .arg("--pack")
        .arg(dir.join("pack.toml"))
        .output()
        .expect("failed to run worldshift --check");

    assert!(output.status.success(), "{output:?}");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Scratch: 2 level(s)"), "{stdout}");
    assert!(stdout.contains("first"), "{stdout}");
}

#[test]
fn invalid_level_fails_with_position() {
    let dir = scratch_dir("invalid");
    let level = dir.join("broken.txt");
    fs::write(&level, "#P\n#?\n").expect("write level");

    let output = worldshift()
        .arg("--check")
        .arg("--level")
        .arg(&level)
        .output()
        .expect("failed to run worldshift --check");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("column 1, row 1"), "{stderr}");
}

#[test]
fn replay_prints_final_state() {
    let dir = scratch_dir("replay");
    let level = dir.join("pad.txt");
    let script = dir.join("script.json");
    fs::write(&level, "P1,\n").expect("write level");
    fs::write(
        &script,
        r#"[{ "input": { "right": true } }, { "repeat": 16 }]"#,
    )
    .expect("write script");

    let output = worldshift()
        .arg("--level")
        .arg(&level)
        .arg("--replay")
        .arg(&script)
        .output()
        .expect("failed to run worldshift --replay");

    assert!(output.status.success(), "{output:?}");
    let summary: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("summary is JSON");
    assert_eq!(summary["ticks"], 17);
    assert_eq!(summary["column"], 1);
    assert_eq!(summary["world"], 2);
    assert_eq!(summary["level_name"], "pad");
}
