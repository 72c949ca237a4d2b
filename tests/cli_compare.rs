use assert_cmd::prelude::*;
use color_eyre::Result;
use serde_json::Value;
use std::io::Write;
use std::process::Command;
use tempfile::NamedTempFile;

fn profile_file(content: &str) -> Result<NamedTempFile> {
    let mut file = NamedTempFile::new()?;
    file.write_all(content.as_bytes())?;
    Ok(file)
}

#[test]
fn test_compare_files_with_differences() -> Result<()> {
    let first = profile_file(r#"{"Server": {"Ntp": ["ntp1", "ntp2"], "Name": "rx2540"}}"#)?;
    let second = profile_file(r#"{"Server": {"Ntp": ["ntp1"], "Name": "rx2530"}}"#)?;

    let output = Command::cargo_bin("irmcctl")?
        .arg("compare")
        .arg("--profile-path1")
        .arg(first.path())
        .arg("--profile-path2")
        .arg(second.path())
        .output()?;

    assert!(
        output.status.success(),
        "compare failed. Stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let result: Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(result["comparison_result"], false);
    let list: Vec<&str> = result["comparison_list"]
        .as_array()
        .expect("comparison_list missing")
        .iter()
        .filter_map(Value::as_str)
        .collect();
    assert!(list.contains(&"'Server.Name': 'rx2540' != 'rx2530'"));
    assert!(list.contains(&"'Server.Ntp': list len '2' != list len '1'"));
    assert!(list.contains(&"'Server.Ntp[1]': only on 'original' side"));

    Ok(())
}

#[test]
fn test_compare_inline_equal() -> Result<()> {
    let output = Command::cargo_bin("irmcctl")?
        .args([
            "compare",
            "--profile-json1",
            r#"{"a": [1, {"b": null}]}"#,
            "--profile-json2",
            r#"{"a": [1, {"b": null}]}"#,
        ])
        .output()?;

    assert!(output.status.success());
    let result: Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(result["comparison_result"], true);
    assert!(result.get("comparison_list").is_none());

    Ok(())
}

#[test]
fn test_compare_missing_profile() -> Result<()> {
    let output = Command::cargo_bin("irmcctl")?
        .args(["compare", "--profile-json1", "{}"])
        .output()?;

    assert_eq!(output.status.code(), Some(11));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("either 'profile_json2' or 'profile_path2' needs to be set"),
        "unexpected stderr: {}",
        stderr
    );

    Ok(())
}

#[test]
fn test_compare_invalid_inline_json() -> Result<()> {
    let output = Command::cargo_bin("irmcctl")?
        .args(["compare", "--profile-json1", "{", "--profile-json2", "{}"])
        .output()?;

    assert_eq!(output.status.code(), Some(12));
    Ok(())
}

#[test]
fn test_scci_set_requires_data() -> Result<()> {
    let output = Command::cargo_bin("irmcctl")?
        .args([
            "scci",
            "--host",
            "irmc.invalid",
            "--username",
            "admin",
            "--password",
            "admin",
            "--command",
            "set_cs",
            "--opcodeext",
            "0x200",
        ])
        .output()?;

    assert_eq!(output.status.code(), Some(10));
    assert!(String::from_utf8_lossy(&output.stderr).contains("requires 'data' parameter"));
    Ok(())
}

#[test]
fn test_help_lists_commands() -> Result<()> {
    let output = Command::cargo_bin("irmcctl")?.arg("--help").output()?;

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Usage: irmcctl [OPTIONS] <COMMAND>"), "missing usage text");
    for command in ["compare", "scci", "power", "session"] {
        assert!(stdout.contains(command), "missing {} command", command);
    }

    Ok(())
}
