use tempfile::TempDir;

use crate::helpers::{CommandExt, lintel};

#[test]
fn test_config_file() -> anyhow::Result<()> {
    let directory = TempDir::new()?;
    let directory = directory.path();
    std::fs::write(
        directory.join("lintel.toml"),
        r#"
[lint]
select = ["no-undef", "eqeqeq"]
env = ["browser"]

[lint.globals]
analytics = "readonly"

[lint.rules.eqeqeq]
severity = "error"
null = "ignore"
"#,
    )?;
    std::fs::write(
        directory.join("test.js"),
        "if (window.x == null) {}\nanalytics.track(process);\n",
    )?;

    insta::assert_snapshot!(
        lintel(directory)
            .arg("check")
            .arg(".")
            .arg("--config")
            .arg("lintel.toml")
            .arg("--output-format")
            .arg("concise")
            .run(),
        @r"
    success: false
    exit_code: 1
    ----- stdout -----
    test.js [2:17] no-undef 'process' is not defined.
    Found 1 error.

    ----- stderr -----
    "
    );

    Ok(())
}

#[test]
fn test_invalid_rule_options_skip_the_rule() -> anyhow::Result<()> {
    let directory = TempDir::new()?;
    let directory = directory.path();
    std::fs::write(
        directory.join("lintel.toml"),
        "[lint.rules.max-depth]\nseverity = \"warn\"\nmax = \"four\"\n",
    )?;
    std::fs::write(directory.join("test.js"), "debugger;\n")?;

    insta::assert_snapshot!(
        lintel(directory)
            .arg("check")
            .arg(".")
            .arg("--config")
            .arg("lintel.toml")
            .arg("--output-format")
            .arg("concise")
            .run(),
        @r"
    success: false
    exit_code: 1
    ----- stdout -----
    test.js [1:1] no-debugger Unexpected 'debugger' statement.
    Found 1 error.
    1 fixable with the `--fix` option.

    ----- stderr -----
    Warning: rule `max-depth`: option `max` expects an integer, found string, the rule is skipped.
    "
    );

    Ok(())
}

#[test]
fn test_unreadable_config_file() -> anyhow::Result<()> {
    let directory = TempDir::new()?;
    let directory = directory.path();
    std::fs::write(directory.join("lintel.toml"), "[lint]\nunknown-key = 1\n")?;
    std::fs::write(directory.join("test.js"), "debugger;\n")?;

    let output = lintel(directory)
        .arg("check")
        .arg(".")
        .arg("--config")
        .arg("lintel.toml")
        .output()?;
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr.starts_with("Error: Failed to parse configuration file"), "{stderr}");
    Ok(())
}
