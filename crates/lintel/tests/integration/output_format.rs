use tempfile::TempDir;

use crate::helpers::lintel;

#[test]
fn test_output_full() -> anyhow::Result<()> {
    let directory = TempDir::new()?;
    let directory = directory.path();
    std::fs::write(
        directory.join("test.js"),
        "const x = 1;\nif (x == 2) {\n  debugger;\n}\n",
    )?;

    let output = lintel(directory).arg("check").arg(".").output()?;
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert_eq!(output.status.code(), Some(1));
    assert!(stdout.contains("warning: eqeqeq"), "{stdout}");
    assert!(stdout.contains("test.js:2:7"), "{stdout}");
    assert!(stdout.contains("error: no-debugger"), "{stdout}");
    assert!(stdout.contains("test.js:3:3"), "{stdout}");
    assert!(stdout.contains("Unexpected 'debugger' statement."), "{stdout}");
    assert!(
        stdout.ends_with("Found 2 errors.\n1 fixable with the `--fix` option.\n"),
        "{stdout}"
    );
    Ok(())
}

#[test]
fn test_output_json() -> anyhow::Result<()> {
    let directory = TempDir::new()?;
    let directory = directory.path();
    std::fs::write(directory.join("test.js"), "debugger;\nfoo;\n")?;

    let output = lintel(directory)
        .arg("check")
        .arg(".")
        .arg("--output-format")
        .arg("json")
        .output()?;
    assert_eq!(output.status.code(), Some(1));

    let problems: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    let problems = problems.as_array().unwrap();
    assert_eq!(problems.len(), 2);

    assert_eq!(problems[0]["path"], "test.js");
    assert_eq!(problems[0]["rule"], "no-debugger");
    assert_eq!(problems[0]["severity"], "error");
    assert_eq!(problems[0]["start"]["line"], 1);
    assert_eq!(problems[0]["start"]["column"], 1);
    assert!(problems[0]["fix"].is_object());

    assert_eq!(problems[1]["rule"], "no-undef");
    assert_eq!(problems[1]["message"], "'foo' is not defined.");
    assert!(problems[1]["fix"].is_null());
    Ok(())
}
