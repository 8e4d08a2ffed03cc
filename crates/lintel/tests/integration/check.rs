use tempfile::TempDir;

use crate::helpers::{CommandExt, lintel};

#[test]
fn test_no_js_files() -> anyhow::Result<()> {
    let directory = TempDir::new()?;
    let directory = directory.path();
    std::fs::write(directory.join("notes.txt"), "debugger;")?;

    insta::assert_snapshot!(
        lintel(directory).arg("check").arg(".").run(),
        @r"
    success: true
    exit_code: 0
    ----- stdout -----
    Warning: No JavaScript files found under the given path(s).

    ----- stderr -----
    "
    );

    Ok(())
}

#[test]
fn test_missing_files_argument() -> anyhow::Result<()> {
    let directory = TempDir::new()?;
    let output = lintel(directory.path()).arg("check").output()?;
    assert_eq!(output.status.code(), Some(2));
    Ok(())
}

#[test]
fn test_clean_file() -> anyhow::Result<()> {
    let directory = TempDir::new()?;
    let directory = directory.path();
    std::fs::write(directory.join("test.js"), "const x = 1;\nexport_(x);\n")?;

    insta::assert_snapshot!(
        lintel(directory)
            .arg("check")
            .arg(".")
            .arg("--output-format")
            .arg("concise")
            .arg("--ignore")
            .arg("no-undef")
            .run(),
        @r"
    success: true
    exit_code: 0
    ----- stdout -----
    All checks passed!

    ----- stderr -----
    "
    );

    Ok(())
}

#[test]
fn test_problems_in_several_files() -> anyhow::Result<()> {
    let directory = TempDir::new()?;
    let directory = directory.path();
    std::fs::create_dir(directory.join("src"))?;
    std::fs::write(directory.join("test.js"), "foo = 1;\ndebugger;\n")?;
    std::fs::write(directory.join("src/app.js"), "if (a == 1) {}\n")?;
    std::fs::write(directory.join("src/readme.md"), "debugger;\n")?;

    insta::assert_snapshot!(
        lintel(directory)
            .arg("check")
            .arg(".")
            .arg("--output-format")
            .arg("concise")
            .run(),
        @r"
    success: false
    exit_code: 1
    ----- stdout -----
    src/app.js [1:5] no-undef 'a' is not defined.
    src/app.js [1:7] eqeqeq Expected '===' and instead saw '=='.
    test.js [1:1] no-undef 'foo' is not defined.
    test.js [2:1] no-debugger Unexpected 'debugger' statement.
    Found 4 errors.
    1 fixable with the `--fix` option.

    ----- stderr -----
    "
    );

    Ok(())
}

#[test]
fn test_select_and_ignore_flags() -> anyhow::Result<()> {
    let directory = TempDir::new()?;
    let directory = directory.path();
    std::fs::write(directory.join("test.js"), "var x = 1\ndebugger\n")?;

    insta::assert_snapshot!(
        lintel(directory)
            .arg("check")
            .arg("test.js")
            .arg("--output-format")
            .arg("concise")
            .arg("--select")
            .arg("semi,no-var,no-debugger")
            .arg("--ignore")
            .arg("no-debugger")
            .run(),
        @r"
    success: false
    exit_code: 1
    ----- stdout -----
    test.js [1:1] no-var Unexpected var, use let or const instead.
    test.js [1:10] semi Missing semicolon.
    test.js [2:9] semi Missing semicolon.
    Found 3 errors.
    2 fixable with the `--fix` option.

    ----- stderr -----
    "
    );

    Ok(())
}

#[test]
fn test_parse_error_is_fatal() -> anyhow::Result<()> {
    let directory = TempDir::new()?;
    let directory = directory.path();
    std::fs::write(directory.join("test.js"), "let x = ;\n")?;

    let output = lintel(directory)
        .arg("check")
        .arg(".")
        .arg("--output-format")
        .arg("concise")
        .output()?;
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert_eq!(output.status.code(), Some(2));
    assert!(stdout.starts_with("test.js [1:9] parse-error Parsing error:"), "{stdout}");
    assert!(stdout.contains("Found 1 error."), "{stdout}");
    Ok(())
}

#[test]
fn test_missing_path_is_an_error() -> anyhow::Result<()> {
    let directory = TempDir::new()?;
    let directory = directory.path();
    std::fs::write(directory.join("test.js"), "const x = 1;\n")?;

    let output = lintel(directory)
        .arg("check")
        .arg("test.js")
        .arg("missing.js")
        .output()?;
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr.contains("Error: No such file or directory: missing.js"), "{stderr}");
    Ok(())
}
