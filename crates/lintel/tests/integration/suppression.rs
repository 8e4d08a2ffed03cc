use tempfile::TempDir;

use crate::helpers::{CommandExt, lintel};

#[test]
fn test_suppression_comments() -> anyhow::Result<()> {
    let directory = TempDir::new()?;
    let directory = directory.path();
    std::fs::write(
        directory.join("test.js"),
        r#"// lintel-disable-next-line no-debugger -- kept on purpose
debugger;
/* lintel-disable no-undef */
foo = 1;
/* lintel-enable no-undef */
bar = 2; // lintel-disable-line no-undef
// lintel-disable-next-line eqeqeq
baz = 3;
"#,
    )?;

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
    test.js [7:1] unused-suppression Unused `lintel-disable-next-line` directive (no problems were reported from `eqeqeq`).
    test.js [8:1] no-undef 'baz' is not defined.
    Found 2 errors.
    1 fixable with the `--fix` option.

    ----- stderr -----
    "
    );

    Ok(())
}

#[test]
fn test_unknown_rule_in_suppression() -> anyhow::Result<()> {
    let directory = TempDir::new()?;
    let directory = directory.path();
    std::fs::write(
        directory.join("test.js"),
        "// lintel-disable no-such-rule\nconst x = 1;\nx;\n",
    )?;

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
    test.js [1:1] invalid-suppression Unknown rule `no-such-rule` in suppression comment.
    Found 1 error.

    ----- stderr -----
    "
    );

    Ok(())
}
