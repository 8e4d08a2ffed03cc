use tempfile::TempDir;

use crate::helpers::{CommandExt, lintel};

#[test]
fn test_fix_writes_file() -> anyhow::Result<()> {
    let directory = TempDir::new()?;
    let directory = directory.path();
    std::fs::write(
        directory.join("test.js"),
        "if (typeof a == \"b\") {};\ndebugger;\nc != d;\n",
    )?;

    insta::assert_snapshot!(
        lintel(directory)
            .arg("check")
            .arg(".")
            .arg("--fix")
            .arg("--output-format")
            .arg("concise")
            .run(),
        @r"
    success: false
    exit_code: 1
    ----- stdout -----
    test.js [2:1] no-undef 'c' is not defined.
    test.js [2:3] eqeqeq Expected '!==' and instead saw '!='.
    test.js [2:6] no-undef 'd' is not defined.
    Found 3 errors.

    ----- stderr -----
    "
    );

    let fixed = std::fs::read_to_string(directory.join("test.js"))?;
    assert_eq!(fixed, "if (typeof a === \"b\") {}\nc != d;\n");

    Ok(())
}

#[test]
fn test_fix_clean_file_is_untouched() -> anyhow::Result<()> {
    let directory = TempDir::new()?;
    let directory = directory.path();
    let contents = "const x = 1;\nuse_(x);\n";
    std::fs::write(directory.join("test.js"), contents)?;

    let output = lintel(directory)
        .arg("check")
        .arg("test.js")
        .arg("--fix")
        .arg("--select")
        .arg("no-debugger,eqeqeq")
        .output()?;

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(std::fs::read_to_string(directory.join("test.js"))?, contents);
    Ok(())
}

#[test]
fn test_fix_several_rules_until_convergence() -> anyhow::Result<()> {
    let directory = TempDir::new()?;
    let directory = directory.path();
    std::fs::write(
        directory.join("lintel.toml"),
        "[lint]\nselect = [\"semi\", \"no-extra-semi\", \"prefer-const\", \"no-var\"]\n",
    )?;
    std::fs::write(
        directory.join("test.mjs"),
        "import a from \"a\";\nvar b = a;;\nlet c = b\nuse_(c)\n",
    )?;

    let output = lintel(directory)
        .arg("check")
        .arg("test.mjs")
        .arg("--fix")
        .arg("--config")
        .arg("lintel.toml")
        .output()?;

    assert_eq!(output.status.code(), Some(0), "{output:?}");
    assert_eq!(
        std::fs::read_to_string(directory.join("test.mjs"))?,
        "import a from \"a\";\nconst b = a;\nconst c = b;\nuse_(c);\n"
    );
    Ok(())
}
