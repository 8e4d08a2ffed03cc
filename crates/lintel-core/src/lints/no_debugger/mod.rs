pub(crate) mod no_debugger;

#[cfg(test)]
mod tests {
    use crate::utils_test::*;
    use insta::assert_snapshot;

    fn snapshot_lint(code: &str) -> String {
        format_diagnostics(code, "no-debugger")
    }

    #[test]
    fn test_no_lint_no_debugger() {
        expect_no_lint("debug();", "no-debugger");
        expect_no_lint("var debuggerEnabled = true;", "no-debugger");
        expect_no_lint("// debugger", "no-debugger");
    }

    #[test]
    fn test_lint_no_debugger() {
        assert_snapshot!(
            snapshot_lint("debugger;"),
            @r"
        <test> [1:1] no-debugger Unexpected 'debugger' statement.
        Found 1 error.
        "
        );
        assert_snapshot!(
            snapshot_lint("function f() {\n  if (x) debugger\n  debugger\n}"),
            @r"
        <test> [2:10] no-debugger Unexpected 'debugger' statement.
        <test> [3:3] no-debugger Unexpected 'debugger' statement.
        Found 2 errors.
        "
        );
    }

    #[test]
    fn test_fix_no_debugger() {
        assert_snapshot!(
            get_fixed_text(
                vec![
                    "a();\ndebugger;\nb();",
                    "a(); debugger;",
                    "if (x) debugger;",
                    "if (x) { debugger }",
                ],
                "no-debugger",
            ),
            @r"
        OLD:
        ====
        a();
        debugger;
        b();
        NEW:
        ====
        a();
        b();

        OLD:
        ====
        a(); debugger;
        NEW:
        ====
        a();

        OLD:
        ====
        if (x) debugger;
        NEW:
        ====
        if (x) debugger;

        OLD:
        ====
        if (x) { debugger }
        NEW:
        ====
        if (x) { }
        "
        );
    }
}
