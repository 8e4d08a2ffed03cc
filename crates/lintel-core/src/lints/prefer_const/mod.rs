pub(crate) mod prefer_const;

#[cfg(test)]
mod tests {
    use crate::utils_test::*;
    use insta::assert_snapshot;

    fn snapshot_lint(code: &str) -> String {
        format_diagnostics(code, "prefer-const")
    }

    #[test]
    fn test_no_lint_prefer_const() {
        expect_no_lint("let a = 1; a = 2;", "prefer-const");
        expect_no_lint("let b; b = 1;", "prefer-const");
        expect_no_lint("const c = 1;", "prefer-const");
        expect_no_lint("for (let i = 0; i < 3; i++) {}", "prefer-const");
        expect_no_lint("var d = 1;", "prefer-const");
        expect_no_lint("let e = 0; e++;", "prefer-const");
        expect_no_lint("let f = 0; function g() { f += 1; }", "prefer-const");
    }

    #[test]
    fn test_lint_prefer_const() {
        assert_snapshot!(
            snapshot_lint("let x = 1;\nlet { y, z } = obj;\nz = 2;\nuse(x, y);"),
            @r"
        <test> [1:5] prefer-const 'x' is never reassigned. Use 'const' instead.
        <test> [2:7] prefer-const 'y' is never reassigned. Use 'const' instead.
        Found 2 errors.
        "
        );
    }

    #[test]
    fn test_fix_prefer_const() {
        assert_snapshot!(
            get_fixed_text(
                vec![
                    "let x = 1;\nuse(x);",
                    "for (let k of list) { use(k); }",
                    "let a = 1, b = 2;\nuse(a, b);",
                    "let c = 1, d;\nd = 2;",
                    "let { y, z } = obj;\nz = 2;",
                ],
                "prefer-const",
            ),
            @r"
        OLD:
        ====
        let x = 1;
        use(x);
        NEW:
        ====
        const x = 1;
        use(x);

        OLD:
        ====
        for (let k of list) { use(k); }
        NEW:
        ====
        for (const k of list) { use(k); }

        OLD:
        ====
        let a = 1, b = 2;
        use(a, b);
        NEW:
        ====
        const a = 1, b = 2;
        use(a, b);

        OLD:
        ====
        let c = 1, d;
        d = 2;
        NEW:
        ====
        let c = 1, d;
        d = 2;

        OLD:
        ====
        let { y, z } = obj;
        z = 2;
        NEW:
        ====
        let { y, z } = obj;
        z = 2;
        "
        );
    }
}
