pub(crate) mod no_unused_vars;

#[cfg(test)]
mod tests {
    use crate::utils_test::*;
    use insta::assert_snapshot;

    fn snapshot_lint(code: &str) -> String {
        format_diagnostics(code, "no-unused-vars")
    }

    #[test]
    fn test_no_lint_no_unused_vars() {
        expect_no_lint("var a = 1; alert(a);", "no-unused-vars");
        expect_no_lint("function f() {} f();", "no-unused-vars");
        expect_no_lint("function g(x) { return x; } g();", "no-unused-vars");
        expect_no_lint("(function named() {})();", "no-unused-vars");
        expect_no_lint("try {} catch (e) {}", "no-unused-vars");
        expect_no_lint("let n = 0; use(n++);", "no-unused-vars");
        expect_no_lint("let total = 0; total = total + 1; use(total);", "no-unused-vars");
        expect_no_lint("for (const item of items) { use(item); }", "no-unused-vars");
        expect_no_lint("const { a, b } = obj; use(a, b);", "no-unused-vars");
        expect_no_lint("Math.max(1, 2);", "no-unused-vars");
        expect_no_lint("function f() { return arguments; } f();", "no-unused-vars");
        expect_no_lint(
            "class A { static make() { return new A(); } } A.make();",
            "no-unused-vars",
        );
    }

    #[test]
    fn test_lint_no_unused_vars_class_referring_to_itself() {
        assert_snapshot!(
            snapshot_lint("class A { m() { return A; } }"),
            @r"
        <test> [1:7] no-unused-vars 'A' is defined but never used.
        Found 1 error.
        "
        );
    }

    #[test]
    fn test_lint_no_unused_vars() {
        assert_snapshot!(
            snapshot_lint("var a = 1;\nlet b;\nfunction f(x) {}\n"),
            @r"
        <test> [1:5] no-unused-vars 'a' is assigned a value but never used.
        <test> [2:5] no-unused-vars 'b' is defined but never used.
        <test> [3:10] no-unused-vars 'f' is defined but never used.
        <test> [3:12] no-unused-vars 'x' is defined but never used.
        Found 4 errors.
        "
        );
        assert_snapshot!(
            snapshot_lint("let count = 0;\ncount += 1;\ncount++;"),
            @r"
        <test> [1:5] no-unused-vars 'count' is assigned a value but never used.
        Found 1 error.
        "
        );
        assert_snapshot!(
            snapshot_lint("function fact(n) { return n < 2 ? 1 : n * fact(n - 1); }"),
            @r"
        <test> [1:10] no-unused-vars 'fact' is defined but never used.
        Found 1 error.
        "
        );
    }

    #[test]
    fn test_no_unused_vars_options() {
        expect_no_lint_with_options(
            "function f(x) {} f();",
            "no-unused-vars",
            Some("args = \"none\""),
        );
        expect_no_lint_with_options(
            "var _ignored = 1;",
            "no-unused-vars",
            Some("vars-ignore-pattern = \"^_\""),
        );
        assert_snapshot!(
            format_diagnostics_with_options(
                "var g = 1; function h() { var l = 1; } h();",
                "no-unused-vars",
                Some("vars = \"local\""),
            ),
            @r"
        <test> [1:31] no-unused-vars 'l' is assigned a value but never used.
        Found 1 error.
        "
        );
        assert_snapshot!(
            format_diagnostics_with_options(
                "function f(_a) {} f();",
                "no-unused-vars",
                Some("vars-ignore-pattern = \"^_\""),
            ),
            @r"
        <test> [1:12] no-unused-vars '_a' is defined but never used.
        Found 1 error.
        "
        );
    }
}
