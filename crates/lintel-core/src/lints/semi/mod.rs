pub(crate) mod semi;

#[cfg(test)]
mod tests {
    use crate::utils_test::*;
    use insta::assert_snapshot;

    fn snapshot_lint(code: &str) -> String {
        format_diagnostics(code, "semi")
    }

    #[test]
    fn test_no_lint_semi() {
        expect_no_lint("var x = 1;", "semi");
        expect_no_lint("for (let i = 0; i < 1; i++) {}", "semi");
        expect_no_lint("for (const k of list) {}", "semi");
        expect_no_lint("for (var k in obj);", "semi");
        expect_no_lint("function f() { return; }", "semi");
        expect_no_lint("do { x++; } while (x < 5);", "semi");
        expect_no_lint("if (a) {} else {}", "semi");
        expect_no_lint("import { a } from \"a\";", "semi");
    }

    #[test]
    fn test_lint_semi() {
        assert_snapshot!(
            snapshot_lint("var x = 1\nfoo()"),
            @r"
        <test> [1:10] semi Missing semicolon.
        <test> [2:6] semi Missing semicolon.
        Found 2 errors.
        "
        );
        assert_snapshot!(
            snapshot_lint("function f() { return x }\nwhile (a) { break }"),
            @r"
        <test> [1:24] semi Missing semicolon.
        <test> [2:18] semi Missing semicolon.
        Found 2 errors.
        "
        );
    }

    #[test]
    fn test_fix_semi() {
        assert_snapshot!(
            get_fixed_text(
                vec![
                    "let a = 1\nlet b = a // the end",
                    "throw new Error(\"no\")",
                    "do x++\nwhile (x < 3)",
                ],
                "semi",
            ),
            @r#"
        OLD:
        ====
        let a = 1
        let b = a // the end
        NEW:
        ====
        let a = 1;
        let b = a; // the end

        OLD:
        ====
        throw new Error("no")
        NEW:
        ====
        throw new Error("no");

        OLD:
        ====
        do x++
        while (x < 3)
        NEW:
        ====
        do x++;
        while (x < 3);
        "#
        );
    }
}
