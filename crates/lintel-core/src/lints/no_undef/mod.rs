pub(crate) mod no_undef;

#[cfg(test)]
mod tests {
    use crate::check::{LintOptions, lint};
    use crate::config::Config;
    use crate::rule_set::ActiveRuleSet;
    use crate::rule_table::Registry;
    use crate::utils_test::*;
    use insta::assert_snapshot;

    fn snapshot_lint(code: &str) -> String {
        format_diagnostics(code, "no-undef")
    }

    #[test]
    fn test_no_lint_no_undef() {
        expect_no_lint("var a = 1; a = 2;", "no-undef");
        expect_no_lint("function f(b) { return b + c; var c; }", "no-undef");
        expect_no_lint("Math.max(1, 2); new Map();", "no-undef");
        expect_no_lint("hoisted(); function hoisted() {}", "no-undef");
        expect_no_lint("if (typeof foo === \"undefined\") {}", "no-undef");
        expect_no_lint("try {} catch (e) { e; }", "no-undef");
        expect_no_lint("class A { m() { return A; } }", "no-undef");
        expect_no_lint("import { x } from \"x\"; x();", "no-undef");
        expect_no_lint("const o = { key: 1 }; o.missing;", "no-undef");
        expect_no_lint("function f() { return arguments.length; }\nf();\n", "no-undef");
        expect_no_lint("const g = function () { return () => arguments[0]; };", "no-undef");
    }

    #[test]
    fn test_lint_no_undef_arguments_in_arrow() {
        assert_snapshot!(
            snapshot_lint("const h = () => arguments;"),
            @r"
        <test> [1:17] no-undef 'arguments' is not defined.
        Found 1 error.
        "
        );
    }

    #[test]
    fn test_lint_no_undef() {
        assert_snapshot!(
            snapshot_lint("foo = 1;\nbar(foo);\n{ let inner; }\ninner;"),
            @r"
        <test> [1:1] no-undef 'foo' is not defined.
        <test> [2:1] no-undef 'bar' is not defined.
        <test> [2:5] no-undef 'foo' is not defined.
        <test> [4:1] no-undef 'inner' is not defined.
        Found 4 errors.
        "
        );
        assert_snapshot!(
            format_diagnostics_with_options("typeof missing", "no-undef", Some("typeof = true")),
            @r"
        <test> [1:8] no-undef 'missing' is not defined.
        Found 1 error.
        "
        );
    }

    #[test]
    fn test_no_undef_environments() {
        let source = "window.alert(1);\nprocess.exit(1);\nmyGlobal();\n";
        let config = Config::from_toml(
            r#"
[lint]
select = ["no-undef"]
env = ["browser"]

[lint.globals]
myGlobal = "readonly"
"#,
        )
        .unwrap();
        let rules = ActiveRuleSet::resolve(&Registry::builtin(), &config);
        let result = lint(source, &rules, &LintOptions::from_config(&config)).unwrap();

        let messages: Vec<_> = result.problems.iter().map(|p| p.message.as_str()).collect();
        assert_eq!(messages, vec!["'process' is not defined."]);
    }
}
