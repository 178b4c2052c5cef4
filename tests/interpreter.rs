use sbml::{run_source, with_run_stack, SbmlError};

/// Runs a program, returning what it printed and how it ended.
fn run(src: &str) -> (String, Result<(), SbmlError>) {
    let mut out: Vec<u8> = Vec::new();
    let result = run_source(src, &mut out);

    (String::from_utf8(out).expect("output is UTF-8"), result)
}

fn output(src: &str) -> String {
    let (out, result) = run(src);

    if let Err(e) = result {
        panic!("program failed: {}\n{}", e, src);
    }

    out
}

fn assert_semantic_error(src: &str) -> String {
    let (out, result) = run(src);

    match result {
        Err(e) => assert!(e.is_semantic(), "expected semantic error, got {}", e),
        Ok(()) => panic!("expected semantic error, program succeeded:\n{}", src),
    }

    out
}

// ─────────────────────────── end-to-end scenarios ───────────────────────────

#[test]
fn assignment_then_print() {
    assert_eq!(output("{ x = 5; print(x); }"), "5\n");
}

#[test]
fn conditional_with_else() {
    assert_eq!(
        output("{ if (1 < 2) { print(1); } else { print(0); } }"),
        "1\n"
    );
    assert_eq!(
        output("{ if (2 < 1) { print(1); } else { print(0); } }"),
        "0\n"
    );
    assert_eq!(output("{ if (False) { print(1); } print(2); }"), "2\n");
}

#[test]
fn list_indexing() {
    assert_eq!(output("{ x = [1,2,3]; print(x[1]); }"), "2\n");
}

#[test]
fn real_and_integer_division() {
    assert_eq!(output("{ print(7 / 2); }"), "3.5\n");
    assert_eq!(output("{ print(7 div 2); }"), "3\n");
}

#[test]
fn mismatched_plus_halts_without_output() {
    let out = assert_semantic_error("{ print(1 + \"a\"); }");

    assert_eq!(out, "");
}

#[test]
fn diagnostics_match_cli_contract() {
    let (_, result) = run("{ print(1 + \"a\"); }");
    assert_eq!(result.unwrap_err().diagnostic(), "SEMANTIC ERROR");

    let (_, result) = run("{ print(1 + ); }");
    assert_eq!(result.unwrap_err().diagnostic(), "SYNTAX ERROR");
}

// ─────────────────────────── error model ───────────────────────────

#[test]
fn evaluation_stops_at_first_error() {
    let out = assert_semantic_error("{ print(1); print(1 div 0); print(2); } { print(3); }");

    assert_eq!(out, "1\n");
}

#[test]
fn syntax_error_prevents_any_evaluation() {
    let (out, result) = run("{ print(1); } { print( }");

    assert!(result.unwrap_err().is_syntax());
    assert_eq!(out, "");
}

#[test]
fn lexical_error_is_a_syntax_error() {
    let (out, result) = run("{ print(1); x = 2 $ 3; }");

    assert!(result.unwrap_err().is_syntax());
    assert_eq!(out, "");
}

#[test]
fn undefined_names() {
    assert_semantic_error("{ print(y); }");
    assert_semantic_error("{ print(nope(1)); }");
    assert_semantic_error("{ nope(1); }");
}

#[test]
fn arity_must_match() {
    let src = "fun add(a, b) = { } a + b; { print(add(1)); }";
    assert_semantic_error(src);

    let src = "fun add(a, b) = { } a + b; { print(add(1, 2, 3)); }";
    assert_semantic_error(src);
}

#[test]
fn errors_inside_function_bodies_propagate() {
    let src = "fun bad(x) = { y = x div 0; } 1; { print(0); z = bad(4); print(2); }";
    let out = assert_semantic_error(src);

    assert_eq!(out, "0\n");
}

// ─────────────────────────── functions and recursion ───────────────────────────

#[test]
fn recursive_factorial() {
    let src = "
        fun fact(n) = {
            if (n < 1) {
                r = 1;
            } else {
                r = n * fact(n - 1);
            }
        } r;

        { print(fact(5)); print(fact(0)); print(fact(10)); }
    ";

    assert_eq!(output(src), "120\n1\n3628800\n");
}

#[test]
fn recursive_fibonacci() {
    let src = "
        fun fib(n) = {
            if (n < 2) { r = n; } else { r = fib(n - 1) + fib(n - 2); }
        } r;

        { print(fib(10)); }
    ";

    assert_eq!(output(src), "55\n");
}

#[test]
fn outer_call_sees_its_own_parameter_after_inner_returns() {
    // f(3) = 3 + f(2) = 3 + 2 + f(1) = ... = 6, but only if `n` is restored
    // after every nested call.
    let src = "
        fun f(n) = {
            if (n > 0) { x = f(n - 1); } else { x = 0; }
        } n + x;

        { print(f(3)); }
    ";

    assert_eq!(output(src), "6\n");
}

#[test]
fn arguments_are_evaluated_in_the_callers_environment() {
    let src = "
        fun sub(a, b) = { } a - b;
        fun swap(a, b) = { } sub(b, a);

        { a = 10; print(sub(1, a)); print(swap(1, 2)); }
    ";

    assert_eq!(output(src), "-9\n1\n");
}

#[test]
fn pending_callers_parameters_are_visible_to_callees() {
    let src = "
        fun inner() = { } k * 2;
        fun outer(k) = { } inner();

        { print(outer(21)); }
    ";

    assert_eq!(output(src), "42\n");
}

#[test]
fn call_statement_runs_for_side_effects() {
    let src = "
        fun show(v) = { print(v); } 0;

        { show('a') show([1]); }
    ";

    assert_eq!(output(src), "a\n[1]\n");
}

#[test]
fn redefinition_overwrites() {
    let src = "
        fun f() = { } 1;
        { print(f()); }
        fun f() = { } 2;
        { print(f()); }
    ";

    assert_eq!(output(src), "1\n2\n");
}

#[test]
fn function_defined_later_is_not_yet_callable() {
    let out = assert_semantic_error("{ print(g()); } fun g() = { } 1;");

    assert_eq!(out, "");
}

// ─────────────────────────── statements ───────────────────────────

#[test]
fn while_loop_accumulates() {
    let src = "{ i = 1; total = 0; while (i <= 10) { total = total + i; i = i + 1; } print(total); }";

    assert_eq!(output(src), "55\n");
}

#[test]
fn indexed_assignment_mutates_in_place() {
    assert_eq!(
        output("{ l = [1, 2, 3]; l[0] = 'x'; l[2] = l[1] * 10; print(l); }"),
        "['x', 2, 20]\n"
    );

    assert_semantic_error("{ s = 'abc'; s[0] = 'z'; }");
    assert_semantic_error("{ m[0] = 1; }");
    assert_semantic_error("{ l = [1]; l[1] = 2; }");
}

#[test]
fn assignment_overwrites_prior_binding() {
    assert_eq!(output("{ x = 1; x = 'now a string'; print(x); }"), "now a string\n");
}

// ─────────────────────────── expressions ───────────────────────────

#[test]
fn cons_and_membership() {
    let src = "{ l = 1 :: 2 :: [3]; print(l); print(2 in l); print(5 in l); print('el' in 'hello'); }";

    assert_eq!(output(src), "[1, 2, 3]\nTrue\nFalse\nTrue\n");
    assert_semantic_error("{ print(1 :: 2); }");
    assert_semantic_error("{ print(1 in 2); }");
}

#[test]
fn tuples_and_tuple_index() {
    let src = "{ t = (1, 'two', 3.0); print(t); print(#2 t); print((5,)); print(#1 (9,)); }";

    assert_eq!(output(src), "(1, 'two', 3.0)\ntwo\n(5,)\n9\n");
    assert_semantic_error("{ t = (1, 2); print(#3 t); }");
    assert_semantic_error("{ t = (1, 2); print(#0 t); }");
}

#[test]
fn string_operations() {
    let src = "{ s = 'ab' + \"cd\"; print(s); print(s[2]); print('a' < 'b'); print(s == 'abcd'); }";

    assert_eq!(output(src), "abcd\nc\nTrue\nTrue\n");
}

#[test]
fn boolean_logic() {
    let src = "{ print(not False); print(1 < 2 andalso 3 > 4); print(False orelse True); }";

    assert_eq!(output(src), "True\nFalse\nTrue\n");
    assert_semantic_error("{ print(1 andalso True); }");
    assert_semantic_error("{ print(not 1); }");
}

#[test]
fn numeric_forms() {
    let src = "{ print(2 ** 10); print(2 ** -1); print(1.5e3); print(-7 mod 3); print(-3 + 1.0); }";

    assert_eq!(output(src), "1024\n0.5\n1500.0\n2\n-2.0\n");
}

#[test]
fn comparisons_across_types_fail() {
    assert_semantic_error("{ print(1 < 'a'); }");
    assert_semantic_error("{ print([1] == (1,)); }");
    assert_semantic_error("{ print(True <> 1); }");
    assert_eq!(output("{ print([1, [2]] == [1, [2]]); }"), "True\n");
}

#[test]
fn out_of_range_indexing_fails() {
    assert_semantic_error("{ x = [1, 2]; print(x[2]); }");
    assert_semantic_error("{ x = [1, 2]; print(x[-1]); }");
    assert_semantic_error("{ x = [1, 2]; print(x[0.0]); }");
    assert_semantic_error("{ print('abc'[3]); }");
}

#[test]
fn int_division_matches_truncation_for_a_grid_of_operands() {
    for a in -6i64..=6 {
        for b in [-4i64, -3, -1, 1, 2, 5] {
            let out = output(&format!("{{ print({} div {}); }}", a, b));
            assert_eq!(out, format!("{}\n", a / b), "{} div {}", a, b);
        }

        assert_semantic_error(&format!("{{ print({} div 0); }}", a));
        assert_semantic_error(&format!("{{ print({} / 0); }}", a));
    }
}

#[test]
fn cons_grows_length_by_one() {
    for n in 0..5 {
        let items: Vec<String> = (0..n).map(|i| i.to_string()).collect();
        let src = format!(
            "{{ l = [{}]; m = 'v' :: l; print(m[0]); print(m == ['v'] + l); }}",
            items.join(", ")
        );

        assert_eq!(output(&src), "v\nTrue\n");
    }
}

// ─────────────────────────── unbounded integers ───────────────────────────

#[test]
fn factorial_past_machine_width() {
    let src = "
        fun fact(n) = {
            if (n < 1) { r = 1; } else { r = n * fact(n - 1); }
        } r;

        { print(fact(20)); print(fact(21)); print(fact(30)); }
    ";

    assert_eq!(
        output(src),
        "2432902008176640000\n51090942171709440000\n265252859812191058636308480000000\n"
    );
}

#[test]
fn integer_arithmetic_never_overflows() {
    let src = "{
        print(2 ** 62 + 2 ** 62);
        print(-9223372036854775808 div -1);
        print(99999999999999999999 mod 7);
        print(-(2 ** 64));
        print(2 ** 64 > 2 ** 63);
        print([1, 2, 3][2 ** 64 - 2 ** 64 + 1]);
    }";

    assert_eq!(
        output(src),
        "9223372036854775808\n9223372036854775808\n1\n-18446744073709551616\nTrue\n2\n"
    );
    assert_semantic_error("{ print([1][2 ** 64]); }");
}

// ─────────────────────────── shared lists ───────────────────────────

#[test]
fn assigned_lists_are_aliases() {
    assert_eq!(output("{ a = [1]; b = a; b[0] = 2; print(a); }"), "[2]\n");
    assert_eq!(
        output("{ a = [1, 2]; t = (a, 0); a[1] = 5; print(t); }"),
        "([1, 5], 0)\n"
    );
}

#[test]
fn functions_mutate_list_arguments() {
    let src = "fun set(l) = { l[0] = 9; } 0; { x = [1]; y = set(x); print(x); print(y); }";

    assert_eq!(output(src), "[9]\n0\n");
}

#[test]
fn cons_and_concatenation_copy() {
    let src = "{ a = [1]; b = 0 :: a; c = a + a; b[1] = 7; c[0] = 8; print(a); print(b); print(c); }";

    assert_eq!(output(src), "[1]\n[0, 7]\n[8, 1]\n");
}

#[test]
fn list_holding_itself_prints() {
    assert_eq!(output("{ a = [1]; a[0] = a; print(a); }"), "[[...]]\n");
}

// ─────────────────────────── parsing corners ───────────────────────────

#[test]
fn not_as_right_operand() {
    assert_eq!(
        output("{ print(True == not False); print(False orelse not 1 < 2); }"),
        "True\nFalse\n"
    );
}

#[test]
fn duplicate_parameters_are_a_syntax_error() {
    let (out, result) = run("fun f(a, a) = { } a; { print(f(1, 2)); }");

    assert!(result.unwrap_err().is_syntax());
    assert_eq!(out, "");
}

// ─────────────────────────── recursion depth ───────────────────────────

#[test]
fn deep_recursion_on_the_run_stack() {
    let src = "
        fun depth(n) = {
            if (n == 0) { r = 0; } else { r = 1 + depth(n - 1); }
        } r;

        { print(depth(5000)); }
    ";

    let out = with_run_stack(|| output(src)).expect("run thread spawns");

    assert_eq!(out, "5000\n");
}
