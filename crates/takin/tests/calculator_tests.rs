//! End-to-end tests for an arithmetic grammar: precedence from declaration
//! order, associativity, parentheses and error anchoring.

use takin::{Associativity, GrammarBuilder, ParseError, SlrParser};

#[derive(Debug, Default, Clone, PartialEq)]
enum Value {
    #[default]
    None,
    Number(f64),
}

fn number_of(value: &Value) -> f64 {
    match value {
        Value::Number(n) => *n,
        Value::None => f64::NAN,
    }
}

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// `^` binds tightest, then `*`, `/`, `+`, `-`; parentheses override.
fn calculator() -> SlrParser<Value> {
    let mut builder = GrammarBuilder::<Value>::new();

    let number = builder
        .terminal_with("number", r"\d+(\.\d+)?", Associativity::None, |token| {
            Value::Number(token.raw.parse().unwrap_or(f64::NAN))
        })
        .unwrap();
    let op_exp = builder.terminal_assoc("^", r"\^", Associativity::Right).unwrap();
    let op_mul = builder.terminal_assoc("*", r"\*", Associativity::Left).unwrap();
    let op_div = builder.terminal_assoc("/", r"/", Associativity::Left).unwrap();
    let op_add = builder.terminal_assoc("+", r"\+", Associativity::Left).unwrap();
    let op_sub = builder.terminal_assoc("-", r"-", Associativity::Left).unwrap();
    let par_open = builder.terminal("(", r"\(").unwrap();
    let par_close = builder.terminal(")", r"\)").unwrap();

    let expression = builder.nonterminal("expression");
    builder.rule(expression, [number.into()]);
    builder.rule_with(
        expression,
        [par_open.into(), expression.into(), par_close.into()],
        |children| children[1].take(),
    );
    for (operator, apply) in [
        (op_exp, f64::powf as fn(f64, f64) -> f64),
        (op_mul, |a, b| a * b),
        (op_div, |a, b| a / b),
        (op_add, |a, b| a + b),
        (op_sub, |a, b| a - b),
    ] {
        builder.rule_with(
            expression,
            [expression.into(), operator.into(), expression.into()],
            move |children| {
                Value::Number(apply(
                    number_of(&children[0].value),
                    number_of(&children[2].value),
                ))
            },
        );
    }

    let program = builder.nonterminal("program");
    builder.rule(program, [expression.into()]);

    builder.build(program).unwrap()
}

fn eval(parser: &SlrParser<Value>, input: &str) -> f64 {
    number_of(&parser.parse(input).unwrap())
}

#[test]
fn test_exponent_binds_before_product_and_sum() {
    init_logger();
    let parser = calculator();
    assert_eq!(eval(&parser, "18 + 2^(1 + 1) * 4"), 34.0);
}

#[test]
fn test_mixed_operators_and_parentheses() {
    let parser = calculator();
    assert_eq!(eval(&parser, "3 * 3 + 4^2 - (9 / 3)"), 22.0);
}

#[test]
fn test_addition_chain() {
    let parser = calculator();
    assert_eq!(eval(&parser, "32 + 32 + 32 + 32"), 128.0);
}

#[test]
fn test_single_number() {
    let parser = calculator();
    assert_eq!(eval(&parser, "42"), 42.0);
    assert_eq!(eval(&parser, "  3.25  "), 3.25);
}

#[test]
fn test_left_associative_subtraction() {
    let parser = calculator();
    assert_eq!(eval(&parser, "10 - 3 - 2"), 5.0);
}

#[test]
fn test_right_associative_exponent() {
    let parser = calculator();
    // 2^(3^2), not (2^3)^2.
    assert_eq!(eval(&parser, "2 ^ 3 ^ 2"), 512.0);
}

#[test]
fn test_parentheses_nest_arbitrarily() {
    let parser = calculator();
    assert_eq!(eval(&parser, "((((1 + 2))))"), 3.0);
    assert_eq!(eval(&parser, "2 * (3 + (4 - 1))"), 12.0);
}

#[test]
fn test_declaration_order_decides_precedence() {
    fn sums_and_products(star_first: bool) -> SlrParser<Value> {
        let mut builder = GrammarBuilder::<Value>::new();
        let number = builder
            .terminal_with("number", r"\d+", Associativity::None, |token| {
                Value::Number(token.raw.parse().unwrap_or(f64::NAN))
            })
            .unwrap();
        let (op_mul, op_add) = if star_first {
            let mul = builder.terminal_assoc("*", r"\*", Associativity::Left).unwrap();
            let add = builder.terminal_assoc("+", r"\+", Associativity::Left).unwrap();
            (mul, add)
        } else {
            let add = builder.terminal_assoc("+", r"\+", Associativity::Left).unwrap();
            let mul = builder.terminal_assoc("*", r"\*", Associativity::Left).unwrap();
            (mul, add)
        };

        let expression = builder.nonterminal("expression");
        builder.rule(expression, [number.into()]);
        for (operator, apply) in [
            (op_mul, (|a, b| a * b) as fn(f64, f64) -> f64),
            (op_add, |a, b| a + b),
        ] {
            builder.rule_with(
                expression,
                [expression.into(), operator.into(), expression.into()],
                move |children| {
                    Value::Number(apply(
                        number_of(&children[0].value),
                        number_of(&children[2].value),
                    ))
                },
            );
        }
        let program = builder.nonterminal("program");
        builder.rule(program, [expression.into()]);
        builder.build(program).unwrap()
    }

    // `*` declared first binds tighter: 2 + (3 * 4).
    assert_eq!(eval(&sums_and_products(true), "2 + 3 * 4"), 14.0);
    // `+` declared first binds tighter: (2 + 3) * 4.
    assert_eq!(eval(&sums_and_products(false), "2 + 3 * 4"), 20.0);
}

#[test]
fn test_unknown_character_is_anchored() {
    let parser = calculator();
    let error = parser.parse("18 + $2").unwrap_err();
    match error {
        ParseError::UnrecognisedInput { span, snippet } => {
            assert_eq!(span.start, 5);
            assert_eq!(span.end, 6);
            assert!(snippet.contains('^'));
        }
        other => panic!("expected UnrecognisedInput, got {other:?}"),
    }
}

#[test]
fn test_truncated_input_reports_expectations() {
    let parser = calculator();
    let error = parser.parse("(1 + 2").unwrap_err();
    match error {
        ParseError::UnexpectedToken { span, expected, .. } => {
            assert_eq!(span.start, 6);
            assert!(expected.contains(')'));
        }
        other => panic!("expected UnexpectedToken, got {other:?}"),
    }
}
