//! Arithmetic calculator built on the grammar-definition surface.
//!
//! Run with: `cargo run --example calculator -- "18 + 2^(1 + 1) * 4"`

use takin::{Associativity, DefinitionError, GrammarBuilder, SlrParser};

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

fn build_calculator() -> Result<SlrParser<Value>, DefinitionError> {
    let mut builder = GrammarBuilder::<Value>::new();

    let number = builder.terminal_with("number", r"\d+(\.\d+)?", Associativity::None, |token| {
        Value::Number(token.raw.parse().unwrap_or(f64::NAN))
    })?;

    // Declaration order fixes precedence: earlier binds tighter.
    let op_exp = builder.terminal_assoc("^", r"\^", Associativity::Right)?;
    let op_mul = builder.terminal_assoc("*", r"\*", Associativity::Left)?;
    let op_div = builder.terminal_assoc("/", r"/", Associativity::Left)?;
    let op_add = builder.terminal_assoc("+", r"\+", Associativity::Left)?;
    let op_sub = builder.terminal_assoc("-", r"-", Associativity::Left)?;
    let par_open = builder.terminal("(", r"\(")?;
    let par_close = builder.terminal(")", r"\)")?;

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

    builder.build(program)
}

fn main() {
    env_logger::init();

    let Some(input) = std::env::args().nth(1) else {
        eprintln!("usage: calculator <expression>");
        std::process::exit(1);
    };

    let parser = match build_calculator() {
        Ok(parser) => parser,
        Err(error) => {
            eprintln!("{error}");
            std::process::exit(1);
        }
    };

    match parser.parse(&input) {
        Ok(value) => println!("{}", number_of(&value)),
        Err(error) => {
            eprintln!("{error}");
            std::process::exit(1);
        }
    }
}
