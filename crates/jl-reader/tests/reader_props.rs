use proptest::prelude::*;

use jl_core::Value;
use jl_reader::{read, read_many};

proptest! {
    #[test]
    fn reader_never_panics(input in "\\PC*") {
        // Any arbitrary string should produce Ok or Err, never panic.
        let _ = read(&input);
    }

    #[test]
    fn reader_many_never_panics(input in "\\PC*") {
        let _ = read_many(&input);
    }
}

fn jl_atom() -> impl Strategy<Value = Value> {
    prop_oneof![
        // Integral numbers
        (-1_000_000i64..1_000_000).prop_map(|n| Value::number(n as f64)),
        // Fractional numbers
        (-1000.0f64..1000.0).prop_map(Value::number),
        // Strings, including characters the printer must escape
        "[a-zA-Z0-9 _\\\\\"\n\t]{0,12}".prop_map(Value::string),
        // Variables: never sign- or digit-led, so they cannot lex as numbers
        "[a-z<>=!?*][a-z0-9<>=!?*_-]{0,8}".prop_map(Value::symbol),
    ]
}

fn jl_value(depth: u32) -> impl Strategy<Value = Value> {
    if depth == 0 {
        jl_atom().boxed()
    } else {
        prop_oneof![
            jl_atom(),
            prop::collection::vec(jl_value(depth - 1), 0..4).prop_map(Value::list),
        ]
        .boxed()
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Print-then-parse reproduces a structurally equal value for numbers,
    /// strings, lists, and variables.
    #[test]
    fn print_parse_round_trip(value in jl_value(3)) {
        let printed = format!("{value}");
        let reparsed = read(&printed).unwrap_or_else(|e| {
            panic!("failed to reparse {printed:?}: {e}")
        });
        prop_assert_eq!(reparsed, value);
    }

    /// Sequences of printed expressions parse back one-for-one.
    #[test]
    fn printed_sequences_parse(values in prop::collection::vec(jl_value(2), 1..5)) {
        let printed: Vec<String> = values.iter().map(|v| format!("{v}")).collect();
        let joined = printed.join(" ");
        let reparsed = read_many(&joined).unwrap();
        prop_assert_eq!(reparsed, values);
    }
}
