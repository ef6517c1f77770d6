use filterql::TokenKind;
use proptest::prelude::*;

fn identifier() -> impl Strategy<Value = String> {
    "[a-z_][a-z0-9_]{0,6}".prop_filter("keywords are not field names", |name| {
        TokenKind::from_word(name) == TokenKind::Identifier
    })
}

fn literal() -> impl Strategy<Value = String> {
    prop_oneof![
        "[0-9]{1,4}",
        "[0-9]{1,3}\\.[0-9]{1,3}",
        "[a-z' %]{0,6}".prop_map(|raw| format!("'{}'", raw.replace('\'', "''"))),
        Just("TRUE".to_owned()),
        Just("false".to_owned()),
    ]
}

fn operator() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec!["=", "<", "<=", "<>", ">", ">=", "!="])
}

fn negation() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec!["", "NOT "])
}

fn predicate() -> impl Strategy<Value = String> {
    prop_oneof![
        (identifier(), operator(), literal()).prop_map(|(f, op, v)| format!("{f} {op} {v}")),
        (literal(), operator(), identifier()).prop_map(|(v, op, f)| format!("{v} {op} {f}")),
        (identifier(), negation(), literal(), literal())
            .prop_map(|(f, not, lo, hi)| format!("{f} {not}BETWEEN {lo} AND {hi}")),
        (identifier(), negation(), "[a-z%]{0,5}")
            .prop_map(|(f, not, p)| format!("{f} {not}LIKE '{p}'")),
        (identifier(), negation(), prop::collection::vec(literal(), 1..4))
            .prop_map(|(f, not, vs)| format!("{f} {not}IN ({})", vs.join(", "))),
        (identifier(), negation()).prop_map(|(f, not)| format!("{f} IS {not}NULL")),
    ]
}

fn expression() -> impl Strategy<Value = String> {
    predicate().prop_recursive(4, 32, 3, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 2..4).prop_map(|terms| terms.join(" OR ")),
            prop::collection::vec(inner.clone(), 2..4).prop_map(|factors| factors.join(" AND ")),
            inner.clone().prop_map(|e| format!("({e})")),
            inner.prop_map(|e| format!("NOT ({e})")),
        ]
    })
}

fn token_soup() -> impl Strategy<Value = String> {
    let vocabulary = vec![
        "a", "b", "1", "2.5", "'s'", "(", ")", ",", "=", "<", ">", "!", "AND", "OR", "NOT",
        "BETWEEN", "LIKE", "IN", "IS", "NULL", "TRUE", ".", "?", ":p", "'",
    ];
    prop::collection::vec(prop::sample::select(vocabulary), 0..24).prop_map(|t| t.join(" "))
}

proptest! {
    #[test]
    fn prop_generated_expressions_parse(input in expression()) {
        prop_assert!(filterql::parse(&input).is_ok(), "{input}");
    }

    #[test]
    fn prop_parse_is_deterministic(input in expression()) {
        prop_assert_eq!(filterql::parse(&input), filterql::parse(&input));
    }

    #[test]
    fn prop_rendering_is_stable(input in expression()) {
        let tree = filterql::parse(&input).expect("generated input is valid");
        let rendered = tree.to_string();
        let again = filterql::parse(&rendered).expect("rendered text parses");
        prop_assert_eq!(&again, &tree);
        prop_assert_eq!(again.to_string(), rendered);
    }

    #[test]
    fn prop_token_soup_never_panics(input in token_soup()) {
        if let Err(err) = filterql::parse(&input) {
            prop_assert!(err.is_syntax());
            prop_assert!(err.offset() <= input.chars().count());
        }
    }

    #[test]
    fn prop_arbitrary_text_never_panics(input in "\\PC{0,80}") {
        if let Err(err) = filterql::parse(&input) {
            prop_assert!(err.offset() <= input.chars().count());
        }
    }
}
