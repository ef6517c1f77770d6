use filterql::{CompOp, Identifier, Literal, LiteralKind, Node};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

fn parse_ok(input: &str) -> Node {
    init_tracing();
    filterql::parse(input).unwrap_or_else(|err| panic!("failed to parse {input:?}: {err}"))
}

fn ident(name: &str) -> Node {
    Node::identifier(name)
}

fn num(raw: &str) -> Node {
    Node::literal(Literal::numeric(raw))
}

fn string(raw: &str) -> Node {
    Node::literal(Literal::string(raw))
}

#[test]
fn test_determinism() {
    let input = "a = 1 AND (b <> 'x' OR c IS NOT NULL) AND NOT d IN (1, 2)";
    assert_eq!(parse_ok(input), parse_ok(input));
}

#[test]
fn test_or_and_precedence() {
    let expected = Node::filter(Node::Or {
        terms: vec![
            Node::comparison(ident("age"), CompOp::Gt, num("18")),
            Node::And {
                factors: vec![
                    Node::comparison(ident("status"), CompOp::Eq, num("1")),
                    Node::comparison(ident("flag"), CompOp::Eq, num("1")),
                ],
            },
        ],
    });
    assert_eq!(parse_ok("age > 18 OR status = 1 AND flag = 1"), expected);
}

#[test]
fn test_not_binds_tighter_than_and() {
    let expected = Node::filter(Node::And {
        factors: vec![
            Node::negated(Node::comparison(ident("a"), CompOp::Eq, num("1"))),
            Node::comparison(ident("b"), CompOp::Eq, num("2")),
        ],
    });
    assert_eq!(parse_ok("NOT a = 1 AND b = 2"), expected);
}

#[test]
fn test_grouping_overrides_precedence() {
    let expected = Node::filter(Node::And {
        factors: vec![
            Node::group(Node::Or {
                terms: vec![
                    Node::comparison(ident("a"), CompOp::Eq, num("1")),
                    Node::comparison(ident("b"), CompOp::Eq, num("2")),
                ],
            }),
            Node::comparison(ident("c"), CompOp::Eq, num("3")),
        ],
    });
    assert_eq!(parse_ok("(a = 1 OR b = 2) AND c = 3"), expected);
}

#[test]
fn test_singletons_never_wrapped() {
    for input in [
        "a = 1",
        "(a = 1)",
        "x BETWEEN 1 AND 2",
        "name LIKE 'J%'",
        "(a = 1 AND b = 2) OR c = 3",
    ] {
        let tree = parse_ok(input);
        tree.walk(&mut |node| match node {
            Node::Or { terms } => assert!(terms.len() >= 2, "{input}: {node:?}"),
            Node::And { factors } => assert!(factors.len() >= 2, "{input}: {node:?}"),
            Node::Not { .. } => panic!("{input}: unexpected NOT wrapper"),
            _ => {}
        });
    }
}

#[test]
fn test_between_sets_not_flag() {
    assert_eq!(
        parse_ok("price BETWEEN 10 AND 20").body(),
        &Node::Between {
            subject: Identifier::new("price"),
            not: false,
            low: Box::new(num("10")),
            high: Box::new(num("20")),
        }
    );
    assert!(matches!(
        parse_ok("price NOT BETWEEN 10 AND 20").body(),
        Node::Between { not: true, .. }
    ));
}

#[test]
fn test_in_list_of_strings() {
    assert_eq!(
        parse_ok("category IN ('a','b','c')").body(),
        &Node::In {
            subject: Identifier::new("category"),
            not: false,
            values: vec![Literal::string("a"), Literal::string("b"), Literal::string("c")],
        }
    );
}

#[test]
fn test_is_null_and_is_not_null() {
    assert_eq!(
        parse_ok("deleted_at IS NULL").body(),
        &Node::IsNull {
            subject: Identifier::new("deleted_at"),
            not: false,
        }
    );
    assert_eq!(
        parse_ok("deleted_at IS NOT NULL").body(),
        &Node::IsNull {
            subject: Identifier::new("deleted_at"),
            not: true,
        }
    );
}

#[test]
fn test_string_unescaping() {
    let tree = parse_ok("msg = 'it''s'");
    let literals = tree.literals();
    assert_eq!(literals.len(), 1);
    assert_eq!(literals[0].kind, LiteralKind::String);
    assert_eq!(literals[0].raw, "it's");
}

#[test]
fn test_numeric_classification_keeps_spelling() {
    for raw in ["3", "3.0", "1e5"] {
        let tree = parse_ok(&format!("n = {raw}"));
        let literals = tree.literals();
        assert_eq!(literals[0], &Literal::numeric(raw));
    }
    let tree = parse_ok("n IN (3, 3.0, 1e5)");
    let floats: Vec<bool> = tree.literals().iter().map(|l| l.is_float_like()).collect();
    assert_eq!(floats, [false, true, true]);
}

#[test]
fn test_like_disjunction_end_to_end() {
    let like = |pattern: &str| Node::Like {
        subject: Identifier::new("name"),
        not: false,
        pattern: Box::new(string(pattern)),
    };
    let expected = Node::filter(Node::Or {
        terms: vec![like("A%"), like("B%")],
    });
    assert_eq!(parse_ok("name LIKE 'A%' OR name LIKE 'B%'"), expected);
}

#[test]
fn test_keywords_are_case_insensitive() {
    assert_eq!(
        parse_ok("a between 1 and 2 or b is not null"),
        parse_ok("a BETWEEN 1 AND 2 OR b IS NOT NULL")
    );
    let tree = parse_ok("flag = True");
    assert_eq!(tree.literals()[0].as_bool(), Some(true));
    assert_eq!(tree.literals()[0].raw, "True");
}

#[test]
fn test_identifier_characters() {
    let tree = parse_ok("ns\\field = a:b");
    let names: Vec<&str> = tree.identifiers().iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, ["ns\\field", "a:b"]);
}

#[test]
fn test_unicode_string_literal() {
    let tree = parse_ok("city = 'Zürich' AND code = '東京'");
    let raws: Vec<&str> = tree.literals().iter().map(|l| l.raw.as_str()).collect();
    assert_eq!(raws, ["Zürich", "東京"]);
}

#[test]
fn test_reused_parser_after_free() {
    let mut parser = filterql::Parser::new("a = 1 OR b = 2");
    let first = parser.parse().expect("first");
    parser.free(true, 0);
    assert_eq!(parser.parse().expect("second"), first);
}
