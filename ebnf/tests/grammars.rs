//! End-to-end normalization of small but complete grammars.

use ebnf::{parse, Grammar, NonTerminalId, Symbol};

/// Rules rendered with names, sorted, so grammars can be compared regardless
/// of how their ids were numbered.
fn named_rules(g: &Grammar) -> Vec<String> {
    let mut lines: Vec<String> = g.to_string().lines().map(str::to_owned).collect();
    lines.sort();
    lines
}

fn rules_of(g: &Grammar, id: NonTerminalId) -> Vec<&Vec<Symbol>> {
    g.rules
        .iter()
        .filter(|r| r.lhs == id)
        .map(|r| &r.rhs)
        .collect()
}

#[test]
fn postal_address() {
    let src = r#"
        <postal-address> ::= <name-part> <street-address> <zip-part>
        <name-part> ::= <personal-part> <last-name> <opt-suffix-part> %x0a
                      | <personal-part> <name-part>
        <personal-part> ::= <initial> "." | <first-name>
        <street-address> ::= <house-num> <street-name> [<apt-num>] %x0a
        <zip-part> ::= <town-name> "," <state-code> <zip-code> %x0a
        <opt-suffix-part> ::= "Sr." | "Jr." | ""
    "#;
    let g = parse(src, true).unwrap();

    let name_part = g.names.id("name-part").unwrap();
    assert_eq!(rules_of(&g, name_part).len(), 2);

    let suffix = g.names.id("opt-suffix-part").unwrap();
    assert_eq!(
        rules_of(&g, suffix),
        vec![
            &vec![Symbol::from("Sr.")],
            &vec![Symbol::from("Jr.")],
            &vec![Symbol::epsilon()],
        ]
    );

    // The only synthesized non-terminal is the optional apartment number.
    let synthesized: Vec<_> = g
        .names
        .iter()
        .filter(|(id, _)| g.names.is_synthesized(*id))
        .collect();
    assert_eq!(synthesized.len(), 1);

    let undefined: Vec<String> = g
        .unreachable_non_terminals()
        .into_iter()
        .map(|(name, _)| name)
        .collect();
    assert_eq!(
        undefined,
        vec![
            "last-name",
            "initial",
            "first-name",
            "house-num",
            "street-name",
            "apt-num",
            "town-name",
            "state-code",
            "zip-code",
        ]
    );
}

#[test]
fn arithmetic_expressions() {
    let src = "
        <expr>   ::= <term> (('+' | '-') <term>)*
        <term>   ::= <factor> (('*' | '/') <factor>)*
        <factor> ::= <number> | '(' <expr> ')'
        <number> ::= ('0' | '1' | '2' | '3' | '4' | '5' | '6' | '7' | '8' | '9')+
    ";
    let g = parse(src, false).unwrap();
    assert!(g.unreachable_non_terminals().is_empty());

    // Every right-hand side is flat: only terminals and known non-terminals.
    for rule in &g.rules {
        assert!(!rule.rhs.is_empty());
        for sym in &rule.rhs {
            if let Symbol::NonTerminal(id) = sym {
                assert!(g.resolve_name(*id).is_some(), "unknown id {}", id);
            }
        }
    }

    let factor = g.names.id("factor").unwrap();
    let expr = g.names.id("expr").unwrap();
    assert_eq!(
        rules_of(&g, factor)[1],
        &vec![
            Symbol::from("("),
            Symbol::NonTerminal(expr),
            Symbol::from(")")
        ]
    );

    // Output is ordered by id, descending.
    let ids: Vec<NonTerminalId> = g.rules.iter().map(|r| r.lhs).collect();
    let mut sorted = ids.clone();
    sorted.sort_by(|a, b| b.cmp(a));
    assert_eq!(ids, sorted);
}

#[test]
fn renormalizing_is_idempotent() {
    let src = "<s> ::= ('a' | \"'\")* <t>? [%x7e]\n<t> := 'b'+ | ''";
    let g = parse(src, false).unwrap();
    let again = parse(&g.to_string(), false).unwrap();

    assert_eq!(named_rules(&g), named_rules(&again));
    assert!(again.names.iter().all(|(id, _)| !again.names.is_synthesized(id)));
}

#[test]
fn long_terminals() {
    let g = parse("<kw> ::= 'let' | 'in' | %x41", true).unwrap();
    assert_eq!(
        g.rules.iter().map(|r| r.rhs.clone()).collect::<Vec<_>>(),
        vec![
            vec![Symbol::from("let")],
            vec![Symbol::from("in")],
            vec![Symbol::from("A")],
        ]
    );

    let g = parse("<kw> ::= 'let'", false).unwrap();
    assert_eq!(
        g.rules[0].rhs,
        vec![Symbol::from("l"), Symbol::from("e"), Symbol::from("t")]
    );
}

#[test]
fn error_positions() {
    let src = "<a> ::= 'x'\n<b> ::= \"abc\n";
    let err = parse(src, false).unwrap_err();
    let loc = err.location(src);
    assert_eq!((loc.line, loc.column), (2, 9));
    assert!(err.offset < src.len());
    assert_eq!(
        err.render(src),
        "line 2: <b> ::= \"abc\n                ^\nunterminated literal, missing closing \""
    );

    let src = "<a> ::= 'x'\n<b> ::= ('y' | <c>\n";
    let err = parse(src, false).unwrap_err();
    assert_eq!(err.message, "missing )");
    assert_eq!(err.location(src).line, 2);
    assert_eq!(err.location(src).column, 9);
}
