#![allow(clippy::expect_used, clippy::unwrap_used)]

use errbag_core::selector::{select, FieldMatch, Target};
use errbag_core::{BagError, FieldError, Selector};

fn record(id: &str, field: &str, scope: Option<&str>, rule: &str) -> FieldError {
    let mut e = FieldError::new(id, field, rule, format!("{field} failed {rule}"));
    e.scope = scope.map(str::to_string);
    e
}

#[test]
fn grammar_acceptance_matrix() {
    let cases: Vec<(&str, Target, Option<&str>)> = vec![
        (
            "email",
            Target::Path {
                scope: None,
                field: FieldMatch::Name("email".to_string()),
            },
            None,
        ),
        (
            "billing.email",
            Target::Path {
                scope: Some("billing".to_string()),
                field: FieldMatch::Name("email".to_string()),
            },
            None,
        ),
        (
            "billing.email:required",
            Target::Path {
                scope: Some("billing".to_string()),
                field: FieldMatch::Name("email".to_string()),
            },
            Some("required"),
        ),
        (
            "*",
            Target::Path {
                scope: None,
                field: FieldMatch::Any,
            },
            None,
        ),
        (
            "billing.*",
            Target::Path {
                scope: Some("billing".to_string()),
                field: FieldMatch::Any,
            },
            None,
        ),
        (
            "#form1-email",
            Target::Id {
                prefix: "form1-email".to_string(),
            },
            None,
        ),
        (
            "#form1-:min",
            Target::Id {
                prefix: "form1-".to_string(),
            },
            Some("min"),
        ),
    ];

    for (text, target, rule) in cases {
        let selector = Selector::parse(text).expect(text);
        assert_eq!(selector.target, target, "target for {text:?}");
        assert_eq!(selector.rule.as_deref(), rule, "rule for {text:?}");
    }
}

#[test]
fn grammar_rejection_matrix() {
    for text in [
        "", "  ", ".", ":", "#", "a.b.c", "a..b", ".email", "email.", "email:", ":required",
        "#:required", "#id:", "a*", "*a", "sc ope.field",
    ] {
        match Selector::parse(text) {
            Err(BagError::InvalidSelector(_)) => {}
            other => panic!("expected InvalidSelector for {text:?}, got {other:?}"),
        }
    }
}

#[test]
fn selectors_are_case_sensitive() {
    let selector = Selector::parse("Billing.Email:Required").expect("parse");
    assert!(selector.is_primary(&record("f1", "Email", Some("Billing"), "Required")));
    assert!(!selector.is_primary(&record("f1", "email", Some("billing"), "required")));
}

#[test]
fn primary_beats_alternate_even_when_alternate_comes_first() {
    let alt = record("f1", "address.street", None, "required");
    let primary = record("f2", "street", Some("address"), "required");
    let pool = vec![&alt, &primary];

    let selector = Selector::parse("address.street").expect("parse");
    assert_eq!(select(&pool, &selector), vec![&primary]);
}

#[test]
fn alternate_resolves_when_no_primary_exists() {
    let alt = record("f1", "address.street", None, "required");
    let other = record("f2", "city", None, "required");
    let pool = vec![&alt, &other];

    let selector = Selector::parse("address.street").expect("parse");
    assert_eq!(select(&pool, &selector), vec![&alt]);
}

#[test]
fn rule_filter_applies_to_both_tiers() {
    let alt = record("f1", "address.street", None, "min");
    let pool = vec![&alt];

    let selector = Selector::parse("address.street:required").expect("parse");
    assert!(select(&pool, &selector).is_empty());

    let selector = Selector::parse("address.street:min").expect("parse");
    assert_eq!(select(&pool, &selector), vec![&alt]);
}

#[test]
fn wildcard_selects_every_primary_in_scope() {
    let a = record("f1", "street", Some("address"), "required");
    let b = record("f2", "city", Some("address"), "required");
    let c = record("f3", "name", None, "required");
    let pool = vec![&a, &b, &c];

    let selector = Selector::parse("address.*").expect("parse");
    assert_eq!(select(&pool, &selector), vec![&a, &b]);

    let selector = Selector::parse("*").expect("parse");
    assert_eq!(select(&pool, &selector), vec![&c]);
}

#[test]
fn id_prefix_selection_ignores_alternates() {
    let a = record("form1-email", "email", None, "required");
    let b = record("form2-email", "email", None, "required");
    let pool = vec![&a, &b];

    let selector = Selector::parse("#form1-").expect("parse");
    assert_eq!(select(&pool, &selector), vec![&a]);

    let selector = Selector::parse("#form3-").expect("parse");
    assert!(select(&pool, &selector).is_empty());
}
