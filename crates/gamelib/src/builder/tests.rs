use super::*;
use serde_json::json;

fn input(v: serde_json::Value) -> SparseInput {
    match v {
        serde_json::Value::Object(map) => map,
        other => panic!("expected object, got {other}"),
    }
}

fn with_builder<R>(f: impl FnOnce(PartialQueryBuilder<'_>) -> R) -> R {
    let schema = Schema::games();
    f(PartialQueryBuilder::new(&schema))
}

// ==================== filter ====================

#[test]
fn filter_scenario_category_and_year() {
    let q = with_builder(|b| {
        b.build_filter(&input(json!({ "category": "platformer", "year": 1985 })))
            .unwrap()
    });
    assert_eq!(q.clause(), "category = ? AND year = ?");
    assert_eq!(q.params(), &[Value::from("platformer"), Value::from(1985)]);
}

#[test]
fn filter_empty_selects_everything() {
    let q = with_builder(|b| b.build_filter(&SparseInput::new()).unwrap());
    assert!(q.is_empty());
    assert_eq!(q.clause(), "");
    assert!(q.params().is_empty());
    assert_eq!(q, FilterQuery::all());
}

#[test]
fn filter_uses_canonical_order_not_input_order() {
    let q = with_builder(|b| {
        b.build_filter(&input(json!({ "rating": "E", "year": "1991", "category": "puzzle" })))
            .unwrap()
    });
    assert_eq!(q.columns(), &["category", "year", "rating"]);
    assert_eq!(
        q.params(),
        &[Value::from("puzzle"), Value::from(1991), Value::from("E")]
    );
}

#[test]
fn filter_param_count_matches_predicates_for_every_subset() {
    let all = [
        ("category", json!("racing")),
        ("year", json!(1992)),
        ("rating", json!("T")),
    ];
    for mask in 0u8..8 {
        let mut query = SparseInput::new();
        for (i, (k, v)) in all.iter().enumerate() {
            if mask & (1 << i) != 0 {
                query.insert((*k).to_string(), v.clone());
            }
        }
        let q = with_builder(|b| b.build_filter(&query).unwrap());
        let clause = q.clause();
        assert_eq!(q.params().len(), mask.count_ones() as usize);
        assert_eq!(clause.matches("= ?").count(), q.params().len());
        if q.len() > 1 {
            assert_eq!(clause.matches(" AND ").count(), q.len() - 1);
        }
    }
}

#[test]
fn filter_ignores_unknown_keys_and_name() {
    let q = with_builder(|b| {
        b.build_filter(&input(json!({ "foo": 1, "name": "Tetris", "category": "puzzle" })))
            .unwrap()
    });
    assert_eq!(q.clause(), "category = ?");
    assert_eq!(q.params(), &[Value::from("puzzle")]);
}

#[test]
fn filter_skips_null_and_empty_values() {
    let q = with_builder(|b| {
        b.build_filter(&input(json!({ "category": "", "year": null, "rating": "M" })))
            .unwrap()
    });
    assert_eq!(q.clause(), "rating = ?");
}

#[test]
fn filter_rejects_badly_typed_values() {
    let err = with_builder(|b| {
        b.build_filter(&input(json!({ "year": "last year" })))
            .unwrap_err()
    });
    assert!(matches!(err, CatalogError::Validation(_)));
}

#[test]
fn filter_values_never_reach_sql_text() {
    let evil = "x' OR '1'='1";
    let q = with_builder(|b| b.build_filter(&input(json!({ "category": evil }))).unwrap());
    let schema = Schema::games();
    let sql = q.to_select_sql(&schema, Placeholder::Question);
    assert!(!sql.contains(evil));
    assert_eq!(q.params(), &[Value::from(evil)]);
}

#[test]
fn filter_select_sql_rendering() {
    let schema = Schema::games();
    let q = PartialQueryBuilder::new(&schema)
        .build_filter(&input(json!({ "category": "platformer", "year": 1985 })))
        .unwrap();
    assert_eq!(
        q.to_select_sql(&schema, Placeholder::Dollar),
        "SELECT id, name, category, year, rating FROM games \
         WHERE category = $1 AND year = $2 ORDER BY id"
    );
    assert_eq!(
        FilterQuery::all().to_select_sql(&schema, Placeholder::Dollar),
        "SELECT id, name, category, year, rating FROM games ORDER BY id"
    );
}

// ==================== insert ====================

#[test]
fn insert_name_only() {
    let stmt = with_builder(|b| b.build_insert(&input(json!({ "name": "X" }))).unwrap());
    assert_eq!(stmt.columns(), &["name"]);
    assert_eq!(stmt.placeholders(), vec!["?"]);
    assert_eq!(stmt.params(), &[Value::from("X")]);
}

#[test]
fn insert_lengths_for_every_optional_subset() {
    let all = [
        ("category", json!("platformer")),
        ("year", json!(1985)),
        ("rating", json!("E")),
    ];
    for mask in 0u8..8 {
        let mut body = input(json!({ "name": "Mario Bros 1" }));
        // insert optional keys in reverse so input order differs from canonical order
        for (i, (k, v)) in all.iter().enumerate().rev() {
            if mask & (1 << i) != 0 {
                body.insert((*k).to_string(), v.clone());
            }
        }
        let stmt = with_builder(|b| b.build_insert(&body).unwrap());
        let expected_len = 1 + mask.count_ones() as usize;
        assert_eq!(stmt.columns().len(), expected_len);
        assert_eq!(stmt.placeholders().len(), expected_len);
        assert_eq!(stmt.params().len(), expected_len);
        assert_eq!(stmt.columns()[0], "name");

        let expected: Vec<_> = all
            .iter()
            .enumerate()
            .filter(|(i, _)| mask & (1 << i) != 0)
            .map(|(_, (k, _))| *k)
            .collect();
        assert_eq!(&stmt.columns()[1..], expected.as_slice());
    }
}

#[test]
fn insert_requires_non_empty_name() {
    with_builder(|b| {
        for body in [
            json!({}),
            json!({ "category": "puzzle" }),
            json!({ "name": null }),
            json!({ "name": "" }),
            json!({ "name": "  " }),
            json!({ "name": 7 }),
        ] {
            let err = b.build_insert(&input(body.clone())).unwrap_err();
            assert!(
                matches!(err, CatalogError::Validation(_)),
                "{body} should fail validation, got {err:?}"
            );
        }
    });
}

#[test]
fn insert_ignores_unknown_keys() {
    with_builder(|b| {
        let with_extra = b.build_insert(&input(json!({ "name": "X", "foo": 1 }))).unwrap();
        let plain = b.build_insert(&input(json!({ "name": "X" }))).unwrap();
        assert_eq!(with_extra, plain);
    });
}

#[test]
fn insert_skips_null_optionals_and_keeps_year_typed() {
    let stmt = with_builder(|b| {
        b.build_insert(&input(json!({ "name": "Tetris", "category": null, "year": 1984 })))
            .unwrap()
    });
    assert_eq!(stmt.columns(), &["name", "year"]);
    assert_eq!(stmt.value("year"), Some(&Value::Integer(1984)));
    assert_eq!(stmt.value("category"), None);
}

#[test]
fn insert_sql_rendering() {
    let schema = Schema::games();
    let stmt = PartialQueryBuilder::new(&schema)
        .build_insert(&input(json!({ "name": "Tetris", "rating": "E" })))
        .unwrap();
    assert_eq!(
        stmt.to_sql(&schema, Placeholder::Question),
        "INSERT INTO games (name, rating) VALUES (?, ?)"
    );
    assert_eq!(
        stmt.to_sql(&schema, Placeholder::Dollar),
        "INSERT INTO games (name, rating) VALUES ($1, $2)"
    );
}

// ==================== partial update ====================

#[test]
fn update_with_no_fields_fails() {
    with_builder(|b| {
        assert!(matches!(
            b.build_partial_update(1, &SparseInput::new()),
            Err(CatalogError::NoFields)
        ));
        assert!(matches!(
            b.build_partial_update(1, &input(json!({ "foo": 1 }))),
            Err(CatalogError::NoFields)
        ));
    });
}

#[test]
fn update_name_only_puts_id_last() {
    let stmt = with_builder(|b| {
        b.build_partial_update(42, &input(json!({ "name": "X" })))
            .unwrap()
    });
    assert_eq!(stmt.set_clause(), vec!["name = ?"]);
    assert_eq!(stmt.params(), &[Value::from("X"), Value::from(42)]);
    assert_eq!(stmt.id(), 42);
}

#[test]
fn update_canonical_order_and_sql() {
    let schema = Schema::games();
    let stmt = PartialQueryBuilder::new(&schema)
        .build_partial_update(
            7,
            &input(json!({ "rating": "M", "name": "Doom", "year": 1993 })),
        )
        .unwrap();
    assert_eq!(
        stmt.set_clause(),
        vec!["name = ?", "year = ?", "rating = ?"]
    );
    assert_eq!(
        stmt.params(),
        &[
            Value::from("Doom"),
            Value::from(1993),
            Value::from("M"),
            Value::from(7)
        ]
    );
    assert_eq!(
        stmt.to_sql(&schema, Placeholder::Question),
        "UPDATE games SET name = ?, year = ?, rating = ? WHERE id = ?"
    );
    assert_eq!(
        stmt.to_sql(&schema, Placeholder::Dollar),
        "UPDATE games SET name = $1, year = $2, rating = $3 WHERE id = $4"
    );
}

#[test]
fn update_null_clears_optional_but_not_name() {
    with_builder(|b| {
        let stmt = b
            .build_partial_update(3, &input(json!({ "category": null })))
            .unwrap();
        assert_eq!(stmt.params(), &[Value::Null, Value::from(3)]);

        let err = b
            .build_partial_update(3, &input(json!({ "name": null })))
            .unwrap_err();
        assert!(matches!(err, CatalogError::Validation(_)));

        let err = b
            .build_partial_update(3, &input(json!({ "name": "" })))
            .unwrap_err();
        assert!(matches!(err, CatalogError::Validation(_)));
    });
}

#[test]
fn update_ignores_unknown_keys() {
    let stmt = with_builder(|b| {
        b.build_partial_update(5, &input(json!({ "foo": "bar", "category": "rpg" })))
            .unwrap()
    });
    assert_eq!(stmt.columns(), &["category"]);
    assert_eq!(
        stmt.changes().collect::<Vec<_>>(),
        vec![("category", &Value::from("rpg"))]
    );
}
