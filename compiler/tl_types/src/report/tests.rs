use pretty_assertions::assert_eq;

use super::*;

const REPORT: &str = r#"{
    "by_pos": {
        "/tmp/__tl__tmp__check-abc.tl": {
            "1": { "7": 2, "11": 3 },
            "2": { "1": 4 }
        }
    },
    "symbols": [
        [1, 1, "@{", 0],
        [1, 7, "x", 2],
        [2, 1, "f", 4],
        [3, 1, "@{", 0],
        [3, 5, "y", 3],
        [4, 1, "@}", 3],
        [5, 1, "@}", 0]
    ],
    "types": {
        "2": { "str": "integer", "t": 65538 },
        "3": { "str": "string", "t": 8 },
        "4": {
            "str": "function(string, n: integer): boolean",
            "t": 32,
            "args": [[3], [2, "n"]],
            "rets": [[5]],
            "file": "/tmp/__tl__tmp__check-abc.tl",
            "y": 2,
            "x": 1
        },
        "5": { "str": "boolean", "t": 4 },
        "6": {
            "str": "Point",
            "t": 131080,
            "fields": { "y": 2, "x": 2 },
            "y": 9,
            "x": 3
        },
        "7": { "str": "Point", "t": 268435456, "ref": 6 }
    },
    "globals": { "print": 4 }
}"#;

fn report() -> TypeReport {
    TypeReport::from_json(REPORT, "/tmp/__tl__tmp__check-abc.tl").unwrap()
}

#[test]
fn test_decode_symbols() {
    let report = report();
    let kinds: Vec<_> = report.symbols().iter().map(|s| s.kind.clone()).collect();
    assert_eq!(
        kinds,
        vec![
            SymbolKind::ScopeOpen,
            SymbolKind::Declaration {
                name: "x".into(),
                type_id: TypeId::from_raw(2)
            },
            SymbolKind::Declaration {
                name: "f".into(),
                type_id: TypeId::from_raw(4)
            },
            SymbolKind::ScopeOpen,
            SymbolKind::Declaration {
                name: "y".into(),
                type_id: TypeId::from_raw(3)
            },
            SymbolKind::ScopeClose { open_index: 3 },
            SymbolKind::ScopeClose { open_index: 0 },
        ]
    );
}

#[test]
fn test_decode_types() {
    let report = report();
    let func = report.get(TypeId::from_raw(4)).unwrap();
    assert_eq!(func.kind, TypeKind::Function);
    assert_eq!(
        func.args,
        vec![
            Param {
                type_id: TypeId::from_raw(3),
                name: None
            },
            Param {
                type_id: TypeId::from_raw(2),
                name: Some("n".into())
            },
        ]
    );
    assert_eq!(func.rets.len(), 1);
    assert_eq!(
        func.location,
        Some(Location {
            file: Some("/tmp/__tl__tmp__check-abc.tl".into()),
            line: 2,
            column: 1
        })
    );

    let point = report.get(TypeId::from_raw(6)).unwrap();
    assert_eq!(point.kind, TypeKind::Record);
    let names: Vec<_> = point.fields.keys().map(String::as_str).collect();
    assert_eq!(names, vec!["x", "y"]);
    assert_eq!(point.location.as_ref().unwrap().file, None);

    let alias = report.get(TypeId::from_raw(7)).unwrap();
    assert_eq!(alias.kind, TypeKind::Nominal);
    assert_eq!(alias.reference, Some(TypeId::from_raw(6)));
}

#[test]
fn test_type_at() {
    let report = report();
    assert_eq!(report.type_at(1, 11), Some(TypeId::from_raw(3)));
    assert_eq!(report.type_at(2, 1), Some(TypeId::from_raw(4)));
    assert_eq!(report.type_at(2, 2), None);
    assert_eq!(report.global("print"), Some(TypeId::from_raw(4)));
}

#[test]
fn test_main_file_matched_by_name() {
    let report = TypeReport::from_json(REPORT, "__tl__tmp__check-abc.tl").unwrap();
    assert_eq!(report.main_file(), "/tmp/__tl__tmp__check-abc.tl");
    assert_eq!(report.type_at(1, 7), Some(TypeId::from_raw(2)));
    assert!(report.is_main_file(Some("/tmp/__tl__tmp__check-abc.tl")));
    assert!(report.is_main_file(None));
    assert!(!report.is_main_file(Some("/src/other.tl")));
}

#[test]
fn test_bare_parameter_ids() {
    let json = r#"{ "types": { "1": { "str": "function(integer)", "t": 32, "args": [2] } } }"#;
    let report = TypeReport::from_json(json, "a.tl").unwrap();
    let func = report.get(TypeId::from_raw(1)).unwrap();
    assert_eq!(func.args[0].type_id, TypeId::from_raw(2));
    assert_eq!(func.args[0].name, None);
}

#[test]
fn test_unknown_type_code() {
    let json = r#"{ "types": { "1": { "str": "?", "t": 4660 } } }"#;
    let report = TypeReport::from_json(json, "a.tl").unwrap();
    assert_eq!(
        report.get(TypeId::from_raw(1)).unwrap().kind,
        TypeKind::Other(4660)
    );
}

#[test]
fn test_empty_object_is_empty_report() {
    let report = TypeReport::from_json("{}", "a.tl").unwrap();
    assert!(report.symbols().is_empty());
    assert!(report.globals().is_empty());
    assert_eq!(report.type_at(1, 1), None);
}

#[test]
fn test_rejects_invalid_json() {
    assert!(matches!(
        TypeReport::from_json("", "a.tl"),
        Err(ReportError::Json(_))
    ));
    assert!(matches!(
        TypeReport::from_json("not json", "a.tl"),
        Err(ReportError::Json(_))
    ));
}

#[test]
fn test_rejects_unsorted_symbols() {
    let json = r#"{ "symbols": [[2, 1, "a", 1], [1, 5, "b", 1]] }"#;
    assert!(matches!(
        TypeReport::from_json(json, "a.tl"),
        Err(ReportError::UnsortedSymbols { index: 1 })
    ));
}

#[test]
fn test_duplicate_positions_are_sorted() {
    let json = r#"{ "symbols": [[1, 5, "a", 1], [1, 5, "b", 2]] }"#;
    let report = TypeReport::from_json(json, "a.tl").unwrap();
    assert_eq!(report.symbols().len(), 2);
}

#[test]
fn test_rejects_unbalanced_close() {
    let json = r#"{ "symbols": [[1, 1, "a", 1], [2, 1, "@}", 0]] }"#;
    assert!(matches!(
        TypeReport::from_json(json, "a.tl"),
        Err(ReportError::BadScopeClose { index: 1 })
    ));
}

#[test]
fn test_rejects_bad_keys() {
    let json = r#"{ "by_pos": { "a.tl": { "one": { "1": 2 } } } }"#;
    let err = TypeReport::from_json(json, "a.tl").unwrap_err();
    assert!(matches!(err, ReportError::BadKey { ref key } if key == "one"));
    assert_eq!(err.to_string(), "type report has a non-numeric key \"one\"");
}
