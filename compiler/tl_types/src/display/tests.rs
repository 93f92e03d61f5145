use pretty_assertions::assert_eq;
use proptest::prelude::*;
use serde_json::json;

use super::*;

#[test]
fn test_prettify_instantiated_variables() {
    assert_eq!(
        prettify("function<K@3, V@4>({K@3 : V@4}): {K@3}"),
        "function<K, V>({K : V}): {K}"
    );
}

#[test]
fn test_prettify_anonymous_variables() {
    assert_eq!(prettify("function(@1): @1"), "function(T1): T1");
    assert_eq!(prettify("{@a}"), "{a}");
}

#[test]
fn test_prettify_leaves_plain_types() {
    let plain = "function(string, integer): boolean";
    assert_eq!(prettify(plain), plain);
    assert_eq!(prettify(""), "");
}

#[test]
fn test_prettify_is_idempotent_on_generics() {
    let once = prettify("function<T@12>(T@12, @7): T@12 | @7");
    assert_eq!(once, "function<T>(T, T7): T | T7");
    assert_eq!(prettify(&once), once);
}

proptest! {
    #[test]
    fn prettify_twice_is_prettify_once(
        text in "([A-Za-z]{0,3}(@[0-9]{1,2})?[(),: <>{}|]{1,2}){0,8}"
    ) {
        let once = prettify(&text);
        prop_assert!(!once.contains('@'));
        prop_assert_eq!(prettify(&once), once);
    }
}

fn report() -> TypeReport {
    let json = json!({
        "types": {
            "1": {
                "str": "function(self: Point, n: number): Point",
                "t": 0x0000_0020,
                "args": [[3, "self"], [2, "n"]],
                "rets": [[3]]
            },
            "2": { "str": "number", "t": 0x0000_0002 },
            "3": { "str": "Point", "t": 0x1000_0000 },
            "4": {
                "str": "function<T@1>(T@1, string...)",
                "t": 0x0000_0020,
                "args": [[5], [6]]
            },
            "5": { "str": "T@1", "t": 0x0800_0000 },
            "6": { "str": "string", "t": 0x0000_0008 },
            "7": { "str": "function(): (number, string)", "t": 0x0000_0020, "rets": [[2], [6]] }
        }
    });
    TypeReport::from_json(&json.to_string(), "a.tl").unwrap()
}

fn func(report: &TypeReport, id: u32) -> &TypeInfo {
    report.get(TypeId::from_raw(id)).unwrap()
}

#[test]
fn test_signature() {
    let report = report();
    let sig = signature(&report, func(&report, 1), "move", false);
    assert_eq!(sig.label, "move(self: Point, n: number): Point");
    assert_eq!(sig.parameters, vec!["self: Point", "n: number"]);
}

#[test]
fn test_signature_skips_receiver() {
    let report = report();
    let sig = signature(&report, func(&report, 1), "move", true);
    assert_eq!(sig.label, "move(n: number): Point");
    assert_eq!(sig.parameters, vec!["n: number"]);
}

#[test]
fn test_signature_generic_and_multiple_returns() {
    let report = report();
    assert_eq!(
        signature(&report, func(&report, 4), "f", false).label,
        "f(T, string)"
    );
    assert_eq!(
        signature(&report, func(&report, 7), "g", true).label,
        "g(): number, string"
    );
}

#[test]
fn test_type_name_of_missing_id() {
    assert_eq!(type_name(&report(), TypeId::from_raw(99)), "unknown");
}
