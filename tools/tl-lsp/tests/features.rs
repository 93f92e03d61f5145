//! Editing a document and querying it through the session, as the server
//! does between compiler runs.

#![allow(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use std::sync::Arc;

use pretty_assertions::assert_eq;
use serde_json::json;
use tl_diagnostic::PathMapper;
use tl_lsp::features::{completion, hover, signature};
use tl_lsp::session::{Analysis, Session};
use tl_types::TypeReport;
use tower_lsp::lsp_types::{HoverContents, Position, Range, TextDocumentContentChangeEvent, Url};

const MAIN: &str = "/tmp/__tl__tmp__check-7.tl";

fn uri() -> Url {
    Url::parse("file:///proj/main.tl").unwrap()
}

fn analysis() -> Analysis {
    let report = json!({
        "symbols": [
            [1, 1, "@{", null],
            [1, 7, "conf", 2],
            [2, 1, "@{", null],
            [2, 16, "inner", 3],
            [2, 30, "@}", 1],
            [4, 1, "@}", 0]
        ],
        "types": {
            "1": { "str": "Config", "t": 0x0002_0008,
                   "fields": { "name": 3, "retries": 4, "reset": 5 } },
            "2": { "str": "Config", "t": 0x1000_0000, "ref": 1 },
            "3": { "str": "string", "t": 0x0000_0008 },
            "4": { "str": "integer", "t": 0x0001_0002 },
            "5": { "str": "function(Config, integer): boolean", "t": 0x0000_0020,
                   "args": [[2, "self"], [4, "n"]], "rets": [[6]] },
            "6": { "str": "boolean", "t": 0x0000_0004 }
        },
        "globals": {}
    });
    Analysis {
        report: Arc::new(TypeReport::from_json(&report.to_string(), MAIN).unwrap()),
        paths: PathMapper::new(uri(), "/proj"),
    }
}

fn insert(session: &Session, line: u32, character: u32, text: &str) {
    let at = Position::new(line, character);
    assert!(session.apply_changes(
        &uri(),
        vec![TextDocumentContentChangeEvent {
            range: Some(Range::new(at, at)),
            range_length: None,
            text: text.to_owned(),
        }],
    ));
}

#[test]
fn test_typing_a_method_call() {
    let session = Session::new();
    let epoch = session.open_document(
        uri(),
        "local conf = load()\nif true then local inner = \"\" end\n\n".to_owned(),
    );
    assert!(session.store_analysis(&uri(), epoch, analysis()));

    // `conf:` offers only the callable member.
    insert(&session, 2, 0, "conf:");
    let items = session
        .with_document(&uri(), |doc, analysis| {
            completion::completion(doc, analysis, Position::new(2, 5))
        })
        .unwrap();
    let labels: Vec<_> = items.iter().map(|item| item.label.as_str()).collect();
    assert_eq!(labels, vec!["reset"]);

    // Inside the argument list the receiver is not a parameter.
    insert(&session, 2, 5, "reset(");
    let help = session
        .with_document(&uri(), |doc, analysis| {
            signature::signature_help(doc, analysis?, Position::new(2, 11))
        })
        .flatten()
        .unwrap();
    assert_eq!(help.signatures[0].label, "reset(n: integer): boolean");
    assert_eq!(help.active_parameter, Some(0));
}

#[test]
fn test_closed_scope_is_not_visible() {
    let session = Session::new();
    let epoch = session.open_document(
        uri(),
        "local conf = load()\nif true then local inner = \"\" end\n\n".to_owned(),
    );
    session.store_analysis(&uri(), epoch, analysis());

    let items = session
        .with_document(&uri(), |doc, analysis| {
            completion::completion(doc, analysis, Position::new(2, 0))
        })
        .unwrap();
    let labels: Vec<_> = items.iter().map(|item| item.label.as_str()).collect();
    assert!(labels.contains(&"conf"));
    assert!(!labels.contains(&"inner"));
}

#[test]
fn test_hover_after_edit_uses_cached_report() {
    let session = Session::new();
    let epoch = session.open_document(uri(), "local conf = load()\n".to_owned());
    session.store_analysis(&uri(), epoch, analysis());
    insert(&session, 1, 0, "print(conf.retries)\n");

    let hover = session
        .with_document(&uri(), |doc, analysis| {
            hover::hover(doc, analysis?, Position::new(1, 12))
        })
        .flatten()
        .unwrap();
    let HoverContents::Markup(markup) = hover.contents else {
        panic!("expected markup");
    };
    assert_eq!(markup.value, "```teal\nretries: integer\n```");

    session.close_document(&uri());
    assert!(session
        .with_document(&uri(), |doc, analysis| {
            hover::hover(doc, analysis?, Position::new(1, 12))
        })
        .is_none());
}
