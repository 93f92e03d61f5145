use pretty_assertions::assert_eq;
use tl_ir::incremental::{ChangeMarker, InputEdit};
use tl_ir::{LineIndex, Span};

use super::*;
use crate::{parse, reparse, Tree};

/// Kind, span, field and token of every node in pre-order.
fn dump(tree: &Tree) -> Vec<String> {
    tree.root()
        .descendants()
        .map(|node| {
            format!(
                "{} {} {:?} {:?}",
                node.kind().as_str(),
                node.span(),
                node.field(),
                node.token()
            )
        })
        .collect()
}

/// Record `[start, end) -> text` on `tree` and return the edited source.
fn edit(tree: &mut Tree, source: &str, start: usize, end: usize, text: &str) -> String {
    let index = LineIndex::new(source);
    let (start, end) = (start as u32, end as u32);
    tree.edit(&InputEdit::new(
        start,
        end,
        index.point(start),
        index.point(end),
        text,
    ));
    let mut edited = source.to_owned();
    edited.replace_range(start as usize..end as usize, text);
    edited
}

#[test]
fn test_cursor_finds_statements_outside_change() {
    let tree = parse("local a = 1\nlocal b = 2\nlocal c = 3\n");
    let mut cursor = SyntaxCursor::new(&tree, ChangeMarker::new(21, 23, 1));

    let first = cursor.find_at(0).unwrap();
    assert_eq!(first.span(), Span::new(0, 11));
    cursor.advance();

    // `local b = 2` holds the edit.
    assert!(cursor.find_at(12).is_none());

    let third = cursor.find_at(25).unwrap();
    assert_eq!(third.text(), "local c = 3");
    assert!(cursor.next_leaf_after(third).is_none());
    cursor.advance();
    assert!(cursor.find_at(36).is_none());
}

#[test]
fn test_cursor_skips_statements_with_errors() {
    let tree = parse("local = 1\nlocal b = 2\n");
    let mut cursor = SyntaxCursor::new(&tree, ChangeMarker::new(100, 100, 0));
    assert!(cursor.find_at(0).is_none());
    assert!(cursor.find_at(10).is_some());
}

#[test]
fn test_edit_inside_one_statement_reuses_the_others() {
    let source = "local a = 1\nlocal b = 2\nlocal c = 3\n";
    let mut old = parse(source);
    let edited = edit(&mut old, source, 22, 23, "20");

    let (tree, stats) = reparse(&edited, &old);
    assert_eq!(
        stats,
        IncrementalStats {
            reused_count: 2,
            reparsed_count: 1,
        }
    );
    assert_eq!(dump(&tree), dump(&parse(&edited)));
    assert_eq!(tree.root().child(2).unwrap().text(), "local c = 3");
}

#[test]
fn test_edit_that_joins_statements() {
    let source = "local x = a\nb()\n";
    let mut old = parse(source);
    let edited = edit(&mut old, source, 12, 12, ".");

    let (tree, _) = reparse(&edited, &old);
    assert_eq!(dump(&tree), dump(&parse(&edited)));
    assert_eq!(tree.root().child_count(), 1);
}

#[test]
fn test_edit_that_changes_lookahead() {
    // Deleting `= 1` makes `local x` end before the next statement's `local`.
    let source = "local x = 1\nlocal y\n";
    let mut old = parse(source);
    let edited = edit(&mut old, source, 7, 11, "");

    let (tree, _) = reparse(&edited, &old);
    assert_eq!(dump(&tree), dump(&parse(&edited)));
}

#[test]
fn test_reparse_without_edit_is_full_parse() {
    let source = "print(1)";
    let old = parse(source);
    let (tree, stats) = reparse(source, &old);
    assert_eq!(stats, IncrementalStats::default());
    assert_eq!(dump(&tree), dump(&old));
}

#[test]
fn test_several_edits_before_reparse() {
    let source = "local a = 1\nlocal b = 2\nlocal c = 3\nlocal d = 4\n";
    let mut old = parse(source);
    let once = edit(&mut old, source, 22, 23, "22");
    let twice = edit(&mut old, &once, 0, 0, "-- header\n");

    let (tree, stats) = reparse(&twice, &old);
    assert_eq!(dump(&tree), dump(&parse(&twice)));
    assert!(stats.reused_count >= 2);
}

#[allow(
    clippy::disallowed_types,
    reason = "proptest macros internally use Arc"
)]
mod proptest_equivalence {
    use proptest::prelude::*;

    use super::{dump, edit};
    use crate::{parse, reparse};

    const STATEMENTS: &[&str] = &[
        "local x = 1",
        "local t: {string} = {}",
        "print(a.b, c:d(1))",
        "x.y = f()[1]",
        "local function f(a: number): string return tostring(a) end",
        "if a then b() elseif c then d() else e() end",
        "for i = 1, 10 do t[i] = i end",
        "local record R x: number end",
        "local enum E \"a\" \"b\" end",
        "return a .. b",
        "local s = 'str'",
        "while x < 10 do x = x + 1 end",
    ];

    const INSERTS: &[&str] = &[
        "", "x", ".", ":", "(", ")", "end", "local ", "\n", "1", "function f() ", "'", "--",
        "=", ",", "{", "}", "<", ">", "record ", " ",
    ];

    fn source() -> impl Strategy<Value = String> {
        prop::collection::vec(prop::sample::select(STATEMENTS), 1..6)
            .prop_map(|stmts| stmts.join("\n"))
    }

    fn edits() -> impl Strategy<Value = Vec<(prop::sample::Index, usize, &'static str)>> {
        prop::collection::vec(
            (any::<prop::sample::Index>(), 0usize..6, prop::sample::select(INSERTS)),
            1..4,
        )
    }

    proptest! {
        #[test]
        fn reparse_after_each_edit_matches_full_parse(base in source(), steps in edits()) {
            let mut text = base;
            let mut tree = parse(&text);
            for (at, delete, insert) in steps {
                let start = at.index(text.len() + 1);
                let end = (start + delete).min(text.len());
                text = edit(&mut tree, &text, start, end, insert);
                let (next, _) = reparse(&text, &tree);
                tree = next;
                prop_assert_eq!(dump(&tree), dump(&parse(&text)));
                prop_assert_eq!(tree.text(), text.as_str());
            }
        }

        #[test]
        fn reparse_after_batched_edits_matches_full_parse(base in source(), steps in edits()) {
            let mut text = base;
            let mut tree = parse(&text);
            for (at, delete, insert) in steps {
                let start = at.index(text.len() + 1);
                let end = (start + delete).min(text.len());
                text = edit(&mut tree, &text, start, end, insert);
            }
            let (next, _) = reparse(&text, &tree);
            prop_assert_eq!(dump(&next), dump(&parse(&text)));
            let fresh = parse(&text);
            let leaves: Vec<_> = next.leaves().map(|leaf| leaf.text()).collect();
            let expected: Vec<_> = fresh.leaves().map(|leaf| leaf.text()).collect();
            prop_assert_eq!(leaves, expected);
        }
    }
}
