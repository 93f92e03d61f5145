//! Refreshes driven end to end against a stand-in `tl` script, with the
//! editor side recorded.

#![allow(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::sync::{Arc, Mutex};

use pretty_assertions::assert_eq;
use tl_lsp::config::{Settings, CONFIG_FILE};
use tl_lsp::refresh::Refresh;
use tl_lsp::server::{Analyzer, Editor};
use tl_lsp::session::{Session, Workspace};
use tower_lsp::lsp_types::{Diagnostic, MessageType, TextDocumentContentChangeEvent, Url};

/// Reports an error in the document and one in `lib.tl`, or crashes when the
/// document mentions `crash`.
const FAKE_TL: &str = r#"#!/bin/sh
case "$1" in
  check)
    if grep -q crash "$2"; then
      printf 'tl: internal error\nstack traceback:\n\t[C]: in ?\n' >&2
    else
      printf '2 errors:\n%s:1:7: unknown variable\nlib.tl:3:1: bad record\n' "$2" >&2
    fi
    ;;
  types)
    printf '{"by_pos":{},"types":{},"symbols":[],"globals":{}}'
    ;;
esac
"#;

#[derive(Debug, PartialEq)]
enum Event {
    Published(Url, usize),
    Message(MessageType, String),
}

#[derive(Clone, Default)]
struct Recorder {
    events: Arc<Mutex<Vec<Event>>>,
}

impl Recorder {
    fn take(&self) -> Vec<Event> {
        std::mem::take(&mut *self.events.lock().unwrap())
    }
}

impl Editor for Recorder {
    async fn publish(&self, uri: Url, diagnostics: Vec<Diagnostic>) {
        let event = Event::Published(uri, diagnostics.len());
        self.events.lock().unwrap().push(event);
    }

    async fn notify(&self, kind: MessageType, message: String) {
        self.events.lock().unwrap().push(Event::Message(kind, message));
    }
}

#[tokio::test]
async fn test_crash_clears_published_files() {
    let dir = tempfile::tempdir().unwrap();
    let program = dir.path().join("tl");
    fs::write(&program, FAKE_TL).unwrap();
    fs::set_permissions(&program, fs::Permissions::from_mode(0o755)).unwrap();
    let project = dir.path().join("project");
    fs::create_dir_all(&project).unwrap();
    fs::write(project.join(CONFIG_FILE), "return {}").unwrap();

    let session = Arc::new(Session::new());
    let settings = Settings {
        compiler_path: Some(program),
        ..Settings::default()
    };
    session.configure(Workspace::new(settings, Some(dir.path().to_owned())));
    let recorder = Recorder::default();
    let analyzer = Analyzer::new(recorder.clone(), Arc::clone(&session));

    let main = Url::from_file_path(project.join("main.tl")).unwrap();
    let lib = Url::from_file_path(project.join("lib.tl")).unwrap();
    session.open_document(main.clone(), "local x = y\n".to_owned());
    analyzer.refresh(main.clone()).await;

    let mut events = recorder.take();
    events.sort_by_key(|event| format!("{event:?}"));
    let mut expected = vec![
        Event::Published(main.clone(), 1),
        Event::Published(lib.clone(), 1),
    ];
    expected.sort_by_key(|event| format!("{event:?}"));
    assert_eq!(events, expected);
    assert!(session.analysis(&main).is_some());

    let crash = TextDocumentContentChangeEvent {
        range: None,
        range_length: None,
        text: "crash()\n".to_owned(),
    };
    assert!(session.apply_changes(&main, vec![crash]));
    analyzer.refresh(main.clone()).await;

    let events = recorder.take();
    assert_eq!(events.len(), 3, "{events:?}");
    assert_eq!(events[0], Event::Published(main.clone(), 0));
    assert_eq!(events[1], Event::Published(lib, 0));
    let Event::Message(kind, message) = &events[2] else {
        panic!("expected a message, got {:?}", events[2]);
    };
    assert_eq!(*kind, MessageType::ERROR);
    assert!(message.contains("stack traceback:"), "{message}");
}
