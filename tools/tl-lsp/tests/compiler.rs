//! Runs the compiler driver against a stand-in `tl` script.

#![allow(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

use pretty_assertions::assert_eq;
use tl_diagnostic::{PathMapper, Severity};
use tl_lsp::compiler::{Compiler, CompilerError, Version};
use tl_lsp::config::{working_dir, CONFIG_FILE};
use tower_lsp::lsp_types::Url;

const FAKE_TL: &str = r#"#!/bin/sh
case "$1" in
  --version) echo "Teal 0.15.3" ;;
  check)
    printf '1 warning:\n%s:1:7: unused variable x\n' "$2" >&2
    printf '1 error:\n%s:2: unexpected symbol\n' "$2" >&2
    ;;
  types)
    printf '{"by_pos":{"%s":{"1":{"7":1}}},"types":{"1":{"str":"integer","t":65538}},"symbols":[[1,7,"x",1]],"globals":{}}' "$2"
    ;;
esac
"#;

fn install(dir: &Path) -> Compiler {
    let program = dir.join("tl");
    fs::write(&program, FAKE_TL).unwrap();
    fs::set_permissions(&program, fs::Permissions::from_mode(0o755)).unwrap();
    Compiler::new(program)
}

// One test so no other thread forks while the script is being written.
#[tokio::test]
async fn test_fake_compiler() {
    let dir = tempfile::tempdir().unwrap();
    let bin = dir.path().join("bin");
    let project = dir.path().join("project");
    fs::create_dir_all(&bin).unwrap();
    fs::create_dir_all(project.join("src")).unwrap();
    fs::write(project.join(CONFIG_FILE), "return {}").unwrap();
    let compiler = install(&bin);

    assert_eq!(compiler.version().await.unwrap(), Version::new(0, 15, 3));

    let file = project.join("src/main.tl");
    let cwd = working_dir(&file, Some(dir.path()), 10);
    assert_eq!(cwd, project);

    let output = compiler.analyze("local x = 1\n", &cwd).await.unwrap();
    assert!(!Path::new(&output.main_file).exists(), "temp file is removed");

    let uri = Url::from_file_path(&file).unwrap();
    let diagnostics = output
        .diagnostics(&PathMapper::new(uri.clone(), &cwd))
        .unwrap();
    let found = diagnostics.get(&uri).unwrap();
    assert_eq!(found.len(), 2);
    assert_eq!(found[0].severity, Severity::Warning);
    assert_eq!(found[0].message, "unused variable x");
    assert_eq!(found[1].severity, Severity::Error);
    assert_eq!(found[1].range.start.row, 1);

    let report = output.report().unwrap();
    assert_eq!(report.main_file(), output.main_file);
    assert_eq!(report.type_at(1, 7).map(tl_types::TypeId::raw), Some(1));

    let missing = Compiler::new(bin.join("no-such-tl"));
    let err = missing.analyze("", &cwd).await.unwrap_err();
    assert!(matches!(err, CompilerError::NotFound { .. }));
}
