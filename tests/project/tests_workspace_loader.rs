//! Loading a workspace from disk.

use std::fs;

use blueprint::hir::codes;
use blueprint::ide::AnalysisHost;
use blueprint::project::{LoadError, WorkspaceLoader, path_to_uri};

fn write(dir: &std::path::Path, relative: &str, text: &str) {
    let path = dir.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, text).unwrap();
}

#[test]
fn test_load_storage_auth_payments() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "storage.bp", "@module storage\n");
    write(dir.path(), "services/auth.bp", "@module auth\n  @depends-on storage\n");
    write(
        dir.path(),
        "services/payments.bp",
        "@module payments\n  @depends-on auth, storage\n",
    );
    write(dir.path(), "README.md", "# not blueprint\n");

    let mut host = AnalysisHost::new();
    let loaded = WorkspaceLoader::new()
        .load_directory_into_host(dir.path(), &mut host)
        .unwrap();
    assert_eq!(loaded, 3);

    let graph = host.dependency_graph();
    assert_eq!(graph.edges.len(), 3);
    assert!(graph.is_acyclic);
    assert_eq!(graph.order_of("storage"), Some(0));
}

#[test]
fn test_open_document_sees_loaded_workspace() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "storage.bp", "@module storage\n");

    let mut host = AnalysisHost::new();
    WorkspaceLoader::new()
        .load_directory_into_host(dir.path(), &mut host)
        .unwrap();

    let auth = dir.path().join("auth.bp");
    let uri = path_to_uri(&auth);
    let publishes = host.open_document(&uri, 1, "@module auth\n  @depends-on storage, cache\n");
    let unresolved: Vec<_> = publishes[0]
        .diagnostics
        .iter()
        .filter(|d| d.has_code(codes::UNRESOLVED_REFERENCE))
        .collect();
    assert_eq!(unresolved.len(), 1);
    assert!(unresolved[0].message.contains("cache"));
}

#[test]
fn test_load_single_file() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "one.bp", "@module one\n");
    let mut host = AnalysisHost::new();
    WorkspaceLoader::new()
        .load_file_into_host(dir.path().join("one.bp"), &mut host)
        .unwrap();
    assert!(host.symbol_index().get_symbol("one").is_some());
    assert!(host.has_workspace_file(&path_to_uri(&dir.path().join("one.bp"))));
}

#[test]
fn test_load_file_that_is_not_there() {
    let dir = tempfile::tempdir().unwrap();
    let err = WorkspaceLoader::new()
        .load_file_into_host(dir.path().join("missing.bp"), &mut AnalysisHost::new())
        .unwrap_err();
    assert!(matches!(err, LoadError::Io { .. }));
    assert!(err.to_string().contains("missing.bp"));
}
