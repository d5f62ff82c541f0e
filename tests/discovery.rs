mod common;

use std::fs;

use tempfile::TempDir;

use bundlefan::entry_map::EntryMapBuilder;
use bundlefan::error::Error;

use common::add_project;

#[test]
fn discovery_yields_one_entry_per_project() {
    let tmp = TempDir::new().unwrap();
    add_project(tmp.path(), "alpha");
    add_project(tmp.path(), "beta");
    add_project(tmp.path(), "team/gamma");

    let builder = EntryMapBuilder::new(tmp.path()).unwrap();
    let report = builder.discover().unwrap();

    assert_eq!(report.map.len(), 3);
    assert!(report.failures.is_empty());

    let outputs: Vec<_> = report.map.iter().map(|(output, _)| output).collect();
    assert!(outputs.iter().any(|o| o.ends_with("alpha/dist/alpha.js")));
    assert!(outputs.iter().any(|o| o.ends_with("beta/dist/beta.js")));
    assert!(outputs.iter().any(|o| o.ends_with("team/gamma/dist/gamma.js")));
}

#[test]
fn discovery_ignores_files_not_named_by_convention() {
    let tmp = TempDir::new().unwrap();
    let alpha = add_project(tmp.path(), "alpha");
    fs::write(alpha.join("helper.js"), "x").unwrap();
    fs::create_dir_all(tmp.path().join("assets")).unwrap();
    fs::write(tmp.path().join("assets/logo.svg"), "<svg/>").unwrap();

    let builder = EntryMapBuilder::new(tmp.path()).unwrap();
    let report = builder.discover().unwrap();

    assert_eq!(report.map.len(), 1);
}

#[test]
fn discovery_skips_entry_file_at_source_root() {
    let tmp = TempDir::new().unwrap();
    add_project(tmp.path(), "alpha");
    fs::write(tmp.path().join("app.js"), "stray").unwrap();

    let builder = EntryMapBuilder::new(tmp.path()).unwrap();
    let report = builder.discover().unwrap();

    assert_eq!(report.map.len(), 1);
    assert_eq!(report.failures.len(), 1);
    assert!(matches!(
        report.failures[0].error,
        Error::OutsideProjectRoot { .. }
    ));
}

#[test]
fn explicit_mode_continues_past_a_missing_identifier() {
    let tmp = TempDir::new().unwrap();
    add_project(tmp.path(), "alpha");
    add_project(tmp.path(), "beta");

    let builder = EntryMapBuilder::new(tmp.path()).unwrap();
    let selectors = vec![
        "alpha".to_string(),
        "missing".to_string(),
        "beta".to_string(),
    ];
    let report = builder.from_selectors(&selectors).unwrap();

    assert_eq!(report.map.len(), 2);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].identifier, "missing");
    assert!(matches!(report.failures[0].error, Error::NotFound { .. }));
}

#[test]
fn explicit_mode_resolves_nested_identifiers() {
    let tmp = TempDir::new().unwrap();
    add_project(tmp.path(), "team/gamma");

    let builder = EntryMapBuilder::new(tmp.path()).unwrap();
    let report = builder
        .from_selectors(&["team/gamma".to_string()])
        .unwrap();

    assert_eq!(report.map.len(), 1);
    let (output, source) = report.map.iter().next().unwrap();
    assert!(output.ends_with("team/gamma/dist/gamma.js"));
    assert!(source.ends_with("team/gamma/app.js"));
}

#[test]
fn explicit_mode_rejects_identifiers_escaping_the_root() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().join("projects");
    add_project(&root, "alpha");
    add_project(tmp.path(), "outsider");

    let builder = EntryMapBuilder::new(&root).unwrap();
    let report = builder
        .from_selectors(&["../outsider".to_string()])
        .unwrap();

    assert!(report.map.is_empty());
    assert_eq!(report.failures.len(), 1);
    assert!(matches!(
        report.failures[0].error,
        Error::OutsideProjectRoot { .. }
    ));
}

#[test]
fn explicit_mode_reports_a_project_without_an_entry_file() {
    let tmp = TempDir::new().unwrap();
    fs::create_dir_all(tmp.path().join("empty")).unwrap();

    let builder = EntryMapBuilder::new(tmp.path()).unwrap();
    let report = builder.from_selectors(&["empty".to_string()]).unwrap();

    assert!(report.map.is_empty());
    assert_eq!(report.failures.len(), 1);
    match &report.failures[0].error {
        Error::NotFound { path } => assert!(path.ends_with("empty/app.js")),
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[test]
fn duplicate_selectors_fail_map_construction() {
    let tmp = TempDir::new().unwrap();
    add_project(tmp.path(), "alpha");

    let builder = EntryMapBuilder::new(tmp.path()).unwrap();
    let result = builder.from_selectors(&["alpha".to_string(), "alpha".to_string()]);

    assert!(matches!(result, Err(Error::OutputCollision { .. })));
}

#[test]
fn missing_source_root_is_not_found() {
    let tmp = TempDir::new().unwrap();
    let missing = tmp.path().join("no-projects-here");

    assert!(matches!(
        EntryMapBuilder::new(&missing),
        Err(Error::NotFound { path }) if path == missing
    ));
}
