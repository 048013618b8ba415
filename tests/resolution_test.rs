mod common;

use std::fs;

use common::*;
use refgraph::host::EntityDatabase;
use refgraph::resolution::EntityCatalog;
use refgraph::types::*;
use refgraph::RefGraphError;
use tempfile::TempDir;

fn precise(name: &str, long_name: &str, kind: EntityKind, file: &str, line: u32) -> EntitySearchRequest {
    EntitySearchRequest::for_element(&element(name, long_name, kind, file, line))
}

#[test]
fn test_exact_name_match() {
    let catalog = EntityCatalog::new(catalog());
    let found = catalog
        .search(&precise("Paint", "Scene::Paint", EntityKind::Method, SCENE_CPP, 40))
        .unwrap();
    assert_eq!(found.id, "scene_paint");
    assert_eq!(catalog.lookup_count(), 1);
}

#[test]
fn test_name_is_case_sensitive() {
    let catalog = EntityCatalog::new(catalog());
    let request = precise("paint", "Scene::Paint", EntityKind::Method, SCENE_CPP, 40);
    assert!(catalog.search(&request).is_none());
}

#[test]
fn test_case_insensitive_request() {
    let catalog = EntityCatalog::new(catalog());
    let request = EntitySearchRequest {
        name: "paint".to_string(),
        name_flags: MatchFlags::MATCH_WORD,
        long_name: String::new(),
        long_name_flags: MatchFlags::NONE,
        kind: EntityKind::Unknown,
        file_path: String::new(),
        line: 0,
    };
    assert_eq!(catalog.search(&request).unwrap().id, "scene_paint");
}

#[test]
fn test_substring_name_without_whole_word() {
    let catalog = EntityCatalog::new(catalog());
    let request = EntitySearchRequest {
        name: "Rend".to_string(),
        name_flags: MatchFlags::MATCH_CASE,
        long_name: String::new(),
        long_name_flags: MatchFlags::NONE,
        kind: EntityKind::Unknown,
        file_path: String::new(),
        line: 0,
    };
    assert_eq!(catalog.search(&request).unwrap().id, "canvas_render");
}

#[test]
fn test_qualified_name_filters_candidates() {
    let catalog = EntityCatalog::new(catalog());
    let request = precise("Paint", "Canvas::Paint", EntityKind::Method, SCENE_CPP, 40);
    assert!(catalog.search(&request).is_none());
    assert_eq!(catalog.search(&request.widened()).unwrap().id, "scene_paint");
}

#[test]
fn test_compatible_kind_preferred() {
    let catalog = EntityCatalog::new(vec![
        entity("draw_var", "Draw", "", EntityKind::Variable, "src/other.cpp", 1),
        entity("draw_fn", "Draw", "", EntityKind::Function, "src/other.cpp", 1),
    ]);
    let request = precise("Draw", "", EntityKind::Method, "/proj/src/unrelated.cpp", 1);
    assert_eq!(catalog.search(&request).unwrap().id, "draw_fn");
}

#[test]
fn test_ties_keep_first_inserted() {
    let catalog = EntityCatalog::new(vec![
        entity("first", "Draw", "", EntityKind::Method, "src/a.cpp", 1),
        entity("second", "Draw", "", EntityKind::Method, "src/b.cpp", 1),
    ]);
    let request = precise("Draw", "", EntityKind::Method, "/proj/src/c.cpp", 1);
    assert_eq!(catalog.search(&request).unwrap().id, "first");
}

#[test]
fn test_insert_and_get() {
    let mut catalog = EntityCatalog::default();
    assert!(catalog.is_empty());
    catalog.insert(entity("e1", "Layout", "Panel::Layout", EntityKind::Method, "src/panel.cpp", 5));
    assert_eq!(catalog.len(), 1);
    assert_eq!(catalog.get("e1").unwrap().name, "Layout");
    assert!(catalog.get("e2").is_none());
}

#[test]
fn test_load_catalog_from_json() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("entities.json");
    fs::write(
        &path,
        r#"[
            { "id": "a", "name": "Draw", "long_name": "Widget::Draw", "kind": "method", "file_path": "src/widget.cpp", "line": 20 },
            { "id": "b", "name": "Widget" }
        ]"#,
    )
    .unwrap();

    let catalog = EntityCatalog::load(&path).unwrap();
    assert_eq!(catalog.len(), 2);
    assert_eq!(catalog.get("a").unwrap().kind, EntityKind::Method);
    assert_eq!(catalog.get("b").unwrap().kind, EntityKind::Unknown);
}

#[test]
fn test_load_catalog_rejects_bad_json() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("entities.json");
    fs::write(&path, "{}").unwrap();

    let err = EntityCatalog::load(&path).unwrap_err();
    assert!(matches!(err, RefGraphError::Fixture { .. }));
}
