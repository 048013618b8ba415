#![allow(dead_code)]

use std::collections::BTreeMap;

use refgraph::replay::{Fixture, FixtureItem, FixtureReference, FixtureTarget};
use refgraph::types::*;

pub const SOURCE_ID: &str = "widget_draw";
pub const MAIN_CPP: &str = "/proj/src/main.cpp";
pub const CANVAS_CPP: &str = "/proj/src/canvas.cpp";
pub const SCENE_CPP: &str = "/proj/src/scene.cpp";

/// The symbol every fixture searches for.
pub fn source() -> SourceSymbol {
    SourceSymbol::new(SOURCE_ID, "Draw", "Widget::Draw")
}

pub fn element(name: &str, long_name: &str, kind: EntityKind, file: &str, line: u32) -> CursorElement {
    CursorElement {
        name: name.to_string(),
        long_name: long_name.to_string(),
        kind,
        file_path: file.to_string(),
        line,
    }
}

pub fn entity(id: &str, name: &str, long_name: &str, kind: EntityKind, file: &str, line: u32) -> Entity {
    Entity {
        id: id.to_string(),
        name: name.to_string(),
        long_name: long_name.to_string(),
        kind,
        file_path: file.to_string(),
        line,
    }
}

/// A navigable reference that lands inside `element`.
pub fn reference(text: &str, category: u16, element: CursorElement) -> FixtureReference {
    FixtureReference {
        text: text.to_string(),
        category,
        target: Some(FixtureTarget {
            path: element.file_path.clone(),
            line: element.line,
            column: 5,
            element: Some(element),
        }),
        ..FixtureReference::default()
    }
}

pub fn item(text: &str, references: Vec<FixtureReference>) -> FixtureItem {
    FixtureItem {
        text: text.to_string(),
        category: 0,
        references,
        ..FixtureItem::default()
    }
}

pub fn canvas_reference() -> FixtureReference {
    reference(
        "canvas.cpp(12): widget.Draw();",
        1,
        element("Render", "Canvas::Render", EntityKind::Method, CANVAS_CPP, 12),
    )
}

pub fn scene_reference() -> FixtureReference {
    reference(
        "scene.cpp(40): child->Draw();",
        1,
        element("Paint", "Scene::Paint", EntityKind::Method, SCENE_CPP, 40),
    )
}

pub fn catalog() -> Vec<Entity> {
    vec![
        entity(SOURCE_ID, "Draw", "Widget::Draw", EntityKind::Method, "src/widget.cpp", 20),
        entity("canvas_render", "Render", "Canvas::Render", EntityKind::Method, "src/canvas.cpp", 10),
        entity("scene_paint", "Paint", "Scene::Paint", EntityKind::Method, "src/scene.cpp", 38),
    ]
}

/// One item with two linkable references, the user parked in `main.cpp`
/// with the source symbol selected.
pub fn widget_fixture() -> Fixture {
    let mut searches = BTreeMap::new();
    searches.insert(
        "Widget::Draw".to_string(),
        vec![item(
            "Widget::Draw(Canvas &) (2 references)",
            vec![canvas_reference(), scene_reference()],
        )],
    );
    Fixture {
        source: source(),
        searches,
        entities: catalog(),
        nodes: vec![SOURCE_ID.to_string()],
        selected: Some(SOURCE_ID.to_string()),
        active: Some(DocumentPosition {
            path: MAIN_CPP.to_string(),
            line: 7,
            column: 3,
        }),
        ..Fixture::default()
    }
}

/// `widget_fixture` with the items for the qualified name replaced.
pub fn fixture_with_items(items: Vec<FixtureItem>) -> Fixture {
    let mut fixture = widget_fixture();
    fixture.searches.insert("Widget::Draw".to_string(), items);
    fixture
}
