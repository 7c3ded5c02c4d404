//! Caret highlight tests
//!
//! Moving the caret highlights the outline items enclosing it, from the
//! innermost declaration up to the namespace.

mod common;

use codenav::config::OutlineConfig;
use codenav::model::Position;
use codenav::OutlineEngine;
use common::{settled_engine, CACHE_CS, SCHEDULER_JAVA};

/// Position of the first occurrence of `needle` in `source`
fn position_of(source: &str, needle: &str) -> Position {
    for (line, text) in source.lines().enumerate() {
        if let Some(byte) = text.find(needle) {
            return Position::new(line, text[..byte].chars().count());
        }
    }
    panic!("{:?} not found", needle);
}

// ========================================================================
// Chain Tests
// ========================================================================

#[test]
fn test_caret_in_method_highlights_ancestor_chain() {
    let mut engine = settled_engine("Cache.cs", CACHE_CS);
    engine
        .caret_moved(position_of(CACHE_CS, "_values[key]"))
        .unwrap();

    assert_eq!(
        engine.highlighted().unwrap(),
        [
            "Demo.App.Cache.Get(string)",
            "Demo.App.Cache",
            "Demo.App"
        ]
    );
    assert_eq!(
        engine.document().unwrap().highlighted(),
        vec!["Demo.App", "Demo.App.Cache", "Demo.App.Cache.Get(string)"]
    );
}

#[test]
fn test_highlighted_containers_get_highlight_border() {
    let mut engine = settled_engine("Cache.cs", CACHE_CS);
    engine
        .caret_moved(position_of(CACHE_CS, "_values[key]"))
        .unwrap();

    let palette = engine.model().unwrap().palette.clone();
    let doc = engine.document().unwrap();

    let cache = doc.find("Demo.App.Cache").unwrap();
    assert!(cache.core().visual.highlighted);
    assert_eq!(cache.core().visual.foreground, palette.highlight_foreground);
    assert_eq!(
        cache.container().unwrap().border,
        palette.highlight_border
    );

    let contains = doc.find("Demo.App.Cache.Contains(string)").unwrap();
    assert!(!contains.core().visual.highlighted);
    assert_eq!(contains.core().visual.foreground, palette.foreground);
}

#[test]
fn test_moving_caret_replaces_previous_chain() {
    let mut engine = settled_engine("Cache.cs", CACHE_CS);
    engine
        .caret_moved(position_of(CACHE_CS, "_values[key]"))
        .unwrap();
    engine
        .caret_moved(position_of(CACHE_CS, "Fast, Safe"))
        .unwrap();

    assert_eq!(
        engine.document().unwrap().highlighted(),
        vec!["Demo.App", "Demo.App.Mode", "Demo.App.Mode.Fast"]
    );
}

#[test]
fn test_caret_outside_declarations_clears_highlight() {
    let mut engine = settled_engine("Cache.cs", CACHE_CS);
    engine
        .caret_moved(position_of(CACHE_CS, "_values[key]"))
        .unwrap();
    engine.caret_moved(Position::new(0, 0)).unwrap();

    assert!(engine.highlighted().unwrap().is_empty());
    assert!(engine.document().unwrap().highlighted().is_empty());
}

#[test]
fn test_same_chain_does_not_redraw() {
    let mut engine = settled_engine("Cache.cs", CACHE_CS);
    let get = position_of(CACHE_CS, "_values[key]");
    engine.caret_moved(get).unwrap();
    assert!(engine.take_redraw());

    engine
        .caret_moved(Position::new(get.line, get.column + 2))
        .unwrap();
    assert!(!engine.take_redraw());
}

// ========================================================================
// Lifecycle Tests
// ========================================================================

#[test]
fn test_caret_before_first_build_is_ignored() {
    let mut engine = OutlineEngine::new(OutlineConfig::default()).unwrap();
    engine.activate("Cache.cs", CACHE_CS).unwrap();
    engine.caret_moved(Position::new(20, 8)).unwrap();

    assert!(engine.highlighted().unwrap().is_empty());
}

#[test]
fn test_highlight_survives_republish() {
    let mut engine = settled_engine("Cache.cs", CACHE_CS);
    engine
        .caret_moved(position_of(CACHE_CS, "_values[key]"))
        .unwrap();

    let edited = CACHE_CS.replace("public enum Mode { Fast, Safe }", "");
    engine.edit(edited).unwrap();
    engine.settle().unwrap();

    let doc = engine.document().unwrap();
    assert!(doc.find("Demo.App.Mode").is_none());
    assert_eq!(
        doc.highlighted(),
        vec!["Demo.App", "Demo.App.Cache", "Demo.App.Cache.Get(string)"]
    );
}

#[test]
fn test_activation_clears_highlight() {
    let mut engine = settled_engine("Cache.cs", CACHE_CS);
    engine
        .caret_moved(position_of(CACHE_CS, "_values[key]"))
        .unwrap();

    engine.activate("Scheduler.java", SCHEDULER_JAVA).unwrap();
    engine.settle().unwrap();
    assert!(engine.highlighted().unwrap().is_empty());

    // Back to the cached outline: nothing carried over
    engine.activate("Cache.cs", CACHE_CS).unwrap();
    assert!(engine.document().unwrap().highlighted().is_empty());
}

#[test]
fn test_java_caret_chain_uses_package() {
    let mut engine = settled_engine("Scheduler.java", SCHEDULER_JAVA);
    engine
        .caret_moved(position_of(SCHEDULER_JAVA, "queue.clear()"))
        .unwrap();

    assert_eq!(
        engine.highlighted().unwrap(),
        ["demo.jobs.Scheduler.run()", "demo.jobs.Scheduler"]
    );
}

#[test]
fn test_caret_past_end_of_text_is_clamped() {
    let mut engine = settled_engine("Cache.cs", CACHE_CS);
    engine
        .caret_moved(position_of(CACHE_CS, "_values[key]"))
        .unwrap();

    // Past the last line: end of text, outside every declaration
    engine.caret_moved(Position::new(10_000, 0)).unwrap();
    assert!(engine.highlighted().unwrap().is_empty());

    // Past the end of the constructor's line: still inside the class
    engine.caret_moved(Position::new(19, 10_000)).unwrap();
    assert_eq!(
        engine.highlighted().unwrap(),
        ["Demo.App.Cache", "Demo.App"]
    );
}

#[test]
fn test_caret_past_end_of_line_stays_on_that_line() {
    let source = "class Outer {\nclass Inner { }\n}\n";
    let mut engine = settled_engine("Outer.cs", source);

    engine.caret_moved(Position::new(0, 99)).unwrap();
    assert_eq!(engine.highlighted().unwrap(), ["Outer"]);

    engine.caret_moved(Position::new(1, 3)).unwrap();
    assert_eq!(engine.highlighted().unwrap(), ["Outer.Inner", "Outer"]);
}

#[test]
fn test_caret_in_generic_overload_highlights_only_that_overload() {
    let source = "class C\n{\n    void M(int x) { }\n    void M<T>(int x) { }\n}\n";
    let mut engine = settled_engine("C.cs", source);

    engine.caret_moved(Position::new(2, 20)).unwrap();
    assert_eq!(engine.highlighted().unwrap(), ["C.M(int)", "C"]);
    assert_eq!(
        engine.document().unwrap().highlighted(),
        vec!["C", "C.M(int)"]
    );

    engine.caret_moved(Position::new(3, 23)).unwrap();
    assert_eq!(
        engine.document().unwrap().highlighted(),
        vec!["C", "C.M<T>(int)"]
    );
}
