//! Definite-assignment filtering inside constructor bodies.
//!
//! The running example: `C() { f(); this.x = 1; g(); }` with fields `x` and
//! `y`, where `y` is never assigned.

use rigel_complete::{CompletionConfig, CompletionSession};
use rigel_core::CancellationToken;
use rigel_semantics::{ConstructorFlow, CtorStatement, CursorContext};
use rigel_test_utils::{ModelBuilder, TestDb};

fn model() -> TestDb {
    let mut model = ModelBuilder::new();
    model.class("com.example.C", &[]);
    model.field("com.example.C", "x", "int");
    model.field("com.example.C", "y", "int");
    model.build()
}

fn surfaced(db: &TestDb, flow: ConstructorFlow) -> Vec<String> {
    let cx = CursorContext {
        containing_class: Some("com.example.C".into()),
        constructor_flow: Some(flow),
        ..CursorContext::default()
    };
    CompletionSession::new(db, cx, CompletionConfig::default(), CancellationToken::new())
        .generate()
        .unwrap()
        .into_iter()
        .map(|s| s.candidate.primary_string().to_string())
        .collect()
}

#[test]
fn unassigned_fields_are_excluded_early_in_the_body() {
    let db = model();
    // Inside `f()`: nothing assigned yet.
    let names = surfaced(
        &db,
        ConstructorFlow {
            before_cursor: vec![CtorStatement::Other],
            assignment_target: None,
        },
    );
    assert!(!names.contains(&"x".to_string()), "{names:?}");
    assert!(!names.contains(&"y".to_string()), "{names:?}");
}

#[test]
fn assigned_fields_become_visible_after_their_assignment() {
    let db = model();
    // Inside `g()`, after `this.x = 1`.
    let names = surfaced(
        &db,
        ConstructorFlow {
            before_cursor: vec![
                CtorStatement::Other,
                CtorStatement::AssignField("x".into()),
            ],
            assignment_target: None,
        },
    );
    assert!(names.contains(&"x".to_string()), "{names:?}");
    assert!(!names.contains(&"y".to_string()), "{names:?}");
}

#[test]
fn the_assignment_target_is_offered_at_its_own_write() {
    let db = model();
    // Completing the left-hand side of `this.x = …`.
    let names = surfaced(
        &db,
        ConstructorFlow {
            before_cursor: Vec::new(),
            assignment_target: Some("x".into()),
        },
    );
    assert!(names.contains(&"x".to_string()), "{names:?}");
    assert!(!names.contains(&"y".to_string()), "{names:?}");
}

#[test]
fn a_delegating_constructor_call_clears_the_pending_set() {
    let db = model();
    let names = surfaced(
        &db,
        ConstructorFlow {
            before_cursor: vec![CtorStatement::DelegateCall],
            assignment_target: None,
        },
    );
    assert!(names.contains(&"x".to_string()), "{names:?}");
    assert!(names.contains(&"y".to_string()), "{names:?}");
}

#[test]
fn fields_of_other_classes_are_untouched_by_the_filter() {
    let mut model = ModelBuilder::new();
    model.class("com.example.C", &[]);
    model.class("com.example.Other", &[]);
    model.field("com.example.Other", "shared", "int");
    let db = model.build();

    let names = surfaced(
        &db,
        ConstructorFlow {
            before_cursor: Vec::new(),
            assignment_target: None,
        },
    );
    assert!(names.contains(&"shared".to_string()), "{names:?}");
}
