//! Cross-cutting pipeline guarantees.

use rigel_complete::{CompletionConfig, CompletionSession};
use rigel_core::{Cancelled, CancellationToken};
use rigel_semantics::{CursorContext, SemanticDb, Visibility};
use rigel_test_utils::ModelBuilder;

#[test]
fn every_surfaced_candidate_is_accessible() {
    rigel_test_utils::init_tracing();
    let mut model = ModelBuilder::new();
    model.class("com.example.Service", &[]);
    model.field("com.example.Service", "visible", "int");
    let hidden = model.field("com.example.Service", "hidden", "int");
    model.set_visibility(hidden, Visibility::Private);
    let pkg = model.field("com.example.Service", "local", "int");
    model.set_visibility(pkg, Visibility::Package);
    let db = model.build();

    let cx = CursorContext {
        package: Some("com.other".into()),
        containing_class: Some("com.other.Client".into()),
        ..CursorContext::default()
    };
    let session = CompletionSession::new(
        &db,
        cx.clone(),
        CompletionConfig::default(),
        CancellationToken::new(),
    );

    for scored in session.generate().unwrap() {
        if let Some(id) = scored.candidate.symbol_id() {
            assert!(
                db.is_accessible(id, &cx),
                "inaccessible candidate surfaced: {}",
                scored.candidate.primary_string()
            );
        }
    }
}

#[test]
fn anonymous_subclass_context_relaxes_protected_members() {
    let mut model = ModelBuilder::new();
    model.class("com.lib.Base", &[]);
    let hook = model.method("com.lib.Base", "onEvent", "void", &[]);
    model.set_visibility(hook, Visibility::Protected);
    let db = model.build();

    let base = CursorContext {
        package: Some("com.app".into()),
        containing_class: Some("com.app.Main".into()),
        ..CursorContext::default()
    };

    let plain = CompletionSession::new(
        &db,
        base.clone(),
        CompletionConfig::default(),
        CancellationToken::new(),
    );
    let plain_names: Vec<_> = plain
        .generate()
        .unwrap()
        .into_iter()
        .map(|s| s.candidate.primary_string().to_string())
        .collect();
    assert!(!plain_names.contains(&"onEvent".to_string()), "{plain_names:?}");

    let anon = CursorContext {
        anonymous_subclass_of: Some("com.lib.Base".into()),
        ..base
    };
    let relaxed = CompletionSession::new(
        &db,
        anon,
        CompletionConfig::default(),
        CancellationToken::new(),
    );
    let relaxed_names: Vec<_> = relaxed
        .generate()
        .unwrap()
        .into_iter()
        .map(|s| s.candidate.primary_string().to_string())
        .collect();
    assert!(
        relaxed_names.contains(&"onEvent".to_string()),
        "{relaxed_names:?}"
    );
}

#[test]
fn cancellation_mid_session_discards_everything() {
    let mut model = ModelBuilder::new();
    for i in 0..100 {
        model.local(&format!("var{i}"), "int");
    }
    let db = model.build();

    let cancel = CancellationToken::new();
    let session = CompletionSession::new(
        &db,
        CursorContext::default(),
        CompletionConfig::default(),
        cancel.clone(),
    );
    cancel.cancel();
    assert_eq!(session.generate(), Err(Cancelled));
}

#[test]
fn expected_types_are_cached_across_pipeline_stages() {
    let mut model = ModelBuilder::new();
    model.jdk_collections();
    model.local("arr", "java.lang.String[]");
    model.expect(rigel_semantics::ExpectedType::new(
        rigel_semantics::Ty::generic("java.util.List", vec![rigel_semantics::Ty::string()]),
        rigel_semantics::ExpectedKind::Subtype,
        rigel_semantics::TailKind::Semicolon,
    ));
    let db = model.build();

    let session = CompletionSession::new(
        &db,
        CursorContext::default().smart(),
        CompletionConfig::default(),
        CancellationToken::new(),
    );
    // Filters, synthesis, and weighing all consult expected types; the
    // collaborator must still be hit exactly once.
    let _ = session.generate().unwrap();
    assert_eq!(db.expected_queries(), 1);
}
