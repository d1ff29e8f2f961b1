//! Compound candidates emerging from a full session run.

use rigel_complete::{CompletionConfig, CompletionSession};
use rigel_core::CancellationToken;
use rigel_semantics::{
    well_known, CursorContext, ExpectedKind, ExpectedType, TailKind, Ty, Visibility,
};
use rigel_test_utils::ModelBuilder;

fn generate(db: &rigel_test_utils::TestDb, cx: CursorContext) -> Vec<String> {
    CompletionSession::new(db, cx, CompletionConfig::default(), CancellationToken::new())
        .generate()
        .unwrap()
        .into_iter()
        .map(|s| s.candidate.primary_string().to_string())
        .collect()
}

#[test]
fn string_array_offers_as_list_when_a_list_is_expected() {
    let mut model = ModelBuilder::new();
    model.jdk_collections();
    model.local("arr", "java.lang.String[]");
    model.expect(ExpectedType::new(
        Ty::generic(well_known::LIST, vec![Ty::string()]),
        ExpectedKind::Subtype,
        TailKind::Semicolon,
    ));
    let db = model.build();

    let names = generate(&db, CursorContext::default().smart());
    assert!(
        names.contains(&"Arrays.asList(arr)".to_string()),
        "{names:?}"
    );
    // The synthesized candidate outranks the raw, mismatching array.
    let pos = |name: &str| names.iter().position(|n| n == name).unwrap();
    assert!(pos("Arrays.asList(arr)") < pos("arr"), "{names:?}");
}

#[test]
fn synthesized_chains_to_inaccessible_members_are_dropped() {
    let mut model = ModelBuilder::new();
    model.class("com.example.Holder", &[]);
    let secret = model.method("com.example.Holder", "secret", "int", &[]);
    model.set_visibility(secret, Visibility::Private);
    model.out_of_scope(secret);
    model.local("holder", "com.example.Holder");
    model.expect(ExpectedType::new(
        Ty::int(),
        ExpectedKind::Subtype,
        TailKind::Semicolon,
    ));
    let db = model.build();

    let cx = CursorContext {
        containing_class: Some("com.example.Elsewhere".into()),
        ..CursorContext::default()
    }
    .smart();
    let names = generate(&db, cx);
    assert!(
        !names.iter().any(|n| n.contains("secret")),
        "private member must not survive the re-filter: {names:?}"
    );
}

#[test]
fn accessible_chains_survive_the_re_filter() {
    let mut model = ModelBuilder::new();
    model.class("com.example.Holder", &[]);
    let value = model.method("com.example.Holder", "value", "int", &[]);
    model.out_of_scope(value);
    model.local("holder", "com.example.Holder");
    model.expect(ExpectedType::new(
        Ty::int(),
        ExpectedKind::Subtype,
        TailKind::Semicolon,
    ));
    let db = model.build();

    let names = generate(&db, CursorContext::default().smart());
    assert!(names.contains(&"holder.value".to_string()), "{names:?}");
}

#[test]
fn conversion_catalogue_never_chains_through_itself() {
    let mut model = ModelBuilder::new();
    model.jdk_collections();
    model.local("arr", "java.lang.String[]");
    // Both directions expected at once: an array-to-list conversion result
    // must not feed the list-to-array conversion, or vice versa.
    model.expect(ExpectedType::new(
        Ty::generic(well_known::LIST, vec![Ty::string()]),
        ExpectedKind::Subtype,
        TailKind::Semicolon,
    ));
    model.expect(ExpectedType::new(
        Ty::array(Ty::string()),
        ExpectedKind::Subtype,
        TailKind::Semicolon,
    ));
    let db = model.build();

    let names = generate(&db, CursorContext::default().smart());
    assert!(
        names.contains(&"Arrays.asList(arr)".to_string()),
        "{names:?}"
    );
    assert!(
        !names.iter().any(|n| n.contains("asList(arr).toArray")),
        "conversions must be one-shot: {names:?}"
    );
}

#[test]
fn excluded_packages_never_surface() {
    let mut model = ModelBuilder::new();
    model.class("com.sun.misc.Unsafe", &[]);
    model.class("com.example.Safe", &[]);
    let db = model.build();

    let config = CompletionConfig {
        excluded_packages: vec!["com.sun".to_string()],
        ..CompletionConfig::default()
    };
    let names: Vec<String> = CompletionSession::new(
        &db,
        CursorContext::default(),
        config,
        CancellationToken::new(),
    )
    .generate()
    .unwrap()
    .into_iter()
    .map(|s| s.candidate.primary_string().to_string())
    .collect();

    assert!(names.contains(&"Safe".to_string()), "{names:?}");
    assert!(!names.contains(&"Unsafe".to_string()), "{names:?}");
}

#[test]
fn empty_expected_set_accepts_everything() {
    let mut model = ModelBuilder::new();
    model.local("anything", "com.example.Whatever");
    model.local("number", "int");
    let db = model.build();

    let names = generate(&db, CursorContext::default().smart());
    assert_eq!(names.len(), 2, "{names:?}");
}
