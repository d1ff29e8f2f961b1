//! The offset-tracking invariant: composite insertions keep every tracked
//! position consistent, even when auto-import edits land earlier in the
//! document mid-insertion.

use rigel_complete::{Candidate, CompletionConfig, CompletionSession};
use rigel_core::CancellationToken;
use rigel_edit::{Document, InsertionContext, InsertionEngine};
use rigel_semantics::{
    well_known, CursorContext, ExpectedKind, ExpectedType, SemanticDb, TailKind, Ty,
};
use rigel_test_utils::{Fixture, ModelBuilder, TestDb, TestImports};

fn cand(db: &TestDb, id: rigel_semantics::SymbolId) -> Candidate {
    Candidate::for_symbol(id, &db.symbol(id).unwrap())
}

#[test]
fn composite_insertion_end_lands_after_the_tail_token() {
    rigel_test_utils::init_tracing();
    let mut model = ModelBuilder::new();
    let zones = model.class("com.lib.Zones", &[]);
    let utc = model.static_field("com.lib.Zones", "UTC", "com.lib.Zone");
    let db = model.build();

    let chained = cand(&db, utc).qualified_by(cand(&db, zones));
    let expected = vec![ExpectedType::new(
        Ty::class("com.lib.Zone"),
        ExpectedKind::Subtype,
        TailKind::Semicolon,
    )];

    let fixture = Fixture::parse("zone = U<caret>");
    let mut document = Document::new(fixture.text.clone());
    let config = CompletionConfig::default();
    let imports = TestImports::new();
    let engine = InsertionEngine::new(&db, &imports, &config, &expected);
    let mut icx = InsertionContext::new(&mut document, fixture.prefix_range(), None).unwrap();
    let outcome = engine.apply(&chained, &mut icx).unwrap();

    // The qualifier triggered an import insertion near the top of the file
    // while the insertion was in flight.
    assert_eq!(
        document.text(),
        "import com.lib.Zones;\nzone = Zones.UTC;"
    );
    assert!(!outcome.fell_back);
    // Insertion end sits immediately after the tail token, import shift and
    // all.
    assert_eq!(outcome.inserted.end(), document.len());
    assert_eq!(
        document.slice(outcome.inserted),
        "Zones.UTC;"
    );
}

#[test]
fn compound_qualifiers_are_parenthesized_when_read_back_ambiguously() {
    let mut model = ModelBuilder::new();
    model.class("com.example.Shape", &[]);
    model.class("com.example.Circle", &["com.example.Shape"]);
    let radius = model.field("com.example.Circle", "radius", "int");
    let shape = model.local("shape", "com.example.Shape");
    model.narrow(shape, "com.example.Circle");
    let db = model.build();

    let qualifier = cand(&db, shape).cast_to(Ty::class("com.example.Circle"));
    let chained = cand(&db, radius).qualified_by(qualifier);

    let fixture = Fixture::parse("int r = <caret>");
    let mut document = Document::new(fixture.text.clone());
    let config = CompletionConfig::default();
    // The short name `Circle` is taken: the cast target must stay qualified,
    // exercising the rewrite path inside a nested insertion.
    let imports = TestImports::new().take_short_name("Circle");
    let engine = InsertionEngine::new(&db, &imports, &config, &[]);
    let mut icx = InsertionContext::new(&mut document, fixture.prefix_range(), None).unwrap();
    let outcome = engine.apply(&chained, &mut icx).unwrap();

    assert_eq!(
        document.text(),
        "int r = ((com.example.Circle) shape).radius"
    );
    assert_eq!(outcome.caret, document.len());
}

#[test]
fn long_qualifier_chains_keep_the_end_marker_exact() {
    let mut model = ModelBuilder::new();
    let registry = model.class("com.deeply.nested.package.GlobalServiceRegistry", &[]);
    let instance = model.static_field(
        "com.deeply.nested.package.GlobalServiceRegistry",
        "INSTANCE",
        "com.deeply.nested.package.GlobalServiceRegistry",
    );
    let db = model.build();

    let chained = cand(&db, instance).qualified_by(cand(&db, registry));
    let expected = vec![ExpectedType::new(
        Ty::class("com.deeply.nested.package.GlobalServiceRegistry"),
        ExpectedKind::Subtype,
        TailKind::Semicolon,
    )];

    let fixture = Fixture::parse("reg = <caret>");
    let mut document = Document::new(fixture.text.clone());
    let config = CompletionConfig::default();
    let imports = TestImports::new();
    let engine = InsertionEngine::new(&db, &imports, &config, &expected);
    let mut icx = InsertionContext::new(&mut document, fixture.prefix_range(), None).unwrap();
    let outcome = engine.apply(&chained, &mut icx).unwrap();

    let text = document.text();
    assert!(text.ends_with("GlobalServiceRegistry.INSTANCE;"), "{text}");
    assert_eq!(outcome.inserted.end(), document.len());
}

#[test]
fn full_pipeline_scenario_array_to_list() {
    // Expected `List<String>`, no direct match, `String[] arr` in scope: the
    // synthesizer emits `Arrays.asList(arr)`; selecting it inserts exactly
    // that text plus the statement tail.
    let mut model = ModelBuilder::new();
    model.jdk_collections();
    model.local("arr", "java.lang.String[]");
    model.expect(ExpectedType::new(
        Ty::generic(well_known::LIST, vec![Ty::string()]),
        ExpectedKind::Subtype,
        TailKind::Semicolon,
    ));
    let db = model.build();

    let session = CompletionSession::new(
        &db,
        CursorContext::default().smart(),
        CompletionConfig::default(),
        CancellationToken::new(),
    );
    let chosen = session
        .generate()
        .unwrap()
        .into_iter()
        .find(|s| s.candidate.primary_string() == "Arrays.asList(arr)")
        .expect("synthesized conversion offered")
        .candidate;

    let fixture = Fixture::parse("List<String> out = <caret>");
    let mut document = Document::new(fixture.text.clone());
    let config = CompletionConfig::default();
    let imports = TestImports::new();
    let expected = db.expected_types(&CursorContext::default());
    let engine = InsertionEngine::new(&db, &imports, &config, &expected);
    let mut icx = InsertionContext::new(&mut document, fixture.prefix_range(), None).unwrap();
    let outcome = engine.apply(&chosen, &mut icx).unwrap();

    assert_eq!(
        document.text(),
        "import java.util.Arrays;\nList<String> out = Arrays.asList(arr);"
    );
    assert!(!outcome.fell_back);
}
