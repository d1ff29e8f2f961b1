//! Failure handling: stale candidates, lost enhancements, hard aborts.

use rigel_complete::{Candidate, CompletionConfig};
use rigel_core::{EditError, TextSize, TypeName};
use rigel_edit::{Document, InsertError, InsertionContext, InsertionEngine};
use rigel_semantics::{ExpectedKind, ExpectedType, ImportPlan, ImportPlanner, SemanticDb, TailKind, Ty};
use rigel_test_utils::{Fixture, ModelBuilder, TestDb, TestImports};

fn cand(db: &TestDb, id: rigel_semantics::SymbolId) -> Candidate {
    Candidate::for_symbol(id, &db.symbol(id).unwrap())
}

#[test]
fn read_only_document_aborts_with_the_prefix_untouched() {
    let mut model = ModelBuilder::new();
    let local = model.local("counter", "int");
    let db = model.build();
    let candidate = cand(&db, local);

    let fixture = Fixture::parse("int x = cou<caret>");
    let mut document = Document::new_read_only(fixture.text.clone());
    let config = CompletionConfig::default();
    let imports = TestImports::new();
    let engine = InsertionEngine::new(&db, &imports, &config, &[]);
    let mut icx = InsertionContext::new(&mut document, fixture.prefix_range(), None).unwrap();

    let err = engine.apply(&candidate, &mut icx).unwrap_err();
    assert!(matches!(err, InsertError::Edit(EditError::ReadOnly)));
    assert_eq!(document.text(), "int x = cou");
}

#[test]
fn stale_candidate_degrades_to_literal_text() {
    let mut model = ModelBuilder::new();
    model.class("com.example.A", &[]);
    let gone = model.method("com.example.A", "vanish", "int", &["int"]);
    // The candidate was generated while the symbol was live; a concurrent
    // edit elsewhere invalidated it before acceptance.
    let candidate = Candidate::for_symbol(
        gone,
        &rigel_semantics::Symbol::method(
            "vanish",
            Ty::int(),
            vec![Ty::int()],
            "com.example.A",
        ),
    );
    model.invalidate(gone);
    let db = model.build();

    let expected = vec![ExpectedType::new(
        Ty::int(),
        ExpectedKind::Subtype,
        TailKind::Semicolon,
    )];
    let fixture = Fixture::parse("int x = van<caret>");
    let mut document = Document::new(fixture.text.clone());
    let config = CompletionConfig::default();
    let imports = TestImports::new();
    let engine = InsertionEngine::new(&db, &imports, &config, &expected);
    let mut icx = InsertionContext::new(&mut document, fixture.prefix_range(), None).unwrap();
    let outcome = engine.apply(&candidate, &mut icx).unwrap();

    // Literal text only: no parens, no tail.
    assert_eq!(document.text(), "int x = vanish");
    assert!(outcome.fell_back);
}

#[test]
fn import_landing_inside_the_insertion_keeps_the_qualified_form() {
    struct HostileImports;

    impl ImportPlanner for HostileImports {
        fn plan(&self, _qualified: &TypeName, document_text: &str) -> ImportPlan {
            // Claims the import belongs at the very end of the document,
            // inside the span just inserted.
            ImportPlan::AddImport {
                offset: TextSize::new(document_text.len() as u32),
                text: "import bogus;\n".to_string(),
            }
        }
    }

    let mut model = ModelBuilder::new();
    let class = model.class("java.util.ArrayList", &[]);
    let db = model.build();
    let candidate = cand(&db, class);

    let fixture = Fixture::parse("x = new ArrayL<caret>");
    let mut document = Document::new(fixture.text.clone());
    let config = CompletionConfig::default();
    let engine = InsertionEngine::new(&db, &HostileImports, &config, &[]);
    let mut icx = InsertionContext::new(&mut document, fixture.prefix_range(), None).unwrap();
    let outcome = engine.apply(&candidate, &mut icx).unwrap();

    assert_eq!(document.text(), "x = new java.util.ArrayList");
    assert!(outcome.imports.is_empty());
}

#[test]
fn taken_short_names_are_written_fully_qualified() {
    let mut model = ModelBuilder::new();
    let class = model.class("com.other.List", &[]);
    let db = model.build();
    let candidate = cand(&db, class);

    let fixture = Fixture::parse("x = Li<caret>");
    let mut document = Document::new(fixture.text.clone());
    let config = CompletionConfig::default();
    let imports = TestImports::new().take_short_name("List");
    let engine = InsertionEngine::new(&db, &imports, &config, &[]);
    let mut icx = InsertionContext::new(&mut document, fixture.prefix_range(), None).unwrap();
    engine.apply(&candidate, &mut icx).unwrap();

    assert_eq!(document.text(), "x = com.other.List");
}

#[test]
fn tail_is_not_duplicated_over_an_existing_terminator() {
    let mut model = ModelBuilder::new();
    let local = model.local("counter", "int");
    let db = model.build();
    let candidate = cand(&db, local);

    let expected = vec![ExpectedType::new(
        Ty::int(),
        ExpectedKind::Subtype,
        TailKind::Semicolon,
    )];
    let fixture = Fixture::parse("int x = cou<caret>;");
    let mut document = Document::new(fixture.text.clone());
    let config = CompletionConfig::default();
    let imports = TestImports::new();
    let engine = InsertionEngine::new(&db, &imports, &config, &expected);
    let mut icx = InsertionContext::new(&mut document, fixture.prefix_range(), None).unwrap();
    engine.apply(&candidate, &mut icx).unwrap();

    assert_eq!(document.text(), "int x = counter;");
}
