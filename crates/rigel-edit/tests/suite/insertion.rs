//! Plain and call-shaped insertions.

use rigel_complete::{Candidate, CompletionConfig, CompletionSession};
use rigel_core::{CancellationToken, TextSize};
use rigel_edit::{Document, InsertionContext, InsertionEngine};
use rigel_semantics::{
    CursorContext, ExpectedKind, ExpectedType, SemanticDb, TailKind, Ty,
};
use rigel_test_utils::{Fixture, ModelBuilder, TestDb, TestImports};

fn cand(db: &TestDb, id: rigel_semantics::SymbolId) -> Candidate {
    Candidate::for_symbol(id, &db.symbol(id).unwrap())
}

fn apply(
    db: &TestDb,
    candidate: &Candidate,
    source: &str,
    trigger: Option<char>,
    expected: Vec<ExpectedType>,
) -> (String, rigel_edit::InsertOutcome) {
    let fixture = Fixture::parse(source);
    let mut document = Document::new(fixture.text.clone());
    let config = CompletionConfig::default();
    let imports = TestImports::new();
    let engine = InsertionEngine::new(db, &imports, &config, &expected);
    let mut icx = InsertionContext::new(&mut document, fixture.prefix_range(), trigger).unwrap();
    let outcome = engine.apply(candidate, &mut icx).unwrap();
    (document.text().to_string(), outcome)
}

#[test]
fn simple_candidate_replaces_the_typed_prefix() {
    let mut model = ModelBuilder::new();
    let local = model.local("counter", "int");
    let db = model.build();

    let (text, outcome) = apply(&db, &cand(&db, local), "int x = cou<caret>", None, Vec::new());
    assert_eq!(text, "int x = counter");
    assert!(!outcome.fell_back);
    assert_eq!(outcome.caret, TextSize::new(15));
}

#[test]
fn statement_tail_token_is_appended_for_the_matched_expectation() {
    let mut model = ModelBuilder::new();
    let local = model.local("counter", "int");
    let db = model.build();

    let expected = vec![ExpectedType::new(
        Ty::int(),
        ExpectedKind::Subtype,
        TailKind::Semicolon,
    )];
    let (text, _) = apply(&db, &cand(&db, local), "int x = cou<caret>", None, expected);
    assert_eq!(text, "int x = counter;");
}

#[test]
fn trigger_character_suppresses_an_equivalent_tail() {
    let mut model = ModelBuilder::new();
    let local = model.local("counter", "int");
    let db = model.build();

    let expected = vec![ExpectedType::new(
        Ty::int(),
        ExpectedKind::Subtype,
        TailKind::Semicolon,
    )];
    let (text, _) = apply(
        &db,
        &cand(&db, local),
        "int x = cou<caret>",
        Some(';'),
        expected,
    );
    assert_eq!(text, "int x = counter");
}

#[test]
fn merged_overloads_scaffold_one_placeholder_comma() {
    let mut model = ModelBuilder::new();
    model.class("com.example.A", &[]);
    model.method("com.example.A", "foo", "int", &["int"]);
    model.method("com.example.A", "foo", "int", &["int", "int"]);
    model.expect(ExpectedType::new(
        Ty::int(),
        ExpectedKind::Subtype,
        TailKind::None,
    ));
    let db = model.build();

    // Get the merged candidate out of a real session.
    let session = CompletionSession::new(
        &db,
        CursorContext::default().with_prefix("fo"),
        CompletionConfig::default(),
        CancellationToken::new(),
    );
    let scored = session.generate().unwrap();
    let merged = scored
        .iter()
        .find(|s| s.candidate.primary_string() == "foo")
        .expect("merged overload candidate")
        .candidate
        .clone();

    let (text, outcome) = apply(&db, &merged, "int r = fo<caret>", None, Vec::new());
    assert_eq!(text, "int r = foo(,)");
    // Caret right after `foo(`.
    assert_eq!(outcome.caret, TextSize::new(12));
}

#[test]
fn parameterless_call_scaffolds_a_closed_pair_with_caret_after() {
    let mut model = ModelBuilder::new();
    model.class("com.example.A", &[]);
    let size = model.method("com.example.A", "size", "int", &[]);
    let db = model.build();

    let (text, outcome) = apply(&db, &cand(&db, size), "int r = si<caret>", None, Vec::new());
    assert_eq!(text, "int r = size()");
    assert_eq!(outcome.caret, TextSize::new(14));
}

#[test]
fn lparen_trigger_on_a_parameterless_call_honors_pair_bracket_config() {
    let mut model = ModelBuilder::new();
    model.class("com.example.A", &[]);
    let size = model.method("com.example.A", "size", "int", &[]);
    let db = model.build();

    let fixture = Fixture::parse("int r = si<caret>");
    let mut document = Document::new(fixture.text.clone());
    let config = CompletionConfig {
        pair_bracket_on_lparen: false,
        ..CompletionConfig::default()
    };
    let imports = TestImports::new();
    let engine = InsertionEngine::new(&db, &imports, &config, &[]);
    let mut icx =
        InsertionContext::new(&mut document, fixture.prefix_range(), Some('(')).unwrap();
    engine.apply(&cand(&db, size), &mut icx).unwrap();
    assert_eq!(document.text(), "int r = size(");
}

#[test]
fn existing_argument_list_is_reused_not_duplicated() {
    let mut model = ModelBuilder::new();
    model.class("com.example.A", &[]);
    let call = model.method("com.example.A", "compute", "int", &["int"]);
    let db = model.build();

    let fixture = Fixture::parse("int r = com<caret>(5)");
    let mut document = Document::new(fixture.text.clone());
    let config = CompletionConfig::default();
    let imports = TestImports::new();
    let engine = InsertionEngine::new(&db, &imports, &config, &[]);
    let mut icx = InsertionContext::new(&mut document, fixture.prefix_range(), None).unwrap();
    let outcome = engine.apply(&cand(&db, call), &mut icx).unwrap();

    assert_eq!(icx.document().text(), "int r = compute(5)");
    // Caret inside the existing parens, ready to edit arguments.
    assert_eq!(outcome.caret, TextSize::new(16));
    // The argument-list offsets recorded at context creation followed the
    // rename.
    let doc = icx.document();
    assert_eq!(
        icx.offsets().get(doc, rigel_edit::LPAREN),
        Some(TextSize::new(15))
    );
    assert_eq!(
        icx.offsets().get(doc, rigel_edit::RPAREN),
        Some(TextSize::new(17))
    );
    assert_eq!(
        icx.offsets().get(doc, rigel_edit::ARG_LIST_END),
        Some(TextSize::new(18))
    );
}

#[test]
fn class_insertion_adds_an_import_at_the_top() {
    let mut model = ModelBuilder::new();
    let class = model.class("java.util.ArrayList", &[]);
    let db = model.build();

    let (text, outcome) = apply(
        &db,
        &cand(&db, class),
        "list = new ArrayL<caret>",
        None,
        Vec::new(),
    );
    assert_eq!(
        text,
        "import java.util.ArrayList;\nlist = new ArrayList"
    );
    assert_eq!(outcome.imports.len(), 1);
}
