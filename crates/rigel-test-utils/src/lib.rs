//! Test support for the Rigel pipeline: an in-memory semantic model and
//! caret-marker text fixtures.

mod fixture;
mod imports;
mod logging;
mod model;
mod ty_parse;

pub use fixture::Fixture;
pub use imports::TestImports;
pub use logging::init_tracing;
pub use model::{ModelBuilder, TestDb};
pub use ty_parse::parse_ty;
