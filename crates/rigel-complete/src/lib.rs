//! Candidate composition and relevance ranking for structured-source
//! completion.
//!
//! The pipeline: the generator normalizes the session's resolution snapshot
//! into candidates, the filter chain drops inapplicable ones, the synthesizer
//! derives compound candidates (chains, casts, conversions) for expectations
//! nothing matches directly, and the weigher chain produces one total order.
//! Insertion of a chosen candidate lives in `rigel-edit`.

mod candidate;
mod config;
mod filters;
mod generator;
mod matcher;
mod session;
mod synthesis;
mod weigher;

pub use candidate::{
    Candidate, CandidateObject, CollectorBuilder, Decorator, EmptyArraySource, ImportSpec,
};
pub use config::CompletionConfig;
pub use filters::{
    classify_self_reference, filter_chain, run_chain, CandidateFilter, FilterCx, SelfReference,
};
pub use matcher::{MatchDegree, PrefixMatcher};
pub use session::CompletionSession;
pub use synthesis::synthesize;
pub use weigher::{
    compare_keys, rank, relevance_key, weighers, AccessBucket, ExpectedBucket, RecursionBucket,
    RelevanceKey, ScoredCandidate, Weigher,
};
