//! Qualified names of library types the synthesizer and weighers special-case.

pub const OBJECT: &str = "java.lang.Object";
pub const STRING: &str = "java.lang.String";
pub const STRING_BUILDER: &str = "java.lang.StringBuilder";
pub const ITERABLE: &str = "java.lang.Iterable";
pub const COLLECTION: &str = "java.util.Collection";
pub const LIST: &str = "java.util.List";
pub const SET: &str = "java.util.Set";
pub const ARRAYS: &str = "java.util.Arrays";
pub const STREAM: &str = "java.util.stream.Stream";
pub const COLLECTORS: &str = "java.util.stream.Collectors";

/// Members every object exposes; qualifier chains through these are noise
/// unless an interface contract asks for them.
pub const OBJECT_IDENTITY_MEMBERS: &[&str] = &[
    "equals",
    "hashCode",
    "getClass",
    "clone",
    "finalize",
    "notify",
    "notifyAll",
    "wait",
];

pub fn is_object_identity_member(name: &str) -> bool {
    OBJECT_IDENTITY_MEMBERS.contains(&name)
}
