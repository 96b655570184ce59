mod canonical;

pub use canonical::{CanonicalBody, canonicalize, canonicalize_raw, strip_whitespace};
