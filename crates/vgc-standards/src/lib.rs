#![deny(unsafe_code)]

pub mod error;
pub mod hash;
pub mod lookups;
pub mod paths;

pub use crate::error::StandardsError;
pub use crate::hash::sha256_hex;
pub use crate::lookups::{
    CleaningRules, LookupTables, OTHER_GENERATION, SegmentRules, embedded_lookups,
    load_default_lookups, load_lookups, parse_lookups,
};
