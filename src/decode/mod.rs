//! Response decoder module
//!
//! Flattens App API responses into records.
//!
//! # Overview
//!
//! List endpoints wrap their records in an envelope (`{"activities": [...],
//! "next": "..."}`); metrics, links and actions endpoints answer with one
//! object that is itself the record. Values pass through untouched.

mod decoders;
mod types;

pub use decoders::{EnvelopeDecoder, ObjectDecoder};
pub use types::{RecordDecoder, ResponseShape};
