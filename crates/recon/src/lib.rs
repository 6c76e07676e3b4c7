//! `tsrecon-engine`: term sheet vs booking reconciliation engine.
//!
//! Pure engine crate: receives a canonical field set and pre-loaded booking
//! records, returns per-field, per-trade and batch results.
//! No CLI or IO dependencies.

pub mod alias;
pub mod batch;
pub mod compare;
pub mod config;
pub mod error;
pub mod field;
pub mod model;
pub mod parse;
pub mod resolver;
pub mod trade;

pub use alias::AliasTable;
pub use batch::aggregate;
pub use compare::compare;
pub use config::{ReconConfig, TextMatch};
pub use error::ReconError;
pub use field::{CanonicalField, FieldType};
pub use model::{
    BatchResult, BookingRecord, CanonicalFieldSet, FieldComparisonResult, FieldValue, TradeResult,
};
pub use resolver::{resolve, Resolution};
pub use trade::reconcile;
