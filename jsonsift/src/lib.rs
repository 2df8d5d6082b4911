//! Nested boolean filter trees over loosely-structured JSON records.
//!
//! A filter tree is a [`FilterGroup`] combining leaf [`FilterCondition`]s and
//! nested groups with AND/OR semantics. Records are plain
//! [`serde_json::Value`]s addressed by dotted, optionally array-indexed field
//! paths (`a.b[0].c`). The crate stays synchronous and runtime-free; the
//! companion `jsonsift-core` crate drives trees over whole datasets.

pub mod ast;
pub mod conversion;
pub mod error;
pub mod fields;
pub mod path;
pub mod selection;

pub use ast::{ComparisonOperator, FilterCondition, FilterGroup, GroupOperator};
pub use conversion::{from_text, to_text};
pub use error::ParseError;
pub use fields::{inspect, inspect_dataset, unique_values, FieldInfo, FieldType};
pub use selection::filter::{evaluate_condition, evaluate_group, FilterIterator, FilterResult, Filterable};
