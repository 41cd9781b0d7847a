//! Sleuth: query filter expressions for the forensic search service
//!
//! Typed filter primitives and groups, per-field filter factories, and the
//! query envelope in both wire dialects, plus a thin client seam for posting
//! queries through a caller-supplied transport.

pub mod client;
pub mod config;
pub mod error;
pub mod expr;
pub mod field;
pub mod filter;
pub mod query;

pub use client::{RawResponse, Response, SearchClient, Transport};
pub use config::ClientConfig;
pub use error::{Error, Result};
pub use expr::{parse_filter, parse_filter_in};
pub use field::{alert, file_event, Catalog, FieldDescriptor, IntoTimestamp, IntoWindow, ValueType};
pub use filter::{Clause, FilterGroup, FilterPrimitive, FilterValue, Operator, Scalar};
pub use query::{Dialect, Query, SortDirection};
