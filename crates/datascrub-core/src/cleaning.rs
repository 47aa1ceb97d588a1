//! Column-aware cleaning operations.
//!
//! Every operation works on a borrowed [`Table`](crate::models::Table) and
//! mutates it in place. Audit events go to the supplied
//! [`Reporter`](crate::report::Reporter); nothing is printed.

pub mod dedup;
pub mod fill;
pub mod normalize;

pub use dedup::remove_duplicates;
pub use fill::{fill_missing, FillOutcome, FillSpec, FillStrategy};
pub use normalize::{normalize, parse_with_format, NormalizeSpec, TextCase};
