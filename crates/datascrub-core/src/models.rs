pub mod column;
pub mod table;
pub mod value;

pub use column::{Column, ColumnData};
pub use table::Table;
pub use value::{format_datetime, parse_bool, parse_iso_datetime, SemanticType, Value};
