//! Inspect command implementation

use crate::cli::InspectArgs;
use crate::output::OutputWriter;
use crate::output_types::{ColumnInfo, InspectOutput};
use crate::table_io;
use anyhow::Result;

pub fn execute(args: InspectArgs, output: &OutputWriter) -> Result<()> {
    let table = table_io::read_table(&args.input)?;

    let columns: Vec<ColumnInfo> = table
        .columns()
        .iter()
        .map(|column| ColumnInfo {
            name: column.name().to_string(),
            semantic_type: column.kind(),
            missing: column.missing_count(),
        })
        .collect();

    if output.is_json() {
        output.result(InspectOutput {
            path: args.input.display().to_string(),
            rows: table.row_count(),
            columns,
        })?;
    } else {
        output.section(format!("{} ({} rows)", args.input.display(), table.row_count()));
        output.table(columns)?;
    }

    Ok(())
}
