//! Config command implementation

use crate::cli::ConfigArgs;
use crate::config_loader;
use crate::output::OutputWriter;
use crate::output_types::{ConfigEntry, ConfigOutput};
use anyhow::Result;
use tabled::Tabled;

pub fn execute(args: ConfigArgs, output: &OutputWriter) -> Result<()> {
    let config = config_loader::load_config(args.config.as_deref())?;
    let inspection_map = config.to_inspection_map();

    if output.is_json() {
        let entries = inspection_map
            .into_iter()
            .map(|(key, (value, source))| {
                (key, ConfigEntry { value, source: format!("{:?}", source) })
            })
            .collect();
        output.result(ConfigOutput { entries })?;
    } else {
        output.section("Configuration");

        #[derive(Tabled, serde::Serialize)]
        struct ConfigRow {
            #[tabled(rename = "Key")]
            key: String,
            #[tabled(rename = "Value")]
            value: String,
            #[tabled(rename = "Source")]
            source: String,
        }

        let rows: Vec<ConfigRow> = inspection_map
            .into_iter()
            .map(|(key, (value, source))| ConfigRow {
                key,
                value,
                source: format!("{:?}", source),
            })
            .collect();
        output.table(rows)?;
    }

    Ok(())
}
