//! Schema command: print the JSON schemas of the CLI file formats.

use crate::json_schema::{all_schemas, get_schema, schema_names};
use anyhow::{bail, Result};
use std::fs;
use std::path::PathBuf;

/// Run the schema command
pub fn run(name: Option<String>, output_dir: Option<PathBuf>, list: bool) -> Result<()> {
    if list {
        for name in schema_names() {
            println!("{}", name);
        }
        return Ok(());
    }

    let schemas = match name {
        Some(ref name) => match get_schema(name) {
            Some(schema) => vec![(name.clone(), schema)],
            None => bail!(
                "unknown schema: {}. Valid options: {}",
                name,
                schema_names().join(", ")
            ),
        },
        None => all_schemas()
            .into_iter()
            .map(|(name, schema)| (name.to_string(), schema))
            .collect(),
    };

    match output_dir {
        Some(dir) => {
            fs::create_dir_all(&dir)?;
            for (name, schema) in &schemas {
                let path = dir.join(format!("{}.schema.json", name));
                fs::write(&path, serde_json::to_string_pretty(schema)?)?;
                eprintln!("Schema written to: {}", path.display());
            }
        }
        None if schemas.len() == 1 => {
            println!("{}", serde_json::to_string_pretty(&schemas[0].1)?);
        }
        None => {
            let combined: serde_json::Map<String, serde_json::Value> = schemas
                .into_iter()
                .map(|(name, schema)| Ok((name, serde_json::to_value(schema)?)))
                .collect::<Result<_>>()?;
            println!("{}", serde_json::to_string_pretty(&combined)?);
        }
    }

    Ok(())
}
