//! `schemalink convert`

use anyhow::{Context, Result};
use schemalink::{convert_data_model, destinations_to_json, load_instance, load_registry};

use crate::parser::ConvertArgs;

/// Loads schemas and the source instance, converts it and prints or writes
/// `{RootClassName: data}` as JSON.
pub(crate) fn execute(args: &ConvertArgs) -> Result<()> {
    let registry = load_registry(&args.schema.schemas)?;
    let source = load_instance(&registry, &args.schema.model, &args.input)?;
    let destinations = convert_data_model(&registry, &source, &args.option, args.template.as_deref())?;
    let rendered = serde_json::to_string_pretty(&destinations_to_json(&destinations))?;

    match &args.output {
        Some(path) => {
            std::fs::write(path, rendered).with_context(|| format!("writing {}", path.display()))?;
            tracing::info!("wrote {} destination instances to {}", destinations.len(), path.display());
        }
        None => println!("{rendered}"),
    }
    Ok(())
}
