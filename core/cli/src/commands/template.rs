//! `schemalink template`

use anyhow::Result;
use schemalink::{generate_template, load_registry, write_template};

use crate::parser::TemplateArgs;

pub(crate) fn execute(args: &TemplateArgs) -> Result<()> {
    let registry = load_registry(&args.schema.schemas)?;
    let schema = registry.resolve_qualified(&args.schema.model)?;
    let document = generate_template(&registry, &schema, !args.rules)?;
    write_template(&document, &args.out)?;
    println!("Template written to {}", args.out.display());
    Ok(())
}
