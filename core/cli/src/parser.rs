//! Command line argument parsing for the `schemalink` binary.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Command line interface definition for schemalink.
///
/// ## Examples
///
/// Convert a JSON instance with the links of option `A`:
/// ```bash
/// schemalink convert --schemas schemas/ --model libSrc.Measurement \
///     --input data.json --option A --template links.yaml
/// ```
///
/// Write a rule-based template skeleton:
/// ```bash
/// schemalink template --schemas schemas/ --model libSrc.Measurement --out links.toml --rules
/// ```
#[derive(Parser)]
#[command(
    name = "schemalink",
    author,
    version,
    about = "Convert data model instances between schema libraries",
    long_about = "The 'schemalink' command projects an instance of one data model onto the classes of other \
data models, following link annotations selected by an option name and an optional link template."
)]
pub(crate) struct Cli {
    /// Raise the log level (`-v` info, `-vv` debug, `-vvv` trace). `RUST_LOG` takes precedence.
    #[clap(short = 'v', long = "verbose", global = true, action = clap::ArgAction::Count)]
    pub(crate) verbose: u8,

    #[command(subcommand)]
    pub(crate) command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Convert an instance into destination instances.
    ///
    /// Prints a JSON object keyed by destination root class name.
    Convert(ConvertArgs),

    /// Write a skeleton link template for a source model.
    Template(TemplateArgs),
}

/// Schema documents shared by every subcommand.
#[derive(Args)]
pub(crate) struct SchemaArgs {
    /// Schema document or directory of schema documents; repeatable.
    #[clap(long = "schemas", required = true, num_args = 1..)]
    pub(crate) schemas: Vec<PathBuf>,

    /// Qualified source model, `module.Class`.
    #[clap(long = "model")]
    pub(crate) model: String,
}

#[derive(Args)]
pub(crate) struct ConvertArgs {
    #[command(flatten)]
    pub(crate) schema: SchemaArgs,

    /// JSON document holding the source instance.
    #[clap(long = "input")]
    pub(crate) input: PathBuf,

    /// Option name selecting the link annotations.
    #[clap(long = "option")]
    pub(crate) option: String,

    /// Link template (YAML, TOML or JSON). A missing file is treated as empty.
    #[clap(long = "template")]
    pub(crate) template: Option<PathBuf>,

    /// Write the result here instead of stdout.
    #[clap(long = "output")]
    pub(crate) output: Option<PathBuf>,
}

#[derive(Args)]
pub(crate) struct TemplateArgs {
    #[command(flatten)]
    pub(crate) schema: SchemaArgs,

    /// Destination file; `.yaml`/`.yml` and `.json` select those formats, TOML otherwise.
    #[clap(long = "out")]
    pub(crate) out: PathBuf,

    /// Emit one catch-all rule per nested class instead of flat maps.
    #[clap(long = "rules", action = clap::ArgAction::SetTrue)]
    pub(crate) rules: bool,
}
