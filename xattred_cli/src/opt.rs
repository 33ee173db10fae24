//! Options used by the main executable
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

pub const APP_NAME: &str = "xattred";
pub const APP_VERSION: &str = "0.1.0";
pub const APP_AUTHOR: &str = "Wojciech Kępka <wojciech@wkepka.dev>";
pub const APP_ABOUT: &str = "Tool to inspect and edit extended attributes of files.";

#[derive(Parser)]
#[clap(
    name = APP_NAME,
    version = APP_VERSION,
    author = APP_AUTHOR,
    about = APP_ABOUT,
)]
pub struct Opts {
    #[arg(long)]
    /// When the path is a symbolic link operate on the attributes of the link itself instead of
    /// the file it points to.
    pub no_deref: bool,
    /// Make the output pretty (add color). This is not recommended when using xattred in
    /// scripts.
    #[arg(long, short)]
    pub pretty: bool,
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Default)]
    /// Change the output format to `json` or `yaml`
    pub output_format: OutputFormat,
    #[clap(subcommand)]
    pub cmd: Command,
}

#[derive(ValueEnum, Clone, Copy, PartialEq, Eq, Debug)]
pub enum OutputFormat {
    Yaml,
    Json,
    Default,
}

#[derive(Args)]
pub struct ListOpts {
    /// The file or directory whose attributes to list
    pub path: PathBuf,
}

#[derive(Args)]
pub struct GetOpts {
    /// The file or directory to read from
    pub path: PathBuf,
    /// Name of the attribute
    pub name: String,
}

#[derive(Args)]
pub struct AddOpts {
    /// The file or directory to add the attribute to
    pub path: PathBuf,
    /// Name of the new attribute
    pub name: String,
    /// Value of the new attribute, empty if not provided
    #[arg(default_value = "")]
    pub value: String,
}

#[derive(Args)]
pub struct EditOpts {
    /// The file or directory whose attribute to edit
    pub path: PathBuf,
    /// Current name of the attribute
    pub name: String,
    #[arg(long, short)]
    /// Rename the attribute to this name
    pub rename: Option<String>,
    #[arg(long, short)]
    /// Replace the value of the attribute
    pub value: Option<String>,
}

#[derive(Args)]
pub struct RmOpts {
    /// The file or directory to remove the attribute from
    pub path: PathBuf,
    /// Name of the attribute
    pub name: String,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Elvish,
    Fish,
    #[value(name = "powershell")]
    PowerShell,
    Zsh,
}

#[derive(Args)]
pub struct CompletionsOpts {
    /// A shell for which to print completions.
    #[arg(value_enum)]
    pub shell: Shell,
}

#[derive(Subcommand)]
pub enum Command {
    /// Lists all attributes of a file sorted by name.
    List(ListOpts),
    /// Prints the value of a single attribute.
    Get(GetOpts),
    /// Adds a new attribute. Fails if the attribute already exists.
    Add(AddOpts),
    /// Renames an attribute and/or replaces its value.
    Edit(EditOpts),
    /// Removes an attribute.
    Rm(RmOpts),
    /// Prints completions for the specified shell to stdout.
    PrintCompletions(CompletionsOpts),
}
