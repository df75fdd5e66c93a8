//! CLI argument parsing with clap

use clap::{Args, Parser, Subcommand};

/// extman - command-line extension manager
#[derive(Parser, Debug)]
#[command(name = "extman")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List installed extensions
    List(ListArgs),

    /// Install extensions by identifier, identifier@version, or package path
    Install(InstallArgs),

    /// Uninstall extensions
    Uninstall(UninstallArgs),

    /// Print the local path of installed extensions
    Locate(LocateArgs),
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Only list extensions in this category
    #[arg(long)]
    pub category: Option<String>,

    /// Show the installed version of each extension
    #[arg(long)]
    pub show_versions: bool,
}

#[derive(Args, Debug)]
pub struct InstallArgs {
    /// Extension references: publisher.name, publisher.name@1.2.3, or a package path
    #[arg(required_unless_present = "builtin")]
    pub references: Vec<String>,

    /// Identifiers to install as builtin extensions
    #[arg(long)]
    pub builtin: Vec<String>,

    /// Install with machine scope
    #[arg(long)]
    pub machine: bool,

    /// Update installed extensions and permit downgrades
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct UninstallArgs {
    /// Extension references: publisher.name or a package path
    #[arg(required = true)]
    pub references: Vec<String>,

    /// Uninstall extensions marked as builtin
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct LocateArgs {
    /// Extension identifiers to locate
    #[arg(required = true)]
    pub identifiers: Vec<String>,
}
