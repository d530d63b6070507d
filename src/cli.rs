use clap::Parser;

/// Single-screen todo TUI. State lives in memory for the session;
/// there is no storage file and no subcommands.
#[derive(Parser)]
#[command(name = "todo", version, about = "Multi-list todo TUI")]
pub struct Cli {}
