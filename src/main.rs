use bundlegraph::cli::{Cli, Command};
use bundlegraph::{cmd_init, cmd_render, cmd_serve, cmd_snapshot};
use clap::Parser;

fn main() {
    let cli = Cli::parse();

    let exit_code = match cli.command {
        Command::Render(args) => cmd_render(args),
        Command::Snapshot(args) => cmd_snapshot(args),
        Command::Serve(args) => cmd_serve(args),
        Command::Init(args) => cmd_init(args),
    };

    std::process::exit(exit_code);
}
