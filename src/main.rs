use clap::Parser;
use gatewatch::cli::{
    handle_completions, handle_config_init, register, snapshot, watch, Cli, Commands,
    ConfigCommands,
};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Watch(args) => watch::run_watch(args).await,
        Commands::Snapshot(args) => snapshot::run_snapshot(args).await,
        Commands::Register(args) => register::run_register(args).await,
        Commands::Config(config_cmd) => match config_cmd {
            ConfigCommands::Init(args) => handle_config_init(&args),
        },
        Commands::Completions(args) => {
            handle_completions(&args);
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
