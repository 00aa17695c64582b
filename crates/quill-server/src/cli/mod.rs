use clap::{Parser, Subcommand};

pub mod create_superuser;

#[derive(Parser)]
#[command(name = "quill-server")]
#[command(about = "Quill Server CLI")]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run database migrations
    Migrate,
    /// Create an administrator account
    CreateSuperuser(create_superuser::CreateSuperuserArgs),
}

#[derive(Debug, Clone)]
pub enum RunMode {
    Server,
    Migrate,
    CreateSuperuser(create_superuser::CreateSuperuserArgs),
}

pub fn parse_args() -> RunMode {
    let cli = Cli::parse();
    match cli.command {
        None => RunMode::Server,
        Some(Command::Migrate) => RunMode::Migrate,
        Some(Command::CreateSuperuser(args)) => RunMode::CreateSuperuser(args),
    }
}
