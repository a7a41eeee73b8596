//! `pets`: list, add, edit and remove pets on a records server.

mod commands;
mod transport;

use std::io;

use anyhow::Result;
use clap::{Parser, Subcommand};
use pets_core::PetId;
use tracing::error;
use tracing_subscriber::EnvFilter;

use commands::{FieldArgs, Session};

#[derive(Parser, Debug)]
#[command(name = "pets")]
#[command(version, about = "Manage pets on a records server", long_about = None)]
struct Cli {
    /// Base URL of the records server
    #[arg(long, env = "PETS_BASE_URL", default_value = "http://localhost:3000")]
    base_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List all pets
    List,

    /// Show one pet
    Show { id: u64 },

    /// Add a pet
    Add(FieldArgs),

    /// Change fields of an existing pet
    Edit {
        id: u64,
        #[command(flatten)]
        fields: FieldArgs,
    },

    /// Delete a pet after confirmation
    Remove {
        id: u64,

        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        error!("{e:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut session = Session::connect(&cli.base_url);
    let mut out = io::stdout().lock();
    match cli.command {
        Command::List => session.list(&mut out),
        Command::Show { id } => session.show(PetId(id), &mut out),
        Command::Add(fields) => session.add(fields, &mut out),
        Command::Edit { id, fields } => session.edit(PetId(id), fields, &mut out),
        Command::Remove { id, yes } => session.remove(PetId(id), yes, &mut out),
    }
}

#[cfg(test)]
mod tests {
    use pets_core::Kind;

    use super::*;

    #[test]
    fn default_base_url() {
        let cli = Cli::try_parse_from(["pets", "list"]).unwrap();
        assert_eq!(cli.base_url, "http://localhost:3000");
        assert!(matches!(cli.command, Command::List));
    }

    #[test]
    fn add_parses_fields() {
        let cli = Cli::try_parse_from([
            "pets",
            "--base-url",
            "http://pets.test",
            "add",
            "--name",
            "Rex",
            "--kind",
            "dog",
        ])
        .unwrap();
        assert_eq!(cli.base_url, "http://pets.test");
        match cli.command {
            Command::Add(fields) => {
                assert_eq!(fields.name.as_deref(), Some("Rex"));
                assert_eq!(fields.kind, Some(Kind::Dog));
                assert!(fields.photo.is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn unknown_kind_is_rejected() {
        assert!(Cli::try_parse_from(["pets", "add", "--name", "Polly", "--kind", "parrot"]).is_err());
    }

    #[test]
    fn photo_and_clear_photo_conflict() {
        assert!(Cli::try_parse_from(["pets", "edit", "1", "--photo", "x", "--clear-photo"]).is_err());
    }

    #[test]
    fn remove_with_yes() {
        let cli = Cli::try_parse_from(["pets", "remove", "2", "-y"]).unwrap();
        assert!(matches!(cli.command, Command::Remove { id: 2, yes: true }));
    }
}
