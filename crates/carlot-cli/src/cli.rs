use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "carlot", about = "Carlot: list, search and manage car listings", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Client configuration file (defaults to the user config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start the Carlot API server
    Serve(ServeArgs),
    /// Generate signing keys and issue development tokens
    Token(TokenArgs),
    /// Store a bearer token as the current session
    Login(LoginArgs),
    /// Forget the current session
    Logout,
    /// Show who is signed in
    Whoami,
    /// Browse or search listings
    List(ListArgs),
    /// Show one listing
    Show(ShowArgs),
    /// Create a listing
    Create(CreateArgs),
    /// Edit one of your listings
    Edit(EditArgs),
    /// Delete one of your listings
    Delete(DeleteArgs),
}

#[derive(Args)]
pub struct ServeArgs {
    /// Server configuration file
    #[arg(long = "server-config")]
    pub server_config: Option<PathBuf>,
    /// Override the bind address
    #[arg(long)]
    pub bind: Option<std::net::SocketAddr>,
}

#[derive(Args)]
pub struct TokenArgs {
    #[command(subcommand)]
    pub action: TokenAction,
}

#[derive(Subcommand)]
pub enum TokenAction {
    /// Print a fresh random signing key
    Keygen,
    /// Issue a signed token for a subject
    Issue {
        #[arg(long)]
        subject: String,
        /// Hex signing key (same as the server's token_secret)
        #[arg(long, env = "CARLOT_TOKEN_SECRET")]
        secret: String,
    },
}

#[derive(Args)]
pub struct LoginArgs {
    #[arg(long)]
    pub token: String,
}

#[derive(Args)]
pub struct ListArgs {
    /// Only your own listings
    #[arg(long)]
    pub mine: bool,
    /// Case-insensitive match on title, description and tags
    #[arg(short, long, default_value = "")]
    pub search: String,
}

#[derive(Args)]
pub struct ShowArgs {
    pub id: String,
}

#[derive(Args)]
pub struct CreateArgs {
    #[arg(long)]
    pub title: String,
    #[arg(long)]
    pub description: String,
    /// Comma-separated tags
    #[arg(long, default_value = "")]
    pub tags: String,
    /// Image files to attach, in display order
    #[arg(long = "image")]
    pub images: Vec<PathBuf>,
}

#[derive(Args)]
pub struct EditArgs {
    pub id: String,
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    /// Replace all tags (comma-separated)
    #[arg(long)]
    pub tags: Option<String>,
    /// Remove an existing image by its position (0-based); repeatable
    #[arg(long = "remove-image")]
    pub remove_images: Vec<usize>,
    /// Append an image file; repeatable
    #[arg(long = "add-image")]
    pub add_images: Vec<PathBuf>,
}

#[derive(Args)]
pub struct DeleteArgs {
    pub id: String,
    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn repeated_images_keep_order() {
        let cli = Cli::parse_from([
            "carlot", "create", "--title", "T", "--description", "D",
            "--image", "b.png", "--image", "a.png",
        ]);
        match cli.command {
            Command::Create(args) => {
                assert_eq!(args.images, vec![PathBuf::from("b.png"), PathBuf::from("a.png")]);
                assert_eq!(args.tags, "");
            }
            _ => panic!("expected create"),
        }
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::parse_from(["carlot", "list", "--mine", "--format", "json"]);
        assert_eq!(cli.format, OutputFormat::Json);
        assert!(matches!(cli.command, Command::List(ListArgs { mine: true, .. })));
    }
}
