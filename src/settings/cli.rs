use super::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "flashcards", about = "Command-line client for the flashcards API")]
pub struct Cli {
    #[arg(long)]
    pub settings: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Sign in and store the session
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Create an account and store the session
    Register {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
    },
    Logout,
    /// Print the id of the signed-in user
    Whoami,
    Get {
        path: String,
    },
    Delete {
        path: String,
    },
    Post {
        path: String,
        /// JSON request body
        body: String,
    },
    Put {
        path: String,
        body: String,
    },
    Patch {
        path: String,
        body: String,
    },
}
