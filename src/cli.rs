use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "siteadmin", about = "Construction site administration client")]
pub struct Cli {
    /// Path to config file (default: ./config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Sign in with email and password
    Login,
    /// Forget the stored session
    Logout,
    /// List projects
    Projects,
    /// Show one project with its completion status
    Project { id: String },
    /// List cameras of a project
    Cameras { project: String },
    /// Open a camera stream in the media player
    Play { project: String, camera: String },
    /// List construction sites
    Sites {
        #[arg(long)]
        project: Option<String>,
    },
    /// Download a project's cover image
    Cover {
        project: String,
        #[arg(long)]
        out: PathBuf,
    },
    /// List chats, most recent first
    Chats {
        #[arg(long)]
        project: Option<String>,
    },
    /// Open a chat interactively
    Chat { id: String },
    /// Send one message without opening the chat
    Send { chat: String, text: String },
}

impl Cli {
    pub fn command_or_default(&self) -> Command {
        self.command.clone().unwrap_or(Command::Projects)
    }
}
