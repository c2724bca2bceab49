use clap::{ArgAction, ArgGroup, Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "sealnote",
    author,
    version = crate::version::SHORT,
    long_version = crate::version::LONG,
    about = "Password-sealed notes that travel entirely inside a link.",
    long_about = "Password-sealed notes that travel entirely inside a link.\n\n\
        Note content is encrypted with a key derived from a password (PBKDF2-SHA256, \
        AES-256-GCM) and embedded in the URL fragment. Nothing is stored on a server. \
        Expiry and self-destruct are enforced by the viewer only: anyone who keeps a \
        copy of a link can read it until it expires, and a forged clock defeats expiry."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[arg(long, global = true, help = "Emit JSON output.")]
    pub json: bool,

    #[arg(short, long, global = true, help = "Print only the bare value.")]
    pub quiet: bool,

    #[arg(
        long,
        global = true,
        help = "Copy the produced link to the clipboard (requires the `clipboard` feature)."
    )]
    pub copy: bool,

    #[arg(
        long,
        global = true,
        value_name = "DIR",
        help = "Directory holding documents and share records."
    )]
    pub data_dir: Option<PathBuf>,

    #[arg(
        short,
        long,
        global = true,
        action = ArgAction::Count,
        help = "Increase log verbosity (-v info, -vv debug)."
    )]
    pub verbose: u8,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    #[command(about = "Seal content into a password-protected share link.")]
    Seal(SealArgs),

    #[command(about = "Open a share link (prompts for the password).")]
    Open(OpenArgs),

    #[command(about = "Show the public metadata of a share link without decrypting it.")]
    Inspect(InspectArgs),

    #[command(about = "Share links created on this device.")]
    Links(LinksArgs),

    #[command(about = "Manage local documents.")]
    Doc(DocArgs),

    #[command(about = "Show or change settings.")]
    Config(ConfigArgs),
}

#[derive(Debug, Args)]
#[command(group(ArgGroup::new("source").args(["doc", "file", "content"]).required(true)))]
pub struct SealArgs {
    #[arg(long, value_name = "ID", help = "Seal a stored document.")]
    pub doc: Option<String>,

    #[arg(long, value_name = "PATH", help = "Seal the contents of a file.")]
    pub file: Option<PathBuf>,

    #[arg(long, value_name = "HTML", help = "Seal the given content.")]
    pub content: Option<String>,

    #[arg(long, help = "Reference title shown to the recipient before unlocking.")]
    pub title: Option<String>,

    #[arg(
        long,
        value_name = "HOURS",
        help = "Hours until the link expires; 0 = never. Defaults to the configured value."
    )]
    pub expiry_hours: Option<u32>,

    #[arg(long, help = "Ask the viewer to destroy the link after the first read.")]
    pub self_destruct: bool,

    #[arg(long, help = "Request a notification when the note self-destructs.")]
    pub notify: bool,

    #[arg(long, value_name = "EMAIL", help = "Address for the self-destruct notification.")]
    pub notify_email: Option<String>,

    #[arg(long, value_name = "URL", help = "Origin and path to build the link on.")]
    pub origin: Option<String>,
}

#[derive(Debug, Args)]
pub struct OpenArgs {
    #[arg(help = "Share link containing #note=.")]
    pub url: String,

    #[arg(long, help = "Save the opened note as a local document.")]
    pub save_copy: bool,
}

#[derive(Debug, Args)]
pub struct InspectArgs {
    #[arg(help = "Share link containing #note=.")]
    pub url: String,
}

#[derive(Debug, Args)]
pub struct LinksArgs {
    #[command(subcommand)]
    pub command: LinksCommands,
}

#[derive(Debug, Subcommand)]
pub enum LinksCommands {
    #[command(about = "List share records, most recent first.")]
    List,
}

#[derive(Debug, Args)]
pub struct DocArgs {
    #[command(subcommand)]
    pub command: DocCommands,
}

#[derive(Debug, Subcommand)]
pub enum DocCommands {
    #[command(about = "Create a document (content from --content, --file, or stdin).")]
    New(DocNewArgs),

    #[command(about = "List documents, most recently updated first.")]
    List,

    #[command(about = "Show a document.")]
    Show(DocIdArgs),

    #[command(about = "Change a document's title or content.")]
    Edit(DocEditArgs),

    #[command(about = "Delete a document.")]
    Rm(DocIdArgs),
}

#[derive(Debug, Args)]
#[command(group(ArgGroup::new("source").args(["file", "content"])))]
pub struct DocNewArgs {
    #[arg(long)]
    pub title: Option<String>,

    #[arg(long, value_name = "HTML")]
    pub content: Option<String>,

    #[arg(long, value_name = "PATH", help = "Import a file; its name becomes the title.")]
    pub file: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct DocIdArgs {
    pub id: String,
}

#[derive(Debug, Args)]
pub struct DocEditArgs {
    pub id: String,

    #[arg(long, help = "New title; an empty value derives one from the content.")]
    pub title: Option<String>,

    #[arg(long, value_name = "HTML")]
    pub content: Option<String>,
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    #[command(about = "Print the config file location.")]
    Path,

    #[command(about = "Print the effective settings.")]
    Show,

    #[command(about = "Change settings.")]
    Set(ConfigSetArgs),
}

#[derive(Debug, Args)]
pub struct ConfigSetArgs {
    #[arg(long, value_name = "URL")]
    pub origin: Option<String>,

    #[arg(long, value_name = "HOURS")]
    pub default_expiry_hours: Option<u32>,

    #[arg(long, value_name = "N")]
    pub max_password_attempts: Option<u32>,
}
