//! Command-line client for the Aora backend.
//!
//! Appwrite settings come from `AORA_*` environment variables and
//! configuration files; the flags below only select the operation. Results
//! are printed to stdout as pretty JSON.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::ffi::OsString;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use aora_backend::domain::{CreateVideoPostForm, DocumentId, FileId, FileKind, MediaAsset};
use aora_backend::inbound::navigation::{TabBar, TabIndicator, TabRoute, app_tabs};
use aora_backend::settings::{AppwriteConfig, AppwriteSettings};
use aora_backend::telemetry::init_tracing;
use aora_backend::wiring::{AppwriteBackend, appwrite_backend};
use clap::{Args, Parser, Subcommand};
use color_eyre::eyre::{Context, Result, eyre};
use ortho_config::OrthoConfig;
use serde::Serialize;
use tokio::runtime::Builder;
use tracing::debug;

/// `aora` command arguments.
#[derive(Debug, Parser)]
#[command(name = "aora", about = "Aora video sharing backend client", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Register an account and write its user profile.
    SignUp {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        username: String,
    },
    /// Sign in and print the current user profile.
    Whoami(SignIn),
    /// Sign in, then end the session again.
    SignOut(SignIn),
    /// List video posts.
    Posts {
        #[command(subcommand)]
        listing: Listing,
    },
    /// Upload a thumbnail and a video and create a post for the signed-in user.
    CreatePost {
        #[command(flatten)]
        sign_in: SignIn,
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        prompt: String,
        #[arg(long, value_name = "path")]
        thumbnail: PathBuf,
        #[arg(long, value_name = "path")]
        video: PathBuf,
    },
    /// Print the display URL of a stored file.
    Preview {
        #[arg(long = "file-id", value_name = "id")]
        file_id: String,
        /// `image` or `video`.
        #[arg(long, default_value = "image")]
        kind: String,
    },
    /// Print the tab bar with one tab focused.
    Tabs {
        #[arg(long, default_value = "home")]
        focused: TabRoute,
    },
}

#[derive(Debug, Subcommand)]
enum Listing {
    /// Every post.
    All,
    /// The newest posts, newest first.
    Latest,
    /// Posts whose title matches the query.
    Search { query: String },
    /// Posts created by one user profile.
    User {
        #[arg(value_name = "profile-id")]
        user_id: String,
    },
}

#[derive(Debug, Args)]
struct SignIn {
    #[arg(long)]
    email: String,
    #[arg(long)]
    password: String,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    init_tracing();
    let cli = Cli::parse();

    if let Command::Tabs { focused } = cli.command {
        return print_json(&TabsView::new(focused));
    }

    let backend = load_backend()?;
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("failed to build Tokio runtime")?;
    runtime.block_on(run(&backend, cli.command))
}

fn load_backend() -> Result<AppwriteBackend> {
    // Subcommand flags are not settings; only env and files feed the loader.
    let settings = AppwriteSettings::load_from_iter([OsString::from("aora")])
        .wrap_err("failed to load Appwrite settings")?;
    let config = AppwriteConfig::from_settings(&settings).wrap_err("invalid Appwrite settings")?;
    debug!(endpoint = %config.endpoint, project = %config.project, "configuration loaded");
    appwrite_backend(&config).wrap_err("failed to build Appwrite client")
}

async fn run(backend: &AppwriteBackend, command: Command) -> Result<()> {
    match command {
        Command::SignUp {
            email,
            password,
            username,
        } => print_json(&backend.create_user(&email, &password, &username).await?),
        Command::Whoami(sign_in) => {
            backend.sign_in(&sign_in.email, &sign_in.password).await?;
            print_json(&backend.get_current_user().await?)
        }
        Command::SignOut(sign_in) => {
            backend.sign_in(&sign_in.email, &sign_in.password).await?;
            print_json(&backend.sign_out().await?)
        }
        Command::Posts { listing } => {
            let posts = match listing {
                Listing::All => backend.get_all_posts().await?,
                Listing::Latest => backend.get_latest_posts().await?,
                Listing::Search { query } => backend.search_posts(&query).await?,
                Listing::User { user_id } => {
                    let user_id = DocumentId::new(user_id).wrap_err("invalid profile id")?;
                    backend.get_user_posts(&user_id).await?
                }
            };
            print_json(&posts)
        }
        Command::CreatePost {
            sign_in,
            title,
            prompt,
            thumbnail,
            video,
        } => {
            backend.sign_in(&sign_in.email, &sign_in.password).await?;
            let user = backend
                .get_current_user()
                .await?
                .ok_or_else(|| eyre!("signed-in account has no user profile"))?;
            let form = CreateVideoPostForm {
                title,
                prompt,
                thumbnail: read_asset(&thumbnail).await?,
                video: read_asset(&video).await?,
                user_id: user.id,
            };
            print_json(&backend.create_video_post(&form).await?)
        }
        Command::Preview { file_id, kind } => {
            let file_id = FileId::new(file_id).wrap_err("invalid file id")?;
            let kind: FileKind = kind.parse()?;
            print_json(&backend.get_file_preview(&file_id, kind)?)
        }
        Command::Tabs { focused } => print_json(&TabsView::new(focused)),
    }
}

async fn read_asset(path: &Path) -> Result<MediaAsset> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| eyre!("{} is not a file path", path.display()))?;
    Ok(MediaAsset {
        mime_type: mime_type_for(path).to_owned(),
        file_name,
        bytes,
    })
}

fn mime_type_for(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase());
    match extension.as_deref() {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("mp4") => "video/mp4",
        Some("mov") => "video/quicktime",
        Some("webm") => "video/webm",
        _ => "application/octet-stream",
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TabsView {
    bar: TabBar,
    indicators: Vec<TabIndicator>,
}

impl TabsView {
    fn new(focused: TabRoute) -> Self {
        let bar = app_tabs();
        let indicators = bar.render(focused);
        Self { bar, indicators }
    }
}

fn print_json(value: &impl Serialize) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).wrap_err("failed to render output")?;
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{rendered}").wrap_err("failed to write output")
}
