use anyhow::{anyhow, Context, Result};
use bookshelf_core::{
    AuthClient, AuthConfig, AuthContext, AuthError, AuthStatus, BackendKind, Credentials,
};
use clap::{Args, Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod dev_server;

#[derive(Parser, Debug)]
#[command(author, version, about = "Bookshelf session client", long_about = None)]
struct Cli {
    #[command(flatten)]
    session: SessionArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug)]
struct SessionArgs {
    /// Auth endpoint base URL (defaults to BOOKSHELF_AUTH_URL)
    #[arg(long, global = true)]
    auth_url: Option<String>,
    /// Directory holding the session file
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
    /// Where the session token is kept: memory, file or keyring
    #[arg(long, global = true, default_value_t = BackendKind::File)]
    store: BackendKind,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Sign in and store the session token
    Login {
        #[arg(long)]
        username: String,
    },
    /// Create an account and store the session token
    Register {
        #[arg(long)]
        username: String,
    },
    /// Forget the stored session token
    Logout,
    /// Report whether a session token is stored
    Status,
    /// Run the development proxy
    ServeDev {
        #[arg(long, default_value = "127.0.0.1:3000")]
        addr: SocketAddr,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    let cli = Cli::parse();
    match cli.command {
        Commands::Login { username } => login_command(&cli.session, username, false).await,
        Commands::Register { username } => login_command(&cli.session, username, true).await,
        Commands::Logout => logout_command(&cli.session).await,
        Commands::Status => status_command(&cli.session),
        Commands::ServeDev { addr } => dev_server::serve(addr).await,
    }
}

fn build_context(args: &SessionArgs) -> Result<AuthContext> {
    let config = match &args.auth_url {
        Some(url) => AuthConfig::with_base_url(url.clone()),
        None => AuthConfig::from_env(),
    };
    let store = args
        .store
        .open(args.data_dir.clone())
        .context("open session store")?;
    let client = AuthClient::new(&config, store)?;
    Ok(AuthContext::new(client))
}

async fn login_command(args: &SessionArgs, username: String, register: bool) -> Result<()> {
    let ctx = build_context(args)?;
    let password = rpassword::prompt_password("Password: ")?;
    let credentials = Credentials::new(username, password);
    let outcome = if register {
        ctx.register(&credentials).await
    } else {
        ctx.login(&credentials).await
    };
    match outcome {
        Ok(user) => {
            println!("Signed in as {}", user.username);
            Ok(())
        }
        Err(err) => Err(describe_failure(err)),
    }
}

async fn logout_command(args: &SessionArgs) -> Result<()> {
    let ctx = build_context(args)?;
    ctx.logout().await?;
    println!("Signed out");
    Ok(())
}

fn status_command(args: &SessionArgs) -> Result<()> {
    let ctx = build_context(args)?;
    match ctx.bootstrap() {
        AuthStatus::Authenticated { .. } => println!("Authenticated ({} store)", args.store),
        AuthStatus::Anonymous => println!("Anonymous"),
    }
    Ok(())
}

fn describe_failure(err: AuthError) -> anyhow::Error {
    if let Some(message) = err.message() {
        return anyhow!("{message}");
    }
    if let AuthError::Rejected { status, payload } = &err {
        info!(%status, "server rejected request");
        return anyhow!("server rejected request: {payload}");
    }
    err.into()
}
