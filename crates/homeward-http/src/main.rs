//! Homeward server binary.
//!
//! Reads `config.toml` (or the path given with `--config`), opens the
//! SQLite store, seeds the structural roles, bootstraps the configured
//! admin account if it is missing, and serves the JSON API.
//!
//! # Password hash generation
//!
//! To generate the argon2 PHC string for `admin_password_hash` in
//! config.toml:
//!
//! ```text
//! cargo run -p homeward-http --bin homeward -- --hash-password
//! ```

use std::{
  collections::BTreeSet,
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use argon2::{Argon2, PasswordHasher, password_hash::SaltString};
use chrono::Utc;
use clap::Parser;
use homeward_core::{
  ops,
  role::Role,
  store::{Commit, EntityStore},
  user::User,
};
use homeward_http::{AppState, ServerConfig};
use homeward_store_sqlite::SqliteStore;
use rand_core::OsRng;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

#[derive(Parser)]
#[command(author, version, about = "Homeward shelter network server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Print the argon2 hash for a password entered on stdin and exit.
  #[arg(long)]
  hash_password: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  // Helper mode: hash a password and exit.
  if cli.hash_password {
    let password = read_password()?;
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
      .hash_password(password.as_bytes(), &salt)
      .map_err(|e| anyhow::anyhow!("argon2 error: {e}"))?
      .to_string();
    println!("{hash}");
    return Ok(());
  }

  // Load configuration.
  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("HOMEWARD"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  // Open the SQLite store.
  let store_path = expand_tilde(&server_cfg.store_path);
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  // Seed the structural roles before anything else touches the workflow.
  ops::roles::seed(&store)
    .await
    .context("failed to seed roles")?;

  // Bootstrap the configured admin account if it does not exist yet.
  ensure_admin(&store, &server_cfg).await?;

  let state = AppState { store: Arc::new(store) };
  let app = homeward_http::router(state);
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

/// Create the admin account named in the config when it is missing. A
/// no-op when the config carries no admin credentials or the account
/// already exists.
async fn ensure_admin(store: &SqliteStore, cfg: &ServerConfig) -> anyhow::Result<()> {
  let (Some(username), Some(email), Some(password_hash)) = (
    cfg.admin_username.as_ref(),
    cfg.admin_email.as_ref(),
    cfg.admin_password_hash.as_ref(),
  ) else {
    return Ok(());
  };

  if store
    .user_by_username(username)
    .await
    .context("admin lookup failed")?
    .is_some()
  {
    return Ok(());
  }

  let admin = User {
    user_id:       Uuid::new_v4(),
    username:      username.clone(),
    email:         email.clone(),
    password_hash: password_hash.clone(),
    roles:         BTreeSet::from([Role::User, Role::Admin]),
    created_at:    Utc::now(),
  };
  store
    .apply(Commit::new().user(admin))
    .await
    .context("failed to create admin account")?;
  tracing::info!(%username, "bootstrapped admin account");
  Ok(())
}

/// Read a password from stdin.
fn read_password() -> anyhow::Result<String> {
  use std::io::{self, BufRead, Write};
  let stdin = io::stdin();
  print!("Password: ");
  io::stdout().flush().ok();
  let mut line = String::new();
  stdin.lock().read_line(&mut line)?;
  Ok(
    line
      .trim_end_matches('\n')
      .trim_end_matches('\r')
      .to_string(),
  )
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
