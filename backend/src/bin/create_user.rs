//! Provision a user in the PostgreSQL message store.
//!
//! Users are created outside the HTTP surface; this command hashes the
//! password, inserts the record, and prints the new user's id so it can be
//! used as a message `author`.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::env;

use clap::Parser;
use color_eyre::eyre::{Context, Result, eyre};
use tokio::runtime::Builder;

use message_board::domain::NewUser;
use message_board::domain::ports::UserRepository;
use message_board::outbound::persistence::{
    DbPool, DieselUserRepository, PoolConfig, run_migrations,
};

const DATABASE_URL_ENV: &str = "MESSAGE_BOARD_DATABASE_URL";

/// `create-user` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "create-user",
    about = "Create a message board user and print its id",
    version
)]
struct CliArgs {
    /// Unique username for the new user.
    #[arg(long, value_name = "name")]
    username: String,
    /// Plain-text password; only its Argon2 digest is stored.
    #[arg(long, value_name = "password")]
    password: String,
    /// Database connection URL. Falls back to `MESSAGE_BOARD_DATABASE_URL`.
    #[arg(long = "database-url", value_name = "url")]
    database_url: Option<String>,
    /// Skip applying pending migrations first.
    #[arg(long)]
    skip_migrations: bool,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = CliArgs::parse();
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("create Tokio runtime")?;
    runtime.block_on(async_main(args))
}

#[expect(clippy::print_stdout, reason = "the new user id is the command output")]
async fn async_main(args: CliArgs) -> Result<()> {
    let database_url = resolve_database_url(args.database_url, env::var(DATABASE_URL_ENV).ok())?;
    let new_user = NewUser::try_new(&args.username, &args.password).wrap_err("invalid user")?;

    if !args.skip_migrations {
        let url = database_url.clone();
        tokio::task::spawn_blocking(move || run_migrations(&url))
            .await
            .wrap_err("join migration task")?
            .wrap_err("apply database migrations")?;
    }

    let pool = DbPool::new(PoolConfig::new(&database_url))
        .await
        .wrap_err("create database pool")?;
    let repo = DieselUserRepository::new(pool);
    let user = repo.insert(&new_user).await.wrap_err("insert user")?;

    println!("{}", user.id());
    Ok(())
}

fn resolve_database_url(explicit: Option<String>, from_env: Option<String>) -> Result<String> {
    match explicit.or(from_env) {
        Some(url) if !url.trim().is_empty() => Ok(url),
        Some(_) => Err(eyre!("database URL must not be empty")),
        None => Err(eyre!(
            "database URL missing: set --database-url or {DATABASE_URL_ENV}"
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Some("postgres://flag"), Some("postgres://env"), "postgres://flag")]
    #[case(None, Some("postgres://env"), "postgres://env")]
    fn explicit_url_wins_over_environment(
        #[case] explicit: Option<&str>,
        #[case] from_env: Option<&str>,
        #[case] expected: &str,
    ) {
        let url = resolve_database_url(explicit.map(str::to_owned), from_env.map(str::to_owned))
            .expect("url resolves");
        assert_eq!(url, expected);
    }

    #[rstest]
    #[case(None, None)]
    #[case(Some("   "), None)]
    fn missing_or_blank_urls_are_rejected(
        #[case] explicit: Option<&str>,
        #[case] from_env: Option<&str>,
    ) {
        let result =
            resolve_database_url(explicit.map(str::to_owned), from_env.map(str::to_owned));
        assert!(result.is_err());
    }
}
