//! admember - add a user to an Active Directory group over LDAP
//!
//! Binds with an administrative account, looks up the group and the user by
//! name and adds the user to the group's `member` attribute if missing.

mod report;

use admember_core::{updater, Credential, Error, MemberConfig, Outcome, Progress};
use admember_ldap::{LdapDirectory, LdapSettings};
use clap::Parser;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "admember")]
#[command(version = admember_core::VERSION)]
#[command(about = "Add a user to an Active Directory group using LDAP", long_about = None)]
struct Cli {
    /// The domain name of the Active Directory server
    #[arg(short = 'd', long, env = "ADMEMBER_DOMAIN")]
    domain: String,

    /// The name of the group to add the user to
    #[arg(short = 'g', long, env = "ADMEMBER_GROUP")]
    group: String,

    /// The username of the user to add
    #[arg(short = 'a', long, env = "ADMEMBER_ADDUSER")]
    adduser: String,

    /// The username with AddMember privilege
    #[arg(short = 'u', long, env = "ADMEMBER_USER")]
    user: String,

    /// Password of the user (optional if --hash is provided)
    #[arg(short = 'p', long, env = "ADMEMBER_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// NTLM hash in the format LMHASH:NTHASH (LMHASH usually set to aad3b435b51404eeaad3b435b51404ee)
    #[arg(long, env = "ADMEMBER_HASH", hide_env_values = true)]
    hash: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "ADMEMBER_LOG_LEVEL", default_value = "warn")]
    log_level: String,
}

impl Cli {
    fn into_config(self) -> admember_core::Result<MemberConfig> {
        let credential = Credential::resolve(self.password, self.hash)?;
        Ok(MemberConfig::new(
            self.domain,
            self.group,
            self.adduser,
            self.user,
            credential,
        ))
    }
}

fn main() -> ExitCode {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Initialize logging; stdout is reserved for the report lines
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(filter)
        .init();

    let config = match cli.into_config() {
        Ok(config) => config,
        Err(e) => return report::failure(&e),
    };

    match execute(&config) {
        Ok(outcome) => report::success(outcome),
        Err(e) => report::failure(&e),
    }
}

/// Drive one run on a single-threaded runtime
fn execute(config: &MemberConfig) -> admember_core::Result<Outcome> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| Error::Other(anyhow::Error::new(e).context("failed to start runtime")))?;

    runtime.block_on(async {
        let mut directory = LdapDirectory::new(LdapSettings::for_domain(&config.domain));
        debug!("Directory server: {}", directory.settings().server_url);

        let result = updater::run(&mut directory, config, |progress| {
            if let Progress::Bound = progress {
                report::connected();
            }
        })
        .await;

        directory.close().await;
        result
    })
}
