#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

//! CLI that sorts IMAP mailboxes into a year/month folder structure

use clap::Parser;
use mail_archiver::{
    ArchiveConfig, Archiver, ImapConfig, ImapMailSession, RunContext, Security, Summary, connect,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mail-archiver", version)]
#[command(about = "Automatically sort your emails into a year-month folder structure")]
#[allow(clippy::struct_excessive_bools)]
struct Args {
    /// IMAP host
    #[arg(short = 'H', long, env = "IMAP_HOST")]
    host: Option<String>,

    /// IMAP port (default: 993 for tls, 143 for starttls)
    #[arg(short, long, env = "IMAP_PORT")]
    port: Option<u16>,

    /// IMAP user
    #[arg(short, long, env = "IMAP_USERNAME")]
    user: Option<String>,

    /// IMAP password
    #[arg(long, visible_alias = "pw", env = "IMAP_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Connection security: tls or starttls
    #[arg(long, env = "IMAP_SECURITY", default_value = "tls", value_parser = parse_security)]
    security: Security,

    /// Accept any server certificate
    #[arg(long, env = "IMAP_ACCEPT_INVALID_CERTS")]
    insecure: bool,

    /// Main archive folder
    #[arg(short, long)]
    archive: Option<String>,

    /// Mailbox to process (repeatable)
    #[arg(long = "mbox", value_name = "MAILBOX")]
    mailboxes: Vec<String>,

    /// Mailbox to process together with everything below it (repeatable)
    #[arg(long = "rmbox", value_name = "MAILBOX")]
    recursive_mailboxes: Vec<String>,

    /// Mailbox prefix to ignore, overrides --mbox and --rmbox (repeatable)
    #[arg(long = "imbox", value_name = "PREFIX")]
    ignore_mailboxes: Vec<String>,

    /// Skip mails from the current month
    #[arg(long)]
    skip_current: bool,

    /// Perform a dry run, nothing will be changed on the IMAP server
    #[arg(long)]
    dry: bool,

    /// Print the summary as JSON
    #[arg(long)]
    json: bool,
}

impl Args {
    fn imap_config(&self) -> ImapConfig {
        ImapConfig {
            host: self.host.clone().unwrap_or_default(),
            port: self.port.unwrap_or_else(|| self.security.default_port()),
            username: self.user.clone().unwrap_or_default(),
            password: self.password.clone().unwrap_or_default(),
            security: self.security,
            accept_invalid_certs: self.insecure,
        }
    }

    fn archive_config(&self) -> ArchiveConfig {
        ArchiveConfig {
            archive_root: self.archive.clone().unwrap_or_default(),
            mailboxes: self.mailboxes.clone(),
            recursive_mailboxes: self.recursive_mailboxes.clone(),
            ignore_mailboxes: self.ignore_mailboxes.clone(),
            skip_current_month: self.skip_current,
            dry_run: self.dry,
        }
    }
}

fn parse_security(s: &str) -> Result<Security, String> {
    s.parse().map_err(|e: mail_archiver::Error| e.to_string())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|_| anyhow::anyhow!("Failed to install rustls crypto provider"))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    dotenvy::dotenv().ok();
    let args = Args::parse();

    let archive = args.archive_config();
    archive.validate()?;
    let imap = args.imap_config();
    imap.validate()?;

    if archive.dry_run {
        info!("DRY RUN");
    }

    let mut session = ImapMailSession::new(connect(&imap).await?);
    let mut summary = Summary {
        dry_run: archive.dry_run,
        ..Summary::default()
    };
    let outcome = run(&mut session, &archive, &mut summary).await;
    session.logout().await;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("Done! {summary}");
    }

    outcome?;
    Ok(())
}

/// Archive every selected mailbox, leaving the totals in `summary`
/// whether or not the run completes.
async fn run(
    session: &mut ImapMailSession,
    config: &ArchiveConfig,
    summary: &mut Summary,
) -> mail_archiver::Result<()> {
    let mut ctx = RunContext::load(session, config.dry_run).await?;
    let archiver = Archiver::new(config, session).await?;
    let outcome = archiver.run(session, &mut ctx).await;
    *summary = ctx.summary;
    outcome
}
