use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::{Arg, ArgAction, ArgMatches, Command};
use hcc_jira_api::JiraClient;
use hcc_mcp::{FeoMcpCore, JiraMcpCore, McpHttpServer, SchemaCache, resolve_bind_address, serve_stdio};
use hcc_util::rules::{SyncReport, check_rules, convert_agents};
use hcc_util::{CredentialStore, Credentials, expand_tilde, resolve_credentials};
use rmcp::ServerHandler;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let matches = build_cli().get_matches();

    match run(&matches).await {
        Ok(code) => code,
        Err(error) => {
            match matches.subcommand() {
                Some(("jira", sub)) if sub.subcommand_name() == Some("serve") => {
                    error!("Failed to start HCC JIRA MCP server: {error:#}");
                }
                Some(("feo", _)) => error!("Failed to start HCC FEO MCP server: {error:#}"),
                _ => error!("{error:#}"),
            }
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr; stdout carries the MCP stdio transport.
fn init_tracing() {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn bind_arg() -> Arg {
    Arg::new("bind")
        .long("bind")
        .action(ArgAction::Set)
        .value_name("ADDR")
        .help("Serve streamable HTTP on a loopback address instead of stdio")
}

fn dir_arg(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name)
        .long(name)
        .action(ArgAction::Set)
        .value_name("DIR")
        .required(true)
        .help(help)
}

fn build_cli() -> Command {
    let jira = Command::new("jira")
        .about("JIRA MCP server and credentials")
        .subcommand_required(true)
        .subcommand(Command::new("serve").about("Start the JIRA MCP server").arg(bind_arg()))
        .subcommand(
            Command::new("login")
                .about("Store JIRA credentials")
                .arg(
                    Arg::new("base-url")
                        .long("base-url")
                        .action(ArgAction::Set)
                        .value_name("URL")
                        .required(true)
                        .help("JIRA instance URL, e.g. https://issues.redhat.com"),
                )
                .arg(
                    Arg::new("token")
                        .long("token")
                        .action(ArgAction::Set)
                        .help("Personal access token; read from stdin when omitted"),
                ),
        )
        .subcommand(Command::new("logout").about("Delete stored JIRA credentials"))
        .subcommand(Command::new("status").about("Report whether JIRA credentials are stored"));

    let feo = Command::new("feo")
        .about("Frontend Operator MCP server")
        .subcommand_required(true)
        .subcommand(
            Command::new("serve")
                .about("Start the FEO MCP server")
                .arg(bind_arg())
                .arg(
                    Arg::new("schema-url")
                        .long("schema-url")
                        .action(ArgAction::Set)
                        .value_name("URL")
                        .help("Schema location; defaults to FEO_SCHEMA_URL or the published schema"),
                ),
        );

    let rules = Command::new("rules")
        .about("Keep Cursor rules in sync with Claude agents")
        .subcommand_required(true)
        .subcommand(
            Command::new("convert")
                .about("Convert agent files into .mdc rule files")
                .arg(dir_arg("agents", "Directory holding hcc-* agent markdown files"))
                .arg(dir_arg("rules", "Directory receiving the generated rules")),
        )
        .subcommand(
            Command::new("check")
                .about("Fail when the rule files are out of sync with the agents")
                .arg(dir_arg("agents", "Directory holding hcc-* agent markdown files"))
                .arg(dir_arg("rules", "Directory holding the generated rules")),
        );

    Command::new("hcc")
        .about("HCC MCP servers and tooling")
        .version(env!("CARGO_PKG_VERSION"))
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(jira)
        .subcommand(feo)
        .subcommand(rules)
}

async fn run(matches: &ArgMatches) -> Result<ExitCode> {
    let (group, group_matches) = matches.subcommand().context("expected a command group")?;
    let (command, command_matches) = group_matches
        .subcommand()
        .context("expected a command under the group")?;

    match (group, command) {
        ("jira", "serve") => serve_jira(command_matches.get_one::<String>("bind")).await,
        ("jira", "login") => login(command_matches).await,
        ("jira", "logout") => logout().await,
        ("jira", "status") => status().await,
        ("feo", "serve") => serve_feo(command_matches).await,
        ("rules", "convert") => convert(command_matches),
        ("rules", "check") => check(command_matches),
        (group, command) => bail!("unknown command: {group} {command}"),
    }
}

async fn serve_jira(bind: Option<&String>) -> Result<ExitCode> {
    let store = CredentialStore::default();
    let (credentials, _source) = resolve_credentials(&store).await?;
    let client = JiraClient::new(&credentials)?;
    info!(base_url = %client.base_url(), "starting HCC JIRA MCP server");
    serve(JiraMcpCore::new(Arc::new(client)), bind).await
}

async fn serve_feo(matches: &ArgMatches) -> Result<ExitCode> {
    let cache = match matches.get_one::<String>("schema-url") {
        Some(url) => SchemaCache::new(url.clone()),
        None => SchemaCache::from_env(),
    };
    info!(schema = %cache.source_location(), "starting HCC FEO MCP server");
    serve(FeoMcpCore::new(Arc::new(cache)), matches.get_one::<String>("bind")).await
}

async fn serve<S>(handler: S, bind: Option<&String>) -> Result<ExitCode>
where
    S: ServerHandler + Clone,
{
    match bind {
        Some(address) => {
            let address = resolve_bind_address(Some(address))?;
            McpHttpServer::new(address, handler).run_until_interrupted().await?;
        }
        None => serve_stdio(handler).await?,
    }
    Ok(ExitCode::SUCCESS)
}

async fn login(matches: &ArgMatches) -> Result<ExitCode> {
    let base_url = matches
        .get_one::<String>("base-url")
        .context("--base-url is required")?
        .trim()
        .to_string();
    let token = match matches.get_one::<String>("token") {
        Some(token) => token.trim().to_string(),
        None => read_token_from_stdin().await?,
    };
    if token.is_empty() {
        bail!("no API token provided");
    }

    let credentials = Credentials::new(base_url, token);
    // Reject malformed URLs before anything is persisted.
    JiraClient::new(&credentials)?;

    let store = CredentialStore::default();
    store.store(&credentials).await?;
    println!("JIRA credentials stored for {}", credentials.base_url);
    println!("Config file: {}", store.config_file().display());
    Ok(ExitCode::SUCCESS)
}

async fn read_token_from_stdin() -> Result<String> {
    eprintln!("Enter JIRA API token:");
    let mut line = String::new();
    BufReader::new(tokio::io::stdin())
        .read_line(&mut line)
        .await
        .context("failed to read API token from stdin")?;
    Ok(line.trim().to_string())
}

async fn logout() -> Result<ExitCode> {
    CredentialStore::default().delete().await?;
    println!("JIRA credentials removed");
    Ok(ExitCode::SUCCESS)
}

async fn status() -> Result<ExitCode> {
    let store = CredentialStore::default();
    if store.exists().await {
        println!("JIRA credentials are configured ({})", store.config_file().display());
        Ok(ExitCode::SUCCESS)
    } else {
        println!("JIRA credentials not found. Run `hcc jira login --base-url <URL>` or set JIRA_BASE_URL and JIRA_API_TOKEN.");
        Ok(ExitCode::FAILURE)
    }
}

fn rule_dirs(matches: &ArgMatches) -> Result<(PathBuf, PathBuf)> {
    let agents = matches.get_one::<String>("agents").context("--agents is required")?;
    let rules = matches.get_one::<String>("rules").context("--rules is required")?;
    Ok((expand_tilde(agents), expand_tilde(rules)))
}

fn convert(matches: &ArgMatches) -> Result<ExitCode> {
    let (agents, rules) = rule_dirs(matches)?;
    let rendered = convert_agents(&agents, &rules)?;

    println!("Converted {} agent(s) into {}", rendered.rules.len(), rules.display());
    for (file, error) in &rendered.failures {
        eprintln!("  failed: {file}: {error}");
    }
    Ok(if rendered.failures.is_empty() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn check(matches: &ArgMatches) -> Result<ExitCode> {
    let (agents, rules) = rule_dirs(matches)?;
    let report = check_rules(&agents, &rules)?;
    print_report(&report);
    Ok(if report.is_in_sync() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn print_report(report: &SyncReport) {
    if report.is_in_sync() {
        println!("All {} rule file(s) are in sync", report.checked);
        return;
    }
    println!("Rule files are out of sync with the agents:");
    let sections = [
        ("failed to convert", &report.failed),
        ("missing", &report.missing),
        ("stale", &report.stale),
        ("no matching agent", &report.unexpected),
    ];
    for (label, files) in sections {
        for file in files {
            println!("  {label}: {file}");
        }
    }
    println!("Run `hcc rules convert` to regenerate them.");
}
