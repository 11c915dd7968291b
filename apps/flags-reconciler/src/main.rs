mod config;
mod logging;
mod wiring;

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};
use feature_flags::GuildId;

use crate::config::AppConfig;

/// Guild feature flags reconciler
#[derive(Parser)]
#[command(name = "flags-reconciler")]
#[command(about = "Reconcile and inspect guild feature flags")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print effective configuration (YAML) and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Recompute flags for the given guilds (all configured guilds if none)
    Reconcile {
        #[arg(short, long = "guild")]
        guilds: Vec<GuildId>,
    },
    /// Print a guild's stored flags
    Show {
        #[arg(short, long)]
        guild: GuildId,
    },
    /// Exit non-zero unless the guild has the flag
    Has {
        #[arg(short, long)]
        guild: GuildId,
        #[arg(short, long)]
        flag: String,
    },
    /// Validate configuration and exit
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(ref path) = cli.config
        && !Path::new(path).is_file()
    {
        anyhow::bail!("config file does not exist: {}", path.display());
    }

    let config = AppConfig::load(cli.config.as_deref())?;

    if cli.print_config {
        println!("{}", config.to_yaml()?);
        return Ok(());
    }

    logging::init(&config.logging, cli.verbose);
    tracing::info!("flags-reconciler starting");

    match cli.command.unwrap_or(Commands::Reconcile { guilds: Vec::new() }) {
        Commands::Reconcile { guilds } => reconcile(&config, guilds).await,
        Commands::Show { guild } => show(&config, guild).await,
        Commands::Has { guild, flag } => has(&config, guild, &flag).await,
        Commands::Check => check(&config),
    }
}

async fn reconcile(config: &AppConfig, guilds: Vec<GuildId>) -> Result<()> {
    let guilds = if guilds.is_empty() {
        wiring::known_guilds(config)
    } else {
        guilds
    };
    let module = wiring::build(config);
    let service = module.service();

    let mut failed = 0usize;
    for guild_id in guilds {
        let report = service.reconcile_guild(guild_id).await?;
        if !report.is_success() {
            failed += 1;
        }
        let flags = service.get_guild_flags(guild_id).await?;
        println!(
            "{}",
            serde_json::json!({
                "guild_id": guild_id,
                "flags": &*flags,
                "applied": report.applied.iter().map(|o| &o.plugin).collect::<Vec<_>>(),
                "failures": report.failures.iter().map(ToString::to_string).collect::<Vec<_>>(),
            })
        );
    }

    if failed > 0 {
        anyhow::bail!("{failed} guild(s) reconciled with plugin failures");
    }
    Ok(())
}

async fn show(config: &AppConfig, guild_id: GuildId) -> Result<()> {
    let client = wiring::build(config).client();
    let flags = client.get_guild_flags(guild_id).await?;
    println!("{}", serde_json::to_string_pretty(&flags)?);
    Ok(())
}

async fn has(config: &AppConfig, guild_id: GuildId, flag: &str) -> Result<()> {
    let client = wiring::build(config).client();
    if client.guild_has_flag(guild_id, flag).await? {
        println!("true");
        Ok(())
    } else {
        anyhow::bail!("guild {guild_id} does not have flag {flag}")
    }
}

fn check(config: &AppConfig) -> Result<()> {
    tracing::info!("Checking configuration...");
    for plugin in &config.plugins {
        for guild in &plugin.guilds {
            for flag in &guild.active {
                if !plugin.flags.contains(flag) {
                    tracing::warn!(
                        plugin = %plugin.sys_name,
                        guild_id = guild.id,
                        flag = %flag,
                        "Active flag is not declared by the plugin and will be dropped"
                    );
                }
            }
        }
    }
    println!("Configuration is valid");
    println!("{}", config.to_yaml()?);
    Ok(())
}
