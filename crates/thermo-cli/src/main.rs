//! thermoctl - command-line client for the thermostat protocol.

mod config;
mod error;
mod parse;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::{Local, NaiveDateTime};
use clap::{Parser, Subcommand};
use thermo_protocol::{ScheduleEntry, ScheduleKind, TemperatureSchedule};
use thermo_session::emulator::{run_listener, DeviceState};
use thermo_session::Session;
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tracing::{debug, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::CliConfig;
use crate::error::{CliError, Result};
use crate::parse::{parse_entry, parse_local_time};

#[derive(Parser, Debug)]
#[command(author, version, about = "Talk to a thermostat over its binary protocol", long_about = None)]
struct Args {
    /// Path to a YAML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Device address (overrides the config file)
    #[arg(short, long, value_name = "HOST:PORT")]
    addr: Option<String>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Show current and target temperature
    Temps,

    /// Show the device key fragment
    KeyPart,

    /// Set the device clock (defaults to the local time now)
    SetTime {
        /// RFC 3339 or `YYYY-MM-DD HH:MM[:SS]` local time
        #[arg(value_parser = parse_local_time)]
        time: Option<NaiveDateTime>,
    },

    /// Set the target temperature (°F)
    SetTarget { degrees_f: u8 },

    /// Show one schedule, or both if no kind is given
    GetSchedule {
        /// `weekday` or `weekend`
        kind: Option<ScheduleKind>,
    },

    /// Replace a schedule with three `HH:MM=F` entries
    SetSchedule {
        /// `weekday` or `weekend`
        kind: ScheduleKind,

        #[arg(value_parser = parse_entry, num_args = 3, required = true, value_name = "HH:MM=F")]
        entries: Vec<ScheduleEntry>,
    },

    /// Run an emulated thermostat
    Emulate {
        /// Address to listen on
        #[arg(short, long, default_value = config::DEFAULT_ADDR)]
        listen: SocketAddr,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let mut config = match &args.config {
        Some(path) => CliConfig::from_file(path)?,
        None => CliConfig::default(),
    };
    if let Some(addr) = args.addr {
        config.addr = addr;
    }

    match args.command {
        Commands::Emulate { listen } => {
            let state = Arc::new(Mutex::new(DeviceState::default()));
            run_listener(listen, state).await.map_err(CliError::Emulator)
        }
        command => {
            let session = connect(&config).await?;
            run_command(&session, command).await
        }
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();
}

async fn connect(config: &CliConfig) -> Result<Session<TcpStream>> {
    debug!(addr = %config.addr, "connecting");
    let stream = tokio::time::timeout(config.session.timeout(), TcpStream::connect(&config.addr))
        .await
        .map_err(|_| CliError::ConnectTimeout(config.addr.clone()))?
        .map_err(|source| CliError::Connect {
            addr: config.addr.clone(),
            source,
        })?;
    stream.set_nodelay(true).map_err(|source| CliError::Connect {
        addr: config.addr.clone(),
        source,
    })?;
    info!(addr = %config.addr, "connected");
    Ok(Session::new(stream, config.session.clone()))
}

async fn run_command(session: &Session<TcpStream>, command: Commands) -> Result<()> {
    match command {
        Commands::Temps => {
            let temps = session.get_temps().await?;
            println!("current: {}°F", temps.current_f);
            println!("target:  {}°F", temps.target_f);
        }
        Commands::KeyPart => {
            println!("{}", session.get_key_part().await?.to_hex());
        }
        Commands::SetTime { time } => {
            let local = time.unwrap_or_else(|| Local::now().naive_local());
            session.set_date_time(local).await?;
            println!("clock set to {}", local.format("%Y-%m-%d %H:%M:%S"));
        }
        Commands::SetTarget { degrees_f } => {
            session.set_target_temp(degrees_f).await?;
            println!("target set to {}°F", degrees_f);
        }
        Commands::GetSchedule { kind: Some(kind) } => {
            println!("{}: {}", kind, session.get_schedule(kind).await?);
        }
        Commands::GetSchedule { kind: None } => {
            let week = session.get_week_schedules().await?;
            println!("{}: {}", ScheduleKind::Weekday, week.weekday);
            println!("{}: {}", ScheduleKind::Weekend, week.weekend);
        }
        Commands::SetSchedule { kind, entries } => {
            let schedule = schedule_from_entries(&entries)?;
            session.set_schedule(kind, &schedule).await?;
            println!("{}: {}", kind, schedule.sorted());
        }
        Commands::Emulate { .. } => {
            return Err(CliError::InvalidArgument(
                "emulate does not talk to a device".to_string(),
            ))
        }
    }
    Ok(())
}

fn schedule_from_entries(entries: &[ScheduleEntry]) -> Result<TemperatureSchedule> {
    let entries = entries.try_into().map_err(|_| {
        CliError::InvalidArgument(format!(
            "a schedule needs exactly {} entries, got {}",
            thermo_protocol::SCHEDULE_OPTION_COUNT,
            entries.len()
        ))
    })?;
    Ok(TemperatureSchedule::new(entries))
}
