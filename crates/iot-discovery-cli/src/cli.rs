//! CLI argument definitions using clap.

use std::net::Ipv4Addr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// IoT discovery server - find headless devices on the local network
#[derive(Parser, Debug)]
#[command(name = "iot-discovery")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbose logging (repeat for more detail)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// JSON configuration file
    #[arg(long, global = true, env = "IOT_DISCOVERY_CONFIG")]
    pub config: Option<PathBuf>,

    /// UDP port for requests and announcements
    #[arg(long, global = true, env = "IOT_DISCOVERY_PORT")]
    pub port: Option<u16>,

    /// Seconds between discovery broadcasts
    #[arg(long, global = true, env = "IOT_DISCOVERY_INTERVAL")]
    pub interval: Option<u64>,

    /// IPv4 address advertised in discovery requests (detected when omitted)
    #[arg(long, global = true, env = "IOT_DISCOVERY_ADVERTISE_IP")]
    pub advertise_ip: Option<Ipv4Addr>,

    /// Share the UDP port with other reuse-enabled listeners
    #[arg(long, global = true, env = "IOT_DISCOVERY_REUSE_PORT")]
    pub reuse_port: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the discovery server and show the roster as it changes
    Serve(ServeArgs),

    /// Discover devices for a fixed duration and print the result
    Discover(DiscoverArgs),
}

// ==================== Serve ====================

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Only show devices whose name matches this pattern (* and ? wildcards)
    #[arg(long)]
    pub name: Option<String>,
}

// ==================== Discover ====================

#[derive(Args, Debug)]
pub struct DiscoverArgs {
    /// Discovery duration in seconds
    #[arg(short, long, default_value = "5")]
    pub duration: u64,

    /// Only show devices whose name matches this pattern (* and ? wildcards)
    #[arg(long)]
    pub name: Option<String>,

    /// Also write the roster to this file as JSON
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}
