//! CLI argument definitions for the Virtdeck binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Virtdeck cluster console
#[derive(Parser, Debug)]
#[command(name = "virtdeck")]
#[command(about = "Virtdeck: authorization-aware virtualization cluster console")]
#[command(version)]
pub struct Cli {
    /// Path to the connection profiles file
    #[arg(long, env = "VIRTDECK_PROFILES")]
    pub profiles: Option<PathBuf>,

    /// Named connection profile to use
    #[arg(short, long, env = "VIRTDECK_PROFILE")]
    pub profile: Option<String>,

    /// Bridge endpoint origin, overriding any profile
    #[arg(short, long, env = "VIRTDECK_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Per-request timeout in seconds, overriding any profile
    #[arg(long, env = "VIRTDECK_TIMEOUT")]
    pub timeout: Option<u64>,

    /// Emit JSON instead of tables
    #[arg(long)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the current operator
    Whoami,
    /// List cluster hosts
    Nodes,
    /// List virtual machines on a node
    Vms(NodeArgs),
    /// List containers on a node
    Cts(NodeArgs),
    /// List storage pools
    Storage {
        /// Limit to one node
        #[arg(short, long)]
        node: Option<String>,
    },
    /// List user accounts
    Users,
    /// Start a guest
    Start(GuestArgs),
    /// Hard-stop a guest
    Stop(GuestArgs),
    /// Reboot a guest
    Reboot(GuestArgs),
    /// Gracefully shut down a guest
    Shutdown(GuestArgs),
    /// Suspend a virtual machine
    Suspend(GuestArgs),
    /// Resume a suspended virtual machine
    Resume(GuestArgs),
    /// Hard-reset a virtual machine
    Reset(GuestArgs),
    /// Save a connection profile
    SaveProfile(SaveProfileArgs),
}

/// Arguments for node-scoped listings
#[derive(clap::Args, Debug)]
pub struct NodeArgs {
    /// Node to list
    #[arg(short, long, env = "VIRTDECK_NODE")]
    pub node: String,
}

/// Arguments for guest power control
#[derive(clap::Args, Debug)]
pub struct GuestArgs {
    /// Node hosting the guest
    #[arg(short, long, env = "VIRTDECK_NODE")]
    pub node: String,

    /// Guest id
    pub vmid: u32,

    /// Target a container instead of a virtual machine
    #[arg(long)]
    pub ct: bool,
}

/// Arguments for saving a connection profile
#[derive(clap::Args, Debug)]
pub struct SaveProfileArgs {
    /// Profile name
    pub name: String,

    /// Bridge endpoint origin, e.g. http://127.0.0.1:8006
    pub endpoint: String,

    /// Per-request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Make this the default profile
    #[arg(long)]
    pub default: bool,
}
