//! Virtdeck CLI: the composition root.
//!
//! Loads connection profiles, wires transport -> proxy -> console, runs one
//! command and renders the result. All authorization and state logic lives
//! in the library.

mod cli;
mod output;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use virtdeck::config::{ConnectionProfile, Profiles};
use virtdeck::remote::{BridgeProxy, HttpTransport};
use virtdeck::{Console, Error};

use cli::{Cli, Commands, GuestArgs};

/// Default profiles file, next to the working directory.
const PROFILES_FILE: &str = "virtdeck-profiles.json";

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("virtdeck=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Error> {
    let profiles_path = cli
        .profiles
        .clone()
        .unwrap_or_else(|| PathBuf::from(PROFILES_FILE));

    if let Commands::SaveProfile(args) = &cli.command {
        let mut profiles = Profiles::load(&profiles_path)?;
        profiles.upsert(ConnectionProfile {
            name: args.name.clone(),
            endpoint: args.endpoint.clone(),
            request_timeout_secs: args.timeout,
        });
        if args.default {
            profiles.default_profile = Some(args.name.clone());
        }
        profiles.save(&profiles_path)?;
        println!("saved profile '{}' to {}", args.name, profiles_path.display());
        return Ok(());
    }

    let console = connect(&cli, &profiles_path).await?;
    dispatch(&cli, &console).await?;

    // Surface whatever the last attempt recorded, the same banner a UI
    // would show.
    if let Some(banner) = console.store().last_error().await {
        eprintln!("warning: {banner}");
    }
    Ok(())
}

/// Resolve the endpoint (flag beats profile), build the transport and
/// connect the facade.
async fn connect(cli: &Cli, profiles_path: &PathBuf) -> Result<Console, Error> {
    let profiles = Profiles::load(profiles_path)?;
    let profile = match &cli.profile {
        Some(name) => profiles.get(name),
        None => profiles.default_profile(),
    };

    let endpoint = cli
        .endpoint
        .clone()
        .or_else(|| profile.map(|p| p.endpoint.clone()))
        .ok_or_else(|| {
            virtdeck::remote::RemoteError::InvalidEndpoint {
                endpoint: String::new(),
                reason: "no endpoint given; pass --endpoint or save a profile".to_string(),
            }
        })?;
    let timeout = cli
        .timeout
        .or(profile.and_then(|p| p.request_timeout_secs))
        .map(Duration::from_secs);

    tracing::debug!(endpoint = %endpoint, "connecting bridge transport");
    let transport = match timeout {
        Some(timeout) => HttpTransport::with_timeout(&endpoint, timeout)?,
        None => HttpTransport::new(&endpoint)?,
    };
    let proxy = Arc::new(BridgeProxy::new(transport));
    Ok(Console::connect(proxy).await)
}

async fn dispatch(cli: &Cli, console: &Console) -> Result<(), Error> {
    match &cli.command {
        Commands::SaveProfile(_) => unreachable!("handled before connecting"),

        Commands::Whoami => match console.identity().await {
            Some(identity) => {
                println!("{}", identity.userid());
                if identity.is_superuser() {
                    println!("superuser: all permission checks bypassed");
                }
            }
            None => println!("not authenticated; all actions are denied"),
        },

        Commands::Nodes => {
            console.refresh_nodes().await;
            let nodes = console.store().nodes().await;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(nodes.as_ref())?);
            } else {
                output::print_table(
                    &["NODE", "STATUS", "CPU", "MEMORY", "UPTIME"],
                    &output::node_rows(&nodes),
                );
            }
        }

        Commands::Vms(args) => {
            let guests = console.list_vms(&args.node).await;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&guests)?);
            } else {
                output::print_table(
                    &["VMID", "NAME", "NODE", "STATUS", "UPTIME"],
                    &output::guest_rows(&guests),
                );
            }
        }

        Commands::Cts(args) => {
            let guests = console.list_containers(&args.node).await;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&guests)?);
            } else {
                output::print_table(
                    &["VMID", "NAME", "NODE", "STATUS", "UPTIME"],
                    &output::guest_rows(&guests),
                );
            }
        }

        Commands::Storage { node } => {
            let storage = console.list_storage(node.as_deref()).await;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&storage)?);
            } else {
                output::print_table(
                    &["STORAGE", "NODE", "KIND", "USED", "SCOPE"],
                    &output::storage_rows(&storage),
                );
            }
        }

        Commands::Users => {
            let users = console.list_users().await;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&users)?);
            } else {
                output::print_table(&["USERID", "STATE", "COMMENT"], &output::user_rows(&users));
            }
        }

        Commands::Start(args) => power(console, args, "start").await?,
        Commands::Stop(args) => power(console, args, "stop").await?,
        Commands::Reboot(args) => power(console, args, "reboot").await?,
        Commands::Shutdown(args) => power(console, args, "shutdown").await?,
        Commands::Suspend(args) => power(console, args, "suspend").await?,
        Commands::Resume(args) => power(console, args, "resume").await?,
        Commands::Reset(args) => power(console, args, "reset").await?,
    }
    Ok(())
}

async fn power(console: &Console, args: &GuestArgs, action: &str) -> Result<(), Error> {
    let GuestArgs { node, vmid, ct } = args;
    let result = match (action, ct) {
        ("start", false) => console.vm_start(node, *vmid).await,
        ("stop", false) => console.vm_stop(node, *vmid).await,
        ("reboot", false) => console.vm_reboot(node, *vmid).await,
        ("shutdown", false) => console.vm_shutdown(node, *vmid).await,
        ("suspend", false) => console.vm_suspend(node, *vmid).await,
        ("resume", false) => console.vm_resume(node, *vmid).await,
        ("reset", false) => console.vm_reset(node, *vmid).await,
        ("start", true) => console.ct_start(node, *vmid).await,
        ("stop", true) => console.ct_stop(node, *vmid).await,
        ("reboot", true) => console.ct_reboot(node, *vmid).await,
        ("shutdown", true) => console.ct_shutdown(node, *vmid).await,
        (other, true) => {
            eprintln!("error: containers do not support '{other}'");
            std::process::exit(2);
        }
        _ => unreachable!("power actions are fixed by the CLI"),
    };
    result?;
    println!("{action} acknowledged for {} {vmid}", if *ct { "ct" } else { "vm" });
    Ok(())
}
