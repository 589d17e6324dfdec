//! Network interface manager entry point

use clap::{Parser, Subcommand};
use tracing::error;

use netifmgrd::{ApplySettings, InterfaceConfig, NetIfMgr, RouteSpec};
use rcnet_common::{FieldValues, NetCfgError, NetCfgResult};

#[derive(Parser)]
#[command(name = "netifmgrd", about = "FreeBSD rc.conf network interface and route manager")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build (and persist) the rc.conf entries for an interface
    Interface {
        /// Interface name (e.g., em0.0, gif0)
        iface: String,
        /// Interface kind: alias or gre
        #[arg(long)]
        kind: String,
        /// Interface address
        #[arg(long)]
        ipaddr: String,
        /// Interface netmask
        #[arg(long)]
        netmask: String,
        /// Type-specific option as key=value (e.g., tunnel_peer=5.6.7.8)
        #[arg(long = "opt", value_parser = parse_key_val)]
        opts: Vec<(String, String)>,
        /// Mark the interface as administratively disabled
        #[arg(long)]
        disabled: bool,
        /// Print the lines without writing them
        #[arg(long)]
        dry_run: bool,
    },
    /// Build (and persist) static routes for an interface
    Routes {
        /// Interface name (e.g., em0)
        iface: String,
        /// Route as name,ipaddr,netmask,gateway (repeatable)
        #[arg(long = "route", required = true)]
        routes: Vec<String>,
        /// Print the lines without writing them
        #[arg(long)]
        dry_run: bool,
    },
    /// Read back the static routes configured for an interface
    GetRoutes {
        /// Interface name (e.g., em0)
        iface: String,
    },
    /// Restart the interface subsystem for an interface
    Up {
        /// Interface name
        iface: String,
    },
    /// Take an interface down
    Down {
        /// Interface name
        iface: String,
    },
    /// Apply global network configuration
    Apply {
        /// Apply a hostname change first
        #[arg(long)]
        apply_hostname: bool,
        /// The hostname to apply
        #[arg(long)]
        hostname: Option<String>,
        /// Log a reboot-required notice instead of restarting the network
        #[arg(long)]
        require_reboot: bool,
    },
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected key=value, got '{}'", s))
}

fn parse_route(s: &str) -> NetCfgResult<RouteSpec> {
    let fields: Vec<&str> = s.split(',').collect();
    match fields.as_slice() {
        [name, ipaddr, netmask, gateway] => {
            Ok(RouteSpec::new(*name, *ipaddr, *netmask, *gateway))
        }
        _ => Err(NetCfgError::invalid_config(
            "route",
            format!("expected name,ipaddr,netmask,gateway, got '{}'", s),
        )),
    }
}

async fn run(cli: Cli) -> NetCfgResult<bool> {
    let mgr = NetIfMgr::with_system_defaults();

    match cli.command {
        Commands::Interface {
            iface,
            kind,
            ipaddr,
            netmask,
            opts,
            disabled,
            dry_run,
        } => {
            let mut settings: FieldValues = vec![
                ("ipaddr".to_string(), ipaddr),
                ("netmask".to_string(), netmask),
            ];
            settings.extend(opts);
            let config =
                InterfaceConfig::from_settings(&kind, &iface, !disabled, &settings, dry_run)?;
            for line in mgr.build_interface(&iface, &config).await? {
                println!("{}", line);
            }
            Ok(true)
        }
        Commands::Routes {
            iface,
            routes,
            dry_run,
        } => {
            let routes: Vec<RouteSpec> = routes
                .iter()
                .map(|s| parse_route(s))
                .collect::<NetCfgResult<_>>()?;
            for line in mgr.build_routes(&iface, &routes, dry_run).await? {
                println!("{}", line);
            }
            Ok(true)
        }
        Commands::GetRoutes { iface } => {
            for line in mgr.get_routes(&iface).await? {
                println!("{}", line);
            }
            Ok(true)
        }
        Commands::Up { iface } => {
            let res = mgr.up(&iface).await?;
            print!("{}", res.combined_output());
            Ok(res.success())
        }
        Commands::Down { iface } => {
            let res = mgr.down(&iface).await?;
            print!("{}", res.combined_output());
            Ok(res.success())
        }
        Commands::Apply {
            apply_hostname,
            hostname,
            require_reboot,
        } => {
            let settings = ApplySettings {
                apply_hostname,
                hostname,
                require_reboot,
            };
            mgr.apply_network_settings(&settings).await
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            error!("{}", e);
            std::process::exit(if e.is_validation() { 2 } else { 1 });
        }
    }
}
