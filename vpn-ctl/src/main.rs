//  MAIN.rs
//    by Lut99
//
//  Created:
//    04 Oct 2026, 09:27:55
//  Last edited:
//    18 Oct 2026, 10:27:40
//  Auto updated?
//    Yes
//
//  Description:
//!   Entrypoint to the `vpnctl` executable.
//

use std::io::{self, Stdout};
use std::path::PathBuf;

use clap::{CommandFactory as _, Parser, Subcommand};
use dotenvy::dotenv;
use error_trace::ErrorTrace as _;
use humanlog::{DebugMode, HumanLogger};
use log::{debug, error, info};

use vpn_cfg::locations::{Locations, DEFAULT_OPENVPN_DIR, DEFAULT_SAMPLE_CONFIG};
use vpn_cfg::spec::{Config as _, YamlError};

use vpn_ctl::executor::LocalExecutor;
use vpn_ctl::server::SetupOpts;
use vpn_ctl::spec::{ClientName, PackageManager, DEFAULT_PACKAGE_MANAGER};
use vpn_ctl::{client, server, status};


/***** ARGUMENTS *****/
/// Defines the toplevel arguments for the `vpnctl` tool.
#[derive(Debug, Parser)]
#[clap(name = "vpnctl", about = "Provisions an OpenVPN server with an easy-rsa PKI on the local host, and issues client certificates.", after_help = "Without a command, prints this help. Unknown commands and invalid arguments are usage errors (exit code 2).")]
struct Arguments {
    /// If given, prints `info` and `debug` prints.
    #[clap(long, global=true, help = "If given, prints additional information during execution.")]
    debug : bool,
    /// If given, prints `info`, `debug` and `trace` prints.
    #[clap(long, global=true, conflicts_with = "debug", help = "If given, prints the largest amount of debug information as possible.")]
    trace : bool,

    /// A YAML file with all locations, overriding the separate options.
    #[clap(long, global=true, env = "VPNCTL_LOCATIONS", help = "A YAML file that defines 'openvpn_dir', 'easy_rsa_dir' and 'sample_config'. If given, the separate location options are ignored.")]
    locations       : Option<PathBuf>,
    /// The OpenVPN directory.
    #[clap(long, global=true, default_value = DEFAULT_OPENVPN_DIR, env = "VPNCTL_OPENVPN_DIR", help = "The directory where the OpenVPN daemon finds its configuration and keys.")]
    openvpn_dir     : PathBuf,
    /// The easy-rsa directory.
    #[clap(long, global=true, env = "VPNCTL_EASY_RSA_DIR", help = "The easy-rsa working directory. Created by `setup-server` if it does not exist. [default: <OPENVPN_DIR>/easy-rsa]")]
    easy_rsa_dir    : Option<PathBuf>,
    /// The sample server config.
    #[clap(long, global=true, default_value = DEFAULT_SAMPLE_CONFIG, env = "VPNCTL_SAMPLE_CONFIG", help = "The gzipped sample server configuration on which the server configuration is based.")]
    sample_config   : PathBuf,
    /// The package manager command.
    #[clap(long, global=true, default_value = DEFAULT_PACKAGE_MANAGER, env = "VPNCTL_PACKAGE_MANAGER", help = "The command used to install packages. `install -y <package>` is appended to it.")]
    package_manager : PackageManager,

    /// The subcommand that can be run. If omitted, the help is printed.
    #[clap(subcommand)]
    subcommand : Option<VpnSubcommand>,
}

/// Defines subcommands for the `vpnctl` tool.
#[derive(Debug, Subcommand)]
enum VpnSubcommand {
    #[clap(name = "setup-server", about = "Installs OpenVPN and easy-rsa, initializes the PKI and writes the server configuration. Steps that are already done are skipped.")]
    SetupServer {
        /// The server config file.
        #[clap(short, long, help = "A JSON file with the certificate fields (KEY_COUNTRY, KEY_PROVINCE, KEY_CITY, KEY_ORG, KEY_EMAIL, KEY_OU, KEY_CN, KEY_ALTNAMES). If omitted, easy-rsa's defaults are used.")]
        config           : Option<PathBuf>,
        /// Whether to skip writing the server config.
        #[clap(long, help = "If given, does not write the server configuration.")]
        no_server_config : bool,
    },

    #[clap(name = "status", about = "Reports whether OpenVPN is installed and configured as a server and/or client.")]
    Status,

    #[clap(name = "client", about = "Builds a key and certificate for a client (unless it already exists) and prints the CA certificate, key and certificate.")]
    Client {
        /// The name of the client.
        #[clap(short, long, help = "The name of the client. Also used as the common name of its certificate.")]
        name : ClientName,
    },

    #[clap(name = "test", about = "Prints the locations and tools that would be used, without running anything.")]
    Test,
}





/***** HELPER FUNCTIONS *****/
/// Resolves the locations from either the locations file or the separate options.
///
/// # Arguments
/// - `args`: The parsed [`Arguments`].
///
/// # Returns
/// The resolved [`Locations`].
///
/// # Errors
/// This function errors if the locations file was given but could not be loaded.
fn resolve_locations(args: &Arguments) -> Result<Locations, YamlError> {
    match &args.locations {
        Some(path) => {
            debug!("Loading locations file '{}'...", path.display());
            Locations::from_path(path)
        },
        None => Ok(Locations::from_roots(&args.openvpn_dir, args.easy_rsa_dir.clone(), &args.sample_config)),
    }
}





/***** ENTRYPOINT *****/
#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Load the .env file
    dotenv().ok();

    // Parse the arguments
    let mut args: Arguments = Arguments::parse();

    // Initialize the logger
    if let Err(err) = HumanLogger::terminal(if args.trace { DebugMode::Full } else if args.debug { DebugMode::Debug } else { DebugMode::HumanFriendly }).init() {
        eprintln!("WARNING: Failed to setup logger: {err} (no logging for this session)");
    }
    info!("{} - v{}", env!("CARGO_BIN_NAME"), env!("CARGO_PKG_VERSION"));

    // Setup the friendlier version of panic
    if !args.trace && !args.debug {
        human_panic::setup_panic!();
    }

    // Without a command, there is nothing to do but to tell the user what they can do
    let Some(subcommand) = args.subcommand.take() else {
        if let Err(err) = Arguments::command().print_help() { error!("{}", err.trace()); std::process::exit(1); }
        std::process::exit(0);
    };

    // Resolve where everything is
    let locs: Locations = match resolve_locations(&args) {
        Ok(locs) => locs,
        Err(err) => { error!("{}", err.trace()); std::process::exit(1); },
    };
    let exec: LocalExecutor = LocalExecutor::default();

    // Now match on the command
    match subcommand {
        VpnSubcommand::SetupServer{ config, no_server_config } => {
            if let Err(err) = server::setup(&exec, &locs, &args.package_manager, SetupOpts{ config, server_config: !no_server_config }).await { error!("{}", err.trace()); std::process::exit(1); }
        },
        VpnSubcommand::Status => {
            let mut out: Stdout = io::stdout();
            if let Err(err) = status::status(&exec, &locs, &mut out).await { error!("{}", err.trace()); std::process::exit(1); }
        },
        VpnSubcommand::Client{ name } => {
            let mut out: Stdout = io::stdout();
            if let Err(err) = client::create(&exec, &locs, &name, &mut out).await { error!("{}", err.trace()); std::process::exit(1); }
        },
        VpnSubcommand::Test => {
            let mut out: Stdout = io::stdout();
            if let Err(err) = status::diagnose(&locs, &args.package_manager, &mut out) { error!("{}", err.trace()); std::process::exit(1); }
        },
    }
}





/***** TESTS *****/
