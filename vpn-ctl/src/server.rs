//  SERVER.rs
//    by Lut99
//
//  Created:
//    06 Oct 2026, 10:44:31
//  Last edited:
//    15 Oct 2026, 10:19:50
//  Auto updated?
//    Yes
//
//  Description:
//!   Implements the `setup-server` subcommand, which takes the local
//!   host from nothing to a configured OpenVPN server. Every step is
//!   skipped if its result is already in place.
//

use std::path::PathBuf;

use console::style;
use log::{debug, info, warn};
use rand::Rng as _;

use vpn_cfg::locations::Locations;
use vpn_cfg::server::ServerConfig;
use vpn_cfg::spec::Config as _;

pub use crate::errors::SetupError as Error;
use crate::executor::Executor;
use crate::probes::Probe;
use crate::spec::PackageManager;
use crate::steps;


/***** AUXILLARY *****/
/// Defines options for the `setup-server` subcommand.
#[derive(Clone, Debug)]
pub struct SetupOpts {
    /// The JSON file with the certificate fields for the PKI, if any.
    pub config        : Option<PathBuf>,
    /// Whether to write the server configuration as the last step.
    pub server_config : bool,
}
impl Default for SetupOpts {
    #[inline]
    fn default() -> Self { Self{ config: None, server_config: true } }
}





/***** HELPER FUNCTIONS *****/
/// Loads the server config given by the user, or falls back to an empty one.
///
/// # Arguments
/// - `path`: The path to the config file, if any.
///
/// # Errors
/// This function errors if the file was given but could not be loaded.
fn load_config(path: Option<PathBuf>) -> Result<ServerConfig, Error> {
    match path {
        Some(path) => {
            debug!("Loading server config '{}'...", path.display());
            match ServerConfig::from_path(&path) {
                Ok(config) => Ok(config),
                Err(err)   => Err(Error::ConfigLoadError{ path, err }),
            }
        },
        None => {
            warn!("No server config given; using easy-rsa's defaults for all certificate fields");
            Ok(ServerConfig::default())
        },
    }
}

/// Prints that the given step is skipped.
#[inline]
fn skipped(what: impl AsRef<str>) { println!("{} {}", style(what.as_ref()).bold(), style("already done, skipping.").dim()); }

/// Prints that the given step is started.
#[inline]
fn starting(what: impl AsRef<str>) { println!("{} {}...", style("Running").green().bold(), style(what.as_ref()).bold()); }





/***** LIBRARY *****/
/// Sets up the local host as an OpenVPN server.
///
/// The steps are run in a fixed order, and each is skipped if the probe guarding it says it has already been done:
/// 1. Install OpenVPN;
/// 2. Install easy-rsa and create its working directory;
/// 3. Write the custom variables (always);
/// 4. Initialize the PKI;
/// 5. Copy the server keys to the OpenVPN directory; and
/// 6. Write the server config (if enabled).
///
/// # Arguments
/// - `exec`: The [`Executor`] that runs all commands.
/// - `locs`: The [`Locations`] that tell us where everything is.
/// - `pm`: The [`PackageManager`] to install packages with.
/// - `opts`: Additional [`SetupOpts`].
///
/// # Errors
/// This function errors if the server config could not be loaded or if any of the steps fails. Steps after the failing one are not attempted.
pub async fn setup(exec: &dyn Executor, locs: &Locations, pm: &PackageManager, opts: SetupOpts) -> Result<(), Error> {
    info!("Setting up OpenVPN server in '{}'", locs.openvpn_dir.display());
    let config: ServerConfig = load_config(opts.config)?;

    // 1. OpenVPN itself
    if Probe::OpenVpnInstalled.holds(exec, locs).await {
        skipped("Installing OpenVPN");
    } else {
        starting("Installing OpenVPN");
        steps::install_openvpn(exec, pm).await.map_err(|err| Error::StepError{ err })?;
    }

    // 2. easy-rsa
    if Probe::EasyRsaPresent.holds(exec, locs).await {
        skipped("Setting up easy-rsa");
    } else {
        if Probe::EasyRsaInstalled.holds(exec, locs).await {
            skipped("Installing easy-rsa");
        } else {
            starting("Installing easy-rsa");
            steps::install_easy_rsa(exec, pm).await.map_err(|err| Error::StepError{ err })?;
        }
        starting("Setting up easy-rsa");
        steps::make_cadir(exec, locs).await.map_err(|err| Error::StepError{ err })?;
    }

    // 3. The custom variables are always refreshed
    starting("Writing custom variables");
    steps::write_custom_vars(locs, &config).map_err(|err| Error::StepError{ err })?;

    // 4. PKI
    if Probe::PkiInitialized.holds(exec, locs).await {
        skipped("Initializing PKI");
    } else {
        starting("Initializing PKI");
        steps::initialize_pki(exec, locs).await.map_err(|err| Error::StepError{ err })?;
    }

    // 5. Keys
    if Probe::KeysCopied.holds(exec, locs).await {
        skipped("Copying keys");
    } else {
        starting("Copying keys");
        steps::relocate_keys(exec, locs).await.map_err(|err| Error::StepError{ err })?;
    }

    // 6. Server config
    if !opts.server_config {
        debug!("Not writing server config (disabled)");
    } else if Probe::ConfiguredAsServer.holds(exec, locs).await {
        skipped("Writing server config");
    } else {
        starting("Writing server config");
        let octet: u8 = rand::thread_rng().gen_range(0..100);
        steps::write_server_config(exec, locs, octet).await.map_err(|err| Error::StepError{ err })?;
    }

    // Done
    println!("\nSuccessfully set up OpenVPN server in {}", style(locs.openvpn_dir.display()).bold().green());
    Ok(())
}





/***** TESTS *****/
