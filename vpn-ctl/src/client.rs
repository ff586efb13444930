//  CLIENT.rs
//    by Lut99
//
//  Created:
//    07 Oct 2026, 09:12:40
//  Last edited:
//    15 Oct 2026, 11:02:17
//  Auto updated?
//    Yes
//
//  Description:
//!   Implements the `client` subcommand, which builds a key and
//!   certificate for a named client and prints the files it needs.
//

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use console::style;
use log::{debug, info};

use vpn_cfg::locations::Locations;

pub use crate::errors::ClientError as Error;
use crate::executor::Executor;
use crate::probes::Probe;
use crate::spec::ClientName;
use crate::steps;


/***** HELPER FUNCTIONS *****/
/// Writes the CA certificate and the client's key and certificate to the given output.
///
/// Every file is written as its path, a colon, a newline, its contents and another newline.
///
/// # Arguments
/// - `locs`: The [`Locations`] that tell us where everything is.
/// - `name`: The [`ClientName`] of the client.
/// - `out`: The [`Write`]r to write to.
///
/// # Errors
/// This function errors if any of the files could not be read or if we failed to write to `out`.
fn write_bundle(locs: &Locations, name: &ClientName, out: &mut impl Write) -> Result<(), Error> {
    let files: [PathBuf; 3] = [ locs.runtime_ca_cert(), locs.client_key(name), locs.client_cert(name) ];
    for path in files {
        debug!("Reading client artifact '{}'...", path.display());
        let contents: String = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(err)     => { return Err(Error::ArtifactReadError{ path, err }); },
        };
        if let Err(err) = write!(out, "{}:\n{}\n", path.display(), contents) { return Err(Error::OutputWriteError{ err }); }
    }
    Ok(())
}





/***** LIBRARY *****/
/// Creates a client with the given name, unless it already exists, and writes its bundle to `out`.
///
/// # Arguments
/// - `exec`: The [`Executor`] that runs all commands.
/// - `locs`: The [`Locations`] that tell us where everything is.
/// - `name`: The [`ClientName`] of the client to create.
/// - `out`: The [`Write`]r to write the bundle to (typically stdout).
///
/// # Errors
/// This function errors if the PKI is not initialized, if building the key fails or if the bundle could not be written.
pub async fn create(exec: &dyn Executor, locs: &Locations, name: &ClientName, out: &mut impl Write) -> Result<(), Error> {
    info!("Creating client '{}'", name);
    if let Err(err) = steps::require_pki(exec, locs).await { return Err(Error::StepError{ name: name.to_string(), err }); }

    if Probe::ClientExists(name.clone()).holds(exec, locs).await {
        println!("Client {} already exists, not rebuilding its key.", style(name).bold());
    } else if let Err(err) = steps::build_client_key(exec, locs, name).await {
        return Err(Error::StepError{ name: name.to_string(), err });
    }

    write_bundle(locs, name, out)
}





/***** TESTS *****/
