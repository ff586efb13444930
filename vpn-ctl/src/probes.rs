//  PROBES.rs
//    by Lut99
//
//  Created:
//    04 Oct 2026, 11:20:44
//  Last edited:
//    15 Oct 2026, 10:29:03
//  Auto updated?
//    Yes
//
//  Description:
//!   Defines the state probes: side-effect free checks of whether some
//!   part of the setup is already in place.
//

use std::fmt::{Display, Formatter, Result as FResult};
use std::path::Path;

use enum_debug::EnumDebug;
use log::debug;

use vpn_cfg::locations::Locations;
use vpn_shr::jobs::Invocation;

use crate::executor::Executor;
use crate::spec::ClientName;


/***** HELPER FUNCTIONS *****/
/// Builds a `test <flag> <path>` invocation.
#[inline]
fn test(flag: &str, path: impl AsRef<Path>) -> Invocation { Invocation::new("test").arg(flag).arg(path.as_ref().display().to_string()) }





/***** LIBRARY *****/
/// Defines every condition that we can check about the local host.
#[derive(Clone, Debug, EnumDebug, Eq, PartialEq)]
pub enum Probe {
    /// The `openvpn` daemon is on the `$PATH`.
    OpenVpnInstalled,
    /// easy-rsa's `make-cadir` is on the `$PATH`.
    EasyRsaInstalled,
    /// The easy-rsa working directory exists.
    EasyRsaPresent,
    /// The PKI has been built (i.e., the server certificate exists).
    PkiInitialized,
    /// The server keys have been copied to the OpenVPN directory.
    KeysCopied,
    /// There is a server configuration.
    ConfiguredAsServer,
    /// There is a client configuration.
    ConfiguredAsClient,
    /// A certificate for the given client exists.
    ClientExists(ClientName),
}

impl Probe {
    /// Returns the command that checks this probe.
    ///
    /// # Arguments
    /// - `locs`: The [`Locations`] that tell us where everything is.
    ///
    /// # Returns
    /// An [`Invocation`] that exits with status zero iff the probed condition holds.
    pub fn invocation(&self, locs: &Locations) -> Invocation {
        use Probe::*;
        match self {
            OpenVpnInstalled   => Invocation::new("which").arg("openvpn"),
            EasyRsaInstalled   => Invocation::new("which").arg("make-cadir"),
            EasyRsaPresent     => test("-d", &locs.easy_rsa_dir),
            PkiInitialized     => test("-f", locs.pki_server_cert()),
            KeysCopied         => test("-f", locs.runtime_server_key()),
            ConfiguredAsServer => test("-f", locs.server_conf()),
            ConfiguredAsClient => test("-f", locs.client_conf()),
            ClientExists(name) => test("-f", locs.client_cert(name)),
        }
    }

    /// Checks whether the probed condition holds.
    ///
    /// # Arguments
    /// - `exec`: The [`Executor`] that runs the check.
    /// - `locs`: The [`Locations`] that tell us where everything is.
    ///
    /// # Returns
    /// True if it holds, false if it does not (or if we could not find out).
    pub async fn holds(&self, exec: &dyn Executor, locs: &Locations) -> bool {
        let res: bool = exec.check(&self.invocation(locs)).await;
        debug!("Probe {} ({}): {}", self.variant(), self, res);
        res
    }
}

impl Display for Probe {
    fn fmt(&self, f: &mut Formatter<'_>) -> FResult {
        use Probe::*;
        match self {
            OpenVpnInstalled   => write!(f, "OpenVPN installed"),
            EasyRsaInstalled   => write!(f, "easy-rsa installed"),
            EasyRsaPresent     => write!(f, "easy-rsa directory present"),
            PkiInitialized     => write!(f, "PKI initialized"),
            KeysCopied         => write!(f, "server keys in place"),
            ConfiguredAsServer => write!(f, "configured as server"),
            ConfiguredAsClient => write!(f, "configured as client"),
            ClientExists(name) => write!(f, "client '{name}' exists"),
        }
    }
}





/***** TESTS *****/
