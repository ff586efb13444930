//  STATUS.rs
//    by Lut99
//
//  Created:
//    07 Oct 2026, 14:31:06
//  Last edited:
//    15 Oct 2026, 11:10:52
//  Auto updated?
//    Yes
//
//  Description:
//!   Implements the `status` and `test` subcommands, which report on
//!   the local host without changing anything.
//

use std::io::Write;

use log::info;

use vpn_cfg::locations::Locations;
use vpn_cfg::spec::Config as _;

pub use crate::errors::StatusError as Error;
use crate::executor::Executor;
use crate::probes::Probe;
use crate::spec::PackageManager;


/***** HELPER FUNCTIONS *****/
/// Writes a formatted line to the given output, mapping the error.
macro_rules! report {
    ($out:expr, $($t:tt)*) => {
        if let Err(err) = writeln!($out, $($t)*) { return Err(Error::OutputWriteError{ err }); }
    };
}





/***** LIBRARY *****/
/// Reports whether OpenVPN is installed and whether the host is configured as a server and/or client.
///
/// Absent installations are reported as `false`, never as an error.
///
/// # Arguments
/// - `exec`: The [`Executor`] to probe with.
/// - `locs`: The [`Locations`] that tell us where everything is.
/// - `out`: The [`Write`]r to write the report to.
///
/// # Errors
/// This function only errors if we failed to write to `out`.
pub async fn status(exec: &dyn Executor, locs: &Locations, out: &mut impl Write) -> Result<(), Error> {
    info!("Checking OpenVPN status...");
    let installed: bool = Probe::OpenVpnInstalled.holds(exec, locs).await;
    let server: bool = Probe::ConfiguredAsServer.holds(exec, locs).await;
    let client: bool = Probe::ConfiguredAsClient.holds(exec, locs).await;

    report!(out, "--== OpenVPN status ==--");
    report!(out, "Installed: {installed}");
    report!(out, "Configured as server: {server}");
    report!(out, "Configured as client: {client}");
    Ok(())
}



/// Reports the locations and tools that `vpnctl` would use, without running anything.
///
/// # Arguments
/// - `locs`: The resolved [`Locations`].
/// - `pm`: The resolved [`PackageManager`].
/// - `out`: The [`Write`]r to write the report to.
///
/// # Errors
/// This function errors if the locations could not be serialized or if we failed to write to `out`.
pub fn diagnose(locs: &Locations, pm: &PackageManager, out: &mut impl Write) -> Result<(), Error> {
    let locs: String = match locs.to_string() {
        Ok(locs) => locs,
        Err(err) => { return Err(Error::LocationsSerializeError{ err }); },
    };

    report!(out, "test...");
    report!(out, "Locations:");
    for line in locs.lines() {
        report!(out, "  {line}");
    }
    report!(out, "Package manager: {pm}");
    Ok(())
}





/***** TESTS *****/
#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::executor::mock::MockExecutor;


    #[tokio::test]
    async fn test_status_nothing_installed() {
        let root = tempfile::tempdir().unwrap();
        let locs = Locations::under(root.path());
        let exec = MockExecutor::default();

        let mut out: Vec<u8> = vec![];
        status(&exec, &locs, &mut out).await.unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "--== OpenVPN status ==--\nInstalled: false\nConfigured as server: false\nConfigured as client: false\n");
        assert!(exec.runs().is_empty());
    }

    #[tokio::test]
    async fn test_status_server() {
        let root = tempfile::tempdir().unwrap();
        let locs = Locations::under(root.path());
        fs::create_dir_all(&locs.openvpn_dir).unwrap();
        fs::write(locs.server_conf(), "port 1194\n").unwrap();
        let exec = MockExecutor::with_installed(&[ "openvpn" ]);

        let mut out: Vec<u8> = vec![];
        status(&exec, &locs, &mut out).await.unwrap();
        let report: String = String::from_utf8(out).unwrap();
        assert!(report.contains("Installed: true\n"));
        assert!(report.contains("Configured as server: true\n"));
        assert!(report.contains("Configured as client: false\n"));
    }

    #[test]
    fn test_diagnose() {
        let mut out: Vec<u8> = vec![];
        diagnose(&Locations::default(), &PackageManager::default(), &mut out).unwrap();
        let report: String = String::from_utf8(out).unwrap();
        assert!(report.starts_with("test...\nLocations:\n"));
        assert!(report.contains("  openvpn_dir: /etc/openvpn\n"));
        assert!(report.contains("  easy_rsa_dir: /etc/openvpn/easy-rsa\n"));
        assert!(report.ends_with("Package manager: sudo apt-get\n"));
    }
}
