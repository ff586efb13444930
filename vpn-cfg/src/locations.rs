//  LOCATIONS.rs
//    by Lut99
//
//  Created:
//    03 Oct 2026, 14:08:21
//  Last edited:
//    18 Oct 2026, 10:14:52
//  Auto updated?
//    Yes
//
//  Description:
//!   Defines where `vpnctl` finds (and puts) everything on disk. All
//!   paths are derived from three roots, so a whole installation can be
//!   relocated (e.g., into a temporary directory) by changing them.
//

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::spec::{Config, Yaml};


/***** CONSTANTS *****/
/// The default directory where the OpenVPN daemon looks for its configuration.
pub const DEFAULT_OPENVPN_DIR: &str = "/etc/openvpn";
/// The default easy-rsa working directory.
pub const DEFAULT_EASY_RSA_DIR: &str = "/etc/openvpn/easy-rsa";
/// The name of the easy-rsa working directory within the OpenVPN directory, if it is not placed elsewhere.
pub const EASY_RSA_SUBDIR: &str = "easy-rsa";
/// The default location of the sample server configuration shipped with the OpenVPN package.
pub const DEFAULT_SAMPLE_CONFIG: &str = "/usr/share/doc/openvpn/examples/sample-config-files/server.conf.gz";

/// The files that are copied from the easy-rsa keys directory to the OpenVPN directory for the server.
pub const SERVER_KEY_FILES: [&str; 5] = [ "ca.crt", "ca.key", "dh2048.pem", "server.crt", "server.key" ];





/***** LIBRARY *****/
/// Defines the roots of all paths that `vpnctl` touches.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Locations {
    /// The directory where the OpenVPN daemon finds its configuration and keys.
    pub openvpn_dir   : PathBuf,
    /// The easy-rsa working directory, as created by `make-cadir`.
    pub easy_rsa_dir  : PathBuf,
    /// The (gzipped) sample server configuration that is used as a base for the server config.
    pub sample_config : PathBuf,
}

impl Default for Locations {
    #[inline]
    fn default() -> Self {
        Self {
            openvpn_dir   : DEFAULT_OPENVPN_DIR.into(),
            easy_rsa_dir  : DEFAULT_EASY_RSA_DIR.into(),
            sample_config : DEFAULT_SAMPLE_CONFIG.into(),
        }
    }
}

impl Locations {
    /// Constructor for Locations from its roots, where the easy-rsa directory follows the OpenVPN directory unless given.
    ///
    /// # Arguments
    /// - `openvpn_dir`: The directory where the OpenVPN daemon finds its configuration and keys.
    /// - `easy_rsa_dir`: The easy-rsa working directory, or [`None`] to use `<openvpn_dir>/easy-rsa`.
    /// - `sample_config`: The (gzipped) sample server configuration.
    ///
    /// # Returns
    /// A new Locations instance.
    pub fn from_roots(openvpn_dir: impl Into<PathBuf>, easy_rsa_dir: Option<PathBuf>, sample_config: impl Into<PathBuf>) -> Self {
        let openvpn_dir: PathBuf = openvpn_dir.into();
        Self {
            easy_rsa_dir  : easy_rsa_dir.unwrap_or_else(|| openvpn_dir.join(EASY_RSA_SUBDIR)),
            openvpn_dir,
            sample_config : sample_config.into(),
        }
    }

    /// Constructor for Locations that places the default layout below the given root directory.
    ///
    /// # Arguments
    /// - `root`: The directory that acts as `/`.
    ///
    /// # Returns
    /// A new Locations with all default paths prefixed with `root`.
    pub fn under(root: impl AsRef<Path>) -> Self {
        let root: &Path = root.as_ref();
        let rebase = |path: &str| -> PathBuf { root.join(path.trim_start_matches('/')) };
        Self {
            openvpn_dir   : rebase(DEFAULT_OPENVPN_DIR),
            easy_rsa_dir  : rebase(DEFAULT_EASY_RSA_DIR),
            sample_config : rebase(DEFAULT_SAMPLE_CONFIG),
        }
    }



    /// Returns the directory where easy-rsa generates keys and certificates.
    #[inline]
    pub fn keys_dir(&self) -> PathBuf { self.easy_rsa_dir.join("keys") }
    /// Returns the path of a file in the easy-rsa keys directory.
    #[inline]
    pub fn key_file(&self, name: impl AsRef<Path>) -> PathBuf { self.keys_dir().join(name) }
    /// Returns the path of the server certificate generated by easy-rsa. Its existence marks the PKI as initialized.
    #[inline]
    pub fn pki_server_cert(&self) -> PathBuf { self.key_file("server.crt") }
    /// Returns the path of the certificate of the given client.
    #[inline]
    pub fn client_cert(&self, name: impl AsRef<str>) -> PathBuf { self.key_file(format!("{}.crt", name.as_ref())) }
    /// Returns the path of the private key of the given client.
    #[inline]
    pub fn client_key(&self, name: impl AsRef<str>) -> PathBuf { self.key_file(format!("{}.key", name.as_ref())) }

    /// Returns the path of the declarations file that we generate for easy-rsa.
    #[inline]
    pub fn vars_custom(&self) -> PathBuf { self.easy_rsa_dir.join("vars-custom") }
    /// Returns the path of the OpenSSL configuration shipped with easy-rsa.
    #[inline]
    pub fn openssl_cnf(&self) -> PathBuf { self.easy_rsa_dir.join("openssl-1.0.0.cnf") }
    /// Returns the path of the alias under which easy-rsa looks for the OpenSSL configuration.
    #[inline]
    pub fn openssl_alias(&self) -> PathBuf { self.easy_rsa_dir.join("openssl.cnf") }

    /// Returns the path of a file in the OpenVPN directory.
    #[inline]
    pub fn runtime_file(&self, name: impl AsRef<Path>) -> PathBuf { self.openvpn_dir.join(name) }
    /// Returns the path of the CA certificate as used by the daemon.
    #[inline]
    pub fn runtime_ca_cert(&self) -> PathBuf { self.runtime_file("ca.crt") }
    /// Returns the path of the server's private key as used by the daemon.
    #[inline]
    pub fn runtime_server_key(&self) -> PathBuf { self.runtime_file("server.key") }
    /// Returns the path of the server configuration.
    #[inline]
    pub fn server_conf(&self) -> PathBuf { self.runtime_file("server.conf") }
    /// Returns the path of the client configuration.
    #[inline]
    pub fn client_conf(&self) -> PathBuf { self.runtime_file("client.conf") }
}

impl Config for Locations {
    type Backend = Yaml;
}





/***** TESTS *****/
#[cfg(test)]
mod tests {
    use super::*;


    #[test]
    fn test_default_paths() {
        let locs = Locations::default();
        assert_eq!(locs.pki_server_cert(), PathBuf::from("/etc/openvpn/easy-rsa/keys/server.crt"));
        assert_eq!(locs.client_cert("alice"), PathBuf::from("/etc/openvpn/easy-rsa/keys/alice.crt"));
        assert_eq!(locs.client_key("alice"), PathBuf::from("/etc/openvpn/easy-rsa/keys/alice.key"));
        assert_eq!(locs.vars_custom(), PathBuf::from("/etc/openvpn/easy-rsa/vars-custom"));
        assert_eq!(locs.runtime_server_key(), PathBuf::from("/etc/openvpn/server.key"));
        assert_eq!(locs.server_conf(), PathBuf::from("/etc/openvpn/server.conf"));
    }

    #[test]
    fn test_under_root() {
        let locs = Locations::under("/tmp/root");
        assert_eq!(locs.openvpn_dir, PathBuf::from("/tmp/root/etc/openvpn"));
        assert_eq!(locs.easy_rsa_dir, PathBuf::from("/tmp/root/etc/openvpn/easy-rsa"));
        assert_eq!(locs.sample_config, PathBuf::from("/tmp/root/usr/share/doc/openvpn/examples/sample-config-files/server.conf.gz"));
    }

    #[test]
    fn test_from_roots() {
        // The easy-rsa directory moves along with the OpenVPN directory...
        let locs = Locations::from_roots("/srv/vpn", None, DEFAULT_SAMPLE_CONFIG);
        assert_eq!(locs.easy_rsa_dir, PathBuf::from("/srv/vpn/easy-rsa"));
        assert_eq!(locs.pki_server_cert(), PathBuf::from("/srv/vpn/easy-rsa/keys/server.crt"));

        // ...unless it is given explicitly
        let locs = Locations::from_roots("/srv/vpn", Some("/opt/pki".into()), DEFAULT_SAMPLE_CONFIG);
        assert_eq!(locs.easy_rsa_dir, PathBuf::from("/opt/pki"));

        // The defaults are consistent
        assert_eq!(Locations::from_roots(DEFAULT_OPENVPN_DIR, None, DEFAULT_SAMPLE_CONFIG), Locations::default());
    }

    #[test]
    fn test_yaml() {
        let locs: Locations = Locations::from_string("openvpn_dir: /srv/vpn\neasy_rsa_dir: /srv/vpn/pki\nsample_config: /srv/sample.conf.gz\n").unwrap();
        assert_eq!(locs.client_conf(), PathBuf::from("/srv/vpn/client.conf"));
        assert_eq!(locs.openssl_alias(), PathBuf::from("/srv/vpn/pki/openssl.cnf"));

        // Serializes back to something we can read
        let raw: String = locs.to_string().unwrap();
        assert_eq!(Locations::from_string(raw).unwrap(), locs);
    }
}
