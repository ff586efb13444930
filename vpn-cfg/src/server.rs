//  SERVER.rs
//    by Lut99
//
//  Created:
//    02 Oct 2026, 11:31:50
//  Last edited:
//    13 Oct 2026, 09:44:19
//  Auto updated?
//    Yes
//
//  Description:
//!   Defines the server config, i.e., the certificate fields that the
//!   user wants to see in the server's PKI, and how they are projected
//!   into declarations that easy-rsa understands.
//

use std::fs;
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

pub use crate::errors::DeclarationsError as Error;
use crate::spec::{Config, Json};


/***** LIBRARY *****/
/// Defines the certificate fields used when building the server's PKI.
///
/// Every field is optional. Fields that are absent or empty are simply not declared, which makes easy-rsa fall back to its own defaults from `vars`.
///
/// Note that values are written in double quotes without any escaping, so they must not contain double quotes themselves.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// The two-letter country code.
    #[serde(rename = "KEY_COUNTRY", alias = "key_country", skip_serializing_if = "Option::is_none")]
    pub country  : Option<String>,
    /// The province or state.
    #[serde(rename = "KEY_PROVINCE", alias = "key_province", skip_serializing_if = "Option::is_none")]
    pub province : Option<String>,
    /// The city.
    #[serde(rename = "KEY_CITY", alias = "key_city", skip_serializing_if = "Option::is_none")]
    pub city     : Option<String>,
    /// The organization.
    #[serde(rename = "KEY_ORG", alias = "key_org", skip_serializing_if = "Option::is_none")]
    pub org      : Option<String>,
    /// The contact email address.
    #[serde(rename = "KEY_EMAIL", alias = "key_email", skip_serializing_if = "Option::is_none")]
    pub email    : Option<String>,
    /// The organizational unit.
    #[serde(rename = "KEY_OU", alias = "key_ou", skip_serializing_if = "Option::is_none")]
    pub ou       : Option<String>,
    /// The common name of the certificate authority.
    #[serde(rename = "KEY_CN", alias = "key_cn", skip_serializing_if = "Option::is_none")]
    pub cn       : Option<String>,
    /// The subject alternative names.
    #[serde(rename = "KEY_ALTNAMES", alias = "key_altnames", skip_serializing_if = "Option::is_none")]
    pub altnames : Option<String>,
}

impl ServerConfig {
    /// Returns all fields of this config alongside the name of the variable they declare, in declaration order.
    ///
    /// # Returns
    /// An array of `(variable, value)` pairs.
    pub fn fields(&self) -> [(&'static str, Option<&str>); 8] {
        [
            ("KEY_COUNTRY", self.country.as_deref()),
            ("KEY_PROVINCE", self.province.as_deref()),
            ("KEY_CITY", self.city.as_deref()),
            ("KEY_ORG", self.org.as_deref()),
            ("KEY_EMAIL", self.email.as_deref()),
            ("KEY_OU", self.ou.as_deref()),
            ("KEY_CN", self.cn.as_deref()),
            ("KEY_ALTNAMES", self.altnames.as_deref()),
        ]
    }

    /// Projects this config into shell declarations, one `export NAME="value"` per non-empty field.
    ///
    /// # Returns
    /// The declarations, separated by newlines. Empty if no field is set.
    pub fn declarations(&self) -> String {
        self.fields().into_iter()
            .filter_map(|(name, value)| match value {
                Some(value) if !value.is_empty() => Some(format!("export {name}=\"{value}\"")),
                _                                => None,
            })
            .collect::<Vec<String>>()
            .join("\n")
    }

    /// Writes the declarations of this config to the given file, overwriting it if it exists.
    ///
    /// # Arguments
    /// - `path`: The path of the file to write (typically `vars-custom` in the easy-rsa directory).
    ///
    /// # Errors
    /// This function errors if we failed to write the file or to set its permissions.
    pub fn write_declarations(&self, path: impl AsRef<Path>) -> Result<(), Error> {
        let path: &Path = path.as_ref();
        debug!("Writing declarations to '{}'...", path.display());

        if let Err(err) = fs::write(path, self.declarations()) { return Err(Error::FileWriteError{ path: path.into(), err }); }
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt as _;
            if let Err(err) = fs::set_permissions(path, fs::Permissions::from_mode(0o644)) { return Err(Error::FilePermissionsError{ path: path.into(), err }); }
        }

        Ok(())
    }
}

impl Config for ServerConfig {
    type Backend = Json;
}





/***** TESTS *****/
#[cfg(test)]
mod tests {
    use super::*;


    #[test]
    fn test_declarations_skip_empty() {
        let config: ServerConfig = ServerConfig::from_string(r#"{ "KEY_CITY": "Springfield", "KEY_ORG": "" }"#).unwrap();
        assert_eq!(config.declarations(), "export KEY_CITY=\"Springfield\"");
    }

    #[test]
    fn test_declarations_field_order() {
        // Order in the file does not matter; order of the record does
        let config: ServerConfig = ServerConfig::from_string(r#"{
            "KEY_ALTNAMES": "vpn.example.com",
            "KEY_EMAIL": "admin@example.com",
            "KEY_COUNTRY": "NL",
            "KEY_OU": "Ops",
            "KEY_PROVINCE": "NH",
            "KEY_CN": "Example CA",
            "KEY_CITY": "Amsterdam",
            "KEY_ORG": "Example"
        }"#).unwrap();
        assert_eq!(config.declarations(), [
            "export KEY_COUNTRY=\"NL\"",
            "export KEY_PROVINCE=\"NH\"",
            "export KEY_CITY=\"Amsterdam\"",
            "export KEY_ORG=\"Example\"",
            "export KEY_EMAIL=\"admin@example.com\"",
            "export KEY_OU=\"Ops\"",
            "export KEY_CN=\"Example CA\"",
            "export KEY_ALTNAMES=\"vpn.example.com\"",
        ].join("\n"));
    }

    #[test]
    fn test_declarations_empty_config() {
        assert_eq!(ServerConfig::default().declarations(), "");
        let config: ServerConfig = ServerConfig::from_string("{}").unwrap();
        assert_eq!(config, ServerConfig::default());
    }

    #[test]
    fn test_lowercase_and_null_fields() {
        let config: ServerConfig = ServerConfig::from_string(r#"{ "key_country": "BE", "KEY_CITY": null, "unrelated": 42 }"#).unwrap();
        assert_eq!(config.country.as_deref(), Some("BE"));
        assert_eq!(config.city, None);
        assert_eq!(config.declarations(), "export KEY_COUNTRY=\"BE\"");
    }

    #[test]
    fn test_write_declarations() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vars-custom");

        let config = ServerConfig { province: Some("Utrecht".into()), email: Some("".into()), ou: Some("IT".into()), ..Default::default() };
        config.write_declarations(&path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "export KEY_PROVINCE=\"Utrecht\"\nexport KEY_OU=\"IT\"");

        // Writing again overwrites
        ServerConfig::default().write_declarations(&path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "");
    }

    #[test]
    fn test_from_path_errors() {
        let dir = tempfile::tempdir().unwrap();
        match ServerConfig::from_path(dir.path().join("missing.json")) {
            Err(crate::errors::ConfigError::InputOpenError{ .. }) => {},
            res                                                   => panic!("Expected an open error, got {res:?}"),
        }

        let path = dir.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();
        match ServerConfig::from_path(&path) {
            Err(crate::errors::ConfigError::FileDeserializeError{ .. }) => {},
            res                                                         => panic!("Expected a deserialize error, got {res:?}"),
        }
    }
}
