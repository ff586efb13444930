//  SPEC.rs
//    by Lut99
//
//  Created:
//    04 Oct 2026, 09:52:03
//  Last edited:
//    18 Oct 2026, 10:31:18
//  Auto updated?
//    Yes
//
//  Description:
//!   Defines specifications and interfaces used across modules.
//

use std::fmt::{Display, Formatter, Result as FResult};
use std::str::FromStr;

use vpn_shr::jobs::Invocation;

use crate::errors::{ClientNameParseError, PackageManagerParseError};


/***** CONSTANTS *****/
/// The package manager command used when the user does not specify one.
pub const DEFAULT_PACKAGE_MANAGER: &str = "sudo apt-get";





/***** LIBRARY *****/
/// The name of a client, which identifies its key and certificate in the easy-rsa keys directory.
///
/// Since the name becomes part of a filename and an argument to easy-rsa, it cannot be empty, cannot contain slashes or NUL-characters, cannot start with a dash and cannot be `.` or `..`.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct ClientName(String);
impl ClientName {
    /// Returns the name as a string.
    #[inline]
    pub fn as_str(&self) -> &str { &self.0 }
}
impl Display for ClientName {
    #[inline]
    fn fmt(&self, f: &mut Formatter<'_>) -> FResult { write!(f, "{}", self.0) }
}
impl AsRef<str> for ClientName {
    #[inline]
    fn as_ref(&self) -> &str { &self.0 }
}
impl FromStr for ClientName {
    type Err = ClientNameParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() { return Err(ClientNameParseError::Empty); }
        if s == "." || s == ".." { return Err(ClientNameParseError::Reserved{ raw: s.into() }); }
        if s.starts_with('-') { return Err(ClientNameParseError::LeadingDash{ raw: s.into() }); }
        if let Some(c) = s.chars().find(|c| *c == '/' || *c == '\0') { return Err(ClientNameParseError::IllegalCharacter{ raw: s.into(), c }); }
        Ok(Self(s.into()))
    }
}



/// The command with which we install packages, e.g., `sudo apt-get`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PackageManager {
    /// The executable to call.
    pub exe  : String,
    /// Any arguments that precede the `install` subcommand.
    pub args : Vec<String>,
}
impl PackageManager {
    /// Builds the command that non-interactively installs the given package.
    ///
    /// # Arguments
    /// - `package`: The name of the package to install.
    ///
    /// # Returns
    /// A new [`Invocation`] that installs the package.
    pub fn install(&self, package: impl Into<String>) -> Invocation {
        Invocation::new(&self.exe).args(self.args.iter().cloned()).args([ "install".to_string(), "-y".into(), package.into() ])
    }
}
impl Default for PackageManager {
    #[inline]
    fn default() -> Self {
        Self {
            exe  : "sudo".into(),
            args : vec![ "apt-get".into() ],
        }
    }
}
impl Display for PackageManager {
    fn fmt(&self, f: &mut Formatter<'_>) -> FResult {
        write!(f, "{}", self.exe)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}
impl FromStr for PackageManager {
    type Err = PackageManagerParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut words: Vec<String> = match shlex::split(s) {
            Some(words) => words,
            None        => { return Err(PackageManagerParseError::ExeParseError{ raw: s.into() }); },
        };
        if words.is_empty() { return Err(PackageManagerParseError::Empty{ raw: s.into() }); }
        let exe: String = words.remove(0);
        Ok(Self{ exe, args: words })
    }
}





/***** TESTS *****/
#[cfg(test)]
mod tests {
    use super::*;


    #[test]
    fn test_client_name_parse() {
        assert_eq!(ClientName::from_str("alice").unwrap().as_str(), "alice");
        assert_eq!(ClientName::from_str("laptop-01.home").unwrap().as_str(), "laptop-01.home");
        assert!(matches!(ClientName::from_str(""), Err(ClientNameParseError::Empty)));
        assert!(matches!(ClientName::from_str(".."), Err(ClientNameParseError::Reserved{ .. })));
        assert!(matches!(ClientName::from_str("../server"), Err(ClientNameParseError::IllegalCharacter{ c: '/', .. })));
        assert!(matches!(ClientName::from_str("-x"), Err(ClientNameParseError::LeadingDash{ .. })));
        assert!(matches!(ClientName::from_str("--batch"), Err(ClientNameParseError::LeadingDash{ .. })));
        assert_eq!(ClientName::from_str("x-1").unwrap().as_str(), "x-1");
    }

    #[test]
    fn test_package_manager_parse() {
        let pm = PackageManager::from_str(DEFAULT_PACKAGE_MANAGER).unwrap();
        assert_eq!(pm, PackageManager::default());
        assert_eq!(pm.install("openvpn").to_string(), "sudo apt-get install -y openvpn");

        let pm = PackageManager::from_str("apt-get -o 'Dpkg::Options::=--force-confold'").unwrap();
        assert_eq!(pm.exe, "apt-get");
        assert_eq!(pm.args, vec![ "-o".to_string(), "Dpkg::Options::=--force-confold".to_string() ]);

        assert!(matches!(PackageManager::from_str("   "), Err(PackageManagerParseError::Empty{ .. })));
        assert!(matches!(PackageManager::from_str("sudo 'apt-get"), Err(PackageManagerParseError::ExeParseError{ .. })));
    }
}
