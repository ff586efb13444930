//  ERRORS.rs
//    by Lut99
//
//  Created:
//    04 Oct 2026, 09:34:50
//  Last edited:
//    18 Oct 2026, 10:31:02
//  Auto updated?
//    Yes
//
//  Description:
//!   Defines the errors that may occur in the `vpn-ctl` executable.
//

use std::error::Error;
use std::fmt::{Display, Formatter, Result as FResult};
use std::path::PathBuf;

use console::style;

use crate::steps::Step;


/***** LIBRARY *****/
/// Errors that relate to running a single provisioning step.
#[derive(Debug)]
pub enum StepError {
    /// One of the commands of the step failed.
    CommandFailure{ step: Step, err: vpn_shr::jobs::Error },
    /// Failed to write the declarations for easy-rsa.
    DeclarationsError{ err: vpn_cfg::server::Error },
    /// The step needs the PKI, but it has not been initialized yet.
    PkiNotInitialized{ path: PathBuf },
}
impl Display for StepError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FResult {
        use StepError::*;
        match self {
            CommandFailure{ step, .. } => write!(f, "Failed to {step}"),
            DeclarationsError{ .. }    => write!(f, "Failed to {}", Step::WriteCustomVars),
            PkiNotInitialized{ path }  => write!(f, "PKI not initialized (server certificate '{}' not found), run {} first", path.display(), style("setup-server").bold()),
        }
    }
}
impl Error for StepError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        use StepError::*;
        match self {
            CommandFailure{ err, .. } => Some(err),
            DeclarationsError{ err }  => Some(err),
            PkiNotInitialized{ .. }   => None,
        }
    }
}



/// Errors that relate to the `setup-server` subcommand.
#[derive(Debug)]
pub enum SetupError {
    /// Failed to load the server config file.
    ConfigLoadError{ path: PathBuf, err: vpn_cfg::spec::JsonError },
    /// One of the provisioning steps failed.
    StepError{ err: StepError },
}
impl Display for SetupError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FResult {
        use SetupError::*;
        match self {
            ConfigLoadError{ path, .. } => write!(f, "Failed to load server config file '{}'", path.display()),
            StepError{ .. }             => write!(f, "Failed to set up the OpenVPN server"),
        }
    }
}
impl Error for SetupError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        use SetupError::*;
        match self {
            ConfigLoadError{ err, .. } => Some(err),
            StepError{ err }           => Some(err),
        }
    }
}



/// Errors that relate to the `client` subcommand.
#[derive(Debug)]
pub enum ClientError {
    /// One of the provisioning steps failed.
    StepError{ name: String, err: StepError },
    /// Failed to read one of the generated artifacts.
    ArtifactReadError{ path: PathBuf, err: std::io::Error },
    /// Failed to write the bundle to the output.
    OutputWriteError{ err: std::io::Error },
}
impl Display for ClientError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FResult {
        use ClientError::*;
        match self {
            StepError{ name, .. }         => write!(f, "Failed to create client '{name}'"),
            ArtifactReadError{ path, .. } => write!(f, "Failed to read client artifact '{}'", path.display()),
            OutputWriteError{ .. }        => write!(f, "Failed to write client bundle to output"),
        }
    }
}
impl Error for ClientError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        use ClientError::*;
        match self {
            StepError{ err, .. }         => Some(err),
            ArtifactReadError{ err, .. } => Some(err),
            OutputWriteError{ err }      => Some(err),
        }
    }
}



/// Errors that relate to the `status` and `test` subcommands.
#[derive(Debug)]
pub enum StatusError {
    /// Failed to write the report to the output.
    OutputWriteError{ err: std::io::Error },
    /// Failed to serialize the resolved locations.
    LocationsSerializeError{ err: vpn_cfg::spec::YamlError },
}
impl Display for StatusError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FResult {
        use StatusError::*;
        match self {
            OutputWriteError{ .. }        => write!(f, "Failed to write report to output"),
            LocationsSerializeError{ .. } => write!(f, "Failed to serialize locations"),
        }
    }
}
impl Error for StatusError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        use StatusError::*;
        match self {
            OutputWriteError{ err }        => Some(err),
            LocationsSerializeError{ err } => Some(err),
        }
    }
}



/// Errors that relate to parsing client names.
#[derive(Debug)]
pub enum ClientNameParseError {
    /// The name was empty.
    Empty,
    /// The name is one of the special directory names.
    Reserved{ raw: String },
    /// The name contains a character that cannot occur in a filename.
    IllegalCharacter{ raw: String, c: char },
    /// The name starts with a dash, and would be mistaken for an option.
    LeadingDash{ raw: String },
}
impl Display for ClientNameParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FResult {
        use ClientNameParseError::*;
        match self {
            Empty                       => write!(f, "Client name cannot be empty"),
            Reserved{ raw }             => write!(f, "'{raw}' is not a valid client name"),
            IllegalCharacter{ raw, c }  => write!(f, "Client name '{}' contains illegal character '{}'", raw, c.escape_debug()),
            LeadingDash{ raw }          => write!(f, "Client name '{raw}' cannot start with a dash"),
        }
    }
}
impl Error for ClientNameParseError {}



/// Errors that relate to parsing package manager commands.
#[derive(Debug)]
pub enum PackageManagerParseError {
    /// Failed to split the command into shell words.
    ExeParseError{ raw: String },
    /// The command did not contain any words.
    Empty{ raw: String },
}
impl Display for PackageManagerParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FResult {
        use PackageManagerParseError::*;
        match self {
            ExeParseError{ raw } => write!(f, "Failed to parse '{raw}' as a valid string of bash-arguments"),
            Empty{ raw }         => write!(f, "Package manager command '{raw}' is empty"),
        }
    }
}
impl Error for PackageManagerParseError {}





/***** TESTS *****/
