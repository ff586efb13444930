//  ERRORS.rs
//    by Lut99
// 
//  Created:
//    02 Oct 2026, 11:04:13
//  Last edited:
//    13 Oct 2026, 09:50:40
//  Auto updated?
//    Yes
// 
//  Description:
//!   Defines errors that occur in the `vpn-cfg` crate.
// 

use std::error::Error;
use std::fmt::{Debug, Display, Formatter, Result as FResult};
use std::path::PathBuf;


/***** LIBRARY *****/
/// Errors that relate to writing the easy-rsa declarations of a [`ServerConfig`](crate::server::ServerConfig).
#[derive(Debug)]
pub enum DeclarationsError {
    /// Failed to write the declarations file.
    FileWriteError{ path: PathBuf, err: std::io::Error },
    /// Failed to set the permissions of the declarations file.
    FilePermissionsError{ path: PathBuf, err: std::io::Error },
}
impl Display for DeclarationsError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FResult {
        use DeclarationsError::*;
        match self {
            FileWriteError{ path, .. }       => write!(f, "Failed to write declarations file '{}'", path.display()),
            FilePermissionsError{ path, .. } => write!(f, "Failed to set permissions of declarations file '{}'", path.display()),
        }
    }
}
impl Error for DeclarationsError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        use DeclarationsError::*;
        match self {
            FileWriteError{ err, .. }       => Some(err),
            FilePermissionsError{ err, .. } => Some(err),
        }
    }
}



/// Defines general errors for configs.
#[derive(Debug)]
pub enum ConfigError<E: Debug> {
    /// Failed to open the input file.
    InputOpenError{ path: PathBuf, err: std::io::Error },

    /// Failed to serialize the config to a string.
    StringSerializeError{ err: E },

    /// Failed to deserialize a string to the config.
    StringDeserializeError{ err: E },
    /// Failed to deserialize a reader to the config.
    ReaderDeserializeError{ err: E },
    /// Failed to deserialize a file to the config.
    FileDeserializeError{ path: PathBuf, err: E },
}
impl<E: Debug> Display for ConfigError<E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FResult {
        use ConfigError::*;
        match self {
            InputOpenError{ path, .. } => write!(f, "Failed to open input file '{}'", path.display()),

            StringSerializeError{ .. } => write!(f, "Failed to serialize to string"),

            StringDeserializeError{ .. }     => write!(f, "Failed to deserialize from string"),
            ReaderDeserializeError{ .. }     => write!(f, "Failed to deserialize from a reader"),
            FileDeserializeError{ path, .. } => write!(f, "Failed to deserialize from input file '{}'", path.display()),
        }
    }
}
impl<E: 'static + Error> Error for ConfigError<E> {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        use ConfigError::*;
        match self {
            InputOpenError{ err, .. } => Some(err),

            StringSerializeError{ err } => Some(err),

            StringDeserializeError{ err }     => Some(err),
            ReaderDeserializeError{ err }     => Some(err),
            FileDeserializeError{ err, .. }   => Some(err),
        }
    }
}
