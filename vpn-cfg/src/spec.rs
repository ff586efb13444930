//  SPEC.rs
//    by Lut99
//
//  Created:
//    02 Oct 2026, 11:10:36
//  Last edited:
//    13 Oct 2026, 09:47:02
//  Auto updated?
//    Yes
//
//  Description:
//!   Defines (public) interfaces and structs that serve the interfaces
//!   and structs in `vpn-cfg`.
//

use std::error::Error;
use std::fmt::Debug;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::errors::ConfigError;


/***** LIBRARY *****/
/// Defines a serialization format in which a [`Config`] can be stored.
pub trait ConfigBackend {
    /// The types of errors that may be thrown by the (de)serialization function(s).
    type Error : 'static + Error;


    /// Serializes the given value to a string.
    ///
    /// # Arguments
    /// - `value`: The value to serialize.
    ///
    /// # Errors
    /// This function may error if the serialization failed.
    fn serialize(value: &impl Serialize) -> Result<String, Self::Error>;

    /// Deserializes a value from the given string.
    ///
    /// # Arguments
    /// - `raw`: The raw string to deserialize.
    ///
    /// # Errors
    /// This function may fail if the input string was invalid for `T`.
    fn deserialize_str<T: DeserializeOwned>(raw: &str) -> Result<T, Self::Error>;

    /// Deserializes a value from the given reader.
    ///
    /// # Arguments
    /// - `reader`: The `Read`er who's contents to deserialize.
    ///
    /// # Errors
    /// This function may fail if we failed to read from the reader or if its contents were invalid for `T`.
    fn deserialize_reader<T: DeserializeOwned>(reader: impl Read) -> Result<T, Self::Error>;
}



/// The [`ConfigBackend`] for JSON files, as handed to us by users.
#[derive(Clone, Copy, Debug)]
pub struct Json;
impl ConfigBackend for Json {
    type Error = serde_json::Error;

    #[inline]
    fn serialize(value: &impl Serialize) -> Result<String, Self::Error> { serde_json::to_string_pretty(value) }
    #[inline]
    fn deserialize_str<T: DeserializeOwned>(raw: &str) -> Result<T, Self::Error> { serde_json::from_str(raw) }
    #[inline]
    fn deserialize_reader<T: DeserializeOwned>(reader: impl Read) -> Result<T, Self::Error> { serde_json::from_reader(reader) }
}

/// The [`ConfigBackend`] for YAML files.
#[derive(Clone, Copy, Debug)]
pub struct Yaml;
impl ConfigBackend for Yaml {
    type Error = serde_yaml::Error;

    #[inline]
    fn serialize(value: &impl Serialize) -> Result<String, Self::Error> { serde_yaml::to_string(value) }
    #[inline]
    fn deserialize_str<T: DeserializeOwned>(raw: &str) -> Result<T, Self::Error> { serde_yaml::from_str(raw) }
    #[inline]
    fn deserialize_reader<T: DeserializeOwned>(reader: impl Read) -> Result<T, Self::Error> { serde_yaml::from_reader(reader) }
}

/// A type alias for the ConfigError of JSON configs.
pub type JsonError = ConfigError<serde_json::Error>;
/// A type alias for the ConfigError of YAML configs.
pub type YamlError = ConfigError<serde_yaml::Error>;



/// Defines a serializable struct that we typically use as configuration.
///
/// Implementors only have to choose a [`ConfigBackend`]; everything else is deduced.
pub trait Config: Clone + Debug + DeserializeOwned + Serialize {
    /// The format in which this config is stored.
    type Backend : ConfigBackend;


    /// Serializes this Config to a string.
    ///
    /// # Returns
    /// A new String that represents this config but serialized.
    ///
    /// # Errors
    /// This function may error if the serialization failed.
    fn to_string(&self) -> Result<String, ConfigError<<Self::Backend as ConfigBackend>::Error>> {
        match Self::Backend::serialize(self) {
            Ok(raw)  => Ok(raw),
            Err(err) => Err(ConfigError::StringSerializeError{ err }),
        }
    }

    /// Deserializes the given string to an instance of ourselves.
    ///
    /// # Arguments
    /// - `raw`: The raw string to deserialize.
    ///
    /// # Returns
    /// A new instance of `Self` with its contents read from the given raw string.
    ///
    /// # Errors
    /// This function may fail if the input string was invalid for this object.
    fn from_string(raw: impl AsRef<str>) -> Result<Self, ConfigError<<Self::Backend as ConfigBackend>::Error>> {
        match Self::Backend::deserialize_str(raw.as_ref()) {
            Ok(config) => Ok(config),
            Err(err)   => Err(ConfigError::StringDeserializeError{ err }),
        }
    }

    /// Deserializes the contents of the given reader to an instance of ourselves.
    ///
    /// # Arguments
    /// - `reader`: The `Read`er who's contents to deserialize.
    ///
    /// # Returns
    /// A new instance of `Self` with its contents read from the given reader.
    ///
    /// # Errors
    /// This function may fail if we failed to read from the reader or if its contents were invalid for this object.
    fn from_reader(reader: impl Read) -> Result<Self, ConfigError<<Self::Backend as ConfigBackend>::Error>> {
        match Self::Backend::deserialize_reader(reader) {
            Ok(config) => Ok(config),
            Err(err)   => Err(ConfigError::ReaderDeserializeError{ err }),
        }
    }

    /// Deserializes this Config from the file at the given path.
    ///
    /// # Arguments
    /// - `path`: The path where to read the file from.
    ///
    /// # Errors
    /// This function may fail if we failed to open/read from the file or if its contents were invalid for this object.
    fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError<<Self::Backend as ConfigBackend>::Error>> {
        let path: &Path = path.as_ref();

        // Attempt to open the given file
        let handle: File = match File::open(path) {
            Ok(handle) => handle,
            Err(err)   => { return Err(ConfigError::InputOpenError{ path: path.into(), err }); },
        };

        // Read it using the child function, wrapping the error that may occur
        match Self::from_reader(handle) {
            Ok(config)                                      => Ok(config),
            Err(ConfigError::ReaderDeserializeError{ err }) => Err(ConfigError::FileDeserializeError{ path: path.into(), err }),
            Err(err)                                        => Err(err),
        }
    }
}
