//  STEPS.rs
//    by Lut99
//
//  Created:
//    05 Oct 2026, 13:02:19
//  Last edited:
//    15 Oct 2026, 10:24:48
//  Auto updated?
//    Yes
//
//  Description:
//!   Defines the provisioning steps, i.e., the units of work that the
//!   `setup-server` and `client` subcommands are made of. Steps do not
//!   check whether they are necessary; that is up to the caller.
//

use std::borrow::Cow;
use std::fmt::{Display, Formatter, Result as FResult};
use std::path::Path;

use enum_debug::EnumDebug;
use log::{debug, info};

use vpn_cfg::locations::{Locations, SERVER_KEY_FILES};
use vpn_cfg::server::ServerConfig;
use vpn_shr::jobs::Invocation;

pub use crate::errors::StepError as Error;
use crate::executor::Executor;
use crate::probes::Probe;
use crate::spec::{ClientName, PackageManager};


/***** CONSTANTS *****/
/// The sed-script that comments out the `subjectAltName` directive in easy-rsa's OpenSSL config, which breaks certificate generation when `KEY_ALTNAMES` is not set.
const SED_DISABLE_ALTNAME: &str = r"s/^\(subjectAltName=\)/# \1/g";

/// The sed-script that makes the sample server config use the DH parameters that easy-rsa generates.
const SED_DH_PARAMS: &str = r"s/dh dh1024\.pem/dh dh2048.pem/g";





/***** HELPER FUNCTIONS *****/
/// Escapes the given string for use in a `bash` script.
#[inline]
fn quote(raw: &str) -> Cow<str> { shlex::try_quote(raw).unwrap_or(Cow::Borrowed(raw)) }

/// Escapes the given path for use in a `bash` script.
#[inline]
fn quote_path(path: impl AsRef<Path>) -> String { quote(&path.as_ref().display().to_string()).into_owned() }

/// Renders the given path as an argument.
#[inline]
fn arg(path: impl AsRef<Path>) -> String { path.as_ref().display().to_string() }

/// Returns the commands that enter the easy-rsa directory and load both the base and the custom declarations.
fn easy_rsa_preamble(locs: &Locations) -> Vec<String> {
    vec![
        format!("cd {}", quote_path(&locs.easy_rsa_dir)),
        "source ./vars > /dev/null".into(),
        "source ./vars-custom".into(),
    ]
}

/// Runs the given commands in order, stopping at the first that fails.
///
/// # Arguments
/// - `exec`: The [`Executor`] to run them with.
/// - `step`: The [`Step`] the commands belong to.
/// - `invocations`: The commands to run.
///
/// # Errors
/// This function errors if any of the commands fails.
async fn run_all(exec: &dyn Executor, step: Step, invocations: impl IntoIterator<Item = Invocation>) -> Result<(), Error> {
    for invocation in invocations {
        debug!("[{}] Running '{}'", step.variant(), invocation);
        if let Err(err) = exec.run(&invocation).await { return Err(Error::CommandFailure{ step, err }); }
    }
    Ok(())
}





/***** AUXILLARY *****/
/// Names the provisioning steps.
#[derive(Clone, Copy, Debug, EnumDebug, Eq, PartialEq)]
pub enum Step {
    /// Installs the OpenVPN package.
    InstallOpenVpn,
    /// Installs the easy-rsa package.
    InstallEasyRsa,
    /// Creates the easy-rsa working directory.
    MakeCaDir,
    /// Writes the custom declarations for easy-rsa.
    WriteCustomVars,
    /// Builds the CA, the server certificate and the DH parameters.
    InitializePki,
    /// Copies the server keys to the OpenVPN directory.
    RelocateKeys,
    /// Writes the server configuration.
    WriteServerConfig,
    /// Builds a key and certificate for a client.
    BuildClientKey,
}
impl Display for Step {
    fn fmt(&self, f: &mut Formatter<'_>) -> FResult {
        use Step::*;
        match self {
            InstallOpenVpn    => write!(f, "install OpenVPN"),
            InstallEasyRsa    => write!(f, "install easy-rsa"),
            MakeCaDir         => write!(f, "create the easy-rsa directory"),
            WriteCustomVars   => write!(f, "write custom variables"),
            InitializePki     => write!(f, "initialize the PKI"),
            RelocateKeys      => write!(f, "copy the server keys to the OpenVPN directory"),
            WriteServerConfig => write!(f, "write the server config"),
            BuildClientKey    => write!(f, "build the client key"),
        }
    }
}





/***** LIBRARY *****/
/// Fails if the PKI has not been initialized yet.
///
/// # Arguments
/// - `exec`: The [`Executor`] to probe with.
/// - `locs`: The [`Locations`] that tell us where everything is.
///
/// # Errors
/// This function errors with [`Error::PkiNotInitialized`] if the server certificate does not exist.
pub async fn require_pki(exec: &dyn Executor, locs: &Locations) -> Result<(), Error> {
    if !Probe::PkiInitialized.holds(exec, locs).await { return Err(Error::PkiNotInitialized{ path: locs.pki_server_cert() }); }
    Ok(())
}



/// Installs the OpenVPN package.
///
/// # Arguments
/// - `exec`: The [`Executor`] to run the command with.
/// - `pm`: The [`PackageManager`] to install with.
///
/// # Errors
/// This function errors if the package manager fails.
pub async fn install_openvpn(exec: &dyn Executor, pm: &PackageManager) -> Result<(), Error> {
    info!("Installing OpenVPN using '{}'...", pm);
    run_all(exec, Step::InstallOpenVpn, [ pm.install("openvpn") ]).await
}

/// Installs the easy-rsa package.
///
/// # Arguments
/// - `exec`: The [`Executor`] to run the command with.
/// - `pm`: The [`PackageManager`] to install with.
///
/// # Errors
/// This function errors if the package manager fails.
pub async fn install_easy_rsa(exec: &dyn Executor, pm: &PackageManager) -> Result<(), Error> {
    info!("Installing easy-rsa using '{}'...", pm);
    run_all(exec, Step::InstallEasyRsa, [ pm.install("easy-rsa") ]).await
}

/// Creates the easy-rsa working directory with `make-cadir`.
///
/// # Arguments
/// - `exec`: The [`Executor`] to run the command with.
/// - `locs`: The [`Locations`] that tell us where the directory goes.
///
/// # Errors
/// This function errors if `make-cadir` fails (e.g., because the directory already exists).
pub async fn make_cadir(exec: &dyn Executor, locs: &Locations) -> Result<(), Error> {
    info!("Creating easy-rsa directory '{}'...", locs.easy_rsa_dir.display());
    run_all(exec, Step::MakeCaDir, [ Invocation::new("make-cadir").arg(arg(&locs.easy_rsa_dir)) ]).await
}

/// Writes the declarations of the given server config to the `vars-custom` file in the easy-rsa directory.
///
/// # Arguments
/// - `locs`: The [`Locations`] that tell us where the file goes.
/// - `config`: The [`ServerConfig`] to write.
///
/// # Errors
/// This function errors if we failed to write the file.
pub fn write_custom_vars(locs: &Locations, config: &ServerConfig) -> Result<(), Error> {
    info!("Writing custom variables to '{}'...", locs.vars_custom().display());
    config.write_declarations(locs.vars_custom()).map_err(|err| Error::DeclarationsError{ err })
}

/// Builds the CA, the server key and certificate and the Diffie-Hellman parameters.
///
/// This wipes any existing keys in the easy-rsa directory.
///
/// # Arguments
/// - `exec`: The [`Executor`] to run the commands with.
/// - `locs`: The [`Locations`] that tell us where everything is.
///
/// # Errors
/// This function errors if patching the OpenSSL config or any of the easy-rsa scripts fails.
pub async fn initialize_pki(exec: &dyn Executor, locs: &Locations) -> Result<(), Error> {
    info!("Initializing PKI in '{}'...", locs.easy_rsa_dir.display());

    // Build the script that runs all easy-rsa commands in one environment
    let mut script: Vec<String> = easy_rsa_preamble(locs);
    script.extend([
        "./clean-all".into(),
        "./build-ca --batch".into(),
        "export KEY_CN=server".into(),
        "./build-key-server --batch server".into(),
        "./build-dh".into(),
    ]);

    run_all(exec, Step::InitializePki, [
        Invocation::new("sed").args([ "-i".to_string(), SED_DISABLE_ALTNAME.into(), arg(locs.openssl_cnf()) ]),
        Invocation::new("ln").args([ "-sfn".to_string(), arg(locs.openssl_cnf()), arg(locs.openssl_alias()) ]),
        Invocation::shell_chain(script),
    ]).await
}

/// Copies the CA certificate and key, the DH parameters and the server certificate and key to the OpenVPN directory.
///
/// # Arguments
/// - `exec`: The [`Executor`] to run the command with.
/// - `locs`: The [`Locations`] that tell us where everything is.
///
/// # Errors
/// This function errors if the PKI is not initialized or if copying fails.
pub async fn relocate_keys(exec: &dyn Executor, locs: &Locations) -> Result<(), Error> {
    require_pki(exec, locs).await?;
    info!("Copying server keys to '{}'...", locs.openvpn_dir.display());
    run_all(exec, Step::RelocateKeys, [
        Invocation::new("cp").args(SERVER_KEY_FILES.iter().map(|file| arg(locs.key_file(file)))).arg(arg(&locs.openvpn_dir)),
    ]).await
}

/// Writes the server configuration, based on the sample configuration shipped with OpenVPN.
///
/// The second octet of the VPN subnet (`10.8.0.0/24` in the sample) is replaced with `subnet_octet`, to avoid clashing with other default deployments.
///
/// # Arguments
/// - `exec`: The [`Executor`] to run the commands with.
/// - `locs`: The [`Locations`] that tell us where everything is.
/// - `subnet_octet`: The second octet of the VPN subnet.
///
/// # Errors
/// This function errors if unpacking or patching the configuration fails.
pub async fn write_server_config(exec: &dyn Executor, locs: &Locations, subnet_octet: u8) -> Result<(), Error> {
    info!("Writing server config '{}' with subnet 10.{}.0.0/24...", locs.server_conf().display(), subnet_octet);
    let subnet: String = format!(r"s/^\(server 10\.\)8\(\.0\.0 255\.255\.255\.0\)/\1{subnet_octet}\2/g");
    run_all(exec, Step::WriteServerConfig, [
        Invocation::shell(format!("gunzip -c {} > {}", quote_path(&locs.sample_config), quote_path(locs.server_conf()))),
        Invocation::new("sed").args([ "-i".to_string(), SED_DH_PARAMS.into(), arg(locs.server_conf()) ]),
        Invocation::new("sed").args([ "-i".to_string(), subnet, arg(locs.server_conf()) ]),
    ]).await
}

/// Builds a key and certificate for the given client.
///
/// # Arguments
/// - `exec`: The [`Executor`] to run the command with.
/// - `locs`: The [`Locations`] that tell us where everything is.
/// - `name`: The [`ClientName`] to build the key for.
///
/// # Errors
/// This function errors if the easy-rsa scripts fail.
pub async fn build_client_key(exec: &dyn Executor, locs: &Locations, name: &ClientName) -> Result<(), Error> {
    info!("Building key and certificate for client '{}'...", name);
    let mut script: Vec<String> = easy_rsa_preamble(locs);
    script.extend([
        format!("export KEY_CN={}", quote(name.as_str())),
        format!("./build-key --batch {}", quote(name.as_str())),
    ]);
    run_all(exec, Step::BuildClientKey, [ Invocation::shell_chain(script) ]).await
}





/***** TESTS *****/
#[cfg(test)]
mod tests {
    use std::fs;
    use std::str::FromStr as _;

    use super::*;
    use crate::executor::mock::MockExecutor;


    #[tokio::test]
    async fn test_initialize_pki_commands() {
        let exec = MockExecutor::default();
        initialize_pki(&exec, &Locations::default()).await.unwrap();
        assert_eq!(exec.run_lines(), vec![
            r"sed -i 's/^\(subjectAltName=\)/# \1/g' /etc/openvpn/easy-rsa/openssl-1.0.0.cnf".to_string(),
            "ln -sfn /etc/openvpn/easy-rsa/openssl-1.0.0.cnf /etc/openvpn/easy-rsa/openssl.cnf".to_string(),
            "bash -c 'cd /etc/openvpn/easy-rsa && source ./vars > /dev/null && source ./vars-custom && ./clean-all && ./build-ca --batch && export KEY_CN=server && ./build-key-server --batch server && ./build-dh'".to_string(),
        ]);
    }

    #[tokio::test]
    async fn test_initialize_pki_stops_at_failure() {
        let exec = MockExecutor{ failing: vec![ "ln -sfn".into() ], ..Default::default() };
        match initialize_pki(&exec, &Locations::default()).await {
            Err(Error::CommandFailure{ step: Step::InitializePki, .. }) => {},
            res                                                        => panic!("Expected a command failure, got {res:?}"),
        }
        // The easy-rsa scripts never ran
        assert_eq!(exec.runs().len(), 2);
    }

    #[tokio::test]
    async fn test_build_client_key_quotes_name() {
        let exec = MockExecutor::default();
        let name = ClientName::from_str("bob's laptop").unwrap();
        build_client_key(&exec, &Locations::default(), &name).await.unwrap();
        let runs = exec.runs();
        assert_eq!(runs.len(), 1);
        let script: &str = runs[0].script().unwrap();
        assert!(script.starts_with("cd /etc/openvpn/easy-rsa && source ./vars > /dev/null && source ./vars-custom && "));
        assert!(script.ends_with(&format!("./build-key --batch {}", shlex::try_quote("bob's laptop").unwrap())));
    }

    #[tokio::test]
    async fn test_relocate_keys_requires_pki() {
        let root = tempfile::tempdir().unwrap();
        let locs = Locations::under(root.path());
        let exec = MockExecutor::default();
        assert!(matches!(relocate_keys(&exec, &locs).await, Err(Error::PkiNotInitialized{ .. })));
        assert!(exec.runs().is_empty());

        fs::create_dir_all(locs.keys_dir()).unwrap();
        fs::write(locs.pki_server_cert(), "cert").unwrap();
        relocate_keys(&exec, &locs).await.unwrap();
        let runs = exec.runs();
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].program, "cp");
        assert_eq!(runs[0].args.len(), SERVER_KEY_FILES.len() + 1);
        assert_eq!(runs[0].args.last(), Some(&arg(&locs.openvpn_dir)));
    }

    #[tokio::test]
    async fn test_write_server_config_subnet() {
        let exec = MockExecutor::default();
        write_server_config(&exec, &Locations::default(), 42).await.unwrap();
        let lines = exec.run_lines();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "bash -c 'gunzip -c /usr/share/doc/openvpn/examples/sample-config-files/server.conf.gz > /etc/openvpn/server.conf'");
        assert_eq!(lines[1], r"sed -i 's/dh dh1024\.pem/dh dh2048.pem/g' /etc/openvpn/server.conf");
        assert_eq!(exec.runs()[2].args[1], r"s/^\(server 10\.\)8\(\.0\.0 255\.255\.255\.0\)/\142\2/g");
    }

    #[test]
    fn test_write_custom_vars() {
        let root = tempfile::tempdir().unwrap();
        let locs = Locations::under(root.path());
        fs::create_dir_all(&locs.easy_rsa_dir).unwrap();

        let config = ServerConfig{ city: Some("Springfield".into()), org: Some("".into()), ..Default::default() };
        write_custom_vars(&locs, &config).unwrap();
        assert_eq!(fs::read_to_string(locs.vars_custom()).unwrap(), "export KEY_CITY=\"Springfield\"");
    }

    #[test]
    fn test_write_custom_vars_missing_dir() {
        let root = tempfile::tempdir().unwrap();
        let locs = Locations::under(root.path());
        assert!(matches!(write_custom_vars(&locs, &ServerConfig::default()), Err(Error::DeclarationsError{ .. })));
    }
}
