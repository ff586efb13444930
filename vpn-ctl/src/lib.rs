//  LIB.rs
//    by Lut99
//
//  Created:
//    04 Oct 2026, 09:30:12
//  Last edited:
//    15 Oct 2026, 11:02:37
//  Auto updated?
//    Yes
//
//  Description:
//!   The `vpnctl` executable provisions an OpenVPN server and its
//!   easy-rsa PKI on the local host, and issues client certificates.
//

// Declare modules
pub mod client;
pub mod errors;
pub mod executor;
pub mod probes;
pub mod server;
pub mod spec;
pub mod status;
pub mod steps;
