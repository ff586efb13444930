//  LIB.rs
//    by Lut99
// 
//  Created:
//    02 Oct 2026, 11:02:48
//  Last edited:
//    13 Oct 2026, 09:51:17
//  Auto updated?
//    Yes
// 
//  Description:
//!   The `vpn-cfg` library provides functions for reading `vpnctl`
//!   configuration files: the certificate fields for the server's PKI
//!   and the locations of everything on disk.
// 

// Declare modules
pub mod errors;
pub mod locations;
pub mod server;
pub mod spec;
