//  LIB.rs
//    by Lut99
//
//  Created:
//    02 Oct 2026, 10:12:31
//  Last edited:
//    14 Oct 2026, 16:40:02
//  Auto updated?
//    Yes
//
//  Description:
//!   The `vpn-shr` crate defines common functions and other tools used
//!   throughout the project. Most notably, it implements the runner that
//!   executes external commands while relaying their output to the user.
//

// Declare some modules
pub mod errors;
pub mod jobs;
