//! STB 34.101.77 ("bash") in Rust.
//!
//! The crate provides the `bash-f` sponge permutation, the `bash-hash` family
//! (32, 48 and 64 byte digests) and the `bash-prg` programmable automaton together
//! with the hashing and authenticated encryption schemes built on top of it.
#![no_std]

// Digests and automaton outputs require heap allocation
#[cfg(not(feature = "std"))]
#[macro_use]
extern crate alloc;

#[cfg(feature = "std")]
extern crate alloc;

#[cfg(feature = "std")]
#[macro_use]
extern crate std;

// Stub used when `std` is not available.
// Macros are exported at crate root level, that's why it's defined here.
#[cfg(not(feature = "std"))]
#[macro_export]
macro_rules! println {
    () => {{}};
    ($($arg:tt)*) => {{}};
}

#[cfg(feature = "std")]
pub use std::println;

#[cfg(not(feature = "err-location-log"))]
pub const LOCATION_LOG: bool = false;

#[cfg(feature = "err-location-log")]
pub const LOCATION_LOG: bool = true;

/// Fail with `$err` unless `$cond` holds, logging the location when enabled.
#[macro_export]
macro_rules! try_or {
    ($cond:expr, $err:expr) => {{
        let cond: bool = $cond;
        if $crate::LOCATION_LOG && !cond {
            $crate::println!("\n!!! Error occurred @ {}, {}", file!(), line!())
        }
        $crate::error::try_or(cond, $err)
    }};
}

/// Fail with `$err`, logging the location when enabled.
#[macro_export]
macro_rules! err {
    ($err:expr) => {{
        if $crate::LOCATION_LOG {
            $crate::println!("\n!!! Error occurred @ {}, {}", file!(), line!());
        }
        $crate::error::err($err)
    }};
}

pub mod error;
pub use error::{Error, Parameter, Result};

mod core;
mod schemes;

pub use crate::core::{
    hash::{bash256, bash384, bash512, bash_hash, Bash, Bash256, Bash384, Bash512},
    prg::{BashPrg, Command},
    prp::{
        bash_f::{bash_f, bash_s, BashF, ByteOrder},
        PRP,
    },
    rng::BashRng,
};
pub use schemes::{prg_ae_decrypt, prg_ae_encrypt, prg_hash};
