#![no_std]
#![deny(clippy::pedantic)]
#![deny(warnings)]

//! ML-KEM-1024 (Kyber-1024): the Fujisaki-Okamoto-wrapped IND-CCA2 key encapsulation
//! mechanism built on an IND-CPA public-key encryption scheme over `Z_q[X]/(X^256+1)`,
//! `q = 3329`, module rank `K = 4`.
//!
//! ```
//! use ml_kem_1024::traits::{Decaps, Encaps, KeyGen};
//! use ml_kem_1024::KG;
//!
//! # fn main() -> Result<(), &'static str> {
//! let (ek, dk) = KG::try_keygen()?;
//! let (ct, ss_sender) = ek.try_encaps()?;
//! let ss_receiver = dk.decaps(&ct);
//! assert_eq!(ss_sender, ss_receiver);
//! # Ok(())
//! # }
//! ```

mod ct;
mod field;
mod indcpa;
mod kem;
mod poly;
mod polyvec;
mod sampling;
mod symmetric;
pub mod traits;

pub use traits::{Ciphertext, DecapsulationKey, EncapsulationKey, SharedSecret, KG};

/// Byte length of a serialized encapsulation (public) key.
pub const EK_LEN: usize = kem::EK_LEN;
/// Byte length of a serialized decapsulation (secret) key.
pub const DK_LEN: usize = kem::DK_LEN;
/// Byte length of a serialized ciphertext.
pub const CT_LEN: usize = kem::CT_LEN;
/// Byte length of a shared secret.
pub const SSK_LEN: usize = 32;
