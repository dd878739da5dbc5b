//! Idiomatic entry points over the byte-in/byte-out KEM functions in [`crate::kem`].
//!
//! These traits give the fixed-size key/ciphertext byte layouts a typed, move-semantics
//! surface (`EncapsulationKey`, `DecapsulationKey`, `Ciphertext`, `SharedSecret`) instead
//! of output-parameter functions, while leaving the underlying byte formats and security
//! properties unchanged.

use rand_core::CryptoRngCore;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::kem;

/// A 32-byte shared secret produced by encapsulation or decapsulation.
///
/// Compared in constant time; the derived `PartialEq` would short-circuit on the first
/// differing byte, leaking timing information about a secret value.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SharedSecret([u8; 32]);

impl SharedSecret {
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 32] { &self.0 }
}

impl PartialEq for SharedSecret {
    fn eq(&self, other: &Self) -> bool { crate::ct::verify(&self.0, &other.0) == 0 }
}

impl Eq for SharedSecret {}

impl core::fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("SharedSecret(..)")
    }
}

/// An ML-KEM-1024 encapsulation (public) key.
#[derive(Clone)]
pub struct EncapsulationKey([u8; kem::EK_LEN]);

/// An ML-KEM-1024 decapsulation (secret) key. Zeroized on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct DecapsulationKey([u8; kem::DK_LEN]);

/// An ML-KEM-1024 ciphertext.
#[derive(Clone)]
pub struct Ciphertext([u8; kem::CT_LEN]);

/// Generates a fresh keypair, either from system randomness or a caller-supplied RNG.
pub trait KeyGen {
    /// The encapsulation (public) key type this implementation produces.
    type EncapsulationKey;
    /// The decapsulation (secret) key type this implementation produces.
    type DecapsulationKey;

    /// Generates a keypair using the default OS randomness source.
    ///
    /// # Errors
    /// Returns an error only if the randomness source fails.
    #[cfg(feature = "default-rng")]
    fn try_keygen() -> Result<(Self::EncapsulationKey, Self::DecapsulationKey), &'static str>;

    /// Generates a keypair using the given RNG.
    ///
    /// # Errors
    /// Returns an error only if `rng` fails to supply bytes.
    fn try_keygen_with_rng(
        rng: &mut impl CryptoRngCore,
    ) -> Result<(Self::EncapsulationKey, Self::DecapsulationKey), &'static str>;
}

/// Marker type implementing [`KeyGen`] for the ML-KEM-1024 parameter set.
pub struct KG();

impl KeyGen for KG {
    type DecapsulationKey = DecapsulationKey;
    type EncapsulationKey = EncapsulationKey;

    #[cfg(feature = "default-rng")]
    fn try_keygen() -> Result<(EncapsulationKey, DecapsulationKey), &'static str> {
        let mut rng = rand_core::OsRng;
        Self::try_keygen_with_rng(&mut rng)
    }

    fn try_keygen_with_rng(
        rng: &mut impl CryptoRngCore,
    ) -> Result<(EncapsulationKey, DecapsulationKey), &'static str> {
        let (ek, dk) = kem::keypair(rng)?;
        Ok((EncapsulationKey(ek), DecapsulationKey(dk)))
    }
}

/// Encapsulates a fresh shared secret against an encapsulation key.
pub trait Encaps {
    /// The ciphertext type produced alongside the shared secret.
    type Ciphertext;
    /// The shared secret type produced.
    type SharedSecret;

    /// Encapsulates using the default OS randomness source.
    ///
    /// # Errors
    /// Returns an error only if the randomness source fails.
    #[cfg(feature = "default-rng")]
    fn try_encaps(&self) -> Result<(Self::Ciphertext, Self::SharedSecret), &'static str>;

    /// Encapsulates using the given RNG.
    ///
    /// # Errors
    /// Returns an error only if `rng` fails to supply bytes.
    fn try_encaps_with_rng(
        &self, rng: &mut impl CryptoRngCore,
    ) -> Result<(Self::Ciphertext, Self::SharedSecret), &'static str>;
}

impl Encaps for EncapsulationKey {
    type Ciphertext = Ciphertext;
    type SharedSecret = SharedSecret;

    #[cfg(feature = "default-rng")]
    fn try_encaps(&self) -> Result<(Ciphertext, SharedSecret), &'static str> {
        let mut rng = rand_core::OsRng;
        self.try_encaps_with_rng(&mut rng)
    }

    fn try_encaps_with_rng(
        &self, rng: &mut impl CryptoRngCore,
    ) -> Result<(Ciphertext, SharedSecret), &'static str> {
        let (ct, ss) = kem::encapsulate(&self.0, rng)?;
        Ok((Ciphertext(ct), SharedSecret(ss)))
    }
}

/// Decapsulates a ciphertext with a decapsulation key, always succeeding (implicit
/// rejection absorbs any tamper into a pseudo-random shared secret).
pub trait Decaps {
    /// The ciphertext type this implementation accepts.
    type Ciphertext;
    /// The shared secret type produced.
    type SharedSecret;

    fn decaps(&self, ct: &Self::Ciphertext) -> Self::SharedSecret;
}

impl Decaps for DecapsulationKey {
    type Ciphertext = Ciphertext;
    type SharedSecret = SharedSecret;

    fn decaps(&self, ct: &Ciphertext) -> SharedSecret { SharedSecret(kem::decapsulate(&ct.0, &self.0)) }
}

/// Fixed-width serialization for the KEM's public types.
pub trait SerDes {
    /// The exact byte array type this value serializes to/from.
    type ByteArray;

    /// Serializes into the fixed-width byte array.
    fn into_bytes(self) -> Self::ByteArray;

    /// Deserializes from the fixed-width byte array.
    ///
    /// # Errors
    /// Returns an error if the byte contents are structurally inconsistent (e.g. this
    /// type never actually fails here since every `ByteArray` of the right length is
    /// a valid encoding, but the signature is kept fallible to match the other types).
    fn try_from_bytes(bytes: Self::ByteArray) -> Result<Self, &'static str>
    where
        Self: Sized;
}

impl SerDes for EncapsulationKey {
    type ByteArray = [u8; kem::EK_LEN];

    fn into_bytes(self) -> Self::ByteArray { self.0 }

    fn try_from_bytes(bytes: Self::ByteArray) -> Result<Self, &'static str> { Ok(EncapsulationKey(bytes)) }
}

impl SerDes for DecapsulationKey {
    type ByteArray = [u8; kem::DK_LEN];

    fn into_bytes(self) -> Self::ByteArray { self.0 }

    fn try_from_bytes(bytes: Self::ByteArray) -> Result<Self, &'static str> { Ok(DecapsulationKey(bytes)) }
}

impl SerDes for Ciphertext {
    type ByteArray = [u8; kem::CT_LEN];

    fn into_bytes(self) -> Self::ByteArray { self.0 }

    fn try_from_bytes(bytes: Self::ByteArray) -> Result<Self, &'static str> { Ok(Ciphertext(bytes)) }
}

impl SerDes for SharedSecret {
    type ByteArray = [u8; 32];

    fn into_bytes(self) -> Self::ByteArray { self.0 }

    fn try_from_bytes(bytes: Self::ByteArray) -> Result<Self, &'static str> { Ok(SharedSecret(bytes)) }
}


#[cfg(test)]
mod tests {
    use super::derand;
    use super::*;

    #[test]
    fn keygen_encaps_decaps_round_trip() {
        let (ek, dk) = derand::keygen(&[13u8; 64]);
        let (ct, ss1) = derand::encaps(&ek, &[21u8; 32]);
        let ss2 = dk.decaps(&ct);
        assert_eq!(ss1, ss2);
    }

    #[test]
    fn serdes_round_trips_every_type() {
        let (ek, dk) = derand::keygen(&[1u8; 64]);
        let (ct, ss) = derand::encaps(&ek, &[2u8; 32]);

        let ek_bytes = ek.clone().into_bytes();
        let ek2 = EncapsulationKey::try_from_bytes(ek_bytes).unwrap();
        assert_eq!(ek2.into_bytes(), ek.into_bytes());

        let dk_bytes = dk.clone().into_bytes();
        let dk2 = DecapsulationKey::try_from_bytes(dk_bytes).unwrap();
        assert_eq!(dk2.decaps(&ct), dk.decaps(&ct));

        let ct_bytes = ct.clone().into_bytes();
        let ct2 = Ciphertext::try_from_bytes(ct_bytes).unwrap();
        assert_eq!(dk.decaps(&ct2), ss);
    }
}
