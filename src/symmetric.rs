//! Façade over the external SHA3/SHAKE oracles this crate treats as fixed byte-in /
//! byte-out primitives: `H`, `G`, the matrix-generation XOF, `PRF`, and `rkprf`.

use sha3::digest::{ExtendableOutput, Update, XofReader};
use sha3::{Digest, Sha3_256, Sha3_512, Shake128, Shake256};

/// `H(s) = SHA3-256(s)`.
#[must_use]
pub(crate) fn hash_h(bytes: &[u8]) -> [u8; 32] {
    let mut hasher = Sha3_256::new();
    Digest::update(&mut hasher, bytes);
    hasher.finalize().into()
}

/// `G(s) = SHA3-512(s)`, split into two 32-byte halves.
#[must_use]
pub(crate) fn hash_g(bytes: &[u8]) -> ([u8; 32], [u8; 32]) {
    let mut hasher = Sha3_512::new();
    Digest::update(&mut hasher, bytes);
    let digest = hasher.finalize();
    let a = digest[0..32].try_into().expect("sha3-512 output is 64 bytes");
    let b = digest[32..64].try_into().expect("sha3-512 output is 64 bytes");
    (a, b)
}

/// SHAKE-128 absorbing `seed || i || j`, returned as a lazily-squeezed reader. Matrix
/// generation reads this three bytes at a time until it has enough accepted coefficients;
/// the reader hides whatever block size the implementation squeezes internally.
pub(crate) fn xof(seed: &[u8; 32], i: u8, j: u8) -> impl XofReader {
    let mut hasher = Shake128::default();
    hasher.update(seed);
    hasher.update(&[i]);
    hasher.update(&[j]);
    hasher.finalize_xof()
}

/// `PRF(s, b) = SHAKE256(s || b)`, read out to exactly `LEN` bytes.
#[must_use]
pub(crate) fn prf<const LEN: usize>(seed: &[u8; 32], nonce: u8) -> [u8; LEN] {
    let mut hasher = Shake256::default();
    hasher.update(seed);
    hasher.update(&[nonce]);
    let mut reader = hasher.finalize_xof();
    let mut out = [0u8; LEN];
    reader.read(&mut out);
    out
}

/// `rkprf(z, ct) = SHAKE256(z || ct)` truncated to 32 bytes; the implicit-rejection key
/// substituted for the real shared secret whenever decapsulation's re-encryption check fails.
#[must_use]
pub(crate) fn rkprf(z: &[u8; 32], ct: &[u8]) -> [u8; 32] {
    let mut hasher = Shake256::default();
    hasher.update(z);
    hasher.update(ct);
    let mut reader = hasher.finalize_xof();
    let mut out = [0u8; 32];
    reader.read(&mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_h_is_deterministic() {
        let a = hash_h(b"kyber");
        let b = hash_h(b"kyber");
        assert_eq!(a, b);
    }

    #[test]
    fn prf_output_length_matches_const_generic() {
        let seed = [1u8; 32];
        let out: [u8; 64] = prf(&seed, 3);
        assert_eq!(out.len(), 64);
    }

    #[test]
    fn rkprf_is_sensitive_to_ciphertext() {
        let z = [2u8; 32];
        let a = rkprf(&z, &[0u8; 8]);
        let b = rkprf(&z, &[1u8; 8]);
        assert_ne!(a, b);
    }
}
