//! The Fujisaki-Okamoto transform with implicit rejection: wraps `indcpa` into an
//! IND-CCA2 key encapsulation mechanism. `keypair_derand` / `encapsulate_derand` /
//! `decapsulate` are the deterministic core; `keypair` / `encapsulate` draw their coins
//! from a caller-supplied RNG and are the only fallible operations in the crate.

use rand_core::CryptoRngCore;

use crate::ct::{cmov, verify};
use crate::indcpa::{self, CIPHERTEXT_BYTES, PUBLIC_KEY_BYTES, SECRET_KEY_BYTES};
use crate::symmetric::{hash_g, hash_h, rkprf};

pub(crate) const EK_LEN: usize = PUBLIC_KEY_BYTES;
pub(crate) const DK_LEN: usize = SECRET_KEY_BYTES + PUBLIC_KEY_BYTES + 64;
pub(crate) const CT_LEN: usize = CIPHERTEXT_BYTES;

/// `Kem::keypair_derand`: builds the KEM secret key by appending `pk`, `H(pk)`, and the
/// implicit-rejection secret `z` to the IND-CPA secret key.
pub(crate) fn keypair_derand(coins: &[u8; 64]) -> ([u8; EK_LEN], [u8; DK_LEN]) {
    let d: [u8; 32] = coins[0..32].try_into().unwrap();
    let z: [u8; 32] = coins[32..64].try_into().unwrap();

    let (pk, sk_cpa) = indcpa::keypair_derand(&d);

    let mut dk = [0u8; DK_LEN];
    let mut off = 0;
    dk[off..off + SECRET_KEY_BYTES].copy_from_slice(&sk_cpa.0);
    off += SECRET_KEY_BYTES;
    dk[off..off + PUBLIC_KEY_BYTES].copy_from_slice(&pk.0);
    off += PUBLIC_KEY_BYTES;
    dk[off..off + 32].copy_from_slice(&hash_h(&pk.0));
    off += 32;
    dk[off..off + 32].copy_from_slice(&z);

    (pk.0, dk)
}

/// Draws 64 fresh bytes of randomness and derives a keypair from them.
pub(crate) fn keypair(rng: &mut impl CryptoRngCore) -> Result<([u8; EK_LEN], [u8; DK_LEN]), &'static str> {
    let mut coins = [0u8; 64];
    rng.try_fill_bytes(&mut coins).map_err(|_| "rng failed to fill keypair coins")?;
    Ok(keypair_derand(&coins))
}

/// `Kem::encapsulate_derand`: encrypts a freshly-derived message under `pk` and returns
/// the ciphertext along with the shared secret.
pub(crate) fn encapsulate_derand(pk: &[u8; EK_LEN], coins: &[u8; 32]) -> ([u8; CT_LEN], [u8; 32]) {
    let mut buf = [0u8; 64];
    buf[..32].copy_from_slice(coins);
    buf[32..].copy_from_slice(&hash_h(pk));
    let (k_bar, r) = hash_g(&buf);

    let ct = indcpa::enc(coins, pk, &r);
    (ct, k_bar)
}

/// Draws 32 fresh bytes of randomness and encapsulates against them.
pub(crate) fn encapsulate(
    pk: &[u8; EK_LEN], rng: &mut impl CryptoRngCore,
) -> Result<([u8; CT_LEN], [u8; 32]), &'static str> {
    let mut coins = [0u8; 32];
    rng.try_fill_bytes(&mut coins).map_err(|_| "rng failed to fill encapsulation coins")?;
    Ok(encapsulate_derand(pk, &coins))
}

/// `Kem::decapsulate`: always succeeds. On a tampered ciphertext the returned secret is
/// the pseudo-random `rkprf(z, ct)` rather than a signal of failure. The same code path
/// runs on success and failure so timing cannot reveal which occurred.
pub(crate) fn decapsulate(ct: &[u8; CT_LEN], dk: &[u8; DK_LEN]) -> [u8; 32] {
    let mut off = 0;
    let sk_cpa: [u8; SECRET_KEY_BYTES] = dk[off..off + SECRET_KEY_BYTES].try_into().unwrap();
    off += SECRET_KEY_BYTES;
    let pk: [u8; PUBLIC_KEY_BYTES] = dk[off..off + PUBLIC_KEY_BYTES].try_into().unwrap();
    off += PUBLIC_KEY_BYTES;
    let h: [u8; 32] = dk[off..off + 32].try_into().unwrap();
    off += 32;
    let z: [u8; 32] = dk[off..off + 32].try_into().unwrap();

    let m_prime = indcpa::dec(&sk_cpa, ct);

    let mut buf = [0u8; 64];
    buf[..32].copy_from_slice(&m_prime);
    buf[32..].copy_from_slice(&h);
    let (k_bar_prime, r_prime) = hash_g(&buf);

    let ct_prime = indcpa::enc(&m_prime, &pk, &r_prime);

    let fail = verify(ct, &ct_prime);
    let rejection_key = rkprf(&z, ct);

    let mut ss = rejection_key;
    cmov(&mut ss, &k_bar_prime, 1 - fail);
    ss
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keypair_layout_matches_documented_offsets() {
        let coins = [3u8; 64];
        let (pk, sk) = keypair_derand(&coins);
        assert_eq!(&sk[SECRET_KEY_BYTES..SECRET_KEY_BYTES + PUBLIC_KEY_BYTES], &pk[..]);
        assert_eq!(
            &sk[SECRET_KEY_BYTES + PUBLIC_KEY_BYTES..SECRET_KEY_BYTES + PUBLIC_KEY_BYTES + 32],
            &hash_h(&pk)[..]
        );
        assert_eq!(&sk[SECRET_KEY_BYTES + PUBLIC_KEY_BYTES + 32..], &coins[32..64]);
    }

    #[test]
    fn round_trip_shared_secret_matches() {
        let (pk, dk) = keypair_derand(&[9u8; 64]);
        let (ct, ss1) = encapsulate_derand(&pk, &[4u8; 32]);
        let ss2 = decapsulate(&ct, &dk);
        assert_eq!(ss1, ss2);
    }

    #[test]
    fn tampered_ciphertext_yields_implicit_rejection_key() {
        let (pk, dk) = keypair_derand(&[1u8; 64]);
        let (mut ct, _ss) = encapsulate_derand(&pk, &[6u8; 32]);
        ct[0] ^= 0x01;

        let z: [u8; 32] = dk[DK_LEN - 32..].try_into().unwrap();
        let expected = rkprf(&z, &ct);
        let got = decapsulate(&ct, &dk);
        assert_eq!(got, expected);
    }

    #[test]
    fn encapsulate_derand_is_deterministic() {
        let (pk, _dk) = keypair_derand(&[2u8; 64]);
        let (ct1, ss1) = encapsulate_derand(&pk, &[8u8; 32]);
        let (ct2, ss2) = encapsulate_derand(&pk, &[8u8; 32]);
        assert_eq!(ct1, ct2);
        assert_eq!(ss1, ss2);
    }
}
