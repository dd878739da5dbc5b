//! The IND-CPA public-key encryption primitive: pack/unpack, keypair, encrypt, decrypt,
//! all built on `PolyVec`. This is what the `Kem` module wraps with the Fujisaki-Okamoto
//! transform to get an IND-CCA2 KEM.

use crate::poly::Poly;
use crate::polyvec::{PolyVec, K};
use crate::sampling::gen_matrix;
use crate::symmetric::hash_g;

pub(crate) const PUBLIC_KEY_BYTES: usize = K * 384 + 32;
pub(crate) const SECRET_KEY_BYTES: usize = K * 384;
pub(crate) const CIPHERTEXT_BYTES: usize = K * 352 + 160;

const ETA1: usize = 2;
const ETA2: usize = 2;

/// An IND-CPA public key: `t_hat || publicseed`.
pub(crate) struct PublicKey(pub(crate) [u8; PUBLIC_KEY_BYTES]);

/// An IND-CPA secret key: `s_hat`.
pub(crate) struct SecretKey(pub(crate) [u8; SECRET_KEY_BYTES]);

/// Derives a keypair deterministically from 32 bytes of coins.
pub(crate) fn keypair_derand(coins: &[u8; 32]) -> (PublicKey, SecretKey) {
    let (publicseed, noiseseed) = hash_g(coins);
    let a = gen_matrix(&publicseed, false);

    let s = PolyVec(core::array::from_fn(|i| Poly::getnoise_eta(&noiseseed, i as u8, ETA1)));
    let e = PolyVec(core::array::from_fn(|i| Poly::getnoise_eta(&noiseseed, (K + i) as u8, ETA1)));

    let s_hat = s.ntt();
    let e_hat = e.ntt();

    let t_hat = {
        let rows: [Poly; K] = core::array::from_fn(|i| {
            let row = PolyVec(a[i]);
            row.basemul_acc_montgomery(&s_hat).to_mont()
        });
        PolyVec(rows).add(&e_hat).reduce()
    };

    let mut pk = [0u8; PUBLIC_KEY_BYTES];
    pk[..K * 384].copy_from_slice(&t_hat.to_bytes());
    pk[K * 384..].copy_from_slice(&publicseed);

    let sk = SecretKey(s_hat.to_bytes());
    (PublicKey(pk), sk)
}

/// Encrypts a 32-byte message deterministically under `pk`, using `coins` as the
/// randomness for noise sampling.
pub(crate) fn enc(m: &[u8; 32], pk: &[u8; PUBLIC_KEY_BYTES], coins: &[u8; 32]) -> [u8; CIPHERTEXT_BYTES] {
    let t_hat_bytes: [u8; K * 384] = pk[..K * 384].try_into().unwrap();
    let publicseed: [u8; 32] = pk[K * 384..].try_into().unwrap();
    let t_hat = PolyVec::from_bytes(&t_hat_bytes);

    let at = gen_matrix(&publicseed, true);

    let r = PolyVec(core::array::from_fn(|i| Poly::getnoise_eta(coins, i as u8, ETA1)));
    let e1 = PolyVec(core::array::from_fn(|i| Poly::getnoise_eta(coins, (K + i) as u8, ETA2)));
    let e2 = Poly::getnoise_eta(coins, (2 * K) as u8, ETA2);

    let r_hat = r.ntt();

    let u = {
        let rows: [Poly; K] = core::array::from_fn(|i| {
            let row = PolyVec(at[i]);
            row.basemul_acc_montgomery(&r_hat)
        });
        PolyVec(rows).invntt_tomont()
    };
    let v = t_hat.basemul_acc_montgomery(&r_hat).invntt_tomont();

    let u = u.add(&e1).reduce();
    let v = v.add(&e2).add(&Poly::from_msg(m)).reduce();

    let mut ct = [0u8; CIPHERTEXT_BYTES];
    ct[..K * 352].copy_from_slice(&u.compress());
    ct[K * 352..].copy_from_slice(&v.compress_poly());
    ct
}

/// Decrypts a ciphertext under the IND-CPA secret key, recovering the 32-byte message.
pub(crate) fn dec(sk: &[u8; SECRET_KEY_BYTES], ct: &[u8; CIPHERTEXT_BYTES]) -> [u8; 32] {
    let u_bytes: [u8; K * 352] = ct[..K * 352].try_into().unwrap();
    let v_bytes: [u8; 160] = ct[K * 352..].try_into().unwrap();
    let u = PolyVec::decompress(&u_bytes);
    let v = Poly::decompress_poly(&v_bytes);

    let s_hat = PolyVec::from_bytes(sk);

    let u_hat = u.ntt();
    let mp = s_hat.basemul_acc_montgomery(&u_hat).invntt_tomont();
    let mp = v.sub(&mp).reduce();
    mp.to_msg()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encrypt_then_decrypt_recovers_message() {
        let coins = [11u8; 32];
        let (pk, sk) = keypair_derand(&coins);
        let msg = [42u8; 32];
        let enc_coins = [22u8; 32];
        let ct = enc(&msg, &pk.0, &enc_coins);
        let recovered = dec(&sk.0, &ct);
        assert_eq!(msg, recovered);
    }

    #[test]
    fn enc_is_deterministic_given_same_inputs() {
        let coins = [5u8; 32];
        let (pk, _sk) = keypair_derand(&coins);
        let msg = [1u8; 32];
        let enc_coins = [2u8; 32];
        let ct1 = enc(&msg, &pk.0, &enc_coins);
        let ct2 = enc(&msg, &pk.0, &enc_coins);
        assert_eq!(ct1, ct2);
    }

    #[test]
    fn keypair_derand_is_deterministic() {
        let coins = [77u8; 32];
        let (pk1, sk1) = keypair_derand(&coins);
        let (pk2, sk2) = keypair_derand(&coins);
        assert_eq!(pk1.0, pk2.0);
        assert_eq!(sk1.0, sk2.0);
    }
}
