//! 256-coefficient polynomials over `Z_q[X]/(X^256+1)`: NTT/inverse NTT, pointwise
//! multiplication, (de)serialization, compression, message encode/decode, and noise sampling.

use crate::field::{barrett_reduce, montgomery_reduce, to_mont, INV_NTT_FACTOR, Q, ZETA};
use crate::symmetric::prf;

/// Number of coefficients in a polynomial.
pub(crate) const N: usize = 256;

/// A polynomial in `Z_q[X]/(X^256+1)`. Whether a given `Poly` is in normal domain or NTT
/// domain is tracked by the caller's context, not by a runtime tag; every function below
/// documents which domain it consumes and produces.
#[derive(Clone, Copy)]
pub(crate) struct Poly(pub(crate) [i16; N]);

impl Default for Poly {
    fn default() -> Self { Poly([0; N]) }
}

impl Poly {
    /// Elementwise sum. Coefficients grow by at most one bit; callers reduce when needed.
    pub(crate) fn add(&self, other: &Poly) -> Poly {
        let mut out = [0i16; N];
        for i in 0..N {
            out[i] = self.0[i].wrapping_add(other.0[i]);
        }
        Poly(out)
    }

    /// Elementwise difference.
    pub(crate) fn sub(&self, other: &Poly) -> Poly {
        let mut out = [0i16; N];
        for i in 0..N {
            out[i] = self.0[i].wrapping_sub(other.0[i]);
        }
        Poly(out)
    }

    /// Barrett-reduces every coefficient to some representative with `|c| < Q`.
    pub(crate) fn reduce(&self) -> Poly {
        let mut out = [0i16; N];
        for i in 0..N {
            out[i] = barrett_reduce(self.0[i]);
        }
        Poly(out)
    }

    /// Lifts every coefficient into Montgomery form.
    pub(crate) fn to_mont(&self) -> Poly {
        let mut out = [0i16; N];
        for i in 0..N {
            out[i] = to_mont(self.0[i]);
        }
        Poly(out)
    }

    /// Algorithm 9 `NTT(f)`: in-place (on a copy) Cooley-Tukey forward transform.
    pub(crate) fn ntt(&self) -> Poly {
        let mut f = self.0;
        let mut k = 1usize;
        let mut len = 128usize;
        while len >= 2 {
            let mut start = 0usize;
            while start < N {
                let zeta = ZETAS[k];
                k += 1;
                for j in start..start + len {
                    let t = montgomery_reduce(zeta as i32 * f[j + len] as i32);
                    f[j + len] = f[j].wrapping_sub(t);
                    f[j] = f[j].wrapping_add(t);
                }
                start += 2 * len;
            }
            len /= 2;
        }
        Poly(f)
    }

    /// Algorithm 10 `NTTinv(f_hat)`: in-place (on a copy) Gentleman-Sande inverse transform.
    /// Output is left in Montgomery form, matching `invntt_tomont` in the reference.
    pub(crate) fn invntt_tomont(&self) -> Poly {
        let mut f = self.0;
        let mut k = 127usize;
        let mut len = 2usize;
        while len <= 128 {
            let mut start = 0usize;
            while start < N {
                let zeta = ZETAS[k];
                k -= 1;
                for j in start..start + len {
                    let t = f[j];
                    f[j] = barrett_reduce(t.wrapping_add(f[j + len]));
                    let diff = f[j + len].wrapping_sub(t);
                    f[j + len] = montgomery_reduce(zeta as i32 * diff as i32);
                }
                start += 2 * len;
            }
            len *= 2;
        }
        for c in f.iter_mut() {
            *c = montgomery_reduce(*c as i32 * INV_NTT_FACTOR as i32);
        }
        Poly(f)
    }

    /// Algorithm 11/12 `MultiplyNTTs` / `BaseCaseMultiply`: pointwise product of two
    /// NTT-domain polynomials, treating each coefficient pair as an element of
    /// `F_q[X]/(X^2 - zeta)`.
    pub(crate) fn basemul(&self, other: &Poly) -> Poly {
        let mut out = [0i16; N];
        for i in 0..64 {
            basemul_pair(
                &mut out[4 * i..4 * i + 2],
                &self.0[4 * i..4 * i + 2],
                &other.0[4 * i..4 * i + 2],
                ZETAS[64 + i],
            );
            basemul_pair(
                &mut out[4 * i + 2..4 * i + 4],
                &self.0[4 * i + 2..4 * i + 4],
                &other.0[4 * i + 2..4 * i + 4],
                -ZETAS[64 + i],
            );
        }
        Poly(out)
    }

    /// Serializes into 384 bytes, two 12-bit coefficients packed per 3 bytes.
    /// Coefficients are normalized into `[0, Q)` before packing.
    pub(crate) fn to_bytes(&self) -> [u8; 384] {
        let mut r = [0u8; 384];
        let mut t = [0i16; 2];
        for i in 0..N / 2 {
            for j in 0..2 {
                let mut c = self.0[2 * i + j];
                c = barrett_reduce(c);
                c += (c >> 15) & Q; // conditional add of Q for negative representatives
                t[j] = c;
            }
            r[3 * i] = t[0] as u8;
            r[3 * i + 1] = ((t[0] >> 8) | (t[1] << 4)) as u8;
            r[3 * i + 2] = (t[1] >> 4) as u8;
        }
        r
    }

    /// Deserializes 384 bytes into a polynomial. Values are taken modulo `2^12`, not `Q`
    /// (the reference leaves this implicit reduction to later steps).
    pub(crate) fn from_bytes(b: &[u8; 384]) -> Poly {
        let mut out = [0i16; N];
        for i in 0..N / 2 {
            out[2 * i] = (b[3 * i] as i16 | ((b[3 * i + 1] as i16) << 8)) & 0x0FFF;
            out[2 * i + 1] = ((b[3 * i + 1] as i16 >> 4) | ((b[3 * i + 2] as i16) << 4)) & 0x0FFF;
        }
        Poly(out)
    }

    /// `Compress_5`: rounds each coefficient to 5 bits, packing 8 values into 5 bytes.
    pub(crate) fn compress_poly(&self) -> [u8; 160] {
        let mut r = [0u8; 160];
        let mut t = [0u8; 8];
        for i in 0..N / 8 {
            for j in 0..8 {
                let mut u = self.0[8 * i + j];
                u += (u >> 15) & Q;
                t[j] = (compress_round(u as u32, 5) & 31) as u8;
            }
            r[5 * i] = t[0] | (t[1] << 5);
            r[5 * i + 1] = (t[1] >> 3) | (t[2] << 2) | (t[3] << 7);
            r[5 * i + 2] = (t[3] >> 1) | (t[4] << 4);
            r[5 * i + 3] = (t[4] >> 4) | (t[5] << 1) | (t[6] << 6);
            r[5 * i + 4] = (t[6] >> 2) | (t[7] << 3);
        }
        r
    }

    /// `Decompress_5`: inverse of `compress_poly`, approximate.
    pub(crate) fn decompress_poly(b: &[u8; 160]) -> Poly {
        let mut out = [0i16; N];
        for i in 0..N / 8 {
            let t0 = b[5 * i];
            let t1 = b[5 * i + 1];
            let t2 = b[5 * i + 2];
            let t3 = b[5 * i + 3];
            let t4 = b[5 * i + 4];
            let vals = [
                t0 & 31,
                (t0 >> 5) | ((t1 << 3) & 31),
                (t1 >> 2) & 31,
                (t1 >> 7) | ((t2 << 1) & 31),
                (t2 >> 4) | ((t3 << 4) & 31),
                (t3 >> 1) & 31,
                (t3 >> 6) | ((t4 << 2) & 31),
                t4 >> 3,
            ];
            for j in 0..8 {
                out[8 * i + j] = decompress_round(vals[j] as u32, 5);
            }
        }
        Poly(out)
    }

    /// `ByteDecode` of a message: bit `b` of `m` becomes coefficient `b * ceil(Q/2)`.
    pub(crate) fn from_msg(m: &[u8; 32]) -> Poly {
        let mut out = [0i16; N];
        for i in 0..32 {
            for j in 0..8 {
                let bit = (m[i] >> j) & 1;
                let mask = -(bit as i16); // all-ones if bit == 1, else 0
                out[8 * i + j] = mask & ((Q + 1) / 2);
            }
        }
        Poly(out)
    }

    /// Recovers a 32-byte message: each coefficient's distance from the center of `[0, Q)`
    /// is compared against `Q/4` in constant time.
    pub(crate) fn to_msg(&self) -> [u8; 32] {
        let mut m = [0u8; 32];
        for i in 0..32 {
            for j in 0..8 {
                let mut x = self.0[8 * i + j] as i32;
                x = x + ((x >> 15) as i32 & Q as i32); // normalize to [0, Q)
                let bit = (((x << 1) + Q as i32 / 2) / Q as i32) & 1;
                m[i] |= (bit as u8) << j;
            }
        }
        m
    }

    /// Algorithm 8 `SamplePolyCBDη`: centered binomial noise, derived from
    /// `PRF(seed || nonce)`.
    pub(crate) fn getnoise_eta(seed: &[u8; 32], nonce: u8, eta: usize) -> Poly {
        debug_assert!(eta == 2, "this parameter set only uses eta = 2");
        let buf = prf::<128>(seed, nonce);
        cbd_eta2(&buf)
    }
}

/// `c0, c1 <- BaseCaseMultiply(a0, a1, b0, b1, zeta)`, accumulating into `out[0..2]`.
fn basemul_pair(out: &mut [i16], a: &[i16], b: &[i16], zeta: i16) {
    let fqmul = |x: i16, y: i16| montgomery_reduce(x as i32 * y as i32);
    out[0] = fqmul(fqmul(a[1], b[1]), zeta).wrapping_add(fqmul(a[0], b[0]));
    out[1] = fqmul(a[0], b[1]).wrapping_add(fqmul(a[1], b[0]));
}

/// `round((2^d / Q) * x)`, round-half-away-from-zero, for `x` already in `[0, Q)`.
fn compress_round(x: u32, d: u32) -> u32 {
    let shifted = (x << d) + Q as u32 / 2;
    (shifted / Q as u32) & ((1 << d) - 1)
}

/// `round((Q / 2^d) * y)`, round-half-away-from-zero, for `y` in `[0, 2^d)`.
fn decompress_round(y: u32, d: u32) -> i16 {
    (((Q as u32) * y + (1 << (d - 1))) >> d) as i16
}

/// `SamplePolyCBD_2`: for each coefficient, sum two bits minus the next two bits.
fn cbd_eta2(buf: &[u8; 128]) -> Poly {
    let mut out = [0i16; N];
    for i in 0..buf.len() / 4 {
        let t = u32::from_le_bytes([buf[4 * i], buf[4 * i + 1], buf[4 * i + 2], buf[4 * i + 3]]);
        let d = {
            let low = t & 0x5555_5555;
            let high = (t >> 1) & 0x5555_5555;
            low + high
        };
        for j in 0..8 {
            let a = ((d >> (4 * j)) & 0x3) as i16;
            let b = ((d >> (4 * j + 2)) & 0x3) as i16;
            out[8 * i + j] = a - b;
        }
    }
    Poly(out)
}

/// 128-entry Montgomery-domain zeta table: `ZETAS[BitRev7(i)] = to_mont(ZETA^i mod Q)`.
/// Computed at compile time from the primitive root rather than transcribed.
const fn bitrev7(mut x: u32) -> u32 {
    let mut r = 0u32;
    let mut i = 0;
    while i < 7 {
        r = (r << 1) | (x & 1);
        x >>= 1;
        i += 1;
    }
    r
}

const fn gen_zetas() -> [i16; 128] {
    let mut table = [0i16; 128];
    let mut i = 0u32;
    let mut cur: i64 = 1;
    while i < 128 {
        let idx = bitrev7(i) as usize;
        let mont = ((cur * (1i64 << 16)) % (Q as i64) + (Q as i64)) % (Q as i64);
        let mont = if mont > (Q as i64) / 2 { mont - Q as i64 } else { mont };
        table[idx] = mont as i16;
        cur = (cur * ZETA) % (Q as i64);
        i += 1;
    }
    table
}

pub(crate) static ZETAS: [i16; 128] = gen_zetas();

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ntt_and_inverse_recover_to_mont() {
        // invntt_tomont(ntt(p)) == to_mont(p), the documented Montgomery-factor identity.
        let mut coeffs = [0i16; N];
        for (i, c) in coeffs.iter_mut().enumerate() {
            *c = (i as i16 * 37 + 5) % Q;
        }
        let p = Poly(coeffs);
        let rt = p.ntt().invntt_tomont();
        let expected = p.to_mont();
        for i in 0..N {
            assert_eq!(
                barrett_reduce(rt.0[i]),
                barrett_reduce(expected.0[i]),
                "coefficient {i} mismatch"
            );
        }
    }

    #[test]
    fn byte_round_trip_is_exact_for_canonical_range() {
        let mut coeffs = [0i16; N];
        for (i, c) in coeffs.iter_mut().enumerate() {
            *c = (i as i16 * 131) % Q;
        }
        let p = Poly(coeffs);
        let bytes = p.to_bytes();
        let back = Poly::from_bytes(&bytes);
        assert_eq!(p.0, back.0);
    }

    #[test]
    fn compress_decompress_error_is_bounded() {
        let d = 5u32;
        let bound = (Q as i32 + (1 << (d + 1)) - 1) / (1 << (d + 1)); // ceil(Q / 2^(d+1))
        let mut coeffs = [0i16; N];
        for (i, c) in coeffs.iter_mut().enumerate() {
            *c = (i as i16 * 7) % Q;
        }
        let p = Poly(coeffs);
        let compressed = p.compress_poly();
        let back = Poly::decompress_poly(&compressed);
        for i in 0..N {
            let orig = ((coeffs[i] as i32 % Q as i32) + Q as i32) % Q as i32;
            let got = back.0[i] as i32;
            let diff = (orig - got).rem_euclid(Q as i32);
            let err = diff.min(Q as i32 - diff);
            assert!(err <= bound, "coefficient {i}: err {err} > bound {bound}");
        }
    }

    #[test]
    fn message_round_trips_through_from_msg_to_msg() {
        let msg: [u8; 32] = core::array::from_fn(|i| (i as u8).wrapping_mul(73));
        let p = Poly::from_msg(&msg);
        let back = p.to_msg();
        assert_eq!(msg, back);
    }

    #[test]
    fn getnoise_eta_stays_within_bound() {
        let seed = [9u8; 32];
        let p = Poly::getnoise_eta(&seed, 0, 2);
        for c in p.0 {
            assert!((-2..=2).contains(&c), "coefficient {c} out of CBD range");
        }
    }
}
