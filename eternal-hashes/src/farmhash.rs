//! FarmHash64, as used to hash resource paths
//!
//! This is the portable "na" flavor of FarmHash, also known as `Fingerprint64`.
//! Values are stable across platforms and must match the reference implementation bit for bit:
//! hashes are stored in mapping files generated by external tools.
//!
//! All arithmetic wraps on overflow.
use byteorder::{ByteOrder, LittleEndian};

const K0: u64 = 0xc3a5c85c97cb3127;
const K1: u64 = 0xb492b66fbe98f273;
const K2: u64 = 0x9ae16a3b2f90404f;

const SEED: u64 = 81;


/// Compute the 64-bit FarmHash of a byte sequence
///
/// ```
/// use eternal_hashes::farmhash::fingerprint64;
/// assert_eq!(fingerprint64(b""), 0x9ae16a3b2f90404f);
/// assert_eq!(fingerprint64(b"hello world"), 0x588fb7478bd6b01b);
/// ```
pub fn fingerprint64(s: &[u8]) -> u64 {
    match s.len() {
        0..=16 => hash_len_0_to_16(s),
        17..=32 => hash_len_17_to_32(s),
        33..=64 => hash_len_33_to_64(s),
        _ => hash_len_65_plus(s),
    }
}


#[inline]
fn fetch64(s: &[u8], offset: usize) -> u64 {
    LittleEndian::read_u64(&s[offset..offset + 8])
}

#[inline]
fn fetch32(s: &[u8], offset: usize) -> u64 {
    LittleEndian::read_u32(&s[offset..offset + 4]) as u64
}

/// Rotate right; a shift of 0 leaves the value unchanged
#[inline]
fn rotate(val: u64, shift: u32) -> u64 {
    val.rotate_right(shift)
}

#[inline]
fn shift_mix(val: u64) -> u64 {
    val ^ (val >> 47)
}

/// Murmur-inspired mix of two words
#[inline]
fn hash_len_16(u: u64, v: u64, mul: u64) -> u64 {
    let mut a = (u ^ v).wrapping_mul(mul);
    a ^= a >> 47;
    let mut b = (v ^ a).wrapping_mul(mul);
    b ^= b >> 47;
    b.wrapping_mul(mul)
}

/// Return a 16-byte hash for 48 bytes (4 words and 2 seeds)
#[inline]
fn weak_hash_len_32_with_seeds(w: u64, x: u64, y: u64, z: u64, mut a: u64, mut b: u64) -> (u64, u64) {
    a = a.wrapping_add(w);
    b = rotate(b.wrapping_add(a).wrapping_add(z), 21);
    let c = a;
    a = a.wrapping_add(x);
    a = a.wrapping_add(y);
    b = b.wrapping_add(rotate(a, 44));
    (a.wrapping_add(z), b.wrapping_add(c))
}

/// Same as [weak_hash_len_32_with_seeds()], for the 32 bytes at `s[offset..]`
#[inline]
fn weak_hash_len_32_with_seeds_at(s: &[u8], offset: usize, a: u64, b: u64) -> (u64, u64) {
    weak_hash_len_32_with_seeds(
        fetch64(s, offset),
        fetch64(s, offset + 8),
        fetch64(s, offset + 16),
        fetch64(s, offset + 24),
        a,
        b,
    )
}

fn hash_len_0_to_16(s: &[u8]) -> u64 {
    let len = s.len();
    if len >= 8 {
        let mul = K2.wrapping_add(len as u64 * 2);
        let a = fetch64(s, 0).wrapping_add(K2);
        let b = fetch64(s, len - 8);
        let c = rotate(b, 37).wrapping_mul(mul).wrapping_add(a);
        let d = rotate(a, 25).wrapping_add(b).wrapping_mul(mul);
        hash_len_16(c, d, mul)
    } else if len >= 4 {
        let mul = K2.wrapping_add(len as u64 * 2);
        let a = fetch32(s, 0);
        hash_len_16((len as u64).wrapping_add(a << 3), fetch32(s, len - 4), mul)
    } else if len > 0 {
        let a = s[0] as u32;
        let b = s[len >> 1] as u32;
        let c = s[len - 1] as u32;
        let y = a + (b << 8);
        let z = len as u32 + (c << 2);
        shift_mix((y as u64).wrapping_mul(K2) ^ (z as u64).wrapping_mul(K0)).wrapping_mul(K2)
    } else {
        K2
    }
}

fn hash_len_17_to_32(s: &[u8]) -> u64 {
    let len = s.len();
    let mul = K2.wrapping_add(len as u64 * 2);
    let a = fetch64(s, 0).wrapping_mul(K1);
    let b = fetch64(s, 8);
    let c = fetch64(s, len - 8).wrapping_mul(mul);
    let d = fetch64(s, len - 16).wrapping_mul(K2);
    hash_len_16(
        rotate(a.wrapping_add(b), 43).wrapping_add(rotate(c, 30)).wrapping_add(d),
        a.wrapping_add(rotate(b.wrapping_add(K2), 18)).wrapping_add(c),
        mul,
    )
}

fn hash_len_33_to_64(s: &[u8]) -> u64 {
    let len = s.len();
    let mul = K2.wrapping_add(len as u64 * 2);
    let a = fetch64(s, 0).wrapping_mul(K2);
    let b = fetch64(s, 8);
    let c = fetch64(s, len - 8).wrapping_mul(mul);
    let d = fetch64(s, len - 16).wrapping_mul(K2);
    let y = rotate(a.wrapping_add(b), 43).wrapping_add(rotate(c, 30)).wrapping_add(d);
    let z = hash_len_16(y, a.wrapping_add(rotate(b.wrapping_add(K2), 18)).wrapping_add(c), mul);
    let e = fetch64(s, 16).wrapping_mul(mul);
    let f = fetch64(s, 24);
    let g = y.wrapping_add(fetch64(s, len - 32)).wrapping_mul(mul);
    let h = z.wrapping_add(fetch64(s, len - 24)).wrapping_mul(mul);
    hash_len_16(
        rotate(e.wrapping_add(f), 43).wrapping_add(rotate(g, 30)).wrapping_add(h),
        e.wrapping_add(rotate(f.wrapping_add(a), 18)).wrapping_add(g),
        mul,
    )
}

fn hash_len_65_plus(s: &[u8]) -> u64 {
    let len = s.len();

    // Internal state: v, w, x, y and z
    let mut x = SEED;
    let mut y = SEED.wrapping_mul(K1).wrapping_add(113);
    let mut z = shift_mix(y.wrapping_mul(K2).wrapping_add(113)).wrapping_mul(K2);
    let mut v = (0u64, 0u64);
    let mut w = (0u64, 0u64);
    x = x.wrapping_mul(K2).wrapping_add(fetch64(s, 0));

    // Loop on 64-byte chunks, leave 1 to 64 bytes for the last round
    let end = ((len - 1) / 64) * 64;
    let last64 = len - 64;
    let mut offset = 0;
    while offset < end {
        x = rotate(x.wrapping_add(y).wrapping_add(v.0).wrapping_add(fetch64(s, offset + 8)), 37).wrapping_mul(K1);
        y = rotate(y.wrapping_add(v.1).wrapping_add(fetch64(s, offset + 48)), 42).wrapping_mul(K1);
        x ^= w.1;
        y = y.wrapping_add(v.0).wrapping_add(fetch64(s, offset + 40));
        z = rotate(z.wrapping_add(w.0), 33).wrapping_mul(K1);
        v = weak_hash_len_32_with_seeds_at(s, offset, v.1.wrapping_mul(K1), x.wrapping_add(w.0));
        w = weak_hash_len_32_with_seeds_at(s, offset + 32, z.wrapping_add(w.1), y.wrapping_add(fetch64(s, offset + 16)));
        std::mem::swap(&mut z, &mut x);
        offset += 64;
    }

    // Last round on the final 64 bytes, possibly overlapping the previous chunk
    let mul = K1.wrapping_add((z & 0xff) << 1);
    w.0 = w.0.wrapping_add((len as u64 - 1) & 63);
    v.0 = v.0.wrapping_add(w.0);
    w.0 = w.0.wrapping_add(v.0);
    x = rotate(x.wrapping_add(y).wrapping_add(v.0).wrapping_add(fetch64(s, last64 + 8)), 37).wrapping_mul(mul);
    y = rotate(y.wrapping_add(v.1).wrapping_add(fetch64(s, last64 + 48)), 42).wrapping_mul(mul);
    x ^= w.1.wrapping_mul(9);
    y = y.wrapping_add(v.0.wrapping_mul(9)).wrapping_add(fetch64(s, last64 + 40));
    z = rotate(z.wrapping_add(w.0), 33).wrapping_mul(mul);
    v = weak_hash_len_32_with_seeds_at(s, last64, v.1.wrapping_mul(mul), x.wrapping_add(w.0));
    w = weak_hash_len_32_with_seeds_at(s, last64 + 32, z.wrapping_add(w.1), y.wrapping_add(fetch64(s, last64 + 16)));
    std::mem::swap(&mut z, &mut x);

    hash_len_16(
        hash_len_16(v.0, w.0, mul).wrapping_add(shift_mix(y).wrapping_mul(K0)).wrapping_add(z),
        hash_len_16(v.1, w.1, mul).wrapping_add(x),
        mul,
    )
}
