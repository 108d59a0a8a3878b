//! HyperLogLog sketch allows to estimate number of distinct elements
//! in the stream or dataset and is defined with runtime precision `p`:
//! - `p`: precision parameter in [4..18] range, which defines
//!   number of bits to use for HyperLogLog register indices
//!   and number of registers `m = 2^p`.
//!
//! # Hash slicing
//!
//! Each observation is a 64-bit hash:
//! - 0..p bits     - register index in `[0..m)` range
//! - p..63 bits    - rank source; rank is the number of leading zeros within
//!   these `64 - p` bits plus one, so it lies in `[1..=65 - p]`.
//!
//! # Estimation
//!
//! Number of zero registers and registers' harmonic sum are
//! updated as more data being inserted, so `estimate` never rescans
//! registers. The raw harmonic-mean estimate is then corrected:
//! - Small range (`E <= 2.5 * m`, some registers still zero): linear counting.
//! - Large range (`E > 2^32 / 30`): 32-bit hash-space saturation correction.
//!
//! Expected error is `1.04 / sqrt(m)`:
//!   p = 4:  1.04 / sqrt(2^4)  = 26%
//!   p = 12: 1.04 / sqrt(2^12) = 1.62%
//!   p = 14: 1.04 / sqrt(2^14) = 0.81%
//!
//! # Concurrency
//!
//! `Sketch` has no internal synchronization. Mutating operations take `&mut self`,
//! so ingestion from several threads requires wrapping the sketch into a lock
//! (e.g. `Mutex<Sketch>`) or keeping an independent sketch per thread.

use std::fmt::{Debug, Formatter};
use std::hash::{BuildHasher, BuildHasherDefault, Hash, Hasher};
use std::mem::size_of;

use wyhash::WyHash;

use crate::error::ConfigError;
use crate::registers::Registers;

/// Minimum supported precision
pub const MIN_PRECISION: usize = 4;
/// Maximum supported precision
pub const MAX_PRECISION: usize = 18;
/// Size of the hash space assumed by the large range correction.
/// Kept at 32 bits independently of the 64-bit hashes being ingested.
pub const LARGE_RANGE_HASH_SPACE: f64 = (1u64 << 32) as f64;
/// Scale of the fixed-point harmonic sum
const SUM_SCALE: f64 = (1u128 << 64) as f64;

/// HyperLogLog sketch with `2^p` registers and injected hasher `H`
pub struct Sketch<H: Hasher + Default = WyHash> {
    precision: usize,
    registers: Registers,
    /// Number of registers set to 0
    zeros: usize,
    /// Harmonic sum of registers `Σ 2^-register` scaled by `2^64`,
    /// kept in fixed point so that updates are exact
    sum: u128,
    /// Zero-sized build hasher
    build_hasher: BuildHasherDefault<H>,
}

impl<H: Hasher + Default> Sketch<H> {
    /// Creates new `Sketch` with `2^precision` registers
    pub fn with_precision(precision: usize) -> Result<Self, ConfigError> {
        if !(MIN_PRECISION..=MAX_PRECISION).contains(&precision) {
            return Err(ConfigError::PrecisionOutOfRange { precision });
        }

        let m = 1 << precision;
        Ok(Self {
            precision,
            registers: Registers::new(m),
            zeros: m,
            sum: (m as u128) << 64,
            build_hasher: BuildHasherDefault::default(),
        })
    }

    /// Creates new `Sketch` with the smallest precision whose standard error
    /// `1.04 / sqrt(m)` does not exceed `error_rate`.
    ///
    /// Error rates loose enough to be met by fewer than `2^MIN_PRECISION` registers
    /// yield a sketch with `MIN_PRECISION`. Error rates requiring more than
    /// `2^MAX_PRECISION` registers are rejected.
    pub fn with_error_rate(error_rate: f64) -> Result<Self, ConfigError> {
        // Also rejects NaN
        if !(error_rate > 0.0 && error_rate < 1.0) {
            return Err(ConfigError::ErrorRateOutOfRange { error_rate });
        }

        // `2 * log2(1.04 / e)`, split so that tiny rates do not overflow to infinity
        let precision = (2.0 * (1.04f64.log2() - error_rate.log2())).ceil();
        if precision > MAX_PRECISION as f64 {
            return Err(ConfigError::UnattainableErrorRate {
                error_rate,
                precision: precision as usize,
            });
        }

        Self::with_precision((precision as usize).max(MIN_PRECISION))
    }

    /// Return precision `p`
    #[inline]
    pub fn precision(&self) -> usize {
        self.precision
    }

    /// Return number of registers `m = 2^p`
    #[inline]
    pub fn register_count(&self) -> usize {
        self.registers.len()
    }

    /// Iterate over register values in index order
    pub fn registers(&self) -> impl Iterator<Item = u8> + '_ {
        self.registers.iter().map(|r| r as u8)
    }

    /// Return whether no observation has been inserted since creation or last `clear`
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.zeros == self.register_count()
    }

    /// Insert a hashable item into `Sketch`
    #[inline]
    pub fn insert<T: Hash + ?Sized>(&mut self, item: &T) {
        let mut hasher = self.build_hasher.build_hasher();
        item.hash(&mut hasher);
        let hash = hasher.finish();
        self.insert_hash(hash);
    }

    /// Insert raw bytes into `Sketch`, hashing them with `H`
    #[inline]
    pub fn insert_bytes(&mut self, bytes: &[u8]) {
        let mut hasher = self.build_hasher.build_hasher();
        hasher.write(bytes);
        let hash = hasher.finish();
        self.insert_hash(hash);
    }

    /// Insert hash into `Sketch`
    #[inline]
    pub fn insert_hash(&mut self, hash: u64) {
        let (idx, new_rank) = self.decode_hash(hash);
        let old_rank = self.registers.get(idx);
        if new_rank > old_rank {
            self.registers.set(idx, new_rank);

            // Update number of zero registers and harmonic sum
            self.zeros -= usize::from(old_rank == 0);
            self.sum -= 1u128 << (64 - old_rank);
            self.sum += 1u128 << (64 - new_rank);
        }
    }

    /// Return register index and rank of the given hash
    #[inline]
    fn decode_hash(&self, hash: u64) -> (usize, u32) {
        let idx = (hash & ((1 << self.precision) - 1)) as usize;
        // Top `p` bits of the shifted value are always zero and excluded from the rank
        let rank = (hash >> self.precision).leading_zeros() - self.precision as u32 + 1;
        (idx, rank)
    }

    /// Return cardinality estimate
    #[inline]
    pub fn estimate(&self) -> f64 {
        let m = self.register_count();
        let sum = self.sum as f64 / SUM_SCALE;
        let raw = alpha(m) * (m as f64) * (m as f64) / sum;
        correct_estimate(raw, m, self.zeros)
    }

    /// Return theoretical standard error `1.04 / sqrt(m)`
    #[inline]
    pub fn precision_err(&self) -> f64 {
        1.04 / (self.register_count() as f64).sqrt()
    }

    /// Reset all registers to zero keeping precision
    pub fn clear(&mut self) {
        let m = self.register_count();
        self.registers.clear();
        self.zeros = m;
        self.sum = (m as u128) << 64;
    }

    /// Return memory size of `Sketch`
    pub fn size_of(&self) -> usize {
        size_of::<Self>() - size_of::<Registers>() + self.registers.size_of()
    }
}

impl<H: Hasher + Default> Clone for Sketch<H> {
    /// Clone `Sketch`
    fn clone(&self) -> Self {
        Self {
            precision: self.precision,
            registers: self.registers.clone(),
            zeros: self.zeros,
            sum: self.sum,
            build_hasher: BuildHasherDefault::default(),
        }
    }
}

impl<H: Hasher + Default> PartialEq for Sketch<H> {
    /// Compare sketches by precision and registers
    fn eq(&self, rhs: &Self) -> bool {
        self.precision == rhs.precision && self.registers == rhs.registers
    }
}

impl<H: Hasher + Default> Debug for Sketch<H> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{{ precision: {}, estimate: {:.0}, size: {} }}",
            self.precision,
            self.estimate(),
            self.size_of()
        )
    }
}

/// Parameter for bias correction
#[inline]
fn alpha(m: usize) -> f64 {
    0.7213 / (1.0 + 1.079 / (m as f64))
}

/// Apply small and large range corrections to the raw harmonic-mean estimate
#[inline]
fn correct_estimate(raw: f64, m: usize, zeros: usize) -> f64 {
    let m = m as f64;
    if raw <= 2.5 * m {
        if zeros > 0 {
            // Linear counting
            m * (m / zeros as f64).ln()
        } else {
            raw
        }
    } else if raw > LARGE_RANGE_HASH_SPACE / 30.0 && raw < LARGE_RANGE_HASH_SPACE {
        -LARGE_RANGE_HASH_SPACE * (1.0 - raw / LARGE_RANGE_HASH_SPACE).ln()
    } else {
        raw
    }
}
