//! Random note velocities.
//!
//! [`VelocityRandomizer`](struct.VelocityRandomizer.html) owns its random number generator, so it
//! can be seeded for reproducible output or handed any `rand::Rng`.
//! [`SyncVelocityRandomizer`](struct.SyncVelocityRandomizer.html) puts one behind a mutex so it can
//! be shared across threads.

use crate::prelude::*;
use parking_lot::Mutex;
use rand::{rngs::StdRng, Rng, SeedableRng};
use tracing::{debug, trace};

/// Draws velocities uniformly from inclusive ranges.
#[derive(Clone, Debug)]
pub struct VelocityRandomizer<R = StdRng> {
    rng: R,
}
impl VelocityRandomizer<StdRng> {
    /// A randomizer seeded from the operating system's entropy source.
    pub fn from_entropy() -> VelocityRandomizer<StdRng> {
        debug!("seeding velocity randomizer from entropy");
        VelocityRandomizer::new(StdRng::from_entropy())
    }

    /// A randomizer that produces the same velocities for the same seed.
    pub fn seeded(seed: u64) -> VelocityRandomizer<StdRng> {
        debug!(seed, "seeding velocity randomizer");
        VelocityRandomizer::new(StdRng::seed_from_u64(seed))
    }
}
impl Default for VelocityRandomizer<StdRng> {
    fn default() -> VelocityRandomizer<StdRng> {
        VelocityRandomizer::from_entropy()
    }
}
impl<R: Rng> VelocityRandomizer<R> {
    /// Wrap an existing generator.
    #[inline]
    pub fn new(rng: R) -> VelocityRandomizer<R> {
        VelocityRandomizer { rng }
    }

    /// Draw a velocity between `min` and `max`, both inclusive.
    ///
    /// Fails with `ErrorKind::RandomVelocity` if `min` is greater than `max`. If both are equal,
    /// that velocity is returned without consulting the generator.
    pub fn random_velocity_in_range(&mut self, min: Velocity, max: Velocity) -> Result<Velocity> {
        ensure!(
            min <= max,
            Error::new(
                ErrorKind::RandomVelocity,
                format!(
                    "minimum velocity {} is greater than maximum velocity {}",
                    min, max
                ),
            )
        );
        if min == max {
            return Ok(min);
        }
        let vel = Velocity::from_byte(self.rng.gen_range(min.as_int()..=max.as_int()));
        trace!(%min, %max, %vel, "random velocity");
        Ok(vel)
    }

    /// Draw a velocity anywhere in the valid range.
    pub fn random_velocity(&mut self) -> Velocity {
        let vel = Velocity::from_byte(
            self.rng
                .gen_range(Velocity::ZERO.as_int()..=Velocity::FULL.as_int()),
        );
        trace!(%vel, "random velocity");
        vel
    }

    /// Get back the wrapped generator.
    #[inline]
    pub fn into_inner(self) -> R {
        self.rng
    }
}

/// A velocity randomizer that can be shared between threads.
///
/// Each draw holds the lock for exactly one generation.
#[derive(Debug)]
pub struct SyncVelocityRandomizer<R = StdRng> {
    inner: Mutex<VelocityRandomizer<R>>,
}
impl SyncVelocityRandomizer<StdRng> {
    /// A shared randomizer seeded from the operating system's entropy source.
    pub fn from_entropy() -> SyncVelocityRandomizer<StdRng> {
        SyncVelocityRandomizer::from(VelocityRandomizer::from_entropy())
    }

    /// A shared randomizer that produces the same sequence for the same seed, as long as draws are
    /// not interleaved between threads.
    pub fn seeded(seed: u64) -> SyncVelocityRandomizer<StdRng> {
        SyncVelocityRandomizer::from(VelocityRandomizer::seeded(seed))
    }
}
impl Default for SyncVelocityRandomizer<StdRng> {
    fn default() -> SyncVelocityRandomizer<StdRng> {
        SyncVelocityRandomizer::from_entropy()
    }
}
impl<R: Rng> SyncVelocityRandomizer<R> {
    /// Wrap an existing generator.
    #[inline]
    pub fn new(rng: R) -> SyncVelocityRandomizer<R> {
        SyncVelocityRandomizer::from(VelocityRandomizer::new(rng))
    }

    /// See [`VelocityRandomizer::random_velocity_in_range`].
    pub fn random_velocity_in_range(&self, min: Velocity, max: Velocity) -> Result<Velocity> {
        self.inner.lock().random_velocity_in_range(min, max)
    }

    /// See [`VelocityRandomizer::random_velocity`].
    pub fn random_velocity(&self) -> Velocity {
        self.inner.lock().random_velocity()
    }

    /// Get back the wrapped randomizer.
    #[inline]
    pub fn into_inner(self) -> VelocityRandomizer<R> {
        self.inner.into_inner()
    }
}
impl<R> From<VelocityRandomizer<R>> for SyncVelocityRandomizer<R> {
    #[inline]
    fn from(randomizer: VelocityRandomizer<R>) -> SyncVelocityRandomizer<R> {
        SyncVelocityRandomizer {
            inner: Mutex::new(randomizer),
        }
    }
}
