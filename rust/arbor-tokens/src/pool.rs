//! Reusable canonicalization buffers.

use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::TokenError;

/// How many concurrent rentals a default pool allows.
const DEFAULT_MAX_RENTALS: usize = 1024;

/// Buffers that grew past this capacity are dropped on return instead of
/// being retained, so one oversized payload cannot pin memory forever.
const MAX_RETAINED_CAPACITY: usize = 64 * 1024;

/// A bounded, thread-safe pool of byte buffers shared across concurrent
/// signing calls.
///
/// Rentals are scoped: a [`PooledBuffer`] returns its bytes to the pool
/// when dropped, on every exit path. When every slot is rented the pool
/// refuses further rentals rather than blocking, and the caller propagates
/// the failure.
#[derive(Debug, Clone)]
pub struct BufferPool {
    state: Arc<Mutex<PoolState>>,
    max_rentals: usize,
}

#[derive(Debug)]
struct PoolState {
    free: Vec<Vec<u8>>,
    outstanding: usize,
}

impl BufferPool {
    /// Create a pool allowing at most `max_rentals` concurrent rentals.
    pub fn new(max_rentals: usize) -> Self {
        Self {
            state: Arc::new(Mutex::new(PoolState {
                free: Vec::new(),
                outstanding: 0,
            })),
            max_rentals,
        }
    }

    /// Rent a buffer with at least `capacity` bytes reserved.
    ///
    /// # Errors
    ///
    /// [`TokenError::PoolExhausted`] when every slot is already rented.
    pub fn rent(&self, capacity: usize) -> Result<PooledBuffer, TokenError> {
        let mut buffer = {
            let mut state = self.state.lock();
            if state.outstanding >= self.max_rentals {
                return Err(TokenError::PoolExhausted);
            }
            state.outstanding += 1;
            state.free.pop().unwrap_or_default()
        };

        buffer.clear();
        buffer.reserve(capacity);

        Ok(PooledBuffer {
            buffer,
            state: Arc::clone(&self.state),
        })
    }

    /// How many rentals are currently outstanding.
    pub fn outstanding(&self) -> usize {
        self.state.lock().outstanding
    }
}

impl Default for BufferPool {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_RENTALS)
    }
}

/// An exclusively-owned rental from a [`BufferPool`].
///
/// Dereferences to the underlying `Vec<u8>`; dropping it returns the bytes
/// to the pool.
#[derive(Debug)]
pub struct PooledBuffer {
    buffer: Vec<u8>,
    state: Arc<Mutex<PoolState>>,
}

impl Deref for PooledBuffer {
    type Target = Vec<u8>;

    fn deref(&self) -> &Self::Target {
        &self.buffer
    }
}

impl DerefMut for PooledBuffer {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.buffer
    }
}

impl Drop for PooledBuffer {
    fn drop(&mut self) {
        let mut buffer = std::mem::take(&mut self.buffer);
        buffer.clear();

        let mut state = self.state.lock();
        state.outstanding -= 1;
        if buffer.capacity() <= MAX_RETAINED_CAPACITY {
            state.free.push(buffer);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_reuses_returned_buffers() {
        let pool = BufferPool::new(4);

        let capacity = {
            let mut rented = pool.rent(128).unwrap();
            rented.extend_from_slice(b"payload");
            rented.capacity()
        };

        // The same allocation comes back, cleared.
        let rented = pool.rent(16).unwrap();
        assert!(rented.is_empty());
        assert!(rented.capacity() >= capacity.min(128));
    }

    #[test]
    fn it_refuses_rentals_past_the_cap() {
        let pool = BufferPool::new(2);

        let first = pool.rent(8).unwrap();
        let second = pool.rent(8).unwrap();
        assert_eq!(pool.rent(8).unwrap_err(), TokenError::PoolExhausted);

        drop(first);
        let third = pool.rent(8).unwrap();

        drop(second);
        drop(third);
        assert_eq!(pool.outstanding(), 0);
    }

    #[test]
    fn it_returns_buffers_on_every_exit_path() {
        let pool = BufferPool::new(1);

        {
            let _rented = pool.rent(8).unwrap();
            assert_eq!(pool.outstanding(), 1);
        }
        assert_eq!(pool.outstanding(), 0);

        // A rental dropped during a panic unwind still comes back.
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _rented = pool.rent(8).unwrap();
            panic!("hash failure");
        }));
        assert!(result.is_err());
        assert_eq!(pool.outstanding(), 0);
    }

    #[test]
    fn it_drops_oversized_buffers_instead_of_retaining_them() {
        let pool = BufferPool::new(2);

        {
            let mut rented = pool.rent(MAX_RETAINED_CAPACITY * 2).unwrap();
            rented.resize(MAX_RETAINED_CAPACITY * 2, 0);
        }

        let rented = pool.rent(8).unwrap();
        assert!(rented.capacity() < MAX_RETAINED_CAPACITY * 2);
    }
}
