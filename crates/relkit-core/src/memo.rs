//! Lazily computed, cached values.
//!
//! A [`Memo`] owns a compute function and a slot. The first successful
//! [`Memo::get`] runs the function and stores its result; every later read
//! returns the stored value. A failed compute leaves the slot empty, so the
//! next read retries.
//!
//! There is no reentrancy guard. If `compute` reads the same memo, it runs
//! again for the nested read; whichever value is stored first is kept and
//! the other is dropped.

use std::cell::OnceCell;
use std::fmt;

/// Cache-on-first-read slot.
pub struct Memo<T, F> {
    slot: OnceCell<T>,
    compute: F,
}

impl<T, F> Memo<T, F> {
    /// Create an uncomputed memo. `compute` does not run until the first read.
    pub const fn new(compute: F) -> Self {
        Self {
            slot: OnceCell::new(),
            compute,
        }
    }

    /// True once a read has stored a value.
    #[must_use]
    pub fn is_computed(&self) -> bool {
        self.slot.get().is_some()
    }

    /// The stored value, without computing it.
    #[must_use]
    pub fn peek(&self) -> Option<&T> {
        self.slot.get()
    }

    /// Consume the memo, returning the stored value if any.
    pub fn into_inner(self) -> Option<T> {
        self.slot.into_inner()
    }
}

impl<T, E, F> Memo<T, F>
where
    F: Fn() -> Result<T, E>,
{
    /// Return the cached value, computing it on the first read.
    ///
    /// # Errors
    ///
    /// Returns whatever `compute` returned, unchanged. The slot stays
    /// uncomputed.
    pub fn get(&self) -> Result<&T, E> {
        if let Some(value) = self.slot.get() {
            return Ok(value);
        }

        match (self.compute)() {
            Ok(value) => Ok(self.slot.get_or_init(|| value)),
            Err(err) => {
                tracing::debug!("memo compute failed; slot left uncomputed");
                Err(err)
            }
        }
    }
}

impl<T: fmt::Debug, F> fmt::Debug for Memo<T, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Memo").field("slot", &self.slot).finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::convert::Infallible;

    #[test]
    fn computes_once_across_reads() {
        let calls = Cell::new(0_u32);
        let memo = Memo::new(|| {
            calls.set(calls.get() + 1);
            Ok::<_, Infallible>(42)
        });

        assert!(!memo.is_computed());
        for _ in 0..100 {
            assert_eq!(memo.get(), Ok(&42));
        }
        assert_eq!(calls.get(), 1);
        assert_eq!(memo.peek(), Some(&42));
    }

    #[test]
    fn failure_propagates_and_retries() {
        let calls = Cell::new(0_u32);
        let memo = Memo::new(|| {
            calls.set(calls.get() + 1);
            if calls.get() < 3 {
                Err(format!("attempt {}", calls.get()))
            } else {
                Ok("ready")
            }
        });

        assert_eq!(memo.get(), Err("attempt 1".to_string()));
        assert!(!memo.is_computed());
        assert_eq!(memo.get(), Err("attempt 2".to_string()));
        assert_eq!(memo.get(), Ok(&"ready"));
        assert_eq!(memo.get(), Ok(&"ready"));
        assert_eq!(calls.get(), 3);
    }

    #[test]
    fn untouched_memo_never_computes() {
        let memo: Memo<u8, _> = Memo::new(|| -> Result<u8, Infallible> {
            panic!("compute must not run");
        });
        assert_eq!(memo.peek(), None);
        assert_eq!(memo.into_inner(), None);
    }

    #[test]
    fn memo_as_struct_field() {
        struct Report {
            rows: Vec<u32>,
        }

        let report = Report { rows: vec![3, 4, 5] };
        let total = Memo::new(|| Ok::<u32, Infallible>(report.rows.iter().sum()));

        assert_eq!(total.get(), Ok(&12));
        assert_eq!(total.into_inner(), Some(12));
    }
}
