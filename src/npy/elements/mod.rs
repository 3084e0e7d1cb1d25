//! Implementations of the `*Element` traits.

use std::mem;
use std::slice;

/// Returns `true` iff the slice of bytes is properly aligned to be cast to a
/// slice with element type `T`.
fn is_aligned_for<T>(bytes: &[u8]) -> bool {
    bytes.as_ptr() as usize % mem::align_of::<T>() == 0
}

/// Cast little-endian `&[u8]` to `&[T]` without copying.
///
/// Returns `None` if the host is big-endian or `bytes` is misaligned for `T`,
/// in which case the caller must decode the elements into a new buffer.
///
/// # Safety
///
/// The caller must ensure that every bit pattern of `size_of::<T>()` bytes is
/// a valid `T`, and that `bytes.len()` is a multiple of `size_of::<T>()`.
unsafe fn view_le_bytes<T>(bytes: &[u8]) -> Option<&[T]> {
    debug_assert_eq!(bytes.len() % mem::size_of::<T>(), 0);
    if cfg!(target_endian = "big") || !is_aligned_for::<T>(bytes) {
        return None;
    }
    Some(slice::from_raw_parts(
        bytes.as_ptr().cast::<T>(),
        bytes.len() / mem::size_of::<T>(),
    ))
}

mod clamped;
mod primitive;

pub use self::clamped::Clamped;
