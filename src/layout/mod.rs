//! Assetto Corsa shared memory page layouts.
//!
//! The simulator publishes three independent pages, each a fixed C struct:
//!
//! | Page | Map name | Size |
//! |------|----------|------|
//! | [`PhysicsPage`] | `Local\acpmf_physics` | 580 bytes |
//! | [`GraphicsPage`] | `Local\acpmf_graphics` | 1256 bytes |
//! | [`StaticPage`] | `Local\acpmf_static` | 684 bytes |
//!
//! All floats are 32-bit, all integers and enums 32-bit signed, strings are
//! fixed-width `wchar_t` (UTF-16) arrays that are NUL padded but not
//! guaranteed to be NUL terminated. Everything is little-endian.
//!
//! Decoding is a single call per page:
//!
//! ```rust
//! use pitbox::layout::{PhysicsPage, RecordLayout};
//!
//! let raw = vec![0u8; PhysicsPage::SIZE];
//! let physics = PhysicsPage::decode(&raw).unwrap();
//! assert_eq!(physics.gear, 0);
//!
//! assert!(PhysicsPage::decode(&raw[..100]).is_err());
//! ```

mod graphics;
mod physics;
mod reader;
mod statics;

pub use graphics::{FlagType, GraphicsPage, MAX_CARS, SessionType, SimStatus};
pub use graphics::offsets as graphics_offsets;
pub use physics::PhysicsPage;
pub use physics::offsets as physics_offsets;
pub use reader::LayoutReader;
pub use statics::StaticPage;
pub use statics::offsets as static_offsets;

use crate::{PitboxError, Result};

/// A fixed-size record mirrored from one shared memory page.
pub trait RecordLayout: Sized {
    /// Short page name used in logs and errors.
    const NAME: &'static str;

    /// Name of the OS file mapping the simulator publishes this page under.
    const MAP_NAME: &'static str;

    /// Exact byte size of the C struct, trailing padding included.
    const SIZE: usize;

    /// Read every field in declaration order.
    fn read_from(reader: &mut LayoutReader<'_>) -> Self;

    /// Decode a raw page.
    ///
    /// Buffers shorter than [`Self::SIZE`] fail without producing a record;
    /// bytes past `SIZE` are ignored.
    fn decode(buf: &[u8]) -> Result<Self> {
        if buf.len() < Self::SIZE {
            return Err(PitboxError::short_buffer(Self::NAME, Self::SIZE, buf.len()));
        }
        let mut reader = LayoutReader::new(&buf[..Self::SIZE]);
        Ok(Self::read_from(&mut reader))
    }
}

/// Fixed-width UTF-16 string field.
///
/// Holds the raw code units so decoding never allocates; conversion to
/// `String` stops at the first NUL or at `N` units, whichever comes first.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct WideStr<const N: usize>([u16; N]);

impl<const N: usize> WideStr<N> {
    pub fn from_units(units: [u16; N]) -> Self {
        Self(units)
    }

    /// Encode `s`, truncating to `N` code units. Unused slots are NUL.
    pub fn encode(s: &str) -> Self {
        let mut units = [0u16; N];
        for (slot, unit) in units.iter_mut().zip(s.encode_utf16()) {
            *slot = unit;
        }
        Self(units)
    }

    /// Code units up to the first NUL.
    pub fn units(&self) -> &[u16] {
        let len = self.0.iter().position(|&u| u == 0).unwrap_or(N);
        &self.0[..len]
    }

    pub fn is_empty(&self) -> bool {
        self.units().is_empty()
    }

    pub fn to_string_lossy(&self) -> String {
        char::decode_utf16(self.units().iter().copied())
            .map(|c| c.unwrap_or(char::REPLACEMENT_CHARACTER))
            .collect()
    }
}

impl<const N: usize> Default for WideStr<N> {
    fn default() -> Self {
        Self([0; N])
    }
}

impl<const N: usize> std::fmt::Debug for WideStr<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.to_string_lossy())
    }
}

impl<const N: usize> std::fmt::Display for WideStr<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_string_lossy())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn wide_str_stops_at_nul() {
        let mut units = [0u16; 15];
        for (slot, unit) in units.iter_mut().zip("1:23.456".encode_utf16()) {
            *slot = unit;
        }
        units[10] = 'X' as u16; // garbage after the terminator
        assert_eq!(WideStr::from_units(units).to_string_lossy(), "1:23.456");
    }

    #[test]
    fn wide_str_without_terminator_uses_full_width() {
        let s = WideStr::<4>::encode("abcdef");
        assert_eq!(s.units().len(), 4);
        assert_eq!(s.to_string_lossy(), "abcd");
    }

    #[test]
    fn wide_str_lone_surrogate_is_replaced() {
        let s = WideStr::<3>::from_units([0xD800, 'a' as u16, 0]);
        assert_eq!(s.to_string_lossy(), "\u{FFFD}a");
    }

    proptest! {
        #[test]
        fn pages_reject_every_short_length(len in 0usize..PhysicsPage::SIZE) {
            let buf = vec![0u8; len];
            let is_short_error = matches!(
                PhysicsPage::decode(&buf),
                Err(PitboxError::Decode { expected: 580, .. })
            );
            prop_assert!(is_short_error);
        }

        #[test]
        fn decode_never_panics_on_arbitrary_bytes(
            bytes in prop::collection::vec(any::<u8>(), 0..2048)
        ) {
            let _ = PhysicsPage::decode(&bytes);
            let _ = GraphicsPage::decode(&bytes);
            let _ = StaticPage::decode(&bytes);
        }
    }
}
