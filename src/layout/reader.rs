//! Little-endian cursor following C struct alignment rules.

use super::WideStr;

/// Sequential field reader over a page buffer.
///
/// Field offsets are never written down by hand: each read aligns the cursor
/// the way a C compiler lays out the simulator's structs (4-byte scalars on
/// 4-byte boundaries, `wchar_t` arrays on 2-byte boundaries), so declaring the
/// fields in order reproduces the producer's layout, padding included.
///
/// The reader is created by [`RecordLayout::decode`](super::RecordLayout::decode)
/// over a slice that has already been checked against the layout size.
pub struct LayoutReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> LayoutReader<'a> {
    pub(crate) fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Current byte offset.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Offset after rounding up to the struct's 4-byte alignment.
    pub fn padded_end(&self) -> usize {
        self.pos.next_multiple_of(4)
    }

    fn align(&mut self, to: usize) {
        self.pos = self.pos.next_multiple_of(to);
    }

    fn take<const N: usize>(&mut self) -> [u8; N] {
        let mut out = [0u8; N];
        out.copy_from_slice(&self.buf[self.pos..self.pos + N]);
        self.pos += N;
        out
    }

    pub fn i32(&mut self) -> i32 {
        self.align(4);
        i32::from_le_bytes(self.take::<4>())
    }

    pub fn f32(&mut self) -> f32 {
        self.align(4);
        f32::from_le_bytes(self.take::<4>())
    }

    pub fn i32s<const N: usize>(&mut self) -> [i32; N] {
        std::array::from_fn(|_| self.i32())
    }

    pub fn f32s<const N: usize>(&mut self) -> [f32; N] {
        std::array::from_fn(|_| self.f32())
    }

    /// `float name[N][3]`
    pub fn vec3s<const N: usize>(&mut self) -> [[f32; 3]; N] {
        std::array::from_fn(|_| self.f32s::<3>())
    }

    /// `wchar_t name[N]`, kept as raw UTF-16 code units.
    pub fn wide<const N: usize>(&mut self) -> WideStr<N> {
        self.align(2);
        let units = std::array::from_fn(|_| u16::from_le_bytes(self.take::<2>()));
        WideStr::from_units(units)
    }
}
