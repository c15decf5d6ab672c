//! Test utilities for building shared memory pages and fake installations.
//!
//! [`InMemoryBackend`] stands in for the OS file mappings so sessions can be
//! driven without the simulator, and [`PageWriter`] lays out page bytes at
//! the offsets published by [`crate::layout`].

#![cfg(any(test, feature = "benchmark"))]

use crate::session::{MappedRegion, MemoryBackend};
use crate::{PitboxError, Result};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Debug, Default)]
struct Published {
    pages: HashMap<String, Vec<u8>>,
    bump_on_copy: Vec<String>,
}

/// Shared memory backend backed by byte vectors.
///
/// Clones share state, so a test can keep one handle to publish new page
/// contents while a session owns another.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBackend {
    published: Arc<Mutex<Published>>,
    open_handles: Arc<AtomicUsize>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the bytes of a named page. Open regions see the new bytes.
    pub fn publish(&self, name: &str, bytes: Vec<u8>) {
        self.lock().pages.insert(name.to_string(), bytes);
    }

    /// Number of regions opened and not yet dropped.
    pub fn open_handles(&self) -> usize {
        self.open_handles.load(Ordering::SeqCst)
    }

    /// Increment the page's leading packet id after every copy, simulating a
    /// writer that is always mid-frame.
    pub fn bump_packet_id_on_copy(&self, name: &str) {
        self.lock().bump_on_copy.push(name.to_string());
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Published> {
        self.published.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl MemoryBackend for InMemoryBackend {
    fn open(&self, name: &str, size: usize) -> Result<Box<dyn MappedRegion>> {
        if !self.lock().pages.contains_key(name) {
            return Err(PitboxError::connection_failed(format!("{name} is not published")));
        }
        self.open_handles.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(InMemoryRegion { name: name.to_string(), size, backend: self.clone() }))
    }
}

struct InMemoryRegion {
    name: String,
    size: usize,
    backend: InMemoryBackend,
}

impl MappedRegion for InMemoryRegion {
    fn len(&self) -> usize {
        self.size
    }

    fn copy_to(&self, dst: &mut [u8]) -> Result<()> {
        let mut published = self.backend.lock();
        let bump = published.bump_on_copy.contains(&self.name);
        let Some(bytes) = published.pages.get_mut(&self.name) else {
            return Err(PitboxError::connection_failed(format!("{} was withdrawn", self.name)));
        };
        if bytes.len() < dst.len() {
            return Err(PitboxError::connection_failed(format!(
                "{} holds {} bytes, {} requested",
                self.name,
                bytes.len(),
                dst.len()
            )));
        }

        dst.copy_from_slice(&bytes[..dst.len()]);

        if bump && bytes.len() >= 4 {
            let mut id = [0u8; 4];
            id.copy_from_slice(&bytes[..4]);
            let next = i32::from_le_bytes(id).wrapping_add(1);
            bytes[..4].copy_from_slice(&next.to_le_bytes());
        }
        Ok(())
    }
}

impl Drop for InMemoryRegion {
    fn drop(&mut self) {
        self.backend.open_handles.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Little-endian page builder.
///
/// Writes past the end of the page panic.
#[derive(Debug, Clone)]
pub struct PageWriter {
    bytes: Vec<u8>,
}

impl PageWriter {
    /// Zeroed page of `size` bytes.
    pub fn new(size: usize) -> Self {
        Self { bytes: vec![0u8; size] }
    }

    pub fn put_i32(&mut self, offset: usize, value: i32) -> &mut Self {
        self.bytes[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
        self
    }

    pub fn put_f32(&mut self, offset: usize, value: f32) -> &mut Self {
        self.bytes[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
        self
    }

    /// Consecutive floats starting at `offset`.
    pub fn put_f32s(&mut self, offset: usize, values: &[f32]) -> &mut Self {
        for (i, value) in values.iter().enumerate() {
            self.put_f32(offset + i * 4, *value);
        }
        self
    }

    /// UTF-16LE text; the caller keeps it within the field.
    pub fn put_wide(&mut self, offset: usize, text: &str) -> &mut Self {
        for (i, unit) in text.encode_utf16().enumerate() {
            let at = offset + i * 2;
            self.bytes[at..at + 2].copy_from_slice(&unit.to_le_bytes());
        }
        self
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

#[cfg(test)]
pub use fixture::{CarFixture, InstallFixture, TrackFixture};
