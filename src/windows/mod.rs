//! Assetto Corsa shared memory access on Windows.
//!
//! The simulator creates one named file mapping per page while a session is
//! loaded. This module opens those mappings read-only and copies bytes out of
//! them; decoding happens in [`crate::layout`].
//!
//! # Usage
//!
//! ```rust,ignore
//! use pitbox::layout::{PhysicsPage, RecordLayout};
//! use pitbox::windows::FileMapping;
//!
//! let mapping = FileMapping::open(PhysicsPage::MAP_NAME, PhysicsPage::SIZE)?;
//! let mut raw = vec![0u8; PhysicsPage::SIZE];
//! mapping.read_into(&mut raw)?;
//! let physics = PhysicsPage::decode(&raw)?;
//! ```

mod mapping;

pub use mapping::{FileMapping, FileMappingBackend};
