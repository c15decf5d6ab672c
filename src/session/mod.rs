//! Pull-based access to the simulator's three shared memory pages.
//!
//! A [`SharedMemorySession`] is either disconnected or holds all three pages;
//! it never keeps a partial attach. Reads copy the current page bytes into a
//! scratch buffer and decode them into a record owned by the session, so the
//! returned reference is overwritten by the next read of the same page.
//!
//! The simulator writes the pages at its own frame rate without any
//! cross-process lock. A read may observe a frame that is being rewritten,
//! so individual values can be implausible for a single poll.
//! [`SharedMemorySession::read_physics_consistent`] narrows that window with a
//! packet id re-check; the plain reads do not.

use crate::layout::{GraphicsPage, PhysicsPage, RecordLayout, StaticPage};
use crate::{PitboxError, Result};
use tracing::{debug, trace, warn};

/// A mapped, read-only view of one page.
pub trait MappedRegion: Send {
    /// Size of the mapped view in bytes.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy the first `dst.len()` bytes of the view into `dst`.
    fn copy_to(&self, dst: &mut [u8]) -> Result<()>;
}

/// Opens named shared memory regions.
pub trait MemoryBackend: Send {
    fn open(&self, name: &str, size: usize) -> Result<Box<dyn MappedRegion>>;
}

/// The OS backend for the current platform.
pub fn platform_backend() -> Box<dyn MemoryBackend> {
    #[cfg(windows)]
    {
        Box::new(crate::windows::FileMappingBackend)
    }
    #[cfg(not(windows))]
    {
        Box::new(UnsupportedBackend)
    }
}

/// Backend used where the simulator cannot run; every open fails.
#[cfg(not(windows))]
#[derive(Debug, Default)]
pub struct UnsupportedBackend;

#[cfg(not(windows))]
impl MemoryBackend for UnsupportedBackend {
    fn open(&self, _name: &str, _size: usize) -> Result<Box<dyn MappedRegion>> {
        Err(PitboxError::unsupported_platform("Live telemetry", "Windows"))
    }
}

struct Regions {
    physics: Box<dyn MappedRegion>,
    graphics: Box<dyn MappedRegion>,
    statics: Box<dyn MappedRegion>,
}

impl Regions {
    fn open(backend: &dyn MemoryBackend) -> Result<Self> {
        // Regions opened before a failure are dropped (and unmapped) by `?`.
        let physics = backend.open(PhysicsPage::MAP_NAME, PhysicsPage::SIZE)?;
        let graphics = backend.open(GraphicsPage::MAP_NAME, GraphicsPage::SIZE)?;
        let statics = backend.open(StaticPage::MAP_NAME, StaticPage::SIZE)?;
        Ok(Self { physics, graphics, statics })
    }
}

/// Connection to the simulator's physics, graphics and static pages.
pub struct SharedMemorySession {
    backend: Box<dyn MemoryBackend>,
    regions: Option<Regions>,
    scratch: Vec<u8>,
    physics: PhysicsPage,
    graphics: GraphicsPage,
    statics: StaticPage,
}

impl Default for SharedMemorySession {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SharedMemorySession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedMemorySession").field("connected", &self.is_connected()).finish()
    }
}

impl SharedMemorySession {
    /// Disconnected session using the platform backend.
    pub fn new() -> Self {
        Self::with_backend(platform_backend())
    }

    pub fn with_backend(backend: Box<dyn MemoryBackend>) -> Self {
        Self {
            backend,
            regions: None,
            scratch: Vec::with_capacity(GraphicsPage::SIZE),
            physics: PhysicsPage::default(),
            graphics: GraphicsPage::default(),
            statics: StaticPage::default(),
        }
    }

    pub fn is_connected(&self) -> bool {
        self.regions.is_some()
    }

    /// Attach to all three pages.
    ///
    /// Already-connected sessions return immediately. On failure the session
    /// stays disconnected and holds no region.
    pub fn connect(&mut self) -> Result<()> {
        if self.is_connected() {
            return Ok(());
        }

        trace!("Attempting to open Assetto Corsa shared memory");
        match Regions::open(self.backend.as_ref()) {
            Ok(regions) => {
                self.regions = Some(regions);
                debug!("Connected to Assetto Corsa shared memory");
                Ok(())
            }
            Err(e) => {
                debug!(error = %e, "Shared memory not available");
                Err(PitboxError::connection_failed_with_source(
                    "shared memory pages not available",
                    Box::new(e),
                ))
            }
        }
    }

    /// Release every page. Safe to call when already disconnected.
    pub fn disconnect(&mut self) {
        if self.regions.take().is_some() {
            debug!("Disconnected from Assetto Corsa shared memory");
        }
    }

    /// Latest physics page.
    ///
    /// `Ok(None)` when disconnected. A failed copy or decode is reported as an
    /// error and leaves the session connected.
    pub fn read_physics(&mut self) -> Result<Option<&PhysicsPage>> {
        let Some(regions) = &self.regions else {
            return Ok(None);
        };
        self.physics = read_page(regions.physics.as_ref(), &mut self.scratch)?;
        Ok(Some(&self.physics))
    }

    pub fn read_graphics(&mut self) -> Result<Option<&GraphicsPage>> {
        let Some(regions) = &self.regions else {
            return Ok(None);
        };
        self.graphics = read_page(regions.graphics.as_ref(), &mut self.scratch)?;
        Ok(Some(&self.graphics))
    }

    pub fn read_static(&mut self) -> Result<Option<&StaticPage>> {
        let Some(regions) = &self.regions else {
            return Ok(None);
        };
        self.statics = read_page(regions.statics.as_ref(), &mut self.scratch)?;
        Ok(Some(&self.statics))
    }

    /// Physics read that rejects frames rewritten while being copied.
    ///
    /// After copying the page the packet id is read again; if it moved the
    /// copy is retried once. Two torn copies in a row report
    /// [`PitboxError::TornRead`].
    pub fn read_physics_consistent(&mut self) -> Result<Option<&PhysicsPage>> {
        let Some(regions) = &self.regions else {
            return Ok(None);
        };

        let mut id_bytes = [0u8; 4];
        for attempt in 0..2 {
            let page: PhysicsPage = read_page(regions.physics.as_ref(), &mut self.scratch)?;
            regions.physics.copy_to(&mut id_bytes)?;
            let packet_after = i32::from_le_bytes(id_bytes);

            if packet_after == page.packet_id {
                self.physics = page;
                return Ok(Some(&self.physics));
            }
            debug!(
                "Physics page changed during copy on attempt {}: before={}, after={}",
                attempt + 1,
                page.packet_id,
                packet_after
            );
        }

        warn!("Physics page torn on every attempt, no data returned");
        Err(PitboxError::TornRead { layout: PhysicsPage::NAME })
    }
}

fn read_page<T: RecordLayout>(region: &dyn MappedRegion, scratch: &mut Vec<u8>) -> Result<T> {
    scratch.clear();
    scratch.resize(T::SIZE, 0);
    region.copy_to(scratch)?;
    T::decode(scratch)
}
