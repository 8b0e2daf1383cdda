//! Application window
//!
//! The window owns the watchface while it is loaded. Loading creates the
//! display regions, unloading drops them again.

use core::fmt;

use crate::ui::{Layout, WatchFace};

/// Lifecycle state of the window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WindowState {
    /// Never loaded
    Uncreated,
    /// Regions exist and receive updates
    Loaded,
    /// Regions were released
    Unloaded,
}

pub struct Window<F> {
    state: WindowState,
    face: Option<F>,
}

impl<F: WatchFace> Window<F> {
    pub const fn new() -> Self {
        Self {
            state: WindowState::Uncreated,
            face: None,
        }
    }

    pub fn state(&self) -> WindowState {
        self.state
    }

    pub fn is_loaded(&self) -> bool {
        self.state == WindowState::Loaded
    }

    /// Create the display regions and show the initial link state
    pub fn load(&mut self, layout: &Layout, connected: bool) -> Result<&mut F, Error> {
        if self.face.is_some() {
            return Err(Error::AlreadyLoaded);
        }

        let mut face = F::new(layout);
        face.show_connection(connected)?;
        debug!("Window loaded");

        self.state = WindowState::Loaded;
        Ok(self.face.insert(face))
    }

    /// Release the display regions
    pub fn unload(&mut self) -> Result<(), Error> {
        match self.face.take() {
            Some(face) => {
                drop(face);
                self.state = WindowState::Unloaded;
                debug!("Window unloaded");
                Ok(())
            }
            None => Err(Error::NotLoaded),
        }
    }

    /// Watchface, while loaded
    pub fn face(&self) -> Option<&F> {
        self.face.as_ref()
    }

    /// Watchface, while loaded
    pub fn face_mut(&mut self) -> Option<&mut F> {
        self.face.as_mut()
    }
}

impl<F: WatchFace> Default for Window<F> {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Window is loaded already
    AlreadyLoaded,
    /// Window is not loaded
    NotLoaded,
    /// Text exceeded its buffer
    Format,
}

impl From<fmt::Error> for Error {
    fn from(_: fmt::Error) -> Self {
        Error::Format
    }
}
