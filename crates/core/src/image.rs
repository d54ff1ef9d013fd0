// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::WorkflowError;
use parkdesk_domain::ImageRef;

/// Phase of image verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImagePhase {
    /// No selected vehicle has a registered image.
    #[default]
    Unavailable,
    /// At least one image can be compared against the vehicle.
    Available,
    /// The operator attested that the vehicle matches.
    Verified,
}

/// Tracks the operator's visual comparison of registered images.
///
/// The comparison itself is performed by a person. This tracker only
/// records the attestation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageTracker {
    phase: ImagePhase,
    images: Vec<ImageRef>,
}

impl ImageTracker {
    /// Creates a tracker over the registered images of the selection.
    ///
    /// Blank references do not count towards availability.
    #[must_use]
    pub fn new(images: &[ImageRef]) -> Self {
        let images: Vec<ImageRef> = images
            .iter()
            .filter(|image| !image.is_blank())
            .cloned()
            .collect();
        let phase: ImagePhase = if images.is_empty() {
            ImagePhase::Unavailable
        } else {
            ImagePhase::Available
        };
        Self { phase, images }
    }

    /// Returns the current phase.
    #[must_use]
    pub const fn phase(&self) -> ImagePhase {
        self.phase
    }

    /// Returns the images the operator compares against.
    #[must_use]
    pub fn images(&self) -> &[ImageRef] {
        &self.images
    }

    /// Returns whether the operator has attested a match.
    #[must_use]
    pub fn is_verified(&self) -> bool {
        self.phase == ImagePhase::Verified
    }

    /// Records the operator's attestation.
    ///
    /// Marking an already verified tracker again is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::ImageUnavailable` if there is nothing to
    /// compare against.
    pub fn mark_verified(&mut self) -> Result<(), WorkflowError> {
        match self.phase {
            ImagePhase::Unavailable => Err(WorkflowError::ImageUnavailable),
            ImagePhase::Available | ImagePhase::Verified => {
                self.phase = ImagePhase::Verified;
                Ok(())
            }
        }
    }
}
