// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

use glam::DVec3;
use serde::{Deserialize, Serialize};

/// Spherical coordinate of a visual detection relative to the camera.
///
/// `azimuth` is measured around the vertical axis (positive to the left),
/// `elevation` above the horizontal plane. Both are in radians.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PolarCoordinate {
    pub distance: f64,
    pub azimuth: f64,
    pub elevation: f64,
}

impl PolarCoordinate {
    pub const fn new(distance: f64, azimuth: f64, elevation: f64) -> Self {
        PolarCoordinate {
            distance,
            azimuth,
            elevation,
        }
    }

    /// Build from the simulator's `(distance, azimuth°, elevation°)` triple.
    pub fn from_degrees(distance: f64, azimuth_deg: f64, elevation_deg: f64) -> Self {
        PolarCoordinate::new(distance, azimuth_deg.to_radians(), elevation_deg.to_radians())
    }

    /// Rotate by a head pose: yaw adds to azimuth, pitch adds to elevation.
    pub fn rotated(&self, yaw: f64, pitch: f64) -> Self {
        PolarCoordinate::new(self.distance, self.azimuth + yaw, self.elevation + pitch)
    }

    pub fn to_cartesian(&self) -> DVec3 {
        let (sin_az, cos_az) = self.azimuth.sin_cos();
        let (sin_el, cos_el) = self.elevation.sin_cos();
        DVec3::new(cos_az * cos_el, sin_az * cos_el, sin_el) * self.distance
    }

    pub fn is_finite(&self) -> bool {
        self.distance.is_finite() && self.azimuth.is_finite() && self.elevation.is_finite()
    }
}
