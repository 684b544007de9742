//! Simulation session
//!
//! Owns the per-track resources (mask, contour overlay, sprite) and the single
//! vehicle. A driver loop calls [`Session::step`] once per rendered frame and
//! reads back state through getters or [`Session::telemetry`].

use std::path::Path;

use glam::Vec2;
use image::RgbaImage;

use crate::cell_of;
use crate::error::{Result, SimError};
use crate::settings::Settings;
use crate::telemetry::Telemetry;
use crate::track::{BoundaryBand, ContourExtractor, DrivableMask, TrackMaskBuilder, load_sprite};

use super::tick::{TickInput, VehicleDynamics};

/// One track, one vehicle
#[derive(Debug)]
pub struct Session {
    settings: Settings,
    mask: DrivableMask,
    band: BoundaryBand,
    overlay: RgbaImage,
    sprite: Option<RgbaImage>,
    vehicle: VehicleDynamics,
    show_contour: bool,
    tick_count: u64,
}

impl Session {
    /// Load the track and sprite images and place the vehicle at spawn
    ///
    /// Any failure here is fatal for the session.
    pub fn new(
        track_path: impl AsRef<Path>,
        sprite_path: impl AsRef<Path>,
        settings: Settings,
    ) -> Result<Self> {
        settings.validate()?;

        let builder = TrackMaskBuilder::new(settings.vision);
        let mask = builder.build(
            track_path,
            settings.viewport_width,
            settings.viewport_height,
        )?;
        let sprite = load_sprite(sprite_path, settings.sprite_width, settings.sprite_height)?;

        let mut session = Self::from_mask(mask, settings)?;
        session.sprite = Some(sprite);
        Ok(session)
    }

    /// Session over a precomputed mask, without a sprite
    pub fn from_mask(mask: DrivableMask, settings: Settings) -> Result<Self> {
        settings.validate()?;
        if (mask.width(), mask.height()) != (settings.viewport_width, settings.viewport_height) {
            return Err(SimError::InvalidConfig(format!(
                "mask is {}x{} but viewport is {}x{}",
                mask.width(),
                mask.height(),
                settings.viewport_width,
                settings.viewport_height
            )));
        }

        log::info!("Generating track contour...");
        let band = ContourExtractor::extract(&mask, settings.contour_iterations);
        let overlay = band.overlay_rgba();

        let vehicle = VehicleDynamics::new(
            settings.physics,
            settings.sensors.clone(),
            settings.spawn,
        )?;
        let (sx, sy) = cell_of(Vec2::new(settings.spawn.x, settings.spawn.y));
        if !mask.is_drivable(sx, sy) {
            log::warn!(
                "Spawn ({}, {}) is not on the detected track",
                settings.spawn.x,
                settings.spawn.y
            );
        }
        log::info!("Session ready");

        Ok(Self {
            settings,
            mask,
            band,
            overlay,
            sprite: None,
            vehicle,
            show_contour: true,
            tick_count: 0,
        })
    }

    /// Advance one frame; `restart` respawns instead of simulating
    pub fn step(&mut self, input: &TickInput) {
        self.tick_count += 1;
        if input.restart {
            self.restart();
            return;
        }
        self.vehicle.update(input, &self.mask);
    }

    /// Respawn the vehicle at the configured spawn point
    pub fn restart(&mut self) {
        self.vehicle.reset(self.settings.spawn);
    }

    /// Flip contour overlay visibility, returning the new value
    pub fn toggle_contour(&mut self) -> bool {
        self.show_contour = !self.show_contour;
        self.show_contour
    }

    pub fn show_contour(&self) -> bool {
        self.show_contour
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn mask(&self) -> &DrivableMask {
        &self.mask
    }

    pub fn boundary_band(&self) -> &BoundaryBand {
        &self.band
    }

    /// Pre-tinted RGBA contour layer
    pub fn contour_overlay(&self) -> &RgbaImage {
        &self.overlay
    }

    pub fn sprite(&self) -> Option<&RgbaImage> {
        self.sprite.as_ref()
    }

    pub fn vehicle(&self) -> &VehicleDynamics {
        &self.vehicle
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Sensor readings scaled to [0, 1] for an autonomous controller
    pub fn normalized_sensors(&self) -> Vec<f32> {
        self.vehicle.normalized_sensors()
    }

    /// Snapshot of everything a HUD displays
    pub fn telemetry(&self) -> Telemetry {
        Telemetry::capture(self)
    }
}
