//! Isometric tile/screen coordinate transform.
//!
//! [`TileTransform`] maps tile coordinates `(i, j, k)` to screen pixels plus a
//! depth value `(x, y, depth)` and back. Both directions are plain 4x4 matrix
//! products; the screen→tile matrix is the explicit inverse of the tile→screen
//! one and is computed once per screen size.
//!
//! Layout of the projection (one row per screen axis, one weight per tile axis):
//!
//! ```text
//! x     =  cs/2 * i  - cs/2 * j  + 0    * k  + w/2
//! y     = -cs/4 * i  - cs/4 * j  + cs/2 * k  + h - cs/4
//! depth = -d    * i  - d    * j  - d    * k  + 1
//! ```
//!
//! where `cs = tile_size * scale` and `d = depth_scale`. The depth row keeps
//! the value close to 1 for the whole map so it stays inside a normalized
//! depth buffer.
//!
//! Draw order is not taken from the projection: [`screen_depth`] gives a
//! separate monotonic value in `[-1, 1]` from the cell indices.

use bevy_ecs::prelude::Resource;
use glam::{Mat3, Mat4, Vec3};
use log::debug;
use thiserror::Error;

/// Source tile size in pixels.
pub const DEFAULT_TILE_SIZE: f32 = 32.0;
/// Scale applied to the tile size on screen.
pub const DEFAULT_SCALE: f32 = 2.0;
/// Depth change per tile unit along each axis.
pub const DEFAULT_DEPTH_SCALE: f32 = 1.0 / 1024.0;

/// Failure to build a [`TileTransform`].
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TransformError {
    /// The tile→screen matrix has no inverse.
    #[error("tile transform is singular (determinant {determinant})")]
    Singular { determinant: f32 },
    /// Screen or tile dimensions are not usable numbers.
    #[error("invalid transform parameter {name} = {value}")]
    InvalidParameter { name: &'static str, value: f32 },
}

/// Bidirectional tile ↔ screen mapping for the current screen size.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct TileTransform {
    screen_width: f32,
    screen_height: f32,
    tile_size: f32,
    scale: f32,
    depth_scale: f32,
    tile_to_screen: Mat4,
    screen_to_tile: Mat4,
}

impl TileTransform {
    /// Build a transform with the default tile size, scale and depth scale.
    pub fn new(screen_width: f32, screen_height: f32) -> Result<Self, TransformError> {
        Self::with_params(
            screen_width,
            screen_height,
            DEFAULT_TILE_SIZE,
            DEFAULT_SCALE,
            DEFAULT_DEPTH_SCALE,
        )
    }

    /// Build a transform with explicit tile parameters.
    pub fn with_params(
        screen_width: f32,
        screen_height: f32,
        tile_size: f32,
        scale: f32,
        depth_scale: f32,
    ) -> Result<Self, TransformError> {
        check_finite("screen_width", screen_width)?;
        check_finite("screen_height", screen_height)?;
        check_finite("tile_size", tile_size)?;
        check_finite("scale", scale)?;
        check_finite("depth_scale", depth_scale)?;

        let tile_to_screen =
            build_tile_to_screen(screen_width, screen_height, tile_size * scale, depth_scale);
        let screen_to_tile = invert(&tile_to_screen)?;

        debug!(
            "Tile transform built for {}x{} (cell size {})",
            screen_width,
            screen_height,
            tile_size * scale
        );

        Ok(Self {
            screen_width,
            screen_height,
            tile_size,
            scale,
            depth_scale,
            tile_to_screen,
            screen_to_tile,
        })
    }

    /// Rebuild both matrices for a new screen size.
    ///
    /// On error the transform is left untouched.
    pub fn resize(&mut self, screen_width: f32, screen_height: f32) -> Result<(), TransformError> {
        *self = Self::with_params(
            screen_width,
            screen_height,
            self.tile_size,
            self.scale,
            self.depth_scale,
        )?;
        Ok(())
    }

    /// Map tile coordinates to `(x, y, depth)` screen coordinates.
    pub fn to_screen_loc(&self, i: f32, j: f32, k: f32) -> Vec3 {
        self.tile_to_screen.transform_point3(Vec3::new(i, j, k))
    }

    /// Map `(x, y, depth)` screen coordinates back to tile coordinates.
    pub fn to_tile_loc(&self, x: f32, y: f32, depth: f32) -> Vec3 {
        self.screen_to_tile.transform_point3(Vec3::new(x, y, depth))
    }

    pub fn tile_to_screen(&self) -> &Mat4 {
        &self.tile_to_screen
    }

    pub fn screen_to_tile(&self) -> &Mat4 {
        &self.screen_to_tile
    }

    /// Size of one tile on screen, in pixels.
    pub fn cell_size(&self) -> f32 {
        self.tile_size * self.scale
    }

    pub fn screen_size(&self) -> (f32, f32) {
        (self.screen_width, self.screen_height)
    }
}

fn check_finite(name: &'static str, value: f32) -> Result<(), TransformError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(TransformError::InvalidParameter { name, value })
    }
}

fn build_tile_to_screen(screen_width: f32, screen_height: f32, cell_size: f32, depth_scale: f32) -> Mat4 {
    let half = cell_size / 2.0;
    let quarter = cell_size / 4.0;

    // Each axis holds the (i, j, k) weights of one screen row.
    let x_axis = Vec3::new(half, -half, 0.0);
    let y_axis = Vec3::new(-quarter, -quarter, half);
    let z_axis = Vec3::new(-depth_scale, -depth_scale, -depth_scale);
    let translation = Vec3::new(screen_width / 2.0, screen_height - quarter, 1.0);

    let linear = Mat3::from_cols(x_axis, y_axis, z_axis).transpose();
    let mut m = Mat4::from_mat3(linear);
    m.w_axis = translation.extend(1.0);
    m
}

/// Invert a 4x4 matrix, refusing singular or non-finite input.
pub fn invert(m: &Mat4) -> Result<Mat4, TransformError> {
    let determinant = m.determinant();
    if determinant == 0.0 || !determinant.is_finite() {
        return Err(TransformError::Singular { determinant });
    }
    let inverse = m.inverse();
    if !inverse.is_finite() {
        return Err(TransformError::Singular { determinant });
    }
    Ok(inverse)
}

/// Normalized draw-order depth of a cell in `[-1, 1]`.
///
/// Cells are ordered by `i`, then `j`, then `k`. `(0, 0, 0)` maps to exactly
/// `-1`; the last cell of a `max_i * max_j * max_k` grid lands just below `1`.
pub fn screen_depth(i: f32, j: f32, k: f32, max_i: u32, max_j: u32, max_k: u32) -> f32 {
    let max_i = max_i.max(1) as f32;
    let max_j = max_j.max(1) as f32;
    let max_k = max_k.max(1) as f32;
    let linear = i + j * max_i + k * max_j * max_i;
    let scaled = linear / (max_i * max_j * max_k);
    scaled * 2.0 - 1.0
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-4;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn test_origin_maps_to_translation() {
        let t = TileTransform::new(800.0, 600.0).unwrap();
        let p = t.to_screen_loc(0.0, 0.0, 0.0);
        assert!(approx_eq(p.x, 400.0));
        assert!(approx_eq(p.y, 600.0 - 16.0));
        assert!(approx_eq(p.z, 1.0));
    }

    #[test]
    fn test_unit_steps_follow_axes() {
        let t = TileTransform::new(800.0, 600.0).unwrap();
        let origin = t.to_screen_loc(0.0, 0.0, 0.0);

        let di = t.to_screen_loc(1.0, 0.0, 0.0) - origin;
        assert!(approx_eq(di.x, 32.0));
        assert!(approx_eq(di.y, -16.0));

        let dj = t.to_screen_loc(0.0, 1.0, 0.0) - origin;
        assert!(approx_eq(dj.x, -32.0));
        assert!(approx_eq(dj.y, -16.0));

        let dk = t.to_screen_loc(0.0, 0.0, 1.0) - origin;
        assert!(approx_eq(dk.x, 0.0));
        assert!(approx_eq(dk.y, 32.0));
        assert!(dk.z < 0.0);
    }

    #[test]
    fn test_inverse_recovers_tile() {
        let t = TileTransform::new(1280.0, 720.0).unwrap();
        let p = t.to_screen_loc(3.0, 5.0, 1.0);
        let back = t.to_tile_loc(p.x, p.y, p.z);
        assert!((back.x - 3.0).abs() < 1e-2);
        assert!((back.y - 5.0).abs() < 1e-2);
        assert!((back.z - 1.0).abs() < 1e-2);
    }

    #[test]
    fn test_fractional_and_negative_inputs() {
        let t = TileTransform::new(640.0, 480.0).unwrap();
        let p = t.to_screen_loc(-1.5, 2.25, -0.5);
        let back = t.to_tile_loc(p.x, p.y, p.z);
        assert!((back.x + 1.5).abs() < 1e-2);
        assert!((back.y - 2.25).abs() < 1e-2);
        assert!((back.z + 0.5).abs() < 1e-2);
    }

    #[test]
    fn test_zero_depth_scale_is_singular() {
        let err = TileTransform::with_params(800.0, 600.0, 32.0, 2.0, 0.0).unwrap_err();
        assert!(matches!(err, TransformError::Singular { .. }));
    }

    #[test]
    fn test_nan_parameter_rejected() {
        let err = TileTransform::new(f32::NAN, 600.0).unwrap_err();
        assert!(matches!(
            err,
            TransformError::InvalidParameter {
                name: "screen_width",
                ..
            }
        ));
    }

    #[test]
    fn test_invert_zero_matrix_fails() {
        assert!(invert(&Mat4::ZERO).is_err());
        assert_eq!(invert(&Mat4::IDENTITY).unwrap(), Mat4::IDENTITY);
    }

    #[test]
    fn test_resize_moves_origin() {
        let mut t = TileTransform::new(800.0, 600.0).unwrap();
        t.resize(1024.0, 768.0).unwrap();
        let p = t.to_screen_loc(0.0, 0.0, 0.0);
        assert!(approx_eq(p.x, 512.0));
        assert!(approx_eq(p.y, 768.0 - 16.0));
        assert_eq!(t.screen_size(), (1024.0, 768.0));
    }

    #[test]
    fn test_failed_resize_keeps_previous_state() {
        let mut t = TileTransform::new(800.0, 600.0).unwrap();
        let before = t;
        assert!(t.resize(f32::INFINITY, 600.0).is_err());
        assert_eq!(t, before);
    }

    #[test]
    fn test_screen_depth_origin_is_minus_one() {
        assert_eq!(screen_depth(0.0, 0.0, 0.0, 10, 10, 4), -1.0);
    }

    #[test]
    fn test_screen_depth_last_cell_below_one() {
        let d = screen_depth(9.0, 9.0, 3.0, 10, 10, 4);
        // (9 + 90 + 300) / 400 * 2 - 1
        assert!(approx_eq(d, 399.0 / 400.0 * 2.0 - 1.0));
        assert!(d < 1.0);
    }

    #[test]
    fn test_screen_depth_monotonic_order() {
        let (mi, mj, mk) = (4, 3, 2);
        let mut prev = f32::NEG_INFINITY;
        for k in 0..mk {
            for j in 0..mj {
                for i in 0..mi {
                    let d = screen_depth(i as f32, j as f32, k as f32, mi, mj, mk);
                    assert!(d > prev, "depth must increase at ({i},{j},{k})");
                    prev = d;
                }
            }
        }
    }

    #[test]
    fn test_screen_depth_zero_maxima_do_not_divide_by_zero() {
        let d = screen_depth(0.0, 0.0, 0.0, 0, 0, 0);
        assert_eq!(d, -1.0);
        assert!(screen_depth(1.0, 0.0, 0.0, 0, 0, 0).is_finite());
    }
}
