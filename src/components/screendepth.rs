//! Screen depth component for render ordering.
//!
//! The [`ScreenDepth`] component carries the normalized draw-order value of a
//! tile actor, computed by
//! [`screen_depth`](crate::resources::tiletransform::screen_depth) from its
//! cell. It is independent of the projection's depth row.

use std::cmp::Ordering;

use bevy_ecs::prelude::Component;

/// Draw-order hint in `[-1, 1]`.
///
/// Higher values are drawn later (on top). The host renderer can sort by
/// `ScreenDepth` or write it straight into a depth buffer.
#[derive(Component, Clone, Copy, Debug, PartialEq, Default)]
pub struct ScreenDepth(pub f32);

impl PartialOrd for ScreenDepth {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.0.total_cmp(&other.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orders_by_value() {
        let mut depths = vec![ScreenDepth(0.5), ScreenDepth(-1.0), ScreenDepth(0.0)];
        depths.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
        assert_eq!(depths, vec![ScreenDepth(-1.0), ScreenDepth(0.0), ScreenDepth(0.5)]);
    }
}
