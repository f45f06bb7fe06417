use schemars::JsonSchema;
use serde::Serialize;

use crate::packing::packer::PlacedItem;

/// Weight-weighted centroid of a load, in container coordinates.
#[derive(Serialize, JsonSchema, Debug, Clone, Copy, PartialEq, Default)]
pub struct CenterOfGravity {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Centroid of the geometric centers of `placed`, weighted by item weight.
/// An empty or weightless load sits at the origin.
pub fn center_of_gravity(placed: &[PlacedItem]) -> CenterOfGravity {
    let total_weight: f64 = placed.iter().map(PlacedItem::weight).sum();

    if placed.is_empty() || total_weight <= 0.0 {
        return CenterOfGravity::default();
    }

    let (x, y, z) = placed.iter().fold((0.0, 0.0, 0.0), |(x, y, z), item| {
        let (cx, cy, cz) = item.center();
        let weight = item.weight();
        (x + cx * weight, y + cy * weight, z + cz * weight)
    });

    CenterOfGravity {
        x: x / total_weight,
        y: y / total_weight,
        z: z / total_weight,
    }
}

/// Whether the centroid stays within `tolerance * width` of the floor center
/// along x and within `tolerance * depth` along y. Height is not checked.
pub fn is_balanced(cog: &CenterOfGravity, width: f64, depth: f64, tolerance: f64) -> bool {
    (cog.x - width / 2.0).abs() <= tolerance * width
        && (cog.y - depth / 2.0).abs() <= tolerance * depth
}
