use tracing::{Level, instrument, warn};

use crate::packing::packer::{
    Container, EPSILON, Packer, PackingItem, PackingResult, PlacedItem, Rotation, WeightBudget,
};

/// Row and layer cursor shared by the shelf style packers.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ShelfCursor {
    pub(crate) x: f64,
    pub(crate) y: f64,
    pub(crate) z: f64,
    /// Deepest item (y extent) of the current row.
    pub(crate) row_depth: f64,
    /// Tallest item of the current layer.
    pub(crate) layer_height: f64,
}

impl ShelfCursor {
    pub(crate) fn new(container: &Container) -> Self {
        Self {
            x: container.x,
            y: container.y,
            z: container.z,
            row_depth: 0.0,
            layer_height: 0.0,
        }
    }

    /// Where a `length` x `width` footprint goes next: the current row if it
    /// has room, else a new row, else a new layer. The returned cursor still
    /// has to be checked against the container height.
    pub(crate) fn advance(&self, container: &Container, length: f64, width: f64) -> ShelfCursor {
        let mut next = *self;

        if next.x + length > container.max_x() + EPSILON {
            next.x = container.x;
            next.y += next.row_depth;
            next.row_depth = 0.0;
        }

        if next.y + width > container.max_y() + EPSILON {
            next.x = container.x;
            next.y = container.y;
            next.z += next.layer_height;
            next.row_depth = 0.0;
            next.layer_height = 0.0;
        }

        next
    }

    /// Cursor after placing a box at this position.
    pub(crate) fn place(&self, length: f64, width: f64, height: f64) -> ShelfCursor {
        ShelfCursor {
            x: self.x + length,
            row_depth: self.row_depth.max(width),
            layer_height: self.layer_height.max(height),
            ..*self
        }
    }

    pub(crate) fn position(&self) -> (f64, f64, f64) {
        (self.x, self.y, self.z)
    }
}

/// Shelf packer used for truck sections.
///
/// Heaviest items go first so they end up on the floor. Items keep their
/// stored orientation and fill rows along x, rows along y and then layers
/// along z. Items left without headroom are reported as unpacked.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShelfPacker;

impl Packer for ShelfPacker {
    #[instrument(skip_all, level = Level::DEBUG, fields(items = items.len()))]
    fn pack(&self, container: &Container, mut items: Vec<PackingItem>) -> PackingResult {
        items.sort_by(|a, b| b.weight.total_cmp(&a.weight));

        let mut cursor = ShelfCursor::new(container);
        let mut budget = WeightBudget::new(container.max_weight);
        let mut placed = Vec::with_capacity(items.len());
        let mut unpacked = Vec::new();

        for item in items {
            let dimensions = item.dimensions;

            if dimensions.length > container.width + EPSILON
                || dimensions.width > container.depth + EPSILON
                || dimensions.height > container.height + EPSILON
            {
                unpacked.push(item);
                continue;
            }

            if !budget.try_reserve(item.weight) {
                unpacked.push(item);
                continue;
            }

            let next = cursor.advance(container, dimensions.length, dimensions.width);
            cursor = next;

            if next.z + dimensions.height > container.max_z() + EPSILON {
                warn!(
                    "no headroom left for {} ({} cm tall) at z = {}",
                    item.id, dimensions.height, next.z
                );
                budget.release(item.weight);
                unpacked.push(item);
                continue;
            }

            cursor = next.place(dimensions.length, dimensions.width, dimensions.height);
            placed.push(PlacedItem::new(item, next.position(), Rotation::Deg0));
        }

        PackingResult::new(container, placed, unpacked)
    }
}
