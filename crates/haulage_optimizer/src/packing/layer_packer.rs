use tracing::{Level, instrument};

use crate::packing::{
    packer::{
        Container, EPSILON, Packer, PackingItem, PackingResult, PlacedItem, Rotation, WeightBudget,
    },
    shelf_packer::ShelfCursor,
};

/// Simple layer-based packing, kept as a baseline strategy.
///
/// Items are placed in input order. Each item tries both yaw rotations from
/// the current cursor and keeps the one with the lowest `(z, y, x)` position.
#[derive(Debug, Clone, Copy, Default)]
pub struct LayerPacker;

struct Candidate {
    rotation: Rotation,
    cursor: ShelfCursor,
    length: f64,
    width: f64,
}

impl Candidate {
    fn is_better_than(&self, other: &Candidate) -> bool {
        let key = |c: &Candidate| (c.cursor.z, c.cursor.y, c.cursor.x);
        let (z, y, x) = key(self);
        let (best_z, best_y, best_x) = key(other);

        z.total_cmp(&best_z)
            .then_with(|| y.total_cmp(&best_y))
            .then_with(|| x.total_cmp(&best_x))
            .is_lt()
    }
}

impl Packer for LayerPacker {
    #[instrument(skip_all, level = Level::DEBUG, fields(items = items.len()))]
    fn pack(&self, container: &Container, items: Vec<PackingItem>) -> PackingResult {
        let mut cursor = ShelfCursor::new(container);
        let mut budget = WeightBudget::new(container.max_weight);
        let mut placed = Vec::with_capacity(items.len());
        let mut unpacked = Vec::new();

        for item in items {
            if !budget.try_reserve(item.weight) {
                unpacked.push(item);
                continue;
            }

            let height = item.dimensions.height;
            let mut best: Option<Candidate> = None;

            for rotation in Rotation::ALL {
                let (length, width) = rotation.footprint(&item.dimensions);

                if length > container.width + EPSILON || width > container.depth + EPSILON {
                    continue;
                }

                let next = cursor.advance(container, length, width);
                if next.z + height > container.max_z() + EPSILON {
                    continue;
                }

                let candidate = Candidate {
                    rotation,
                    cursor: next,
                    length,
                    width,
                };

                if best
                    .as_ref()
                    .is_none_or(|best| candidate.is_better_than(best))
                {
                    best = Some(candidate);
                }
            }

            match best {
                Some(candidate) => {
                    cursor = candidate
                        .cursor
                        .place(candidate.length, candidate.width, height);
                    placed.push(PlacedItem::new(
                        item,
                        candidate.cursor.position(),
                        candidate.rotation,
                    ));
                }
                None => {
                    budget.release(item.weight);
                    unpacked.push(item);
                }
            }
        }

        PackingResult::new(container, placed, unpacked)
    }
}
