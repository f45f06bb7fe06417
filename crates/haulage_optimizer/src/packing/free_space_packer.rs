use tracing::{Level, debug, instrument};

use crate::packing::packer::{
    Container, EPSILON, Packer, PackingItem, PackingResult, PlacedItem, Rotation, WeightBudget,
};

/// Empty axis-aligned box left over by previous placements.
#[derive(Debug, Clone, Copy, PartialEq)]
struct FreeBox {
    x: f64,
    y: f64,
    z: f64,
    width: f64,
    depth: f64,
    height: f64,
}

impl FreeBox {
    fn fits(&self, length: f64, width: f64, height: f64) -> bool {
        length <= self.width + EPSILON
            && width <= self.depth + EPSILON
            && height <= self.height + EPSILON
    }

    /// Bottom-Left-Back ranking: lowest z, then lowest y, then lowest x.
    fn cmp_position(&self, other: &FreeBox) -> std::cmp::Ordering {
        self.z
            .total_cmp(&other.z)
            .then_with(|| self.y.total_cmp(&other.y))
            .then_with(|| self.x.total_cmp(&other.x))
    }

    /// Guillotine split around an item placed at this box's origin. The
    /// remainders are disjoint: +x keeps the full depth and height, +y keeps
    /// the full height over the item length, +z covers the item footprint.
    fn split(&self, length: f64, width: f64, height: f64) -> impl Iterator<Item = FreeBox> {
        let right = FreeBox {
            x: self.x + length,
            width: self.width - length,
            ..*self
        };
        let front = FreeBox {
            y: self.y + width,
            width: length,
            depth: self.depth - width,
            ..*self
        };
        let above = FreeBox {
            z: self.z + height,
            width: length,
            depth: width,
            height: self.height - height,
            ..*self
        };

        [right, front, above]
            .into_iter()
            .filter(|free| free.width > EPSILON && free.depth > EPSILON && free.height > EPSILON)
    }
}

impl From<&Container> for FreeBox {
    fn from(container: &Container) -> Self {
        FreeBox {
            x: container.x,
            y: container.y,
            z: container.z,
            width: container.width,
            depth: container.depth,
            height: container.height,
        }
    }
}

/// First-Fit-Decreasing guillotine packer with Bottom-Left-Back box choice.
///
/// Items are processed by descending volume. Each item tries no rotation,
/// then a quarter turn, and takes the lowest ranked free box that holds it
/// under the first rotation that fits anywhere.
#[derive(Debug, Clone, Copy, Default)]
pub struct FreeSpacePacker;

impl FreeSpacePacker {
    fn find_box(free_boxes: &[FreeBox], item: &PackingItem) -> Option<(usize, Rotation)> {
        let rotations = if (item.dimensions.length - item.dimensions.width).abs() <= EPSILON {
            &Rotation::ALL[..1]
        } else {
            &Rotation::ALL[..]
        };

        rotations.iter().find_map(|&rotation| {
            let (length, width) = rotation.footprint(&item.dimensions);

            free_boxes
                .iter()
                .enumerate()
                .filter(|(_, free)| free.fits(length, width, item.dimensions.height))
                .min_by(|(_, a), (_, b)| a.cmp_position(b))
                .map(|(index, _)| (index, rotation))
        })
    }
}

impl Packer for FreeSpacePacker {
    #[instrument(skip_all, level = Level::DEBUG, fields(items = items.len()))]
    fn pack(&self, container: &Container, mut items: Vec<PackingItem>) -> PackingResult {
        items.sort_by(|a, b| b.volume().total_cmp(&a.volume()).then_with(|| a.id.cmp(&b.id)));

        let mut free_boxes = vec![FreeBox::from(container)];
        let mut budget = WeightBudget::new(container.max_weight);
        let mut placed = Vec::with_capacity(items.len());
        let mut unpacked = Vec::new();

        for item in items {
            if !budget.try_reserve(item.weight) {
                debug!("item {} exceeds remaining weight", item.id);
                unpacked.push(item);
                continue;
            }

            match Self::find_box(&free_boxes, &item) {
                Some((index, rotation)) => {
                    let free = free_boxes.remove(index);
                    let placement = PlacedItem::new(item, (free.x, free.y, free.z), rotation);

                    free_boxes.extend(free.split(
                        placement.length,
                        placement.width,
                        placement.height,
                    ));
                    placed.push(placement);
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::create_packing_item;

    #[test]
    fn test_weight_limit() {
        let container = Container::new(100.0, 100.0, 100.0, 25.0);
        let items = (0..3)
            .map(|i| create_packing_item(&i.to_string(), 10.0, 10.0, 10.0, 10.0))
            .collect();

        let result = FreeSpacePacker.pack(&container, items);

        assert_eq!(result.placed.len(), 2);
        assert_eq!(result.unpacked.len(), 1);
        assert!(result.total_weight <= 25.0);
    }

    #[test]
    fn test_too_long_item_is_unpacked() {
        let container = Container::new(100.0, 100.0, 100.0, 1000.0);
        let items = vec![create_packing_item("long", 150.0, 10.0, 10.0, 1.0)];

        let result = FreeSpacePacker.pack(&container, items);

        assert!(result.placed.is_empty());
        assert_eq!(result.unpacked.len(), 1);
        assert_eq!(result.unpacked[0].id, "long");
    }

    #[test]
    fn test_rotates_when_needed() {
        let container = Container::new(50.0, 100.0, 50.0, 1000.0);
        let items = vec![create_packing_item("wide", 80.0, 40.0, 10.0, 1.0)];

        let result = FreeSpacePacker.pack(&container, items);

        assert_eq!(result.placed.len(), 1);
        let placed = &result.placed[0];
        assert_eq!(placed.rotation, Rotation::Deg90);
        assert_eq!((placed.length, placed.width), (40.0, 80.0));
    }

    #[test]
    fn test_bottom_left_back_order() {
        let container = Container::new(100.0, 100.0, 100.0, 1000.0);
        let items = (0..4)
            .map(|i| create_packing_item(&i.to_string(), 50.0, 50.0, 50.0, 1.0))
            .collect();

        let result = FreeSpacePacker.pack(&container, items);

        let positions: Vec<(f64, f64, f64)> = result
            .placed
            .iter()
            .map(|placed| (placed.x, placed.y, placed.z))
            .collect();

        assert_eq!(
            positions,
            vec![
                (0.0, 0.0, 0.0),
                (50.0, 0.0, 0.0),
                (0.0, 50.0, 0.0),
                (50.0, 50.0, 0.0),
            ]
        );
    }

    #[test]
    fn test_largest_first_and_no_overlap() {
        let container = Container::new(120.0, 80.0, 100.0, 10_000.0);
        let items = vec![
            create_packing_item("small", 20.0, 20.0, 20.0, 1.0),
            create_packing_item("big", 60.0, 80.0, 50.0, 1.0),
            create_packing_item("mid", 40.0, 30.0, 40.0, 1.0),
            create_packing_item("flat", 30.0, 40.0, 10.0, 1.0),
            create_packing_item("tall", 30.0, 30.0, 90.0, 1.0),
        ];

        let result = FreeSpacePacker.pack(&container, items);

        assert_eq!(result.placed[0].item.id, "big");
        assert_eq!(result.placed.len(), 5);

        for (i, a) in result.placed.iter().enumerate() {
            assert!(a.is_inside(&container));
            for b in &result.placed[i + 1..] {
                assert!(!a.overlaps(b), "{} overlaps {}", a.item.id, b.item.id);
            }
        }
    }

    #[test]
    fn test_utilization() {
        let container = Container::new(100.0, 100.0, 100.0, 200.0);
        let items = vec![create_packing_item("half", 100.0, 50.0, 100.0, 50.0)];

        let result = FreeSpacePacker.pack(&container, items);

        assert_eq!(result.volume_utilization, 50.0);
        assert_eq!(result.weight_utilization, 25.0);
    }

    #[test]
    fn test_respects_container_origin() {
        let container = Container::new(100.0, 300.0, 100.0, 100.0).band(100.0, 100.0, 100.0);
        let items = vec![create_packing_item("a", 10.0, 10.0, 10.0, 1.0)];

        let result = FreeSpacePacker.pack(&container, items);

        assert_eq!(result.placed[0].y, 100.0);
    }
}
