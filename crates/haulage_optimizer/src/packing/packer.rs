use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{
    packing::{
        free_space_packer::FreeSpacePacker, layer_packer::LayerPacker, shelf_packer::ShelfPacker,
    },
    problem::{item::Dimensions, order::Order, truck::Truck},
    utils::percentage::percentage,
};

/// Tolerance for comparing summed floating point extents.
pub(crate) const EPSILON: f64 = 1e-6;

/// Axis-aligned cargo space. The origin is its corner closest to `(0, 0, 0)`,
/// which lets a truck section be packed in truck coordinates.
#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct Container {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub width: f64,
    pub depth: f64,
    pub height: f64,
    pub max_weight: f64,
}

impl Container {
    pub fn new(width: f64, depth: f64, height: f64, max_weight: f64) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            z: 0.0,
            width,
            depth,
            height,
            max_weight,
        }
    }

    pub fn from_truck(truck: &Truck) -> Self {
        Self::new(truck.width(), truck.depth(), truck.height(), truck.max_weight())
    }

    /// The band `[y, y + depth)` of this container.
    pub fn band(&self, y: f64, depth: f64, max_weight: f64) -> Self {
        Self {
            y,
            depth,
            max_weight,
            ..*self
        }
    }

    pub fn volume(&self) -> f64 {
        self.width * self.depth * self.height
    }

    pub fn max_x(&self) -> f64 {
        self.x + self.width
    }

    pub fn max_y(&self) -> f64 {
        self.y + self.depth
    }

    pub fn max_z(&self) -> f64 {
        self.z + self.height
    }
}

/// Yaw of a placed item. A quarter turn swaps its length and width.
#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Rotation {
    #[default]
    #[serde(rename = "0")]
    Deg0,
    #[serde(rename = "90")]
    Deg90,
}

impl Rotation {
    pub const ALL: [Rotation; 2] = [Rotation::Deg0, Rotation::Deg90];

    /// Footprint `(length, width)` of `dimensions` under this rotation.
    pub fn footprint(self, dimensions: &Dimensions) -> (f64, f64) {
        match self {
            Rotation::Deg0 => (dimensions.length, dimensions.width),
            Rotation::Deg90 => (dimensions.width, dimensions.length),
        }
    }

    pub fn degrees(self) -> u16 {
        match self {
            Rotation::Deg0 => 0,
            Rotation::Deg90 => 90,
        }
    }
}

/// Third of the cargo space an item was loaded into. `Front` is by the door.
#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Back,
    Middle,
    Front,
}

impl Section {
    /// Loading order: the back is filled first.
    pub const ALL: [Section; 3] = [Section::Back, Section::Middle, Section::Front];
}

/// One physical unit waiting to be packed.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct PackingItem {
    pub id: String,
    pub order_id: String,
    pub dimensions: Dimensions,
    pub weight: f64,
    /// Stop at which the unit leaves the truck, if it is part of a route.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_sequence: Option<usize>,
}

impl PackingItem {
    pub fn volume(&self) -> f64 {
        self.dimensions.volume()
    }

    /// One packing item per physical unit of the order.
    pub fn expand_order(order: &Order, stop_sequence: Option<usize>) -> Vec<PackingItem> {
        let mut units = Vec::with_capacity(order.unit_count());

        for (item_index, item) in order.items().iter().enumerate() {
            let item_id = if item.id().is_empty() {
                (item_index + 1).to_string()
            } else {
                item.id().to_owned()
            };

            for unit in 0..item.quantity() {
                units.push(PackingItem {
                    id: format!("{}/{}#{}", order.id(), item_id, unit + 1),
                    order_id: order.id().to_owned(),
                    dimensions: *item.dimensions(),
                    weight: item.weight(),
                    stop_sequence,
                });
            }
        }

        units
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct PlacedItem {
    #[serde(flatten)]
    pub item: PackingItem,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub rotation: Rotation,
    /// Extent along x after rotation.
    pub length: f64,
    /// Extent along y after rotation.
    pub width: f64,
    pub height: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<Section>,
}

impl PlacedItem {
    pub fn new(item: PackingItem, position: (f64, f64, f64), rotation: Rotation) -> Self {
        let (length, width) = rotation.footprint(&item.dimensions);
        let height = item.dimensions.height;

        Self {
            item,
            x: position.0,
            y: position.1,
            z: position.2,
            rotation,
            length,
            width,
            height,
            section: None,
        }
    }

    pub fn weight(&self) -> f64 {
        self.item.weight
    }

    pub fn position(&self) -> (f64, f64, f64) {
        (self.x, self.y, self.z)
    }

    pub fn volume(&self) -> f64 {
        self.length * self.width * self.height
    }

    pub fn center(&self) -> (f64, f64, f64) {
        (
            self.x + self.length / 2.0,
            self.y + self.width / 2.0,
            self.z + self.height / 2.0,
        )
    }

    pub fn overlaps(&self, other: &PlacedItem) -> bool {
        fn overlap_1d(a_min: f64, a_len: f64, b_min: f64, b_len: f64) -> bool {
            a_min + a_len > b_min + EPSILON && b_min + b_len > a_min + EPSILON
        }

        overlap_1d(self.x, self.length, other.x, other.length)
            && overlap_1d(self.y, self.width, other.y, other.width)
            && overlap_1d(self.z, self.height, other.z, other.height)
    }

    pub fn is_inside(&self, container: &Container) -> bool {
        self.x >= container.x - EPSILON
            && self.y >= container.y - EPSILON
            && self.z >= container.z - EPSILON
            && self.x + self.length <= container.max_x() + EPSILON
            && self.y + self.width <= container.max_y() + EPSILON
            && self.z + self.height <= container.max_z() + EPSILON
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Default)]
pub struct PackingResult {
    pub placed: Vec<PlacedItem>,
    pub unpacked: Vec<PackingItem>,
    pub total_weight: f64,
    pub total_volume: f64,
    /// Used volume over container volume, in percent.
    pub volume_utilization: f64,
    /// Used weight over container max weight, in percent.
    pub weight_utilization: f64,
}

impl PackingResult {
    pub fn new(container: &Container, placed: Vec<PlacedItem>, unpacked: Vec<PackingItem>) -> Self {
        let total_weight = placed.iter().map(PlacedItem::weight).sum();
        let total_volume = placed.iter().map(PlacedItem::volume).sum();

        Self {
            volume_utilization: percentage(total_volume, container.volume()),
            weight_utilization: percentage(total_weight, container.max_weight),
            placed,
            unpacked,
            total_weight,
            total_volume,
        }
    }
}

/// A strategy placing boxes into a container.
pub trait Packer {
    fn pack(&self, container: &Container, items: Vec<PackingItem>) -> PackingResult;
}

/// Running weight check shared by the packers.
pub(crate) struct WeightBudget {
    used: f64,
    max: f64,
}

impl WeightBudget {
    pub(crate) fn new(max: f64) -> Self {
        Self { used: 0.0, max }
    }

    /// Reserves `weight` if it keeps the total within the maximum.
    pub(crate) fn try_reserve(&mut self, weight: f64) -> bool {
        if self.used + weight > self.max + EPSILON {
            false
        } else {
            self.used += weight;
            true
        }
    }

    pub(crate) fn release(&mut self, weight: f64) {
        self.used -= weight;
    }
}

#[derive(Serialize, Deserialize, JsonSchema, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum PackerKind {
    /// Guillotine free-space packing, first fit decreasing by volume.
    #[default]
    FreeSpace,
    /// Row/layer shelves, heaviest first, stored orientation only.
    Shelf,
    /// Row/layer shelves in input order, trying both yaw rotations.
    Layer,
}

impl Packer for PackerKind {
    fn pack(&self, container: &Container, items: Vec<PackingItem>) -> PackingResult {
        match self {
            PackerKind::FreeSpace => FreeSpacePacker.pack(container, items),
            PackerKind::Shelf => ShelfPacker.pack(container, items),
            PackerKind::Layer => LayerPacker.pack(container, items),
        }
    }
}
