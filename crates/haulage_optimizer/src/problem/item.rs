use serde::Serialize;

/// Length/width/height used when an item has no usable dimension.
pub const DEFAULT_ITEM_DIMENSION_CM: f64 = 30.0;

/// Weight used when an item has no usable weight.
pub const DEFAULT_ITEM_WEIGHT_KG: f64 = 5.0;

/// Axis-aligned extent of a box, in centimeters.
///
/// `length` runs along the container's x axis, `width` along y and `height` along z.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct Dimensions {
    pub length: f64,
    pub width: f64,
    pub height: f64,
}

impl Dimensions {
    pub const fn new(length: f64, width: f64, height: f64) -> Self {
        Self {
            length,
            width,
            height,
        }
    }

    pub fn volume(&self) -> f64 {
        self.length * self.width * self.height
    }

    /// The three extents, largest first.
    pub fn sorted_desc(&self) -> [f64; 3] {
        let mut extents = [self.length, self.width, self.height];
        extents.sort_unstable_by(|a, b| b.total_cmp(a));
        extents
    }

    /// Whether a box of these dimensions could fit into `other` under some
    /// axis permutation. Necessary but not sufficient for an actual packing.
    pub fn fits_within(&self, other: &Dimensions) -> bool {
        self.sorted_desc()
            .iter()
            .zip(other.sorted_desc().iter())
            .all(|(mine, theirs)| mine <= theirs)
    }

    /// Component-wise maximum.
    pub fn max(&self, other: &Dimensions) -> Dimensions {
        Dimensions {
            length: self.length.max(other.length),
            width: self.width.max(other.width),
            height: self.height.max(other.height),
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Item {
    id: String,
    dimensions: Dimensions,
    weight: f64,
    quantity: usize,
}

impl Item {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn dimensions(&self) -> &Dimensions {
        &self.dimensions
    }

    /// Weight of a single unit.
    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn quantity(&self) -> usize {
        self.quantity
    }

    /// Volume of a single unit.
    pub fn unit_volume(&self) -> f64 {
        self.dimensions.volume()
    }

    pub fn total_volume(&self) -> f64 {
        self.unit_volume() * self.quantity as f64
    }

    pub fn total_weight(&self) -> f64 {
        self.weight * self.quantity as f64
    }
}

fn positive_or(value: Option<f64>, default: f64) -> f64 {
    match value {
        Some(value) if value.is_finite() && value > 0.0 => value,
        _ => default,
    }
}

#[derive(Default)]
pub struct ItemBuilder {
    id: Option<String>,
    length: Option<f64>,
    width: Option<f64>,
    height: Option<f64>,
    weight: Option<f64>,
    quantity: Option<usize>,
}

impl ItemBuilder {
    pub fn set_id(&mut self, id: impl Into<String>) -> &mut ItemBuilder {
        self.id = Some(id.into());
        self
    }

    pub fn set_length(&mut self, length: f64) -> &mut ItemBuilder {
        self.length = Some(length);
        self
    }

    pub fn set_width(&mut self, width: f64) -> &mut ItemBuilder {
        self.width = Some(width);
        self
    }

    pub fn set_height(&mut self, height: f64) -> &mut ItemBuilder {
        self.height = Some(height);
        self
    }

    pub fn set_dimensions(&mut self, length: f64, width: f64, height: f64) -> &mut ItemBuilder {
        self.set_length(length).set_width(width).set_height(height)
    }

    pub fn set_weight(&mut self, weight: f64) -> &mut ItemBuilder {
        self.weight = Some(weight);
        self
    }

    pub fn set_quantity(&mut self, quantity: usize) -> &mut ItemBuilder {
        self.quantity = Some(quantity);
        self
    }

    /// Missing or non-positive measurements fall back to the defaults.
    pub fn build(self) -> Item {
        Item {
            id: self.id.unwrap_or_default(),
            dimensions: Dimensions {
                length: positive_or(self.length, DEFAULT_ITEM_DIMENSION_CM),
                width: positive_or(self.width, DEFAULT_ITEM_DIMENSION_CM),
                height: positive_or(self.height, DEFAULT_ITEM_DIMENSION_CM),
            },
            weight: positive_or(self.weight, DEFAULT_ITEM_WEIGHT_KG),
            quantity: self.quantity.unwrap_or(1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_measurements_use_defaults() {
        let mut builder = ItemBuilder::default();
        builder.set_id("box").set_length(50.0).set_weight(-1.0);
        let item = builder.build();

        assert_eq!(
            item.dimensions(),
            &Dimensions::new(50.0, DEFAULT_ITEM_DIMENSION_CM, DEFAULT_ITEM_DIMENSION_CM)
        );
        assert_eq!(item.weight(), DEFAULT_ITEM_WEIGHT_KG);
        assert_eq!(item.quantity(), 1);
    }

    #[test]
    fn test_totals_respect_quantity() {
        let mut builder = ItemBuilder::default();
        builder
            .set_dimensions(10.0, 20.0, 30.0)
            .set_weight(4.0)
            .set_quantity(3);
        let item = builder.build();

        assert_eq!(item.unit_volume(), 6000.0);
        assert_eq!(item.total_volume(), 18000.0);
        assert_eq!(item.total_weight(), 12.0);
    }

    #[test]
    fn test_fits_within_any_permutation() {
        let item = Dimensions::new(100.0, 20.0, 200.0);
        let truck = Dimensions::new(150.0, 250.0, 120.0);

        assert!(item.fits_within(&truck));
        assert!(!Dimensions::new(260.0, 10.0, 10.0).fits_within(&truck));
    }
}
