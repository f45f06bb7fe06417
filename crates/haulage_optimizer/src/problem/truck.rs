use std::cmp::Ordering;

use serde::Serialize;

use crate::{define_index_newtype, problem::item::Dimensions};

define_index_newtype!(TruckIdx, Truck);

/// One physical vehicle. Its cargo space spans `width` along x, `depth` along y
/// (the door is at `y = depth`) and `height` along z, all in centimeters.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Truck {
    id: String,
    width: f64,
    depth: f64,
    height: f64,
    max_weight: f64,
}

impl Truck {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn depth(&self) -> f64 {
        self.depth
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn max_weight(&self) -> f64 {
        self.max_weight
    }

    pub fn volume(&self) -> f64 {
        self.width * self.depth * self.height
    }

    /// Cargo space as item-style dimensions (length along x).
    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.width, self.depth, self.height)
    }

    /// Orders trucks by descending capacity: volume, then max weight, then id.
    pub fn cmp_capacity_desc(&self, other: &Truck) -> Ordering {
        other
            .volume()
            .total_cmp(&self.volume())
            .then_with(|| other.max_weight.total_cmp(&self.max_weight))
            .then_with(|| self.id.cmp(&other.id))
    }

    /// Returns a reason when the truck cannot carry anything.
    pub fn validate(&self) -> Result<(), String> {
        let measures = [
            ("width", self.width),
            ("depth", self.depth),
            ("height", self.height),
            ("max_weight", self.max_weight),
        ];

        for (name, value) in measures {
            if !value.is_finite() || value <= 0.0 {
                return Err(format!("{name} must be positive, got {value}"));
            }
        }

        Ok(())
    }
}

#[derive(Default)]
pub struct TruckBuilder {
    id: Option<String>,
    width: Option<f64>,
    depth: Option<f64>,
    height: Option<f64>,
    max_weight: Option<f64>,
}

impl TruckBuilder {
    pub fn set_id(&mut self, id: impl Into<String>) -> &mut TruckBuilder {
        self.id = Some(id.into());
        self
    }

    pub fn set_dimensions(&mut self, width: f64, depth: f64, height: f64) -> &mut TruckBuilder {
        self.width = Some(width);
        self.depth = Some(depth);
        self.height = Some(height);
        self
    }

    pub fn set_max_weight(&mut self, max_weight: f64) -> &mut TruckBuilder {
        self.max_weight = Some(max_weight);
        self
    }

    pub fn build(self) -> Truck {
        Truck {
            id: self.id.expect("Truck ID is required"),
            width: self.width.unwrap_or(0.0),
            depth: self.depth.unwrap_or(0.0),
            height: self.height.unwrap_or(0.0),
            max_weight: self.max_weight.unwrap_or(0.0),
        }
    }
}
