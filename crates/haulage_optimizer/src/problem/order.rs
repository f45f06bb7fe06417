use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{
    define_index_newtype,
    problem::{
        item::{Dimensions, Item},
        zone::{Zone, ZoneResolver},
    },
};

define_index_newtype!(OrderIdx, Order);

/// How many helpers besides the driver the delivery needs.
#[derive(
    Serialize, Deserialize, JsonSchema, Debug, Clone, Copy, PartialEq, Eq, Hash, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum HelperRequirement {
    #[default]
    None,
    One,
    Two,
}

impl HelperRequirement {
    pub fn count(self) -> usize {
        match self {
            HelperRequirement::None => 0,
            HelperRequirement::One => 1,
            HelperRequirement::Two => 2,
        }
    }
}

#[derive(Serialize, Debug, Clone)]
pub struct Order {
    id: String,
    zone: Zone,
    zipcode: String,
    coordinates: Option<geo::Point>,
    helpers: HelperRequirement,
    items: Vec<Item>,

    total_weight: f64,
    total_volume: f64,
    max_dimensions: Dimensions,
    unit_count: usize,
}

impl Order {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn zone(&self) -> Zone {
        self.zone
    }

    pub fn zipcode(&self) -> &str {
        &self.zipcode
    }

    pub fn coordinates(&self) -> Option<geo::Point> {
        self.coordinates
    }

    pub fn helpers(&self) -> HelperRequirement {
        self.helpers
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn total_weight(&self) -> f64 {
        self.total_weight
    }

    pub fn total_volume(&self) -> f64 {
        self.total_volume
    }

    /// Largest length, width and height over all items of the order.
    pub fn max_dimensions(&self) -> &Dimensions {
        &self.max_dimensions
    }

    /// Number of physical units once quantities are expanded.
    pub fn unit_count(&self) -> usize {
        self.unit_count
    }
}

#[derive(Default)]
pub struct OrderBuilder {
    id: Option<String>,
    zone: Option<Zone>,
    zipcode: Option<String>,
    coordinates: Option<geo::Point>,
    helpers: Option<HelperRequirement>,
    items: Vec<Item>,
}

impl OrderBuilder {
    pub fn set_id(&mut self, id: impl Into<String>) -> &mut OrderBuilder {
        self.id = Some(id.into());
        self
    }

    pub fn set_zone(&mut self, zone: Zone) -> &mut OrderBuilder {
        self.zone = Some(zone);
        self
    }

    pub fn set_zipcode(&mut self, zipcode: impl Into<String>) -> &mut OrderBuilder {
        self.zipcode = Some(zipcode.into());
        self
    }

    /// Longitude/latitude of the delivery address.
    pub fn set_coordinates(&mut self, lon: f64, lat: f64) -> &mut OrderBuilder {
        self.coordinates = Some(geo::Point::new(lon, lat));
        self
    }

    pub fn set_helpers(&mut self, helpers: HelperRequirement) -> &mut OrderBuilder {
        self.helpers = Some(helpers);
        self
    }

    pub fn add_item(&mut self, item: Item) -> &mut OrderBuilder {
        self.items.push(item);
        self
    }

    pub fn set_items(&mut self, items: Vec<Item>) -> &mut OrderBuilder {
        self.items = items;
        self
    }

    /// Builds the order, deriving the zone from the zipcode when none was given.
    pub fn build(self, resolver: &ZoneResolver) -> Order {
        let zipcode = self.zipcode.unwrap_or_default();
        let zone = self.zone.unwrap_or_else(|| resolver.resolve(&zipcode));

        let total_weight = self.items.iter().map(Item::total_weight).sum();
        let total_volume = self.items.iter().map(Item::total_volume).sum();
        let unit_count = self.items.iter().map(Item::quantity).sum();
        let max_dimensions = self
            .items
            .iter()
            .filter(|item| item.quantity() > 0)
            .fold(Dimensions::default(), |max, item| {
                max.max(item.dimensions())
            });

        Order {
            id: self.id.expect("Order ID is required"),
            zone,
            zipcode,
            coordinates: self.coordinates,
            helpers: self.helpers.unwrap_or_default(),
            items: self.items,
            total_weight,
            total_volume,
            max_dimensions,
            unit_count,
        }
    }
}
