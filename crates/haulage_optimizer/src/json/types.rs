use jiff::SignedDuration;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::{
    error::PlannerError,
    packing::packer::PackerKind,
    params::{PlannerParams, PlanningStrategy},
    problem::{
        item::{Item, ItemBuilder},
        order::{HelperRequirement, Order, OrderBuilder},
        planning_problem::{PlanningProblem, PlanningProblemBuilder},
        truck::{Truck, TruckBuilder},
        zone::{Zone, ZoneResolver},
    },
};

#[derive(Serialize, Deserialize, JsonSchema)]
#[serde(rename = "PlanningInput")]
pub struct JsonPlanningInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub orders: Vec<JsonOrder>,
    pub trucks: Vec<JsonTruck>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<JsonPlannerParams>,
}

#[derive(Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields, rename = "Order")]
pub struct JsonOrder {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zone: Option<Zone>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zipcode: Option<String>,
    /// `[longitude, latitude]`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<[f64; 2]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub helpers: Option<HelperRequirement>,
    pub items: Vec<JsonItem>,
}

impl From<&Order> for JsonOrder {
    fn from(value: &Order) -> Self {
        JsonOrder {
            id: value.id().to_owned(),
            zone: Some(value.zone()),
            zipcode: Some(value.zipcode().to_owned()),
            coordinates: value.coordinates().map(|point| [point.x(), point.y()]),
            helpers: Some(value.helpers()),
            items: value.items().iter().map(JsonItem::from).collect(),
        }
    }
}

/// Dimensions in centimeters, weight in kilograms. Missing values fall back to
/// a 30 cm cube of 5 kg.
#[derive(Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields, rename = "Item")]
pub struct JsonItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub length: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub weight: Option<f64>,
    pub quantity: Option<usize>,
}

impl From<&Item> for JsonItem {
    fn from(value: &Item) -> Self {
        let dimensions = value.dimensions();
        JsonItem {
            id: (!value.id().is_empty()).then(|| value.id().to_owned()),
            length: Some(dimensions.length),
            width: Some(dimensions.width),
            height: Some(dimensions.height),
            weight: Some(value.weight()),
            quantity: Some(value.quantity()),
        }
    }
}

impl From<JsonItem> for Item {
    fn from(value: JsonItem) -> Self {
        let mut builder = ItemBuilder::default();

        if let Some(id) = value.id {
            builder.set_id(id);
        }

        if let Some(length) = value.length {
            builder.set_length(length);
        }

        if let Some(width) = value.width {
            builder.set_width(width);
        }

        if let Some(height) = value.height {
            builder.set_height(height);
        }

        if let Some(weight) = value.weight {
            builder.set_weight(weight);
        }

        if let Some(quantity) = value.quantity {
            builder.set_quantity(quantity);
        }

        builder.build()
    }
}

#[derive(Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields, rename = "Truck")]
pub struct JsonTruck {
    pub id: String,
    pub width: f64,
    pub depth: f64,
    pub height: f64,
    pub max_weight: f64,
}

impl From<&Truck> for JsonTruck {
    fn from(value: &Truck) -> Self {
        JsonTruck {
            id: value.id().to_owned(),
            width: value.width(),
            depth: value.depth(),
            height: value.height(),
            max_weight: value.max_weight(),
        }
    }
}

impl From<JsonTruck> for Truck {
    fn from(value: JsonTruck) -> Self {
        let mut builder = TruckBuilder::default();
        builder
            .set_id(value.id)
            .set_dimensions(value.width, value.depth, value.height)
            .set_max_weight(value.max_weight);
        builder.build()
    }
}

#[derive(Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields, rename = "ZonePrefix")]
pub struct JsonZonePrefix {
    pub prefix: String,
    pub zone: Zone,
}

/// Overrides of the default planner parameters.
#[derive(Serialize, Deserialize, JsonSchema, Default)]
#[serde(deny_unknown_fields, rename = "PlannerParams")]
pub struct JsonPlannerParams {
    pub strategy: Option<PlanningStrategy>,
    pub available_helpers: Option<usize>,
    pub reload_duration: Option<SignedDuration>,
    pub service_duration: Option<SignedDuration>,
    pub heavy_service_duration: Option<SignedDuration>,
    /// Orders heavier than this (kg) get the heavy service duration.
    pub heavy_order_weight: Option<f64>,
    pub balance_tolerance: Option<f64>,
    pub preview_packer: Option<PackerKind>,
    /// Replaces the default postal code table when present.
    pub zone_prefixes: Option<Vec<JsonZonePrefix>>,
}

impl JsonPlannerParams {
    pub fn apply(self, params: &mut PlannerParams) {
        if let Some(strategy) = self.strategy {
            params.strategy = strategy;
        }

        if let Some(available_helpers) = self.available_helpers {
            params.available_helpers = available_helpers;
        }

        if let Some(reload_duration) = self.reload_duration {
            params.travel.reload_duration = reload_duration;
        }

        if let Some(service_duration) = self.service_duration {
            params.travel.service_duration = service_duration;
        }

        if let Some(heavy_service_duration) = self.heavy_service_duration {
            params.travel.heavy_service_duration = heavy_service_duration;
        }

        if let Some(heavy_order_weight) = self.heavy_order_weight {
            params.travel.heavy_order_weight = heavy_order_weight;
        }

        if let Some(balance_tolerance) = self.balance_tolerance {
            params.balance_tolerance = balance_tolerance;
        }

        if let Some(preview_packer) = self.preview_packer {
            params.preview_packer = preview_packer;
        }

        if let Some(zone_prefixes) = self.zone_prefixes {
            params.zone_resolver = ZoneResolver::new(
                zone_prefixes
                    .into_iter()
                    .map(|entry| (entry.prefix, entry.zone))
                    .collect(),
                params.zone_resolver.fallback(),
            );
        }
    }
}

impl JsonPlanningInput {
    pub fn from_problem(problem: &PlanningProblem) -> Self {
        JsonPlanningInput {
            id: problem.id().map(str::to_owned),
            orders: problem.orders().iter().map(JsonOrder::from).collect(),
            trucks: problem.trucks().iter().map(JsonTruck::from).collect(),
            params: None,
        }
    }

    /// Builds a problem on top of `params`, applying the input's own overrides.
    #[instrument(skip_all, level = "debug")]
    pub fn build_problem(self, mut params: PlannerParams) -> Result<PlanningProblem, PlannerError> {
        if let Some(overrides) = self.params {
            overrides.apply(&mut params);
        }

        let mut builder = PlanningProblemBuilder::default();

        if let Some(id) = self.id {
            builder.set_id(id);
        }

        let orders = self
            .orders
            .into_iter()
            .map(|order| {
                let mut builder = OrderBuilder::default();

                builder.set_id(order.id);

                if let Some(zone) = order.zone {
                    builder.set_zone(zone);
                }

                if let Some(zipcode) = order.zipcode {
                    builder.set_zipcode(zipcode);
                }

                if let Some([lon, lat]) = order.coordinates {
                    builder.set_coordinates(lon, lat);
                }

                if let Some(helpers) = order.helpers {
                    builder.set_helpers(helpers);
                }

                builder.set_items(order.items.into_iter().map(Item::from).collect());
                builder.build(&params.zone_resolver)
            })
            .collect();

        builder
            .set_orders(orders)
            .set_trucks(self.trucks.into_iter().map(Truck::from).collect())
            .set_params(params);

        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INPUT: &str = r#"{
        "id": "monday",
        "orders": [
            {
                "id": "o-1",
                "zipcode": "2100",
                "coordinates": [4.4, 51.2],
                "helpers": "two",
                "items": [
                    { "length": 40, "width": 30, "height": 20, "weight": 12, "quantity": 2 },
                    {}
                ]
            },
            { "id": "o-2", "zone": "west", "items": [] }
        ],
        "trucks": [
            { "id": "t-1", "width": 220, "depth": 400, "height": 220, "max_weight": 1500 }
        ],
        "params": {
            "strategy": "cluster_single_trip",
            "available_helpers": 2,
            "reload_duration": "PT45M"
        }
    }"#;

    #[test]
    fn test_build_problem() {
        let input: JsonPlanningInput = serde_json::from_str(INPUT).unwrap();
        let problem = input.build_problem(PlannerParams::default()).unwrap();

        assert_eq!(problem.id(), Some("monday"));
        assert_eq!(problem.params().strategy, PlanningStrategy::ClusterSingleTrip);
        assert_eq!(problem.params().available_helpers, 2);
        assert_eq!(
            problem.params().travel.reload_duration,
            SignedDuration::from_mins(45)
        );

        let order = &problem.orders()[0];
        assert_eq!(order.zone(), Zone::East);
        assert_eq!(order.helpers(), HelperRequirement::Two);
        assert_eq!(order.unit_count(), 3);
        assert_eq!(order.total_weight(), 12.0 * 2.0 + 5.0);
        assert_eq!(order.coordinates().map(|point| point.x()), Some(4.4));

        assert_eq!(problem.orders()[1].zone(), Zone::West);
        assert_eq!(problem.trucks()[0].max_weight(), 1500.0);
    }

    #[test]
    fn test_rejects_unknown_fields() {
        let input = r#"{ "id": "o", "items": [], "weight": 3 }"#;

        assert!(serde_json::from_str::<JsonOrder>(input).is_err());
    }

    #[test]
    fn test_invalid_truck_is_reported() {
        let input = r#"{
            "orders": [{ "id": "o", "items": [] }],
            "trucks": [{ "id": "t", "width": 0, "depth": 1, "height": 1, "max_weight": 1 }]
        }"#;
        let input: JsonPlanningInput = serde_json::from_str(input).unwrap();

        assert!(matches!(
            input.build_problem(PlannerParams::default()),
            Err(PlannerError::InvalidTruck { .. })
        ));
    }
}
