use comfy_table::Table;
use haulage_optimizer::optimizer::{OptimizationResult, TruckLoadPreview};

pub fn fleet_table(result: &OptimizationResult) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        "Truck", "Trip", "Orders", "Zones", "Weight (kg)", "Volume %", "Weight %", "Duration",
        "Balanced",
    ]);

    for truck in &result.trucks {
        for trip in &truck.trips {
            let zones = trip
                .zones
                .iter()
                .map(|zone| zone.to_string())
                .collect::<Vec<_>>()
                .join(", ");

            table.add_row(vec![
                truck.truck_id.clone(),
                trip.number.to_string(),
                trip.order_ids.len().to_string(),
                zones,
                format!("{:.1}", trip.weight),
                format!("{:.1}", trip.volume_utilization),
                format!("{:.1}", trip.weight_utilization),
                format!("{:#}", trip.duration),
                trip.load_plan.is_balanced.to_string(),
            ]);
        }
    }

    let summary = &result.summary;
    table.add_row(vec![
        "Fleet".to_owned(),
        summary.total_trips.to_string(),
        format!("{}/{}", summary.assigned_orders, summary.total_orders),
        format!("{:.1}% assigned", summary.assignment_rate),
        format!("{:.1}", summary.total_weight),
        String::new(),
        String::new(),
        format!("{:#}", summary.fleet_duration),
        summary.bottleneck_truck.clone().unwrap_or_default(),
    ]);

    table
}

pub fn unassigned_table(result: &OptimizationResult) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Unassigned order", "Zone", "Reason"]);

    for order in &result.unassigned_orders {
        table.add_row(vec![
            order.order_id.clone(),
            order.zone.to_string(),
            order.reason.clone(),
        ]);
    }

    table
}

pub fn preview_table(preview: &TruckLoadPreview) -> Table {
    let cog = &preview.center_of_gravity;
    let packing = &preview.packing;

    let mut table = Table::new();
    table.set_header(vec!["Truck", preview.truck_id.as_str()]);
    table.add_row(vec!["Packed".to_owned(), packing.placed.len().to_string()]);
    table.add_row(vec!["Unpacked".to_owned(), packing.unpacked.len().to_string()]);
    table.add_row(vec!["Weight (kg)".to_owned(), format!("{:.1}", packing.total_weight)]);
    table.add_row(vec![
        "Volume %".to_owned(),
        format!("{:.1}", packing.volume_utilization),
    ]);
    table.add_row(vec![
        "Weight %".to_owned(),
        format!("{:.1}", packing.weight_utilization),
    ]);
    table.add_row(vec![
        "Center of gravity".to_owned(),
        format!("({:.1}, {:.1}, {:.1})", cog.x, cog.y, cog.z),
    ]);
    table.add_row(vec!["Balanced".to_owned(), preview.is_balanced.to_string()]);

    table
}
