use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use slotwise::config::Config;
use slotwise::engine::{capacity_color, Calendar};
use slotwise::fixture;
use slotwise::model::StaffType;
use slotwise::notify::NotifyHub;
use slotwise::time::{date_key, format_time_12h};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = Config::from_env();
    let date = config
        .date
        .unwrap_or_else(|| chrono::Local::now().date_naive());
    info!("slotwise day agenda");
    info!("  fixture: {}", config.fixture.display());
    info!("  branch: {}", config.branch_id);
    info!("  date: {}", date_key(date));

    let directory = fixture::load(&config.fixture)?;
    let calendar = Calendar::new(directory, Arc::new(NotifyHub::new()));
    let agenda = calendar
        .day_agenda(&config.branch_id, date, config.slot_minutes)
        .await;

    println!("{} {}", agenda.branch_id, date_key(agenda.date));
    for staff in &agenda.staff {
        match staff.hours {
            Some(hours) => println!("\n{} ({hours})", staff.name),
            None => {
                println!("\n{} (off)", staff.name);
                continue;
            }
        }
        if let (Some(room), Some(hours)) = (&staff.room_id, staff.room_hours) {
            println!("  room: {room} ({hours})");
        }
        for b in &staff.bookings {
            println!(
                "  {} {} {}",
                b.span(),
                b.status.as_str(),
                b.service_name.as_deref().unwrap_or("-")
            );
        }
        if staff.staff_type == StaffType::Dynamic {
            let windows: Vec<String> = staff.free.iter().map(ToString::to_string).collect();
            println!("  free: {}", windows.join(", "));
        }
        println!("  open: {}", staff.open_slots.join(" "));
    }

    if !agenda.slots.is_empty() {
        println!("\nclasses");
    }
    for slot in &agenda.slots {
        println!(
            "  {} {} {}/{} ({})",
            format_time_12h(slot.window.start),
            slot.service_name,
            slot.occupied,
            slot.total,
            capacity_color(slot.remaining).as_str()
        );
    }

    Ok(())
}
