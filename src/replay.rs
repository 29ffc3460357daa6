use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use clap::Parser;
use tracing::info;

use transat_nav::compass::Direction;
use transat_nav::config::{DEFAULT_COURSE_DEG, WAYPOINT_RADIUS_KM};
use transat_nav::logging::init_logging;
use transat_nav::gps_tracker::latest_fix;
use transat_nav::nmea_feed::feed_lines_with;
use transat_nav::{GpsTracker, Navigator, WaypointStore};

/// Bench-test a waypoint plan against a recorded NMEA log.
#[derive(Parser)]
#[command(name = "replay")]
struct Args {
    /// Recorded NMEA sentences, one per line
    nmea_log: PathBuf,

    /// Waypoint plan: JSON array of {"latitude": .., "longitude": ..}
    #[arg(long)]
    plan: PathBuf,

    #[arg(long, default_value_t = WAYPOINT_RADIUS_KM)]
    radius_km: f64,

    #[arg(long, default_value_t = DEFAULT_COURSE_DEG)]
    initial_course: f64,

    /// Report the point this far ahead on the final course (km)
    #[arg(long, default_value_t = 1.0)]
    lookahead_km: f64,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_logging("warn");

    let plan = WaypointStore::load(&args.plan)?;
    let mut navigator = Navigator::with_radius(&plan, args.initial_course, args.radius_km)?;
    let tracker = GpsTracker::shared();

    println!(
        "{:^6} | {:^24} | {:^12} | {:^8} | {:^12}",
        "Fix", "Position", "Course", "Waypoint", "Distance"
    );
    println!("{:-<6}-+-{:-<24}-+-{:-<12}-+-{:-<8}-+-{:-<12}", "", "", "", "", "");

    let mut count = 0;
    let reader = BufReader::new(File::open(&args.nmea_log)?);
    let stats = feed_lines_with(reader, &tracker, |fix| {
        count += 1;
        let course = navigator.update(fix.sample());

        let position = match fix.position.filter(|_| fix.has_fix) {
            Some(position) => position.to_string(),
            None => "no fix".to_string(),
        };
        let distance = match navigator.last_distance_km() {
            Some(km) => format!("{:.2} km", km),
            None => "-".to_string(),
        };

        println!(
            "{:>6} | {:^24} | {:>6.1}° {:<3} | {:^8} | {:>12}",
            count,
            position,
            course,
            Direction::from_course_8point(course).abbreviation(),
            navigator.active_index() + 1,
            distance
        );
    })?;

    let last = latest_fix(&tracker);

    println!();
    println!("{}", navigator.diagnostic().with_fix(last));
    if let Some(position) = last.sample().position() {
        let ahead = position.project(navigator.current_course(), args.lookahead_km);
        println!("{:.2} km ahead on course: {}", args.lookahead_km, ahead);
    }
    info!(?stats, "replay finished");

    Ok(())
}
