use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::Instant;

use clap::Parser;
use tracing::{error, info, warn};

use transat_nav::config::{
    CONTROL_INTERVAL, CRUISE_POWER, DEFAULT_COURSE_DEG, DIAGNOSTIC_INTERVAL, ESC_ARM_DELAY,
    GPS_DEVICE, WAYPOINT_RADIUS_KM,
};
use transat_nav::logging::init_logging;
use transat_nav::motor::{HeadingController, MotorPair};
use transat_nav::nmea_feed::spawn_feed;
use transat_nav::gps_tracker::latest_fix;
use transat_nav::{GpsFix, GpsTracker, Navigator, WaypointStore};

#[derive(Parser)]
#[command(name = "transat-nav")]
#[command(about = "Steer the vehicle through a waypoint plan", long_about = None)]
struct Args {
    /// Waypoint plan: JSON array of {"latitude": .., "longitude": ..}
    #[arg(long)]
    plan: PathBuf,

    /// Serial device the GPS receiver is attached to
    #[arg(long, default_value = GPS_DEVICE)]
    device: PathBuf,

    /// Distance at which a waypoint counts as reached (km)
    #[arg(long, default_value_t = WAYPOINT_RADIUS_KM)]
    radius_km: f64,

    /// Course to hold until the first GPS fix (degrees)
    #[arg(long, default_value_t = DEFAULT_COURSE_DEG)]
    initial_course: f64,

    /// Run navigation without driving the motors
    #[arg(long)]
    dry_run: bool,

    /// Log level used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,
}

// Usage:
//  Start: no fix yet, hold the initial course (due east by default)
//  → fix acquired: steer the great-circle course to waypoint 1
//  → inside the arrival radius: switch to the next waypoint
//  ● final waypoint: keep steering toward it
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_logging(&args.log_level);

    let plan = match WaypointStore::load(&args.plan) {
        Ok(plan) => plan,
        Err(e) => {
            error!(plan = %args.plan.display(), error = %e, "cannot load waypoint plan");
            return Err(e.into());
        }
    };
    info!(waypoints = plan.count(), radius_km = args.radius_km, "plan loaded");

    let mut navigator =
        match Navigator::with_radius(&plan, args.initial_course, args.radius_km) {
            Ok(navigator) => navigator,
            Err(e) => {
                error!(error = %e, "bad navigation settings");
                return Err(e.into());
            }
        };

    // The feed thread is the only writer; the control loop only reads.
    let tracker = GpsTracker::shared();
    let feed = spawn_feed(args.device.clone(), Arc::clone(&tracker));
    let mut feed_stopped = false;

    let mut motors = if args.dry_run {
        info!("dry run, motors disabled");
        None
    } else {
        let mut motors = MotorPair::open()?;
        motors.arm(ESC_ARM_DELAY)?;
        Some(motors)
    };

    let mut controller = HeadingController::new();
    let mut last_tick = Instant::now();
    let mut last_status = Instant::now();

    info!("control loop started");

    loop {
        if !feed_stopped && feed.is_finished() {
            warn!(device = %args.device.display(), "GPS feed stopped, holding last course");
            feed_stopped = true;
        }

        // One snapshot per cycle, so the course and the heading agree. Once
        // the feed is gone the last fix only gets staler.
        let fix = if feed_stopped {
            GpsFix::default()
        } else {
            latest_fix(&tracker)
        };
        let course = navigator.update(fix.sample());

        let now = Instant::now();
        let dt = now.duration_since(last_tick).as_secs_f64();
        last_tick = now;

        let heading = fix.course_over_ground.filter(|_| fix.has_fix);
        let turn = controller.correction(course, heading, dt);

        if let Some(motors) = motors.as_mut() {
            motors.drive(CRUISE_POWER, turn)?;
        }

        if last_status.elapsed() >= DIAGNOSTIC_INTERVAL {
            let diagnostic = navigator.diagnostic().with_fix(fix);
            if feed_stopped {
                warn!(turn, "{} (GPS feed down)", diagnostic);
            } else {
                info!(turn, "{}", diagnostic);
            }
            last_status = now;
        }

        thread::sleep(CONTROL_INTERVAL);
    }
}
