//! Turns a stream of NMEA sentences into published [`GpsFix`] snapshots.
//!
//! The feed runs on its own thread and is the only writer to the shared
//! tracker. A snapshot is built from the accumulated parser state after each
//! sentence that parses cleanly and is published under a single lock, so the
//! control loop never sees half of an update.

use std::io::{self, BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use nmea::Nmea;
use nmea::sentences::FixType;
use rppal::uart::{Parity, Uart};
use tracing::{debug, error, info, warn};

use crate::config::GPS_BAUD_RATE;
use crate::gps_tracker::{GpsFix, SharedTracker};
use crate::position::Position;

/// Counters from one run of [`feed_lines`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FeedStats {
    pub sentences: usize,
    pub parse_errors: usize,
}

/// Snapshot of everything the parser has accumulated so far.
pub fn fix_from_nmea(nmea: &Nmea) -> GpsFix {
    let position = match (nmea.latitude, nmea.longitude) {
        (Some(lat), Some(lon)) => Some(Position::new(lat, lon)),
        _ => None,
    };
    let has_fix = position.is_some() && !matches!(nmea.fix_type, Some(FixType::Invalid));

    GpsFix {
        has_fix,
        position,
        satellites: nmea.num_of_fix_satellites.map(|n| n as u32),
        speed_knots: nmea.speed_over_ground.map(f64::from),
        course_over_ground: nmea.true_course.map(f64::from),
        fix_time: nmea.fix_time,
    }
}

/// Read NMEA lines until EOF, publishing a fresh fix after every sentence
/// the parser accepts. `on_fix` runs after each publish, outside the lock.
pub fn feed_lines_with<R, F>(
    reader: R,
    tracker: &SharedTracker,
    mut on_fix: F,
) -> io::Result<FeedStats>
where
    R: BufRead,
    F: FnMut(&GpsFix),
{
    let mut nmea = Nmea::default();
    let mut stats = FeedStats::default();

    for line in reader.lines() {
        let content = match line {
            Ok(content) => content,
            // Serial noise can produce bytes that are not UTF-8.
            Err(e) if e.kind() == io::ErrorKind::InvalidData => {
                stats.parse_errors += 1;
                continue;
            }
            Err(e) => return Err(e),
        };

        let trimmed = content.trim();
        if trimmed.is_empty() {
            continue;
        }

        match nmea.parse(trimmed) {
            Ok(sentence) => {
                stats.sentences += 1;
                let fix = fix_from_nmea(&nmea);

                match tracker.lock() {
                    Ok(mut tracker) => tracker.publish(fix),
                    Err(_) => {
                        return Err(io::Error::other("GPS tracker lock poisoned"));
                    }
                }

                debug!(?sentence, has_fix = fix.has_fix, "NMEA sentence parsed");
                on_fix(&fix);
            }
            Err(e) => {
                stats.parse_errors += 1;
                debug!(sentence = trimmed, error = %e, "NMEA parse error");
            }
        }
    }

    Ok(stats)
}

pub fn feed_lines<R: BufRead>(reader: R, tracker: &SharedTracker) -> io::Result<FeedStats> {
    feed_lines_with(reader, tracker, |_| {})
}

/// Blocking byte reader over the Pi's UART.
pub struct UartReader {
    uart: Uart,
}

impl UartReader {
    pub fn open(path: impl AsRef<Path>, baud_rate: u32) -> rppal::uart::Result<Self> {
        let mut uart = Uart::with_path(path, baud_rate, Parity::None, 8, 1)?;
        // Block until at least one byte is available.
        uart.set_read_mode(1, Duration::ZERO)?;
        Ok(Self { uart })
    }
}

impl Read for UartReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.uart.read(buf).map_err(io::Error::other)
    }
}

/// Start reading the GPS on a background thread. The thread exits only if
/// the device fails.
pub fn spawn_feed(device: impl Into<PathBuf>, tracker: SharedTracker) -> JoinHandle<()> {
    let device = device.into();

    thread::spawn(move || {
        info!(device = %device.display(), baud = GPS_BAUD_RATE, "opening GPS");

        let reader = match UartReader::open(&device, GPS_BAUD_RATE) {
            Ok(reader) => BufReader::new(reader),
            Err(e) => {
                error!(device = %device.display(), error = %e, "failed to open GPS");
                return;
            }
        };

        match feed_lines(reader, &tracker) {
            Ok(stats) => warn!(?stats, "GPS stream ended"),
            Err(e) => error!(error = %e, "GPS read failed"),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gps_tracker::{GpsTracker, PositionSource};
    use std::sync::Arc;

    const GGA: &str = "$GPGGA,092750.000,5321.6802,N,00630.3372,W,1,8,1.03,61.7,M,55.2,M,,*76";
    const RMC: &str = "$GPRMC,092750.000,A,5321.6802,N,00630.3372,W,0.02,31.66,280511,,,A*43";
    const GGA_NO_FIX: &str = "$GPGGA,120004.000,,,,,0,0,,,M,,M,,*4F";
    const RMC_VOID: &str =
        "$GPRMC,092751.000,V,5321.6802,N,00630.3372,W,0.02,31.66,280511,,,N*5A";

    #[test]
    fn test_gga_publishes_fix() {
        let tracker = GpsTracker::shared();
        let stats = feed_lines(GGA.as_bytes(), &tracker).unwrap();

        assert_eq!(stats.sentences, 1);
        assert_eq!(stats.parse_errors, 0);

        let tracker = tracker.lock().unwrap();
        let fix = tracker.latest();
        assert!(fix.has_fix);
        assert_eq!(fix.satellites, Some(8));

        let position = fix.position.unwrap();
        assert!((position.latitude - 53.361336).abs() < 1e-5);
        assert!((position.longitude - -6.505620).abs() < 1e-5);
    }

    #[test]
    fn test_rmc_adds_speed_and_course() {
        let tracker = GpsTracker::shared();
        let input = format!("{GGA}\n{RMC}\n");
        feed_lines(input.as_bytes(), &tracker).unwrap();

        let fix = tracker.lock().unwrap().latest();
        assert!(fix.has_fix);
        assert!((fix.course_over_ground.unwrap() - 31.66).abs() < 1e-3);
        assert!((fix.speed_knots.unwrap() - 0.02).abs() < 1e-3);
    }

    #[test]
    fn test_lost_fix_is_published() {
        let tracker = GpsTracker::shared();
        let input = format!("{GGA}\n{GGA_NO_FIX}\n");
        feed_lines(input.as_bytes(), &tracker).unwrap();

        assert!(!tracker.sample().has_fix);
        assert_eq!(tracker.lock().unwrap().updates(), 2);
    }

    #[test]
    fn test_void_rmc_drops_fix() {
        let tracker = GpsTracker::shared();

        let void = format!("{GGA}\n{RMC_VOID}\n");
        feed_lines(void.as_bytes(), &tracker).unwrap();
        assert!(!tracker.sample().has_fix);
        assert!(tracker.lock().unwrap().current_position().is_none());

        // The next good GGA in the same stream brings the fix back.
        let mut seen = Vec::new();
        let input = format!("{GGA}\n{RMC_VOID}\n{GGA}\n");
        feed_lines_with(input.as_bytes(), &tracker, |fix| seen.push(fix.has_fix)).unwrap();
        assert_eq!(seen, vec![true, false, true]);
    }

    #[test]
    fn test_feed_thread_ends_when_device_is_missing() {
        let tracker = GpsTracker::shared();
        let feed = spawn_feed("/nonexistent/gps-serial", Arc::clone(&tracker));

        feed.join().unwrap();
        assert_eq!(tracker.lock().unwrap().updates(), 0);
    }

    #[test]
    fn test_garbage_is_counted_and_skipped() {
        let tracker = GpsTracker::shared();
        let input = format!("not nmea\n\n$GPGGA,bad*00\n{GGA}\n");
        let stats = feed_lines(input.as_bytes(), &tracker).unwrap();

        assert_eq!(stats.sentences, 1);
        assert_eq!(stats.parse_errors, 2);
        assert!(tracker.sample().has_fix);
    }

    #[test]
    fn test_callback_sees_each_fix() {
        let tracker = GpsTracker::shared();
        let input = format!("{GGA}\n{GGA_NO_FIX}\n{GGA}\n");

        let mut seen = Vec::new();
        feed_lines_with(input.as_bytes(), &tracker, |fix| seen.push(fix.has_fix)).unwrap();

        assert_eq!(seen, vec![true, false, true]);
    }
}
