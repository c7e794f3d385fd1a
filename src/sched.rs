use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use chrono::{Local, NaiveDateTime, Timelike};
use embedded_hal::i2c::I2c;
use mlx90614::Mlx90614;

use crate::logfile::{DayLog, LogError};

/// Wall-clock source for the polling loop. The indirection exists so the
/// midnight-rotation path can be driven by tests without waiting a day.
pub trait Clock {
    fn now(&self) -> NaiveDateTime;
    fn sleep(&self, d: Duration);
}

/// Local time as the host sees it; sleeps on the current thread.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }

    fn sleep(&self, d: Duration) {
        std::thread::sleep(d);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Starting,
    Polling,
    Rotating,
    Shutdown,
}

/// Upper bound on one sleep slice, so a termination signal interrupts the
/// minute wait promptly instead of after up to a minute.
const SLEEP_SLICE: Duration = Duration::from_millis(250);

/// The instant the wall clock next reads second zero of a fresh minute.
/// Plain arithmetic, so minute 59 carries into the next hour (and 23:59
/// into the next day) without special cases.
fn next_minute(now: NaiveDateTime) -> NaiveDateTime {
    now + chrono::Duration::minutes(1)
        - chrono::Duration::seconds(i64::from(now.second()))
        - chrono::Duration::nanoseconds(i64::from(now.nanosecond()))
}

/// Sleep in slices until the clock reaches the next minute boundary or a
/// shutdown is requested. Re-reads the clock after every slice, so drift or
/// oversleeping shifts the return instant but never returns early.
fn wait_for_minute_boundary<C: Clock>(clock: &C, shutdown: &AtomicBool) {
    let target = next_minute(clock.now());

    while !shutdown.load(Ordering::Relaxed) {
        let now = clock.now();
        if now >= target {
            break;
        }
        let remaining = (target - now).to_std().unwrap_or(Duration::ZERO);
        clock.sleep(remaining.min(SLEEP_SLICE));
    }
}

/** Drive the polling loop until shutdown is requested.

Each cycle reads the ambient register, appends the reading to `log`, then
sleeps to the next minute boundary. A cycle whose timestamp falls on a later
date than the open file rotates first, so every row lands in the file named
after its own date. Sensor failures skip the cycle and keep polling; log I/O
failures (after the append-level retry) are fatal. */
pub fn run<T, C>(
    sensor: &mut Mlx90614<T>,
    log: &mut DayLog,
    clock: &C,
    shutdown: &AtomicBool,
) -> Result<(), LogError>
where
    T: I2c,
    C: Clock,
{
    let mut state = State::Starting;
    let mut skipped: u64 = 0;

    loop {
        if shutdown.load(Ordering::Relaxed) {
            state = State::Shutdown;
        }

        match state {
            State::Starting => {
                // Bus and log file were opened by the caller before entry.
                log::info!("polling every minute, logging to {}", log.path().display());
                state = State::Polling;
            }
            State::Polling => {
                let stamp = clock.now();

                if stamp.date() != log.date() {
                    state = State::Rotating;
                    continue;
                }

                match sensor.reaffirm_address().and_then(|_| sensor.ambient()) {
                    Ok(temp) => {
                        log.append(stamp.time(), temp)?;
                        log::debug!("{} C at {}", temp, stamp.time());
                    }
                    Err(e) => {
                        skipped += 1;
                        log::warn!(
                            "sensor read failed ({:?}), skipping cycle ({} skipped so far)",
                            e,
                            skipped
                        );
                    }
                }

                wait_for_minute_boundary(clock, shutdown);
            }
            State::Rotating => {
                log.rotate(clock.now().date())?;
                log::info!("day boundary, rotated to {}", log.path().display());
                state = State::Polling;
            }
            State::Shutdown => {
                log::info!("shutdown requested, {} cycles skipped in total", skipped);
                return Ok(());
            }
        }
    }
}
