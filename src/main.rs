mod config;
mod logfile;
mod sched;

#[cfg(any(target_os = "linux", target_os = "android"))]
fn main() -> eyre::Result<()> {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    use eyre::{eyre, WrapErr};
    use linux_embedded_hal::I2cdev;
    use mlx90614::Mlx90614;

    use crate::config::Config;
    use crate::logfile::DayLog;
    use crate::sched::{Clock, SystemClock};

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::new();

    let shutdown = Arc::new(AtomicBool::new(false));
    {
        let shutdown = Arc::clone(&shutdown);
        ctrlc::set_handler(move || shutdown.store(true, Ordering::Relaxed))
            .wrap_err("failed to install termination handler")?;
    }

    // Any failure before the loop is fatal; an unattended logger that cannot
    // reach its sensor or its log directory has nothing to do.
    let i2c = I2cdev::new(config.bus_path)
        .wrap_err_with(|| format!("failed to open I2C bus {}", config.bus_path))?;
    let mut sensor = Mlx90614::new(i2c, config.address);
    sensor
        .reaffirm_address()
        .map_err(|e| eyre!("sensor at 0x{:02x} is not responding: {:?}", config.address, e))?;

    let clock = SystemClock;
    let mut log = DayLog::open_for(config.log_dir, clock.now().date())
        .wrap_err("failed to open today's log file")?;

    sched::run(&mut sensor, &mut log, &clock, &shutdown)?;

    // Flushed rows and a closed handle are all the shutdown contract asks for.
    drop(log);
    let _i2c = sensor.free();
    log::info!("exited cleanly");

    Ok(())
}

#[cfg(not(any(target_os = "linux", target_os = "android")))]
fn main() {
    eprintln!("ir-logger requires a Linux host with an I2C adapter");
    std::process::exit(1);
}
