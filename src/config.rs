/// Fixed deployment constants, built once in `main` and handed to the pieces
/// that need them. There is deliberately no CLI, environment, or file input
/// behind these; the deployment is a single sensor on a known bus.
pub struct Config {
    /// I2C character device the sensor hangs off.
    pub bus_path: &'static str,
    /// 7-bit sensor address.
    pub address: u8,
    /// Directory the dated CSV files are written into.
    pub log_dir: &'static str,
}

impl Config {
    pub const fn new() -> Self {
        Config {
            bus_path: "/dev/i2c-1",
            address: 0x5a,
            log_dir: "logs",
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
