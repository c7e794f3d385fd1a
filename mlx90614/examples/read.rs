#[cfg(any(target_os = "linux", target_os = "android"))]
mod linux {
    use argh::FromArgs;

    #[derive(FromArgs)]
    #[argh(description = "read an MLX90614 once and print both temperatures")]
    pub struct InputArgs {
        #[argh(positional)]
        pub bus: String,
        #[argh(
            option,
            short = 'a',
            default = "0x5a",
            from_str_fn(from_base_16),
            description = "sensor address"
        )]
        pub addr: u8,
    }

    fn from_base_16(val: &str) -> Result<u8, String> {
        let no_prefix = val.trim_start_matches("0x");

        u8::from_str_radix(no_prefix, 16)
            .map_err(|_| "Unable to convert address from base 16".into())
    }
}

#[cfg(any(target_os = "linux", target_os = "android"))]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    use linux_embedded_hal::I2cdev;
    use mlx90614::Mlx90614;

    let args: linux::InputArgs = argh::from_env();

    let i2c = I2cdev::new(args.bus)?;
    let mut mlx = Mlx90614::new(i2c, args.addr);

    match mlx.ambient() {
        Ok(t) => println!("ambient: {} C", t),
        Err(e) => println!("ambient: read failed ({:?})", e),
    }
    match mlx.object() {
        Ok(t) => println!("object:  {} C", t),
        Err(e) => println!("object:  read failed ({:?})", e),
    }

    let _i2c = mlx.free();

    Ok(())
}

#[cfg(not(any(target_os = "linux", target_os = "android")))]
fn main() {}
