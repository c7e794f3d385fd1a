/*! `mlx90614` is an [`embedded_hal`](https://github.com/rust-embedded/embedded-hal) crate for
accessing [Melexis MLX90614](https://www.melexis.com/en/product/MLX90614/) infrared thermometers
over an I2C (SMBus) bus.

The MLX90614 exposes its measurements through RAM registers selected by a one-byte command:

* Ambient (die) temperature, command `0x06`
* Object (IR) temperature, command `0x07`

Each read returns a 16-bit little-endian word scaled in units of 0.02 K, followed by an SMBus
PEC byte covering the whole transaction. This crate validates the PEC on every read and converts
the word to degrees Celsius via [Temperature].

Reads are performed as a single combined write/read transaction, so the device is re-addressed
on every sample. [Mlx90614::reaffirm_address] additionally issues a bare command write, which
hosts can use as a cheap liveness probe or as a guard against bus desynchronization between
samples. */
#![no_std]

use core::result::Result;
use embedded_hal::i2c::I2c;

mod pec;
mod temp;
pub use temp::Temperature;

/// RAM registers holding linearized temperature readings.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[repr(u8)]
pub enum Register {
    /// Ambient (package) temperature.
    Ambient = 0x06,
    /// Object (IR) temperature, sensing zone 1.
    Object = 0x07,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
/// Enum for describing possible error conditions when reading an MLX90614 infrared thermometer.
pub enum Error<E> {
    /** A word was read successfully but its error flag (bit 15) was set; the sensor is
    reporting an internal fault for this measurement. */
    OutOfRange,
    /** The PEC byte returned by the sensor does not match the CRC-8 of the transaction;
    the measurement bytes cannot be trusted. */
    PecMismatch {
        /// PEC computed over the bytes that went over the wire.
        expected: u8,
        /// PEC byte the sensor actually returned.
        actual: u8,
    },
    /** The underlying bus transaction failed. Contains the error propagated from the
    [`embedded_hal`] implementation. */
    I2c(E),
}

/** A struct for describing how to read an MLX90614 infrared thermometer's RAM registers via an
[`embedded_hal`] implementation.

The MLX90614 keeps no register pointer between transactions; every read carries its own command
byte, so no state is cached here and the device is re-addressed on each sample. */
pub struct Mlx90614<T>
where
    T: I2c,
{
    ctx: T,
    address: u8,
}

impl<T> Mlx90614<T>
where
    T: I2c,
{
    pub fn new(ctx: T, address: u8) -> Self {
        Mlx90614 { ctx, address }
    }

    /** Write a bare command byte without reading data back.

    The read path re-addresses the device on every transaction already; this exists so hosts
    can re-establish addressing (and detect a missing sensor) without consuming a sample. */
    pub fn reaffirm_address(&mut self) -> Result<(), Error<T::Error>> {
        self.ctx
            .write(self.address, &[Register::Ambient as u8])
            .map_err(Error::I2c)
    }

    /** Read one raw 16-bit measurement word from `reg`.

    Performs an SMBus read-word transaction: command write, repeated start, then LSB, MSB and
    PEC. The PEC is validated over the full transaction and a set error flag (bit 15) is
    rejected, so an `Ok` value is always a plausible measurement. */
    pub fn read_raw(&mut self, reg: Register) -> Result<u16, Error<T::Error>> {
        let mut buf = [0u8; 3];

        self.ctx
            .write_read(self.address, &[reg as u8], &mut buf)
            .map_err(Error::I2c)?;

        let expected = pec::read_word_pec(self.address, reg as u8, buf[0], buf[1]);
        if expected != buf[2] {
            return Err(Error::PecMismatch {
                expected,
                actual: buf[2],
            });
        }

        let raw = u16::from_le_bytes([buf[0], buf[1]]);
        if raw & 0x8000 != 0 {
            return Err(Error::OutOfRange);
        }

        Ok(raw)
    }

    /// Read the ambient (package) temperature.
    pub fn ambient(&mut self) -> Result<Temperature, Error<T::Error>> {
        self.read_raw(Register::Ambient).map(Temperature::from_raw)
    }

    /// Read the object (IR) temperature.
    pub fn object(&mut self) -> Result<Temperature, Error<T::Error>> {
        self.read_raw(Register::Object).map(Temperature::from_raw)
    }

    /// Release the underlying bus handle.
    pub fn free(self) -> T {
        self.ctx
    }
}

#[cfg(test)]
mod tests {
    extern crate std;
    use std::vec;

    use super::{Error, Mlx90614, Register};
    use embedded_hal::i2c::ErrorKind;
    use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTransaction};

    const ADDR: u8 = 0x5a;

    fn mk_mlx(expectations: &[I2cTransaction]) -> Mlx90614<I2cMock> {
        Mlx90614::new(I2cMock::new(expectations), ADDR)
    }

    #[test]
    fn ambient_read() {
        let mut mlx = mk_mlx(&[I2cTransaction::write_read(
            ADDR,
            vec![0x06],
            vec![0x01, 0x3a, 0xa3],
        )]);

        let temp = mlx.ambient().unwrap();
        assert!((temp.celsius() - 23.82).abs() < 1e-9);

        mlx.free().done();
    }

    #[test]
    fn object_read() {
        let mut mlx = mk_mlx(&[I2cTransaction::write_read(
            ADDR,
            vec![0x07],
            vec![0x01, 0x3a, 0xb5],
        )]);

        let temp = mlx.object().unwrap();
        assert!((temp.celsius() - 23.82).abs() < 1e-9);

        mlx.free().done();
    }

    #[test]
    fn pec_mismatch() {
        let mut mlx = mk_mlx(&[I2cTransaction::write_read(
            ADDR,
            vec![0x06],
            vec![0x01, 0x3a, 0x00],
        )]);

        assert_eq!(
            mlx.read_raw(Register::Ambient),
            Err(Error::PecMismatch {
                expected: 0xa3,
                actual: 0x00
            })
        );

        mlx.free().done();
    }

    #[test]
    fn error_flag_rejected() {
        // Bit 15 of the word is the sensor's error flag; PEC is valid for these bytes.
        let mut mlx = mk_mlx(&[I2cTransaction::write_read(
            ADDR,
            vec![0x06],
            vec![0x4d, 0xb9, 0x84],
        )]);

        assert_eq!(mlx.read_raw(Register::Ambient), Err(Error::OutOfRange));

        mlx.free().done();
    }

    #[test]
    fn bus_error_propagates() {
        let mut mlx = mk_mlx(&[I2cTransaction::write_read(
            ADDR,
            vec![0x06],
            vec![0x00, 0x00, 0x10],
        )
        .with_error(ErrorKind::Other)]);

        assert_eq!(mlx.read_raw(Register::Ambient), Err(Error::I2c(ErrorKind::Other)));

        mlx.free().done();
    }

    #[test]
    fn reaffirm_address_writes_command() {
        let mut mlx = mk_mlx(&[I2cTransaction::write(ADDR, vec![0x06])]);

        assert_eq!(mlx.reaffirm_address(), Ok(()));

        mlx.free().done();
    }
}
