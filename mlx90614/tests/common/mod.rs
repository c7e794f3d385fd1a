use embedded_hal::i2c::{Error as I2cError, ErrorKind, ErrorType, I2c, Operation, SevenBitAddress};

pub struct UnimplementedHal;

#[derive(Debug, PartialEq, Eq)]
pub struct NoBus;

impl I2cError for NoBus {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

impl ErrorType for UnimplementedHal {
    type Error = NoBus;
}

impl I2c for UnimplementedHal {
    fn transaction(
        &mut self,
        _address: SevenBitAddress,
        _operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        Err(NoBus)
    }
}
