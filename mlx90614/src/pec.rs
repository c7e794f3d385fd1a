/* SMBus packet error checking: CRC-8 with polynomial x^8 + x^2 + x + 1
(0x07), initial value 0, computed over every byte of the transaction
including both address phases. */

const POLY: u8 = 0x07;

fn crc8(bytes: &[u8]) -> u8 {
    let mut crc = 0u8;
    for byte in bytes {
        crc ^= byte;
        for _ in 0..8 {
            crc = if crc & 0x80 != 0 {
                (crc << 1) ^ POLY
            } else {
                crc << 1
            };
        }
    }
    crc
}

/// PEC for an SMBus read-word transaction: write address, command byte,
/// read address, then the two data bytes as they came off the wire.
pub(crate) fn read_word_pec(address: u8, command: u8, lsb: u8, msb: u8) -> u8 {
    crc8(&[address << 1, command, (address << 1) | 1, lsb, msb])
}

#[cfg(test)]
mod tests {
    use super::read_word_pec;

    // Vectors checked against an independent SMBus CRC-8 implementation.
    #[test]
    fn known_vectors() {
        assert_eq!(read_word_pec(0x5a, 0x06, 0x01, 0x3a), 0xa3);
        assert_eq!(read_word_pec(0x5a, 0x06, 0xc8, 0x00), 0x55);
        assert_eq!(read_word_pec(0x5a, 0x06, 0x00, 0x00), 0x10);
        assert_eq!(read_word_pec(0x5a, 0x07, 0x01, 0x3a), 0xb5);
        assert_eq!(read_word_pec(0x5a, 0x06, 0xd8, 0x38), 0xaa);
    }
}
