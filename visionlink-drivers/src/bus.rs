//! Adapters from `embedded-hal` buses
//!
//! Chip HALs implement the `embedded-hal` 1.0 traits; drivers in this crate
//! take the smaller [`I2cBus`] trait. [`EhI2c`] bridges the two.

use embedded_hal::i2c::I2c;
use visionlink_hal::I2cBus;

/// [`I2cBus`] over any `embedded-hal` I2C master
pub struct EhI2c<T>(pub T);

impl<T: I2c> EhI2c<T> {
    /// Wrap a bus
    pub fn new(bus: T) -> Self {
        Self(bus)
    }

    /// Release the wrapped bus
    pub fn release(self) -> T {
        self.0
    }
}

impl<T: I2c> I2cBus for EhI2c<T> {
    type Error = T::Error;

    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), Self::Error> {
        I2c::write(&mut self.0, address, data)
    }

    fn read(&mut self, address: u8, buf: &mut [u8]) -> Result<(), Self::Error> {
        I2c::read(&mut self.0, address, buf)
    }

    fn write_read(
        &mut self,
        address: u8,
        write_data: &[u8],
        read_buf: &mut [u8],
    ) -> Result<(), Self::Error> {
        I2c::write_read(&mut self.0, address, write_data, read_buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal::i2c::{ErrorKind, ErrorType, Operation};

    /// Bus that answers every read with an incrementing byte
    #[derive(Default)]
    struct CountingBus {
        writes: Vec<(u8, Vec<u8>)>,
        next: u8,
    }

    impl ErrorType for CountingBus {
        type Error = ErrorKind;
    }

    impl I2c for CountingBus {
        fn transaction(&mut self, address: u8, operations: &mut [Operation<'_>]) -> Result<(), ErrorKind> {
            for op in operations {
                match op {
                    Operation::Write(data) => self.writes.push((address, data.to_vec())),
                    Operation::Read(buf) => {
                        for byte in buf.iter_mut() {
                            *byte = self.next;
                            self.next = self.next.wrapping_add(1);
                        }
                    }
                }
            }
            Ok(())
        }
    }

    #[test]
    fn test_write_read_forwards_to_embedded_hal() {
        let mut bus = EhI2c::new(CountingBus::default());
        let mut buf = [0u8; 2];

        I2cBus::write_read(&mut bus, 0x40, &[0x02], &mut buf).unwrap();

        assert_eq!(buf, [0, 1]);
        assert_eq!(bus.release().writes, vec![(0x40, vec![0x02])]);
    }

    /// INA226-style register file behind an `embedded-hal` bus
    struct RegisterBus {
        registers: [u16; 256],
        pointer: u8,
    }

    impl ErrorType for RegisterBus {
        type Error = ErrorKind;
    }

    impl I2c for RegisterBus {
        fn transaction(&mut self, address: u8, operations: &mut [Operation<'_>]) -> Result<(), ErrorKind> {
            if address != crate::power::ina226::DEFAULT_ADDRESS {
                return Err(ErrorKind::NoAcknowledge(embedded_hal::i2c::NoAcknowledgeSource::Address));
            }
            for op in operations {
                match op {
                    Operation::Write(data) => {
                        self.pointer = data[0];
                        if let &[_, hi, lo] = *data {
                            self.registers[self.pointer as usize] = u16::from_be_bytes([hi, lo]);
                        }
                    }
                    Operation::Read(buf) => {
                        buf.copy_from_slice(&self.registers[self.pointer as usize].to_be_bytes());
                    }
                }
            }
            Ok(())
        }
    }

    #[test]
    fn test_ina226_runs_over_embedded_hal_bus() {
        use crate::power::ina226::{reg, TI_MANUFACTURER_ID};
        use crate::power::{Ina226, Ina226Error};

        let mut registers = [0u16; 256];
        registers[reg::MANUFACTURER_ID as usize] = TI_MANUFACTURER_ID;
        registers[reg::BUS_V as usize] = 0x2580; // 9600 * 1.25 mV
        let mut meter = Ina226::new(EhI2c::new(RegisterBus { registers, pointer: 0 }));

        meter.probe().unwrap();
        assert!((meter.bus_voltage_v().unwrap() - 12.0).abs() < 1e-4);
        meter.set_calibration(0x0A00).unwrap();
        assert_eq!(meter.calibration().unwrap(), 0x0A00);

        let mut wrong = Ina226::with_address(meter.release(), 0x41);
        assert!(matches!(wrong.probe(), Err(Ina226Error::Bus(ErrorKind::NoAcknowledge(_)))));
    }
}
