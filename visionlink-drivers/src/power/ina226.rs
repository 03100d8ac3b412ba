//! INA226 current/power monitor
//!
//! Register-pointer device on I2C: write the register address, then read
//! two bytes big-endian. Conversion factors assume the calibration register
//! is programmed for a 0.2 mA current LSB, which makes the power LSB
//! 25 × 0.2 mA × 1 V = 5 mW.

use visionlink_hal::I2cBus;

/// INA226 register addresses
pub mod reg {
    /// Configuration
    pub const CONFIG: u8 = 0x00;
    /// Shunt voltage (2.5 µV/LSB)
    pub const SHUNT_V: u8 = 0x01;
    /// Bus voltage (1.25 mV/LSB)
    pub const BUS_V: u8 = 0x02;
    /// Power
    pub const POWER: u8 = 0x03;
    /// Current
    pub const CURRENT: u8 = 0x04;
    /// Calibration
    pub const CALIBRATION: u8 = 0x05;
    /// Mask/enable
    pub const MASK_ENABLE: u8 = 0x06;
    /// Alert limit
    pub const ALERT_LIMIT: u8 = 0x07;
    /// Manufacturer ID
    pub const MANUFACTURER_ID: u8 = 0xFE;
    /// Die ID
    pub const DIE_ID: u8 = 0xFF;
}

/// Default 7-bit address (A0 = A1 = GND)
pub const DEFAULT_ADDRESS: u8 = 0x40;

/// Manufacturer ID register value ("TI")
pub const TI_MANUFACTURER_ID: u16 = 0x5449;

/// Bus voltage LSB in volts
pub const BUS_VOLTAGE_LSB: f32 = 0.001_25;

/// Current LSB in amperes, as programmed by the calibration register
pub const CURRENT_LSB: f32 = 0.000_2;

/// Power LSB in watts (25 × current LSB)
pub const POWER_LSB: f32 = 0.005;

/// Errors from the INA226 driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Ina226Error<E> {
    /// I2C transfer failed
    Bus(E),
    /// Manufacturer ID did not match
    UnknownDevice(u16),
}

impl<E> From<E> for Ina226Error<E> {
    fn from(e: E) -> Self {
        Ina226Error::Bus(e)
    }
}

/// INA226 driver
pub struct Ina226<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C: I2cBus> Ina226<I2C> {
    /// Create a driver at the default address
    pub fn new(i2c: I2C) -> Self {
        Self::with_address(i2c, DEFAULT_ADDRESS)
    }

    /// Create a driver at a specific 7-bit address
    pub fn with_address(i2c: I2C, address: u8) -> Self {
        Self { i2c, address }
    }

    /// Release the bus
    pub fn release(self) -> I2C {
        self.i2c
    }

    /// Check that a TI part answers at the configured address
    pub fn probe(&mut self) -> Result<(), Ina226Error<I2C::Error>> {
        let id = self.manufacturer_id()?;
        if id != TI_MANUFACTURER_ID {
            return Err(Ina226Error::UnknownDevice(id));
        }
        Ok(())
    }

    /// Read a 16-bit register
    pub fn read_register(&mut self, register: u8) -> Result<u16, Ina226Error<I2C::Error>> {
        let mut buf = [0u8; 2];
        self.i2c.write_read(self.address, &[register], &mut buf)?;
        Ok(u16::from_be_bytes(buf))
    }

    /// Write a 16-bit register
    pub fn write_register(&mut self, register: u8, value: u16) -> Result<(), Ina226Error<I2C::Error>> {
        let [hi, lo] = value.to_be_bytes();
        self.i2c.write(self.address, &[register, hi, lo])?;
        Ok(())
    }

    /// Bus voltage in volts
    pub fn bus_voltage_v(&mut self) -> Result<f32, Ina226Error<I2C::Error>> {
        Ok(self.bus_voltage_raw()? as f32 * BUS_VOLTAGE_LSB)
    }

    /// Current in amperes
    ///
    /// Reverse current (sign bit set) reads as zero.
    pub fn current_a(&mut self) -> Result<f32, Ina226Error<I2C::Error>> {
        let raw = self.current_raw()?;
        let raw = if raw >= 0x8000 { 0 } else { raw };
        Ok(raw as f32 * CURRENT_LSB)
    }

    /// Power in watts
    pub fn power_w(&mut self) -> Result<f32, Ina226Error<I2C::Error>> {
        Ok(self.power_raw()? as f32 * POWER_LSB)
    }

    pub fn config(&mut self) -> Result<u16, Ina226Error<I2C::Error>> {
        self.read_register(reg::CONFIG)
    }

    pub fn set_config(&mut self, value: u16) -> Result<(), Ina226Error<I2C::Error>> {
        self.write_register(reg::CONFIG, value)
    }

    pub fn shunt_voltage_raw(&mut self) -> Result<u16, Ina226Error<I2C::Error>> {
        self.read_register(reg::SHUNT_V)
    }

    pub fn bus_voltage_raw(&mut self) -> Result<u16, Ina226Error<I2C::Error>> {
        self.read_register(reg::BUS_V)
    }

    pub fn power_raw(&mut self) -> Result<u16, Ina226Error<I2C::Error>> {
        self.read_register(reg::POWER)
    }

    pub fn current_raw(&mut self) -> Result<u16, Ina226Error<I2C::Error>> {
        self.read_register(reg::CURRENT)
    }

    pub fn calibration(&mut self) -> Result<u16, Ina226Error<I2C::Error>> {
        self.read_register(reg::CALIBRATION)
    }

    pub fn set_calibration(&mut self, value: u16) -> Result<(), Ina226Error<I2C::Error>> {
        self.write_register(reg::CALIBRATION, value)
    }

    pub fn mask_enable(&mut self) -> Result<u16, Ina226Error<I2C::Error>> {
        self.read_register(reg::MASK_ENABLE)
    }

    pub fn set_mask_enable(&mut self, value: u16) -> Result<(), Ina226Error<I2C::Error>> {
        self.write_register(reg::MASK_ENABLE, value)
    }

    pub fn alert_limit(&mut self) -> Result<u16, Ina226Error<I2C::Error>> {
        self.read_register(reg::ALERT_LIMIT)
    }

    pub fn set_alert_limit(&mut self, value: u16) -> Result<(), Ina226Error<I2C::Error>> {
        self.write_register(reg::ALERT_LIMIT, value)
    }

    pub fn manufacturer_id(&mut self) -> Result<u16, Ina226Error<I2C::Error>> {
        self.read_register(reg::MANUFACTURER_ID)
    }

    pub fn die_id(&mut self) -> Result<u16, Ina226Error<I2C::Error>> {
        self.read_register(reg::DIE_ID)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Fake INA226 register file
    struct FakeBus {
        registers: [u16; 256],
        pointer: u8,
        fail: bool,
    }

    impl FakeBus {
        fn new() -> Self {
            let mut registers = [0u16; 256];
            registers[reg::MANUFACTURER_ID as usize] = TI_MANUFACTURER_ID;
            registers[reg::DIE_ID as usize] = 0x2260;
            Self {
                registers,
                pointer: 0,
                fail: false,
            }
        }
    }

    impl I2cBus for FakeBus {
        type Error = ();

        fn write(&mut self, address: u8, data: &[u8]) -> Result<(), ()> {
            if self.fail || address != DEFAULT_ADDRESS {
                return Err(());
            }
            self.pointer = data[0];
            if let [_, hi, lo] = data {
                self.registers[self.pointer as usize] = u16::from_be_bytes([*hi, *lo]);
            }
            Ok(())
        }

        fn read(&mut self, address: u8, buf: &mut [u8]) -> Result<(), ()> {
            if self.fail || address != DEFAULT_ADDRESS {
                return Err(());
            }
            buf.copy_from_slice(&self.registers[self.pointer as usize].to_be_bytes());
            Ok(())
        }
    }

    #[test]
    fn test_probe_identifies_ti_part() {
        let mut ina = Ina226::new(FakeBus::new());
        assert_eq!(ina.probe(), Ok(()));
        assert_eq!(ina.die_id(), Ok(0x2260));
    }

    #[test]
    fn test_probe_rejects_other_parts() {
        let mut bus = FakeBus::new();
        bus.registers[reg::MANUFACTURER_ID as usize] = 0x1234;
        let mut ina = Ina226::new(bus);
        assert_eq!(ina.probe(), Err(Ina226Error::UnknownDevice(0x1234)));
    }

    #[test]
    fn test_register_write_is_big_endian() {
        let mut ina = Ina226::new(FakeBus::new());
        ina.set_calibration(0x0A00).unwrap();
        ina.set_config(0x4527).unwrap();

        assert_eq!(ina.calibration(), Ok(0x0A00));
        assert_eq!(ina.config(), Ok(0x4527));
        assert_eq!(ina.release().registers[reg::CONFIG as usize], 0x4527);
    }

    #[test]
    fn test_bus_voltage_conversion() {
        let mut bus = FakeBus::new();
        bus.registers[reg::BUS_V as usize] = 19_200; // 24.0 V
        let mut ina = Ina226::new(bus);

        let v = ina.bus_voltage_v().unwrap();
        assert!((v - 24.0).abs() < 1e-3);
    }

    #[test]
    fn test_current_conversion_clamps_reverse_flow() {
        let mut bus = FakeBus::new();
        bus.registers[reg::CURRENT as usize] = 5_000; // 1.0 A
        bus.registers[reg::POWER as usize] = 4_800; // 24 W
        let mut ina = Ina226::new(bus);

        assert!((ina.current_a().unwrap() - 1.0).abs() < 1e-4);
        assert!((ina.power_w().unwrap() - 24.0).abs() < 1e-3);

        let mut bus = ina.release();
        bus.registers[reg::CURRENT as usize] = 0x8001;
        let mut ina = Ina226::new(bus);
        assert_eq!(ina.current_a(), Ok(0.0));
    }

    #[test]
    fn test_bus_errors_are_reported() {
        let mut bus = FakeBus::new();
        bus.fail = true;
        let mut ina = Ina226::new(bus);

        assert_eq!(ina.bus_voltage_raw(), Err(Ina226Error::Bus(())));
        assert_eq!(ina.set_alert_limit(1), Err(Ina226Error::Bus(())));
    }

    #[test]
    fn test_other_address_is_not_answered() {
        let mut ina = Ina226::with_address(FakeBus::new(), 0x41);
        assert_eq!(ina.manufacturer_id(), Err(Ina226Error::Bus(())));
    }
}
