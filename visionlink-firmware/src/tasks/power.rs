//! Power monitor task
//!
//! Samples the INA226 on the vision computer's supply rail.

use defmt::*;
use embassy_stm32::i2c::{Error as I2cError, I2c, Master};
use embassy_stm32::mode::Blocking;
use embassy_time::{Duration, Ticker, Timer};

use visionlink_drivers::bus::EhI2c;
use visionlink_drivers::power::{Ina226, Ina226Error};

use crate::channels::{PowerReading, POWER_READING};

/// INA226 on the blocking I2C2 master
pub type PowerMeter = Ina226<EhI2c<I2c<'static, Blocking, Master>>>;

/// Sample interval in milliseconds
const SAMPLE_INTERVAL_MS: u64 = 100;

/// Delay before retrying a missing device
const PROBE_RETRY_MS: u64 = 1000;

/// Power task - periodic bus voltage, current and power readings
#[embassy_executor::task]
pub async fn power_task(mut meter: PowerMeter) {
    info!("Power task started");

    while let Err(e) = meter.probe() {
        warn!("INA226 not responding: {:?}", e);
        Timer::after(Duration::from_millis(PROBE_RETRY_MS)).await;
    }
    info!("INA226 detected");

    let mut ticker = Ticker::every(Duration::from_millis(SAMPLE_INTERVAL_MS));

    loop {
        ticker.next().await;

        match sample(&mut meter) {
            Ok(reading) => POWER_READING.signal(reading),
            Err(e) => warn!("INA226 read failed: {:?}", e),
        }
    }
}

fn sample(meter: &mut PowerMeter) -> Result<PowerReading, Ina226Error<I2cError>> {
    Ok(PowerReading {
        bus_v: meter.bus_voltage_v()?,
        current_a: meter.current_a()?,
        power_w: meter.power_w()?,
    })
}
