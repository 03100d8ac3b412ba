//! VisionLink - vision coprocessor link firmware
//!
//! Main firmware binary for STM32F407 gimbal controller boards
//! (RoboMaster development board C class). Runs the fixed-frame link to
//! the vision computer over either the USART1 DMA service or the USB
//! virtual COM port, selected at build time:
//!
//! - `transport-uart` (default): USART1, PA9 TX / PB7 RX
//! - `transport-vcp`: USB OTG FS, PA12 / PA11

#![no_std]
#![no_main]

#[cfg(all(feature = "transport-uart", feature = "transport-vcp"))]
compile_error!("features `transport-uart` and `transport-vcp` are mutually exclusive");

#[cfg(not(any(feature = "transport-uart", feature = "transport-vcp")))]
compile_error!("enable exactly one of the `transport-uart` or `transport-vcp` features");

use defmt::*;
use embassy_executor::Spawner;
use embassy_stm32::bind_interrupts;
use embassy_stm32::crc::Crc;
use embassy_stm32::i2c::{self, I2c};
use embassy_stm32::time::Hertz;
use embassy_stm32::Config;
use embassy_time::Duration;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use visionlink_core::{LinkConfig, VisionLink, VisionSession};
use visionlink_drivers::bus::EhI2c;
use visionlink_drivers::power::Ina226;
use visionlink_hal::i2c::I2cConfig;
use visionlink_hal_stm32f4::crc::HwCrc;

mod channels;
mod tasks;

#[cfg(feature = "transport-uart")]
bind_interrupts!(struct Irqs {
    USART1 => embassy_stm32::usart::InterruptHandler<embassy_stm32::peripherals::USART1>;
});

#[cfg(feature = "transport-vcp")]
bind_interrupts!(struct Irqs {
    OTG_FS => embassy_stm32::usb::InterruptHandler<embassy_stm32::peripherals::USB_OTG_FS>;
});

/// Shared decode state (must live forever for the receive callback)
static LINK: StaticCell<VisionLink<HwCrc>> = StaticCell::new();

#[cfg(feature = "transport-uart")]
static SERIAL: visionlink_hal_stm32f4::uart::SerialService =
    visionlink_hal_stm32f4::uart::SerialService::new();

#[cfg(feature = "transport-vcp")]
static VCP: visionlink_hal_stm32f4::usb::VcpService = visionlink_hal_stm32f4::usb::VcpService::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("VisionLink firmware starting...");

    let p = embassy_stm32::init(clock_config());
    info!("Peripherals initialized");

    #[cfg(feature = "transport-uart")]
    let link_config = LinkConfig::UART;
    #[cfg(feature = "transport-vcp")]
    let link_config = LinkConfig::VCP;

    let link: &'static VisionLink<HwCrc> =
        LINK.init(VisionLink::new(HwCrc::new(Crc::new(p.CRC)), link_config));

    #[cfg(feature = "transport-uart")]
    let transport = {
        use embassy_stm32::usart::Uart;
        use visionlink_hal::uart::UartConfig;
        use visionlink_hal_stm32f4::uart::usart_config;

        let uart = Uart::new(
            p.USART1,
            p.PB7, // RX
            p.PA9, // TX
            Irqs,
            p.DMA2_CH7,
            p.DMA2_CH2,
            usart_config(&UartConfig::default()),
        )
        .unwrap();
        let (tx, rx) = uart.split();

        spawner.spawn(tasks::serial_rx_task(&SERIAL, rx)).unwrap();
        spawner.spawn(tasks::serial_tx_task(&SERIAL, tx)).unwrap();
        info!("USART1 initialized for vision communication");

        visionlink_core::UartDmaTransport::new(SERIAL.port(), link_config.recv_size)
    };

    #[cfg(feature = "transport-vcp")]
    let transport = {
        use embassy_stm32::usb::{self, Driver};
        use embassy_usb::class::cdc_acm::{CdcAcmClass, State};
        use embassy_usb::Builder;
        use visionlink_hal_stm32f4::usb::MAX_PACKET_SIZE;

        static EP_OUT_BUFFER: StaticCell<[u8; 256]> = StaticCell::new();
        static CONFIG_DESC: StaticCell<[u8; 256]> = StaticCell::new();
        static BOS_DESC: StaticCell<[u8; 256]> = StaticCell::new();
        static CONTROL_BUF: StaticCell<[u8; 64]> = StaticCell::new();
        static CDC_STATE: StaticCell<State> = StaticCell::new();

        let mut usb_config = usb::Config::default();
        // Board C has no VBUS sense wired
        usb_config.vbus_detection = false;
        let driver = Driver::new_fs(
            p.USB_OTG_FS,
            Irqs,
            p.PA12,
            p.PA11,
            EP_OUT_BUFFER.init([0u8; 256]),
            usb_config,
        );

        let mut device_config = embassy_usb::Config::new(0xc0de, 0xcafe);
        device_config.manufacturer = Some("VisionLink");
        device_config.product = Some("Vision VCP");
        device_config.serial_number = Some("00000001");
        device_config.max_power = 100;
        device_config.max_packet_size_0 = 64;

        let mut builder = Builder::new(
            driver,
            device_config,
            CONFIG_DESC.init([0u8; 256]),
            BOS_DESC.init([0u8; 256]),
            &mut [],
            CONTROL_BUF.init([0u8; 64]),
        );
        let class = CdcAcmClass::new(&mut builder, CDC_STATE.init(State::new()), MAX_PACKET_SIZE as u16);
        let device = builder.build();
        let (tx, rx) = class.split();

        spawner.spawn(tasks::usb_device_task(device)).unwrap();
        spawner.spawn(tasks::vcp_rx_task(&VCP, rx)).unwrap();
        spawner.spawn(tasks::vcp_tx_task(&VCP, tx)).unwrap();
        info!("USB VCP initialized for vision communication");

        visionlink_core::UsbVcpTransport::new(VCP.port())
    };

    let (session, _receiver) = unwrap!(VisionSession::initialize(link, transport));
    info!("Vision link registered");

    // Power monitor on I2C2 (PF1=SCL, PF0=SDA)
    let bus_config = I2cConfig::FAST;
    let mut i2c_config = i2c::Config::default();
    i2c_config.frequency = Hertz(bus_config.frequency);
    i2c_config.timeout = Duration::from_millis(bus_config.timeout_ms as u64);
    let i2c = I2c::new_blocking(p.I2C2, p.PF1, p.PF0, i2c_config);
    let meter = Ina226::new(EhI2c::new(i2c));

    spawner.spawn(tasks::vision_task(session)).unwrap();
    spawner.spawn(tasks::power_task(meter)).unwrap();

    info!("All tasks spawned, firmware running");
}

/// 12 MHz HSE, 168 MHz SYSCLK, 48 MHz USB clock
fn clock_config() -> Config {
    use embassy_stm32::rcc::*;

    let mut config = Config::default();
    config.rcc.hse = Some(Hse {
        freq: Hertz(12_000_000),
        mode: HseMode::Oscillator,
    });
    config.rcc.pll_src = PllSource::HSE;
    config.rcc.pll = Some(Pll {
        prediv: PllPreDiv::DIV6,
        mul: PllMul::MUL168,
        divp: Some(PllPDiv::DIV2),
        divq: Some(PllQDiv::DIV7),
        divr: None,
    });
    config.rcc.ahb_pre = AHBPrescaler::DIV1;
    config.rcc.apb1_pre = APBPrescaler::DIV4;
    config.rcc.apb2_pre = APBPrescaler::DIV2;
    config.rcc.sys = Sysclk::PLL1_P;
    config.rcc.mux.clk48sel = mux::Clk48sel::PLL1_Q;
    config
}
