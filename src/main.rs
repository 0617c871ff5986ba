#![no_std]
#![no_main]

use embassy_executor::Spawner;
use embassy_time::{Duration, Timer};

use esp_alloc as _;
use esp_backtrace as _;
use esp_hal::{
    gpio::{Input, InputConfig, Level, Output, OutputConfig, Pull},
    rng::Rng,
    timer::timg::TimerGroup,
};
use esp_println::logger::init_logger;
use static_cell::StaticCell;

extern crate alloc;

mod config;
mod constants;
mod controller;
mod door;
mod mqtt;
mod relay;
mod transport;
mod watchdog;
mod wifi;

use constants::{HEAP_SIZE, VERSION};
use controller::Controller;
use door::DoorSensors;
use relay::Relay;
use watchdog::{watchdog_task, Watchdog};
use wifi::Wifi;

esp_bootloader_esp_idf::esp_app_desc!();

static WATCHDOG: StaticCell<Watchdog> = StaticCell::new();

#[esp_hal_embassy::main]
async fn main(spawner: Spawner) {
    init_logger(log::LevelFilter::Info);
    log::info!("Door controller v{} booting", VERSION);

    let peripherals = esp_hal::init(esp_hal::Config::default());

    let rng = Rng::new(peripherals.RNG);

    esp_alloc::heap_allocator!(size: HEAP_SIZE);

    let timg0 = TimerGroup::new(peripherals.TIMG0);
    let timg1 = TimerGroup::new(peripherals.TIMG1);

    esp_hal_embassy::init(timg0.timer0);

    // possibly high transient required at init
    // https://github.com/esp-rs/esp-hal/issues/1626
    Timer::after(Duration::from_millis(1000)).await;

    // Door position inputs; the reed switches short GPIO14/GPIO12 to ground.
    let door = DoorSensors::new(
        Input::new(peripherals.GPIO14, InputConfig::default().with_pull(Pull::Up)),
        Input::new(peripherals.GPIO12, InputConfig::default().with_pull(Pull::Up)),
    );

    // Door button relay on GPIO5, energized while high.
    let relay = Relay::new(Output::new(
        peripherals.GPIO5,
        Level::Low,
        OutputConfig::default(),
    ));

    // Reset line on GPIO4, wired to EN. Held high until the watchdog fires.
    let reset_line = Output::new(peripherals.GPIO4, Level::High, OutputConfig::default());

    let watchdog = &*WATCHDOG.init(Watchdog::new());
    spawner
        .spawn(watchdog_task(watchdog, reset_line))
        .expect("Failed to spawn watchdog task");

    let wifi = Wifi::new(
        peripherals.WIFI,
        timg1.timer0,
        peripherals.RADIO_CLK,
        rng.clone(),
        spawner,
    )
    .await
    .unwrap();

    wifi.connect().await.unwrap();
    // DHCP is up; the broker now has the full watchdog window to answer.
    watchdog.feed();

    let controller = Controller::new(wifi.stack, door, relay, watchdog).unwrap();
    spawner.spawn(controller_task(controller)).ok();
}

#[embassy_executor::task]
async fn controller_task(mut controller: Controller) {
    controller.run().await
}
