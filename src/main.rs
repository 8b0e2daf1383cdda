#![no_std]
#![no_main]

mod peripherals;
mod system;

// Panic handler and debugging
use defmt::unwrap;

use defmt_rtt as _;
use panic_probe as _;

// Device
use core::{
    cell::{Cell, RefCell},
    sync::atomic::{AtomicBool, Ordering},
};
use embassy_executor::Spawner;
use embassy_nrf::{
    bind_interrupts,
    gpio::{Input, Level, Output, OutputDrive, Pin, Pull},
    interrupt::{self, InterruptExt, Priority},
    peripherals::SPI2,
    saadc::{self, ChannelConfig, Resolution, Saadc},
    spim,
};
use embassy_sync::{
    blocking_mutex::{raw::ThreadModeRawMutex, Mutex},
    signal::Signal,
};
use embassy_time::{Duration, Ticker, Timer};
use nrf_softdevice::Softdevice;
use static_cell::StaticCell;

bind_interrupts!(struct Irqs {
    SAADC => saadc::InterruptHandler;
    SPIM2_SPIS2_SPI2 => spim::InterruptHandler<SPI2>;
});

// Crate
use peripherals::{
    backlight::Backlight, battery::Battery, button::Button, display::Display, vibrator::Vibrator,
};
use pinetime_termface::{
    app::PulseLength,
    battery::BatteryInfo,
    config::{self, Settings},
    time::{self as clock, MinuteTicker},
    ui::Layout,
    Action, App, Event, Inbox, Services,
};
use system::{
    bluetooth::{self, Server},
    time::Clock,
};

// Others
use chrono::{NaiveDateTime, Timelike};

// Communication channels
static INBOX: Inbox<ThreadModeRawMutex, 8> = Inbox::new();
static BATTERY_LEVEL: Signal<ThreadModeRawMutex, u8> = Signal::new();
static BUTTON_PRESSED: Signal<ThreadModeRawMutex, ()> = Signal::new();
static NOTIFY: Signal<ThreadModeRawMutex, (PulseLength, u8)> = Signal::new();

// Shared state peeked by the watchface
static CLOCK: Mutex<ThreadModeRawMutex, RefCell<Clock>> = Mutex::new(RefCell::new(Clock::new()));
static BATTERY: Mutex<ThreadModeRawMutex, Cell<BatteryInfo>> = Mutex::new(Cell::new(BatteryInfo {
    percent: 0,
    charging: false,
}));
static CONNECTED: AtomicBool = AtomicBool::new(false);
/// Cursor animation is running
static BLINKING: AtomicBool = AtomicBool::new(false);

static SERVER: StaticCell<Server> = StaticCell::new();

/// Services of the firmware as seen by the watchface
struct Host;

impl Services for Host {
    fn now(&self) -> NaiveDateTime {
        CLOCK.lock(|clock| clock.borrow().now())
    }

    fn battery(&self) -> BatteryInfo {
        BATTERY.lock(|battery| battery.get())
    }

    fn is_connected(&self) -> bool {
        CONNECTED.load(Ordering::Relaxed)
    }
}

#[embassy_executor::task(pool_size = 1)]
async fn softdevice_task(sd: &'static Softdevice) -> ! {
    sd.run().await
}

#[embassy_executor::task(pool_size = 1)]
async fn ble_task(sd: &'static Softdevice, server: &'static Server, settings: Settings) {
    bluetooth::serve(sd, server, settings).await
}

/// Check the clock every second, emit a tick per minute and drive the cursor
/// while it blinks
#[embassy_executor::task(pool_size = 1)]
async fn clock_task() {
    let mut ticker = MinuteTicker::new();
    let mut tick = Ticker::every(Duration::from_secs(1));
    loop {
        let now = CLOCK.lock(|clock| clock.borrow().now());
        if let Some(minute) = ticker.poll(now) {
            defmt::debug!("Minute tick: {}:{}", minute.hour(), minute.minute());
            INBOX.send(Event::Tick(minute)).await;
        }
        if BLINKING.load(Ordering::Relaxed) {
            INBOX.send(Event::Blink).await;
        }

        // Re-schedule the timer interrupt in 1s
        tick.next().await;
    }
}

/// Fetch the battery status from the hardware.
#[embassy_executor::task(pool_size = 1)]
async fn battery_task(mut battery: Battery) {
    loop {
        Timer::after(Duration::from_secs(config::BATTERY_POLL_SECS)).await;

        match battery.update().await {
            Ok(true) => {
                let info = battery.info();
                defmt::info!("Battery status: {}% (charging: {})", info.percent, info.charging);
                BATTERY.lock(|battery| battery.set(info));
                BATTERY_LEVEL.signal(info.percent);
                INBOX.send(Event::Battery(info)).await;
            }
            Ok(false) => {}
            Err(e) => defmt::warn!("Battery measurement failed: {}", e),
        }
    }
}

/// Polls the button state every 10ms
#[embassy_executor::task(pool_size = 1)]
async fn button_task(mut button: Button) {
    loop {
        if button.pressed().await {
            BUTTON_PRESSED.signal(());
        }

        // Re-schedule the timer interrupt in 10ms
        Timer::after(Duration::from_millis(10)).await;
    }
}

/// Step the backlight brightness on every button press
#[embassy_executor::task(pool_size = 1)]
async fn backlight_task(mut backlight: Backlight) {
    loop {
        BUTTON_PRESSED.wait().await;
        if let Err(e) = backlight.cycle() {
            defmt::warn!("Backlight update failed: {}", e);
        }
    }
}

#[embassy_executor::task(pool_size = 1)]
async fn vibration_task(mut vibrator: Vibrator) {
    loop {
        let (length, count) = NOTIFY.wait().await;
        vibrator.pulse(length, Some(count)).await;
    }
}

/// Run the watchface: handle each event to completion, then redraw
#[embassy_executor::task(pool_size = 1)]
async fn ui_task(mut display: Display<SPI2>, mut app: App) {
    unwrap!(app.start(&Host));
    BLINKING.store(app.wants_blink(), Ordering::Relaxed);
    if let Err(e) = display.render(&mut app) {
        defmt::warn!("Rendering failed: {}", e);
    }

    loop {
        let event = INBOX.receive().await;
        match app.handle(event, &Host) {
            Ok(Action::Vibrate(length, count)) => NOTIFY.signal((length, count)),
            Ok(Action::None) => {}
            Err(e) => defmt::warn!("Event not handled: {}", e),
        }
        BLINKING.store(app.wants_blink(), Ordering::Relaxed);

        if let Err(e) = display.render(&mut app) {
            defmt::warn!("Rendering failed: {}", e);
        }
    }
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let p = embassy_nrf::init(system::config::embassy_config());
    defmt::info!("Initializing");

    // Enable SoftDevice and register the GATT server
    let sd = Softdevice::enable(&system::config::softdevice_config());
    let server = SERVER.init(unwrap!(Server::new(sd)));
    let sd: &'static Softdevice = sd;
    unwrap!(spawner.spawn(softdevice_task(sd)));

    // Start the clock at build time until the phone sets it
    let boot_time = clock::local_from_epoch(config::BUILD_EPOCH, config::UTC_OFFSET_SECS);
    CLOCK.lock(|clock| clock.borrow_mut().set(boot_time));

    // Interrupt priorities 0, 1 and 4 are reserved for the SoftDevice
    interrupt::SAADC.set_priority(Priority::P3);
    interrupt::SPIM2_SPIS2_SPI2.set_priority(Priority::P3);

    // Initialize SAADC
    let mut saadc_config = saadc::Config::default();
    // Set resolution to 12bit, necessary for correct battery status calculation
    saadc_config.resolution = Resolution::_12BIT;
    // Pin P0.31: Voltage level
    let channel_config = ChannelConfig::single_ended(p.P0_31);
    let saadc = Saadc::new(p.SAADC, Irqs, saadc_config, [channel_config]);
    saadc.calibrate().await;

    // Initalize Battery
    let battery = unwrap!(Battery::init(saadc, Input::new(p.P0_12, Pull::None)).await);
    BATTERY.lock(|info| info.set(battery.info()));

    // Initialize Backlight
    let backlight = unwrap!(Backlight::init(
        Output::new(p.P0_14.degrade(), Level::High, OutputDrive::Standard),
        Output::new(p.P0_22.degrade(), Level::High, OutputDrive::Standard),
        Output::new(p.P0_23.degrade(), Level::High, OutputDrive::Standard),
        config::BACKLIGHT_LEVEL,
    ));

    // Initialize Button
    let button = Button::init(
        Input::new(p.P0_13, Pull::None),
        Output::new(p.P0_15, Level::Low, OutputDrive::Standard),
    );

    // Initialize vibration motor
    let vibrator = Vibrator::init(Output::new(p.P0_16, Level::High, OutputDrive::Standard));

    // Initialize SPI
    let mut spim_config = spim::Config::default();
    // Use SPI at 8MHz (the fastest clock available on the nRF52832),
    // otherwise refreshing will be super slow.
    spim_config.frequency = spim::Frequency::M8;
    // SPI must be used in mode 3. Mode 0 (the default) won't work.
    spim_config.mode = spim::MODE_3;

    let spim = spim::Spim::new(p.SPI2, Irqs, p.P0_02, p.P0_04, p.P0_03, spim_config);

    // Initialize LCD
    let display = unwrap!(Display::init(
        spim,
        Output::new(p.P0_25, Level::Low, OutputDrive::Standard),
        Output::new(p.P0_18, Level::Low, OutputDrive::Standard),
        Output::new(p.P0_26, Level::Low, OutputDrive::Standard),
    ));

    // Watchface
    let settings = Settings::default();
    let layout = Layout::for_shape(config::SCREEN_SHAPE, display.bounds());
    let app = App::new(settings, layout);

    defmt::info!("Initialization finished");

    // Schedule tasks
    unwrap!(spawner.spawn(ble_task(sd, server, settings)));
    unwrap!(spawner.spawn(ui_task(display, app)));
    unwrap!(spawner.spawn(clock_task()));
    unwrap!(spawner.spawn(battery_task(battery)));
    unwrap!(spawner.spawn(button_task(button)));
    unwrap!(spawner.spawn(backlight_task(backlight)));
    unwrap!(spawner.spawn(vibration_task(vibrator)));
}
