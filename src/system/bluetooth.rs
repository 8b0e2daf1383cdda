//! Bluetooth module
//!
//! Advertises the watch, reports the link state to the watchface and serves
//! the battery level, the current time and the watchface settings.

use embassy_futures::select::select;
use nrf_softdevice::{
    ble::{
        advertisement_builder::{
            Flag, LegacyAdvertisementBuilder, LegacyAdvertisementPayload, ServiceList,
            ServiceUuid16,
        },
        gatt_server, peripheral, Connection,
    },
    Softdevice,
};
use pinetime_termface::{config::Settings, time, Event};

use crate::{BATTERY, BATTERY_LEVEL, CLOCK, CONNECTED, INBOX};
use core::sync::atomic::Ordering;

pub static ADV_DATA: LegacyAdvertisementPayload = LegacyAdvertisementBuilder::new()
    .flags(&[Flag::GeneralDiscovery, Flag::LE_Only])
    .services_16(
        ServiceList::Incomplete,
        &[ServiceUuid16::BATTERY, ServiceUuid16::CURRENT_TIME],
    )
    .full_name(pinetime_termface::config::DEVICE_NAME)
    .build();

pub static SCAN_DATA: LegacyAdvertisementPayload = LegacyAdvertisementBuilder::new()
    .services_16(
        ServiceList::Incomplete,
        &[ServiceUuid16::BATTERY, ServiceUuid16::CURRENT_TIME],
    )
    .build();

#[nrf_softdevice::gatt_server]
pub struct Server {
    pub bas: BatteryService,
    pub cts: CurrentTimeService,
    pub settings: SettingsService,
}

#[nrf_softdevice::gatt_service(uuid = "180f")]
pub struct BatteryService {
    #[characteristic(uuid = "2a19", read, notify)]
    pub battery_level: u8,
}

#[nrf_softdevice::gatt_service(uuid = "1805")]
pub struct CurrentTimeService {
    #[characteristic(uuid = "2a2b", read, write)]
    pub current_time: [u8; time::CTS_LEN],
}

/// Watchface preferences, one byte flag per setting
#[nrf_softdevice::gatt_service(uuid = "7a1f0100-4c2b-4f3e-9a52-3d1f6b0e7c10")]
pub struct SettingsService {
    #[characteristic(uuid = "7a1f0101-4c2b-4f3e-9a52-3d1f6b0e7c10", read, write)]
    pub clock_format: u8,
    #[characteristic(uuid = "7a1f0102-4c2b-4f3e-9a52-3d1f6b0e7c10", read, write)]
    pub blink_cursor: u8,
    #[characteristic(uuid = "7a1f0103-4c2b-4f3e-9a52-3d1f6b0e7c10", read, write)]
    pub vibrate_on_disconnect: u8,
}

/// Advertise, serve one connection at a time and report link changes
pub async fn serve(sd: &'static Softdevice, server: &Server, mut settings: Settings) -> ! {
    publish_settings(server, &settings);

    loop {
        let config = peripheral::Config::default();
        let adv = peripheral::ConnectableAdvertisement::ScannableUndirected {
            adv_data: &ADV_DATA,
            scan_data: &SCAN_DATA,
        };
        let conn = match peripheral::advertise_connectable(sd, adv, &config).await {
            Ok(conn) => conn,
            Err(e) => {
                defmt::warn!("Advertising failed: {:?}", e);
                continue;
            }
        };

        defmt::info!("Phone connected");
        set_connected(true).await;

        // Current level for the first read
        let level = BATTERY.lock(|battery| battery.get().percent);
        if let Err(e) = server.bas.battery_level_set(&level) {
            defmt::warn!("Setting battery level failed: {:?}", e);
        }

        let gatt = gatt_server::run(&conn, server, |e| match e {
            ServerEvent::Bas(BatteryServiceEvent::BatteryLevelCccdWrite { notifications }) => {
                defmt::debug!("Battery notifications: {}", notifications);
            }
            ServerEvent::Cts(CurrentTimeServiceEvent::CurrentTimeWrite(bytes)) => {
                set_time(&bytes);
            }
            ServerEvent::Settings(event) => {
                let mut flags = settings.to_bytes();
                match event {
                    SettingsServiceEvent::ClockFormatWrite(value) => flags[0] = value,
                    SettingsServiceEvent::BlinkCursorWrite(value) => flags[1] = value,
                    SettingsServiceEvent::VibrateOnDisconnectWrite(value) => flags[2] = value,
                }
                settings = Settings::from_bytes(flags);
                defmt::info!("Settings changed: {}", settings);
                INBOX.update_settings(settings);
            }
        });

        select(gatt, notify_battery(server, &conn)).await;

        defmt::info!("Phone disconnected");
        set_connected(false).await;
    }
}

/// Forward battery level changes to the connected phone
async fn notify_battery(server: &Server, conn: &Connection) {
    loop {
        let level = BATTERY_LEVEL.wait().await;
        if let Err(e) = server.bas.battery_level_notify(conn, &level) {
            // Not subscribed, keep the value for reads
            defmt::debug!("Battery notification skipped: {:?}", e);
            if let Err(e) = server.bas.battery_level_set(&level) {
                defmt::warn!("Setting battery level failed: {:?}", e);
            }
        }
    }
}

fn publish_settings(server: &Server, settings: &Settings) {
    let [clock_format, blink_cursor, vibrate] = settings.to_bytes();
    let results = [
        server.settings.clock_format_set(&clock_format),
        server.settings.blink_cursor_set(&blink_cursor),
        server.settings.vibrate_on_disconnect_set(&vibrate),
    ];
    for result in results {
        if let Err(e) = result {
            defmt::warn!("Setting characteristic failed: {:?}", e);
        }
    }
}

fn set_time(bytes: &[u8]) {
    match time::parse_cts(bytes) {
        Ok(now) => {
            CLOCK.lock(|clock| clock.borrow_mut().set(now));
            defmt::info!("Time set by phone");
            if INBOX.try_send(Event::Tick(now)).is_err() {
                // The minute ticker shows it on the next tick
                defmt::warn!("Event queue full, time update delayed");
            }
        }
        Err(e) => defmt::warn!("Invalid current time: {}", e),
    }
}

async fn set_connected(connected: bool) {
    CONNECTED.store(connected, Ordering::Relaxed);
    INBOX.send(Event::Connection(connected)).await;
}
