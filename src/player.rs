//! The frame loop: a single thread drives update, composition, and
//! transport for every device at a fixed rate, while a background thread
//! connects devices and publishes them as they come up.

use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use tracing::{info, warn};

use crate::animation::AnimationKind;
use crate::artnet::ArtNetClient;
use crate::audio::AudioProvider;
use crate::config::SessionConfig;
use crate::core::Nanos;
use crate::error::LedfxResult;
use crate::layout::{Device, compose_device};

const FRAME_INTERVAL: Duration = Duration::from_nanos(16_666_667);

pub struct Player {
    config: SessionConfig,
}

impl Player {
    pub fn new(config: SessionConfig) -> Self {
        Self { config }
    }

    /// Run one animation session until `duration` elapses (forever when
    /// `None`) or the animation asks to stop. Devices join the session as
    /// the connector brings them up; a device that fails to send keeps its
    /// last frame while the rest continue.
    pub fn run(
        &self,
        kind: AnimationKind,
        audio: &mut dyn AudioProvider,
        duration: Option<Duration>,
    ) -> LedfxResult<()> {
        let canvas = self.config.canvas;
        let mut animation = kind.create(audio);
        animation.init(canvas.width, canvas.height);
        info!(animation = animation.name(), width = canvas.width, height = canvas.height, "session started");

        let receiver = spawn_connector(self.config.devices.clone());
        let mut connected: Vec<(Device, ArtNetClient)> = Vec::new();

        let start = Instant::now();
        let mut next_tick = start;

        loop {
            let now = Instant::now();
            if now < next_tick {
                thread::sleep(next_tick - now);
            }
            next_tick += FRAME_INTERVAL;
            // No catch-up burst after a stall: drop the missed ticks.
            if next_tick < Instant::now() {
                next_tick = Instant::now();
            }

            if duration.is_some_and(|d| start.elapsed() >= d) {
                break;
            }

            for entry in receiver.try_iter() {
                connected.push(entry);
            }

            let timestamp = Nanos(start.elapsed().as_nanos() as u64);
            if !animation.update(timestamp) {
                break;
            }

            for (device, client) in &connected {
                let channels = compose_device(animation.as_ref(), device, self.config.brightness);
                if let Err(e) = client.send_rgb(&channels, device.led_count()) {
                    warn!(device = %device.name, error = %e, "frame dropped");
                }
            }
        }

        // Blackout before the animation (and any audio handle it owns) is
        // released, so panels do not hold the last frame.
        for entry in receiver.try_iter() {
            connected.push(entry);
        }
        for (device, client) in &connected {
            let dark = vec![0u8; device.led_count() * 3];
            if let Err(e) = client.send_rgb(&dark, device.led_count()) {
                warn!(device = %device.name, error = %e, "blackout dropped");
            }
        }
        drop(animation);

        info!("session stopped");
        Ok(())
    }
}

/// Connect each device off the frame loop and publish it once ready.
/// Devices that never connect are logged and skipped; the session runs
/// with whatever subset comes up.
fn spawn_connector(devices: Vec<Device>) -> mpsc::Receiver<(Device, ArtNetClient)> {
    let (sender, receiver) = mpsc::channel();
    thread::spawn(move || {
        for device in devices {
            let mut client = ArtNetClient::for_device(&device);
            match client.connect() {
                Ok(()) => {
                    info!(device = %device.name, host = %device.host, "device connected");
                    if sender.send((device, client)).is_err() {
                        return;
                    }
                }
                Err(e) => {
                    warn!(device = %device.name, host = %device.host, error = %e, "device connection failed");
                }
            }
        }
    });
    receiver
}
