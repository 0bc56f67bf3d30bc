//! Art-Net DMX transport: packet serialization and a fire-and-forget UDP
//! client. The byte layout must match the receiving firmware exactly; see
//! the field-by-field construction in [`build_packet`].

use std::net::UdpSocket;

use tracing::debug;

use crate::error::{LedfxError, LedfxResult};
use crate::layout::Device;

/// Protocol ID header, NUL-terminated.
pub const ARTNET_ID: &[u8; 8] = b"Art-Net\0";
/// ArtDmx opcode, transmitted little-endian.
pub const OP_ART_DMX: u16 = 0x5000;
/// Protocol revision, transmitted big-endian.
pub const PROTOCOL_VERSION: u16 = 14;
pub const ARTNET_PORT: u16 = 6454;
/// LEDs per universe: 170 * 3 = 510 channels, inside the 512-channel DMX
/// frame.
pub const LEDS_PER_UNIVERSE: usize = 170;

const HEADER_LEN: usize = 18;

/// Serialize one universe's packet. `rgb` holds 3 bytes per LED in RGB
/// order; the wire carries them in the firmware's blue, red, green order.
/// `start_address` zero bytes pad the channel data after the start code.
pub fn build_packet(universe: u16, start_address: usize, rgb: &[u8]) -> Vec<u8> {
    let led_count = rgb.len() / 3;
    let data_length = 1 + start_address + led_count * 3;
    let mut packet = Vec::with_capacity(HEADER_LEN + data_length);

    packet.extend_from_slice(ARTNET_ID);
    packet.extend_from_slice(&OP_ART_DMX.to_le_bytes());
    packet.extend_from_slice(&PROTOCOL_VERSION.to_be_bytes());
    packet.push(0); // sequence unused
    packet.push(0); // physical port
    packet.extend_from_slice(&universe.to_le_bytes());
    packet.extend_from_slice(&(data_length as u16).to_be_bytes());
    packet.push(0); // DMX start code
    packet.resize(packet.len() + start_address, 0);

    for led in rgb.chunks_exact(3) {
        packet.push(led[2]);
        packet.push(led[0]);
        packet.push(led[1]);
    }

    packet
}

/// UDP sender for one device. Opened sockets are connectionless; `connect`
/// only resolves and pins the destination. Sending while disconnected is an
/// error, sends themselves are fire-and-forget with no retry.
pub struct ArtNetClient {
    host: String,
    port: u16,
    base_universe: u16,
    start_address: usize,
    socket: Option<UdpSocket>,
}

impl ArtNetClient {
    pub fn new(host: impl Into<String>, port: u16, base_universe: u16) -> Self {
        Self {
            host: host.into(),
            port,
            base_universe,
            start_address: 0,
            socket: None,
        }
    }

    pub fn for_device(device: &Device) -> Self {
        let mut client = Self::new(device.host.clone(), device.port, device.universe);
        client.start_address = device.dmx_start_address;
        client
    }

    pub fn is_connected(&self) -> bool {
        self.socket.is_some()
    }

    pub fn connect(&mut self) -> LedfxResult<()> {
        let socket = UdpSocket::bind("0.0.0.0:0")?;
        socket.connect((self.host.as_str(), self.port))?;
        debug!(host = %self.host, port = self.port, "transport connected");
        self.socket = Some(socket);
        Ok(())
    }

    pub fn disconnect(&mut self) {
        self.socket = None;
    }

    /// Send `led_count` LEDs from `rgb` (3 bytes per LED, RGB order),
    /// split across consecutive universes of [`LEDS_PER_UNIVERSE`] starting
    /// at the base universe. Chunks transmit independently; a failed chunk
    /// does not stop the remaining ones.
    pub fn send_rgb(&self, rgb: &[u8], led_count: usize) -> LedfxResult<()> {
        let socket = self
            .socket
            .as_ref()
            .ok_or_else(|| LedfxError::not_connected(&self.host))?;

        if rgb.len() < led_count * 3 {
            return Err(LedfxError::config(format!(
                "channel sequence holds {} LEDs, {} requested",
                rgb.len() / 3,
                led_count
            )));
        }

        let mut failure = None;
        for (chunk_index, chunk) in rgb[..led_count * 3]
            .chunks(LEDS_PER_UNIVERSE * 3)
            .enumerate()
        {
            let universe = self.base_universe + chunk_index as u16;
            let packet = build_packet(universe, self.start_address, chunk);
            if let Err(e) = socket.send(&packet) {
                failure = Some(e);
            }
        }

        match failure {
            Some(e) => Err(e.into()),
            None => Ok(()),
        }
    }
}
