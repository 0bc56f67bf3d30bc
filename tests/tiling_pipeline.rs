//! End-to-end: animation pixels through the compositor and transport for a
//! four-panel tiled canvas.

use std::net::UdpSocket;
use std::time::Duration;

use ledfx::animation::Animation;
use ledfx::artnet::ArtNetClient;
use ledfx::core::{Canvas, Nanos, Rgb8};
use ledfx::config::SessionConfig;
use ledfx::layout::{Device, PixelMapping, compose_device};

struct SinglePixel {
    x: u32,
    y: u32,
    color: Rgb8,
}

impl Animation for SinglePixel {
    fn name(&self) -> &'static str {
        "single pixel"
    }
    fn init(&mut self, _w: u32, _h: u32) {}
    fn update(&mut self, _now: Nanos) -> bool {
        true
    }
    fn pixel(&self, x: u32, y: u32) -> Rgb8 {
        if x == self.x && y == self.y {
            self.color
        } else {
            Rgb8::BLACK
        }
    }
}

fn quad_tile(name: &str, tx: u32, ty: u32) -> Device {
    Device {
        name: name.into(),
        host: "127.0.0.1".into(),
        tile_x: tx,
        tile_y: ty,
        panel_width: 16,
        panel_height: 16,
        universe: 0,
        port: ledfx::artnet::ARTNET_PORT,
        dmx_start_address: 0,
        mapping: PixelMapping::VerticalSerpentine,
    }
}

#[test]
fn quad_canvas_attributes_a_global_pixel_to_one_panel() {
    let config = SessionConfig {
        canvas: Canvas::new(32, 32).unwrap(),
        devices: vec![
            quad_tile("nw", 0, 0),
            quad_tile("ne", 1, 0),
            quad_tile("sw", 0, 1),
            quad_tile("se", 1, 1),
        ],
        brightness: 1.0,
    };
    config.validate().unwrap();

    let anim = SinglePixel {
        x: 20,
        y: 5,
        color: Rgb8::new(200, 100, 50),
    };

    let mut lit_panels = Vec::new();
    for device in &config.devices {
        let channels = compose_device(&anim, device, config.brightness);
        assert_eq!(channels.len(), 16 * 16 * 3);
        let lit: Vec<usize> = channels
            .chunks_exact(3)
            .enumerate()
            .filter(|(_, c)| c != &[0, 0, 0])
            .map(|(i, _)| i)
            .collect();
        if !lit.is_empty() {
            lit_panels.push((device.name.clone(), lit));
        }
    }

    // Global (20, 5) lands on the north-east tile at local (4, 5),
    // LED index 4*16 + (16-1-5) = 74.
    assert_eq!(lit_panels.len(), 1);
    assert_eq!(lit_panels[0].0, "ne");
    assert_eq!(lit_panels[0].1, vec![74]);
}

#[test]
fn composed_frame_arrives_in_panel_channel_order() {
    let receiver = UdpSocket::bind("127.0.0.1:0").unwrap();
    receiver
        .set_read_timeout(Some(Duration::from_millis(500)))
        .unwrap();
    let port = receiver.local_addr().unwrap().port();

    let mut device = quad_tile("ne", 1, 0);
    device.port = port;
    device.universe = 2;

    let anim = SinglePixel {
        x: 20,
        y: 5,
        color: Rgb8::new(200, 100, 50),
    };
    let channels = compose_device(&anim, &device, 1.0);

    let mut client = ArtNetClient::for_device(&device);
    client.connect().unwrap();
    client.send_rgb(&channels, device.led_count()).unwrap();

    let mut buf = [0u8; 2048];
    let n = receiver.recv(&mut buf).unwrap();
    let packet = &buf[..n];
    assert_eq!(&packet[14..16], &[0x02, 0x00]);

    // LED 74, wire order blue, red, green.
    let data = &packet[19..];
    assert_eq!(&data[74 * 3..74 * 3 + 3], &[50, 200, 100]);
    let lit = data.chunks_exact(3).filter(|c| c != &[0, 0, 0]).count();
    assert_eq!(lit, 1);
}
