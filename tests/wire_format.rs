use std::net::UdpSocket;
use std::time::Duration;

use ledfx::artnet::{ARTNET_ID, ArtNetClient, LEDS_PER_UNIVERSE, build_packet};

fn loopback_pair(base_universe: u16) -> (UdpSocket, ArtNetClient) {
    let receiver = UdpSocket::bind("127.0.0.1:0").unwrap();
    receiver
        .set_read_timeout(Some(Duration::from_millis(500)))
        .unwrap();
    let port = receiver.local_addr().unwrap().port();
    let mut client = ArtNetClient::new("127.0.0.1", port, base_universe);
    client.connect().unwrap();
    (receiver, client)
}

fn recv_all(receiver: &UdpSocket, expected: usize) -> Vec<Vec<u8>> {
    let mut packets = Vec::new();
    let mut buf = [0u8; 1024];
    while packets.len() < expected {
        let n = receiver.recv(&mut buf).expect("datagram missing");
        packets.push(buf[..n].to_vec());
    }
    packets
}

fn universe_of(packet: &[u8]) -> u16 {
    u16::from_le_bytes([packet[14], packet[15]])
}

fn led_count_of(packet: &[u8]) -> usize {
    let data_length = usize::from(u16::from_be_bytes([packet[16], packet[17]]));
    (data_length - 1) / 3
}

#[test]
fn single_led_packet_is_byte_exact() {
    let packet = build_packet(1, 0, &[0xAA, 0xBB, 0xCC]);
    let expected: Vec<u8> = vec![
        b'A', b'r', b't', b'-', b'N', b'e', b't', 0,
        0x00, 0x50,
        0x00, 0x0E,
        0x00,
        0x00,
        0x01, 0x00,
        0x00, 0x04,
        0x00,
        0xCC, 0xAA, 0xBB,
    ];
    assert_eq!(packet, expected);
}

#[test]
fn full_universe_sends_one_datagram() {
    let (receiver, client) = loopback_pair(0);
    let rgb = vec![0x40u8; LEDS_PER_UNIVERSE * 3];
    client.send_rgb(&rgb, LEDS_PER_UNIVERSE).unwrap();

    let packets = recv_all(&receiver, 1);
    assert_eq!(universe_of(&packets[0]), 0);
    assert_eq!(led_count_of(&packets[0]), 170);

    // Nothing else arrives.
    let mut buf = [0u8; 16];
    assert!(receiver.recv(&mut buf).is_err());
}

#[test]
fn one_extra_led_spills_into_a_second_universe() {
    let (receiver, client) = loopback_pair(9);
    let rgb = vec![0x10u8; 171 * 3];
    client.send_rgb(&rgb, 171).unwrap();

    let packets = recv_all(&receiver, 2);
    assert_eq!(universe_of(&packets[0]), 9);
    assert_eq!(led_count_of(&packets[0]), 170);
    assert_eq!(universe_of(&packets[1]), 10);
    assert_eq!(led_count_of(&packets[1]), 1);
}

#[test]
fn five_hundred_ten_leds_fill_three_universes() {
    let (receiver, client) = loopback_pair(4);
    let rgb = vec![0x7Fu8; 510 * 3];
    client.send_rgb(&rgb, 510).unwrap();

    let packets = recv_all(&receiver, 3);
    for (i, packet) in packets.iter().enumerate() {
        assert_eq!(&packet[..8], ARTNET_ID);
        assert_eq!(universe_of(packet), 4 + i as u16);
        assert_eq!(led_count_of(packet), 170);
    }
}

#[test]
fn channel_order_is_blue_red_green_on_the_wire() {
    let (receiver, client) = loopback_pair(0);
    client.send_rgb(&[1, 2, 3, 4, 5, 6], 2).unwrap();

    let packets = recv_all(&receiver, 1);
    assert_eq!(&packets[0][19..], &[3, 1, 2, 6, 4, 5]);
}
