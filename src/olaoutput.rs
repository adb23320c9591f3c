use std::net::{SocketAddr, UdpSocket};

use eyre::eyre;
use eyre::Result;
use rosc::{encoder, OscMessage, OscPacket, OscType};

use crate::color::Rgb8;
use crate::output::{ColorOrder, Output};

const UNIVERSE_SIZE: usize = 512;

/// Sends frames as a DMX universe to OLA's OSC plugin.
pub struct OlaOutput {
    sock: UdpSocket,
    target_addr: SocketAddr,
    address: String,
    start_channel: usize,
    color_order: ColorOrder,
    buffer: Vec<u8>,
}

impl OlaOutput {
    pub fn new(
        target_addr: SocketAddr,
        universe: u16,
        start_channel: usize,
        color_order: ColorOrder,
        pixel_count: usize,
    ) -> Result<Self> {
        if start_channel + pixel_count * 3 > UNIVERSE_SIZE {
            return Err(eyre!(
                "{} pixels starting at channel {} do not fit into a DMX universe",
                pixel_count,
                start_channel
            ));
        }

        let our_addr = SocketAddr::from(([0, 0, 0, 0], 0));
        let sock = UdpSocket::bind(our_addr)?;

        Ok(OlaOutput {
            sock,
            target_addr,
            address: format!("/dmx/universe/{}", universe),
            start_channel,
            color_order,
            buffer: vec![0; UNIVERSE_SIZE],
        })
    }

    fn encode_frame(&mut self, frame: &[Rgb8]) -> Result<()> {
        if self.start_channel + frame.len() * 3 > UNIVERSE_SIZE {
            return Err(eyre!("Frame of {} pixels exceeds the universe", frame.len()));
        }

        for (i, pixel) in frame.iter().enumerate() {
            let channel = self.start_channel + i * 3;
            self.buffer[channel..channel + 3].copy_from_slice(&self.color_order.arrange(*pixel));
        }
        Ok(())
    }

    fn encode_packet(&self) -> Result<Vec<u8>> {
        encoder::encode(&OscPacket::Message(OscMessage {
            addr: self.address.clone(),
            args: vec![OscType::Blob(self.buffer.clone())],
        }))
        .map_err(|err| eyre!("Cannot encode OSC packet: {:?}", err))
    }
}

impl Output for OlaOutput {
    fn write(&mut self, frame: &[Rgb8]) -> Result<()> {
        self.encode_frame(frame)?;
        let msg_buf = self.encode_packet()?;
        self.sock.send_to(&msg_buf, self.target_addr)?;
        Ok(())
    }

    fn describe(&self) -> String {
        format!("OLA at {} ({})", self.target_addr, self.address)
    }
}

#[cfg(test)]
mod tests {
    use palette::Srgb;
    use rosc::decoder;

    use super::*;

    fn local_output(start_channel: usize, color_order: ColorOrder) -> (OlaOutput, UdpSocket) {
        let receiver = UdpSocket::bind("127.0.0.1:0").unwrap();
        let output = OlaOutput::new(
            receiver.local_addr().unwrap(),
            3,
            start_channel,
            color_order,
            2,
        )
        .unwrap();
        (output, receiver)
    }

    #[test]
    fn rejects_oversized_strips() {
        let target = SocketAddr::from(([127, 0, 0, 1], 7770));
        assert!(OlaOutput::new(target, 0, 0, ColorOrder::Grb, 171).is_err());
        assert!(OlaOutput::new(target, 0, 10, ColorOrder::Grb, 170).is_err());
        assert!(OlaOutput::new(target, 0, 0, ColorOrder::Grb, 170).is_ok());
    }

    #[test]
    fn sends_universe_blob_in_color_order() {
        let (mut output, receiver) = local_output(4, ColorOrder::Grb);
        let frame = [Srgb::new(10u8, 20, 30), Srgb::new(40, 50, 60)];
        output.write(&frame).unwrap();

        let mut buf = [0u8; decoder::MTU];
        let (size, _) = receiver.recv_from(&mut buf).unwrap();
        let packet = decoder::decode(&buf[..size]).unwrap();

        let msg = match packet {
            OscPacket::Message(msg) => msg,
            OscPacket::Bundle(bundle) => panic!("Unexpected bundle {:?}", bundle),
        };
        assert_eq!(msg.addr, "/dmx/universe/3");

        let blob = match &msg.args[..] {
            [OscType::Blob(blob)] => blob.clone(),
            args => panic!("Unexpected arguments {:?}", args),
        };
        assert_eq!(blob.len(), UNIVERSE_SIZE);
        assert_eq!(&blob[..4], &[0, 0, 0, 0]);
        assert_eq!(&blob[4..10], &[20, 10, 30, 50, 40, 60]);
        assert!(blob[10..].iter().all(|v| *v == 0));
    }
}
