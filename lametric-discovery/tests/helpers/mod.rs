//! Test helpers for fixture-based and loopback discovery tests

#![allow(dead_code)]

use std::fs;
use std::net::{SocketAddr, UdpSocket};
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

/// A device description fixture
#[derive(Debug, Clone)]
pub struct DeviceFixture {
    pub name: String,
    pub xml_content: String,
}

impl DeviceFixture {
    /// Load a fixture from the fixtures directory
    pub fn load(filename: &str) -> Self {
        let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
        path.push("tests/fixtures");
        path.push(filename);

        let xml_content = fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("Failed to load fixture {}: {}", filename, e));

        Self {
            name: filename.to_string(),
            xml_content,
        }
    }
}

/// Build an SSDP response advertising `location`
pub fn ssdp_response(usn: &str, location: &str) -> String {
    format!(
        "HTTP/1.1 200 OK\r\n\
         CACHE-CONTROL: max-age=1800\r\n\
         EXT:\r\n\
         LOCATION: {}\r\n\
         SERVER: Linux/3.10 UPnP/1.0 LaMetric/2.1.0\r\n\
         ST: upnp:rootdevice\r\n\
         USN: {}\r\n\r\n",
        location, usn
    )
}

/// Loopback stand-in for the SSDP multicast group.
///
/// For every M-SEARCH it receives, the responder replies with the next
/// scripted batch of datagrams. Once the script is exhausted further
/// requests get no answer. Every received request is forwarded on
/// `requests`.
pub struct SsdpResponder {
    pub addr: SocketAddr,
    pub requests: mpsc::Receiver<String>,
}

impl SsdpResponder {
    pub fn start(rounds: Vec<Vec<String>>) -> Self {
        let socket = UdpSocket::bind("127.0.0.1:0").expect("bind responder");
        socket
            .set_read_timeout(Some(Duration::from_millis(100)))
            .expect("set responder timeout");
        let addr = socket.local_addr().expect("responder address");
        let (tx, requests) = mpsc::channel();

        thread::spawn(move || {
            let mut rounds = rounds.into_iter();
            let mut buffer = [0u8; 2048];
            let mut idle = 0;

            // Exit after ~3s without traffic
            while idle < 30 {
                match socket.recv_from(&mut buffer) {
                    Ok((size, from)) => {
                        idle = 0;
                        let request = String::from_utf8_lossy(&buffer[..size]).to_string();
                        if tx.send(request).is_err() {
                            return;
                        }
                        if let Some(batch) = rounds.next() {
                            for datagram in batch {
                                let _ = socket.send_to(datagram.as_bytes(), from);
                            }
                        }
                    }
                    Err(_) => idle += 1,
                }
            }
        });

        Self { addr, requests }
    }

    /// All M-SEARCH requests received so far
    pub fn received(&self) -> Vec<String> {
        self.requests.try_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_fixture() {
        let fixture = DeviceFixture::load("lametric_time.xml");
        assert!(fixture.xml_content.contains("<?xml"));
        assert!(fixture.xml_content.contains("LaMetric Time"));
    }

    #[test]
    fn test_ssdp_response() {
        let response = ssdp_response("uuid:abc::upnp:rootdevice", "http://10.0.0.2/desc.xml");
        assert!(response.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(response.contains("LOCATION: http://10.0.0.2/desc.xml\r\n"));
        assert!(response.ends_with("\r\n\r\n"));
    }
}
