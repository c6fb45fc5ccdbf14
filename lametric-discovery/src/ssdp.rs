//! SSDP (Simple Service Discovery Protocol) client
//!
//! Sends M-SEARCH requests and parses the unicast replies into
//! [`DiscoveredEndpoint`] records.

use std::collections::HashMap;
use std::net::{SocketAddr, UdpSocket};
use std::time::Duration;

use tracing::trace;

use crate::error::{DiscoveryError, Result};

/// SSDP multicast group used for discovery
pub const SSDP_MULTICAST_ADDR: &str = "239.255.255.250:1900";

/// Multicast TTL: keep M-SEARCH traffic on the local subnet
const MULTICAST_TTL: u32 = 2;

/// M-SEARCH discovery request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    /// Value of the HOST header
    pub host: String,
    /// Maximum wait time devices may delay their answer, in seconds
    pub mx: u32,
    /// Search target, e.g. `upnp:rootdevice` or `ssdp:all`
    pub st: String,
}

impl SearchRequest {
    pub fn new(st: impl Into<String>, mx: u32) -> Self {
        Self {
            host: SSDP_MULTICAST_ADDR.to_string(),
            mx,
            st: st.into(),
        }
    }

    /// Render the request as the CRLF-joined wire format
    pub fn to_wire(&self) -> String {
        [
            "M-SEARCH * HTTP/1.1".to_string(),
            format!("HOST: {}", self.host),
            "MAN: \"ssdp:discover\"".to_string(),
            format!("MX: {}", self.mx),
            format!("ST: {}", self.st),
            String::new(),
            String::new(),
        ]
        .join("\r\n")
    }
}

/// One accepted SSDP response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredEndpoint {
    /// Unique service name identifying the responder
    pub usn: String,
    /// URL of the responder's self-description document
    pub location: Option<String>,
    /// All header fields, keys lower-cased and values trimmed
    pub headers: HashMap<String, String>,
}

impl DiscoveredEndpoint {
    /// Parse a raw SSDP response.
    ///
    /// Returns `None` when the status line is not `HTTP/1.1 200 OK`, when any
    /// header line lacks a colon, or when no `USN` header is present.
    pub fn parse(response: &str) -> Option<Self> {
        let mut lines = response.trim().split("\r\n");

        if lines.next()?.trim() != "HTTP/1.1 200 OK" {
            return None;
        }

        let mut headers = HashMap::new();
        for line in lines {
            if line.trim().is_empty() {
                continue;
            }
            let (key, value) = line.split_once(':')?;
            headers.insert(key.trim().to_lowercase(), value.trim().to_string());
        }

        let usn = headers.get("usn")?.clone();
        let location = headers.get("location").cloned();

        Some(Self {
            usn,
            location,
            headers,
        })
    }

    /// Look up a header by case-insensitive name
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_lowercase()).map(String::as_str)
    }
}

/// Shortest receive timeout; the socket rejects a zero timeout
const MIN_READ_TIMEOUT: Duration = Duration::from_millis(1);

/// SSDP client bound to an ephemeral UDP port
pub(crate) struct SsdpClient {
    socket: UdpSocket,
    target: SocketAddr,
}

impl SsdpClient {
    /// Create a client whose receive timeout bounds each gap between responses.
    /// A zero timeout is raised to one millisecond.
    pub fn new(target: SocketAddr, timeout: Duration) -> Result<Self> {
        let socket = UdpSocket::bind("0.0.0.0:0")
            .map_err(|e| DiscoveryError::NetworkError(format!("Failed to bind UDP socket: {}", e)))?;

        socket
            .set_read_timeout(Some(timeout.max(MIN_READ_TIMEOUT)))
            .map_err(|e| DiscoveryError::NetworkError(format!("Failed to set read timeout: {}", e)))?;

        socket
            .set_multicast_ttl_v4(MULTICAST_TTL)
            .map_err(|e| DiscoveryError::NetworkError(format!("Failed to set multicast TTL: {}", e)))?;

        Ok(Self { socket, target })
    }

    /// Send an M-SEARCH request and return an iterator over the responses
    pub fn search(&self, request: &SearchRequest) -> Result<SsdpResponseIterator<'_>> {
        let wire = request.to_wire();
        trace!(target_addr = %self.target, request = %wire, "sending M-SEARCH");

        self.socket
            .send_to(wire.as_bytes(), self.target)
            .map_err(|e| DiscoveryError::NetworkError(format!("Failed to send M-SEARCH: {}", e)))?;

        Ok(SsdpResponseIterator::new(&self.socket))
    }
}

/// Iterator over accepted SSDP responses; ends at the first receive timeout
pub(crate) struct SsdpResponseIterator<'a> {
    socket: &'a UdpSocket,
    buffer: [u8; 2048],
    finished: bool,
}

impl<'a> SsdpResponseIterator<'a> {
    fn new(socket: &'a UdpSocket) -> Self {
        Self {
            socket,
            buffer: [0; 2048],
            finished: false,
        }
    }
}

impl<'a> Iterator for SsdpResponseIterator<'a> {
    type Item = Result<DiscoveredEndpoint>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.finished {
            match self.socket.recv_from(&mut self.buffer) {
                Ok((size, from)) => {
                    let Ok(text) = std::str::from_utf8(&self.buffer[..size]) else {
                        trace!(%from, "skipping non UTF-8 response");
                        continue;
                    };
                    match DiscoveredEndpoint::parse(text) {
                        Some(endpoint) => return Some(Ok(endpoint)),
                        None => trace!(%from, response = %text, "skipping malformed response"),
                    }
                }
                Err(e)
                    if e.kind() == std::io::ErrorKind::WouldBlock
                        || e.kind() == std::io::ErrorKind::TimedOut =>
                {
                    self.finished = true;
                }
                Err(e) => {
                    self.finished = true;
                    return Some(Err(DiscoveryError::NetworkError(format!(
                        "Socket error: {}",
                        e
                    ))));
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LAMETRIC_RESPONSE: &str = "HTTP/1.1 200 OK\r\n\
        CACHE-CONTROL: max-age=1800\r\n\
        EXT:\r\n\
        LOCATION: http://192.168.1.50:60221/a1b2c3/description.xml\r\n\
        SERVER: Linux/3.10 UPnP/1.0 LaMetric/2.1.0\r\n\
        ST: upnp:rootdevice\r\n\
        USN: uuid:9d1f2b9a-0000-1000-8000-00000000abcd::upnp:rootdevice\r\n\
        \r\n";

    #[test]
    fn test_search_request_wire_format() {
        let request = SearchRequest::new("upnp:rootdevice", 1);
        assert_eq!(
            request.to_wire(),
            "M-SEARCH * HTTP/1.1\r\n\
             HOST: 239.255.255.250:1900\r\n\
             MAN: \"ssdp:discover\"\r\n\
             MX: 1\r\n\
             ST: upnp:rootdevice\r\n\
             \r\n"
        );
    }

    #[test]
    fn test_parse_valid_response() {
        let endpoint = DiscoveredEndpoint::parse(LAMETRIC_RESPONSE).unwrap();

        assert_eq!(
            endpoint.usn,
            "uuid:9d1f2b9a-0000-1000-8000-00000000abcd::upnp:rootdevice"
        );
        assert_eq!(
            endpoint.location.as_deref(),
            Some("http://192.168.1.50:60221/a1b2c3/description.xml")
        );
        assert_eq!(endpoint.header("st"), Some("upnp:rootdevice"));
        assert_eq!(endpoint.header("SERVER"), Some("Linux/3.10 UPnP/1.0 LaMetric/2.1.0"));
        // Empty values are kept
        assert_eq!(endpoint.header("ext"), Some(""));
    }

    #[test]
    fn test_parse_keeps_colons_in_values() {
        let endpoint = DiscoveredEndpoint::parse(LAMETRIC_RESPONSE).unwrap();
        assert_eq!(endpoint.header("cache-control"), Some("max-age=1800"));
        assert!(endpoint.location.unwrap().starts_with("http://"));
    }

    #[test]
    fn test_parse_lowercases_keys() {
        let response = "HTTP/1.1 200 OK\r\n\
            Location: http://10.0.0.2:80/desc.xml\r\n\
            usn: uuid:abc\r\n\
            \r\n";

        let endpoint = DiscoveredEndpoint::parse(response).unwrap();
        assert_eq!(endpoint.usn, "uuid:abc");
        assert_eq!(endpoint.location.as_deref(), Some("http://10.0.0.2:80/desc.xml"));
    }

    #[test]
    fn test_parse_rejects_non_ok_status() {
        let response = "HTTP/1.1 404 Not Found\r\nUSN: uuid:abc\r\n\r\n";
        assert!(DiscoveredEndpoint::parse(response).is_none());

        let notify = "NOTIFY * HTTP/1.1\r\nUSN: uuid:abc\r\n\r\n";
        assert!(DiscoveredEndpoint::parse(notify).is_none());
    }

    #[test]
    fn test_parse_rejects_header_without_colon() {
        let response = "HTTP/1.1 200 OK\r\n\
            USN: uuid:abc\r\n\
            this line is broken\r\n\
            \r\n";
        assert!(DiscoveredEndpoint::parse(response).is_none());
    }

    #[test]
    fn test_parse_requires_usn() {
        let response = "HTTP/1.1 200 OK\r\nLOCATION: http://10.0.0.2/desc.xml\r\n\r\n";
        assert!(DiscoveredEndpoint::parse(response).is_none());
    }

    #[test]
    fn test_parse_empty_and_garbage() {
        assert!(DiscoveredEndpoint::parse("").is_none());
        assert!(DiscoveredEndpoint::parse("This is not a valid SSDP response\r\n").is_none());
    }

    #[test]
    fn test_parse_without_location() {
        let response = "HTTP/1.1 200 OK\r\nUSN: uuid:abc\r\n\r\n";
        let endpoint = DiscoveredEndpoint::parse(response).unwrap();
        assert!(endpoint.location.is_none());
    }
}
