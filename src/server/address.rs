//! Best-guess public address for the startup banner.

use std::net::{IpAddr, Ipv4Addr, UdpSocket};

/// Addresses worth advertising: not loopback, private, link-local or unspecified.
pub fn is_public_ipv4(ip: Ipv4Addr) -> bool {
    !(ip.is_loopback() || ip.is_private() || ip.is_link_local() || ip.is_unspecified())
}

/// The outbound IPv4 address of this host if it looks public, else `0.0.0.0`.
///
/// Connecting a UDP socket sends nothing; it only makes the kernel pick the
/// source address it would route through.
pub fn guess_public_ipv4() -> Ipv4Addr {
    outbound_ipv4()
        .filter(|ip| is_public_ipv4(*ip))
        .unwrap_or(Ipv4Addr::UNSPECIFIED)
}

fn outbound_ipv4() -> Option<Ipv4Addr> {
    let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0)).ok()?;
    socket.connect((Ipv4Addr::new(8, 8, 8, 8), 80)).ok()?;
    match socket.local_addr().ok()?.ip() {
        IpAddr::V4(ip) => Some(ip),
        IpAddr::V6(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn private_ranges_are_skipped() {
        for ip in [
            Ipv4Addr::new(127, 0, 0, 1),
            Ipv4Addr::new(10, 1, 2, 3),
            Ipv4Addr::new(172, 16, 0, 1),
            Ipv4Addr::new(172, 31, 255, 254),
            Ipv4Addr::new(192, 168, 1, 10),
            Ipv4Addr::UNSPECIFIED,
        ] {
            assert!(!is_public_ipv4(ip), "{ip} should not be public");
        }
    }

    #[test]
    fn public_ranges_are_kept() {
        assert!(is_public_ipv4(Ipv4Addr::new(203, 0, 113, 7)));
        assert!(is_public_ipv4(Ipv4Addr::new(172, 32, 0, 1)));
    }

    #[test]
    fn guess_never_returns_a_private_address() {
        let ip = guess_public_ipv4();
        assert!(ip.is_unspecified() || is_public_ipv4(ip));
    }
}
