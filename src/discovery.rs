//! Picks the address printed at startup so that people on the same network
//! know where to point their browsers.

use std::net::{IpAddr, Ipv4Addr, SocketAddrV4};

use nix::{ifaddrs::getifaddrs, net::if_::InterfaceFlags};
use tracing::debug;

use crate::Error;

/// One address bound to a network interface, in the order the OS lists them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceAddr {
    pub name: String,
    pub up: bool,
    pub loopback: bool,
    /// `None` for link layer entries and other non IP families.
    pub ip: Option<IpAddr>,
}

/// Returns the first IPv4 address of an interface that is up and is not a
/// loopback device.
pub fn select_advertised_address(interfaces: &[InterfaceAddr]) -> Result<Ipv4Addr, Error> {
    interfaces
        .iter()
        .filter(|interface| interface.up && !interface.loopback)
        .find_map(|interface| match interface.ip {
            Some(IpAddr::V4(ip)) if !ip.is_loopback() => Some(ip),
            _ => None,
        })
        .ok_or(Error::NoAddressFound)
}

/// Enumerates the interfaces of this machine and selects one of their
/// addresses with [`select_advertised_address`].
pub fn advertised_address() -> Result<Ipv4Addr, Error> {
    let interfaces = getifaddrs()
        .map_err(std::io::Error::from)?
        .map(|ifaddr| InterfaceAddr {
            up: ifaddr.flags.contains(InterfaceFlags::IFF_UP),
            loopback: ifaddr.flags.contains(InterfaceFlags::IFF_LOOPBACK),
            ip: ifaddr.address.as_ref().and_then(|address| {
                address
                    .as_sockaddr_in()
                    .map(|sin| IpAddr::V4(*SocketAddrV4::from(*sin).ip()))
                    .or_else(|| address.as_sockaddr_in6().map(|sin6| IpAddr::V6(sin6.ip())))
            }),
            name: ifaddr.interface_name,
        })
        .collect::<Vec<_>>();

    debug!("Found {} interface addresses", interfaces.len());

    select_advertised_address(&interfaces)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn interface(name: &str, up: bool, loopback: bool, ip: Option<&str>) -> InterfaceAddr {
        InterfaceAddr {
            name: name.into(),
            up,
            loopback,
            ip: ip.map(|ip| ip.parse().unwrap()),
        }
    }

    #[test]
    fn first_usable_address_wins() {
        let interfaces = vec![
            interface("lo", true, true, Some("127.0.0.1")),
            interface("eth0", true, false, None),
            interface("eth0", true, false, Some("fe80::1")),
            interface("eth0", true, false, Some("192.168.1.20")),
            interface("wlan0", true, false, Some("10.0.0.7")),
        ];

        assert_eq!(
            select_advertised_address(&interfaces).unwrap(),
            Ipv4Addr::new(192, 168, 1, 20)
        );
    }

    #[test]
    fn down_interfaces_are_skipped() {
        let interfaces = vec![
            interface("eth0", false, false, Some("192.168.1.20")),
            interface("wlan0", true, false, Some("10.0.0.7")),
        ];

        assert_eq!(
            select_advertised_address(&interfaces).unwrap(),
            Ipv4Addr::new(10, 0, 0, 7)
        );
    }

    #[test]
    fn loopback_addresses_on_regular_interfaces_are_skipped() {
        let interfaces = vec![
            interface("dummy0", true, false, Some("127.0.0.2")),
            interface("eth0", true, false, Some("172.16.0.3")),
        ];

        assert_eq!(
            select_advertised_address(&interfaces).unwrap(),
            Ipv4Addr::new(172, 16, 0, 3)
        );
    }

    #[test]
    fn no_address_found() {
        let interfaces = vec![
            interface("lo", true, true, Some("127.0.0.1")),
            interface("eth0", true, false, Some("2001:db8::1")),
            interface("eth1", false, false, Some("192.168.1.20")),
        ];

        assert!(matches!(
            select_advertised_address(&interfaces),
            Err(Error::NoAddressFound)
        ));
        assert!(matches!(select_advertised_address(&[]), Err(Error::NoAddressFound)));
    }
}
