//! Network interface manager for FreeBSD rc.conf
//!
//! netifmgrd translates interface and static-route declarations into
//! `sysrc`-managed `/etc/rc.conf` entries and drives interface lifecycle:
//! - Alias interfaces (`ifconfig_<major>_alias<minor>`)
//! - GRE tunnels (`ifconfig_<major>` + `cloned_interfaces`)
//! - Static routes (`route_<name>` + `static_routes`)
//! - Interface up/down (`/etc/rc.d/netif`, `ifconfig`)
//! - Global network apply (hostname + `/etc/netstart`)

pub mod net_mgr;
pub mod rcconf;
pub mod types;

pub use net_mgr::NetIfMgr;
pub use rcconf::ConfigLine;
pub use types::{ApplySettings, GreSettings, IfaceKind, IfaceName, InterfaceConfig, RouteSpec};
