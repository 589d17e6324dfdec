//! Interface and route type definitions

use rcnet_common::{FieldValues, FieldValuesExt, NetCfgError, NetCfgResult};

/// An interface name split into its major and minor parts.
///
/// The minor part is the substring after the first `.` and is absent when
/// the name carries no dot (`em0.0` → major `em0`, minor `0`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IfaceName {
    /// The base device name (e.g., `em0`).
    pub major: String,
    /// The alias/unit suffix, if any.
    pub minor: Option<String>,
}

impl IfaceName {
    /// Parses an interface name, lowercasing it first.
    pub fn parse(iface: &str) -> Self {
        let iface = iface.to_lowercase();
        match iface.split_once('.') {
            Some((major, minor)) => Self {
                major: major.to_string(),
                minor: Some(minor.to_string()),
            },
            None => Self {
                major: iface,
                minor: None,
            },
        }
    }
}

/// GRE tunnel parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GreSettings {
    /// The far end address to route packets to.
    pub peer_inner_addr: String,
    /// The address to send/receive GRE packets at.
    pub tunnel_addr: String,
    /// The address to send GRE packets to.
    pub tunnel_peer: String,
}

/// Supported interface kinds, each carrying its required fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IfaceKind {
    /// A secondary IP address bound to an existing interface.
    Alias,
    /// A GRE tunnel, cloned at boot via `cloned_interfaces`.
    Gre(GreSettings),
}

impl IfaceKind {
    /// Parses a kind name and its type-specific settings.
    ///
    /// Fails with a validation error on an unknown kind or a missing
    /// required field.
    pub fn from_settings(kind: &str, iface: &str, settings: &FieldValues) -> NetCfgResult<Self> {
        match kind.to_lowercase().as_str() {
            "alias" => Ok(IfaceKind::Alias),
            "gre" => Ok(IfaceKind::Gre(GreSettings {
                peer_inner_addr: require_opt("peer_inner_addr", iface, settings)?,
                tunnel_addr: require_opt("tunnel_addr", iface, settings)?,
                tunnel_peer: require_opt("tunnel_peer", iface, settings)?,
            })),
            other => Err(NetCfgError::invalid_config(
                "iface_type",
                format!("bad interface type '{}', not one of [gre, alias]", other),
            )),
        }
    }

    /// Returns the kind name.
    pub fn name(&self) -> &'static str {
        match self {
            IfaceKind::Alias => "alias",
            IfaceKind::Gre(_) => "gre",
        }
    }
}

fn require_opt(opt: &str, iface: &str, settings: &FieldValues) -> NetCfgResult<String> {
    settings
        .get_field(opt)
        .map(str::to_string)
        .ok_or_else(|| {
            NetCfgError::invalid_config(
                opt,
                format!("option '{}' not supplied for interface {}", opt, iface),
            )
        })
}

/// Full interface configuration for one `build_interface` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceConfig {
    /// The interface kind and its type-specific fields.
    pub kind: IfaceKind,
    /// Desired admin state. Carried for callers; rc.conf has no separate
    /// enabled flag for these entry kinds.
    pub enabled: bool,
    /// Interface address.
    pub ipaddr: String,
    /// Interface netmask.
    pub netmask: String,
    /// When set, formatted lines are returned without being persisted.
    pub dry_run: bool,
}

impl InterfaceConfig {
    /// Builds a typed configuration from a settings bag.
    pub fn from_settings(
        kind: &str,
        iface: &str,
        enabled: bool,
        settings: &FieldValues,
        dry_run: bool,
    ) -> NetCfgResult<Self> {
        Ok(Self {
            kind: IfaceKind::from_settings(kind, iface, settings)?,
            enabled,
            ipaddr: require_opt("ipaddr", iface, settings)?,
            netmask: require_opt("netmask", iface, settings)?,
            dry_run,
        })
    }
}

/// One static route declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteSpec {
    /// Route name, unique within one `build_routes` call.
    pub name: String,
    /// Destination address.
    pub ipaddr: String,
    /// Destination netmask.
    pub netmask: String,
    /// Gateway address.
    pub gateway: String,
}

impl RouteSpec {
    pub fn new(
        name: impl Into<String>,
        ipaddr: impl Into<String>,
        netmask: impl Into<String>,
        gateway: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            ipaddr: ipaddr.into(),
            netmask: netmask.into(),
            gateway: gateway.into(),
        }
    }

    /// Parses a stored route value (`<ipaddr> <gateway> <netmask>`) back
    /// into structured form.
    pub fn parse_value(name: &str, value: &str) -> NetCfgResult<Self> {
        let fields: Vec<&str> = value.split_whitespace().collect();
        match fields.as_slice() {
            [ipaddr, gateway, netmask] => Ok(Self {
                name: name.to_string(),
                ipaddr: ipaddr.to_string(),
                netmask: netmask.to_string(),
                gateway: gateway.to_string(),
            }),
            _ => Err(NetCfgError::store(
                format!("route_{}", name),
                format!("malformed route value '{}'", value),
            )),
        }
    }
}

/// Settings for a global network apply.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplySettings {
    /// Apply a hostname change before restarting the network.
    /// Default: false.
    pub apply_hostname: bool,
    /// The hostname to apply. Ignored unless `apply_hostname` is set.
    pub hostname: Option<String>,
    /// Log a reboot-required notice instead of restarting the network.
    /// Default: false.
    pub require_reboot: bool,
}
