//! End-to-end tests driving the manager against an in-memory sysrc store.
//!
//! The store models sysrc's observable behavior: bare-key reads print
//! `key: value` (exit 1 when unset), `key="value"` assigns, and
//! `key+="value"` appends to a whitespace-separated list.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use pretty_assertions::assert_eq;

use netifmgrd::{GreSettings, IfaceKind, InterfaceConfig, NetIfMgr, RouteSpec};
use rcnet_common::{CommandRunner, ExecResult, NetCfgResult, ShellRunner, SysrcStore};

#[derive(Default)]
struct MemSysrc {
    entries: Mutex<HashMap<String, String>>,
}

impl MemSysrc {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().unwrap().get(key).cloned()
    }

    fn seed(&self, key: &str, value: &str) {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
    }
}

fn strip_quotes(raw: &str) -> &str {
    raw.strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(raw)
}

#[async_trait]
impl SysrcStore for MemSysrc {
    async fn run(&self, key_or_assignment: &str) -> NetCfgResult<ExecResult> {
        let mut entries = self.entries.lock().unwrap();

        if let Some((key, raw)) = key_or_assignment.split_once("+=") {
            let value = strip_quotes(raw);
            let old = entries.get(key).cloned().unwrap_or_default();
            let combined = format!("{} {}", old, value);
            let normalized = combined.split_whitespace().collect::<Vec<_>>().join(" ");
            let out = format!("{}: {} -> {}", key, old, normalized);
            entries.insert(key.to_string(), normalized);
            return Ok(ExecResult {
                exit_code: 0,
                stdout: out,
                stderr: String::new(),
            });
        }

        if let Some((key, raw)) = key_or_assignment.split_once('=') {
            let value = strip_quotes(raw).to_string();
            let old = entries.get(key).cloned().unwrap_or_default();
            let out = format!("{}: {} -> {}", key, old, value);
            entries.insert(key.to_string(), value);
            return Ok(ExecResult {
                exit_code: 0,
                stdout: out,
                stderr: String::new(),
            });
        }

        let key = key_or_assignment;
        match entries.get(key) {
            Some(value) => Ok(ExecResult {
                exit_code: 0,
                stdout: format!("{}: {}", key, value),
                stderr: String::new(),
            }),
            None => Ok(ExecResult {
                exit_code: 1,
                stdout: String::new(),
                stderr: format!("sysrc: unknown variable '{}'", key),
            }),
        }
    }
}

fn make_mgr(store: Arc<MemSysrc>) -> NetIfMgr {
    // Lifecycle commands are not exercised here; the real runner is inert.
    let runner: Arc<dyn CommandRunner> = Arc::new(ShellRunner);
    NetIfMgr::new(store, runner)
}

#[tokio::test]
async fn routes_written_then_read_back() {
    let store = Arc::new(MemSysrc::default());
    let mgr = make_mgr(store.clone());

    let routes = vec![
        RouteSpec::new("r1", "192.168.1.0", "255.255.255.0", "192.168.1.1"),
        RouteSpec::new("r2", "192.168.2.0", "255.255.255.0", "192.168.1.1"),
    ];
    mgr.build_routes("em0", &routes, false).await.unwrap();

    assert_eq!(store.get("static_routes").as_deref(), Some("r1:em0 r2:em0"));
    assert_eq!(
        store.get("route_r1").as_deref(),
        Some("192.168.1.0 192.168.1.1 255.255.255.0")
    );

    let lines: Vec<String> = mgr
        .get_routes("em0")
        .await
        .unwrap()
        .iter()
        .map(|l| l.render())
        .collect();
    assert_eq!(
        lines,
        vec![
            "static_routes+=\" r1:em0 r2:em0\"".to_string(),
            "route_r1=\"192.168.1.0 192.168.1.1 255.255.255.0\"".to_string(),
            "route_r2=\"192.168.2.0 192.168.1.1 255.255.255.0\"".to_string(),
        ]
    );
}

#[tokio::test]
async fn routes_for_other_iface_are_filtered() {
    let store = Arc::new(MemSysrc::default());
    let mgr = make_mgr(store.clone());

    let em0 = vec![RouteSpec::new(
        "r1",
        "192.168.1.0",
        "255.255.255.0",
        "192.168.1.1",
    )];
    let igb1 = vec![RouteSpec::new(
        "r3",
        "10.10.0.0",
        "255.255.0.0",
        "10.0.0.1",
    )];
    mgr.build_routes("em0", &em0, false).await.unwrap();
    mgr.build_routes("igb1", &igb1, false).await.unwrap();

    assert_eq!(
        store.get("static_routes").as_deref(),
        Some("r1:em0 r3:igb1")
    );

    let lines: Vec<String> = mgr
        .get_routes("igb1")
        .await
        .unwrap()
        .iter()
        .map(|l| l.render())
        .collect();
    assert_eq!(
        lines,
        vec![
            "static_routes+=\" r3:igb1\"".to_string(),
            "route_r3=\"10.10.0.0 10.0.0.1 255.255.0.0\"".to_string(),
        ]
    );
}

#[tokio::test]
async fn no_routes_sentinel_reads_back_empty() {
    let store = Arc::new(MemSysrc::default());
    store.seed("static_routes", "NO");
    let mgr = make_mgr(store);

    let lines = mgr.get_routes("em0").await.unwrap();
    assert!(lines.is_empty());
}

#[tokio::test]
async fn gre_interface_persists_both_entries() {
    let store = Arc::new(MemSysrc::default());
    let mgr = make_mgr(store.clone());

    let config = InterfaceConfig {
        kind: IfaceKind::Gre(GreSettings {
            peer_inner_addr: "10.0.0.2".to_string(),
            tunnel_addr: "1.2.3.4".to_string(),
            tunnel_peer: "5.6.7.8".to_string(),
        }),
        enabled: true,
        ipaddr: "10.0.0.1".to_string(),
        netmask: "255.255.255.252".to_string(),
        dry_run: false,
    };
    let lines = mgr.build_interface("gif0", &config).await.unwrap();

    assert_eq!(lines.len(), 2);
    assert_eq!(
        store.get("ifconfig_gif0").as_deref(),
        Some("inet 10.0.0.1 10.0.0.2 netmask 255.255.255.252 tunnel 1.2.3.4 5.6.7.8")
    );
    assert_eq!(store.get("cloned_interfaces").as_deref(), Some("gif0"));
}

#[tokio::test]
async fn alias_interface_persists_entry() {
    let store = Arc::new(MemSysrc::default());
    let mgr = make_mgr(store.clone());

    let config = InterfaceConfig {
        kind: IfaceKind::Alias,
        enabled: true,
        ipaddr: "10.0.0.2".to_string(),
        netmask: "255.255.255.0".to_string(),
        dry_run: false,
    };
    mgr.build_interface("em0.0", &config).await.unwrap();

    assert_eq!(
        store.get("ifconfig_em0_alias0").as_deref(),
        Some("inet 10.0.0.2 netmask 255.255.255.0")
    );
}
