//! End-to-end link scenarios over realistic inbound records.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde_json::{Value, json};
use xui_inbound::{ClientTraffic, Inbound, InboundSettings, Protocol};
use xui_link::{
    ClientGenerator, LinkContext, LinkError, NewClient, add_client_with_link, client_link,
    shadowsocks_link, trojan_link, vless_link, vmess_link,
};

const UUID: &str = "9cf47c17-6512-40ec-87e0-e59801366929";

fn ctx() -> LinkContext {
    LinkContext::new().at(1_700_000_000)
}

fn rng() -> StdRng {
    StdRng::seed_from_u64(2024)
}

fn inbound(protocol: Protocol, port: u16, settings: Value, stream: Value) -> Inbound {
    let mut inbound = Inbound::new(protocol, port);
    inbound.settings = settings.to_string();
    inbound.stream_settings = stream.to_string();
    inbound
}

fn ws_tls_vless() -> Inbound {
    inbound(
        Protocol::Vless,
        443,
        json!({ "clients": [{ "id": UUID, "email": "alice", "enable": true }], "decryption": "none" }),
        json!({
            "network": "ws",
            "security": "tls",
            "wsSettings": { "path": "/ws", "host": "example.com" },
            "tlsSettings": { "serverName": "example.com" }
        }),
    )
}

/// Split `scheme://cred@host:port?...` into its structural fields.
fn structure(link: &str) -> (String, String, String, u16) {
    let (scheme, rest) = link.split_once("://").unwrap();
    let (cred, rest) = rest.split_once('@').unwrap();
    let authority = rest.split(['?', '#']).next().unwrap();
    let (host, port) = authority.rsplit_once(':').unwrap();
    (scheme.to_string(), cred.to_string(), host.to_string(), port.parse().unwrap())
}

fn vmess_object(link: &str) -> Value {
    let payload = link.strip_prefix("vmess://").unwrap();
    serde_json::from_slice(&STANDARD.decode(payload).unwrap()).unwrap()
}

#[test]
fn vless_websocket_tls_link_is_exact() {
    let link = vless_link(&ws_tls_vless(), "1.2.3.4", "alice", &ctx(), &mut rng()).unwrap();
    assert_eq!(
        link,
        "vless://9cf47c17-6512-40ec-87e0-e59801366929@1.2.3.4:443\
         ?type=ws&path=%2Fws&host=example.com&security=tls&sni=example.com#alice"
    );

    let url = url::Url::parse(&link).unwrap();
    assert_eq!(url.username(), UUID);
    assert_eq!(url.host_str(), Some("1.2.3.4"));
    assert_eq!(url.port(), Some(443));
    assert_eq!(url.fragment(), Some("alice"));
}

#[test]
fn shadowsocks_2022_credential_segment() {
    let inbound = inbound(
        Protocol::Shadowsocks,
        8388,
        json!({
            "method": "2022-blake3-aes-128-gcm",
            "password": "ABCDEF",
            "clients": [{ "password": "ghijkl", "email": "bob", "enable": true }]
        }),
        json!({ "network": "tcp", "security": "none" }),
    );
    let link = shadowsocks_link(&inbound, "9.9.9.9", "bob", &ctx(), &mut rng()).unwrap();
    let (scheme, cred, host, port) = structure(&link);
    assert_eq!(scheme, "ss");
    assert_eq!(cred, STANDARD.encode("2022-blake3-aes-128-gcm:ABCDEF:ghijkl"));
    assert_eq!((host.as_str(), port), ("9.9.9.9", 8388));
}

#[test]
fn vmess_fan_out_strips_tls_fields_for_forced_none() {
    let inbound = inbound(
        Protocol::Vmess,
        443,
        json!({ "clients": [{ "id": UUID, "security": "auto", "email": "alice" }] }),
        json!({
            "network": "ws",
            "security": "tls",
            "wsSettings": { "path": "/vm" },
            "tlsSettings": {
                "serverName": "vm.example.com",
                "alpn": ["h2", "http/1.1"],
                "settings": { "fingerprint": "chrome", "allowInsecure": true }
            },
            "externalProxy": [
                { "forceTls": "same", "dest": "cdn1.example.com", "port": 443, "remark": "cdn1" },
                { "forceTls": "none", "dest": "cdn2.example.com", "port": 80.0, "remark": "cdn2" }
            ]
        }),
    );
    let links = vmess_link(&inbound, "ignored", "alice", &ctx(), &mut rng()).unwrap();
    let segments: Vec<&str> = links.split('\n').collect();
    assert_eq!(segments.len(), 2);

    let same = vmess_object(segments[0]);
    assert_eq!(same["add"], "cdn1.example.com");
    assert_eq!(same["tls"], "tls");
    assert_eq!(same["alpn"], "h2,http/1.1");
    assert_eq!(same["sni"], "vm.example.com");
    assert_eq!(same["fp"], "chrome");
    assert_eq!(same["allowInsecure"], true);
    assert_eq!(same["ps"], "alice cdn1");

    let none = vmess_object(segments[1]);
    assert_eq!(none["add"], "cdn2.example.com");
    assert_eq!(none["port"], 80);
    assert_eq!(none["tls"], "none");
    for key in ["alpn", "sni", "fp", "allowInsecure"] {
        assert!(none.get(key).is_none(), "{key} should be stripped");
    }
    assert_eq!(none["id"], UUID);
}

#[test]
fn uri_fan_out_keeps_entry_order_and_overrides() {
    let inbound = inbound(
        Protocol::Trojan,
        443,
        json!({ "clients": [{ "password": "pw", "email": "t" }] }),
        json!({
            "network": "tcp",
            "security": "tls",
            "tlsSettings": { "serverName": "t.example.com", "alpn": ["h2"] },
            "externalProxy": [
                { "forceTls": "none", "dest": "a.example", "port": 80, "remark": "A" },
                { "forceTls": "same", "dest": "b.example", "port": 443, "remark": "B" },
                { "forceTls": "reality", "dest": "c.example", "port": 8443, "remark": "C" }
            ]
        }),
    );
    let links = trojan_link(&inbound, "ignored", "t", &ctx(), &mut rng()).unwrap();
    let segments: Vec<&str> = links.lines().collect();
    assert_eq!(
        segments,
        [
            "trojan://pw@a.example:80?type=tcp&security=none#t%20A",
            "trojan://pw@b.example:443?type=tcp&security=tls&alpn=h2&sni=t.example.com#t%20B",
            "trojan://pw@c.example:8443?type=tcp&security=reality&alpn=h2&sni=t.example.com#t%20C",
        ]
    );
}

#[test]
fn structural_fields_round_trip_for_every_protocol() {
    let cases = [
        (Protocol::Vless, json!({ "id": UUID, "email": "x" }), UUID.to_string()),
        (Protocol::Trojan, json!({ "password": "tr0jan", "email": "x" }), "tr0jan".to_string()),
        (
            Protocol::Shadowsocks,
            json!({ "password": "sspw", "email": "x" }),
            STANDARD.encode("aes-256-gcm:sspw"),
        ),
    ];
    for (protocol, client, credential) in cases {
        let scheme = match protocol {
            Protocol::Shadowsocks => "ss".to_string(),
            ref other => other.as_str().to_string(),
        };
        let inbound = inbound(
            protocol,
            2053,
            json!({ "method": "aes-256-gcm", "clients": [client] }),
            json!({ "network": "tcp" }),
        );
        let link = client_link(&inbound, "203.0.113.5", "x", &ctx(), &mut rng()).unwrap();
        assert_eq!(structure(&link), (scheme, credential, "203.0.113.5".to_string(), 2053));
    }

    let vmess = inbound(
        Protocol::Vmess,
        2053,
        json!({ "clients": [{ "id": UUID, "email": "x" }] }),
        json!({ "network": "tcp" }),
    );
    let obj = vmess_object(&client_link(&vmess, "203.0.113.5", "x", &ctx(), &mut rng()).unwrap());
    assert_eq!(obj["add"], "203.0.113.5");
    assert_eq!(obj["port"], 2053);
    assert_eq!(obj["id"], UUID);
}

#[test]
fn reality_links_are_deterministic_per_seed() {
    let inbound = inbound(
        Protocol::Vless,
        443,
        json!({ "clients": [{ "id": UUID, "email": "r", "flow": "xtls-rprx-vision" }] }),
        json!({
            "network": "tcp",
            "security": "reality",
            "realitySettings": {
                "serverNames": ["a.com", "b.com", "c.com"],
                "shortIds": ["", "0123", "abcdef"],
                "settings": { "publicKey": "PBK", "fingerprint": "chrome" }
            }
        }),
    );
    let first = vless_link(&inbound, "h", "r", &ctx(), &mut StdRng::seed_from_u64(1)).unwrap();
    let again = vless_link(&inbound, "h", "r", &ctx(), &mut StdRng::seed_from_u64(1)).unwrap();
    assert_eq!(first, again);

    // other seeds may only change sni, sid and spx
    let strip = |link: &str| -> Vec<(String, String)> {
        let url = url::Url::parse(link).unwrap();
        url.query_pairs()
            .filter(|(k, _)| !matches!(k.as_ref(), "sni" | "sid" | "spx"))
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    };
    for seed in 2..20 {
        let other = vless_link(&inbound, "h", "r", &ctx(), &mut StdRng::seed_from_u64(seed)).unwrap();
        assert_eq!(strip(&first), strip(&other));
    }
}

#[test]
fn mismatches_and_unknown_emails_are_empty() {
    let vless = ws_tls_vless();
    assert_eq!(vmess_link(&vless, "h", "alice", &ctx(), &mut rng()).unwrap(), "");
    assert_eq!(trojan_link(&vless, "h", "alice", &ctx(), &mut rng()).unwrap(), "");
    assert_eq!(shadowsocks_link(&vless, "h", "alice", &ctx(), &mut rng()).unwrap(), "");
    assert_eq!(vless_link(&vless, "h", "ghost@nowhere", &ctx(), &mut rng()).unwrap(), "");

    let socks = inbound(Protocol::from("socks"), 1080, json!({}), json!({}));
    assert_eq!(client_link(&socks, "h", "alice", &ctx(), &mut rng()).unwrap(), "");
}

#[test]
fn malformed_blobs_are_hard_errors() {
    let mut broken = ws_tls_vless();
    broken.stream_settings = "{\"network\": \"ws\",".into();
    let err = vless_link(&broken, "h", "alice", &ctx(), &mut rng()).unwrap_err();
    assert!(matches!(err, LinkError::Decode(_)));

    let mut broken = ws_tls_vless();
    broken.settings = "[{".into();
    assert_eq!(
        vless_link(&broken, "h", "alice", &ctx(), &mut rng()).unwrap_err().error_kind(),
        "decode"
    );
}

#[test]
fn missing_optional_fields_never_fail() {
    let inbound = inbound(
        Protocol::Vless,
        443,
        json!({ "clients": [{ "email": "bare" }] }),
        json!({ "network": "xhttp", "security": "tls", "tlsSettings": "oops", "externalProxy": {} }),
    );
    let link = vless_link(&inbound, "h", "bare", &ctx(), &mut rng()).unwrap();
    assert_eq!(link, "vless://@h:443?type=xhttp&path=&host=&mode=&security=tls#bare");
}

#[test]
fn oversized_traffic_counters_keep_the_plain_remark() {
    let mut inbound = ws_tls_vless();
    inbound.client_stats.push(ClientTraffic {
        email: "alice".into(),
        enable: true,
        total: 10,
        up: i64::MAX,
        down: 10,
        ..Default::default()
    });
    let ctx = LinkContext::new().with_show_info(true).at(0);
    let link = vless_link(&inbound, "1.2.3.4", "alice", &ctx, &mut rng()).unwrap();
    assert!(link.ends_with("&security=tls&sni=example.com#alice"), "{link}");
}

fn tcp_tls_trojan(proxies: Value) -> Inbound {
    inbound(
        Protocol::Trojan,
        443,
        json!({ "clients": [{ "password": "pw", "email": "a" }] }),
        json!({
            "network": "tcp",
            "security": "tls",
            "tlsSettings": { "serverName": "s" },
            "externalProxy": proxies
        }),
    )
}

#[test]
fn external_proxy_without_force_tls_keeps_security() {
    let inbound = tcp_tls_trojan(json!([
        { "dest": "x", "port": 1 },
        { "forceTls": "", "dest": "y", "port": 2 }
    ]));
    let links = trojan_link(&inbound, "ignored", "a", &ctx(), &mut rng()).unwrap();
    assert_eq!(
        links,
        "trojan://pw@x:1?type=tcp&security=tls&sni=s#a
         trojan://pw@y:2?type=tcp&security=tls&sni=s#a"
    );
}

#[test]
fn transport_keys_in_uri_links() {
    let cases = [
        (
            json!({ "network": "kcp", "kcpSettings": { "header": { "type": "wechat-video" }, "seed": "s33d" } }),
            "type=kcp&headerType=wechat-video&seed=s33d&security=none",
        ),
        (
            json!({ "network": "httpupgrade", "httpupgradeSettings": { "path": "/up", "host": "h.example" } }),
            "type=httpupgrade&path=%2Fup&host=h.example&security=none",
        ),
        (
            json!({ "network": "xhttp", "xhttpSettings": { "path": "/x", "mode": "packet-up" } }),
            "type=xhttp&path=%2Fx&host=&mode=packet-up&security=none",
        ),
    ];
    for (stream, query) in cases {
        let inbound = inbound(
            Protocol::Trojan,
            8443,
            json!({ "clients": [{ "password": "pw", "email": "t" }] }),
            stream,
        );
        let link = trojan_link(&inbound, "h", "t", &ctx(), &mut rng()).unwrap();
        assert_eq!(link, format!("trojan://pw@h:8443?{query}#t"));
    }
}

#[test]
fn add_client_then_link() {
    let mut inbound = ws_tls_vless();
    inbound.remark = "EU".into();
    let result = add_client_with_link(
        &mut inbound,
        &NewClient::new("bob"),
        "panel.example.com:2053",
        &ClientGenerator::default(),
        &ctx(),
        &mut rng(),
    )
    .unwrap();

    assert_eq!(result.email, "bob");
    assert!(result.link.starts_with(&format!("vless://{}@panel.example.com:443?", result.uuid)));
    assert!(result.link.ends_with("#EU%20bob"));

    let settings = InboundSettings::parse(&inbound.settings).unwrap();
    assert_eq!(settings.clients.len(), 2);
    let added = settings.client("bob").unwrap();
    assert_eq!(added.id.as_deref(), Some(result.uuid.as_str()));
    assert_eq!(added.sub_id.len(), 16);
    assert!(added.enable);
    assert_eq!(added.created_at, 1_700_000_000_000);

    let again = add_client_with_link(
        &mut inbound,
        &NewClient::new("bob"),
        "panel.example.com",
        &ClientGenerator::default(),
        &ctx(),
        &mut rng(),
    );
    assert!(matches!(again, Err(LinkError::ClientExists(email)) if email == "bob"));
}

#[test]
fn add_client_rejects_unsupported_protocols() {
    let mut inbound = inbound(Protocol::from("wireguard"), 51820, json!({}), json!({}));
    let before = inbound.settings.clone();
    let err = add_client_with_link(
        &mut inbound,
        &NewClient::new("w"),
        "h",
        &ClientGenerator::default(),
        &ctx(),
        &mut rng(),
    )
    .unwrap_err();
    assert_eq!(err.to_string(), "unsupported protocol: wireguard");
    assert_eq!(inbound.settings, before);
}
