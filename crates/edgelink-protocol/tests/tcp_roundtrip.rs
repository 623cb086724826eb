//! Integration test: TCP peer link roundtrip on loopback.

use std::net::SocketAddr;

use edgelink_protocol::{connect, TcpTransport};
use edgelink_types::{Message, Peer, PeerId, ProtocolVersion, Screen, ScreenOwner, PROTOCOL_VERSION};

fn test_screen(name: &str) -> Screen {
    Screen {
        id: format!("{name}-0"),
        name: name.to_string(),
        origin_x: 0,
        origin_y: 0,
        width: 1920,
        height: 1080,
        is_primary: true,
        owner: ScreenOwner::Local,
    }
}

#[tokio::test]
async fn hello_connected_handshake_on_loopback() {
    let bind_addr: SocketAddr = "127.0.0.1:0".parse().unwrap();
    let transport = TcpTransport::bind(bind_addr).await.unwrap();
    let server_addr = transport.local_addr().unwrap();

    let server = tokio::spawn(async move {
        let conn = transport.accept().await.unwrap();

        let hello = conn.recv().await.unwrap().unwrap();
        match hello {
            Message::Hello { version, name, .. } => {
                assert_eq!(version, PROTOCOL_VERSION);
                assert_eq!(name, "test-client");
            }
            other => panic!("expected Hello, got {other:?}"),
        }

        conn.send(&Message::Connected {
            version: PROTOCOL_VERSION,
            id: PeerId::new(),
            name: "test-server".to_string(),
            platform: "linux".to_string(),
            screens: vec![test_screen("server")],
        })
        .await
        .unwrap();
    });

    let conn = connect(server_addr).await.unwrap();
    conn.send(&Message::Hello {
        version: PROTOCOL_VERSION,
        id: PeerId::new(),
        name: "test-client".to_string(),
        platform: "linux".to_string(),
        screens: vec![test_screen("client")],
    })
    .await
    .unwrap();

    let welcome = conn.recv().await.unwrap().unwrap();
    match welcome {
        Message::Connected { name, screens, .. } => {
            assert_eq!(name, "test-server");
            assert_eq!(screens.len(), 1);
        }
        other => panic!("expected Connected, got {other:?}"),
    }

    server.await.unwrap();
}

#[tokio::test]
async fn ping_pong_roundtrip() {
    let transport = TcpTransport::bind("127.0.0.1:0".parse().unwrap()).await.unwrap();
    let server_addr = transport.local_addr().unwrap();

    let server = tokio::spawn(async move {
        let conn = transport.accept().await.unwrap();
        let msg = conn.recv().await.unwrap().unwrap();
        assert!(matches!(msg, Message::Ping {}));
        conn.send(&Message::Pong {}).await.unwrap();
    });

    let conn = connect(server_addr).await.unwrap();
    conn.send(&Message::Ping {}).await.unwrap();
    let reply = conn.recv().await.unwrap().unwrap();
    assert!(matches!(reply, Message::Pong {}));

    server.await.unwrap();
}

#[tokio::test]
async fn stream_closed_surfaces_as_none_on_recv() {
    let transport = TcpTransport::bind("127.0.0.1:0".parse().unwrap()).await.unwrap();
    let server_addr = transport.local_addr().unwrap();

    let server = tokio::spawn(async move {
        let conn = transport.accept().await.unwrap();
        drop(conn);
    });

    let conn = connect(server_addr).await.unwrap();
    server.await.unwrap();

    let result = conn.recv().await.unwrap();
    assert!(result.is_none());
}

#[allow(dead_code)]
fn unused_peer_field_check(p: &Peer, v: ProtocolVersion) -> bool {
    p.id != PeerId::new() && v == PROTOCOL_VERSION
}
