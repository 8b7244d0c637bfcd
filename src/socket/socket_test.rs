use super::*;

#[test]
fn test_socket_kind_labels() {
    assert_eq!(Socket::TcpActive.kind(), "tcp-active");
    assert_eq!(Socket::TcpPassive.kind(), "tcp-passive");
}

#[tokio::test]
async fn test_unimplemented_variant_send_errors() {
    let sock = Socket::TcpActive;
    let target: SocketAddr = "127.0.0.1:1".parse().unwrap();
    let err = sock.send_to(b"x", target).await.unwrap_err();
    assert!(matches!(err, Error::ErrNotImplemented(_)));
}

#[tokio::test]
async fn test_udp_bsd_round_trip() {
    let a = tokio::net::UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let b = tokio::net::UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let b_addr = b.local_addr().unwrap();
    let sock = Socket::UdpBsd(a);
    sock.send_to(b"hello", b_addr).await.unwrap();
    let mut buf = [0u8; 16];
    let (n, _) = b.recv_from(&mut buf).await.unwrap();
    assert_eq!(&buf[..n], b"hello");
}
