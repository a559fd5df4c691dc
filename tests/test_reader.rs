use shelf::config::Limits;
use shelf::http::reader::{ReadError, read_header_block};
use tokio::io::AsyncWriteExt;

fn limits() -> Limits {
    Limits {
        max_header_bytes: 64 * 1024,
        io_timeout_secs: 5,
    }
}

#[tokio::test]
async fn test_complete_block_in_one_write() {
    let (mut client, mut server) = tokio::io::duplex(4096);

    client
        .write_all(b"GET / HTTP/1.1\r\nHost: x\r\n\r\n")
        .await
        .unwrap();

    let block = read_header_block(&mut server, &limits()).await.unwrap();
    assert_eq!(&block[..], b"GET / HTTP/1.1\r\nHost: x\r\n\r\n");
}

#[tokio::test]
async fn test_block_split_across_writes() {
    let (mut client, mut server) = tokio::io::duplex(4096);

    let reader = tokio::spawn(async move { read_header_block(&mut server, &limits()).await });

    client.write_all(b"GET / HT").await.unwrap();
    client.write_all(b"TP/1.1\r\nHost: x").await.unwrap();
    client.write_all(b"\r\n\r\n").await.unwrap();

    let block = reader.await.unwrap().unwrap();
    assert_eq!(&block[..], b"GET / HTTP/1.1\r\nHost: x\r\n\r\n");
}

#[tokio::test]
async fn test_bare_linefeed_terminator() {
    let (mut client, mut server) = tokio::io::duplex(4096);

    client.write_all(b"GET / HTTP/1.1\n\n").await.unwrap();

    let block = read_header_block(&mut server, &limits()).await.unwrap();
    assert_eq!(&block[..], b"GET / HTTP/1.1\n\n");
}

#[tokio::test]
async fn test_eof_before_terminator() {
    let (mut client, mut server) = tokio::io::duplex(4096);

    client.write_all(b"GET / HTTP/1.1\r\nHost:").await.unwrap();
    drop(client);

    let result = read_header_block(&mut server, &limits()).await;
    assert!(matches!(result, Err(ReadError::ConnectionClosed)));
}

#[tokio::test]
async fn test_immediate_eof() {
    let (client, mut server) = tokio::io::duplex(4096);
    drop(client);

    let result = read_header_block(&mut server, &limits()).await;
    assert!(matches!(result, Err(ReadError::ConnectionClosed)));
}

#[tokio::test]
async fn test_oversized_header_block() {
    let (mut client, mut server) = tokio::io::duplex(4096);
    let small = Limits {
        max_header_bytes: 128,
        io_timeout_secs: 5,
    };

    // Endless header line, never a terminator; fits the duplex buffer.
    for _ in 0..8 {
        client.write_all(&[b'a'; 64]).await.unwrap();
    }

    let result = read_header_block(&mut server, &small).await;
    assert!(matches!(result, Err(ReadError::TooLarge(128))));
}

#[tokio::test]
async fn test_bytes_past_terminator_are_kept() {
    let (mut client, mut server) = tokio::io::duplex(4096);

    client
        .write_all(b"GET / HTTP/1.1\r\n\r\ntrailing")
        .await
        .unwrap();

    let block = read_header_block(&mut server, &limits()).await.unwrap();
    assert_eq!(&block[..], b"GET / HTTP/1.1\r\n\r\ntrailing");
}

#[tokio::test(start_paused = true)]
async fn test_silent_client_times_out() {
    let (_client, mut server) = tokio::io::duplex(4096);
    let short = Limits {
        max_header_bytes: 1024,
        io_timeout_secs: 1,
    };

    let result = read_header_block(&mut server, &short).await;
    assert!(matches!(result, Err(ReadError::TimedOut)));
}
