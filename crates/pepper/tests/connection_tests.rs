use {
    pepper::{
        CameraProfile, Command, CommandSink, Connection, ConnectionConfig, FrameSource,
        PepperError,
    },
    std::time::Duration,
    tokio::{
        io::{AsyncReadExt, AsyncWriteExt, DuplexStream},
        net::TcpListener,
    },
};

const TIMEOUT: Duration = Duration::from_secs(5);

fn small_profile() -> CameraProfile {
    CameraProfile::from_id(3).unwrap()
}

/// Answer `count` frame requests with constant payloads, sent in uneven writes.
async fn serve_frames(mut robot: DuplexStream, payload_size: usize, count: usize) -> DuplexStream {
    for i in 0..count {
        let mut request = [0u8; 6];
        robot.read_exact(&mut request).await.unwrap();
        assert_eq!(&request, b"getImg");

        let payload = vec![100 + i as u8; payload_size];
        for chunk in payload.chunks(10_007) {
            robot.write_all(chunk).await.unwrap();
        }
    }
    robot
}

#[tokio::test]
async fn test_frame_round_trip() {
    let profile = small_profile();
    let (client, robot) = tokio::io::duplex(64 * 1024);
    let server = tokio::spawn(serve_frames(robot, profile.payload_size(), 2));

    let mut connection = Connection::from_stream(client, profile, TIMEOUT);
    let first = connection.frame().await.unwrap();
    let second = connection.frame().await.unwrap();

    assert_eq!(first.shape, vec![240, 320, 3]);
    assert!(first.data.iter().all(|&v| v == 100));
    assert!(second.data.iter().all(|&v| v == 101));
    assert_eq!(connection.frames_received(), 2);
    server.await.unwrap();
}

#[tokio::test]
async fn test_frame_source_trait() {
    let profile = small_profile();
    let (client, robot) = tokio::io::duplex(64 * 1024);
    let server = tokio::spawn(serve_frames(robot, profile.payload_size(), 1));

    async fn grab(source: &mut impl FrameSource) -> Result<usize, PepperError> {
        Ok(source.frame().await?.len())
    }

    let mut connection = Connection::from_stream(client, profile, TIMEOUT);
    assert_eq!(connection.frame_size(), profile.size());
    assert_eq!(grab(&mut connection).await.unwrap(), 320 * 240 * 3);
    server.await.unwrap();
}

#[tokio::test]
async fn test_peer_closing_mid_frame() {
    let profile = small_profile();
    let (client, mut robot) = tokio::io::duplex(64 * 1024);
    let server = tokio::spawn(async move {
        let mut request = [0u8; 6];
        robot.read_exact(&mut request).await.unwrap();
        robot.write_all(&[128u8; 1000]).await.unwrap();
    });

    let mut connection = Connection::from_stream(client, profile, TIMEOUT);
    match connection.frame().await {
        Err(PepperError::ConnectionClosed { received, expected }) => {
            assert_eq!(received, 1000);
            assert_eq!(expected, 153_600);
        }
        other => panic!("expected ConnectionClosed, got {:?}", other),
    }
    assert!(!connection.is_open());
    assert!(matches!(
        connection.frame().await,
        Err(PepperError::NotConnected)
    ));
    server.await.unwrap();
}

#[tokio::test]
async fn test_stalled_reply_never_leaks_into_next_frame() {
    let profile = small_profile();
    let (client, mut robot) = tokio::io::duplex(256 * 1024);
    let server = tokio::spawn(async move {
        let mut request = [0u8; 6];
        robot.read_exact(&mut request).await.unwrap();
        robot.write_all(&[10u8; 100_000]).await.unwrap();
        tokio::time::sleep(Duration::from_millis(300)).await;
        // late tail of the first reply, then a full second reply
        let _ = robot.write_all(&[10u8; 53_600]).await;
        let _ = robot.write_all(&vec![200u8; 153_600]).await;
    });

    let mut connection = Connection::from_stream(client, profile, Duration::from_millis(100));
    assert!(matches!(
        connection.frame().await,
        Err(PepperError::Timeout(_))
    ));
    assert!(!connection.is_open());
    assert!(matches!(
        connection.frame().await,
        Err(PepperError::NotConnected)
    ));
    assert_eq!(connection.frames_received(), 0);
    server.await.unwrap();
}

#[tokio::test]
async fn test_commands_are_written_verbatim() {
    let (client, mut robot) = tokio::io::duplex(1024);
    let mut connection = Connection::from_stream(client, small_profile(), TIMEOUT);

    connection.adjust_head(0.2, -0.15).await.unwrap();
    connection.look(0.5, -0.33333).await.unwrap();
    connection.say("hello").await.unwrap();
    connection.enable_tracking().await.unwrap();
    connection.disable_tracking().await.unwrap();
    connection.nod().await.unwrap();
    connection.idle().await.unwrap();
    connection.close().await;

    let mut written = String::new();
    robot.read_to_string(&mut written).await.unwrap();
    assert_eq!(
        written,
        "head 0.20 -0.15look;0.50000;-0.33333say hellotrack Truetrack Falsenodidle"
    );
}

#[tokio::test]
async fn test_command_sink_trait() {
    let (client, mut robot) = tokio::io::duplex(1024);
    let mut connection = Connection::from_stream(client, small_profile(), TIMEOUT);

    async fn center(sink: &mut impl CommandSink) -> Result<(), PepperError> {
        sink.send_command(&Command::Head {
            pitch: 0.0,
            yaw: 0.0,
        })
        .await
    }

    center(&mut connection).await.unwrap();
    let mut buf = [0u8; 14];
    robot.read_exact(&mut buf).await.unwrap();
    assert_eq!(&buf, b"head 0.00 0.00");
}

#[tokio::test]
async fn test_write_failure_propagates() {
    let (client, robot) = tokio::io::duplex(1024);
    drop(robot);

    let mut connection = Connection::from_stream(client, small_profile(), TIMEOUT);
    let result = connection.nod().await;
    assert!(matches!(result, Err(PepperError::Io(_))), "{:?}", result);
}

#[tokio::test]
async fn test_close_is_idempotent() {
    let (client, _robot) = tokio::io::duplex(1024);
    let mut connection = Connection::from_stream(client, small_profile(), TIMEOUT);
    assert!(connection.is_open());

    connection.close().await;
    connection.close().await;
    assert!(!connection.is_open());

    assert!(matches!(
        connection.nod().await,
        Err(PepperError::NotConnected)
    ));
    assert!(matches!(
        connection.frame().await,
        Err(PepperError::NotConnected)
    ));
}

#[tokio::test]
async fn test_connect_over_tcp() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let profile = small_profile();

    let server = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = [0u8; 6];
        socket.read_exact(&mut request).await.unwrap();
        assert_eq!(&request, b"getImg");
        // half the payload, then the rest
        let payload = vec![128u8; profile.payload_size()];
        let (head, tail) = payload.split_at(50_000);
        socket.write_all(head).await.unwrap();
        socket.flush().await.unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;
        socket.write_all(tail).await.unwrap();
    });

    let config = ConnectionConfig::default()
        .with_host("127.0.0.1")
        .with_port(port)
        .with_profile(profile);
    let mut connection = Connection::connect(&config).await.unwrap();
    let frame = connection.frame().await.unwrap();
    assert!(frame.data.iter().all(|&v| v == 128));
    server.await.unwrap();
}

#[tokio::test]
async fn test_connect_refused_is_typed() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let config = ConnectionConfig::default()
        .with_host("127.0.0.1")
        .with_port(port)
        .with_connect_timeout(Duration::from_secs(2));
    match Connection::connect(&config).await {
        Err(PepperError::Connect { address, .. }) => {
            assert_eq!(address, format!("127.0.0.1:{port}"));
        }
        other => panic!("expected Connect error, got {:?}", other),
    }
}
