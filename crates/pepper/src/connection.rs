use {
    crate::*,
    base::{Tensor, Vec2},
    std::{io, time::Duration},
    tokio::{
        io::{AsyncRead, AsyncWrite, AsyncWriteExt},
        net::TcpStream,
        time::timeout,
    },
};

/// A single socket to the robot, carrying commands out and frames back.
///
/// The connection has one owner; every operation takes `&mut self`, so a
/// frame request and its reply can never interleave with another caller.
pub struct Connection<S = TcpStream> {
    stream: Option<S>,
    profile: CameraProfile,
    read_timeout: Duration,
    frames_received: u64,
}

impl<S> std::fmt::Debug for Connection<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("open", &self.stream.is_some())
            .field("profile", &self.profile)
            .field("read_timeout", &self.read_timeout)
            .field("frames_received", &self.frames_received)
            .finish()
    }
}

impl Connection<TcpStream> {
    /// Open a TCP connection to the robot described by `config`.
    ///
    /// Fails with `PepperError::Connect` when the endpoint is unreachable or
    /// does not answer within the connect timeout.
    pub async fn connect(config: &ConnectionConfig) -> Result<Self, PepperError> {
        let address = config.address();
        let stream = match timeout(config.connect_timeout(), TcpStream::connect(&address)).await {
            Ok(Ok(stream)) => stream,
            Ok(Err(source)) => return Err(PepperError::Connect { address, source }),
            Err(_) => {
                return Err(PepperError::Connect {
                    address,
                    source: io::Error::new(io::ErrorKind::TimedOut, "connect timed out"),
                });
            }
        };
        // commands are tiny and must not sit in Nagle's buffer
        if let Err(source) = stream.set_nodelay(true) {
            return Err(PepperError::Connect { address, source });
        }

        log::info!(
            "connected to {} (camera profile {}, {}x{})",
            address,
            config.profile().id(),
            config.profile().width(),
            config.profile().height()
        );
        Ok(Self::from_stream(
            stream,
            config.profile(),
            config.read_timeout(),
        ))
    }
}

impl<S: AsyncRead + AsyncWrite + Unpin> Connection<S> {
    /// Wrap an already established transport.
    pub fn from_stream(stream: S, profile: CameraProfile, read_timeout: Duration) -> Self {
        Self {
            stream: Some(stream),
            profile,
            read_timeout,
            frames_received: 0,
        }
    }

    pub fn profile(&self) -> CameraProfile {
        self.profile
    }

    pub fn is_open(&self) -> bool {
        self.stream.is_some()
    }

    /// Number of frames decoded since the connection was opened.
    pub fn frames_received(&self) -> u64 {
        self.frames_received
    }

    fn stream_mut(&mut self) -> Result<&mut S, PepperError> {
        self.stream.as_mut().ok_or(PepperError::NotConnected)
    }

    /// Write a command in full. Nothing is read back.
    pub async fn send_command(&mut self, command: &Command) -> Result<(), PepperError> {
        let stream = self.stream_mut()?;
        stream.write_all(&command.to_bytes()).await?;
        stream.flush().await?;
        log::debug!("sent command: {}", command);
        Ok(())
    }

    /// Request one frame and block until its payload is fully received and decoded.
    ///
    /// A failed payload read closes the connection; later calls return
    /// `PepperError::NotConnected`.
    pub async fn frame(&mut self) -> Result<Tensor<u8>, PepperError> {
        let profile = self.profile;
        let read_timeout = self.read_timeout;

        self.send_command(&Command::GetImg).await?;
        let stream = self.stream_mut()?;
        let payload = match read_payload(stream, profile.payload_size(), read_timeout).await {
            Ok(payload) => payload,
            Err(error) => {
                // the rest of the reply may still arrive, so the stream is out of step
                log::warn!("frame request failed, dropping connection: {}", error);
                self.close().await;
                return Err(error);
            }
        };

        let frame = decode_frame(&profile, &payload)?;
        self.frames_received += 1;
        Ok(frame)
    }

    pub async fn say(&mut self, text: &str) -> Result<(), PepperError> {
        self.send_command(&Command::Say(text.to_string())).await
    }

    pub async fn enable_tracking(&mut self) -> Result<(), PepperError> {
        self.send_command(&Command::Track(true)).await
    }

    pub async fn disable_tracking(&mut self) -> Result<(), PepperError> {
        self.send_command(&Command::Track(false)).await
    }

    pub async fn nod(&mut self) -> Result<(), PepperError> {
        self.send_command(&Command::Nod).await
    }

    pub async fn adjust_head(&mut self, pitch: f64, yaw: f64) -> Result<(), PepperError> {
        self.send_command(&Command::Head { pitch, yaw }).await
    }

    pub async fn idle(&mut self) -> Result<(), PepperError> {
        self.send_command(&Command::Idle).await
    }

    pub async fn look(&mut self, x: f64, y: f64) -> Result<(), PepperError> {
        self.send_command(&Command::Look { x, y }).await
    }

    /// Shut the socket down. Calling it again is a no-op.
    pub async fn close(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            if let Err(error) = stream.shutdown().await {
                log::debug!("shutdown after close: {}", error);
            }
            log::info!("connection closed after {} frames", self.frames_received);
        }
    }
}

impl<S: AsyncRead + AsyncWrite + Unpin> FrameSource for Connection<S> {
    async fn frame(&mut self) -> Result<Tensor<u8>, PepperError> {
        Connection::frame(self).await
    }

    fn frame_size(&self) -> Vec2<usize> {
        self.profile.size()
    }
}

impl<S: AsyncRead + AsyncWrite + Unpin> CommandSink for Connection<S> {
    async fn send_command(&mut self, command: &Command) -> Result<(), PepperError> {
        Connection::send_command(self, command).await
    }
}
