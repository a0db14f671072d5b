use {crate::*, std::time::Duration};

const DEFAULT_HOST: &str = "10.15.3.25";
const DEFAULT_PORT: u16 = 12345;
const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 5000;
const DEFAULT_READ_TIMEOUT_MS: u64 = 5000;

/// Where the robot listens and which camera mode to use.
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    host: String,
    port: u16,
    profile: CameraProfile,
    connect_timeout: Duration,
    read_timeout: Duration,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            profile: CameraProfile::default(),
            connect_timeout: Duration::from_millis(DEFAULT_CONNECT_TIMEOUT_MS),
            read_timeout: Duration::from_millis(DEFAULT_READ_TIMEOUT_MS),
        }
    }
}

impl ConnectionConfig {
    /// Build a config from positional arguments `[ip] [port] [camera]`.
    ///
    /// Missing arguments keep their defaults. An unknown camera profile fails
    /// here, before any socket is opened.
    pub fn from_args<I, S>(args: I) -> Result<Self, PepperError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut config = Self::default();
        let mut args = args.into_iter();

        if let Some(host) = args.next() {
            config.host = host.as_ref().to_string();
        }
        if let Some(port) = args.next() {
            let port = port.as_ref();
            config.port = port
                .parse()
                .map_err(|_| PepperError::Config(format!("invalid port: {port}")))?;
        }
        if let Some(camera) = args.next() {
            let camera = camera.as_ref();
            let id = camera
                .parse::<u8>()
                .map_err(|_| PepperError::Config(format!("invalid camera profile: {camera}")))?;
            config.profile = CameraProfile::from_id(id)?;
        }

        Ok(config)
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_profile(mut self, profile: CameraProfile) -> Self {
        self.profile = profile;
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Longest a single socket read may stall before the frame call fails.
    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// `host:port`, as passed to the socket.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn profile(&self) -> CameraProfile {
        self.profile
    }

    pub fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }

    pub fn read_timeout(&self) -> Duration {
        self.read_timeout
    }
}
