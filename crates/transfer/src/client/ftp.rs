//! FTP transfer client.
//!
//! Wraps a synchronous [`suppaftp`] control connection. Binary mode is
//! asserted before every size query and retrieval: FTP servers default to
//! ASCII mode, which both corrupts compressed payloads and makes `SIZE`
//! answers unreliable.

use crate::error::{ErrorKind, Result};
use crate::sink::ChunkSink;
use crate::{Connector, TransferSession};
use exn::ResultExt;
use std::io::{Error as IoError, Read};
use suppaftp::types::FileType;
use suppaftp::{FtpError, FtpStream, Status};
use tracing::instrument;

const DEFAULT_PORT: u16 = 21;
const ANONYMOUS_USER: &str = "anonymous";
const ANONYMOUS_PASSWORD: &str = "anonymous@";
const CHUNK_SIZE: usize = 8 * 1024;

/// Connects to an FTP server, anonymously unless credentials are given.
///
/// # Examples
///
/// ```
/// use oami_transfer::{Connector, FtpConnector};
///
/// let connector = FtpConnector::new("ftp.ncbi.nlm.nih.gov");
/// assert_eq!(connector.server(), "ftp.ncbi.nlm.nih.gov");
/// ```
#[derive(Clone, Debug)]
pub struct FtpConnector {
    server: String,
    user: String,
    password: String,
}
impl FtpConnector {
    /// `server` is a host name, optionally followed by `:port`.
    pub fn new(server: impl Into<String>) -> Self {
        Self {
            server: server.into(),
            user: ANONYMOUS_USER.to_string(),
            password: ANONYMOUS_PASSWORD.to_string(),
        }
    }

    pub fn with_credentials(mut self, user: impl Into<String>, password: impl Into<String>) -> Self {
        self.user = user.into();
        self.password = password.into();
        self
    }

    fn socket_address(&self) -> String {
        match self.server.rsplit_once(':') {
            Some((_, port)) if port.parse::<u16>().is_ok() => self.server.clone(),
            _ => format!("{}:{DEFAULT_PORT}", self.server),
        }
    }
}

impl Connector for FtpConnector {
    type Session = FtpSession;

    fn server(&self) -> &str {
        &self.server
    }

    #[instrument(skip(self), fields(server = %self.server))]
    fn connect(&self) -> Result<FtpSession> {
        let connect_error = || ErrorKind::Connect(self.server.clone());
        let mut stream = FtpStream::connect(self.socket_address())
            .map_err(|e| map_ftp_error(e, &self.server))
            .or_raise(connect_error)?;
        stream
            .login(self.user.as_str(), self.password.as_str())
            .map_err(|e| map_ftp_error(e, &self.server))
            .or_raise(connect_error)?;
        stream
            .transfer_type(FileType::Binary)
            .map_err(|e| map_ftp_error(e, &self.server))
            .or_raise(connect_error)?;
        tracing::debug!("FTP session established");
        Ok(FtpSession { stream })
    }
}

/// An open FTP control connection. Obtained from [`FtpConnector::connect`].
pub struct FtpSession {
    stream: FtpStream,
}
impl FtpSession {
    fn binary_mode(&mut self, path: &str) -> Result<()> {
        Ok(self.stream.transfer_type(FileType::Binary).map_err(|e| map_ftp_error(e, path))?)
    }
}

impl TransferSession for FtpSession {
    fn list(&mut self, directory: &str) -> Result<Vec<String>> {
        Ok(self.stream.nlst(Some(directory)).map_err(|e| map_ftp_error(e, directory))?)
    }

    fn size(&mut self, path: &str) -> Result<u64> {
        self.binary_mode(path)?;
        let size = self.stream.size(path).map_err(|e| map_ftp_error(e, path))?;
        Ok(size as u64)
    }

    #[instrument(skip(self, sink), fields(expected = sink.expected_size()))]
    fn fetch(&mut self, path: &str, sink: &mut dyn ChunkSink) -> Result<u64> {
        self.binary_mode(path)?;
        // The retrieval callback can only fail with an FtpError, so remember
        // whether it was the sink (local problem) or the data connection
        // (remote problem) that gave up.
        let mut sink_failed = false;
        let received = self.stream.retr(path, |reader: &mut dyn Read| {
            let mut buffer = vec![0u8; CHUNK_SIZE];
            let mut total = 0u64;
            loop {
                let read = reader.read(&mut buffer).map_err(FtpError::ConnectionError)?;
                if read == 0 {
                    return Ok(total);
                }
                if let Err(e) = sink.accept(&buffer[..read]) {
                    sink_failed = true;
                    return Err(FtpError::ConnectionError(e));
                }
                total += read as u64;
            }
        });
        match received {
            Ok(total) => Ok(total),
            Err(e) if sink_failed => Err(map_ftp_error(e, path)).or_raise(|| ErrorKind::Sink(path.to_string())),
            Err(e) => Err(map_ftp_error(e, path).into()),
        }
    }

    fn close(mut self) -> Result<()> {
        Ok(self.stream.quit().map_err(|e| map_ftp_error(e, "QUIT"))?)
    }
}

fn map_ftp_error(err: FtpError, subject: &str) -> ErrorKind {
    match err {
        FtpError::ConnectionError(e) => ErrorKind::Network(describe_io(&e)),
        FtpError::UnexpectedResponse(response) => match response.status {
            Status::FileUnavailable => ErrorKind::NotFound(subject.to_string()),
            Status::NotLoggedIn => ErrorKind::PermissionDenied(subject.to_string()),
            status => ErrorKind::Protocol(format!("{subject}: unexpected response {status:?}")),
        },
        other => ErrorKind::Protocol(format!("{subject}: {other}")),
    }
}

fn describe_io(err: &IoError) -> String {
    format!("{} ({:?})", err, err.kind())
}
