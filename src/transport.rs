use embassy_net::{
    dns::{DnsQueryType, Error as DnsError},
    tcp::{ConnectError, TcpSocket},
    Stack,
};
use embassy_time::Duration;
use embedded_io_async::{ErrorType, Read, Write};
use log::{debug, info};

use crate::constants::SOCKET_TIMEOUT_SECS;

#[derive(Debug)]
pub enum Error {
    #[allow(dead_code)]
    DnsQueryFailed(DnsError),
    DnsLookupFailed,
    #[allow(dead_code)]
    ConnectionFailed(ConnectError),
}

/// Plain TCP session to the broker: resolves the hostname, connects with an
/// inactivity timeout, and forwards `embedded-io-async` reads and writes.
/// Every write is flushed immediately; the MQTT client never calls `flush`
/// itself, and an unflushed CONNECT would stall the whole session.
pub struct Transport<'a> {
    session: TcpSocket<'a>,
}

impl<'a> Transport<'a> {
    pub async fn new(
        stack: Stack<'static>,
        rx_buffer: &'a mut [u8],
        tx_buffer: &'a mut [u8],
        hostname: &str,
        port: u16,
    ) -> Result<Self, Error> {
        let mut socket = TcpSocket::new(stack, rx_buffer, tx_buffer);
        socket.set_timeout(Some(Duration::from_secs(SOCKET_TIMEOUT_SECS)));

        let addr = stack
            .dns_query(hostname, DnsQueryType::A)
            .await
            .map_err(Error::DnsQueryFailed)?
            .first()
            .copied()
            .ok_or(Error::DnsLookupFailed)?;

        info!("Connecting TCP socket to {}:{}", hostname, port);
        socket
            .connect((addr, port))
            .await
            .map_err(Error::ConnectionFailed)?;
        debug!("TCP connected");

        Ok(Self { session: socket })
    }
}

impl ErrorType for Transport<'_> {
    type Error = embassy_net::tcp::Error;
}

impl Read for Transport<'_> {
    async fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        self.session.read(buf).await
    }
}

impl Write for Transport<'_> {
    async fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        let written = self.session.write(buf).await?;
        self.session.flush().await?;
        Ok(written)
    }

    async fn flush(&mut self) -> Result<(), Self::Error> {
        self.session.flush().await
    }
}
