use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::time::{Duration, timeout};
use tracing::{info, warn};
use crate::transport::domain::{SensorLink, TransportError};


/// Enlace de sensores sobre TCP (puente serie-TCP del controlador de la
/// cámara). Protocolo de líneas: comandos ASCII de un byte con argumento
/// opcional y `\n`, respuestas de una línea.
pub struct TcpSensorLink {
    addr: String,
    reader: Option<BufReader<OwnedReadHalf>>,
    writer: Option<OwnedWriteHalf>,
}

impl TcpSensorLink {
    pub fn new(addr: String) -> Self {
        Self { addr, reader: None, writer: None }
    }

    pub async fn connect(addr: String) -> Result<Self, TransportError> {
        let mut link = Self::new(addr);
        link.reconnect().await?;
        Ok(link)
    }
}

impl SensorLink for TcpSensorLink {
    fn is_connected(&self) -> bool {
        self.writer.is_some()
    }

    async fn send_command(&mut self, cmd: &str) -> Result<(), TransportError> {
        let writer = self.writer.as_mut()
            .ok_or_else(|| TransportError::ConnectionLost("enlace sin conectar".to_string()))?;

        match writer.write_all(cmd.as_bytes()).await {
            Ok(_) => Ok(()),
            Err(e) => {
                self.reader = None;
                self.writer = None;
                Err(TransportError::Write(e.to_string()))
            }
        }
    }

    async fn read_line(&mut self, window: Duration) -> Result<Option<String>, TransportError> {
        let reader = self.reader.as_mut()
            .ok_or_else(|| TransportError::ConnectionLost("enlace sin conectar".to_string()))?;

        let mut line = String::new();
        match timeout(window, reader.read_line(&mut line)).await {
            // Ventana agotada: ausencia de datos, no es error.
            Err(_) => Ok(None),
            Ok(Ok(0)) => {
                self.reader = None;
                self.writer = None;
                Err(TransportError::ConnectionLost("el dispositivo cerró la conexión".to_string()))
            }
            Ok(Ok(_)) => Ok(Some(line)),
            Ok(Err(e)) => {
                self.reader = None;
                self.writer = None;
                Err(TransportError::Read(e.to_string()))
            }
        }
    }

    async fn reconnect(&mut self) -> Result<(), TransportError> {
        self.reader = None;
        self.writer = None;

        match TcpStream::connect(&self.addr).await {
            Ok(stream) => {
                let (read_half, write_half) = stream.into_split();
                self.reader = Some(BufReader::new(read_half));
                self.writer = Some(write_half);
                info!("Info: enlace de sensores conectado a {}", self.addr);
                Ok(())
            }
            Err(e) => {
                warn!("Warning: no se pudo conectar el enlace de sensores: {e}");
                Err(TransportError::ConnectionLost(e.to_string()))
            }
        }
    }
}
