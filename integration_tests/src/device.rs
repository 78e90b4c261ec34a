//! Device communication client.

use std::io::{Read, Write};
use std::time::{Duration, Instant};

use anyhow::Result;
use serialport::{SerialPort, SerialPortType};

/// USB IDs the firmware enumerates with
const VCP_VID: u16 = 0x0483;
const VCP_PID: u16 = 0x5740;

/// Find Virtual COM Ports by their USB IDs.
pub fn find_vcp_ports() -> Result<Vec<String>> {
    let ports = serialport::available_ports()?;

    Ok(ports
        .into_iter()
        .filter(|port_info| match &port_info.port_type {
            SerialPortType::UsbPort(usb) => usb.vid == VCP_VID && usb.pid == VCP_PID,
            _ => false,
        })
        .map(|port_info| port_info.port_name)
        .collect())
}

/// Resolve a port argument - returns the port path if not "auto", otherwise auto-detects.
pub fn resolve_port(port_arg: &str) -> Result<String> {
    if port_arg != "auto" {
        return Ok(port_arg.to_string());
    }
    match find_vcp_ports()?.into_iter().next() {
        Some(port) => Ok(port),
        None => anyhow::bail!("No VCP found - ensure the board's USER USB port is connected"),
    }
}

/// Line-oriented client for the board's Virtual COM Port.
pub struct DeviceClient {
    port: Box<dyn SerialPort>,
    timeout: Duration,
    pending: Vec<u8>,
}

impl DeviceClient {
    /// Open the port. The baud rate is ignored by the device but required by the host driver.
    pub fn new(port_name: &str, baud_rate: u32) -> Result<Self> {
        let port = serialport::new(port_name, baud_rate)
            .timeout(Duration::from_millis(100))
            .open()?;

        Ok(Self {
            port,
            timeout: Duration::from_secs(2),
            pending: Vec::new(),
        })
    }

    /// Set the line timeout.
    pub fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = timeout;
    }

    /// Drop everything received so far.
    pub fn drain_buffer(&mut self) -> Result<()> {
        self.pending.clear();
        self.port.clear(serialport::ClearBuffer::All)?;

        let mut buf = [0u8; 256];
        loop {
            match self.port.read(&mut buf) {
                Ok(0) => break,
                Ok(_) => continue,
                Err(e) if e.kind() == std::io::ErrorKind::TimedOut => break,
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }

    /// Write a line, appending '\n'.
    pub fn send_line(&mut self, line: &str) -> Result<()> {
        self.port.write_all(line.as_bytes())?;
        self.port.write_all(b"\n")?;
        self.port.flush()?;
        Ok(())
    }

    /// Write raw bytes.
    pub fn send_raw(&mut self, data: &[u8]) -> Result<()> {
        self.port.write_all(data)?;
        self.port.flush()?;
        Ok(())
    }

    /// Read the next '\n'-terminated line, without the terminator.
    pub fn read_line(&mut self) -> Result<String> {
        let start = Instant::now();
        let mut buf = [0u8; 64];

        loop {
            if let Some(pos) = self.pending.iter().position(|&b| b == b'\n') {
                let line: Vec<u8> = self.pending.drain(..=pos).collect();
                return Ok(String::from_utf8_lossy(&line[..pos]).into_owned());
            }

            if start.elapsed() >= self.timeout {
                anyhow::bail!(
                    "Timeout waiting for line, got {} bytes: {:02x?}",
                    self.pending.len(),
                    self.pending
                );
            }

            match self.port.read(&mut buf) {
                Ok(n) => self.pending.extend_from_slice(&buf[..n]),
                Err(e) if e.kind() == std::io::ErrorKind::TimedOut => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Read lines until one is not empty.
    pub fn read_non_empty_line(&mut self) -> Result<String> {
        loop {
            let line = self.read_line()?;
            if !line.trim().is_empty() {
                return Ok(line);
            }
        }
    }
}
