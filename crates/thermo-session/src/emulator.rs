//! In-memory thermostat that answers the protocol.
//!
//! Serves any byte stream, so it can sit on the far end of a
//! `tokio::io::duplex` pipe in tests or behind a TCP listener for manual
//! testing with `thermoctl`.

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use thermo_protocol::{
    encode_response, Command, DecodeError, DeviceError, KeyFragment, Response,
    ScheduleEntry, ScheduleKind, Status, TemperatureSchedule, Temps, WeekSchedules, HEADER_LEN,
    SCHEDULE_LEN,
};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Largest request payload the emulator will buffer.
const MAX_REQUEST_PAYLOAD: usize = SCHEDULE_LEN;

/// State held by an emulated thermostat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceState {
    pub key: KeyFragment,
    pub current_f: u8,
    pub target_f: u8,
    /// Last time set by the host, local seconds since the epoch.
    pub time_secs: Option<u32>,
    pub schedules: WeekSchedules,
}

impl Default for DeviceState {
    fn default() -> Self {
        let schedule = |entries: [(u32, u32, u8); 3]| {
            TemperatureSchedule::new(entries.map(|(h, m, t)| {
                ScheduleEntry::from_hm(h, m, t).expect("built-in schedule is within device limits")
            }))
        };
        DeviceState {
            key: KeyFragment([0x5A; 8]),
            current_f: 68,
            target_f: 70,
            time_secs: None,
            schedules: WeekSchedules {
                weekday: schedule([(6, 0, 68), (8, 30, 62), (17, 30, 70)]),
                weekend: schedule([(8, 0, 70), (12, 0, 70), (22, 0, 64)]),
            },
        }
    }
}

impl DeviceState {
    /// Apply one request frame and build the response frame.
    pub fn handle(&mut self, frame: &[u8]) -> Vec<u8> {
        let command = match Command::decode(frame) {
            Ok(command) => command,
            Err(DecodeError::Device(err)) => return encode_response(err.into(), &[]),
            // The status vocabulary has no "bad value"; out-of-range values
            // are reported as a length problem.
            Err(DecodeError::Codec(_)) | Err(DecodeError::Protocol(_)) => {
                return encode_response(Status::ErrorInvalidLength, &[])
            }
        };

        let response = match command {
            Command::GetKeyPart => Response::KeyPart(self.key),
            Command::GetTemps => Response::Temps(Temps {
                current_f: self.current_f,
                target_f: self.target_f,
            }),
            Command::SetDateTime { time_secs } => {
                self.time_secs = Some(time_secs);
                Response::Ack
            }
            Command::SetTargetTemp { degrees_f } => {
                if !thermo_protocol::is_valid_temperature(degrees_f) {
                    return encode_response(DeviceError::InvalidLength.into(), &[]);
                }
                self.target_f = degrees_f;
                Response::Ack
            }
            Command::GetSchedule(kind) => Response::Schedule(*self.schedules.get(kind)),
            Command::SetSchedule { kind, schedule } => {
                match kind {
                    ScheduleKind::Weekday => self.schedules.weekday = schedule,
                    ScheduleKind::Weekend => self.schedules.weekend = schedule,
                }
                Response::Ack
            }
        };
        response.encode()
    }
}

/// Answer requests on `stream` until the peer closes it.
pub async fn serve<S>(mut stream: S, state: Arc<Mutex<DeviceState>>) -> io::Result<()>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let mut frame = Vec::with_capacity(HEADER_LEN + MAX_REQUEST_PAYLOAD);
    loop {
        frame.resize(HEADER_LEN, 0);
        match stream.read_exact(&mut frame[..HEADER_LEN]).await {
            Ok(_) => {}
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => return Ok(()),
            Err(e) => return Err(e),
        }

        let len = u32::from_be_bytes([0, frame[1], frame[2], frame[3]]) as usize;
        if len > MAX_REQUEST_PAYLOAD {
            warn!(len, "request payload too large, dropping connection");
            stream
                .write_all(&encode_response(Status::ErrorInvalidLength, &[]))
                .await?;
            return Ok(());
        }
        frame.resize(HEADER_LEN + len, 0);
        stream.read_exact(&mut frame[HEADER_LEN..]).await?;

        let response = state.lock().await.handle(&frame);
        debug!(command = frame[0], status = response[1], "emulator answered");
        stream.write_all(&response).await?;
        stream.flush().await?;
    }
}

/// Accept TCP connections on `addr` and serve each one.
pub async fn run_listener(addr: SocketAddr, state: Arc<Mutex<DeviceState>>) -> io::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "thermostat emulator listening");

    loop {
        let (stream, peer) = listener.accept().await?;
        info!(%peer, "client connected");
        let state = state.clone();
        tokio::spawn(async move {
            if let Err(e) = serve(stream, state).await {
                warn!(%peer, error = %e, "connection error");
            }
            info!(%peer, "client disconnected");
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_set_target_temp() {
        let mut state = DeviceState::default();
        let frame = Command::set_target_temp(75).unwrap().encode().unwrap();
        assert_eq!(state.handle(&frame), vec![0xA0, 0x00]);
        assert_eq!(state.target_f, 75);
    }

    #[test]
    fn test_handle_unknown_command() {
        let mut state = DeviceState::default();
        assert_eq!(state.handle(&[0x2A, 0, 0, 0]), vec![0xA0, 0x02]);
    }

    #[test]
    fn test_handle_wrong_length() {
        let mut state = DeviceState::default();
        assert_eq!(state.handle(&[0x04, 0, 0, 0]), vec![0xA0, 0x03]);
    }

    #[test]
    fn test_handle_set_schedule_keeps_order() {
        let mut state = DeviceState::default();
        let schedule = TemperatureSchedule::new([
            ScheduleEntry::new(3600, 60).unwrap(),
            ScheduleEntry::new(7200, 61).unwrap(),
            ScheduleEntry::new(10800, 62).unwrap(),
        ]);
        let frame = Command::SetSchedule {
            kind: ScheduleKind::Weekend,
            schedule,
        }
        .encode()
        .unwrap();
        assert_eq!(state.handle(&frame), vec![0xA0, 0x00]);
        assert_eq!(state.schedules.weekend, schedule);
    }

    #[tokio::test]
    async fn test_serve_over_duplex() {
        let (mut client, device) = tokio::io::duplex(256);
        let state = Arc::new(Mutex::new(DeviceState::default()));
        let server = tokio::spawn(serve(device, state.clone()));

        client
            .write_all(&Command::GetTemps.encode().unwrap())
            .await
            .unwrap();
        let mut reply = [0u8; 4];
        client.read_exact(&mut reply).await.unwrap();
        assert_eq!(reply, [0xA0, 0x00, 68, 70]);

        drop(client);
        server.await.unwrap().unwrap();
    }
}
