//! Command session over an ordered byte stream.
//!
//! The protocol has no request identifiers, so a connection can only carry
//! one exchange at a time. The transport lives behind an async mutex; callers
//! queue on it in arrival order and each holds it for a complete
//! request/response round trip.
//!
//! A connection becomes *desynchronized* whenever an exchange ends without a
//! complete, well-framed response: timeout, cancellation, I/O failure or a
//! protocol error. Late bytes from that exchange may still be in flight, so
//! the next exchange first drains the line until it has been quiet for
//! [`SessionConfig::drain_quiet`].

use thermo_protocol::{
    Command, CommandCode, KeyFragment, Response, ResponseDecoder, ResponseFrame,
    ScheduleKind, TemperatureSchedule, Temps, WeekSchedules,
};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::Mutex;
use tracing::{debug, trace, warn};

use crate::config::SessionConfig;
use crate::error::{SessionError, SessionResult};

/// Scratch buffer size for transport reads.
const READ_CHUNK: usize = 64;

/// Progress of a single exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallState {
    Idle,
    Sent,
    AwaitingHeader,
    AwaitingPayload,
    Completed,
    Failed,
}

/// The transport together with its framing state.
struct Link<T> {
    transport: T,
    decoder: ResponseDecoder,
    desynchronized: bool,
}

impl<T> Link<T>
where
    T: AsyncRead + AsyncWrite + Unpin,
{
    /// Discard inbound bytes until the line has been quiet for `quiet`.
    async fn resync(&mut self, quiet: std::time::Duration) -> SessionResult<()> {
        self.decoder.clear();
        let mut scratch = [0u8; READ_CHUNK];
        let mut discarded = 0usize;
        loop {
            match tokio::time::timeout(quiet, self.transport.read(&mut scratch)).await {
                Err(_) => break,
                Ok(Ok(0)) => return Err(SessionError::Closed),
                Ok(Ok(n)) => discarded += n,
                Ok(Err(e)) => return Err(e.into()),
            }
        }
        warn!(discarded, "resynchronized connection");
        self.desynchronized = false;
        Ok(())
    }

    /// Read exactly one response to `code`.
    ///
    /// Never reads past the end of the response, so a well-behaved device
    /// leaves nothing behind for the next exchange.
    async fn read_response(&mut self, code: CommandCode) -> SessionResult<ResponseFrame> {
        let payload_len = code.response_len();
        let mut scratch = [0u8; READ_CHUNK];
        let mut state = CallState::Sent;
        loop {
            if let Some(frame) = self.decoder.decode(payload_len)? {
                return Ok(frame);
            }

            let next = if self.decoder.buffered_len() < thermo_protocol::RESPONSE_HEADER_LEN {
                CallState::AwaitingHeader
            } else {
                CallState::AwaitingPayload
            };
            if next != state {
                trace!(command = %code, ?state, ?next, "call state");
                state = next;
            }

            let want = self.decoder.needed(payload_len).clamp(1, READ_CHUNK);
            let n = self.transport.read(&mut scratch[..want]).await?;
            if n == 0 {
                return Err(SessionError::Closed);
            }
            trace!(bytes = %hex::encode(&scratch[..n]), "received");
            self.decoder.push(&scratch[..n]);
        }
    }

    /// One full round trip. The caller applies the deadline.
    async fn exchange(
        &mut self,
        config: &SessionConfig,
        code: CommandCode,
        request: &[u8],
    ) -> SessionResult<ResponseFrame> {
        if self.desynchronized {
            self.resync(config.drain_quiet()).await?;
        }

        // Stays set unless the exchange runs to completion, which also covers
        // the future being dropped mid-flight.
        self.desynchronized = true;

        trace!(command = %code, bytes = %hex::encode(request), "sending");
        self.transport.write_all(request).await?;
        self.transport.flush().await?;
        trace!(command = %code, state = ?CallState::Sent, "request written");

        let frame = self.read_response(code).await?;
        self.desynchronized = false;
        Ok(frame)
    }
}

/// A command session bound to one transport.
///
/// `Session` is `Sync` for `Send` transports and can be shared behind an
/// `Arc`; concurrent calls are serialized.
pub struct Session<T> {
    link: Mutex<Link<T>>,
    config: SessionConfig,
}

impl<T> Session<T>
where
    T: AsyncRead + AsyncWrite + Unpin + Send,
{
    /// Create a session that exclusively owns `transport`.
    pub fn new(transport: T, config: SessionConfig) -> Self {
        Session {
            link: Mutex::new(Link {
                transport,
                decoder: ResponseDecoder::new(),
                desynchronized: false,
            }),
            config,
        }
    }

    /// Get the session configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Whether the next call will drain the line before sending.
    ///
    /// Waits for any call in flight to finish.
    pub async fn is_desynchronized(&self) -> bool {
        self.link.lock().await.desynchronized
    }

    /// Give the transport back, e.g. to close or reconnect it.
    pub fn into_inner(self) -> T {
        self.link.into_inner().transport
    }

    /// Send `command` and wait for its typed response.
    pub async fn execute(&self, command: &Command) -> SessionResult<Response> {
        let code = command.code();
        let request = command.encode()?;

        let mut link = self.link.lock().await;
        trace!(command = %code, state = ?CallState::Idle, "acquired connection");
        let mut attempt = 0u8;
        loop {
            debug!(command = %code, attempt, "request");
            let result =
                tokio::time::timeout(self.config.timeout(), link.exchange(&self.config, code, &request))
                    .await;

            let frame = match result {
                Ok(Ok(frame)) => frame,
                Ok(Err(SessionError::Protocol(err))) if attempt < self.config.protocol_retries => {
                    warn!(command = %code, error = %err, "protocol error, retrying");
                    attempt += 1;
                    continue;
                }
                Ok(Err(err)) => {
                    debug!(command = %code, error = %err, state = ?CallState::Failed, "call failed");
                    return Err(err);
                }
                Err(_) => {
                    warn!(command = %code, timeout = ?self.config.timeout(), "call timed out");
                    return Err(SessionError::Timeout {
                        command: code,
                        timeout: self.config.timeout(),
                    });
                }
            };

            if let Err(err) = frame.status.check() {
                debug!(command = %code, error = %err, "device rejected request");
                return Err(err.into());
            }
            let response = Response::decode_payload(code, &frame.payload)?;
            debug!(command = %code, state = ?CallState::Completed, "response");
            return Ok(response);
        }
    }

    /// Read the key fragment.
    pub async fn get_key_part(&self) -> SessionResult<KeyFragment> {
        match self.execute(&Command::GetKeyPart).await? {
            Response::KeyPart(key) => Ok(key),
            _ => Err(SessionError::UnexpectedResponse(CommandCode::GetKeyPart)),
        }
    }

    /// Read the current and target temperatures.
    pub async fn get_temps(&self) -> SessionResult<Temps> {
        match self.execute(&Command::GetTemps).await? {
            Response::Temps(temps) => Ok(temps),
            _ => Err(SessionError::UnexpectedResponse(CommandCode::GetTemps)),
        }
    }

    /// Set the device clock to a local wall-clock time.
    pub async fn set_date_time(&self, local: chrono::NaiveDateTime) -> SessionResult<()> {
        let command = Command::set_date_time(local)?;
        self.expect_ack(&command).await
    }

    /// Set the target temperature (°F).
    pub async fn set_target_temp(&self, degrees_f: u8) -> SessionResult<()> {
        let command = Command::set_target_temp(degrees_f)?;
        self.expect_ack(&command).await
    }

    /// Read one schedule, in the order the device stores it.
    pub async fn get_schedule(&self, kind: ScheduleKind) -> SessionResult<TemperatureSchedule> {
        let command = Command::GetSchedule(kind);
        match self.execute(&command).await? {
            Response::Schedule(schedule) => Ok(schedule),
            _ => Err(SessionError::UnexpectedResponse(command.code())),
        }
    }

    /// Replace one schedule. Entries are sent in ascending time order.
    pub async fn set_schedule(
        &self,
        kind: ScheduleKind,
        schedule: &TemperatureSchedule,
    ) -> SessionResult<()> {
        let command = Command::SetSchedule {
            kind,
            schedule: schedule.sorted(),
        };
        self.expect_ack(&command).await
    }

    pub async fn get_weekday_schedule(&self) -> SessionResult<TemperatureSchedule> {
        self.get_schedule(ScheduleKind::Weekday).await
    }

    pub async fn get_weekend_schedule(&self) -> SessionResult<TemperatureSchedule> {
        self.get_schedule(ScheduleKind::Weekend).await
    }

    pub async fn set_weekday_schedule(&self, schedule: &TemperatureSchedule) -> SessionResult<()> {
        self.set_schedule(ScheduleKind::Weekday, schedule).await
    }

    pub async fn set_weekend_schedule(&self, schedule: &TemperatureSchedule) -> SessionResult<()> {
        self.set_schedule(ScheduleKind::Weekend, schedule).await
    }

    /// Read both schedules.
    pub async fn get_week_schedules(&self) -> SessionResult<WeekSchedules> {
        Ok(WeekSchedules {
            weekday: self.get_weekday_schedule().await?,
            weekend: self.get_weekend_schedule().await?,
        })
    }

    /// Write both schedules, weekday first.
    pub async fn set_week_schedules(&self, schedules: &WeekSchedules) -> SessionResult<()> {
        self.set_weekday_schedule(&schedules.weekday).await?;
        self.set_weekend_schedule(&schedules.weekend).await
    }

    async fn expect_ack(&self, command: &Command) -> SessionResult<()> {
        match self.execute(command).await? {
            Response::Ack => Ok(()),
            _ => Err(SessionError::UnexpectedResponse(command.code())),
        }
    }
}
