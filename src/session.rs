//! Train session: the hub's public operations.
//!
//! This module provides [`TrainSession`], which ties the port registry, frame
//! codec, drive throttle, and color classifier to one connected transport.
//!
//! # Overview
//!
//! - Outbound: operation → role lookup → frame → `transport.write`
//! - Inbound: `transport.read` (rate limited) → decode → classify
//!
//! Every operation takes `&mut self`: a session has exactly one request on
//! the wire at a time. Share it between threads with
//! `SharedSession` (requires `std`).
//!
//! # Example
//!
//! ```rust
//! use duplo_hub::{HubCatalog, SessionConfig, TrainSession};
//! use duplo_hub::hal::{MockClock, MockConnector, MockSleep, MockTransport};
//!
//! let clock = MockClock::new();
//! let mut connector = MockConnector::new(MockTransport::named("Train Base"));
//! let mut session = TrainSession::connect(
//!     &mut connector,
//!     HubCatalog::standard(),
//!     SessionConfig::default(),
//!     clock.clone(),
//!     &mut MockSleep::with_clock(clock.clone()),
//! )
//! .unwrap();
//!
//! session.drive(60).unwrap();
//! session.play_sound("horn").unwrap();
//! assert_eq!(session.transport().written.len(), 4); // 2 subscriptions + 2 commands
//! ```

use alloc::string::{String, ToString};
use alloc::vec::Vec;
use thiserror::Error;

use crate::catalog::HubCatalog;
use crate::codec::{self, Frame, HexBytes, RgbSample};
use crate::color::{ColorEntry, LightColor};
use crate::config::{SessionConfig, ShortString};
use crate::diagnostics::{InputProbe, OutputProbe};
use crate::ports::{HardwareVariant, PortMap, PortRole, RegistryError};
use crate::throttle::{DriveDecision, DriveThrottle};
use crate::traits::{Clock, HubConnector, HubTransport, Sleep};

/// Output mode of the motor (signed power).
pub const MOTOR_MODE: u8 = 0x00;
/// Output mode of the light (LEGO color number).
pub const LIGHT_MODE: u8 = 0x00;
/// Output mode of the speaker (sound index).
pub const SPEAKER_MODE: u8 = 0x01;
/// Input mode of the speaker subscribed on connect.
pub const SPEAKER_INPUT_MODE: u8 = 0x01;
/// Color sensor RGB input mode.
pub const COLOR_RGB_MODE: u8 = 0x03;

/// Errors from session operations.
#[derive(Debug, Error)]
pub enum SessionError<E> {
    /// The hub has no port for the requested device.
    #[error(transparent)]
    Registry(#[from] RegistryError),
    /// A sound argument that is neither a known name nor an index.
    #[error("invalid sound {0:?}: not a sound name or index")]
    InvalidSound(String),
    /// Write or read failure from the transport.
    #[error("transport error: {0}")]
    Transport(E),
}

/// Errors from [`TrainSession::connect`].
#[derive(Debug, Error)]
pub enum ConnectError<E> {
    /// No layout for the requested hub generation.
    #[error(transparent)]
    Registry(#[from] RegistryError),
    /// Discovery failed or timed out.
    #[error("could not connect to hub: {0}")]
    Connector(E),
}

/// What an inbound frame is about.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum PortReport {
    /// Color sensor reading.
    Color(RgbSample),
    /// Value report from one of the hub's known devices, other than a color reading.
    Device(PortRole),
    /// Value report from a port not in the layout.
    Unknown(u8),
}

/// One connected hub.
///
/// # Type Parameters
///
/// - `T`: the connected link ([`HubTransport`])
/// - `C`: the time source for the drive and read timers ([`Clock`])
pub struct TrainSession<T: HubTransport, C: Clock> {
    transport: T,
    clock: C,
    catalog: HubCatalog,
    variant: HardwareVariant,
    throttle: DriveThrottle,
    read_interval_ms: u32,
    last_read_ms: u64,
    device_name: ShortString,
}

impl<T: HubTransport, C: Clock> TrainSession<T, C> {
    /// Wrap an already connected transport.
    ///
    /// Fails if the catalog has no layout for `config.variant`. No frames are
    /// sent. Both timers start now.
    pub fn new(
        transport: T,
        catalog: HubCatalog,
        config: SessionConfig,
        clock: C,
    ) -> Result<Self, RegistryError> {
        catalog.registry.map(config.variant)?;
        let now = clock.now_ms();
        Ok(Self {
            transport,
            catalog,
            variant: config.variant,
            throttle: DriveThrottle::new(config.drive, now),
            read_interval_ms: config.read_interval_ms,
            last_read_ms: now,
            device_name: config.device.name,
            clock,
        })
    }

    /// Scan for the hub, connect, and subscribe to the speaker and color sensor.
    ///
    /// The layout check happens before scanning. A failed subscription is
    /// logged and skipped; so is one for a role the layout doesn't have.
    pub fn connect<K, S>(
        connector: &mut K,
        catalog: HubCatalog,
        config: SessionConfig,
        clock: C,
        sleep: &mut S,
    ) -> Result<Self, ConnectError<K::Error>>
    where
        K: HubConnector<Transport = T>,
        S: Sleep,
    {
        catalog.registry.map(config.variant)?;

        tracing::info!(
            device = config.device.name.as_str(),
            variant = config.variant.id(),
            "searching for the train, make sure it is on and blinking its front light"
        );
        let transport = connector
            .connect(config.variant, config.connect_timeout_ms)
            .map_err(ConnectError::Connector)?;
        sleep.sleep_ms(config.settle_ms);

        let settle_ms = config.settle_ms;
        let subscribe = config.subscribe_on_connect;
        let mut session = Self::new(transport, catalog, config, clock)?;

        if subscribe {
            for (role, mode) in [
                (PortRole::Speaker, SPEAKER_INPUT_MODE),
                (PortRole::ColorSensor, COLOR_RGB_MODE),
            ] {
                match session.subscribe(role, mode, true) {
                    Ok(_) => tracing::debug!(role = role.as_str(), mode, "input subscribed"),
                    Err(SessionError::Registry(e)) => {
                        tracing::warn!(error = %e, "skipping subscription");
                        continue;
                    }
                    Err(e) => tracing::warn!(
                        role = role.as_str(),
                        mode,
                        error = %e,
                        "input subscription failed, continuing"
                    ),
                }
                sleep.sleep_ms(settle_ms);
            }
        }

        tracing::info!(hub = session.transport.name(), "connected");
        Ok(session)
    }

    // =========================================================================
    // Outbound
    // =========================================================================

    fn port(&self, role: PortRole) -> Result<u8, RegistryError> {
        self.catalog.registry.resolve(self.variant, role)
    }

    fn send(&mut self, frame: Frame) -> Result<Frame, SessionError<T::Error>> {
        tracing::debug!(frame = %HexBytes(frame.as_bytes()), "write");
        self.transport
            .write(frame.as_bytes())
            .map_err(SessionError::Transport)?;
        Ok(frame)
    }

    /// Write a raw `WriteDirectModeData` value to any port.
    pub fn write_direct(
        &mut self,
        port: u8,
        mode: u8,
        value: u8,
    ) -> Result<Frame, SessionError<T::Error>> {
        self.send(codec::encode_output_command(port, mode, value))
    }

    /// Subscribe to value reports from a device.
    pub fn subscribe(
        &mut self,
        role: PortRole,
        mode: u8,
        notify: bool,
    ) -> Result<Frame, SessionError<T::Error>> {
        let port = self.port(role)?;
        self.subscribe_port(port, mode, notify)
    }

    /// Subscribe to value reports from any port.
    pub fn subscribe_port(
        &mut self,
        port: u8,
        mode: u8,
        notify: bool,
    ) -> Result<Frame, SessionError<T::Error>> {
        self.send(codec::encode_input_subscribe(port, mode, notify))
    }

    /// Play a sound by name (case-insensitive) or by index.
    pub fn play_sound(&mut self, sound: &str) -> Result<Frame, SessionError<T::Error>> {
        let index = self
            .catalog
            .sounds
            .resolve(sound)
            .ok_or_else(|| SessionError::InvalidSound(sound.to_string()))?;
        self.play_sound_index(index)
    }

    /// Play a sound by index.
    pub fn play_sound_index(&mut self, index: u8) -> Result<Frame, SessionError<T::Error>> {
        let port = self.port(PortRole::Speaker)?;
        self.write_direct(port, SPEAKER_MODE, index)
    }

    /// Turn the light on in `color` ([`LightColor::None`] turns it off).
    pub fn set_light(&mut self, color: LightColor) -> Result<Frame, SessionError<T::Error>> {
        let port = self.port(PortRole::Lights)?;
        self.write_direct(port, LIGHT_MODE, color.code())
    }

    /// [`set_light`](Self::set_light) from a color name.
    ///
    /// An unknown name is logged and nothing is sent (`Ok(None)`).
    pub fn set_light_named(&mut self, name: &str) -> Result<Option<Frame>, SessionError<T::Error>> {
        match LightColor::from_text(name) {
            Some(color) => self.set_light(color).map(Some),
            None => {
                tracing::warn!(color = name, "unknown color");
                Ok(None)
            }
        }
    }

    /// Drive at `power` (-100 to 100), subject to the drive throttle.
    ///
    /// Returns what the throttle decided; a frame is only written for
    /// [`DriveDecision::Send`].
    pub fn drive(&mut self, power: i32) -> Result<DriveDecision, SessionError<T::Error>> {
        let port = self.port(PortRole::Motor)?;
        let decision = self.throttle.decide(power, self.clock.now_ms());
        if let DriveDecision::Send { value, .. } = decision {
            self.write_direct(port, MOTOR_MODE, value)?;
        }
        Ok(decision)
    }

    /// Stop driving. Same as `drive(0)`, including throttling.
    pub fn stop(&mut self) -> Result<DriveDecision, SessionError<T::Error>> {
        self.drive(0)
    }

    // =========================================================================
    // Inbound
    // =========================================================================

    /// Read one frame from the hub.
    ///
    /// At most one physical read per read interval; calls inside the window
    /// return `Ok(None)` without touching the transport.
    pub fn read_raw(&mut self) -> Result<Option<Vec<u8>>, SessionError<T::Error>> {
        let now = self.clock.now_ms();
        if now.saturating_sub(self.last_read_ms) < u64::from(self.read_interval_ms) {
            return Ok(None);
        }
        self.last_read_ms = now;

        let frame = self.transport.read().map_err(SessionError::Transport)?;
        if let Some(bytes) = &frame {
            tracing::debug!(frame = %HexBytes(bytes), "read");
        }
        Ok(frame)
    }

    /// Read the color under the train.
    ///
    /// `Ok(None)` when nothing was read, the frame isn't a color sensor report,
    /// or the reading matches no known color. With `updatelight`, a match that
    /// has a display color also switches the light to it; a failed light write
    /// is logged and the color is still returned.
    pub fn get_color(
        &mut self,
        updatelight: bool,
    ) -> Result<Option<&'static ColorEntry>, SessionError<T::Error>> {
        let Some(frame) = self.read_raw()? else {
            return Ok(None);
        };
        let Some(entry) = self.classify_frame(&frame) else {
            return Ok(None);
        };
        tracing::debug!(color = entry.name, "color detected");

        if updatelight {
            if let Some(light) = entry.display_color {
                if let Err(e) = self.set_light(light) {
                    tracing::warn!(color = entry.name, error = %e, "light not updated");
                }
            }
        }
        Ok(Some(entry))
    }

    /// Classify a color sensor report without reading or writing anything.
    pub fn classify_frame(&self, frame: &[u8]) -> Option<&'static ColorEntry> {
        let sample = self.color_sample(frame)?;
        let entry = self.catalog.colors.classify_sample(sample);
        if entry.is_none() {
            tracing::trace!(
                red = sample.red,
                green = sample.green,
                blue = sample.blue,
                "unmatched color sample"
            );
        }
        entry
    }

    fn color_sample(&self, frame: &[u8]) -> Option<RgbSample> {
        let parsed = codec::decode(frame)?;
        let sensor = self.port(PortRole::ColorSensor).ok()?;
        if parsed.port() != sensor {
            return None;
        }
        parsed.rgb()
    }

    /// Label an inbound frame by the device it came from.
    ///
    /// `None` for anything that isn't a value report.
    pub fn describe(&self, frame: &[u8]) -> Option<PortReport> {
        let parsed = codec::decode(frame)?;
        let report = match self.port_map().and_then(|m| m.role_of(parsed.port())) {
            Some(PortRole::ColorSensor) => match parsed.rgb() {
                Some(sample) => PortReport::Color(sample),
                None => PortReport::Device(PortRole::ColorSensor),
            },
            Some(role) => PortReport::Device(role),
            None => PortReport::Unknown(parsed.port()),
        };
        Some(report)
    }

    // =========================================================================
    // Diagnostics
    // =========================================================================

    /// Run an output sweep, pausing between steps.
    ///
    /// Failed writes are logged and skipped. Returns the number of frames
    /// written.
    pub fn probe_outputs<S: Sleep>(&mut self, probe: &OutputProbe, sleep: &mut S) -> usize {
        let pause = probe.pause_ms();
        let mut written = 0;
        for step in probe.steps() {
            match self.write_direct(step.port, step.mode, step.value) {
                Ok(_) => written += 1,
                Err(e) => tracing::warn!(port = step.port, error = %e, "port not written to"),
            }
            sleep.sleep_ms(pause);
        }
        written
    }

    /// Run an input subscription sweep, pausing between steps.
    ///
    /// Failed writes are logged and skipped. Returns the number of frames
    /// written.
    pub fn probe_inputs<S: Sleep>(&mut self, probe: &InputProbe, sleep: &mut S) -> usize {
        let pause = probe.pause_ms();
        let mut written = 0;
        for step in probe.steps() {
            match self.subscribe_port(step.port, step.mode, true) {
                Ok(_) => written += 1,
                Err(e) => tracing::warn!(
                    port = step.port,
                    mode = step.mode,
                    error = %e,
                    "port not initialized"
                ),
            }
            sleep.sleep_ms(pause);
        }
        written
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Hub generation this session talks to.
    pub fn variant(&self) -> HardwareVariant {
        self.variant
    }

    /// Port layout in use.
    pub fn port_map(&self) -> Option<&PortMap> {
        self.catalog.registry.map(self.variant).ok()
    }

    /// Lookup tables in use.
    pub fn catalog(&self) -> &HubCatalog {
        &self.catalog
    }

    /// Drive throttle state.
    pub fn throttle(&self) -> &DriveThrottle {
        &self.throttle
    }

    /// Advertised hub name.
    pub fn hub_name(&self) -> &str {
        self.transport.name()
    }

    /// Configured device label.
    pub fn device_name(&self) -> &str {
        self.device_name.as_str()
    }

    /// The underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// The underlying transport, mutably.
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Give the transport back, ending the session.
    pub fn into_transport(self) -> T {
        self.transport
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hal::{MockClock, MockError, MockTransport};
    use crate::ports::{PortMap, PortRegistry};
    use alloc::vec;

    fn session() -> (TrainSession<MockTransport, MockClock>, MockClock) {
        let clock = MockClock::new();
        let session = TrainSession::new(
            MockTransport::new(),
            HubCatalog::standard(),
            SessionConfig::default(),
            clock.clone(),
        )
        .unwrap();
        (session, clock)
    }

    #[test]
    fn new_rejects_unsupported_variant() {
        let result = TrainSession::new(
            MockTransport::new(),
            HubCatalog::standard(),
            SessionConfig::default().with_variant(HardwareVariant::NEW),
            MockClock::new(),
        );
        assert_eq!(
            result.err(),
            Some(RegistryError::UnsupportedVariant(HardwareVariant::NEW))
        );
    }

    #[test]
    fn new_sends_nothing() {
        let (session, _) = session();
        assert!(session.transport().written.is_empty());
    }

    #[test]
    fn set_light_writes_color_number() {
        let (mut session, _) = session();
        session.set_light(LightColor::Red).unwrap();
        assert_eq!(
            session.transport().written,
            vec![vec![0x08, 0x00, 0x81, 0x11, 0x11, 0x51, 0x00, 0x09]]
        );
    }

    #[test]
    fn set_light_named_unknown_is_noop() {
        let (mut session, _) = session();
        assert_eq!(session.set_light_named("ultraviolet").unwrap(), None);
        assert!(session.transport().written.is_empty());

        assert!(session.set_light_named("green").unwrap().is_some());
        assert_eq!(session.transport().written.len(), 1);
    }

    #[test]
    fn play_sound_by_name_and_index() {
        let (mut session, _) = session();
        let frame = session.play_sound("Steam").unwrap();
        assert_eq!(frame.as_bytes(), &[0x08, 0x00, 0x81, 0x01, 0x11, 0x51, 0x01, 0x0a]);

        let frame = session.play_sound("4").unwrap();
        assert_eq!(frame.as_bytes()[7], 4);
    }

    #[test]
    fn play_sound_invalid() {
        let (mut session, _) = session();
        match session.play_sound("moo") {
            Err(SessionError::InvalidSound(s)) => assert_eq!(s, "moo"),
            other => panic!("unexpected {other:?}"),
        }
        assert!(session.transport().written.is_empty());
    }

    #[test]
    fn drive_writes_twos_complement_on_motor_port() {
        let (mut session, clock) = session();
        clock.advance(1_000);
        session.drive(-30).unwrap();
        assert_eq!(
            session.transport().written,
            vec![vec![0x08, 0x00, 0x81, 0x29, 0x11, 0x51, 0x00, 226]]
        );
    }

    #[test]
    fn drive_transport_failure_propagates() {
        let (mut session, clock) = session();
        clock.advance(1_000);
        session.transport_mut().fail_writes = true;
        match session.drive(50) {
            Err(SessionError::Transport(MockError::WriteFailed)) => {}
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn read_raw_is_rate_limited() {
        let (mut session, clock) = session();
        session.transport_mut().queue_read(vec![1, 2, 3]);
        session.transport_mut().queue_read(vec![4, 5, 6]);

        // Timer starts with the session
        assert_eq!(session.read_raw().unwrap(), None);
        assert_eq!(session.transport().read_calls, 0);

        clock.advance(200);
        assert_eq!(session.read_raw().unwrap(), Some(vec![1, 2, 3]));
        clock.advance(199);
        assert_eq!(session.read_raw().unwrap(), None);
        clock.advance(1);
        assert_eq!(session.read_raw().unwrap(), Some(vec![4, 5, 6]));
        assert_eq!(session.transport().read_calls, 2);
    }

    #[test]
    fn read_timer_is_independent_of_drive_timer() {
        let (mut session, clock) = session();
        session.transport_mut().queue_read(vec![0x05, 0x00, 0x45, 0x01, 0x00]);
        clock.advance(250);
        session.drive(80).unwrap();
        assert!(session.read_raw().unwrap().is_some());
    }

    #[test]
    fn describe_labels_ports() {
        let (session, _) = session();
        let color = [0x0a, 0x00, 0x45, 0x12, 0x00, 0x06, 0x00, 0x05, 0x00, 0x05];
        assert_eq!(
            session.describe(&color),
            Some(PortReport::Color(RgbSample::new(6, 5, 5)))
        );
        assert_eq!(
            session.describe(&[0x05, 0x00, 0x45, 0x01, 0x00]),
            Some(PortReport::Device(PortRole::Speaker))
        );
        assert_eq!(
            session.describe(&[0x05, 0x00, 0x45, 0x42, 0x00]),
            Some(PortReport::Unknown(0x42))
        );
        assert_eq!(session.describe(&[0x05, 0x00, 0x82, 0x01, 0x00]), None);
    }

    #[test]
    fn classify_frame_requires_color_sensor_port() {
        let (session, _) = session();
        let from_sensor = [0x0a, 0x00, 0x45, 0x12, 0x00, 0x00, 0x00, 0x01, 0x00, 0x03];
        assert_eq!(
            session.classify_frame(&from_sensor).map(|e| e.name),
            Some("brightblue")
        );

        let mut from_speaker = from_sensor;
        from_speaker[3] = 0x01;
        assert!(session.classify_frame(&from_speaker).is_none());
    }

    #[test]
    fn partial_layout_fails_only_missing_role() {
        let variant = HardwareVariant(0x30);
        let registry = PortRegistry::new().with_map(
            variant,
            PortMap::default()
                .with_port(PortRole::Motor, 0x00)
                .with_port(PortRole::Lights, 0x11),
        );
        let mut session = TrainSession::new(
            MockTransport::new(),
            HubCatalog::standard().with_registry(registry),
            SessionConfig::default().with_variant(variant),
            MockClock::new(),
        )
        .unwrap();

        assert!(session.set_light(LightColor::Blue).is_ok());
        match session.play_sound("horn") {
            Err(SessionError::Registry(RegistryError::UnsupportedRole { role, .. })) => {
                assert_eq!(role, PortRole::Speaker)
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
