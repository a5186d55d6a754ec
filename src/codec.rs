//! LWP3 frame encoding and decoding.
//!
//! Every frame starts with a 3-byte common header:
//!
//! | Offset | Field |
//! |--------|-------|
//! | 0 | Total frame length (single-byte form) |
//! | 1 | Hub id (unused, always `0x00`) |
//! | 2 | Message type |
//!
//! Two outbound messages are built here and one inbound message is parsed:
//!
//! | Frame | Bytes |
//! |-------|-------|
//! | Output command | `08 00 81 <port> 11 51 <mode> <value>` |
//! | Input subscribe | `0a 00 41 <port> <mode> 01 00 00 00 <notify>` |
//! | Value report | `.. .. 45 <port> ..` |
//!
//! # Example
//!
//! ```rust
//! use duplo_hub::codec;
//!
//! let frame = codec::encode_output_command(0x11, 0x00, 9);
//! assert_eq!(frame.as_bytes(), &[0x08, 0x00, 0x81, 0x11, 0x11, 0x51, 0x00, 0x09]);
//!
//! let report = [0x0a, 0x00, 0x45, 0x12, 0x00, 0x06, 0x00, 0x05, 0x00, 0x05];
//! let parsed = codec::decode(&report).unwrap();
//! assert_eq!(parsed.port(), 0x12);
//! assert_eq!(parsed.rgb().map(|s| s.as_array()), Some([6, 5, 5]));
//!
//! // Anything that isn't a value report is not an error, just nothing to decode.
//! assert!(codec::decode(&[0x05, 0x00, 0x82]).is_none());
//! ```

/// Length of the common header.
pub const HEADER_LEN: usize = 3;

/// Shortest inbound frame that carries a port id.
pub const MIN_DECODE_LEN: usize = 4;

/// Length of a `WriteDirectModeData` output command with a one-byte value.
pub const OUTPUT_COMMAND_LEN: usize = 8;

/// Length of a single-port input format setup.
pub const INPUT_SUBSCRIBE_LEN: usize = 10;

/// Largest frame this codec builds.
pub const MAX_FRAME_LEN: usize = INPUT_SUBSCRIBE_LEN;

/// Hub id byte; the hub ignores it.
pub const HUB_ID: u8 = 0x00;

/// Startup and completion flags: execute immediately, request feedback.
pub const STARTUP_AND_COMPLETION: u8 = 0x11;

/// Output sub-command `WriteDirectModeData`.
pub const SUBCMD_WRITE_DIRECT_MODE_DATA: u8 = 0x51;

/// Notification delta interval sent with every subscription.
pub const DELTA_INTERVAL: u32 = 1;

/// Offsets of the low byte of each 16-bit color channel in a value report.
pub const RGB_OFFSETS: [usize; 3] = [5, 7, 9];

/// LWP3 message types used by this crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MessageType {
    /// Port Input Format Setup (Single).
    PortInputFormatSetupSingle = 0x41,
    /// Port Value (Single).
    PortValueSingle = 0x45,
    /// Port Output Command.
    PortOutputCommand = 0x81,
}

impl MessageType {
    /// Wire value.
    #[inline]
    pub const fn code(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for MessageType {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0x41 => Ok(MessageType::PortInputFormatSetupSingle),
            0x45 => Ok(MessageType::PortValueSingle),
            0x81 => Ok(MessageType::PortOutputCommand),
            other => Err(other),
        }
    }
}

/// An outbound frame, stored inline.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    data: [u8; MAX_FRAME_LEN],
    len: u8,
}

impl Frame {
    fn from_slice(bytes: &[u8]) -> Self {
        let mut data = [0u8; MAX_FRAME_LEN];
        let len = bytes.len().min(MAX_FRAME_LEN);
        data[..len].copy_from_slice(&bytes[..len]);
        Self {
            data,
            len: len as u8,
        }
    }

    /// Frame bytes as sent on the wire.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data[..self.len as usize]
    }

    /// Frame length in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.len as usize
    }

    /// Always false for frames built by this module.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Message type byte.
    #[inline]
    pub fn message_type(&self) -> u8 {
        self.data[2]
    }

    /// Target port id.
    #[inline]
    pub fn port(&self) -> u8 {
        self.data[3]
    }
}

impl AsRef<[u8]> for Frame {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl core::fmt::Debug for Frame {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Frame[{}]", HexBytes(self.as_bytes()))
    }
}

/// Displays a byte slice as space-separated lowercase hex.
pub struct HexBytes<'a>(pub &'a [u8]);

impl core::fmt::Display for HexBytes<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        for (i, b) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{:02x}", b)?;
        }
        Ok(())
    }
}

/// Build a `WriteDirectModeData` output command.
///
/// `value` is the raw byte. Signed quantities must be converted with
/// [`to_unsigned8`] first.
pub fn encode_output_command(port: u8, mode: u8, value: u8) -> Frame {
    Frame::from_slice(&[
        OUTPUT_COMMAND_LEN as u8,
        HUB_ID,
        MessageType::PortOutputCommand.code(),
        port,
        STARTUP_AND_COMPLETION,
        SUBCMD_WRITE_DIRECT_MODE_DATA,
        mode,
        value,
    ])
}

/// Build a Port Input Format Setup (Single) frame.
///
/// With `notify` set the hub pushes a value report every time the mode's
/// value changes by at least [`DELTA_INTERVAL`].
pub fn encode_input_subscribe(port: u8, mode: u8, notify: bool) -> Frame {
    let delta = DELTA_INTERVAL.to_le_bytes();
    Frame::from_slice(&[
        INPUT_SUBSCRIBE_LEN as u8,
        HUB_ID,
        MessageType::PortInputFormatSetupSingle.code(),
        port,
        mode,
        delta[0],
        delta[1],
        delta[2],
        delta[3],
        notify as u8,
    ])
}

/// Two's complement byte for a signed power value.
///
/// ```
/// use duplo_hub::codec::to_unsigned8;
///
/// assert_eq!(to_unsigned8(50), 50);
/// assert_eq!(to_unsigned8(-1), 255);
/// assert_eq!(to_unsigned8(-100), 156);
/// ```
#[inline]
pub const fn to_unsigned8(value: i8) -> u8 {
    value as u8
}

/// Inverse of [`to_unsigned8`].
#[inline]
pub const fn from_unsigned8(value: u8) -> i8 {
    value as i8
}

/// One RGB sample from the color sensor (low byte of each channel).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RgbSample {
    /// Red channel.
    pub red: u8,
    /// Green channel.
    pub green: u8,
    /// Blue channel.
    pub blue: u8,
}

impl RgbSample {
    /// Create a sample.
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Channels as `[r, g, b]`.
    pub const fn as_array(&self) -> [u8; 3] {
        [self.red, self.green, self.blue]
    }
}

/// A decoded inbound frame.
///
/// Borrows the buffer it was decoded from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParsedFrame<'a> {
    /// Port Value (Single) report.
    PortValue {
        /// Reporting port.
        port: u8,
        /// Whole frame, header included.
        raw: &'a [u8],
    },
}

impl<'a> ParsedFrame<'a> {
    /// Port the frame refers to.
    pub fn port(&self) -> u8 {
        match self {
            ParsedFrame::PortValue { port, .. } => *port,
        }
    }

    /// Frame bytes the record was decoded from.
    pub fn raw(&self) -> &'a [u8] {
        match self {
            ParsedFrame::PortValue { raw, .. } => raw,
        }
    }

    /// Color channels, read from the low byte of each 16-bit channel.
    ///
    /// `None` when the report is too short to carry three channels. Whether
    /// the report actually comes from the color sensor is the caller's call.
    pub fn rgb(&self) -> Option<RgbSample> {
        let raw = self.raw();
        let [r, g, b] = RGB_OFFSETS;
        Some(RgbSample::new(*raw.get(r)?, *raw.get(g)?, *raw.get(b)?))
    }
}

/// Decode an inbound frame.
///
/// Returns `None` for frames shorter than [`MIN_DECODE_LEN`] and for any
/// message other than a port value report. Never panics.
pub fn decode(bytes: &[u8]) -> Option<ParsedFrame<'_>> {
    if bytes.len() < MIN_DECODE_LEN {
        return None;
    }
    match MessageType::try_from(bytes[2]) {
        Ok(MessageType::PortValueSingle) => Some(ParsedFrame::PortValue {
            port: bytes[3],
            raw: bytes,
        }),
        _ => None,
    }
}

/// Fields of an output command frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OutputCommand {
    /// Target port.
    pub port: u8,
    /// Startup and completion flags.
    pub startup: u8,
    /// Output sub-command.
    pub subcommand: u8,
    /// Mode the value is written to.
    pub mode: u8,
    /// Raw value byte.
    pub value: u8,
}

impl OutputCommand {
    /// Value interpreted as a signed power level.
    pub fn signed_value(&self) -> i8 {
        from_unsigned8(self.value)
    }
}

/// Parse an output command frame, e.g. one captured from the outbound side.
///
/// Returns `None` unless `bytes` is a complete 8-byte output command.
pub fn decode_output_command(bytes: &[u8]) -> Option<OutputCommand> {
    match bytes {
        [len, _, kind, port, startup, subcommand, mode, value]
            if *len as usize == OUTPUT_COMMAND_LEN
                && *kind == MessageType::PortOutputCommand.code() =>
        {
            Some(OutputCommand {
                port: *port,
                startup: *startup,
                subcommand: *subcommand,
                mode: *mode,
                value: *value,
            })
        }
        _ => None,
    }
}
