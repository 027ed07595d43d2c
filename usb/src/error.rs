#[derive(thiserror::Error, Debug)]
pub enum ConnectError {
    #[error("No GMMK device was found")]
    DeviceNotFound,

    #[error("USB error: {0}")]
    UsbError(#[from] rusb::Error),

    #[error("Unable to claim interface {0}")]
    ClaimFailed(u8),
}

#[derive(thiserror::Error, Debug)]
pub enum CommandError {
    #[error("Transfer timed out")]
    Timeout,

    #[error("USB transfer error: {0}")]
    Transfer(rusb::Error),

    #[error("Frame prefix of {prefix_len} bytes exceeds the {frame_len} byte frame")]
    FrameOverflow { prefix_len: usize, frame_len: usize },

    #[error("Unexpected acknowledgment, expected leading byte {expected:#04x}, received {received:02x?}")]
    UnexpectedAck { expected: u8, received: Vec<u8> },
}

impl From<rusb::Error> for CommandError {
    fn from(error: rusb::Error) -> Self {
        match error {
            rusb::Error::Timeout => CommandError::Timeout,
            other => CommandError::Transfer(other),
        }
    }
}
