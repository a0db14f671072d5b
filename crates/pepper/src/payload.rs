use {
    crate::PepperError,
    std::time::Duration,
    tokio::{
        io::{AsyncRead, AsyncReadExt},
        time::timeout,
    },
};

/// Read exactly `len` bytes from `reader`.
///
/// The transport may hand back fewer bytes than asked for, so reads are
/// accumulated until the buffer is full. Each read only asks for the bytes
/// still missing; nothing past `len` is consumed, leaving the stream aligned
/// on the next reply.
///
/// Returns `PepperError::ConnectionClosed` when a read yields zero bytes and
/// `PepperError::Timeout` when a single read makes no progress within
/// `read_timeout`.
pub async fn read_payload<R: AsyncRead + Unpin>(
    reader: &mut R,
    len: usize,
    read_timeout: Duration,
) -> Result<Vec<u8>, PepperError> {
    let mut payload = vec![0u8; len];
    let mut received = 0;

    while received < len {
        let count = match timeout(read_timeout, reader.read(&mut payload[received..])).await {
            Ok(result) => result?,
            Err(_) => return Err(PepperError::Timeout(read_timeout)),
        };
        if count == 0 {
            return Err(PepperError::ConnectionClosed {
                received,
                expected: len,
            });
        }
        received += count;
    }

    Ok(payload)
}
