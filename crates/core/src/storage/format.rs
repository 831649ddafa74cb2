use crate::errors::ClientError;

/// Magic bytes identifying a persisted credential file.
pub const MAGIC: &[u8; 4] = b"FTCR";

/// Current file format version.
pub const CURRENT_VERSION: u16 = 1;

/// Header size in bytes: magic(4) + version(2) + payload_len(8) = 14
pub const HEADER_SIZE: usize = 14;

/// Upper bound on the payload; a bearer token is a few hundred bytes.
pub const MAX_PAYLOAD_LEN: u64 = 64 * 1024;

/// Header read from a credential file.
#[derive(Debug)]
pub struct FileHeader {
    pub version: u16,
    pub payload_len: u64,
}

/// Write a complete credential file to bytes.
///
/// Layout:
/// ```text
/// [FTCR: 4B] [version: 2B LE] [payload_len: 8B LE] [payload: variable]
/// ```
pub fn write_file(version: u16, payload: &[u8]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(HEADER_SIZE + payload.len());
    buf.extend_from_slice(MAGIC);
    buf.extend_from_slice(&version.to_le_bytes());
    buf.extend_from_slice(&(payload.len() as u64).to_le_bytes());
    buf.extend_from_slice(payload);
    buf
}

/// Parse the header from raw file bytes.
/// Returns the header and the payload slice.
pub fn read_file(data: &[u8]) -> Result<(FileHeader, &[u8]), ClientError> {
    if data.len() < HEADER_SIZE {
        return Err(ClientError::InvalidFileFormat(
            "File too small to be a credential file".into(),
        ));
    }

    if &data[0..4] != MAGIC {
        return Err(ClientError::InvalidFileFormat(
            "Invalid magic bytes, not a credential file".into(),
        ));
    }

    let version = u16::from_le_bytes([data[4], data[5]]);
    if version == 0 || version > CURRENT_VERSION {
        return Err(ClientError::UnsupportedVersion(version));
    }

    let payload_len = u64::from_le_bytes(data[6..HEADER_SIZE].try_into().map_err(|_| {
        ClientError::InvalidFileFormat("Failed to read payload length".into())
    })?);

    if payload_len > MAX_PAYLOAD_LEN {
        return Err(ClientError::InvalidFileFormat(format!(
            "Payload length {payload_len} exceeds maximum of {MAX_PAYLOAD_LEN} bytes"
        )));
    }

    let expected_end = HEADER_SIZE + payload_len as usize;
    if data.len() < expected_end {
        return Err(ClientError::InvalidFileFormat(format!(
            "File truncated: expected {} bytes of payload, got {}",
            payload_len,
            data.len() - HEADER_SIZE
        )));
    }

    Ok((
        FileHeader {
            version,
            payload_len,
        },
        &data[HEADER_SIZE..expected_end],
    ))
}
