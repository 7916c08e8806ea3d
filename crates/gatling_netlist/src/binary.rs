//! Reader and writer for the pinned binary gate-file format.
//!
//! A gate file is a flat sequence of 32-bit little-endian unsigned integers,
//! consumed three at a time as `(in1, in2, out)` wire-index triples and
//! terminated by [`END_SENTINEL`]. [`MALFORMED_SENTINEL`] never appears in a
//! valid file; encountering it (or hitting EOF before the end sentinel)
//! fails the load.

use std::io::{self, Read, Write};

use crate::error::NetlistError;
use crate::model::{Gate, Wire};

/// Terminates the value stream. Valid only at a triple boundary.
pub const END_SENTINEL: u32 = 0xFFFF_FFFF;

/// Reserved marker for malformed output; fails a load wherever it appears.
pub const MALFORMED_SENTINEL: u32 = 0xFFFF_FFFE;

/// Reads gate triples from `reader` until the end sentinel.
///
/// Returns the gates in file order. Fails on the malformed sentinel, on an
/// end sentinel inside a triple, or on EOF before the end sentinel. A file
/// containing only the end sentinel yields zero gates.
pub fn read_gates<R: Read>(reader: R) -> Result<Vec<Gate>, NetlistError> {
    let mut values = ValueReader::new(reader);
    let mut gates = Vec::new();

    loop {
        let first = match values.next()? {
            Some(v) => v,
            None => return Err(NetlistError::UnexpectedEof),
        };
        if first == END_SENTINEL {
            return Ok(gates);
        }
        let in1 = check_value(first, values.position() - 1)?;

        let mut rest = [0u32; 2];
        for slot in rest.iter_mut() {
            let value = match values.next()? {
                Some(v) => v,
                None => return Err(NetlistError::UnexpectedEof),
            };
            if value == END_SENTINEL {
                return Err(NetlistError::TruncatedTriple {
                    position: values.position() - 1,
                });
            }
            *slot = check_value(value, values.position() - 1)?;
        }

        gates.push(Gate::new(
            Wire::from_raw(in1),
            Wire::from_raw(rest[0]),
            Wire::from_raw(rest[1]),
        ));
    }
}

/// Writes gate triples followed by the end sentinel.
///
/// Fails if any wire index collides with the reserved sentinel values.
pub fn write_gates<W: Write>(mut writer: W, gates: &[Gate]) -> Result<(), NetlistError> {
    for gate in gates {
        for wire in [gate.in1, gate.in2, gate.out] {
            let index = wire.as_raw();
            if index > Wire::MAX_INDEX {
                return Err(NetlistError::WireIndexReserved { index });
            }
            writer.write_all(&index.to_le_bytes())?;
        }
    }
    writer.write_all(&END_SENTINEL.to_le_bytes())?;
    writer.flush()?;
    Ok(())
}

/// Rejects the malformed sentinel in a value position.
fn check_value(value: u32, position: u64) -> Result<u32, NetlistError> {
    if value == MALFORMED_SENTINEL {
        return Err(NetlistError::MalformedSentinel { position });
    }
    Ok(value)
}

/// Pulls 32-bit little-endian values off a byte stream, tracking position.
struct ValueReader<R> {
    reader: R,
    position: u64,
}

impl<R: Read> ValueReader<R> {
    fn new(reader: R) -> Self {
        Self {
            reader,
            position: 0,
        }
    }

    /// Number of whole values consumed so far.
    fn position(&self) -> u64 {
        self.position
    }

    /// Reads the next value; `None` on clean EOF, error on EOF mid-value.
    fn next(&mut self) -> Result<Option<u32>, NetlistError> {
        let mut buf = [0u8; 4];
        let mut filled = 0;
        while filled < 4 {
            match self.reader.read(&mut buf[filled..]) {
                Ok(0) => {
                    if filled == 0 {
                        return Ok(None);
                    }
                    return Err(NetlistError::UnexpectedEof);
                }
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
        self.position += 1;
        Ok(Some(u32::from_le_bytes(buf)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(values: &[u32]) -> Vec<u8> {
        values.iter().flat_map(|v| v.to_le_bytes()).collect()
    }

    fn w(i: u32) -> Wire {
        Wire::from_raw(i)
    }

    #[test]
    fn read_empty_stream() {
        let bytes = encode(&[END_SENTINEL]);
        let gates = read_gates(&bytes[..]).unwrap();
        assert!(gates.is_empty());
    }

    #[test]
    fn read_single_triple() {
        let bytes = encode(&[0, 1, 2, END_SENTINEL]);
        let gates = read_gates(&bytes[..]).unwrap();
        assert_eq!(gates, vec![Gate::new(w(0), w(1), w(2))]);
    }

    #[test]
    fn read_multiple_triples() {
        let bytes = encode(&[0, 1, 2, 2, 2, 3, END_SENTINEL]);
        let gates = read_gates(&bytes[..]).unwrap();
        assert_eq!(gates.len(), 2);
        assert_eq!(gates[1], Gate::new(w(2), w(2), w(3)));
    }

    #[test]
    fn reject_malformed_sentinel() {
        let bytes = encode(&[0, MALFORMED_SENTINEL, 2, END_SENTINEL]);
        let err = read_gates(&bytes[..]).unwrap_err();
        assert!(matches!(
            err,
            NetlistError::MalformedSentinel { position: 1 }
        ));
    }

    #[test]
    fn reject_end_sentinel_mid_triple() {
        let bytes = encode(&[0, 1, END_SENTINEL]);
        let err = read_gates(&bytes[..]).unwrap_err();
        assert!(matches!(err, NetlistError::TruncatedTriple { .. }));
    }

    #[test]
    fn reject_missing_end_sentinel() {
        let bytes = encode(&[0, 1, 2]);
        let err = read_gates(&bytes[..]).unwrap_err();
        assert!(matches!(err, NetlistError::UnexpectedEof));
    }

    #[test]
    fn reject_partial_value_at_eof() {
        let mut bytes = encode(&[0, 1, 2]);
        bytes.extend_from_slice(&[0xAA, 0xBB]); // half a value
        let err = read_gates(&bytes[..]).unwrap_err();
        assert!(matches!(err, NetlistError::UnexpectedEof));
    }

    #[test]
    fn write_read_roundtrip() {
        let gates = vec![
            Gate::new(w(0), w(1), w(2)),
            Gate::new(w(5), w(5), w(6)),
            Gate::new(w(2), w(6), w(7)),
        ];
        let mut bytes = Vec::new();
        write_gates(&mut bytes, &gates).unwrap();
        let back = read_gates(&bytes[..]).unwrap();
        assert_eq!(back, gates);
    }

    #[test]
    fn write_rejects_reserved_index() {
        let gates = vec![Gate::new(w(0), w(MALFORMED_SENTINEL), w(1))];
        let mut bytes = Vec::new();
        let err = write_gates(&mut bytes, &gates).unwrap_err();
        assert!(matches!(
            err,
            NetlistError::WireIndexReserved {
                index: MALFORMED_SENTINEL
            }
        ));
    }

    #[test]
    fn little_endian_layout() {
        let gates = vec![Gate::new(w(0x0102_0304), w(0), w(1))];
        let mut bytes = Vec::new();
        write_gates(&mut bytes, &gates).unwrap();
        assert_eq!(&bytes[0..4], &[0x04, 0x03, 0x02, 0x01]);
    }

    #[test]
    fn file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gates.nand");
        let gates = vec![Gate::new(w(0), w(1), w(2))];
        {
            let file = std::fs::File::create(&path).unwrap();
            write_gates(file, &gates).unwrap();
        }
        let file = std::fs::File::open(&path).unwrap();
        let back = read_gates(file).unwrap();
        assert_eq!(back, gates);
    }
}
