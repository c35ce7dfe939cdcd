//! Frame layout constants
//!
//! ```text
//! +--------+------------+------+-----------+------+------+
//! | size   | request id | type | body      | 0x00 | 0x00 |
//! | i32 LE | i32 LE     | i32  | N bytes   |      |      |
//! +--------+------------+------+-----------+------+------+
//!          |<------------------ size ------------------->|
//! ```

/// Width of the leading size field
pub const SIZE_FIELD_LEN: usize = 4;

/// Request id + type fields
pub const HEADER_LEN: usize = 8;

/// Body terminator + empty trailing string
pub const TERMINATOR_LEN: usize = 2;

/// Smallest legal value of the size field (empty body)
pub const MIN_PACKET_SIZE: usize = HEADER_LEN + TERMINATOR_LEN;

/// Largest body the engine puts in a single response packet
pub const MAX_RESPONSE_BODY: usize = 4096;

/// Default upper bound on the size field accepted from a peer
pub const DEFAULT_MAX_PACKET_SIZE: usize = 64 * 1024;

/// Value of the size field for a body of `body_len` bytes
pub const fn packet_size(body_len: usize) -> usize {
    MIN_PACKET_SIZE + body_len
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_packet_size() {
        assert_eq!(packet_size(0), 10);
        assert_eq!(packet_size(8), 18);
    }

    #[test]
    fn test_default_guard_fits_engine_packets() {
        assert!(DEFAULT_MAX_PACKET_SIZE >= packet_size(MAX_RESPONSE_BODY));
    }
}
