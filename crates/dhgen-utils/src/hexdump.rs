//! Hexdump formatting for binary buffers.

/// Format bytes as offset-prefixed rows of 16 hex digits with an ASCII
/// gutter, grouped in fours.
pub fn hexdump(data: &[u8]) -> String {
    let mut out = String::new();
    for (row, chunk) in data.chunks(16).enumerate() {
        out.push_str(&format!("{:08x}  ", row * 16));
        for i in 0..16 {
            if i == 4 || i == 8 || i == 12 {
                out.push(' ');
            }
            match chunk.get(i) {
                Some(b) => out.push_str(&format!("{b:02x}")),
                None => out.push_str("  "),
            }
        }
        out.push_str(" |");
        for i in 0..16 {
            match chunk.get(i) {
                Some(&b) if (32..127).contains(&b) => out.push(b as char),
                Some(_) => out.push('.'),
                None => out.push(' '),
            }
        }
        out.push_str("|\n");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_row() {
        let dump = hexdump(b"ABCD");
        assert!(dump.starts_with("00000000  41424344"));
        assert!(dump.ends_with("|ABCD            |\n"));
    }

    #[test]
    fn test_row_count() {
        assert_eq!(hexdump(&[0u8; 33]).lines().count(), 3);
        assert_eq!(hexdump(&[]).lines().count(), 0);
    }

    #[test]
    fn test_nonprintable() {
        let dump = hexdump(&[0x00, 0x41, 0x7F]);
        assert!(dump.contains("|.A."));
    }
}
