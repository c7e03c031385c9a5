use std::fmt::Write;

/// Hex dump of `bytes`, `per_line` bytes to a row, each row labelled with its
/// offset counted from `start_offset`. A `per_line` of 0 is treated as 1.
pub fn hex_dump(bytes: &[u8], start_offset: u64, per_line: usize) -> String {
    let per_line = per_line.max(1);
    let hex_width = per_line * 3;
    let mut out = String::new();
    let mut offs = start_offset;
    for row in bytes.chunks(per_line) {
        let mut hex = String::with_capacity(hex_width);
        let mut ascii = String::with_capacity(row.len());
        for &b in row {
            let _ = write!(hex, "{b:02x} ");
            ascii.push(if b.is_ascii_graphic() || b == b' ' { b as char } else { '.' });
        }
        let _ = writeln!(out, "{offs:08x}  {hex:<hex_width$}  |{ascii}|");
        offs += row.len() as u64;
    }
    out
}
