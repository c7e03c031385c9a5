use isobox::util::hex_dump;

#[test]
fn one_row_per_sixteen_bytes() {
    let data = (0u8..20).collect::<Vec<_>>();
    let dump = hex_dump(&data, 0x100, 16);
    let lines: Vec<&str> = dump.lines().collect();

    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("00000100  00 01 02"));
    assert!(lines[1].starts_with("00000110  10 11 12 13"));
}

#[test]
fn row_width_is_configurable() {
    let data = (0u8..10).collect::<Vec<_>>();
    let dump = hex_dump(&data, 0, 4);
    let lines: Vec<&str> = dump.lines().collect();

    assert_eq!(lines.len(), 3);
    assert!(lines[1].starts_with("00000004  04 05 06 07"));
    // Short last row is padded so the ASCII column lines up.
    assert_eq!(lines[2].find('|'), lines[0].find('|'));
    assert!(lines[2].ends_with("|..|"));
}

#[test]
fn zero_width_falls_back_to_one_byte_rows() {
    let dump = hex_dump(b"ab", 0, 0);
    assert_eq!(dump.lines().count(), 2);
}

#[test]
fn printable_bytes_show_in_ascii_column() {
    let dump = hex_dump(b"ftyp\x00", 0, 16);
    assert!(dump.trim_end().ends_with("|ftyp.|"));
}

#[test]
fn empty_input_is_empty() {
    assert!(hex_dump(&[], 0, 16).is_empty());
}
