use crate::boxes::FourCC;

/// Name and layout facts about a common ISO base media box type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KnownBox {
    pub code: FourCC,
    pub full_name: &'static str,
    /// Payload starts with version and flags.
    pub full_box: bool,
}

const TABLE: &[(&[u8; 4], &str, bool)] = &[
    // top level
    (b"ftyp", "File Type Box", false),
    (b"styp", "Segment Type Box", false),
    (b"moov", "Movie Box", false),
    (b"moof", "Movie Fragment Box", false),
    (b"mdat", "Media Data Box", false),
    (b"free", "Free Space Box", false),
    (b"skip", "Free Space Box", false),
    (b"wide", "Wide Box", false),
    (b"uuid", "User Extension Box", false),
    (b"sidx", "Segment Index Box", true),
    (b"pssh", "Protection System Specific Header Box", true),
    // movie
    (b"mvhd", "Movie Header Box", true),
    (b"trak", "Track Box", false),
    (b"tkhd", "Track Header Box", true),
    (b"edts", "Edit Box", false),
    (b"elst", "Edit List Box", true),
    (b"mdia", "Media Box", false),
    (b"mdhd", "Media Header Box", true),
    (b"hdlr", "Handler Reference Box", true),
    (b"minf", "Media Information Box", false),
    (b"vmhd", "Video Media Header Box", true),
    (b"smhd", "Sound Media Header Box", true),
    (b"nmhd", "Null Media Header Box", true),
    (b"dinf", "Data Information Box", false),
    (b"dref", "Data Reference Box", true),
    (b"stbl", "Sample Table Box", false),
    (b"stsd", "Sample Description Box", true),
    (b"stts", "Decoding Time to Sample Box", true),
    (b"ctts", "Composition Time to Sample Box", true),
    (b"stsc", "Sample To Chunk Box", true),
    (b"stsz", "Sample Size Box", true),
    (b"stco", "Chunk Offset Box", true),
    (b"co64", "Chunk Large Offset Box", true),
    (b"stss", "Sync Sample Box", true),
    (b"udta", "User Data Box", false),
    // fragments
    (b"mvex", "Movie Extends Box", false),
    (b"mehd", "Movie Extends Header Box", true),
    (b"trex", "Track Extends Box", true),
    (b"mfhd", "Movie Fragment Header Box", true),
    (b"traf", "Track Fragment Box", false),
    (b"tfhd", "Track Fragment Header Box", true),
    (b"tfdt", "Track Fragment Decode Time Box", true),
    (b"trun", "Track Fragment Run Box", true),
    // protection
    (b"sinf", "Protection Scheme Information Box", false),
    (b"frma", "Original Format Box", false),
    (b"schm", "Scheme Type Box", true),
    (b"schi", "Scheme Information Box", false),
    (b"tenc", "Track Encryption Box", true),
    (b"saio", "Sample Auxiliary Information Offsets Box", true),
    (b"saiz", "Sample Auxiliary Information Sizes Box", true),
    (b"senc", "Sample Encryption Box", true),
];

impl KnownBox {
    pub fn lookup(code: FourCC) -> Option<KnownBox> {
        TABLE
            .iter()
            .find(|(cc, _, _)| **cc == code.0)
            .map(|&(cc, full_name, full_box)| KnownBox {
                code: FourCC::new(cc),
                full_name,
                full_box,
            })
    }

    pub fn all() -> impl Iterator<Item = KnownBox> {
        TABLE.iter().map(|&(cc, full_name, full_box)| KnownBox {
            code: FourCC::new(cc),
            full_name,
            full_box,
        })
    }
}

/// Human-readable name for a type code, `"Unknown Box"` if not in the table.
pub fn full_name(code: FourCC) -> &'static str {
    KnownBox::lookup(code).map_or("Unknown Box", |k| k.full_name)
}

pub fn is_full_box(code: FourCC) -> bool {
    KnownBox::lookup(code).is_some_and(|k| k.full_box)
}
