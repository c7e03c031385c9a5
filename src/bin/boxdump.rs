use anyhow::{Context, bail};
use clap::{ArgAction, Parser};
use isobox::{AnyBox, WalkEntry, default_registry, util::hex_dump, walk_siblings};
use std::fs;
use std::path::PathBuf;
use tracing::Level;

#[derive(Parser, Debug)]
#[command(version, about = "Decode the sibling boxes of an ISO base media file")]
struct Args {
    /// File to inspect
    path: PathBuf,

    /// Byte offset of the first box header
    #[arg(long, default_value_t = 0)]
    offset: u32,

    /// Stop after this many boxes
    #[arg(long)]
    limit: Option<usize>,

    /// Hex dump up to this many payload bytes per box (0 disables)
    #[arg(long, default_value_t = 0)]
    bytes: usize,

    /// Bytes per hex dump row
    #[arg(long, default_value_t = 16)]
    width: usize,

    /// Emit JSON instead of one line per box
    #[arg(long, action = ArgAction::SetTrue)]
    json: bool,

    /// Log decoder activity to stderr (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let data =
        fs::read(&args.path).with_context(|| format!("reading {}", args.path.display()))?;
    if u32::try_from(data.len()).is_err() {
        bail!(
            "{} is {} bytes; only buffers below 4 GiB can be addressed",
            args.path.display(),
            data.len()
        );
    }

    let reg = default_registry();
    let entries = walk_siblings(&reg, &data, args.offset, args.limit)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    for entry in &entries {
        print_entry(entry);
        if args.bytes > 0 {
            if let Some(decoded) = &entry.decoded {
                let start = decoded.header().payload_start();
                let stop = entry.end.min(start.saturating_add(args.bytes as u64));
                if start < stop {
                    print!(
                        "{}",
                        hex_dump(&data[start as usize..stop as usize], start, args.width)
                    );
                }
            }
        }
    }
    Ok(())
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn print_entry(entry: &WalkEntry) {
    let Some(decoded) = &entry.decoded else {
        println!(
            "{:>10} {:>10} <error: {}>",
            format!("{:#x}", entry.offset),
            entry.len(),
            entry.error.as_deref().unwrap_or("unknown")
        );
        return;
    };

    let hdr = decoded.header();
    let typ = match hdr.uuid() {
        Some(u) => format!("uuid:{}", hex::encode(u)),
        None => hdr.box_type().to_string(),
    };
    let mut line = format!(
        "{:>10} {:>10} {} ({})",
        format!("{:#x}", entry.offset),
        hdr.size(),
        typ,
        entry.name
    );
    if let Some((version, flags)) = decoded.version_and_flags() {
        line.push_str(&format!(" ver={version} flags=0x{flags:06x}"));
    }
    if let Some(summary) = summarize(decoded) {
        line.push_str("  ");
        line.push_str(&summary);
    }
    println!("{line}");
}

fn summarize(b: &AnyBox) -> Option<String> {
    match b {
        AnyBox::FileType(b) => {
            let p = b.payload();
            let brands: Vec<String> = p.compatible_brands.iter().map(|c| c.to_string()).collect();
            Some(format!(
                "major={} minor={} compatible={:?}",
                p.major_brand, p.minor_version, brands
            ))
        }
        AnyBox::OriginalFormat(b) => Some(format!("format={}", b.payload().data_format)),
        AnyBox::SchemeType(b) => {
            let p = b.payload();
            Some(format!(
                "scheme={} version=0x{:08x}{}",
                p.scheme_type,
                p.scheme_version,
                p.scheme_uri
                    .as_deref()
                    .map(|u| format!(" uri={u}"))
                    .unwrap_or_default()
            ))
        }
        AnyBox::TrackEncryption(b) => {
            let p = b.payload();
            Some(format!(
                "protected={} iv_size={} kid={} pattern={}:{}",
                p.default_is_protected,
                p.default_per_sample_iv_size,
                hex::encode(p.default_kid),
                p.default_crypt_byte_block,
                p.default_skip_byte_block
            ))
        }
        AnyBox::ProtectionSystem(b) => {
            let p = b.payload();
            Some(format!(
                "system={} ({}) key_ids={} data={} bytes",
                hex::encode(p.system_id),
                p.system_name().unwrap_or("unknown"),
                p.key_ids.len(),
                p.data.len()
            ))
        }
        AnyBox::Full(_) | AnyBox::Opaque(_) => None,
    }
}
