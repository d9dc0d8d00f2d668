//! Hexdump command implementation.
//!
//! Displays dump bytes in traditional hexdump format, useful for checking
//! what a signature matched and where a resolved address points.
//!
//! # Output Format
//!
//! ```text
//! 0x140001000: 48 65 6C 6C 6F 20 57 6F  72 6C 64 00 00 00 00 00  |Hello World.....|
//! ```

use anyhow::Result;
use sigaddr::ReadMemory;

use super::hex_utils::format_hex_address;
use crate::config::DumpSettings;

/// Run the hexdump command
pub fn run(settings: &DumpSettings, address: u64, size: usize, ascii: bool) -> Result<()> {
    let region = settings.load_region()?;
    let available = region.end_address().saturating_sub(address) as usize;
    let bytes = region.read_bytes(address, size.min(available))?;

    println!("Hexdump at {} ({} bytes):", format_hex_address(address), bytes.len());
    println!();

    for (i, chunk) in bytes.chunks(16).enumerate() {
        println!("{}", format_line(address + (i * 16) as u64, chunk, ascii));
    }

    Ok(())
}

fn format_line(address: u64, chunk: &[u8], ascii: bool) -> String {
    let mut line = format!("{}: ", format_hex_address(address));

    // Hex bytes
    for (j, byte) in chunk.iter().enumerate() {
        if j == 8 {
            line.push(' ');
        }
        line.push_str(&format!("{:02X} ", byte));
    }

    // Padding for incomplete lines
    for j in chunk.len()..16 {
        if j == 8 {
            line.push(' ');
        }
        line.push_str("   ");
    }

    // ASCII representation
    if ascii {
        line.push_str(" |");
        for byte in chunk {
            if *byte >= 0x20 && *byte < 0x7F {
                line.push(*byte as char);
            } else {
                line.push('.');
            }
        }
        for _ in chunk.len()..16 {
            line.push(' ');
        }
        line.push('|');
    }

    line
}
