//! Compile command implementation.

use anyhow::Result;
use sigaddr::CompiledPattern;

use super::hex_utils::format_word;

/// Run the compile command
pub fn run(signature: &str) -> Result<()> {
    let pattern = CompiledPattern::compile(signature)?;

    println!("Signature: {}", pattern);
    println!("Padded:    {}", pattern.padded_text());
    println!(
        "Length:    {} bytes ({} padded, {} chunks)",
        pattern.literal_len(),
        pattern.padded_len(),
        pattern.chunks().len()
    );
    println!();
    println!("{:<6} {:<20} {:<20}", "Chunk", "Value", "Mask");
    for (i, chunk) in pattern.chunks().iter().enumerate() {
        println!(
            "{:<6} {:<20} {:<20}",
            i,
            format_word(chunk.value),
            format_word(chunk.mask)
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_accepts_wildcards() {
        assert!(run("48 8B 05 ?? ?? ?? ?? E8 ? ? ? ?").is_ok());
    }

    #[test]
    fn test_compile_rejects_bad_token() {
        let err = run("48 ZZ 05").unwrap_err();
        assert!(err.to_string().contains("ZZ"));
        assert!(run("   ").is_err());
    }
}
