//! Console banners for operator-facing progress output

use std::io::Write;

/// Format a message framed by `=` rules as wide as the message.
pub fn banner(msg: &str) -> String {
    let rule = "=".repeat(msg.chars().count());
    format!("\n{rule}\n{msg}\n{rule}")
}

/// Print a banner to stdout
pub fn print_banner(msg: &str) {
    println!("{}", banner(msg));
}

/// Write a banner line to `out`
pub fn write_banner<W: Write + ?Sized>(out: &mut W, msg: &str) -> std::io::Result<()> {
    writeln!(out, "{}", banner(msg))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_banner_width_matches_message() {
        assert_eq!(banner("Updating mods"), "\n=============\nUpdating mods\n=============");
    }

    #[test]
    fn test_write_banner() {
        let mut out = Vec::new();
        write_banner(&mut out, "Done!").unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "\n=====\nDone!\n=====\n");
    }

    #[test]
    fn test_banner_counts_chars_not_bytes() {
        let b = banner("Mod « x »");
        let lines: Vec<_> = b.lines().collect();
        assert_eq!(lines[1].len(), "Mod « x »".chars().count());
    }
}
