//! Small celebration line printed after a successful `wp init`.

const PALETTE: &[u8] = &[91, 92, 93, 94, 95, 96];

/// Prints `message` with each character in a random bright color, or
/// plainly when rich output is disabled.
pub fn celebrate(message: &str, rich: bool) {
    if !rich {
        println!("{message}");
        return;
    }
    let mut line = String::new();
    for ch in message.chars() {
        let color = PALETTE[fastrand::usize(..PALETTE.len())];
        line.push_str(&format!("\x1b[{color}m{ch}"));
    }
    line.push_str("\x1b[0m");
    println!("{line}");
}
