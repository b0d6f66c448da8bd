//! Human-readable byte sizes.

const UNITS: [&str; 5] = ["Bytes", "KB", "MB", "GB", "TB"];
const STEP: u64 = 1024;

/// Formats `bytes` with binary (1024) units, e.g. `1536` → `"1.5 KB"`.
///
/// The value is rounded to `decimals` places and trailing zeros are dropped.
/// Sizes of 1024 TB and above stay in TB.
#[must_use]
pub fn format_bytes(bytes: u64, decimals: usize) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut unit = 0;
    let mut divisor = 1_u64;
    while unit < UNITS.len() - 1 && bytes / divisor >= STEP {
        divisor *= STEP;
        unit += 1;
    }

    #[allow(clippy::cast_precision_loss)]
    let value = bytes as f64 / divisor as f64;
    format!("{} {}", trim_decimal(&format!("{value:.decimals$}")), UNITS[unit])
}

/// Drops trailing fractional zeros and a dangling decimal point.
fn trim_decimal(rendered: &str) -> &str {
    if rendered.contains('.') {
        rendered.trim_end_matches('0').trim_end_matches('.')
    } else {
        rendered
    }
}
