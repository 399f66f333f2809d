//! Flavor content keyed by tile value, and scoreboard number formatting.
//! Pure lookup/formatting; no game logic depends on anything here.

/// One label per power of two, 2 through 131072; anything larger saturates
/// onto the last entry.
const LABELS: [&str; 18] = [
    "大家好",
    "我是",
    "练习时长",
    "两年半的",
    "个人练习生",
    "CXK",
    "喜欢",
    "唱",
    "跳",
    "RAP",
    "篮球",
    "MUSIC",
    "鸡",
    "你",
    "太",
    "美",
    "BABY",
    "OH~",
];

/// Label for a tile value (powers of two, minimum 2).
pub fn label_for(value: u32) -> &'static str {
    let exponent = value.max(2).trailing_zeros() as usize;
    LABELS[exponent.clamp(1, LABELS.len()) - 1]
}

/// Compact scoreboard rendering: plain up to five digits, then K/M
/// suffixes with three significant digits, then scientific.
pub fn format_points(points: u64) -> String {
    if points >= 100_000_000 {
        format!("{:.1e}", points as f64)
    } else if points >= 1_000_000 {
        format!("{}M", sig3(points as f64 / 1e6))
    } else if points >= 100_000 {
        format!("{}K", sig3(points as f64 / 1e3))
    } else {
        points.to_string()
    }
}

fn sig3(x: f64) -> String {
    if x >= 100.0 {
        format!("{x:.0}")
    } else if x >= 10.0 {
        format!("{x:.1}")
    } else {
        format!("{x:.2}")
    }
}
