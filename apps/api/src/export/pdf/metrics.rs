//! Glyph widths for the two standard Type1 fonts the exporter uses.
//!
//! Widths are in thousandths of an em, taken from the Adobe core-14 AFM files.
//! Tables cover ASCII 0x20..=0x7E. Index = (char as usize) - 32.

/// A4 in points.
pub const PAGE_WIDTH: f32 = 595.28;
pub const PAGE_HEIGHT: f32 = 841.89;
pub const MARGIN: f32 = 72.0;
pub const CONTENT_WIDTH: f32 = PAGE_WIDTH - 2.0 * MARGIN;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    Helvetica,
    HelveticaBold,
}

impl Font {
    /// Resource name inside page content streams.
    pub fn resource(&self) -> &'static str {
        match self {
            Font::Helvetica => "F1",
            Font::HelveticaBold => "F2",
        }
    }

    pub fn base_font(&self) -> &'static str {
        match self {
            Font::Helvetica => "Helvetica",
            Font::HelveticaBold => "Helvetica-Bold",
        }
    }

    fn table(&self) -> &'static [u16; 95] {
        match self {
            Font::Helvetica => &HELVETICA,
            Font::HelveticaBold => &HELVETICA_BOLD,
        }
    }

    /// Width of one character in thousandths of an em.
    pub fn char_width(&self, c: char) -> u16 {
        let code = c as usize;
        if (32..=126).contains(&code) {
            self.table()[code - 32]
        } else if c == '•' {
            BULLET_WIDTH
        } else {
            FALLBACK_WIDTH
        }
    }

    /// Rendered width of `s` in points at `size`.
    pub fn measure_str(&self, s: &str, size: f32) -> f32 {
        let units: u32 = s.chars().map(|c| u32::from(self.char_width(c))).sum();
        units as f32 * size / 1000.0
    }
}

const BULLET_WIDTH: u16 = 350;
const FALLBACK_WIDTH: u16 = 556;

// ────────────────────────────────────────────────────────────────────────────
// Width tables
// ────────────────────────────────────────────────────────────────────────────

#[rustfmt::skip]
static HELVETICA: [u16; 95] = [
    // sp   !    "    #    $    %    &    '    (    )    *    +    ,    -    .    /
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    // 0-9
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    // :    ;    <    =    >    ?    @
    278, 278, 584, 584, 584, 556, 1015,
    // A    B    C    D    E    F    G    H    I    J    K    L    M
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833,
    // N    O    P    Q    R    S    T    U    V    W    X    Y    Z
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    // [    \    ]    ^    _    `
    278, 278, 278, 469, 556, 333,
    // a    b    c    d    e    f    g    h    i    j    k    l    m
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833,
    // n    o    p    q    r    s    t    u    v    w    x    y    z
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500,
    // {    |    }    ~
    334, 260, 334, 584,
];

#[rustfmt::skip]
static HELVETICA_BOLD: [u16; 95] = [
    // sp   !    "    #    $    %    &    '    (    )    *    +    ,    -    .    /
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    // 0-9
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    // :    ;    <    =    >    ?    @
    333, 333, 584, 584, 584, 611, 975,
    // A    B    C    D    E    F    G    H    I    J    K    L    M
    722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833,
    // N    O    P    Q    R    S    T    U    V    W    X    Y    Z
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    // [    \    ]    ^    _    `
    333, 278, 333, 584, 556, 333,
    // a    b    c    d    e    f    g    h    i    j    k    l    m
    556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889,
    // n    o    p    q    r    s    t    u    v    w    x    y    z
    611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500,
    // {    |    }    ~
    389, 280, 389, 584,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_widths() {
        assert_eq!(Font::Helvetica.char_width(' '), 278);
        assert_eq!(Font::Helvetica.char_width('W'), 944);
        assert_eq!(Font::HelveticaBold.char_width('m'), 889);
        assert_eq!(Font::Helvetica.char_width('~'), 584);
        assert_eq!(Font::Helvetica.char_width('•'), 350);
        assert_eq!(Font::Helvetica.char_width('é'), 556);
    }

    #[test]
    fn test_measure_scales_with_size() {
        let w10 = Font::Helvetica.measure_str("Interview", 10.0);
        let w20 = Font::Helvetica.measure_str("Interview", 20.0);
        assert!((w20 - 2.0 * w10).abs() < 1e-3);
        assert!(Font::HelveticaBold.measure_str("Interview", 10.0) > w10);
    }
}
