use clap::ValueEnum;
use ratatui::style::Color;
use signal_map::Grade;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn palette(self) -> Palette {
        match self {
            Theme::Light => Palette::LIGHT,
            Theme::Dark => Palette::DARK,
        }
    }
}

/// Colors for every themed element of the dashboard
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub background: Color,
    pub panel: Color,
    pub border: Color,
    pub text: Color,
    pub muted: Color,
    pub accent: Color,
    pub title: Color,
    pub coastline: Color,
    pub borders: Color,
    pub cursor: Color,
    pub live: Color,
    pub error: Color,
    pub grade3: Color,
    pub grade2: Color,
    pub grade1: Color,
    pub ungraded: Color,
}

const fn hex(rgb: u32) -> Color {
    Color::Rgb((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
}

/// Bar colors for categorical charts, cycled in order
pub const CHART_COLORS: [Color; 8] = [
    hex(0x009edb),
    hex(0xff3355),
    hex(0x00c853),
    hex(0xff9933),
    hex(0x8e44ad),
    hex(0xffcc00),
    hex(0x3498db),
    hex(0xe74c3c),
];

impl Palette {
    pub const LIGHT: Palette = Palette {
        background: hex(0xe8eef5),
        panel: hex(0xffffff),
        border: hex(0xc5d1e0),
        text: hex(0x2c3e50),
        muted: hex(0x6a7a94),
        accent: hex(0x009edb),
        title: hex(0x0056b3),
        coastline: hex(0x7f8fa6),
        borders: hex(0xb0bccc),
        cursor: hex(0xd62246),
        live: hex(0xff3355),
        error: hex(0xc0392b),
        grade3: hex(0xff3355),
        grade2: hex(0xff9933),
        grade1: hex(0xcc9900),
        ungraded: hex(0xa0a0b0),
    };

    pub const DARK: Palette = Palette {
        background: hex(0x0f1419),
        panel: hex(0x1a1f26),
        border: hex(0x2a3441),
        text: hex(0xe2e8f0),
        muted: hex(0x94a3b8),
        accent: hex(0x3b82f6),
        title: hex(0x60a5fa),
        coastline: hex(0x4b5b70),
        borders: hex(0x334155),
        cursor: hex(0xf87171),
        live: hex(0xff3355),
        error: hex(0xf87171),
        grade3: hex(0xff3355),
        grade2: hex(0xff9933),
        grade1: hex(0xffcc00),
        ungraded: hex(0xa0a0b0),
    };

    /// Badge color for a grade label
    pub fn grade(&self, grade: Grade) -> Color {
        match grade {
            Grade::Grade3 => self.grade3,
            Grade::Grade2 => self.grade2,
            Grade::Grade1 => self.grade1,
            Grade::Ungraded => self.ungraded,
        }
    }
}
