//! Style model: base length scales, the closed style-token set, and the
//! rotating palette of dataset themes.

use serde::{Deserialize, Serialize};

use crate::backend::DrawContext;
use crate::stamps::StampShape;

/// RGB triple, each channel in [0, 1].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Color {
    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    pub const BLACK: Color = Color::new(0.0, 0.0, 0.0);
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0);

    pub fn apply(&self, ctx: &mut dyn DrawContext) {
        ctx.set_source_rgb(self.r, self.g, self.b);
    }
}

/// The closed set of style tokens the core references.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StyleToken {
    BgLinework,
    BgFill,
    GenericLine,
    GenericStamp,
    GenericBand,
    Foreground,
    Muted,
}

/// One entry of the rotating dataset palette: the color, dash pattern and
/// symbol a field painter gets for its primary style number.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataTheme {
    pub color: Color,
    pub dash: Vec<f64>,
    pub symbol: StampShape,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Theme {
    /// Base unit for stamp sizes, paddings, tick lengths.
    pub small_scale: f64,
    /// Base unit for larger gaps (outer painter padding, key swatches).
    pub large_scale: f64,
    pub line_width: f64,
    pub background: Color,
    pub foreground: Color,
    pub muted: Color,
    pub faint: Color,
    pub data_themes: Vec<DataTheme>,
}

impl Default for Theme {
    fn default() -> Self {
        Self::black_on_white()
    }
}

impl Theme {
    pub fn black_on_white() -> Self {
        Self {
            small_scale: 3.0,
            large_scale: 12.0,
            line_width: 1.0,
            background: Color::WHITE,
            foreground: Color::BLACK,
            muted: Color::new(0.4, 0.4, 0.4),
            faint: Color::new(0.85, 0.85, 0.85),
            data_themes: default_data_themes(),
        }
    }

    pub fn white_on_black() -> Self {
        Self {
            background: Color::BLACK,
            foreground: Color::WHITE,
            muted: Color::new(0.6, 0.6, 0.6),
            faint: Color::new(0.2, 0.2, 0.2),
            ..Self::black_on_white()
        }
    }

    /// Load a palette override, e.g. from a user config file.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Resolve a token to concrete drawing state: source color, line
    /// width, dash pattern.
    pub fn apply(&self, ctx: &mut dyn DrawContext, token: StyleToken) {
        match token {
            StyleToken::BgLinework => {
                self.faint.apply(ctx);
                ctx.set_line_width(self.line_width);
                ctx.set_dash(&[], 0.0);
            }
            StyleToken::BgFill => {
                self.background.apply(ctx);
                ctx.set_dash(&[], 0.0);
            }
            StyleToken::GenericLine | StyleToken::GenericStamp => {
                self.foreground.apply(ctx);
                ctx.set_line_width(self.line_width);
                ctx.set_dash(&[], 0.0);
            }
            StyleToken::GenericBand => {
                self.faint.apply(ctx);
                ctx.set_dash(&[], 0.0);
            }
            StyleToken::Foreground => {
                self.foreground.apply(ctx);
                ctx.set_line_width(self.line_width);
                ctx.set_dash(&[], 0.0);
            }
            StyleToken::Muted => {
                self.muted.apply(ctx);
                ctx.set_line_width(self.line_width);
                ctx.set_dash(&[], 0.0);
            }
        }
    }

    fn data_theme(&self, dsn: usize) -> &DataTheme {
        &self.data_themes[dsn % self.data_themes.len()]
    }

    /// Line state for the dataset with primary style number `dsn`.
    pub fn apply_data_line(&self, ctx: &mut dyn DrawContext, dsn: usize) {
        let theme = self.data_theme(dsn);
        theme.color.apply(ctx);
        ctx.set_line_width(self.line_width);
        ctx.set_dash(&theme.dash, 0.0);
    }

    /// Stamp state for `dsn`: same color, but never dashed.
    pub fn apply_data_stamp(&self, ctx: &mut dyn DrawContext, dsn: usize) {
        let theme = self.data_theme(dsn);
        theme.color.apply(ctx);
        ctx.set_line_width(self.line_width);
        ctx.set_dash(&[], 0.0);
    }

    /// Symbol shape assigned to `dsn` by the rotating palette.
    pub fn symbol_for(&self, dsn: usize) -> StampShape {
        self.data_theme(dsn).symbol
    }

    pub fn data_color(&self, dsn: usize) -> Color {
        self.data_theme(dsn).color
    }

    /// Resolve a symbolic color name.
    pub fn get_color(&self, name: &str) -> Option<Color> {
        match name {
            "background" => Some(self.background),
            "foreground" => Some(self.foreground),
            "muted" => Some(self.muted),
            "faint" => Some(self.faint),
            _ => None,
        }
    }
}

fn default_data_themes() -> Vec<DataTheme> {
    let solid: Vec<f64> = vec![];
    vec![
        DataTheme {
            color: Color::new(0.12, 0.35, 0.75),
            dash: solid.clone(),
            symbol: StampShape::Circle,
        },
        DataTheme {
            color: Color::new(0.85, 0.20, 0.15),
            dash: vec![4.0, 2.0],
            symbol: StampShape::Square,
        },
        DataTheme {
            color: Color::new(0.10, 0.60, 0.25),
            dash: vec![1.0, 2.0],
            symbol: StampShape::UpTriangle,
        },
        DataTheme {
            color: Color::new(0.55, 0.20, 0.65),
            dash: vec![6.0, 2.0, 1.0, 2.0],
            symbol: StampShape::Diamond,
        },
        DataTheme {
            color: Color::new(0.90, 0.55, 0.10),
            dash: solid.clone(),
            symbol: StampShape::DownTriangle,
        },
        DataTheme {
            color: Color::new(0.05, 0.65, 0.70),
            dash: vec![2.0, 2.0],
            symbol: StampShape::X,
        },
        DataTheme {
            color: Color::new(0.45, 0.45, 0.45),
            dash: solid,
            symbol: StampShape::Plus,
        },
    ]
}
