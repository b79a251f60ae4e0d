use std::io::IsTerminal;

use clap::{ValueEnum, builder::styling::Ansi256Color};
use comfy_table::Color as ComfyColor;
use crossterm::style::Color;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ColorMode {
  Always,
  Auto,
  Never,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ThemeMode {
  Dark,
  Light,
  Auto,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
  Dark,
  Light,
}

/// What a piece of terminal output is, independent of the palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
  Timestamp,
  Primary,
  Accent,
  Label,
  Value,
  Success,
  Warning,
}

#[derive(Debug, Clone, Copy)]
pub struct Colors {
  enabled: bool,
  theme: Theme,
}

impl Colors {
  pub const fn new(enabled: bool, theme: Theme) -> Self {
    Self { enabled, theme }
  }

  const fn pick(&self, role: Role) -> Color {
    if !self.enabled {
      return Color::Reset;
    }

    match (self.theme, role) {
      (Theme::Dark, Role::Timestamp | Role::Success) => Color::Rgb { r: 118, g: 166, b: 166 },
      (Theme::Dark, Role::Primary) => Color::Rgb { r: 191, g: 126, b: 4 },
      (Theme::Dark, Role::Accent) => Color::Rgb { r: 166, g: 84, b: 55 },
      (Theme::Dark, Role::Label) => Color::Rgb { r: 217, g: 164, b: 4 },
      (Theme::Dark, Role::Value) => Color::Rgb { r: 242, g: 211, b: 56 },
      (Theme::Dark, Role::Warning) => Color::Rgb { r: 230, g: 120, b: 70 },
      (Theme::Light, Role::Timestamp) => Color::Rgb { r: 92, g: 62, b: 38 },
      (Theme::Light, Role::Primary) => Color::Rgb { r: 70, g: 42, b: 25 },
      (Theme::Light, Role::Accent) => Color::Rgb { r: 211, g: 99, b: 70 },
      (Theme::Light, Role::Label) => Color::Rgb { r: 176, g: 103, b: 66 },
      (Theme::Light, Role::Value) => Color::Rgb { r: 199, g: 146, b: 76 },
      (Theme::Light, Role::Success) => Color::Rgb { r: 34, g: 142, b: 90 },
      (Theme::Light, Role::Warning) => Color::Rgb { r: 190, g: 70, b: 40 },
    }
  }

  pub const fn timestamp(&self) -> Color {
    self.pick(Role::Timestamp)
  }

  pub const fn primary(&self) -> Color {
    self.pick(Role::Primary)
  }

  pub const fn accent(&self) -> Color {
    self.pick(Role::Accent)
  }

  pub const fn label(&self) -> Color {
    self.pick(Role::Label)
  }

  pub const fn value(&self) -> Color {
    self.pick(Role::Value)
  }

  pub const fn success(&self) -> Color {
    self.pick(Role::Success)
  }

  pub const fn warning(&self) -> Color {
    self.pick(Role::Warning)
  }

  /// Help output styling; always the dark palette since clap renders before themes are known.
  pub const fn clap_styles() -> clap::builder::Styles {
    use clap::builder::styling::{Style, Styles};

    let colors = Self::new(true, Theme::Dark);

    Styles::styled()
      .header(Style::new().bold().underline().fg_color(to_clap(colors.label())))
      .usage(Style::new().bold().fg_color(to_clap(colors.label())))
      .literal(Style::new().fg_color(to_clap(colors.success())))
      .placeholder(Style::new().fg_color(to_clap(colors.primary())))
      .error(Style::new().bold().fg_color(to_clap(colors.warning())))
      .valid(Style::new().fg_color(to_clap(colors.success())))
      .invalid(Style::new().bold().fg_color(to_clap(colors.warning())))
  }
}

const fn to_clap(color: Color) -> Option<clap::builder::styling::Color> {
  use clap::builder::styling::{AnsiColor, Color as ClapColor, RgbColor};

  match color {
    Color::Black => Some(ClapColor::Ansi(AnsiColor::Black)),
    Color::Blue | Color::DarkBlue => Some(ClapColor::Ansi(AnsiColor::Blue)),
    Color::Cyan | Color::DarkCyan => Some(ClapColor::Ansi(AnsiColor::Cyan)),
    Color::DarkGreen | Color::Green => Some(ClapColor::Ansi(AnsiColor::Green)),
    Color::DarkGrey | Color::Grey => Some(ClapColor::Ansi(AnsiColor::BrightBlack)),
    Color::DarkMagenta | Color::Magenta => Some(ClapColor::Ansi(AnsiColor::Magenta)),
    Color::DarkRed | Color::Red => Some(ClapColor::Ansi(AnsiColor::Red)),
    Color::DarkYellow | Color::Yellow => Some(ClapColor::Ansi(AnsiColor::Yellow)),
    Color::White => Some(ClapColor::Ansi(AnsiColor::White)),
    Color::AnsiValue(val) => Some(ClapColor::Ansi256(Ansi256Color(val))),
    Color::Rgb { r, g, b } => Some(ClapColor::Rgb(RgbColor(r, g, b))),
    Color::Reset => None,
  }
}

/// The same color for table cells.
pub fn to_comfy(color: Color) -> ComfyColor {
  match color {
    Color::Reset => ComfyColor::Reset,
    Color::Black => ComfyColor::Black,
    Color::DarkGrey => ComfyColor::DarkGrey,
    Color::Red => ComfyColor::Red,
    Color::DarkRed => ComfyColor::DarkRed,
    Color::Green => ComfyColor::Green,
    Color::DarkGreen => ComfyColor::DarkGreen,
    Color::Yellow => ComfyColor::Yellow,
    Color::DarkYellow => ComfyColor::DarkYellow,
    Color::Blue => ComfyColor::Blue,
    Color::DarkBlue => ComfyColor::DarkBlue,
    Color::Magenta => ComfyColor::Magenta,
    Color::DarkMagenta => ComfyColor::DarkMagenta,
    Color::Cyan => ComfyColor::Cyan,
    Color::DarkCyan => ComfyColor::DarkCyan,
    Color::White => ComfyColor::White,
    Color::Grey => ComfyColor::Grey,
    Color::Rgb { r, g, b } => ComfyColor::Rgb { r, g, b },
    Color::AnsiValue(val) => ComfyColor::AnsiValue(val),
  }
}

pub fn colors_enabled(mode: ColorMode) -> bool {
  match mode {
    ColorMode::Always => true,
    ColorMode::Never => false,
    ColorMode::Auto => std::io::stdout().is_terminal(),
  }
}

pub fn detect_theme(mode: ThemeMode) -> Theme {
  match mode {
    ThemeMode::Dark => Theme::Dark,
    ThemeMode::Light => Theme::Light,
    ThemeMode::Auto => theme_from_colorfgbg(std::env::var("COLORFGBG").ok().as_deref()).unwrap_or(Theme::Dark),
  }
}

/// `COLORFGBG` is `fg;bg`; background indices 8 and up are light.
fn theme_from_colorfgbg(value: Option<&str>) -> Option<Theme> {
  let background = value?.split(';').next_back()?.parse::<u8>().ok()?;
  Some(if background >= 8 { Theme::Light } else { Theme::Dark })
}
