//! Named color palettes for the chooser UI.
//!
//! A palette assigns a foreground/background pair to each UI role. The
//! built-in palettes can be extended or overridden from the config file,
//! and the active palette is cycled at runtime.

use ratatui::style::{Color, Modifier, Style};
use serde::{Deserialize, Serialize};

/// UI roles that take a palette color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiRole {
    /// Top line with the link count and handler mode.
    Header,
    /// Bottom line: key hints.
    Footer,
    /// Bottom line: transient status and search input.
    Status,
    /// Context paragraphs.
    MsgText,
    /// Spacers between context groups.
    Ellipsis,
    /// The link text itself.
    Url,
    /// The `[n]` index marker.
    Index,
    /// The entry under the cursor.
    Focus,
    /// The entry matched by an active search.
    Search,
}

/// One role's attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleStyle {
    pub fg: Color,
    pub bg: Color,
    #[serde(default)]
    pub bold: bool,
}

impl RoleStyle {
    fn new(fg: Color, bg: Color, bold: bool) -> Self {
        Self { fg, bg, bold }
    }

    pub fn style(&self) -> Style {
        let style = Style::default().fg(self.fg).bg(self.bg);
        if self.bold {
            style.add_modifier(Modifier::BOLD)
        } else {
            style
        }
    }
}

/// A complete named palette.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Palette {
    pub name: String,
    pub header: RoleStyle,
    pub footer: RoleStyle,
    pub status: RoleStyle,
    pub msgtext: RoleStyle,
    pub ellipsis: RoleStyle,
    pub url: RoleStyle,
    pub index: RoleStyle,
    pub focus: RoleStyle,
    pub search: RoleStyle,
}

impl Palette {
    /// The default dark palette.
    pub fn dark() -> Self {
        Self {
            name: "default".to_string(),
            header: RoleStyle::new(Color::White, Color::Blue, true),
            footer: RoleStyle::new(Color::White, Color::Blue, false),
            status: RoleStyle::new(Color::White, Color::Red, true),
            msgtext: RoleStyle::new(Color::Gray, Color::Reset, false),
            ellipsis: RoleStyle::new(Color::DarkGray, Color::Reset, false),
            url: RoleStyle::new(Color::White, Color::Reset, false),
            index: RoleStyle::new(Color::Yellow, Color::Reset, true),
            focus: RoleStyle::new(Color::Black, Color::Yellow, true),
            search: RoleStyle::new(Color::Black, Color::Cyan, false),
        }
    }

    /// Monochrome palette for terminals without color.
    pub fn mono() -> Self {
        let plain = RoleStyle::new(Color::Reset, Color::Reset, false);
        Self {
            name: "mono".to_string(),
            header: RoleStyle::new(Color::Reset, Color::Reset, true),
            footer: plain.clone(),
            status: RoleStyle::new(Color::Reset, Color::Reset, true),
            msgtext: plain.clone(),
            ellipsis: plain.clone(),
            url: RoleStyle::new(Color::Reset, Color::Reset, true),
            index: RoleStyle::new(Color::Reset, Color::Reset, true),
            focus: RoleStyle::new(Color::Black, Color::White, false),
            search: RoleStyle::new(Color::Black, Color::White, false),
        }
    }

    pub fn style(&self, role: UiRole) -> Style {
        match role {
            UiRole::Header => self.header.style(),
            UiRole::Footer => self.footer.style(),
            UiRole::Status => self.status.style(),
            UiRole::MsgText => self.msgtext.style(),
            UiRole::Ellipsis => self.ellipsis.style(),
            UiRole::Url => self.url.style(),
            UiRole::Index => self.index.style(),
            UiRole::Focus => self.focus.style(),
            UiRole::Search => self.search.style(),
        }
    }
}

/// The palettes shipped with linksift, in cycle order.
pub fn builtin_palettes() -> Vec<Palette> {
    vec![Palette::dark(), Palette::mono()]
}

/// Builtins plus config-defined palettes: a config palette with a builtin's
/// name replaces it in place, new names are appended in config order.
pub fn merge_palettes(from_config: Vec<Palette>) -> Vec<Palette> {
    let mut palettes = builtin_palettes();
    for palette in from_config {
        match palettes.iter_mut().find(|p| p.name == palette.name) {
            Some(existing) => *existing = palette,
            None => palettes.push(palette),
        }
    }
    palettes
}
