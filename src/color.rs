use core::fmt::Display;
use std::io::IsTerminal;

#[derive(Clone, Copy, Debug, Default, Hash, PartialEq, Eq)]
#[repr(u8)]
pub enum Fg {
    #[default]
    Default = 0,
    Black = 30,
    Red = 31,
    Green = 32,
    Yellow = 33,
    Blue = 34,
    Magenta = 35,
    Cyan = 36,
    LightGray = 37,
    DarkGray = 90,
    LightRed = 91,
    LightGreen = 92,
    LightYellow = 93,
    LightBlue = 94,
    LightMagenta = 95,
    LightCyan = 96,
    White = 97,
}

#[derive(Clone, Copy, Debug, Default, Hash, PartialEq, Eq)]
#[repr(u8)]
pub enum Bg {
    #[default]
    Default = 0,
    Black = 40,
    DarkRed = 41,
    DarkGreen = 42,
    DarkYellow = 43,
    DarkBlue = 44,
    DarkMagenta = 45,
    DarkCyan = 46,
    DarkWhite = 47,
    BrightBlack = 100,
    BrightRed = 101,
    BrightGreen = 102,
    BrightYellow = 103,
    BrightBlue = 104,
    BrightMagenta = 105,
    BrightCyan = 106,
    White = 107,
}

pub type Flags = u8;

pub struct Flag;

#[allow(non_upper_case_globals, dead_code)]
impl Flag {
    pub const Default: Flags = 0b0000_0000;
    pub const Bold: Flags = 0b0000_0001;
    pub const Underline: Flags = 0b0000_0010;
    pub const NoUnderline: Flags = 0b0000_0100;
    pub const ReverseText: Flags = 0b0000_1000;
    pub const PositiveText: Flags = 0b0001_0000;
}

#[allow(non_upper_case_globals)]
static mut print: fn(&str, Fg, Bg, Flags, &mut core::fmt::Formatter<'_>) -> core::fmt::Result =
    print_color;

fn print_no_color(
    text: &str,
    _: Fg,
    _: Bg,
    _: Flags,
    f: &mut core::fmt::Formatter<'_>,
) -> core::fmt::Result {
    return text.fmt(f);
}

fn print_color(
    text: &str,
    fg: Fg,
    bg: Bg,
    flags: Flags,
    f: &mut core::fmt::Formatter<'_>,
) -> core::fmt::Result {
    let mut codes = String::with_capacity(16);

    if fg != Fg::Default {
        codes += &format!("{};", fg as u8);
    }
    if bg != Bg::Default {
        codes += &format!("{};", bg as u8);
    }
    if flags & Flag::Bold != 0 {
        codes += "1;";
    }
    if flags & Flag::Underline != 0 {
        codes += "4;";
    }
    if flags & Flag::NoUnderline != 0 {
        codes += "24;";
    }
    if flags & Flag::ReverseText != 0 {
        codes += "7;";
    }
    if flags & Flag::PositiveText != 0 {
        codes += "27;";
    }

    if codes.is_empty() {
        return text.fmt(f);
    }

    _ = codes.pop(); // removing the trailing ";"

    write!(f, "\x1b[{codes}m")?;
    text.fmt(f)?;
    return write!(f, "\x1b[0m");
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Colored<Text: AsRef<str>> {
    pub text: Text,
    pub fg: Fg,
    pub bg: Bg,
    pub flags: Flags,
}

impl<Text: AsRef<str>> Display for Colored<Text> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        return unsafe { print(self.text.as_ref(), self.fg, self.bg, self.flags, f) };
    }
}

pub type ColoredStr = Colored<&'static str>;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Color {
    #[default]
    Auto,
    Always,
    Never,
}

impl Color {
    pub fn set(self, stream: &impl IsTerminal) {
        let print_fn = match self {
            Self::Auto => {
                if stream.is_terminal() {
                    print_color
                } else {
                    print_no_color
                }
            }
            Self::Always => print_color,
            Self::Never => print_no_color,
        };

        unsafe { print = print_fn };
    }
}

impl Display for Color {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        return match self {
            Self::Auto => write!(f, "auto"),
            Self::Always => write!(f, "always"),
            Self::Never => write!(f, "never"),
        };
    }
}
