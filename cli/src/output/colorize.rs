use owo_colors::OwoColorize;
use webmarks::models::{Bookmark, Folder};

pub trait Colorize {
    fn to_colored(&self) -> String;
    fn to_plain(&self) -> String;
}

pub struct ColorizeBookmark<'a>(pub &'a Bookmark);

impl Colorize for ColorizeBookmark<'_> {
    fn to_colored(&self) -> String {
        let b = self.0;
        let mut s = format!("{}. {}\n", b.id.bright_blue(), b.display_name().bold().green());
        let padding = b.id.len() + 3;
        s.push_str(&format!("{:>padding$} {}\n", ">".red(), b.url.yellow()));
        if !b.icon.trim().is_empty() {
            s.push_str(&format!("{:>padding$} {}\n", "+".red(), b.icon));
        }
        s
    }

    fn to_plain(&self) -> String {
        let b = self.0;
        let mut s = format!("{}. {}\n", b.id, b.display_name());
        let padding = b.id.len() + 3;
        s.push_str(&format!("{:>padding$} {}\n", ">", b.url));
        if !b.icon.trim().is_empty() {
            s.push_str(&format!("{:>padding$} {}\n", "+", b.icon));
        }
        s
    }
}

/// A folder with the number of bookmarks it holds
pub struct ColorizeFolder<'a>(pub &'a Folder, pub usize);

impl Colorize for ColorizeFolder<'_> {
    fn to_colored(&self) -> String {
        let marker = if self.0.is_default() { "*" } else { " " };
        format!(
            "{} {}. {} ({})",
            marker.red(),
            self.0.id.bright_blue(),
            self.0.name.bold().green(),
            self.1
        )
    }

    fn to_plain(&self) -> String {
        let marker = if self.0.is_default() { "*" } else { " " };
        format!("{} {}. {} ({})", marker, self.0.id, self.0.name, self.1)
    }
}
