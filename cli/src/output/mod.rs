pub mod colorize;

use colorize::{Colorize, ColorizeBookmark, ColorizeFolder};
use serde::Serialize;
use std::io::Write;
use webmarks::error::Result;
use webmarks::models::{Bookmark, Folder};

/// How command results are written
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputMode {
    pub json: bool,
    pub no_color: bool,
}

pub fn write_json<T: Serialize + ?Sized>(out: &mut dyn Write, value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value)?;
    writeln!(out, "{}", text)?;
    Ok(())
}

fn render(item: &dyn Colorize, no_color: bool) -> String {
    if no_color {
        item.to_plain()
    } else {
        item.to_colored()
    }
}

pub fn write_bookmarks(out: &mut dyn Write, mode: OutputMode, bookmarks: &[Bookmark]) -> Result<()> {
    if mode.json {
        return write_json(out, bookmarks);
    }
    for bookmark in bookmarks {
        writeln!(out, "{}", render(&ColorizeBookmark(bookmark), mode.no_color))?;
    }
    Ok(())
}

pub fn write_folders(out: &mut dyn Write, mode: OutputMode, folders: &[Folder], bookmarks: &[Bookmark]) -> Result<()> {
    let mut sorted: Vec<&Folder> = folders.iter().collect();
    sorted.sort_by_key(|f| f.order);
    if mode.json {
        return write_json(out, &sorted);
    }
    for folder in sorted {
        let count = bookmarks.iter().filter(|b| b.folder_id == folder.id).count();
        writeln!(out, "{}", render(&ColorizeFolder(folder, count), mode.no_color))?;
    }
    Ok(())
}
