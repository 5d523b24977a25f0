//! Input builders shared by the benchmarks.

/// Netscape bookmark HTML with `folders` nested folders of `per_folder` links each
pub fn sample_html(folders: usize, per_folder: usize) -> String {
    let mut html = String::from("<!DOCTYPE NETSCAPE-Bookmark-file-1>\n<TITLE>Bookmarks</TITLE>\n<DL><p>\n");
    for f in 0..folders {
        html.push_str(&format!("  <DT><H3 ADD_DATE=\"0\">Folder &amp; {}</H3>\n  <DL><p>\n", f));
        for b in 0..per_folder {
            html.push_str(&format!(
                "    <DT><A HREF=\"https://example.com/{}/{}?a=1&amp;b=2\" ADD_DATE=\"0\">Link {} &lt;{}&gt;</A>\n",
                f, b, b, f
            ));
        }
        html.push_str("  </DL><p>\n");
    }
    html.push_str("</DL><p>\n");
    html
}
