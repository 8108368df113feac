//! Static HTML template for the modpack report

use std::fmt::Write;

use super::{Category, Report, ReportEntry};

const STYLE: &str = r#"body {
margin: 0;
padding: 0;
color: #fff;
background: #000;
}
body, th, td {
font: 95%/1.3 Roboto, Segoe UI, Tahoma, Arial, Helvetica, sans-serif;
}
td {
padding: 3px 30px 3px 0;
}
h1 {
padding: 20px 20px 0 20px;
color: white;
font-weight: 200;
font-family: segoe ui;
font-size: 3em;
margin: 0;
}
h2 {
color: white;
padding: 20px 20px 0 20px;
margin: 0;
}
em {
font-variant: italic;
color: silver;
}
.before-list {
padding: 5px 20px 10px 20px;
}
.mod-list {
background: #282828;
padding: 20px;
}
.optional-list, .dlc-list {
background: #222222;
padding: 20px;
}
.footer {
padding: 20px;
color: gray;
}
a {
color: #D18F21;
text-decoration: underline;
}
a:hover {
color: #F1AF41;
text-decoration: none;
}
.from-steam {
color: #449EBD;
}
"#;

/// Escape text we put into the page ourselves
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

fn push_row(html: &mut String, entry: &ReportEntry) {
    let url = escape(&entry.remote_url);

    // Workshop titles come from Steam's own markup and are already encoded
    let title = match entry.category {
        Category::Dlc => escape(&entry.display_title),
        Category::Required | Category::Optional => entry.display_title.clone(),
    };

    let container = match entry.category {
        Category::Required => "ModContainer",
        Category::Optional => "OptionalContainer",
        Category::Dlc => "DlcContainer",
    };

    let _ = writeln!(html, "<tr data-type=\"{}\">", container);
    let _ = writeln!(html, "<td data-type=\"DisplayName\">{}</td>", title);
    if entry.category != Category::Dlc {
        html.push_str("<td>\n<span class=\"from-steam\">Steam</span>\n</td>\n");
    }
    let _ = writeln!(html, "<td>\n<a href=\"{}\" data-type=\"Link\">{}</a>\n</td>", url, url);
    html.push_str("</tr>\n");
}

fn push_table(html: &mut String, heading: &str, class: &str, entries: &[ReportEntry]) {
    let _ = writeln!(html, "<h2 class=\"list-heading\">{}</h2>", heading);
    let _ = writeln!(html, "<div class=\"{}\">", class);
    html.push_str("<table>\n");
    for entry in entries {
        push_row(html, entry);
    }
    html.push_str("</table>\n</div>\n");
}

/// Render the full report document
pub fn render(report: &Report) -> String {
    let name = escape(&report.modpack_name);
    let game = escape(report.game.name());
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\" />\n");
    let _ = writeln!(html, "<meta name=\"generator\" content=\"workshop-sync {}\" />", env!("CARGO_PKG_VERSION"));
    let _ = writeln!(html, "<title>{} - {}</title>", game, name);
    html.push_str("<link href=\"https://fonts.googleapis.com/css?family=Roboto\" rel=\"stylesheet\" type=\"text/css\" />\n");
    html.push_str("<style>\n");
    html.push_str(STYLE);
    html.push_str("</style>\n</head>\n<body>\n");

    let _ = writeln!(html, "<h1>{} - Modpack <strong>{}</strong></h1>", game, name);
    html.push_str("<p class=\"before-list\">\n<em>Subscribe to the mods below on the Steam Workshop before joining the server.</em>\n</p>\n");

    push_table(&mut html, "Required Mods", "mod-list", &report.required);
    push_table(&mut html, "Optional Mods", "optional-list", &report.optional);
    push_table(&mut html, "DLC", "dlc-list", &report.dlc);

    html.push_str("<div class=\"footer\">\n<span>Generated by workshop-sync.</span>\n</div>\n");
    html.push_str("</body>\n</html>\n");
    html
}
