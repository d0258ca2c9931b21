use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
};

use sbmigrate_core::Confirmation;

/// Renders migrator info text for a terminal.
pub fn plain_text(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut rest = html;
    while let Some(start) = rest.find('<') {
        out.push_str(&rest[..start]);
        let Some(end) = rest[start..].find('>') else {
            rest = &rest[start..];
            break;
        };
        match &rest[start + 1..start + end] {
            "li" => out.push_str("\n  - "),
            "/p" | "/ul" => out.push('\n'),
            _ => {}
        }
        rest = &rest[start + end + 1..];
    }
    out.push_str(rest);

    let out = out
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&amp;", "&");
    let lines: Vec<&str> = out
        .lines()
        .map(str::trim_end)
        .filter(|l| !l.trim().is_empty())
        .collect();
    lines.join("\n")
}

/// Asks on the terminal, defaulting to "no". Reads stdin, so keep it off async tasks.
pub struct StdinConfirmation {
    pub project: PathBuf,
}

impl Confirmation for StdinConfirmation {
    fn confirm(&mut self, html_info_text: &str) -> bool {
        println!("{}:\n{}", self.project.display(), plain_text(html_info_text));
        print!("Migrate {}? [y/N] ", self.project.display());
        if let Err(e) = io::stdout().flush() {
            tracing::warn!("Failed to flush stdout: {e}");
        }

        let mut answer = String::new();
        match io::stdin().lock().read_line(&mut answer) {
            Ok(_) => matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"),
            Err(e) => {
                tracing::warn!("Failed to read answer: {e}");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::plain_text;

    #[test]
    fn test_plain_text() {
        let html = "<p>This project needs to be migrated:</p><ul><li><p>Rename <b>2</b> documents \
                    from <code>.ccb</code> to <code>.sb</code>.</p></li><li><p>A &amp; B</p></li></ul>";
        assert_eq!(
            plain_text(html),
            "This project needs to be migrated:\n  - Rename 2 documents from .ccb to .sb.\n  - A & B"
        );
    }
}
