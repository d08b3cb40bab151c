use crate::render::Page;

pub const DEFAULT_TITLE: &str = "Sono Documentation";

#[derive(Debug, Clone)]
pub struct PageOptions {
    pub title: String,
    /// Linked from the document head when set.
    pub stylesheet: Option<String>,
}

impl Default for PageOptions {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            stylesheet: None,
        }
    }
}

/// Wrap rendered content and outline into a standalone HTML document.
pub fn assemble(page: &Page, options: &PageOptions) -> String {
    let stylesheet = options
        .stylesheet
        .as_ref()
        .map(|href| format!("<link rel=\"stylesheet\" href=\"{href}\">\n"))
        .unwrap_or_default();
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title}</title>\n{stylesheet}</head>\n<body>\n\
         <div id=\"nav\">{nav}</div>\n<div id=\"cont\">{content}</div>\n\
         </body>\n</html>\n",
        title = options.title,
        nav = page.nav,
        content = page.content,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assemble_places_both_parts() {
        let page = Page {
            content: "<div id=\"lib-system\"></div>".into(),
            nav: "<details></details>".into(),
        };
        let html = assemble(&page, &PageOptions::default());
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Sono Documentation</title>"));
        assert!(html.contains("<div id=\"nav\"><details></details></div>"));
        assert!(html.contains("<div id=\"cont\"><div id=\"lib-system\"></div></div>"));
        assert!(!html.contains("stylesheet"));
        assert!(html.contains("<meta charset=\"utf-8\">\n<title>"));
        assert!(html.ends_with("</div>\n</body>\n</html>\n"));
    }

    #[test]
    fn test_stylesheet_link() {
        let options = PageOptions {
            title: "Docs".into(),
            stylesheet: Some("docs.css".into()),
        };
        let html = assemble(&Page::default(), &options);
        assert!(html.contains("<title>Docs</title>\n<link rel=\"stylesheet\" href=\"docs.css\">\n</head>"));
    }
}
