use std::fmt::Write;

use crate::model::{Catalog, Class, Library, Members, Method, Value};
use crate::{Error, Result};

/// Offsets anchors below the fixed page header.
const ANCHOR_STYLE: &str = "height:65px; margin-top: -65px; display:block;";

/// Rendered reference: main content and the matching navigation outline.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Page {
    pub content: String,
    pub nav: String,
}

/// Render every library in catalog order.
pub fn render(catalog: &Catalog) -> Result<Page> {
    let mut page = Page::default();
    for library in &catalog.libraries {
        write_library(&mut page, library).map_err(|err| Error::Render(err.to_string()))?;
    }
    Ok(page)
}

fn write_library(page: &mut Page, lib: &Library) -> std::fmt::Result {
    let key = &lib.key;
    let s = &mut page.content;
    write!(s, "<div id=\"lib-{key}\">")?;
    write!(s, "<a style=\"height:0; display:block;\" name=\"{key}\"></a>")?;
    write!(
        page.nav,
        "<details><summary class=\"nav_lib_link\"><a href=\"#{key}\">lib/{key}</a></summary>"
    )?;
    write!(s, "<div class=\"lib_key\"><p>lib/{key}</p></div>")?;
    write!(s, "<div class=\"metadata\">")?;
    write!(s, "<p class=\"lib_name\">{}</p>", lib.name)?;
    write!(s, "<p class=\"lib_file\">{}</p>", lib.file)?;
    s.push_str("<div class=\"imports\">");
    for import in &lib.import {
        write!(
            s,
            "<p><span class=\"import\">import </span><span class=\"import_name\">\"{import}\"</span></p>"
        )?;
    }
    s.push_str("</div><div class=\"loads\">");
    for load in &lib.load {
        write!(
            s,
            "<p><span class=\"load\">load </span><a href=\"#{load}\" class=\"load_name\">\"{load}\"</a></p>"
        )?;
    }
    s.push_str("</div></div>");

    write_members(page, key, &lib.members)?;

    page.content.push_str("</div>");
    page.nav.push_str("</details>");
    Ok(())
}

fn write_members(page: &mut Page, parent: &str, members: &Members) -> std::fmt::Result {
    if !members.values.is_empty() {
        page.content.push_str("<table class=\"values\">");
        for value in &members.values {
            write_value(&mut page.content, value)?;
        }
        page.content.push_str("</table>");
    }

    if !members.methods.is_empty() {
        page.content.push_str("<div class=\"methods\">");
        for method in &members.methods {
            write_method(page, parent, method)?;
        }
        page.content.push_str("</div>");
    }

    if !members.classes.is_empty() {
        page.content.push_str("<div class=\"classes\">");
        for class in &members.classes {
            write_class(page, parent, class)?;
        }
        page.content.push_str("</div>");
    }
    Ok(())
}

fn write_value(s: &mut String, v: &Value) -> std::fmt::Result {
    write!(
        s,
        "<tr class=\"value\"><td class=\"value_key\">{}</td><td class=\"value_desc\">{}</td><td class=\"value_value\">{}</td></tr>",
        v.key, v.desc, v.value
    )
}

fn write_method(page: &mut Page, parent: &str, m: &Method) -> std::fmt::Result {
    let anchor = format!("{parent}.{}", m.name);
    write!(
        page.nav,
        "<p class=\"nav_method_link\"><a href=\"#{anchor}\">{}()</a></p>",
        m.name
    )?;

    let s = &mut page.content;
    write!(s, "<a style=\"{ANCHOR_STYLE}\" name=\"{anchor}\"></a>")?;
    s.push_str("<div class=\"method\"><div class=\"method_head\">");
    if let Some(template) = &m.template {
        write!(s, "<span class=\"template\">{template}::</span>")?;
    }
    write!(s, "<span class=\"method_name\">{}(", m.name)?;
    for (i, p) in m.params.iter().enumerate() {
        if i > 0 {
            s.push_str(", ");
        }
        if let Some(modifier) = &p.modifier {
            write!(s, "<span class=\"param_modifier\">{modifier} </span>")?;
        }
        write!(s, "<span class=\"param_key\">{}</span>", p.key)?;
    }
    s.push(')');
    if let Some(returns) = &m.returns {
        write!(
            s,
            "<span class=\"return_arrow\"> => </span><span class=\"return_type\">{returns}</span>"
        )?;
    }
    s.push_str("</span></div>");

    if !m.params.is_empty() {
        s.push_str("<table class=\"param_types\">");
        for p in &m.params {
            write!(
                s,
                "<tr><td class=\"param_type_key\">{}</td><td class=\"param_type_type\">",
                p.key
            )?;
            for t in &p.types {
                write!(s, "<p>{t}</p>")?;
            }
            s.push_str("</td></tr>");
        }
        s.push_str("</table>");
    }

    s.push_str("<div class=\"method_body\">");
    write!(s, "<p>{}</p>", m.desc)?;
    if !m.see.is_empty() {
        s.push_str("<div class=\"see_also\"><p style=\"font-style: italic;\">Confer:</p>");
        for link in &m.see {
            write!(s, "<p><a class=\"see_link\" href=\"#{link}\">{link}()</a></p>")?;
        }
        s.push_str("</div>");
    }
    s.push_str("</div></div>");
    Ok(())
}

fn write_class(page: &mut Page, parent: &str, c: &Class) -> std::fmt::Result {
    let path = format!("{parent}.{}", c.name);
    write!(
        page.nav,
        "<details><summary class=\"nav_class_link\"><a href=\"#{path}\">{}</a></summary>",
        c.name
    )?;

    let s = &mut page.content;
    write!(s, "<a style=\"{ANCHOR_STYLE}\" name=\"{path}\"></a>")?;
    s.push_str("<div class=\"class\"><div class=\"class_head\">");
    write!(s, "<span class=\"class_modifier\">{} </span>", c.modifier)?;
    write!(
        s,
        "<span class=\"class_name\">{} </span><span class=\"class_dec\">class</span>",
        c.name
    )?;
    s.push_str("</div><div class=\"class_body\">");

    write_members(page, &path, &c.members)?;

    page.content.push_str("</div></div>");
    page.nav.push_str("</details>");
    Ok(())
}
