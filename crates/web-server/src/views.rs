//! Server-side HTML for the two pages: the student list and the edit form.
//!
//! Every piece of user or database text goes through [`escape`] before it is
//! written into the markup.

use core_types::{SortColumn, SortOrder, Student};
use std::fmt::Write;

/// Everything the list page shows.
#[derive(Debug, Default)]
pub struct IndexPage {
    pub students: Vec<Student>,
    pub error: Option<String>,
    /// NIM of a student that was just deleted, for the confirmation banner.
    pub deleted_nim: Option<String>,
    pub sort: SortColumn,
    pub order: SortOrder,
    pub search_text: String,
    pub min_score_text: String,
}

impl IndexPage {
    pub fn with_error(students: Vec<Student>, error: String) -> Self {
        Self {
            students,
            error: Some(error),
            ..Self::default()
        }
    }
}

#[derive(Debug)]
pub struct EditPage {
    pub student: Student,
    pub error: Option<String>,
    pub success: bool,
}

pub fn render_index(page: &IndexPage) -> String {
    let mut body = String::new();
    body.push_str("<h1>Student Records</h1>\n");
    push_alerts(&mut body, page.error.as_deref(), None);
    if let Some(nim) = &page.deleted_nim {
        push_alerts(
            &mut body,
            None,
            Some(&format!("Student with NIM {} was deleted.", escape(nim))),
        );
    }

    body.push_str(concat!(
        "<form method=\"post\" action=\"/add\" class=\"add\">\n",
        "  <input name=\"nama\" placeholder=\"Name\" required>\n",
        "  <input name=\"nim\" placeholder=\"NIM\" required>\n",
        "  <input name=\"nilai\" placeholder=\"GPA (0-4)\" required>\n",
        "  <button type=\"submit\">Add</button>\n",
        "</form>\n",
    ));

    let _ = write!(
        body,
        concat!(
            "<form method=\"get\" action=\"/\" class=\"search\">\n",
            "  <input name=\"search\" placeholder=\"NIM or name\" value=\"{}\">\n",
            "  <input name=\"min_nilai\" placeholder=\"GPA above\" value=\"{}\">\n",
            "  <button type=\"submit\">Search</button> <a href=\"/\">Reset</a>\n",
            "</form>\n",
        ),
        escape(&page.search_text),
        escape(&page.min_score_text),
    );

    let _ = writeln!(body, "<p>Total: {}</p>", page.students.len());
    body.push_str("<table>\n<thead><tr>");
    for (column, label) in [
        (SortColumn::Id, "ID"),
        (SortColumn::Nim, "NIM"),
        (SortColumn::Name, "Name"),
        (SortColumn::Score, "GPA"),
    ] {
        push_sort_header(&mut body, page, column, label);
    }
    body.push_str("<th></th></tr></thead>\n<tbody>\n");

    for student in &page.students {
        let _ = write!(
            body,
            concat!(
                "<tr><td>{id}</td><td>{nim}</td><td>{name}</td><td>{score:.2}</td><td>",
                "<a href=\"/edit/{id}\">Edit</a> ",
                "<form method=\"post\" action=\"/delete\" style=\"display:inline\">",
                "<input type=\"hidden\" name=\"id\" value=\"{id}\">",
                "<button type=\"submit\">Delete</button></form>",
                "</td></tr>\n",
            ),
            id = student.id,
            nim = escape(&student.nim),
            name = escape(&student.name),
            score = student.score,
        );
    }
    body.push_str("</tbody>\n</table>\n");

    layout("Student Records", &body)
}

pub fn render_edit(page: &EditPage) -> String {
    let mut body = String::new();
    body.push_str("<h1>Edit Student</h1>\n");
    let success = page.success.then_some("Student updated.");
    push_alerts(&mut body, page.error.as_deref(), success);

    let student = &page.student;
    let _ = write!(
        body,
        concat!(
            "<form method=\"post\" action=\"/edit\">\n",
            "  <input type=\"hidden\" name=\"id\" value=\"{id}\">\n",
            "  <label>Name <input name=\"nama\" value=\"{name}\" required></label>\n",
            "  <label>NIM <input name=\"nim\" value=\"{nim}\" required></label>\n",
            "  <label>GPA <input name=\"nilai\" value=\"{score}\" required></label>\n",
            "  <button type=\"submit\">Save</button>\n",
            "</form>\n",
            "<p><a href=\"/\">Back to list</a></p>\n",
        ),
        id = student.id,
        name = escape(&student.name),
        nim = escape(&student.nim),
        score = student.score,
    );

    layout("Edit Student", &body)
}

fn push_alerts(body: &mut String, error: Option<&str>, success: Option<&str>) {
    if let Some(error) = error {
        let _ = writeln!(body, "<div class=\"alert error\">{}</div>", escape(error));
    }
    // Success text is built by us and may already contain escaped fragments.
    if let Some(success) = success {
        let _ = writeln!(body, "<div class=\"alert success\">{success}</div>");
    }
}

fn push_sort_header(body: &mut String, page: &IndexPage, column: SortColumn, label: &str) {
    let active = page.sort == column;
    let next = if active { page.order.toggled() } else { SortOrder::Asc };
    let arrow = match (active, page.order) {
        (false, _) => "",
        (true, SortOrder::Asc) => " &#9650;",
        (true, SortOrder::Desc) => " &#9660;",
    };
    let _ = write!(
        body,
        "<th><a href=\"/?sort_by={}&amp;order={}\">{label}{arrow}</a></th>",
        column.as_param(),
        next.as_param(),
    );
}

fn layout(title: &str, body: &str) -> String {
    format!(
        concat!(
            "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n",
            "<meta charset=\"utf-8\">\n<title>{}</title>\n",
            "<style>",
            "body{{font-family:sans-serif;margin:2rem}}",
            "table{{border-collapse:collapse}}td,th{{border:1px solid #ccc;padding:.3rem .6rem}}",
            ".alert{{padding:.5rem;margin:.5rem 0}}.error{{background:#fdd}}.success{{background:#dfd}}",
            "</style>\n</head>\n<body>\n{}</body>\n</html>\n",
        ),
        escape(title),
        body
    )
}

/// Escapes the five characters that are significant in HTML text and attributes.
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
