//! Plain-text rendering of each dashboard section.

use crate::api::InterviewStatus;
use crate::selection::HeaderState;
use crate::views::candidates::SortOrder;
use crate::views::{CandidateTable, JdUploader, LovEditor, Notice, ProfileUploader};

fn checkbox(checked: bool) -> &'static str {
    if checked {
        "[x]"
    } else {
        "[ ]"
    }
}

fn header_checkbox(state: HeaderState) -> &'static str {
    match state {
        HeaderState::Unchecked => "[ ]",
        HeaderState::Indeterminate => "[-]",
        HeaderState::Checked => "[x]",
    }
}

pub fn notice(notice: &Notice) -> String {
    if notice.is_error {
        format!("Error: {notice}\n")
    } else {
        format!("{notice}\n")
    }
}

/// Status tabs with the active one bracketed.
fn tabs(active: InterviewStatus) -> String {
    InterviewStatus::TABS
        .iter()
        .map(|tab| {
            if *tab == active {
                format!("[{}]", tab.as_str())
            } else {
                tab.as_str().to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" | ")
}

pub fn candidates(table: &CandidateTable) -> String {
    let mut out = format!(
        "Interviews: {}\nPage {} of {} | {} candidates\n",
        tabs(table.status()),
        table.page() + 1,
        table.page_count().max(1),
        table.total()
    );
    if let Some(error) = table.error() {
        out.push_str(&format!("Error: {error}\n"));
        return out;
    }
    if table.rows().is_empty() {
        out.push_str("No candidates found.\n");
        return out;
    }

    out.push_str(&format!(
        "{} {:<6} {:<20} {:<28} {:<12} {:<14} {:<6} {}\n",
        header_checkbox(table.header_state()),
        "ID",
        "NAME",
        "EMAIL",
        "LOCATION",
        "DEPARTMENT",
        "GRADE",
        "STATUS"
    ));
    let (field, order) = table.sort();
    let arrow = match order {
        SortOrder::Asc => "asc",
        SortOrder::Desc => "desc",
    };
    for c in table.sorted_rows() {
        out.push_str(&format!(
            "{} {:<6} {:<20.20} {:<28.28} {:<12.12} {:<14.14} {:<6.6} {}\n",
            checkbox(table.selection().is_selected(&c.id)),
            c.id,
            c.name,
            c.email,
            c.location,
            c.department,
            c.grade,
            c.interview_status
        ));
    }
    out.push_str(&format!(
        "Selected {} of {} | sorted by {} ({arrow})\n",
        table.selection().len(),
        table.rows().len(),
        field.as_str()
    ));
    out
}

pub fn lov(editor: &LovEditor) -> String {
    let Some(name) = editor.name() else {
        return "Configuration: choose a list with 'lov skill' or 'lov designation'\n"
            .to_string();
    };
    let mut out = format!("Configuration: {}\n", name.as_str());
    if !editor.input().is_empty() {
        out.push_str(&format!("Value: {}\n", editor.input()));
    }
    if let Some(error) = editor.error() {
        out.push_str(&format!("Error: {error}\n"));
        return out;
    }
    if editor.rows().is_empty() {
        out.push_str("No values.\n");
        return out;
    }

    out.push_str(&format!(
        "{} {:<4} VALUE\n",
        header_checkbox(editor.selection().header_state()),
        "#"
    ));
    for row in editor.rows() {
        out.push_str(&format!(
            "{} {:<4} {}\n",
            checkbox(editor.selection().is_selected(&row.id)),
            row.id,
            row.value
        ));
    }
    out
}

pub fn jd_form(form: &JdUploader) -> String {
    let field = |value: Option<&str>| value.unwrap_or("-").to_string();
    let mut out = String::from("Job description upload\n");
    out.push_str(&format!("  Skill:         {}\n", field(form.skill())));
    out.push_str(&format!("  Designation:   {}\n", field(form.designation())));
    out.push_str(&format!("  JD file:       {}\n", field(form.jd_file_name())));
    out.push_str(&format!(
        "  Question bank: {}\n",
        field(form.question_bank_name())
    ));
    if !form.skills().is_empty() {
        out.push_str(&format!("Skills: {}\n", form.skills().join(", ")));
    }
    if !form.designations().is_empty() {
        out.push_str(&format!("Designations: {}\n", form.designations().join(", ")));
    }
    out
}

pub fn profiles(uploader: &ProfileUploader) -> String {
    match uploader.file_name() {
        Some(name) => format!("Bulk profile upload\n  File: {name}\n"),
        None => "Bulk profile upload\n  File: - (choose one with 'profiles <path.xlsx>')\n"
            .to_string(),
    }
}
