//! Note display formatting

use crate::models::Note;

use super::truncate;

/// Format notes as a compact list, one line each
pub fn format_note_list(notes: &[Note]) -> String {
    if notes.is_empty() {
        return "No notes found.".to_string();
    }

    let mut output = String::new();
    for note in notes {
        let tags = if note.tags.is_empty() {
            String::new()
        } else {
            format!(" [{}]", note.tags.join(", "))
        };
        output.push_str(&format!(
            "{:<14}  {}  {}{}\n",
            note.id.short(),
            note.updated_at.format("%Y-%m-%d"),
            truncate(&note.title, 40),
            tags
        ));
        if !note.content.is_empty() {
            output.push_str(&format!("{:16}{}\n", "", truncate(&note.content, 70)));
        }
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_note_list() {
        let mut note = Note::new("Weekly review", "Overtraded on Monday");
        note.tags = vec!["review".into(), "discipline".into()];

        let output = format_note_list(&[note]);
        assert!(output.contains("Weekly review"));
        assert!(output.contains("[review, discipline]"));
        assert!(output.contains("Overtraded on Monday"));
    }
}
