//! Note CLI commands

use clap::Subcommand;

use crate::display::format_note_list;
use crate::error::JournalResult;
use crate::facade::Journal;
use crate::models::Note;

use super::match_id;

/// Note subcommands
#[derive(Subcommand)]
pub enum NoteCommands {
    /// Write a new note
    Add {
        /// Note title
        title: String,
        /// Note body
        #[arg(default_value = "")]
        content: String,
        /// Tag (repeatable)
        #[arg(short, long = "tag")]
        tags: Vec<String>,
    },
    /// List notes, most recently edited first
    List,
    /// Delete a note
    Delete {
        /// Note ID
        note: String,
    },
}

/// Handle a note command
pub fn handle_note_command(journal: &Journal<'_>, cmd: NoteCommands) -> JournalResult<()> {
    match cmd {
        NoteCommands::Add {
            title,
            content,
            tags,
        } => {
            let mut note = Note::new(title, content);
            note.tags = tags;
            let note = journal.create_note(note)?;
            println!("Added note: {}", note.title);
            println!("  ID: {}", note.id);
        }

        NoteCommands::List => {
            let notes = journal.list_notes()?;
            println!("{}", format_note_list(&notes));
        }

        NoteCommands::Delete { note } => {
            let notes = journal.list_notes()?;
            let found = match_id(&notes, &note, |n| n.id, "Note")?;
            journal.delete_note(found.id)?;
            println!("Deleted note: {}", found.title);
        }
    }

    Ok(())
}
