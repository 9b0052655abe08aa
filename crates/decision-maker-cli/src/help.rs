pub const HELP_TEXT: &str = "\
Decision Maker picks one option at random so you don't have to.

Main menu
  Decide with a saved category   Pick a category and get a random choice from it.
  Create a new category          Give it a name, a description and some choices.
                                 Type 'done' (or any number) when you have entered
                                 enough choices. If you leave halfway, the category
                                 is kept as a draft and offered again next time.
  One-off decision               Type a few choices, get an answer, nothing is saved.
  Random number                  Pick a whole number between two numbers you give.
  Manage a category              Read, rename, describe, add to, remove from or
                                 delete a saved category.
  Delete all categories          Remove every saved category file.
  Personality                    Change the greeting, the goodbye and what you're called.
  File management                List, read and delete the files Decision Maker wrote.

Type 'exit' at any prompt to go back one menu. Every decision made is written to
a session summary file when you leave.";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_help_mentions_every_menu() {
        for topic in ["saved category", "One-off", "Random number", "Personality", "exit"] {
            assert!(HELP_TEXT.contains(topic), "help is missing {topic}");
        }
    }
}
