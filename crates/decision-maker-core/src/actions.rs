/// What can be done with a single category once it has been picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryAction {
    Decide,
    ReadChoices,
    Rename,
    EditDescription,
    AddChoices,
    RemoveChoices,
    DeleteCategory,
}

/// One row of the category action menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionSpec {
    pub label: &'static str,
    /// Ends the category session after running once.
    pub terminal: bool,
    pub action: CategoryAction,
}

/// Ordered action menu, resolved by 1-based position.
#[derive(Debug, Clone)]
pub struct ActionTable {
    entries: Vec<ActionSpec>,
}

impl ActionTable {
    pub fn new(entries: Vec<ActionSpec>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[ActionSpec] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn resolve(&self, position: usize) -> Option<&ActionSpec> {
        position
            .checked_sub(1)
            .and_then(|index| self.entries.get(index))
    }

    pub fn spec(&self, action: CategoryAction) -> Option<&ActionSpec> {
        self.entries.iter().find(|spec| spec.action == action)
    }

    pub fn is_terminal(&self, action: CategoryAction) -> bool {
        self.spec(action).map(|spec| spec.terminal).unwrap_or(false)
    }

    pub fn render_menu(&self) -> String {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, spec)| format!("{}. {}", i + 1, spec.label))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Default for ActionTable {
    fn default() -> Self {
        use CategoryAction::*;
        fn row(label: &'static str, terminal: bool, action: CategoryAction) -> ActionSpec {
            ActionSpec {
                label,
                terminal,
                action,
            }
        }
        Self::new(vec![
            row("Make a decision", true, Decide),
            row("Read choices", false, ReadChoices),
            row("Rename category", false, Rename),
            row("Change description", false, EditDescription),
            row("Add choices", false, AddChoices),
            row("Remove choices", false, RemoveChoices),
            row("Delete entire category", true, DeleteCategory),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_terminal_actions() {
        let table = ActionTable::default();
        let terminal: Vec<CategoryAction> = table
            .entries()
            .iter()
            .filter(|spec| spec.terminal)
            .map(|spec| spec.action)
            .collect();
        assert_eq!(
            terminal,
            vec![CategoryAction::Decide, CategoryAction::DeleteCategory]
        );
        assert!(!table.is_terminal(CategoryAction::AddChoices));
    }

    #[test]
    fn test_resolve_is_one_based() {
        let table = ActionTable::default();
        assert_eq!(table.resolve(1).unwrap().action, CategoryAction::Decide);
        assert_eq!(
            table.resolve(table.len()).unwrap().action,
            CategoryAction::DeleteCategory
        );
        assert!(table.resolve(0).is_none());
        assert!(table.resolve(table.len() + 1).is_none());
    }

    #[test]
    fn test_render_menu() {
        let table = ActionTable::default();
        let menu = table.render_menu();
        assert!(menu.starts_with("1. Make a decision"));
        assert_eq!(menu.lines().count(), table.len());
    }
}
