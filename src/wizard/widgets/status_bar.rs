/// Key hints shown in the status bar, updated on every phase change
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusBarState {
    /// Left side hint text (e.g., "j/k: navigate  Space: toggle")
    pub left_hint: String,
    /// Right side hint text (e.g., "Enter: continue  q: quit")
    pub right_hint: String,
}

impl StatusBarState {
    /// Get hints for the selection list
    pub fn selecting() -> Self {
        Self {
            left_hint: "j/k: navigate  Space: toggle  a: all".to_string(),
            right_hint: "Tab: profile  Enter: continue  q: quit".to_string(),
        }
    }

    /// Get hints for the confirmation dialog
    pub fn confirming(has_selection: bool) -> Self {
        if has_selection {
            Self {
                left_hint: "Review your selection".to_string(),
                right_hint: "y: install  n: back  Esc: quit".to_string(),
            }
        } else {
            Self {
                left_hint: "Nothing selected".to_string(),
                right_hint: "y: finish  n: back  Esc: quit".to_string(),
            }
        }
    }

    /// Get hints while scripts run
    pub fn installing() -> Self {
        Self {
            left_hint: "Please wait...".to_string(),
            right_hint: String::new(),
        }
    }

    pub fn complete() -> Self {
        Self {
            left_hint: String::new(),
            right_hint: "Enter/q: exit".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confirm_hints_follow_selection() {
        assert!(StatusBarState::confirming(true).right_hint.contains("install"));
        assert!(StatusBarState::confirming(false).right_hint.contains("finish"));
    }

    #[test]
    fn test_installing_has_no_key_hints() {
        assert!(StatusBarState::installing().right_hint.is_empty());
    }
}
