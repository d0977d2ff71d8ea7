/// Colour of the panel's status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTone {
    Success,
    Error,
}

/// State of the collapsible details panel that hosts the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelState {
    pub section_open: bool,
    /// Mirrors the form's save readiness.
    pub complete: bool,
    /// Editing (form shown) vs. viewing (read-only record shown).
    pub edit_mode: bool,
}

impl Default for PanelState {
    fn default() -> Self {
        Self {
            section_open: false,
            complete: false,
            edit_mode: true,
        }
    }
}

impl PanelState {
    pub fn toggle_section(&mut self) {
        self.section_open = !self.section_open;
    }

    pub fn set_complete(&mut self, complete: bool) {
        self.complete = complete;
    }

    pub fn enter_edit_mode(&mut self) {
        self.edit_mode = true;
    }

    pub fn enter_view_mode(&mut self) {
        self.edit_mode = false;
    }

    // Trailing spaces are part of the platform copy; the icon follows inline.
    pub fn status_message(&self) -> &'static str {
        if self.complete {
            "Details completed "
        } else {
            "Please complete your details here "
        }
    }

    pub fn status_icon(&self) -> &'static str {
        if self.section_open {
            "utility:chevrondown"
        } else {
            "utility:chevronright"
        }
    }

    pub fn status_tone(&self) -> StatusTone {
        if self.complete {
            StatusTone::Success
        } else {
            StatusTone::Error
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let panel = PanelState::default();
        assert!(!panel.section_open);
        assert!(!panel.complete);
        assert!(panel.edit_mode);
    }

    #[test]
    fn toggle_flips_icon() {
        let mut panel = PanelState::default();
        assert_eq!(panel.status_icon(), "utility:chevronright");
        panel.toggle_section();
        assert_eq!(panel.status_icon(), "utility:chevrondown");
        panel.toggle_section();
        assert!(!panel.section_open);
    }

    #[test]
    fn status_follows_completion() {
        let mut panel = PanelState::default();
        assert_eq!(panel.status_message(), "Please complete your details here ");
        assert_eq!(panel.status_tone(), StatusTone::Error);
        panel.set_complete(true);
        assert_eq!(panel.status_message(), "Details completed ");
        assert_eq!(panel.status_tone(), StatusTone::Success);
    }

    #[test]
    fn mode_switches() {
        let mut panel = PanelState::default();
        panel.enter_view_mode();
        assert!(!panel.edit_mode);
        panel.enter_edit_mode();
        assert!(panel.edit_mode);
    }
}
