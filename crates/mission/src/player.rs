//! Player-facing collaborators of mission logic: the player's state and the UI.

use engine_core::Flagship;

use crate::conditions::ConditionStore;
use crate::data_file::DataNode;
use crate::data_writer::DataWriter;

/// What mission logic may read and change about the player.
pub trait PlayerState {
    /// The ship the player is flying, if any.
    fn flagship(&self) -> Option<&Flagship>;
    fn conditions_mut(&mut self) -> &mut ConditionStore;
    fn add_credits(&mut self, amount: i64);
    fn add_log_entry(&mut self, text: &str);
}

/// Where missions show text to the player.
pub trait Interface {
    fn show_dialog(&mut self, text: &str);
}

/// Plain player record used by the headless runner and by tests.
#[derive(Debug, Clone, Default)]
pub struct PlayerInfo {
    pub flagship: Option<Flagship>,
    pub conditions: ConditionStore,
    pub credits: i64,
    pub log: Vec<String>,
}

impl PlayerInfo {
    pub fn new(flagship: Flagship) -> Self {
        Self {
            flagship: Some(flagship),
            ..Default::default()
        }
    }

    pub fn flagship_mut(&mut self) -> Option<&mut Flagship> {
        self.flagship.as_mut()
    }

    /// Restore credits, conditions and log from a saved `player` block.
    pub fn load(&mut self, node: &DataNode) {
        for child in node {
            match child.token(0) {
                "credits" => self.credits = child.value(1) as i64,
                "conditions" => self.conditions.load(child),
                "log" if child.size() > 1 => self.log.push(child.token(1).to_string()),
                _ => child.print_trace("Skipping unrecognized player attribute"),
            }
        }
    }

    pub fn save(&self, out: &mut DataWriter) {
        out.write(["player"]);
        out.begin_child();
        out.write(["credits", &self.credits.to_string()]);
        self.conditions.save(out);
        for entry in &self.log {
            out.write(["log", entry.as_str()]);
        }
        out.end_child();
    }
}

impl PlayerState for PlayerInfo {
    fn flagship(&self) -> Option<&Flagship> {
        self.flagship.as_ref()
    }

    fn conditions_mut(&mut self) -> &mut ConditionStore {
        &mut self.conditions
    }

    fn add_credits(&mut self, amount: i64) {
        self.credits = self.credits.saturating_add(amount);
    }

    fn add_log_entry(&mut self, text: &str) {
        self.log.push(text.to_string());
    }
}

/// Interface that records dialogs instead of drawing them.
#[derive(Debug, Clone, Default)]
pub struct MessageLog {
    pub dialogs: Vec<String>,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Interface for MessageLog {
    fn show_dialog(&mut self, text: &str) {
        log::info!("Dialog: {}", text);
        self.dialogs.push(text.to_string());
    }
}
